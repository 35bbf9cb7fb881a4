//! Requirement form lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the form view over
//! real HTTP using ureq as the host. Validates that the view's request
//! building and response handling work end-to-end with the actual server.

use portal_core::{
    CurrentUser, FormField, FormMode, HttpMethod, HttpRequest, HttpResponse, NavigationState, Navigator, Notification,
    NotificationLevel, Notifier, PortalClient, RequirementFormView, SubmitOutcome, TransportError,
    MY_REQUIREMENTS_ROUTE,
};

#[derive(Default)]
struct Routes(Vec<String>);

impl Navigator for Routes {
    fn navigate(&mut self, route: &str) {
        self.0.push(route.to_string());
    }
}

#[derive(Default)]
struct Toasts(Vec<Notification>);

impl Notifier for Toasts {
    fn notify(&mut self, notification: Notification) {
        self.0.push(notification);
    }
}

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`; only transport failures
/// become `TransportError`.
fn execute(req: HttpRequest) -> Result<HttpResponse, TransportError> {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let result = match req.method {
        HttpMethod::Get => {
            let mut builder = agent.get(&req.path);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        HttpMethod::Post | HttpMethod::Patch => {
            let mut builder = if req.method == HttpMethod::Post {
                agent.post(&req.path)
            } else {
                agent.patch(&req.path)
            };
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.send(req.body.unwrap_or_default().as_bytes())
        }
    };
    let mut response = result.map_err(|e| TransportError(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| TransportError(e.to_string()))?;

    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body,
    })
}

fn start_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });
    addr
}

fn open(client: &PortalClient, navigation: NavigationState) -> RequirementFormView<Routes, Toasts> {
    RequirementFormView::new(
        client.clone(),
        Some(CurrentUser::new("client", "alice")),
        &navigation,
        Routes::default(),
        Toasts::default(),
    )
}

fn submit(view: &mut RequirementFormView<Routes, Toasts>) -> SubmitOutcome {
    let req = view.begin_submit().unwrap();
    view.finish_submit(execute(req)).unwrap()
}

#[test]
fn create_then_edit_lifecycle() {
    let addr = start_server();
    let client = PortalClient::new(&format!("http://{addr}"));

    // Step 1: open in create mode and load the dropdown.
    let mut view = open(&client, NavigationState::default());
    let (ticket, req) = view.begin_load_programs().unwrap();
    assert!(view.finish_load_programs(ticket, execute(req)));
    assert!(!view.programs().is_empty());
    let program = view.programs()[0].id;

    // Step 2: fill and submit.
    view.update_field(FormField::Title, "Logo design");
    view.update_field(FormField::Description, "A logo for my startup");
    view.update_field(FormField::ProgramId, program.to_string());
    view.update_field(FormField::Budget, "150.5");
    assert_eq!(submit(&mut view), SubmitOutcome::Saved);
    assert_eq!(view.navigator().0, vec![MY_REQUIREMENTS_ROUTE.to_string()]);
    assert_eq!(view.notifier().0[0].level, NotificationLevel::Success);
    view.teardown();

    // Step 3: the same title again is rejected with the server's message.
    let mut view = open(&client, NavigationState::default());
    view.update_field(FormField::Title, "Logo design");
    view.update_field(FormField::Description, "Again");
    view.update_field(FormField::ProgramId, program.to_string());
    assert_eq!(
        submit(&mut view),
        SubmitOutcome::Rejected {
            status: 409,
            message: "Duplicate title".to_string()
        }
    );
    assert!(view.navigator().0.is_empty());
    view.teardown();

    // Step 4: the listing shows the one requirement.
    let req = client.build_list_my_requirements("alice");
    let mine = client.parse_list_my_requirements(execute(req).unwrap()).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].budget, Some(150.5));

    // Step 5: edit it, clearing the budget.
    let mut view = open(&client, NavigationState::edit(mine[0].clone()));
    assert_eq!(
        view.mode(),
        FormMode::Edit {
            requirement_id: mine[0].id
        }
    );
    assert_eq!(view.state().budget, "150.5");
    view.update_field(FormField::Budget, "");
    assert_eq!(submit(&mut view), SubmitOutcome::Saved);
    assert_eq!(
        view.notifier().0,
        vec![Notification::success("Requirement updated successfully")]
    );

    let req = client.build_list_my_requirements("alice");
    let mine = client.parse_list_my_requirements(execute(req).unwrap()).unwrap();
    assert_eq!(mine[0].budget, None);
}

#[test]
fn unknown_program_uses_server_message() {
    let addr = start_server();
    let client = PortalClient::new(&format!("http://{addr}"));

    let mut view = open(&client, NavigationState::default());
    view.update_field(FormField::Title, "Contract review");
    view.update_field(FormField::Description, "Two pages");
    view.update_field(FormField::ProgramId, "999");
    let outcome = submit(&mut view);
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected {
            status: 422,
            message: "Unknown program".to_string()
        }
    );
}

#[test]
fn unreachable_server_reports_connection_error() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let client = PortalClient::new(&format!("http://{addr}"));

    let mut view = open(&client, NavigationState::default());
    let (ticket, req) = view.begin_load_programs().unwrap();
    assert!(view.finish_load_programs(ticket, execute(req)));
    assert!(view.programs().is_empty());
    assert!(view.notifier().0.is_empty());

    view.update_field(FormField::Title, "Logo");
    view.update_field(FormField::Description, "Logo");
    view.update_field(FormField::ProgramId, "1");
    assert_eq!(submit(&mut view), SubmitOutcome::ConnectionFailed);
    assert_eq!(view.notifier().0.len(), 1);
    assert_eq!(view.notifier().0[0].level, NotificationLevel::Error);
}
