//! Subcommand handlers for `portal-form`.

use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use portal_core::{
    FormField, NavigationState, PortalClient, Requirement, RequirementFormView, Screen, SubmitOutcome,
};

use crate::config::{Cli, Command, EditArgs, RequirementArgs};
use crate::session::FormSession;
use crate::sinks::{ConsoleNotifier, RouteNavigator};
use crate::transport::{HttpTransport, Transport};

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let transport = HttpTransport::new(cli.timeout())?;
    let client = PortalClient::new(&cli.base_url);

    match &cli.command {
        Command::Programs => list_programs(&client, &transport).await,
        Command::Mine => {
            let token = require_token(&cli)?;
            list_mine(&client, &transport, &token).await
        }
        Command::Create(args) => create(&cli, client, transport, args).await,
        Command::Edit { id, fields } => edit(&cli, client, transport, *id, fields).await,
    }
}

fn require_token(cli: &Cli) -> Result<String> {
    match cli.current_user() {
        Some(user) => Ok(user.token),
        None => bail!("no session token; pass --token or set PORTAL_TOKEN"),
    }
}

async fn list_programs(client: &PortalClient, transport: &impl Transport) -> Result<ExitCode> {
    let response = transport.execute(client.build_list_programs()).await?;
    let programs = client.parse_list_programs(response)?;
    for program in programs {
        println!("{:>4}  {}", program.id, program.name);
    }
    Ok(ExitCode::SUCCESS)
}

async fn fetch_mine(client: &PortalClient, transport: &impl Transport, token: &str) -> Result<Vec<Requirement>> {
    let response = transport.execute(client.build_list_my_requirements(token)).await?;
    Ok(client.parse_list_my_requirements(response)?)
}

async fn list_mine(client: &PortalClient, transport: &impl Transport, token: &str) -> Result<ExitCode> {
    for requirement in fetch_mine(client, transport, token).await? {
        let budget = requirement
            .budget
            .map(|b| b.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>4}  {}  (program {}, budget {budget})",
            requirement.id, requirement.title, requirement.program_id
        );
    }
    Ok(ExitCode::SUCCESS)
}

async fn create(
    cli: &Cli,
    client: PortalClient,
    transport: HttpTransport,
    args: &RequirementArgs,
) -> Result<ExitCode> {
    let mut session = open(cli, client, transport, NavigationState::default());
    let view = session.view_mut();
    view.update_field(FormField::Title, args.title.as_str());
    view.update_field(FormField::Description, args.description.as_str());
    view.update_field(FormField::ProgramId, args.program.as_str());
    view.update_field(FormField::Budget, args.budget.as_str());
    submit(session).await
}

async fn edit(
    cli: &Cli,
    client: PortalClient,
    transport: HttpTransport,
    id: i64,
    fields: &EditArgs,
) -> Result<ExitCode> {
    let token = require_token(cli)?;
    let source = fetch_mine(&client, &transport, &token)
        .await?
        .into_iter()
        .find(|r| r.id == id)
        .with_context(|| format!("requirement {id} not found among your requirements"))?;

    let mut session = open(cli, client, transport, NavigationState::edit(source));
    let view = session.view_mut();
    let overrides = [
        (FormField::Title, &fields.title),
        (FormField::Description, &fields.description),
        (FormField::ProgramId, &fields.program),
        (FormField::Budget, &fields.budget),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            view.update_field(field, value.as_str());
        }
    }
    submit(session).await
}

type TerminalSession = FormSession<HttpTransport, RouteNavigator, ConsoleNotifier>;

fn open(cli: &Cli, client: PortalClient, transport: HttpTransport, navigation: NavigationState) -> TerminalSession {
    let view = RequirementFormView::new(
        client,
        cli.current_user(),
        &navigation,
        RouteNavigator::default(),
        ConsoleNotifier::new(),
    );
    FormSession::open(view, transport)
}

async fn submit(mut session: TerminalSession) -> Result<ExitCode> {
    let restricted = match session.view().render() {
        Screen::Restricted { notice } => Some(notice),
        Screen::Form(_) => None,
    };
    if let Some(notice) = restricted {
        println!("{notice}");
        session.close();
        return Ok(ExitCode::from(2));
    }

    session.programs_ready().await;
    let view = session.view();
    let program = view.state().program_id.trim().to_string();
    if !view.programs().is_empty() && !view.programs().iter().any(|p| p.id.to_string() == program) {
        tracing::warn!(%program, "program is not in the published list");
    }

    let outcome = match session.submit().await {
        Ok(outcome) => outcome,
        // Validation failures were already shown as a notification.
        Err(portal_core::FormError::Invalid(_)) => {
            session.close();
            return Ok(ExitCode::FAILURE);
        }
        Err(error) => return Err(error.into()),
    };

    let view = session.close();
    match outcome {
        SubmitOutcome::Saved => {
            if let Some(route) = view.navigator().current() {
                println!("-> {route}");
            }
            Ok(ExitCode::SUCCESS)
        }
        SubmitOutcome::Rejected { .. } | SubmitOutcome::ConnectionFailed => Ok(ExitCode::FAILURE),
    }
}
