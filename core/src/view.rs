//! The requirement form as a headless view controller.
//!
//! # Design
//! `RequirementFormView` never performs I/O. The host asks it for a request
//! (`begin_*`), executes the round-trip, and hands the result back
//! (`finish_*`). Between those two calls the view is in a well-defined
//! state: a programs load is pending, or a submission is in flight with the
//! submit control disabled.
//!
//! The programs load belongs to the view's scope. Once `teardown` runs, a
//! late response is discarded instead of mutating a form nobody sees.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use crate::client::PortalClient;
use crate::error::{FormError, TransportError};
use crate::form::{FormField, FormMode, FormState};
use crate::http::{HttpRequest, HttpResponse};
use crate::session::{CurrentUser, NavigationState, Navigator, Notification, Notifier};
use crate::types::Program;

/// Route shown after a successful submission.
pub const MY_REQUIREMENTS_ROUTE: &str = "/mis-requerimientos";

pub const RESTRICTED_NOTICE: &str = "Restricted access: only clients can create or edit requirements.";

const CONNECTION_ERROR: &str = "Connection error: could not reach the server. Please try again.";

static NEXT_SCOPE: AtomicU64 = AtomicU64::new(1);

/// Submission state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
}

/// How a finished submission was reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Success notification shown and navigation to the listing issued.
    Saved,
    /// The server answered with a non-2xx status.
    Rejected { status: u16, message: String },
    /// The request never got a response.
    ConnectionFailed,
}

/// Identifies the programs load issued by one particular view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    scope: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProgramsLoad {
    NotStarted,
    Pending,
    Settled,
}

/// What the host should display.
#[derive(Debug, PartialEq)]
pub enum Screen<'a> {
    Restricted { notice: &'static str },
    Form(FormScreen<'a>),
}

/// One input as the host should draw it.
#[derive(Debug, PartialEq)]
pub struct FieldView<'a> {
    pub field: FormField,
    pub value: &'a str,
    pub required: bool,
}

/// Render model for the form itself.
#[derive(Debug, PartialEq)]
pub struct FormScreen<'a> {
    pub mode: FormMode,
    pub heading: &'static str,
    pub values: &'a FormState,
    /// Inputs in display order.
    pub fields: [FieldView<'a>; 4],
    pub programs: &'a [Program],
    /// The dropdown is still waiting for its options. Failures are not
    /// surfaced; the list simply stays empty.
    pub programs_loading: bool,
    pub submit_label: &'static str,
    pub submit_disabled: bool,
    pub submit_spinner: bool,
}

pub struct RequirementFormView<N, S> {
    client: PortalClient,
    user: Option<CurrentUser>,
    mode: FormMode,
    state: FormState,
    programs: Vec<Program>,
    programs_load: ProgramsLoad,
    phase: SubmitPhase,
    scope: u64,
    closed: bool,
    navigator: N,
    notifier: S,
}

impl<N: Navigator, S: Notifier> RequirementFormView<N, S> {
    /// Open the form. Edit mode is entered only when the navigation state
    /// asks for it and carries the requirement; the form is prefilled once
    /// from it.
    pub fn new(
        client: PortalClient,
        user: Option<CurrentUser>,
        navigation: &NavigationState,
        navigator: N,
        notifier: S,
    ) -> Self {
        let (mode, state) = match navigation.edit_source() {
            Some(requirement) => (
                FormMode::Edit {
                    requirement_id: requirement.id,
                },
                FormState::from_requirement(requirement),
            ),
            None => (FormMode::Create, FormState::default()),
        };
        Self {
            client,
            user,
            mode,
            state,
            programs: Vec::new(),
            programs_load: ProgramsLoad::NotStarted,
            phase: SubmitPhase::Idle,
            scope: NEXT_SCOPE.fetch_add(1, Ordering::Relaxed),
            closed: false,
            navigator,
            notifier,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn notifier(&self) -> &S {
        &self.notifier
    }

    fn authorized_token(&self) -> Option<&str> {
        self.user.as_ref().filter(|u| u.is_client()).map(|u| u.token.as_str())
    }

    pub fn render(&self) -> Screen<'_> {
        if self.authorized_token().is_none() {
            return Screen::Restricted {
                notice: RESTRICTED_NOTICE,
            };
        }
        let busy = self.phase == SubmitPhase::Submitting;
        let (heading, submit_label) = match self.mode {
            FormMode::Create => ("Post a requirement", "Publish"),
            FormMode::Edit { .. } => ("Edit requirement", "Save changes"),
        };
        Screen::Form(FormScreen {
            mode: self.mode,
            heading,
            values: &self.state,
            fields: FormField::ALL.map(|field| FieldView {
                field,
                value: self.state.get(field),
                required: field.required(),
            }),
            programs: &self.programs,
            programs_loading: self.programs_load == ProgramsLoad::Pending,
            submit_label,
            submit_disabled: busy,
            submit_spinner: busy,
        })
    }

    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        self.state.set(field, value);
    }

    /// The one programs request of this view, or `None` if it was already
    /// issued or the view is torn down.
    pub fn begin_load_programs(&mut self) -> Option<(LoadTicket, HttpRequest)> {
        if self.closed || self.programs_load != ProgramsLoad::NotStarted {
            return None;
        }
        self.programs_load = ProgramsLoad::Pending;
        Some((LoadTicket { scope: self.scope }, self.client.build_list_programs()))
    }

    /// Apply the programs response. Any failure is logged and leaves the list
    /// empty. Returns whether the result was applied.
    pub fn finish_load_programs(&mut self, ticket: LoadTicket, outcome: Result<HttpResponse, TransportError>) -> bool {
        if self.closed || ticket.scope != self.scope || self.programs_load != ProgramsLoad::Pending {
            debug!(scope = ticket.scope, "discarding programs response outside its form scope");
            return false;
        }
        self.programs_load = ProgramsLoad::Settled;

        let parsed = outcome
            .map_err(|e| e.to_string())
            .and_then(|response| self.client.parse_list_programs(response).map_err(|e| e.to_string()));
        match parsed {
            Ok(programs) => {
                debug!(count = programs.len(), "programs loaded");
                self.programs = programs;
            }
            Err(error) => warn!(%error, "failed to load programs; dropdown left empty"),
        }
        true
    }

    /// Validate the form and produce the create or update request. On
    /// success the view enters `Submitting` until `finish_submit`.
    pub fn begin_submit(&mut self) -> Result<HttpRequest, FormError> {
        let token = self.authorized_token().ok_or(FormError::AccessDenied)?.to_string();
        if self.phase == SubmitPhase::Submitting {
            return Err(FormError::Busy);
        }

        let payload = match self.state.to_payload() {
            Ok(payload) => payload,
            Err(errors) => {
                let message = errors
                    .first()
                    .map(|e| format!("Please check the form: {e}"))
                    .unwrap_or_default();
                self.notifier.notify(Notification::error(message));
                return Err(FormError::Invalid(errors));
            }
        };

        let request = match self.mode {
            FormMode::Create => self.client.build_create_requirement(&token, &payload)?,
            FormMode::Edit { requirement_id } => {
                self.client.build_update_requirement(&token, requirement_id, &payload)?
            }
        };
        self.phase = SubmitPhase::Submitting;
        info!(mode = ?self.mode, method = request.method.as_str(), "submitting requirement");
        Ok(request)
    }

    /// Report the submission result to the user and return to `Idle`.
    pub fn finish_submit(&mut self, outcome: Result<HttpResponse, TransportError>) -> Result<SubmitOutcome, FormError> {
        if self.phase != SubmitPhase::Submitting {
            return Err(FormError::NotSubmitting);
        }
        self.phase = SubmitPhase::Idle;

        let response = match outcome {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, "requirement submission did not reach the server");
                self.notifier.notify(Notification::error(CONNECTION_ERROR));
                return Ok(SubmitOutcome::ConnectionFailed);
            }
        };

        match self.client.parse_submit_requirement(response) {
            Ok(()) => {
                info!(mode = ?self.mode, "requirement saved");
                self.notifier.notify(Notification::success(self.success_message()));
                self.navigator.navigate(MY_REQUIREMENTS_ROUTE);
                Ok(SubmitOutcome::Saved)
            }
            Err(error) => {
                let status = error.status().unwrap_or_default();
                let message = error
                    .server_message()
                    .unwrap_or_else(|| self.failure_message().to_string());
                warn!(status, %message, "requirement rejected by server");
                self.notifier.notify(Notification::error(message.clone()));
                Ok(SubmitOutcome::Rejected { status, message })
            }
        }
    }

    /// Close the view's scope. A pending programs load is abandoned.
    pub fn teardown(&mut self) {
        if self.programs_load == ProgramsLoad::Pending {
            debug!(scope = self.scope, "abandoning pending programs load");
        }
        self.closed = true;
    }

    fn success_message(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Requirement created successfully",
            FormMode::Edit { .. } => "Requirement updated successfully",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Could not create the requirement",
            FormMode::Edit { .. } => "Could not update the requirement",
        }
    }
}
