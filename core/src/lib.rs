//! Headless requirement form core for the student services portal.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the form logic fully deterministic and
//! testable.
//!
//! # Design
//! - `PortalClient` is stateless and holds only `base_url`.
//! - `RequirementFormView` owns the form state, the submission state machine
//!   and the access guard. Session, navigation and notification capabilities
//!   are injected at construction instead of being read from ambient context.
//! - Identifier and currency inputs go through the typed parsers in `parse`,
//!   which report a `FieldError` instead of coercing malformed input.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod form;
pub mod http;
pub mod parse;
pub mod session;
pub mod types;
pub mod view;

pub use client::PortalClient;
pub use error::{ApiError, FieldError, FormError, TransportError};
pub use form::{FormField, FormMode, FormState};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::{CurrentUser, NavigationMode, NavigationState, Navigator, Notification, NotificationLevel, Notifier, Role};
pub use types::{Program, Requirement, RequirementPayload};
pub use view::{FieldView, FormScreen, MY_REQUIREMENTS_ROUTE, RESTRICTED_NOTICE, LoadTicket, RequirementFormView, Screen, SubmitOutcome, SubmitPhase};
