//! Async host for the requirement form.
//!
//! # Overview
//! `portal-core` only builds requests and parses responses. This crate does
//! the I/O: `HttpTransport` executes requests with reqwest, `FormSession`
//! ties the background programs fetch to the form's lifetime, and the
//! `portal-form` binary exposes the form on the command line.

pub mod commands;
pub mod config;
pub mod session;
pub mod sinks;
pub mod transport;

pub use config::Cli;
pub use session::FormSession;
pub use sinks::{ConsoleNotifier, RouteNavigator};
pub use transport::{HttpTransport, Transport, TransportSetupError};
