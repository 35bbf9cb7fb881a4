//! Capabilities the form receives from its host: the signed-in user, the
//! navigation state it was opened with, and the navigation and notification
//! sinks it drives.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Requirement;

/// Role attached to a portal account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Client,
    Professional,
    Admin,
    Other(String),
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "client" => Role::Client,
            "professional" => Role::Professional,
            "admin" => Role::Admin,
            _ => Role::Other(value.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Client => f.write_str("client"),
            Role::Professional => f.write_str("professional"),
            Role::Admin => f.write_str("admin"),
            Role::Other(s) => f.write_str(s),
        }
    }
}

/// The authenticated account, as provided by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub role: Role,
    pub token: String,
}

impl CurrentUser {
    pub fn new(role: impl Into<Role>, token: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            token: token.into(),
        }
    }

    pub fn is_client(&self) -> bool {
        self.role == Role::Client
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    Edit,
}

/// State handed over by the route that opened the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationState {
    #[serde(default)]
    pub mode: Option<NavigationMode>,
    #[serde(default)]
    pub requirement: Option<Requirement>,
}

impl NavigationState {
    pub fn edit(requirement: Requirement) -> Self {
        Self {
            mode: Some(NavigationMode::Edit),
            requirement: Some(requirement),
        }
    }

    /// The requirement to edit, if the state asks for edit mode and carries one.
    pub fn edit_source(&self) -> Option<&Requirement> {
        match self.mode {
            Some(NavigationMode::Edit) => self.requirement.as_ref(),
            None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A transient message for the user (a toast in a browser host).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Sink for route changes.
pub trait Navigator {
    fn navigate(&mut self, route: &str);
}

/// Sink for user-facing notifications.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}
