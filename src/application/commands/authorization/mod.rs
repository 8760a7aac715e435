mod begin;
mod complete;
mod issue_code;
mod service;

pub use begin::{BeginAuthorizationCommand, PendingAuthorization};
pub use complete::{CompleteAuthorizationCommand, CompletedAuthorization};
pub use issue_code::IssueCodeCommand;
pub use service::{AuthorizationCommandService, DEFAULT_AUTHORIZATION_TTL_SECS};

use crate::application::error::{ApplicationError, ApplicationResult};

/// Non-empty value of a required request field.
pub(crate) fn require_field(value: Option<String>, name: &str) -> ApplicationResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApplicationError::validation(format!("missing {name}")))
}
