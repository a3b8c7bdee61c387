pub mod admin;
pub mod applications;
pub mod auth;
pub mod dashboard;
pub mod jobs;
pub mod notifications;
pub mod probes;
pub mod profiles;

use crate::errors::Error;
use crate::pkg::internal::auth::{Role, User};
use crate::prelude::Result;

/// Role gate shared by the role-scoped handlers. Mismatches surface as a
/// flash-carrying redirect to the dashboard, not an HTTP error.
pub fn require_role(user: &User, role: Role) -> Result<()> {
    if user.role != role {
        let page = match role {
            Role::Applicant => "only applicant accounts can access this page",
            Role::Company => "only company accounts can access this page",
            Role::Admin => "you are not authorized to access this page",
        };
        return Err(Error::Forbidden(page.into()));
    }
    Ok(())
}
