pub mod adaptors;
pub mod auth;
#[cfg(test)]
pub mod fixtures;
pub mod notify;
pub mod profiles;
pub mod reports;
pub mod uploads;
