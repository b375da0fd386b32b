//! SSH session layer: a structured direct session for the common case,
//! and a chained interactive-PTY session for devices reachable only
//! through one or more jump hosts.

pub mod chained;
pub mod direct;
pub mod error;
pub mod handler;
pub mod session;
pub mod types;

pub use chained::ChainedSession;
pub use direct::DirectSession;
pub use error::SshError;
pub use session::Session;
pub use types::Credentials;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_builder_stores_values() {
        let c = Credentials::new("admin", "hunter2");
        assert_eq!(c.username, "admin");
        assert_eq!(c.password, "hunter2");
    }
}
