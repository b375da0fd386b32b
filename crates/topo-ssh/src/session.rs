//! A common handle over both session modes, so the orchestrator can
//! run commands without caring how the session was established.

use crate::chained::ChainedSession;
use crate::direct::DirectSession;
use crate::error::SshError;

pub enum Session {
    Direct(DirectSession),
    Chained(ChainedSession),
}

impl Session {
    pub fn is_chained(&self) -> bool {
        matches!(self, Session::Chained(_))
    }

    /// Run `command` on the remote device, routing to the mode-correct
    /// transport.
    pub async fn exec(&mut self, command: &str) -> Result<String, SshError> {
        match self {
            Session::Direct(s) => s.exec(command).await,
            Session::Chained(s) => s.exec(command).await,
        }
    }

    pub async fn disconnect(self) -> Result<(), SshError> {
        match self {
            Session::Direct(s) => s.disconnect().await,
            Session::Chained(s) => s.disconnect().await,
        }
    }
}

impl From<DirectSession> for Session {
    fn from(s: DirectSession) -> Self {
        Session::Direct(s)
    }
}

impl From<ChainedSession> for Session {
    fn from(s: ChainedSession) -> Self {
        Session::Chained(s)
    }
}
