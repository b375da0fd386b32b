use thiserror::Error;

/// Per-device failure causes for a single discovery attempt. Every
/// variant here is caught by the job runner, recorded on the device
/// record, and swallowed — the consumer acks regardless (§7).
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("persistence error: {0}")]
    Db(#[from] topo_db::DbError),
    #[error("ssh error: {0}")]
    Ssh(#[from] topo_ssh::SshError),
    #[error("path planning error: {0}")]
    Net(#[from] topo_net::NetError),
    #[error("queue error: {0}")]
    Queue(#[from] topo_queue::QueueError),
    #[error("{0} is unreachable: direct connection failed and no jump-host path exists")]
    Unreachable(String),
    #[error("missing credentials for jump host {0}")]
    ChainFailure(String),
}
