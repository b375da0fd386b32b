use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("amqp transport error: {0}")]
    Amqp(#[from] lapin::Error),
    #[error("malformed job payload: {0}")]
    MalformedJob(#[from] serde_json::Error),
    #[error("publish failed after {0} attempts: {1}")]
    PublishExhausted(u32, lapin::Error),
}
