use crate::config::Config;
use crate::error::QueueError;
use lapin::{Connection, ConnectionProperties};
use std::time::Duration;

pub const DISCOVERY_QUEUE: &str = "discovery";

/// Connect to the broker with exponential backoff, doubling from
/// `initial_delay` and capped at 30 seconds. `max_retries == 0` means
/// retry forever.
pub async fn connect_with_retry(
    config: &Config,
    max_retries: u32,
    initial_delay: Duration,
) -> Result<Connection, QueueError> {
    let mut delay = initial_delay;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        log::info!("[rabbitmq] connection attempt {attempt}...");
        match Connection::connect(&config.amqp_uri, ConnectionProperties::default()).await {
            Ok(conn) => {
                log::info!("[rabbitmq] connected successfully");
                return Ok(conn);
            }
            Err(e) => {
                if max_retries > 0 && attempt >= max_retries {
                    log::error!("[rabbitmq] failed after {max_retries} attempts");
                    return Err(QueueError::PublishExhausted(max_retries, e));
                }
                log::warn!("[rabbitmq] connection failed: {e}");
                log::info!("[rabbitmq] retrying in {}s...", delay.as_secs());
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, Duration::from_secs(30));
            }
        }
    }
}
