use crate::config::Config;
use crate::connect::{connect_with_retry, DISCOVERY_QUEUE};
use crate::error::QueueError;
use crate::job::DiscoveryJob;
use lapin::options::{BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::BasicProperties;
use std::time::Duration;

const PUBLISH_RETRIES: u32 = 3;
const PUBLISH_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Enqueue a single discovery job, opening and closing a short-lived
/// connection (publisher paths get 3 retries, not infinite).
pub async fn enqueue_discovery(config: &Config, job: &DiscoveryJob) -> Result<(), QueueError> {
    let conn = connect_with_retry(config, PUBLISH_RETRIES, PUBLISH_INITIAL_DELAY).await?;
    let channel = conn.create_channel().await?;
    channel
        .queue_declare(
            DISCOVERY_QUEUE,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;

    let body = serde_json::to_vec(job)?;
    channel
        .basic_publish(
            "",
            DISCOVERY_QUEUE,
            BasicPublishOptions::default(),
            &body,
            BasicProperties::default(),
        )
        .await?
        .await?;

    conn.close(200, "done").await?;
    Ok(())
}

/// §4.7 cascade rule: enqueue one job per already-known device so that
/// `error` devices retry automatically as the graph grows.
pub async fn trigger_cascade(config: &Config, devices: &[(String, i64)]) -> Result<(), QueueError> {
    if devices.is_empty() {
        log::info!("[cascade] no devices to re-scan");
        return Ok(());
    }

    let conn = connect_with_retry(config, PUBLISH_RETRIES, PUBLISH_INITIAL_DELAY).await?;
    let channel = conn.create_channel().await?;
    channel
        .queue_declare(
            DISCOVERY_QUEUE,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;

    let mut count = 0;
    for (device_id, depth) in devices {
        let job = DiscoveryJob::new(device_id.clone(), *depth, false, 3);
        let body = serde_json::to_vec(&job)?;
        channel
            .basic_publish(
                "",
                DISCOVERY_QUEUE,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default(),
            )
            .await?
            .await?;
        count += 1;
    }

    conn.close(200, "done").await?;
    log::info!("[cascade] queued {count} devices for discovery");
    Ok(())
}
