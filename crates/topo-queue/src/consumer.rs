use crate::config::Config;
use crate::connect::{connect_with_retry, DISCOVERY_QUEUE};
use crate::error::QueueError;
use crate::job::DiscoveryJob;
use futures_util::StreamExt;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicQosOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use std::future::Future;
use std::time::Duration;

const CONSUMER_TAG: &str = "topologist-worker";

/// Run the consumer loop forever, invoking `handler` for every job
/// decoded off the `discovery` queue. Reconnects automatically on
/// transport failure; returns only on Ctrl-C.
pub async fn run<F, Fut>(config: &Config, mut handler: F)
where
    F: FnMut(DiscoveryJob) -> Fut,
    Fut: Future<Output = ()>,
{
    loop {
        let outcome = tokio::select! {
            r = run_once(config, &mut handler) => r,
            _ = tokio::signal::ctrl_c() => {
                log::info!("[worker] shutting down gracefully...");
                return;
            }
        };

        match outcome {
            Ok(()) => unreachable!("consumer stream ended without an error"),
            Err(QueueError::Amqp(e)) => {
                log::warn!("[rabbitmq] connection lost: {e}");
                log::info!("[rabbitmq] reconnecting in 5 seconds...");
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            Err(e) => {
                log::warn!("[worker] unexpected error: {e}");
                log::info!("[worker] restarting in 10 seconds...");
                tokio::time::sleep(Duration::from_secs(10)).await;
            }
        }
    }
}

async fn run_once<F, Fut>(config: &Config, handler: &mut F) -> Result<(), QueueError>
where
    F: FnMut(DiscoveryJob) -> Fut,
    Fut: Future<Output = ()>,
{
    let conn = connect_with_retry(config, 0, Duration::from_secs(2)).await?;
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

    // One in-flight message at a time: the orchestrator runs inline
    // under this callback, so prefetch must match that concurrency.
    channel.basic_qos(1, BasicQosOptions::default()).await?;

    let mut consumer = channel
        .basic_consume(
            DISCOVERY_QUEUE,
            CONSUMER_TAG,
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await?;

    log::info!("[*] worker waiting...");

    while let Some(delivery) = consumer.next().await {
        let delivery = delivery?;
        match serde_json::from_slice::<DiscoveryJob>(&delivery.data) {
            Ok(job) if job.is_discovery() => {
                handler(job).await;
            }
            Ok(_) => {
                log::debug!("[worker] ignoring non-discovery message");
            }
            Err(e) => {
                log::warn!("[worker] malformed job payload, acking to avoid a wedged queue: {e}");
            }
        }
        delivery.ack(BasicAckOptions::default()).await?;
    }

    Ok(())
}
