//! Durable AMQP job queue: the `discovery` consumer loop and the job
//! publisher paths used both for enqueuing children and for the
//! fleet-wide cascade re-scan.

pub mod config;
pub mod connect;
pub mod consumer;
pub mod error;
pub mod job;
pub mod publisher;

pub use config::Config;
pub use connect::DISCOVERY_QUEUE;
pub use error::QueueError;
pub use job::DiscoveryJob;
pub use publisher::{enqueue_discovery, trigger_cascade};
