//! Document-store persistence for devices, identities, the topology
//! graph, append-only snapshots, and the reachability cache.

pub mod config;
pub mod devices;
pub mod error;
pub mod graph;
pub mod identities;
pub mod models;
pub mod reachability;
pub mod store;
pub mod topology;

pub use config::Config;
pub use error::DbError;
pub use mongodb::bson::oid::ObjectId;
pub use store::{parse_device_id, Store};
