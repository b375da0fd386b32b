//! Document shapes for every collection in §3/§6 of the design.
//!
//! Timestamps are stored as Unix epoch seconds (`f64`), matching the
//! source's `time.time()` rather than a BSON date type, since nothing
//! here needs timezone-aware display — only monotonic comparison against
//! a TTL.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Unknown,
    Ready,
    NeedsCreds,
    NeedsIp,
    Scanning,
    Error,
}

impl Default for DeviceStatus {
    fn default() -> Self {
        DeviceStatus::Unknown
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub host: String,
    pub display_name: String,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default)]
    pub identity_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(default)]
    pub depth: i64,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub alternate_ips: Vec<String>,
    #[serde(default)]
    pub interface_map: HashMap<String, String>,
    pub created_at: f64,
    #[serde(default)]
    pub last_seen: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_platform() -> String {
    "cisco_ios".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNodeDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_seen: f64,
    pub last_seen: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdgeDoc {
    #[serde(rename = "_id")]
    pub edge_key: String,
    pub a: String,
    pub b: String,
    #[serde(rename = "ifA")]
    pub if_a: String,
    #[serde(rename = "ifB")]
    pub if_b: String,
    pub first_seen: f64,
    pub last_seen: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologySnapshotDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub created_at: f64,
    pub seed: String,
    pub nodes: Vec<topo_graph::SnapshotNode>,
    pub links: Vec<topo_graph::SnapshotEdge>,
    pub interface_brief: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReachabilityCacheDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub reachable_ips: Vec<String>,
    pub updated_at: f64,
}

pub const REACHABILITY_CACHE_ID: &str = "direct_reachable";
