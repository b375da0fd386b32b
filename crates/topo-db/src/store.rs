//! Connection handle and collection accessors.

use crate::config::Config;
use crate::error::DbError;
use crate::models::{DeviceRecord, GraphEdgeDoc, GraphNodeDoc, IdentityRecord, ReachabilityCacheDoc, TopologySnapshotDoc};
use mongodb::bson::oid::ObjectId;
use mongodb::{Client, Collection, Database};

#[derive(Clone)]
pub struct Store {
    db: Database,
}

impl Store {
    pub async fn connect(cfg: &Config) -> Result<Self, DbError> {
        let client = Client::with_uri_str(&cfg.mongo_uri).await?;
        let db = client.database(&cfg.db_name);
        log::info!("connected to mongodb database {}", cfg.db_name);
        Ok(Self { db })
    }

    pub fn devices(&self) -> Collection<DeviceRecord> {
        self.db.collection("devices")
    }

    pub fn identities(&self) -> Collection<IdentityRecord> {
        self.db.collection("identities")
    }

    pub fn graph_nodes(&self) -> Collection<GraphNodeDoc> {
        self.db.collection("graph_nodes")
    }

    pub fn graph_links(&self) -> Collection<GraphEdgeDoc> {
        self.db.collection("graph_links")
    }

    pub fn topology(&self) -> Collection<TopologySnapshotDoc> {
        self.db.collection("topology")
    }

    pub fn reachability_cache(&self) -> Collection<ReachabilityCacheDoc> {
        self.db.collection("reachability_cache")
    }
}

/// Decode a job's `device_id` string field into an `ObjectId`. The
/// source swallows this failure with a bare catch; here it surfaces as
/// a distinct, loggable error instead (§9 resolved open question).
pub fn parse_device_id(raw: &str) -> Result<ObjectId, DbError> {
    ObjectId::parse_str(raw).map_err(|_| DbError::InvalidId(raw.to_string()))
}
