//! Repository functions over the append-only `topology` collection.

use crate::error::DbError;
use crate::models::TopologySnapshotDoc;
use crate::store::Store;
use topo_graph::{SnapshotEdge, SnapshotNode};

pub async fn write_snapshot(
    store: &Store,
    seed_ip: &str,
    nodes: Vec<SnapshotNode>,
    links: Vec<SnapshotEdge>,
    interface_brief: String,
    created_at: f64,
) -> Result<(), DbError> {
    let doc = TopologySnapshotDoc {
        id: None,
        created_at,
        seed: seed_ip.to_string(),
        nodes,
        links,
        interface_brief,
    };
    store.topology().insert_one(&doc, None).await?;
    Ok(())
}
