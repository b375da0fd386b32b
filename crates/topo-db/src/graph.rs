//! Repository functions over `graph_nodes` and `graph_links`.
//!
//! Both collections are upserted with `$set` for `last_seen` and
//! `$setOnInsert` for `first_seen`, so repeated observation of the same
//! node/edge changes only `last_seen` — the idempotency property in §8.

use crate::error::DbError;
use crate::store::Store;
use mongodb::bson::doc;
use mongodb::options::UpdateOptions;
use topo_graph::EdgeUpsert;

pub async fn upsert_node(store: &Store, id: &str, now: f64) -> Result<(), DbError> {
    store
        .graph_nodes()
        .update_one(
            doc! { "_id": id },
            doc! {
                "$set": { "last_seen": now },
                "$setOnInsert": { "first_seen": now },
            },
            UpdateOptions::builder().upsert(true).build(),
        )
        .await?;
    Ok(())
}

pub async fn upsert_edge(store: &Store, edge: &EdgeUpsert, now: f64) -> Result<(), DbError> {
    store
        .graph_links()
        .update_one(
            doc! { "_id": &edge.edge_key },
            doc! {
                "$set": { "a": &edge.a, "b": &edge.b, "ifA": &edge.if_a, "ifB": &edge.if_b, "last_seen": now },
                "$setOnInsert": { "first_seen": now },
            },
            UpdateOptions::builder().upsert(true).build(),
        )
        .await?;
    Ok(())
}

/// Upsert every node referenced by `edges`, then every edge itself.
pub async fn upsert_graph(store: &Store, seed_ip: &str, edges: &[EdgeUpsert], now: f64) -> Result<(), DbError> {
    upsert_node(store, seed_ip, now).await?;
    for edge in edges {
        let remote = if edge.a == seed_ip { &edge.b } else { &edge.a };
        upsert_node(store, remote, now).await?;
        upsert_edge(store, edge, now).await?;
    }
    Ok(())
}

/// All `(a, b)` pairs currently in the graph, for the path planner's
/// adjacency construction.
pub async fn all_edge_pairs(store: &Store) -> Result<Vec<(String, String)>, DbError> {
    use futures_util::TryStreamExt;
    let mut cursor = store.graph_links().find(doc! {}, None).await?;
    let mut out = Vec::new();
    while let Some(edge) = cursor.try_next().await? {
        out.push((edge.a, edge.b));
    }
    Ok(out)
}
