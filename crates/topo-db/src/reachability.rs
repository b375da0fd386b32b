//! Repository functions over the singleton `reachability_cache` document.
//!
//! The cache is process-wide shared state living in the store, not an
//! in-memory singleton — concurrent writers race and the last writer
//! wins, which is acceptable because the contents are advisory.

use crate::error::DbError;
use crate::models::{ReachabilityCacheDoc, REACHABILITY_CACHE_ID};
use crate::store::Store;
use mongodb::bson::doc;
use mongodb::options::UpdateOptions;

pub async fn read(store: &Store) -> Result<Option<ReachabilityCacheDoc>, DbError> {
    Ok(store
        .reachability_cache()
        .find_one(doc! { "_id": REACHABILITY_CACHE_ID }, None)
        .await?)
}

pub async fn write(store: &Store, reachable_ips: &[String], updated_at: f64) -> Result<(), DbError> {
    store
        .reachability_cache()
        .update_one(
            doc! { "_id": REACHABILITY_CACHE_ID },
            doc! { "$set": { "reachable_ips": reachable_ips, "updated_at": updated_at } },
            UpdateOptions::builder().upsert(true).build(),
        )
        .await?;
    Ok(())
}
