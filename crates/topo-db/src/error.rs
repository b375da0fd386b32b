//! Error types for the topo-db crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("bson serialization error: {0}")]
    Serialization(#[from] mongodb::bson::ser::Error),

    #[error("bson deserialization error: {0}")]
    Deserialization(#[from] mongodb::bson::de::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid object id: {0}")]
    InvalidId(String),
}
