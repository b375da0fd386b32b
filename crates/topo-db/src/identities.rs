//! Repository functions over the `identities` collection.

use crate::error::DbError;
use crate::models::IdentityRecord;
use crate::store::Store;
use mongodb::bson::doc;

pub async fn find_default(store: &Store) -> Result<Option<IdentityRecord>, DbError> {
    Ok(store.identities().find_one(doc! { "is_default": true }, None).await?)
}
