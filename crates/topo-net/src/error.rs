use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("persistence error: {0}")]
    Db(#[from] topo_db::DbError),
}
