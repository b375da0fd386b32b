//! Environment-driven configuration. No config file, no CLI flags.

/// Connection settings for the document store, read once at process
/// startup. Defaults match the source deployment's docker-compose
/// service names.
#[derive(Debug, Clone)]
pub struct Config {
    pub mongo_uri: String,
    pub db_name: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_uri: std::env::var("MONGO_URI")
                .unwrap_or_else(|_| "mongodb://mongo:27017".to_string()),
            db_name: std::env::var("DB_NAME").unwrap_or_else(|_| "topologist".to_string()),
        }
    }
}
