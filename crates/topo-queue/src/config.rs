/// Broker connection settings, all overridable via environment variable.
#[derive(Debug, Clone)]
pub struct Config {
    pub amqp_uri: String,
}

impl Config {
    pub fn from_env() -> Self {
        let host = std::env::var("RABBIT_HOST").unwrap_or_else(|_| "rabbitmq".to_string());
        let amqp_uri = std::env::var("RABBIT_URI")
            .unwrap_or_else(|_| format!("amqp://{host}:5672/%2f?heartbeat=600"));
        Self { amqp_uri }
    }
}
