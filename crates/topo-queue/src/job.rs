use serde::{Deserialize, Serialize};

/// A discovery job as it travels through the `discovery` queue.
///
/// Missing fields default the way the source's `dict.get` calls did:
/// `depth` to 0, `auto_recursive` to false, `max_depth` to 2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryJob {
    #[serde(rename = "type")]
    pub job_type: String,
    pub device_id: String,
    #[serde(default)]
    pub depth: i64,
    #[serde(default)]
    pub auto_recursive: bool,
    #[serde(default = "default_max_depth")]
    pub max_depth: i64,
}

fn default_max_depth() -> i64 {
    2
}

impl DiscoveryJob {
    pub fn new(device_id: impl Into<String>, depth: i64, auto_recursive: bool, max_depth: i64) -> Self {
        Self {
            job_type: "discovery".to_string(),
            device_id: device_id.into(),
            depth,
            auto_recursive,
            max_depth,
        }
    }

    pub fn is_discovery(&self) -> bool {
        self.job_type == "discovery"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_source_parity_defaults() {
        let job: DiscoveryJob = serde_json::from_str(r#"{"type":"discovery","device_id":"abc"}"#).unwrap();
        assert_eq!(job.depth, 0);
        assert!(!job.auto_recursive);
        assert_eq!(job.max_depth, 2);
    }

    #[test]
    fn non_discovery_type_is_flagged() {
        let job = DiscoveryJob {
            job_type: "rescan".to_string(),
            device_id: "abc".to_string(),
            depth: 0,
            auto_recursive: false,
            max_depth: 2,
        };
        assert!(!job.is_discovery());
    }

    #[test]
    fn round_trips_through_json() {
        let job = DiscoveryJob::new("507f1f77bcf86cd799439011", 1, true, 3);
        let raw = serde_json::to_string(&job).unwrap();
        let back: DiscoveryJob = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.device_id, job.device_id);
        assert_eq!(back.max_depth, 3);
    }
}
