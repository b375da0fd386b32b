use serde::{Deserialize, Serialize};

/// A device's role as advertised in its CDP/LLDP capability string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Router,
    Switch,
    Layer3Switch,
    Ap,
    End,
}

/// One neighbor relationship extracted from `show cdp neighbors detail` or
/// `show lldp neighbors detail` output.
///
/// `device_type` is `None` both for genuinely unclassifiable capability
/// strings and, after the LLDP-fallback rule runs, for every LLDP-derived
/// link regardless of what the capability string said.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborLink {
    pub local_if: String,
    pub remote_sysname: String,
    pub remote_port: String,
    pub remote_mgmt_ip: Option<String>,
    pub device_type: Option<DeviceType>,
}

/// Which neighbor protocol produced a set of links, recorded for logging
/// and for the orchestrator's `protocol` field on the discovery job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborProtocol {
    Cdp,
    LldpFallback,
}
