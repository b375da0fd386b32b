//! Neighbor-output parsing and capability-based device classification.
//!
//! Every function in this crate is total: malformed or incomplete input
//! degrades to empty results or `None`, never an error or a panic.

pub mod cdp;
pub mod classify;
pub mod ifname;
pub mod lldp;
pub mod types;

pub use cdp::parse_cdp_neighbors;
pub use classify::{classify_capabilities, classify_lldp_capabilities};
pub use ifname::normalize_if_name;
pub use lldp::parse_lldp_neighbors;
pub use types::{DeviceType, NeighborLink, NeighborProtocol};

/// Erase the classifier's verdict on every link, per the LLDP-fallback
/// rule: CDP capability data is authoritative, LLDP's is not trusted
/// once the orchestrator has fallen back to it.
pub fn apply_lldp_fallback_rule(links: &mut [NeighborLink]) {
    for link in links {
        link.device_type = None;
    }
}

/// Run CDP first; fall back to LLDP (with the fallback rule applied) only
/// if CDP produced zero links. Returns the links plus which protocol was
/// used, matching the orchestrator's `protocol` bookkeeping.
pub fn parse_neighbors(cdp_output: &str, lldp_output: impl FnOnce() -> String) -> (Vec<NeighborLink>, NeighborProtocol) {
    let cdp_links = parse_cdp_neighbors(cdp_output);
    if !cdp_links.is_empty() {
        return (cdp_links, NeighborProtocol::Cdp);
    }
    let mut lldp_links = parse_lldp_neighbors(&lldp_output());
    apply_lldp_fallback_rule(&mut lldp_links);
    (lldp_links, NeighborProtocol::LldpFallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_rule_nulls_every_link() {
        let mut links = vec![NeighborLink {
            local_if: "Gi0/1".into(),
            remote_sysname: "x".into(),
            remote_port: "Gi0/2".into(),
            remote_mgmt_ip: None,
            device_type: Some(DeviceType::Router),
        }];
        apply_lldp_fallback_rule(&mut links);
        assert_eq!(links[0].device_type, None);
    }

    #[test]
    fn parse_neighbors_prefers_cdp() {
        let cdp = "Device ID: core-sw\nInterface: Gi0/1,  Port ID (outgoing port): Gi1/0/24\nCapabilities: Router\n";
        let (links, proto) = parse_neighbors(cdp, || "unused".to_string());
        assert_eq!(links.len(), 1);
        assert_eq!(proto, NeighborProtocol::Cdp);
        assert_eq!(links[0].device_type, Some(DeviceType::Router));
    }

    #[test]
    fn parse_neighbors_falls_back_to_lldp_and_nulls_type() {
        let lldp = "-----\nLocal Intf: Gi0/2\nSystem Name: ap-7\nPort Description: radio0\nSystem Capabilities: W\nEnabled Capabilities: W\n-----\n";
        let (links, proto) = parse_neighbors("", || lldp.to_string());
        assert_eq!(links.len(), 1);
        assert_eq!(proto, NeighborProtocol::LldpFallback);
        assert_eq!(links[0].device_type, None);
    }
}
