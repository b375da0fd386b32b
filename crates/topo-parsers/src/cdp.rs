//! `show cdp neighbors detail` parsing.

use crate::classify::classify_capabilities;
use crate::ifname::normalize_if_name;
use crate::types::NeighborLink;
use regex::Regex;
use std::sync::OnceLock;

fn interface_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Interface:\s*(\S+),").unwrap())
}

fn port_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Port ID \(outgoing port\):\s*(\S+)").unwrap())
}

fn ip_address_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"IP address:\s*(\d{1,3}(?:\.\d{1,3}){3})").unwrap())
}

fn capabilities_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Capabilities:\s*(.+)").unwrap())
}

/// Parse `show cdp neighbors detail` output into normalized neighbor
/// links. Total: malformed or empty input yields an empty vector, never
/// an error.
pub fn parse_cdp_neighbors(text: &str) -> Vec<NeighborLink> {
    let mut links = Vec::new();
    let mut blocks = text.split("Device ID:");
    // Text before the first "Device ID:" anchor is preamble, not a block.
    blocks.next();

    for block in blocks {
        let remote_sysname = match block.lines().find(|l| !l.trim().is_empty()) {
            Some(line) => line.trim().to_string(),
            None => continue,
        };

        let local_if = match interface_re().captures(block) {
            Some(caps) => normalize_if_name(&caps[1]),
            None => continue,
        };
        if remote_sysname.is_empty() {
            continue;
        }

        let remote_port = port_id_re()
            .captures(block)
            .map(|c| normalize_if_name(&c[1]))
            .unwrap_or_default();

        let remote_mgmt_ip = ip_address_re().captures(block).map(|c| c[1].to_string());

        let device_type = capabilities_re()
            .captures(block)
            .and_then(|c| classify_capabilities(&c[1]));

        log::debug!(
            "cdp neighbor: sysname={remote_sysname} local_if={local_if} remote_port={remote_port} ip={remote_mgmt_ip:?} type={device_type:?}"
        );

        links.push(NeighborLink {
            local_if,
            remote_sysname,
            remote_port,
            remote_mgmt_ip,
            device_type,
        });
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeviceType;

    const SAMPLE: &str = r#"
-------------------------
Device ID: core-sw
Entry address(es):
  IP address: 10.0.0.2
Platform: cisco WS-C3750,  Capabilities: Router Switch
Interface: GigabitEthernet0/1,  Port ID (outgoing port): GigabitEthernet1/0/24
Holdtime : 156 sec

-------------------------
Device ID: ap-7
Platform: cisco AIR-AP,  Capabilities: W
Interface: GigabitEthernet0/2,  Port ID (outgoing port): radio0
Holdtime : 120 sec
"#;

    #[test]
    fn parses_two_neighbors() {
        let links = parse_cdp_neighbors(SAMPLE);
        assert_eq!(links.len(), 2);

        assert_eq!(links[0].remote_sysname, "core-sw");
        assert_eq!(links[0].local_if, "Gi0/1");
        assert_eq!(links[0].remote_port, "Gi1/0/24");
        assert_eq!(links[0].remote_mgmt_ip.as_deref(), Some("10.0.0.2"));
        assert_eq!(links[0].device_type, Some(DeviceType::Layer3Switch));

        assert_eq!(links[1].remote_sysname, "ap-7");
        assert_eq!(links[1].remote_port, "radio0");
        assert_eq!(links[1].remote_mgmt_ip, None);
        assert_eq!(links[1].device_type, Some(DeviceType::Ap));
    }

    #[test]
    fn block_without_interface_line_produces_no_link() {
        let text = "-------------------------\nDevice ID: no-if\nPlatform: cisco,  Capabilities: Router\n";
        assert!(parse_cdp_neighbors(text).is_empty());
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(parse_cdp_neighbors("").is_empty());
    }
}
