//! `show lldp neighbors detail` parsing.

use crate::classify::classify_lldp_capabilities;
use crate::ifname::normalize_if_name;
use crate::types::NeighborLink;
use regex::Regex;
use std::sync::OnceLock;

fn block_splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-{5,}").unwrap())
}

fn local_intf_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Local Intf:\s*(\S+)").unwrap())
}

fn system_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)System Name:\s*(.+)").unwrap())
}

fn port_description_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Port Description:\s*(.+)").unwrap())
}

fn system_capabilities_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)System Capabilities:\s*(.+)").unwrap())
}

fn enabled_capabilities_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Enabled Capabilities:\s*(.+)").unwrap())
}

const IPV4: &str = r"\d{1,3}(?:\.\d{1,3}){3}";
const IPV6: &str = r"(?:[0-9A-Fa-f]{1,4}:){2,7}[0-9A-Fa-f]{1,4}";

fn mgmt_ip_patterns() -> &'static Vec<Regex> {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        vec![
            Regex::new(&format!(
                r"(?im)Management Address(?:es)?:\s*(?:IP:\s*)?({IPV4})"
            ))
            .unwrap(),
            Regex::new(&format!(
                r"(?im)Management Addresses?:\s*\n+\s*IP:\s*({IPV4})"
            ))
            .unwrap(),
            Regex::new(&format!(
                r"(?im)Management Address(?:es)?:\s*(?:IPv6:\s*)?({IPV6})"
            ))
            .unwrap(),
            Regex::new(&format!(
                r"(?im)Management Addresses?:\s*\n+\s*IPv6:\s*({IPV6})"
            ))
            .unwrap(),
        ]
    })
}

fn find_management_address(block: &str) -> Option<String> {
    for re in mgmt_ip_patterns() {
        if let Some(caps) = re.captures(block) {
            return Some(caps[1].to_string());
        }
    }
    None
}

/// Parse `show lldp neighbors detail` output into normalized neighbor
/// links. Total: malformed or empty input yields an empty vector.
pub fn parse_lldp_neighbors(text: &str) -> Vec<NeighborLink> {
    let mut links = Vec::new();

    for block in block_splitter().split(text) {
        let local_if = match local_intf_re().captures(block) {
            Some(c) => normalize_if_name(&c[1]),
            None => continue,
        };
        let remote_sysname = match system_name_re().captures(block) {
            Some(c) => c[1].trim().to_string(),
            None => continue,
        };
        if remote_sysname.is_empty() {
            continue;
        }

        let remote_port = port_description_re()
            .captures(block)
            .map(|c| normalize_if_name(c[1].trim()))
            .unwrap_or_default();

        let remote_mgmt_ip = find_management_address(block);

        let system_caps = system_capabilities_re()
            .captures(block)
            .map(|c| c[1].to_string())
            .unwrap_or_default();
        let enabled_caps = enabled_capabilities_re()
            .captures(block)
            .map(|c| c[1].to_string())
            .unwrap_or_default();
        let device_type = classify_lldp_capabilities(&system_caps, &enabled_caps);
        if device_type.is_none() {
            log::debug!("lldp neighbor {remote_sysname}: unclassified capabilities");
        }

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
------------------------------------------------
Local Intf: Gi0/2
Chassis id: aabb.ccdd.eeff
Port id: radio0
Port Description: radio0
System Name: ap-7
Management Address:
    IP: 10.0.0.3
System Capabilities: W
Enabled Capabilities: W
------------------------------------------------
"#;

    #[test]
    fn parses_one_neighbor_with_multiline_mgmt_address() {
        let links = parse_lldp_neighbors(SAMPLE);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].remote_sysname, "ap-7");
        assert_eq!(links[0].local_if, "Gi0/2");
        assert_eq!(links[0].remote_port, "radio0");
        assert_eq!(links[0].remote_mgmt_ip.as_deref(), Some("10.0.0.3"));
        assert_eq!(links[0].device_type, Some(DeviceType::Ap));
    }

    #[test]
    fn inline_management_address_form() {
        let text = "-----\nLocal Intf: Gi0/1\nSystem Name: core-sw\nPort Description: Gi1/0/24\nManagement Address: IP: 10.0.0.2\nSystem Capabilities: R B\nEnabled Capabilities: R B\n-----\n";
        let links = parse_lldp_neighbors(text);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].remote_mgmt_ip.as_deref(), Some("10.0.0.2"));
        assert_eq!(links[0].device_type, Some(DeviceType::Layer3Switch));
    }

    #[test]
    fn missing_system_name_produces_no_link() {
        let text = "-----\nLocal Intf: Gi0/1\nPort Description: Gi1/0/24\n-----\n";
        assert!(parse_lldp_neighbors(text).is_empty());
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(parse_lldp_neighbors("").is_empty());
    }
}
