//! Capability-string tokenization and device-type classification.

use crate::types::DeviceType;
use regex::Regex;
use std::sync::OnceLock;

fn token_splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s,()/]+").unwrap())
}

#[derive(Default)]
struct Roles {
    router: bool,
    switch: bool,
    end: bool,
    ap: bool,
}

fn classify_token(token: &str, roles: &mut Roles) {
    if token.is_empty() {
        return;
    }
    if token.chars().count() == 1 {
        match token.chars().next().unwrap().to_ascii_uppercase() {
            'R' => roles.router = true,
            'B' => roles.switch = true,
            'S' => roles.switch = true,
            'H' => roles.end = true,
            'W' => roles.ap = true,
            'P' => {}
            _ => {}
        }
        return;
    }
    let lower = token.to_ascii_lowercase();
    if lower.starts_with("router") {
        roles.router = true;
    } else if lower.starts_with("switch") {
        roles.switch = true;
    } else if lower == "bridge" {
        roles.switch = true;
    } else if lower.starts_with("host") || lower.starts_with("station") {
        roles.end = true;
    } else if lower.starts_with("wlan") || lower.starts_with("wireless") {
        roles.ap = true;
    }
}

/// Classify a free-form CDP/LLDP capability string into a device type.
///
/// Total: never panics, and degrades to `None` (unknown) on any input
/// that yields no recognizable role, including the empty string.
pub fn classify_capabilities(text: &str) -> Option<DeviceType> {
    let mut roles = Roles::default();
    for token in token_splitter().split(text.trim()) {
        classify_token(token, &mut roles);
    }
    if roles.router && roles.switch {
        Some(DeviceType::Layer3Switch)
    } else if roles.router {
        Some(DeviceType::Router)
    } else if roles.switch {
        Some(DeviceType::Switch)
    } else if roles.ap {
        Some(DeviceType::Ap)
    } else if roles.end {
        Some(DeviceType::End)
    } else {
        None
    }
}

/// LLDP feeds the classifier with two distinct fields; concatenate them
/// the way the orchestrator's LLDP parser does before classifying.
pub fn classify_lldp_capabilities(system_caps: &str, enabled_caps: &str) -> Option<DeviceType> {
    let combined = format!("{system_caps} {enabled_caps}");
    classify_capabilities(&combined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_unknown() {
        assert_eq!(classify_capabilities(""), None);
        assert_eq!(classify_capabilities("   "), None);
    }

    #[test]
    fn router_switch_is_layer3_switch() {
        assert_eq!(
            classify_capabilities("Router Switch"),
            Some(DeviceType::Layer3Switch)
        );
    }

    #[test]
    fn letter_codes_combine() {
        assert_eq!(classify_capabilities("R,B"), Some(DeviceType::Layer3Switch));
    }

    #[test]
    fn source_route_bridge_does_not_classify_as_switch() {
        assert_eq!(classify_capabilities("source-route-bridge"), None);
    }

    #[test]
    fn router_source_route_bridge_is_layer3_switch() {
        assert_eq!(
            classify_capabilities("Router Source-Route-Bridge"),
            Some(DeviceType::Layer3Switch)
        );
    }

    #[test]
    fn switch_igmp_is_switch() {
        assert_eq!(
            classify_capabilities("Switch IGMP"),
            Some(DeviceType::Switch)
        );
    }

    #[test]
    fn wlan_is_ap() {
        assert_eq!(classify_capabilities("W"), Some(DeviceType::Ap));
        assert_eq!(classify_capabilities("Wireless AP"), Some(DeviceType::Ap));
    }

    #[test]
    fn host_is_end() {
        assert_eq!(classify_capabilities("Host"), Some(DeviceType::End));
        assert_eq!(classify_capabilities("Station"), Some(DeviceType::End));
    }

    #[test]
    fn case_and_whitespace_insensitive() {
        let a = classify_capabilities("Router Switch");
        let b = classify_capabilities("  switch,  ROUTER ");
        assert_eq!(a, b);
    }
}
