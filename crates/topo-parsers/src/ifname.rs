//! Interface-name normalization: long-form Cisco prefixes collapsed to
//! their short forms, suffix preserved verbatim.

const PREFIXES: &[(&str, &str)] = &[
    ("GigabitEthernet", "Gi"),
    ("TenGigabitEthernet", "Te"),
    ("FastEthernet", "Fa"),
    ("GigEthernet", "Gi"),
    ("TenGigE", "Te"),
    ("FastEth", "Fa"),
    ("Port-channel", "Po"),
    ("Port-Channel", "Po"),
    ("Loopback", "Lo"),
    ("GigEth", "Gi"),
    ("Ethernet", "Et"),
    ("Vlan", "Vl"),
    ("Eth", "Et"),
    ("Te", "Te"),
    ("Fa", "Fa"),
    ("Gi", "Gi"),
    ("Po", "Po"),
    ("Lo", "Lo"),
    ("Vl", "Vl"),
    ("Et", "Et"),
];

/// Collapse a long-form interface name to its short form. Only applies
/// when the recognized prefix is immediately followed by a digit; the
/// suffix (unit/module/port and any `.sub`) is passed through unchanged.
/// Non-matching names pass through unchanged. Idempotent.
pub fn normalize_if_name(name: &str) -> String {
    let mut best: Option<(&str, &str)> = None;
    for &(long, short) in PREFIXES {
        if name.len() <= long.len() {
            continue;
        }
        if !name[..long.len()].eq_ignore_ascii_case(long) {
            continue;
        }
        if !name.as_bytes()[long.len()].is_ascii_digit() {
            continue;
        }
        if best.map(|(l, _)| long.len() > l.len()).unwrap_or(true) {
            best = Some((long, short));
        }
    }
    match best {
        Some((long, short)) => format!("{short}{}", &name[long.len()..]),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_long_forms() {
        assert_eq!(normalize_if_name("GigabitEthernet0/1"), "Gi0/1");
        assert_eq!(normalize_if_name("TenGigabitEthernet1/0/1"), "Te1/0/1");
        assert_eq!(normalize_if_name("FastEthernet0/0"), "Fa0/0");
        assert_eq!(normalize_if_name("Port-channel12"), "Po12");
        assert_eq!(normalize_if_name("Loopback0"), "Lo0");
        assert_eq!(normalize_if_name("Vlan100"), "Vl100");
    }

    #[test]
    fn preserves_subinterface_suffix() {
        assert_eq!(normalize_if_name("GigabitEthernet0/1.100"), "Gi0/1.100");
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(normalize_if_name("gigabitethernet0/1"), "Gi0/1");
    }

    #[test]
    fn already_short_passes_through() {
        assert_eq!(normalize_if_name("Gi1/0/24"), "Gi1/0/24");
    }

    #[test]
    fn non_matching_passes_through() {
        assert_eq!(normalize_if_name("radio0"), "radio0");
        assert_eq!(normalize_if_name("Management0/0"), "Management0/0");
    }

    #[test]
    fn only_collapses_when_followed_by_digit() {
        assert_eq!(normalize_if_name("GigabitEthernetX"), "GigabitEthernetX");
    }

    #[test]
    fn idempotent() {
        for name in ["GigabitEthernet0/1", "Te1/0/1.50", "radio0", "Gi0/1"] {
            let once = normalize_if_name(name);
            let twice = normalize_if_name(&once);
            assert_eq!(once, twice);
        }
    }
}
