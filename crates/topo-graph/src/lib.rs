//! Topology graph data model.
//!
//! Two distinct projections of the same discovered links exist side by
//! side: the append-only snapshot (naive, IP-or-name node ids, `source`/
//! `target`/`ifSrc`/`ifDst` field shape) and the canonical graph upsert
//! plan (`graph_nodes`/`graph_links`, `a`/`b`/`ifA`/`ifB` field shape,
//! deduplicated by a device's primary management IP). Keeping them as
//! separate types mirrors how they are stored: the snapshot is never
//! mutated after insertion, the canonical graph is upserted in place.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use topo_parsers::NeighborLink;

/// One node in an append-only topology snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: String,
}

/// One edge in an append-only topology snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "ifSrc")]
    pub if_src: String,
    #[serde(rename = "ifDst")]
    pub if_dst: String,
}

/// Derive the node id a link's remote endpoint would get if it had no
/// corresponding device record yet: its management IP, or else
/// `name:<sysname>`.
fn naive_remote_id(link: &NeighborLink) -> Option<String> {
    if let Some(ip) = &link.remote_mgmt_ip {
        return Some(ip.clone());
    }
    if !link.remote_sysname.is_empty() {
        return Some(format!("name:{}", link.remote_sysname));
    }
    None
}

/// Build the pre-canonicalization snapshot projection for a completed
/// discovery: the seed plus every link's naive remote id, and the
/// sorted-pair edges between them. This is what gets written verbatim
/// into a `topology` document; it does not consult the device inventory.
pub fn build_snapshot(seed_ip: &str, links: &[NeighborLink]) -> (Vec<SnapshotNode>, Vec<SnapshotEdge>) {
    let mut node_ids: BTreeSet<String> = BTreeSet::new();
    node_ids.insert(seed_ip.to_string());

    let mut edges: BTreeSet<(String, String, String, String)> = BTreeSet::new();

    for link in links {
        let Some(remote_id) = naive_remote_id(link) else {
            continue;
        };
        node_ids.insert(remote_id.clone());

        let (a, b) = sorted_pair(seed_ip, &remote_id);
        if a == seed_ip {
            edges.insert((a, b, link.local_if.clone(), link.remote_port.clone()));
        } else {
            edges.insert((a, b, link.remote_port.clone(), link.local_if.clone()));
        }
    }

    let nodes = node_ids.into_iter().map(|id| SnapshotNode { id }).collect();
    let edges = edges
        .into_iter()
        .map(|(source, target, if_src, if_dst)| SnapshotEdge {
            source,
            target,
            if_src,
            if_dst,
        })
        .collect();
    (nodes, edges)
}

fn sorted_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// A link whose remote endpoint has already been resolved to its
/// canonical graph-node id (§4.6 of the design: alternate-IP, host, or
/// display-name lookup against the device inventory, falling back to
/// the raw management IP or a name-only id). Resolution itself requires
/// a device-store lookup and lives outside this crate; this type is the
/// boundary between that lookup and the pure upsert planning below.
#[derive(Debug, Clone)]
pub struct CanonicalLink {
    pub local_if: String,
    pub remote_port: String,
    pub canonical_remote_id: String,
}

/// One canonical graph edge ready to be upserted into `graph_links`
/// (with `graph_nodes` entries for both endpoints).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeUpsert {
    pub edge_key: String,
    pub a: String,
    pub b: String,
    #[serde(rename = "ifA")]
    pub if_a: String,
    #[serde(rename = "ifB")]
    pub if_b: String,
}

/// Plan the node/edge upserts for a completed discovery, given links
/// whose remote ids have already been canonicalized. At most one edge
/// is planned per distinct `(a,b)` pair; the orchestrator still performs
/// an idempotent upsert per edge (`$set` last_seen, `$setOnInsert`
/// first_seen) rather than relying on in-memory dedup for storage
/// correctness, but dedup here keeps a single job from issuing redundant
/// writes for a device with a link reported more than once.
pub fn plan_graph_upserts(seed_ip: &str, links: &[CanonicalLink]) -> Vec<EdgeUpsert> {
    let mut seen = std::collections::BTreeMap::new();

    for link in links {
        let (a, b) = sorted_pair(seed_ip, &link.canonical_remote_id);
        let (if_a, if_b) = if a == seed_ip {
            (link.local_if.clone(), link.remote_port.clone())
        } else {
            (link.remote_port.clone(), link.local_if.clone())
        };
        let edge_key = format!("{a}|{b}");
        seen.insert(edge_key.clone(), EdgeUpsert { edge_key, a, b, if_a, if_b });
    }

    seen.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use topo_parsers::DeviceType;

    fn link(remote_sysname: &str, ip: Option<&str>, local_if: &str, remote_port: &str) -> NeighborLink {
        NeighborLink {
            local_if: local_if.to_string(),
            remote_sysname: remote_sysname.to_string(),
            remote_port: remote_port.to_string(),
            remote_mgmt_ip: ip.map(|s| s.to_string()),
            device_type: Some(DeviceType::Router),
        }
    }

    #[test]
    fn snapshot_scenario_a() {
        let links = vec![link("core-sw", Some("10.0.0.2"), "Gi0/1", "Gi1/0/24")];
        let (nodes, edges) = build_snapshot("10.0.0.1", &links);
        assert_eq!(nodes.len(), 2);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, "10.0.0.1");
        assert_eq!(edges[0].target, "10.0.0.2");
        assert_eq!(edges[0].if_src, "Gi0/1");
        assert_eq!(edges[0].if_dst, "Gi1/0/24");
    }

    #[test]
    fn snapshot_name_only_neighbor() {
        let links = vec![link("no-ip-device", None, "Gi0/3", "Gi0/1")];
        let (nodes, _edges) = build_snapshot("10.0.0.1", &links);
        assert!(nodes.iter().any(|n| n.id == "name:no-ip-device"));
    }

    #[test]
    fn edge_key_is_sorted_pair() {
        let links = vec![CanonicalLink {
            local_if: "Gi1/0/24".into(),
            remote_port: "Gi0/1".into(),
            canonical_remote_id: "10.0.0.1".into(),
        }];
        let edges = plan_graph_upserts("10.0.0.2", &links);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].a, "10.0.0.1");
        assert_eq!(edges[0].b, "10.0.0.2");
        assert_eq!(edges[0].if_a, "Gi0/1");
        assert_eq!(edges[0].if_b, "Gi1/0/24");
        assert_eq!(edges[0].edge_key, "10.0.0.1|10.0.0.2");
    }

    #[test]
    fn duplicate_links_to_same_neighbor_collapse_to_one_edge() {
        let links = vec![
            CanonicalLink { local_if: "Gi0/1".into(), remote_port: "Gi1/0/24".into(), canonical_remote_id: "10.0.0.2".into() },
            CanonicalLink { local_if: "Gi0/1".into(), remote_port: "Gi1/0/24".into(), canonical_remote_id: "10.0.0.2".into() },
        ];
        assert_eq!(plan_graph_upserts("10.0.0.1", &links).len(), 1);
    }
}
