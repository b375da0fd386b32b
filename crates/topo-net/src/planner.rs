//! Path Planner: BFS over the current topology graph from any directly
//! reachable device to a target.

use crate::error::NetError;
use crate::probe;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use topo_db::{graph, Store};

/// Pure BFS planner: given the graph's edges and the set of directly
/// reachable starting points, find the globally shortest path to
/// `target`, trying starting points in sorted order (`reachable` is a
/// `BTreeSet`) so equal-length paths tie-break on the first one.
pub fn plan_path(edges: &[(String, String)], reachable: &BTreeSet<String>, target: &str) -> Option<Vec<String>> {
    if reachable.is_empty() {
        return None;
    }

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for (a, b) in edges {
        adjacency.entry(a.as_str()).or_default().push(b.as_str());
        adjacency.entry(b.as_str()).or_default().push(a.as_str());
    }

    let mut best: Option<Vec<String>> = None;

    for start in reachable {
        if start == target {
            return Some(vec![target.to_string()]);
        }

        let mut queue: VecDeque<(&str, Vec<&str>)> = VecDeque::new();
        let mut visited: HashSet<&str> = HashSet::new();
        queue.push_back((start.as_str(), vec![start.as_str()]));
        visited.insert(start.as_str());

        while let Some((current, path)) = queue.pop_front() {
            let Some(neighbors) = adjacency.get(current) else {
                continue;
            };
            for &neighbor in neighbors {
                if visited.contains(neighbor) {
                    continue;
                }
                visited.insert(neighbor);
                let mut new_path = path.clone();
                new_path.push(neighbor);

                if neighbor == target {
                    let better = best.as_ref().map(|b| new_path.len() < b.len()).unwrap_or(true);
                    if better {
                        best = Some(new_path.iter().map(|s| s.to_string()).collect());
                    }
                    break;
                }
                queue.push_back((neighbor, new_path));
            }
        }
    }

    best
}

/// Find a path to `target_ip` through intermediate jump hosts, probing
/// reachability and reading the live graph from the store.
pub async fn find_path_to_device(store: &Store, target_ip: &str) -> Result<Option<Vec<String>>, NetError> {
    let reachable = probe::probe(store).await?;
    if reachable.is_empty() {
        log::info!("path planner: no directly reachable devices via connectivity test");
        return Ok(None);
    }
    let edges = graph::all_edge_pairs(store).await?;
    Ok(plan_path(&edges, &reachable, target_ip))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ips: &[&str]) -> BTreeSet<String> {
        ips.iter().map(|s| s.to_string()).collect()
    }

    fn pair(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn directly_reachable_target_is_single_element_path() {
        let edges = vec![];
        let reachable = set(&["10.0.0.1"]);
        assert_eq!(
            plan_path(&edges, &reachable, "10.0.0.1"),
            Some(vec!["10.0.0.1".to_string()])
        );
    }

    #[test]
    fn scenario_d_chained_reach() {
        let edges = vec![
            pair("10.0.0.1", "10.1.0.5"),
            pair("10.1.0.5", "10.2.0.9"),
        ];
        let reachable = set(&["10.0.0.1"]);
        let path = plan_path(&edges, &reachable, "10.2.0.9").unwrap();
        assert_eq!(path, vec!["10.0.0.1", "10.1.0.5", "10.2.0.9"]);
    }

    #[test]
    fn no_path_when_unreachable() {
        let edges = vec![pair("10.0.0.5", "10.0.0.6")];
        let reachable = set(&["10.0.0.1"]);
        assert_eq!(plan_path(&edges, &reachable, "10.9.9.9"), None);
    }

    #[test]
    fn empty_reachable_set_returns_none() {
        let edges = vec![pair("10.0.0.1", "10.0.0.2")];
        let reachable: BTreeSet<String> = BTreeSet::new();
        assert_eq!(plan_path(&edges, &reachable, "10.0.0.2"), None);
    }

    #[test]
    fn tie_break_prefers_first_sorted_start() {
        // Both 10.0.0.1 and 10.0.0.2 are one hop from the target; sorted
        // order means 10.0.0.1 is tried first and wins the tie.
        let edges = vec![pair("10.0.0.1", "10.9.9.9"), pair("10.0.0.2", "10.9.9.9")];
        let reachable = set(&["10.0.0.2", "10.0.0.1"]);
        let path = plan_path(&edges, &reachable, "10.9.9.9").unwrap();
        assert_eq!(path, vec!["10.0.0.1", "10.9.9.9"]);
    }

    #[test]
    fn shorter_path_wins_over_longer_from_later_start() {
        let edges = vec![
            pair("10.0.0.1", "10.0.0.5"),
            pair("10.0.0.5", "10.0.0.6"),
            pair("10.0.0.6", "10.9.9.9"),
            pair("10.0.0.2", "10.9.9.9"),
        ];
        let reachable = set(&["10.0.0.1", "10.0.0.2"]);
        let path = plan_path(&edges, &reachable, "10.9.9.9").unwrap();
        assert_eq!(path, vec!["10.0.0.2", "10.9.9.9"]);
    }
}
