//! Per-job state machine: load a device, establish a session, parse
//! its neighbors, persist the graph, and reconcile the inventory.

use crate::error::OrchestratorError;
use std::collections::HashMap;
use topo_db::models::{DeviceRecord, DeviceStatus};
use topo_db::{devices, graph, identities, topology, ObjectId, Store};
use topo_graph::CanonicalLink;
use topo_parsers::DeviceType;
use topo_queue::DiscoveryJob;
use topo_ssh::{ChainedSession, Credentials, DirectSession, Session};

fn unix_now() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

fn device_type_str(dt: DeviceType) -> &'static str {
    use DeviceType::*;
    match dt {
        Router => "router",
        Switch => "switch",
        Layer3Switch => "layer3_switch",
        Ap => "ap",
        End => "end",
    }
}

/// Entry point invoked by the queue consumer for every decoded job.
/// Never propagates a per-device failure — everything is recorded on
/// the device record instead, so the caller can always ack.
pub async fn run_discovery_job(store: &Store, queue_config: &topo_queue::Config, job: DiscoveryJob) {
    let oid = match topo_db::parse_device_id(&job.device_id) {
        Ok(oid) => oid,
        Err(e) => {
            log::warn!("[discovery] cannot decode device id {}: {e}", job.device_id);
            return;
        }
    };

    let dev = match devices::find_by_id(store, &oid).await {
        Ok(Some(d)) => d,
        Ok(None) => {
            log::warn!("[discovery] device {oid} missing");
            return;
        }
        Err(e) => {
            log::error!("[discovery] lookup failed for {oid}: {e}");
            return;
        }
    };

    if let Err(e) = devices::set_status(store, &oid, DeviceStatus::Scanning, unix_now()).await {
        log::error!("[discovery] failed to mark {oid} scanning: {e}");
        return;
    }

    if let Err(e) = run_device(store, queue_config, &oid, &dev, &job).await {
        log::warn!("[discovery] {} failed: {e}", dev.host);
        if let Err(set_err) = devices::set_error(store, &oid, &e.to_string(), unix_now()).await {
            log::error!("[discovery] failed to record error status for {oid}: {set_err}");
        }
    }
}

async fn run_device(
    store: &Store,
    queue_config: &topo_queue::Config,
    oid: &ObjectId,
    dev: &DeviceRecord,
    job: &DiscoveryJob,
) -> Result<(), OrchestratorError> {
    let seed_ip = dev.host.trim();
    if seed_ip.is_empty() {
        devices::set_status(store, oid, DeviceStatus::NeedsIp, unix_now()).await?;
        log::info!("[discovery] no IP for device {}", dev.display_name);
        return Ok(());
    }

    let (username, password) = match (&dev.username, &dev.password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u.clone(), p.clone()),
        _ => {
            devices::set_status(store, oid, DeviceStatus::NeedsCreds, unix_now()).await?;
            log::info!("[discovery] no creds for {seed_ip}");
            return Ok(());
        }
    };

    let mut session = connect(store, seed_ip, &username, &password).await?;

    let cdp_out = exec_best_effort(&mut session, "show cdp neighbors detail").await;
    let mut links = topo_parsers::parse_cdp_neighbors(&cdp_out);
    let mut protocol = "cdp";
    if links.is_empty() {
        let lldp_out = exec_best_effort(&mut session, "show lldp neighbors detail").await;
        links = topo_parsers::parse_lldp_neighbors(&lldp_out);
        topo_parsers::apply_lldp_fallback_rule(&mut links);
        protocol = "lldp_fallback";
    }

    let brief = exec_best_effort(&mut session, "show ip interface brief").await;

    if let Err(e) = session.disconnect().await {
        log::warn!("[discovery] error disconnecting from {seed_ip}: {e}");
    }

    let now = unix_now();
    let (snap_nodes, snap_edges) = topo_graph::build_snapshot(seed_ip, &links);
    topology::write_snapshot(store, seed_ip, snap_nodes, snap_edges, brief, now).await?;

    let mut canonical_links = Vec::new();
    for link in &links {
        if let Some(remote_id) =
            devices::resolve_canonical_remote_id(store, link.remote_mgmt_ip.as_deref(), &link.remote_sysname).await?
        {
            canonical_links.push(CanonicalLink {
                local_if: link.local_if.clone(),
                remote_port: link.remote_port.clone(),
                canonical_remote_id: remote_id,
            });
        }
    }
    let edge_upserts = topo_graph::plan_graph_upserts(seed_ip, &canonical_links);
    graph::upsert_graph(store, seed_ip, &edge_upserts, now).await?;
    devices::set_status(store, oid, DeviceStatus::Ready, now).await?;

    log::info!("[discovery] seed={seed_ip} protocol={protocol} neighbors={}", links.len());

    let default_identity = identities::find_default(store).await?;
    let (default_identity_id, default_username, default_password, default_status) = match &default_identity {
        Some(identity) if !identity.username.is_empty() && !identity.password.is_empty() => (
            identity.id.map(|id| id.to_hex()),
            Some(identity.username.clone()),
            Some(identity.password.clone()),
            DeviceStatus::Ready,
        ),
        Some(identity) => (identity.id.map(|id| id.to_hex()), None, None, DeviceStatus::NeedsCreds),
        None => (None, None, None, DeviceStatus::NeedsCreds),
    };

    let mut new_devices_added = false;

    for link in &links {
        let rname = &link.remote_sysname;
        let r_type = link.device_type;
        log::debug!(
            "[discovery]   neighbor name={rname} ip={} type={r_type:?} local_if={} remote_port={}",
            link.remote_mgmt_ip.as_deref().unwrap_or("-"),
            link.local_if,
            link.remote_port
        );

        let Some(r_ip) = link.remote_mgmt_ip.as_deref() else {
            if devices::find_by_display_name_and_empty_host(store, rname).await?.is_none() {
                let new_dev = DeviceRecord {
                    id: None,
                    host: String::new(),
                    display_name: rname.clone(),
                    platform: "cisco_ios".to_string(),
                    identity_id: default_identity_id.clone(),
                    username: default_username.clone(),
                    password: default_password.clone(),
                    status: default_status,
                    depth: job.depth + 1,
                    parent: Some(seed_ip.to_string()),
                    device_type: r_type.map(device_type_str).map(str::to_string),
                    alternate_ips: vec![],
                    interface_map: HashMap::new(),
                    created_at: unix_now(),
                    last_seen: None,
                    error: None,
                };
                devices::insert(store, &new_dev).await?;
                new_devices_added = true;
            }
            continue;
        };

        match devices::find_by_host(store, r_ip).await? {
            Some(existing) => {
                let id = existing.id.expect("persisted device record always has an id");
                let display_name_if_blank = existing.display_name.is_empty().then_some(rname.as_str());
                let new_depth_if_shorter = (existing.depth > job.depth + 1).then_some((job.depth + 1, seed_ip));
                let device_type_if_unset = match (existing.device_type.as_deref(), r_type) {
                    (None, Some(t)) => Some(device_type_str(t)),
                    _ => None,
                };
                devices::patch_existing(
                    store,
                    &id,
                    display_name_if_blank,
                    new_depth_if_shorter,
                    device_type_if_unset,
                    r_ip,
                    &link.remote_port,
                )
                .await?;
            }
            None => {
                let same_name = devices::find_by_display_name_with_host(store, rname).await?;
                match same_name {
                    Some(existing) => {
                        let id = existing.id.expect("persisted device record always has an id");
                        let shorter = (existing.depth > job.depth + 1).then_some(job.depth + 1);
                        devices::add_alternate_interface(store, &id, r_ip, &link.remote_port, shorter, seed_ip).await?;
                    }
                    None => {
                        let mut interface_map = HashMap::new();
                        interface_map.insert(r_ip.to_string(), link.remote_port.clone());
                        let new_dev = DeviceRecord {
                            id: None,
                            host: r_ip.to_string(),
                            display_name: rname.clone(),
                            platform: "cisco_ios".to_string(),
                            identity_id: default_identity_id.clone(),
                            username: default_username.clone(),
                            password: default_password.clone(),
                            status: default_status,
                            depth: job.depth + 1,
                            parent: Some(seed_ip.to_string()),
                            device_type: r_type.map(device_type_str).map(str::to_string),
                            alternate_ips: vec![],
                            interface_map,
                            created_at: unix_now(),
                            last_seen: None,
                            error: None,
                        };
                        let new_id = devices::insert(store, &new_dev).await?;
                        new_devices_added = true;

                        if job.auto_recursive && job.depth + 1 <= job.max_depth {
                            let child = DiscoveryJob::new(new_id.to_hex(), job.depth + 1, job.auto_recursive, job.max_depth);
                            topo_queue::enqueue_discovery(queue_config, &child).await?;
                        }
                    }
                }
            }
        }
    }

    if new_devices_added {
        trigger_cascade(store, queue_config).await;
    }

    Ok(())
}

async fn trigger_cascade(store: &Store, queue_config: &topo_queue::Config) {
    match devices::find_cascade_targets(store).await {
        Ok(targets) => {
            let pairs: Vec<(String, i64)> = targets
                .iter()
                .filter_map(|d| d.id.map(|id| (id.to_hex(), d.depth)))
                .collect();
            if let Err(e) = topo_queue::trigger_cascade(queue_config, &pairs).await {
                log::warn!("[cascade] failed to trigger fleet-wide re-scan: {e}");
            }
        }
        Err(e) => log::warn!("[cascade] failed to enumerate cascade targets: {e}"),
    }
}

/// §4.5 step 4: try a direct session first; on failure, plan a
/// jump-host path and fall back to a chained session.
async fn connect(store: &Store, seed_ip: &str, username: &str, password: &str) -> Result<Session, OrchestratorError> {
    let creds = Credentials::new(username, password);
    match DirectSession::connect(seed_ip, &creds).await {
        Ok(s) => Ok(Session::from(s)),
        Err(e) => {
            log::info!("[discovery] direct connect to {seed_ip} failed ({e}); trying jump-host path");
            let path = topo_net::find_path_to_device(store, seed_ip).await?;
            match path {
                Some(p) if p.len() >= 2 => {
                    let hop_credentials = resolve_hop_credentials(store, &p, username, password).await?;
                    let chained = ChainedSession::connect(&p, &hop_credentials).await?;
                    Ok(Session::from(chained))
                }
                _ => Err(OrchestratorError::Unreachable(seed_ip.to_string())),
            }
        }
    }
}

async fn resolve_hop_credentials(
    store: &Store,
    jump_path: &[String],
    target_username: &str,
    target_password: &str,
) -> Result<Vec<Credentials>, OrchestratorError> {
    let mut creds = Vec::with_capacity(jump_path.len());
    let last = jump_path.len() - 1;
    for (i, ip) in jump_path.iter().enumerate() {
        if i == last {
            if target_username.is_empty() || target_password.is_empty() {
                creds.push(Credentials::new("admin", ""));
            } else {
                creds.push(Credentials::new(target_username, target_password));
            }
            continue;
        }
        let hop = devices::find_by_host(store, ip)
            .await?
            .ok_or_else(|| OrchestratorError::ChainFailure(ip.clone()))?;
        match (&hop.username, &hop.password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => {
                creds.push(Credentials::new(u.clone(), p.clone()));
            }
            _ => return Err(OrchestratorError::ChainFailure(ip.clone())),
        }
    }
    Ok(creds)
}

async fn exec_best_effort(session: &mut Session, command: &str) -> String {
    match session.exec(command).await {
        Ok(out) => out,
        Err(e) => {
            log::warn!("[discovery] command `{command}` failed: {e}");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_type_str_matches_graph_vocabulary() {
        assert_eq!(device_type_str(DeviceType::Router), "router");
        assert_eq!(device_type_str(DeviceType::Switch), "switch");
        assert_eq!(device_type_str(DeviceType::Layer3Switch), "layer3_switch");
        assert_eq!(device_type_str(DeviceType::Ap), "ap");
        assert_eq!(device_type_str(DeviceType::End), "end");
    }

    #[test]
    fn unix_now_is_monotonic_and_positive() {
        let a = unix_now();
        let b = unix_now();
        assert!(a > 0.0);
        assert!(b >= a);
    }
}
