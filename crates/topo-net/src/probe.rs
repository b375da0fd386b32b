//! Reachability Probe: cached TCP-22 liveness test against known
//! devices, shared across workers via the document store.

use crate::error::NetError;
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::net::TcpStream;
use topo_db::{devices, reachability, Store};

const CACHE_TTL_SECS: f64 = 300.0;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const SSH_PORT: u16 = 22;

pub fn unix_now() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Return the set of IPs directly reachable from this worker right now,
/// consulting the 300-second cache first.
pub async fn probe(store: &Store) -> Result<BTreeSet<String>, NetError> {
    if let Some(cache) = reachability::read(store).await? {
        if unix_now() - cache.updated_at < CACHE_TTL_SECS {
            log::debug!("reachability: using cached result ({} ips)", cache.reachable_ips.len());
            return Ok(cache.reachable_ips.into_iter().collect());
        }
    }

    let candidates = devices::find_reachable_candidates(store).await?;
    log::info!("reachability: testing {} devices for direct connectivity", candidates.len());

    let mut reachable = BTreeSet::new();
    for dev in candidates {
        if dev.host.is_empty() {
            continue;
        }
        match tcp_probe(&dev.host).await {
            true => {
                log::debug!("reachability: {} is directly reachable", dev.host);
                reachable.insert(dev.host);
            }
            false => {
                log::debug!("reachability: {} is not reachable", dev.host);
            }
        }
    }

    let ips: Vec<String> = reachable.iter().cloned().collect();
    reachability::write(store, &ips, unix_now()).await?;
    log::info!("reachability: found {} directly reachable devices", reachable.len());
    Ok(reachable)
}

async fn tcp_probe(host: &str) -> bool {
    let addr = format!("{host}:{SSH_PORT}");
    matches!(
        tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(&addr)).await,
        Ok(Ok(_))
    )
}
