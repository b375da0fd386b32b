//! Repository functions over the `devices` collection.

use crate::error::DbError;
use crate::models::{DeviceRecord, DeviceStatus};
use crate::store::Store;
use mongodb::bson::{doc, oid::ObjectId};

pub async fn find_by_id(store: &Store, id: &ObjectId) -> Result<Option<DeviceRecord>, DbError> {
    Ok(store.devices().find_one(doc! { "_id": id }, None).await?)
}

pub async fn find_by_host(store: &Store, host: &str) -> Result<Option<DeviceRecord>, DbError> {
    Ok(store.devices().find_one(doc! { "host": host }, None).await?)
}

pub async fn find_by_display_name_and_empty_host(
    store: &Store,
    display_name: &str,
) -> Result<Option<DeviceRecord>, DbError> {
    Ok(store
        .devices()
        .find_one(doc! { "display_name": display_name, "host": "" }, None)
        .await?)
}

/// §4.6 lookup 1: a device that already lists `ip` as a secondary
/// management interface.
pub async fn find_by_alternate_ip(store: &Store, ip: &str) -> Result<Option<DeviceRecord>, DbError> {
    Ok(store
        .devices()
        .find_one(doc! { "alternate_ips": ip }, None)
        .await?)
}

/// §4.6 lookup 3: a device known only by name so far, now being given a
/// primary management IP.
pub async fn find_by_display_name_with_host(
    store: &Store,
    display_name: &str,
) -> Result<Option<DeviceRecord>, DbError> {
    Ok(store
        .devices()
        .find_one(
            doc! { "display_name": display_name, "host": { "$ne": "" } },
            None,
        )
        .await?)
}

/// Resolve the canonical graph-node id for a parsed link's remote
/// endpoint, per §4.6: alternate-IP match, then exact host match, then
/// display-name match with a non-empty host, then the raw IP verbatim;
/// if there is no IP at all, fall back to `name:<sysname>`; otherwise
/// the link has no identifiable endpoint and is skipped.
pub async fn resolve_canonical_remote_id(
    store: &Store,
    remote_mgmt_ip: Option<&str>,
    remote_sysname: &str,
) -> Result<Option<String>, DbError> {
    if let Some(ip) = remote_mgmt_ip {
        if let Some(dev) = find_by_alternate_ip(store, ip).await? {
            return Ok(Some(dev.host));
        }
        if find_by_host(store, ip).await?.is_some() {
            return Ok(Some(ip.to_string()));
        }
        if let Some(dev) = find_by_display_name_with_host(store, remote_sysname).await? {
            return Ok(Some(dev.host));
        }
        return Ok(Some(ip.to_string()));
    }
    if !remote_sysname.is_empty() {
        return Ok(Some(format!("name:{remote_sysname}")));
    }
    Ok(None)
}

pub async fn insert(store: &Store, device: &DeviceRecord) -> Result<ObjectId, DbError> {
    let result = store.devices().insert_one(device, None).await?;
    result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| DbError::NotFound("insert did not return an ObjectId".to_string()))
}

pub async fn set_status(
    store: &Store,
    id: &ObjectId,
    status: DeviceStatus,
    last_seen: f64,
) -> Result<(), DbError> {
    let status = mongodb::bson::to_bson(&status)?;
    store
        .devices()
        .update_one(
            doc! { "_id": id },
            doc! { "$set": { "status": status, "last_seen": last_seen } },
            None,
        )
        .await?;
    Ok(())
}

pub async fn set_error(
    store: &Store,
    id: &ObjectId,
    message: &str,
    last_seen: f64,
) -> Result<(), DbError> {
    let status = mongodb::bson::to_bson(&DeviceStatus::Error)?;
    store
        .devices()
        .update_one(
            doc! { "_id": id },
            doc! { "$set": { "status": status, "error": message, "last_seen": last_seen } },
            None,
        )
        .await?;
    Ok(())
}

/// §4.5 step 9, case "secondary interface": fold a second management IP
/// of an already-known device into `alternate_ips`/`interface_map`, and
/// lower `depth`/`parent` if this path is shorter.
pub async fn add_alternate_interface(
    store: &Store,
    id: &ObjectId,
    new_ip: &str,
    remote_port: &str,
    new_depth_if_shorter: Option<i64>,
    parent: &str,
) -> Result<(), DbError> {
    let mut set = mongodb::bson::Document::new();
    set.insert(format!("interface_map.{new_ip}"), remote_port);
    if let Some(depth) = new_depth_if_shorter {
        set.insert("depth", depth);
        set.insert("parent", parent);
    }
    store
        .devices()
        .update_one(
            doc! { "_id": id },
            doc! { "$addToSet": { "alternate_ips": new_ip }, "$set": set },
            None,
        )
        .await?;
    Ok(())
}

/// §4.5 step 9, case "existing record at that IP": minimal patch of
/// blank fields and, if shorter, depth/parent/device_type.
pub async fn patch_existing(
    store: &Store,
    id: &ObjectId,
    display_name_if_blank: Option<&str>,
    new_depth_if_shorter: Option<(i64, &str)>,
    device_type_if_unset: Option<&str>,
    interface_ip: &str,
    remote_port: &str,
) -> Result<(), DbError> {
    let mut set = mongodb::bson::Document::new();
    set.insert(format!("interface_map.{interface_ip}"), remote_port);
    if let Some(name) = display_name_if_blank {
        set.insert("display_name", name);
    }
    if let Some((depth, parent)) = new_depth_if_shorter {
        set.insert("depth", depth);
        set.insert("parent", parent);
    }
    if let Some(dt) = device_type_if_unset {
        set.insert("device_type", dt);
    }
    store
        .devices()
        .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
        .await?;
    Ok(())
}

/// Devices usable as jump hosts or reachability-probe targets: anything
/// actively being worked with a known management IP.
pub async fn find_reachable_candidates(store: &Store) -> Result<Vec<DeviceRecord>, DbError> {
    find_by_statuses(store, &[DeviceStatus::Ready, DeviceStatus::Scanning]).await
}

/// Devices eligible for the §4.7 cascade re-scan.
pub async fn find_cascade_targets(store: &Store) -> Result<Vec<DeviceRecord>, DbError> {
    find_by_statuses(store, &[DeviceStatus::Ready, DeviceStatus::Error]).await
}

async fn find_by_statuses(
    store: &Store,
    statuses: &[DeviceStatus],
) -> Result<Vec<DeviceRecord>, DbError> {
    use futures_util::TryStreamExt;
    let statuses: Vec<_> = statuses
        .iter()
        .map(|s| mongodb::bson::to_bson(s))
        .collect::<Result<_, _>>()?;
    let filter = doc! {
        "status": { "$in": statuses },
        "host": { "$exists": true, "$ne": "" },
    };
    let mut cursor = store.devices().find(filter, None).await?;
    let mut out = Vec::new();
    while let Some(doc) = cursor.try_next().await? {
        out.push(doc);
    }
    Ok(out)
}
