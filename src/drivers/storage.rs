//! On-board flash filesystem for the result logs.
//!
//! Registers the SPIFFS partition with the VFS under [`MOUNT_POINT`] so the
//! logs can be written with plain `std::fs`. On host builds nothing is
//! mounted and the configured paths are used as given.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use super::hw_init::HwInitError;

/// VFS prefix every result-log path lives under.
pub const MOUNT_POINT: &str = "/local";

#[cfg(target_os = "espidf")]
pub fn mount() -> Result<(), HwInitError> {
    let conf = esp_vfs_spiffs_conf_t {
        base_path: c"/local".as_ptr(),
        partition_label: core::ptr::null(),
        max_files: 4,
        format_if_mount_failed: true,
    };
    // SAFETY: called once from main() before any file is opened; `conf`
    // outlives the call and base_path is a static C string.
    let ret = unsafe { esp_vfs_spiffs_register(&conf) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::StorageMountFailed(ret));
    }

    let (mut total, mut used) = (0usize, 0usize);
    // SAFETY: partition registered above; out-pointers are valid locals.
    let ret = unsafe { esp_spiffs_info(core::ptr::null(), &mut total, &mut used) };
    if ret == ESP_OK as i32 {
        log::info!("storage: SPIFFS mounted at {} ({} / {} bytes used)", MOUNT_POINT, used, total);
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn mount() -> Result<(), HwInitError> {
    log::info!("storage(sim): {} not mounted", MOUNT_POINT);
    Ok(())
}
