//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`CounterStore`] for the lifetime usage counters.
//!
//! - Namespace isolation: everything lives under [`NAMESPACE`].
//! - Atomic writes: each `put_int` is one `nvs_set_u64` followed by
//!   `nvs_commit()`, which ESP-IDF guarantees is atomic per key.
//! - Key length: NVS keys hold at most 15 bytes.  Longer keys are
//!   truncated identically on read and write, so `"motoMilliseconds"`
//!   is stored as `"motoMillisecond"`.
//!
//! The simulation backend keeps values in a `HashMap` (dev/test only).

use crate::app::ports::{CounterStore, StorageError};
use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// NVS namespace for the usage counters.
pub const NAMESPACE: &str = "motor-unit";
/// Longest key NVS accepts (excluding the NUL terminator).
pub const MAX_KEY_LEN: usize = 15;

/// Key as NVS stores it: at most [`MAX_KEY_LEN`] bytes.
pub fn nvs_key(key: &str) -> &str {
    let mut end = key.len().min(MAX_KEY_LEN);
    while !key.is_char_boundary(end) {
        end -= 1;
    }
    &key[..end]
}

/// NUL-terminated copy of `s` truncated to an NVS name.
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
fn c_name(s: &str) -> [u8; MAX_KEY_LEN + 1] {
    let mut buf = [0u8; MAX_KEY_LEN + 1];
    let b = nvs_key(s).as_bytes();
    buf[..b.len()].copy_from_slice(b);
    buf
}

#[derive(Default)]
pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: HashMap<String, u64>,
}

impl NvsAdapter {
    /// Create a new NvsAdapter and initialise NVS flash.
    ///
    /// Returns `Err(StorageError::Io)` if flash initialisation fails
    /// unrecoverably. On first boot or after a version mismatch the NVS
    /// partition is erased and re-initialised automatically.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                let ret2 = unsafe { nvs_flash_erase() };
                if ret2 != ESP_OK {
                    return Err(StorageError::Io(ret2));
                }
                let ret3 = unsafe { nvs_flash_init() };
                if ret3 != ESP_OK {
                    return Err(StorageError::Io(ret3));
                }
            } else if ret != ESP_OK {
                return Err(StorageError::Io(ret));
            }
            info!("NvsAdapter: ESP-IDF NVS initialised (namespace {:?})", NAMESPACE);
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend (namespace {:?})", NAMESPACE);

        Ok(Self::default())
    }

    /// Open the namespace, execute a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let ns = c_name(NAMESPACE);
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        // SAFETY: `ns` is NUL-terminated and outlives the call.
        let ret = unsafe { nvs_open(ns.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }
}

impl CounterStore for NvsAdapter {
    fn get_int(&self, key: &str, default: u64) -> u64 {
        #[cfg(not(target_os = "espidf"))]
        {
            self.store.get(nvs_key(key)).copied().unwrap_or(default)
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(false, |handle| {
                let key_buf = c_name(key);
                let mut value: u64 = 0;
                let ret = unsafe { nvs_get_u64(handle, key_buf.as_ptr() as *const _, &mut value) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(value)
            });
            match result {
                Ok(v) => v,
                // A fresh partition has no namespace yet; both read as "never written".
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND as i32 => default,
                Err(e) => {
                    warn!("NvsAdapter: read {:?} failed ({}), using {}", key, e, default);
                    default
                }
            }
        }
    }

    fn put_int(&mut self, key: &str, value: u64) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            self.store.insert(nvs_key(key).to_owned(), value);
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(true, |handle| {
                let key_buf = c_name(key);
                let ret = unsafe { nvs_set_u64(handle, key_buf.as_ptr() as *const _, value) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            });
            result.map_err(|e| {
                if e == ESP_ERR_NVS_NOT_ENOUGH_SPACE as i32 {
                    StorageError::Full
                } else {
                    StorageError::Io(e)
                }
            })
        }
    }
}
