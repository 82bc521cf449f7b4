#![warn(clippy::match_same_arms)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::unnecessary_wraps)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Enumerate the kernel's backlight devices and read or write their brightness.
//!
//! A [`BacklightManager`] owns the registry context and a query bound to the
//! `backlight` subsystem. It must be [initialized](BacklightManager::initialize)
//! before use and can be [finalized](BacklightManager::finalize) to release
//! both again. All calls are synchronous and the manager does no locking of
//! its own: scanning operations take `&mut self`, so sharing one manager
//! between threads needs a lock around it.
//!
//! ```no_run
//! use backlight::BacklightManagerBuilder;
//!
//! let mut manager = BacklightManagerBuilder::new().build()?;
//! manager.initialize()?;
//! for syspath in manager.list_device_paths()? {
//!     let max = manager.get_max_brightness(&syspath)?;
//!     manager.set_brightness(&syspath, max / 2)?;
//! }
//! manager.finalize();
//! # Ok::<(), backlight::BacklightError>(())
//! ```

#[macro_use]
mod util;
mod config;
mod consts;
mod device;
mod enumerate;
mod errors;
pub mod ffi;
#[cfg(feature = "logind")]
mod logind;
#[cfg(test)]
mod test_utils;

use std::path::{Path, PathBuf};

use regex::Regex;

pub use crate::config::BacklightConfig;
use crate::consts::*;
pub use crate::device::Device;
pub use crate::enumerate::{Context, Enumerator};
pub use crate::errors::{BacklightError, Result};
use crate::util::*;

make_log_macro!(debug, "backlight");
make_log_macro!(warn, "backlight");
make_log_macro!(error, "backlight");

/// Used to construct [`BacklightManager`]
pub struct BacklightManagerBuilder<'a> {
    device_regex: &'a str,
    config: Option<BacklightConfig>,
}

impl Default for BacklightManagerBuilder<'_> {
    fn default() -> Self {
        Self {
            device_regex: ".",
            config: None,
        }
    }
}

impl<'a> BacklightManagerBuilder<'a> {
    /// Create a new [`BacklightManagerBuilder`].
    pub fn new() -> Self {
        BacklightManagerBuilder::default()
    }

    /// Defaults to `"."` (matches all devices).
    pub fn with_device_regex(mut self, device_regex: &'a str) -> Self {
        self.device_regex = device_regex;
        self
    }

    /// Defaults to [`BacklightConfig::new()`].
    pub fn with_config(mut self, config: BacklightConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Returns the constructed [`BacklightManager`], not yet initialized.
    pub fn build(self) -> Result<BacklightManager> {
        let config = match self.config {
            Some(config) => config,
            None => BacklightConfig::new()?,
        };

        if config.logind && !cfg!(feature = "logind") {
            warn!("logind is enabled in the config but support is not built in");
        }

        Ok(BacklightManager {
            config,
            device_regex: Regex::new(self.device_regex)?,
            handles: None,
        })
    }
}

/// Registry handles that live between `initialize` and `finalize`.
/// Both exist or neither does.
struct Handles {
    enumerator: Enumerator,
    context: Context,
}

pub struct BacklightManager {
    config: BacklightConfig,
    device_regex: Regex,
    handles: Option<Handles>,
}

impl BacklightManager {
    /// Create the registry context and the backlight query.
    ///
    /// Calling this on an initialized manager does nothing. On failure
    /// nothing is kept and the manager stays uninitialized.
    pub fn initialize(&mut self) -> Result<()> {
        if self.handles.is_some() {
            debug!("already initialized");
            return Ok(());
        }

        let context = Context::new(&self.config.sysfs_root).inspect_err(|e| {
            error!("Get enumeration context failed: {e}");
        })?;
        let mut enumerator = Enumerator::new(&context);
        enumerator
            .match_subsystem(SUBSYSTEM_BACKLIGHT)
            .inspect_err(|e| {
                error!("Enumerate match backlight failed: {e}");
            })?;
        enumerator.match_sysname(self.device_regex.clone());

        self.handles = Some(Handles {
            enumerator,
            context,
        });
        debug!("initialized on {}", self.config.sysfs_root.display());
        Ok(())
    }

    /// Release the query, then the context. Safe to call at any time.
    pub fn finalize(&mut self) {
        if let Some(Handles {
            enumerator,
            context,
        }) = self.handles.take()
        {
            drop(enumerator);
            drop(context);
            debug!("finalized");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.handles.is_some()
    }

    fn handles(&self) -> Result<&Handles> {
        self.handles.as_ref().ok_or_else(|| {
            error!("{}", BacklightError::NotInitialized);
            BacklightError::NotInitialized
        })
    }

    /// Re-scan the registry, returning the handles with fresh entries.
    fn scan(&mut self) -> Result<&Handles> {
        let handles = self.handles.as_mut().ok_or_else(|| {
            error!("{}", BacklightError::NotInitialized);
            BacklightError::NotInitialized
        })?;
        handles.enumerator.scan_devices().inspect_err(|e| {
            error!("{e}");
        })?;
        Ok(&*handles)
    }

    /// Syspaths of all backlight devices, in registry order.
    ///
    /// An empty list means the scan found no devices.
    pub fn list_device_paths(&mut self) -> Result<Vec<PathBuf>> {
        let handles = self.scan()?;
        let entries = handles.enumerator.entries();
        if entries.is_empty() {
            debug!("no backlight devices found");
        }
        Ok(entries.to_vec())
    }

    /// First device, in registry order, whose `type` attribute is exactly
    /// `device_type`.
    pub fn find_device_path_by_type(&mut self, device_type: &str) -> Result<Option<PathBuf>> {
        let handles = self.scan()?;

        for syspath in handles.enumerator.entries() {
            let matched = match Device::from_syspath(&handles.context, syspath) {
                Ok(device) => device
                    .attribute_value(ATTR_TYPE)
                    .is_some_and(|kind| kind == device_type),
                Err(e) => {
                    warn!("{e}");
                    false
                }
            };
            if matched {
                debug!("{} has type {device_type}", syspath.display());
                return Ok(Some(syspath.clone()));
            }
        }

        debug!("no device of type {device_type}");
        Ok(None)
    }

    /// Device to use when none is named: the first match of each configured
    /// preferred type in turn, otherwise the first device listed.
    pub fn find_preferred_device_path(&mut self) -> Result<Option<PathBuf>> {
        for device_type in self.config.preferred_types.clone() {
            if let Some(syspath) = self.find_device_path_by_type(&device_type)? {
                return Ok(Some(syspath));
            }
        }
        Ok(self.list_device_paths()?.into_iter().next())
    }

    fn open(&self, syspath: &Path) -> Result<Device> {
        let handles = self.handles()?;
        Device::from_syspath(&handles.context, syspath).inspect_err(|e| {
            error!("{e}");
        })
    }

    /// Current brightness of the device at `syspath`.
    ///
    /// A missing or non-numeric attribute reads as 0.
    pub fn get_brightness(&self, syspath: &Path) -> Result<i32> {
        Ok(self.open(syspath)?.brightness_attribute(ATTR_BRIGHTNESS))
    }

    /// Maximum brightness of the device at `syspath`.
    ///
    /// A missing or non-numeric attribute reads as 0.
    pub fn get_max_brightness(&self, syspath: &Path) -> Result<i32> {
        Ok(self.open(syspath)?.brightness_attribute(ATTR_MAX_BRIGHTNESS))
    }

    /// Write `value`, clamped to `[0, max_brightness]`, and return what was
    /// written.
    ///
    /// An unreadable `max_brightness` counts as 0, so every write then
    /// becomes 0.
    pub fn set_brightness(&self, syspath: &Path, value: i32) -> Result<i32> {
        let device = self.open(syspath)?;
        let max = device.brightness_attribute(ATTR_MAX_BRIGHTNESS);
        let value = clamp_brightness(value, max);

        #[cfg(feature = "logind")]
        {
            if let (true, Ok(brightness)) = (self.config.logind, u32::try_from(value)) {
                let sysname = device.sysname();
                match logind::set_brightness(SUBSYSTEM_BACKLIGHT, &sysname, brightness) {
                    Ok(()) => return Ok(value),
                    // Fall back to writing to sysfs brightness file
                    Err(e) => {
                        debug!("{e}");
                    }
                }
            }
        }

        device
            .set_attribute_value(ATTR_BRIGHTNESS, &value.to_string())
            .inspect_err(|e| {
                error!(
                    "Set brightness for '{}' to {} failed: {}",
                    syspath.display(),
                    value,
                    e
                );
            })?;
        Ok(value)
    }
}

impl Drop for BacklightManager {
    fn drop(&mut self) {
        self.finalize();
    }
}
