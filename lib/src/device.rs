use crate::consts::*;
use crate::enumerate::Context;
use crate::errors::*;
use crate::util::*;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

make_log_macro!(debug, "device");
make_log_macro!(warn, "device");

/// Short-lived handle to a single device, opened by syspath.
///
/// Holds no open file: each attribute access opens and closes its own file,
/// so dropping the handle releases everything.
#[derive(Debug)]
pub struct Device {
    syspath: PathBuf,
}

impl Device {
    /// Open the device at `syspath`.
    ///
    /// The path must lie below the context's sysfs root and name a device
    /// directory, i.e. one with a `uevent` file.
    pub fn from_syspath(context: &Context, syspath: &Path) -> Result<Self> {
        let escapes = syspath
            .components()
            .any(|c| matches!(c, Component::ParentDir));
        if escapes
            || !syspath.starts_with(context.sysfs_root())
            || !syspath.join(FILE_UEVENT).is_file()
        {
            return Err(BacklightError::InvalidDevice(syspath.to_path_buf()));
        }

        Ok(Self {
            syspath: syspath.to_path_buf(),
        })
    }

    pub fn syspath(&self) -> &Path {
        &self.syspath
    }

    /// Last component of the syspath, e.g. `intel_backlight`.
    pub fn sysname(&self) -> String {
        self.syspath
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Value of `attribute` with the trailing newline removed, `None` if it
    /// is missing or unreadable.
    pub fn attribute_value(&self, attribute: &str) -> Option<String> {
        match read_file(self.syspath.join(attribute)) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("{}: {attribute}: {e}", self.syspath.display());
                None
            }
        }
    }

    pub fn set_attribute_value(&self, attribute: &str, value: &str) -> Result<()> {
        let path = self.syspath.join(attribute);
        if !path.exists() {
            return Err(BacklightError::NoSuchAttribute {
                syspath: self.syspath.clone(),
                attribute: attribute.to_string(),
            });
        }

        let write_error = |source| BacklightError::Write {
            syspath: self.syspath.clone(),
            attribute: attribute.to_string(),
            value: value.to_string(),
            source,
        };
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(write_error)?;
        file.write_all(value.as_bytes()).map_err(write_error)?;
        debug!("{}: {attribute} = {value}", self.syspath.display());
        Ok(())
    }

    /// Numeric attribute such as `brightness` or `max_brightness`.
    ///
    /// Missing or non-numeric values read as 0, the same as a genuine 0.
    pub fn brightness_attribute(&self, attribute: &str) -> i32 {
        match self.attribute_value(attribute) {
            Some(value) => parse_leading_int(&value).unwrap_or_else(|| {
                warn!(
                    "{}: {attribute} is not a number ({value:?}), using 0",
                    self.syspath.display()
                );
                0
            }),
            None => {
                warn!(
                    "{}: {attribute} is unreadable, using 0",
                    self.syspath.display()
                );
                0
            }
        }
    }
}
