//! Discovery of devices in the kernel device registry.
//!
//! The registry is the sysfs tree: every device class is a directory below
//! `<sysfs root>/class` holding one entry per device. A [`Context`] names the
//! sysfs mount and an [`Enumerator`] is a reusable query over it.

use crate::consts::*;
use crate::errors::*;

use std::fs::read_dir;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use regex::Regex;

make_log_macro!(debug, "enumerate");

/// Handle to the device registry rooted at a sysfs mount.
#[derive(Clone, Debug)]
pub struct Context {
    sysfs_root: PathBuf,
}

impl Context {
    /// Fails if `sysfs_root` has no `class` directory.
    pub fn new(sysfs_root: impl Into<PathBuf>) -> Result<Self> {
        let sysfs_root = sysfs_root.into();
        if !sysfs_root.join(CLASS_DIR).is_dir() {
            return Err(BacklightError::Init(format!(
                "{} is not a sysfs mount",
                sysfs_root.display()
            )));
        }
        debug!("context at {}", sysfs_root.display());
        Ok(Self { sysfs_root })
    }

    pub fn sysfs_root(&self) -> &Path {
        &self.sysfs_root
    }

    fn class_dir(&self, subsystem: &str) -> PathBuf {
        self.sysfs_root.join(CLASS_DIR).join(subsystem)
    }
}

/// A device query bound to a [`Context`].
///
/// Filters are configured once; [`Enumerator::scan_devices`] re-reads the
/// registry and replaces the entries seen by [`Enumerator::entries`].
#[derive(Debug)]
pub struct Enumerator {
    context: Context,
    subsystems: Vec<String>,
    sysname: Option<Regex>,
    entries: Vec<PathBuf>,
}

impl Enumerator {
    pub fn new(context: &Context) -> Self {
        Self {
            context: context.clone(),
            subsystems: Vec::new(),
            sysname: None,
            entries: Vec::new(),
        }
    }

    /// Only list devices of `subsystem`. May be called for several subsystems.
    pub fn match_subsystem(&mut self, subsystem: &str) -> Result<()> {
        let mut components = Path::new(subsystem).components();
        let single_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(name)), None) if name == subsystem
        );
        if !single_name {
            return Err(BacklightError::InvalidSubsystem(subsystem.to_string()));
        }

        if !self.subsystems.iter().any(|s| s == subsystem) {
            self.subsystems.push(subsystem.to_string());
        }
        Ok(())
    }

    /// Only list devices whose name matches `sysname`.
    pub fn match_sysname(&mut self, sysname: Regex) {
        self.sysname = Some(sysname);
    }

    /// Rebuild the entry list from the registry.
    ///
    /// A subsystem without a class directory contributes no entries. Entries
    /// come in directory order, which is neither sorted nor stable.
    pub fn scan_devices(&mut self) -> Result<()> {
        let mut entries = Vec::new();

        for subsystem in &self.subsystems {
            let class_dir = self.context.class_dir(subsystem);
            let dir = match read_dir(&class_dir) {
                Ok(dir) => dir,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("{} does not exist", class_dir.display());
                    continue;
                }
                Err(source) => {
                    return Err(BacklightError::Scan {
                        path: class_dir,
                        source,
                    });
                }
            };

            for entry in dir {
                let entry = entry.map_err(|source| BacklightError::Scan {
                    path: class_dir.clone(),
                    source,
                })?;
                let syspath = entry.path();

                if !syspath.join(FILE_UEVENT).is_file() {
                    debug!("{} is not a device", syspath.display());
                    continue;
                }
                if let Some(sysname) = &self.sysname {
                    let name = entry.file_name();
                    if !sysname.is_match(&name.to_string_lossy()) {
                        debug!("{:?} did not match {}", name, sysname.as_str());
                        continue;
                    }
                }

                entries.push(syspath);
            }
        }

        debug!("scan found {} device(s)", entries.len());
        self.entries = entries;
        Ok(())
    }

    /// Syspaths found by the last scan.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }
}
