//! Fake sysfs trees for tests.

use crate::consts::*;
use crate::{BacklightConfig, BacklightManager, BacklightManagerBuilder};

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A sysfs-shaped directory tree under a temporary directory.
pub struct FakeSysfs {
    dir: TempDir,
}

impl FakeSysfs {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(CLASS_DIR).join(SUBSYSTEM_BACKLIGHT)).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn add_device(&self, subsystem: &str, name: &str) -> PathBuf {
        let syspath = self.root().join(CLASS_DIR).join(subsystem).join(name);
        fs::create_dir_all(&syspath).unwrap();
        fs::write(syspath.join(FILE_UEVENT), format!("DEVNAME={name}\n")).unwrap();
        syspath
    }

    pub fn add_backlight(&self, name: &str, kind: &str, brightness: i32, max: i32) -> PathBuf {
        let syspath = self.add_device(SUBSYSTEM_BACKLIGHT, name);
        self.set_attribute(&syspath, ATTR_TYPE, &format!("{kind}\n"));
        self.set_attribute(&syspath, ATTR_BRIGHTNESS, &format!("{brightness}\n"));
        self.set_attribute(&syspath, ATTR_MAX_BRIGHTNESS, &format!("{max}\n"));
        syspath
    }

    pub fn add_file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root().join(relative);
        fs::write(&path, contents).unwrap();
        path
    }

    /// Swap the class directory of `subsystem` for a plain file, so reading
    /// it fails with something other than "not found".
    pub fn replace_class_with_file(&self, subsystem: &str) -> PathBuf {
        let class_dir = self.root().join(CLASS_DIR).join(subsystem);
        fs::remove_dir_all(&class_dir).unwrap();
        fs::write(&class_dir, "").unwrap();
        class_dir
    }

    pub fn set_attribute(&self, syspath: &Path, attribute: &str, value: &str) {
        fs::write(syspath.join(attribute), value).unwrap();
    }

    pub fn config(&self) -> BacklightConfig {
        BacklightConfig {
            sysfs_root: self.root().to_path_buf(),
            ..Default::default()
        }
    }

    /// Manager over this tree, not yet initialized.
    pub fn manager(&self) -> BacklightManager {
        BacklightManagerBuilder::new()
            .with_config(self.config())
            .build()
            .unwrap()
    }
}
