use std::fs;
use std::path::{Path, PathBuf};

use backlight::{BacklightConfig, BacklightError, BacklightManager, BacklightManagerBuilder};
use tempfile::TempDir;

fn backlight_dir(root: &Path) -> PathBuf {
    root.join("class").join("backlight")
}

/// A sysfs tree holding a single `intel_backlight` with `max_brightness=937`.
fn intel_sysfs() -> (TempDir, PathBuf) {
    let root = tempfile::tempdir().unwrap();
    let syspath = backlight_dir(root.path()).join("intel_backlight");
    fs::create_dir_all(&syspath).unwrap();
    fs::write(syspath.join("uevent"), "").unwrap();
    fs::write(syspath.join("type"), "raw\n").unwrap();
    fs::write(syspath.join("brightness"), "468\n").unwrap();
    fs::write(syspath.join("max_brightness"), "937\n").unwrap();
    fs::write(syspath.join("actual_brightness"), "468\n").unwrap();
    (root, syspath)
}

fn manager(root: &Path) -> BacklightManager {
    let config = BacklightConfig {
        sysfs_root: root.to_path_buf(),
        ..Default::default()
    };
    BacklightManagerBuilder::new()
        .with_config(config)
        .build()
        .unwrap()
}

#[test]
fn intel_backlight_session() {
    let (root, syspath) = intel_sysfs();
    let mut manager = manager(root.path());
    manager.initialize().unwrap();

    let listed = manager.list_device_paths().unwrap();
    assert_eq!(listed, vec![syspath.clone()]);
    assert_eq!(manager.get_max_brightness(&syspath).unwrap(), 937);
    assert_eq!(manager.get_brightness(&syspath).unwrap(), 468);

    assert_eq!(manager.set_brightness(&syspath, 2000).unwrap(), 937);
    assert_eq!(fs::read_to_string(syspath.join("brightness")).unwrap(), "937");
    assert_eq!(manager.set_brightness(&syspath, -10).unwrap(), 0);
    assert_eq!(manager.get_brightness(&syspath).unwrap(), 0);

    assert_eq!(
        manager.find_device_path_by_type("raw").unwrap(),
        Some(syspath.clone())
    );
    assert_eq!(manager.find_preferred_device_path().unwrap(), Some(syspath));

    manager.finalize();
    assert!(matches!(
        manager.list_device_paths(),
        Err(BacklightError::NotInitialized)
    ));
}

#[test]
fn hotplugged_device_shows_up_on_next_listing() {
    let (root, syspath) = intel_sysfs();
    let mut manager = manager(root.path());
    manager.initialize().unwrap();
    assert_eq!(manager.list_device_paths().unwrap().len(), 1);

    let acpi = backlight_dir(root.path()).join("acpi_video0");
    fs::create_dir_all(&acpi).unwrap();
    fs::write(acpi.join("uevent"), "").unwrap();
    fs::write(acpi.join("type"), "firmware\n").unwrap();

    let mut listed = manager.list_device_paths().unwrap();
    listed.sort();
    assert_eq!(listed, vec![acpi.clone(), syspath]);
    assert_eq!(manager.find_preferred_device_path().unwrap(), Some(acpi));
}

#[test]
fn reinitialize_after_finalize() {
    let (root, syspath) = intel_sysfs();
    let mut manager = manager(root.path());

    manager.initialize().unwrap();
    manager.finalize();
    manager.initialize().unwrap();
    assert_eq!(manager.get_max_brightness(&syspath).unwrap(), 937);
}
