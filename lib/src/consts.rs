/// Mount point of sysfs
pub const SYSFS_ROOT: &str = "/sys";

/// Directory below the sysfs root holding one directory per device class
pub const CLASS_DIR: &str = "class";

/// Subsystem the manager's query is bound to
pub const SUBSYSTEM_BACKLIGHT: &str = "backlight";

/// Every device directory carries this file, entries without it are not devices.
pub const FILE_UEVENT: &str = "uevent";

/// Current brightness level, also the file written to change it.
pub const ATTR_BRIGHTNESS: &str = "brightness";

/// Filename for device's max brightness
pub const ATTR_MAX_BRIGHTNESS: &str = "max_brightness";

/// How the backlight is controlled, one of [`BACKLIGHT_TYPES`].
pub const ATTR_TYPE: &str = "type";

/// Values the kernel reports in a backlight's `type` attribute, most preferred first.
pub const BACKLIGHT_TYPES: [&str; 3] = ["firmware", "platform", "raw"];

/// Directory name used below the config locations
pub const CONFIG_DIR_NAME: &str = "backlight-helper";
