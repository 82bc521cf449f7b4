use crate::consts::*;
use crate::errors::*;
use crate::util::*;

use std::path::PathBuf;

use serde::Deserialize;
use serde::Deserializer;
use smart_default::SmartDefault;

make_log_macro!(debug, "config");

#[derive(Deserialize, Clone, Debug, SmartDefault)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct BacklightConfig {
    /// Where sysfs is mounted
    #[default(PathBuf::from(SYSFS_ROOT))]
    #[serde(deserialize_with = "deserialize_sysfs_root")]
    pub sysfs_root: PathBuf,

    /// Device types tried in order when no device is named
    #[default(default_preferred_types())]
    #[serde(deserialize_with = "deserialize_preferred_types")]
    pub preferred_types: Vec<String>,

    /// Ask systemd-logind to write brightness before touching sysfs.
    /// Only honoured when built with the `logind` feature.
    pub logind: bool,
}

fn default_preferred_types() -> Vec<String> {
    BACKLIGHT_TYPES.iter().map(ToString::to_string).collect()
}

fn deserialize_sysfs_root<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: Deserializer<'de>,
{
    let sysfs_root: PathBuf = Deserialize::deserialize(deserializer)?;
    debug!("{:?}", sysfs_root);

    if !sysfs_root.is_absolute() {
        return Err(serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(&sysfs_root.to_string_lossy()),
            &"an absolute path",
        ));
    }

    Ok(sysfs_root)
}

fn deserialize_preferred_types<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let preferred_types: Vec<String> = Deserialize::deserialize(deserializer)?;
    debug!("{:?}", preferred_types);

    for kind in &preferred_types {
        if !BACKLIGHT_TYPES.contains(&kind.as_str()) {
            return Err(serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(kind),
                &"one of \"firmware\", \"platform\" or \"raw\"",
            ));
        }
    }

    Ok(preferred_types)
}

impl BacklightConfig {
    /// Load `config.toml` from the config locations, or use the defaults if
    /// there is none.
    pub fn new() -> Result<Self> {
        if let Some(config_path) = find_file("config", Some("toml")) {
            debug!("loading {}", config_path.display());
            deserialize_toml_file(config_path)
        } else {
            debug!("no config file, using defaults");
            Ok(BacklightConfig::default())
        }
    }
}
