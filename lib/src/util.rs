use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::consts::CONFIG_DIR_NAME;
use crate::errors::*;

macro_rules! make_log_macro {
    (@wdoll $macro_name:ident, $block_name:literal, ($dol:tt)) => {
        #[allow(unused_macros)]
        macro_rules! $macro_name {
            ($dol($args:tt)+) => {
                ::log::$macro_name!(target: $block_name, $dol($args)+);
            };
        }
    };
    ($macro_name:ident, $block_name:literal) => {
        make_log_macro!(@wdoll $macro_name, $block_name, ($));
    };
}

/// Search the user's config directory, then `/etc`, for `<file>.<extension>`.
/// An absolute `file` that exists is returned as is.
pub fn find_file(file: &str, extension: Option<&str>) -> Option<PathBuf> {
    let file = Path::new(file);
    if file.is_absolute() {
        return file.exists().then(|| file.to_path_buf());
    }

    let mut search_dirs = Vec::with_capacity(2);
    if let Some(config_dir) = dirs::config_dir() {
        search_dirs.push(config_dir.join(CONFIG_DIR_NAME));
    }
    search_dirs.push(Path::new("/etc").join(CONFIG_DIR_NAME));

    search_dirs
        .into_iter()
        .map(|dir| {
            let mut path = dir.join(file);
            if let Some(extension) = extension {
                path.set_extension(extension);
            }
            path
        })
        .find(|path| path.exists())
}

pub fn deserialize_toml_file<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let contents = read_file(path)?;

    toml::from_str(&contents).map_err(|err| {
        let location_msg = err
            .span()
            .map(|span| {
                let line = 1 + contents.as_bytes()[..(span.start)]
                    .iter()
                    .filter(|b| **b == b'\n')
                    .count();
                format!(" at line {line}")
            })
            .unwrap_or_default();
        BacklightError::Other(format!(
            "Failed to deserialize TOML file {}{}: {}",
            path.display(),
            location_msg,
            err.message()
        ))
    })
}

/// Read a whole file, dropping the trailing newline sysfs attributes end with.
pub fn read_file(path: impl AsRef<Path>) -> std::io::Result<String> {
    let content = std::fs::read_to_string(path)?;
    Ok(content.trim_end().to_string())
}

/// Parse the leading base-10 integer of `text` the way C's `atoi` does.
///
/// Leading whitespace and one sign are accepted and parsing stops at the first
/// non-digit. Returns `None` if no digit follows the sign. Out of range values
/// saturate at the bounds of `i32`.
pub fn parse_leading_int(text: &str) -> Option<i32> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits = &digits[..digits.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() {
        return None;
    }

    let limit = i64::from(i32::MAX) + 1;
    let magnitude = digits.bytes().fold(0i64, |acc, digit| {
        (acc * 10 + i64::from(digit - b'0')).min(limit)
    });
    let value = if negative { -magnitude } else { magnitude };

    Some(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

/// Clamp a requested brightness into `[0, max]`.
///
/// `max` is taken as given: a negative ceiling is not corrected, so values
/// above it still come out as `max`.
pub fn clamp_brightness(value: i32, max: i32) -> i32 {
    if value < 0 {
        0
    } else if value > max {
        max
    } else {
        value
    }
}
