//! C-callable surface, declared in `include/backlight.h`.
//!
//! The C API keeps one process-wide [`BacklightManager`] behind a mutex.
//! Errors are logged and reported with the C conventions: `-1` for integer
//! results and `NULL` for pointers. Strings and arrays handed out are
//! allocated with the C allocator and must be released with the matching
//! `backlight_release_*` function (or `free`).

use crate::errors::*;
use crate::{BacklightManager, BacklightManagerBuilder};

use std::ffi::{CStr, CString, OsStr, c_char, c_int};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr;
use std::sync::{Mutex, MutexGuard, PoisonError};

make_log_macro!(debug, "ffi");
make_log_macro!(error, "ffi");

static MANAGER: Mutex<Option<BacklightManager>> = Mutex::new(None);

fn manager() -> MutexGuard<'static, Option<BacklightManager>> {
    MANAGER.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run `op` on the global manager, mapping any error to `fallback`.
fn with_manager<T>(fallback: T, op: impl FnOnce(&mut BacklightManager) -> Result<T>) -> T {
    match manager().as_mut() {
        Some(manager) => op(manager).unwrap_or_else(|e| {
            debug!("{e}");
            fallback
        }),
        None => {
            error!("{}", BacklightError::NotInitialized);
            fallback
        }
    }
}

/// Borrow a C string as a path. `None` for NULL.
///
/// # Safety
///
/// `ptr` must be NULL or point to a NUL-terminated string that outlives `'a`.
unsafe fn path_arg<'a>(ptr: *const c_char) -> Option<&'a Path> {
    if ptr.is_null() {
        error!("NULL syspath");
        return None;
    }
    let bytes = unsafe { CStr::from_ptr(ptr) }.to_bytes();
    Some(Path::new(OsStr::from_bytes(bytes)))
}

/// Copy `path` into a string allocated with `malloc`. `None` if the path has
/// an interior NUL or allocation fails.
fn c_strdup(path: &Path) -> Option<*mut c_char> {
    let path = CString::new(path.as_os_str().as_bytes()).ok()?;
    let copy = unsafe { libc::strdup(path.as_ptr()) };
    (!copy.is_null()).then_some(copy)
}

/// Returns 0 on success (also when already initialized) and -1 on failure.
#[unsafe(no_mangle)]
pub extern "C" fn backlight_initialize() -> c_int {
    let mut guard = manager();
    if guard.is_none() {
        match BacklightManagerBuilder::new().build() {
            Ok(manager) => *guard = Some(manager),
            Err(e) => {
                error!("{e}");
                return -1;
            }
        }
    }

    match guard.as_mut().map(BacklightManager::initialize) {
        Some(Ok(())) => 0,
        _ => -1,
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn backlight_finalize() {
    if let Some(manager) = manager().as_mut() {
        manager.finalize();
    }
}

/// List backlight syspaths. The array holds `*num` strings and is not
/// NULL-terminated. Returns NULL with `*num = 0` if nothing was found.
///
/// # Safety
///
/// `num` must be NULL or valid for writing one `int`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn backlight_list_device_paths(num: *mut c_int) -> *mut *mut c_char {
    let paths = with_manager(Vec::new(), BacklightManager::list_device_paths);

    let mut list: *mut *mut c_char = ptr::null_mut();
    let mut count = 0usize;
    for path in &paths {
        let Some(copy) = c_strdup(path) else {
            error!("Copying {} failed", path.display());
            continue;
        };
        let grown = unsafe {
            libc::realloc(list.cast(), (count + 1) * size_of::<*mut c_char>())
        }
        .cast::<*mut c_char>();
        if grown.is_null() {
            error!("Realloc failed: {count}");
            unsafe { libc::free(copy.cast()) };
            continue;
        }
        list = grown;
        unsafe { list.add(count).write(copy) };
        count += 1;
    }

    if !num.is_null() {
        unsafe { num.write(c_int::try_from(count).unwrap_or(c_int::MAX)) };
    }
    list
}

/// Release an array from [`backlight_list_device_paths`] and its first
/// `num` strings. NULL is ignored.
///
/// # Safety
///
/// `list` must be NULL or an array returned by `backlight_list_device_paths`
/// holding at least `num` strings, not released before.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn backlight_release_device_paths(list: *mut *mut c_char, num: c_int) {
    if list.is_null() {
        return;
    }
    for i in 0..usize::try_from(num).unwrap_or(0) {
        unsafe { libc::free(list.add(i).read().cast()) };
    }
    unsafe { libc::free(list.cast()) };
}

/// Syspath of the first device whose `type` attribute equals `device_type`,
/// or NULL. Release with [`backlight_release_device_path`].
///
/// # Safety
///
/// `device_type` must be NULL or a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn backlight_find_device_path_by_type(
    device_type: *const c_char,
) -> *mut c_char {
    if device_type.is_null() {
        error!("NULL device type");
        return ptr::null_mut();
    }
    let device_type = unsafe { CStr::from_ptr(device_type) }.to_string_lossy();

    with_manager(None, |manager| manager.find_device_path_by_type(&device_type))
        .and_then(|path| c_strdup(&path))
        .unwrap_or(ptr::null_mut())
}

/// # Safety
///
/// `path` must be NULL or a string returned by
/// [`backlight_find_device_path_by_type`], not released before.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn backlight_release_device_path(path: *mut c_char) {
    unsafe { libc::free(path.cast()) };
}

/// Current brightness, or -1 if `syspath` is not a device.
///
/// # Safety
///
/// `syspath` must be NULL or a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn backlight_get_brightness(syspath: *const c_char) -> c_int {
    match unsafe { path_arg(syspath) } {
        Some(path) => with_manager(-1, |manager| manager.get_brightness(path)),
        None => -1,
    }
}

/// Maximum brightness, or -1 if `syspath` is not a device.
///
/// # Safety
///
/// `syspath` must be NULL or a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn backlight_get_max_brightness(syspath: *const c_char) -> c_int {
    match unsafe { path_arg(syspath) } {
        Some(path) => with_manager(-1, |manager| manager.get_max_brightness(path)),
        None => -1,
    }
}

/// Write `value` clamped to `[0, max_brightness]`. Returns 0 on success and
/// -1 on failure.
///
/// # Safety
///
/// `syspath` must be NULL or a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn backlight_set_brightness(syspath: *const c_char, value: c_int) -> c_int {
    match unsafe { path_arg(syspath) } {
        Some(path) => with_manager(-1, |manager| manager.set_brightness(path, value).map(|_| 0)),
        None => -1,
    }
}
