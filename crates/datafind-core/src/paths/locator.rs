//! Location of the module (executable or shared library) embedding this crate.
//!
//! The native probe asks the dynamic loader which module contains one of our
//! own functions, so the answer names whatever binary this code was linked
//! into rather than the process executable. OS-specific logic is kept private.

use std::path::PathBuf;

/// Finds the on-disk path of the module the resolver runs from.
///
/// Implementations never fail: `None` means the location is unknown, which
/// is a normal outcome on platforms without loader introspection.
#[cfg_attr(test, mockall::automock)]
pub trait ModuleLocator {
    /// Path of the module, if it can be determined.
    fn locate(&self) -> Option<PathBuf>;
}

/// Loader-backed locator (`dladdr` on Linux/macOS, `GetModuleHandleExW` on Windows).
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeModuleLocator;

impl ModuleLocator for NativeModuleLocator {
    fn locate(&self) -> Option<PathBuf> {
        module_location()
    }
}

/// Locator that always reports the same answer.
///
/// Useful for embedders that know where they were installed, and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedModuleLocator(pub Option<PathBuf>);

impl ModuleLocator for FixedModuleLocator {
    fn locate(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Path of the binary module containing this crate's code.
pub fn bin_location() -> Option<PathBuf> {
    NativeModuleLocator.locate()
}

/// The probe address is this function itself.
#[cfg(any(target_os = "linux", target_os = "macos"))]
#[allow(unsafe_code)]
fn module_location() -> Option<PathBuf> {
    use std::ffi::{CStr, OsStr};
    use std::mem::MaybeUninit;
    use std::os::unix::ffi::OsStrExt;

    let addr = (module_location as fn() -> Option<PathBuf>) as *const libc::c_void;
    let mut info = MaybeUninit::<libc::Dl_info>::zeroed();

    // SAFETY: dladdr only reads the address and writes into `info`.
    let found = unsafe { libc::dladdr(addr, info.as_mut_ptr()) };
    if found == 0 {
        return None;
    }

    // SAFETY: dladdr succeeded, so `info` was filled in; it was zeroed before.
    let info = unsafe { info.assume_init() };
    if info.dli_fname.is_null() {
        return None;
    }

    // SAFETY: dli_fname is a NUL-terminated string owned by the loader.
    let name = unsafe { CStr::from_ptr(info.dli_fname) };
    let bytes = name.to_bytes();
    if bytes.is_empty() {
        return None;
    }
    Some(PathBuf::from(OsStr::from_bytes(bytes)))
}

#[cfg(windows)]
#[allow(unsafe_code)]
fn module_location() -> Option<PathBuf> {
    use std::ffi::OsString;
    use std::os::windows::ffi::OsStringExt;

    use windows::Win32::Foundation::HMODULE;
    use windows::Win32::System::LibraryLoader::{
        GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS, GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
        GetModuleFileNameW, GetModuleHandleExW,
    };
    use windows::core::PCWSTR;

    let addr = (module_location as fn() -> Option<PathBuf>) as *const u16;
    let mut module = HMODULE::default();

    // SAFETY: with FROM_ADDRESS the "name" is only used as an address inside a module,
    // and UNCHANGED_REFCOUNT means no handle has to be released.
    unsafe {
        GetModuleHandleExW(
            GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS | GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
            PCWSTR(addr),
            &mut module,
        )
    }
    .ok()?;

    let mut buffer = vec![0u16; 4096];
    // SAFETY: the buffer is valid for its whole length.
    let len = unsafe { GetModuleFileNameW(module, &mut buffer) } as usize;
    if len == 0 || len >= buffer.len() {
        return None;
    }
    Some(PathBuf::from(OsString::from_wide(&buffer[..len])))
}

#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
const fn module_location() -> Option<PathBuf> {
    None
}
