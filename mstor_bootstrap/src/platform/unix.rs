//! POSIX implementation: `libc::sysconf`/`geteuid` for the facts `main`
//! wants at startup.

use std::path::PathBuf;

use super::Platform;

pub struct UnixPlatform;

impl UnixPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnixPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for UnixPlatform {
    fn cpu_count(&self) -> usize {
        unsafe {
            let count = libc::sysconf(libc::_SC_NPROCESSORS_ONLN);
            if count > 0 {
                count as usize
            } else {
                1
            }
        }
    }

    fn is_elevated(&self) -> bool {
        unsafe { libc::geteuid() == 0 }
    }

    fn platform_name(&self) -> &'static str {
        #[cfg(target_os = "linux")]
        {
            "linux"
        }
        #[cfg(target_os = "macos")]
        {
            "macos"
        }
        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            "unix"
        }
    }

    fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_count_is_at_least_one() {
        assert!(UnixPlatform::new().cpu_count() >= 1);
    }

    #[test]
    fn platform_name_is_recognized() {
        let name = UnixPlatform::new().platform_name();
        assert!(name == "linux" || name == "macos" || name == "unix");
    }

    #[test]
    fn temp_dir_exists() {
        assert!(UnixPlatform::new().temp_dir().exists());
    }
}
