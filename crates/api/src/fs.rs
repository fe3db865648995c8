use std::fmt::Debug;
use std::sync::Arc;

/// Naming rules of the file system generated artifacts end up on.
///
/// The model consults this when resource directories and files are declared,
/// and when deciding whether two class names would map onto the same file.
pub trait FileSystemConvention: Send + Sync + Debug {
    /// `true` if `Foo.java` and `FOO.java` are different files.
    fn is_case_sensitive(&self) -> bool;

    /// Check a single directory name. The name never contains a separator.
    fn is_valid_directory_name(&self, name: &str) -> bool;

    /// Check a single file name. The name never contains a separator.
    fn is_valid_file_name(&self, name: &str) -> bool;

    /// Check a `/`-separated relative directory path segment by segment.
    fn is_valid_directory_path(&self, path: &str) -> bool {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .all(|segment| self.is_valid_directory_name(segment))
    }
}

fn is_posix_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\0'])
}

const WINDOWS_FORBIDDEN: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const WINDOWS_RESERVED: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

fn is_windows_name(name: &str) -> bool {
    if !is_posix_name(name) || name.ends_with(['.', ' ']) {
        return false;
    }
    if name.chars().any(|c| c < ' ' || WINDOWS_FORBIDDEN.contains(&c)) {
        return false;
    }
    let stem = name.split('.').next().unwrap_or(name);
    !WINDOWS_RESERVED
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(stem))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxFileSystem;

impl FileSystemConvention for LinuxFileSystem {
    fn is_case_sensitive(&self) -> bool {
        true
    }

    fn is_valid_directory_name(&self, name: &str) -> bool {
        is_posix_name(name)
    }

    fn is_valid_file_name(&self, name: &str) -> bool {
        is_posix_name(name)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsFileSystem;

impl FileSystemConvention for WindowsFileSystem {
    fn is_case_sensitive(&self) -> bool {
        false
    }

    fn is_valid_directory_name(&self, name: &str) -> bool {
        is_windows_name(name)
    }

    fn is_valid_file_name(&self, name: &str) -> bool {
        is_windows_name(name)
    }
}

/// The intersection of the Linux and Windows rules: output that satisfies it
/// can be written on either platform unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnifiedFileSystem;

impl FileSystemConvention for UnifiedFileSystem {
    fn is_case_sensitive(&self) -> bool {
        false
    }

    fn is_valid_directory_name(&self, name: &str) -> bool {
        is_posix_name(name) && is_windows_name(name)
    }

    fn is_valid_file_name(&self, name: &str) -> bool {
        is_posix_name(name) && is_windows_name(name)
    }
}

/// The convention of the platform this binary was built for.
pub fn host_convention() -> Arc<dyn FileSystemConvention> {
    if cfg!(windows) {
        Arc::new(WindowsFileSystem)
    } else {
        Arc::new(LinuxFileSystem)
    }
}
