use crate::error::{ApiError, ApiResult};
use crate::fs::FileSystemConvention;
use crate::naming;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Directory an artifact is written to, relative to the writer's root.
///
/// Sources live in package directories (`org/example`); resources may also
/// live in plain directories that are not valid package names
/// (`META-INF/services`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputDir {
    path: String,
    package: Option<String>,
}

impl OutputDir {
    /// Directory of a package. The package name must already be valid.
    pub fn package(name: &str) -> ApiResult<Self> {
        if !naming::is_qualified_name(name) {
            return Err(ApiError::InvalidArgument(format!(
                "invalid package name: {name:?}"
            )));
        }
        Ok(Self {
            path: name.replace(naming::TYPE_SEPARATOR, "/"),
            package: Some(name.to_string()),
        })
    }

    /// A plain `/`-separated directory, validated against `convention`.
    pub fn resource(path: &str, convention: &dyn FileSystemConvention) -> ApiResult<Self> {
        if !convention.is_valid_directory_path(path) {
            return Err(ApiError::InvalidArgument(format!(
                "invalid resource directory: {path:?}"
            )));
        }
        let normalized = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        Ok(Self {
            path: normalized,
            package: None,
        })
    }

    /// The root directory (default package).
    pub fn root() -> Self {
        Self {
            path: String::new(),
            package: Some(String::new()),
        }
    }

    pub fn relative_path(&self) -> &str {
        &self.path
    }

    /// The dotted package name, if this directory is a package.
    pub fn package_name(&self) -> Option<&str> {
        self.package.as_deref()
    }

    /// `/`-separated path of a file inside this directory.
    pub fn file_path(&self, file_name: &str) -> String {
        if self.path.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", self.path, file_name)
        }
    }
}

impl fmt::Display for OutputDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package {
            Some(package) => write!(f, "package {package:?}"),
            None => write!(f, "directory {:?}", self.path),
        }
    }
}
