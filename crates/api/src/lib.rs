//! Leaf contracts shared by the code model, its renderer and its writers.

pub mod encoding;
pub mod error;
pub mod fs;
pub mod naming;
pub mod output;
pub mod writer;

// Re-export commonly used types
pub use encoding::Encoding;
pub use error::{ApiError, ApiResult};
pub use fs::{FileSystemConvention, LinuxFileSystem, UnifiedFileSystem, WindowsFileSystem};
pub use naming::{is_identifier, is_qualified_name};
pub use output::OutputDir;
pub use writer::{BinarySink, CodeWriter, TextSink};
