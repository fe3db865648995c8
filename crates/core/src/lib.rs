//! Java code model and import-optimizing source renderer.

pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod render;

pub use config::RenderConfig;
pub use error::{CodeModelError, Result};
pub use model::{ClassId, ClassKind, CodeModel, Modifiers, TypeRef};
pub use render::{BuildStats, ModelWriter, RenderedUnit};
