//! Concrete [`CodeWriter`](codemodel_api::CodeWriter) destinations.

pub mod archive;
pub mod file;
pub mod memory;
pub mod prologue;
pub mod single;

pub use archive::ZipCodeWriter;
pub use file::FileCodeWriter;
pub use memory::MemoryCodeWriter;
pub use prologue::PrologueCodeWriter;
pub use single::SingleStreamCodeWriter;
