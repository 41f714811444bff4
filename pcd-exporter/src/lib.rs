pub mod error;
pub mod summary;
pub mod table;

pub use error::ExportError;
