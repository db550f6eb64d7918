pub mod error;
pub mod format;
pub mod io;
pub mod manager;
pub mod merge;
pub mod model;

pub use error::{ErrorKind, ReportError, Result};
