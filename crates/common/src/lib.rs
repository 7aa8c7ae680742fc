pub mod error;
pub mod identifier;
pub mod scan;

pub use error::{Error, Result};
pub use identifier::Identifier;
pub use scan::ScanRecord;
