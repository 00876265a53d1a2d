pub mod extract;
pub mod validation;

pub use extract::{ApiPath, ValidJson};
pub use validation::{FieldChecks, Validate};
