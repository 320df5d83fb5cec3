mod structs;
pub mod validators;

pub use structs::*;
pub use validators::validate;
