mod builtin;
mod models;

pub use builtin::*;
pub use models::*;
