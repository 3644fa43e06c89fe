//! The submit pipeline: resolve a form and bind its flags, collect values from
//! flags or prompts, then commit a submission with its entries.

mod builder;
mod collector;
mod committer;

pub use builder::{FlagSlot, FormCommand};
pub use collector::{InputMode, collect};
pub use committer::{Committed, commit, write_entry, write_submission_header};
