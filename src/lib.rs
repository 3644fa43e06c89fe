//! # Formly
//!
//! Define forms from the command line, then fill them in with flags or
//! interactively. Every form is stored in SQLite together with its labels, and
//! every invocation of a form is recorded as a submission.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use formly::cli;
//! use formly::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data.db")?;
//! store.initialize()?;
//!
//! let args = vec!["read".to_string(), "--name=create".to_string()];
//! cli::run(&store, &args, &mut std::io::stdin().lock(), &mut std::io::stdout())?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod store;
pub mod submit;
pub mod types;
pub mod validation;
