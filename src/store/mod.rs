mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Form operations.
pub trait FormStore {
    fn create_form(&self, name: &str, usage: &str) -> Result<Form>;
    fn get_form(&self, id: i64) -> Result<Option<Form>>;
    fn get_form_by_name(&self, name: &str) -> Result<Option<Form>>;
    fn list_forms(&self) -> Result<Vec<Form>>;
    fn update_form(&self, id: i64, name: &str, usage: &str) -> Result<Form>;
    fn delete_form(&self, id: i64) -> Result<bool>;
}

/// Label operations. Labels are always returned in position order.
pub trait LabelStore {
    /// Appends a label. `position` must be the current label count + 1.
    fn create_label(&self, label: &NewLabel) -> Result<Label>;
    fn list_labels(&self, form_id: i64) -> Result<Vec<Label>>;
    /// Returns every label whose row changed: the updated one, then the one it
    /// swapped positions with, if any.
    fn update_label(&self, update: &LabelUpdate) -> Result<Vec<Label>>;
}

pub trait SubmissionStore {
    fn create_submission(&self, form_id: i64) -> Result<Submission>;
    fn list_submissions(&self, form_id: i64) -> Result<Vec<Submission>>;
}

pub trait EntryStore {
    fn create_entry(&self, submission_id: i64, label_id: i64, txt: &str) -> Result<Entry>;
    fn list_entries(&self, submission_id: i64, label_id: i64) -> Result<Vec<Entry>>;
}

/// Store defines the full storage interface.
pub trait Store: FormStore + LabelStore + SubmissionStore + EntryStore {
    /// Creates the schema and seeds the built-in forms. Safe to call repeatedly.
    fn initialize(&self) -> Result<()>;
}

/// Checks a label update against the form's current labels and returns the
/// label being updated plus the one occupying the target position.
fn plan_label_update(labels: &[Label], update: &LabelUpdate) -> Result<(Label, Label)> {
    use crate::error::Error;

    let max = labels.len() as i64;
    if update.position < 1 || update.position > max {
        return Err(Error::InvalidPosition {
            position: update.position,
            max,
        });
    }

    let mut updating = None;
    let mut swap = None;
    for label in labels {
        if label.id == update.label_id {
            updating = Some(label.clone());
        } else if label.name == update.name {
            return Err(Error::AlreadyExists(update.name.clone()));
        }
        if label.position == update.position {
            swap = Some(label.clone());
        }
    }

    let updating =
        updating.ok_or_else(|| Error::NotFound(format!("label {}", update.label_id)))?;
    let swap = swap.ok_or_else(|| Error::NotFound(format!("position {}", update.position)))?;
    Ok((updating, swap))
}
