use std::sync::{Mutex, MutexGuard};

use chrono::{SubsecRound, Utc};

use super::{EntryStore, FormStore, LabelStore, Store, SubmissionStore, plan_label_update};
use crate::error::{Error, Result};
use crate::types::*;
use crate::validation::{validate_name, validate_usage};

#[derive(Default)]
struct Tables {
    next_id: i64,
    forms: Vec<Form>,
    labels: Vec<Label>,
    submissions: Vec<Submission>,
    entries: Vec<Entry>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn form(&self, id: i64) -> Option<&Form> {
        self.forms.iter().find(|f| f.id == id)
    }

    fn labels_of(&self, form_id: i64) -> Vec<Label> {
        let mut labels: Vec<Label> = self
            .labels
            .iter()
            .filter(|l| l.form_id == form_id)
            .cloned()
            .collect();
        labels.sort_by_key(|l| l.position);
        labels
    }

    fn insert_form(&mut self, name: &str, usage: &str, builtin: bool) -> Result<Form> {
        if self.forms.iter().any(|f| f.name == name) {
            return Err(Error::AlreadyExists(name.to_string()));
        }
        let form = Form {
            id: self.next_id(),
            name: name.to_string(),
            usage: usage.to_string(),
            editable: !builtin,
            deleteable: !builtin,
        };
        self.forms.push(form.clone());
        Ok(form)
    }

    fn insert_label(&mut self, label: &NewLabel) -> Result<Label> {
        if self.form(label.form_id).is_none() {
            return Err(Error::NotFound(format!("form {}", label.form_id)));
        }
        let siblings = self.labels_of(label.form_id);
        let count = siblings.len() as i64;
        if label.position != count + 1 {
            return Err(Error::InvalidPosition {
                position: label.position,
                max: count + 1,
            });
        }
        if siblings.iter().any(|l| l.name == label.name) {
            return Err(Error::AlreadyExists(label.name.clone()));
        }

        let created = Label {
            id: self.next_id(),
            form_id: label.form_id,
            position: label.position,
            repeatable: label.repeatable,
            name: label.name.clone(),
            usage: label.usage.clone(),
        };
        self.labels.push(created.clone());
        Ok(created)
    }
}

/// Store kept entirely in memory, enforcing the same validation and referential
/// rules as the SQLite schema. Deleting a form cascades to its labels,
/// submissions and entries.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Store for MemoryStore {
    fn initialize(&self) -> Result<()> {
        let mut tables = self.tables();
        for builtin in BUILTIN_FORMS {
            let existing = tables
                .forms
                .iter()
                .find(|f| f.name == builtin.name)
                .cloned();
            let form = match existing {
                Some(form) => form,
                None => tables.insert_form(builtin.name, builtin.usage, true)?,
            };
            for (i, label) in builtin.labels.iter().enumerate() {
                if tables
                    .labels
                    .iter()
                    .any(|l| l.form_id == form.id && l.name == label.name)
                {
                    continue;
                }
                tables.insert_label(&NewLabel {
                    form_id: form.id,
                    position: i as i64 + 1,
                    repeatable: false,
                    name: label.name.to_string(),
                    usage: label.usage.to_string(),
                })?;
            }
        }
        Ok(())
    }
}

impl FormStore for MemoryStore {
    fn create_form(&self, name: &str, usage: &str) -> Result<Form> {
        validate_name(name)?;
        validate_usage(usage)?;
        self.tables().insert_form(name, usage, false)
    }

    fn get_form(&self, id: i64) -> Result<Option<Form>> {
        Ok(self.tables().form(id).cloned())
    }

    fn get_form_by_name(&self, name: &str) -> Result<Option<Form>> {
        Ok(self.tables().forms.iter().find(|f| f.name == name).cloned())
    }

    fn list_forms(&self) -> Result<Vec<Form>> {
        Ok(self.tables().forms.clone())
    }

    fn update_form(&self, id: i64, name: &str, usage: &str) -> Result<Form> {
        validate_name(name)?;
        validate_usage(usage)?;

        let mut tables = self.tables();
        if tables.forms.iter().any(|f| f.id != id && f.name == name) {
            return Err(Error::AlreadyExists(name.to_string()));
        }
        let form = tables
            .forms
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| Error::NotFound(format!("form {id}")))?;
        form.name = name.to_string();
        form.usage = usage.to_string();
        Ok(form.clone())
    }

    fn delete_form(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables();
        let before = tables.forms.len();
        tables.forms.retain(|f| f.id != id);
        if tables.forms.len() == before {
            return Ok(false);
        }

        tables.labels.retain(|l| l.form_id != id);
        tables.submissions.retain(|s| s.form_id != id);
        let Tables {
            labels,
            submissions,
            entries,
            ..
        } = &mut *tables;
        entries.retain(|e| {
            submissions.iter().any(|s| s.id == e.submission_id)
                && labels.iter().any(|l| l.id == e.label_id)
        });
        Ok(true)
    }
}

impl LabelStore for MemoryStore {
    fn create_label(&self, label: &NewLabel) -> Result<Label> {
        validate_name(&label.name)?;
        validate_usage(&label.usage)?;
        self.tables().insert_label(label)
    }

    fn list_labels(&self, form_id: i64) -> Result<Vec<Label>> {
        let tables = self.tables();
        if tables.form(form_id).is_none() {
            return Err(Error::NotFound(format!("form {form_id}")));
        }
        Ok(tables.labels_of(form_id))
    }

    fn update_label(&self, update: &LabelUpdate) -> Result<Vec<Label>> {
        validate_name(&update.name)?;
        validate_usage(&update.usage)?;

        let mut tables = self.tables();
        let current = tables.labels_of(update.form_id);
        let (updating, swap) = plan_label_update(&current, update)?;

        let mut changed = Vec::with_capacity(2);
        for label in tables.labels.iter_mut() {
            if label.id == updating.id {
                label.name = update.name.clone();
                label.usage = update.usage.clone();
                label.repeatable = update.repeatable;
                label.position = update.position;
                changed.insert(0, label.clone());
            } else if label.id == swap.id {
                label.position = updating.position;
                changed.push(label.clone());
            }
        }
        Ok(changed)
    }
}

impl SubmissionStore for MemoryStore {
    fn create_submission(&self, form_id: i64) -> Result<Submission> {
        let mut tables = self.tables();
        if tables.form(form_id).is_none() {
            return Err(Error::NotFound(format!("form {form_id}")));
        }
        let submission = Submission {
            id: tables.next_id(),
            form_id,
            created_at: Utc::now().trunc_subsecs(0),
        };
        tables.submissions.push(submission.clone());
        Ok(submission)
    }

    fn list_submissions(&self, form_id: i64) -> Result<Vec<Submission>> {
        let tables = self.tables();
        if tables.form(form_id).is_none() {
            return Err(Error::NotFound(format!("form {form_id}")));
        }
        Ok(tables
            .submissions
            .iter()
            .filter(|s| s.form_id == form_id)
            .cloned()
            .collect())
    }
}

impl EntryStore for MemoryStore {
    fn create_entry(&self, submission_id: i64, label_id: i64, txt: &str) -> Result<Entry> {
        let mut tables = self.tables();
        let known_submission = tables.submissions.iter().any(|s| s.id == submission_id);
        let known_label = tables.labels.iter().any(|l| l.id == label_id);
        if !known_submission || !known_label {
            return Err(Error::NotFound(format!(
                "submission {submission_id} or label {label_id}"
            )));
        }
        let entry = Entry {
            id: tables.next_id(),
            submission_id,
            label_id,
            txt: txt.to_string(),
        };
        tables.entries.push(entry.clone());
        Ok(entry)
    }

    fn list_entries(&self, submission_id: i64, label_id: i64) -> Result<Vec<Entry>> {
        Ok(self
            .tables()
            .entries
            .iter()
            .filter(|e| e.submission_id == submission_id && e.label_id == label_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_seeds_builtins_once() {
        let store = MemoryStore::new();
        store.initialize().unwrap();
        store.initialize().unwrap();

        let forms = store.list_forms().unwrap();
        assert_eq!(forms.len(), BUILTIN_FORMS.len());
        let read = store.get_form_by_name("read").unwrap().unwrap();
        assert_eq!(store.list_labels(read.id).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_form_cascades() {
        let store = MemoryStore::new();
        let form = store.create_form("first", "first test form").unwrap();
        let label = store
            .create_label(&NewLabel {
                form_id: form.id,
                position: 1,
                repeatable: true,
                name: "items".to_string(),
                usage: "list of items".to_string(),
            })
            .unwrap();
        let submission = store.create_submission(form.id).unwrap();
        store.create_entry(submission.id, label.id, "a").unwrap();

        assert!(store.delete_form(form.id).unwrap());
        assert!(store.list_entries(submission.id, label.id).unwrap().is_empty());
        assert!(matches!(
            store.create_submission(form.id),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_update_label_swaps_positions() {
        let store = MemoryStore::new();
        let form = store.create_form("first", "first test form").unwrap();
        let mut ids = Vec::new();
        for (i, name) in ["alpha", "beta", "gamma"].into_iter().enumerate() {
            let label = store
                .create_label(&NewLabel {
                    form_id: form.id,
                    position: i as i64 + 1,
                    repeatable: false,
                    name: name.to_string(),
                    usage: format!("usage of {name}"),
                })
                .unwrap();
            ids.push(label.id);
        }

        let changed = store
            .update_label(&LabelUpdate {
                form_id: form.id,
                label_id: ids[2],
                position: 1,
                repeatable: false,
                name: "gamma".to_string(),
                usage: "usage of gamma".to_string(),
            })
            .unwrap();
        assert_eq!(changed[0].id, ids[2]);
        assert_eq!(changed[1].id, ids[0]);
        assert_eq!(changed[1].position, 3);

        let names: Vec<String> = store
            .list_labels(form.id)
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, ["gamma", "beta", "alpha"]);
    }
}
