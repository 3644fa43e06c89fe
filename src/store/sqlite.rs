use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use super::schema::{SCHEMA, SEED_FORM, SEED_LABEL};
use super::{EntryStore, FormStore, LabelStore, Store, SubmissionStore, plan_label_update};
use crate::error::{Error, Result};
use crate::types::*;
use crate::validation::{validate_name, validate_usage};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // SQLite's CURRENT_TIMESTAMP format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn form_from_row(row: &Row<'_>) -> rusqlite::Result<Form> {
    Ok(Form {
        id: row.get(0)?,
        name: row.get(1)?,
        usage: row.get(2)?,
        editable: row.get(3)?,
        deleteable: row.get(4)?,
    })
}

fn label_from_row(row: &Row<'_>) -> rusqlite::Result<Label> {
    Ok(Label {
        id: row.get(0)?,
        form_id: row.get(1)?,
        position: row.get(2)?,
        repeatable: row.get(3)?,
        name: row.get(4)?,
        usage: row.get(5)?,
    })
}

fn submission_from_row(row: &Row<'_>) -> rusqlite::Result<Submission> {
    Ok(Submission {
        id: row.get(0)?,
        form_id: row.get(1)?,
        created_at: parse_datetime(&row.get::<_, String>(2)?),
    })
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        submission_id: row.get(1)?,
        label_id: row.get(2)?,
        txt: row.get(3)?,
    })
}

const FORM_COLUMNS: &str = "form_id, name, usage, editable, deleteable";
const LABEL_COLUMNS: &str = "label_id, form_id, position, repeatable, name, usage";

fn query_labels(conn: &Connection, form_id: i64) -> Result<Vec<Label>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LABEL_COLUMNS} FROM labels WHERE form_id = ?1 ORDER BY position ASC"
    ))?;
    let rows = stmt.query_map(params![form_id], label_from_row)?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::from)
}

fn form_exists(conn: &Connection, form_id: i64) -> Result<bool> {
    conn.query_row(
        "SELECT 1 FROM forms WHERE form_id = ?1",
        params![form_id],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
    .map_err(Error::from)
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        let mut conn = self.conn();
        conn.execute_batch(SCHEMA)?;

        let tx = conn.transaction()?;
        for form in BUILTIN_FORMS {
            let inserted = tx.execute(SEED_FORM, params![form.name, form.usage])?;
            if inserted > 0 {
                debug!("Seeded built-in form '{}'", form.name);
            }
            for (i, label) in form.labels.iter().enumerate() {
                tx.execute(
                    SEED_LABEL,
                    params![form.name, i as i64 + 1, label.name, label.usage],
                )?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl FormStore for SqliteStore {
    fn create_form(&self, name: &str, usage: &str) -> Result<Form> {
        validate_name(name)?;
        validate_usage(usage)?;

        let result = self.conn().query_row(
            &format!("INSERT INTO forms (name, usage) VALUES (?1, ?2) RETURNING {FORM_COLUMNS}"),
            params![name, usage],
            form_from_row,
        );

        match result {
            Ok(form) => Ok(form),
            Err(e) if is_constraint_violation(&e) => Err(Error::AlreadyExists(name.to_string())),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_form(&self, id: i64) -> Result<Option<Form>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {FORM_COLUMNS} FROM forms WHERE form_id = ?1"),
            params![id],
            form_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_form_by_name(&self, name: &str) -> Result<Option<Form>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {FORM_COLUMNS} FROM forms WHERE name = ?1"),
            params![name],
            form_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_forms(&self) -> Result<Vec<Form>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {FORM_COLUMNS} FROM forms ORDER BY form_id"
        ))?;
        let rows = stmt.query_map([], form_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_form(&self, id: i64, name: &str, usage: &str) -> Result<Form> {
        validate_name(name)?;
        validate_usage(usage)?;

        let result = self.conn().query_row(
            &format!(
                "UPDATE forms SET name = ?1, usage = ?2 WHERE form_id = ?3 RETURNING {FORM_COLUMNS}"
            ),
            params![name, usage, id],
            form_from_row,
        );

        match result {
            Ok(form) => Ok(form),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::NotFound(format!("form {id}"))),
            Err(e) if is_constraint_violation(&e) => Err(Error::AlreadyExists(name.to_string())),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn delete_form(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM forms WHERE form_id = ?1", params![id])?;
        Ok(rows > 0)
    }
}

impl LabelStore for SqliteStore {
    fn create_label(&self, label: &NewLabel) -> Result<Label> {
        validate_name(&label.name)?;
        validate_usage(&label.usage)?;

        let mut conn = self.conn();
        let tx = conn.transaction()?;

        if !form_exists(&tx, label.form_id)? {
            return Err(Error::NotFound(format!("form {}", label.form_id)));
        }

        let count: i64 = tx.query_row(
            "SELECT COUNT(*) FROM labels WHERE form_id = ?1",
            params![label.form_id],
            |row| row.get(0),
        )?;
        if label.position != count + 1 {
            return Err(Error::InvalidPosition {
                position: label.position,
                max: count + 1,
            });
        }

        let result = tx.query_row(
            &format!(
                "INSERT INTO labels (form_id, position, repeatable, name, usage)
                 VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {LABEL_COLUMNS}"
            ),
            params![
                label.form_id,
                label.position,
                label.repeatable,
                label.name,
                label.usage,
            ],
            label_from_row,
        );

        let created = match result {
            Ok(created) => created,
            Err(e) if is_constraint_violation(&e) => {
                return Err(Error::AlreadyExists(label.name.clone()));
            }
            Err(e) => return Err(Error::from(e)),
        };

        tx.commit()?;
        Ok(created)
    }

    fn list_labels(&self, form_id: i64) -> Result<Vec<Label>> {
        let conn = self.conn();
        if !form_exists(&conn, form_id)? {
            return Err(Error::NotFound(format!("form {form_id}")));
        }
        query_labels(&conn, form_id)
    }

    fn update_label(&self, update: &LabelUpdate) -> Result<Vec<Label>> {
        validate_name(&update.name)?;
        validate_usage(&update.usage)?;

        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let labels = query_labels(&tx, update.form_id)?;
        let (mut updating, mut swap) = plan_label_update(&labels, update)?;

        tx.execute(
            "UPDATE labels SET name = ?1, usage = ?2, repeatable = ?3, position = ?4
             WHERE label_id = ?5",
            params![
                update.name,
                update.usage,
                update.repeatable,
                update.position,
                update.label_id,
            ],
        )?;

        let mut changed = Vec::with_capacity(2);
        if swap.id != updating.id {
            tx.execute(
                "UPDATE labels SET position = ?1 WHERE label_id = ?2",
                params![updating.position, swap.id],
            )?;
            swap.position = updating.position;
        }
        tx.commit()?;

        updating.name = update.name.clone();
        updating.usage = update.usage.clone();
        updating.repeatable = update.repeatable;
        updating.position = update.position;
        let swapped = swap.id != updating.id;
        changed.push(updating);
        if swapped {
            changed.push(swap);
        }
        Ok(changed)
    }
}

impl SubmissionStore for SqliteStore {
    fn create_submission(&self, form_id: i64) -> Result<Submission> {
        let conn = self.conn();
        if !form_exists(&conn, form_id)? {
            return Err(Error::NotFound(format!("form {form_id}")));
        }

        let submission = conn.query_row(
            "INSERT INTO submissions (form_id) VALUES (?1)
             RETURNING submission_id, form_id, created_at",
            params![form_id],
            submission_from_row,
        )?;
        debug!("Created submission {} for form {}", submission.id, form_id);
        Ok(submission)
    }

    fn list_submissions(&self, form_id: i64) -> Result<Vec<Submission>> {
        let conn = self.conn();
        if !form_exists(&conn, form_id)? {
            return Err(Error::NotFound(format!("form {form_id}")));
        }

        let mut stmt = conn.prepare(
            "SELECT submission_id, form_id, created_at FROM submissions
             WHERE form_id = ?1 ORDER BY created_at ASC, submission_id ASC",
        )?;
        let rows = stmt.query_map(params![form_id], submission_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}

impl EntryStore for SqliteStore {
    fn create_entry(&self, submission_id: i64, label_id: i64, txt: &str) -> Result<Entry> {
        let result = self.conn().query_row(
            "INSERT INTO entries (submission_id, label_id, txt) VALUES (?1, ?2, ?3)
             RETURNING entry_id, submission_id, label_id, txt",
            params![submission_id, label_id, txt],
            entry_from_row,
        );

        match result {
            Ok(entry) => Ok(entry),
            Err(e) if is_constraint_violation(&e) => Err(Error::NotFound(format!(
                "submission {submission_id} or label {label_id}"
            ))),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn list_entries(&self, submission_id: i64, label_id: i64) -> Result<Vec<Entry>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT entry_id, submission_id, label_id, txt FROM entries
             WHERE submission_id = ?1 AND label_id = ?2 ORDER BY entry_id ASC",
        )?;
        let rows = stmt.query_map(params![submission_id, label_id], entry_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}
