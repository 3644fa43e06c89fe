pub const SCHEMA: &str = r#"
-- Forms are the templates users submit
CREATE TABLE IF NOT EXISTS forms (
    form_id INTEGER PRIMARY KEY AUTOINCREMENT,
    editable BOOL NOT NULL DEFAULT TRUE,
    deleteable BOOL NOT NULL DEFAULT TRUE,
    name TEXT UNIQUE NOT NULL CHECK(length(name) >= 1 AND length(name) <= 16 AND name NOT GLOB '*[^A-Za-z]*'),
    usage TEXT NOT NULL CHECK(length(usage) >= 5 AND length(usage) <= 252)
);

-- Labels are the ordered input fields of a form, one flag each
CREATE TABLE IF NOT EXISTS labels (
    label_id INTEGER PRIMARY KEY AUTOINCREMENT,
    form_id INTEGER NOT NULL,
    position INTEGER NOT NULL CHECK(position >= 1),
    repeatable BOOL NOT NULL DEFAULT FALSE,
    name TEXT NOT NULL CHECK(length(name) >= 1 AND length(name) <= 16 AND name NOT GLOB '*[^A-Za-z]*'),
    usage TEXT NOT NULL CHECK(length(usage) >= 5 AND length(usage) <= 252),
    FOREIGN KEY (form_id) REFERENCES forms (form_id) ON UPDATE CASCADE ON DELETE CASCADE,
    UNIQUE(form_id, name)
);

CREATE TABLE IF NOT EXISTS submissions (
    submission_id INTEGER PRIMARY KEY AUTOINCREMENT,
    form_id INTEGER NOT NULL,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (form_id) REFERENCES forms (form_id) ON UPDATE CASCADE ON DELETE CASCADE
);

-- One row per captured value; repeatable labels produce several rows
CREATE TABLE IF NOT EXISTS entries (
    entry_id INTEGER PRIMARY KEY AUTOINCREMENT,
    submission_id INTEGER NOT NULL,
    label_id INTEGER NOT NULL,
    txt TEXT NOT NULL,
    FOREIGN KEY (label_id) REFERENCES labels (label_id) ON UPDATE CASCADE ON DELETE CASCADE,
    FOREIGN KEY (submission_id) REFERENCES submissions (submission_id) ON UPDATE CASCADE ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_labels_form ON labels(form_id, position);
CREATE INDEX IF NOT EXISTS idx_submissions_form ON submissions(form_id);
CREATE INDEX IF NOT EXISTS idx_entries_submission ON entries(submission_id, label_id);
"#;

pub const SEED_FORM: &str = "
INSERT INTO forms (name, usage, editable, deleteable)
SELECT ?1, ?2, FALSE, FALSE
WHERE NOT EXISTS (SELECT 1 FROM forms WHERE name = ?1)";

pub const SEED_LABEL: &str = "
INSERT INTO labels (form_id, position, repeatable, name, usage)
SELECT f.form_id, ?2, FALSE, ?3, ?4 FROM forms f
WHERE f.name = ?1
  AND NOT EXISTS (
      SELECT 1 FROM labels l WHERE l.form_id = f.form_id AND l.name = ?3
  )";
