use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub id: i64,
    pub name: String,
    pub usage: String,
    pub editable: bool,
    pub deleteable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: i64,
    pub form_id: i64,
    pub position: i64,
    pub repeatable: bool,
    pub name: String,
    pub usage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub form_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub submission_id: i64,
    pub label_id: i64,
    pub txt: String,
}

/// Label to be appended to a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLabel {
    pub form_id: i64,
    pub position: i64,
    pub repeatable: bool,
    pub name: String,
    pub usage: String,
}

/// Full replacement of a label's fields. Moving to a taken position swaps the
/// two labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelUpdate {
    pub form_id: i64,
    pub label_id: i64,
    pub position: i64,
    pub repeatable: bool,
    pub name: String,
    pub usage: String,
}

/// Label definition as accepted by the `labels` flag of `create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSpec {
    #[serde(default, alias = "Repeatable")]
    pub repeatable: bool,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Usage")]
    pub usage: String,
}
