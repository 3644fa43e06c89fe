use std::collections::HashSet;
use std::io::Write;

use tracing::info;

use super::validate_label_name;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::submit::FormCommand;
use crate::types::{LabelSpec, NewLabel};
use crate::validation::{validate_name, validate_usage};

/// A validated `create` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateForm {
    pub name: String,
    pub usage: String,
    pub labels: Vec<LabelSpec>,
}

/// Parses the `labels` JSON array. Empty input means no labels.
pub fn parse_label_specs(raw: &str) -> Result<Vec<LabelSpec>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let specs: Vec<LabelSpec> = serde_json::from_str(raw)?;
    let mut seen = HashSet::new();
    for spec in &specs {
        validate_label_name(&spec.name)?;
        validate_usage(&spec.usage)?;
        if !seen.insert(spec.name.as_str()) {
            return Err(Error::DuplicateLabel(spec.name.clone()));
        }
    }
    Ok(specs)
}

pub(super) fn prepare<S: Store + ?Sized>(store: &S, cmd: &FormCommand) -> Result<CreateForm> {
    let name = cmd.value("name");
    let usage = cmd.value("usage");
    validate_name(name)?;
    validate_usage(usage)?;
    let labels = parse_label_specs(cmd.value("labels"))?;

    if store.get_form_by_name(name)?.is_some() {
        return Err(Error::AlreadyExists(name.to_string()));
    }

    Ok(CreateForm {
        name: name.to_string(),
        usage: usage.to_string(),
        labels,
    })
}

impl CreateForm {
    pub fn apply<S, W>(self, store: &S, output: &mut W) -> Result<()>
    where
        S: Store + ?Sized,
        W: Write + ?Sized,
    {
        let form = store.create_form(&self.name, &self.usage)?;
        for (i, spec) in self.labels.into_iter().enumerate() {
            store.create_label(&NewLabel {
                form_id: form.id,
                position: i as i64 + 1,
                repeatable: spec.repeatable,
                name: spec.name,
                usage: spec.usage,
            })?;
        }

        info!("Created form '{}'", form.name);
        writeln!(output, "created form '{}'", form.name)?;
        Ok(())
    }
}
