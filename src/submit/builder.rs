use clap::{Arg, ArgAction, Command};
use tracing::debug;

use crate::error::{Error, Result};
use crate::store::{FormStore, LabelStore};
use crate::types::{Form, Label};

/// One bound flag. Slots keep their label's position order, so a slot's index
/// identifies its label for the rest of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSlot {
    pub label_id: i64,
    pub repeatable: bool,
    pub name: String,
    pub usage: String,
    pub value: String,
}

impl From<&Label> for FlagSlot {
    fn from(label: &Label) -> Self {
        Self {
            label_id: label.id,
            repeatable: label.repeatable,
            name: label.name.clone(),
            usage: label.usage.clone(),
            value: String::new(),
        }
    }
}

/// A form resolved from storage together with its flag slots and the raw
/// arguments that followed the form name.
#[derive(Debug, Clone)]
pub struct FormCommand {
    form: Form,
    slots: Vec<FlagSlot>,
    args: Vec<String>,
}

impl FormCommand {
    /// Resolves `raw_args[0]` to a form and binds one slot per label.
    pub fn load<S>(store: &S, raw_args: &[String]) -> Result<Self>
    where
        S: FormStore + LabelStore + ?Sized,
    {
        let (name, args) = raw_args.split_first().ok_or(Error::NoArguments)?;
        let form = store
            .get_form_by_name(name)?
            .ok_or_else(|| Error::FormNotFound(name.clone()))?;
        let labels = store.list_labels(form.id)?;

        debug!("Loaded form '{}' with {} labels", form.name, labels.len());
        Ok(Self::new(form, labels, args.to_vec()))
    }

    #[must_use]
    pub fn new(form: Form, mut labels: Vec<Label>, args: Vec<String>) -> Self {
        labels.sort_by_key(|l| l.position);
        Self {
            form,
            slots: labels.iter().map(FlagSlot::from).collect(),
            args,
        }
    }

    #[must_use]
    pub fn form(&self) -> &Form {
        &self.form
    }

    #[must_use]
    pub fn slots(&self) -> &[FlagSlot] {
        &self.slots
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [FlagSlot] {
        &mut self.slots
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Collected value of the slot named `name`, empty if unset or unknown.
    #[must_use]
    pub fn value(&self, name: &str) -> &str {
        self.slots
            .iter()
            .find(|s| s.name == name)
            .map_or("", |s| s.value.as_str())
    }

    /// Builds the flag parser: one string-valued `--<label>` per slot, in slot
    /// order, with the label usage as help text. A repeated flag keeps its last
    /// value.
    #[must_use]
    pub fn command(&self) -> Command {
        let mut command = Command::new(self.form.name.clone())
            .about(self.form.usage.clone())
            .no_binary_name(true)
            .args_override_self(true);

        for slot in &self.slots {
            command = command.arg(
                Arg::new(slot.name.clone())
                    .long(slot.name.clone())
                    .help(slot.usage.clone())
                    .value_name("VALUE")
                    .num_args(1)
                    .allow_hyphen_values(true)
                    .action(ArgAction::Set),
            );
        }
        command
    }
}
