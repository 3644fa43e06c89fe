use std::io::Write;

use tracing::info;

use super::{ensure_editable, or_current, target_form};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::submit::FormCommand;
use crate::types::Form;
use crate::validation::{validate_name, validate_usage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateForm {
    pub form: Form,
    pub name: String,
    pub usage: String,
}

pub(super) fn prepare<S: Store + ?Sized>(store: &S, cmd: &FormCommand) -> Result<UpdateForm> {
    let form = target_form(store, cmd, "form")?;
    ensure_editable(&form)?;

    let name = or_current(cmd.value("name"), &form.name).to_string();
    let usage = or_current(cmd.value("usage"), &form.usage).to_string();
    validate_name(&name)?;
    validate_usage(&usage)?;

    if name != form.name && store.get_form_by_name(&name)?.is_some() {
        return Err(Error::AlreadyExists(name));
    }

    Ok(UpdateForm { form, name, usage })
}

impl UpdateForm {
    pub fn apply<S, W>(self, store: &S, output: &mut W) -> Result<()>
    where
        S: Store + ?Sized,
        W: Write + ?Sized,
    {
        let updated = store.update_form(self.form.id, &self.name, &self.usage)?;

        info!("Updated form '{}' as '{}'", self.form.name, updated.name);
        writeln!(output, "updated form '{}'", updated.name)?;
        Ok(())
    }
}
