use std::io::Write;

use tracing::info;

use super::target_form;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::submit::FormCommand;
use crate::types::Form;

pub(super) fn prepare<S: Store + ?Sized>(store: &S, cmd: &FormCommand) -> Result<Form> {
    let form = target_form(store, cmd, "name")?;
    if !form.deleteable {
        return Err(Error::Protected(form.name));
    }
    Ok(form)
}

/// Removes the form together with its labels, submissions and entries.
pub(super) fn apply<S, W>(store: &S, form: &Form, output: &mut W) -> Result<()>
where
    S: Store + ?Sized,
    W: Write + ?Sized,
{
    if !store.delete_form(form.id)? {
        return Err(Error::FormNotFound(form.name.clone()));
    }

    info!("Deleted form '{}'", form.name);
    writeln!(output, "deleted form '{}'", form.name)?;
    Ok(())
}
