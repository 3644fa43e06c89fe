use std::io::{BufRead, Write};

use tracing::debug;

use super::builder::{FlagSlot, FormCommand};
use crate::error::{Error, Result};
use crate::types::SEPARATOR;

/// How the slot values were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Flags,
    Interactive,
}

/// Fills every slot of `cmd`, from its flags when at least one was given, or
/// by prompting on `output` and reading `input` line by line otherwise.
pub fn collect<R, W>(cmd: &mut FormCommand, input: &mut R, output: &mut W) -> Result<InputMode>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    let matches = cmd.command().try_get_matches_from(cmd.args())?;

    let mut set = 0;
    for slot in cmd.slots_mut() {
        slot.value = match matches.get_one::<String>(&slot.name) {
            Some(value) => {
                set += 1;
                value.clone()
            }
            None => String::new(),
        };
    }

    // Every flag is checked before anything is prompted for or stored.
    if let Some(slot) = cmd
        .slots()
        .iter()
        .find(|s| !s.repeatable && s.value.contains(SEPARATOR))
    {
        return Err(Error::SeparatorMisuse(slot.name.clone()));
    }

    if set > 0 {
        return Ok(InputMode::Flags);
    }

    debug!(
        "No flags given for '{}', prompting for {} labels",
        cmd.form().name,
        cmd.slots().len()
    );
    for slot in cmd.slots_mut() {
        slot.value = prompt_slot(slot, input, output)?;
    }
    Ok(InputMode::Interactive)
}

fn prompt_slot<R, W>(slot: &FlagSlot, input: &mut R, output: &mut W) -> Result<String>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    let mut inputs = Vec::new();
    let mut line = String::new();

    loop {
        writeln!(output, "{}:", slot.name)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let txt = line.trim_end_matches(['\n', '\r']);

        if txt.contains(SEPARATOR) {
            continue;
        }
        if txt.is_empty() {
            break;
        }
        inputs.push(txt.to_string());
        if !slot.repeatable {
            break;
        }
    }

    Ok(inputs.join(SEPARATOR))
}
