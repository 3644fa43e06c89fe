use std::io::Write;

use tracing::info;

use super::builder::FormCommand;
use crate::error::Result;
use crate::store::{EntryStore, SubmissionStore};
use crate::types::{Entry, SEPARATOR, Submission};

#[derive(Debug, Clone)]
pub struct Committed {
    pub submission: Submission,
    pub entries: Vec<Entry>,
}

/// Stores one submission for the command's form, then one entry per non-empty
/// value in slot order, writing each entry to `output` as soon as it is stored.
///
/// Entries are stored one statement at a time: if one fails, the submission and
/// the entries already reported stay in the store.
pub fn commit<S, W>(store: &S, cmd: &FormCommand, output: &mut W) -> Result<Committed>
where
    S: SubmissionStore + EntryStore + ?Sized,
    W: Write + ?Sized,
{
    let submission = store.create_submission(cmd.form().id)?;
    write_submission_header(output, &submission)?;

    let mut entries = Vec::new();
    for slot in cmd.slots() {
        for txt in slot.value.split(SEPARATOR).filter(|piece| !piece.is_empty()) {
            let entry = store.create_entry(submission.id, slot.label_id, txt)?;
            write_entry(output, &slot.name, &entry.txt)?;
            entries.push(entry);
        }
    }
    writeln!(output)?;

    info!(
        "Committed submission {} of '{}' with {} entries",
        submission.id,
        cmd.form().name,
        entries.len()
    );
    Ok(Committed {
        submission,
        entries,
    })
}

pub fn write_submission_header<W: Write + ?Sized>(
    output: &mut W,
    submission: &Submission,
) -> std::io::Result<()> {
    writeln!(
        output,
        "\nsubmission({}) time:{}",
        submission.id,
        submission.created_at.format("%Y-%m-%d %H:%M:%S")
    )
}

pub fn write_entry<W: Write + ?Sized>(output: &mut W, label: &str, txt: &str) -> std::io::Result<()> {
    writeln!(output, "\t{label}: {txt}")
}
