use std::io::Write;

use super::target_form;
use crate::error::Result;
use crate::store::Store;
use crate::submit::{FormCommand, write_entry, write_submission_header};
use crate::types::Form;

pub(super) fn prepare<S: Store + ?Sized>(store: &S, cmd: &FormCommand) -> Result<Form> {
    target_form(store, cmd, "name")
}

/// Prints every submission of `form` oldest first, with its entries grouped by
/// label in position order.
pub fn print_submissions<S, W>(store: &S, form: &Form, output: &mut W) -> Result<()>
where
    S: Store + ?Sized,
    W: Write + ?Sized,
{
    let labels = store.list_labels(form.id)?;
    let submissions = store.list_submissions(form.id)?;

    writeln!(output, "reading submissions for {}", form.name)?;
    if submissions.is_empty() {
        writeln!(output, "no submissions for this form yet")?;
        return Ok(());
    }

    for submission in &submissions {
        write_submission_header(output, submission)?;
        for label in &labels {
            for entry in store.list_entries(submission.id, label.id)? {
                write_entry(output, &label.name, &entry.txt)?;
            }
        }
    }
    writeln!(output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::cli::{Session, run};
    use crate::error::Error;
    use crate::store::{FormStore, MemoryStore};

    fn run_args(store: &MemoryStore, args: &[&str], input: &str) -> Result<String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut output = Vec::new();
        let session = Session {
            input: &mut io::Cursor::new(input),
            output: &mut output,
            terminal: false,
        };
        run(store, &args, session)?;
        Ok(String::from_utf8(output).unwrap())
    }

    fn setup() -> MemoryStore {
        let store = MemoryStore::new();
        store.initialize().unwrap();
        run_args(
            &store,
            &[
                "create",
                "--name=groceries",
                "--usage=things to buy",
                r#"--labels=[{"Repeatable":true,"Name":"items","Usage":"one per item"},{"Name":"store","Usage":"where to buy"}]"#,
            ],
            "",
        )
        .unwrap();
        store
    }

    #[test]
    fn test_read_empty_form() {
        let store = setup();
        let output = run_args(&store, &["read", "--name=groceries"], "").unwrap();
        assert!(output.ends_with("reading submissions for groceries\nno submissions for this form yet\n"));
    }

    #[test]
    fn test_read_groups_entries_by_label() {
        let store = setup();
        run_args(&store, &["groceries", "--store=market", "--items=milk,/eggs"], "").unwrap();
        run_args(&store, &["groceries"], "bread\n\ncorner shop\n").unwrap();

        let mut output = Vec::new();
        let form = store.get_form_by_name("groceries").unwrap().unwrap();
        print_submissions(&store, &form, &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();

        let first = output.find("\titems: milk\n\titems: eggs\n\tstore: market\n").unwrap();
        let second = output.find("\titems: bread\n\tstore: corner shop\n").unwrap();
        assert!(first < second);
        assert_eq!(output.matches("submission(").count(), 2);
    }

    #[test]
    fn test_read_unknown_form() {
        let store = setup();
        let err = run_args(&store, &["read", "--name=nothing"], "").unwrap_err();
        assert!(matches!(err, Error::FormNotFound(ref name) if name == "nothing"));
    }

    #[test]
    fn test_read_builtin_shows_its_invocations() {
        let store = setup();
        let output = run_args(&store, &["read", "--name=create"], "").unwrap();
        assert!(output.contains("\tname: groceries\n"));
    }
}
