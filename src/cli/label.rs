use std::io::Write;

use tracing::info;

use super::{ensure_editable, or_current, parse_bool, target_form, validate_label_name};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::submit::FormCommand;
use crate::types::{LabelUpdate, NewLabel};
use crate::validation::{validate_name, validate_usage};

pub(super) fn prepare_label<S: Store + ?Sized>(store: &S, cmd: &FormCommand) -> Result<NewLabel> {
    let form = target_form(store, cmd, "form")?;
    ensure_editable(&form)?;

    let name = cmd.value("name");
    let usage = cmd.value("usage");
    validate_label_name(name)?;
    validate_usage(usage)?;
    let repeatable = parse_bool(cmd.value("repeatable"), false)?;

    let labels = store.list_labels(form.id)?;
    if labels.iter().any(|l| l.name == name) {
        return Err(Error::AlreadyExists(name.to_string()));
    }

    Ok(NewLabel {
        form_id: form.id,
        position: labels.len() as i64 + 1,
        repeatable,
        name: name.to_string(),
        usage: usage.to_string(),
    })
}

pub(super) fn apply_label<S, W>(store: &S, label: &NewLabel, output: &mut W) -> Result<()>
where
    S: Store + ?Sized,
    W: Write + ?Sized,
{
    let label = store.create_label(label)?;

    info!("Added label '{}' to form {}", label.name, label.form_id);
    writeln!(output, "added label '{}' at position {}", label.name, label.position)?;
    Ok(())
}

pub(super) fn prepare_relabel<S: Store + ?Sized>(
    store: &S,
    cmd: &FormCommand,
) -> Result<LabelUpdate> {
    let form = target_form(store, cmd, "form")?;
    ensure_editable(&form)?;

    let current_name = cmd.value("label");
    validate_name(current_name)?;
    let labels = store.list_labels(form.id)?;
    let current = labels
        .iter()
        .find(|l| l.name == current_name)
        .ok_or_else(|| Error::LabelNotFound {
            form: form.name.clone(),
            label: current_name.to_string(),
        })?;

    let name = or_current(cmd.value("name"), &current.name);
    let usage = or_current(cmd.value("usage"), &current.usage);
    validate_label_name(name)?;
    validate_usage(usage)?;
    if labels.iter().any(|l| l.id != current.id && l.name == name) {
        return Err(Error::AlreadyExists(name.to_string()));
    }

    let position = match cmd.value("position").trim() {
        "" => current.position,
        raw => raw
            .parse::<i64>()
            .map_err(|_| Error::BadRequest(format!("'{raw}' is not a position")))?,
    };
    let max = labels.len() as i64;
    if !(1..=max).contains(&position) {
        return Err(Error::InvalidPosition { position, max });
    }

    Ok(LabelUpdate {
        form_id: form.id,
        label_id: current.id,
        position,
        repeatable: parse_bool(cmd.value("repeatable"), current.repeatable)?,
        name: name.to_string(),
        usage: usage.to_string(),
    })
}

pub(super) fn apply_relabel<S, W>(store: &S, update: &LabelUpdate, output: &mut W) -> Result<()>
where
    S: Store + ?Sized,
    W: Write + ?Sized,
{
    let changed = store.update_label(update)?;

    info!("Updated label {} of form {}", update.label_id, update.form_id);
    writeln!(output, "updated label '{}'", update.name)?;
    if let Some(swapped) = changed.get(1) {
        writeln!(
            output,
            "swapped positions with '{}', now at position {}",
            swapped.name, swapped.position
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::cli::{Session, run};
    use crate::store::{FormStore, LabelStore, MemoryStore};
    use crate::types::Label;

    fn run_args(store: &MemoryStore, args: &[&str]) -> Result<String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut output = Vec::new();
        let session = Session {
            input: &mut io::empty(),
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
                r#"--labels=[{"Name":"items","Usage":"one per item"},{"Name":"store","Usage":"where to buy"}]"#,
            ],
        )
        .unwrap();
        store
    }

    fn labels(store: &MemoryStore) -> Vec<Label> {
        let form = store.get_form_by_name("groceries").unwrap().unwrap();
        store.list_labels(form.id).unwrap()
    }

    #[test]
    fn test_label_appends() {
        let store = setup();
        let output = run_args(
            &store,
            &["label", "--form=groceries", "--name=budget", "--usage=money to spend", "--repeatable=yes"],
        )
        .unwrap();

        assert!(output.ends_with("added label 'budget' at position 3\n"));
        let labels = labels(&store);
        assert_eq!(labels[2].name, "budget");
        assert!(labels[2].repeatable);
    }

    #[test]
    fn test_label_defaults_to_single_value() {
        let store = setup();
        run_args(&store, &["label", "--form=groceries", "--name=budget", "--usage=money to spend"])
            .unwrap();
        assert!(!labels(&store)[2].repeatable);
    }

    #[test]
    fn test_label_duplicate_name() {
        let store = setup();
        let err = run_args(&store, &["label", "--form=groceries", "--name=items", "--usage=again items"])
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    #[test]
    fn test_label_reserved_name() {
        let store = setup();
        let err = run_args(&store, &["label", "--form=groceries", "--name=help", "--usage=some help text"])
            .unwrap_err();
        assert!(matches!(err, Error::ReservedName(_)));
    }

    #[test]
    fn test_label_builtin_is_refused() {
        let store = setup();
        let err = run_args(&store, &["label", "--form=read", "--name=extra", "--usage=extra label"])
            .unwrap_err();
        assert!(matches!(err, Error::Protected(_)));
    }

    #[test]
    fn test_relabel_swaps_positions() {
        let store = setup();
        let output = run_args(
            &store,
            &["relabel", "--form=groceries", "--label=store", "--position=1"],
        )
        .unwrap();

        assert!(output.contains("updated label 'store'\n"));
        assert!(output.ends_with("swapped positions with 'items', now at position 2\n"));
        let labels = labels(&store);
        assert_eq!((labels[0].name.as_str(), labels[0].position), ("store", 1));
        assert_eq!((labels[1].name.as_str(), labels[1].position), ("items", 2));
        assert_eq!(labels[0].usage, "where to buy");
    }

    #[test]
    fn test_relabel_rename_keeps_the_rest() {
        let store = setup();
        run_args(
            &store,
            &["relabel", "--form=groceries", "--label=items", "--name=products", "--repeatable=true"],
        )
        .unwrap();

        let labels = labels(&store);
        assert_eq!(labels[0].name, "products");
        assert_eq!(labels[0].position, 1);
        assert_eq!(labels[0].usage, "one per item");
        assert!(labels[0].repeatable);
    }

    #[test]
    fn test_relabel_unknown_label() {
        let store = setup();
        let err = run_args(&store, &["relabel", "--form=groceries", "--label=budget", "--name=money"])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "label 'budget' for form 'groceries' not found"
        );
    }

    #[test]
    fn test_relabel_bad_position() {
        let store = setup();
        let err = run_args(&store, &["relabel", "--form=groceries", "--label=items", "--position=3"])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPosition { position: 3, max: 2 }));

        let err = run_args(&store, &["relabel", "--form=groceries", "--label=items", "--position=first"])
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[test]
    fn test_relabel_name_taken_by_sibling() {
        let store = setup();
        let err = run_args(&store, &["relabel", "--form=groceries", "--label=items", "--name=store"])
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }
}
