mod create;
mod delete;
mod label;
mod pickers;
mod read;
mod update;

pub use create::{CreateForm, parse_label_specs};
pub use pickers::confirm_action;
pub use read::print_submissions;

use std::ffi::OsString;
use std::io::{BufRead, Write};

use tracing::debug;

use crate::config::APP_NAME;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::submit::{FormCommand, InputMode, collect, commit};
use crate::types::{Form, LabelUpdate, NewLabel, RESERVED_LABEL_NAMES, is_builtin};
use crate::validation::validate_name;

/// Work a built-in form performs once its own submission is committed.
#[derive(Debug)]
enum Action {
    Create(CreateForm),
    Read(Form),
    Delete(Form),
    Update(update::UpdateForm),
    Label(NewLabel),
    Relabel(LabelUpdate),
}

/// Where an invocation reads from and writes to.
pub struct Session<'a, R: ?Sized, W: ?Sized> {
    pub input: &'a mut R,
    pub output: &'a mut W,
    /// Whether `input` is a terminal; destructive actions typed in at a
    /// terminal are confirmed first.
    pub terminal: bool,
}

/// Runs one invocation: `args` is everything after the program name.
pub fn run<S, R, W>(store: &S, args: &[String], session: Session<'_, R, W>) -> Result<()>
where
    S: Store + ?Sized,
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    let Session {
        input,
        output,
        terminal,
    } = session;

    match args.first().map(String::as_str) {
        None | Some("-h" | "--help") => return print_forms(store, output),
        Some("-V" | "--version") => {
            writeln!(output, "{APP_NAME} {}", env!("CARGO_PKG_VERSION"))?;
            return Ok(());
        }
        Some(_) => {}
    }

    let mut cmd = FormCommand::load(store, args)?;
    let mode = collect(&mut cmd, input, output)?;

    let action = prepare(store, &cmd)?;
    if let Some(Action::Delete(form)) = &action {
        let message = format!("Delete form '{}' and all of its submissions?", form.name);
        let ask = terminal && mode == InputMode::Interactive;
        if !confirm_action(&message, !ask)? {
            writeln!(output, "Cancelled.")?;
            return Ok(());
        }
    }

    commit(store, &cmd, output)?;

    if let Some(action) = action {
        apply(store, action, output)?;
    }
    Ok(())
}

/// Converts raw process arguments, rejecting the first one that is not UTF-8.
pub fn collect_args<I>(args: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            arg.into_string().map_err(|raw| {
                Error::BadRequest(format!(
                    "argument '{}' is not valid UTF-8",
                    raw.to_string_lossy()
                ))
            })
        })
        .collect()
}

/// Lists every known form with its usage.
pub fn print_forms<S, W>(store: &S, output: &mut W) -> Result<()>
where
    S: Store + ?Sized,
    W: Write + ?Sized,
{
    writeln!(output, "usage: {APP_NAME} <form> [--<label>=<value> ...]")?;
    writeln!(output)?;

    let forms = store.list_forms()?;
    if forms.is_empty() {
        writeln!(output, "no forms found")?;
        return Ok(());
    }
    for form in forms {
        writeln!(output, "{}\n\t-{}", form.name, form.usage)?;
    }
    Ok(())
}

/// Validates the inputs of a built-in form. Nothing is written to the store.
fn prepare<S: Store + ?Sized>(store: &S, cmd: &FormCommand) -> Result<Option<Action>> {
    let form = cmd.form();
    if form.editable || !is_builtin(&form.name) {
        return Ok(None);
    }

    let action = match form.name.as_str() {
        "create" => Action::Create(create::prepare(store, cmd)?),
        "read" => Action::Read(read::prepare(store, cmd)?),
        "delete" => Action::Delete(delete::prepare(store, cmd)?),
        "update" => Action::Update(update::prepare(store, cmd)?),
        "label" => Action::Label(label::prepare_label(store, cmd)?),
        "relabel" => Action::Relabel(label::prepare_relabel(store, cmd)?),
        _ => return Ok(None),
    };
    debug!("Prepared built-in action for '{}'", form.name);
    Ok(Some(action))
}

fn apply<S, W>(store: &S, action: Action, output: &mut W) -> Result<()>
where
    S: Store + ?Sized,
    W: Write + ?Sized,
{
    match action {
        Action::Create(create) => create.apply(store, output),
        Action::Read(form) => print_submissions(store, &form, output),
        Action::Delete(form) => delete::apply(store, &form, output),
        Action::Update(update) => update.apply(store, output),
        Action::Label(label) => label::apply_label(store, &label, output),
        Action::Relabel(update) => label::apply_relabel(store, &update, output),
    }
}

/// Looks up the form named by the `flag` value of a built-in command.
fn target_form<S: Store + ?Sized>(store: &S, cmd: &FormCommand, flag: &str) -> Result<Form> {
    let name = cmd.value(flag);
    validate_name(name)?;
    store
        .get_form_by_name(name)?
        .ok_or_else(|| Error::FormNotFound(name.to_string()))
}

fn ensure_editable(form: &Form) -> Result<()> {
    if form.editable {
        Ok(())
    } else {
        Err(Error::Protected(form.name.clone()))
    }
}

/// Label names double as flag names, so they must also avoid generated flags.
pub fn validate_label_name(name: &str) -> Result<()> {
    validate_name(name)?;
    if RESERVED_LABEL_NAMES.contains(&name) {
        return Err(Error::ReservedName(name.to_string()));
    }
    Ok(())
}

/// Parses the value of a `repeatable` flag; empty means `default`.
fn parse_bool(value: &str, default: bool) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        other => Err(Error::BadRequest(format!(
            "'{other}' is not a boolean (use true or false)"
        ))),
    }
}

/// Returns `value`, or `current` when `value` is empty.
fn or_current<'a>(value: &'a str, current: &'a str) -> &'a str {
    if value.is_empty() { current } else { value }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::store::{EntryStore, FormStore, LabelStore, MemoryStore, SubmissionStore};

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.initialize().unwrap();
        store
    }

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

    #[test]
    fn test_no_arguments_lists_forms() {
        let store = store();
        let output = run_args(&store, &[], "").unwrap();

        assert!(output.starts_with("usage: formly <form>"));
        assert!(output.contains("create\n\t-creates a new form"));
        assert!(output.contains("read\n\t-reads every submission"));
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let output = run_args(&MemoryStore::new(), &["--help"], "").unwrap();
        assert!(output.ends_with("no forms found\n"));
    }

    #[test]
    fn test_version() {
        let output = run_args(&store(), &["--version"], "").unwrap();
        assert_eq!(output, format!("formly {}\n", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_unknown_form() {
        let err = run_args(&store(), &["groceries"], "").unwrap_err();
        assert_eq!(err.to_string(), "form 'groceries' does not exist");
    }

    #[test]
    fn test_create_then_submit_with_flags() {
        let store = store();
        run_args(
            &store,
            &[
                "create",
                "--name=first",
                "--usage=first test form",
                r#"--labels=[{"Name":"firstflag","Usage":"first flag"},{"Name":"secondflag","Usage":"second flag"}]"#,
            ],
            "",
        )
        .unwrap();

        let output = run_args(&store, &["first", "--firstflag=hello", "--secondflag=world"], "").unwrap();
        assert!(output.contains("\tfirstflag: hello\n\tsecondflag: world\n"));

        let form = store.get_form_by_name("first").unwrap().unwrap();
        let labels = store.list_labels(form.id).unwrap();
        let submissions = store.list_submissions(form.id).unwrap();
        assert_eq!(submissions.len(), 1);
        let first = store.list_entries(submissions[0].id, labels[0].id).unwrap();
        let second = store.list_entries(submissions[0].id, labels[1].id).unwrap();
        assert_eq!(first[0].txt, "hello");
        assert_eq!(second[0].txt, "world");
    }

    #[test]
    fn test_builtin_invocation_is_recorded() {
        let store = store();
        run_args(&store, &["create", "--name=first", "--usage=first test form"], "").unwrap();

        let create = store.get_form_by_name("create").unwrap().unwrap();
        assert_eq!(store.list_submissions(create.id).unwrap().len(), 1);
    }

    #[test]
    fn test_rejected_builtin_leaves_no_submission() {
        let store = store();
        let err = run_args(&store, &["create", "--name=first1", "--usage=first test form"], "")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCharset(_)));

        let create = store.get_form_by_name("create").unwrap().unwrap();
        assert!(store.list_submissions(create.id).unwrap().is_empty());
        assert!(store.get_form_by_name("first1").unwrap().is_none());
    }

    #[test]
    fn test_interactive_create_and_submit() {
        let store = store();
        run_args(&store, &["create"], "todo\nthings to do\n\n").unwrap();
        run_args(
            &store,
            &["label", "--form=todo", "--name=items", "--usage=one item per line", "--repeatable=true"],
            "",
        )
        .unwrap();

        let output = run_args(&store, &["todo"], "a\nb\nc\n\n").unwrap();
        assert!(output.starts_with("items:\nitems:\nitems:\nitems:\n"));
        assert!(output.contains("\titems: a\n\titems: b\n\titems: c\n"));
    }

    #[test]
    fn test_interactive_delete_without_terminal_proceeds() {
        let store = store();
        run_args(&store, &["create", "--name=first", "--usage=first test form"], "").unwrap();

        let output = run_args(&store, &["delete"], "first\n").unwrap();
        assert!(output.contains("deleted form 'first'"));
        assert!(store.get_form_by_name("first").unwrap().is_none());
    }

    #[test]
    fn test_collect_args() {
        let args = collect_args([OsString::from("read"), OsString::from("--name=create")]).unwrap();
        assert_eq!(args, ["read", "--name=create"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_args_rejects_non_utf8() {
        use std::os::unix::ffi::OsStringExt;

        let args = vec![
            OsString::from("read"),
            OsString::from_vec(b"--name=\xff".to_vec()),
        ];
        let err = collect_args(args).unwrap_err();
        assert!(matches!(err, Error::BadRequest(ref msg) if msg.contains("not valid UTF-8")));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE", false).unwrap());
        assert!(!parse_bool("no", true).unwrap());
        assert!(parse_bool("", true).unwrap());
        assert!(matches!(parse_bool("maybe", false), Err(Error::BadRequest(_))));
    }

    #[test]
    fn test_reserved_label_name() {
        assert!(matches!(
            validate_label_name("help"),
            Err(Error::ReservedName(_))
        ));
        assert!(validate_label_name("helper").is_ok());
    }
}
