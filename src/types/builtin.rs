/// Reserved token joining the values of a repeatable label inside one flag value.
pub const SEPARATOR: &str = ",/";

/// Label names that would clash with generated flags.
pub const RESERVED_LABEL_NAMES: &[&str] = &["help"];

pub struct BuiltinLabel {
    pub name: &'static str,
    pub usage: &'static str,
}

pub struct BuiltinForm {
    pub name: &'static str,
    pub usage: &'static str,
    pub labels: &'static [BuiltinLabel],
}

/// Forms seeded into every store on initialization. None of them is editable or
/// deleteable.
pub const BUILTIN_FORMS: &[BuiltinForm] = &[
    BuiltinForm {
        name: "create",
        usage: "creates a new form with optional labels",
        labels: &[
            BuiltinLabel {
                name: "name",
                usage: "name of the new form (letters only)",
            },
            BuiltinLabel {
                name: "usage",
                usage: "description of the new form",
            },
            BuiltinLabel {
                name: "labels",
                usage: "JSON array of {\"Repeatable\", \"Name\", \"Usage\"} objects",
            },
        ],
    },
    BuiltinForm {
        name: "read",
        usage: "reads every submission of a form",
        labels: &[BuiltinLabel {
            name: "name",
            usage: "name of the form to read",
        }],
    },
    BuiltinForm {
        name: "delete",
        usage: "deletes a form with its labels and submissions",
        labels: &[BuiltinLabel {
            name: "name",
            usage: "name of the form to delete",
        }],
    },
    BuiltinForm {
        name: "update",
        usage: "renames or re-describes a form",
        labels: &[
            BuiltinLabel {
                name: "form",
                usage: "name of the form to update",
            },
            BuiltinLabel {
                name: "name",
                usage: "new name (empty keeps the current one)",
            },
            BuiltinLabel {
                name: "usage",
                usage: "new usage (empty keeps the current one)",
            },
        ],
    },
    BuiltinForm {
        name: "label",
        usage: "appends a label to a form",
        labels: &[
            BuiltinLabel {
                name: "form",
                usage: "name of the form receiving the label",
            },
            BuiltinLabel {
                name: "name",
                usage: "name of the label, also its flag name",
            },
            BuiltinLabel {
                name: "usage",
                usage: "help text of the label",
            },
            BuiltinLabel {
                name: "repeatable",
                usage: "whether the label takes several values (true/false)",
            },
        ],
    },
    BuiltinForm {
        name: "relabel",
        usage: "modifies or moves a label of a form",
        labels: &[
            BuiltinLabel {
                name: "form",
                usage: "name of the form owning the label",
            },
            BuiltinLabel {
                name: "label",
                usage: "current name of the label",
            },
            BuiltinLabel {
                name: "name",
                usage: "new name (empty keeps the current one)",
            },
            BuiltinLabel {
                name: "usage",
                usage: "new usage (empty keeps the current one)",
            },
            BuiltinLabel {
                name: "position",
                usage: "new position, swapping with the label there",
            },
            BuiltinLabel {
                name: "repeatable",
                usage: "whether the label takes several values (true/false)",
            },
        ],
    },
];

#[must_use]
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_FORMS.iter().any(|f| f.name == name)
}
