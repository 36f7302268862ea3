use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One module import: a default binding, named bindings, or neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSpec {
    /// Default binding; empty when absent
    #[serde(default)]
    pub default: String,
    /// Named bindings, kept sorted
    #[serde(default)]
    pub rest: BTreeSet<String>,
    pub lib: String,
}

impl ImportSpec {
    pub fn new(lib: impl Into<String>) -> Self {
        Self {
            lib: lib.into(),
            ..Self::default()
        }
    }

    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default = name.into();
        self
    }

    pub fn with_named<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rest.extend(names.into_iter().map(Into::into));
        self
    }
}

/// Emit a single import statement.
pub fn emit_import(spec: &ImportSpec) -> String {
    let named = spec.rest.iter().map(String::as_str).collect::<Vec<_>>().join(", ");

    match (spec.default.is_empty(), spec.rest.is_empty()) {
        (false, false) => format!("import {}, {{ {} }} from \"{}\"", spec.default, named, spec.lib),
        (false, true) => format!("import {} from \"{}\"", spec.default, spec.lib),
        (true, false) => format!("import {{ {} }} from \"{}\"", named, spec.lib),
        (true, true) => format!("import \"{}\"", spec.lib),
    }
}

/// One statement per line, in input order.
pub fn emit_imports(specs: &[ImportSpec]) -> String {
    specs.iter().map(emit_import).collect::<Vec<_>>().join("\n")
}
