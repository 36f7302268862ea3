use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::compiler::render;
use crate::component::Component;
use crate::context::{CompileOptions, CompilerContext, NodePath};
use crate::error::{CompileError, CompileResult};
use crate::imports::{emit_imports, ImportSpec};

/// Everything needed to emit one source module: its imports and the
/// top-level component trees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleInput {
    pub imports: Vec<ImportSpec>,
    pub components: Vec<Component>,
}

impl ModuleInput {
    /// Read `{"imports": [...], "components": [...]}`. Errors are reported
    /// relative to `imports[i]` or `components[i]`.
    pub fn from_value(value: &Value) -> CompileResult<Self> {
        let obj = value.as_object().ok_or_else(|| {
            CompileError::invalid_field("module", "module", "expected an object")
        })?;

        let imports = match obj.get("imports") {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    ImportSpec::deserialize(item).map_err(|e| {
                        CompileError::invalid_field(format!("imports[{}]", i), "imports", e.to_string())
                    })
                })
                .collect::<CompileResult<Vec<_>>>()?,
            Some(_) => {
                return Err(CompileError::invalid_field(
                    "module",
                    "imports",
                    "expected an array",
                ))
            }
            None => Vec::new(),
        };

        let components = match obj.get("components") {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    Component::from_value_at(item, &NodePath::named(format!("components[{}]", i)))
                })
                .collect::<CompileResult<Vec<_>>>()?,
            Some(_) => {
                return Err(CompileError::invalid_field(
                    "module",
                    "components",
                    "expected an array",
                ))
            }
            None => Vec::new(),
        };

        Ok(Self {
            imports,
            components,
        })
    }

    pub fn from_json(source: &str) -> CompileResult<Self> {
        let value: Value = serde_json::from_str(source)?;
        Self::from_value(&value)
    }
}

/// Import block, a blank line, then one rendered component per line.
pub fn compile_module(module: &ModuleInput, options: CompileOptions) -> CompileResult<String> {
    info!(
        imports = module.imports.len(),
        components = module.components.len(),
        "Compiling module"
    );

    let mut output = String::new();
    if !module.imports.is_empty() {
        output.push_str(&emit_imports(&module.imports));
        output.push('\n');
        if !module.components.is_empty() {
            output.push('\n');
        }
    }

    for (i, component) in module.components.iter().enumerate() {
        debug!(index = i, kind = component.kind(), "Compiling top-level component");
        let ctx = CompilerContext::with_root(
            options.clone(),
            NodePath::named(format!("components[{}]", i)),
        );
        output.push_str(&render(component, &ctx)?);
        output.push('\n');
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_module_layout() {
        let module = ModuleInput::from_value(&json!({
            "imports": [{ "default": "React", "lib": "react" }],
            "components": [
                { "name": "br", "props": [], "contents": "" },
                "\"text\""
            ]
        }))
        .unwrap();

        let output = compile_module(&module, CompileOptions::default()).unwrap();
        assert_eq!(
            output,
            "import React from \"react\"\n\njsx(br,{},)\n\"text\"\n"
        );
    }

    #[test]
    fn test_imports_only() {
        let module = ModuleInput {
            imports: vec![ImportSpec::new("./styles.css")],
            components: vec![],
        };
        let output = compile_module(&module, CompileOptions::default()).unwrap();
        assert_eq!(output, "import \"./styles.css\"\n");
    }

    #[test]
    fn test_error_path_names_component_index() {
        let module = ModuleInput::from_value(&json!({
            "components": ["\"ok\"", { "iterable_state": "xs" }]
        }));
        let err = module.unwrap_err();
        assert_eq!(err.path(), Some("components[1]"));
    }

    #[test]
    fn test_bad_import_names_its_index() {
        let err = ModuleInput::from_value(&json!({
            "imports": [{ "lib": "react" }, { "default": "X" }],
            "components": []
        }))
        .unwrap_err();
        assert!(matches!(err, CompileError::InvalidField { field: "imports", .. }));
        assert_eq!(err.path(), Some("imports[1]"));
        assert!(err.to_string().contains("lib"));
    }

    #[test]
    fn test_imports_must_be_an_array() {
        let err = ModuleInput::from_value(&json!({ "imports": { "lib": "react" } })).unwrap_err();
        assert_eq!(err.path(), Some("module"));
    }
}
