use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;

use crate::error::{CompileError, CompileResult};

/// Options for JSX compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Callee of every element-construction call
    pub jsx_factory: String,
    /// Identifier used for tags without a name
    pub fragment: String,
    /// Reject nodes whose props repeat a key
    pub strict_props: bool,
    /// Maximum nesting depth before compilation bails out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            jsx_factory: "jsx".to_string(),
            fragment: "Fragment".to_string(),
            strict_props: cfg!(debug_assertions),
            max_depth: None,
        }
    }
}

/// Location of a node inside the tree, rendered like `root.children[2].default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath(String);

impl NodePath {
    pub fn root() -> Self {
        Self("root".to_string())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn field(&self, field: &str) -> Self {
        Self(format!("{}.{}", self.0, field))
    }

    pub fn index(&self, field: &str, index: usize) -> Self {
        Self(format!("{}.{}[{}]", self.0, field, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compilation context threaded through the recursive renderers.
///
/// Tracks the path of the node being rendered so errors can point at it, and
/// enforces `max_depth` when one is configured.
pub struct CompilerContext {
    pub options: CompileOptions,
    path: RefCell<Vec<NodePath>>,
    depth: Cell<usize>,
}

impl CompilerContext {
    pub fn new(options: CompileOptions) -> Self {
        Self::with_root(options, NodePath::root())
    }

    pub fn with_root(options: CompileOptions, root: NodePath) -> Self {
        Self {
            options,
            path: RefCell::new(vec![root]),
            depth: Cell::new(0),
        }
    }

    pub fn path(&self) -> NodePath {
        self.path
            .borrow()
            .last()
            .cloned()
            .unwrap_or_else(NodePath::root)
    }

    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Run `f` with `child` as the current node, one level deeper.
    pub fn nested<T>(
        &self,
        child: NodePath,
        f: impl FnOnce() -> CompileResult<T>,
    ) -> CompileResult<T> {
        let depth = self.depth.get() + 1;
        if let Some(limit) = self.options.max_depth {
            if depth > limit {
                return Err(CompileError::DepthLimitExceeded {
                    path: child.to_string(),
                    limit,
                });
            }
        }

        self.path.borrow_mut().push(child);
        self.depth.set(depth);
        let result = f();
        self.depth.set(depth - 1);
        self.path.borrow_mut().pop();
        result
    }

    pub fn child(&self, field: &str) -> NodePath {
        self.path().field(field)
    }

    pub fn indexed_child(&self, field: &str, index: usize) -> NodePath {
        self.path().index(field, index)
    }
}

/// Line-oriented buffer with two-space indentation.
pub struct SourceWriter {
    buffer: String,
    indent_level: usize,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
        }
    }

    pub fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Start a new line at the current indentation. The first line of the
    /// buffer gets no leading newline.
    pub fn add_line(&mut self, text: &str) {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.add_indented(text);
    }

    pub fn add_indented(&mut self, text: &str) {
        for _ in 0..self.indent_level {
            self.buffer.push_str("  ");
        }
        self.buffer.push_str(text);
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub fn into_output(self) -> String {
        self.buffer
    }
}

impl Default for SourceWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_indents_lines() {
        let mut writer = SourceWriter::new();
        writer.add_line("a {");
        writer.indent();
        writer.add_line("b;");
        writer.dedent();
        writer.add_line("}");
        assert_eq!(writer.into_output(), "a {\n  b;\n}");
    }

    #[test]
    fn test_dedent_stops_at_zero() {
        let mut writer = SourceWriter::new();
        writer.dedent();
        writer.add_line("x");
        assert_eq!(writer.into_output(), "x");
    }

    #[test]
    fn test_nested_restores_path_and_depth() {
        let ctx = CompilerContext::new(CompileOptions::default());
        let seen = ctx
            .nested(ctx.indexed_child("children", 0), || {
                Ok((ctx.path().to_string(), ctx.depth()))
            })
            .unwrap();
        assert_eq!(seen, ("root.children[0]".to_string(), 1));
        assert_eq!(ctx.path().as_str(), "root");
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_depth_limit() {
        let options = CompileOptions {
            max_depth: Some(0),
            ..CompileOptions::default()
        };
        let ctx = CompilerContext::new(options);
        let err = ctx.nested(ctx.child("true_value"), || Ok(())).unwrap_err();
        assert!(matches!(err, CompileError::DepthLimitExceeded { limit: 0, .. }));
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_options_from_camel_case_json() {
        let options: CompileOptions =
            serde_json::from_str(r#"{ "jsxFactory": "h", "maxDepth": 64 }"#).unwrap();
        assert_eq!(options.jsx_factory, "h");
        assert_eq!(options.fragment, "Fragment");
        assert_eq!(options.max_depth, Some(64));
    }
}
