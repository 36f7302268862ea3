mod compiler;
mod component;
mod context;
mod error;
mod imports;
mod module;

pub use compiler::{compile_json, compile_to_jsx, compile_value, render, render_props};
pub use component::{
    Component, ConditionNode, IterableNode, JsExpr, LeafNode, MatchCase, MatchNode, TagNode,
};
pub use context::{CompileOptions, CompilerContext, NodePath, SourceWriter};
pub use error::{CompileError, CompileResult};
pub use imports::{emit_import, emit_imports, ImportSpec};
pub use module::{compile_module, ModuleInput};
