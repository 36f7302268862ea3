use crate::component::{Component, ConditionNode, IterableNode, LeafNode, MatchNode, TagNode};
use crate::context::{CompileOptions, CompilerContext, SourceWriter};
use crate::error::{CompileError, CompileResult};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Compile a component tree to a JSX-construction expression
pub fn compile_to_jsx(component: &Component, options: CompileOptions) -> CompileResult<String> {
    let ctx = CompilerContext::new(options);
    debug!(kind = component.kind(), "Compiling component tree");
    render(component, &ctx)
}

/// Classify an upstream JSON node and compile it
pub fn compile_value(value: &Value, options: CompileOptions) -> CompileResult<String> {
    let component = Component::from_value(value)?;
    compile_to_jsx(&component, options)
}

pub fn compile_json(source: &str, options: CompileOptions) -> CompileResult<String> {
    let component = Component::from_json(source)?;
    compile_to_jsx(&component, options)
}

/// Render one node, dispatching on its kind.
pub fn render(component: &Component, ctx: &CompilerContext) -> CompileResult<String> {
    trace!(path = %ctx.path(), kind = component.kind(), "Rendering node");

    match component {
        Component::Literal(text) => Ok(text.clone()),
        Component::Iterable(node) => render_iterable(node, ctx),
        Component::Match(node) => render_match(node, ctx),
        Component::Condition(node) => render_condition(node, ctx),
        Component::Tag(node) => render_tag(node, ctx),
        Component::Leaf(node) => render_leaf(node, ctx),
    }
}

fn render_tag(tag: &TagNode, ctx: &CompilerContext) -> CompileResult<String> {
    if tag.children.is_empty() {
        return Err(CompileError::EmptyTagChildren {
            path: ctx.path().to_string(),
        });
    }
    check_props(&tag.props, ctx)?;

    let name = if tag.name.is_empty() {
        ctx.options.fragment.as_str()
    } else {
        tag.name.as_str()
    };

    let mut args = vec![name.to_string(), render_props(&tag.props)];
    if !tag.contents.is_empty() {
        args.push(tag.contents.clone());
    }
    for (index, child) in tag.children.iter().enumerate() {
        if child.renders_empty() {
            continue;
        }
        args.push(ctx.nested(ctx.indexed_child("children", index), || render(child, ctx))?);
    }

    Ok(format!("{}({})", ctx.options.jsx_factory, args.join(",")))
}

fn render_leaf(leaf: &LeafNode, ctx: &CompilerContext) -> CompileResult<String> {
    if !leaf.name.is_empty() {
        check_props(&leaf.props, ctx)?;
        return Ok(format!(
            "{}({},{},{})",
            ctx.options.jsx_factory,
            leaf.name,
            render_props(&leaf.props),
            leaf.contents
        ));
    }

    if !leaf.contents.is_empty() {
        Ok(leaf.contents.clone())
    } else {
        Ok("\"\"".to_string())
    }
}

fn render_condition(node: &ConditionNode, ctx: &CompilerContext) -> CompileResult<String> {
    let when_true = ctx.nested(ctx.child("true_value"), || render(&node.true_value, ctx))?;
    let when_false = ctx.nested(ctx.child("false_value"), || render(&node.false_value, ctx))?;

    Ok(format!(
        "({} ? ({}) : ({}))",
        node.cond_state, when_true, when_false
    ))
}

fn render_iterable(node: &IterableNode, ctx: &CompilerContext) -> CompileResult<String> {
    // The body is spliced in without a combinator, so only one child may
    // produce text.
    let visible = node.children.iter().filter(|c| !c.renders_empty()).count();
    if visible > 1 {
        return Err(CompileError::AmbiguousIterableBody {
            path: ctx.path().to_string(),
            count: visible,
        });
    }

    let mut body = String::new();
    for (index, child) in node.children.iter().enumerate() {
        body.push_str(&ctx.nested(ctx.indexed_child("children", index), || render(child, ctx))?);
    }

    Ok(format!(
        "{}.map(({}, {}) => ({}))",
        node.iterable_state, node.arg_name, node.arg_index, body
    ))
}

fn render_match(node: &MatchNode, ctx: &CompilerContext) -> CompileResult<String> {
    let mut out = SourceWriter::new();
    out.add_line("(() => {");
    out.indent();
    out.add_line(&format!("switch (JSON.stringify({})) {{", node.cond.as_str()));
    out.indent();

    for (index, case) in node.cases.iter().enumerate() {
        if case.labels.is_empty() {
            return Err(CompileError::EmptyMatchCase {
                path: ctx.path().to_string(),
                index,
            });
        }
        for label in &case.labels {
            out.add_line(&format!("case JSON.stringify({}):", label.as_str()));
        }

        let case_path = ctx.indexed_child("match_cases", index).field("result");
        let result = ctx.nested(case_path, || render(&case.result, ctx))?;
        out.indent();
        out.add_line(&format!("return {};", result));
        out.add_line("break;");
        out.dedent();
    }

    let default = ctx.nested(ctx.child("default"), || render(&node.default, ctx))?;
    out.add_line("default:");
    out.indent();
    out.add_line(&format!("return {};", default));
    out.add_line("break;");
    out.dedent();

    out.dedent();
    out.add_line("}");
    out.dedent();
    out.add_line("})()");

    Ok(out.into_output())
}

/// `{k1:v1,k2:v2}`, in the order given
pub fn render_props(props: &[String]) -> String {
    format!("{{{}}}", props.join(","))
}

fn check_props(props: &[String], ctx: &CompilerContext) -> CompileResult<()> {
    if !ctx.options.strict_props {
        return Ok(());
    }

    let mut seen = HashSet::new();
    for prop in props {
        let Some(key) = prop_key(prop) else {
            continue;
        };
        if !seen.insert(key) {
            return Err(CompileError::DuplicateProp {
                path: ctx.path().to_string(),
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

/// Static key of a `key:value` prop. Spreads (`...expr`) and computed keys
/// (`[expr]:value`) have none. Quoted keys are returned without their quotes
/// and may contain `:`.
fn prop_key(prop: &str) -> Option<&str> {
    let prop = prop.trim_start();
    if prop.starts_with("...") || prop.starts_with('[') {
        return None;
    }

    let quote = match prop.chars().next() {
        Some(c @ ('"' | '\'' | '`')) => c,
        _ => return prop.split_once(':').map(|(key, _)| key.trim()),
    };
    let body = &prop[1..];
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            c if c == quote => return Some(&body[..i]),
            _ => {}
        }
    }
    None
}
