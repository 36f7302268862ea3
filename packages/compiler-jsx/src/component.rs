//! Component tree consumed by the JSX compiler.
//!
//! Upstream stages hand over trees as untyped JSON objects whose kind is
//! implied by which keys are present. [`Component::from_value`] turns that
//! shape into the closed [`Component`] enum, resolving overlapping shapes by
//! a fixed priority: iterable, match, condition, tag, leaf.

use serde_json::{Map, Value};

use crate::context::NodePath;
use crate::error::{CompileError, CompileResult};

/// A pre-rendered JavaScript expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsExpr(pub String);

impl JsExpr {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for JsExpr {
    fn from(s: &str) -> Self {
        JsExpr(s.to_string())
    }
}

impl From<String> for JsExpr {
    fn from(s: String) -> Self {
        JsExpr(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// Already-rendered source text, emitted as-is.
    Literal(String),
    Iterable(IterableNode),
    Match(MatchNode),
    Condition(ConditionNode),
    Tag(TagNode),
    Leaf(LeafNode),
}

/// `iterable_state.map((arg_name, arg_index) => (...children))`
#[derive(Debug, Clone, PartialEq)]
pub struct IterableNode {
    pub iterable_state: String,
    pub arg_name: String,
    pub arg_index: String,
    pub children: Vec<Component>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchNode {
    pub cond: JsExpr,
    pub cases: Vec<MatchCase>,
    pub default: Box<Component>,
}

/// One switch arm: every label falls through to the shared result.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCase {
    pub labels: Vec<JsExpr>,
    pub result: Component,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionNode {
    pub cond_state: String,
    pub true_value: Box<Component>,
    pub false_value: Box<Component>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagNode {
    /// Empty for a fragment
    pub name: String,
    /// Pre-rendered `key:value` fragments
    pub props: Vec<String>,
    pub contents: String,
    pub children: Vec<Component>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    pub name: String,
    pub props: Vec<String>,
    pub contents: String,
}

impl MatchCase {
    pub fn new(labels: Vec<JsExpr>, result: Component) -> Self {
        Self { labels, result }
    }
}

impl Component {
    pub fn literal(text: impl Into<String>) -> Self {
        Component::Literal(text.into())
    }

    /// A named element or fragment. Becomes a [`TagNode`] when it has
    /// children and a self-closing [`LeafNode`] otherwise.
    pub fn element(
        name: impl Into<String>,
        props: Vec<String>,
        contents: impl Into<String>,
        children: Vec<Component>,
    ) -> Self {
        let name = name.into();
        let contents = contents.into();
        if children.is_empty() {
            Component::Leaf(LeafNode {
                name,
                props,
                contents,
            })
        } else {
            Component::Tag(TagNode {
                name,
                props,
                contents,
                children,
            })
        }
    }

    pub fn condition(
        cond_state: impl Into<String>,
        true_value: Component,
        false_value: Component,
    ) -> Self {
        Component::Condition(ConditionNode {
            cond_state: cond_state.into(),
            true_value: Box::new(true_value),
            false_value: Box::new(false_value),
        })
    }

    pub fn iterable(
        iterable_state: impl Into<String>,
        arg_name: impl Into<String>,
        arg_index: impl Into<String>,
        children: Vec<Component>,
    ) -> Self {
        Component::Iterable(IterableNode {
            iterable_state: iterable_state.into(),
            arg_name: arg_name.into(),
            arg_index: arg_index.into(),
            children,
        })
    }

    pub fn matcher(cond: impl Into<JsExpr>, cases: Vec<MatchCase>, default: Component) -> Self {
        Component::Match(MatchNode {
            cond: cond.into(),
            cases,
            default: Box::new(default),
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Component::Literal(_) => "literal",
            Component::Iterable(_) => "iterable",
            Component::Match(_) => "match",
            Component::Condition(_) => "condition",
            Component::Tag(_) => "tag",
            Component::Leaf(_) => "leaf",
        }
    }

    /// True when the node renders to no text at all. Only empty literals do;
    /// an unnamed, empty leaf still renders the `""` literal.
    pub fn renders_empty(&self) -> bool {
        matches!(self, Component::Literal(text) if text.is_empty())
    }

    /// Classify an upstream JSON node (and its subtree).
    pub fn from_value(value: &Value) -> CompileResult<Self> {
        classify(value, &NodePath::root())
    }

    pub fn from_value_at(value: &Value, path: &NodePath) -> CompileResult<Self> {
        classify(value, path)
    }

    pub fn from_json(source: &str) -> CompileResult<Self> {
        let value: Value = serde_json::from_str(source)?;
        Self::from_value(&value)
    }
}

fn classify(value: &Value, path: &NodePath) -> CompileResult<Component> {
    let obj = match value {
        Value::Object(obj) => obj,
        Value::String(s) => return Ok(Component::Literal(s.clone())),
        Value::Number(n) => return Ok(Component::Literal(n.to_string())),
        Value::Bool(b) => return Ok(Component::Literal(b.to_string())),
        Value::Null => return Ok(Component::Literal(String::new())),
        Value::Array(items) if items.is_empty() => return Ok(Component::Literal(String::new())),
        Value::Array(_) => {
            return Err(CompileError::invalid_field(
                path.as_str(),
                "node",
                "expected an object or a literal, found a non-empty array",
            ))
        }
    };

    if obj.contains_key("iterable") || obj.contains_key("iterable_state") {
        return classify_iterable(obj, path);
    }
    if obj.get("name").and_then(Value::as_str) == Some("match") {
        return classify_match(obj, path);
    }
    if obj.contains_key("cond") || obj.contains_key("cond_state") {
        return classify_condition(obj, path);
    }

    let name = optional_string(obj, "name", path)?;
    let props = string_list(obj, "props", path)?;
    let contents = optional_string(obj, "contents", path)?;
    let children = node_list(obj, "children", path)?;
    Ok(Component::element(name, props, contents, children))
}

fn classify_iterable(obj: &Map<String, Value>, path: &NodePath) -> CompileResult<Component> {
    const KIND: &str = "iterable";
    Ok(Component::Iterable(IterableNode {
        iterable_state: required_string(obj, KIND, "iterable_state", path)?,
        arg_name: required_string(obj, KIND, "arg_name", path)?,
        arg_index: required_string(obj, KIND, "arg_index", path)?,
        children: node_list(obj, "children", path)?,
    }))
}

fn classify_match(obj: &Map<String, Value>, path: &NodePath) -> CompileResult<Component> {
    const KIND: &str = "match";
    let cond = obj
        .get("cond")
        .ok_or_else(|| CompileError::missing_field(path.as_str(), KIND, "cond"))?;
    let cond = js_expr(cond, "cond", path)?;

    let raw_cases = match obj.get("match_cases") {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(CompileError::invalid_field(
                path.as_str(),
                "match_cases",
                "expected an array of cases",
            ))
        }
        None => return Err(CompileError::missing_field(path.as_str(), KIND, "match_cases")),
    };

    let mut cases = Vec::with_capacity(raw_cases.len());
    for (index, raw_case) in raw_cases.iter().enumerate() {
        let case_path = path.index("match_cases", index);
        let items = raw_case.as_array().ok_or_else(|| {
            CompileError::invalid_field(case_path.as_str(), "match_cases", "expected an array")
        })?;
        let (result, labels) = items.split_last().ok_or_else(|| {
            CompileError::invalid_field(case_path.as_str(), "match_cases", "case is empty")
        })?;
        if labels.is_empty() {
            return Err(CompileError::EmptyMatchCase {
                path: path.to_string(),
                index,
            });
        }
        let labels = labels
            .iter()
            .map(|label| js_expr(label, "match_cases", &case_path))
            .collect::<CompileResult<Vec<_>>>()?;
        let result = classify(result, &case_path.field("result"))?;
        cases.push(MatchCase { labels, result });
    }

    let default = obj
        .get("default")
        .ok_or_else(|| CompileError::missing_field(path.as_str(), KIND, "default"))?;
    let default = classify(default, &path.field("default"))?;

    Ok(Component::Match(MatchNode {
        cond,
        cases,
        default: Box::new(default),
    }))
}

fn classify_condition(obj: &Map<String, Value>, path: &NodePath) -> CompileResult<Component> {
    const KIND: &str = "condition";
    let cond_state = required_string(obj, KIND, "cond_state", path)?;
    let true_value = obj
        .get("true_value")
        .ok_or_else(|| CompileError::missing_field(path.as_str(), KIND, "true_value"))?;
    let false_value = obj
        .get("false_value")
        .ok_or_else(|| CompileError::missing_field(path.as_str(), KIND, "false_value"))?;

    Ok(Component::Condition(ConditionNode {
        cond_state,
        true_value: Box::new(classify(true_value, &path.field("true_value"))?),
        false_value: Box::new(classify(false_value, &path.field("false_value"))?),
    }))
}

/// Accepts either a bare string or an object exposing `_js_expr`.
fn js_expr(value: &Value, field: &'static str, path: &NodePath) -> CompileResult<JsExpr> {
    match value {
        Value::String(s) => Ok(JsExpr(s.clone())),
        Value::Object(obj) => match obj.get("_js_expr") {
            Some(Value::String(s)) => Ok(JsExpr(s.clone())),
            _ => Err(CompileError::invalid_field(
                path.as_str(),
                field,
                "expression object has no `_js_expr` string",
            )),
        },
        Value::Number(_) | Value::Bool(_) => Ok(JsExpr(value.to_string())),
        _ => Err(CompileError::invalid_field(
            path.as_str(),
            field,
            "expected a JavaScript expression",
        )),
    }
}

fn required_string(
    obj: &Map<String, Value>,
    kind: &'static str,
    field: &'static str,
    path: &NodePath,
) -> CompileResult<String> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(CompileError::invalid_field(path.as_str(), field, "expected a string")),
        None => Err(CompileError::missing_field(path.as_str(), kind, field)),
    }
}

fn optional_string(
    obj: &Map<String, Value>,
    field: &'static str,
    path: &NodePath,
) -> CompileResult<String> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Ok(String::new()),
        Some(_) => Err(CompileError::invalid_field(path.as_str(), field, "expected a string")),
    }
}

fn string_list(
    obj: &Map<String, Value>,
    field: &'static str,
    path: &NodePath,
) -> CompileResult<Vec<String>> {
    match obj.get(field) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    CompileError::invalid_field(path.as_str(), field, "expected an array of strings")
                })
            })
            .collect(),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(_) => Err(CompileError::invalid_field(path.as_str(), field, "expected an array")),
    }
}

fn node_list(
    obj: &Map<String, Value>,
    field: &'static str,
    path: &NodePath,
) -> CompileResult<Vec<Component>> {
    match obj.get(field) {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| classify(item, &path.index(field, i)))
            .collect(),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(_) => Err(CompileError::invalid_field(path.as_str(), field, "expected an array")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_are_literals() {
        assert_eq!(Component::from_value(&json!("\"hi\"")).unwrap(), Component::literal("\"hi\""));
        assert_eq!(Component::from_value(&json!(42)).unwrap(), Component::literal("42"));
        assert_eq!(Component::from_value(&json!([])).unwrap(), Component::literal(""));
    }

    #[test]
    fn test_iterable_wins_over_condition() {
        let node = Component::from_value(&json!({
            "iterable": true,
            "iterable_state": "items",
            "arg_name": "item",
            "arg_index": "i",
            "cond": "flag",
            "cond_state": "flag",
            "children": ["item"]
        }))
        .unwrap();
        assert_eq!(node.kind(), "iterable");
    }

    #[test]
    fn test_match_wins_over_condition() {
        let node = Component::from_value(&json!({
            "name": "match",
            "cond": { "_js_expr": "state.color" },
            "match_cases": [["\"red\"", "\"r\""]],
            "default": "\"?\""
        }))
        .unwrap();
        let Component::Match(m) = node else {
            panic!("expected match node");
        };
        assert_eq!(m.cond.as_str(), "state.color");
        assert_eq!(m.cases[0].labels, vec![JsExpr::from("\"red\"")]);
        assert_eq!(m.cases[0].result, Component::literal("\"r\""));
    }

    #[test]
    fn test_children_decide_tag_or_leaf() {
        let tag = Component::from_value(&json!({ "name": "div", "children": ["x"] })).unwrap();
        let leaf = Component::from_value(&json!({ "name": "br", "children": [] })).unwrap();
        assert_eq!(tag.kind(), "tag");
        assert_eq!(leaf.kind(), "leaf");
    }

    #[test]
    fn test_missing_field_reports_path() {
        let err = Component::from_value(&json!({
            "name": "div",
            "children": [{ "name": "p", "children": [{ "cond_state": "x", "true_value": "a" }] }]
        }))
        .unwrap_err();
        match err {
            CompileError::MissingField { path, kind, field } => {
                assert_eq!(path, "root.children[0].children[0]");
                assert_eq!(kind, "condition");
                assert_eq!(field, "false_value");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_case_without_labels_is_rejected() {
        let err = Component::from_value(&json!({
            "name": "match",
            "cond": "x",
            "match_cases": [["1", "a"], ["b"]],
            "default": "d"
        }))
        .unwrap_err();
        assert!(matches!(err, CompileError::EmptyMatchCase { index: 1, .. }));
    }

    #[test]
    fn test_non_empty_array_is_not_a_node() {
        let err = Component::from_value(&json!(["a"])).unwrap_err();
        assert_eq!(err.path(), Some("root"));
    }
}
