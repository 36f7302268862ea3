//! Compiling trees as an upstream stage hands them over, as JSON.

use serde_json::json;
use treejsx_compiler::{
    compile_module, compile_value, emit_import, CompileOptions, ImportSpec, ModuleInput,
};

#[test]
fn test_todo_list_page() {
    let tree = json!({
        "name": "VStack",
        "props": ["spacing:\"2\""],
        "contents": "",
        "children": [
            { "name": "Heading", "props": [], "contents": "\"Todos\"", "children": [] },
            {
                "iterable": true,
                "iterable_state": "state.todos",
                "arg_name": "todo",
                "arg_index": "i",
                "children": [
                    {
                        "cond": { "_js_expr": "todo.done" },
                        "cond_state": "todo.done",
                        "true_value": { "name": "s", "props": ["key:i"], "contents": "todo.title", "children": [] },
                        "false_value": { "name": "span", "props": ["key:i"], "contents": "todo.title", "children": [] }
                    }
                ]
            },
            ""
        ]
    });

    let result = compile_value(&tree, CompileOptions::default()).unwrap();
    assert_eq!(
        result,
        concat!(
            "jsx(VStack,{spacing:\"2\"},",
            "jsx(Heading,{},\"Todos\"),",
            "state.todos.map((todo, i) => ((todo.done ? (jsx(s,{key:i},todo.title)) : (jsx(span,{key:i},todo.title))))))"
        )
    );
}

#[test]
fn test_match_inside_fragment() {
    let tree = json!({
        "name": "",
        "children": [
            {
                "name": "match",
                "cond": { "_js_expr": "state.tab" },
                "match_cases": [
                    [{ "_js_expr": "\"home\"" }, { "name": "Home", "props": [], "contents": "" }],
                    ["\"a\"", "\"b\"", "\"letters\""]
                ],
                "default": { "name": "NotFound", "props": [], "contents": "" }
            }
        ]
    });

    let result = compile_value(&tree, CompileOptions::default()).unwrap();
    assert!(result.starts_with("jsx(Fragment,{},(() => {\n"));
    assert!(result.ends_with("\n})())"));
    assert!(result.contains("switch (JSON.stringify(state.tab)) {"));

    let home = result.find("case JSON.stringify(\"home\"):").unwrap();
    let a = result.find("case JSON.stringify(\"a\"):").unwrap();
    let b = result.find("case JSON.stringify(\"b\"):").unwrap();
    let default = result.find("default:").unwrap();
    assert!(home < a && a < b && b < default);

    assert_eq!(result.matches("return \"letters\";").count(), 1);
    assert_eq!(result.matches("return jsx(NotFound,{},);").count(), 1);
    assert_eq!(result.matches("break;").count(), 3);
}

#[test]
fn test_error_points_at_offending_node() {
    let tree = json!({
        "name": "div",
        "children": [
            "a",
            {
                "name": "match",
                "cond": "x",
                "match_cases": [["1", "one"]]
            }
        ]
    });

    let err = compile_value(&tree, CompileOptions::default()).unwrap_err();
    assert_eq!(err.path(), Some("root.children[1]"));
    assert!(err.to_string().contains("`default`"));
}

#[test]
fn test_full_module() {
    let source = r#"{
        "imports": [
            { "default": "React", "rest": ["useState", "Fragment"], "lib": "react" },
            { "lib": "./styles.css" }
        ],
        "components": [
            { "name": "App", "props": [], "contents": "", "children": ["\"hello\""] }
        ]
    }"#;

    let module = ModuleInput::from_json(source).unwrap();
    let output = compile_module(&module, CompileOptions::default()).unwrap();
    assert_eq!(
        output,
        "import React, { Fragment, useState } from \"react\"\nimport \"./styles.css\"\n\njsx(App,{},\"hello\")\n"
    );
}

#[test]
fn test_empty_import_spec_is_side_effect_only() {
    let spec: ImportSpec = serde_json::from_value(json!({ "default": "", "rest": [], "lib": "L" })).unwrap();
    assert_eq!(emit_import(&spec), "import \"L\"");
}
