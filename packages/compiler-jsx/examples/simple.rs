use treejsx_compiler::{compile_module, CompileOptions, ModuleInput};

fn main() {
    let source = r#"{
    "imports": [
        { "lib": "react", "rest": ["Fragment"] },
        { "lib": "@emotion/react", "rest": ["jsx"] }
    ],
    "components": [
        {
            "name": "Box",
            "props": ["className:\"card\""],
            "contents": "",
            "children": [
                { "name": "Heading", "props": [], "contents": "\"Todo\"", "children": [] },
                {
                    "iterable_state": "state.todos",
                    "arg_name": "todo",
                    "arg_index": "index",
                    "children": [
                        { "name": "Text", "props": ["key:index"], "contents": "todo", "children": [] }
                    ]
                },
                {
                    "name": "match",
                    "cond": "state.filter",
                    "match_cases": [["\"done\"", "\"all\"", "\"Showing finished\""]],
                    "default": "\"Showing open\""
                }
            ]
        }
    ]
}"#;

    println!("Compiling component tree to JSX...\n");

    let module = match ModuleInput::from_json(source) {
        Ok(module) => module,
        Err(e) => {
            eprintln!("❌ Invalid input: {}", e);
            return;
        }
    };

    match compile_module(&module, CompileOptions::default()) {
        Ok(code) => {
            println!("✅ Successfully compiled!\n");
            println!("{}", "=".repeat(80));
            println!("{}", code);
            println!("{}", "=".repeat(80));
        }
        Err(e) => {
            eprintln!("❌ Compilation error: {}", e);
        }
    }
}
