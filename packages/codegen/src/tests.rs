use crate::{generate_page_code, Framework, GenerationOptions, StructuralError, WarningKind, PROP_PLACEHOLDER};
use ditto_schema::{PageDocument, RefError};
use regex::Regex;
use serde_json::{json, Value};

/// A page rooted at a `div` with the given children, merged with extra
/// top-level document fields
fn page(children: &[&str], components: Value, extra: Value) -> PageDocument {
    let refs: Vec<Value> = children
        .iter()
        .map(|id| json!({ "current": id, "isText": false }))
        .collect();

    let mut indexes = json!({
        "root": { "id": "root", "name": "div", "children": refs }
    });
    if let (Some(target), Some(components)) = (indexes.as_object_mut(), components.as_object()) {
        for (id, node) in components {
            target.insert(id.clone(), node.clone());
        }
    }

    let mut source = json!({
        "id": "page1",
        "name": "index",
        "child": { "current": "root", "isText": false },
        "componentIndexes": indexes
    });
    if let (Some(target), Some(extra)) = (source.as_object_mut(), extra.as_object()) {
        for (key, value) in extra {
            target.insert(key.clone(), value.clone());
        }
    }
    PageDocument::from_json(&source.to_string()).expect("Failed to parse document")
}

fn toggle_page() -> PageDocument {
    page(
        &["btn", "search", "tip"],
        json!({
            "btn": { "id": "btn", "name": "Button", "packageName": "antd" },
            "search": { "id": "search", "name": "Input.Search", "packageName": "antd" },
            "tip": { "id": "tip", "name": "Alert", "packageName": "antd" }
        }),
        json!({
            "props": {
                "btn": { "title": { "value": "Toggle", "valueSource": "editorInput", "valueType": "string" } },
                "search": { "value": { "value": "", "valueSource": "userInput", "valueType": "string" } },
                "tip": { "message": { "value": "Hello" } }
            },
            "actions": {
                "toggleTip": { "id": "toggleTip", "type": "visibilityToggle", "payload": { "target": "tip" } }
            },
            "events": {
                "e1": { "id": "e1", "trigger": "onClick", "componentId": "btn", "actionList": ["toggleTip"] }
            }
        }),
    )
}

fn generate(doc: &PageDocument) -> String {
    generate_with(doc, &GenerationOptions::default())
}

fn generate_with(doc: &PageDocument, options: &GenerationOptions) -> String {
    let result = generate_page_code(doc, options);
    assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);
    result.page_code.expect("Failed to generate")
}

fn vue() -> GenerationOptions {
    GenerationOptions::default().with_framework(Framework::Vue)
}

fn paginated_table_page() -> PageDocument {
    page(
        &["table"],
        json!({ "table": { "id": "table", "name": "Table", "packageName": "antd" } }),
        json!({
            "props": {
                "table": {
                    "current": { "value": 1, "valueSource": "state", "valueType": "number" },
                    "pagination": {
                        "value": "() => ({ current: current, pageSize: 10 })",
                        "valueSource": "computed",
                        "valueType": "function"
                    }
                }
            }
        }),
    )
}

#[test]
fn test_full_page() {
    let code = generate(&toggle_page());
    println!("Generated code:\n{}", code);

    let expected = r#"import React from 'react';
import { useState } from 'react';
import { Button, Input, Alert } from 'antd';

export default function Page() {
  const [alertVisible, setAlertVisible] = useState<boolean>(true);
  const [inputSearchValue, setInputSearchValue] = useState<string>('');
  const handleClickingOfButton1 = (...args: any[]) => {
    setAlertVisible((visible) => !visible);
  };

  return (
    <div >
      <Button title="Toggle" onClick={handleClickingOfButton1} />
      <Input.Search value={inputSearchValue} onChange={(e: any) => setInputSearchValue(e?.target?.value ?? e)} />
      {alertVisible && (
        <Alert message="Hello" />
      )}
    </div>
  );
}
"#;
    assert_eq!(code, expected);
}

#[test]
fn test_generation_is_deterministic() {
    let doc = toggle_page();
    let first = generate_page_code(&doc, &GenerationOptions::default());
    let second = generate_page_code(&doc, &GenerationOptions::default());
    assert_eq!(first, second);
    assert!(first.page_code.is_some());
}

#[test]
fn test_imports_are_unique() {
    let doc = page(
        &["a", "b", "c"],
        json!({
            "a": { "id": "a", "name": "Button", "packageName": "antd" },
            "b": { "id": "b", "name": "Button", "packageName": "antd" },
            "c": { "id": "c", "name": "Input.Search", "packageName": "antd" }
        }),
        json!({}),
    );
    let code = generate(&doc);

    assert!(code.contains("import { Button, Input } from 'antd';"));
    assert_eq!(code.matches("from 'antd'").count(), 1);
    assert_eq!(code.matches("import React from 'react';").count(), 1);
    // no hooks, no hook import
    assert!(!code.contains("import {  }"));
    assert!(!code.contains("useState"));
}

#[test]
fn test_leaves_are_self_closing() {
    let doc = toggle_page();
    let jsx = generate_page_code(&doc, &GenerationOptions::simple())
        .page_code
        .expect("Failed to generate");

    let self_closing = Regex::new(r"^<Button(\s+\S+)*\s*/>$").expect("regex");
    let button = jsx
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("<Button"))
        .expect("button line");
    assert!(self_closing.is_match(button), "not self-closing: {}", button);
}

#[test]
fn test_simple_mode_with_root() {
    let doc = toggle_page();
    let options = GenerationOptions::simple().with_root("btn");
    let result = generate_page_code(&doc, &options);

    assert_eq!(
        result.page_code.as_deref(),
        Some("<Button title=\"Toggle\" onClick={handleClickingOfButton1} />")
    );
}

#[test]
fn test_simple_mode_is_unindented_markup() {
    let jsx = generate_page_code(&toggle_page(), &GenerationOptions::simple())
        .page_code
        .expect("Failed to generate");

    assert!(jsx.starts_with("<div >\n"));
    assert!(jsx.ends_with("</div>"));
    assert!(jsx.contains("\n  {alertVisible && (\n    <Alert message=\"Hello\" />\n  )}\n"));
    assert!(!jsx.contains("import"));
    assert!(!jsx.contains("useState"));
}

#[test]
fn test_component_name_option() {
    let options = GenerationOptions::default().with_component_name("user list");
    let code = generate_page_code(&toggle_page(), &options)
        .page_code
        .expect("Failed to generate");
    assert!(code.contains("export default function UserList() {"));
}

#[test]
fn test_dangling_reference_aborts() {
    let doc = page(
        &["btn", "ghost"],
        json!({ "btn": { "id": "btn", "name": "Button", "packageName": "antd" } }),
        json!({}),
    );
    let result = generate_page_code(&doc, &GenerationOptions::default());

    assert!(!result.is_ok());
    assert!(result.page_code.is_none());
    assert_eq!(
        result.errors,
        vec![StructuralError::Reference(RefError::Dangling {
            id: "ghost".to_string(),
            parent: Some("root".to_string()),
        })]
    );
}

#[test]
fn test_missing_root_override_aborts() {
    let result = generate_page_code(&toggle_page(), &GenerationOptions::simple().with_root("nope"));
    assert!(result.page_code.is_none());
    assert!(matches!(
        result.errors.as_slice(),
        [StructuralError::Reference(RefError::Dangling { id, parent: None })] if id == "nope"
    ));
}

#[test]
fn test_conflicting_default_imports_abort() {
    let doc = page(
        &["a", "b"],
        json!({
            "a": { "id": "a", "name": "Chart", "packageName": "charts", "importType": "default" },
            "b": { "id": "b", "name": "Graph", "packageName": "charts", "importType": "default" }
        }),
        json!({}),
    );
    let result = generate_page_code(&doc, &GenerationOptions::default());

    assert!(result.page_code.is_none());
    assert!(matches!(
        result.errors.as_slice(),
        [StructuralError::DuplicateDefaultImport { specifier, .. }] if specifier == "charts"
    ));
}

#[test]
fn test_http_handler_is_async() {
    let doc = page(
        &["btn"],
        json!({ "btn": { "id": "btn", "name": "Button", "packageName": "antd" } }),
        json!({
            "props": {
                "btn": { "onClick": { "value": "h1", "valueSource": "handler", "valueType": "function" } }
            },
            "handlers": { "h1": ["load"] },
            "httpServices": {
                "users": { "id": "users", "name": "users", "url": "/api/users", "method": "GET" }
            },
            "actions": {
                "load": { "id": "load", "type": "httpRequest", "payload": {
                    "service": "users",
                    "query": { "id": 1 },
                    "data": { "ignored": true }
                } }
            }
        }),
    );
    let code = generate(&doc);

    assert!(code.contains(
        "  const handleClickingOfButton1 = async (...args: any[]) => {\n    await fetch('/api/users' + '?' + new URLSearchParams({ id: 1 }).toString(), {\n      method: 'GET'\n    });\n  };\n"
    ));
    assert!(!code.contains("JSON.stringify"));
    assert!(code.contains("<Button onClick={handleClickingOfButton1} />"));
}

#[test]
fn test_layer_actions_promote_open_state() {
    let doc = page(
        &["show", "dialog"],
        json!({
            "show": { "id": "show", "name": "Button", "packageName": "antd" },
            "dialog": { "id": "dialog", "name": "Modal", "packageName": "antd" }
        }),
        json!({
            "props": {
                "dialog": { "title": { "value": "Details" } }
            },
            "actions": {
                "open": { "id": "open", "type": "openLayer", "payload": { "target": "dialog" } },
                "close": { "id": "close", "type": "closeLayer", "payload": { "target": "dialog" } }
            },
            "events": {
                "click": { "id": "click", "trigger": "onClick", "componentId": "show", "actionList": ["open"] },
                "cancel": { "id": "cancel", "trigger": "onCancel", "componentId": "dialog", "actionList": ["close"] }
            }
        }),
    );
    let code = generate(&doc);

    assert!(code.contains("const [modalOpen, setModalOpen] = useState<boolean>(false);"));
    assert!(code.contains("<Modal title=\"Details\" open={modalOpen} onCancel={handleCancelingOfModal1} />"));
    assert!(code.contains("const handleClickingOfButton1 = (...args: any[]) => {\n    setModalOpen(true);\n  };"));
    assert!(code.contains("const handleCancelingOfModal1 = (...args: any[]) => {\n    setModalOpen(false);\n  };"));
}

#[test]
fn test_lifecycle_event_becomes_effect() {
    let doc = page(
        &[],
        json!({}),
        json!({
            "actions": {
                "greet": { "id": "greet", "type": "dataConversion", "payload": { "code": "console.log('ready');" } }
            },
            "events": {
                "mount": { "id": "mount", "trigger": "onMount", "actionList": ["greet"] }
            }
        }),
    );
    let code = generate(&doc);

    assert!(code.starts_with("import React from 'react';\nimport { useEffect } from 'react';\n\n"));
    assert!(code.contains("  useEffect(() => {\n    console.log('ready');\n  }, []);\n"));
    assert!(code.contains("    <div />\n"));
}

#[test]
fn test_hoisted_data_goes_to_module_scope() {
    let doc = page(
        &["table"],
        json!({ "table": { "id": "table", "name": "Table", "packageName": "antd" } }),
        json!({
            "props": {
                "table": { "dataSource": { "value": [{ "name": "a" }], "valueType": "array" } }
            }
        }),
    );
    let code = generate(&doc);

    let constant = code.find("const tableDataSource = [").expect("hoisted constant");
    let component = code.find("export default function Page()").expect("component");
    assert!(constant < component);
    assert!(code.contains("<Table dataSource={tableDataSource} />"));
}

#[test]
fn test_degraded_output_keeps_placeholder() {
    let doc = page(
        &["btn"],
        json!({ "btn": { "id": "btn", "name": "Button", "packageName": "antd" } }),
        json!({
            "props": {
                "btn": { "onClick": { "value": null, "valueType": "function" } }
            }
        }),
    );
    let result = generate_page_code(&doc, &GenerationOptions::default());

    let code = result.page_code.expect("Failed to generate");
    assert!(code.contains(PROP_PLACEHOLDER));
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, WarningKind::UnresolvedFunctionProp);
    assert_eq!(result.warnings[0].component_id.as_deref(), Some("btn"));
}

#[test]
fn test_computed_prop_keeps_object_keys() {
    let code = generate(&paginated_table_page());

    assert!(code.contains(
        "  const tablePagination = useMemo(() => {\n    return ({ current: tableCurrent, pageSize: 10 });\n  }, [tableCurrent]);\n"
    ));
    assert!(code.contains("<Table current={tableCurrent} pagination={tablePagination} />"));
    assert!(code.contains("import { useState, useMemo } from 'react';"));
}

#[test]
fn test_computed_prop_reads_other_component_state() {
    let doc = page(
        &["btn", "input"],
        json!({
            "btn": { "id": "btn", "name": "Button", "packageName": "antd" },
            "input": { "id": "input", "name": "Input", "packageName": "antd" }
        }),
        json!({
            "props": {
                "btn": { "disabled": { "value": "() => !inputValue", "valueSource": "computed", "valueType": "function" } },
                "input": { "value": { "value": "", "valueSource": "userInput", "valueType": "string" } }
            }
        }),
    );
    let code = generate(&doc);

    assert!(code.contains("  const buttonDisabled = useMemo(() => {\n    return !inputValue;\n  }, [inputValue]);\n"));
    let state = code.find("const [inputValue, setInputValue]").expect("state");
    let memo = code.find("const buttonDisabled").expect("memo");
    assert!(state < memo);
}

#[test]
fn test_vue_full_page() {
    let code = generate_with(&toggle_page(), &vue());
    println!("Generated code:\n{}", code);

    let expected = r#"<template>
  <div>
    <Button title="Toggle" @click="handleClickingOfButton1" />
    <Input.Search :value="inputSearchValue" @change="(e: any) => inputSearchValue = e?.target?.value ?? e" />
    <template v-if="alertVisible">
      <Alert message="Hello" />
    </template>
  </div>
</template>

<script lang="ts" setup>
import { ref } from 'vue';
import { Button, Input, Alert } from 'antd';

const alertVisible = ref<boolean>(true);
const inputSearchValue = ref<string>('');
const handleClickingOfButton1 = (...args: any[]) => {
  alertVisible.value = !alertVisible.value;
};
</script>
"#;
    assert_eq!(code, expected);
}

#[test]
fn test_vue_computed_unwraps_refs() {
    let code = generate_with(&paginated_table_page(), &vue());

    assert!(code.contains("import { ref, computed } from 'vue';"));
    assert!(code.contains("const tableCurrent = ref<number>(1);"));
    assert!(code.contains(
        "const tablePagination = computed(() => {\n  return ({ current: tableCurrent.value, pageSize: 10 });\n});\n"
    ));
    assert!(code.contains("<Table :current=\"tableCurrent\" :pagination=\"tablePagination\" />"));
}

#[test]
fn test_vue_lifecycle_and_module_scope() {
    let doc = page(
        &["table"],
        json!({ "table": { "id": "table", "name": "Table", "packageName": "antd" } }),
        json!({
            "props": {
                "table": { "dataSource": { "value": [{ "name": "a" }], "valueType": "array" } }
            },
            "actions": {
                "tick": { "id": "tick", "type": "dataConversion", "payload": { "code": "refresh();" } }
            },
            "events": {
                "poll": { "id": "poll", "trigger": "interval", "actionList": ["tick"], "interval": 3000 }
            }
        }),
    );
    let code = generate_with(&doc, &vue());

    assert!(code.contains("import { onMounted, onUnmounted } from 'vue';"));
    assert!(code.contains(
        "const tableDataSource = [\n  {\n    name: 'a'\n  }\n];\n\nonMounted(() => {\n  const timer = setInterval(() => {\n    refresh();\n  }, 3000);\n  onUnmounted(() => clearInterval(timer));\n});\n</script>\n"
    ));
    assert!(code.contains("<Table :dataSource=\"tableDataSource\" />"));
    assert!(!code.contains("import React"));
}

#[test]
fn test_vue_simple_mode_is_template_markup() {
    let markup = generate_page_code(&toggle_page(), &GenerationOptions::simple().with_framework(Framework::Vue))
        .page_code
        .expect("Failed to generate");

    assert!(markup.starts_with("<div>\n"));
    assert!(markup.contains("\n  <template v-if=\"alertVisible\">\n    <Alert message=\"Hello\" />\n  </template>\n"));
    assert!(!markup.contains("<script"));
}
