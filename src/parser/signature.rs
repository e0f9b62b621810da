//! Canonical signature rendering.
//!
//! The single source of truth for type rendering across the engine: the
//! extractor stores these strings on symbols, and the diff engine
//! compares them verbatim, so every rendering rule here is part of the
//! matching contract.

use tree_sitter::Node;

use super::helpers::{
    child_field, child_fields, find_child_by_kind, has_child_of_kind, is_exported, named_children,
    node_text,
};
use crate::types::FuncSignature;

/// Render any type expression node to its canonical string form.
///
/// Struct and non-empty interface literals are rendered opaquely;
/// anything unrecognized renders as the literal `unknown`.
pub(crate) fn render_type_expr(node: &Node, source: &str) -> String {
    match node.kind() {
        "type_identifier" | "package_identifier" | "identifier" | "field_identifier" => {
            node_text(node, source).to_string()
        }

        "qualified_type" => {
            let pkg = child_field(node, "package")
                .map(|n| render_type_expr(&n, source))
                .unwrap_or_default();
            let name = child_field(node, "name")
                .map(|n| render_type_expr(&n, source))
                .unwrap_or_default();
            format!("{}.{}", pkg, name)
        }

        "pointer_type" => match node.named_child(0) {
            Some(inner) => format!("*{}", render_type_expr(&inner, source)),
            None => "unknown".to_string(),
        },

        "slice_type" => match child_field(node, "element") {
            Some(elem) => format!("[]{}", render_type_expr(&elem, source)),
            None => "unknown".to_string(),
        },

        "array_type" => {
            let len = child_field(node, "length")
                .map(|n| render_type_expr(&n, source))
                .unwrap_or_default();
            let elem = child_field(node, "element")
                .map(|n| render_type_expr(&n, source))
                .unwrap_or_default();
            format!("[{}]{}", len, elem)
        }

        "map_type" => {
            let key = child_field(node, "key")
                .map(|n| render_type_expr(&n, source))
                .unwrap_or_default();
            let value = child_field(node, "value")
                .map(|n| render_type_expr(&n, source))
                .unwrap_or_default();
            format!("map[{}]{}", key, value)
        }

        "channel_type" => {
            let value = child_field(node, "value")
                .map(|n| render_type_expr(&n, source))
                .unwrap_or_default();
            format!("{}{}", channel_prefix(node), value)
        }

        "function_type" => {
            let sig = extract_func_signature(
                child_field(node, "parameters"),
                child_field(node, "result"),
                source,
            );
            format!("func{}", render_func_signature(&sig))
        }

        "interface_type" => {
            if node.named_child_count() == 0 {
                "interface{}".to_string()
            } else {
                "interface{...}".to_string()
            }
        }

        "struct_type" => "struct{...}".to_string(),

        "generic_type" => {
            let base = child_field(node, "type")
                .map(|n| render_type_expr(&n, source))
                .unwrap_or_default();
            let args = child_field(node, "type_arguments")
                .map(|n| {
                    named_children(&n)
                        .iter()
                        .map(|a| render_type_expr(a, source))
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            format!("{}[{}]", base, args)
        }

        "parenthesized_type" => match node.named_child(0) {
            Some(inner) => format!("({})", render_type_expr(&inner, source)),
            None => "unknown".to_string(),
        },

        // Wrapper around a single type term in interfaces and type
        // argument lists. Union constraints stay opaque.
        "type_elem" => {
            let inner = named_children(node);
            if inner.len() == 1 {
                render_type_expr(&inner[0], source)
            } else {
                "unknown".to_string()
            }
        }

        // Array lengths: literal or constant expressions.
        "int_literal" | "selector_expression" => node_text(node, source).to_string(),

        _ => "unknown".to_string(),
    }
}

/// Canonical prefix for a channel type based on its direction tokens.
fn channel_prefix(node: &Node) -> &'static str {
    let mut cursor = node.walk();
    let kinds: Vec<&str> = node.children(&mut cursor).map(|c| c.kind()).collect();
    match kinds.first() {
        Some(&"<-") => "<-chan ",
        _ if kinds.contains(&"<-") => "chan<- ",
        _ => "chan ",
    }
}

/// Extract structured parameter and result types from a function-shaped
/// node's `parameters` and `result` children.
///
/// A grouped parameter `a, b int` expands to one entry per name; a
/// variadic tail renders as `...T`.
pub(crate) fn extract_func_signature(
    params: Option<Node>,
    result: Option<Node>,
    source: &str,
) -> FuncSignature {
    let mut sig = FuncSignature::default();

    if let Some(list) = params {
        collect_parameter_types(&list, source, &mut sig.params);
    }

    match result {
        Some(node) if node.kind() == "parameter_list" => {
            collect_parameter_types(&node, source, &mut sig.results);
        }
        Some(node) => sig.results.push(render_type_expr(&node, source)),
        None => {}
    }

    sig
}

fn collect_parameter_types(list: &Node, source: &str, out: &mut Vec<String>) {
    for decl in named_children(list) {
        match decl.kind() {
            "parameter_declaration" => {
                let type_str = child_field(&decl, "type")
                    .map(|t| render_type_expr(&t, source))
                    .unwrap_or_else(|| "unknown".to_string());
                let names = child_fields(&decl, "name");
                if names.is_empty() {
                    // Unnamed parameter (common in interface method signatures).
                    out.push(type_str);
                } else {
                    // Expand one entry per name sharing the same type.
                    for _ in &names {
                        out.push(type_str.clone());
                    }
                }
            }
            "variadic_parameter_declaration" => {
                let type_str = child_field(&decl, "type")
                    .map(|t| render_type_expr(&t, source))
                    .unwrap_or_else(|| "unknown".to_string());
                out.push(format!("...{}", type_str));
            }
            _ => {}
        }
    }
}

/// Render a [`FuncSignature`] to its canonical string form:
/// `(T1, T2) R` or `(T1) (R1, R2)`.
pub(crate) fn render_func_signature(sig: &FuncSignature) -> String {
    let params = format!("({})", sig.params.join(", "));
    match sig.results.len() {
        0 => params,
        1 => format!("{} {}", params, sig.results[0]),
        _ => format!("{} ({})", params, sig.results.join(", ")),
    }
}

/// Produce the canonical signature for a type declaration spec.
///
/// Handles alias declarations (`type_alias`), struct and interface
/// declarations, and plain underlying types.
pub(crate) fn type_decl_signature(spec: &Node, source: &str) -> String {
    if spec.kind() == "type_alias" {
        let aliased = child_field(spec, "type")
            .map(|n| render_type_expr(&n, source))
            .unwrap_or_else(|| "unknown".to_string());
        return format!("= {}", aliased);
    }

    match child_field(spec, "type") {
        Some(underlying) => match underlying.kind() {
            "struct_type" => render_struct_signature(&underlying, source),
            "interface_type" => render_interface_signature(&underlying, source),
            _ => render_type_expr(&underlying, source),
        },
        None => String::new(),
    }
}

/// `struct{Field1 Type1; Field2 Type2}` with exported fields only, in
/// declaration order. Embedded fields contribute the type string alone.
fn render_struct_signature(struct_node: &Node, source: &str) -> String {
    let Some(list) = find_child_by_kind(struct_node, "field_declaration_list") else {
        return "struct{}".to_string();
    };

    let mut fields = Vec::new();
    for decl in named_children(&list) {
        if decl.kind() != "field_declaration" {
            continue;
        }

        let type_str = child_field(&decl, "type")
            .map(|t| render_type_expr(&t, source))
            .unwrap_or_else(|| "unknown".to_string());
        let names = child_fields(&decl, "name");

        if names.is_empty() {
            // Embedded field: the type string alone, keeping any pointer.
            if has_child_of_kind(&decl, "*") {
                fields.push(format!("*{}", type_str));
            } else {
                fields.push(type_str);
            }
            continue;
        }

        for name in names {
            let name = node_text(&name, source);
            if !is_exported(name) {
                continue;
            }
            fields.push(format!("{} {}", name, type_str));
        }
    }

    if fields.is_empty() {
        return "struct{}".to_string();
    }
    format!("struct{{{}}}", fields.join("; "))
}

/// `interface{Method1(sig); Method2(sig)}` with entries sorted
/// alphabetically. Embedded interfaces contribute their type string.
fn render_interface_signature(iface_node: &Node, source: &str) -> String {
    let mut entries = Vec::new();

    for member in named_children(iface_node) {
        match member.kind() {
            "method_elem" | "method_spec" => {
                let Some(name) = child_field(&member, "name") else {
                    continue;
                };
                let sig = extract_func_signature(
                    child_field(&member, "parameters"),
                    child_field(&member, "result"),
                    source,
                );
                entries.push(format!(
                    "{}{}",
                    node_text(&name, source),
                    render_func_signature(&sig)
                ));
            }
            "type_elem" => {
                let inner = named_children(&member);
                if inner.len() == 1 {
                    entries.push(render_type_expr(&inner[0], source));
                } else {
                    entries.push("unknown".to_string());
                }
            }
            "type_identifier" | "qualified_type" | "generic_type" => {
                entries.push(render_type_expr(&member, source));
            }
            _ => {}
        }
    }

    entries.sort();

    if entries.is_empty() {
        return "interface{}".to_string();
    }
    format!("interface{{{}}}", entries.join("; "))
}

/// The explicit type of a const or var spec, or empty when untyped.
pub(crate) fn const_var_type(spec: &Node, source: &str) -> String {
    child_field(spec, "type")
        .map(|t| render_type_expr(&t, source))
        .unwrap_or_default()
}
