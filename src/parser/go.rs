//! Exported-symbol extraction from a single Go source file using tree-sitter.

use tree_sitter::{Node, Parser};

use super::helpers::{child_field, child_fields, find_child_by_kind, is_exported, named_children, node_text};
use super::signature::{
    const_var_type, extract_func_signature, render_func_signature, render_type_expr,
    type_decl_signature,
};
use crate::types::{FuncSigMap, Symbol, SymbolKind};

/// Parse one Go source file and append its exported symbols to `entries`.
///
/// Files declaring `package main` contribute nothing. Returns an error
/// message when the source cannot be parsed; the caller decides how to
/// report it.
pub(crate) fn collect_exports(
    source: &str,
    pkg_path: &str,
    entries: &mut Vec<Symbol>,
    sig_map: &mut FuncSigMap,
) -> Result<(), String> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| format!("failed to set Go language: {}", e))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| "failed to parse Go source".to_string())?;
    let root = tree.root_node();

    if root.has_error() {
        return Err("syntax error".to_string());
    }

    if package_name(&root, source).as_deref() == Some("main") {
        return Ok(());
    }

    for child in named_children(&root) {
        match child.kind() {
            "function_declaration" => collect_function(&child, source, pkg_path, entries, sig_map),
            "method_declaration" => collect_method(&child, source, pkg_path, entries, sig_map),
            "type_declaration" => collect_types(&child, source, pkg_path, entries),
            "const_declaration" => {
                collect_values(&child, source, pkg_path, SymbolKind::Constant, entries)
            }
            "var_declaration" => {
                collect_values(&child, source, pkg_path, SymbolKind::Variable, entries)
            }
            _ => {}
        }
    }

    Ok(())
}

/// The declared package name from the package clause.
fn package_name(root: &Node, source: &str) -> Option<String> {
    let clause = find_child_by_kind(root, "package_clause")?;
    let ident = find_child_by_kind(&clause, "package_identifier")?;
    Some(node_text(&ident, source).to_string())
}

fn collect_function(
    node: &Node,
    source: &str,
    pkg_path: &str,
    entries: &mut Vec<Symbol>,
    sig_map: &mut FuncSigMap,
) {
    let Some(name_node) = child_field(node, "name") else {
        return;
    };
    let name = node_text(&name_node, source);
    if !is_exported(name) {
        return;
    }

    let sig = extract_func_signature(
        child_field(node, "parameters"),
        child_field(node, "result"),
        source,
    );

    let sym = Symbol {
        name: name.to_string(),
        kind: SymbolKind::Function,
        package: pkg_path.to_string(),
        receiver: String::new(),
        signature: render_func_signature(&sig),
    };
    sig_map.insert(sym.key(), sig);
    entries.push(sym);
}

fn collect_method(
    node: &Node,
    source: &str,
    pkg_path: &str,
    entries: &mut Vec<Symbol>,
    sig_map: &mut FuncSigMap,
) {
    let Some(name_node) = child_field(node, "name") else {
        return;
    };
    let name = node_text(&name_node, source);
    if !is_exported(name) {
        return;
    }

    // Methods on unexported receiver types are not part of the API surface.
    let receiver = receiver_type_name(node, source);
    if receiver.is_empty() || !is_exported(&receiver) {
        return;
    }

    let sig = extract_func_signature(
        child_field(node, "parameters"),
        child_field(node, "result"),
        source,
    );

    let sym = Symbol {
        name: format!("{}.{}", receiver, name),
        kind: SymbolKind::Method,
        package: pkg_path.to_string(),
        receiver,
        signature: render_func_signature(&sig),
    };
    sig_map.insert(sym.key(), sig);
    entries.push(sym);
}

/// The base type name of a method receiver, or empty when unresolvable.
fn receiver_type_name(method: &Node, source: &str) -> String {
    let Some(recv_list) = child_field(method, "receiver") else {
        return String::new();
    };
    let Some(decl) = find_child_by_kind(&recv_list, "parameter_declaration") else {
        return String::new();
    };
    match child_field(&decl, "type") {
        Some(ty) => base_type_name(&ty, source),
        None => String::new(),
    }
}

/// Extract the base type name from a type expression, stripping pointers,
/// type parameters, and package selectors.
/// Examples: `*Client` -> `Client`, `Foo[T]` -> `Foo`, `pkg.Bar` -> `Bar`.
fn base_type_name(node: &Node, source: &str) -> String {
    let mut node = *node;

    if node.kind() == "pointer_type" {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => return String::new(),
        }
    }

    if node.kind() == "generic_type" {
        match child_field(&node, "type") {
            Some(base) => node = base,
            None => return String::new(),
        }
    }

    match node.kind() {
        "type_identifier" => node_text(&node, source).to_string(),
        "qualified_type" => child_field(&node, "name")
            .map(|n| node_text(&n, source).to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn collect_types(decl: &Node, source: &str, pkg_path: &str, entries: &mut Vec<Symbol>) {
    for spec in named_children(decl) {
        if spec.kind() != "type_spec" && spec.kind() != "type_alias" {
            continue;
        }
        let Some(name_node) = child_field(&spec, "name") else {
            continue;
        };
        let type_name = node_text(&name_node, source);
        if !is_exported(type_name) {
            continue;
        }

        let underlying = child_field(&spec, "type");
        let kind = match underlying.as_ref().map(|n| n.kind()) {
            Some("interface_type") => SymbolKind::Interface,
            _ => SymbolKind::Type,
        };

        entries.push(Symbol {
            name: type_name.to_string(),
            kind,
            package: pkg_path.to_string(),
            receiver: String::new(),
            signature: type_decl_signature(&spec, source),
        });

        // Exported fields of struct types become symbols of their own.
        if let Some(underlying) = underlying {
            if underlying.kind() == "struct_type" {
                collect_struct_fields(&underlying, source, pkg_path, type_name, entries);
            }
        }
    }
}

fn collect_struct_fields(
    struct_node: &Node,
    source: &str,
    pkg_path: &str,
    type_name: &str,
    entries: &mut Vec<Symbol>,
) {
    let Some(list) = find_child_by_kind(struct_node, "field_declaration_list") else {
        return;
    };

    for field in named_children(&list) {
        if field.kind() != "field_declaration" {
            continue;
        }

        let Some(type_node) = child_field(&field, "type") else {
            continue;
        };
        let names = child_fields(&field, "name");

        if names.is_empty() {
            // Embedded field: emit if the base type name is exported.
            let emb_name = base_type_name(&type_node, source);
            if emb_name.is_empty() || !is_exported(&emb_name) {
                continue;
            }
            let mut type_str = render_type_expr(&type_node, source);
            if super::helpers::has_child_of_kind(&field, "*") {
                type_str.insert(0, '*');
            }
            entries.push(Symbol {
                name: format!("{}.{}", type_name, emb_name),
                kind: SymbolKind::Field,
                package: pkg_path.to_string(),
                receiver: String::new(),
                signature: type_str,
            });
            continue;
        }

        for name in names {
            let field_name = node_text(&name, source);
            if !is_exported(field_name) {
                continue;
            }
            entries.push(Symbol {
                name: format!("{}.{}", type_name, field_name),
                kind: SymbolKind::Field,
                package: pkg_path.to_string(),
                receiver: String::new(),
                signature: render_type_expr(&type_node, source),
            });
        }
    }
}

fn collect_values(
    decl: &Node,
    source: &str,
    pkg_path: &str,
    kind: SymbolKind,
    entries: &mut Vec<Symbol>,
) {
    for spec in named_children(decl) {
        if spec.kind() != "const_spec" && spec.kind() != "var_spec" {
            continue;
        }
        for name_node in child_fields(&spec, "name") {
            let name = node_text(&name_node, source);
            if !is_exported(name) {
                continue;
            }
            entries.push(Symbol {
                name: name.to_string(),
                kind,
                package: pkg_path.to_string(),
                receiver: String::new(),
                signature: const_var_type(&spec, source),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SymbolKey;

    fn extract(source: &str) -> (Vec<Symbol>, FuncSigMap) {
        let mut entries = Vec::new();
        let mut sig_map = FuncSigMap::new();
        collect_exports(source, "mod", &mut entries, &mut sig_map).expect("collect_exports");
        (entries, sig_map)
    }

    fn find<'a>(entries: &'a [Symbol], name: &str) -> &'a Symbol {
        entries
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("symbol {} not found", name))
    }

    #[test]
    fn test_collect_function() {
        let source = r#"
package testmod

func Hello(name string) string {
	return "Hello, " + name
}

func internal() {}
"#;
        let (entries, sig_map) = extract(source);
        assert_eq!(entries.len(), 1);

        let sym = find(&entries, "Hello");
        assert_eq!(sym.kind, SymbolKind::Function);
        assert_eq!(sym.signature, "(string) string");
        assert!(sig_map.contains_key(&sym.key()));
    }

    #[test]
    fn test_collect_method_with_pointer_receiver() {
        let source = r#"
package testmod

type Config struct{}

func (c *Config) Validate() error {
	return nil
}
"#;
        let (entries, _) = extract(source);
        let sym = find(&entries, "Config.Validate");
        assert_eq!(sym.kind, SymbolKind::Method);
        assert_eq!(sym.receiver, "Config");
        assert_eq!(sym.signature, "() error");
    }

    #[test]
    fn test_collect_method_with_generic_receiver() {
        let source = r#"
package testmod

type List[T any] struct{}

func (l *List[T]) Len() int {
	return 0
}
"#;
        let (entries, _) = extract(source);
        let sym = find(&entries, "List.Len");
        assert_eq!(sym.receiver, "List");
    }

    #[test]
    fn test_method_on_unexported_receiver_dropped() {
        let source = r#"
package testmod

type hidden struct{}

func (h *hidden) Exposed() {}
"#;
        let (entries, _) = extract(source);
        assert!(entries.iter().all(|s| s.kind != SymbolKind::Method));
    }

    #[test]
    fn test_collect_struct_with_fields() {
        let source = r#"
package testmod

type User struct {
	Name string
	Age  int
	note string
}
"#;
        let (entries, _) = extract(source);

        let user = find(&entries, "User");
        assert_eq!(user.kind, SymbolKind::Type);
        assert_eq!(user.signature, "struct{Name string; Age int}");

        let name = find(&entries, "User.Name");
        assert_eq!(name.kind, SymbolKind::Field);
        assert_eq!(name.signature, "string");

        assert!(entries.iter().all(|s| s.name != "User.note"));
    }

    #[test]
    fn test_collect_embedded_field() {
        let source = r#"
package testmod

type Wrapped struct {
	Base
	inner
}
"#;
        let (entries, _) = extract(source);
        let emb = find(&entries, "Wrapped.Base");
        assert_eq!(emb.kind, SymbolKind::Field);
        assert_eq!(emb.signature, "Base");
        assert!(entries.iter().all(|s| s.name != "Wrapped.inner"));
    }

    #[test]
    fn test_collect_interface() {
        let source = r#"
package testmod

type Handler interface {
	Handle(req string) error
	Close() error
}
"#;
        let (entries, _) = extract(source);
        let sym = find(&entries, "Handler");
        assert_eq!(sym.kind, SymbolKind::Interface);
        assert_eq!(
            sym.signature,
            "interface{Close() error; Handle(string) error}"
        );
    }

    #[test]
    fn test_collect_const_and_var() {
        let source = r#"
package testmod

const MaxRetries int = 3

const untypedPrivate = 1

const UntypedConst = "hello"

var ErrNotFound error
"#;
        let (entries, sig_map) = extract(source);

        let max = find(&entries, "MaxRetries");
        assert_eq!(max.kind, SymbolKind::Constant);
        assert_eq!(max.signature, "int");

        let untyped = find(&entries, "UntypedConst");
        assert_eq!(untyped.signature, "");

        let err = find(&entries, "ErrNotFound");
        assert_eq!(err.kind, SymbolKind::Variable);
        assert_eq!(err.signature, "error");

        assert!(entries.iter().all(|s| s.name != "untypedPrivate"));
        // Values never enter the signature map.
        assert!(sig_map.keys().all(|k| k.kind == SymbolKind::Function));
    }

    #[test]
    fn test_grouped_declarations() {
        let source = r#"
package testmod

const (
	StateIdle State = iota
	StateBusy
)

var (
	Registry map[string]int
	tracker  int
)
"#;
        let (entries, _) = extract(source);
        assert_eq!(find(&entries, "StateIdle").signature, "State");
        assert_eq!(find(&entries, "StateBusy").signature, "");
        assert_eq!(find(&entries, "Registry").signature, "map[string]int");
        assert!(entries.iter().all(|s| s.name != "tracker"));
    }

    #[test]
    fn test_variadic_signature() {
        let source = r#"
package testmod

func Variadic(args ...string) int {
	return len(args)
}
"#;
        let (entries, sig_map) = extract(source);
        let sym = find(&entries, "Variadic");
        assert_eq!(sym.signature, "(...string) int");

        let sig = &sig_map[&sym.key()];
        assert_eq!(sig.params, vec!["...string"]);
        assert_eq!(sig.results, vec!["int"]);
    }

    #[test]
    fn test_package_main_skipped() {
        let source = r#"
package main

func MainFunc() {}
"#;
        let (entries, _) = extract(source);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let source = "package p\n\nfunc Broken( {\n";
        let mut entries = Vec::new();
        let mut sig_map = FuncSigMap::new();
        let result = collect_exports(source, "mod", &mut entries, &mut sig_map);
        assert!(result.is_err());
        assert!(entries.is_empty());
    }

    #[test]
    fn test_sig_map_keys() {
        let source = r#"
package testmod

func DoWork(ctx context.Context, name string) (string, error) {
	return "", nil
}
"#;
        let (_, sig_map) = extract(source);
        let key = SymbolKey {
            package: "mod".to_string(),
            kind: SymbolKind::Function,
            name: "DoWork".to_string(),
        };
        let sig = sig_map.get(&key).expect("DoWork signature");
        assert_eq!(sig.params, vec!["context.Context", "string"]);
        assert_eq!(sig.results, vec!["string", "error"]);
    }
}
