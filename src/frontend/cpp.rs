// C++ front-end on tree-sitter
//
// Parses one file with tree-sitter-cpp and lowers the concrete syntax tree
// into the AstNode model: declared names resolved, declarators drilled down
// to their identifier, wrapper nodes (declarations, templates, linkage
// specifications, preprocessor conditionals) flattened away. Every location
// carries the path the caller handed in, since tree-sitter sees exactly one
// file and never expands includes.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::debug;
use tree_sitter::{Node, Parser};

use crate::frontend::{AstKind, AstNode, Frontend, SourceLocation};

/// Tree-sitter based C++ front-end.
pub struct CppFrontend;

impl CppFrontend {
    pub fn new() -> Self {
        Self
    }

    /// Parse already-loaded source text. Split out from `parse` so tests can
    /// feed snippets without touching the filesystem.
    pub fn parse_source(&self, content: &str, file: &Path) -> Result<AstNode> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_cpp::LANGUAGE.into())
            .map_err(|e| anyhow!("failed to load C++ grammar: {}", e))?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| anyhow!("parser produced no tree for {}", file.display()))?;

        let lowerer = Lowerer { content, file };
        Ok(AstNode {
            kind: AstKind::TranslationUnit,
            spelling: file.to_string_lossy().into_owned(),
            location: None,
            children: lowerer.lower_children(tree.root_node(), None),
        })
    }
}

impl Default for CppFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl Frontend for CppFrontend {
    fn parse(&self, file: &Path, extra_args: &[String]) -> Result<AstNode> {
        if !extra_args.is_empty() {
            // Compiler flags are part of the front-end contract but the
            // tree-sitter grammar takes no configuration.
            debug!(
                "ignoring {} compiler flag(s) for {}",
                extra_args.len(),
                file.display()
            );
        }

        let content = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        self.parse_source(&content, file)
    }
}

/// Lowers tree-sitter CST nodes into AstNode trees for one file.
struct Lowerer<'a> {
    content: &'a str,
    file: &'a Path,
}

impl<'a> Lowerer<'a> {
    fn lower_children(&self, node: Node, class_ctx: Option<&str>) -> Vec<AstNode> {
        let mut out = Vec::new();
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            self.lower(child, class_ctx, &mut out);
        }
        out
    }

    /// One CST node can lower to zero, one, or several AstNodes (wrappers
    /// vanish, multi-declarator declarations fan out), so results are pushed
    /// into `out` rather than returned.
    fn lower(&self, node: Node, class_ctx: Option<&str>, out: &mut Vec<AstNode>) {
        match node.kind() {
            "namespace_definition" => self.lower_namespace(node, out),
            "class_specifier" => self.lower_record(node, AstKind::Class, out),
            "struct_specifier" => self.lower_record(node, AstKind::Struct, out),
            "enum_specifier" => self.lower_enum(node, out),
            "type_definition" => self.lower_typedef(node, out),
            "alias_declaration" => self.lower_alias(node, out),
            "function_definition" => {
                if let Some(declarator) = node.child_by_field_name("declarator") {
                    if let Some(func) = self.lower_declarator_function(declarator, class_ctx) {
                        out.push(func);
                    }
                }
            }
            "declaration" => self.lower_declaration(node, class_ctx, out),
            "field_declaration" => self.lower_field_declaration(node, class_ctx, out),
            "union_specifier" => {
                // Unions are not a recorded kind; their members still surface,
                // without the union name opening a scope.
                if let Some(body) = node.child_by_field_name("body") {
                    out.push(AstNode {
                        kind: AstKind::Other,
                        spelling: String::new(),
                        location: Some(self.location(node)),
                        children: self.lower_children(body, None),
                    });
                }
            }
            // Wrappers with nothing to record of their own: their contents
            // surface as if declared directly at the enclosing level.
            _ => out.extend(self.lower_children(node, class_ctx)),
        }
    }

    fn lower_namespace(&self, node: Node, out: &mut Vec<AstNode>) {
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let children = self.lower_children(body, None);

        match node.child_by_field_name("name") {
            // `namespace a::b { ... }` opens one scope per segment
            Some(name) if name.kind() == "nested_namespace_specifier" => {
                let mut cursor = name.walk();
                let segments: Vec<Node> = name
                    .named_children(&mut cursor)
                    .filter(|c| c.kind() == "namespace_identifier")
                    .collect();

                let mut current = children;
                for segment in segments.into_iter().rev() {
                    current = vec![AstNode {
                        kind: AstKind::Namespace,
                        spelling: self.text(segment),
                        location: Some(self.location(segment)),
                        children: current,
                    }];
                }
                out.extend(current);
            }
            Some(name) => out.push(AstNode {
                kind: AstKind::Namespace,
                spelling: self.text(name),
                location: Some(self.location(name)),
                children,
            }),
            // Anonymous namespaces keep their position in the hierarchy with
            // an empty spelling.
            None => out.push(AstNode {
                kind: AstKind::Namespace,
                spelling: String::new(),
                location: Some(self.location(node)),
                children,
            }),
        }
    }

    fn lower_record(&self, node: Node, kind: AstKind, out: &mut Vec<AstNode>) {
        let (spelling, location) = match self.record_name(node) {
            Some(name) => (self.text(name), self.location(name)),
            None => (String::new(), self.location(node)),
        };

        let children = match node.child_by_field_name("body") {
            Some(body) => self.lower_children(body, Some(spelling.as_str())),
            None => Vec::new(), // forward declaration
        };

        out.push(AstNode {
            kind,
            spelling,
            location: Some(location),
            children,
        });
    }

    /// Name node of a class/struct, drilling template specializations like
    /// `Vector<bool>` down to the bare type identifier.
    fn record_name<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        let name = node.child_by_field_name("name")?;
        if name.kind() == "template_type" {
            let mut cursor = name.walk();
            return name
                .named_children(&mut cursor)
                .find(|c| c.kind() == "type_identifier")
                .or(Some(name));
        }
        Some(name)
    }

    fn lower_enum(&self, node: Node, out: &mut Vec<AstNode>) {
        let (spelling, location) = match node.child_by_field_name("name") {
            Some(name) => (self.text(name), self.location(name)),
            None => (String::new(), self.location(node)),
        };

        let mut enumerators = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            let children: Vec<Node> = body.named_children(&mut cursor).collect();
            for child in children {
                if child.kind() != "enumerator" {
                    continue;
                }
                let Some(name) = child.child_by_field_name("name") else {
                    continue;
                };
                enumerators.push(AstNode {
                    kind: AstKind::Enumerator,
                    spelling: self.text(name),
                    location: Some(self.location(name)),
                    children: Vec::new(),
                });
            }
        }

        out.push(AstNode {
            kind: AstKind::Enum,
            spelling,
            location: Some(location),
            children: enumerators,
        });
    }

    fn lower_typedef(&self, node: Node, out: &mut Vec<AstNode>) {
        // `typedef struct { ... } X;` defines the aggregate too
        self.lower_inline_type(node, None, out);

        for declarator in self.declarators(node) {
            if let Some(name) = innermost_name(declarator) {
                out.push(AstNode {
                    kind: AstKind::TypeAlias,
                    spelling: self.text(name),
                    location: Some(self.location(name)),
                    children: Vec::new(),
                });
            }
        }
    }

    fn lower_alias(&self, node: Node, out: &mut Vec<AstNode>) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        out.push(AstNode {
            kind: AstKind::TypeAlias,
            spelling: self.text(name),
            location: Some(self.location(name)),
            children: Vec::new(),
        });
    }

    fn lower_declaration(&self, node: Node, class_ctx: Option<&str>, out: &mut Vec<AstNode>) {
        let declarators = self.declarators(node);

        // An inline aggregate definition used as the declared type, or a bare
        // forward declaration (`class Foo;`). Bare type references with a
        // declarator (`struct Point p;`) declare nothing new and stay silent.
        if let Some(type_node) = node.child_by_field_name("type") {
            if is_aggregate_specifier(type_node.kind())
                && (type_node.child_by_field_name("body").is_some() || declarators.is_empty())
            {
                self.lower(type_node, class_ctx, out);
            }
        }

        // Function prototypes and in-class constructor/destructor
        // declarations; plain variable declarations are not symbols.
        for declarator in declarators {
            if let Some(func) = self.lower_declarator_function(declarator, class_ctx) {
                out.push(func);
            }
        }
    }

    fn lower_field_declaration(&self, node: Node, class_ctx: Option<&str>, out: &mut Vec<AstNode>) {
        self.lower_inline_type(node, class_ctx, out);

        for declarator in self.declarators(node) {
            if let Some(func) = self.lower_declarator_function(declarator, class_ctx) {
                out.push(func);
                continue;
            }
            if let Some(name) = innermost_name(declarator) {
                out.push(AstNode {
                    kind: AstKind::Field,
                    spelling: self.text(name),
                    location: Some(self.location(name)),
                    children: Vec::new(),
                });
            }
        }
    }

    /// Lower the `type` field when it is an aggregate defined in place
    /// (`struct { int x; } s;`), so the nested type surfaces ahead of the
    /// declarator symbol.
    fn lower_inline_type(&self, node: Node, class_ctx: Option<&str>, out: &mut Vec<AstNode>) {
        if let Some(type_node) = node.child_by_field_name("type") {
            if is_aggregate_specifier(type_node.kind())
                && type_node.child_by_field_name("body").is_some()
            {
                self.lower(type_node, class_ctx, out);
            }
        }
    }

    /// A declarator lowers to a function-like node only when its chain
    /// contains a function declarator; everything else is a variable.
    fn lower_declarator_function(&self, declarator: Node, class_ctx: Option<&str>) -> Option<AstNode> {
        let func = find_function_declarator(declarator)?;
        let name = innermost_name(func.child_by_field_name("declarator")?)?;
        let spelling = self.text(name);
        let kind = classify_function(&spelling, name.kind(), class_ctx);
        Some(AstNode {
            kind,
            spelling,
            location: Some(self.location(name)),
            children: Vec::new(),
        })
    }

    fn declarators<'t>(&self, node: Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.children_by_field_name("declarator", &mut cursor).collect()
    }

    fn text(&self, node: Node) -> String {
        self.content
            .get(node.byte_range())
            .unwrap_or_default()
            .to_string()
    }

    fn location(&self, node: Node) -> SourceLocation {
        SourceLocation {
            file: self.file.to_path_buf(),
            line: node.start_position().row as u32 + 1,
            offset: node.start_byte() as u32,
        }
    }
}

fn is_aggregate_specifier(kind: &str) -> bool {
    matches!(
        kind,
        "class_specifier" | "struct_specifier" | "enum_specifier" | "union_specifier"
    )
}

/// Walk a declarator chain down to the function declarator, through pointer,
/// reference, and parenthesized wrappers.
fn find_function_declarator(mut node: Node) -> Option<Node> {
    loop {
        match node.kind() {
            "function_declarator" => return Some(node),
            "pointer_declarator" | "reference_declarator" | "parenthesized_declarator" => {
                node = declarator_child(node)?;
            }
            _ => return None,
        }
    }
}

/// Drill a declarator down to the declared name token. For qualified names
/// (`Circle::area`) this yields the rightmost segment, matching the short
/// spelling the symbol table stores.
fn innermost_name(mut node: Node) -> Option<Node> {
    loop {
        match node.kind() {
            "pointer_declarator"
            | "reference_declarator"
            | "parenthesized_declarator"
            | "function_declarator"
            | "array_declarator" => {
                node = declarator_child(node)?;
            }
            "qualified_identifier" => {
                node = node.child_by_field_name("name")?;
            }
            "identifier" | "field_identifier" | "type_identifier" | "destructor_name"
            | "operator_name" => return Some(node),
            _ => return None,
        }
    }
}

fn declarator_child(node: Node) -> Option<Node> {
    if let Some(child) = node.child_by_field_name("declarator") {
        return Some(child);
    }
    // Some declarator wrappers do not name the field; fall back to the last
    // named child, which is the nested declarator in those shapes.
    let count = node.named_child_count();
    if count == 0 {
        return None;
    }
    node.named_child(count - 1)
}

fn classify_function(spelling: &str, name_kind: &str, class_ctx: Option<&str>) -> AstKind {
    if name_kind == "destructor_name" {
        return AstKind::Destructor;
    }
    match class_ctx {
        Some(class_name) if spelling == class_name => AstKind::Constructor,
        Some(_) => AstKind::Method,
        None => AstKind::Function,
    }
}
