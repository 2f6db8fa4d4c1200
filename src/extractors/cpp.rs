// C++ symbol extractor
//
// Turns a front-end node tree into the flat `global` record sequence:
// depth-first pre-order, an explicit scope stack for qualified names, and
// subtree pruning for nodes declared in other files. The extractor performs
// no I/O; it only builds the table it returns.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::extractors::base::{SCOPE_SEPARATOR, SymbolRecord, SymbolTable};
use crate::frontend::{AstKind, AstNode};
use crate::utils::normalize_path;

/// Per-invocation extraction state. Each run owns its own accumulator and
/// scope stack; nothing leaks between extractions in a long-lived process.
pub struct CppSymbolExtractor {
    target_file: PathBuf,
    scope: Vec<String>,
    table: SymbolTable,
}

impl CppSymbolExtractor {
    /// `target_file` is the absolute, normalized path of the file being
    /// analyzed; nodes located in any other file are pruned wholesale.
    pub fn new(target_file: &Path) -> Self {
        Self {
            target_file: normalize_path(target_file),
            scope: Vec::new(),
            table: SymbolTable::default(),
        }
    }

    /// Walk the tree rooted at `root` and return the collected table.
    pub fn extract_symbols(mut self, root: &AstNode) -> SymbolTable {
        self.visit(root);
        debug!(
            "extracted {} symbols from {}",
            self.table.global.len(),
            self.target_file.display()
        );
        self.table
    }

    fn visit(&mut self, node: &AstNode) {
        match node.kind {
            // Scope-forming, not itself recorded
            AstKind::Namespace => self.walk_scoped(node),
            // Recorded, then scope-forming for members and nested types
            AstKind::Struct | AstKind::Class => {
                self.record(node);
                self.walk_scoped(node);
            }
            AstKind::Enum => self.record_enum(node),
            // Recorded leaves; function bodies are never descended into,
            // consistent with `local` staying empty
            AstKind::TypeAlias
            | AstKind::Field
            | AstKind::Method
            | AstKind::Constructor
            | AstKind::Destructor
            | AstKind::Function => self.record(node),
            // Transparent: no record, no scope segment, children still
            // visited so nested declarations stay reachable
            _ => self.walk_children(node),
        }
    }

    fn walk_children(&mut self, node: &AstNode) {
        for child in &node.children {
            if self.in_target_file(child) {
                self.visit(child);
            }
        }
    }

    fn walk_scoped(&mut self, node: &AstNode) {
        self.scope.push(node.spelling.clone());
        self.walk_children(node);
        self.scope.pop();
    }

    /// A node belongs to the target file unless it carries a location naming
    /// a different file. Missing locations never cause pruning.
    fn in_target_file(&self, node: &AstNode) -> bool {
        match &node.location {
            None => true,
            Some(loc) => normalize_path(&loc.file) == self.target_file,
        }
    }

    fn qualified_name(&self, spelling: &str) -> String {
        if self.scope.is_empty() {
            spelling.to_string()
        } else {
            format!("{}{}{}", self.scope.join(SCOPE_SEPARATOR), SCOPE_SEPARATOR, spelling)
        }
    }

    fn record(&mut self, node: &AstNode) {
        let name = self.qualified_name(&node.spelling);
        self.table
            .global
            .push(SymbolRecord::at(name, node.location.as_ref()));
    }

    /// Enums expand to one record per enumerator child on top of the enum's
    /// own record. The enumerator name hangs off the enum's full name, but
    /// the location is the enumerator's own, not the enum declaration's.
    fn record_enum(&mut self, node: &AstNode) {
        self.record(node);

        let enum_name = self.qualified_name(&node.spelling);
        for child in &node.children {
            if child.kind != AstKind::Enumerator {
                continue;
            }
            let name = format!("{}{}{}", enum_name, SCOPE_SEPARATOR, child.spelling);
            self.table
                .global
                .push(SymbolRecord::at(name, child.location.as_ref()));
        }
    }
}
