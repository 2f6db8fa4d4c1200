// Base record types for Sylvie's symbol extraction
//
// The flat output of one extraction: scope-qualified names plus the source
// location of each declaration. This is also the shape persisted in the cache
// payload, so the serde field names are part of the on-disk format.

use serde::{Deserialize, Serialize};

use crate::frontend::SourceLocation;

/// Separator joining enclosing scope names, outer to inner.
pub const SCOPE_SEPARATOR: &str = "::";

/// One extracted symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolRecord {
    /// Fully scope-qualified name; the declared spelling is always the last
    /// segment, even when it is empty (anonymous entities)
    pub name: String,
    /// Absolute path of the declaring file; empty when the front-end could
    /// not resolve a location
    pub file: String,
    /// 1-based line number; 0 when unresolved
    pub line: u32,
    /// Byte offset of the declaration within the file; 0 when unresolved
    pub offset: u32,
}

impl SymbolRecord {
    /// Build a record at a possibly-missing source location. Nodes without a
    /// resolvable location are still recorded, with a degraded location,
    /// rather than failing the extraction.
    pub fn at(name: String, location: Option<&SourceLocation>) -> Self {
        match location {
            Some(loc) => Self {
                name,
                file: loc.file.to_string_lossy().into_owned(),
                line: loc.line,
                offset: loc.offset,
            },
            None => Self {
                name,
                file: String::new(),
                line: 0,
                offset: 0,
            },
        }
    }
}

/// The extraction output. `global` holds file-scope declarations in pre-order
/// traversal order. `local` is a reserved extension point for function-scope
/// symbols and is never populated; it stays in the model because the cache
/// payload format carries both sequences.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SymbolTable {
    pub global: Vec<SymbolRecord>,
    pub local: Vec<SymbolRecord>,
}
