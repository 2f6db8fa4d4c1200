// Sylvie - Single-File C++ Symbol Extraction Library
//!
//! Sylvie walks the AST of one C++ source file, emits a flat scope-qualified
//! symbol table, and caches the result keyed on the file's modification time
//! so repeated runs against an unchanged file never re-parse it.

pub mod cache;
pub mod extractors;
pub mod frontend;
pub mod symbolize;
pub mod utils;

#[cfg(test)]
pub mod tests;

// Re-export common types
pub use extractors::{SymbolRecord, SymbolTable};
pub use frontend::{AstKind, AstNode, CppFrontend, Frontend, SourceLocation};
pub use symbolize::{SymbolizeError, symbolize};
