// Sylvie's Extractor Module
//
// The front-end lowers the parse tree into typed nodes; the extractor here
// turns that tree into the flat scope-qualified symbol table.

pub mod base;
pub mod cpp;

// Re-export the base record types
pub use base::{SCOPE_SEPARATOR, SymbolRecord, SymbolTable};
pub use cpp::CppSymbolExtractor;
