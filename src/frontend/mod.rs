// Sylvie's AST Front-End Module
//
// The front-end owns everything parser-specific: it turns a source file (plus
// whatever compiler-style flags the caller passes through) into a tree of
// typed nodes carrying source-location metadata. The extractor never touches
// the parser directly, which keeps it testable against hand-built trees and
// lets tests count parse invocations.

use std::path::{Path, PathBuf};

use anyhow::Result;

pub mod cpp;

pub use cpp::CppFrontend;

/// Source location of an AST node: the declaring file, a 1-based line number,
/// and the byte offset of the declaration within that file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: u32,
    pub offset: u32,
}

/// The closed set of node kinds the extractor dispatches on. Anything the
/// front-end cannot classify lowers to `Other` and is traversed transparently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstKind {
    TranslationUnit,
    Namespace,
    TypeAlias,
    Enum,
    Enumerator,
    Struct,
    Class,
    Field,
    Method,
    Constructor,
    Destructor,
    Function,
    Other,
}

/// One typed AST node as produced by a front-end.
///
/// `spelling` is the short declared name (empty for anonymous entities);
/// `location` is absent for synthetic nodes such as the translation unit root
/// or compiler-generated declarations.
#[derive(Debug, Clone)]
pub struct AstNode {
    pub kind: AstKind,
    pub spelling: String,
    pub location: Option<SourceLocation>,
    pub children: Vec<AstNode>,
}

/// A parser front-end: given a file path and pass-through compiler flags,
/// yields the typed node tree rooted at the translation unit.
pub trait Frontend {
    fn parse(&self, file: &Path, extra_args: &[String]) -> Result<AstNode>;
}
