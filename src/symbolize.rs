//! End-to-end symbolization: cache check, parse, extract, persist.
//!
//! Control flow per invocation: the cache is consulted first; on a hit the
//! stored payload is returned verbatim. On a miss the front-end parses the
//! file, the extractor builds the table, and both the serialized table and a
//! fresh fingerprint are persisted before the payload is returned. Every step
//! is attempt-once; failures surface directly in the result.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::cache::SymbolCache;
use crate::extractors::CppSymbolExtractor;
use crate::frontend::Frontend;
use crate::utils;

#[derive(Debug, Error)]
pub enum SymbolizeError {
    /// The front-end could not produce a tree; extraction is never attempted.
    #[error("parse failure: {0}")]
    Parse(String),

    /// Cache directory creation or file write failed; fatal even when
    /// extraction itself succeeded.
    #[error("cache I/O error: {0}")]
    CacheIo(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SymbolizeError>;

/// Symbolize one source file, reusing the cached result when the file's
/// modification time has not changed since the last run.
///
/// `extra_args` are compiler-style flags handed through to the front-end
/// opaquely. The returned string is the serialized symbol table, whichever
/// path produced it.
pub fn symbolize(
    out_dir: &Path,
    source: &Path,
    extra_args: &[String],
    frontend: &dyn Frontend,
) -> Result<String> {
    let cache = SymbolCache::new(out_dir);

    if let Some(payload) = cache.lookup(source) {
        info!("cache hit for {}, skipping extraction", source.display());
        return Ok(payload);
    }

    let target = utils::absolutize(source)?;
    let root = frontend
        .parse(&target, extra_args)
        .map_err(|e| SymbolizeError::Parse(e.to_string()))?;

    let table = CppSymbolExtractor::new(&target).extract_symbols(&root);
    info!(
        "extracted {} symbols from {}",
        table.global.len(),
        source.display()
    );

    let payload = serde_json::to_string(&table)?;
    cache.store(source, &payload)?;
    Ok(payload)
}
