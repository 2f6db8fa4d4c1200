// End-to-end pipeline tests
//
// A counting front-end wrapper verifies when extraction actually runs:
// unchanged files are served from the cache without re-parsing, touched
// files force a fresh extraction.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, UNIX_EPOCH};

use anyhow::Result;
use tempfile::TempDir;

use crate::cache::SymbolCache;
use crate::extractors::base::SymbolTable;
use crate::frontend::{AstNode, CppFrontend, Frontend};
use crate::symbolize::{SymbolizeError, symbolize};

#[cfg(test)]
mod symbolize_pipeline_tests {
    use super::*;

    const SOURCE: &str = "namespace ns {\nstruct S {\n    int f;\n    void m();\n};\n}\n";

    struct CountingFrontend {
        inner: CppFrontend,
        calls: AtomicUsize,
    }

    impl CountingFrontend {
        fn new() -> Self {
            Self {
                inner: CppFrontend::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Frontend for CountingFrontend {
        fn parse(&self, file: &Path, extra_args: &[String]) -> Result<AstNode> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.parse(file, extra_args)
        }
    }

    fn set_mtime(path: &Path, secs: u64) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(UNIX_EPOCH + Duration::from_secs(secs)).unwrap();
    }

    fn names(payload: &str) -> Vec<String> {
        let table: SymbolTable = serde_json::from_str(payload).unwrap();
        table.global.into_iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_unchanged_file_is_served_from_cache() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let source = dir.path().join("input.cpp");
        fs::write(&source, SOURCE).unwrap();
        set_mtime(&source, 1_600_000_000);

        let frontend = CountingFrontend::new();
        let first = symbolize(&out, &source, &[], &frontend).unwrap();
        let second = symbolize(&out, &source, &[], &frontend).unwrap();

        assert_eq!(first, second);
        assert_eq!(frontend.calls(), 1);
        assert_eq!(names(&first), vec!["ns::S", "ns::S::f", "ns::S::m"]);
    }

    #[test]
    fn test_touch_forces_fresh_extraction() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let source = dir.path().join("input.cpp");
        fs::write(&source, SOURCE).unwrap();
        set_mtime(&source, 1_600_000_000);

        let frontend = CountingFrontend::new();
        let first = symbolize(&out, &source, &[], &frontend).unwrap();

        // Same bytes, new mtime: the time-based fingerprint must invalidate.
        set_mtime(&source, 1_600_000_007);
        let second = symbolize(&out, &source, &[], &frontend).unwrap();

        assert_eq!(frontend.calls(), 2);
        assert_eq!(names(&first), names(&second));
    }

    #[test]
    fn test_hit_replays_stored_payload_verbatim() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let source = dir.path().join("input.cpp");
        fs::write(&source, SOURCE).unwrap();

        // Seed the entry by hand; the pipeline must not second-guess it.
        let canned = r#"{"global":[{"name":"X","file":"","line":0,"offset":0}],"local":[]}"#;
        SymbolCache::new(&out).store(&source, canned).unwrap();

        let frontend = CountingFrontend::new();
        let payload = symbolize(&out, &source, &[], &frontend).unwrap();

        assert_eq!(payload, canned);
        assert_eq!(frontend.calls(), 0);
    }

    #[test]
    fn test_parse_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let missing = dir.path().join("missing.cpp");

        let result = symbolize(&out, &missing, &[], &CountingFrontend::new());
        assert!(matches!(result, Err(SymbolizeError::Parse(_))));
    }

    #[test]
    fn test_cache_write_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        // The output root is a file: entry directory creation cannot succeed.
        let out = dir.path().join("out");
        fs::write(&out, "not a directory").unwrap();
        let source = dir.path().join("input.cpp");
        fs::write(&source, SOURCE).unwrap();

        let result = symbolize(&out, &source, &[], &CountingFrontend::new());
        assert!(matches!(result, Err(SymbolizeError::CacheIo(_))));
    }

    #[test]
    fn test_extra_flags_are_passed_through() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let source = dir.path().join("input.cpp");
        fs::write(&source, SOURCE).unwrap();

        let flags = vec!["-Iinclude".to_string(), "-std=c++17".to_string()];
        let payload = symbolize(&out, &source, &flags, &CountingFrontend::new()).unwrap();
        assert_eq!(names(&payload), vec!["ns::S", "ns::S::f", "ns::S::m"]);
    }
}
