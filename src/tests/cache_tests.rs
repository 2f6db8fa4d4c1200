// Cache addressing, fingerprinting, and validity tests

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

use tempfile::TempDir;

use crate::cache::SymbolCache;
use crate::utils::strip_path_root;

#[cfg(test)]
mod symbol_cache_tests {
    use super::*;

    fn set_mtime(path: &Path, secs: u64, micros: u32) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(UNIX_EPOCH + Duration::new(secs, micros * 1_000))
            .unwrap();
    }

    #[test]
    fn test_strip_path_root_posix() {
        assert_eq!(
            strip_path_root(Path::new("/home/u/x.cpp")),
            PathBuf::from("home/u/x.cpp")
        );
    }

    #[test]
    fn test_strip_path_root_windows_drive() {
        assert_eq!(strip_path_root(Path::new("C:\\x.cpp")), PathBuf::from("x.cpp"));
    }

    #[test]
    fn test_strip_path_root_keeps_relative_paths() {
        assert_eq!(
            strip_path_root(Path::new("src/x.cpp")),
            PathBuf::from("src/x.cpp")
        );
    }

    #[test]
    fn test_entry_dir_reflects_source_path() {
        let cache = SymbolCache::new("/tmp/out");
        assert_eq!(
            cache.entry_dir(Path::new("/home/u/x.cpp")),
            PathBuf::from("/tmp/out/home/u/x.cpp")
        );
        assert_eq!(
            cache.entry_dir(Path::new("C:\\x.cpp")),
            PathBuf::from("/tmp/out/x.cpp")
        );
    }

    #[test]
    fn test_fingerprint_is_utc_with_microsecond_precision() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("input.cpp");
        fs::write(&source, "int x;\n").unwrap();
        // 2009-02-13T23:31:30Z plus 123456 microseconds
        set_mtime(&source, 1_234_567_890, 123_456);

        let fingerprint = SymbolCache::fingerprint(&source).unwrap();
        assert_eq!(fingerprint, "20090213233130123456");
        assert_eq!(fingerprint.len(), 20);
        assert!(fingerprint.bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn test_store_then_lookup_hits() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let source = dir.path().join("input.cpp");
        fs::write(&source, "class C {};\n").unwrap();

        let cache = SymbolCache::new(&out);
        let payload = r#"{"global":[],"local":[]}"#;
        cache.store(&source, payload).unwrap();

        // Both fixed-name files exist under the derived entry directory
        let entry = cache.entry_dir(&source);
        assert!(entry.join("content").is_file());
        assert!(entry.join("symbol").is_file());
        assert_eq!(fs::read_to_string(entry.join("symbol")).unwrap(), payload);

        assert_eq!(cache.lookup(&source).as_deref(), Some(payload));
    }

    #[test]
    fn test_lookup_misses_without_entry() {
        let dir = TempDir::new().unwrap();
        let cache = SymbolCache::new(dir.path().join("out"));
        let source = dir.path().join("input.cpp");
        fs::write(&source, "int x;\n").unwrap();

        assert!(cache.lookup(&source).is_none());
    }

    #[test]
    fn test_lookup_misses_after_mtime_change() {
        let dir = TempDir::new().unwrap();
        let cache = SymbolCache::new(dir.path().join("out"));
        let source = dir.path().join("input.cpp");
        fs::write(&source, "int x;\n").unwrap();
        set_mtime(&source, 1_600_000_000, 0);

        cache.store(&source, "payload").unwrap();
        assert!(cache.lookup(&source).is_some());

        // Touch only; contents unchanged. The fingerprint is time-based, so
        // the entry must go stale anyway.
        set_mtime(&source, 1_600_000_001, 0);
        assert!(cache.lookup(&source).is_none());
    }

    #[test]
    fn test_lookup_misses_when_payload_file_is_missing() {
        let dir = TempDir::new().unwrap();
        let cache = SymbolCache::new(dir.path().join("out"));
        let source = dir.path().join("input.cpp");
        fs::write(&source, "int x;\n").unwrap();

        cache.store(&source, "payload").unwrap();
        fs::remove_file(cache.entry_dir(&source).join("symbol")).unwrap();

        assert!(cache.lookup(&source).is_none());
    }

    #[test]
    fn test_store_overwrites_previous_entry() {
        let dir = TempDir::new().unwrap();
        let cache = SymbolCache::new(dir.path().join("out"));
        let source = dir.path().join("input.cpp");
        fs::write(&source, "int x;\n").unwrap();

        cache.store(&source, "first").unwrap();
        cache.store(&source, "second").unwrap();

        assert_eq!(cache.lookup(&source).as_deref(), Some("second"));
    }
}
