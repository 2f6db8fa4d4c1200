// Sylvie's Cache Module - Modification-Time Keyed Persistence
//
// One cache entry per source file: a fingerprint derived from the file's
// mtime, and the serialized symbol table produced the last time extraction
// ran. Validity is exact string equality of fingerprints; the payload is
// replayed verbatim on a hit, with no re-validation of its contents.
//
// No locking: concurrent invocations against the same entry may race. Callers
// needing parallel safety serialize writes externally.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::utils::{normalize_path, strip_path_root};

/// Fixed file names inside each cache entry directory.
const FINGERPRINT_FILE: &str = "content";
const PAYLOAD_FILE: &str = "symbol";

/// On-disk cache rooted at an output directory.
pub struct SymbolCache {
    out_dir: PathBuf,
}

impl SymbolCache {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Per-file cache directory: the output root joined with the normalized
    /// source path stripped of its leading path-root marker.
    pub fn entry_dir(&self, source: &Path) -> PathBuf {
        self.out_dir.join(strip_path_root(&normalize_path(source)))
    }

    /// Current fingerprint of a source file: its last-modification time in
    /// UTC at microsecond precision (`YYYYMMDDHHMMSSffffff`).
    ///
    /// Deliberately mtime-based, not a content hash: touching a file
    /// invalidates the entry even when its bytes are unchanged.
    pub fn fingerprint(source: &Path) -> io::Result<String> {
        let modified = fs::metadata(source)?.modified()?;
        let stamp: DateTime<Utc> = modified.into();
        Ok(stamp.format("%Y%m%d%H%M%S%6f").to_string())
    }

    /// Return the stored payload when the stored fingerprint matches the
    /// source file's current one. Missing or unreadable entry files degrade
    /// to a miss; they never abort the run.
    pub fn lookup(&self, source: &Path) -> Option<String> {
        let entry = self.entry_dir(source);
        let fingerprint_file = entry.join(FINGERPRINT_FILE);
        let payload_file = entry.join(PAYLOAD_FILE);

        if !fingerprint_file.exists() || !payload_file.exists() {
            debug!("no cache entry for {}", source.display());
            return None;
        }

        let stored = match fs::read_to_string(&fingerprint_file) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("unreadable fingerprint {}: {}", fingerprint_file.display(), e);
                return None;
            }
        };

        let current = match Self::fingerprint(source) {
            Ok(current) => current,
            Err(e) => {
                warn!("cannot fingerprint {}: {}", source.display(), e);
                return None;
            }
        };

        if stored != current {
            debug!(
                "stale cache entry for {} (stored {}, current {})",
                source.display(),
                stored,
                current
            );
            return None;
        }

        match fs::read_to_string(&payload_file) {
            Ok(payload) => {
                debug!("cache hit for {}", source.display());
                Some(payload)
            }
            Err(e) => {
                warn!("unreadable payload {}: {}", payload_file.display(), e);
                None
            }
        }
    }

    /// Persist a fresh extraction, overwriting any previous entry.
    ///
    /// The payload is written first and the fingerprint last: a crash between
    /// the two writes leaves a stale fingerprint, so the next lookup misses
    /// and re-extracts instead of replaying a half-committed entry.
    pub fn store(&self, source: &Path, payload: &str) -> io::Result<()> {
        let entry = self.entry_dir(source);
        fs::create_dir_all(&entry)?;

        fs::write(entry.join(PAYLOAD_FILE), payload)?;
        let fingerprint = Self::fingerprint(source)?;
        fs::write(entry.join(FINGERPRINT_FILE), &fingerprint)?;

        debug!(
            "stored cache entry for {} under {}",
            source.display(),
            entry.display()
        );
        Ok(())
    }
}
