// Sylvie's Utilities Module
//
// Path handling shared by the cache and the extractor. Everything here is
// lexical: no filesystem access, so the same helpers serve real paths and the
// synthetic ones used in tests.

use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` components, resolve `..` against the
/// preceding component, collapse redundant separators.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = path.components().peekable();
    let mut normalized = PathBuf::new();

    if let Some(component @ Component::Prefix(..)) = components.peek().copied() {
        normalized.push(component.as_os_str());
        components.next();
    }

    for component in components {
        match component {
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
            Component::Prefix(_) => normalized.push(component.as_os_str()),
        }
    }

    normalized
}

/// Absolutize a path against the current directory, then normalize it.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(normalize_path(path))
    } else {
        Ok(normalize_path(&env::current_dir()?.join(path)))
    }
}

/// Strip the leading path-root marker so the result can be joined under the
/// cache output root: the leading `/` of a POSIX-style path, or the `X:`
/// drive prefix of a Windows-style one. Relative paths pass through.
///
/// This is a portability seam: the two markers keep cache directories
/// collision-free and predictable on both platforms.
pub fn strip_path_root(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(strip_root_str(&raw))
}

fn strip_root_str(raw: &str) -> &str {
    if let Some(rest) = raw.strip_prefix('/') {
        return rest.trim_start_matches('/');
    }

    let bytes = raw.as_bytes();
    if raw.len() > 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        return raw[2..].trim_start_matches(['\\', '/']);
    }

    raw
}
