use std::io::Write;
use std::path::Path;

use log::warn;
use tempfile::NamedTempFile;

use crate::error::Error;
use crate::payload::Payload;

/// The last persisted payload, if there is a usable one.
///
/// Nothing here is fatal: a missing, unreadable or corrupt document just
/// means the run has no values to fall back on.
pub fn load_previous(path: &Path) -> Option<Payload> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("Ignoring previous payload {}: {e}", path.display());
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(payload) => Some(payload),
        Err(e) => {
            warn!("Ignoring previous payload {}: {e}", path.display());
            None
        }
    }
}

/// Reads a payload document, failing loudly. Used by the watcher.
pub fn read_payload(path: &Path) -> Result<Payload, Error> {
    let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&raw).map_err(|e| Error::json(path, e))
}

/// Replaces `path` with the payload in one rename so readers never see a
/// half-written document.
pub fn write_payload(path: &Path, payload: &Payload) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let mut body = serde_json::to_string_pretty(payload).map_err(|e| Error::json(path, e))?;
    body.push('\n');

    // Each writer gets its own uniquely named temp file, so overlapping runs
    // never write into each other's half-finished document.
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    tmp.write_all(body.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| Error::io(tmp.path(), e))?;

    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}
