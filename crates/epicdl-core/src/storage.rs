//! Output directories and whole-file writes.
//!
//! Files are written to a `.part` sibling and renamed into place, so the
//! final name only ever holds a complete payload. Existing files are
//! overwritten; nothing is ever deleted besides our own temp file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::StartupError;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Creates `dir` (and parents) if missing. An existing directory is not an error.
pub fn ensure_dir(dir: &Path) -> Result<(), StartupError> {
    fs::create_dir_all(dir).map_err(|source| StartupError::Directory {
        path: dir.to_path_buf(),
        source,
    })
}

/// Path for the temp file: appends `.part` to the final path (e.g. `x.png` → `x.png.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Writes `data` to `final_path`, replacing any previous content.
///
/// `mode` applies on Unix when the temp file is created (subject to umask).
pub fn write_file(final_path: &Path, data: &[u8], mode: u32) -> io::Result<()> {
    let tmp = temp_path(final_path);
    let result = write_temp(&tmp, data, mode).and_then(|()| fs::rename(&tmp, final_path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_temp(tmp: &Path, data: &[u8], mode: u32) -> io::Result<()> {
    let mut options = File::options();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    let mut file = options.open(tmp)?;
    file.write_all(data)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("epic_1b_20200923001751.png"));
        assert_eq!(p.to_string_lossy(), "epic_1b_20200923001751.png.part");
        let p2 = temp_path(Path::new("/tmp/data/x.json"));
        assert_eq!(p2.to_string_lossy(), "/tmp/data/x.json.part");
    }

    #[test]
    fn ensure_dir_creates_and_tolerates_existing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("data");
        ensure_dir(&target).unwrap();
        assert!(target.is_dir());
        ensure_dir(&target).unwrap();
    }

    #[test]
    fn ensure_dir_fails_when_path_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("images");
        fs::write(&target, b"not a dir").unwrap();
        let err = ensure_dir(&target).unwrap_err();
        assert!(matches!(err, StartupError::Directory { .. }));
    }

    #[test]
    fn write_file_overwrites_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.json");
        write_file(&path, b"{\"a\":1}", 0o644).unwrap();
        write_file(&path, b"{}", 0o644).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"{}");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn write_file_into_missing_dir_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("x.png");
        assert!(write_file(&path, b"png", 0o644).is_err());
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn write_file_applies_mode_on_create() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("private.json");
        write_file(&path, b"{}", 0o600).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
