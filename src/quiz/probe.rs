use std::fs;
use std::path::Path;

/// Answers whether a track's file is present. Never fails: any I/O error
/// counts as "not there".
pub trait FileProbe {
    fn exists(&self, path: &Path) -> bool;
}

/// Checks the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_probe_only_accepts_regular_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("track.mp3");
        std::fs::write(&file, b"x").unwrap();

        assert!(FsProbe.exists(&file));
        assert!(!FsProbe.exists(dir.path()));
        assert!(!FsProbe.exists(&dir.path().join("missing.mp3")));
        assert!(!FsProbe.exists(Path::new("")));
    }
}
