#![allow(dead_code)]

use std::{
    cell::Cell,
    path::{Path, PathBuf},
    rc::Rc,
};

/// A fresh path under the system temp directory. The file does not exist
/// yet; any stale copy from an earlier run is removed.
pub(crate) fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hidden-city-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("failed to create temp dir");
    let path = dir.join(name);
    let _ = std::fs::remove_file(&path);
    path
}

pub(crate) fn write_file(path: &Path, contents: &str) {
    std::fs::write(path, contents).expect("failed to write fixture");
}

/// Stand-in for a GPU texture. Remembers the path it was loaded from.
#[derive(Debug, PartialEq)]
pub(crate) struct FakeTexture(pub PathBuf);

/// A texture loader that counts how often it runs and fails for paths that
/// contain "missing".
#[derive(Clone, Default)]
pub(crate) struct CountingLoader {
    loads: Rc<Cell<usize>>,
}

impl CountingLoader {
    pub fn loads(&self) -> usize {
        self.loads.get()
    }

    pub fn load(&self, path: &Path) -> anyhow::Result<FakeTexture> {
        self.loads.set(self.loads.get() + 1);
        if path.to_string_lossy().contains("missing") {
            anyhow::bail!("no such texture: {}", path.display());
        }
        Ok(FakeTexture(path.to_path_buf()))
    }
}
