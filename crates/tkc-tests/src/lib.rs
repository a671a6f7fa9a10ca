//! Shared fixtures for the tkc integration tests and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory that owns the fixture files written into it.
pub struct Fixtures {
    dir: TempDir,
}

impl Fixtures {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap_or_else(|e| panic!("cannot create temp dir: {e}")),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `name` inside the fixture directory.
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents)
            .unwrap_or_else(|e| panic!("cannot write fixture {}: {e}", path.display()));
        path
    }
}

impl Default for Fixtures {
    fn default() -> Self {
        Self::new()
    }
}

/// Prose with code fences, roughly the shape of a project README.
pub const SAMPLE_MARKDOWN: &str = "# Setup\n\n\
Install the toolchain, then build the workspace:\n\n\
```bash\n\
cargo build --release\n\
```\n\n\
## Configuration\n\n\
Every option has a sensible default. Pass `--model` to pick the tokenizer\n\
used for counting, or `--encoding` to name the BPE table directly.\n";
