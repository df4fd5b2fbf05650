//! Layout of the files written after training.

use std::path::{Path, PathBuf};

pub const VOCAB_FILE: &str = "vocab.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";
pub const CONFIG_FILE: &str = "config.json";
pub const HISTORY_FILE: &str = "history.json";
pub const TARGETS_FILE: &str = "targets.json";

/// Default output directory, relative to the working directory.
pub const DEFAULT_DIR: &str = "artifacts";

/// Paths of the training artifacts inside one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    dir: PathBuf,
}

impl ArtifactPaths {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn vocab(&self) -> PathBuf {
        self.dir.join(VOCAB_FILE)
    }

    pub fn weights(&self) -> PathBuf {
        self.dir.join(WEIGHTS_FILE)
    }

    pub fn config(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn history(&self) -> PathBuf {
        self.dir.join(HISTORY_FILE)
    }

    pub fn targets(&self) -> PathBuf {
        self.dir.join(TARGETS_FILE)
    }
}
