use insidertrack_core::EntityKey;
use std::path::{Path, PathBuf};

/// Path scheme for the three namespaces under one data directory
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn current_dir(&self) -> PathBuf {
        self.root.join("current")
    }

    pub fn history_root(&self) -> PathBuf {
        self.root.join("history")
    }

    pub fn changes_dir(&self) -> PathBuf {
        self.root.join("changes")
    }

    pub fn current_path(&self, key: &EntityKey) -> PathBuf {
        self.current_dir().join(format!("{}.json", key))
    }

    pub fn history_dir(&self, key: &EntityKey) -> PathBuf {
        self.history_root().join(key.as_str())
    }

    pub fn history_path(&self, key: &EntityKey, id: &str) -> PathBuf {
        self.history_dir(key).join(format!("{}.json", id))
    }

    pub fn changes_path(&self, key: &EntityKey) -> PathBuf {
        self.changes_dir().join(format!("{}_changes.json", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let layout = Layout::new("/data");
        let key = EntityKey::new("afry-ab").unwrap();

        assert_eq!(layout.current_path(&key), PathBuf::from("/data/current/afry-ab.json"));
        assert_eq!(
            layout.history_path(&key, "2025-03-01_08-00-00"),
            PathBuf::from("/data/history/afry-ab/2025-03-01_08-00-00.json")
        );
        assert_eq!(
            layout.changes_path(&key),
            PathBuf::from("/data/changes/afry-ab_changes.json")
        );
    }
}
