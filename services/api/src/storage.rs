use std::path::PathBuf;
use uuid::Uuid;

/// Local-disk store for uploaded prescription images. The returned path is
/// relative to the root and doubles as the record's `file_url`.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn save(&self, subdir: &str, bytes: &[u8]) -> std::io::Result<String> {
        let name = Uuid::new_v4().to_string();
        let dir = self.root.join(subdir);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&name), bytes).await?;
        Ok(format!("{subdir}/{name}"))
    }
}
