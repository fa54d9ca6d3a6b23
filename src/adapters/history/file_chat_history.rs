//! File-based Chat History Adapter
//!
//! Stores each session's records as a YAML list in `<dir>/<session>.yaml`.
//! Session ids are escaped into safe file names.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::domain::foundation::SessionId;
use crate::ports::{ChatHistoryError, ChatHistoryRepository, ChatRecord, HISTORY_PAGE_LIMIT};

const EXTENSION: &str = "yaml";

/// YAML file backed chat history.
#[derive(Debug)]
pub struct FileChatHistory {
    base_path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileChatHistory {
    /// # Example
    /// ```ignore
    /// let history = FileChatHistory::new("./data/history");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn session_file(&self, session_id: &SessionId) -> PathBuf {
        self.base_path
            .join(format!("{}.{}", escape_file_stem(session_id.as_str()), EXTENSION))
    }

    async fn ensure_dir(&self) -> Result<(), ChatHistoryError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| ChatHistoryError::IoError(e.to_string()))
    }

    async fn read_file(path: &Path) -> Result<Vec<ChatRecord>, ChatHistoryError> {
        let yaml = match fs::read_to_string(path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ChatHistoryError::IoError(e.to_string())),
        };
        serde_yaml::from_str::<Option<Vec<ChatRecord>>>(&yaml)
            .map(Option::unwrap_or_default)
            .map_err(|e| ChatHistoryError::DeserializationFailed(e.to_string()))
    }

    async fn write_file(path: &Path, records: &[ChatRecord]) -> Result<(), ChatHistoryError> {
        let yaml = serde_yaml::to_string(records)
            .map_err(|e| ChatHistoryError::SerializationFailed(e.to_string()))?;

        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml)
            .await
            .map_err(|e| ChatHistoryError::IoError(e.to_string()))?;
        fs::rename(&tmp, path)
            .await
            .map_err(|e| ChatHistoryError::IoError(e.to_string()))
    }
}

/// Keeps `[A-Za-z0-9_-]` and writes every other byte as `%XX`.
fn escape_file_stem(raw: &str) -> String {
    let mut stem = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}

#[async_trait]
impl ChatHistoryRepository for FileChatHistory {
    async fn append(&self, record: ChatRecord) -> Result<(), ChatHistoryError> {
        let _guard = self.write_lock.lock().await;
        self.ensure_dir().await?;

        let path = self.session_file(&record.session_id);
        let mut records = Self::read_file(&path).await?;
        records.push(record);
        Self::write_file(&path, &records).await
    }

    async fn list_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<ChatRecord>, ChatHistoryError> {
        let mut records = Self::read_file(&self.session_file(session_id)).await?;
        records.sort_by_key(|r| r.timestamp);
        records.truncate(HISTORY_PAGE_LIMIT);
        Ok(records)
    }

    async fn list_sessions(&self) -> Result<Vec<SessionId>, ChatHistoryError> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ChatHistoryError::IoError(e.to_string())),
        };

        let mut sessions = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ChatHistoryError::IoError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let records = Self::read_file(&path).await?;
            if let Some(first) = records.iter().min_by_key(|r| r.timestamp) {
                sessions.push((first.timestamp, first.session_id.clone()));
            }
        }

        sessions.sort();
        Ok(sessions.into_iter().map(|(_, id)| id).collect())
    }
}
