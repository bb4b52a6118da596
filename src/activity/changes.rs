//! Applied-change log (`logs/<user>/<document>_changes.txt`)

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::{safe_document_name, safe_user_name};
use crate::types::AppResult;

pub const SEPARATOR: &str = "==========================================";
const NO_REASON: &str = "No reason provided";
const FILE_SUFFIX: &str = "_changes.txt";

/// An edit the user accepted in the editor.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChangeEntry {
    pub category: String,
    pub original_text: String,
    pub suggested_text: String,
    pub document_name: String,
    pub username: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// One block parsed back out of a change log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeRecord {
    pub timestamp: String,
    pub user: String,
    pub document: String,
    pub category: String,
    pub original: String,
    pub suggested: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangeLogContent {
    pub log_content: String,
    pub total_entries: usize,
    pub entries: Vec<ChangeRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentLogSummary {
    pub document_name: String,
    pub filename: String,
    pub total_entries: usize,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ChangeLog {
    logs_root: PathBuf,
}

impl ChangeLog {
    pub fn new(logs_root: impl Into<PathBuf>) -> Self {
        Self {
            logs_root: logs_root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.logs_root
    }

    fn user_dir(&self, user: &str) -> PathBuf {
        self.logs_root.join(safe_user_name(user))
    }

    pub fn path_for(&self, user: &str, document: &str) -> PathBuf {
        self.user_dir(user)
            .join(format!("{}{}", safe_document_name(document), FILE_SUFFIX))
    }

    pub async fn append(&self, entry: &ChangeEntry) -> AppResult<PathBuf> {
        let path = self.path_for(&entry.username, &entry.document_name);
        fs::create_dir_all(self.user_dir(&entry.username)).await?;

        let timestamp = entry
            .timestamp
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| Utc::now().to_rfc3339());
        let reason = entry
            .reason
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(NO_REASON);

        let block = format!(
            "\n{sep}\nTIMESTAMP: {}\nUSER: {}\nDOCUMENT: {}\nCATEGORY: {}\nORIGINAL: \"{}\"\nSUGGESTED: \"{}\"\nREASON: {}\n{sep}\n",
            timestamp,
            entry.username,
            entry.document_name,
            entry.category,
            entry.original_text,
            entry.suggested_text,
            reason,
            sep = SEPARATOR,
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(block.as_bytes()).await?;
        file.flush().await?;

        debug!(
            user = %entry.username,
            document = %entry.document_name,
            category = %entry.category,
            "Change logged"
        );
        Ok(path)
    }

    /// `None` when nothing has been logged for the document yet.
    pub async fn read(&self, user: &str, document: &str) -> AppResult<Option<ChangeLogContent>> {
        let content = match fs::read_to_string(self.path_for(user, document)).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(ChangeLogContent {
            total_entries: count_entries(&content),
            entries: parse_records(&content),
            log_content: content,
        }))
    }

    /// Documents with a change log, most recently modified first.
    pub async fn list_documents(&self, user: &str) -> AppResult<Vec<DocumentLogSummary>> {
        let mut dir = match fs::read_dir(self.user_dir(user)).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut documents = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let filename = entry.file_name().to_string_lossy().to_string();
            let Some(stem) = filename.strip_suffix(FILE_SUFFIX) else {
                continue;
            };

            let metadata = entry.metadata().await?;
            let last_modified = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            let total_entries = match fs::read_to_string(entry.path()).await {
                Ok(content) => count_entries(&content),
                Err(e) => {
                    warn!(file = %filename, error = %e, "Unreadable change log");
                    0
                }
            };

            documents.push(DocumentLogSummary {
                document_name: stem.replace('_', " "),
                filename,
                total_entries,
                last_modified,
            });
        }

        documents.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(documents)
    }
}

/// Every entry is framed by two separator lines.
pub fn count_entries(content: &str) -> usize {
    content.matches(SEPARATOR).count() / 2
}

fn parse_records(content: &str) -> Vec<ChangeRecord> {
    let mut records = Vec::new();
    let mut current: Option<ChangeRecord> = None;
    let mut last_field: Option<&'static str> = None;

    for line in content.lines() {
        if line.trim() == SEPARATOR {
            match current.take() {
                Some(record) => records.push(finish(record)),
                None => current = Some(ChangeRecord::default()),
            }
            last_field = None;
            continue;
        }

        let Some(record) = current.as_mut() else {
            continue;
        };

        if let Some((key, value)) = field(line) {
            *slot(record, key) = value.to_string();
            last_field = Some(key);
        } else if let Some(key) = last_field {
            // continuation of a multi-line value
            let target = slot(record, key);
            target.push('\n');
            target.push_str(line);
        }
    }

    records
}

const FIELDS: [&str; 7] = [
    "TIMESTAMP",
    "USER",
    "DOCUMENT",
    "CATEGORY",
    "ORIGINAL",
    "SUGGESTED",
    "REASON",
];

fn field(line: &str) -> Option<(&'static str, &str)> {
    FIELDS.iter().find_map(|key| {
        line.strip_prefix(key)
            .and_then(|rest| rest.strip_prefix(": ").or_else(|| rest.strip_prefix(':')))
            .map(|value| (*key, value))
    })
}

fn slot<'r>(record: &'r mut ChangeRecord, key: &str) -> &'r mut String {
    match key {
        "TIMESTAMP" => &mut record.timestamp,
        "USER" => &mut record.user,
        "DOCUMENT" => &mut record.document,
        "CATEGORY" => &mut record.category,
        "ORIGINAL" => &mut record.original,
        "SUGGESTED" => &mut record.suggested,
        _ => record.reason.get_or_insert_with(String::new),
    }
}

fn finish(mut record: ChangeRecord) -> ChangeRecord {
    record.original = unquote(&record.original);
    record.suggested = unquote(&record.suggested);
    if record.reason.as_deref() == Some(NO_REASON) {
        record.reason = None;
    }
    record
}

fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}
