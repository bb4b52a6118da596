//! Per-document activity log (`<doc>_activity.log` inside the project folder)

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{safe_folder_name, safe_user_name};
use crate::types::AppResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityAction {
    Upload,
    Analyze,
    Chat,
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityAction::Upload => write!(f, "UPLOAD"),
            ActivityAction::Analyze => write!(f, "ANALYZE"),
            ActivityAction::Chat => write!(f, "CHAT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    pub timestamp: String,
    pub action: String,
    pub description: String,
    pub raw_line: String,
}

impl ActivityEntry {
    /// Parse `[timestamp] ACTION - description`. Lines in any other shape are
    /// kept whole as `UNKNOWN` entries.
    pub fn parse(line: &str) -> Self {
        let parsed = line
            .strip_prefix('[')
            .and_then(|rest| rest.split_once("] "))
            .and_then(|(timestamp, rest)| {
                rest.split_once(" - ")
                    .map(|(action, description)| (timestamp, action, description))
            });

        match parsed {
            Some((timestamp, action, description)) => Self {
                timestamp: timestamp.to_string(),
                action: action.to_string(),
                description: description.to_string(),
                raw_line: line.to_string(),
            },
            None => Self {
                timestamp: String::new(),
                action: "UNKNOWN".to_string(),
                description: line.to_string(),
                raw_line: line.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActivityLog {
    projects_root: PathBuf,
}

impl ActivityLog {
    pub fn new(projects_root: impl Into<PathBuf>) -> Self {
        Self {
            projects_root: projects_root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.projects_root
    }

    pub fn path_for(&self, user: &str, document: &str) -> PathBuf {
        let folder = safe_folder_name(document);
        self.projects_root
            .join(safe_user_name(user))
            .join(&folder)
            .join(format!("{}_activity.log", folder))
    }

    /// Append one timestamped line, creating the document folder if needed.
    pub async fn append(
        &self,
        user: &str,
        document: &str,
        action: ActivityAction,
        description: &str,
    ) -> AppResult<PathBuf> {
        let path = self.path_for(user, document);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let line = format!(
            "[{}] {} - {} (User: {})\n",
            chrono::Utc::now().to_rfc3339(),
            action,
            single_line(description),
            single_line(user)
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(user, document, action = %action, "Activity logged");
        Ok(path)
    }

    /// Entries in file order; an absent log is an empty list.
    pub async fn list(&self, user: &str, document: &str) -> AppResult<Vec<ActivityEntry>> {
        let content = match fs::read_to_string(self.path_for(user, document)).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(ActivityEntry::parse)
            .collect())
    }
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}
