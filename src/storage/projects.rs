// Flat-file project store: projects/<user>/<document>/{original, extracted text, activity log}

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::activity::{safe_folder_name, safe_user_name, ActivityAction, ActivityLog};
use crate::types::{AppError, AppResult};

const EXTRACTED_SUFFIX: &str = "_extracted.txt";
const ACTIVITY_SUFFIX: &str = "_activity.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Original,
    Extracted,
    Log,
}

impl FileKind {
    pub fn of(file_name: &str) -> Self {
        if file_name.ends_with(ACTIVITY_SUFFIX) {
            FileKind::Log
        } else if file_name.ends_with(EXTRACTED_SUFFIX) {
            FileKind::Extracted
        } else {
            FileKind::Original
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: FileKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub document_name: String,
    pub path: String,
    pub files: Vec<FileSummary>,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub username: String,
    pub document_count: usize,
    pub last_activity: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedUpload {
    pub document_name: String,
    pub project_path: PathBuf,
    pub original_path: PathBuf,
    pub text_path: PathBuf,
}

/// What `read_file` found.
#[derive(Debug, Clone)]
pub enum ProjectFile {
    Text { filename: String, content: String },
    ActivityLog { filename: String, content: String },
    Binary { filename: String, size: u64, modified: DateTime<Utc> },
}

#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
    activity: ActivityLog,
}

impl ProjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            activity: ActivityLog::new(root.clone()),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    fn user_dir(&self, user: &str) -> PathBuf {
        self.root.join(safe_user_name(user))
    }

    /// Persist an upload that has already been extracted: the original bytes,
    /// the text next to them, and an `UPLOAD` activity line.
    pub async fn save_upload(
        &self,
        user: &str,
        filename: &str,
        bytes: &[u8],
        text: &str,
    ) -> AppResult<SavedUpload> {
        // only the final component of a client-supplied name is trusted
        let base_name = Path::new(filename)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let file_name = safe_folder_name(&base_name);
        let stem = Path::new(&file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.clone());
        let document_name = safe_folder_name(&stem);

        let project_path = self.user_dir(user).join(&document_name);
        fs::create_dir_all(&project_path).await?;

        let original_path = project_path.join(&file_name);
        fs::write(&original_path, bytes).await?;

        let text_path = project_path.join(format!("{}{}", document_name, EXTRACTED_SUFFIX));
        fs::write(&text_path, text).await?;

        if let Err(e) = self
            .activity
            .append(
                user,
                &document_name,
                ActivityAction::Upload,
                &format!("Document uploaded: {}", base_name),
            )
            .await
        {
            warn!(user, document = %document_name, error = %e, "Failed to log upload activity");
        }

        info!(user, document = %document_name, size = bytes.len(), "Upload saved");
        Ok(SavedUpload {
            document_name,
            project_path,
            original_path,
            text_path,
        })
    }

    pub async fn has_project(&self, user: &str, document: &str) -> bool {
        fs::metadata(self.user_dir(user).join(safe_folder_name(document)))
            .await
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false)
    }

    /// Record an event for an existing project. Failures are logged, never
    /// returned.
    pub async fn log_activity(
        &self,
        user: &str,
        document: &str,
        action: ActivityAction,
        description: &str,
    ) {
        if !self.has_project(user, document).await {
            debug!(user, document, "No project folder, activity not recorded");
            return;
        }
        if let Err(e) = self.activity.append(user, document, action, description).await {
            warn!(user, document, error = %e, "Failed to record activity");
        }
    }

    /// A user's project folders, newest first.
    pub async fn list_projects(&self, user: &str) -> AppResult<Vec<ProjectSummary>> {
        let mut dir = match fs::read_dir(self.user_dir(user)).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut projects = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_dir() {
                continue;
            }

            let path = entry.path();
            let files = match list_files(&path).await {
                Ok(files) => files,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to list project files");
                    Vec::new()
                }
            };

            let created = metadata
                .created()
                .or_else(|_| metadata.modified())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            projects.push(ProjectSummary {
                document_name: entry.file_name().to_string_lossy().to_string(),
                path: path.to_string_lossy().to_string(),
                files,
                created,
            });
        }

        projects.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(projects)
    }

    /// Every user with a project folder, most recently active first.
    pub async fn list_users(&self) -> AppResult<Vec<UserSummary>> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut users = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_dir() {
                continue;
            }

            let mut document_count = 0;
            let mut documents = fs::read_dir(entry.path()).await?;
            while let Some(document) = documents.next_entry().await? {
                if document.file_type().await?.is_dir() {
                    document_count += 1;
                }
            }

            users.push(UserSummary {
                username: entry.file_name().to_string_lossy().to_string(),
                document_count,
                last_activity: metadata
                    .modified()
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now()),
            });
        }

        users.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        Ok(users)
    }

    pub async fn read_file(&self, user: &str, document: &str, file: &str) -> AppResult<ProjectFile> {
        for part in [user, document, file] {
            if !is_plain_component(part) {
                warn!(user, document, file, "Rejected project path outside the store");
                return Err(AppError::Forbidden(format!("{}/{}/{}", user, document, file)));
            }
        }

        let path = self
            .user_dir(user)
            .join(safe_folder_name(document))
            .join(file);
        let resolved = match fs::canonicalize(&path).await {
            Ok(resolved) => resolved,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!("File {}", file)))
            }
            Err(e) => return Err(e.into()),
        };
        let root = fs::canonicalize(&self.root).await?;
        if !resolved.starts_with(&root) {
            warn!(path = %resolved.display(), "Rejected project path outside the store");
            return Err(AppError::Forbidden(format!("{}/{}/{}", user, document, file)));
        }

        let filename = file.to_string();
        match FileKind::of(file) {
            FileKind::Extracted => Ok(ProjectFile::Text {
                filename,
                content: fs::read_to_string(&resolved).await?,
            }),
            FileKind::Log => Ok(ProjectFile::ActivityLog {
                filename,
                content: fs::read_to_string(&resolved).await?,
            }),
            FileKind::Original => {
                let metadata = fs::metadata(&resolved).await?;
                if !metadata.is_file() {
                    return Err(AppError::NotFound(format!("File {}", file)));
                }
                Ok(ProjectFile::Binary {
                    filename,
                    size: metadata.len(),
                    modified: metadata
                        .modified()
                        .map(DateTime::<Utc>::from)
                        .unwrap_or_else(|_| Utc::now()),
                })
            }
        }
    }
}

fn is_plain_component(part: &str) -> bool {
    let mut components = Path::new(part).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !part.contains(['/', '\\'])
}

async fn list_files(dir: &Path) -> std::io::Result<Vec<FileSummary>> {
    let mut files = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        files.push(FileSummary {
            kind: FileKind::of(&name),
            size: metadata.len(),
            modified: metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now()),
            name,
        });
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_upload_layout() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProjectStore::new(temp_dir.path());

        let saved = store
            .save_upload("amy", "Lease Agreement.pdf", b"%PDF-fake", "Lease text")
            .await
            .unwrap();

        assert_eq!(saved.document_name, "Lease Agreement");
        let folder = temp_dir.path().join("amy/Lease Agreement");
        assert_eq!(saved.project_path, folder);
        assert_eq!(std::fs::read(folder.join("Lease Agreement.pdf")).unwrap(), b"%PDF-fake");
        assert_eq!(
            std::fs::read_to_string(folder.join("Lease Agreement_extracted.txt")).unwrap(),
            "Lease text"
        );

        let events = store.activity().list("amy", "Lease Agreement").await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, "UPLOAD");
        assert!(events[0].description.starts_with("Document uploaded: Lease Agreement.pdf"));
    }

    #[tokio::test]
    async fn test_save_upload_strips_directories_from_filename() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProjectStore::new(temp_dir.path());

        let saved = store
            .save_upload("../eve", "../../evil.docx", b"PK", "text")
            .await
            .unwrap();

        assert_eq!(saved.document_name, "evil");
        assert!(saved.project_path.starts_with(temp_dir.path()));
        assert!(temp_dir.path().join(".._eve/evil/evil.docx").exists());
    }

    #[tokio::test]
    async fn test_list_projects_and_users() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProjectStore::new(temp_dir.path());
        store.save_upload("amy", "One.pdf", b"1", "one").await.unwrap();
        store.save_upload("amy", "Two.docx", b"2", "two").await.unwrap();
        store.save_upload("bob", "Memo.pdf", b"3", "memo").await.unwrap();

        let mut projects = store.list_projects("amy").await.unwrap();
        projects.sort_by(|a, b| a.document_name.cmp(&b.document_name));
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].document_name, "One");
        let kinds: Vec<FileKind> = projects[0].files.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![FileKind::Original, FileKind::Log, FileKind::Extracted]);

        let mut users = store.list_users().await.unwrap();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "amy");
        assert_eq!(users[0].document_count, 2);
        assert_eq!(users[1].document_count, 1);

        assert!(store.list_projects("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_log_activity_requires_existing_project() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProjectStore::new(temp_dir.path());

        store
            .log_activity("amy", "Ghost", ActivityAction::Chat, "Question asked: 'x'")
            .await;
        assert!(!temp_dir.path().join("amy/Ghost").exists());

        store.save_upload("amy", "Real.pdf", b"1", "text").await.unwrap();
        store
            .log_activity("amy", "Real", ActivityAction::Analyze, "Document analyzed")
            .await;
        let events = store.activity().list("amy", "Real").await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].action, "ANALYZE");
    }

    #[tokio::test]
    async fn test_list_users_without_root() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProjectStore::new(temp_dir.path().join("missing"));
        assert!(store.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_file_kinds() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProjectStore::new(temp_dir.path());
        store.save_upload("amy", "Memo.pdf", b"12345", "memo text").await.unwrap();

        match store.read_file("amy", "Memo", "Memo_extracted.txt").await.unwrap() {
            ProjectFile::Text { content, .. } => assert_eq!(content, "memo text"),
            other => panic!("unexpected {:?}", other),
        }
        match store.read_file("amy", "Memo", "Memo_activity.log").await.unwrap() {
            ProjectFile::ActivityLog { content, .. } => assert!(content.contains("UPLOAD")),
            other => panic!("unexpected {:?}", other),
        }
        match store.read_file("amy", "Memo", "Memo.pdf").await.unwrap() {
            ProjectFile::Binary { size, .. } => assert_eq!(size, 5),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            store.read_file("amy", "Memo", "absent.txt").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_read_file_for_sanitized_user_name() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProjectStore::new(temp_dir.path());
        store.save_upload("John Doe", "Memo.pdf", b"%PDF", "memo text").await.unwrap();
        assert!(temp_dir.path().join("John_Doe/Memo").is_dir());

        assert_eq!(store.list_projects("John Doe").await.unwrap().len(), 1);
        match store.read_file("John Doe", "Memo", "Memo_extracted.txt").await.unwrap() {
            ProjectFile::Text { content, .. } => assert_eq!(content, "memo text"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_read_file_refuses_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProjectStore::new(temp_dir.path().join("projects"));
        std::fs::create_dir_all(temp_dir.path().join("projects")).unwrap();
        std::fs::write(temp_dir.path().join("secret.txt"), "secret").unwrap();

        for (user, document, file) in [
            ("..", "projects", "secret.txt"),
            ("amy", "..", "secret.txt"),
            ("amy", "Memo", "../../../secret.txt"),
            ("amy", "Memo", ".."),
            ("amy", "a\\b", "x"),
        ] {
            assert!(
                matches!(store.read_file(user, document, file).await, Err(AppError::Forbidden(_))),
                "{}/{}/{} was not refused",
                user,
                document,
                file
            );
        }
    }
}
