//! Activity Logging
//!
//! Append-only flat-file records of what users did with their documents:
//!
//! - [`ActivityLog`]: one `[timestamp] ACTION - description (User: name)`
//!   line per event, kept inside the document's project folder;
//! - [`ChangeLog`]: one `=`-delimited block per applied edit, kept under
//!   `logs/<user>/<document>_changes.txt`.
//!
//! Every append opens the file, writes, and closes it before returning.
//! Single writer per document is assumed.

pub mod changes;
pub mod events;

pub use changes::{ChangeEntry, ChangeLog, ChangeLogContent, ChangeRecord, DocumentLogSummary};
pub use events::{ActivityAction, ActivityEntry, ActivityLog};

/// Make a user name safe to use as a single path component.
pub fn safe_user_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "anonymous".to_string()
    } else {
        cleaned
    }
}

/// Project folder name for a document: characters that are illegal in file
/// names become `_`.
pub fn safe_folder_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') { '_' } else { c })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "untitled_document".to_string()
    } else {
        cleaned
    }
}

/// File-name stem for a document's change log: alphanumerics, space, `-`
/// and `_` only, spaces turned into underscores.
pub fn safe_document_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let kept = kept.trim_end().replace(' ', "_");
    if kept.is_empty() {
        "untitled_document".to_string()
    } else {
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_document_name() {
        assert_eq!(safe_document_name("Lease Agreement v2"), "Lease_Agreement_v2");
        assert_eq!(safe_document_name("../../etc/passwd"), "etcpasswd");
        assert_eq!(safe_document_name("???"), "untitled_document");
        assert_eq!(safe_document_name("Draft (final) "), "Draft_final");
    }

    #[test]
    fn test_safe_folder_name() {
        assert_eq!(safe_folder_name("Lease: draft?"), "Lease_ draft_");
        assert_eq!(safe_folder_name("a/../b"), "a_.._b");
        assert_eq!(safe_folder_name(".."), "untitled_document");
    }

    #[test]
    fn test_safe_user_name() {
        assert_eq!(safe_user_name("alice"), "alice");
        assert_eq!(safe_user_name("../bob"), ".._bob");
        assert_eq!(safe_user_name(".."), "anonymous");
        assert_eq!(safe_user_name("  "), "anonymous");
        assert_eq!(safe_user_name("a/b\\c"), "a_b_c");
    }
}
