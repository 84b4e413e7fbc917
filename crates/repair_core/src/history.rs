//! Session-scoped log of completed diagnoses

use std::sync::Arc;

use uuid::Uuid;

use crate::diagnosis::DiagnosisResult;

/// Most-recent-first log of completed diagnoses.
///
/// Unbounded and session-scoped only; nothing is persisted across
/// restarts. Entries are shared references so a history selection renders
/// the exact result that was originally produced.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<Arc<DiagnosisResult>>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a freshly completed diagnosis.
    pub fn record(&mut self, result: Arc<DiagnosisResult>) {
        self.entries.insert(0, result);
    }

    /// Look up an entry by its id without disturbing the ordering.
    pub fn get(&self, id: Uuid) -> Option<Arc<DiagnosisResult>> {
        self.entries.iter().find(|entry| entry.id == id).cloned()
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> &[Arc<DiagnosisResult>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaReference;
    use chrono::Utc;

    fn result(title: &str) -> Arc<DiagnosisResult> {
        Arc::new(DiagnosisResult {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            title: title.to_string(),
            problem_description: String::new(),
            root_cause: String::new(),
            safety_warnings: vec![],
            tools_needed: vec![],
            steps: vec![],
            visual_guide: String::new(),
            annotations: vec![],
            source_media: MediaReference::new("QUJD", "image/jpeg", 3),
        })
    }

    #[test]
    fn test_record_prepends() {
        let mut history = HistoryLog::new();
        history.record(result("first"));
        history.record(result("second"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].title, "second");
        assert_eq!(history.entries()[1].title, "first");
    }

    #[test]
    fn test_get_does_not_reorder() {
        let mut history = HistoryLog::new();
        let older = result("older");
        let newer = result("newer");
        history.record(older.clone());
        history.record(newer);

        let found = history.get(older.id).expect("entry present");
        assert_eq!(found.title, "older");
        // Lookup must not promote the entry
        assert_eq!(history.entries()[0].title, "newer");
    }

    #[test]
    fn test_get_unknown_id() {
        let history = HistoryLog::new();
        assert!(history.get(Uuid::new_v4()).is_none());
    }
}
