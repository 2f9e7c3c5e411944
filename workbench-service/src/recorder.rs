//! Session recorder.
//!
//! Sole owner and writer of the query history. History is append-only and
//! never reordered or mutated in place; import replaces it wholesale.

use common::models::QueryHistoryItem;
use tokio::sync::RwLock;

/// Append-only history of executed queries, most-recent-last.
#[derive(Default)]
pub struct SessionRecorder {
    history: RwLock<Vec<QueryHistoryItem>>,
}

impl SessionRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one executed query to the history.
    pub async fn record(&self, entry: QueryHistoryItem) {
        self.history.write().await.push(entry);
    }

    /// Returns a copy of the full history, oldest first.
    pub async fn snapshot(&self) -> Vec<QueryHistoryItem> {
        self.history.read().await.clone()
    }

    /// Returns the most recent entry, if any.
    pub async fn last(&self) -> Option<QueryHistoryItem> {
        self.history.read().await.last().cloned()
    }

    /// Clears the history (new session).
    pub async fn clear(&self) {
        self.history.write().await.clear();
    }

    /// Replaces the history wholesale (session import, last-write-wins).
    pub async fn replace(&self, entries: Vec<QueryHistoryItem>) {
        *self.history.write().await = entries;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::QueryResult;

    fn entry(id: &str) -> QueryHistoryItem {
        QueryHistoryItem {
            id: id.to_string(),
            natural_language: "SELECT 1;".to_string(),
            generated_sql: "SELECT 1;".to_string(),
            results: QueryResult::empty(),
            execution_time: 0.01,
            timestamp: "2024-05-01T00:00:00+00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_record_appends_in_order() {
        let recorder = SessionRecorder::new();
        recorder.record(entry("a")).await;
        recorder.record(entry("b")).await;

        let history = recorder.snapshot().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, "a");
        assert_eq!(history[1].id, "b");
        assert_eq!(recorder.last().await.unwrap().id, "b");
    }

    #[tokio::test]
    async fn test_replace_is_wholesale() {
        let recorder = SessionRecorder::new();
        recorder.record(entry("a")).await;
        recorder.replace(vec![entry("x"), entry("y")]).await;

        let history = recorder.snapshot().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, "x");
    }
}
