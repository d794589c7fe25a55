//! Task records and the store that tracks them.
//!
//! Each creation request mints a local task id and inserts a record here.
//! The store is a trait so handlers can run against fakes in tests; the
//! default implementation is a process-lifetime in-memory map with no
//! eviction.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;

use crate::video::ProviderKind;

/// Lifecycle state of a gateway task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Submitted; the provider has not reported a terminal state yet.
    Processing,
    /// The provider finished the video.
    Done,
    /// The provider reported failure.
    Failed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Processing => write!(f, "processing"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A tracked video-generation task.
///
/// Serializes to the wire shape of the status endpoint; the id travels in
/// the URL, not the body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Local task identifier (16 hex chars).
    #[serde(skip_serializing)]
    pub id: String,
    /// Current lifecycle state.
    pub status: TaskStatus,
    /// Provider the task was dispatched to.
    pub provider: ProviderKind,
    /// Provider-assigned task id, set once the outbound create call succeeds.
    pub provider_task_id: Option<String>,
    /// Download location of the finished video, set on completion.
    pub file_url: Option<String>,
    /// Provider-reported failure reason, set when the task fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Task {
    /// Creates a fresh task in the `processing` state.
    pub fn new(id: impl Into<String>, provider: ProviderKind) -> Self {
        Self {
            id: id.into(),
            status: TaskStatus::Processing,
            provider,
            provider_task_id: None,
            file_url: None,
            error: None,
        }
    }
}

/// Mints a task identifier: 8 random bytes as 16 lowercase hex characters.
pub fn mint_task_id() -> String {
    let bytes: [u8; 8] = rand::random();
    bytes.iter().fold(String::with_capacity(16), |mut s, b| {
        use std::fmt::Write;
        let _ = write!(s, "{b:02x}");
        s
    })
}

/// Storage for gateway tasks.
///
/// Implementations must be safe to share across request handlers.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a new task record.
    async fn insert(&self, task: Task);

    /// Fetches a task by id.
    async fn get(&self, id: &str) -> Option<Task>;

    /// Records the provider-assigned id after a successful create call.
    /// Returns false if the task does not exist.
    async fn attach_provider_task_id(&self, id: &str, provider_task_id: &str) -> bool;

    /// Transitions a task to `done`, recording the file URL if known.
    /// Returns false if the task does not exist.
    async fn complete(&self, id: &str, file_url: Option<String>) -> bool;

    /// Transitions a task to `failed` with the provider's reason.
    /// Returns false if the task does not exist.
    async fn fail(&self, id: &str, reason: &str) -> bool;
}

/// Process-lifetime in-memory task store.
#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: Mutex<HashMap<String, Task>>,
}

impl InMemoryTaskStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_task<R>(&self, id: &str, f: impl FnOnce(&mut Task) -> R) -> Option<R> {
        self.tasks
            .lock()
            .ok()
            .and_then(|mut map| map.get_mut(id).map(f))
    }

    /// Snapshot of every stored task id, for assertions.
    #[cfg(test)]
    pub(crate) fn ids(&self) -> Vec<String> {
        self.tasks
            .lock()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, task: Task) {
        if let Ok(mut map) = self.tasks.lock() {
            map.insert(task.id.clone(), task);
        }
    }

    async fn get(&self, id: &str) -> Option<Task> {
        self.tasks.lock().ok().and_then(|map| map.get(id).cloned())
    }

    async fn attach_provider_task_id(&self, id: &str, provider_task_id: &str) -> bool {
        self.with_task(id, |task| {
            task.provider_task_id = Some(provider_task_id.to_owned());
        })
        .is_some()
    }

    async fn complete(&self, id: &str, file_url: Option<String>) -> bool {
        self.with_task(id, |task| {
            task.status = TaskStatus::Done;
            task.file_url = file_url;
        })
        .is_some()
    }

    async fn fail(&self, id: &str, reason: &str) -> bool {
        self.with_task(id, |task| {
            task.status = TaskStatus::Failed;
            task.error = Some(reason.to_owned());
        })
        .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_task_id_format() {
        let id = mint_task_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id, id.to_lowercase());
    }

    #[test]
    fn test_mint_task_id_unique() {
        let a = mint_task_id();
        let b = mint_task_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_task_wire_shape() {
        let task = Task::new("deadbeefdeadbeef", ProviderKind::Sora);
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["status"], "processing");
        assert_eq!(json["provider"], "sora");
        // Nullable fields are present as nulls, the id stays in the URL.
        assert!(json["providerTaskId"].is_null());
        assert!(json["fileUrl"].is_null());
        assert!(json.get("id").is_none());
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryTaskStore::new();
        store
            .insert(Task::new("deadbeefdeadbeef", ProviderKind::Vidfly))
            .await;

        let task = store.get("deadbeefdeadbeef").await.unwrap();
        assert_eq!(task.status, TaskStatus::Processing);
        assert_eq!(task.provider, ProviderKind::Vidfly);
        assert!(task.provider_task_id.is_none());

        assert!(store.get("0000000000000000").await.is_none());
    }

    #[tokio::test]
    async fn test_attach_provider_task_id() {
        let store = InMemoryTaskStore::new();
        store
            .insert(Task::new("deadbeefdeadbeef", ProviderKind::Sora))
            .await;

        assert!(
            store
                .attach_provider_task_id("deadbeefdeadbeef", "abc123")
                .await
        );
        let task = store.get("deadbeefdeadbeef").await.unwrap();
        assert_eq!(task.provider_task_id.as_deref(), Some("abc123"));
        assert_eq!(task.status, TaskStatus::Processing);

        assert!(!store.attach_provider_task_id("missing", "abc123").await);
    }

    #[tokio::test]
    async fn test_complete_sets_file_url() {
        let store = InMemoryTaskStore::new();
        store
            .insert(Task::new("deadbeefdeadbeef", ProviderKind::Sora))
            .await;

        assert!(
            store
                .complete("deadbeefdeadbeef", Some("https://example.com/v.mp4".into()))
                .await
        );
        let task = store.get("deadbeefdeadbeef").await.unwrap();
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.file_url.as_deref(), Some("https://example.com/v.mp4"));
    }

    #[tokio::test]
    async fn test_fail_records_reason() {
        let store = InMemoryTaskStore::new();
        store
            .insert(Task::new("deadbeefdeadbeef", ProviderKind::Vidfly))
            .await;

        assert!(store.fail("deadbeefdeadbeef", "avatar not found").await);
        let task = store.get("deadbeefdeadbeef").await.unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(task.error.as_deref(), Some("avatar not found"));
        assert!(task.file_url.is_none());
    }
}
