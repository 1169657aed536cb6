//! In-memory remote catalog shared by the engine tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use drivebackup_core::domain::newtypes::{ContainerId, PageCursor, RemoteId};
use drivebackup_core::ports::{
    ChildPage, ChildReference, IRemoteCatalog, NewRemoteFile, RemoteError, RemoteItem,
    FOLDER_MIME_TYPE,
};
use drivebackup_sync::backoff::BackoffCalculator;
use drivebackup_sync::hasher::hash_bytes;
use drivebackup_sync::retry::RetryPolicy;

/// Every call the engine made, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListChildren {
        container: String,
        cursor: Option<String>,
    },
    GetFile(String),
    InsertFile(String),
    FindFolders(String),
    CreateFolder(String),
}

#[derive(Default)]
struct State {
    items: Vec<RemoteItem>,
    calls: Vec<Call>,
    list_failures: VecDeque<RemoteError>,
    get_failures: VecDeque<RemoteError>,
    insert_failures: VecDeque<RemoteError>,
    rejected_ids: HashMap<String, RemoteError>,
    rejected_titles: HashMap<String, RemoteError>,
    next_id: usize,
}

/// Catalog backed by a vector of items, paginating `page_size` children at a time
pub struct FakeCatalog {
    page_size: usize,
    state: Mutex<State>,
}

impl FakeCatalog {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            state: Mutex::new(State::default()),
        }
    }

    pub fn add_file(&self, id: &str, title: &str, content: &[u8], parent: &str) {
        self.push(RemoteItem {
            id: id.to_string(),
            title: title.to_string(),
            md5_checksum: Some(hash_bytes(content).as_str().to_string()),
            mime_type: Some("application/octet-stream".to_string()),
            parent_ids: vec![parent.to_string()],
            trashed: false,
        });
    }

    pub fn add_folder(&self, id: &str, title: &str) {
        self.push(RemoteItem {
            id: id.to_string(),
            title: title.to_string(),
            md5_checksum: None,
            mime_type: Some(FOLDER_MIME_TYPE.to_string()),
            parent_ids: vec!["root".to_string()],
            trashed: false,
        });
    }

    pub fn add_item(&self, item: RemoteItem) {
        self.push(item);
    }

    /// The next `count` listing calls fail with `err`
    pub fn fail_listings(&self, count: usize, err: RemoteError) {
        let mut state = self.state.lock().unwrap();
        state.list_failures.extend(std::iter::repeat(err).take(count));
    }

    /// The next `count` metadata lookups fail with `err`
    pub fn fail_gets(&self, count: usize, err: RemoteError) {
        let mut state = self.state.lock().unwrap();
        state.get_failures.extend(std::iter::repeat(err).take(count));
    }

    /// Every metadata lookup of `id` fails with `err`
    pub fn reject_id(&self, id: &str, err: RemoteError) {
        self.state
            .lock()
            .unwrap()
            .rejected_ids
            .insert(id.to_string(), err);
    }

    /// The next `count` inserts fail with `err` before touching the store
    pub fn fail_inserts(&self, count: usize, err: RemoteError) {
        let mut state = self.state.lock().unwrap();
        for _ in 0..count {
            state.insert_failures.push_back(err.clone());
        }
    }

    /// Every insert of `title` fails with `err`
    pub fn reject_title(&self, title: &str, err: RemoteError) {
        self.state
            .lock()
            .unwrap()
            .rejected_titles
            .insert(title.to_string(), err);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn children_of(&self, parent: &str) -> Vec<RemoteItem> {
        self.state
            .lock()
            .unwrap()
            .items
            .iter()
            .filter(|i| i.parent_ids.iter().any(|p| p == parent))
            .cloned()
            .collect()
    }

    fn push(&self, item: RemoteItem) {
        self.state.lock().unwrap().items.push(item);
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn allocate_id(&self, prefix: &str) -> String {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        format!("{prefix}-{}", state.next_id)
    }
}

#[async_trait]
impl IRemoteCatalog for FakeCatalog {
    async fn list_children(
        &self,
        container: &ContainerId,
        _query: &str,
        cursor: Option<&PageCursor>,
    ) -> Result<ChildPage, RemoteError> {
        self.record(Call::ListChildren {
            container: container.as_str().to_string(),
            cursor: cursor.map(|c| c.as_str().to_string()),
        });
        if let Some(err) = self.state.lock().unwrap().list_failures.pop_front() {
            return Err(err);
        }

        let page: usize = match cursor {
            Some(c) => c
                .as_str()
                .trim_start_matches('t')
                .parse()
                .map_err(|_| RemoteError::api(400, "Invalid page token"))?,
            None => 0,
        };

        let children = self.children_of(container.as_str());
        let start = page * self.page_size;
        let end = (start + self.page_size).min(children.len());
        let items = children
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .map(|i| ChildReference { id: i.id.clone() })
            .collect();

        let token = if end < children.len() {
            format!("t{}", page + 1)
        } else {
            String::new()
        };

        Ok(ChildPage {
            items,
            next_cursor: PageCursor::from_token(Some(token)),
        })
    }

    async fn get_file(&self, id: &RemoteId) -> Result<RemoteItem, RemoteError> {
        self.record(Call::GetFile(id.as_str().to_string()));
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.get_failures.pop_front() {
            return Err(err);
        }
        if let Some(err) = state.rejected_ids.get(id.as_str()) {
            return Err(err.clone());
        }
        state
            .items
            .iter()
            .find(|i| i.id == id.as_str())
            .cloned()
            .ok_or_else(|| RemoteError::api(404, format!("File not found: {}", id.as_str())))
    }

    async fn insert_file(
        &self,
        metadata: &NewRemoteFile,
        source: &Path,
    ) -> Result<RemoteItem, RemoteError> {
        self.record(Call::InsertFile(metadata.title.clone()));

        {
            let mut state = self.state.lock().unwrap();
            if let Some(err) = state.insert_failures.pop_front() {
                return Err(err);
            }
            if let Some(err) = state.rejected_titles.get(&metadata.title) {
                return Err(err.clone());
            }
        }

        let content =
            std::fs::read(source).map_err(|e| RemoteError::LocalIo(e.to_string()))?;
        let parent = metadata.parent.clone().unwrap_or_default();
        let item = RemoteItem {
            id: self.allocate_id("up"),
            title: metadata.title.clone(),
            md5_checksum: Some(hash_bytes(&content).as_str().to_string()),
            mime_type: Some("application/octet-stream".to_string()),
            parent_ids: vec![parent.as_str().to_string()],
            trashed: false,
        };
        self.push(item.clone());
        Ok(item)
    }

    async fn find_folders(&self, title: &str) -> Result<Vec<RemoteItem>, RemoteError> {
        self.record(Call::FindFolders(title.to_string()));
        Ok(self
            .state
            .lock()
            .unwrap()
            .items
            .iter()
            .filter(|i| i.is_folder() && !i.trashed && i.title == title)
            .cloned()
            .collect())
    }

    async fn create_folder(
        &self,
        title: &str,
        parent: &ContainerId,
    ) -> Result<RemoteItem, RemoteError> {
        self.record(Call::CreateFolder(title.to_string()));
        let item = RemoteItem {
            id: self.allocate_id("folder"),
            title: title.to_string(),
            md5_checksum: None,
            mime_type: Some(FOLDER_MIME_TYPE.to_string()),
            parent_ids: vec![parent.as_str().to_string()],
            trashed: false,
        };
        self.push(item.clone());
        Ok(item)
    }
}

/// A 403 carrying the per-user rate-limit reason
pub fn rate_limited() -> RemoteError {
    RemoteError::api(403, "User Rate Limit Exceeded").with_reason("userRateLimitExceeded")
}

/// Retry policy with a deterministic jitter source
pub fn test_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(
        max_attempts,
        BackoffCalculator::seeded(Duration::from_secs(1), 42),
    )
}
