use crate::error::ResolveError;
use crate::source::normalize_link;
use crate::wire::Record;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

pub type CachedRecord = Result<Arc<Record>, ResolveError>;

/// Per-resolution record cache with single-flight fetching.
///
/// The first caller to claim a link owns it: only the owner expands the
/// record into children. Every caller, owner or not, awaits the same fetch,
/// and a failed fetch is cached like a success.
#[derive(Debug, Default)]
pub struct LinkCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<CachedRecord>>>>,
}

#[derive(Debug, Clone)]
pub struct Lookup {
    pub record: CachedRecord,
    pub owner: bool,
}

impl LinkCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_fetch<F, Fut>(&self, link: &str, fetch: F) -> Lookup
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CachedRecord>,
    {
        let (cell, owner) = self.claim(link);
        let record = cell.get_or_init(fetch).await.clone();
        Lookup { record, owner }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn claim(&self, link: &str) -> (Arc<OnceCell<CachedRecord>>, bool) {
        let mut entries = self.entries.lock();
        match entries.get(&normalize_link(link)) {
            Some(cell) => (Arc::clone(cell), false),
            None => {
                let cell = Arc::new(OnceCell::new());
                entries.insert(normalize_link(link), Arc::clone(&cell));
                (cell, true)
            }
        }
    }
}
