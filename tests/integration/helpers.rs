//! Shared scripted fakes and builders for the integration suite.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use livefeed::{
    Category, Item, ItemId, ListTransport, PushEvent, PushSource, Role, Scope, ScopeTag,
    SnapshotStore, SyncError, SyncResult, Synchronizer,
};

/// The scope most tests run under.
pub fn hr_scope() -> Scope {
    Scope::for_role(Role::Hr).with_company("SOC01")
}

/// A fixed instant inside the test day.
pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 10, hour, 0, 0).unwrap()
}

/// An item tagged for the HR / SOC01 scope.
pub fn hr_item(id: &str, viewed: bool, hour: u32) -> Item {
    Item {
        id: ItemId::from(id),
        title: String::new(),
        message: format!("item {id}"),
        category: Category::Notification,
        status: None,
        viewed,
        created_at: at(hour),
        starts_at: None,
        ends_at: None,
        scope: ScopeTag {
            role: Some(Role::Hr),
            company: Some("SOC01".to_string()),
            ..ScopeTag::default()
        },
    }
}

/// Scripted transport: answers from an in-memory item list, counts every
/// call, and can be told to fail.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    pub items: Mutex<Vec<Item>>,
    pub server_count: Mutex<Option<u64>>,
    pub fail_fetch: AtomicBool,
    pub fail_mutations: AtomicBool,
    pub fetch_calls: AtomicUsize,
    pub mark_read_calls: AtomicUsize,
    pub mark_all_calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn with_items(items: Vec<Item>) -> Arc<Self> {
        let transport = Self::default();
        *transport.items.lock().unwrap() = items;
        Arc::new(transport)
    }

    pub fn set_items(&self, items: Vec<Item>) {
        *self.items.lock().unwrap() = items;
    }
}

#[async_trait]
impl ListTransport<Item> for ScriptedTransport {
    async fn fetch_items(&self, _scope: &Scope) -> SyncResult<Vec<Item>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(SyncError::transport("connection refused"));
        }
        Ok(self.items.lock().unwrap().clone())
    }

    async fn fetch_unread_count(&self, _scope: &Scope) -> SyncResult<u64> {
        if let Some(count) = *self.server_count.lock().unwrap() {
            return Ok(count);
        }
        let items = self.items.lock().unwrap();
        Ok(items.iter().filter(|item| !item.viewed).count() as u64)
    }

    async fn mark_read(&self, _scope: &Scope, _item_id: &str) -> SyncResult<()> {
        self.mark_read_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(SyncError::server("mutation rejected"));
        }
        Ok(())
    }

    async fn mark_all_read(&self, _scope: &Scope) -> SyncResult<u64> {
        self.mark_all_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(SyncError::server("mutation rejected"));
        }
        Ok(0)
    }
}

/// Scripted push source: hands the test a sender onto the pump.
#[derive(Debug, Default)]
pub struct ScriptedPush {
    pub fail_subscribe: AtomicBool,
    sender: Mutex<Option<mpsc::Sender<PushEvent<Item>>>>,
}

impl ScriptedPush {
    /// Emit one event into the pump. Returns `false` once the pump has
    /// stopped listening.
    pub async fn emit(&self, event: PushEvent<Item>) -> bool {
        let sender = self.sender.lock().unwrap().clone();
        match sender {
            Some(sender) => sender.send(event).await.is_ok(),
            None => false,
        }
    }
}

#[async_trait]
impl PushSource<Item> for ScriptedPush {
    async fn subscribe(&self, scope: &Scope) -> SyncResult<mpsc::Receiver<PushEvent<Item>>> {
        scope.validate()?;
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(SyncError::transport("push endpoint unreachable"));
        }
        let (tx, rx) = mpsc::channel(16);
        *self.sender.lock().unwrap() = Some(tx);
        Ok(rx)
    }
}

/// In-memory store with write counting.
#[derive(Debug, Default)]
pub struct MapStore {
    pub entries: Mutex<HashMap<String, String>>,
    pub save_calls: AtomicUsize,
}

#[async_trait]
impl SnapshotStore for MapStore {
    async fn load(&self, key: &str) -> SyncResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> SyncResult<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> SyncResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn clear(&self) -> SyncResult<()> {
        self.entries.lock().unwrap().clear();
        Ok(())
    }
}

/// Everything a test needs: the synchronizer plus handles onto each
/// scripted collaborator.
pub struct TestBed {
    pub transport: Arc<ScriptedTransport>,
    pub store: Arc<MapStore>,
    pub push: Arc<ScriptedPush>,
    pub sync: Arc<Synchronizer>,
}

impl TestBed {
    /// Build a bed for the HR scope with the given server items.
    pub fn new(items: Vec<Item>) -> Self {
        Self::for_scope(hr_scope(), items)
    }

    pub fn for_scope(scope: Scope, items: Vec<Item>) -> Self {
        let transport = ScriptedTransport::with_items(items);
        let store = Arc::new(MapStore::default());
        let push = Arc::new(ScriptedPush::default());
        let sync = Synchronizer::new(
            scope,
            Arc::clone(&transport) as Arc<dyn ListTransport<Item>>,
            Arc::clone(&store) as Arc<dyn SnapshotStore>,
            CancellationToken::new(),
        )
        .unwrap();
        Self {
            transport,
            store,
            push,
            sync,
        }
    }

    /// Spawn the polling loop and push pump the way the facade does.
    pub fn start(&self, interval: Duration) {
        self.sync.start(
            interval,
            Some(Arc::clone(&self.push) as Arc<dyn PushSource<Item>>),
        );
    }

    /// Wait until the transport has served at least `count` fetches.
    pub async fn wait_for_fetches(&self, count: usize) {
        for _ in 0..200 {
            if self.transport.fetch_calls.load(Ordering::SeqCst) >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!(
            "transport never reached {count} fetches (got {})",
            self.transport.fetch_calls.load(Ordering::SeqCst)
        );
    }

    /// Give spawned tasks a moment to drain queued events.
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}
