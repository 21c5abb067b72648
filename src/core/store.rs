use crate::core::derive::{generation_label, theme_pair};
use crate::core::resolver::HeldItemResolver;
use crate::domain::model::{
    Generation, PokemonQuery, PrimaryRecord, ResolvedHeldItem, ThemePair,
};
use crate::domain::ports::PokemonCatalog;
use crate::utils::error::{FetchError, HeldItemsError};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeldItemsState {
    Pending,
    Ready(Vec<ResolvedHeldItem>),
    Failed,
}

/// 給畫面用的持有道具狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeldItemsStatus {
    Loading,
    Ready,
    Failed,
}

impl HeldItemsState {
    pub fn status(&self) -> HeldItemsStatus {
        match self {
            Self::Pending => HeldItemsStatus::Loading,
            Self::Ready(_) => HeldItemsStatus::Ready,
            Self::Failed => HeldItemsStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedView {
    /// 產生這筆紀錄的請求週期；持有道具結果要帶著同樣的週期才能寫入
    pub cycle: u64,
    pub record: Arc<PrimaryRecord>,
    pub theme: ThemePair,
    pub generation: Option<Generation>,
    pub held_items: HeldItemsState,
}

impl LoadedView {
    fn new(cycle: u64, record: Arc<PrimaryRecord>) -> Self {
        let held_items = if record.held_items.is_empty() {
            HeldItemsState::Ready(Vec::new())
        } else {
            HeldItemsState::Pending
        };

        Self {
            cycle,
            theme: theme_pair(&record.types),
            generation: generation_label(record.id),
            record,
            held_items,
        }
    }
}

/// 畫面讀取的唯讀快照
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Snapshot {
    #[default]
    Empty,
    Loaded(LoadedView),
}

impl Snapshot {
    pub fn cycle(&self) -> u64 {
        match self {
            Self::Empty => 0,
            Self::Loaded(view) => view.cycle,
        }
    }

    pub fn record(&self) -> Option<&PrimaryRecord> {
        match self {
            Self::Empty => None,
            Self::Loaded(view) => Some(&view.record),
        }
    }

    pub fn theme(&self) -> Option<ThemePair> {
        match self {
            Self::Empty => None,
            Self::Loaded(view) => Some(view.theme),
        }
    }

    pub fn generation(&self) -> Option<Generation> {
        match self {
            Self::Empty => None,
            Self::Loaded(view) => view.generation,
        }
    }

    /// 載入中或失敗時一律是空清單，不會出現部分結果
    pub fn held_items(&self) -> &[ResolvedHeldItem] {
        match self {
            Self::Loaded(LoadedView {
                held_items: HeldItemsState::Ready(items),
                ..
            }) => items,
            _ => &[],
        }
    }

    pub fn held_items_status(&self) -> Option<HeldItemsStatus> {
        match self {
            Self::Empty => None,
            Self::Loaded(view) => Some(view.held_items.status()),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.held_items_status() != Some(HeldItemsStatus::Loading)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Committed { cycle: u64 },
    /// 較新的請求已經先寫入，這筆結果被丟棄
    Superseded { cycle: u64 },
}

struct StoreInner<C: PokemonCatalog> {
    catalog: Arc<C>,
    resolver: HeldItemResolver<C>,
    fetch_timeout: Duration,
    next_cycle: AtomicU64,
    stale_discards: AtomicU64,
    // watch 通道內部的鎖就是唯一的寫入點，每次提交都是原子的
    snapshot: watch::Sender<Snapshot>,
}

/// 視圖狀態的持有者：抓取 → 推導 → 解析持有道具，並發布一致的快照
pub struct ViewModelStore<C: PokemonCatalog> {
    inner: Arc<StoreInner<C>>,
}

impl<C: PokemonCatalog> Clone for ViewModelStore<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: PokemonCatalog> ViewModelStore<C> {
    pub fn new(catalog: Arc<C>, fetch_timeout: Duration) -> Self {
        let (snapshot, _) = watch::channel(Snapshot::Empty);
        Self {
            inner: Arc::new(StoreInner {
                resolver: HeldItemResolver::new(Arc::clone(&catalog), fetch_timeout),
                catalog,
                fetch_timeout,
                next_cycle: AtomicU64::new(0),
                stale_discards: AtomicU64::new(0),
                snapshot,
            }),
        }
    }

    pub fn catalog(&self) -> &Arc<C> {
        &self.inner.catalog
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.inner.snapshot.subscribe()
    }

    /// 被丟棄的過期結果數量（主要紀錄與持有道具合計）
    pub fn stale_discards(&self) -> u64 {
        self.inner.stale_discards.load(Ordering::SeqCst)
    }

    /// 等到目前的持有道具解析結束（或被更新的週期取代且該週期也結束）
    pub async fn settled(&self) -> Snapshot {
        let mut receiver = self.subscribe();
        let settled = match receiver.wait_for(Snapshot::is_settled).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        };
        settled
    }

    /// 抓取並提交一筆新紀錄。
    ///
    /// 失敗時目前畫面完全不變，錯誤只記錄並回傳給呼叫端。
    pub async fn load(&self, query: PokemonQuery) -> Result<LoadOutcome, FetchError> {
        let cycle = self.inner.next_cycle.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("🔎 Cycle {}: fetching pokemon '{}'", cycle, query);

        let fetch_timeout = self.inner.fetch_timeout;
        let fetched =
            match tokio::time::timeout(fetch_timeout, self.inner.catalog.fetch_pokemon(&query))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(FetchError::network(
                    query.to_string(),
                    format!("timed out after {:?}", fetch_timeout),
                )),
            };

        match fetched {
            Ok(record) => Ok(self.commit_record(cycle, record)),
            Err(e) => {
                tracing::warn!("⚠️ Cycle {}: keeping current view, {}", cycle, e);
                Err(e)
            }
        }
    }

    fn commit_record(&self, cycle: u64, record: PrimaryRecord) -> LoadOutcome {
        let record = Arc::new(record);

        let committed = self.inner.snapshot.send_if_modified(|current| {
            if cycle <= current.cycle() {
                return false;
            }
            *current = Snapshot::Loaded(LoadedView::new(cycle, Arc::clone(&record)));
            true
        });

        if !committed {
            self.inner.stale_discards.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(
                "Cycle {}: '{}' arrived after a newer pokemon, discarded",
                cycle,
                record.name
            );
            return LoadOutcome::Superseded { cycle };
        }

        tracing::info!(
            "✅ Cycle {}: showing #{} {} ({} held items)",
            cycle,
            record.id,
            record.name,
            record.held_items.len()
        );

        if !record.held_items.is_empty() {
            self.spawn_held_item_resolution(cycle, record);
        }

        LoadOutcome::Committed { cycle }
    }

    fn spawn_held_item_resolution(&self, cycle: u64, record: Arc<PrimaryRecord>) {
        let store = self.clone();
        tokio::spawn(async move {
            let result = store.inner.resolver.resolve_all(&record.held_items).await;
            store.commit_held_items(cycle, result);
        });
    }

    fn commit_held_items(
        &self,
        cycle: u64,
        result: Result<Vec<ResolvedHeldItem>, HeldItemsError>,
    ) {
        let failure = result.as_ref().err().cloned();
        let state = match result {
            Ok(items) => HeldItemsState::Ready(items),
            Err(_) => HeldItemsState::Failed,
        };

        let committed = self.inner.snapshot.send_if_modified(|current| match current {
            Snapshot::Loaded(view)
                if view.cycle == cycle && view.held_items == HeldItemsState::Pending =>
            {
                view.held_items = state;
                true
            }
            _ => false,
        });

        match (committed, failure) {
            (true, Some(e)) => {
                tracing::warn!("⚠️ Cycle {}: held items unavailable, {}", cycle, e);
            }
            (true, None) => tracing::debug!("Cycle {}: held items ready", cycle),
            (false, _) => {
                self.inner.stale_discards.fetch_add(1, Ordering::SeqCst);
                tracing::debug!("Cycle {}: held items superseded, discarded", cycle);
            }
        }
    }
}
