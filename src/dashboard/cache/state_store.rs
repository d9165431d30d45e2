use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tokio::sync::RwLock;
use tracing::debug;

use crate::dashboard::model::account::AccountSnapshot;
use crate::dashboard::model::comment::Comment;
use crate::dashboard::model::config::{ConfigUpdate, DashboardConfig};
use crate::dashboard::model::trade::Trade;
use crate::time_util;

/// 轮询覆盖的远端资源。每个资源独立计时、独立单飞
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    AccountTrades,
    Stats,
    Comments,
    CapitalCurve,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::AccountTrades,
        Resource::Stats,
        Resource::Comments,
        Resource::CapitalCurve,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::AccountTrades => "account_trades",
            Resource::Stats => "stats",
            Resource::Comments => "comments",
            Resource::CapitalCurve => "capital_curve",
        }
    }

    fn index(&self) -> usize {
        match self {
            Resource::AccountTrades => 0,
            Resource::Stats => 1,
            Resource::Comments => 2,
            Resource::CapitalCurve => 3,
        }
    }
}

/// 单个资源的同步状态。last_error非空即表示数据可能过期（陈旧指示）；
/// 刷新失败只更新这里，缓存值保持不动
#[derive(Debug, Clone, Default)]
pub struct SyncStatus {
    pub last_success_ms: Option<i64>,
    pub last_error: Option<String>,
}

impl SyncStatus {
    pub fn is_stale(&self) -> bool {
        self.last_error.is_some()
    }
}

/// 全量应用状态。不做环境级全局变量，持有者以Arc句柄显式传递
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub open_trades: Vec<Trade>,
    pub closed_trades: Vec<Trade>,
    pub comments: HashMap<i64, Comment>,
    pub account: Option<AccountSnapshot>,
    pub config: Option<DashboardConfig>,
    /// 统计用资金基准，首次拉取前为0
    pub capital_reference: f64,
}

/// 进程级状态缓存。
///
/// 单写者纪律：只有轮询任务的完成回调和对账确认后的写入会改它，
/// 其余组件一律读快照。读写都经RwLock，读取方拿到的是克隆副本
pub struct StateStore {
    state: RwLock<AppState>,
    sync_status: Mutex<HashMap<Resource, SyncStatus>>,
    in_flight: [AtomicBool; 4],
}

impl StateStore {
    pub fn new() -> Self {
        StateStore {
            state: RwLock::new(AppState::default()),
            sync_status: Mutex::new(HashMap::new()),
            in_flight: Default::default(),
        }
    }

    // ---- 单飞守卫 ----

    /// 资源级单飞：同一资源已有拉取在途时返回None，本轮刷新直接作废。
    /// 守卫覆盖定时器与对账触发的重拉两条路径
    pub fn begin_fetch(&self, resource: Resource) -> Option<FetchGuard<'_>> {
        if self.in_flight[resource.index()].swap(true, Ordering::SeqCst) {
            debug!("{} 仍有拉取在途，本轮跳过", resource.as_str());
            return None;
        }
        Some(FetchGuard {
            store: self,
            resource,
        })
    }

    pub fn sync_status(&self, resource: Resource) -> SyncStatus {
        self.sync_status
            .lock()
            .unwrap()
            .get(&resource)
            .cloned()
            .unwrap_or_default()
    }

    fn record_sync(&self, resource: Resource, error: Option<String>) {
        let mut statuses = self.sync_status.lock().unwrap();
        let status = statuses.entry(resource).or_default();
        match error {
            None => {
                status.last_success_ms = Some(time_util::now_ms());
                status.last_error = None;
            }
            Some(message) => {
                status.last_error = Some(message);
            }
        }
    }

    fn release_fetch(&self, resource: Resource) {
        self.in_flight[resource.index()].store(false, Ordering::SeqCst);
    }

    // ---- 交易与账户 ----

    /// 整体替换两个交易分区。symbol为空的记录在这里统一过滤，
    /// 这是数据质量兜底，不上报给用户
    pub async fn replace_trades(&self, open: Vec<Trade>, closed: Vec<Trade>) {
        let mut state = self.state.write().await;
        state.open_trades = open.into_iter().filter(Trade::has_symbol).collect();
        state.closed_trades = closed.into_iter().filter(Trade::has_symbol).collect();
    }

    pub async fn replace_account(&self, account: AccountSnapshot) {
        let mut state = self.state.write().await;
        state.account = Some(account);
    }

    // ---- 点评 ----

    /// 以权威拉取结果整体替换点评缓存。
    /// 键解析不了ticket的条目按脏数据静默丢弃
    pub async fn merge_comments(&self, by_ticket: HashMap<String, Comment>) {
        let parsed: HashMap<i64, Comment> = by_ticket
            .into_iter()
            .filter_map(|(key, comment)| {
                key.trim().parse::<i64>().ok().map(|ticket| (ticket, comment))
            })
            .collect();
        let mut state = self.state.write().await;
        state.comments = parsed;
    }

    pub async fn upsert_comment(&self, ticket: i64, comment: Comment) {
        let mut state = self.state.write().await;
        state.comments.insert(ticket, comment);
    }

    pub async fn remove_comment(&self, ticket: i64) {
        let mut state = self.state.write().await;
        state.comments.remove(&ticket);
    }

    pub async fn comment(&self, ticket: i64) -> Option<Comment> {
        self.state.read().await.comments.get(&ticket).cloned()
    }

    // ---- 配置 ----

    pub async fn set_config(&self, config: DashboardConfig) {
        let mut state = self.state.write().await;
        state.config = Some(config);
    }

    pub async fn config_is_unset(&self) -> bool {
        self.state.read().await.config.is_none()
    }

    /// 远端确认写入后才调用：对命中的区段做浅合并
    pub async fn merge_config_section(&self, update: &ConfigUpdate) {
        let mut state = self.state.write().await;
        state
            .config
            .get_or_insert_with(DashboardConfig::default)
            .apply(update);
    }

    // ---- 资金基准 ----

    pub async fn set_capital_reference(&self, capital: f64) {
        let mut state = self.state.write().await;
        state.capital_reference = capital;
    }

    // ---- 读快照 ----

    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }

    pub async fn open_trades(&self) -> Vec<Trade> {
        self.state.read().await.open_trades.clone()
    }

    pub async fn closed_trades(&self) -> Vec<Trade> {
        self.state.read().await.closed_trades.clone()
    }

    pub async fn closed_trades_len(&self) -> usize {
        self.state.read().await.closed_trades.len()
    }

    pub async fn account(&self) -> Option<AccountSnapshot> {
        self.state.read().await.account.clone()
    }

    pub async fn capital_reference(&self) -> f64 {
        self.state.read().await.capital_reference
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

/// 在途拉取守卫。succeed/fail记录同步状态；
/// 无论哪条路径，drop时都会释放单飞标记
pub struct FetchGuard<'a> {
    store: &'a StateStore,
    resource: Resource,
}

impl FetchGuard<'_> {
    pub fn succeed(self) {
        self.store.record_sync(self.resource, None);
    }

    pub fn fail(self, message: String) {
        self.store.record_sync(self.resource, Some(message));
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.store.release_fetch(self.resource);
    }
}
