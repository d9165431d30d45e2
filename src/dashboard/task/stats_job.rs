use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::dashboard::analysis::metrics::{self, TradeStats};
use crate::dashboard::cache::state_store::{Resource, StateStore};
use crate::dashboard::model::trade;
use crate::dashboard::remote::api::DashboardApi;
use crate::error::AppError;

/// 一轮统计刷新的产出：资金基准 + 聚合统计 + 最大回撤
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub capital_reference: f64,
    pub trade_stats: TradeStats,
    pub max_drawdown_pct: f64,
}

/// 统计刷新。
///
/// 与原面板一致：先取资金基准，再重拉一次交易数据并更新缓存，
/// 然后在已平仓集合上做纯计算。任一远端失败都不动已有缓存
pub async fn refresh_stats(
    api: &Arc<dyn DashboardApi>,
    store: &Arc<StateStore>,
) -> Result<DashboardStats, AppError> {
    let guard = match store.begin_fetch(Resource::Stats) {
        Some(guard) => guard,
        None => return Ok(current_stats(store).await),
    };

    let capital = match api.get_capital_baseline().await {
        Ok(capital) => capital,
        Err(err) => {
            guard.fail(err.to_string());
            return Err(err);
        }
    };

    let payload = match api.get_account_and_trades().await {
        Ok(payload) => payload,
        Err(err) => {
            guard.fail(err.to_string());
            return Err(err);
        }
    };

    store.set_capital_reference(capital).await;
    store.replace_account(payload.account).await;
    store
        .replace_trades(payload.open_trades, payload.closed_trades)
        .await;
    guard.succeed();

    let stats = current_stats(store).await;
    info!(
        "统计刷新完成: capital={:.2}, avg_rr={:.2}, max_dd={:.2}%",
        stats.capital_reference, stats.trade_stats.avg_rr, stats.max_drawdown_pct
    );
    Ok(stats)
}

/// 在当前缓存上做派生计算，不触网。回撤要求时间序，这里先排好
pub async fn current_stats(store: &Arc<StateStore>) -> DashboardStats {
    let mut closed = store.closed_trades().await;
    let trade_stats = TradeStats::compute(&closed);
    trade::sort_by_close_time(&mut closed);
    let max_drawdown_pct = metrics::max_drawdown(&closed);
    DashboardStats {
        capital_reference: store.capital_reference().await,
        trade_stats,
        max_drawdown_pct,
    }
}
