use std::sync::Arc;

use tracing::info;

use crate::app_config::env::env_parse_or;
use crate::dashboard::analysis::capital_curve::CapitalCurveBuilder;
use crate::dashboard::cache::state_store::{Resource, StateStore};
use crate::dashboard::model::capital::{CapitalCurve, SymbolColors};
use crate::dashboard::model::trade::Trade;
use crate::dashboard::remote::api::DashboardApi;
use crate::error::AppError;

/// 账户余额也取不到时的资金基准兜底值
pub const FALLBACK_INITIAL_CAPITAL: f64 = 1000.0;

/// 资金曲线重建（低频任务）。
///
/// 基准资金取本次应答的账户余额，余额为0时退回兜底常量
/// （可用FALLBACK_INITIAL_CAPITAL环境变量覆盖）。
/// 返回None表示没有已平仓交易（"无数据"），不是错误
pub async fn rebuild_capital_curve(
    api: &Arc<dyn DashboardApi>,
    store: &Arc<StateStore>,
    colors: &SymbolColors,
) -> Result<Option<CapitalCurve>, AppError> {
    let guard = match store.begin_fetch(Resource::CapitalCurve) {
        Some(guard) => guard,
        None => return Ok(None),
    };

    let payload = match api.get_account_and_trades().await {
        Ok(payload) => payload,
        Err(err) => {
            guard.fail(err.to_string());
            return Err(err);
        }
    };
    guard.succeed();

    let initial_capital = if payload.account.balance > 0.0 {
        payload.account.balance
    } else {
        env_parse_or("FALLBACK_INITIAL_CAPITAL", FALLBACK_INITIAL_CAPITAL)
    };

    // 入口处统一的数据质量过滤：无symbol的记录不参与曲线
    let closed: Vec<Trade> = payload
        .closed_trades
        .into_iter()
        .filter(Trade::has_symbol)
        .collect();

    let curve = CapitalCurveBuilder::build(closed, initial_capital, colors);
    match &curve {
        Some(curve) => info!(
            "资金曲线重建完成: {}段, 终值={:.2}",
            curve.segments.len(),
            curve.final_capital
        ),
        None => info!("资金曲线重建: 无已平仓交易"),
    }
    Ok(curve)
}
