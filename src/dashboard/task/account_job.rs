use std::sync::Arc;

use tracing::{debug, warn};

use crate::dashboard::cache::state_store::{Resource, StateStore};
use crate::dashboard::remote::api::DashboardApi;
use crate::error::AppError;

/// 账户与持仓刷新。
///
/// 拉取成功才整体替换缓存（账户快照+两个交易分区），
/// 失败时旧值原样保留，只把错误记到同步状态上。
/// 配置首次缺失时顺带懒加载一次（与原面板行为一致）
pub async fn refresh_account_and_trades(
    api: &Arc<dyn DashboardApi>,
    store: &Arc<StateStore>,
) -> Result<(), AppError> {
    let guard = match store.begin_fetch(Resource::AccountTrades) {
        Some(guard) => guard,
        None => return Ok(()),
    };

    match api.get_account_and_trades().await {
        Ok(payload) => {
            store.replace_account(payload.account).await;
            store
                .replace_trades(payload.open_trades, payload.closed_trades)
                .await;
            guard.succeed();
        }
        Err(err) => {
            let message = err.to_string();
            guard.fail(message);
            return Err(err);
        }
    }

    if store.config_is_unset().await {
        match api.get_config().await {
            Ok(config) => {
                debug!("首次加载面板配置");
                store.set_config(config).await;
            }
            Err(err) => warn!("配置加载失败: {}", err),
        }
    }

    Ok(())
}
