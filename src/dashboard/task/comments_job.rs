use std::sync::Arc;

use crate::dashboard::cache::state_store::{Resource, StateStore};
use crate::dashboard::remote::api::DashboardApi;
use crate::error::AppError;

/// 点评刷新：权威全集整体替换本地缓存。
/// 对账流程（删除/平仓后的重拉）也走这里，单飞守卫挡住与定时器的并发
pub async fn refresh_comments(
    api: &Arc<dyn DashboardApi>,
    store: &Arc<StateStore>,
) -> Result<(), AppError> {
    let guard = match store.begin_fetch(Resource::Comments) {
        Some(guard) => guard,
        None => return Ok(()),
    };

    match api.get_comments().await {
        Ok(by_ticket) => {
            store.merge_comments(by_ticket).await;
            guard.succeed();
            Ok(())
        }
        Err(err) => {
            guard.fail(err.to_string());
            Err(err)
        }
    }
}
