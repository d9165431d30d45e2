use std::sync::Arc;

use dotenv::dotenv;
use futures::future::join_all;
use tracing::{error, info, warn};

use mt_dashboard::app_config::env::env_parse_or;
use mt_dashboard::app_config::log::setup_logging;
use mt_dashboard::dashboard::cache::state_store::StateStore;
use mt_dashboard::dashboard::model::capital::SymbolColors;
use mt_dashboard::dashboard::remote::api::DashboardApi;
use mt_dashboard::dashboard::remote::http_client::DashboardClient;
use mt_dashboard::dashboard::task::{account_job, capital_job, comments_job, stats_job};
use mt_dashboard::job::task_scheduler::{EditLock, TaskScheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // 设置日志
    let _log_guards = setup_logging().await?;

    let api: Arc<dyn DashboardApi> = Arc::new(DashboardClient::from_env());
    let store = Arc::new(StateStore::new());
    let edit_lock = EditLock::new();

    // 符号颜色表：加载失败退回内置表，不阻断启动
    let colors = match api.get_symbol_colors().await {
        Ok(colors) => colors,
        Err(err) => {
            warn!("加载符号颜色表失败，使用内置表: {}", err);
            SymbolColors::fallback()
        }
    };

    // 启动时先完整同步一轮基础数据，失败只记日志，轮询会继续补
    initial_sync(&api, &store, &colors).await;

    // 轮询间隔按部署可调，默认2s；曲线重建低频，默认60s
    let poll_interval_ms = env_parse_or("POLL_INTERVAL_MS", 2000u64);
    let curve_interval_ms = env_parse_or("CURVE_REFRESH_INTERVAL_MS", 60000u64);

    let mut scheduler = TaskScheduler::new(edit_lock.clone());
    {
        let api = Arc::clone(&api);
        let store = Arc::clone(&store);
        scheduler.add_periodic_task(
            "refresh_account_trades".to_string(),
            poll_interval_ms,
            move || {
                let api = Arc::clone(&api);
                let store = Arc::clone(&store);
                async move {
                    if let Err(err) = account_job::refresh_account_and_trades(&api, &store).await {
                        error!("账户与持仓刷新失败: {}", err);
                    }
                }
            },
        );
    }
    {
        let api = Arc::clone(&api);
        let store = Arc::clone(&store);
        scheduler.add_periodic_task("refresh_stats".to_string(), poll_interval_ms, move || {
            let api = Arc::clone(&api);
            let store = Arc::clone(&store);
            async move {
                if let Err(err) = stats_job::refresh_stats(&api, &store).await {
                    error!("统计刷新失败: {}", err);
                }
            }
        });
    }
    {
        let api = Arc::clone(&api);
        let store = Arc::clone(&store);
        scheduler.add_periodic_task("refresh_comments".to_string(), poll_interval_ms, move || {
            let api = Arc::clone(&api);
            let store = Arc::clone(&store);
            async move {
                if let Err(err) = comments_job::refresh_comments(&api, &store).await {
                    error!("点评刷新失败: {}", err);
                }
            }
        });
    }
    {
        let api = Arc::clone(&api);
        let store = Arc::clone(&store);
        let colors = colors.clone();
        scheduler.add_periodic_task(
            "rebuild_capital_curve".to_string(),
            curve_interval_ms,
            move || {
                let api = Arc::clone(&api);
                let store = Arc::clone(&store);
                let colors = colors.clone();
                async move {
                    if let Err(err) =
                        capital_job::rebuild_capital_curve(&api, &store, &colors).await
                    {
                        error!("资金曲线重建失败: {}", err);
                    }
                }
            },
        );
    }

    info!(
        "面板核心已启动: poll={}ms, curve={}ms",
        poll_interval_ms, curve_interval_ms
    );

    // 捕捉Ctrl+C信号以平滑关闭
    tokio::signal::ctrl_c().await?;
    scheduler.shutdown().await;

    Ok(())
}

/// 初始同步：统计（含资金基准+交易）、点评、资金曲线各拉一次。
/// 资源相互独立，并发执行
async fn initial_sync(api: &Arc<dyn DashboardApi>, store: &Arc<StateStore>, colors: &SymbolColors) {
    let mut tasks = Vec::new();
    {
        let api = Arc::clone(api);
        let store = Arc::clone(store);
        tasks.push(tokio::spawn(async move {
            if let Err(err) = stats_job::refresh_stats(&api, &store).await {
                warn!("初始统计同步失败: {}", err);
            }
        }));
    }
    {
        let api = Arc::clone(api);
        let store = Arc::clone(store);
        tasks.push(tokio::spawn(async move {
            if let Err(err) = comments_job::refresh_comments(&api, &store).await {
                warn!("初始点评同步失败: {}", err);
            }
        }));
    }
    {
        let api = Arc::clone(api);
        let store = Arc::clone(store);
        let colors = colors.clone();
        tasks.push(tokio::spawn(async move {
            if let Err(err) = capital_job::rebuild_capital_curve(&api, &store, &colors).await {
                warn!("初始资金曲线构建失败: {}", err);
            }
        }));
    }
    join_all(tasks).await;
}
