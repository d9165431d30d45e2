use std::sync::Arc;

use tracing::error;

use crate::dashboard::cache::state_store::StateStore;
use crate::dashboard::model::comment::CommentDraft;
use crate::dashboard::model::config::ConfigUpdate;
use crate::dashboard::model::trade::{self, Trade};
use crate::dashboard::paginate::{PageView, TradeBrowser, PAGE_SIZE};
use crate::dashboard::reconcile::comment_editor::CommentReconciler;
use crate::dashboard::remote::api::DashboardApi;
use crate::dashboard::task::account_job;
use crate::error::AppError;
use crate::job::task_scheduler::EditLock;

/// 用户操作的命令值。
///
/// 每个动作是一个判别值，由对应组件的处理器消费，
/// 与具体展示技术解耦（替代原面板按CSS类分发点击事件）
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardCommand {
    EditComment { ticket: i64 },
    CancelEdit,
    /// 展示层把表单值灌进草稿后提交
    SaveComment { draft: CommentDraft },
    DeleteComment { ticket: i64 },
    CloseTrade { ticket: i64 },
    AnnotateTrade { ticket: i64 },
    UpdateConfig(ConfigUpdate),
    NextPage,
    PrevPage,
    /// 显式整体重载已平仓列表（页码回到首页的唯一路径）
    ReloadClosedTrades,
}

/// 命令处理结果。错误以值返回，从不panic穿透共享状态
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Done,
    /// 无操作场景：越界翻页、会话重复开启等
    Ignored,
    /// 本地校验拦截，未触网
    Rejected(String),
    /// 远端失败，缓存未动
    Failed(String),
}

/// 命令处理器：持有对账器与浏览游标，读写都经StateStore句柄
pub struct CommandHandler {
    api: Arc<dyn DashboardApi>,
    store: Arc<StateStore>,
    reconciler: CommentReconciler,
    browser: TradeBrowser,
}

impl CommandHandler {
    pub fn new(api: Arc<dyn DashboardApi>, store: Arc<StateStore>, edit_lock: EditLock) -> Self {
        let reconciler =
            CommentReconciler::new(Arc::clone(&api), Arc::clone(&store), edit_lock);
        CommandHandler {
            api,
            store,
            reconciler,
            browser: TradeBrowser::new(PAGE_SIZE),
        }
    }

    pub fn reconciler(&self) -> &CommentReconciler {
        &self.reconciler
    }

    pub fn browser(&self) -> &TradeBrowser {
        &self.browser
    }

    pub async fn handle(&mut self, command: DashboardCommand) -> CommandOutcome {
        match command {
            DashboardCommand::EditComment { ticket } => {
                if self.reconciler.begin_edit(ticket).await {
                    CommandOutcome::Done
                } else {
                    CommandOutcome::Ignored
                }
            }
            DashboardCommand::CancelEdit => {
                self.reconciler.cancel();
                CommandOutcome::Done
            }
            DashboardCommand::SaveComment { draft } => {
                match self.reconciler.draft_mut() {
                    Some(current) => *current = draft,
                    None => return CommandOutcome::Ignored,
                }
                match self.reconciler.save().await {
                    Ok(()) => CommandOutcome::Done,
                    Err(AppError::Validation(message)) => CommandOutcome::Rejected(message),
                    Err(err) => CommandOutcome::Failed(err.to_string()),
                }
            }
            DashboardCommand::DeleteComment { ticket } => {
                let result = self.reconciler.delete(ticket).await;
                self.to_outcome(result)
            }
            DashboardCommand::CloseTrade { ticket } => {
                let result = self.reconciler.close_trade(ticket).await;
                self.to_outcome(result)
            }
            DashboardCommand::AnnotateTrade { ticket } => {
                let result = self.reconciler.annotate_trade(ticket).await;
                self.to_outcome(result)
            }
            DashboardCommand::UpdateConfig(update) => {
                // 先远端后本地：确认写入成功才合并缓存区段
                match self.api.update_config(&update).await {
                    Ok(()) => {
                        self.store.merge_config_section(&update).await;
                        CommandOutcome::Done
                    }
                    Err(err) => {
                        error!("配置更新失败: {}", err);
                        CommandOutcome::Failed(err.to_string())
                    }
                }
            }
            DashboardCommand::NextPage => {
                let total = self.store.closed_trades_len().await;
                if self.browser.next(total) {
                    CommandOutcome::Done
                } else {
                    CommandOutcome::Ignored
                }
            }
            DashboardCommand::PrevPage => {
                if self.browser.prev() {
                    CommandOutcome::Done
                } else {
                    CommandOutcome::Ignored
                }
            }
            DashboardCommand::ReloadClosedTrades => {
                match account_job::refresh_account_and_trades(&self.api, &self.store).await {
                    Ok(()) => {
                        self.browser.reload();
                        CommandOutcome::Done
                    }
                    Err(err) => CommandOutcome::Failed(err.to_string()),
                }
            }
        }
    }

    fn to_outcome(&self, result: Result<(), AppError>) -> CommandOutcome {
        match result {
            Ok(()) => CommandOutcome::Done,
            Err(err) => CommandOutcome::Failed(err.to_string()),
        }
    }

    /// 当前页的已平仓交易视图，展示顺序为close_time倒序（最新在前）
    pub async fn closed_trades_page(&self) -> PageView<Trade> {
        let mut closed = self.store.closed_trades().await;
        trade::sort_by_close_time(&mut closed);
        closed.reverse();
        self.browser.current(&closed)
    }
}
