use std::sync::Arc;

use tracing::{info, warn};

use crate::dashboard::cache::state_store::StateStore;
use crate::dashboard::model::comment::CommentDraft;
use crate::dashboard::remote::api::DashboardApi;
use crate::dashboard::task::comments_job;
use crate::error::AppError;
use crate::job::task_scheduler::EditLock;

/// 点评编辑会话状态机：
/// Idle -> Editing -> Saving -> Idle（成功）/ Editing（失败，可重试）
#[derive(Debug, Clone, PartialEq)]
pub enum EditState {
    Idle,
    Editing { ticket: i64, draft: CommentDraft },
    Saving { ticket: i64, draft: CommentDraft },
}

impl EditState {
    pub fn is_idle(&self) -> bool {
        matches!(self, EditState::Idle)
    }
}

/// 点评对账器。
///
/// 用户写操作的唯一入口：乐观更新本地缓存，以下一次权威拉取对账。
/// 进入编辑态即持有全局编辑锁（轮询随之挂起），成功保存或取消才放锁。
/// 远端失败时退回编辑态、保留草稿，缓存不做任何半提交
pub struct CommentReconciler {
    api: Arc<dyn DashboardApi>,
    store: Arc<StateStore>,
    edit_lock: EditLock,
    state: EditState,
}

impl CommentReconciler {
    pub fn new(api: Arc<dyn DashboardApi>, store: Arc<StateStore>, edit_lock: EditLock) -> Self {
        CommentReconciler {
            api,
            store,
            edit_lock,
            state: EditState::Idle,
        }
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        !self.state.is_idle()
    }

    /// 打开编辑会话并上编辑锁。
    /// 已有会话时直接忽略（同一时刻只允许一个弹窗，与原面板一致）。
    /// 草稿内容来自缓存副本，无点评时为空模板
    pub async fn begin_edit(&mut self, ticket: i64) -> bool {
        if !self.state.is_idle() {
            return false;
        }
        if !self.edit_lock.acquire() {
            warn!("编辑锁已被持有，拒绝开启会话: ticket={}", ticket);
            return false;
        }
        let draft = match self.store.comment(ticket).await {
            Some(comment) => CommentDraft::from_comment(&comment),
            None => CommentDraft::default(),
        };
        self.state = EditState::Editing { ticket, draft };
        true
    }

    /// 会话中的可写草稿
    pub fn draft_mut(&mut self) -> Option<&mut CommentDraft> {
        match &mut self.state {
            EditState::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// 放弃编辑：丢草稿、放锁。这是唯一会丢弃草稿的路径
    pub fn cancel(&mut self) {
        if !self.state.is_idle() {
            self.state = EditState::Idle;
            self.edit_lock.release();
        }
    }

    /// 校验并提交当前草稿。
    ///
    /// 校验失败立即返回且不触网，会话停在编辑态；
    /// create/update按缓存里有无该ticket的点评来选——这是客户端启发式，
    /// 可能与并发删除竞争，靠下一轮拉取对账修正。
    /// 远端成功后以草稿字段乐观更新缓存（其余字段保留）并放锁；
    /// 远端失败保留草稿退回编辑态，缓存不动
    pub async fn save(&mut self) -> Result<(), AppError> {
        let (ticket, draft) = match &self.state {
            EditState::Editing { ticket, draft } => (*ticket, draft.clone()),
            _ => {
                return Err(AppError::Validation("没有进行中的编辑会话".to_string()));
            }
        };

        draft.validate()?;

        self.state = EditState::Saving {
            ticket,
            draft: draft.clone(),
        };

        let existing = self.store.comment(ticket).await;
        let payload = draft.to_payload(ticket);
        let result = if existing.is_some() {
            self.api.update_comment(&payload).await
        } else {
            self.api.create_comment(&payload).await
        };

        match result {
            Ok(()) => {
                let merged = draft.apply_to(existing.as_ref());
                self.store.upsert_comment(ticket, merged).await;
                self.state = EditState::Idle;
                self.edit_lock.release();
                info!("点评保存成功: ticket={}", ticket);
                Ok(())
            }
            Err(err) => {
                self.state = EditState::Editing { ticket, draft };
                Err(err)
            }
        }
    }

    /// 删除点评。不走编辑锁：远端确认后才删缓存，
    /// 随后整体重拉一次点评，防漏掉并发更新
    pub async fn delete(&mut self, ticket: i64) -> Result<(), AppError> {
        self.api.delete_comment(ticket).await?;
        self.store.remove_comment(ticket).await;
        self.resync_comments().await;
        info!("点评已删除: ticket={}", ticket);
        Ok(())
    }

    /// 请求平仓。确认后本地点评作废并整体重拉
    pub async fn close_trade(&mut self, ticket: i64) -> Result<(), AppError> {
        self.api.close_trade(ticket).await?;
        self.store.remove_comment(ticket).await;
        self.resync_comments().await;
        info!("平仓请求已受理: ticket={}", ticket);
        Ok(())
    }

    /// 请求桥接端补挂保护性SL/TP。核心只关心点评缓存失效+重拉
    pub async fn annotate_trade(&mut self, ticket: i64) -> Result<(), AppError> {
        self.api.annotate_trade(ticket).await?;
        self.store.remove_comment(ticket).await;
        self.resync_comments().await;
        Ok(())
    }

    async fn resync_comments(&self) {
        if let Err(err) = comments_job::refresh_comments(&self.api, &self.store).await {
            warn!("点评对账重拉失败: {}", err);
        }
    }
}
