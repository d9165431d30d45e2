use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::dashboard::model::account::AccountSnapshot;
use crate::dashboard::model::capital::SymbolColors;
use crate::dashboard::model::comment::{Comment, CommentPayload};
use crate::dashboard::model::config::{ConfigUpdate, DashboardConfig};
use crate::dashboard::model::trade::Trade;
use crate::error::AppError;

/// 服务端统一应答信封：status为"success"/"error"，失败时带message。
/// 失败永远落在Result里，不会以panic穿出调用点
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn into_result(self) -> Result<T, AppError> {
        if self.status == "success" {
            self.data
                .ok_or_else(|| AppError::Parse("应答缺少data字段".to_string()))
        } else {
            Err(AppError::Remote(
                self.message.unwrap_or_else(|| "erreur inconnue".to_string()),
            ))
        }
    }
}

/// 无data的写操作应答
#[derive(Debug, Deserialize)]
pub struct AckEnvelope {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl AckEnvelope {
    pub fn into_result(self) -> Result<(), AppError> {
        if self.status == "success" {
            Ok(())
        } else {
            Err(AppError::Remote(
                self.message.unwrap_or_else(|| "erreur inconnue".to_string()),
            ))
        }
    }
}

/// /api/tradesDB 的data部分：账户快照 + 持仓/已平仓两个分区
#[derive(Debug, Clone, Deserialize)]
pub struct AccountAndTrades {
    pub account: AccountSnapshot,
    #[serde(default)]
    pub open_trades: Vec<Trade>,
    #[serde(default)]
    pub closed_trades: Vec<Trade>,
}

/// /api/configDB 的data部分带一层config包装
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigData {
    pub config: DashboardConfig,
}

/// 远端面板服务的抽象接口。
///
/// 轮询任务与点评对账都只依赖这个trait，测试用脚本化实现替换。
/// 超时不在这里强制；挂死的调用只会推迟同一资源的下一次刷新
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn get_account_and_trades(&self) -> Result<AccountAndTrades, AppError>;

    /// 资金基准（环境里配置的起始资金）
    async fn get_capital_baseline(&self) -> Result<f64, AppError>;

    /// 点评全集，按ticket字符串为键
    async fn get_comments(&self) -> Result<HashMap<String, Comment>, AppError>;

    async fn get_config(&self) -> Result<DashboardConfig, AppError>;

    async fn update_config(&self, update: &ConfigUpdate) -> Result<(), AppError>;

    async fn create_comment(&self, payload: &CommentPayload) -> Result<(), AppError>;

    async fn update_comment(&self, payload: &CommentPayload) -> Result<(), AppError>;

    async fn delete_comment(&self, ticket: i64) -> Result<(), AppError>;

    /// 请求平仓。成功只代表远端受理，本地缓存靠下一轮对账修正
    async fn close_trade(&self, ticket: i64) -> Result<(), AppError>;

    /// 为已有交易补挂保护性SL/TP。核心范围内只关心其后的点评缓存失效
    async fn annotate_trade(&self, ticket: i64) -> Result<(), AppError>;

    /// 符号颜色表（静态资源）。失败时调用方退回内置表
    async fn get_symbol_colors(&self) -> Result<SymbolColors, AppError>;
}
