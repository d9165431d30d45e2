use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::app_config::env::env_or_default;
use crate::dashboard::model::capital::{Rgb, SymbolColors};
use crate::dashboard::model::comment::{Comment, CommentPayload};
use crate::dashboard::model::config::{ConfigUpdate, DashboardConfig};
use crate::dashboard::remote::api::{
    AccountAndTrades, AckEnvelope, ApiEnvelope, ConfigData, DashboardApi,
};
use crate::error::AppError;

/// /api/capitalDB 不走信封的data字段，capital在顶层
#[derive(Debug, Deserialize)]
struct CapitalBaselineResponse {
    status: String,
    #[serde(default)]
    capital: f64,
    #[serde(default)]
    message: Option<String>,
}

/// 写操作请求体里只带id的场景（删除点评、平仓、补挂SL/TP）
#[derive(Debug, Serialize)]
struct TicketBody {
    id: i64,
}

/// 面板服务的HTTP实现
pub struct DashboardClient {
    client: Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(base_url: String) -> Self {
        DashboardClient {
            client: Client::new(),
            base_url,
        }
    }

    pub fn from_env() -> Self {
        Self::new(env_or_default("DASHBOARD_API_URL", "http://localhost:80"))
    }

    async fn get_parsed<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;

        let status_code = response.status();
        let response_body = response.text().await?;
        debug!("path:{}, dashboard_response: {}", path, response_body);

        // 服务端失败也走JSON信封（带4xx码），优先按信封解析
        match serde_json::from_str::<T>(&response_body) {
            Ok(parsed) => Ok(parsed),
            Err(err) if status_code.is_success() => Err(AppError::Parse(err.to_string())),
            Err(_) => Err(AppError::Network(format!(
                "请求失败: {} {}",
                status_code, path
            ))),
        }
    }

    async fn post_parsed<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);
        let body = serde_json::to_string(body)?;
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status_code = response.status();
        let response_body = response.text().await?;
        debug!("path:{}, dashboard_response: {}", path, response_body);

        match serde_json::from_str::<T>(&response_body) {
            Ok(parsed) => Ok(parsed),
            Err(err) if status_code.is_success() => Err(AppError::Parse(err.to_string())),
            Err(_) => Err(AppError::Network(format!(
                "请求失败: {} {}",
                status_code, path
            ))),
        }
    }
}

#[async_trait]
impl DashboardApi for DashboardClient {
    async fn get_account_and_trades(&self) -> Result<AccountAndTrades, AppError> {
        let envelope: ApiEnvelope<AccountAndTrades> = self.get_parsed("/api/tradesDB").await?;
        envelope.into_result()
    }

    async fn get_capital_baseline(&self) -> Result<f64, AppError> {
        let response: CapitalBaselineResponse = self.get_parsed("/api/capitalDB").await?;
        if response.status == "success" {
            Ok(response.capital)
        } else {
            Err(AppError::Remote(
                response
                    .message
                    .unwrap_or_else(|| "erreur inconnue".to_string()),
            ))
        }
    }

    async fn get_comments(&self) -> Result<HashMap<String, Comment>, AppError> {
        let envelope: ApiEnvelope<HashMap<String, Comment>> =
            self.get_parsed("/api/commentsDB").await?;
        envelope.into_result()
    }

    async fn get_config(&self) -> Result<DashboardConfig, AppError> {
        let envelope: ApiEnvelope<ConfigData> = self.get_parsed("/api/configDB").await?;
        envelope.into_result().map(|data| data.config)
    }

    async fn update_config(&self, update: &ConfigUpdate) -> Result<(), AppError> {
        let ack: AckEnvelope = self.post_parsed("/api/config/editDB", update).await?;
        ack.into_result()
    }

    async fn create_comment(&self, payload: &CommentPayload) -> Result<(), AppError> {
        let ack: AckEnvelope = self.post_parsed("/api/comments/addDB", payload).await?;
        ack.into_result()
    }

    async fn update_comment(&self, payload: &CommentPayload) -> Result<(), AppError> {
        let ack: AckEnvelope = self.post_parsed("/api/comments/editDB", payload).await?;
        ack.into_result()
    }

    async fn delete_comment(&self, ticket: i64) -> Result<(), AppError> {
        let ack: AckEnvelope = self
            .post_parsed("/api/comments/deleteDB", &TicketBody { id: ticket })
            .await?;
        ack.into_result()
    }

    async fn close_trade(&self, ticket: i64) -> Result<(), AppError> {
        let ack: AckEnvelope = self
            .post_parsed("/api/trades/closesDB", &TicketBody { id: ticket })
            .await?;
        ack.into_result()
    }

    async fn annotate_trade(&self, ticket: i64) -> Result<(), AppError> {
        let ack: AckEnvelope = self
            .post_parsed("/api/commentsDB", &TicketBody { id: ticket })
            .await?;
        ack.into_result()
    }

    async fn get_symbol_colors(&self) -> Result<SymbolColors, AppError> {
        // 颜色表是静态JSON，不带信封
        let table: HashMap<String, Rgb> =
            self.get_parsed("/static/allSymbolsToColor.json").await?;
        Ok(SymbolColors(table))
    }
}
