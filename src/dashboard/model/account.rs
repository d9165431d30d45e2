use serde::{Deserialize, Serialize};

/// 账户快照，每次轮询整体替换，不做字段级合并
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountSnapshot {
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub equity: f64,
    #[serde(default)]
    pub free_margin: f64,
    #[serde(default)]
    pub margin: f64,
    #[serde(default)]
    pub leverage: i64,
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub currency: String,
    /// 部分桥接版本不回传账户名
    #[serde(default)]
    pub name: String,
}
