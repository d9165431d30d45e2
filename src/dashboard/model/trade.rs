use serde::{Deserialize, Serialize};

use crate::time_util;

/// 交易方向。桥接端在报文里用整数表示：1为买入，其余值按卖出处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum TradeType {
    Buy,
    Sell,
}

impl From<i64> for TradeType {
    fn from(value: i64) -> Self {
        if value == 1 {
            TradeType::Buy
        } else {
            TradeType::Sell
        }
    }
}

impl From<TradeType> for i64 {
    fn from(trade_type: TradeType) -> Self {
        match trade_type {
            TradeType::Buy => 1,
            TradeType::Sell => 0,
        }
    }
}

/// 交易记录，由远端交易系统产生，本端只读。
///
/// 持仓中的记录没有close_time/profit；两者都有才算已平仓。
/// symbol为空的记录视为脏数据，入缓存前统一过滤。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub ticket: i64,
    #[serde(default)]
    pub symbol: String,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    #[serde(default)]
    pub lots: f64,
    #[serde(default)]
    pub open_price: f64,
    #[serde(default)]
    pub sl: Option<f64>,
    #[serde(default)]
    pub tp: Option<f64>,
    #[serde(default)]
    pub profit: Option<f64>,
    #[serde(default)]
    pub open_time: String,
    #[serde(default)]
    pub close_time: Option<String>,
}

impl Trade {
    /// 已平仓：close_time与profit同时存在
    pub fn is_closed(&self) -> bool {
        self.close_time.is_some() && self.profit.is_some()
    }

    /// 数据质量判断：symbol缺失/为空的记录不可用
    pub fn has_symbol(&self) -> bool {
        !self.symbol.trim().is_empty()
    }

    pub fn open_time_ms(&self) -> Option<i64> {
        time_util::parse_mt_time(&self.open_time)
    }

    pub fn close_time_ms(&self) -> Option<i64> {
        self.close_time.as_deref().and_then(time_util::parse_mt_time)
    }
}

/// 按close_time升序排序。回撤与资金曲线都要求时间序输入
pub fn sort_by_close_time(trades: &mut [Trade]) {
    trades.sort_by_key(|t| t.close_time_ms().unwrap_or(0));
}
