use serde::Serialize;

use crate::dashboard::model::trade::{Trade, TradeType};

/// 单笔交易的盈亏比（风险回报比）。
///
/// 止损/止盈缺失，或开仓价与止损价相等（除零）时无定义。
/// 买入: (tp - open) / (open - sl)；卖出: (open - tp) / (sl - open)
pub fn risk_reward(trade: &Trade) -> Option<f64> {
    let sl = trade.sl?;
    let tp = trade.tp?;
    let open = trade.open_price;
    if open == sl {
        return None;
    }
    let rr = match trade.trade_type {
        TradeType::Buy => (tp - open) / (open - sl),
        TradeType::Sell => (open - tp) / (sl - open),
    };
    Some(rr)
}

/// 展示用盈亏比，保留两位小数。均值计算走raw值，不用这里的舍入结果
pub fn display_rr(trade: &Trade) -> Option<f64> {
    risk_reward(trade).map(|rr| (rr * 100.0).round() / 100.0)
}

/// 已平仓交易的聚合统计。
/// 各均值在贡献样本数为0时取0，避免NaN流入展示层
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TradeStats {
    /// 有定义且有限的RR均值；NaN/无穷的退化样本不计入（而非按0计）
    pub avg_rr: f64,
    /// profit >= 0 的样本均值
    pub avg_gain: f64,
    /// profit < 0 的样本均值
    pub avg_loss: f64,
    pub best: f64,
    pub worst: f64,
}

impl TradeStats {
    pub fn compute(closed: &[Trade]) -> Self {
        let mut rr_total = 0.0;
        let mut rr_count = 0usize;
        let mut gain_total = 0.0;
        let mut gain_count = 0usize;
        let mut loss_total = 0.0;
        let mut loss_count = 0usize;
        let mut best: Option<f64> = None;
        let mut worst: Option<f64> = None;

        for trade in closed {
            let profit = trade.profit.unwrap_or(0.0);
            best = Some(best.map_or(profit, |b| b.max(profit)));
            worst = Some(worst.map_or(profit, |w| w.min(profit)));
            if profit >= 0.0 {
                gain_total += profit;
                gain_count += 1;
            } else {
                loss_total += profit;
                loss_count += 1;
            }

            if let Some(rr) = risk_reward(trade) {
                if rr.is_finite() {
                    rr_total += rr;
                    rr_count += 1;
                }
            }
        }

        TradeStats {
            avg_rr: if rr_count > 0 {
                rr_total / rr_count as f64
            } else {
                0.0
            },
            avg_gain: if gain_count > 0 {
                gain_total / gain_count as f64
            } else {
                0.0
            },
            avg_loss: if loss_count > 0 {
                loss_total / loss_count as f64
            } else {
                0.0
            },
            best: best.unwrap_or(0.0),
            worst: worst.unwrap_or(0.0),
        }
    }
}

/// 最大回撤百分比。
///
/// 逐笔累计余额并跟踪峰值（峰值从0起），单步回撤为
/// (peak - balance) / peak * 100（peak > 0时，否则0），返回序列中的最大值。
/// 输入必须按close_time升序；乱序输入属于调用方误用，结果无意义
pub fn max_drawdown(closed_in_order: &[Trade]) -> f64 {
    let mut peak = 0.0_f64;
    let mut balance = 0.0_f64;
    let mut max_dd = 0.0_f64;
    for trade in closed_in_order {
        balance += trade.profit.unwrap_or(0.0);
        peak = peak.max(balance);
        let drawdown = if peak > 0.0 {
            (peak - balance) / peak * 100.0
        } else {
            0.0
        };
        max_dd = max_dd.max(drawdown);
    }
    max_dd
}
