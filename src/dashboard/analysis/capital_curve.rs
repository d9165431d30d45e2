use crate::dashboard::model::capital::{CapitalCurve, CapitalPoint, CapitalSegment, SymbolColors};
use crate::dashboard::model::trade::{self, Trade};

/// 资金演化曲线构建器。
///
/// 输入为任意顺序的已平仓交易和起始资金基准，输出按符号切分的时间序列。
/// 没有已平仓交易时返回None（"无数据"），绝不返回空段列表
pub struct CapitalCurveBuilder;

impl CapitalCurveBuilder {
    pub fn build(
        mut closed: Vec<Trade>,
        initial_capital: f64,
        colors: &SymbolColors,
    ) -> Option<CapitalCurve> {
        if closed.is_empty() {
            return None;
        }
        trade::sort_by_close_time(&mut closed);

        // 起点为合成点：挂在首笔交易的open_time上，资金为基准值，不关联交易
        let mut points = Vec::with_capacity(closed.len() + 1);
        let start_ts = closed[0]
            .open_time_ms()
            .or_else(|| closed[0].close_time_ms())
            .unwrap_or(0);
        points.push(CapitalPoint {
            timestamp_ms: start_ts,
            capital: initial_capital,
            ticket: None,
        });

        let mut capital = initial_capital;
        for trade in &closed {
            capital += trade.profit.unwrap_or(0.0);
            points.push(CapitalPoint {
                timestamp_ms: trade.close_time_ms().unwrap_or(0),
                capital,
                ticket: Some(trade.ticket),
            });
        }

        // 分段：符号变化处切段，新段以上一段末点开头衔接。
        // 合成起点并入第一段，不单独成段
        let mut segments: Vec<CapitalSegment> = Vec::new();
        let mut current_symbol: Option<String> = None;
        let mut current_points: Vec<CapitalPoint> = vec![points[0].clone()];

        for (index, trade) in closed.iter().enumerate() {
            let point = points[index + 1].clone();
            match current_symbol.as_deref() {
                Some(symbol) if symbol == trade.symbol => {
                    current_points.push(point);
                }
                Some(symbol) => {
                    let boundary = current_points
                        .last()
                        .cloned()
                        .expect("segment never empty");
                    segments.push(CapitalSegment {
                        symbol: symbol.to_string(),
                        color: colors.color_for(symbol),
                        points: std::mem::take(&mut current_points),
                    });
                    current_points.push(boundary);
                    current_points.push(point);
                    current_symbol = Some(trade.symbol.clone());
                }
                None => {
                    current_symbol = Some(trade.symbol.clone());
                    current_points.push(point);
                }
            }
        }

        if let Some(symbol) = current_symbol {
            segments.push(CapitalSegment {
                color: colors.color_for(&symbol),
                symbol,
                points: current_points,
            });
        }

        Some(CapitalCurve {
            segments,
            final_capital: capital,
        })
    }
}
