use serde::{Deserialize, Serialize};

/// 止损类配置区段（auto_stop_loss / trailing_stop 结构相同）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub distance_pips: u32,
}

/// 面板配置。区段级局部更新，远端确认后本地做浅合并
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(rename = "closeBloc_allTrade", default)]
    pub close_bloc_all_trade: bool,
    #[serde(default)]
    pub auto_stop_loss: StopSection,
    #[serde(default)]
    pub trailing_stop: StopSection,
}

/// 配置区段名，与服务端的section取值一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSection {
    AutoStopLoss,
    TrailingStop,
}

impl ConfigSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSection::AutoStopLoss => "auto_stop_loss",
            ConfigSection::TrailingStop => "trailing_stop",
        }
    }
}

/// 配置修改请求。
///
/// 服务端契约：带section时只合并该区段内给出的字段；
/// closeBloc_allTrade是根级开关，不属于任何区段（服务端的特例分支）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigUpdate {
    Root {
        #[serde(rename = "closeBloc_allTrade")]
        close_bloc_all_trade: bool,
    },
    Section {
        section: ConfigSection,
        #[serde(skip_serializing_if = "Option::is_none")]
        enabled: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        distance_pips: Option<u32>,
    },
}

impl ConfigUpdate {
    pub fn root(value: bool) -> Self {
        ConfigUpdate::Root {
            close_bloc_all_trade: value,
        }
    }

    pub fn enabled(section: ConfigSection, value: bool) -> Self {
        ConfigUpdate::Section {
            section,
            enabled: Some(value),
            distance_pips: None,
        }
    }

    pub fn distance(section: ConfigSection, pips: u32) -> Self {
        ConfigUpdate::Section {
            section,
            enabled: None,
            distance_pips: Some(pips),
        }
    }
}

impl DashboardConfig {
    /// 远端确认写入后的本地浅合并：只覆盖请求中出现的字段
    pub fn apply(&mut self, update: &ConfigUpdate) {
        match update {
            ConfigUpdate::Root {
                close_bloc_all_trade,
            } => {
                self.close_bloc_all_trade = *close_bloc_all_trade;
            }
            ConfigUpdate::Section {
                section,
                enabled,
                distance_pips,
            } => {
                let target = match section {
                    ConfigSection::AutoStopLoss => &mut self.auto_stop_loss,
                    ConfigSection::TrailingStop => &mut self.trailing_stop,
                };
                if let Some(value) = enabled {
                    target.enabled = *value;
                }
                if let Some(pips) = distance_pips {
                    target.distance_pips = *pips;
                }
            }
        }
    }
}
