use thiserror::Error;

/// 应用错误
///
/// 错误从不以panic形式穿越组件边界：每个组件显式返回结果，
/// 缓存不会停留在半更新状态。
#[derive(Error, Debug)]
pub enum AppError {
    /// 网络/传输失败（请求未达或非正常状态码），缓存保留旧值
    #[error("网络错误: {0}")]
    Network(String),

    /// 远端明确返回失败状态（status=error），写路径上表现为保存冲突
    #[error("远端返回失败: {0}")]
    Remote(String),

    /// 本地校验失败，未发起任何远端调用
    #[error("校验失败: {0}")]
    Validation(String),

    /// 报文或时间格式解析失败
    #[error("解析错误: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl AppError {
    /// 是否为本地校验错误（未触网即被拦截）
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}
