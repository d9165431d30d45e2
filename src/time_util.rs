use chrono::{NaiveDateTime, TimeZone, Utc};

/// MT桥接端输出的时间格式，如 "2025.07.03 17:11"
pub const MT_TIME_FORMAT: &str = "%Y.%m.%d %H:%M";

/// 带秒的变体，部分桥接版本会输出秒
const MT_TIME_FORMAT_WITH_SECONDS: &str = "%Y.%m.%d %H:%M:%S";

/// 解析MT格式时间为毫秒时间戳，解析失败返回None
pub fn parse_mt_time(time_str: &str) -> Option<i64> {
    let trimmed = time_str.trim();
    let parsed = NaiveDateTime::parse_from_str(trimmed, MT_TIME_FORMAT_WITH_SECONDS)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, MT_TIME_FORMAT));
    match parsed {
        Ok(datetime) => Some(Utc.from_utc_datetime(&datetime).timestamp_millis()),
        Err(_) => None,
    }
}

/// 将毫秒级时间戳格式化为MT格式字符串
pub fn format_mt_time(timestamp_ms: i64) -> Result<String, String> {
    match Utc.timestamp_millis_opt(timestamp_ms) {
        chrono::LocalResult::Single(datetime) => Ok(datetime.format(MT_TIME_FORMAT).to_string()),
        chrono::LocalResult::None => Err("Invalid timestamp: None".to_string()),
        chrono::LocalResult::Ambiguous(_, _) => Err("Invalid timestamp: Ambiguous".to_string()),
    }
}

/// 将毫秒级时间戳转换为通用展示格式
pub fn mill_time_to_datetime(timestamp_ms: i64) -> Result<String, String> {
    match Utc.timestamp_millis_opt(timestamp_ms) {
        chrono::LocalResult::Single(datetime) => {
            let formatted_datetime = datetime.format("%Y-%m-%d %H:%M:%S").to_string();
            Ok(formatted_datetime)
        }
        chrono::LocalResult::None => Err("Invalid timestamp: None".to_string()),
        chrono::LocalResult::Ambiguous(_, _) => Err("Invalid timestamp: Ambiguous".to_string()),
    }
}

/// 当前毫秒时间戳
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
