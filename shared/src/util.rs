/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Milliseconds in one minute
pub const MILLIS_PER_MINUTE: i64 = 60_000;

/// Round a value to one decimal place (display precision for minutes)
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
