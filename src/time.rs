use std::time::{Duration, SystemTime, UNIX_EPOCH};

use time::{macros::format_description, PrimitiveDateTime};

use crate::error::EzpayResult;

pub fn now() -> EzpayResult<Duration> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?)
}

/// 请求中 `TimeStamp` 使用的 unix 秒数
pub fn unix_timestamp() -> EzpayResult<u64> {
    Ok(now()?.as_secs())
}

/// 解析 ezPay 回传的 `CreateTime`，格式为 `2023-09-01 23:06:07`（台湾时间，不带时区）
pub fn parse_create_time(s: &str) -> EzpayResult<PrimitiveDateTime> {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    Ok(PrimitiveDateTime::parse(s.trim(), format)?)
}
