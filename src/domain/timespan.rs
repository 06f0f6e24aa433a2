use thiserror::Error;

/// 时间范围解析错误
#[derive(Debug, Error, PartialEq)]
pub enum TimespanError {
    /// 数值部分无法解析或单位不被识别
    #[error("无效的时间范围格式 \"{0}\": 请使用数字加单位，例如 \"5m\"、\"1.5h\"、\"10s\"、\"2d\"")]
    InvalidFormat(String),
}

/// 将时间范围字符串解析为秒数
///
/// 格式为数字前缀加单个单位字符: 's' 秒、'm' 分钟、'h' 小时、'd' 天，
/// 单位不区分大小写。数值部分按十进制小数解析，不做正负校验。
pub fn parse_timespan(timespan_str: &str) -> Result<f64, TimespanError> {
    let invalid = || TimespanError::InvalidFormat(timespan_str.to_string());

    let unit = timespan_str.chars().last().ok_or_else(invalid)?;

    let multiplier = match unit.to_ascii_lowercase() {
        's' => 1.0,
        'm' => 60.0,
        'h' => 3600.0,
        'd' => 86400.0,
        _ => return Err(invalid()),
    };

    let numeric_part = &timespan_str[..timespan_str.len() - unit.len_utf8()];
    let value: f64 = numeric_part.parse().map_err(|_| invalid())?;

    Ok(value * multiplier)
}
