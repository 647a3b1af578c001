//! KOBIS 以 `YYYYMMDD` 字串指定查詢日期，當日票房要隔天才有，所以預設查前一天。

use crate::utils::error::{AppError, Result};
use chrono::{Local, NaiveDate};

pub const DATE_KEY_FORMAT: &str = "%Y%m%d";

/// `date` 前一天的日期鍵，跨月跨年都會正確進位，月與日固定兩位數
pub fn previous_day_key(date: NaiveDate) -> Result<String> {
    let previous = date.pred_opt().ok_or_else(|| AppError::ConfigError {
        message: format!("No calendar day before {}", date),
    })?;
    Ok(previous.format(DATE_KEY_FORMAT).to_string())
}

pub fn today_previous_day_key() -> Result<String> {
    let today = Local::now().date_naive();
    tracing::debug!("today is {}", today);
    previous_day_key(today)
}

pub fn parse_date_key(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).map_err(|e| {
        AppError::InvalidConfigValueError {
            field: "date".to_string(),
            value: key.to_string(),
            reason: e.to_string(),
        }
    })
}
