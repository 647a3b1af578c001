use crate::utils::error::{AppError, Result};
use chrono::NaiveDate;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_host(field_name: &str, scheme: &str, host: &str) -> Result<()> {
    if host.is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: host.to_string(),
            reason: "Host cannot be empty".to_string(),
        });
    }

    match scheme {
        "http" | "https" => {}
        other => {
            return Err(AppError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: host.to_string(),
                reason: format!("Unsupported URL scheme: {}", other),
            })
        }
    }

    let url_str = format!("{}://{}", scheme, host);
    match Url::parse(&url_str) {
        // host 只能是主機名稱(可帶 port)，不能夾帶路徑
        Ok(url) if url.path() == "/" && url.query().is_none() => Ok(()),
        Ok(_) => Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: host.to_string(),
            reason: "Host must not contain a path or query".to_string(),
        }),
        Err(e) => Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: host.to_string(),
            reason: format!("Invalid host: {}", e),
        }),
    }
}

pub fn validate_endpoint_path(field_name: &str, path: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Endpoint path must start with '/'".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 環境變數沒設定時 `${VAR}` 會原樣留下
pub fn validate_resolved(field_name: &str, value: &str) -> Result<()> {
    if value.contains("${") {
        return Err(AppError::MissingConfigError {
            field: format!("{} (unresolved placeholder {})", field_name, value),
        });
    }
    Ok(())
}

pub fn validate_date_key(field_name: &str, value: &str) -> Result<()> {
    let well_formed = value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit());
    if !well_formed || NaiveDate::parse_from_str(value, "%Y%m%d").is_err() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Expected a calendar date in YYYYMMDD form".to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| AppError::MissingConfigError {
        field: field_name.to_string(),
    })
}
