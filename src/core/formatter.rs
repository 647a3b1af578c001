use crate::core::fetcher::scalar_text;
use crate::domain::model::{BoxOfficeResponse, MovieSearchResponse};
use crate::utils::error::{AppError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::Write;

pub const SEPARATOR: &str = "-------------------------";

/// 可以輸出成文字摘要的回應
pub trait Report {
    fn lines(&self) -> Result<Vec<String>>;
}

/// 把未經檢查的 JSON 轉成指定的回應型別，欄位不符時回傳 ShapeMismatch
pub fn decode<T: DeserializeOwned>(shape: &'static str, value: Value) -> Result<T> {
    let raw = tracing::enabled!(tracing::Level::DEBUG).then(|| value.to_string());
    serde_json::from_value(value).map_err(|e| {
        if let Some(raw) = raw {
            tracing::debug!("Unexpected {} response: {}", shape, raw);
        }
        AppError::ShapeMismatch {
            shape,
            message: e.to_string(),
        }
    })
}

impl BoxOfficeResponse {
    pub fn from_value(value: Value) -> Result<Self> {
        decode("box office", value)
    }
}

impl MovieSearchResponse {
    pub fn from_value(value: Value) -> Result<Self> {
        decode("movie search", value)
    }
}

impl Report for BoxOfficeResponse {
    fn lines(&self) -> Result<Vec<String>> {
        let overall = &self.box_office_result;
        let list = &overall.daily_box_office_list;

        let mut lines = Vec::with_capacity(list.len() + 4);
        lines.push(SEPARATOR.to_string());
        lines.push(format!("Title : {}", overall.boxoffice_type));
        lines.push(format!("Date : {}", overall.show_range));
        for entry in list {
            lines.push(format!("{} {}", entry.rank, entry.movie_nm));
        }
        lines.push(SEPARATOR.to_string());
        Ok(lines)
    }
}

impl Report for MovieSearchResponse {
    fn lines(&self) -> Result<Vec<String>> {
        let channel = &self.channel;

        let mut lines = Vec::with_capacity(channel.item.len() * 2 + 5);
        lines.push(SEPARATOR.to_string());
        lines.push(format!("Title : {}", channel.title));
        lines.push(format!("result : {}", scalar_text(&channel.result)));
        lines.push(format!("query string : {}", channel.q));

        for (index, item) in channel.item.iter().enumerate() {
            let thumbnail = item.thumbnail.first().ok_or_else(|| AppError::ShapeMismatch {
                shape: "movie search",
                message: format!("item {} has no thumbnail", index),
            })?;
            let story = item.story.first().ok_or_else(|| AppError::ShapeMismatch {
                shape: "movie search",
                message: format!("item {} has no story", index),
            })?;
            lines.push(format!("Thumbnail : {}", thumbnail.content));
            lines.push(format!("Story : {}", story.content));
        }

        lines.push(SEPARATOR.to_string());
        Ok(lines)
    }
}

/// 先組好全部行再一次寫出，避免同時完成的兩份報表交錯
pub fn print_report<R: Report, W: Write>(report: &R, out: &mut W) -> Result<()> {
    let lines = report.lines()?;
    let mut text = lines.join("\n");
    text.push('\n');
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

pub fn render<R: Report>(report: &R) -> Result<String> {
    Ok(report.lines()?.join("\n"))
}
