use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// KOBIS 每日票房回應
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxOfficeResponse {
    #[serde(rename = "boxOfficeResult")]
    pub box_office_result: BoxOfficeResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxOfficeResult {
    #[serde(rename = "boxofficeType")]
    pub boxoffice_type: String,
    #[serde(rename = "showRange")]
    pub show_range: String,
    #[serde(rename = "dailyBoxOfficeList")]
    pub daily_box_office_list: Vec<DailyBoxOfficeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBoxOfficeEntry {
    pub rank: String,
    #[serde(rename = "movieNm")]
    pub movie_nm: String,
}

/// Daum 電影搜尋回應
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSearchResponse {
    pub channel: MovieSearchChannel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSearchChannel {
    pub title: String,
    /// 結果筆數，API 有時給數字有時給字串
    pub result: Value,
    pub q: String,
    pub item: Vec<MovieSearchItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSearchItem {
    pub thumbnail: Vec<ContentField>,
    pub story: Vec<ContentField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentField {
    pub content: String,
}

/// 文件資料庫中的電影紀錄：`_id` 以外的欄位不限定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Movie {
    pub fn new(id: String, mut fields: Map<String, Value>) -> Self {
        fields.remove("_id");
        Self { id, fields }
    }

    /// 深層合併：物件逐欄、陣列逐個位置遞迴合併，其餘值直接覆蓋
    pub fn merge(&mut self, updates: Map<String, Value>) {
        for (key, value) in updates {
            if key == "_id" {
                continue;
            }
            match self.fields.get_mut(&key) {
                Some(existing) => merge_value(existing, value),
                None => {
                    self.fields.insert(key, value);
                }
            }
        }
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::with_capacity(self.fields.len() + 1);
        object.insert("_id".to_string(), Value::String(self.id.clone()));
        for (key, value) in &self.fields {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }
}

fn merge_value(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(target), Value::Array(source)) => {
            for (index, value) in source.into_iter().enumerate() {
                match target.get_mut(index) {
                    Some(existing) => merge_value(existing, value),
                    None => target.push(value),
                }
            }
        }
        (target, source) => *target = source,
    }
}
