use crate::domain::ports::JsonFetcher;
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use url::form_urlencoded;

/// 以查詢參數傳遞的固定 API 金鑰
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub param: String,
    pub value: String,
}

/// 一個 Fetcher 只對應一台主機
#[derive(Debug, Clone, PartialEq)]
pub struct FetcherConfig {
    pub scheme: String,
    pub host: String,
    pub credential: Option<Credential>,
    pub default_params: BTreeMap<String, String>,
}

impl FetcherConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            scheme: "https".to_string(),
            host: host.into(),
            credential: None,
            default_params: BTreeMap::new(),
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_credential(mut self, param: impl Into<String>, value: impl Into<String>) -> Self {
        self.credential = Some(Credential {
            param: param.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_default_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_params.insert(key.into(), value.into());
        self
    }
}

/// 送出前的請求內容，不做任何 I/O
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    /// path 加上 query string
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// 逐塊累積回應內容，結束後再整體解析成 JSON
#[derive(Debug, Default)]
pub struct BodyAccumulator {
    buffer: Vec<u8>,
    chunks: usize,
}

impl BodyAccumulator {
    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
        self.chunks += 1;
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn finish(self) -> Result<Value> {
        Ok(serde_json::from_slice(&self.buffer)?)
    }
}

/// 解析後的回應與讀取時的統計
#[derive(Debug, Clone)]
pub struct FetchedBody {
    pub value: Value,
    pub bytes: usize,
    pub chunks: usize,
}

pub struct Fetcher {
    config: FetcherConfig,
    client: Client,
}

impl Fetcher {
    pub fn new(config: FetcherConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: FetcherConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// 金鑰與預設參數一律放在 query string；
    /// GET 的資料也接在 query string，其餘方法把資料序列化成 JSON body
    pub fn prepare(
        &self,
        endpoint: &str,
        method: Method,
        data: &Map<String, Value>,
    ) -> PreparedRequest {
        let mut query = form_urlencoded::Serializer::new(String::new());
        let mut has_params = false;

        if let Some(credential) = &self.config.credential {
            query.append_pair(&credential.param, &credential.value);
            has_params = true;
        }
        for (key, value) in &self.config.default_params {
            query.append_pair(key, value);
            has_params = true;
        }

        let mut headers = HeaderMap::new();
        let mut body = None;

        if method == Method::GET {
            for (key, value) in data {
                has_params |= append_query_value(&mut query, key, value);
            }
        } else {
            let serialized = Value::Object(data.clone()).to_string().into_bytes();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers.insert(CONTENT_LENGTH, HeaderValue::from(serialized.len()));
            body = Some(serialized);
        }

        let query = encode_spaces(query.finish());
        let path = if !has_params {
            endpoint.to_string()
        } else if endpoint.contains('?') {
            format!("{}&{}", endpoint, query)
        } else {
            format!("{}?{}", endpoint, query)
        };

        PreparedRequest {
            method,
            path,
            headers,
            body,
        }
    }

    pub fn url_for(&self, prepared: &PreparedRequest) -> String {
        format!("{}://{}{}", self.config.scheme, self.config.host, prepared.path)
    }

    /// 日誌用的 path，金鑰值以 `***` 取代
    pub fn redacted_path(&self, prepared: &PreparedRequest) -> String {
        let Some(credential) = &self.config.credential else {
            return prepared.path.clone();
        };

        let encoded = encode_spaces(
            form_urlencoded::Serializer::new(String::new())
                .append_pair(&credential.param, &credential.value)
                .finish(),
        );
        let masked = encode_spaces(
            form_urlencoded::Serializer::new(String::new())
                .append_pair(&credential.param, "***")
                .finish(),
        );
        prepared.path.replacen(&encoded, &masked, 1)
    }

    /// 送出請求並等待完整回應；非 2xx 與 JSON 解析失敗都回傳錯誤
    pub async fn perform(&self, prepared: PreparedRequest) -> Result<Value> {
        Ok(self.perform_counted(prepared).await?.value)
    }

    pub async fn perform_counted(&self, prepared: PreparedRequest) -> Result<FetchedBody> {
        let url = self.url_for(&prepared);
        let PreparedRequest {
            method,
            headers,
            body,
            ..
        } = prepared;

        let mut request = self.client.request(method, &url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let mut response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let mut body = BodyAccumulator::default();
        while let Some(chunk) = response.chunk().await? {
            body.push(&chunk);
        }

        let (bytes, chunks) = (body.len(), body.chunks());
        tracing::debug!("* OK End ({} bytes in {} chunks)", bytes, chunks);

        Ok(FetchedBody {
            value: body.finish()?,
            bytes,
            chunks,
        })
    }
}

#[async_trait]
impl JsonFetcher for Fetcher {
    async fn fetch(
        &self,
        endpoint: &str,
        method: Method,
        data: &Map<String, Value>,
    ) -> Result<Value> {
        let prepared = self.prepare(endpoint, method, data);
        tracing::info!("REQ : {}{}", self.config.host, self.redacted_path(&prepared));
        self.perform(prepared).await
    }
}

// 空白一律編成 %20；字面上的 '+' 已被編成 %2B，不會誤換
fn encode_spaces(query: String) -> String {
    query.replace('+', "%20")
}

// 字串原樣輸出，數字與布林用 JSON 文字，陣列重複 key，null 與物件給空值
fn append_query_value(
    query: &mut form_urlencoded::Serializer<'_, String>,
    key: &str,
    value: &Value,
) -> bool {
    match value {
        Value::Array(items) => {
            for item in items {
                query.append_pair(key, &scalar_text(item));
            }
            !items.is_empty()
        }
        other => {
            query.append_pair(key, &scalar_text(other));
            true
        }
    }
}

pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_get_appends_query_and_sends_no_body() {
        let fetcher = Fetcher::new(FetcherConfig::new("www.kobis.or.kr"));
        let prepared = fetcher.prepare(
            "/boxoffice.json",
            Method::GET,
            &data(json!({"key": "abc", "targetDt": "20230101"})),
        );

        assert_eq!(prepared.path, "/boxoffice.json?key=abc&targetDt=20230101");
        assert!(prepared.body.is_none());
        assert!(prepared.headers.get(CONTENT_LENGTH).is_none());
        assert_eq!(
            fetcher.url_for(&prepared),
            "https://www.kobis.or.kr/boxoffice.json?key=abc&targetDt=20230101"
        );
    }

    #[test]
    fn test_non_get_serializes_json_body_with_length() {
        let fetcher = Fetcher::new(FetcherConfig::new("example.com"));
        let prepared = fetcher.prepare("/movies", Method::POST, &data(json!({"a": 1})));

        assert_eq!(prepared.path, "/movies");
        assert_eq!(prepared.body.as_deref(), Some(br#"{"a":1}"#.as_slice()));
        assert_eq!(prepared.headers.get(CONTENT_LENGTH).unwrap(), "7");
        assert_eq!(prepared.headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_content_length_counts_bytes_not_chars() {
        let fetcher = Fetcher::new(FetcherConfig::new("example.com"));
        let prepared = fetcher.prepare("/movies", Method::PUT, &data(json!({"q": "부산행"})));

        let body = prepared.body.unwrap();
        assert_eq!(body.len(), r#"{"q":"부산행"}"#.len());
        assert_eq!(
            prepared.headers.get(CONTENT_LENGTH).unwrap(),
            body.len().to_string().as_str()
        );
    }

    #[test]
    fn test_credential_and_defaults_precede_request_data() {
        let config = FetcherConfig::new("apis.daum.net")
            .with_credential("apiKey", "secret")
            .with_default_param("output", "json");
        let fetcher = Fetcher::new(config);

        let prepared = fetcher.prepare("/contents/movie", Method::GET, &data(json!({"q": "train"})));
        assert_eq!(prepared.path, "/contents/movie?apiKey=secret&output=json&q=train");

        // 非 GET 時金鑰仍在 query string
        let prepared = fetcher.prepare("/contents/movie", Method::POST, &data(json!({"q": "train"})));
        assert_eq!(prepared.path, "/contents/movie?apiKey=secret&output=json");
        assert_eq!(prepared.body.as_deref(), Some(br#"{"q":"train"}"#.as_slice()));
    }

    #[test]
    fn test_query_value_rendering() {
        let fetcher = Fetcher::new(FetcherConfig::new("example.com"));

        let prepared = fetcher.prepare(
            "/search?page=2",
            Method::GET,
            &data(json!({"n": 5, "none": null, "q": "a b&c", "tags": ["a", "b"]})),
        );
        assert_eq!(prepared.path, "/search?page=2&n=5&none=&q=a%20b%26c&tags=a&tags=b");

        let prepared = fetcher.prepare("/search", Method::GET, &Map::new());
        assert_eq!(prepared.path, "/search");
    }

    #[test]
    fn test_query_keeps_caller_order() {
        let fetcher = Fetcher::new(FetcherConfig::new("example.com"));
        let prepared = fetcher.prepare(
            "/x",
            Method::GET,
            &data(json!({"targetDt": "1", "key": "abc", "q": "a b+c"})),
        );

        assert_eq!(prepared.path, "/x?targetDt=1&key=abc&q=a%20b%2Bc");
    }

    #[test]
    fn test_redacted_path_hides_credential() {
        let fetcher = Fetcher::new(
            FetcherConfig::new("www.kobis.or.kr").with_credential("key", "top secret"),
        );
        let prepared = fetcher.prepare(
            "/boxoffice.json",
            Method::GET,
            &data(json!({"targetDt": "20230101"})),
        );

        assert_eq!(prepared.path, "/boxoffice.json?key=top%20secret&targetDt=20230101");
        assert_eq!(
            fetcher.redacted_path(&prepared),
            "/boxoffice.json?key=***&targetDt=20230101"
        );

        let plain = Fetcher::new(FetcherConfig::new("example.com"));
        let prepared = plain.prepare("/x", Method::GET, &data(json!({"q": "a"})));
        assert_eq!(plain.redacted_path(&prepared), "/x?q=a");
    }

    #[test]
    fn test_accumulator_reassembles_chunks() {
        let mut body = BodyAccumulator::default();
        body.push(b"{\"a\":");
        body.push(b"1}");

        assert_eq!(body.chunks(), 2);
        assert_eq!(body.finish().unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_accumulator_handles_split_multibyte_characters() {
        let text = r#"{"movieNm":"부산행"}"#.as_bytes();
        let mut body = BodyAccumulator::default();
        // 從韓文字元中間切開
        body.push(&text[..14]);
        body.push(&text[14..]);

        assert_eq!(body.finish().unwrap(), json!({"movieNm": "부산행"}));
    }

    #[test]
    fn test_accumulator_rejects_malformed_json() {
        let mut body = BodyAccumulator::default();
        body.push(b"not json");

        assert!(matches!(body.finish(), Err(AppError::Decode(_))));
        assert!(matches!(BodyAccumulator::default().finish(), Err(AppError::Decode(_))));
    }
}
