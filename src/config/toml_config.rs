use crate::core::fetcher::{Credential, FetcherConfig};
use crate::utils::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const KOBIS_HOST: &str = "www.kobis.or.kr";
pub const KOBIS_DAILY_PATH: &str =
    "/kobisopenapi/webservice/rest/boxoffice/searchDailyBoxOfficeList.json";
pub const DAUM_HOST: &str = "apis.daum.net";
pub const DAUM_MOVIE_PATH: &str = "/contents/movie";
pub const DEFAULT_SEARCH_QUERY: &str = "부산행";

/// 設定檔：每個區段的欄位都可省略，省略時使用公開 API 的預設值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub box_office: Option<ApiSection>,
    pub movie_search: Option<ApiSection>,
    pub search: Option<SearchSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub path: Option<String>,
    pub credential_param: Option<String>,
    pub credential: Option<String>,
    pub default_params: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchSection {
    pub default_query: Option<String>,
}

/// 一個 API 端點的完整設定
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub fetcher: FetcherConfig,
    pub path: String,
}

struct ApiDefaults {
    host: &'static str,
    path: &'static str,
    credential_param: &'static str,
    default_params: &'static [(&'static str, &'static str)],
}

const BOX_OFFICE_DEFAULTS: ApiDefaults = ApiDefaults {
    host: KOBIS_HOST,
    path: KOBIS_DAILY_PATH,
    credential_param: "key",
    default_params: &[],
};

const MOVIE_SEARCH_DEFAULTS: ApiDefaults = ApiDefaults {
    host: DAUM_HOST,
    path: DAUM_MOVIE_PATH,
    credential_param: "apiKey",
    default_params: &[("output", "json")],
};

impl ApiSection {
    fn resolve(&self, defaults: &ApiDefaults) -> EndpointConfig {
        let credential = self.credential.as_ref().map(|value| Credential {
            param: self
                .credential_param
                .clone()
                .unwrap_or_else(|| defaults.credential_param.to_string()),
            value: value.clone(),
        });

        let default_params = self.default_params.clone().unwrap_or_else(|| {
            defaults
                .default_params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        });

        EndpointConfig {
            fetcher: FetcherConfig {
                scheme: self.scheme.clone().unwrap_or_else(|| "https".to_string()),
                host: self.host.clone().unwrap_or_else(|| defaults.host.to_string()),
                credential,
                default_params,
            },
            path: self.path.clone().unwrap_or_else(|| defaults.path.to_string()),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${KOBIS_API_KEY})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn box_office(&self) -> EndpointConfig {
        self.box_office
            .clone()
            .unwrap_or_default()
            .resolve(&BOX_OFFICE_DEFAULTS)
    }

    pub fn movie_search(&self) -> EndpointConfig {
        self.movie_search
            .clone()
            .unwrap_or_default()
            .resolve(&MOVIE_SEARCH_DEFAULTS)
    }

    pub fn default_query(&self) -> String {
        self.search
            .as_ref()
            .and_then(|s| s.default_query.clone())
            .unwrap_or_else(|| DEFAULT_SEARCH_QUERY.to_string())
    }
}
