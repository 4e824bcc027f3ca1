use crate::domain::model::{
    DeveloperSummary, Envelope, Location, PageResult, Profession, SearchEnvelope, Skill,
};
use crate::domain::ports::{AccountApi, ConfigProvider, ReferenceApi, SearchApi};
use crate::utils::error::{FinderError, Result};
use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::{form_urlencoded, Url};

pub const SEARCH_PATH: &str = "api/users/search";
pub const SKILLS_PATH: &str = "api/skills";
pub const PROFESSIONS_PATH: &str = "api/professions";
pub const LOCATIONS_PATH: &str = "api/locations";
pub const CSRF_COOKIE_PATH: &str = "sanctum/csrf-cookie";
pub const CURRENT_USER_PATH: &str = "api/user";

pub const XSRF_COOKIE: &str = "XSRF-TOKEN";
pub const XSRF_HEADER: &str = "X-XSRF-TOKEN";

/// 開發者社群後端的 REST 客戶端
///
/// 以 cookie 維持 session，`XSRF-TOKEN` cookie 會被解碼後放進 `X-XSRF-TOKEN` 標頭。
pub struct ApiClient {
    client: Client,
    base_url: Url,
    cookies: Arc<Jar>,
    timeout: Option<Duration>,
    csrf_token: Mutex<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        // 確保結尾有斜線，之後的相對路徑才會接在後面而不是取代最後一段
        let base_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
        let cookies = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(cookies.clone())
            .user_agent(concat!("dev-finder/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            cookies,
            timeout,
            csrf_token: Mutex::new(None),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(config.api_base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// 使用者頭像的公開網址
    pub fn profile_image_url(&self, user_id: u64) -> Result<Url> {
        self.endpoint(&format!("api/users/{}/profile-image", user_id))
    }

    fn stored_csrf_token(&self) -> Option<String> {
        self.csrf_token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(String, String)]) -> Result<T> {
        let url = self.endpoint(path)?;
        tracing::debug!("📡 GET {} {:?}", url, query);

        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = self.stored_csrf_token() {
            request = request.header(XSRF_HEADER, token);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = ensure_success(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    fn read_xsrf_cookie(&self) -> Option<String> {
        let header = self.cookies.cookies(&self.base_url)?;
        let cookies = header.to_str().ok()?;
        cookies
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == XSRF_COOKIE)
            .map(|(_, value)| decode_cookie_value(value))
    }
}

/// 與 `decodeURIComponent` 相同的百分比解碼
fn decode_cookie_value(raw: &str) -> String {
    form_urlencoded::parse(format!("v={}", raw.replace('+', "%2B")).as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

fn extract_message(body: &serde_json::Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| body.get(key).and_then(|value| value.as_str()))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .as_ref()
        .and_then(extract_message);
    tracing::debug!("HTTP {} from {:?}", status, message);

    Err(FinderError::HttpStatus {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl SearchApi for ApiClient {
    async fn search_users(&self, params: &[(String, String)]) -> Result<PageResult> {
        let envelope: SearchEnvelope = self.get_json(SEARCH_PATH, params).await?;
        Ok(PageResult::from(envelope))
    }
}

#[async_trait]
impl ReferenceApi for ApiClient {
    async fn skills(&self) -> Result<Vec<Skill>> {
        let envelope: Envelope<Vec<Skill>> = self.get_json(SKILLS_PATH, &[]).await?;
        Ok(envelope.into_inner())
    }

    async fn professions(&self) -> Result<Vec<Profession>> {
        let envelope: Envelope<Vec<Profession>> = self.get_json(PROFESSIONS_PATH, &[]).await?;
        Ok(envelope.into_inner())
    }

    async fn locations(&self) -> Result<Vec<Location>> {
        let envelope: Envelope<Vec<Location>> = self.get_json(LOCATIONS_PATH, &[]).await?;
        Ok(envelope.into_inner())
    }
}

#[async_trait]
impl AccountApi for ApiClient {
    async fn csrf_token(&self) -> Result<Option<String>> {
        let url = self.endpoint(CSRF_COOKIE_PATH)?;
        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        ensure_success(request.send().await?).await?;

        let token = self.read_xsrf_cookie();
        if token.is_none() {
            tracing::warn!("⚠️ {} cookie missing after CSRF exchange", XSRF_COOKIE);
        }
        *self
            .csrf_token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = token.clone();
        Ok(token)
    }

    async fn current_user(&self) -> Result<DeveloperSummary> {
        let envelope: Envelope<DeveloperSummary> = self.get_json(CURRENT_USER_PATH, &[]).await?;
        Ok(envelope.into_inner())
    }
}
