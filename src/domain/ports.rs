use crate::domain::model::{DeveloperSummary, Location, PageResult, Profession, Skill};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 搜尋端點：`GET /api/users/search`
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search_users(&self, params: &[(String, String)]) -> Result<PageResult>;
}

/// 技能、職業、地點等參考資料
#[async_trait]
pub trait ReferenceApi: Send + Sync {
    async fn skills(&self) -> Result<Vec<Skill>>;
    async fn professions(&self) -> Result<Vec<Profession>>;
    async fn locations(&self) -> Result<Vec<Location>>;
}

/// 外部認證服務，只用來判斷 session 是否就緒
#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn csrf_token(&self) -> Result<Option<String>>;
    async fn current_user(&self) -> Result<DeveloperSummary>;
}

/// 網址列：同時是初始狀態的來源與目前篩選條件的輸出
pub trait AddressBar: Send + Sync {
    fn current_query(&self) -> String;
    /// 取代目前的查詢字串，不新增瀏覽歷史
    fn replace_query(&self, query: &str);
    fn push_query(&self, query: &str);
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
    fn debounce(&self) -> Duration;
    fn skill_label_limit(&self) -> usize;
}
