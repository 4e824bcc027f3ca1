use crate::domain::model::{PageResult, PageSize};
use std::collections::BTreeSet;
use url::form_urlencoded;

pub const KEY_SEARCH: &str = "search";
pub const KEY_SKILLS: &str = "skills[]";
pub const KEY_PROFESSION: &str = "profession";
pub const KEY_LOCATION: &str = "location";
pub const KEY_CITY: &str = "city";
pub const KEY_COUNTRY: &str = "country";
pub const KEY_PAGE: &str = "page";
pub const KEY_PER_PAGE: &str = "per_page";

/// 搜尋條件與目前分頁游標，唯一的真實來源
///
/// 文字欄位一律以去除前後空白後的形式保存，空字串等同未設定。
/// 除了 [`FilterState::go_to_page`] 之外，任何條件變更都會把頁碼重設為 1，
/// 因為舊結果的總頁數已經不再適用。
#[derive(Debug, Clone)]
pub struct FilterState {
    free_text: String,
    skill_ids: BTreeSet<String>,
    profession_id: Option<String>,
    location_id: Option<String>,
    city: Option<String>,
    country: Option<String>,
    page: u32,
    page_size: PageSize,
    // 最近一次成功搜尋得到的 last_page，0 表示尚未知道
    last_known_last_page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            free_text: String::new(),
            skill_ids: BTreeSet::new(),
            profession_id: None,
            location_id: None,
            city: None,
            country: None,
            page: 1,
            page_size: PageSize::DEFAULT,
            last_known_last_page: 0,
        }
    }
}

// 頁數上限只是簿記，不屬於搜尋條件本身
impl PartialEq for FilterState {
    fn eq(&self, other: &Self) -> bool {
        self.free_text == other.free_text
            && self.skill_ids == other.skill_ids
            && self.profession_id == other.profession_id
            && self.location_id == other.location_id
            && self.city == other.city
            && self.country == other.country
            && self.page == other.page
            && self.page_size == other.page_size
    }
}

impl Eq for FilterState {}

fn normalize_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 從網址查詢字串建立狀態，未知的 key 會被忽略，
    /// 格式錯誤的 `page` / `per_page` 會退回預設值
    pub fn from_query(query: &str) -> Self {
        let mut state = Self::default();
        state.initialize_from_query(query);
        state
    }

    pub fn initialize_from_query(&mut self, query: &str) {
        let query = query.trim().trim_start_matches('?');
        *self = Self::default();

        let mut seen_search = false;
        let mut seen_profession = false;
        let mut seen_location = false;
        let mut seen_city = false;
        let mut seen_country = false;
        let mut seen_page = false;
        let mut seen_per_page = false;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                KEY_SEARCH if !seen_search => {
                    seen_search = true;
                    self.free_text = normalize_text(&value).unwrap_or_default();
                }
                KEY_SKILLS => {
                    if let Some(id) = normalize_text(&value) {
                        self.skill_ids.insert(id);
                    }
                }
                KEY_PROFESSION if !seen_profession => {
                    seen_profession = true;
                    self.profession_id = normalize_text(&value);
                }
                KEY_LOCATION if !seen_location => {
                    seen_location = true;
                    self.location_id = normalize_text(&value);
                }
                KEY_CITY if !seen_city => {
                    seen_city = true;
                    self.city = normalize_text(&value);
                }
                KEY_COUNTRY if !seen_country => {
                    seen_country = true;
                    self.country = normalize_text(&value);
                }
                KEY_PAGE if !seen_page => {
                    seen_page = true;
                    self.page = value
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .filter(|page| *page >= 1)
                        .unwrap_or(1);
                }
                KEY_PER_PAGE if !seen_per_page => {
                    seen_per_page = true;
                    self.page_size = value
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .and_then(PageSize::new)
                        .unwrap_or_default();
                }
                _ => {}
            }
        }
    }

    pub fn free_text(&self) -> &str {
        &self.free_text
    }

    pub fn skill_ids(&self) -> &BTreeSet<String> {
        &self.skill_ids
    }

    pub fn profession_id(&self) -> Option<&str> {
        self.profession_id.as_deref()
    }

    pub fn location_id(&self) -> Option<&str> {
        self.location_id.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn last_known_last_page(&self) -> u32 {
        self.last_known_last_page
    }

    pub fn has_filters(&self) -> bool {
        !self.free_text.is_empty()
            || !self.skill_ids.is_empty()
            || self.profession_id.is_some()
            || self.location_id.is_some()
            || self.city.is_some()
            || self.country.is_some()
    }

    pub fn set_free_text(&mut self, text: &str) {
        self.free_text = normalize_text(text).unwrap_or_default();
        self.page = 1;
    }

    pub fn set_profession(&mut self, id: Option<&str>) {
        self.profession_id = id.and_then(normalize_text);
        self.page = 1;
    }

    pub fn set_location(&mut self, id: Option<&str>) {
        self.location_id = id.and_then(normalize_text);
        self.page = 1;
    }

    pub fn set_city(&mut self, text: Option<&str>) {
        self.city = text.and_then(normalize_text);
        self.page = 1;
    }

    pub fn set_country(&mut self, text: Option<&str>) {
        self.country = text.and_then(normalize_text);
        self.page = 1;
    }

    /// 已選則移除、未選則加入；回傳切換後是否為選取狀態
    pub fn toggle_skill(&mut self, id: &str) -> bool {
        let Some(id) = normalize_text(id) else {
            return self.skill_ids.contains(id);
        };
        self.page = 1;
        if self.skill_ids.remove(&id) {
            false
        } else {
            self.skill_ids.insert(id);
            true
        }
    }

    /// 只接受 `1..=last_known_last_page` 範圍內的頁碼，否則完全不變
    pub fn go_to_page(&mut self, page: u32) -> bool {
        if page < 1 || page > self.last_known_last_page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 1;
    }

    pub fn clear(&mut self) {
        let last_known_last_page = self.last_known_last_page;
        *self = Self::default();
        self.last_known_last_page = last_known_last_page;
    }

    /// 以成功的搜尋結果更新頁數上限，並把頁碼夾回合法範圍
    pub fn record_result(&mut self, result: &PageResult) {
        self.last_known_last_page = result.last_page.max(1);
        self.page = self.page.clamp(1, self.last_known_last_page);
    }

    fn criteria_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.free_text.is_empty() {
            pairs.push((KEY_SEARCH, self.free_text.clone()));
        }
        for id in &self.skill_ids {
            pairs.push((KEY_SKILLS, id.clone()));
        }
        let optional = [
            (KEY_PROFESSION, &self.profession_id),
            (KEY_LOCATION, &self.location_id),
            (KEY_CITY, &self.city),
            (KEY_COUNTRY, &self.country),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                pairs.push((key, value.clone()));
            }
        }
        pairs
    }

    /// 標準化查詢字串，只包含非預設值的欄位
    pub fn to_query_string(&self) -> String {
        let mut pairs = self.criteria_pairs();
        if self.page != 1 {
            pairs.push((KEY_PAGE, self.page.to_string()));
        }
        if self.page_size != PageSize::DEFAULT {
            pairs.push((KEY_PER_PAGE, self.page_size.to_string()));
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// 送往搜尋端點的參數：篩選條件加上一定存在的 `page` 與 `per_page`
    pub fn request_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .criteria_pairs()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        params.push((KEY_PAGE.to_string(), self.page.to_string()));
        params.push((KEY_PER_PAGE.to_string(), self.page_size.to_string()));
        params
    }
}
