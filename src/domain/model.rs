use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 每頁筆數，只允許 10 / 15 / 25 / 50
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PageSize(u32);

impl PageSize {
    pub const ALLOWED: [u32; 4] = [10, 15, 25, 50];
    pub const DEFAULT: PageSize = PageSize(15);

    pub fn new(value: u32) -> Option<Self> {
        Self::ALLOWED.contains(&value).then_some(PageSize(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeveloperStatus {
    #[serde(rename = "available")]
    Available,
    #[serde(rename = "open to work")]
    OpenToWork,
    #[serde(rename = "not available")]
    NotAvailable,
    #[serde(other)]
    Unknown,
}

impl DeveloperStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DeveloperStatus::Available => "available",
            DeveloperStatus::OpenToWork => "open to work",
            DeveloperStatus::NotAvailable => "not available",
            DeveloperStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionRef {
    pub profession: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRef {
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRef {
    pub skill: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfoSummary {
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub status: Option<DeveloperStatus>,
    #[serde(default)]
    pub profession: Option<ProfessionRef>,
    #[serde(default)]
    pub location: Option<LocationRef>,
    #[serde(default)]
    pub skills: Vec<SkillRef>,
}

/// 搜尋結果卡片所需的使用者摘要，由後端擁有，這裡只讀
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeveloperSummary {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub user_info: Option<UserInfoSummary>,
}

impl DeveloperSummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn tagline(&self) -> Option<&str> {
        self.user_info.as_ref()?.tagline.as_deref()
    }

    pub fn status(&self) -> Option<&DeveloperStatus> {
        self.user_info.as_ref()?.status.as_ref()
    }

    pub fn profession_label(&self) -> Option<&str> {
        self.user_info
            .as_ref()?
            .profession
            .as_ref()
            .map(|p| p.profession.as_str())
    }

    pub fn location_label(&self) -> Option<String> {
        self.user_info
            .as_ref()?
            .location
            .as_ref()
            .map(|l| format!("{}, {}", l.city, l.country))
    }

    pub fn skill_labels(&self, limit: usize) -> Vec<&str> {
        self.user_info
            .as_ref()
            .map(|info| {
                info.skills
                    .iter()
                    .take(limit)
                    .map(|s| s.skill.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: u64,
    pub skill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profession {
    pub id: u64,
    pub profession: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    pub city: String,
    pub country: String,
}

impl Location {
    pub fn label(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

/// 參考資料端點可能回傳裸陣列，也可能包在 `{data: [...]}` 裡
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(data) => data,
        }
    }
}

/// 技能、職業、地點三張查詢表，整個 session 期間視為不變
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LookupTables {
    pub skills: Vec<Skill>,
    pub professions: Vec<Profession>,
    pub locations: Vec<Location>,
}

impl LookupTables {
    pub fn skill_label(&self, id: &str) -> Option<&str> {
        self.skills
            .iter()
            .find(|s| s.id.to_string() == id)
            .map(|s| s.skill.as_str())
    }

    pub fn profession_label(&self, id: &str) -> Option<&str> {
        self.professions
            .iter()
            .find(|p| p.id.to_string() == id)
            .map(|p| p.profession.as_str())
    }

    pub fn location_label(&self, id: &str) -> Option<String> {
        self.locations
            .iter()
            .find(|l| l.id.to_string() == id)
            .map(Location::label)
    }
}

/// `GET /api/users/search` 的原始回應
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchEnvelope {
    #[serde(default)]
    pub data: Vec<DeveloperSummary>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub last_page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// 一頁搜尋結果加上分頁資訊
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    pub items: Vec<DeveloperSummary>,
    pub current_page: u32,
    pub last_page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl PageResult {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            last_page: 1,
            page_size: PageSize::DEFAULT.get(),
            total: 0,
        }
    }

    /// 請求的頁碼超過最後一頁，後端回傳的是空頁
    pub fn is_past_end(&self) -> bool {
        self.current_page > self.last_page
    }

    /// 「顯示第 X 到 Y 筆，共 Z 筆」的 1-based 範圍
    pub fn showing_range(&self) -> Option<(u64, u64)> {
        if self.items.is_empty() || self.total == 0 {
            return None;
        }
        let page_size = u64::from(self.page_size.max(1));
        let first = u64::from(self.current_page.saturating_sub(1)) * page_size + 1;
        let last = (u64::from(self.current_page) * page_size).min(self.total);
        Some((first, last.max(first)))
    }
}

impl From<SearchEnvelope> for PageResult {
    fn from(envelope: SearchEnvelope) -> Self {
        let last_page = envelope.last_page.unwrap_or(1).max(1);
        // 不夾回 last_page：超出範圍的頁碼要讓呼叫端知道這頁其實沒有被取回
        let current_page = envelope.current_page.unwrap_or(1).max(1);
        let page_size = envelope
            .per_page
            .filter(|size| *size > 0)
            .unwrap_or(PageSize::DEFAULT.get());
        let total = envelope
            .total
            .unwrap_or(0)
            .max(envelope.data.len() as u64);

        Self {
            items: envelope.data,
            current_page,
            last_page,
            page_size,
            total,
        }
    }
}
