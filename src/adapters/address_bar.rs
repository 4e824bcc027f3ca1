use crate::domain::ports::AddressBar;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Location {
    current: String,
    history: Vec<String>,
}

/// 記憶體內的網址列：保存目前查詢字串與瀏覽歷史
#[derive(Debug, Default)]
pub struct MemoryAddressBar {
    location: Mutex<Location>,
}

impl MemoryAddressBar {
    pub fn new(initial_query: &str) -> Self {
        let initial = initial_query.trim().trim_start_matches('?').to_string();
        Self {
            location: Mutex::new(Location {
                current: initial.clone(),
                history: vec![initial],
            }),
        }
    }

    fn location(&self) -> MutexGuard<'_, Location> {
        self.location
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn history(&self) -> Vec<String> {
        self.location().history.clone()
    }

    /// 可分享的完整連結，例如 `/search?search=Ada`
    pub fn shareable_path(&self, path: &str) -> String {
        let query = self.current_query();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, query)
        }
    }
}

impl AddressBar for MemoryAddressBar {
    fn current_query(&self) -> String {
        self.location().current.clone()
    }

    fn replace_query(&self, query: &str) {
        let mut location = self.location();
        location.current = query.to_string();
        if let Some(last) = location.history.last_mut() {
            *last = query.to_string();
        } else {
            location.history.push(query.to_string());
        }
    }

    fn push_query(&self, query: &str) {
        let mut location = self.location();
        location.current = query.to_string();
        location.history.push(query.to_string());
    }
}
