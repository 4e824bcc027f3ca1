use crate::core::filter_state::FilterState;
use crate::domain::model::PageResult;
use crate::domain::ports::{AddressBar, SearchApi};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// 執行器對外呈現的狀態：閒置 / 載入中 / 錯誤，以及最近一次套用的結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub result: Option<PageResult>,
    pub loading: bool,
    pub error: Option<String>,
    /// 最近一次被套用的請求序號
    pub applied_ticket: u64,
    in_flight: usize,
}

impl SearchState {
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Applied(PageResult),
    Failed(String),
    /// 已有較新的請求發出，這個回應被丟棄
    Stale { ticket: u64, latest: u64 },
}

impl SearchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SearchOutcome::Applied(_))
    }
}

/// 對搜尋端點發出請求並正規化分頁回應
///
/// 每次 `execute` 取得一個遞增序號；回應抵達時只有序號仍是最新發出的才會被套用，
/// 因此較慢的舊回應不會覆蓋較新的結果。
pub struct SearchExecutor<A: SearchApi, B: AddressBar> {
    api: Arc<A>,
    address_bar: Arc<B>,
    state: Mutex<SearchState>,
    issued: AtomicU64,
}

// 離開作用域時一定會減少 in-flight 計數，即使 future 被取消
struct LoadingGuard<'a> {
    state: &'a Mutex<SearchState>,
}

impl<'a> LoadingGuard<'a> {
    fn begin(state: &'a Mutex<SearchState>) -> Self {
        let mut guard = lock(state);
        guard.in_flight += 1;
        guard.loading = true;
        guard.error = None;
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut guard = lock(self.state);
        guard.in_flight = guard.in_flight.saturating_sub(1);
        guard.loading = guard.in_flight > 0;
    }
}

fn lock(state: &Mutex<SearchState>) -> MutexGuard<'_, SearchState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<A: SearchApi, B: AddressBar> SearchExecutor<A, B> {
    pub fn new(api: Arc<A>, address_bar: Arc<B>) -> Self {
        Self {
            api,
            address_bar,
            state: Mutex::new(SearchState::default()),
            issued: AtomicU64::new(0),
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn address_bar(&self) -> &Arc<B> {
        &self.address_bar
    }

    pub fn state(&self) -> SearchState {
        lock(&self.state).clone()
    }

    pub fn latest_ticket(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn dismiss_error(&self) {
        lock(&self.state).error = None;
    }

    pub async fn execute(&self, filter: &FilterState) -> SearchOutcome {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let params = filter.request_params();
        let _loading = LoadingGuard::begin(&self.state);

        tracing::debug!("🔎 search #{} issued with {:?}", ticket, params);
        let response = self.api.search_users(&params).await;

        let latest = self.latest_ticket();
        if ticket != latest {
            tracing::debug!(
                "🗑️ search #{} discarded, #{} is newer ({})",
                ticket,
                latest,
                if response.is_ok() { "success" } else { "failure" }
            );
            return SearchOutcome::Stale { ticket, latest };
        }

        match response {
            Ok(result) => {
                {
                    let mut state = lock(&self.state);
                    state.result = Some(result.clone());
                    state.error = None;
                    state.applied_ticket = ticket;
                }
                if result.is_past_end() {
                    // 這一頁沒有被取回，不要把夾回後的頁碼寫進網址
                    tracing::debug!(
                        "search #{}: page {} is past the last page {}",
                        ticket,
                        result.current_page,
                        result.last_page
                    );
                } else {
                    let mut synced = filter.clone();
                    synced.record_result(&result);
                    self.address_bar.replace_query(&synced.to_query_string());
                }

                tracing::info!(
                    "✅ search #{}: {} of {} developers (page {}/{})",
                    ticket,
                    result.items.len(),
                    result.total,
                    result.current_page,
                    result.last_page
                );
                SearchOutcome::Applied(result)
            }
            Err(e) => {
                let message = e.search_message();
                tracing::warn!("❌ search #{} failed: {} ({})", ticket, message, e);
                // 保留上一次的結果，只設定錯誤訊息
                lock(&self.state).error = Some(message.clone());
                SearchOutcome::Failed(message)
            }
        }
    }
}
