use crate::core::debounce::Debouncer;
use crate::core::executor::{SearchExecutor, SearchOutcome, SearchState};
use crate::core::filter_state::FilterState;
use crate::core::pagination::PaginationControls;
use crate::domain::model::{LookupTables, PageSize};
use crate::domain::ports::{AddressBar, ReferenceApi, SearchApi};
use crate::utils::error::Result;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// 搜尋頁面的協調者：篩選狀態、查詢表、執行器與網址列
///
/// 所有方法都只需要 `&self`，多個搜尋可以同時在途；
/// 哪個結果被採用由執行器的請求序號決定。
pub struct SearchSession<A, B>
where
    A: SearchApi + ReferenceApi,
    B: AddressBar,
{
    filter: Mutex<FilterState>,
    lookups: Mutex<LookupTables>,
    executor: SearchExecutor<A, B>,
    debouncer: Debouncer,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<A, B> SearchSession<A, B>
where
    A: SearchApi + ReferenceApi,
    B: AddressBar,
{
    /// 以網址列目前的查詢字串初始化篩選狀態
    pub fn new(api: Arc<A>, address_bar: Arc<B>) -> Self {
        Self::with_debounce(api, address_bar, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(api: Arc<A>, address_bar: Arc<B>, debounce: Duration) -> Self {
        let filter = FilterState::from_query(&address_bar.current_query());
        Self {
            filter: Mutex::new(filter),
            lookups: Mutex::new(LookupTables::default()),
            executor: SearchExecutor::new(api, address_bar),
            debouncer: Debouncer::new(debounce),
        }
    }

    /// 同時載入三張查詢表，成功後執行第一次搜尋；
    /// 查詢表載入失敗時不發出搜尋
    pub async fn bootstrap(&self) -> Result<SearchOutcome> {
        self.load_lookups().await?;
        Ok(self.search().await)
    }

    pub async fn load_lookups(&self) -> Result<LookupTables> {
        let api = self.executor.api();
        let loaded = tokio::try_join!(api.skills(), api.professions(), api.locations());

        let (skills, professions, locations) = match loaded {
            Ok(tables) => tables,
            Err(e) => {
                tracing::error!("❌ Failed to load filter options: {}", e);
                return Err(e);
            }
        };
        tracing::debug!(
            "📚 Loaded {} skills, {} professions, {} locations",
            skills.len(),
            professions.len(),
            locations.len()
        );

        let tables = LookupTables {
            skills,
            professions,
            locations,
        };
        *lock(&self.lookups) = tables.clone();
        Ok(tables)
    }

    pub fn lookups(&self) -> LookupTables {
        lock(&self.lookups).clone()
    }

    pub fn filter(&self) -> FilterState {
        lock(&self.filter).clone()
    }

    pub fn state(&self) -> SearchState {
        self.executor.state()
    }

    pub fn pagination(&self) -> Option<PaginationControls> {
        self.state()
            .result
            .as_ref()
            .and_then(PaginationControls::for_result)
    }

    /// 修改篩選條件，不會自動發出搜尋
    pub fn edit<R>(&self, change: impl FnOnce(&mut FilterState) -> R) -> R {
        change(&mut lock(&self.filter))
    }

    /// 頁碼超過最後一頁時（例如舊的分享連結），改以最後一頁重新搜尋一次
    pub async fn search(&self) -> SearchOutcome {
        let outcome = self.search_once().await;
        match &outcome {
            SearchOutcome::Applied(result) if result.is_past_end() => {
                tracing::info!(
                    "↩️ page {} is past the last page {}, reloading page {}",
                    result.current_page,
                    result.last_page,
                    result.last_page
                );
                self.search_once().await
            }
            _ => outcome,
        }
    }

    async fn search_once(&self) -> SearchOutcome {
        let snapshot = self.filter();
        let outcome = self.executor.execute(&snapshot).await;
        if let SearchOutcome::Applied(result) = &outcome {
            lock(&self.filter).record_result(result);
        }
        outcome
    }

    /// 文字輸入觸發的搜尋：靜止期內被更新的呼叫會回傳 `None`
    pub async fn search_debounced(&self) -> Option<SearchOutcome> {
        if !self.debouncer.settle().await {
            return None;
        }
        Some(self.search().await)
    }

    pub async fn retry(&self) -> SearchOutcome {
        self.search().await
    }

    /// 頁碼超出範圍時回傳 `None`，且不發出任何請求
    pub async fn go_to_page(&self, page: u32) -> Option<SearchOutcome> {
        if !lock(&self.filter).go_to_page(page) {
            tracing::debug!("⏭️ page {} rejected", page);
            return None;
        }
        Some(self.search().await)
    }

    pub async fn change_page_size(&self, page_size: PageSize) -> SearchOutcome {
        lock(&self.filter).set_page_size(page_size);
        self.search().await
    }

    /// 清除全部篩選條件、清空網址查詢字串，並重新搜尋未篩選的結果
    pub async fn clear(&self) -> SearchOutcome {
        lock(&self.filter).clear();
        self.executor.address_bar().replace_query("");
        self.search().await
    }

    pub fn dismiss_error(&self) {
        self.executor.dismiss_error();
    }
}
