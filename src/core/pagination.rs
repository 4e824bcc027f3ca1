use crate::domain::model::PageResult;
use serde::Serialize;

pub const MAX_VISIBLE_PAGES: u32 = 5;

/// 以目前頁為中心、寬度 5 的頁碼視窗，不會超出 `1..=last_page`
pub fn page_window(current_page: u32, last_page: u32) -> Vec<u32> {
    if last_page == 0 {
        return vec![];
    }
    if last_page <= MAX_VISIBLE_PAGES {
        return (1..=last_page).collect();
    }

    let half = MAX_VISIBLE_PAGES / 2;
    let start = current_page
        .saturating_sub(half)
        .clamp(1, last_page - MAX_VISIBLE_PAGES + 1);
    let end = start + MAX_VISIBLE_PAGES - 1;

    (start..=end).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationControls {
    pub pages: Vec<u32>,
    pub current_page: u32,
    pub last_page: u32,
    /// 上一頁目標，`None` 表示按鈕停用
    pub previous: Option<u32>,
    pub next: Option<u32>,
    pub showing: Option<(u64, u64)>,
    pub total: u64,
}

impl PaginationControls {
    /// 只有一頁（或沒有結果）時不顯示任何分頁控制
    pub fn new(current_page: u32, last_page: u32) -> Option<Self> {
        if last_page <= 1 {
            return None;
        }
        let current_page = current_page.clamp(1, last_page);

        Some(Self {
            pages: page_window(current_page, last_page),
            current_page,
            last_page,
            previous: (current_page > 1).then(|| current_page - 1),
            next: (current_page < last_page).then(|| current_page + 1),
            showing: None,
            total: 0,
        })
    }

    pub fn for_result(result: &PageResult) -> Option<Self> {
        Self::new(result.current_page, result.last_page).map(|controls| Self {
            showing: result.showing_range(),
            total: result.total,
            ..controls
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_page_counts_show_everything() {
        assert_eq!(page_window(1, 1), vec![1]);
        assert_eq!(page_window(2, 3), vec![1, 2, 3]);
        assert_eq!(page_window(5, 5), vec![1, 2, 3, 4, 5]);
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn test_window_slides_and_clamps() {
        assert_eq!(page_window(1, 12), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(12, 12), vec![8, 9, 10, 11, 12]);
        assert_eq!(page_window(6, 12), vec![4, 5, 6, 7, 8]);
        assert_eq!(page_window(2, 12), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(11, 12), vec![8, 9, 10, 11, 12]);
        assert_eq!(page_window(4, 6), vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_window_is_always_within_bounds() {
        for last_page in 1..=30 {
            for current_page in 1..=last_page {
                let window = page_window(current_page, last_page);
                assert!(window.contains(&current_page));
                assert!(window.iter().all(|p| (1..=last_page).contains(p)));
                assert_eq!(window.len() as u32, last_page.min(MAX_VISIBLE_PAGES));
            }
        }
    }

    #[test]
    fn test_no_controls_for_single_page() {
        assert!(PaginationControls::new(1, 1).is_none());
        assert!(PaginationControls::new(1, 0).is_none());
        assert!(PaginationControls::for_result(&PageResult::empty()).is_none());
    }

    #[test]
    fn test_previous_and_next_disabled_at_edges() {
        let first = PaginationControls::new(1, 12).unwrap();
        assert_eq!(first.previous, None);
        assert_eq!(first.next, Some(2));

        let last = PaginationControls::new(12, 12).unwrap();
        assert_eq!(last.previous, Some(11));
        assert_eq!(last.next, None);

        let middle = PaginationControls::new(6, 12).unwrap();
        assert_eq!(middle.previous, Some(5));
        assert_eq!(middle.next, Some(7));
        assert_eq!(middle.pages, vec![4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_controls_for_result_carry_totals() {
        let result = PageResult {
            items: Vec::new(),
            current_page: 2,
            last_page: 3,
            page_size: 15,
            total: 42,
        };
        let controls = PaginationControls::for_result(&result).unwrap();
        assert_eq!(controls.total, 42);
        assert_eq!(controls.showing, None);
        assert_eq!(controls.pages, vec![1, 2, 3]);
    }
}
