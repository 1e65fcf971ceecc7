//! Page windowing: native-offset pass-through versus client-side offset
//! emulation, and hit-count reconciliation.

use crate::config::SourceConfig;

///
/// PageWindow
///
/// The paging shape of one planned query. For native-offset protocols the
/// server is handed `start_index - 1` directly; for the others the planner
/// over-fetches from index zero and slices the window client-side.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageWindow {
    start_index: u64,
    page_size: u32,
    max_features: u32,
    overfetch_multiplier: u32,
    native: bool,
}

impl PageWindow {
    /// Build the window. `start_index` is 1-based and already validated by
    /// the planner; a non-positive `page_size` is clamped to the configured
    /// maximum.
    pub(crate) fn new(config: &SourceConfig, page_size: i64, start_index: u64) -> Self {
        let page_size = if page_size <= 0 {
            config.max_features
        } else {
            u32::try_from(page_size).unwrap_or(u32::MAX)
        };

        Self {
            start_index,
            page_size,
            max_features: config.max_features,
            overfetch_multiplier: config.overfetch_multiplier,
            native: config.version.native_offset(),
        }
    }

    /// Requested 1-based start index.
    #[must_use]
    pub const fn start_index(&self) -> u64 {
        self.start_index
    }

    /// Requested page size after clamping.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Configured per-request feature cap.
    #[must_use]
    pub const fn max_features(&self) -> u32 {
        self.max_features
    }

    /// The 0-based offset to send, when the protocol has one.
    #[must_use]
    pub const fn native_offset(&self) -> Option<u64> {
        if self.native {
            Some(self.start_index - 1)
        } else {
            None
        }
    }

    /// How many features to request from the server.
    ///
    /// Native-offset protocols request exactly one page. The others request
    /// `ceil(start_index / max_features) * page_size * overfetch_multiplier`
    /// features from index zero, capped at the configured maximum.
    #[must_use]
    pub fn request_count(&self) -> u32 {
        if self.native {
            return self.page_size;
        }

        let pages = self.start_index.div_ceil(u64::from(self.max_features.max(1)));
        let count = pages
            .saturating_mul(u64::from(self.page_size))
            .saturating_mul(u64::from(self.overfetch_multiplier.max(1)));

        u32::try_from(count.min(u64::from(self.max_features))).unwrap_or(self.max_features)
    }

    /// Slice a raw response down to the requested window and reconcile the
    /// hit count.
    ///
    /// Hits is the server-reported total when available, else the raw
    /// returned count — independent of how much the client-side slice
    /// discards.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn window<T>(&self, result: PageResult<T>) -> Paged<T> {
        let raw_count = result.records.len() as u64;
        let hits = result.server_total.unwrap_or(raw_count);
        let page = self.page_size as usize;

        let results = if self.native {
            // server already applied the offset
            let mut records = result.records;
            records.truncate(page);
            records
        } else {
            let skip = usize::try_from(self.start_index - 1).unwrap_or(usize::MAX);
            result.records.into_iter().skip(skip).take(page).collect()
        };

        Paged { results, hits }
    }
}

///
/// PageResult
///
/// One raw transport response: ordered records plus the server's total-match
/// report, when it can produce one.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PageResult<T> {
    pub records: Vec<T>,
    pub server_total: Option<u64>,
}

impl<T> PageResult<T> {
    #[must_use]
    pub const fn new(records: Vec<T>, server_total: Option<u64>) -> Self {
        Self {
            records,
            server_total,
        }
    }
}

///
/// Paged
///
/// The windowed {results, hits} tuple handed back to the catalog's generic
/// response shape.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Paged<T> {
    pub results: Vec<T>,
    pub hits: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfsq_model::version::WfsVersion;

    fn emulated_config() -> SourceConfig {
        SourceConfig::for_version(WfsVersion::V1_0_0)
    }

    fn native_config() -> SourceConfig {
        SourceConfig::for_version(WfsVersion::V2_0_0)
    }

    fn ten() -> Vec<u32> {
        (1..=10).collect()
    }

    #[test]
    fn emulated_window_slices_the_first_page() {
        let window = PageWindow::new(&emulated_config(), 4, 1);
        let paged = window.window(PageResult::new(ten(), Some(10)));

        assert_eq!(paged.results, [1, 2, 3, 4]);
        assert_eq!(paged.hits, 10);
    }

    #[test]
    fn emulated_window_slices_an_offset_page() {
        let window = PageWindow::new(&emulated_config(), 4, 2);
        let paged = window.window(PageResult::new(ten(), Some(10)));

        assert_eq!(paged.results, [2, 3, 4, 5]);
        assert_eq!(paged.hits, 10);
    }

    #[test]
    fn emulated_window_past_the_end_returns_no_results_but_real_hits() {
        let window = PageWindow::new(&emulated_config(), 4, 3);
        let paged = window.window(PageResult::new(vec![1, 2], None));

        assert!(paged.results.is_empty());
        assert_eq!(paged.hits, 2);
    }

    #[test]
    fn native_window_trusts_the_server_offset() {
        let window = PageWindow::new(&native_config(), 4, 3);
        assert_eq!(window.native_offset(), Some(2));
        assert_eq!(window.request_count(), 4);

        let paged = window.window(PageResult::new(vec![3, 4, 5, 6], Some(10)));
        assert_eq!(paged.results, [3, 4, 5, 6]);
        assert_eq!(paged.hits, 10);
    }

    #[test]
    fn hits_default_to_the_raw_count_without_a_server_total() {
        let window = PageWindow::new(&native_config(), 4, 1);
        let paged = window.window(PageResult::new(vec![1, 2, 3], None));

        assert_eq!(paged.hits, 3);
    }

    #[test]
    fn non_positive_page_size_clamps_to_the_configured_maximum() {
        let window = PageWindow::new(&emulated_config(), 0, 1);
        assert_eq!(window.page_size(), 1000);

        let window = PageWindow::new(&emulated_config(), -7, 1);
        assert_eq!(window.page_size(), 1000);
    }

    #[test]
    fn emulated_request_count_overfetches_from_index_zero() {
        // ceil(2 / 1000) * 4 * 2
        let window = PageWindow::new(&emulated_config(), 4, 2);
        assert_eq!(window.native_offset(), None);
        assert_eq!(window.request_count(), 8);
    }

    #[test]
    fn emulated_request_count_is_capped_at_max_features() {
        let window = PageWindow::new(&emulated_config(), 900, 2);
        assert_eq!(window.request_count(), 1000);
    }
}
