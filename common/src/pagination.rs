//! Abstractions for pagination.

use serde::{Deserialize, Serialize};

/// Page of items returned by a paginated list.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Page<I> {
    /// Items on this [`Page`].
    pub data: Vec<I>,

    /// [`PageInfo`] describing this [`Page`].
    pub pagination: PageInfo,
}

/// Information about a [`Page`] in a list.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// 1-based number of the page.
    pub page: u32,

    /// Maximum number of items on a page.
    pub limit: u32,

    /// Total number of items in the list.
    pub total: u64,

    /// Total number of pages in the list.
    pub total_pages: u32,

    /// Indicator whether the list has a next page.
    pub has_next: bool,

    /// Indicator whether the list has a previous page.
    pub has_prev: bool,
}

impl PageInfo {
    /// Computes a [`PageInfo`] for the page requested by the provided
    /// [`Arguments`] in a list of `total` items.
    #[must_use]
    pub fn new(args: Arguments, total: u64) -> Self {
        let Arguments { page, limit } = args;
        let total_pages =
            u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX);
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// Pagination arguments.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Arguments {
    /// 1-based number of the requested page.
    page: u32,

    /// Maximum number of items on the requested page.
    limit: u32,
}

impl Arguments {
    /// Maximum allowed [`Arguments::limit()`].
    pub const MAX_LIMIT: u32 = 100;

    /// Creates new [`Arguments`].
    ///
    /// Missing `page` defaults to the first one, missing `limit` to the
    /// provided `default` one.
    ///
    /// [`None`] is returned if `page` is zero or `limit` is not in the
    /// `1..=`[`MAX_LIMIT`] range.
    ///
    /// [`MAX_LIMIT`]: Self::MAX_LIMIT
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>, default: u32) -> Option<Self> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(default);
        (page > 0 && (1..=Self::MAX_LIMIT).contains(&limit))
            .then_some(Self { page, limit })
    }

    /// Returns the requested page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the requested page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns [`Arguments`] for the next page.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            limit: self.limit,
        }
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

/// Pagination selector.
#[derive(Clone, Debug, Default)]
pub struct Selector<F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Additional filter being applied to the result.
    pub filter: F,
}

/// Defines pagination types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty, $filter:ty) => {
        #[doc = "A [`Page`] of nodes."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "An information about a [`Page`]."]
        pub type PageInfo = $crate::pagination::PageInfo;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$filter>;
    };
}
