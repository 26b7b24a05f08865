#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: Option<i64>,
}

impl Pagination {
    pub fn new(limit: i64, offset: Option<i64>) -> Self {
        Self { limit, offset }
    }

    /// One-based page of `size` rows.
    pub fn page(page: i64, size: i64) -> Self {
        let page = page.max(1);
        Self::new(size, Some((page - 1).saturating_mul(size)))
    }

    /// Number of pages needed for `total` rows, never less than one.
    pub fn num_pages(total: i64, size: i64) -> i64 {
        if total <= 0 {
            return 1;
        }
        let size = size.max(1);
        total / size + i64::from(total % size != 0)
    }
}
