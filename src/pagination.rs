use serde::{Deserialize, Serialize};

/// `?page=N` as it arrives on the wire. Kept as a string so that garbage
/// input degrades to page 1 instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn number(&self) -> i64 {
        parse_page(self.page.as_deref())
    }
}

pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(1)
}

/// Fixed-size paginator. Out-of-range page numbers clamp to the nearest
/// valid page instead of erroring.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: i64,
}

/// One resolved page: which page was actually served plus the LIMIT/OFFSET
/// to fetch it with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub limit: i64,
    pub offset: i64,
}

impl Paginator {
    pub fn new(per_page: i64) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn page(&self, count: i64, requested: i64) -> PageSpec {
        let count = count.max(0);
        // An empty listing still has one (empty) page.
        let num_pages = if count == 0 {
            1
        } else {
            (count + self.per_page - 1) / self.per_page
        };
        let number = requested.clamp(1, num_pages);
        PageSpec {
            number,
            num_pages,
            count,
            limit: self.per_page,
            offset: (number - 1) * self.per_page,
        }
    }
}

/// A page of items together with the pagination metadata clients need to
/// render page links.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub num_pages: i64,
    pub count: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, spec: PageSpec) -> Self {
        Self {
            items,
            page: spec.number,
            num_pages: spec.num_pages,
            count: spec.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_posts_split_ten_and_two() {
        let pager = Paginator::new(10);
        let first = pager.page(12, 1);
        assert_eq!(first.limit, 10);
        assert_eq!(first.offset, 0);
        assert_eq!(first.num_pages, 2);

        let second = pager.page(12, 2);
        assert_eq!(second.offset, 10);
        assert_eq!(second.number, 2);
    }

    #[test]
    fn out_of_range_clamps_to_last_page() {
        let pager = Paginator::new(10);
        let page = pager.page(12, 99);
        assert_eq!(page.number, 2);
        assert_eq!(page.offset, 10);
    }

    #[test]
    fn zero_and_negative_clamp_to_first_page() {
        let pager = Paginator::new(10);
        assert_eq!(pager.page(12, 0).number, 1);
        assert_eq!(pager.page(12, -5).number, 1);
    }

    #[test]
    fn empty_listing_has_one_empty_page() {
        let pager = Paginator::new(10);
        let page = pager.page(0, 3);
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert_eq!(page.count, 0);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let pager = Paginator::new(10);
        assert_eq!(pager.page(20, 1).num_pages, 2);
        assert_eq!(pager.page(21, 1).num_pages, 3);
    }

    #[test]
    fn garbage_page_param_parses_as_one() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some(" 3 ")), 3);
    }
}
