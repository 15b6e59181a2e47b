use serde::{Deserialize, Serialize};

use crate::{error::Result, Error, Filter, Order};

/// Requested window of records. Records are paginated only when both `page` and `page_size`
/// are given, otherwise all matching records are returned as single page.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub order: Option<Vec<Order>>,
    pub filter: Vec<Filter>,
}

impl PageRequest {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            ..Default::default()
        }
    }

    pub fn with_order(mut self, order: Vec<Order>) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter.push(filter);
        self
    }

    /// Resolves limit and offset once total count is known
    pub fn window(&self, total: i64) -> Result<PageWindow> {
        if self.page.is_some_and(|p| p < 1) || self.page_size.is_some_and(|s| s < 1) {
            return Err(Error::InvalidPaging);
        }
        let (Some(page), Some(page_size)) = (self.page, self.page_size) else {
            return Ok(PageWindow {
                page: 1,
                page_size: total,
                total,
                total_pages: 1,
                limit: None,
                offset: 0,
            });
        };

        let offset = (page - 1).saturating_mul(page_size);
        if total > 0 && offset >= total {
            return Err(Error::PageOutOfRange);
        }
        let total_pages = (total / page_size + i64::from(total % page_size != 0)).max(1);

        Ok(PageWindow {
            page,
            page_size,
            total,
            total_pages,
            limit: Some(page_size),
            offset,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
    pub limit: Option<i64>,
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub(crate) fn new(window: PageWindow, data: Vec<T>) -> Self {
        Self {
            data,
            page: window.page,
            page_size: window.page_size,
            total: window.total,
            total_pages: window.total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_records() {
        let w = PageRequest::all().window(42).unwrap();
        assert_eq!(w.page, 1);
        assert_eq!(w.page_size, 42);
        assert_eq!(w.total_pages, 1);
        assert_eq!(w.limit, None);

        let w = PageRequest::all().window(0).unwrap();
        assert_eq!(w.total_pages, 1);
        assert_eq!(w.page_size, 0);
    }

    #[test]
    fn test_lone_page_returns_all() {
        let req = PageRequest {
            page: Some(3),
            ..Default::default()
        };
        let w = req.window(10).unwrap();
        assert_eq!(w.page, 1);
        assert_eq!(w.limit, None);
    }

    #[test]
    fn test_lone_page_size_returns_all() {
        let req = PageRequest {
            page_size: Some(5),
            ..Default::default()
        };
        let w = req.window(12).unwrap();
        assert_eq!(w.page, 1);
        assert_eq!(w.page_size, 12);
        assert_eq!(w.total_pages, 1);
        assert_eq!(w.limit, None);

        let req = PageRequest {
            page_size: Some(0),
            ..Default::default()
        };
        assert!(matches!(req.window(12), Err(Error::InvalidPaging)));
    }

    #[test]
    fn test_window() {
        let w = PageRequest::new(3, 10).window(25).unwrap();
        assert_eq!(w.offset, 20);
        assert_eq!(w.limit, Some(10));
        assert_eq!(w.total_pages, 3);

        let w = PageRequest::new(1, 10).window(0).unwrap();
        assert_eq!(w.total_pages, 1);
        assert_eq!(w.offset, 0);
    }

    #[test]
    fn test_invalid_paging() {
        assert!(matches!(
            PageRequest::new(0, 10).window(5),
            Err(Error::InvalidPaging)
        ));
        assert!(matches!(
            PageRequest::new(1, -1).window(5),
            Err(Error::InvalidPaging)
        ));
        let req = PageRequest {
            page: Some(-1),
            ..Default::default()
        };
        assert!(matches!(req.window(5), Err(Error::InvalidPaging)));
        assert!(matches!(
            PageRequest::new(3, 10).window(20),
            Err(Error::PageOutOfRange)
        ));
        assert!(matches!(
            PageRequest::new(i64::MAX, i64::MAX).window(20),
            Err(Error::PageOutOfRange)
        ));
        let w = PageRequest::new(1, i64::MAX).window(20).unwrap();
        assert_eq!(w.total_pages, 1);
    }
}
