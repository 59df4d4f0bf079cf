//! Page-request and page-envelope primitives shared by backend list
//! endpoints.
//!
//! A [`PageRequest`] is validated at construction so repositories can trust
//! its offset arithmetic; a [`Page`] is the serialisable envelope returned to
//! callers, carrying the totals a paging client needs to render controls.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size used when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Validation errors returned when constructing a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Pages are numbered from 1.
    #[error("page numbers start at 1")]
    ZeroPage,
    /// A page must hold at least one item.
    #[error("page size must be at least 1")]
    ZeroPageSize,
    /// The requested page size exceeds [`MAX_PAGE_SIZE`].
    #[error("page size must not exceed {max}")]
    PageSizeTooLarge {
        /// The enforced ceiling.
        max: u32,
    },
}

/// A validated request for one page of a listing.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 20).expect("valid request");
/// assert_eq!(request.offset(), 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PageRequestDto", into = "PageRequestDto")]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Construct a request, validating page number and size.
    pub fn new(page: u32, page_size: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if page_size == 0 {
            return Err(PageRequestError::ZeroPageSize);
        }
        if page_size > MAX_PAGE_SIZE {
            return Err(PageRequestError::PageSizeTooLarge { max: MAX_PAGE_SIZE });
        }
        Ok(Self { page, page_size })
    }

    /// The first page at the default size.
    pub fn first() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// One-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items to skip before this page starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PageRequestDto {
    page: u32,
    page_size: u32,
}

impl From<PageRequest> for PageRequestDto {
    fn from(value: PageRequest) -> Self {
        Self {
            page: value.page,
            page_size: value.page_size,
        }
    }
}

impl TryFrom<PageRequestDto> for PageRequest {
    type Error = PageRequestError;

    fn try_from(value: PageRequestDto) -> Result<Self, Self::Error> {
        Self::new(value.page, value.page_size)
    }
}

/// One page of results plus the totals needed to render paging controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page, in listing order.
    pub items: Vec<T>,
    /// Total matching items across all pages.
    pub total: u64,
    /// One-based page number of this page.
    pub page: u32,
    /// Requested page size.
    pub page_size: u32,
    /// Total number of pages at this size.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Assemble an envelope from a page of items and the overall total.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest};
    ///
    /// let request = PageRequest::new(1, 10).expect("valid request");
    /// let page = Page::assemble(vec!["a", "b"], 42, &request);
    /// assert_eq!(page.total_pages, 5);
    /// ```
    pub fn assemble(items: Vec<T>, total: u64, request: &PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            page_size: request.page_size(),
            total_pages: total.div_ceil(u64::from(request.page_size())),
        }
    }

    /// An empty envelope for a listing with no matches.
    pub fn empty(request: &PageRequest) -> Self {
        Self::assemble(Vec::new(), 0, request)
    }
}
