mod parsers;

use garde::Validate;
use lingo_dal::PageRequest;
use serde::Deserialize;

use crate::error::ApiResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Listing query `?page=&pageSize=&sort=&sortOrder=&filter=`
#[derive(Debug, Clone, Default, Validate, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[serde(rename_all = "camelCase")]
#[garde(allow_unvalidated)]
pub struct Paging {
    page: Option<i64>,
    page_size: Option<i64>,
    #[garde(length(max = 255))]
    sort: Option<String>,
    sort_order: Option<SortOrder>,
    #[garde(length(max = 1000))]
    filter: Option<String>,
}

impl Paging {
    /// Page range is checked later, once total count is known
    pub fn into_page_request(self) -> ApiResult<PageRequest> {
        let descending = self.sort_order == Some(SortOrder::Desc);
        let order = self
            .sort
            .as_deref()
            .map(|sort| parsers::parse_ordering(sort, descending))
            .transpose()?;
        let filter = self
            .filter
            .as_deref()
            .map(parsers::parse_filters)
            .transpose()?
            .unwrap_or_default();
        Ok(PageRequest {
            page: self.page,
            page_size: self.page_size,
            order,
            filter,
        })
    }
}
