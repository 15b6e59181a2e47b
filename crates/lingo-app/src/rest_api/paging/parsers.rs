use lingo_dal::{Filter, Order};

use crate::error::{ApiError, ApiResult};

/// Comma separated field names, `-` prefix sorts descending, `+` ascending,
/// names without prefix use `descending_default`
pub(super) fn parse_ordering(orderings: &str, descending_default: bool) -> ApiResult<Vec<Order>> {
    orderings
        .split(',')
        .map(|name| {
            let (field_name, descending) = match name.trim() {
                "" => return Err(ApiError::InvalidQuery("Empty ordering name".to_string())),
                name if name.len() > 100 => {
                    return Err(ApiError::InvalidQuery("Ordering name too long".to_string()))
                }
                name if name.starts_with('+') => (&name[1..], false),
                name if name.starts_with('-') => (&name[1..], true),
                name => (name, descending_default),
            };

            let order = if descending {
                Order::Desc(field_name.to_string())
            } else {
                Order::Asc(field_name.to_string())
            };

            Ok(order)
        })
        .collect::<Result<Vec<_>, _>>()
}

/// Filters separated by `;`
pub(super) fn parse_filters(filters: &str) -> ApiResult<Vec<Filter>> {
    if filters.len() > 1000 {
        return Err(ApiError::InvalidQuery("Filter too long".to_string()));
    }

    filters
        .split(';')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse())
        .collect::<Result<Vec<Filter>, _>>()
        .map_err(|e| ApiError::InvalidQuery(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ordering() {
        let order = parse_ordering("name, -code,+id", false).unwrap();
        assert_eq!(
            order,
            vec![
                Order::Asc("name".into()),
                Order::Desc("code".into()),
                Order::Asc("id".into())
            ]
        );
        let order = parse_ordering("name,+id", true).unwrap();
        assert_eq!(
            order,
            vec![Order::Desc("name".into()), Order::Asc("id".into())]
        );
        assert!(parse_ordering("name,,id", false).is_err());
    }

    #[test]
    fn test_parse_filters() {
        let filters = parse_filters("status=active;removeDate!=null;").unwrap();
        assert_eq!(
            filters,
            vec![
                Filter::eq("status", "active"),
                Filter::is_not_null("removeDate")
            ]
        );
        assert!(parse_filters("status").is_err());
    }
}
