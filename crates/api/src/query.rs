//! Query-string construction for paginated list endpoints.

use indexmap::IndexMap;
use mims_types::SortOrder;

/// Default number of rows requested per page.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Parameters for a paginated list request.
///
/// `search`, `sort_by` and `sort_order` are omitted from the query string
/// when empty. Filter entries with empty values are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u64,
    pub page_size: u64,
    pub search: String,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
    pub filters: IndexMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
            sort_by: None,
            sort_order: SortOrder::default(),
            filters: IndexMap::new(),
        }
    }
}

impl ListQuery {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_sort(mut self, key: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(key.into());
        self.sort_order = order;
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Render the query as ordered key/value pairs for `reqwest::RequestBuilder::query`.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("search".to_string(), search.to_string()));
        }
        if let Some(sort_by) = &self.sort_by
            && !sort_by.is_empty()
        {
            params.push(("sort_by".to_string(), sort_by.clone()));
            params.push(("sort_order".to_string(), self.sort_order.as_param().to_string()));
        }
        for (key, value) in &self.filters {
            if !value.is_empty() {
                params.push((key.clone(), value.clone()));
            }
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(params: &[(String, String)]) -> Vec<&str> {
        params.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn default_query_carries_only_page_params() {
        let params = ListQuery::default().to_params();
        assert_eq!(keys(&params), vec!["page", "page_size"]);
        assert_eq!(params[0].1, "1");
        assert_eq!(params[1].1, "20");
    }

    #[test]
    fn search_and_sort_are_included_when_set() {
        let params = ListQuery::new(2, 20)
            .with_search("ahmed")
            .with_sort("name", SortOrder::Descending)
            .to_params();
        assert_eq!(keys(&params), vec!["page", "page_size", "search", "sort_by", "sort_order"]);
        assert_eq!(params[2].1, "ahmed");
        assert_eq!(params[4].1, "desc");
    }

    #[test]
    fn blank_search_is_omitted() {
        let params = ListQuery::default().with_search("   ").to_params();
        assert_eq!(keys(&params), vec!["page", "page_size"]);
    }

    #[test]
    fn empty_filter_values_are_skipped() {
        let params = ListQuery::default()
            .with_filter("status", "active")
            .with_filter("branch", "")
            .to_params();
        assert_eq!(keys(&params), vec!["page", "page_size", "status"]);
        assert_eq!(params[2].1, "active");
    }

    #[test]
    fn page_floor_is_one() {
        let query = ListQuery::new(0, 0);
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 1);
    }
}
