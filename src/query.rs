/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Helpers for building the query part of request URIs.

use std::collections::BTreeMap;

use url::form_urlencoded;

/// Filters that are appended to a URI as `filter_<key>=<value>` pairs.
pub type QueryFilters = BTreeMap<String, String>;

/// Filters that are sent as a JSON object in the body of a list request.
pub type FieldFilters = serde_json::Map<String, serde_json::Value>;

/// Escapes a value for use in a query string.
///
/// Spaces are replaced by `+`.
///
/// # Examples
///
/// ```rust
/// use requesthandler::query::query_escape;
///
/// assert_eq!(query_escape("2020-09-20 03:23:20.995000"), "2020-09-20+03%3A23%3A20.995000");
/// ```
pub fn query_escape(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Escapes a value the way a path segment is escaped.
///
/// Spaces are replaced by `%20`.
///
/// # Examples
///
/// ```rust
/// use requesthandler::query::path_escape;
///
/// assert_eq!(path_escape("2020-09-20 03:23:20.995000"), "2020-09-20%2003%3A23%3A20.995000");
/// ```
pub fn path_escape(value: &str) -> String {
    // a literal '+' has already been turned into %2B at this point
    query_escape(value).replace('+', "%20")
}

/// Appends the paging parameters to a path.
pub fn page_uri(path: &str, page_token: &str, page_size: u64) -> String {
    format!(
        "{path}?page_token={}&page_size={page_size}",
        query_escape(page_token)
    )
}

/// Appends filters to a URI which already has a query part.
///
/// Filters are appended in the order of their keys.
pub fn merge_filters(uri: String, filters: &QueryFilters) -> String {
    filters.iter().fold(uri, |mut uri, (key, value)| {
        uri.push_str("&filter_");
        uri.push_str(key);
        uri.push('=');
        uri.push_str(&query_escape(value));
        uri
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_case::test_case;

    #[test_case("2020-09-20 03:23:20.995000", "2020-09-20+03%3A23%3A20.995000"; "space and colon")]
    #[test_case("2020-09-20T03:23:20.995000Z", "2020-09-20T03%3A23%3A20.995000Z"; "rfc3339")]
    #[test_case("", ""; "empty token")]
    #[test_case("a+b", "a%2Bb"; "literal plus")]
    fn test_query_escape(value: &str, expected: &str) {
        assert_eq!(query_escape(value), expected);
    }

    #[test]
    fn test_path_escape_keeps_literal_plus_distinct_from_space() {
        assert_eq!(path_escape("a+b c"), "a%2Bb%20c");
    }

    #[test]
    fn test_page_uri() {
        assert_eq!(
            page_uri("/v1/customers", "2021-03-02 03:23:20.995000", 10),
            "/v1/customers?page_token=2021-03-02+03%3A23%3A20.995000&page_size=10"
        );
    }

    #[test]
    fn test_merge_filters_appends_sorted_prefixed_pairs() {
        let filters = QueryFilters::from([
            ("deleted".to_string(), "false".to_string()),
            (
                "customer_id".to_string(),
                "24676972-7f49-11ec-bc89-b7d33e9d3ea8".to_string(),
            ),
        ]);

        assert_eq!(
            merge_filters("/v1/flows?page_size=10".to_string(), &filters),
            "/v1/flows?page_size=10&filter_customer_id=24676972-7f49-11ec-bc89-b7d33e9d3ea8&filter_deleted=false"
        );
    }

    #[test]
    fn test_merge_filters_without_filters() {
        assert_eq!(
            merge_filters("/v1/queues?page_size=10".to_string(), &QueryFilters::new()),
            "/v1/queues?page_size=10"
        );
    }
}
