//! Range and navigation-link computation for paginated responses.
//!
//! Pure functions over a page number, a page size and the current request
//! target. They produce the values of the `Content-Range` and `Link`
//! (RFC 5988 style) headers.
//!
//! # Link format
//!
//! ```text
//! </orders?page=4>; rel="next",</orders?page=5>; rel="last",</orders?page=1>; rel="first",</orders?page=2>; rel="prev",
//! ```
//!
//! Entries always appear in the order next, last, first, prev. Each entry
//! ends with a comma, including the last one; existing clients depend on it.

/// Default name of the query parameter carrying the page number.
pub const DEFAULT_PAGE_PARAMETER: &str = "page";

/// 1-based inclusive bounds of the items on `page`.
///
/// `end` is clamped to `total`, so the last page of a result set reports its
/// real size.
///
/// ```
/// use result_bridge_core::pagination::compute_range;
///
/// assert_eq!(compute_range(2, 10, 15), (11, 15));
/// assert_eq!(compute_range(1, 10, 100), (1, 10));
/// ```
#[must_use]
pub fn compute_range(page: u64, per_page: u64, total: u64) -> (u64, u64) {
    let start = page.saturating_sub(1).saturating_mul(per_page).saturating_add(1);
    let end = page.saturating_mul(per_page).min(total);
    (start, end)
}

/// Build the `Link` header value using the default `page` parameter.
#[must_use]
pub fn build_links(path_and_query: &str, current_page: u64, total_pages: u64) -> String {
    build_links_with(path_and_query, DEFAULT_PAGE_PARAMETER, current_page, total_pages)
}

/// Build the `Link` header value for a page of a paginated response.
///
/// `first` and `last` are always considered. `prev` is present only when
/// `1 < current_page <= total_pages`; `next` only when
/// `current_page < total_pages`.
#[must_use]
pub fn build_links_with(
    path_and_query: &str,
    param: &str,
    current_page: u64,
    total_pages: u64,
) -> String {
    let next = (current_page < total_pages).then(|| current_page + 1);
    let prev = (current_page > 1 && current_page <= total_pages).then(|| current_page - 1);

    let candidates = [
        ("next", next),
        ("last", Some(total_pages)),
        ("first", Some(1)),
        ("prev", prev),
    ];

    candidates
        .into_iter()
        .filter_map(|(rel, page)| page.map(|page| (rel, page_url(path_and_query, param, page))))
        .map(|(rel, url)| format!("<{url}>; rel=\"{rel}\","))
        .collect()
}

/// Rewrite `path_and_query` so that its `param` query parameter equals `page`.
///
/// Every existing occurrence of the parameter is rewritten; its name is
/// matched case-insensitively. When the parameter is missing it is appended
/// with `?` or `&` as appropriate. Other parameters and the path are kept
/// verbatim.
///
/// ```
/// use result_bridge_core::pagination::page_url;
///
/// assert_eq!(page_url("/orders", "page", 2), "/orders?page=2");
/// assert_eq!(page_url("/orders?sort=id", "page", 2), "/orders?sort=id&page=2");
/// assert_eq!(page_url("/orders?Page=7&sort=id", "page", 2), "/orders?Page=2&sort=id");
/// ```
#[must_use]
pub fn page_url(path_and_query: &str, param: &str, page: u64) -> String {
    let (path, query) = match path_and_query.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path_and_query, None),
    };

    let query = query.map(|q| q.strip_suffix('&').unwrap_or(q));
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return format!("{path}?{param}={page}");
    };

    let mut replaced = false;
    let pairs: Vec<String> = query
        .split('&')
        .map(|pair| {
            let name = pair.split_once('=').map_or(pair, |(name, _)| name);
            if name.eq_ignore_ascii_case(param) {
                replaced = true;
                format!("{name}={page}")
            } else {
                pair.to_string()
            }
        })
        .collect();

    if replaced {
        format!("{path}?{}", pairs.join("&"))
    } else {
        format!("{path}?{query}&{param}={page}")
    }
}
