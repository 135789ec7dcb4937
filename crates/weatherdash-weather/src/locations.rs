//! Static location list backing the search box.

/// Shortest query that is searched at all
pub const MIN_QUERY_LEN: usize = 2;

/// Most suggestions returned for one query
pub const MAX_RESULTS: usize = 5;

pub const KNOWN_LOCATIONS: &[&str] = &[
    "New York, NY, USA",
    "Los Angeles, CA, USA",
    "Chicago, IL, USA",
    "Miami, FL, USA",
    "Phoenix, AZ, USA",
    "Seattle, WA, USA",
    "Boston, MA, USA",
    "Denver, CO, USA",
    "Las Vegas, NV, USA",
    "San Francisco, CA, USA",
    "London, UK",
    "Paris, France",
    "Tokyo, Japan",
    "Sydney, Australia",
    "Toronto, Canada",
    "Berlin, Germany",
    "Rome, Italy",
    "Barcelona, Spain",
    "Amsterdam, Netherlands",
    "Dubai, UAE",
    "Singapore",
    "Hong Kong",
    "Mumbai, India",
    "São Paulo, Brazil",
    "Mexico City, Mexico",
    "Telluride, CO, USA",
];

/// Whether a query is long enough to search
pub fn is_searchable(query: &str) -> bool {
    is_searchable_with(query, MIN_QUERY_LEN)
}

/// Same as `is_searchable` with a configurable minimum length
pub fn is_searchable_with(query: &str, min_query_len: usize) -> bool {
    !query.trim().is_empty() && query.chars().count() >= min_query_len
}

/// Case-insensitive substring filter in list order, capped at `limit`
pub fn filter_locations(query: &str, limit: usize) -> Vec<String> {
    filter_locations_with(query, MIN_QUERY_LEN, limit)
}

pub fn filter_locations_with(query: &str, min_query_len: usize, limit: usize) -> Vec<String> {
    if !is_searchable_with(query, min_query_len) {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    KNOWN_LOCATIONS
        .iter()
        .filter(|location| location.to_lowercase().contains(&needle))
        .take(limit)
        .map(|location| location.to_string())
        .collect()
}
