//! Query parameter normalization.
//!
//! Turns the raw query string of a request into a [`ListQuery`] or
//! [`SymbolsQuery`]. Normalization never fails: values that cannot be parsed,
//! or that are out of range, fall back to their defaults.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Default page size.
pub const DEFAULT_LIMIT: u64 = 10;

/// Default (1-based) page number.
pub const DEFAULT_PAGE: u64 = 1;

/// Default sort field.
pub const DEFAULT_SORT_FIELD: &str = "id";

/// Query parameter carrying the symbol filter on the data endpoint.
pub const DATA_SYMBOL_PARAM: &str = "Symbol";

/// Query parameter carrying the search term on the symbols endpoint.
pub const SYMBOLS_QUERY_PARAM: &str = "query";

/// Parses a strictly positive integer, falling back to `default`.
///
/// Accepts an optional leading sign followed by decimal digits within the
/// `i64` range. Anything else, including zero and negatives, yields `default`.
#[must_use]
pub fn parse_positive(raw: Option<&str>, default: u64) -> u64 {
    match raw.map(str::parse::<i64>) {
        Some(Ok(value)) if value > 0 => value as u64,
        _ => default,
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending (default).
    #[default]
    Ascending,
    /// Descending.
    Descending,
}

impl SortDirection {
    /// Maps the `order` parameter. Only the exact string `desc` is descending.
    #[must_use]
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => Self::Descending,
            _ => Self::Ascending,
        }
    }

    /// Store-native sort value (`1` or `-1`).
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Sort specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Field name, passed through to the store unvalidated.
    pub field: String,
    /// Direction.
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: DEFAULT_SORT_FIELD.to_string(),
            direction: SortDirection::Ascending,
        }
    }
}

/// Symbol matching strategy, selected once per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolMatch {
    /// Exact string equality on `Symbol`.
    Exact,
    /// Indexed full-text search.
    FullText,
    /// Case-insensitive substring match on `Symbol`.
    SubstringCi,
}

impl SymbolMatch {
    /// Builds a filter for `term`. An empty term means no filter.
    #[must_use]
    pub fn filter(self, term: Option<&str>) -> SymbolFilter {
        let term = match term {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => return SymbolFilter::None,
        };

        match self {
            Self::Exact => SymbolFilter::Exact(term),
            Self::FullText => SymbolFilter::FullText(term),
            Self::SubstringCi => SymbolFilter::SubstringCi(term),
        }
    }
}

impl std::str::FromStr for SymbolMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "full_text" | "text" => Ok(Self::FullText),
            "substring_ci" | "regex" => Ok(Self::SubstringCi),
            other => Err(format!(
                "unknown symbol match '{}', expected exact, full_text or substring_ci",
                other
            )),
        }
    }
}

/// A symbol predicate ready to be handed to a store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SymbolFilter {
    /// Match every record.
    #[default]
    None,
    /// `Symbol` equals the term.
    Exact(String),
    /// Full-text search for the term.
    FullText(String),
    /// `Symbol` contains the term, ignoring case.
    SubstringCi(String),
}

impl fmt::Display for SymbolFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Exact(t) => write!(f, "exact:{}", t),
            Self::FullText(t) => write!(f, "text:{}", t),
            Self::SubstringCi(t) => write!(f, "substring_ci:{}", t),
        }
    }
}

/// Normalized listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Page size.
    pub limit: u64,
    /// 1-based page number.
    pub page: u64,
    /// Sort specification.
    pub sort: SortSpec,
    /// Symbol filter.
    pub filter: SymbolFilter,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page: DEFAULT_PAGE,
            sort: SortSpec::default(),
            filter: SymbolFilter::None,
        }
    }
}

impl ListQuery {
    /// Normalizes raw query parameters.
    #[must_use]
    pub fn from_params(params: &HashMap<String, String>, matching: SymbolMatch) -> Self {
        let get = |key: &str| params.get(key).map(String::as_str);

        let field = match get("sort") {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => DEFAULT_SORT_FIELD.to_string(),
        };

        Self {
            limit: parse_positive(get("limit"), DEFAULT_LIMIT),
            page: parse_positive(get("page"), DEFAULT_PAGE),
            sort: SortSpec {
                field,
                direction: SortDirection::from_param(get("order")),
            },
            filter: matching.filter(get(DATA_SYMBOL_PARAM)),
        }
    }

    /// Number of leading records to skip: `(page - 1) * limit`.
    #[must_use]
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Cache key covering every parameter that affects the result.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "data_{}_{}_{}_{}_{}",
            self.filter, self.limit, self.page, self.sort.field, self.sort.direction
        )
    }
}

/// Normalized distinct-symbols query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SymbolsQuery {
    /// Symbol filter built from the `query` parameter.
    pub filter: SymbolFilter,
}

impl SymbolsQuery {
    /// Normalizes raw query parameters.
    #[must_use]
    pub fn from_params(params: &HashMap<String, String>, matching: SymbolMatch) -> Self {
        Self {
            filter: matching.filter(params.get(SYMBOLS_QUERY_PARAM).map(String::as_str)),
        }
    }

    /// Cache key for this query.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("symbols_{}", self.filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_positive_defaults() {
        assert_eq!(parse_positive(None, 10), 10);
        assert_eq!(parse_positive(Some(""), 10), 10);
        assert_eq!(parse_positive(Some("abc"), 10), 10);
        assert_eq!(parse_positive(Some("0"), 10), 10);
        assert_eq!(parse_positive(Some("-5"), 10), 10);
        assert_eq!(parse_positive(Some("2.5"), 10), 10);
        assert_eq!(parse_positive(Some(" 5"), 10), 10);
        assert_eq!(parse_positive(Some("99999999999999999999"), 10), 10);
    }

    #[test]
    fn test_parse_positive_valid() {
        assert_eq!(parse_positive(Some("1"), 10), 1);
        assert_eq!(parse_positive(Some("+7"), 10), 7);
        assert_eq!(parse_positive(Some("100000"), 10), 100000);
    }

    #[test]
    fn test_sort_direction_from_param() {
        assert_eq!(
            SortDirection::from_param(Some("desc")),
            SortDirection::Descending
        );
        assert_eq!(
            SortDirection::from_param(Some("asc")),
            SortDirection::Ascending
        );
        assert_eq!(
            SortDirection::from_param(Some("DESC")),
            SortDirection::Ascending
        );
        assert_eq!(SortDirection::from_param(None), SortDirection::Ascending);
        assert_eq!(SortDirection::Descending.as_i32(), -1);
        assert_eq!(SortDirection::Ascending.as_i32(), 1);
    }

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery::from_params(&HashMap::new(), SymbolMatch::Exact);
        assert_eq!(query, ListQuery::default());
        assert_eq!(query.skip(), 0);
        assert_eq!(query.sort.field, "id");
    }

    #[test]
    fn test_list_query_malformed_values_fall_back() {
        let query = ListQuery::from_params(
            &params(&[("limit", "lots"), ("page", "-3"), ("sort", ""), ("order", "down")]),
            SymbolMatch::Exact,
        );
        assert_eq!(query.limit, 10);
        assert_eq!(query.page, 1);
        assert_eq!(query.sort, SortSpec::default());
    }

    #[test]
    fn test_list_query_skip() {
        let query = ListQuery::from_params(
            &params(&[("limit", "20"), ("page", "3")]),
            SymbolMatch::Exact,
        );
        assert_eq!(query.skip(), 40);

        let huge = ListQuery {
            limit: u64::MAX,
            page: 3,
            ..ListQuery::default()
        };
        assert_eq!(huge.skip(), u64::MAX);
    }

    #[test]
    fn test_list_query_filter_strategies() {
        let raw = params(&[("Symbol", "AAA")]);
        assert_eq!(
            ListQuery::from_params(&raw, SymbolMatch::Exact).filter,
            SymbolFilter::Exact("AAA".to_string())
        );
        assert_eq!(
            ListQuery::from_params(&raw, SymbolMatch::FullText).filter,
            SymbolFilter::FullText("AAA".to_string())
        );
        assert_eq!(
            ListQuery::from_params(&raw, SymbolMatch::SubstringCi).filter,
            SymbolFilter::SubstringCi("AAA".to_string())
        );

        let empty = params(&[("Symbol", "")]);
        assert_eq!(
            ListQuery::from_params(&empty, SymbolMatch::Exact).filter,
            SymbolFilter::None
        );
    }

    #[test]
    fn test_symbol_param_is_case_sensitive() {
        let raw = params(&[("symbol", "AAA")]);
        assert_eq!(
            ListQuery::from_params(&raw, SymbolMatch::Exact).filter,
            SymbolFilter::None
        );
    }

    #[test]
    fn test_cache_key_distinguishes_parameters() {
        let base = ListQuery::from_params(
            &params(&[("limit", "5"), ("page", "2"), ("sort", "EPS"), ("order", "desc")]),
            SymbolMatch::Exact,
        );
        assert_eq!(base.cache_key(), "data_none_5_2_EPS_desc");

        let same = ListQuery::from_params(
            &params(&[("limit", "5"), ("page", "2"), ("sort", "EPS"), ("order", "desc")]),
            SymbolMatch::Exact,
        );
        assert_eq!(base.cache_key(), same.cache_key());

        let other_page = ListQuery { page: 3, ..base.clone() };
        let other_filter = ListQuery {
            filter: SymbolFilter::Exact("AAA".to_string()),
            ..base.clone()
        };
        assert_ne!(base.cache_key(), other_page.cache_key());
        assert_ne!(base.cache_key(), other_filter.cache_key());
    }

    #[test]
    fn test_equivalent_orders_share_cache_key() {
        let omitted = ListQuery::from_params(&HashMap::new(), SymbolMatch::Exact);
        let explicit = ListQuery::from_params(&params(&[("order", "asc")]), SymbolMatch::Exact);
        assert_eq!(omitted.cache_key(), explicit.cache_key());
    }

    #[test]
    fn test_symbols_query() {
        let query =
            SymbolsQuery::from_params(&params(&[("query", "aa")]), SymbolMatch::SubstringCi);
        assert_eq!(query.filter, SymbolFilter::SubstringCi("aa".to_string()));
        assert_eq!(query.cache_key(), "symbols_substring_ci:aa");

        let all = SymbolsQuery::from_params(&HashMap::new(), SymbolMatch::FullText);
        assert_eq!(all.cache_key(), "symbols_none");
    }

    #[test]
    fn test_symbol_match_from_str() {
        assert_eq!("exact".parse::<SymbolMatch>(), Ok(SymbolMatch::Exact));
        assert_eq!("FULL_TEXT".parse::<SymbolMatch>(), Ok(SymbolMatch::FullText));
        assert_eq!(
            "substring_ci".parse::<SymbolMatch>(),
            Ok(SymbolMatch::SubstringCi)
        );
        assert!("fuzzy".parse::<SymbolMatch>().is_err());
    }
}
