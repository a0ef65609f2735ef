//! Request parameters: the raw filter, sort, skip and take text.

use serde::Deserialize;

/// Raw query parameters as supplied by a request.
///
/// Deserializes from either the plain names or the `$`-prefixed ones:
///
/// ```
/// use quarry::QueryParams;
///
/// let params: QueryParams =
///     serde_json::from_str(r#"{ "$filter": "age gt 3", "$take": "10" }"#).unwrap();
/// assert_eq!(params.filter.as_deref(), Some("age gt 3"));
/// assert_eq!(params.take.as_deref(), Some("10"));
/// assert_eq!(params.sort, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    #[serde(alias = "$filter")]
    pub filter: Option<String>,
    #[serde(alias = "$sort")]
    pub sort: Option<String>,
    #[serde(alias = "$skip")]
    pub skip: Option<String>,
    #[serde(alias = "$take")]
    pub take: Option<String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, text: impl Into<String>) -> Self {
        self.filter = Some(text.into());
        self
    }

    pub fn sort(mut self, text: impl Into<String>) -> Self {
        self.sort = Some(text.into());
        self
    }

    pub fn skip(mut self, text: impl Into<String>) -> Self {
        self.skip = Some(text.into());
        self
    }

    pub fn take(mut self, text: impl Into<String>) -> Self {
        self.take = Some(text.into());
        self
    }

    /// Collects parameters from decoded key/value pairs, such as a parsed
    /// query string.
    ///
    /// Keys match with or without the `$` prefix, ignoring case. Unrelated
    /// keys are ignored; a repeated key keeps its last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = QueryParams::default();
        for (key, value) in pairs {
            let key = key.as_ref();
            let name = key.strip_prefix('$').unwrap_or(key).to_ascii_lowercase();
            let slot = match name.as_str() {
                "filter" => &mut params.filter,
                "sort" => &mut params.sort,
                "skip" => &mut params.skip,
                "take" => &mut params.take,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        params
    }

    pub(crate) fn filter_text(&self) -> &str {
        self.filter.as_deref().unwrap_or_default()
    }

    pub(crate) fn sort_text(&self) -> &str {
        self.sort.as_deref().unwrap_or_default()
    }
}
