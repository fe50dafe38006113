use chrono::NaiveDate;
use url::form_urlencoded;

/// A value that may or may not end up in a query string.
///
/// `None` and empty strings are left out entirely; everything else is sent as is.
pub trait QueryValue {
    fn to_query_value(&self) -> Option<String>;
}

impl QueryValue for str {
    fn to_query_value(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.to_string())
    }
}

impl QueryValue for String {
    fn to_query_value(&self) -> Option<String> {
        self.as_str().to_query_value()
    }
}

impl QueryValue for bool {
    fn to_query_value(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl QueryValue for NaiveDate {
    fn to_query_value(&self) -> Option<String> {
        Some(self.format("%Y-%m-%d").to_string())
    }
}

macro_rules! numeric_query_value {
    ($($t:ty),*) => {
        $(impl QueryValue for $t {
            fn to_query_value(&self) -> Option<String> {
                Some(self.to_string())
            }
        })*
    };
}

numeric_query_value!(u32, u64, i32, i64, f64);

impl<T: QueryValue + ?Sized> QueryValue for &T {
    fn to_query_value(&self) -> Option<String> {
        (**self).to_query_value()
    }
}

impl<T: QueryValue> QueryValue for Option<T> {
    fn to_query_value(&self) -> Option<String> {
        self.as_ref().and_then(QueryValue::to_query_value)
    }
}

/// Ordered query-string parameters for list and filter endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key` unless `value` is absent or empty.
    pub fn with(mut self, key: &str, value: impl QueryValue) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: &str, value: impl QueryValue) {
        if let Some(value) = value.to_query_value() {
            self.0.push((key.to_string(), value));
        }
    }

    pub fn page(self, page: u32, limit: u32) -> Self {
        self.with("page", page).with("limit", limit)
    }

    /// Parse `key=value` pairs as typed on the command line.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Self {
        let mut params = Self::new();
        for pair in pairs {
            match pair.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => params.push(key.trim(), value),
                _ => {}
            }
        }
        params
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Stable text form, used in cache keys. Form-encoded, so distinct
    /// parameter lists never share a segment.
    pub fn to_key_segment(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}
