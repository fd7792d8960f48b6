// src/filter/params.rs
use std::collections::HashMap;

/// Lookup surface the decoder reads from. Repeated parameters use the
/// `name[]` wire key; `get_all` takes the bare name.
pub trait ParamSource {
    /// First value bound to a scalar key.
    fn get(&self, name: &str) -> Option<&str>;

    /// Every value bound to `name[]`, in URL order.
    fn get_all(&self, name: &str) -> Vec<&str>;

    fn path_param(&self, name: &str) -> Option<&str>;
}

/// Ordered multi-map of query parameters plus the route's path parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    pairs: Vec<(String, String)>,
    path: HashMap<String, String>,
}

impl RawQuery {
    /// Parse an `application/x-www-form-urlencoded` query string.
    /// A leading `?` is tolerated.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Self {
            pairs,
            path: HashMap::new(),
        }
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            path: HashMap::new(),
        }
    }

    pub fn with_path_param(mut self, name: &str, value: &str) -> Self {
        self.path.insert(name.to_string(), value.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl ParamSource for RawQuery {
    fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn get_all(&self, name: &str) -> Vec<&str> {
        let key = format!("{}[]", name);
        self.pairs
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    fn path_param(&self, name: &str) -> Option<&str> {
        self.path.get(name).map(String::as_str)
    }
}
