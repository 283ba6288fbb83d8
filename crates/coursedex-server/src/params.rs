//! Request parameters and link building.

use serde_json::{Map, Value};
use url::form_urlencoded;

/// Ordered request parameters. Names may repeat.
#[derive(Debug, Clone, Default)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// Append the members of a JSON body. Arrays contribute one pair per
    /// element and `null` contributes nothing.
    pub fn extend_from_json(&mut self, body: Map<String, Value>) {
        for (name, value) in body {
            match value {
                Value::Array(items) => {
                    for item in items {
                        if let Some(text) = scalar(item) {
                            self.0.push((name.clone(), text));
                        }
                    }
                }
                other => {
                    if let Some(text) = scalar(other) {
                        self.0.push((name, text));
                    }
                }
            }
        }
    }

    /// First value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// First value of `name`, trimmed, or `None` when blank.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Every value of `name`.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value of `name`, split on commas, without blanks.
    pub fn list(&self, name: &str) -> Vec<String> {
        self.get_all(name)
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// `1` and `true` are truthy.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name)
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true"))
    }

    /// Absolute URL of `path` with these parameters, minus every `drop`
    /// name, plus `add`.
    pub fn url(&self, base: &str, path: &str, drop: &[&str], add: &[(&str, &str)]) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.0 {
            if !drop.contains(&name.as_str()) {
                query.append_pair(name, value);
            }
        }
        for (name, value) in add {
            query.append_pair(name, value);
        }
        let query = query.finish();

        let base = base.trim_end_matches('/');
        if query.is_empty() {
            format!("{base}{path}")
        } else {
            format!("{base}{path}?{query}")
        }
    }
}

fn scalar(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
