//! Bind query string values to a handler's declared parameters.
use std::ops::Index;

use url::form_urlencoded;

/// Values bound to a handler's parameters, in declaration order.
///
/// Parameters are always strings. A parameter missing from the query
/// is bound to the empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct Arguments {
    names: Vec<&'static str>,
    values: Vec<String>,
}

impl Arguments {
    /// Value of the named parameter, empty if the name was not declared.
    pub fn get(&self, name: &str) -> &str {
        self.names
            .iter()
            .position(|n| *n == name)
            .map_or("", |i| self.values[i].as_str())
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.names
            .iter()
            .copied()
            .zip(self.values.iter().map(|v| &v[..]))
    }
}

impl Index<usize> for Arguments {
    type Output = str;
    fn index(&self, index: usize) -> &str {
        &self.values[index]
    }
}

/// Bind `query` against the parameter `names`. The first value for a name
/// wins, names match exactly and values are passed through decoded but
/// otherwise untouched.
///
/// # Example
/// ```
/// use speakerd::binder::bind;
///
/// let args = bind("floor=UP&text=Hello+world&floor=down", &["text", "floor", "voice"]);
/// assert_eq!(&args[0], "Hello world");
/// assert_eq!(&args[1], "UP");
/// assert_eq!(args.get("voice"), "");
/// ```
pub fn bind(query: &str, names: &[&'static str]) -> Arguments {
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    let values = names
        .iter()
        .map(|name| {
            pairs
                .iter()
                .find(|(key, _)| key.as_str() == *name)
                .map(|(_, value)| value.clone())
                .unwrap_or_default()
        })
        .collect();
    Arguments {
        names: names.to_vec(),
        values,
    }
}
