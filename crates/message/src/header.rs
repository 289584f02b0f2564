//! Case-normalized header collection.
//!
//! Header names are stored and looked up case-insensitively but
//! case-preservingly: the canonical form (`X-Foo-Bar`) is the lookup key,
//! while the first casing ever supplied for a canonical key is what
//! enumeration yields. Insertion order within a name is significant and
//! preserved; order across names is preserved for enumeration.

use std::fmt;

/// Returns the canonical form of a header name.
///
/// The name is split on `-`, each segment lower-cased with its first ASCII
/// letter capitalized, and rejoined: `"x-foo-BAR"` becomes `"X-Foo-Bar"`.
/// The function is idempotent.
pub fn canonicalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, segment) in name.split('-').enumerate() {
        if i > 0 {
            out.push('-');
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars.map(|c| c.to_ascii_lowercase()));
        }
    }
    out
}

/// One or more header field values.
///
/// Exists so header mutators accept a single value or a list with the same
/// signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValues(Vec<String>);

impl FieldValues {
    fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for FieldValues {
    fn from(value: &str) -> Self {
        Self(vec![value.to_owned()])
    }
}

impl From<String> for FieldValues {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<String>> for FieldValues {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<&[&str]> for FieldValues {
    fn from(values: &[&str]) -> Self {
        Self(values.iter().map(|&v| v.to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FieldValues {
    fn from(values: [&str; N]) -> Self {
        Self(values.iter().map(|&v| v.to_owned()).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    canonical: String,
    original: String,
    values: Vec<String>,
}

/// Ordered mapping from canonical header name to a value sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<Entry>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, canonical: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.canonical == canonical)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(&canonicalize(name)).is_some()
    }

    /// Returns the value sequence for `name`, or an empty slice if absent.
    pub fn get(&self, name: &str) -> &[String] {
        self.position(&canonicalize(name)).map_or(&[], |i| self.entries[i].values.as_slice())
    }

    /// Returns the values for `name` joined with `,`, empty string if absent.
    pub fn line(&self, name: &str) -> String {
        self.get(name).join(",")
    }

    /// Appends `values` to the entry for `name`, creating it if absent.
    ///
    /// An existing entry keeps its first-seen original casing.
    pub fn insert(&mut self, name: &str, values: impl Into<FieldValues>) {
        let canonical = canonicalize(name);
        let values = values.into().into_vec();
        match self.position(&canonical) {
            Some(i) => self.entries[i].values.extend(values),
            None => self.entries.push(Entry { canonical, original: name.to_owned(), values }),
        }
    }

    /// Removes any entry for `name` and re-adds it at the end with `values`.
    ///
    /// The supplied casing becomes the stored original name.
    pub fn replace(&mut self, name: &str, values: impl Into<FieldValues>) {
        self.remove(name);
        self.insert(name, values);
    }

    /// Removes all trace of the entry for `name`. Returns whether one existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let canonical = canonicalize(name);
        match self.position(&canonical) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    /// Enumerates `(original name, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|entry| (entry.original.as_str(), entry.values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: AsRef<str>, V: Into<FieldValues>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, values) in iter {
            headers.insert(name.as_ref(), values);
        }
        headers
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, values) in self.iter() {
            writeln!(f, "{name}: {}", values.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_normalizes_casing() {
        assert_eq!(canonicalize("x-foo-BAR"), "X-Foo-Bar");
        assert_eq!(canonicalize("CONTENT-TYPE"), "Content-Type");
        assert_eq!(canonicalize("content-type"), "Content-Type");
        assert_eq!(canonicalize("host"), "Host");
    }

    #[test]
    fn canonicalize_is_idempotent() {
        for name in ["x-foo-BAR", "Content-Type", "hOsT", "--", "a--b"] {
            let once = canonicalize(name);
            assert_eq!(canonicalize(&once), once);
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut headers = Headers::new();
        headers.insert("HeaderName", "value");

        assert!(headers.contains("hEaDeRnAMe"));
        assert_eq!(headers.get("headername"), ["value"]);
        assert_eq!(headers.line("HEADERNAME"), "value");
    }

    #[test]
    fn absent_name_yields_empty() {
        let headers = Headers::new();
        assert!(!headers.contains("X-Missing"));
        assert!(headers.get("X-Missing").is_empty());
        assert_eq!(headers.line("X-Missing"), "");
    }

    #[test]
    fn insert_appends_values_in_order() {
        let mut headers = Headers::new();
        headers.insert("X-Test", "v1");
        headers.insert("x-test", "v2");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.line("X-Test"), "v1,v2");
    }

    #[test]
    fn first_seen_casing_wins_enumeration() {
        let mut headers = Headers::new();
        headers.insert("x-custom", "a");
        headers.insert("X-CUSTOM", "b");
        headers.insert("Accept", "*/*");

        let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["x-custom", "Accept"]);
    }

    #[test]
    fn replace_adopts_new_casing_at_the_end() {
        let mut headers = Headers::new();
        headers.insert("x-one", "1");
        headers.insert("x-two", "2");
        headers.replace("X-ONE", ["a", "b"]);

        let collected: Vec<(&str, &[String])> = headers.iter().collect();
        assert_eq!(collected[0].0, "x-two");
        assert_eq!(collected[1].0, "X-ONE");
        assert_eq!(headers.line("x-one"), "a,b");
    }

    #[test]
    fn remove_erases_all_trace() {
        let mut headers = Headers::new();
        headers.insert("X-Gone", "v");

        assert!(headers.remove("x-gone"));
        assert!(!headers.contains("X-Gone"));
        assert!(headers.is_empty());
        assert!(!headers.remove("x-gone"));
    }

    #[test]
    fn from_iterator_collects_pairs() {
        let headers: Headers = [("Content-Type", "text/plain"), ("X-Id", "42")].into_iter().collect();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.line("content-type"), "text/plain");
    }
}
