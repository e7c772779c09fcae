use serde::{Deserialize, Serialize};

use crate::KeyValue;

/// Ordered environment passed to an external tool.
///
/// Duplicate keys are allowed; lookups resolve to the last entry so that
/// merging is plain concatenation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Env(pub Vec<KeyValue>);

impl Env {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
        self.0.iter()
    }

    /// Value of the last entry named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|kv| kv.key() == key)
            .map(|kv| kv.value())
    }

    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.push(KeyValue::new(key, value));
    }

    /// `self` followed by `other`; entries in `other` win on lookup.
    pub fn merged(&self, other: &Env) -> Env {
        let mut out = self.0.clone();
        out.extend(other.0.iter().cloned());
        Env(out)
    }
}

impl FromIterator<KeyValue> for Env {
    fn from_iter<I: IntoIterator<Item = KeyValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::Env;
    use crate::KeyValue;

    #[test]
    fn last_entry_wins() {
        let mut env = Env::new();
        env.push("SINGULARITY_TMPDIR", "/tmp");
        env.push("SINGULARITY_TMPDIR", "/scratch");

        assert_eq!(env.len(), 2);
        assert_eq!(env.get("SINGULARITY_TMPDIR"), Some("/scratch"));
        assert!(env.get("MISSING").is_none());
    }

    #[test]
    fn merged_prefers_other() {
        let mut base = Env::new();
        base.push("A", "base");
        base.push("B", "kept");

        let mut over = Env::new();
        over.push("A", "override");

        let merged = base.merged(&over);
        assert_eq!(merged.get("A"), Some("override"));
        assert_eq!(merged.get("B"), Some("kept"));
        assert_eq!(base.get("A"), Some("base"));
    }

    #[test]
    fn collects_from_key_values() {
        let env: Env = ["X=1", "Y=2"]
            .iter()
            .filter_map(|s| KeyValue::parse_assignment(s))
            .collect();
        assert_eq!(env.get("Y"), Some("2"));
    }

    #[test]
    fn serializes_as_array() {
        let mut env = Env::new();
        env.push("A", "1");
        let json = serde_json::to_string(&env).unwrap();
        assert!(json.starts_with('['));

        let back: Env = serde_json::from_str(&json).unwrap();
        assert_eq!(back, env);
    }
}
