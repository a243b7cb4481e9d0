//! Command tree model.
//!
//! A tree is a mapping from command names to [`Node`]s. A node is one of:
//!
//! - [`Node::Leaf`]: a bare handler with no metadata and no children
//! - [`Node::Branch`]: an optional handler plus metadata and subcommands
//! - [`Node::Choices`]: a fixed list of literal values offered by completion
//!
//! The tree is built once before the REPL starts and is only read afterwards.
//! Handlers may carry their own private state; the tree never touches it.

mod help;
mod node;

pub use help::{render_help, render_tree_help};
pub use node::{Branch, Handler, HandlerFn, HandlerResult, Node, NodeMeta};

use indexmap::IndexMap;

/// The root of a command tree. Same shape as a branch's children.
pub type CommandTree = CommandMap;

/// Ordered mapping from command name to node.
///
/// Keys are unique and keep their insertion order, which is also the order
/// used for completion candidates and help output. Lookups are
/// case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct CommandMap {
    entries: IndexMap<String, Node>,
}

impl CommandMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, node: impl Into<Node>) -> Self {
        self.insert(name, node);
        self
    }

    /// Insert or replace the node stored under `name`.
    pub fn insert(&mut self, name: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        self.entries.insert(name.into(), node.into())
    }

    /// Exact, case-sensitive key lookup.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.entries.get(name)
    }

    /// Resolve a typed token to a child.
    ///
    /// Tries the exact key first, then a case-insensitive key match, then a
    /// case-insensitive match against branch aliases. Returns the canonical
    /// key together with the node.
    pub fn lookup(&self, token: &str) -> Option<(&str, &Node)> {
        if let Some((key, node)) = self.entries.get_key_value(token) {
            return Some((key.as_str(), node));
        }

        let lowered = token.to_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| key.to_lowercase() == lowered)
            .or_else(|| {
                self.entries.iter().find(|(_, node)| {
                    node.meta().is_some_and(|meta| {
                        meta.aliases.iter().any(|a| a.to_lowercase() == lowered)
                    })
                })
            })
            .map(|(key, node)| (key.as_str(), node))
    }

    /// Names starting with `prefix`, compared case-insensitively, in
    /// insertion order. Aliases are not offered.
    pub fn names_with_prefix<'a>(&'a self, prefix: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        let lowered = prefix.to_lowercase();
        self.entries
            .keys()
            .filter(move |key| key.to_lowercase().starts_with(&lowered))
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, N: Into<Node>> FromIterator<(K, N)> for CommandMap {
    fn from_iter<I: IntoIterator<Item = (K, N)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, node) in iter {
            map.insert(name, node);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CommandMap {
        CommandMap::new()
            .with("Config", Branch::new().alias("cfg"))
            .with("ai", Node::leaf("ai", |_| Ok(None)))
            .with("airline", Node::choices(["a", "b"]))
    }

    #[test]
    fn test_lookup_exact_then_case_insensitive() {
        let map = sample();
        assert_eq!(map.lookup("ai").map(|(k, _)| k), Some("ai"));
        assert_eq!(map.lookup("config").map(|(k, _)| k), Some("Config"));
        assert_eq!(map.lookup("AI").map(|(k, _)| k), Some("ai"));
        assert!(map.lookup("nope").is_none());
    }

    #[test]
    fn test_lookup_by_alias() {
        let map = sample();
        assert_eq!(map.lookup("CFG").map(|(k, _)| k), Some("Config"));
    }

    #[test]
    fn test_names_with_prefix_keeps_order_and_skips_aliases() {
        let map = sample();
        let names: Vec<_> = map.names_with_prefix("ai").collect();
        assert_eq!(names, vec!["ai", "airline"]);
        assert_eq!(map.names_with_prefix("").count(), 3);
        assert_eq!(map.names_with_prefix("cf").count(), 0);
    }

    #[test]
    fn test_insert_replaces_existing_name() {
        let mut map = sample();
        let previous = map.insert("ai", Node::choices(["x"]));
        assert!(previous.is_some());
        assert_eq!(map.len(), 3);
        assert!(matches!(map.get("ai"), Some(Node::Choices(_))));
    }

    #[test]
    fn test_from_iterator() {
        let map: CommandMap = [("one", Node::choices(["1"])), ("two", Node::choices(["2"]))]
            .into_iter()
            .collect();
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["one", "two"]);
    }
}
