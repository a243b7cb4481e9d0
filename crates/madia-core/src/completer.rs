//! Incremental completion against a command tree.
//!
//! Given the text before the cursor, the completer walks the tree along every
//! fully typed word and offers candidates for the word being typed. Matching
//! is case-insensitive; invalid prefixes simply produce no candidates.

use std::sync::Arc;

use crate::tokenizer::TokenCache;
use crate::tree::{CommandMap, CommandTree, Node};

/// One completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Text to insert.
    pub text: String,
    /// Where the insertion starts relative to the cursor: `0` inserts at the
    /// cursor, `-n` replaces the last `n` characters.
    pub start_position: isize,
}

impl Completion {
    fn new(text: impl Into<String>, replaced: usize) -> Self {
        Self {
            text: text.into(),
            start_position: -isize::try_from(replaced).unwrap_or(isize::MAX),
        }
    }

    /// Number of characters before the cursor this candidate replaces.
    pub const fn replaced_len(&self) -> usize {
        self.start_position.unsigned_abs()
    }
}

/// Where the walk currently stands.
#[derive(Clone, Copy)]
enum Cursor<'t> {
    Map(&'t CommandMap),
    Node(&'t Node),
}

/// Tree-driven completer with a tokenizer cache.
#[derive(Debug)]
pub struct Completer {
    tree: Arc<CommandTree>,
    cache: TokenCache,
}

impl Completer {
    pub fn new(tree: Arc<CommandTree>) -> Self {
        Self {
            tree,
            cache: TokenCache::default(),
        }
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    /// Candidates for the word under the cursor, produced lazily.
    pub fn complete<'a>(
        &'a self,
        text_before_cursor: &str,
    ) -> Box<dyn Iterator<Item = Completion> + 'a> {
        let text = text_before_cursor.to_lowercase();

        let mut tokens = match self.cache.split(&text) {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::trace!(error = %e, "no completions for unparsable input");
                return Box::new(std::iter::empty());
            }
        };

        if text.trim().is_empty() || text.ends_with(char::is_whitespace) {
            tokens.push(String::new());
        }

        let Some((prefix, path)) = tokens.split_last() else {
            return Box::new(std::iter::empty());
        };

        let Some(cursor) = walk(&self.tree, path) else {
            return Box::new(std::iter::empty());
        };

        candidates(cursor, prefix.clone())
    }
}

/// Follow `path` down from the root. `None` when a word does not resolve.
fn walk<'t>(root: &'t CommandMap, path: &[String]) -> Option<Cursor<'t>> {
    let mut cursor = Cursor::Map(root);

    for word in path {
        let map = match cursor {
            Cursor::Map(map) => map,
            // Nothing below a bare handler, but the line is still valid.
            Cursor::Node(Node::Leaf(_)) => continue,
            Cursor::Node(Node::Branch(branch)) => &branch.children,
            Cursor::Node(Node::Choices(_)) => return None,
        };
        let (_, node) = map.lookup(word)?;
        cursor = Cursor::Node(node);
    }

    Some(cursor)
}

fn candidates(cursor: Cursor<'_>, prefix: String) -> Box<dyn Iterator<Item = Completion> + '_> {
    let replaced = prefix.chars().count();

    let map = match cursor {
        Cursor::Map(map) => map,
        Cursor::Node(Node::Branch(branch)) => &branch.children,
        Cursor::Node(Node::Leaf(_)) => return Box::new(std::iter::empty()),
        Cursor::Node(Node::Choices(values)) => {
            return Box::new(
                values
                    .iter()
                    .filter(move |value| value.to_lowercase().starts_with(&prefix))
                    .map(move |value| Completion::new(value.as_str(), replaced)),
            );
        }
    };

    // A fully typed name whose node is a value list: offer the values
    // themselves, inserted after the name.
    if let Some((_, Node::Choices(values))) = map.lookup(&prefix) {
        return Box::new(values.iter().map(|value| Completion::new(value.as_str(), 0)));
    }

    Box::new(
        map.names_with_prefix(&prefix)
            .map(move |name| Completion::new(name, replaced)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Branch;

    fn texts(completions: impl Iterator<Item = Completion>) -> Vec<(String, isize)> {
        completions.map(|c| (c.text, c.start_position)).collect()
    }

    fn tree() -> Arc<CommandTree> {
        Arc::new(
            CommandMap::new()
                .with(
                    "config",
                    Branch::new()
                        .cmd("config", |_| Ok(None))
                        .child(
                            "read",
                            Branch::new()
                                .child("all", Node::leaf("all", |_| Ok(None)))
                                .child("last_run", Node::leaf("last_run", |_| Ok(None))),
                        )
                        .child(
                            "set",
                            Branch::new().child("highlight", Node::choices(["on", "off"])),
                        ),
                )
                .with("ai", Node::leaf("ai", |_| Ok(None))),
        )
    }

    #[test]
    fn test_empty_input_lists_top_level() {
        let completer = Completer::new(tree());
        assert_eq!(
            texts(completer.complete("")),
            vec![("config".to_string(), 0), ("ai".to_string(), 0)]
        );
        assert_eq!(texts(completer.complete("  ")).len(), 2);
    }

    #[test]
    fn test_partial_word_replaces_prefix() {
        let completer = Completer::new(tree());
        assert_eq!(
            texts(completer.complete("conf")),
            vec![("config".to_string(), -4)]
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let completer = Completer::new(tree());
        assert_eq!(
            texts(completer.complete("CONFIG RE")),
            vec![("read".to_string(), -2)]
        );
    }

    #[test]
    fn test_trailing_space_descends() {
        let completer = Completer::new(tree());
        assert_eq!(
            texts(completer.complete("config read ")),
            vec![("all".to_string(), 0), ("last_run".to_string(), 0)]
        );
    }

    #[test]
    fn test_invalid_prefix_yields_nothing() {
        let completer = Completer::new(tree());
        assert_eq!(completer.complete("nope ").count(), 0);
        assert_eq!(completer.complete("config nope al").count(), 0);
    }

    #[test]
    fn test_choice_list_offered_after_exact_name() {
        let completer = Completer::new(tree());
        assert_eq!(
            texts(completer.complete("config set highlight")),
            vec![("on".to_string(), 0), ("off".to_string(), 0)]
        );
    }

    #[test]
    fn test_choice_values_filtered_inside_list() {
        let completer = Completer::new(tree());
        assert_eq!(
            texts(completer.complete("config set highlight o")),
            vec![("on".to_string(), -1), ("off".to_string(), -1)]
        );
        assert_eq!(
            texts(completer.complete("config set highlight of")),
            vec![("off".to_string(), -2)]
        );
    }

    #[test]
    fn test_nothing_below_a_bare_leaf() {
        let completer = Completer::new(tree());
        assert_eq!(completer.complete("ai ").count(), 0);
        assert_eq!(completer.complete("ai some words ").count(), 0);
    }

    #[test]
    fn test_unterminated_quote_still_completes() {
        let completer = Completer::new(tree());
        assert_eq!(
            texts(completer.complete("config \"re")),
            vec![("read".to_string(), -2)]
        );
        assert_eq!(completer.complete("ai \"half typed").count(), 0);
    }

    #[test]
    fn test_dangling_escape_yields_nothing() {
        let completer = Completer::new(tree());
        assert_eq!(completer.complete("config \\").count(), 0);
    }

    #[test]
    fn test_replaced_len() {
        let completion = Completion::new("config", 4);
        assert_eq!(completion.replaced_len(), 4);
        assert_eq!(Completion::new("x", 0).replaced_len(), 0);
    }
}
