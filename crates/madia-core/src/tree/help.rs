//! Recursive help dump for the `?` command.

use super::{CommandMap, Node};

const NO_NAME: &str = "No name available.";
const NO_HELP: &str = "No help available.";
const NO_DESCRIPTION: &str = "No description available.";

/// Render help for `node` (stored under `key`) and all of its descendants.
pub fn render_help(key: &str, node: &Node) -> String {
    let mut lines = Vec::new();
    push_node(&mut lines, key, node, 1);
    lines.join("\n")
}

/// Render help for every top-level command of a tree.
pub fn render_tree_help(tree: &CommandMap) -> String {
    let mut lines = vec!["--- Help [] ---".to_string(), "Children:".to_string()];
    for (key, node) in tree.iter() {
        push_node(&mut lines, key, node, 1);
    }
    lines.join("\n")
}

fn push_node(lines: &mut Vec<String>, key: &str, node: &Node, depth: usize) {
    let pad = "| ".repeat(depth);
    let meta = node.meta();
    let field = |value: Option<&String>, fallback: &'static str| {
        value.map_or(fallback, String::as_str).to_string()
    };

    lines.push(format!("{pad}--- Help [{key}] ---"));
    lines.push(format!(
        "{pad}Name: {}",
        field(meta.and_then(|m| m.name.as_ref()), NO_NAME)
    ));
    lines.push(format!(
        "{pad}Short Help: {}",
        field(meta.and_then(|m| m.short_help.as_ref()), NO_HELP)
    ));
    lines.push(format!(
        "{pad}Help: {}",
        field(meta.and_then(|m| m.help.as_ref()), NO_HELP)
    ));
    lines.push(format!(
        "{pad}Description: {}",
        field(meta.and_then(|m| m.description.as_ref()), NO_DESCRIPTION)
    ));

    if let Some(aliases) = meta.map(|m| &m.aliases).filter(|a| !a.is_empty()) {
        lines.push(format!("{pad}Aliases: {}", aliases.join(", ")));
    }

    match node {
        Node::Choices(values) => {
            lines.push(format!("{pad}Choices: {}", values.join(", ")));
        }
        Node::Leaf(_) | Node::Branch(_) => {
            lines.push(format!("{pad}Children:"));
            if let Some(children) = node.children() {
                for (child_key, child) in children.iter() {
                    push_node(lines, child_key, child, depth + 1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Branch;

    #[test]
    fn test_render_help_nests_children() {
        let node: Node = Branch::new()
            .name("config")
            .short_help("Config base")
            .child("read", Branch::new().help("Base for read commands"))
            .into();

        let text = render_help("config", &node);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "| --- Help [config] ---");
        assert_eq!(lines[1], "| Name: config");
        assert_eq!(lines[2], "| Short Help: Config base");
        assert_eq!(lines[3], "| Help: No help available.");
        assert_eq!(lines[4], "| Description: No description available.");
        assert_eq!(lines[5], "| Children:");
        assert_eq!(lines[6], "| | --- Help [read] ---");
        assert!(text.contains("| | Help: Base for read commands"));
    }

    #[test]
    fn test_render_help_for_leaf_uses_placeholders() {
        let node = Node::leaf("f", |_| Ok(None));
        let text = render_help("f", &node);
        assert!(text.contains("| Name: No name available."));
        assert!(text.ends_with("| Children:"));
    }

    #[test]
    fn test_render_help_lists_choices() {
        let text = render_help("highlight", &Node::choices(["on", "off"]));
        assert!(text.ends_with("| Choices: on, off"));
    }

    #[test]
    fn test_render_tree_help_lists_top_level() {
        let tree = CommandMap::new()
            .with("ai", Node::leaf("ai", |_| Ok(None)))
            .with("config", Branch::new());
        let text = render_tree_help(&tree);
        assert!(text.starts_with("--- Help [] ---\nChildren:"));
        assert!(text.contains("| --- Help [ai] ---"));
        assert!(text.contains("| --- Help [config] ---"));
    }
}
