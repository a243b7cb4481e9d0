use std::fmt;
use std::sync::Arc;

use super::CommandMap;

/// What a leaf handler returns: some text to present, nothing, or a fault.
pub type HandlerResult = anyhow::Result<Option<String>>;

/// Signature of a leaf handler. It always receives exactly one argument:
/// the unconsumed tokens joined by single spaces.
pub type HandlerFn = dyn Fn(&str) -> HandlerResult + Send + Sync;

/// A named, shareable leaf handler.
///
/// Fixed configuration (a system prompt, a settings store) is bound by
/// capturing it in the closure when the tree is built.
#[derive(Clone)]
pub struct Handler {
    name: Arc<str>,
    func: Arc<HandlerFn>,
}

impl Handler {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            func: Arc::new(func),
        }
    }

    /// Invoke the handler with the joined argument string.
    pub fn call(&self, args: &str) -> HandlerResult {
        (self.func)(args)
    }

    /// Name used in logs and for deriving history file names.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.name).finish()
    }
}

/// Descriptive metadata. Only `aliases` influences matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMeta {
    pub name: Option<String>,
    pub short_help: Option<String>,
    pub help: Option<String>,
    pub description: Option<String>,
    pub aliases: Vec<String>,
}

/// A command with an optional handler, metadata, and subcommands.
///
/// When a branch has both a handler and children, children take precedence
/// during dispatch; the branch's own handler is the fallback.
#[derive(Debug, Clone, Default)]
pub struct Branch {
    pub handler: Option<Handler>,
    pub children: CommandMap,
    pub meta: NodeMeta,
}

impl Branch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cmd<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> HandlerResult + Send + Sync + 'static,
    {
        self.handler = Some(Handler::new(name, func));
        self
    }

    #[must_use]
    pub fn handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    #[must_use]
    pub fn child(mut self, name: impl Into<String>, node: impl Into<Node>) -> Self {
        self.children.insert(name, node);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.meta.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn short_help(mut self, text: impl Into<String>) -> Self {
        self.meta.short_help = Some(text.into());
        self
    }

    #[must_use]
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.meta.help = Some(text.into());
        self
    }

    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.meta.description = Some(text.into());
        self
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.meta.aliases.push(alias.into());
        self
    }
}

/// One entry of the command tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// Bare handler: callable, no metadata, no children.
    Leaf(Handler),
    /// Handler and/or subcommands plus metadata.
    Branch(Branch),
    /// Literal values offered by completion. Never callable.
    Choices(Vec<String>),
}

impl Node {
    pub fn leaf<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> HandlerResult + Send + Sync + 'static,
    {
        Self::Leaf(Handler::new(name, func))
    }

    pub fn choices<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choices(values.into_iter().map(Into::into).collect())
    }

    /// The handler this node resolves to, if any.
    pub fn handler(&self) -> Option<&Handler> {
        match self {
            Self::Leaf(handler) => Some(handler),
            Self::Branch(branch) => branch.handler.as_ref(),
            Self::Choices(_) => None,
        }
    }

    /// Subcommands. Leaves and choice lists have none.
    pub fn children(&self) -> Option<&CommandMap> {
        match self {
            Self::Branch(branch) => Some(&branch.children),
            Self::Leaf(_) | Self::Choices(_) => None,
        }
    }

    pub fn meta(&self) -> Option<&NodeMeta> {
        match self {
            Self::Branch(branch) => Some(&branch.meta),
            Self::Leaf(_) | Self::Choices(_) => None,
        }
    }

    pub const fn is_callable(&self) -> bool {
        match self {
            Self::Leaf(_) => true,
            Self::Branch(branch) => branch.handler.is_some(),
            Self::Choices(_) => false,
        }
    }
}

impl From<Branch> for Node {
    fn from(branch: Branch) -> Self {
        Self::Branch(branch)
    }
}

impl From<Handler> for Node {
    fn from(handler: Handler) -> Self {
        Self::Leaf(handler)
    }
}
