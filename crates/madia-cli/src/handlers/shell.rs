//! `shell`: a nested REPL over the notes commands.
//!
//! Inside it, lines that are not `add`, `list` or `clear` are saved as notes.
//! `exit` returns to the outer prompt. The nested REPL keeps its own history
//! file, keyed by its prompt and fallback handler.

use std::sync::Arc;

use madia_core::{Dispatcher, Node, history_file};

use super::HandlerContext;
use super::notes::{NoteBook, add_handler, commands};
use crate::repl::{HistoryMode, Repl, ReplOptions};

pub const NOTES_PROMPT: &str = "notes >> ";

pub(super) fn leaf(ctx: &HandlerContext) -> Node {
    let ctx = ctx.clone();
    Node::leaf("notes_shell", move |_| {
        let repl = notes_repl(&ctx);
        repl.run()?;
        Ok(Some(format!("Back from the notes shell, {} notes kept.", ctx.notes.len())))
    })
}

/// The nested REPL, wired to the shared notebook and output switches.
pub fn notes_repl(ctx: &HandlerContext) -> Repl {
    Repl::new(notes_dispatcher(&ctx.notes), notes_options(ctx))
}

fn notes_dispatcher(book: &Arc<NoteBook>) -> Dispatcher {
    Dispatcher::new(Arc::new(commands(book))).with_default(add_handler(book))
}

fn notes_options(ctx: &HandlerContext) -> ReplOptions {
    let history = ctx.history_dir.as_ref().map_or(HistoryMode::InMemory, |dir| {
        HistoryMode::File(history_file(dir, NOTES_PROMPT, Some("notes_add")))
    });
    ReplOptions::new(NOTES_PROMPT)
        .with_history(history)
        .with_prefs(Arc::clone(&ctx.prefs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support;
    use crate::repl::{LineSource, ReadOutcome};
    use std::collections::VecDeque;

    struct Lines(VecDeque<&'static str>);

    impl LineSource for Lines {
        fn read_line(&mut self, _prompt: &str) -> anyhow::Result<ReadOutcome> {
            Ok(self
                .0
                .pop_front()
                .map_or(ReadOutcome::Eof, |l| ReadOutcome::Line(l.to_string())))
        }

        fn add_history(&mut self, _line: &str) {}
    }

    #[test]
    fn test_free_text_becomes_a_note() {
        let (_temp, ctx) = test_support::context();
        let repl = notes_repl(&ctx);
        let mut out = Vec::new();

        repl.run_with(
            &mut Lines(VecDeque::from(["call the bank", "add water plants", "list", "exit"])),
            &mut out,
            None,
        )
        .unwrap();

        assert_eq!(ctx.notes.len(), 2);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1. call the bank\n2. water plants"));
    }

    #[test]
    fn test_history_file_depends_on_dir() {
        let (temp, mut ctx) = test_support::context();
        assert_eq!(notes_options(&ctx).history, HistoryMode::InMemory);

        ctx.history_dir = Some(temp.path().join("history"));
        let HistoryMode::File(path) = notes_options(&ctx).history else {
            panic!("expected a history file");
        };
        assert!(path.starts_with(temp.path().join("history")));
        assert_eq!(notes_options(&ctx).prompt, NOTES_PROMPT);
    }
}
