//! Session scratchpad: `notes add|list|clear`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use madia_core::{Branch, CommandMap, Handler, Node};

/// Notes kept for the life of the process.
#[derive(Debug, Default)]
pub struct NoteBook {
    notes: Mutex<Vec<String>>,
}

impl NoteBook {
    /// Store a note; returns its 1-based number.
    pub fn add(&self, text: &str) -> Option<usize> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let mut notes = self.lock();
        notes.push(text.to_string());
        Some(notes.len())
    }

    pub fn list(&self) -> Option<String> {
        let notes = self.lock();
        if notes.is_empty() {
            return None;
        }
        Some(
            notes
                .iter()
                .enumerate()
                .map(|(i, note)| format!("{}. {note}", i + 1))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    pub fn clear(&self) -> usize {
        let mut notes = self.lock();
        let count = notes.len();
        notes.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.notes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn add_handler(book: &Arc<NoteBook>) -> Handler {
    let book = Arc::clone(book);
    Handler::new("notes_add", move |args| {
        Ok(Some(match book.add(args) {
            Some(n) => format!("Saved note {n}."),
            None => "Nothing to save.".to_string(),
        }))
    })
}

fn list_handler(book: &Arc<NoteBook>) -> Handler {
    let book = Arc::clone(book);
    Handler::new("notes_list", move |_| Ok(book.list()))
}

fn clear_handler(book: &Arc<NoteBook>) -> Handler {
    let book = Arc::clone(book);
    Handler::new("notes_clear", move |_| {
        Ok(Some(format!("Removed {} notes.", book.clear())))
    })
}

/// `add`, `list` and `clear` as a standalone map, for the notes shell.
pub fn commands(book: &Arc<NoteBook>) -> CommandMap {
    CommandMap::new()
        .with("add", Node::from(add_handler(book)))
        .with("list", Node::from(list_handler(book)))
        .with("clear", Node::from(clear_handler(book)))
}

pub(super) fn branch(book: &Arc<NoteBook>) -> Branch {
    let mut branch = Branch::new()
        .name("Notes")
        .short_help("Session scratchpad")
        .help("notes add <text> | notes list | notes clear")
        .handler(list_handler(book));
    branch.children = commands(book);
    branch
}
