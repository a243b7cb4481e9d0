//! `config` commands: inspect and change persisted settings, view logs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::Utc;
use madia_core::{Branch, Handler, Node, SettingsStore, SettingsUpdate};

use super::{HandlerContext, parse_switch};
use crate::presentation::OutputPrefs;

const DEFAULT_LOG_LINES: usize = 20;

const SET_USAGE: &str =
    "Usage: config set <highlight|history|print_result> <on|off> | config set prompt <text>";

pub(super) fn branch(ctx: &HandlerContext) -> Branch {
    Branch::new()
        .name("Config")
        .short_help("Inspect and change settings")
        .description("Settings are stored as YAML in the data directory.")
        .alias("cfg")
        .handler(read_all_handler(&ctx.store, "config"))
        .child("read", read_branch(&ctx.store))
        .child("set", set_branch(ctx))
        .child("logs", logs_leaf(ctx))
}

fn read_all_handler(store: &Arc<SettingsStore>, name: &str) -> Handler {
    let store = Arc::clone(store);
    Handler::new(name, move |_| read_all(&store).map(Some))
}

fn read_branch(store: &Arc<SettingsStore>) -> Branch {
    let last_run = Arc::clone(store);
    let path = Arc::clone(store);

    Branch::new()
        .short_help("Show settings")
        .handler(read_all_handler(store, "read_all"))
        .child("all", Node::from(read_all_handler(store, "read_all")))
        .child(
            "last_run",
            Node::leaf("read_last_run", move |_| Ok(Some(read_last_run(&last_run)))),
        )
        .child(
            "path",
            Node::leaf("read_path", move |_| {
                Ok(Some(path.path().display().to_string()))
            }),
        )
}

fn set_branch(ctx: &HandlerContext) -> Branch {
    let store = Arc::clone(&ctx.store);
    let prefs = Arc::clone(&ctx.prefs);
    let touch = Arc::clone(&ctx.store);

    Branch::new()
        .short_help("Change a setting")
        .help(SET_USAGE)
        .cmd("set", move |args| set(&store, &prefs, args).map(Some))
        .child(
            "last_run",
            Node::leaf("set_last_run", move |_| {
                let settings = touch.touch_last_run(Utc::now())?;
                Ok(settings.last_run.map(|t| format!("last_run set to {}", t.to_rfc3339())))
            }),
        )
        .child("highlight", Node::choices(["on", "off"]))
        .child("history", Node::choices(["on", "off"]))
        .child("print_result", Node::choices(["on", "off"]))
        .child("prompt", Branch::new().short_help("Prompt for new sessions"))
}

fn logs_leaf(ctx: &HandlerContext) -> Node {
    let dir = ctx.log_dir.clone();
    let prefix = ctx.log_prefix.clone();
    Node::leaf("logs", move |args| show_logs(&dir, &prefix, args).map(Some))
}

/// All settings as YAML.
pub fn read_all(store: &SettingsStore) -> Result<String> {
    Ok(store.to_yaml()?.trim_end().to_string())
}

pub fn read_last_run(store: &SettingsStore) -> String {
    store.get().last_run.map_or_else(
        || "last_run has not been recorded yet".to_string(),
        |t| t.to_rfc3339(),
    )
}

/// Apply `config set <key> <value>`.
///
/// Display switches take effect immediately; prompt and history apply to
/// the next session.
pub fn set(store: &SettingsStore, prefs: &OutputPrefs, args: &str) -> Result<String> {
    let mut words = args.splitn(2, ' ');
    let key = words.next().unwrap_or_default();
    let value = words.next().map(str::trim).unwrap_or_default();

    if key.is_empty() {
        return Ok(SET_USAGE.to_string());
    }
    if value.is_empty() {
        anyhow::bail!("missing value for '{key}'. {SET_USAGE}");
    }

    let mut update = SettingsUpdate::default();
    let next_session = match key {
        "highlight" => {
            update.highlight_code = Some(Some(parse_switch(value)?));
            false
        }
        "print_result" => {
            update.print_result = Some(Some(parse_switch(value)?));
            false
        }
        "history" => {
            update.persist_history = Some(Some(parse_switch(value)?));
            true
        }
        "prompt" => {
            update.prompt = Some(Some(format!("{value} ")));
            true
        }
        other => anyhow::bail!("unknown setting '{other}'. {SET_USAGE}"),
    };

    let settings = store.update(&update)?;
    prefs.set_highlight(settings.effective_highlight_code());
    prefs.set_print(settings.effective_print_result());
    tracing::info!(key, value, "setting changed");

    Ok(if next_session {
        format!("{key} set to '{value}' (applies to new sessions)")
    } else {
        format!("{key} set to '{value}'")
    })
}

/// Last lines of the newest log file; `args` may give the line count.
pub fn show_logs(dir: &Path, prefix: &str, args: &str) -> Result<String> {
    let lines = match args.trim() {
        "" => DEFAULT_LOG_LINES,
        n => n
            .parse()
            .with_context(|| format!("line count must be a number, got '{n}'"))?,
    };

    let Some(path) = newest_log(dir, prefix)
        .with_context(|| format!("Failed to list {}", dir.display()))?
    else {
        return Ok(format!("No log files in {}", dir.display()));
    };

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(format!("{}\n{}", path.display(), tail(&contents, lines)))
}

/// Most recently modified file in `dir` whose name starts with `prefix`.
fn newest_log(dir: &Path, prefix: &str) -> io::Result<Option<PathBuf>> {
    if !dir.exists() {
        return Ok(None);
    }

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(prefix));
        if !matches || !entry.file_type()?.is_file() {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        if newest.as_ref().is_none_or(|(time, _)| modified >= *time) {
            newest = Some((modified, entry.path()));
        }
    }
    Ok(newest.map(|(_, path)| path))
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}
