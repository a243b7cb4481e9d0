//! End-to-end checks of completion and dispatch over a realistic tree.
//!
//! The tree mirrors the shape of the built-in shell commands: nested
//! branches, branches that carry their own handler, aliases, value lists and
//! bare leaves several levels deep.

use std::sync::{Arc, Mutex};

use madia_core::{
    Branch, CommandMap, CommandTree, Completer, Dispatcher, Handler, Node, Outcome,
};

type Log = Arc<Mutex<Vec<String>>>;

fn echo(name: &'static str, log: &Log) -> Handler {
    let log = Arc::clone(log);
    Handler::new(name, move |args| {
        log.lock().unwrap().push(format!("{name}({args})"));
        Ok(Some(format!("{name}: {args}")))
    })
}

fn build_tree(log: &Log) -> Arc<CommandTree> {
    Arc::new(
        CommandMap::new()
            .with("hardcoded_print", Node::Leaf(echo("hardcoded_print", log)))
            .with(
                "config",
                Branch::new()
                    .name("Config")
                    .short_help("Config base")
                    .alias("cfg")
                    .child(
                        "read",
                        Branch::new()
                            .handler(echo("read_all", log))
                            .child("all", Node::Leaf(echo("read_all", log)))
                            .child("last_run", Node::Leaf(echo("read_last_run", log))),
                    )
                    .child(
                        "set",
                        Branch::new()
                            .handler(echo("set", log))
                            .child("last_run", Node::Leaf(echo("set_last_run", log)))
                            .child("highlight", Node::choices(["on", "off"]))
                            .child("history", Node::choices(["on", "off"])),
                    ),
            )
            .with(
                "tree_test",
                Branch::new().child(
                    "level_2",
                    Branch::new().child(
                        "level_3",
                        Branch::new().child("level_4", Node::Leaf(echo("level_4", log))),
                    ),
                ),
            ),
    )
}

fn texts(completer: &Completer, text: &str) -> Vec<String> {
    completer.complete(text).map(|c| c.text).collect()
}

#[test]
fn completes_top_level_then_descends() {
    let log = Log::default();
    let completer = Completer::new(build_tree(&log));

    assert_eq!(
        texts(&completer, ""),
        ["hardcoded_print", "config", "tree_test"]
    );
    assert_eq!(texts(&completer, "config "), ["read", "set"]);
    assert_eq!(texts(&completer, "config set h"), ["highlight", "history"]);
    assert_eq!(texts(&completer, "config set highlight"), ["on", "off"]);
    assert_eq!(
        texts(&completer, "tree_test level_2 level_3 "),
        ["level_4"]
    );
}

#[test]
fn completion_follows_aliases_without_offering_them() {
    let log = Log::default();
    let completer = Completer::new(build_tree(&log));

    assert_eq!(texts(&completer, "cfg re"), ["read"]);
    assert!(texts(&completer, "cf").is_empty());
}

#[test]
fn completion_never_invokes_handlers() {
    let log = Log::default();
    let completer = Completer::new(build_tree(&log));

    for text in ["", "config ", "config read all ", "hardcoded_print x"] {
        let _ = texts(&completer, text);
    }

    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn dispatch_prefers_deepest_handler() {
    let log = Log::default();
    let dispatcher = Dispatcher::new(build_tree(&log));

    dispatcher.execute("config read last_run").unwrap();
    dispatcher.execute("config read").unwrap();
    dispatcher.execute("config set highlight on").unwrap();
    dispatcher.execute("tree_test level_2 level_3 level_4 deep args").unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        [
            "read_last_run()",
            "read_all()",
            "set(highlight on)",
            "level_4(deep args)",
        ]
    );
}

#[test]
fn dispatch_through_alias() {
    let log = Log::default();
    let dispatcher = Dispatcher::new(build_tree(&log));

    let outcome = dispatcher.execute("CFG Read ALL").unwrap();

    assert_eq!(outcome, Outcome::Output(Some("read_all: ".to_string())));
}

#[test]
fn dead_end_falls_back_to_default() {
    let log = Log::default();
    let dispatcher =
        Dispatcher::new(build_tree(&log)).with_default(echo("default", &log));

    dispatcher.execute("tree_test level_2 nowhere").unwrap();
    dispatcher.execute("tell me a joke").unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        ["default(level_2 nowhere)", "default(tell me a joke)"]
    );
}

#[test]
fn dead_end_without_default_is_reported() {
    let log = Log::default();
    let dispatcher = Dispatcher::new(build_tree(&log));

    assert_eq!(
        dispatcher.execute("tree_test level_2").unwrap().into_text(),
        Some("'tree_test level_2' does not map to a valid function.".to_string())
    );
    assert_eq!(
        dispatcher.execute("unknown").unwrap().into_text(),
        Some("Invalid command: unknown".to_string())
    );
}

#[test]
fn help_dump_for_branch() {
    let log = Log::default();
    let dispatcher = Dispatcher::new(build_tree(&log));

    let help = dispatcher.execute("config ?").unwrap().into_text().unwrap();

    assert!(help.contains("| Name: Config"));
    assert!(help.contains("| Short Help: Config base"));
    assert!(help.contains("| Aliases: cfg"));
    assert!(help.contains("| | --- Help [read] ---"));
    assert!(help.contains("| | | --- Help [all] ---"));
    assert!(help.contains("| | | Choices: on, off"));
    assert!(log.lock().unwrap().is_empty());
}
