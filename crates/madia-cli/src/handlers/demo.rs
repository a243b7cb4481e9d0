//! Small commands for trying the shell: fixed output, a deep subtree,
//! highlighted code and transient progress output.

use std::io::Write;
use std::thread;
use std::time::Duration;

use madia_core::{Branch, Node, OutputCapture};

const SAMPLE_RUST: &str = r#"fn main() {
    let words = ["madia", "shell"];
    for word in words {
        println!("{word}");
    }
}
"#;

const SAMPLE_BASH: &str = r#"for f in *.log; do
  echo "rotating $f"
  gzip "$f"
done
"#;

const SAMPLE_PYTHON: &str = r#"def greet(name: str) -> str:
    return f"hello {name}"
"#;

const SAMPLE_JSON: &str = r#"{"prompt": ">>> ", "highlight_code": true}
"#;

const PROGRESS_STEPS: usize = 3;
const PROGRESS_DELAY: Duration = Duration::from_millis(300);

pub(super) fn nodes() -> [(&'static str, Node); 3] {
    [
        (
            "hardcoded_print",
            Node::leaf("hardcoded_print", |_| Ok(Some("testing 123 ...".to_string()))),
        ),
        ("tree_test", tree_test().into()),
        ("demo", demo().into()),
    ]
}

fn tree_test() -> Branch {
    let level_4 = Node::leaf("level_4", |_| {
        println!("Level 4 executed");
        Ok(None)
    });

    Branch::new()
        .cmd("tree_test", |_| Ok(Some("tree_test base command".to_string())))
        .short_help("Nested levels for trying completion")
        .child(
            "level_2",
            Branch::new()
                .cmd("level_2", |_| Ok(Some("level_2 base command".to_string())))
                .child(
                    "level_3",
                    Branch::new()
                        .cmd("level_3", |_| Ok(Some("level_3 base command".to_string())))
                        .child("level_4", level_4),
                ),
        )
}

fn demo() -> Branch {
    Branch::new()
        .name("Demo")
        .short_help("Output features")
        .child(
            "code",
            Branch::new()
                .cmd("code", |args| code_sample(args).map(Some))
                .short_help("Print a fenced code sample")
                .help("demo code [rust|bash|python|json]")
                .child("rust", Branch::new())
                .child("bash", Branch::new())
                .child("python", Branch::new())
                .child("json", Branch::new()),
        )
        .child(
            "progress",
            Node::leaf("progress", |_| {
                let steps = run_progress(OutputCapture::stdout(), PROGRESS_STEPS, PROGRESS_DELAY)?;
                Ok(Some(format!("Done after {steps} steps.")))
            }),
        )
}

/// Fenced sample for `language`, defaulting to Rust.
pub fn code_sample(language: &str) -> anyhow::Result<String> {
    let language = language.trim();
    let (tag, body) = match language.to_ascii_lowercase().as_str() {
        "" | "rust" | "rs" => ("rust", SAMPLE_RUST),
        "bash" | "sh" => ("bash", SAMPLE_BASH),
        "python" | "py" => ("python", SAMPLE_PYTHON),
        "json" => ("json", SAMPLE_JSON),
        _ => anyhow::bail!("no sample for '{language}'"),
    };
    Ok(format!("```{tag}\n{body}```"))
}

/// Print numbered steps into `capture`; they vanish when it is dropped.
pub fn run_progress<W: Write>(
    capture: OutputCapture<W>,
    steps: usize,
    delay: Duration,
) -> std::io::Result<usize> {
    let mut out = capture.writer();
    for step in 1..=steps {
        writeln!(out, "working... step {step}/{steps}")?;
        out.flush()?;
        thread::sleep(delay);
    }
    Ok(capture.lines())
}
