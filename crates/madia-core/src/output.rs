//! Scoped capture of transient handler output.
//!
//! Some handlers drive chatty third-party code before producing their final
//! answer. Wrapping that phase in an [`OutputCapture`] lets the chatter show
//! while it runs and wipes it from the terminal once the guard goes away, on
//! every exit path including early returns and panics.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossterm::cursor::{MoveToColumn, MoveToPreviousLine};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

/// Erase the last `lines` terminal lines above the cursor.
pub fn erase_lines<W: Write>(out: &mut W, lines: usize) -> io::Result<()> {
    for _ in 0..lines {
        queue!(out, MoveToPreviousLine(1), Clear(ClearType::CurrentLine))?;
    }
    out.flush()
}

struct CaptureState<W> {
    out: W,
    newlines: usize,
    partial_line: bool,
}

/// Tees writes to an underlying sink and erases them when dropped.
///
/// Writers obtained from [`OutputCapture::writer`] may be handed to other
/// threads; all writes go through one lock.
pub struct OutputCapture<W: Write> {
    state: Arc<Mutex<CaptureState<W>>>,
}

/// Cloneable write handle into an active capture.
pub struct CaptureWriter<W: Write> {
    state: Arc<Mutex<CaptureState<W>>>,
}

impl OutputCapture<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> OutputCapture<W> {
    pub fn new(out: W) -> Self {
        Self {
            state: Arc::new(Mutex::new(CaptureState {
                out,
                newlines: 0,
                partial_line: false,
            })),
        }
    }

    pub fn writer(&self) -> CaptureWriter<W> {
        CaptureWriter {
            state: Arc::clone(&self.state),
        }
    }

    /// Complete lines written so far.
    pub fn lines(&self) -> usize {
        lock(&self.state).newlines
    }
}

impl<W: Write> Clone for CaptureWriter<W> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<W: Write> Write for CaptureWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = lock(&self.state);
        let written = state.out.write(buf)?;
        let recorded = &buf[..written];
        state.newlines += recorded.iter().filter(|&&b| b == b'\n').count();
        if let Some(&last) = recorded.last() {
            state.partial_line = last != b'\n';
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        lock(&self.state).out.flush()
    }
}

impl<W: Write> CaptureState<W> {
    fn erase(&mut self) -> io::Result<()> {
        if self.partial_line {
            queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        }
        erase_lines(&mut self.out, self.newlines)?;
        self.newlines = 0;
        self.partial_line = false;
        Ok(())
    }
}

impl<W: Write> Drop for OutputCapture<W> {
    fn drop(&mut self) {
        if let Err(e) = lock(&self.state).erase() {
            tracing::debug!(error = %e, "failed to erase captured output");
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    const UP_AND_CLEAR: &str = "\x1b[1F\x1b[2K";

    #[test]
    fn test_erase_lines_emits_one_sequence_per_line() {
        let mut out = Vec::new();
        erase_lines(&mut out, 3).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), UP_AND_CLEAR.repeat(3));
    }

    #[test]
    fn test_erase_zero_lines_writes_nothing() {
        let mut out = Vec::new();
        erase_lines(&mut out, 0).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_capture_tees_and_erases_on_drop() {
        let sink = SharedBuf::default();
        {
            let capture = OutputCapture::new(sink.clone());
            let mut writer = capture.writer();
            write!(writer, "loading model\nwarming up\n").unwrap();
            assert_eq!(capture.lines(), 2);
            assert_eq!(sink.text(), "loading model\nwarming up\n");
        }

        let text = sink.text();
        assert!(text.starts_with("loading model\nwarming up\n"));
        assert!(text.ends_with(&UP_AND_CLEAR.repeat(2)));
    }

    #[test]
    fn test_partial_line_is_cleared_too() {
        let sink = SharedBuf::default();
        {
            let capture = OutputCapture::new(sink.clone());
            write!(capture.writer(), "step 1\nstep 2").unwrap();
        }

        let text = sink.text();
        let tail = &text["step 1\nstep 2".len()..];
        assert_eq!(tail, format!("\x1b[1G\x1b[2K{UP_AND_CLEAR}"));
    }

    #[test]
    fn test_writers_share_state_across_threads() {
        let sink = SharedBuf::default();
        let capture = OutputCapture::new(sink);
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let mut writer = capture.writer();
                std::thread::spawn(move || writeln!(writer, "worker {i}").unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(capture.lines(), 4);
    }
}
