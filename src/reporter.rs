//! Reporting sinks.
//!
//! A [`Reporter`] is the host test runner as seen by this crate: it receives
//! log lines and failure signals. One reporter belongs to one running test
//! and is only borrowed for the duration of each check.

use crate::errors::Aborted;

/// Receives the output and failure signals of checks.
pub trait Reporter {
    /// Record one log line.
    fn log(&mut self, line: &str);

    /// Mark the test as failed and let it keep running.
    fn fail(&mut self);

    /// Mark the test as failed and stop it.
    ///
    /// The returned [`Aborted`] is handed back to the caller as `Err`, and
    /// the caller must not run further test code past it. Implementations
    /// may also unwind instead of returning.
    fn fail_now(&mut self) -> Aborted;

    /// Invoked on entry to every check so the host can attribute failures
    /// to the caller instead of this crate. Sinks without that notion keep
    /// the no-op.
    fn helper(&mut self) {}
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn log(&mut self, line: &str) {
        (**self).log(line)
    }

    fn fail(&mut self) {
        (**self).fail()
    }

    fn fail_now(&mut self) -> Aborted {
        (**self).fail_now()
    }

    fn helper(&mut self) {
        (**self).helper()
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn log(&mut self, line: &str) {
        (**self).log(line)
    }

    fn fail(&mut self) {
        (**self).fail()
    }

    fn fail_now(&mut self) -> Aborted {
        (**self).fail_now()
    }

    fn helper(&mut self) {
        (**self).helper()
    }
}

// ============================================================================
// Recorder
// ============================================================================

/// In-memory reporter that records everything it is told.
///
/// Useful for testing helpers built on top of this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recorder {
    pub logs: Vec<String>,
    /// `fail` was called.
    pub failed: bool,
    /// `fail_now` was called.
    pub aborted: bool,
    pub helper_calls: usize,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nothing was logged and no failure was signalled.
    pub fn is_clean(&self) -> bool {
        self.logs.is_empty() && !self.failed && !self.aborted
    }

    /// Drain the recorded log lines.
    pub fn take_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs)
    }
}

impl Reporter for Recorder {
    fn log(&mut self, line: &str) {
        self.logs.push(line.to_string());
    }

    fn fail(&mut self) {
        self.failed = true;
    }

    fn fail_now(&mut self) -> Aborted {
        self.aborted = true;
        Aborted
    }

    fn helper(&mut self) {
        self.helper_calls += 1;
    }
}

// ============================================================================
// Standard test harness
// ============================================================================

/// Reporter for the standard `#[test]` harness.
///
/// Log lines go to the captured test output. A reporter that saw any
/// failure panics when dropped, which fails the enclosing test even when
/// only continue-on-failure checks were used.
///
/// ```should_panic
/// use layered_assert::{check, TestReporter};
///
/// let mut t = TestReporter::new();
/// check::equal(&mut t, 1i32, 2i32, &[]);
/// check::equal(&mut t, 3i32, 3i32, &[]);
/// // `t` panics here
/// ```
#[derive(Debug)]
pub struct TestReporter {
    name: String,
    failed: bool,
}

impl TestReporter {
    /// Named after the current thread, which the harness names after the test.
    pub fn new() -> Self {
        let name = std::thread::current()
            .name()
            .unwrap_or("test")
            .to_string();
        Self::named(name)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            failed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }
}

impl Default for TestReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TestReporter {
    fn log(&mut self, line: &str) {
        println!("{}", line);
    }

    fn fail(&mut self) {
        self.failed = true;
    }

    fn fail_now(&mut self) -> Aborted {
        self.failed = true;
        Aborted
    }
}

impl Drop for TestReporter {
    fn drop(&mut self) {
        if self.failed && !std::thread::panicking() {
            panic!("{}: one or more checks failed", self.name);
        }
    }
}

// ============================================================================
// Tracing decorator
// ============================================================================

/// Forwards to an inner reporter and mirrors every signal as a `tracing` event.
#[derive(Debug, Default)]
pub struct Traced<R> {
    inner: R,
}

impl<R: Reporter> Traced<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Reporter> Reporter for Traced<R> {
    fn log(&mut self, line: &str) {
        tracing::info!(target: "layered_assert", "{}", line);
        self.inner.log(line);
    }

    fn fail(&mut self) {
        tracing::warn!(target: "layered_assert", "check failed, test continues");
        self.inner.fail();
    }

    fn fail_now(&mut self) -> Aborted {
        tracing::error!(target: "layered_assert", "assertion failed, aborting test");
        self.inner.fail_now()
    }

    fn helper(&mut self) {
        self.inner.helper();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Implements only the required methods.
    #[derive(Default)]
    struct Bare {
        lines: usize,
    }

    impl Reporter for Bare {
        fn log(&mut self, _line: &str) {
            self.lines += 1;
        }

        fn fail(&mut self) {}

        fn fail_now(&mut self) -> Aborted {
            Aborted
        }
    }

    #[test]
    fn test_helper_is_optional() {
        let mut bare = Bare::default();
        bare.helper();
        bare.log("x");
        assert_eq!(bare.lines, 1);
    }

    #[test]
    fn test_recorder_records() {
        let mut recorder = Recorder::new();
        assert!(recorder.is_clean());

        recorder.helper();
        recorder.log("one");
        recorder.fail();
        assert_eq!(recorder.fail_now(), Aborted);

        assert_eq!(recorder.helper_calls, 1);
        assert!(recorder.failed);
        assert!(recorder.aborted);
        assert_eq!(recorder.take_logs(), vec!["one"]);
        assert!(recorder.logs.is_empty());
    }

    fn drive<R: Reporter>(mut reporter: R) {
        reporter.helper();
        reporter.log("forwarded");
        reporter.fail();
    }

    #[test]
    fn test_forwarding_through_mut_ref_and_box() {
        let mut recorder = Recorder::new();
        drive(&mut recorder);
        assert_eq!(recorder.helper_calls, 1);
        assert_eq!(recorder.logs, vec!["forwarded"]);
        assert!(recorder.failed);

        let mut boxed: Box<dyn Reporter> = Box::new(Recorder::new());
        drive(&mut boxed);
        drive(boxed);
    }

    #[test]
    fn test_reporter_without_failures_does_not_panic() {
        let mut t = TestReporter::named("quiet");
        t.helper();
        t.log("note");
        assert!(!t.has_failed());
        assert_eq!(t.name(), "quiet");
    }

    #[test]
    #[should_panic(expected = "loud: one or more checks failed")]
    fn test_failed_reporter_panics_on_drop() {
        let mut t = TestReporter::named("loud");
        t.fail();
    }

    #[test]
    fn test_traced_forwards() {
        let mut traced = Traced::new(Recorder::new());
        traced.helper();
        traced.log("line");
        traced.fail();
        let _ = traced.fail_now();

        let inner = traced.into_inner();
        assert_eq!(inner.logs, vec!["line"]);
        assert_eq!(inner.helper_calls, 1);
        assert!(inner.failed && inner.aborted);
    }
}
