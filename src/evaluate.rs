//! The evaluator shared by [`check`](crate::check) and [`assert`](crate::assert).

use crate::formatter::{resolve_message, sprintf, Primitive};
use crate::reporter::Reporter;
use crate::value::Value;

/// Outcome of one comparison primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub primitive: Primitive,
    pub passed: bool,
    /// Arguments for the primitive's default template, in template order.
    pub args: Vec<Value>,
}

impl Verdict {
    pub fn new(primitive: Primitive, passed: bool, args: Vec<Value>) -> Self {
        Self {
            primitive,
            passed,
            args,
        }
    }

    /// The primitive's default template filled with this verdict's arguments.
    pub fn default_message(&self) -> String {
        sprintf(self.primitive.default_template(), &self.args)
    }
}

/// Report a verdict.
///
/// A passing verdict returns `true` without touching the reporter beyond
/// `helper`. A failing one logs the resolved message (see
/// [`resolve_message`]), marks the test failed without aborting, and
/// returns `false`.
pub fn evaluate<R: Reporter + ?Sized>(
    reporter: &mut R,
    verdict: &Verdict,
    spec: &[Value],
) -> bool {
    reporter.helper();

    if verdict.passed {
        tracing::trace!(primitive = %verdict.primitive, "check passed");
        return true;
    }

    let lines = resolve_message(spec, || verdict.default_message());
    tracing::debug!(primitive = %verdict.primitive, lines = lines.len(), "check failed");
    for line in &lines {
        reporter.log(line);
    }
    reporter.fail();
    false
}

/// [`evaluate`] for a bare condition, defaulting to `"check failed"`.
pub fn evaluate_condition<R: Reporter + ?Sized>(
    reporter: &mut R,
    condition: bool,
    spec: &[Value],
) -> bool {
    evaluate(
        reporter,
        &Verdict::new(Primitive::That, condition, Vec::new()),
        spec,
    )
}
