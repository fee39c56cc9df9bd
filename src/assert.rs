//! Fail-fast assertions.
//!
//! Same surface and messages as [`check`](crate::check), but a failure also
//! signals [`Reporter::fail_now`] and returns `Err(Aborted)`. Propagate it
//! with `?`; nothing after a failed assertion may run.
//!
//! ```
//! use layered_assert::{assert, Aborted, Recorder};
//!
//! fn body(t: &mut Recorder) -> Result<(), Aborted> {
//!     assert::len_equal(t, &[1i32, 2, 3], 2, &[])?;
//!     unreachable!()
//! }
//!
//! let mut t = Recorder::new();
//! assert_eq!(body(&mut t), Err(Aborted));
//! assert_eq!(t.logs, vec!["expected [1 2 3] to have len 2, got len 3"]);
//! assert!(t.aborted);
//! ```

use std::error::Error;

use crate::diff::{DeepComparer, LineDiff};
use crate::errors::Aborted;
use crate::evaluate::{evaluate, Verdict};
use crate::primitives;
use crate::reporter::Reporter;
use crate::value::{ToValue, Value};

fn conclude<R: Reporter + ?Sized>(
    reporter: &mut R,
    verdict: Verdict,
    msg: &[Value],
) -> Result<(), Aborted> {
    if evaluate(reporter, &verdict, msg) {
        Ok(())
    } else {
        Err(reporter.fail_now())
    }
}

/// Passes when `condition` holds. Defaults to `"check failed"`.
pub fn that<R: Reporter + ?Sized>(
    reporter: &mut R,
    condition: bool,
    msg: &[Value],
) -> Result<(), Aborted> {
    reporter.helper();
    conclude(reporter, primitives::that(condition), msg)
}

/// Passes when `value` is absent or a null reference.
pub fn nil<R: Reporter + ?Sized>(
    reporter: &mut R,
    value: impl ToValue,
    msg: &[Value],
) -> Result<(), Aborted> {
    reporter.helper();
    conclude(reporter, primitives::nil(&value.to_value()), msg)
}

/// Passes when `value` is neither absent nor a null reference.
pub fn not_nil<R: Reporter + ?Sized>(
    reporter: &mut R,
    value: impl ToValue,
    msg: &[Value],
) -> Result<(), Aborted> {
    reporter.helper();
    conclude(reporter, primitives::not_nil(&value.to_value()), msg)
}

pub fn is_true<R: Reporter + ?Sized>(
    reporter: &mut R,
    condition: bool,
    msg: &[Value],
) -> Result<(), Aborted> {
    reporter.helper();
    conclude(reporter, primitives::is_true(condition), msg)
}

pub fn is_false<R: Reporter + ?Sized>(
    reporter: &mut R,
    condition: bool,
    msg: &[Value],
) -> Result<(), Aborted> {
    reporter.helper();
    conclude(reporter, primitives::is_false(condition), msg)
}

/// Primitive equality of scalars, strings, booleans, errors and references.
///
/// # Panics
///
/// If either operand is a sequence, map or record; use [`deep_equal`].
pub fn equal<R: Reporter + ?Sized>(
    reporter: &mut R,
    actual: impl ToValue,
    expected: impl ToValue,
    msg: &[Value],
) -> Result<(), Aborted> {
    reporter.helper();
    conclude(
        reporter,
        primitives::equal(&actual.to_value(), &expected.to_value()),
        msg,
    )
}

/// Negation of [`equal`], with the same panics.
pub fn not_equal<R: Reporter + ?Sized>(
    reporter: &mut R,
    actual: impl ToValue,
    expected: impl ToValue,
    msg: &[Value],
) -> Result<(), Aborted> {
    reporter.helper();
    conclude(
        reporter,
        primitives::not_equal(&actual.to_value(), &expected.to_value()),
        msg,
    )
}

/// Structural equality, reporting a [`LineDiff`] on mismatch.
pub fn deep_equal<R: Reporter + ?Sized>(
    reporter: &mut R,
    actual: impl ToValue,
    expected: impl ToValue,
    msg: &[Value],
) -> Result<(), Aborted> {
    reporter.helper();
    conclude(
        reporter,
        primitives::deep_equal(
            &LineDiff::default(),
            &actual.to_value(),
            &expected.to_value(),
        ),
        msg,
    )
}

/// [`deep_equal`] with a caller-supplied comparer.
pub fn deep_equal_with<R: Reporter + ?Sized, C: DeepComparer + ?Sized>(
    reporter: &mut R,
    comparer: &C,
    actual: impl ToValue,
    expected: impl ToValue,
    msg: &[Value],
) -> Result<(), Aborted> {
    reporter.helper();
    conclude(
        reporter,
        primitives::deep_equal(comparer, &actual.to_value(), &expected.to_value()),
        msg,
    )
}

pub fn not_deep_equal<R: Reporter + ?Sized>(
    reporter: &mut R,
    actual: impl ToValue,
    expected: impl ToValue,
    msg: &[Value],
) -> Result<(), Aborted> {
    reporter.helper();
    conclude(
        reporter,
        primitives::not_deep_equal(
            &LineDiff::default(),
            &actual.to_value(),
            &expected.to_value(),
        ),
        msg,
    )
}

pub fn not_deep_equal_with<R: Reporter + ?Sized, C: DeepComparer + ?Sized>(
    reporter: &mut R,
    comparer: &C,
    actual: impl ToValue,
    expected: impl ToValue,
    msg: &[Value],
) -> Result<(), Aborted> {
    reporter.helper();
    conclude(
        reporter,
        primitives::not_deep_equal(comparer, &actual.to_value(), &expected.to_value()),
        msg,
    )
}

/// Passes when `target` is `err` or appears in its `source()` chain.
pub fn error_is<R: Reporter + ?Sized, E: Error + PartialEq + 'static>(
    reporter: &mut R,
    err: &(dyn Error + 'static),
    target: &E,
    msg: &[Value],
) -> Result<(), Aborted> {
    reporter.helper();
    conclude(reporter, primitives::error_is(err, target), msg)
}

pub fn not_error_is<R: Reporter + ?Sized, E: Error + PartialEq + 'static>(
    reporter: &mut R,
    err: &(dyn Error + 'static),
    target: &E,
    msg: &[Value],
) -> Result<(), Aborted> {
    reporter.helper();
    conclude(reporter, primitives::not_error_is(err, target), msg)
}

/// Passes when the rendered `err` contains `text`.
pub fn error_contains<R: Reporter + ?Sized>(
    reporter: &mut R,
    err: &dyn Error,
    text: &str,
    msg: &[Value],
) -> Result<(), Aborted> {
    reporter.helper();
    conclude(reporter, primitives::error_contains(err, text), msg)
}

pub fn not_error_contains<R: Reporter + ?Sized>(
    reporter: &mut R,
    err: &dyn Error,
    text: &str,
    msg: &[Value],
) -> Result<(), Aborted> {
    reporter.helper();
    conclude(reporter, primitives::not_error_contains(err, text), msg)
}

/// Passes when `items` has exactly `expected_len` elements.
pub fn len_equal<R: Reporter + ?Sized, T: ToValue>(
    reporter: &mut R,
    items: &[T],
    expected_len: usize,
    msg: &[Value],
) -> Result<(), Aborted> {
    reporter.helper();
    conclude(reporter, primitives::len_equal(items, expected_len), msg)
}
