//! Continue-on-failure checks.
//!
//! A failing check logs its message, marks the test failed through
//! [`Reporter::fail`] and returns `false`. The test keeps running, so later
//! checks still report independently.
//!
//! Every check takes an optional message specification as its last
//! argument. Pass `&[]` for the default message, or a template followed by
//! its arguments:
//!
//! ```
//! use layered_assert::{check, Recorder};
//!
//! let mut t = Recorder::new();
//! assert!(!check::that(&mut t, false, &["value was %d".into(), 5i32.into()]));
//! assert_eq!(t.logs, vec!["value was 5"]);
//! ```

use std::error::Error;

use crate::diff::{DeepComparer, LineDiff};
use crate::evaluate::evaluate;
use crate::primitives;
use crate::reporter::Reporter;
use crate::value::{ToValue, Value};

/// Passes when `condition` holds. Defaults to `"check failed"`.
pub fn that<R: Reporter + ?Sized>(reporter: &mut R, condition: bool, msg: &[Value]) -> bool {
    reporter.helper();
    evaluate(reporter, &primitives::that(condition), msg)
}

/// Passes when `value` is absent or a null reference.
pub fn nil<R: Reporter + ?Sized>(reporter: &mut R, value: impl ToValue, msg: &[Value]) -> bool {
    reporter.helper();
    evaluate(reporter, &primitives::nil(&value.to_value()), msg)
}

/// Passes when `value` is neither absent nor a null reference.
pub fn not_nil<R: Reporter + ?Sized>(reporter: &mut R, value: impl ToValue, msg: &[Value]) -> bool {
    reporter.helper();
    evaluate(reporter, &primitives::not_nil(&value.to_value()), msg)
}

pub fn is_true<R: Reporter + ?Sized>(reporter: &mut R, condition: bool, msg: &[Value]) -> bool {
    reporter.helper();
    evaluate(reporter, &primitives::is_true(condition), msg)
}

pub fn is_false<R: Reporter + ?Sized>(reporter: &mut R, condition: bool, msg: &[Value]) -> bool {
    reporter.helper();
    evaluate(reporter, &primitives::is_false(condition), msg)
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
) -> bool {
    reporter.helper();
    evaluate(
        reporter,
        &primitives::equal(&actual.to_value(), &expected.to_value()),
        msg,
    )
}

/// Negation of [`equal`], with the same panics.
pub fn not_equal<R: Reporter + ?Sized>(
    reporter: &mut R,
    actual: impl ToValue,
    expected: impl ToValue,
    msg: &[Value],
) -> bool {
    reporter.helper();
    evaluate(
        reporter,
        &primitives::not_equal(&actual.to_value(), &expected.to_value()),
        msg,
    )
}

/// Structural equality, reporting a [`LineDiff`] on mismatch.
pub fn deep_equal<R: Reporter + ?Sized>(
    reporter: &mut R,
    actual: impl ToValue,
    expected: impl ToValue,
    msg: &[Value],
) -> bool {
    reporter.helper();
    evaluate(
        reporter,
        &primitives::deep_equal(
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
) -> bool {
    reporter.helper();
    evaluate(
        reporter,
        &primitives::deep_equal(comparer, &actual.to_value(), &expected.to_value()),
        msg,
    )
}

pub fn not_deep_equal<R: Reporter + ?Sized>(
    reporter: &mut R,
    actual: impl ToValue,
    expected: impl ToValue,
    msg: &[Value],
) -> bool {
    reporter.helper();
    evaluate(
        reporter,
        &primitives::not_deep_equal(
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
) -> bool {
    reporter.helper();
    evaluate(
        reporter,
        &primitives::not_deep_equal(comparer, &actual.to_value(), &expected.to_value()),
        msg,
    )
}

/// Passes when `target` is `err` or appears in its `source()` chain.
pub fn error_is<R: Reporter + ?Sized, E: Error + PartialEq + 'static>(
    reporter: &mut R,
    err: &(dyn Error + 'static),
    target: &E,
    msg: &[Value],
) -> bool {
    reporter.helper();
    evaluate(reporter, &primitives::error_is(err, target), msg)
}

pub fn not_error_is<R: Reporter + ?Sized, E: Error + PartialEq + 'static>(
    reporter: &mut R,
    err: &(dyn Error + 'static),
    target: &E,
    msg: &[Value],
) -> bool {
    reporter.helper();
    evaluate(reporter, &primitives::not_error_is(err, target), msg)
}

/// Passes when the rendered `err` contains `text`.
pub fn error_contains<R: Reporter + ?Sized>(
    reporter: &mut R,
    err: &dyn Error,
    text: &str,
    msg: &[Value],
) -> bool {
    reporter.helper();
    evaluate(reporter, &primitives::error_contains(err, text), msg)
}

pub fn not_error_contains<R: Reporter + ?Sized>(
    reporter: &mut R,
    err: &dyn Error,
    text: &str,
    msg: &[Value],
) -> bool {
    reporter.helper();
    evaluate(reporter, &primitives::not_error_contains(err, text), msg)
}

/// Passes when `items` has exactly `expected_len` elements.
pub fn len_equal<R: Reporter + ?Sized, T: ToValue>(
    reporter: &mut R,
    items: &[T],
    expected_len: usize,
    msg: &[Value],
) -> bool {
    reporter.helper();
    evaluate(reporter, &primitives::len_equal(items, expected_len), msg)
}
