//! Comparison primitives.
//!
//! Each function decides one condition and returns a [`Verdict`] carrying
//! the arguments of its default message. Nothing here reports anything.

use std::error::Error;

use crate::diff::DeepComparer;
use crate::evaluate::Verdict;
use crate::formatter::Primitive;
use crate::value::{ToValue, Value};

pub fn that(condition: bool) -> Verdict {
    Verdict::new(Primitive::That, condition, Vec::new())
}

pub fn nil(value: &Value) -> Verdict {
    Verdict::new(Primitive::Nil, value.is_nil(), vec![value.clone()])
}

pub fn not_nil(value: &Value) -> Verdict {
    Verdict::new(Primitive::NotNil, !value.is_nil(), Vec::new())
}

pub fn is_true(condition: bool) -> Verdict {
    Verdict::new(Primitive::True, condition, Vec::new())
}

pub fn is_false(condition: bool) -> Verdict {
    Verdict::new(Primitive::False, !condition, Vec::new())
}

/// Primitive equality.
///
/// # Panics
///
/// If either operand is a sequence, map or record. Those need
/// [`deep_equal`].
pub fn equal(actual: &Value, expected: &Value) -> Verdict {
    Verdict::new(
        Primitive::Equal,
        primitive_eq(actual, expected),
        vec![expected.clone(), actual.clone()],
    )
}

/// Negation of [`equal`], with the same panics.
pub fn not_equal(actual: &Value, expected: &Value) -> Verdict {
    Verdict::new(
        Primitive::NotEqual,
        !primitive_eq(actual, expected),
        vec![expected.clone(), actual.clone()],
    )
}

fn primitive_eq(actual: &Value, expected: &Value) -> bool {
    for operand in [actual, expected] {
        if !operand.is_comparable() {
            panic!(
                "equal called with an incomparable {} operand ({}); use deep_equal for structural comparison",
                operand.kind(),
                operand
            );
        }
    }
    actual == expected
}

pub fn deep_equal<C: DeepComparer + ?Sized>(
    comparer: &C,
    actual: &Value,
    expected: &Value,
) -> Verdict {
    let diff = comparer.diff(expected, actual);
    Verdict::new(Primitive::DeepEqual, diff.is_empty(), vec![Value::Str(diff)])
}

pub fn not_deep_equal<C: DeepComparer + ?Sized>(
    comparer: &C,
    actual: &Value,
    expected: &Value,
) -> Verdict {
    let diff = comparer.diff(expected, actual);
    Verdict::new(
        Primitive::NotDeepEqual,
        !diff.is_empty(),
        vec![actual.clone(), expected.clone()],
    )
}

/// Whether `target` appears anywhere in the `source()` chain of `err`,
/// `err` itself included.
pub fn in_chain<E>(err: &(dyn Error + 'static), target: &E) -> bool
where
    E: Error + PartialEq + 'static,
{
    let mut current = Some(err);
    while let Some(e) = current {
        if e.downcast_ref::<E>() == Some(target) {
            return true;
        }
        current = e.source();
    }
    false
}

pub fn error_is<E>(err: &(dyn Error + 'static), target: &E) -> Verdict
where
    E: Error + PartialEq + 'static,
{
    Verdict::new(
        Primitive::ErrorIs,
        in_chain(err, target),
        vec![Value::Error(err.to_string()), Value::Error(target.to_string())],
    )
}

pub fn not_error_is<E>(err: &(dyn Error + 'static), target: &E) -> Verdict
where
    E: Error + PartialEq + 'static,
{
    Verdict::new(
        Primitive::NotErrorIs,
        !in_chain(err, target),
        vec![Value::Error(err.to_string()), Value::Error(target.to_string())],
    )
}

pub fn error_contains(err: &dyn Error, text: &str) -> Verdict {
    let rendered = err.to_string();
    Verdict::new(
        Primitive::ErrorContains,
        rendered.contains(text),
        vec![Value::from(text), Value::Str(rendered)],
    )
}

pub fn not_error_contains(err: &dyn Error, text: &str) -> Verdict {
    Verdict::new(
        Primitive::NotErrorContains,
        !err.to_string().contains(text),
        vec![Value::from(text)],
    )
}

pub fn len_equal<T: ToValue>(items: &[T], expected_len: usize) -> Verdict {
    Verdict::new(
        Primitive::LenEqual,
        items.len() == expected_len,
        vec![items.to_value(), expected_len.into(), items.len().into()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::LineDiff;
    use std::fmt;

    #[derive(Debug, PartialEq)]
    struct Base(&'static str);

    impl fmt::Display for Base {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl Error for Base {}

    #[derive(Debug)]
    struct Wrapped(Box<dyn Error + 'static>);

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "wrapped: {}", self.0)
        }
    }

    impl Error for Wrapped {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(self.0.as_ref())
        }
    }

    fn wrap(err: impl Error + 'static, depth: usize) -> Box<dyn Error + 'static> {
        let mut current: Box<dyn Error + 'static> = Box::new(err);
        for _ in 0..depth {
            current = Box::new(Wrapped(current));
        }
        current
    }

    #[test]
    fn test_in_chain_any_depth() {
        for depth in 0..4 {
            let err = wrap(Base("invalid argument"), depth);
            assert!(in_chain(err.as_ref(), &Base("invalid argument")), "depth {}", depth);
            assert!(!in_chain(err.as_ref(), &Base("other")), "depth {}", depth);
        }
    }

    #[test]
    fn test_error_is_message_args() {
        let err = wrap(Base("boom"), 1);
        let verdict = error_is(err.as_ref(), &Base("bang"));
        assert!(!verdict.passed);
        assert_eq!(
            verdict.default_message(),
            "expected error wrapped: boom to have error bang in its tree"
        );
    }

    #[test]
    fn test_equal_orders_expected_first() {
        let verdict = equal(&5i32.to_value(), &10i32.to_value());
        assert!(!verdict.passed);
        assert_eq!(verdict.default_message(), "expected 10 to equal 5");

        assert!(equal(&"a".to_value(), &"a".to_value()).passed);
        assert!(!equal(&5i32.to_value(), &5u32.to_value()).passed);
        assert!(equal(&Value::null_ref(), &Value::null_ref()).passed);
    }

    #[test]
    #[should_panic(expected = "use deep_equal")]
    fn test_equal_rejects_composites() {
        equal(&vec![1i32].to_value(), &vec![1i32].to_value());
    }

    #[test]
    fn test_deep_equal_complements() {
        let comparer = LineDiff::default();
        let pairs = [
            (vec![1i32, 2].to_value(), vec![1i32, 2].to_value()),
            (vec![1i32, 2].to_value(), vec![2i32, 1].to_value()),
            (Value::Nil, Value::null_ref()),
            (5i32.to_value(), 5i64.to_value()),
        ];
        for (actual, expected) in &pairs {
            let deep = deep_equal(&comparer, actual, expected).passed;
            let not_deep = not_deep_equal(&comparer, actual, expected).passed;
            assert_ne!(deep, not_deep, "{} vs {}", actual, expected);
        }
    }

    #[test]
    fn test_len_equal_args() {
        let verdict = len_equal(&[1i32, 2, 3], 2);
        assert!(!verdict.passed);
        assert_eq!(verdict.default_message(), "expected [1 2 3] to have len 2, got len 3");
        assert!(len_equal::<i32>(&[], 0).passed);
    }

    #[test]
    fn test_error_contains() {
        let err = Base("connection refused");
        assert!(error_contains(&err, "refused").passed);
        assert!(!not_error_contains(&err, "refused").passed);

        let verdict = error_contains(&err, "timeout");
        assert_eq!(
            verdict.default_message(),
            "expected err to contain timeout, got connection refused"
        );
    }

    #[test]
    fn test_nil_verdicts() {
        assert!(nil(&std::ptr::null::<u8>().to_value()).passed);
        assert!(!nil(&0i32.to_value()).passed);
        assert!(not_nil(&0i32.to_value()).passed);
        assert_eq!(
            nil(&7i32.to_value()).default_message(),
            "expected value to be nil, got 7"
        );
    }
}
