#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Fail-fast and continue-on-failure assertions for tests.
//!
//! ## Overview
//!
//! Both flavours share one set of comparison primitives and one evaluator,
//! and produce identical messages for identical inputs. They differ only in
//! what happens after a failure:
//!
//! - [`check`] marks the test failed and returns `false`; the test goes on.
//! - [`assert`] also aborts: it returns `Err(Aborted)` for the caller to
//!   propagate with `?`.
//!
//! Results go to a [`Reporter`], the caller's handle on the running test.
//! [`TestReporter`] adapts the standard `#[test]` harness and [`Recorder`]
//! keeps everything in memory.
//!
//! ```
//! use layered_assert::{assert, check, Aborted, Recorder};
//!
//! fn body(t: &mut Recorder) -> Result<(), Aborted> {
//!     check::equal(t, 5i32, 10i32, &[]);
//!     assert::deep_equal(t, vec![1i32, 2], vec![1i32, 2], &[])?;
//!     assert::is_true(t, false, &["value was %d".into(), 5i32.into()])?;
//!     Ok(())
//! }
//!
//! let mut t = Recorder::new();
//! assert_eq!(body(&mut t), Err(Aborted));
//! assert_eq!(t.logs, vec!["expected 10 to equal 5", "value was 5"]);
//! ```
//!
//! ## Modules
//!
//! - [`check`] - continue-on-failure operations
//! - [`assert`] - fail-fast operations
//! - [`primitives`] - the conditions behind every operation
//! - [`evaluate`] - the shared evaluator
//! - [`formatter`] - default messages and template substitution
//! - [`value`] - the operand type and conversions into it
//! - [`diff`] - structural comparison
//! - [`reporter`] - reporting sinks
//! - [`config`] - diff configuration
//! - [`errors`] - error types

pub mod assert;
pub mod check;
pub mod config;
pub mod diff;
pub mod errors;
pub mod evaluate;
pub mod formatter;
pub mod primitives;
pub mod reporter;
pub mod value;

pub use config::DiffConfig;
pub use diff::{DeepComparer, LineDiff};
pub use errors::{Aborted, ValueError, ValueResult};
pub use evaluate::{evaluate, evaluate_condition, Verdict};
pub use formatter::{resolve_message, sprintf, Primitive, NON_STRING_MESSAGE_WARNING};
pub use reporter::{Recorder, Reporter, TestReporter, Traced};
pub use value::{Serde, ToValue, Value};
