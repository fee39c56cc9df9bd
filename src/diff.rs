//! Structural comparison of values.
//!
//! A [`DeepComparer`] turns two values into a human-readable diff, or an
//! empty string when they are equal. [`LineDiff`] is the stock comparer: it
//! renders both sides with [`Value::pretty`] and diffs the renderings line
//! by line.

use crate::config::DiffConfig;
use crate::value::Value;

/// Computes a line-oriented diff between two values.
///
/// The empty string means equal. Anything else is embedded verbatim in the
/// `deep_equal` failure message, so lines should carry `-` for expected and
/// `+` for actual.
pub trait DeepComparer {
    fn diff(&self, expected: &Value, actual: &Value) -> String;
}

impl<F> DeepComparer for F
where
    F: Fn(&Value, &Value) -> String,
{
    fn diff(&self, expected: &Value, actual: &Value) -> String {
        self(expected, actual)
    }
}

/// Default comparer: LCS diff over pretty-printed renderings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineDiff {
    config: DiffConfig,
}

impl LineDiff {
    pub const fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }
}

impl DeepComparer for LineDiff {
    fn diff(&self, expected: &Value, actual: &Value) -> String {
        if expected == actual {
            return String::new();
        }

        let left = expected.pretty(self.config.indent).to_string();
        let right = actual.pretty(self.config.indent).to_string();
        let left_lines: Vec<&str> = left.lines().collect();
        let right_lines: Vec<&str> = right.lines().collect();

        // Unequal values can render to the same lines (5i32 vs 5u64, NaN,
        // text differing only in a trailing newline).
        if left_lines == right_lines {
            return [kinded_lines("- ", &left, expected), kinded_lines("+ ", &right, actual)]
                .concat()
                .join("\n");
        }

        render(&diff_lines(&left_lines, &right_lines), self.config.context_lines)
    }
}

fn kinded_lines(prefix: &str, rendering: &str, value: &Value) -> Vec<String> {
    rendering
        .lines()
        .enumerate()
        .map(|(idx, line)| {
            if idx == 0 {
                format!("{}{} // {}", prefix, line, value.kind())
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Same(&'a str),
    /// Only in expected.
    Removed(&'a str),
    /// Only in actual.
    Added(&'a str),
}

/// Above this many LCS table cells the changed middle is emitted as a
/// block replacement.
const MAX_TABLE_CELLS: usize = 1 << 22;

/// Line diff: shared leading and trailing lines are matched directly, the
/// rest goes through an LCS.
fn diff_lines<'a>(left: &[&'a str], right: &[&'a str]) -> Vec<Line<'a>> {
    let prefix = left.iter().zip(right).take_while(|(l, r)| l == r).count();
    let suffix = left[prefix..]
        .iter()
        .rev()
        .zip(right[prefix..].iter().rev())
        .take_while(|(l, r)| l == r)
        .count();

    let mut ops: Vec<Line<'a>> = left[..prefix].iter().copied().map(Line::Same).collect();
    ops.extend(lcs_lines(
        &left[prefix..left.len() - suffix],
        &right[prefix..right.len() - suffix],
    ));
    ops.extend(left[left.len() - suffix..].iter().copied().map(Line::Same));
    ops
}

/// LCS line diff. O(N*M) in the number of lines, bounded by `MAX_TABLE_CELLS`.
fn lcs_lines<'a>(left: &[&'a str], right: &[&'a str]) -> Vec<Line<'a>> {
    let n = left.len();
    let m = right.len();

    if (n + 1).saturating_mul(m + 1) > MAX_TABLE_CELLS {
        return left
            .iter()
            .copied()
            .map(Line::Removed)
            .chain(right.iter().copied().map(Line::Added))
            .collect();
    }

    // dp[i][j] = length of LCS of left[0..i] and right[0..j]
    let mut dp = vec![vec![0u32; m + 1]; n + 1];
    for i in 1..=n {
        for j in 1..=m {
            dp[i][j] = if left[i - 1] == right[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n.max(m));
    let mut i = n;
    let mut j = m;
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && left[i - 1] == right[j - 1] {
            ops.push(Line::Same(left[i - 1]));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || dp[i][j - 1] >= dp[i - 1][j]) {
            ops.push(Line::Added(right[j - 1]));
            j -= 1;
        } else {
            ops.push(Line::Removed(left[i - 1]));
            i -= 1;
        }
    }

    ops.reverse();
    ops
}

fn render(ops: &[Line<'_>], context: Option<usize>) -> String {
    let mut out: Vec<String> = Vec::with_capacity(ops.len());
    let mut idx = 0;

    while idx < ops.len() {
        match ops[idx] {
            Line::Removed(line) => {
                out.push(format!("- {}", line));
                idx += 1;
            }
            Line::Added(line) => {
                out.push(format!("+ {}", line));
                idx += 1;
            }
            Line::Same(_) => {
                let start = idx;
                let mut run = Vec::new();
                while let Some(Line::Same(text)) = ops.get(idx) {
                    run.push(*text);
                    idx += 1;
                }
                push_unchanged(&mut out, &run, start > 0, idx < ops.len(), context);
            }
        }
    }

    out.join("\n")
}

fn push_unchanged(
    out: &mut Vec<String>,
    run: &[&str],
    after_change: bool,
    before_change: bool,
    context: Option<usize>,
) {
    let same = |text: &&str| format!("  {}", text);

    let (head, tail) = match context {
        None => (run.len(), 0),
        Some(c) => (
            if after_change { c } else { 0 },
            if before_change { c } else { 0 },
        ),
    };

    if head + tail >= run.len() {
        out.extend(run.iter().map(same));
        return;
    }

    let elided = run.len() - head - tail;
    out.extend(run[..head].iter().map(same));
    out.push(format!(
        "  ... // {} identical {}",
        elided,
        if elided == 1 { "line" } else { "lines" }
    ));
    out.extend(run[run.len() - tail..].iter().map(same));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ToValue;

    fn person(name: &str, age: i32) -> Value {
        Value::record("Person", [("name", Value::from(name)), ("age", Value::from(age))])
    }

    #[test]
    fn test_equal_values_have_empty_diff() {
        let diff = LineDiff::default();
        assert_eq!(diff.diff(&person("Alice", 30), &person("Alice", 30)), "");
        assert_eq!(diff.diff(&Value::Nil, &Value::Nil), "");
    }

    #[test]
    fn test_field_change() {
        let diff = LineDiff::default().diff(&person("Alice", 30), &person("Bob", 30));
        assert_eq!(
            diff,
            [
                "  Person {",
                "-     name: \"Alice\",",
                "+     name: \"Bob\",",
                "      age: 30,",
                "  }",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_scalar_change() {
        let diff = LineDiff::default().diff(&1i32.to_value(), &2i32.to_value());
        assert_eq!(diff, "- 1\n+ 2");
    }

    #[test]
    fn test_same_rendering_different_kind() {
        let diff = LineDiff::default().diff(&5i32.to_value(), &5u64.to_value());
        assert_eq!(diff, "- 5 // int\n+ 5 // uint");

        let nan = f64::NAN.to_value();
        assert!(!LineDiff::default().diff(&nan, &nan).is_empty());
    }

    #[test]
    fn test_long_runs_are_collapsed() {
        let expected: Vec<i32> = (0..10).collect();
        let mut actual = expected.clone();
        actual[5] = 50;

        let diff = LineDiff::new(DiffConfig::standard().with_context(1))
            .diff(&expected.to_value(), &actual.to_value());
        assert_eq!(
            diff,
            [
                "  ... // 5 identical lines",
                "      4,",
                "-     5,",
                "+     50,",
                "      6,",
                "  ... // 4 identical lines",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_full_config_keeps_everything() {
        let expected: Vec<i32> = (0..10).collect();
        let mut actual = expected.clone();
        actual.push(10);

        let diff = LineDiff::new(DiffConfig::full()).diff(&expected.to_value(), &actual.to_value());
        assert_eq!(diff.lines().count(), 13);
        assert!(diff.contains("+     10,"));
        assert!(!diff.contains("identical"));
    }

    #[test]
    fn test_single_elided_line() {
        let expected = vec![1i32, 2];
        let actual = vec![1i32, 3];

        let diff = LineDiff::new(DiffConfig::standard().with_context(1))
            .diff(&expected.to_value(), &actual.to_value());
        assert_eq!(
            diff,
            [
                "  ... // 1 identical line",
                "      1,",
                "-     2,",
                "+     3,",
                "  ]",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_closure_comparer() {
        let comparer = |expected: &Value, actual: &Value| {
            if expected.to_string() == actual.to_string() {
                String::new()
            } else {
                "differs".to_string()
            }
        };

        assert_eq!(comparer.diff(&5i32.to_value(), &5u64.to_value()), "");
        assert_eq!(comparer.diff(&1i32.to_value(), &2i32.to_value()), "differs");
    }

    #[test]
    fn test_trailing_newline_is_not_an_empty_diff() {
        let diff = LineDiff::default()
            .diff(&Value::Opaque("a\n".into()), &Value::Opaque("a".into()));
        assert_eq!(diff, "- a // opaque\n+ a // opaque");
    }

    #[test]
    fn test_large_values_with_one_change() {
        let expected: Vec<i32> = (0..50_000).collect();
        let mut actual = expected.clone();
        actual[25_000] = -1;

        let diff = LineDiff::default().diff(&expected.to_value(), &actual.to_value());
        assert_eq!(
            diff,
            [
                "  ... // 24998 identical lines",
                "      24997,",
                "      24998,",
                "      24999,",
                "-     25000,",
                "+     -1,",
                "      25001,",
                "      25002,",
                "      25003,",
                "  ... // 24997 identical lines",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_large_rewrite_is_a_block_replacement() {
        let expected: Vec<i32> = (0..3_000).collect();
        let actual: Vec<i32> = (10_000..13_000).collect();

        let diff = LineDiff::default().diff(&expected.to_value(), &actual.to_value());
        let lines: Vec<&str> = diff.lines().collect();
        assert_eq!(lines.len(), 6_002);
        assert_eq!(lines[0], "  [");
        assert_eq!(lines[1], "-     0,");
        assert_eq!(lines[3_000], "-     2999,");
        assert_eq!(lines[3_001], "+     10000,");
        assert_eq!(lines[6_001], "  ]");
    }

    #[test]
    fn test_diff_lines_matches_shared_ends() {
        assert_eq!(
            diff_lines(&["a", "b", "c"], &["a", "x", "c"]),
            vec![Line::Same("a"), Line::Removed("b"), Line::Added("x"), Line::Same("c")]
        );
    }

    #[test]
    fn test_diff_lines_handles_empty_sides() {
        assert_eq!(diff_lines(&[], &["a"]), vec![Line::Added("a")]);
        assert_eq!(diff_lines(&["a"], &[]), vec![Line::Removed("a")]);
        assert!(diff_lines(&[], &[]).is_empty());
    }
}
