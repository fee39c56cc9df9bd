//! Failure message formatting.
//!
//! Holds the per-primitive default templates, printf-style substitution of
//! message arguments, and the rules for interpreting a caller's message
//! specification.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::value::Value;

/// Logged before the default message when a message specification starts
/// with something other than a string.
pub const NON_STRING_MESSAGE_WARNING: &str =
    "layered-assert: called with a non-string message, using default message";

/// A comparison primitive, keyed to its default failure template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// A bare boolean condition.
    That,
    Nil,
    NotNil,
    True,
    False,
    Equal,
    NotEqual,
    DeepEqual,
    NotDeepEqual,
    ErrorIs,
    NotErrorIs,
    ErrorContains,
    NotErrorContains,
    LenEqual,
}

impl Primitive {
    pub const ALL: [Primitive; 14] = [
        Primitive::That,
        Primitive::Nil,
        Primitive::NotNil,
        Primitive::True,
        Primitive::False,
        Primitive::Equal,
        Primitive::NotEqual,
        Primitive::DeepEqual,
        Primitive::NotDeepEqual,
        Primitive::ErrorIs,
        Primitive::NotErrorIs,
        Primitive::ErrorContains,
        Primitive::NotErrorContains,
        Primitive::LenEqual,
    ];

    /// The template used when the caller supplies no message.
    ///
    /// Argument order per template:
    /// - `Nil`: value
    /// - `Equal`, `NotEqual`: expected, actual
    /// - `DeepEqual`: diff
    /// - `NotDeepEqual`: actual, expected
    /// - `ErrorIs`, `NotErrorIs`: error, target
    /// - `ErrorContains`: text, rendered error
    /// - `NotErrorContains`: text
    /// - `LenEqual`: items, expected len, actual len
    pub const fn default_template(self) -> &'static str {
        match self {
            Primitive::That => "check failed",
            Primitive::Nil => "expected value to be nil, got %v",
            Primitive::NotNil => "expected value to not be nil, got nil",
            Primitive::True => "expected condition to be true, got false",
            Primitive::False => "expected condition to be false, got true",
            Primitive::Equal => "expected %v to equal %v",
            Primitive::NotEqual => "expected %v to not equal %v",
            Primitive::DeepEqual => "mismatch (-expected +actual):\n%s",
            Primitive::NotDeepEqual => "expected %v to not equal %v, got that they're equal",
            Primitive::ErrorIs => "expected error %v to have error %v in its tree",
            Primitive::NotErrorIs => "expected error %v to not have error %v in its tree",
            Primitive::ErrorContains => "expected err to contain %s, got %s",
            Primitive::NotErrorContains => "expected err to contain not %s, got that it does",
            Primitive::LenEqual => "expected %v to have len %d, got len %d",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Primitive::That => "that",
            Primitive::Nil => "nil",
            Primitive::NotNil => "not_nil",
            Primitive::True => "is_true",
            Primitive::False => "is_false",
            Primitive::Equal => "equal",
            Primitive::NotEqual => "not_equal",
            Primitive::DeepEqual => "deep_equal",
            Primitive::NotDeepEqual => "not_deep_equal",
            Primitive::ErrorIs => "error_is",
            Primitive::NotErrorIs => "not_error_is",
            Primitive::ErrorContains => "error_contains",
            Primitive::NotErrorContains => "not_error_contains",
            Primitive::LenEqual => "len_equal",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a message specification into the lines to log on failure.
///
/// - empty spec: the default message
/// - spec starting with a string: that template, formatted with the rest
/// - anything else: the warning, then the default message
pub fn resolve_message(spec: &[Value], default: impl FnOnce() -> String) -> Vec<String> {
    match spec.split_first() {
        None => vec![default()],
        Some((Value::Str(template), args)) => vec![sprintf(template, args)],
        Some(_) => vec![NON_STRING_MESSAGE_WARNING.to_string(), default()],
    }
}

/// printf-style substitution.
///
/// A directive is `%`, optional flags (`-`, `+`, `#`, `0`, space), an
/// optional width, an optional `.precision` and a verb:
///
/// | Verb | Accepts |
/// |---|---|
/// | `%v`, `%+v` | anything; `%+v` also names record fields |
/// | `%T` | anything; renders its type |
/// | `%s`, `%q` | text, chars and errors; `%s` also composites |
/// | `%d` | integers, chars and composites |
/// | `%x`, `%X`, `%o`, `%b` | integers; `%x` and `%X` also text |
/// | `%c` | chars and integer code points |
/// | `%t` | booleans |
/// | `%f`, `%F`, `%e`, `%E`, `%g`, `%G` | floats |
///
/// `%%` is a literal percent. Problems are rendered inline instead of
/// failing: `%!d(string=x)` for a verb that does not fit the argument,
/// `%!v(MISSING)` for a missing argument, `%!(NOVERB)` for a trailing `%`,
/// and `%!(EXTRA int=5)` for leftovers.
pub fn sprintf(template: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut used = 0;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.next_if_eq(&'%').is_some() {
            out.push('%');
            continue;
        }
        let directive = Directive::parse(&mut chars);
        match chars.next() {
            None => out.push_str("%!(NOVERB)"),
            Some(verb) => match args.get(used) {
                Some(arg) => {
                    used += 1;
                    out.push_str(&directive.apply(verb, arg));
                }
                None => out.push_str(&format!("%!{}(MISSING)", verb)),
            },
        }
    }

    if let Some(extra) = args.get(used..).filter(|rest| !rest.is_empty()) {
        let extra: Vec<String> = extra.iter().map(kinded).collect();
        out.push_str(&format!("%!(EXTRA {})", extra.join(", ")));
    }

    out
}

/// Flags, width and precision of one `%` directive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Directive {
    minus: bool,
    plus: bool,
    space: bool,
    sharp: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

impl Directive {
    fn parse(chars: &mut Peekable<Chars<'_>>) -> Self {
        let mut directive = Directive::default();
        while let Some(&c) = chars.peek() {
            match c {
                '-' => directive.minus = true,
                '+' => directive.plus = true,
                ' ' => directive.space = true,
                '#' => directive.sharp = true,
                '0' => directive.zero = true,
                _ => break,
            }
            chars.next();
        }
        directive.width = number(chars);
        if chars.next_if_eq(&'.').is_some() {
            directive.precision = Some(number(chars).unwrap_or(0));
        }
        directive
    }

    fn apply(&self, verb: char, arg: &Value) -> String {
        match self.render(verb, arg) {
            Some((body, zero_pad)) => self.pad(body, zero_pad),
            None => format!("%!{}({})", verb, kinded(arg)),
        }
    }

    /// The unpadded rendering, and whether the `0` flag applies to it.
    /// `None` when the verb does not fit the argument.
    fn render(&self, verb: char, arg: &Value) -> Option<(String, bool)> {
        let text = |s: String| Some((s, false));
        // Precision is a minimum digit count for integers and disables zero padding.
        let int = |negative: bool, magnitude: u64| {
            Some((self.integer(verb, negative, magnitude), self.precision.is_none()))
        };

        match (verb, arg) {
            ('v', _) if self.plus => text(with_field_names(arg)),
            ('v', _) => text(arg.to_string()),
            ('T', _) => text(type_name(arg)),
            ('t', Value::Bool(b)) => text(b.to_string()),
            ('s', Value::Str(_) | Value::Error(_) | Value::Opaque(_) | Value::Char(_)) => {
                text(self.truncate(arg.to_string()))
            }
            ('s' | 'd', _) if !arg.is_comparable() => text(arg.to_string()),
            ('d' | 'x' | 'X' | 'o' | 'b', Value::Int(i)) => int(*i < 0, i.unsigned_abs()),
            ('d' | 'x' | 'X' | 'o' | 'b', Value::Uint(u)) => int(false, *u),
            ('d', Value::Char(c)) => int(false, u64::from(u32::from(*c))),
            ('x' | 'X', Value::Str(s) | Value::Error(s) | Value::Opaque(s)) => {
                text(hex_bytes(verb == 'X', s))
            }
            ('c', Value::Char(c)) => text(c.to_string()),
            ('c', Value::Int(i)) => text(code_point(u32::try_from(*i).ok())),
            ('c', Value::Uint(u)) => text(code_point(u32::try_from(*u).ok())),
            ('f' | 'F' | 'e' | 'E' | 'g' | 'G', Value::Float(x)) => {
                Some((self.float(verb, *x), x.is_finite()))
            }
            ('q', Value::Str(s) | Value::Error(s) | Value::Opaque(s)) => text(format!("{:?}", s)),
            ('q', Value::Char(c)) => text(format!("{:?}", c)),
            _ => None,
        }
    }

    fn sign(&self, negative: bool) -> &'static str {
        if negative {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        }
    }

    fn integer(&self, verb: char, negative: bool, magnitude: u64) -> String {
        let mut digits = match verb {
            'x' => format!("{:x}", magnitude),
            'X' => format!("{:X}", magnitude),
            'o' => format!("{:o}", magnitude),
            'b' => format!("{:b}", magnitude),
            _ => magnitude.to_string(),
        };
        if let Some(min) = self.precision.filter(|min| *min > digits.len()) {
            digits.insert_str(0, &"0".repeat(min - digits.len()));
        }
        let prefix = match verb {
            'x' if self.sharp => "0x",
            'X' if self.sharp => "0X",
            'o' if self.sharp => "0",
            'b' if self.sharp => "0b",
            _ => "",
        };
        format!("{}{}{}", self.sign(negative), prefix, digits)
    }

    fn float(&self, verb: char, x: f64) -> String {
        let body = if x.is_nan() {
            "NaN".to_string()
        } else if x.is_infinite() {
            "Inf".to_string()
        } else {
            let magnitude = x.abs();
            match verb {
                'f' | 'F' => format!("{:.*}", self.precision.unwrap_or(6), magnitude),
                'e' | 'E' => {
                    let sci = format!("{:.*e}", self.precision.unwrap_or(6), magnitude);
                    match split_exponent(&sci) {
                        Some((mantissa, exp)) => exponent_form(mantissa, exp),
                        None => sci,
                    }
                }
                _ => general(magnitude, self.precision),
            }
        };
        let body = if matches!(verb, 'E' | 'G') {
            body.replace('e', "E")
        } else {
            body
        };

        let sign = if x == f64::INFINITY {
            "+"
        } else {
            self.sign(x.is_sign_negative() && !x.is_nan())
        };
        format!("{}{}", sign, body)
    }

    fn truncate(&self, s: String) -> String {
        match self.precision {
            Some(max) => s.chars().take(max).collect(),
            None => s,
        }
    }

    fn pad(&self, body: String, zero_pad: bool) -> String {
        let len = body.chars().count();
        let fill = match self.width {
            Some(width) if width > len => width - len,
            _ => return body,
        };

        if self.minus {
            format!("{}{}", body, " ".repeat(fill))
        } else if self.zero && zero_pad {
            // Zeros go between the sign or radix prefix and the digits.
            let sign = usize::from(body.starts_with(|c: char| matches!(c, '+' | '-' | ' ')));
            let radix = ["0x", "0X", "0b"]
                .iter()
                .any(|prefix| body[sign..].starts_with(*prefix));
            let split = if radix { sign + 2 } else { sign };
            format!("{}{}{}", &body[..split], "0".repeat(fill), &body[split..])
        } else {
            format!("{}{}", " ".repeat(fill), body)
        }
    }
}

fn number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
    }
    value
}

/// `%g`: exponent form for large and small exponents, plain decimals otherwise.
fn general(magnitude: f64, precision: Option<usize>) -> String {
    let significant = precision.map(|p| p.max(1));
    let sci = match significant {
        Some(p) => format!("{:.*e}", p - 1, magnitude),
        None => format!("{:e}", magnitude),
    };
    let (mantissa, exp) = match split_exponent(&sci) {
        Some(parts) => parts,
        None => return sci,
    };

    let limit = significant.map_or(6, |p| p as i64);
    if exp < -4 || i64::from(exp) >= limit {
        exponent_form(trim_fraction(mantissa), exp)
    } else if let Some(p) = significant {
        let decimals = (p as i64 - 1 - i64::from(exp)).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, magnitude)).to_string()
    } else {
        magnitude.to_string()
    }
}

fn split_exponent(sci: &str) -> Option<(&str, i32)> {
    let (mantissa, exp) = sci.split_once('e')?;
    Some((mantissa, exp.parse().ok()?))
}

/// `1.5e+03`: signed exponent of at least two digits.
fn exponent_form(mantissa: &str, exp: i32) -> String {
    format!("{}e{}{:02}", mantissa, if exp < 0 { '-' } else { '+' }, exp.abs())
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn hex_bytes(upper: bool, s: &str) -> String {
    s.bytes()
        .map(|b| {
            if upper {
                format!("{:02X}", b)
            } else {
                format!("{:02x}", b)
            }
        })
        .collect()
}

fn code_point(value: Option<u32>) -> String {
    value
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
        .to_string()
}

/// `%+v`: like `%v`, with `name:` before every record field.
fn with_field_names(value: &Value) -> String {
    match value {
        Value::Ref(Some(target)) => format!("&{}", with_field_names(target)),
        Value::List(items) => {
            let items: Vec<String> = items.iter().map(with_field_names).collect();
            format!("[{}]", items.join(" "))
        }
        Value::Map(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(key, item)| format!("{}:{}", with_field_names(key), with_field_names(item)))
                .collect();
            format!("map[{}]", entries.join(" "))
        }
        Value::Struct { fields, .. } => {
            let fields: Vec<String> = fields
                .iter()
                .map(|(name, item)| format!("{}:{}", name, with_field_names(item)))
                .collect();
            format!("{{{}}}", fields.join(" "))
        }
        _ => value.to_string(),
    }
}

/// `%T`: record names, element types of sequences and maps, kinds otherwise.
fn type_name(value: &Value) -> String {
    match value {
        Value::Nil => "<nil>".to_string(),
        Value::Ref(Some(target)) => format!("*{}", type_name(target)),
        Value::Struct { name, .. } if !name.is_empty() => name.clone(),
        Value::List(items) => format!("[]{}", element_type(items.iter())),
        Value::Map(entries) => format!(
            "map[{}]{}",
            element_type(entries.iter().map(|(key, _)| key)),
            element_type(entries.iter().map(|(_, item)| item))
        ),
        _ => value.kind().to_string(),
    }
}

/// The type shared by all `values`; `any` when they are mixed or absent.
fn element_type<'a>(mut values: impl Iterator<Item = &'a Value>) -> String {
    let first = match values.next() {
        Some(value) => type_name(value),
        None => return "any".to_string(),
    };
    if values.all(|value| type_name(value) == first) {
        first
    } else {
        "any".to_string()
    }
}

fn kinded(arg: &Value) -> String {
    match arg {
        Value::Nil => "<nil>".to_string(),
        _ => format!("{}={}", arg.kind(), arg),
    }
}
