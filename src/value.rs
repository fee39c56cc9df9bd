//! Operand values.
//!
//! Every operand that reaches a comparison primitive is first lowered into a
//! [`Value`]. The tag distinguishes an absent value (`Nil`), a nilable
//! reference (`Ref`), and everything else, so nil detection is a tag match
//! rather than an inspection of the runtime type.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::ptr::NonNull;
use std::rc::Rc;
use std::sync::Arc;

use serde::Serialize;

use crate::errors::ValueResult;

/// A lowered operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence: `None`, `()`.
    Nil,
    /// A nilable reference. `Ref(None)` is the null reference.
    Ref(Option<Box<Value>>),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    Str(String),
    /// Ordered sequence.
    List(Vec<Value>),
    /// Key/value entries in a stable order.
    Map(Vec<(Value, Value)>),
    /// Named record with ordered fields. An empty name renders anonymously.
    Struct {
        name: String,
        fields: Vec<(String, Value)>,
    },
    /// The rendered text of an error.
    Error(String),
    /// Known only by its rendering.
    Opaque(String),
}

impl Value {
    /// The null reference.
    pub fn null_ref() -> Self {
        Value::Ref(None)
    }

    /// A non-null reference to `target`.
    pub fn reference(target: impl Into<Value>) -> Self {
        Value::Ref(Some(Box::new(target.into())))
    }

    /// Build a named record.
    ///
    /// ```
    /// use layered_assert::Value;
    ///
    /// let person = Value::record(
    ///     "Person",
    ///     [("name", Value::from("Alice")), ("age", Value::from(30i32))],
    /// );
    /// assert_eq!(person.to_string(), "{Alice 30}");
    /// ```
    pub fn record<K, I>(name: impl Into<String>, fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Struct {
            name: name.into(),
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Lower any `Serialize` value through the serde data model.
    ///
    /// Struct names are not preserved; object keys come out sorted.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> ValueResult<Self> {
        Ok(serde_json::to_value(value)?.into())
    }

    /// `Nil` and the null reference are nil. A zero scalar is not.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil | Value::Ref(None))
    }

    /// Whether primitive equality is defined for this value.
    ///
    /// Sequences, maps and records must be compared structurally.
    pub fn is_comparable(&self) -> bool {
        !matches!(self, Value::List(_) | Value::Map(_) | Value::Struct { .. })
    }

    /// Short kind name, used in formatting diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Ref(_) => "ptr",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float64",
            Value::Char(_) => "char",
            Value::Str(_) => "string",
            Value::List(_) => "slice",
            Value::Map(_) => "map",
            Value::Struct { .. } => "struct",
            Value::Error(_) => "error",
            Value::Opaque(_) => "opaque",
        }
    }

    /// Multi-line rendering used by the deep comparer.
    pub fn pretty(&self, indent: usize) -> Pretty<'_> {
        Pretty {
            value: self,
            indent,
        }
    }
}

/// Renders the compact `%v` form: `<nil>`, `[1 2 3]`, `map[a:1]`, `{Alice 30}`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil | Value::Ref(None) => f.write_str("<nil>"),
            Value::Ref(Some(target)) => write!(f, "&{}", target),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{}", x),
            Value::Char(c) => write!(f, "{}", c),
            Value::Str(s) | Value::Error(s) | Value::Opaque(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                write_spaced(f, items.iter())?;
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("map[")?;
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}:{}", key, value)?;
                }
                f.write_str("]")
            }
            Value::Struct { fields, .. } => {
                f.write_str("{")?;
                write_spaced(f, fields.iter().map(|(_, v)| v))?;
                f.write_str("}")
            }
        }
    }
}

fn write_spaced<'a>(
    f: &mut fmt::Formatter<'_>,
    values: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    for (idx, value) in values.enumerate() {
        if idx > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}

/// Multi-line rendering of a [`Value`], one element or field per line.
pub struct Pretty<'a> {
    value: &'a Value,
    indent: usize,
}

impl Pretty<'_> {
    fn pad(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:width$}", "", width = depth * self.indent)
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, value: &Value, depth: usize) -> fmt::Result {
        match value {
            Value::Nil | Value::Ref(None) => f.write_str("nil"),
            Value::Ref(Some(target)) => {
                f.write_str("&")?;
                self.write(f, target, depth)
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Char(c) => write!(f, "{:?}", c),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Error(s) => write!(f, "error({:?})", s),
            Value::Opaque(s) => f.write_str(s),
            Value::List(items) if items.is_empty() => f.write_str("[]"),
            Value::List(items) => {
                f.write_str("[\n")?;
                for item in items {
                    self.pad(f, depth + 1)?;
                    self.write(f, item, depth + 1)?;
                    f.write_str(",\n")?;
                }
                self.pad(f, depth)?;
                f.write_str("]")
            }
            Value::Map(entries) if entries.is_empty() => f.write_str("{}"),
            Value::Map(entries) => {
                f.write_str("{\n")?;
                for (key, item) in entries {
                    self.pad(f, depth + 1)?;
                    self.write(f, key, depth + 1)?;
                    f.write_str(": ")?;
                    self.write(f, item, depth + 1)?;
                    f.write_str(",\n")?;
                }
                self.pad(f, depth)?;
                f.write_str("}")
            }
            Value::Struct { name, fields } => {
                if !name.is_empty() {
                    write!(f, "{} ", name)?;
                }
                if fields.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{\n")?;
                for (field, item) in fields {
                    self.pad(f, depth + 1)?;
                    write!(f, "{}: ", field)?;
                    self.write(f, item, depth + 1)?;
                    f.write_str(",\n")?;
                }
                self.pad(f, depth)?;
                f.write_str("}")
            }
        }
    }
}

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, self.value, 0)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Nil,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    n.as_f64()
                        .map_or_else(|| Value::Opaque(n.to_string()), Value::Float)
                }
            }
            Json::String(s) => Value::Str(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

// ============================================================================
// Lowering
// ============================================================================

/// Lowers an operand into a [`Value`].
pub trait ToValue {
    fn to_value(&self) -> Value;
}

macro_rules! scalar_values {
    ($variant:ident as $wide:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v as $wide)
                }
            }

            impl ToValue for $t {
                fn to_value(&self) -> Value {
                    Value::from(*self)
                }
            }
        )*
    };
}

scalar_values!(Int as i64: i8, i16, i32, i64, isize);
scalar_values!(Uint as u64: u8, u16, u32, u64, usize);
scalar_values!(Float as f64: f32, f64);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::Char(*self)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::from(self)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl ToValue for () {
    fn to_value(&self) -> Value {
        Value::Nil
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Nil, ToValue::to_value)
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for &mut T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Rc<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Arc<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T> ToValue for *const T {
    fn to_value(&self) -> Value {
        if self.is_null() {
            Value::Ref(None)
        } else {
            Value::reference(Value::Opaque(format!("{:p}", *self)))
        }
    }
}

impl<T> ToValue for *mut T {
    fn to_value(&self) -> Value {
        (*self as *const T).to_value()
    }
}

impl<T> ToValue for NonNull<T> {
    fn to_value(&self) -> Value {
        Value::reference(Value::Opaque(format!("{:p}", self.as_ptr())))
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<A: ToValue, B: ToValue> ToValue for (A, B) {
    fn to_value(&self) -> Value {
        Value::List(vec![self.0.to_value(), self.1.to_value()])
    }
}

impl<A: ToValue, B: ToValue, C: ToValue> ToValue for (A, B, C) {
    fn to_value(&self) -> Value {
        Value::List(vec![
            self.0.to_value(),
            self.1.to_value(),
            self.2.to_value(),
        ])
    }
}

impl<K: ToValue, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }
}

/// Entries are sorted by the rendering of their keys.
impl<K: ToValue, V: ToValue, S: BuildHasher> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        let mut entries: Vec<(Value, Value)> = self
            .iter()
            .map(|(k, v)| (k.to_value(), v.to_value()))
            .collect();
        entries.sort_by_cached_key(|(k, _)| k.to_string());
        Value::Map(entries)
    }
}

/// Lowers any `T: Serialize` through [`Value::from_serialize`].
///
/// A value the serializer rejects lowers to an opaque description of the
/// error, which never compares equal to a successfully lowered value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Serde<T>(pub T);

impl<T: Serialize> ToValue for Serde<T> {
    fn to_value(&self) -> Value {
        Value::from_serialize(&self.0).unwrap_or_else(|err| Value::Opaque(format!("<{}>", err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[test]
    fn test_nil_detection() {
        assert!(Value::Nil.is_nil());
        assert!(None::<i32>.to_value().is_nil());
        assert!(std::ptr::null::<i32>().to_value().is_nil());
        assert!(std::ptr::null_mut::<String>().to_value().is_nil());
        assert!(().to_value().is_nil());

        let x = 7;
        assert!(!(&x as *const i32).to_value().is_nil());
        assert!(!NonNull::from(&x).to_value().is_nil());
        assert!(!0i32.to_value().is_nil());
        assert!(!"".to_value().is_nil());
        assert!(!Value::reference(Value::Nil).is_nil());
    }

    #[test]
    fn test_smart_pointers_are_transparent() {
        assert_eq!(Box::new(5i32).to_value(), Value::Int(5));
        assert_eq!(Rc::new("a").to_value(), Value::Str("a".into()));
        assert_eq!(Arc::new(Some(2u8)).to_value(), Value::Uint(2));
        assert_eq!((&&3i64).to_value(), Value::Int(3));
    }

    #[test]
    fn test_comparable_kinds() {
        assert!(Value::Int(1).is_comparable());
        assert!(Value::null_ref().is_comparable());
        assert!(Value::Error("boom".into()).is_comparable());
        assert!(!vec![1i32, 2].to_value().is_comparable());
        assert!(!Value::record("P", Vec::<(&str, Value)>::new()).is_comparable());
        assert!(!BTreeMap::<i32, i32>::new().to_value().is_comparable());
    }

    #[test]
    fn test_display_compact() {
        assert_eq!(Value::Nil.to_string(), "<nil>");
        assert_eq!(Value::null_ref().to_string(), "<nil>");
        assert_eq!([1i32, 2, 3].to_value().to_string(), "[1 2 3]");
        assert_eq!(5.123f64.to_value().to_string(), "5.123");
        assert_eq!("test".to_value().to_string(), "test");

        let mut map = HashMap::new();
        map.insert("b", 2);
        map.insert("a", 1);
        assert_eq!(map.to_value().to_string(), "map[a:1 b:2]");

        let person = Value::record("Person", [("name", "Alice".into()), ("age", 30i32.into())]);
        assert_eq!(person.to_string(), "{Alice 30}");
        assert_eq!(Value::reference(person).to_string(), "&{Alice 30}");
    }

    #[test]
    fn test_pretty() {
        let person = Value::record(
            "Person",
            [
                ("name", Value::from("Alice")),
                ("tags", Value::from(vec!["a", "b"])),
                ("pets", Value::List(vec![])),
            ],
        );

        insta::assert_snapshot!(person.pretty(4).to_string(), @r###"
        Person {
            name: "Alice",
            tags: [
                "a",
                "b",
            ],
            pets: [],
        }
        "###);

        assert_eq!(Value::Float(5.0).pretty(4).to_string(), "5.0");
        let anonymous = Value::record("", [("x", Value::Int(1))]);
        assert_eq!(anonymous.pretty(2).to_string(), "{\n  x: 1,\n}");
    }

    #[test]
    fn test_from_serialize() {
        #[derive(Serialize)]
        struct Point {
            y: i32,
            x: i32,
        }

        let value = Serde(Point { y: 2, x: -1 }).to_value();
        assert_eq!(
            value,
            Value::Map(vec![
                (Value::Str("x".into()), Value::Int(-1)),
                (Value::Str("y".into()), Value::Int(2)),
            ])
        );
        assert!(Serde(None::<u8>).to_value().is_nil());
    }

    #[test]
    fn test_serialize_error_is_opaque() {
        let mut map = BTreeMap::new();
        map.insert(vec![1], 1);

        assert!(Value::from_serialize(&map).is_err());
        assert!(matches!(Serde(map).to_value(), Value::Opaque(_)));
    }
}
