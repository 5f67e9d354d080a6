//! Dynamic value model
//!
//! `Value` mirrors the loosely typed data a functional-utility library is
//! handed: primitives plus shared, mutable containers. Containers are
//! reference types, so a container can hold itself and cyclic graphs can be
//! built. Equality on `Value` is the deep, cycle-safe equality of
//! [`crate::equality::equals`].

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// ================================
// Symbols and property keys
// ================================

struct SymbolInner {
    description: Option<String>,
}

/// A unique key; two symbols are the same only if they are the same instance
#[derive(Clone)]
pub struct Symbol(Arc<SymbolInner>);

impl Symbol {
    pub fn new<D: Into<String>>(description: D) -> Self {
        Symbol(Arc::new(SymbolInner {
            description: Some(description.into()),
        }))
    }

    pub fn anonymous() -> Self {
        Symbol(Arc::new(SymbolInner { description: None }))
    }

    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or(""))
    }
}

/// Own-property key of an [`Object`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Name(String),
    Symbol(Symbol),
}

impl From<&str> for PropertyKey {
    fn from(name: &str) -> Self {
        PropertyKey::Name(name.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(name: String) -> Self {
        PropertyKey::Name(name)
    }
}

impl From<Symbol> for PropertyKey {
    fn from(symbol: Symbol) -> Self {
        PropertyKey::Symbol(symbol)
    }
}

// ================================
// Shared containers
// ================================

macro_rules! container_identity {
    ($name:ident) => {
        impl $name {
            /// Identity of the underlying allocation
            pub fn id(&self) -> usize {
                Arc::as_ptr(&self.0) as *const () as usize
            }

            pub fn ptr_eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0)
            }

            pub fn len(&self) -> usize {
                self.0.read().len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.read().is_empty()
            }
        }
    };
}

/// Ordered, growable list of values
#[derive(Clone, Default)]
pub struct Array(Arc<RwLock<Vec<Value>>>);

container_identity!(Array);

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, value: Value) {
        self.0.write().push(value);
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    /// Copy of the current elements; the lock is released before returning
    pub fn snapshot(&self) -> Vec<Value> {
        self.0.read().clone()
    }
}

impl From<Vec<Value>> for Array {
    fn from(values: Vec<Value>) -> Self {
        Array(Arc::new(RwLock::new(values)))
    }
}

/// Key-value container with string and symbol keys in insertion order
#[derive(Clone, Default)]
pub struct Object(Arc<RwLock<Vec<(PropertyKey, Value)>>>);

container_identity!(Object);

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing an existing one with the same key
    pub fn insert<K: Into<PropertyKey>>(&self, key: K, value: Value) {
        let key = key.into();
        let mut entries = self.0.write();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => entries.push((key, value)),
        }
    }

    pub fn get<K: Into<PropertyKey>>(&self, key: K) -> Option<Value> {
        let key = key.into();
        self.0
            .read()
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn keys(&self) -> Vec<PropertyKey> {
        self.0.read().iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn entries(&self) -> Vec<(PropertyKey, Value)> {
        self.0.read().clone()
    }
}

/// Map keyed by values; keys are matched by identity for containers and by
/// value for primitives
#[derive(Clone, Default)]
pub struct MapValue(Arc<RwLock<Vec<(Value, Value)>>>);

container_identity!(MapValue);

impl MapValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: Value, value: Value) {
        let mut entries = self.0.write();
        match entries.iter_mut().find(|(k, _)| k.same_value_zero(&key)) {
            Some(slot) => slot.1 = value,
            None => entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.0
            .read()
            .iter()
            .find(|(k, _)| k.same_value_zero(key))
            .map(|(_, v)| v.clone())
    }

    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.0.read().clone()
    }
}

/// Set of values with the same membership rule as [`MapValue`] keys
#[derive(Clone, Default)]
pub struct SetValue(Arc<RwLock<Vec<Value>>>);

container_identity!(SetValue);

impl SetValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member; returns `false` if it was already present
    pub fn insert(&self, value: Value) -> bool {
        let mut members = self.0.write();
        if members.iter().any(|m| m.same_value_zero(&value)) {
            return false;
        }
        members.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.read().iter().any(|m| m.same_value_zero(value))
    }

    pub fn members(&self) -> Vec<Value> {
        self.0.read().clone()
    }
}

// ================================
// Value
// ================================

/// A dynamically typed value
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Symbol(Symbol),
    Date(DateTime<Utc>),
    Array(Array),
    Object(Object),
    Map(MapValue),
    Set(SetValue),
}

impl Value {
    /// Name of the value's kind, as reported by classification errors
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
        }
    }

    pub fn array<I: IntoIterator<Item = Value>>(values: I) -> Self {
        Value::Array(Array::from(values.into_iter().collect::<Vec<_>>()))
    }

    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<PropertyKey>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let object = Object::new();
        for (k, v) in entries {
            object.insert(k, v);
        }
        Value::Object(object)
    }

    pub fn map<I: IntoIterator<Item = (Value, Value)>>(entries: I) -> Self {
        let map = MapValue::new();
        for (k, v) in entries {
            map.insert(k, v);
        }
        Value::Map(map)
    }

    pub fn set<I: IntoIterator<Item = Value>>(members: I) -> Self {
        let set = SetValue::new();
        for m in members {
            set.insert(m);
        }
        Value::Set(set)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Identity of a container value, `None` for primitives
    pub fn container_id(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(a.id()),
            Value::Object(o) => Some(o.id()),
            Value::Map(m) => Some(m.id()),
            Value::Set(s) => Some(s.id()),
            _ => None,
        }
    }

    /// Key-matching rule of maps and sets: primitives by value with `NaN`
    /// equal to itself, containers and symbols by identity
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            _ => match (self.container_id(), other.container_id()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    fn fmt_guarded(&self, f: &mut fmt::Formatter<'_>, seen: &mut HashSet<usize>) -> fmt::Result {
        if let Some(id) = self.container_id() {
            if !seen.insert(id) {
                return f.write_str("[Circular]");
            }
        }
        let result = match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Symbol(s) => write!(f, "{:?}", s),
            Value::Date(d) => write!(f, "Date({})", d.to_rfc3339()),
            Value::Array(a) => {
                f.write_str("[")?;
                for (i, v) in a.snapshot().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    v.fmt_guarded(f, seen)?;
                }
                f.write_str("]")
            }
            Value::Object(o) => {
                f.write_str("{")?;
                for (i, (k, v)) in o.entries().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match k {
                        PropertyKey::Name(name) => write!(f, "{}: ", name)?,
                        PropertyKey::Symbol(s) => write!(f, "[{:?}]: ", s)?,
                    }
                    v.fmt_guarded(f, seen)?;
                }
                f.write_str("}")
            }
            Value::Map(m) => {
                f.write_str("Map {")?;
                for (i, (k, v)) in m.entries().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    k.fmt_guarded(f, seen)?;
                    f.write_str(" => ")?;
                    v.fmt_guarded(f, seen)?;
                }
                f.write_str("}")
            }
            Value::Set(s) => {
                f.write_str("Set {")?;
                for (i, v) in s.members().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    v.fmt_guarded(f, seen)?;
                }
                f.write_str("}")
            }
        };
        if let Some(id) = self.container_id() {
            seen.remove(&id);
        }
        result
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_guarded(f, &mut HashSet::new())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::equality::equals(self, other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(Array::from(values))
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::array(items.into_iter().map(Value::from)),
            serde_json::Value::Object(fields) => {
                Value::object(fields.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}
