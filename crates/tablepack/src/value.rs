//! The dynamic value model: [`Value`], the generic container [`Table`] and
//! its [`Key`] space.
//!
//! A [`Table`] is the runtime's single container type. It can hold
//! numeric keys, string keys or both, and it may reference itself. Whether
//! it is an array or an object is only decided when it is encoded (see
//! [`crate::classify`]).

use std::any::Any;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Origin tag attached to tables produced by decoding.
///
/// Only matters for empty tables: an empty table tagged [`ContainerKind::Map`]
/// encodes as an empty map, everything else as an empty array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Array,
    Map,
}

/// Names of the runtime value types, as used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Nil,
    Boolean,
    Number,
    String,
    Table,
    Function,
    UserData,
    Thread,
    Channel,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Nil => "nil",
            ValueType::Boolean => "boolean",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Table => "table",
            ValueType::Function => "function",
            ValueType::UserData => "userdata",
            ValueType::Thread => "thread",
            ValueType::Channel => "channel",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kinds of embedder-owned references that have no wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Function,
    UserData,
    Thread,
    Channel,
}

/// An opaque reference owned by the embedding runtime (a function, a
/// userdata block, a coroutine...). Handles can live inside tables but can
/// never be encoded.
#[derive(Clone)]
pub struct Handle {
    kind: HandleKind,
    inner: Rc<dyn Any>,
}

impl Handle {
    pub fn new<T: Any>(kind: HandleKind, inner: T) -> Self {
        Self {
            kind,
            inner: Rc::new(inner),
        }
    }

    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    pub fn value_type(&self) -> ValueType {
        match self.kind {
            HandleKind::Function => ValueType::Function,
            HandleKind::UserData => ValueType::UserData,
            HandleKind::Thread => ValueType::Thread,
            HandleKind::Channel => ValueType::Channel,
        }
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:p}", self.value_type(), Rc::as_ptr(&self.inner))
    }
}

/// A table key.
///
/// Keys are totally ordered: numbers (ascending, `-0.0` equal to `0.0`),
/// then strings (bytewise), then booleans. Tables iterate in this order.
#[derive(Debug, Clone)]
pub enum Key {
    Number(f64),
    String(Vec<u8>),
    Bool(bool),
}

impl Key {
    fn rank(&self) -> u8 {
        match self {
            Key::Number(_) => 0,
            Key::String(_) => 1,
            Key::Bool(_) => 2,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Key::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Key::String(s) => Some(s),
            _ => None,
        }
    }
}

fn normalize_zero(n: f64) -> f64 {
    if n == 0.0 {
        0.0
    } else {
        n
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Key::Number(a), Key::Number(b)) => normalize_zero(*a).total_cmp(&normalize_zero(*b)),
            (Key::String(a), Key::String(b)) => a.cmp(b),
            (Key::Bool(a), Key::Bool(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl From<f64> for Key {
    fn from(n: f64) -> Self {
        Key::Number(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Number(n as f64)
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Number(n as f64)
    }
}

impl From<usize> for Key {
    fn from(n: usize) -> Self {
        Key::Number(n as f64)
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Key::Bool(b)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::String(s.as_bytes().to_vec())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::String(s.into_bytes())
    }
}

impl From<&[u8]> for Key {
    fn from(s: &[u8]) -> Self {
        Key::String(s.to_vec())
    }
}

impl From<Vec<u8>> for Key {
    fn from(s: Vec<u8>) -> Self {
        Key::String(s)
    }
}

#[derive(Default)]
struct TableData {
    entries: BTreeMap<Key, Value>,
    kind: Option<ContainerKind>,
}

/// The generic container: a shared, mutable mapping from [`Key`] to
/// [`Value`].
///
/// Cloning a `Table` clones the reference, not the contents, so the same
/// table can appear several times in a tree or even inside itself.
///
/// Tables store explicit [`Value::Nil`] entries.
///
/// `Debug` and `PartialEq` walk the contents recursively and do not
/// terminate on cyclic tables other than direct identity.
#[derive(Clone, Default)]
pub struct Table(Rc<RefCell<TableData>>);

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_kind(kind: ContainerKind) -> Self {
        Self(Rc::new(RefCell::new(TableData {
            entries: BTreeMap::new(),
            kind: Some(kind),
        })))
    }

    /// Builds an untagged table holding `items` at keys `1..=N`.
    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Self {
        let table = Self::new();
        for item in items {
            table.push(item);
        }
        table
    }

    /// Builds an untagged table from key/value pairs.
    pub fn object<K, I>(pairs: I) -> Self
    where
        K: Into<Key>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let table = Self::new();
        for (key, value) in pairs {
            table.set(key, value);
        }
        table
    }

    /// The origin tag set by the decoder, `None` for caller-built tables.
    pub fn kind(&self) -> Option<ContainerKind> {
        self.0.borrow().kind
    }

    pub fn len(&self) -> usize {
        self.0.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().entries.is_empty()
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn set(&self, key: impl Into<Key>, value: Value) -> Option<Value> {
        self.0.borrow_mut().entries.insert(key.into(), value)
    }

    pub fn get(&self, key: impl Into<Key>) -> Option<Value> {
        self.0.borrow().entries.get(&key.into()).cloned()
    }

    pub fn remove(&self, key: impl Into<Key>) -> Option<Value> {
        self.0.borrow_mut().entries.remove(&key.into())
    }

    /// Stores `value` at key `len() + 1`.
    pub fn push(&self, value: Value) {
        let next = self.len() + 1;
        self.set(next, value);
    }

    /// Snapshot of the entries in key order.
    pub fn entries(&self) -> Vec<(Key, Value)> {
        self.0
            .borrow()
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Returns `true` when both handles point at the same table.
    pub fn ptr_eq(&self, other: &Table) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Identity of the underlying table, stable while any handle is alive.
    pub(crate) fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let a = self.0.borrow();
        let b = other.0.borrow();
        a.entries == b.entries
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        if let Some(kind) = data.kind {
            write!(f, "{kind:?}")?;
        }
        f.debug_map().entries(data.entries.iter()).finish()
    }
}

/// A dynamic runtime value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    /// All numbers, integral or not, are doubles.
    Number(f64),
    /// Strings are byte sequences and need not be UTF-8.
    String(Vec<u8>),
    Table(Table),
    Handle(Handle),
}

impl Value {
    /// Shorthand for a string value.
    pub fn str(s: &str) -> Self {
        Value::String(s.as_bytes().to_vec())
    }

    pub fn type_of(&self) -> ValueType {
        match self {
            Value::Nil => ValueType::Nil,
            Value::Bool(_) => ValueType::Boolean,
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Table(_) => ValueType::Table,
            Value::Handle(h) => h.value_type(),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The string contents, if this is a string holding valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Table(a), Value::Table(b)) => a == b,
            (Value::Handle(a), Value::Handle(b)) => a == b,
            _ => false,
        }
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
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into_bytes())
    }
}

impl From<Vec<u8>> for Value {
    fn from(s: Vec<u8>) -> Self {
        Value::String(s)
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Value::Table(t)
    }
}

impl From<Handle> for Value {
    fn from(h: Handle) -> Self {
        Value::Handle(h)
    }
}

impl From<Key> for Value {
    fn from(k: Key) -> Self {
        match k {
            Key::Number(n) => Value::Number(n),
            Key::String(s) => Value::String(s),
            Key::Bool(b) => Value::Bool(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_order_numbers_then_strings_then_bools() {
        let mut keys = vec![
            Key::Bool(false),
            Key::from("b"),
            Key::from(2),
            Key::from("a"),
            Key::from(-1.5),
            Key::from(10),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                Key::from(-1.5),
                Key::from(2),
                Key::from(10),
                Key::from("a"),
                Key::from("b"),
                Key::Bool(false),
            ]
        );
    }

    #[test]
    fn negative_zero_key_is_zero() {
        let t = Table::new();
        t.set(0.0, Value::from(1));
        t.set(-0.0, Value::from(2));
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(0), Some(Value::from(2)));
    }

    #[test]
    fn array_builder_uses_one_based_keys() {
        let t = Table::array([Value::from("x"), Value::from("y")]);
        assert_eq!(t.get(1), Some(Value::from("x")));
        assert_eq!(t.get(2), Some(Value::from("y")));
        assert_eq!(t.get(0), None);
        assert_eq!(t.kind(), None);
    }

    #[test]
    fn tables_share_identity_on_clone() {
        let t = Table::new();
        let alias = t.clone();
        alias.set("k", Value::Bool(true));
        assert_eq!(t.get("k"), Some(Value::Bool(true)));
        assert!(t.ptr_eq(&alias));
        assert_eq!(t.id(), alias.id());
    }

    #[test]
    fn equality_ignores_container_kind() {
        let tagged = Table::with_kind(ContainerKind::Map);
        let plain = Table::new();
        assert_eq!(Value::Table(tagged), Value::Table(plain));
    }

    #[test]
    fn nil_entries_are_stored() {
        let t = Table::array([Value::Nil, Value::from(2)]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(1), Some(Value::Nil));
    }

    #[test]
    fn handle_type_names() {
        let f = Handle::new(HandleKind::Function, ());
        let v = Value::Handle(f.clone());
        assert_eq!(v.type_of().to_string(), "function");
        assert_eq!(v, Value::Handle(f));
        assert_ne!(v, Value::Handle(Handle::new(HandleKind::Function, ())));
    }
}
