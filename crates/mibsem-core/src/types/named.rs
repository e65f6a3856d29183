//! Named values: enumeration labels and named bits.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::Result;
use crate::value::{Number, Value};

/// Ordered name to value map, `{ up(1), down(2) }`.
///
/// Keeps declaration order for display and gives O(1) lookup by name.
/// The first declaration of a duplicate name wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamedValues {
    values: IndexMap<String, Value>,
}

impl NamedValues {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from integer labels, `[("up", 1), ("down", 2)]`.
    #[must_use]
    pub fn from_numbers<'a>(items: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        let mut named = Self::new();
        for (name, n) in items {
            named.insert(name, Value::integer(n));
        }
        named
    }

    /// Add a named value. Returns `false` and keeps the existing value if
    /// the name was already declared.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> bool {
        match self.values.entry(name.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Value of a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// First name bound to a value.
    #[must_use]
    pub fn name_of(&self, value: &Value) -> Option<&str> {
        self.values
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(name, _)| name.as_str())
    }

    /// Bit position of a named bit.
    #[must_use]
    pub fn bit(&self, name: &str) -> Option<u32> {
        self.get(name)?.as_number().and_then(Number::as_u32)
    }

    /// Check if a value is one of the named values.
    #[must_use]
    pub fn contains_value(&self, value: &Value) -> bool {
        self.values.values().any(|v| v == value)
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rebuild with every value passed through `f`, keeping order.
    pub fn try_map_values<F>(&self, f: &mut F) -> Result<Self>
    where
        F: FnMut(&Value) -> Result<Value>,
    {
        let mut values = IndexMap::with_capacity(self.values.len());
        for (name, value) in &self.values {
            values.insert(name.clone(), f(value)?);
        }
        Ok(Self { values })
    }

    /// Check that every value is resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.values.values().all(Value::is_resolved)
    }
}
