//! Constraint engine.
//!
//! Constraints are composable predicates over values. They test values
//! (`is_compatible`) and, for diagnostics, test whether their own bounds make
//! sense for an unconstrained host type (`is_compatible_type`).

use std::cmp::Ordering;

use crate::error::Result;
use crate::types::Type;
use crate::value::{Number, Value};

/// A subtype constraint, `(0..255)`, `(SIZE (4))`, `(1 | 3..5)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Constraint {
    /// Exactly one value.
    SingleValue(Value),
    /// A value range with optional bounds.
    ValueRange(ValueRange),
    /// A constraint on the size of a value instead of its magnitude.
    Size(Box<Constraint>),
    /// Alternatives, `a | b`.
    Compound(Box<Constraint>, Box<Constraint>),
}

/// A range of values. A missing bound means `MIN` or `MAX`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueRange {
    /// Lower bound.
    pub lower: Option<Value>,
    /// Exclude the lower bound itself, `lower<..`.
    pub lower_strict: bool,
    /// Upper bound.
    pub upper: Option<Value>,
    /// Exclude the upper bound itself, `..<upper`.
    pub upper_strict: bool,
}

impl ValueRange {
    /// Inclusive range.
    #[must_use]
    pub fn inclusive(lower: Option<Value>, upper: Option<Value>) -> Self {
        Self {
            lower,
            lower_strict: false,
            upper,
            upper_strict: false,
        }
    }

    fn contains(&self, value: &Value) -> bool {
        let above = match &self.lower {
            None => true,
            Some(lower) => match compare_values(lower, value) {
                Some(Ordering::Less) => true,
                Some(Ordering::Equal) => !self.lower_strict,
                _ => false,
            },
        };
        let below = match &self.upper {
            None => true,
            Some(upper) => match compare_values(value, upper) {
                Some(Ordering::Less) => true,
                Some(Ordering::Equal) => !self.upper_strict,
                _ => false,
            },
        };
        above && below
    }

    fn bounds(&self) -> impl Iterator<Item = &Value> {
        self.lower.iter().chain(self.upper.iter())
    }
}

/// Order two values of the same scalar kind.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => Some(a.number.compare(b.number)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Size of a value for `SIZE` constraints: octets of a string or of a
/// binary/hex string.
fn value_size(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => Some(s.len() as u64),
        Value::Number(n) => n.octet_length().map(u64::from),
        _ => None,
    }
}

impl Constraint {
    /// `(n)`.
    #[must_use]
    pub fn single(value: Value) -> Self {
        Self::SingleValue(value)
    }

    /// `(lower..upper)` over integers.
    #[must_use]
    pub fn range(lower: i64, upper: i64) -> Self {
        Self::ValueRange(ValueRange::inclusive(
            Some(Value::integer(lower)),
            Some(Value::integer(upper)),
        ))
    }

    /// `(SIZE (n))`.
    #[must_use]
    pub fn fixed_size(size: u32) -> Self {
        Self::Size(Box::new(Self::SingleValue(Value::integer(i64::from(size)))))
    }

    /// `(SIZE (lower..upper))`.
    #[must_use]
    pub fn size_range(lower: u32, upper: u32) -> Self {
        Self::Size(Box::new(Self::range(i64::from(lower), i64::from(upper))))
    }

    /// `a | b`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::Compound(Box::new(self), Box::new(other))
    }

    /// Check if a value satisfies this constraint.
    ///
    /// Compound constraints accept a value accepted by either side.
    #[must_use]
    pub fn is_compatible(&self, value: &Value) -> bool {
        match self {
            Self::SingleValue(v) => v == value,
            Self::ValueRange(range) => range.contains(value),
            Self::Size(inner) => value_size(value)
                .and_then(|size| i64::try_from(size).ok())
                .is_some_and(|size| inner.is_compatible(&Value::integer(size))),
            Self::Compound(a, b) => a.is_compatible(value) || b.is_compatible(value),
        }
    }

    /// Check if the bounds of this constraint could be values of `host`
    /// (ignoring any constraint `host` itself carries).
    ///
    /// Compound constraints require both sides to fit.
    #[must_use]
    pub fn is_compatible_type(&self, host: &Type) -> bool {
        match self {
            Self::SingleValue(v) => host.accepts_unconstrained(v),
            Self::ValueRange(range) => range.bounds().all(|v| host.accepts_unconstrained(v)),
            Self::Size(inner) => host.is_sized() && inner.is_size_bound(),
            Self::Compound(a, b) => a.is_compatible_type(host) && b.is_compatible_type(host),
        }
    }

    fn is_size_bound(&self) -> bool {
        let non_negative = |v: &Value| {
            v.as_number()
                .and_then(Number::as_i128)
                .is_some_and(|n| n >= 0)
        };
        match self {
            Self::SingleValue(v) => non_negative(v),
            Self::ValueRange(range) => range.bounds().all(non_negative),
            Self::Size(_) => false,
            Self::Compound(a, b) => a.is_size_bound() && b.is_size_bound(),
        }
    }

    /// All bound values, for resolution of references inside bounds.
    pub fn values(&self) -> Vec<&Value> {
        let mut out = Vec::new();
        self.collect_values(&mut out);
        out
    }

    fn collect_values<'a>(&'a self, out: &mut Vec<&'a Value>) {
        match self {
            Self::SingleValue(v) => out.push(v),
            Self::ValueRange(range) => out.extend(range.bounds()),
            Self::Size(inner) => inner.collect_values(out),
            Self::Compound(a, b) => {
                a.collect_values(out);
                b.collect_values(out);
            }
        }
    }

    /// Rebuild the constraint with every bound value passed through `f`.
    pub fn try_map_values<F>(&self, f: &mut F) -> Result<Self>
    where
        F: FnMut(&Value) -> Result<Value>,
    {
        Ok(match self {
            Self::SingleValue(v) => Self::SingleValue(f(v)?),
            Self::ValueRange(range) => Self::ValueRange(ValueRange {
                lower: range.lower.as_ref().map(&mut *f).transpose()?,
                lower_strict: range.lower_strict,
                upper: range.upper.as_ref().map(&mut *f).transpose()?,
                upper_strict: range.upper_strict,
            }),
            Self::Size(inner) => Self::Size(Box::new(inner.try_map_values(f)?)),
            Self::Compound(a, b) => {
                Self::Compound(Box::new(a.try_map_values(f)?), Box::new(b.try_map_values(f)?))
            }
        })
    }

    /// Check that no bound is an unresolved reference.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.values().into_iter().all(Value::is_resolved)
    }
}
