//! Primitive element types a pipeline can carry.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

/// Runtime tag for the element type of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Int,
    Long,
    Double,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Int => write!(f, "int"),
            ElementType::Long => write!(f, "long"),
            ElementType::Double => write!(f, "double"),
        }
    }
}

/// A value that can flow through a [`crate::Pipeline`].
///
/// `distinct_key` and `natural_cmp` define what `distinct()` and `sorted()`
/// mean for the type. Doubles compare by total order and deduplicate on their
/// bit pattern, so `NaN` is equal to itself and `-0.0` differs from `0.0`.
///
/// `try_add` returns `None` when integer addition overflows.
pub trait Element: Copy + Send + Sync + fmt::Debug + 'static {
    const ELEMENT_TYPE: ElementType;
    const ZERO: Self;

    type Key: Eq + Hash + Send + 'static;

    fn distinct_key(self) -> Self::Key;

    fn natural_cmp(&self, other: &Self) -> Ordering;

    fn try_add(self, other: Self) -> Option<Self>;
}

impl Element for i32 {
    const ELEMENT_TYPE: ElementType = ElementType::Int;
    const ZERO: i32 = 0;
    type Key = i32;

    fn distinct_key(self) -> i32 {
        self
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn try_add(self, other: Self) -> Option<Self> {
        self.checked_add(other)
    }
}

impl Element for i64 {
    const ELEMENT_TYPE: ElementType = ElementType::Long;
    const ZERO: i64 = 0;
    type Key = i64;

    fn distinct_key(self) -> i64 {
        self
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn try_add(self, other: Self) -> Option<Self> {
        self.checked_add(other)
    }
}

impl Element for f64 {
    const ELEMENT_TYPE: ElementType = ElementType::Double;
    const ZERO: f64 = 0.0;
    type Key = u64;

    fn distinct_key(self) -> u64 {
        self.to_bits()
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn try_add(self, other: Self) -> Option<Self> {
        Some(self + other)
    }
}
