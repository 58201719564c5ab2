//! Tagged pipeline actions.
//!
//! Each [`Action`] variant carries the transform that belongs to its
//! operation kind, so a filter can only ever hold a predicate and a map can
//! only ever hold a unary operator. Optimizers and tooling pattern-match on
//! the variants instead of trusting a detached tag.

use crate::element::{Element, ElementType};
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
pub type UnaryOperator<T> = Arc<dyn Fn(T) -> T + Send + Sync>;
pub type Expander<T> = Arc<dyn Fn(T) -> Vec<T> + Send + Sync>;
pub type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Standard operation an action represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Filter,
    Map,
    /// Element-type changing map; only ever appears as a pipeline boundary.
    MapTo,
    FlatMap,
    Peek,
    Sorted,
    Distinct,
    Limit,
    Skip,
}

impl ActionKind {
    /// Kinds whose output depends on more than the current element.
    pub fn is_stateful(&self) -> bool {
        matches!(
            self,
            ActionKind::Sorted | ActionKind::Distinct | ActionKind::Limit | ActionKind::Skip
        )
    }

    pub fn has_side_effects(&self) -> bool {
        matches!(self, ActionKind::Peek)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Filter => "FILTER",
            ActionKind::Map => "MAP",
            ActionKind::MapTo => "MAP_TO",
            ActionKind::FlatMap => "FLAT_MAP",
            ActionKind::Peek => "PEEK",
            ActionKind::Sorted => "SORTED",
            ActionKind::Distinct => "DISTINCT",
            ActionKind::Limit => "LIMIT",
            ActionKind::Skip => "SKIP",
        };
        f.write_str(name)
    }
}

/// Descriptor of one step in a pipeline, including type-changing boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInfo {
    pub kind: ActionKind,
    pub element_type: ElementType,
}

/// One immutable transformation step over a stream of `T`.
pub enum Action<T> {
    Filter(Predicate<T>),
    Map(UnaryOperator<T>),
    FlatMap(Expander<T>),
    Peek(Observer<T>),
    /// `None` sorts by the element's natural order.
    Sorted(Option<Comparator<T>>),
    Distinct,
    Limit(usize),
    Skip(usize),
}

/// Untyped-by-kind transform shapes accepted by [`Action::try_new`].
pub enum Transform<T> {
    Predicate(Predicate<T>),
    Operator(UnaryOperator<T>),
    Expander(Expander<T>),
    Observer(Observer<T>),
    Comparator(Option<Comparator<T>>),
    Count(usize),
    None,
}

impl<T> Transform<T> {
    fn shape(&self) -> &'static str {
        match self {
            Transform::Predicate(_) => "predicate",
            Transform::Operator(_) => "operator",
            Transform::Expander(_) => "expander",
            Transform::Observer(_) => "observer",
            Transform::Comparator(_) => "comparator",
            Transform::Count(_) => "count",
            Transform::None => "none",
        }
    }
}

impl<T: Element> Action<T> {
    pub fn filter<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Action::Filter(Arc::new(predicate))
    }

    pub fn map<F>(operator: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        Action::Map(Arc::new(operator))
    }

    pub fn flat_map<F>(expander: F) -> Self
    where
        F: Fn(T) -> Vec<T> + Send + Sync + 'static,
    {
        Action::FlatMap(Arc::new(expander))
    }

    pub fn peek<F>(observer: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Action::Peek(Arc::new(observer))
    }

    pub fn sorted() -> Self {
        Action::Sorted(None)
    }

    pub fn sorted_by<F>(comparator: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Action::Sorted(Some(Arc::new(comparator)))
    }

    pub fn distinct() -> Self {
        Action::Distinct
    }

    pub fn limit(max_size: usize) -> Self {
        Action::Limit(max_size)
    }

    pub fn skip(n: usize) -> Self {
        Action::Skip(n)
    }

    /// Build an action from a kind tag and a loosely shaped transform.
    ///
    /// Used by tooling that reconstructs pipelines from descriptors. The
    /// transform shape must match the kind; `MapTo` is never accepted because
    /// it changes the element type and has to go through `Pipeline::map_to`.
    pub fn try_new(kind: ActionKind, transform: Transform<T>) -> Result<Self, PipelineError> {
        match (kind, transform) {
            (ActionKind::Filter, Transform::Predicate(p)) => Ok(Action::Filter(p)),
            (ActionKind::Map, Transform::Operator(f)) => Ok(Action::Map(f)),
            (ActionKind::FlatMap, Transform::Expander(f)) => Ok(Action::FlatMap(f)),
            (ActionKind::Peek, Transform::Observer(f)) => Ok(Action::Peek(f)),
            (ActionKind::Sorted, Transform::Comparator(c)) => Ok(Action::Sorted(c)),
            (ActionKind::Sorted, Transform::None) => Ok(Action::Sorted(None)),
            (ActionKind::Distinct, Transform::None) => Ok(Action::Distinct),
            (ActionKind::Limit, Transform::Count(n)) => Ok(Action::Limit(n)),
            (ActionKind::Skip, Transform::Count(n)) => Ok(Action::Skip(n)),
            (ActionKind::MapTo, _) => Err(PipelineError::InvalidArgument(
                "MAP_TO changes the element type; use Pipeline::map_to".to_string(),
            )),
            (kind, transform) => Err(PipelineError::InvalidArgument(format!(
                "{} action cannot be built from a '{}' transform",
                kind,
                transform.shape()
            ))),
        }
    }

    pub fn operation_kind(&self) -> ActionKind {
        match self {
            Action::Filter(_) => ActionKind::Filter,
            Action::Map(_) => ActionKind::Map,
            Action::FlatMap(_) => ActionKind::FlatMap,
            Action::Peek(_) => ActionKind::Peek,
            Action::Sorted(_) => ActionKind::Sorted,
            Action::Distinct => ActionKind::Distinct,
            Action::Limit(_) => ActionKind::Limit,
            Action::Skip(_) => ActionKind::Skip,
        }
    }

    pub fn element_type(&self) -> ElementType {
        T::ELEMENT_TYPE
    }

    pub fn info(&self) -> ActionInfo {
        ActionInfo {
            kind: self.operation_kind(),
            element_type: T::ELEMENT_TYPE,
        }
    }
}

impl<T> Clone for Action<T> {
    fn clone(&self) -> Self {
        match self {
            Action::Filter(p) => Action::Filter(Arc::clone(p)),
            Action::Map(f) => Action::Map(Arc::clone(f)),
            Action::FlatMap(f) => Action::FlatMap(Arc::clone(f)),
            Action::Peek(f) => Action::Peek(Arc::clone(f)),
            Action::Sorted(c) => Action::Sorted(c.clone()),
            Action::Distinct => Action::Distinct,
            Action::Limit(n) => Action::Limit(*n),
            Action::Skip(n) => Action::Skip(*n),
        }
    }
}

impl<T: Element> fmt::Debug for Action<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Action");
        out.field("kind", &self.operation_kind())
            .field("element_type", &T::ELEMENT_TYPE);
        match self {
            Action::Limit(n) | Action::Skip(n) => {
                out.field("count", n);
            }
            Action::Sorted(c) => {
                out.field("natural_order", &c.is_none());
            }
            _ => {}
        }
        out.finish()
    }
}
