//! Rewrites applied to pending actions before they are fused.
//!
//! Every rewrite only touches adjacent actions and never crosses a `Peek`,
//! so the observable output of a pure pipeline is unchanged.

use crate::action::Action;
use crate::element::Element;
use std::sync::Arc;

pub fn optimize<T: Element>(actions: Vec<Action<T>>) -> Vec<Action<T>> {
    let mut out: Vec<Action<T>> = Vec::with_capacity(actions.len());

    for action in actions {
        let merged = match (out.last(), &action) {
            (Some(Action::Filter(first)), Action::Filter(second)) => {
                let (first, second) = (Arc::clone(first), Arc::clone(second));
                Some(Action::Filter(Arc::new(move |x: &T| first(x) && second(x))))
            }
            (Some(Action::Map(first)), Action::Map(second)) => {
                let (first, second) = (Arc::clone(first), Arc::clone(second));
                Some(Action::Map(Arc::new(move |x: T| second(first(x)))))
            }
            (Some(Action::Distinct), Action::Distinct) => Some(Action::Distinct),
            (Some(Action::Skip(a)), Action::Skip(b)) => Some(Action::Skip(a.saturating_add(*b))),
            (Some(Action::Limit(a)), Action::Limit(b)) => Some(Action::Limit((*a).min(*b))),
            _ => None,
        };

        match merged {
            Some(merged) => {
                out.pop();
                out.push(merged);
            }
            None => out.push(action),
        }
    }

    out
}

/// Drop actions that cannot change how many elements reach a `count`.
///
/// Maps and sorts after the last action that inspects values (filter,
/// flat_map, peek, distinct) only reshape or reorder elements. A sort is
/// kept once a peek runs upstream of it (`peeked_upstream` covers stages
/// before a `map_to`): it drains its input, so a later `limit` must not cut
/// the stream short before the peek has seen every element.
pub fn strip_for_count<T: Element>(
    mut actions: Vec<Action<T>>,
    peeked_upstream: bool,
) -> Vec<Action<T>> {
    let last_observer = actions.iter().rposition(|a| {
        matches!(
            a,
            Action::Filter(_) | Action::FlatMap(_) | Action::Peek(_) | Action::Distinct
        )
    });
    let keep_from = last_observer.map(|i| i + 1).unwrap_or(0);
    let peeked = peeked_upstream
        || actions[..keep_from]
            .iter()
            .any(|a| matches!(a, Action::Peek(_)));

    let tail: Vec<Action<T>> = actions
        .split_off(keep_from)
        .into_iter()
        .filter(|a| match a {
            Action::Map(_) => false,
            Action::Sorted(_) => peeked,
            _ => true,
        })
        .collect();
    actions.extend(tail);
    actions
}

/// Element count after `actions`, when it follows from `source_len` alone.
pub fn known_count<T: Element>(source_len: usize, actions: &[Action<T>]) -> Option<usize> {
    actions.iter().try_fold(source_len, |n, action| match action {
        Action::Skip(k) => Some(n.saturating_sub(*k)),
        Action::Limit(k) => Some(n.min(*k)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;

    fn kinds<T: Element>(actions: &[Action<T>]) -> Vec<ActionKind> {
        actions.iter().map(|a| a.operation_kind()).collect()
    }

    #[test]
    fn test_adjacent_filters_merge() {
        let optimized = optimize(vec![
            Action::<i32>::filter(|x| *x > 0),
            Action::filter(|x: &i32| x % 2 == 0),
        ]);
        assert_eq!(kinds(&optimized), vec![ActionKind::Filter]);

        let Action::Filter(p) = &optimized[0] else {
            panic!("expected filter");
        };
        assert!(p(&4));
        assert!(!p(&3));
        assert!(!p(&-2));
    }

    #[test]
    fn test_adjacent_maps_compose_in_order() {
        let optimized = optimize(vec![Action::<i64>::map(|x| x + 1), Action::map(|x: i64| x * 10)]);
        let Action::Map(f) = &optimized[0] else {
            panic!("expected map");
        };
        assert_eq!(f(2), 30);
    }

    #[test]
    fn test_peek_blocks_merging() {
        let optimized = optimize(vec![
            Action::<i32>::filter(|x| *x > 0),
            Action::peek(|_: &i32| {}),
            Action::filter(|x: &i32| *x > 1),
        ]);
        assert_eq!(
            kinds(&optimized),
            vec![ActionKind::Filter, ActionKind::Peek, ActionKind::Filter]
        );
    }

    #[test]
    fn test_skip_and_limit_fold() {
        let optimized = optimize(vec![
            Action::<i32>::skip(2),
            Action::skip(3),
            Action::limit(10),
            Action::limit(4),
            Action::distinct(),
            Action::distinct(),
        ]);
        assert!(matches!(optimized[0], Action::Skip(5)));
        assert!(matches!(optimized[1], Action::Limit(4)));
        assert!(matches!(optimized[2], Action::Distinct));
        assert_eq!(optimized.len(), 3);
    }

    #[test]
    fn test_strip_for_count_keeps_observers() {
        let stripped = strip_for_count(
            vec![
                Action::<i32>::map(|x| x + 1),
                Action::filter(|x: &i32| *x > 0),
                Action::map(|x: i32| x * 2),
                Action::sorted(),
                Action::limit(3),
            ],
            false,
        );
        assert_eq!(
            kinds(&stripped),
            vec![ActionKind::Map, ActionKind::Filter, ActionKind::Limit]
        );
    }

    #[test]
    fn test_strip_for_count_keeps_sort_behind_peek() {
        let stripped = strip_for_count(
            vec![
                Action::<i32>::peek(|_| {}),
                Action::map(|x: i32| x * 2),
                Action::sorted(),
                Action::limit(2),
            ],
            false,
        );
        assert_eq!(
            kinds(&stripped),
            vec![ActionKind::Peek, ActionKind::Sorted, ActionKind::Limit]
        );

        let stripped = strip_for_count(vec![Action::<i32>::sorted(), Action::limit(2)], true);
        assert_eq!(kinds(&stripped), vec![ActionKind::Sorted, ActionKind::Limit]);
    }

    #[test]
    fn test_known_count() {
        let actions = vec![Action::<i32>::skip(2), Action::limit(5)];
        assert_eq!(known_count(10, &actions), Some(5));
        assert_eq!(known_count(4, &actions), Some(2));
        assert_eq!(known_count(1, &actions), Some(0));

        let actions = vec![Action::<i32>::filter(|_| true)];
        assert_eq!(known_count(10, &actions), None);
    }
}
