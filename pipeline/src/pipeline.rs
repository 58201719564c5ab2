//! Append-only, one-shot pipelines.
//!
//! A [`Pipeline`] is a persistent view: `append` returns a new view that
//! shares its prefix with the old one, so interim states can be handed to
//! several continuations. Nothing runs until a terminal operation claims the
//! view; a view can be claimed exactly once.

use crate::action::{Action, ActionInfo, ActionKind};
use crate::element::{Element, ElementType};
use crate::error::PipelineError;
use crate::optimize::{known_count, optimize, strip_for_count};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use tracing::debug;

/// The fused stream handed to a terminal consumer.
pub type Elements<T> = Box<dyn Iterator<Item = T> + Send>;

type Generator<T> = Arc<dyn Fn() -> Elements<T> + Send + Sync>;

enum Source<T> {
    Items(Arc<[T]>),
    Generator(Generator<T>),
}

impl<T: Element> Source<T> {
    fn open(&self) -> Elements<T> {
        match self {
            Source::Items(items) => {
                let items = Arc::clone(items);
                Box::new((0..items.len()).map(move |i| items[i]))
            }
            Source::Generator(generate) => generate(),
        }
    }

    fn known_len(&self) -> Option<usize> {
        match self {
            Source::Items(items) => Some(items.len()),
            Source::Generator(_) => None,
        }
    }
}

impl<T> Clone for Source<T> {
    fn clone(&self) -> Self {
        match self {
            Source::Items(items) => Source::Items(Arc::clone(items)),
            Source::Generator(generate) => Source::Generator(Arc::clone(generate)),
        }
    }
}

/// Upstream of a typed segment: a source, or a type-changing stage fed by a
/// segment of another element type.
trait Stage<T>: Send + Sync {
    fn open(&self) -> Elements<T>;
    fn describe(&self, out: &mut Vec<ActionInfo>);
}

enum Upstream<T> {
    Source(Source<T>),
    Stage(Arc<dyn Stage<T>>),
}

impl<T: Element> Upstream<T> {
    fn open(&self) -> Elements<T> {
        match self {
            Upstream::Source(source) => source.open(),
            Upstream::Stage(stage) => stage.open(),
        }
    }

    fn describe(&self, out: &mut Vec<ActionInfo>) {
        if let Upstream::Stage(stage) = self {
            stage.describe(out);
        }
    }

    fn known_len(&self) -> Option<usize> {
        match self {
            Upstream::Source(source) => source.known_len(),
            Upstream::Stage(_) => None,
        }
    }

    fn has_side_effects(&self) -> bool {
        let mut steps = Vec::new();
        self.describe(&mut steps);
        steps.iter().any(|step| step.kind.has_side_effects())
    }
}

impl<T> Clone for Upstream<T> {
    fn clone(&self) -> Self {
        match self {
            Upstream::Source(source) => Upstream::Source(source.clone()),
            Upstream::Stage(stage) => Upstream::Stage(Arc::clone(stage)),
        }
    }
}

struct Link<T> {
    action: Action<T>,
    prev: Option<Arc<Link<T>>>,
    depth: usize,
}

fn collect_actions<T>(tail: &Option<Arc<Link<T>>>) -> Vec<Action<T>> {
    let mut actions = Vec::with_capacity(tail.as_ref().map(|l| l.depth).unwrap_or(0));
    let mut cursor = tail.as_deref();
    while let Some(link) = cursor {
        actions.push(link.action.clone());
        cursor = link.prev.as_deref();
    }
    actions.reverse();
    actions
}

struct MapToStage<S, T> {
    upstream: Upstream<S>,
    tail: Option<Arc<Link<S>>>,
    mapper: Arc<dyn Fn(S) -> T + Send + Sync>,
}

impl<S: Element, T: Element> Stage<T> for MapToStage<S, T> {
    fn open(&self) -> Elements<T> {
        let actions = optimize(collect_actions(&self.tail));
        let mapper = Arc::clone(&self.mapper);
        Box::new(fuse(self.upstream.open(), &actions).map(move |x| mapper(x)))
    }

    fn describe(&self, out: &mut Vec<ActionInfo>) {
        self.upstream.describe(out);
        out.extend(collect_actions(&self.tail).iter().map(Action::info));
        out.push(ActionInfo {
            kind: ActionKind::MapTo,
            element_type: S::ELEMENT_TYPE,
        });
    }
}

/// Compose `actions`, in order, over `elements`.
pub(crate) fn fuse<T: Element>(elements: Elements<T>, actions: &[Action<T>]) -> Elements<T> {
    actions
        .iter()
        .fold(elements, |upstream, action| apply(upstream, action.clone()))
}

fn apply<T: Element>(upstream: Elements<T>, action: Action<T>) -> Elements<T> {
    match action {
        Action::Filter(predicate) => Box::new(upstream.filter(move |x| predicate(x))),
        Action::Map(operator) => Box::new(upstream.map(move |x| operator(x))),
        Action::FlatMap(expander) => Box::new(upstream.flat_map(move |x| expander(x))),
        Action::Peek(observer) => Box::new(upstream.inspect(move |x| observer(x))),
        Action::Sorted(comparator) => deferred(move || {
            let mut items: Vec<T> = upstream.collect();
            match comparator {
                Some(compare) => items.sort_by(|a, b| compare(a, b)),
                None => items.sort_by(T::natural_cmp),
            }
            items
        }),
        Action::Distinct => {
            let mut seen: HashSet<T::Key> = HashSet::new();
            Box::new(upstream.filter(move |x| seen.insert(x.distinct_key())))
        }
        Action::Limit(n) => Box::new(upstream.take(n)),
        Action::Skip(n) => Box::new(upstream.skip(n)),
    }
}

/// Barrier stage: nothing upstream runs until the first element is pulled.
fn deferred<T, F>(build: F) -> Elements<T>
where
    T: Send + 'static,
    F: FnOnce() -> Vec<T> + Send + 'static,
{
    let mut build = Some(build);
    let mut buffer: Option<std::vec::IntoIter<T>> = None;
    Box::new(std::iter::from_fn(move || {
        if let Some(build) = build.take() {
            buffer = Some(build().into_iter());
        }
        buffer.as_mut()?.next()
    }))
}

/// An ordered, append-only sequence of actions over a source of `T`.
///
/// Cloning yields another handle to the same view: the clones share one
/// consumed flag, so only one of them can be terminated.
pub struct Pipeline<T> {
    upstream: Upstream<T>,
    tail: Option<Arc<Link<T>>>,
    consumed: Arc<AtomicBool>,
}

impl<T> Clone for Pipeline<T> {
    fn clone(&self) -> Self {
        Self {
            upstream: self.upstream.clone(),
            tail: self.tail.clone(),
            consumed: Arc::clone(&self.consumed),
        }
    }
}

impl<T: Element> Pipeline<T> {
    fn with_upstream(upstream: Upstream<T>) -> Self {
        Self {
            upstream,
            tail: None,
            consumed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn from_slice(items: &[T]) -> Self {
        Self::with_upstream(Upstream::Source(Source::Items(Arc::from(items))))
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self::with_upstream(Upstream::Source(Source::Items(Arc::from(items))))
    }

    /// Wrap a re-invocable producer. It is called once per terminal
    /// operation on any view derived from this pipeline.
    pub fn from_fn<F, I>(producer: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: Iterator<Item = T> + Send + 'static,
    {
        let generate: Generator<T> = Arc::new(move || Box::new(producer()) as Elements<T>);
        Self::with_upstream(Upstream::Source(Source::Generator(generate)))
    }

    pub fn range(start: T, end: T) -> Self
    where
        std::ops::Range<T>: Iterator<Item = T> + Send,
    {
        Self::from_fn(move || start..end)
    }

    pub fn element_type(&self) -> ElementType {
        T::ELEMENT_TYPE
    }

    /// Number of actions pending on this element type's segment.
    pub fn len(&self) -> usize {
        self.tail.as_ref().map(|l| l.depth).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.tail.is_none()
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.load(AtomicOrdering::Acquire)
    }

    /// Pending actions on this element type's segment, in execution order.
    pub fn actions(&self) -> Vec<Action<T>> {
        collect_actions(&self.tail)
    }

    /// Every step of the pipeline, including segments upstream of `map_to`
    /// boundaries.
    pub fn describe(&self) -> Vec<ActionInfo> {
        let mut out = Vec::new();
        self.upstream.describe(&mut out);
        out.extend(self.actions().iter().map(Action::info));
        out
    }

    fn ensure_live(&self) -> Result<(), PipelineError> {
        if self.is_consumed() {
            return Err(PipelineError::AlreadyConsumed);
        }
        Ok(())
    }

    pub fn append(&self, action: Action<T>) -> Result<Pipeline<T>, PipelineError> {
        self.ensure_live()?;
        let link = Link {
            action,
            prev: self.tail.clone(),
            depth: self.len() + 1,
        };
        Ok(Pipeline {
            upstream: self.upstream.clone(),
            tail: Some(Arc::new(link)),
            consumed: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn append_kind(
        &self,
        kind: ActionKind,
        transform: crate::action::Transform<T>,
    ) -> Result<Pipeline<T>, PipelineError> {
        self.append(Action::try_new(kind, transform)?)
    }

    pub fn filter<F>(&self, predicate: F) -> Result<Pipeline<T>, PipelineError>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.append(Action::filter(predicate))
    }

    pub fn map<F>(&self, operator: F) -> Result<Pipeline<T>, PipelineError>
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.append(Action::map(operator))
    }

    pub fn flat_map<F>(&self, expander: F) -> Result<Pipeline<T>, PipelineError>
    where
        F: Fn(T) -> Vec<T> + Send + Sync + 'static,
    {
        self.append(Action::flat_map(expander))
    }

    pub fn peek<F>(&self, observer: F) -> Result<Pipeline<T>, PipelineError>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.append(Action::peek(observer))
    }

    pub fn sorted(&self) -> Result<Pipeline<T>, PipelineError> {
        self.append(Action::sorted())
    }

    pub fn sorted_by<F>(&self, comparator: F) -> Result<Pipeline<T>, PipelineError>
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.append(Action::sorted_by(comparator))
    }

    pub fn distinct(&self) -> Result<Pipeline<T>, PipelineError> {
        self.append(Action::distinct())
    }

    pub fn limit(&self, max_size: usize) -> Result<Pipeline<T>, PipelineError> {
        self.append(Action::limit(max_size))
    }

    pub fn skip(&self, n: usize) -> Result<Pipeline<T>, PipelineError> {
        self.append(Action::skip(n))
    }

    /// Continue as a pipeline of another element type.
    pub fn map_to<U, F>(&self, mapper: F) -> Result<Pipeline<U>, PipelineError>
    where
        U: Element,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.ensure_live()?;
        let stage = MapToStage {
            upstream: self.upstream.clone(),
            tail: self.tail.clone(),
            mapper: Arc::new(mapper),
        };
        Ok(Pipeline::with_upstream(Upstream::Stage(Arc::new(stage))))
    }

    pub fn as_long(&self) -> Result<Pipeline<i64>, PipelineError>
    where
        T: Into<i64>,
    {
        self.map_to(|x: T| x.into())
    }

    pub fn as_double(&self) -> Result<Pipeline<f64>, PipelineError>
    where
        T: Into<f64>,
    {
        self.map_to(|x: T| x.into())
    }

    fn claim(&self) -> Result<(), PipelineError> {
        self.consumed
            .compare_exchange(false, true, AtomicOrdering::AcqRel, AtomicOrdering::Acquire)
            .map(|_| ())
            .map_err(|_| PipelineError::AlreadyConsumed)
    }

    /// Realize the pipeline: fuse every pending action, apply it to the
    /// source and hand the result to `consumer`.
    pub fn terminate<R, F>(&self, consumer: F) -> Result<R, PipelineError>
    where
        F: FnOnce(Elements<T>) -> R,
    {
        self.claim()?;
        let pending = self.actions();
        let pending_len = pending.len();
        let fused = optimize(pending);
        let element_type = T::ELEMENT_TYPE;
        debug!(
            element_type = %element_type,
            pending = pending_len,
            fused = fused.len(),
            "terminating pipeline"
        );
        Ok(consumer(fuse(self.upstream.open(), &fused)))
    }

    pub fn collect_vec(&self) -> Result<Vec<T>, PipelineError> {
        self.terminate(|elements| elements.collect())
    }

    pub fn for_each<F>(&self, mut action: F) -> Result<(), PipelineError>
    where
        F: FnMut(T),
    {
        self.terminate(|elements| elements.for_each(&mut action))
    }

    pub fn first(&self) -> Result<Option<T>, PipelineError> {
        self.terminate(|mut elements| elements.next())
    }

    /// Sum the elements. Integer overflow fails with `InvalidArgument`.
    pub fn sum(&self) -> Result<T, PipelineError> {
        self.terminate(|mut elements| {
            elements
                .try_fold(T::ZERO, |total, x| total.try_add(x))
                .ok_or_else(|| {
                    PipelineError::InvalidArgument(format!("{} sum overflowed", T::ELEMENT_TYPE))
                })
        })?
    }

    /// Count the elements, skipping work that cannot change the count.
    pub fn count(&self) -> Result<usize, PipelineError> {
        self.claim()?;
        let plan = strip_for_count(optimize(self.actions()), self.upstream.has_side_effects());
        let element_type = T::ELEMENT_TYPE;

        if let Some(n) = self
            .upstream
            .known_len()
            .and_then(|len| known_count(len, &plan))
        {
            debug!(element_type = %element_type, count = n, "count short-circuited");
            return Ok(n);
        }

        debug!(
            element_type = %element_type,
            fused = plan.len(),
            "counting pipeline"
        );
        Ok(fuse(self.upstream.open(), &plan).count())
    }
}

impl<T: Element> FromIterator<T> for Pipeline<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Element> std::fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("element_type", &T::ELEMENT_TYPE)
            .field("steps", &self.describe())
            .field("consumed", &self.is_consumed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_is_lazy_until_pulled() {
        let pulled = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&pulled);
        let elements = fuse(
            Box::new(vec![3, 1, 2].into_iter().inspect(move |_| {
                counter.fetch_add(1, AtomicOrdering::SeqCst);
            })),
            &[Action::<i32>::sorted()],
        );
        assert_eq!(pulled.load(AtomicOrdering::SeqCst), 0);
        assert_eq!(elements.collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(pulled.load(AtomicOrdering::SeqCst), 3);
    }

    #[test]
    fn test_clones_share_consumption() {
        let base = Pipeline::from_vec(vec![1_i32, 2, 3]);
        let handle = base.clone();
        let branch = base.limit(1).unwrap();

        assert_eq!(handle.collect_vec().unwrap(), vec![1, 2, 3]);
        assert!(base.is_consumed());
        assert_eq!(base.count(), Err(PipelineError::AlreadyConsumed));
        assert!(!branch.is_consumed());
        assert_eq!(branch.collect_vec().unwrap(), vec![1]);
    }

    #[test]
    fn test_len_tracks_depth() {
        let base = Pipeline::from_vec(vec![1, 2, 3]);
        let next = base.filter(|x| *x > 1).unwrap().limit(1).unwrap();
        assert_eq!(base.len(), 0);
        assert!(base.is_empty());
        assert_eq!(next.len(), 2);
    }
}
