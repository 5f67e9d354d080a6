//! Source classification and sequence constructors
//!
//! Every operator accepts `impl IntoSequence<T>`: a ready [`Sequence`], a
//! [`Source`], a `Vec`, an array, or a dynamic [`Value`]. Classification
//! happens once; a deferred source is awaited on the first pull, never
//! before.

use async_stream::stream;
use futures_core::Stream;
use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::StreamExt;
use std::future::Future;
use tokio::sync::mpsc::Receiver;
use tokio_stream::wrappers::ReceiverStream;

use super::{AsyncSeq, Sequence, SyncSeq};
use crate::error::{StreamError, StreamResult};
use crate::value::{Array, Value};

/// An input before classification
pub enum Source<T> {
    /// Pulled without suspension
    Iter(SyncSeq<T>),
    /// Pulled by polling
    Stream(AsyncSeq<T>),
    /// Resolves, once, to another source
    Deferred(BoxFuture<'static, StreamResult<Source<T>>>),
}

impl<T: Send + 'static> Source<T> {
    /// A source that becomes available when `fut` resolves
    pub fn deferred<F>(fut: F) -> Self
    where
        F: Future<Output = StreamResult<Source<T>>> + Send + 'static,
    {
        Source::Deferred(fut.boxed())
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Source::Deferred(_))
    }

    /// Decide the iteration strategy
    ///
    /// A deferred source always classifies as async: the future is awaited
    /// on the first pull, nested deferrals are resolved in turn, and the
    /// resolved source is then drained.
    pub fn classify(self) -> Sequence<T> {
        match self {
            Source::Iter(iter) => Sequence::from_sync(iter),
            Source::Stream(stream) => Sequence::from_async(stream),
            Source::Deferred(fut) => Sequence::from_async(resolve(fut)),
        }
    }
}

impl Source<Value> {
    /// A source that classifies the value `fut` resolves to
    pub fn from_value_future<F>(fut: F) -> Self
    where
        F: Future<Output = Value> + Send + 'static,
    {
        Self::deferred(async move { Source::<Value>::try_from(fut.await) })
    }
}

fn resolve<T: Send + 'static>(
    fut: BoxFuture<'static, StreamResult<Source<T>>>,
) -> impl Stream<Item = StreamResult<T>> + Send + 'static {
    stream! {
        let mut pending = fut;
        let resolved = loop {
            match pending.await {
                Ok(Source::Deferred(next)) => pending = next,
                other => break other,
            }
        };
        match resolved {
            Ok(source) => {
                log::debug!("deferred source resolved");
                let mut inner = source.classify().into_stream();
                while let Some(item) = inner.next().await {
                    yield item;
                }
            }
            Err(err) => {
                yield Err(err);
            }
        }
    }
}

impl<T: Send + 'static> From<Sequence<T>> for Source<T> {
    fn from(seq: Sequence<T>) -> Self {
        match seq {
            Sequence::Sync(iter) => Source::Iter(iter),
            Sequence::Async(stream) => Source::Stream(stream),
        }
    }
}

/// Lazily walks an array by index, so elements pushed during iteration are
/// still visited
struct ArrayCursor {
    array: Array,
    index: usize,
}

impl Iterator for ArrayCursor {
    type Item = StreamResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.array.get(self.index)?;
        self.index += 1;
        Some(Ok(item))
    }
}

impl TryFrom<Value> for Source<Value> {
    type Error = StreamError;

    /// Arrays, sets, maps (as `[key, value]` pairs) and strings (as
    /// one-character strings) iterate; every other kind is rejected
    fn try_from(value: Value) -> StreamResult<Self> {
        let members: Vec<Value> = match value {
            Value::Array(array) => {
                return Ok(Source::Iter(Box::new(ArrayCursor { array, index: 0 })));
            }
            Value::Set(set) => set.members(),
            Value::Map(map) => map
                .entries()
                .into_iter()
                .map(|(k, v)| Value::array(vec![k, v]))
                .collect(),
            Value::String(text) => text.chars().map(|c| Value::String(c.to_string())).collect(),
            other => {
                log::debug!("rejecting {} as a source", other.kind());
                return Err(StreamError::NotIterable { found: other.kind() });
            }
        };
        Ok(Source::Iter(Box::new(members.into_iter().map(Ok))))
    }
}

/// Conversion of every accepted input form into a [`Sequence`]
pub trait IntoSequence<T> {
    fn into_sequence(self) -> Sequence<T>;
}

impl<T: Send + 'static> IntoSequence<T> for Sequence<T> {
    fn into_sequence(self) -> Sequence<T> {
        self
    }
}

impl<T: Send + 'static> IntoSequence<T> for Source<T> {
    fn into_sequence(self) -> Sequence<T> {
        self.classify()
    }
}

impl<T: Send + 'static> IntoSequence<T> for Vec<T> {
    fn into_sequence(self) -> Sequence<T> {
        from_iter(self)
    }
}

impl<T: Send + 'static, const N: usize> IntoSequence<T> for [T; N] {
    fn into_sequence(self) -> Sequence<T> {
        from_iter(self)
    }
}

/// A non-iterable value becomes a sequence whose only item is the
/// `NotIterable` error
impl IntoSequence<Value> for Value {
    fn into_sequence(self) -> Sequence<Value> {
        match Source::<Value>::try_from(self) {
            Ok(source) => source.classify(),
            Err(err) => Sequence::from_sync(std::iter::once(Err(err))),
        }
    }
}

// ================================
// Constructors
// ================================

/// Create a sync sequence from an iterator
pub fn from_iter<I, T>(iter: I) -> Sequence<T>
where
    I: IntoIterator<Item = T>,
    I::IntoIter: Send + 'static,
    T: Send + 'static,
{
    Sequence::from_sync(iter.into_iter().map(Ok))
}

/// Create a sync sequence from an iterator that may fail
pub fn from_results<I, T>(iter: I) -> Sequence<T>
where
    I: IntoIterator<Item = StreamResult<T>>,
    I::IntoIter: Send + 'static,
    T: Send + 'static,
{
    Sequence::from_sync(iter.into_iter())
}

/// Create an async sequence from a stream
pub fn from_stream<S, T>(stream: S) -> Sequence<T>
where
    S: Stream<Item = T> + Send + 'static,
    T: Send + 'static,
{
    Sequence::from_async(stream.map(Ok))
}

/// Create an async sequence from a stream that may fail
pub fn from_result_stream<S, T>(stream: S) -> Sequence<T>
where
    S: Stream<Item = StreamResult<T>> + Send + 'static,
    T: Send + 'static,
{
    Sequence::from_async(stream)
}

/// Create an async sequence from a future resolving to any sequence input
pub fn from_future<F, S, T>(fut: F) -> Sequence<T>
where
    F: Future<Output = S> + Send + 'static,
    S: IntoSequence<T> + 'static,
    T: Send + 'static,
{
    Source::deferred(async move { Ok(Source::from(fut.await.into_sequence())) }).classify()
}

/// Create an async sequence that awaits each future in turn
pub fn from_futures<I, F, T>(futures: I) -> Sequence<T>
where
    I: IntoIterator<Item = F>,
    I::IntoIter: Send + 'static,
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    Sequence::from_async(futures_util::stream::iter(futures).then(|fut| fut).map(Ok))
}

/// Create an async sequence draining a channel until all senders are gone
pub fn from_receiver<T: Send + 'static>(rx: Receiver<T>) -> Sequence<T> {
    from_stream(ReceiverStream::new(rx))
}

/// Create an empty sequence that completes immediately
pub fn empty<T: Send + 'static>() -> Sequence<T> {
    from_iter(std::iter::empty())
}

/// Emit a single element
pub fn once<T: Send + 'static>(item: T) -> Sequence<T> {
    from_iter(std::iter::once(item))
}

/// Repeat a value indefinitely
pub fn repeat<T: Clone + Send + 'static>(item: T) -> Sequence<T> {
    from_iter(std::iter::repeat(item))
}

/// Call `f` for every pulled element, indefinitely
pub fn repeat_with<T, F>(f: F) -> Sequence<T>
where
    F: FnMut() -> T + Send + 'static,
    T: Send + 'static,
{
    from_iter(std::iter::repeat_with(f))
}

/// Generate a sequence from a seed value and a step function
///
/// The step returns the next element and the next state, or `None` to end.
///
/// # Examples
/// ```
/// use lazyseq::seq::*;
///
/// # async fn example() {
/// let fibonacci = unfold((0u64, 1u64), |(a, b)| Some((a, (b, a + b))));
/// let first = to_array(take(8, fibonacci)).await.unwrap();
/// assert_eq!(first, vec![0, 1, 1, 2, 3, 5, 8, 13]);
/// # }
/// ```
pub fn unfold<S, T, F>(init: S, mut f: F) -> Sequence<T>
where
    S: Send + 'static,
    T: Send + 'static,
    F: FnMut(S) -> Option<(T, S)> + Send + 'static,
{
    let mut state = Some(init);
    from_iter(std::iter::from_fn(move || {
        let (item, next) = f(state.take()?)?;
        state = Some(next);
        Some(item)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_sync<T: Send + 'static>(seq: Sequence<T>) -> Vec<StreamResult<T>> {
        seq.into_iter_sync().unwrap().collect()
    }

    #[test]
    fn vectors_and_arrays_classify_as_sync() {
        assert!(!vec![1, 2].into_sequence().is_async());
        assert!(![1, 2, 3].into_sequence().is_async());
    }

    #[test]
    fn deferred_sources_classify_as_async() {
        let source = Source::deferred(async { Ok(Source::from(from_iter(vec![1]))) });
        assert!(source.is_deferred());
        assert!(source.classify().is_async());
    }

    #[test]
    fn non_iterable_values_are_rejected() {
        let err = Source::<Value>::try_from(Value::from(42)).err();
        assert_eq!(err, Some(StreamError::NotIterable { found: "number" }));

        let items = drain_sync(Value::Null.into_sequence());
        assert_eq!(items, vec![Err(StreamError::NotIterable { found: "null" })]);
    }

    #[test]
    fn strings_iterate_by_character() {
        let items = drain_sync(Value::from("ab").into_sequence());
        assert_eq!(items, vec![Ok(Value::from("a")), Ok(Value::from("b"))]);
    }

    #[test]
    fn maps_iterate_as_pairs() {
        let map = Value::map(vec![(Value::from("k"), Value::from(1))]);
        let items = drain_sync(map.into_sequence());
        let pair = Value::array(vec![Value::from("k"), Value::from(1)]);
        assert_eq!(items, vec![Ok(pair)]);
    }

    #[test]
    fn arrays_see_elements_pushed_during_iteration() {
        let array = Array::from(vec![Value::from(1)]);
        let mut iter = Value::Array(array.clone())
            .into_sequence()
            .into_iter_sync()
            .unwrap();
        assert_eq!(iter.next(), Some(Ok(Value::from(1))));
        array.push(Value::from(2));
        assert_eq!(iter.next(), Some(Ok(Value::from(2))));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn unfold_stops_when_step_returns_none() {
        let countdown = unfold(3, |n| if n == 0 { None } else { Some((n, n - 1)) });
        assert_eq!(drain_sync(countdown), vec![Ok(3), Ok(2), Ok(1)]);
    }
}
