//! Single-input operators
//!
//! Operators with synchronous callbacks are [`Stage`]s and keep the kind of
//! their source. The `_async` variants await their callback and always
//! produce an async sequence.

use async_stream::stream;
use futures_util::stream::StreamExt;
use std::future::Future;
use std::num::NonZeroUsize;

use super::source::IntoSequence;
use super::stage::{staged, Stage, Step};
use super::Sequence;
use crate::error::StreamResult;

// ================================
// Stages
// ================================

struct Map<F> {
    f: F,
}

impl<T, U, F> Stage<T> for Map<F>
where
    F: FnMut(T) -> U + Send + 'static,
    U: Send + 'static,
{
    type Output = U;

    fn feed(&mut self, item: T) -> Step<U> {
        Step::Emit((self.f)(item))
    }
}

struct TryMap<F> {
    f: F,
}

impl<T, U, F> Stage<T> for TryMap<F>
where
    F: FnMut(T) -> StreamResult<U> + Send + 'static,
    U: Send + 'static,
{
    type Output = U;

    fn feed(&mut self, item: T) -> Step<U> {
        match (self.f)(item) {
            Ok(out) => Step::Emit(out),
            Err(err) => Step::Fail(err),
        }
    }
}

struct Filter<F> {
    predicate: F,
}

impl<T, F> Stage<T> for Filter<F>
where
    T: Send + 'static,
    F: FnMut(&T) -> bool + Send + 'static,
{
    type Output = T;

    fn feed(&mut self, item: T) -> Step<T> {
        if (self.predicate)(&item) {
            Step::Emit(item)
        } else {
            Step::Skip
        }
    }
}

struct Chunk<T> {
    size: Option<NonZeroUsize>,
    buf: Vec<T>,
}

impl<T: Send + 'static> Stage<T> for Chunk<T> {
    type Output = Vec<T>;

    fn feed(&mut self, item: T) -> Step<Vec<T>> {
        let size = match self.size {
            Some(size) => size.get(),
            None => return Step::Skip,
        };
        self.buf.push(item);
        if self.buf.len() == size {
            Step::Emit(std::mem::take(&mut self.buf))
        } else {
            Step::Skip
        }
    }

    fn close(&mut self) -> Option<Vec<T>> {
        if self.buf.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buf))
        }
    }

    fn is_halted(&self) -> bool {
        self.size.is_none()
    }
}

struct TakeCount {
    remaining: usize,
}

impl<T: Send + 'static> Stage<T> for TakeCount {
    type Output = T;

    fn feed(&mut self, item: T) -> Step<T> {
        self.remaining = self.remaining.saturating_sub(1);
        Step::Emit(item)
    }

    fn is_halted(&self) -> bool {
        self.remaining == 0
    }
}

struct DropCount {
    remaining: usize,
}

impl<T: Send + 'static> Stage<T> for DropCount {
    type Output = T;

    fn feed(&mut self, item: T) -> Step<T> {
        if self.remaining > 0 {
            self.remaining -= 1;
            Step::Skip
        } else {
            Step::Emit(item)
        }
    }
}

struct DropWhile<F> {
    predicate: F,
    dropping: bool,
}

impl<T, F> Stage<T> for DropWhile<F>
where
    T: Send + 'static,
    F: FnMut(&T) -> bool + Send + 'static,
{
    type Output = T;

    fn feed(&mut self, item: T) -> Step<T> {
        if self.dropping && (self.predicate)(&item) {
            return Step::Skip;
        }
        self.dropping = false;
        Step::Emit(item)
    }
}

struct Scan<F, A> {
    f: F,
    acc: A,
}

impl<T, A, F> Stage<T> for Scan<F, A>
where
    A: Clone + Send + 'static,
    F: FnMut(A, T) -> A + Send + 'static,
{
    type Output = A;

    fn feed(&mut self, item: T) -> Step<A> {
        self.acc = (self.f)(self.acc.clone(), item);
        Step::Emit(self.acc.clone())
    }
}

struct Append<T> {
    value: Option<T>,
}

impl<T: Send + 'static> Stage<T> for Append<T> {
    type Output = T;

    fn feed(&mut self, item: T) -> Step<T> {
        Step::Emit(item)
    }

    fn close(&mut self) -> Option<T> {
        self.value.take()
    }
}

struct Prepend<T> {
    value: Option<T>,
}

impl<T: Send + 'static> Stage<T> for Prepend<T> {
    type Output = T;

    fn open(&mut self) -> Option<T> {
        self.value.take()
    }

    fn feed(&mut self, item: T) -> Step<T> {
        Step::Emit(item)
    }
}

// ================================
// Chunk size
// ================================

/// Group size accepted by [`chunk`]
///
/// Floats are floored; anything that is not a positive finite integer
/// afterwards is degenerate and makes `chunk` yield nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSize(Option<NonZeroUsize>);

impl ChunkSize {
    pub fn get(&self) -> Option<usize> {
        self.0.map(NonZeroUsize::get)
    }

    pub fn is_degenerate(&self) -> bool {
        self.0.is_none()
    }
}

impl From<usize> for ChunkSize {
    fn from(size: usize) -> Self {
        ChunkSize(NonZeroUsize::new(size))
    }
}

impl From<i32> for ChunkSize {
    fn from(size: i32) -> Self {
        ChunkSize(usize::try_from(size).ok().and_then(NonZeroUsize::new))
    }
}

impl From<i64> for ChunkSize {
    fn from(size: i64) -> Self {
        ChunkSize(usize::try_from(size).ok().and_then(NonZeroUsize::new))
    }
}

impl From<f64> for ChunkSize {
    fn from(size: f64) -> Self {
        if !size.is_finite() {
            return ChunkSize(None);
        }
        let floored = size.floor();
        if floored < 1.0 || floored > usize::MAX as f64 {
            return ChunkSize(None);
        }
        ChunkSize(NonZeroUsize::new(floored as usize))
    }
}

// ================================
// Operators
// ================================

/// Apply `f` to each element
///
/// # Examples
/// ```
/// use lazyseq::seq::*;
///
/// # async fn example() {
/// let doubled = to_array(map(|x: i32| x * 2, vec![1, 2, 3])).await.unwrap();
/// assert_eq!(doubled, vec![2, 4, 6]);
/// # }
/// ```
pub fn map<T, U, F>(f: F, source: impl IntoSequence<T>) -> Sequence<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> U + Send + 'static,
{
    staged(source.into_sequence(), Map { f })
}

/// Apply a fallible `f` to each element; the first `Err` ends the sequence
pub fn try_map<T, U, F>(f: F, source: impl IntoSequence<T>) -> Sequence<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> StreamResult<U> + Send + 'static,
{
    staged(source.into_sequence(), TryMap { f })
}

/// Apply an async `f` to each element, awaiting each result before yielding it
pub fn map_async<T, U, F, Fut>(mut f: F, source: impl IntoSequence<T>) -> Sequence<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> Fut + Send + 'static,
    Fut: Future<Output = U> + Send + 'static,
{
    let mut upstream = source.into_sequence().into_stream();
    Sequence::from_async(stream! {
        while let Some(item) = upstream.next().await {
            match item {
                Ok(value) => {
                    yield Ok(f(value).await);
                }
                Err(err) => {
                    yield Err(err);
                    break;
                }
            }
        }
    })
}

/// Keep the elements for which `predicate` holds
pub fn filter<T, F>(predicate: F, source: impl IntoSequence<T>) -> Sequence<T>
where
    T: Send + 'static,
    F: FnMut(&T) -> bool + Send + 'static,
{
    staged(source.into_sequence(), Filter { predicate })
}

/// Keep the elements for which the async `predicate` resolves to `true`
pub fn filter_async<T, F, Fut>(mut predicate: F, source: impl IntoSequence<T>) -> Sequence<T>
where
    T: Send + 'static,
    F: FnMut(&T) -> Fut + Send + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    let mut upstream = source.into_sequence().into_stream();
    Sequence::from_async(stream! {
        while let Some(item) = upstream.next().await {
            match item {
                Ok(value) => {
                    let keep = predicate(&value);
                    if keep.await {
                        yield Ok(value);
                    }
                }
                Err(err) => {
                    yield Err(err);
                    break;
                }
            }
        }
    })
}

/// Group consecutive elements into vectors of `size`
///
/// A trailing group shorter than `size` is emitted when the source ends. A
/// degenerate size (zero, negative, non-finite) yields an empty sequence
/// without pulling the source.
///
/// # Examples
/// ```
/// use lazyseq::seq::*;
///
/// # async fn example() {
/// let groups = to_array(chunk(2, vec![1, 2, 3, 4, 5])).await.unwrap();
/// assert_eq!(groups, vec![vec![1, 2], vec![3, 4], vec![5]]);
/// # }
/// ```
pub fn chunk<T>(size: impl Into<ChunkSize>, source: impl IntoSequence<T>) -> Sequence<Vec<T>>
where
    T: Send + 'static,
{
    let size: ChunkSize = size.into();
    staged(
        source.into_sequence(),
        Chunk {
            size: size.0,
            buf: Vec::new(),
        },
    )
}

/// Yield at most the first `count` elements; the source is not pulled again
/// once `count` elements have been produced
pub fn take<T: Send + 'static>(count: usize, source: impl IntoSequence<T>) -> Sequence<T> {
    staged(source.into_sequence(), TakeCount { remaining: count })
}

/// Skip the first `count` elements
pub fn drop<T: Send + 'static>(count: usize, source: impl IntoSequence<T>) -> Sequence<T> {
    staged(source.into_sequence(), DropCount { remaining: count })
}

/// Skip elements while `predicate` holds, then yield the rest
///
/// The predicate is not consulted again after its first `false`.
pub fn drop_while<T, F>(predicate: F, source: impl IntoSequence<T>) -> Sequence<T>
where
    T: Send + 'static,
    F: FnMut(&T) -> bool + Send + 'static,
{
    staged(
        source.into_sequence(),
        DropWhile {
            predicate,
            dropping: true,
        },
    )
}

/// Async counterpart of [`drop_while`]
pub fn drop_while_async<T, F, Fut>(mut predicate: F, source: impl IntoSequence<T>) -> Sequence<T>
where
    T: Send + 'static,
    F: FnMut(&T) -> Fut + Send + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    let mut upstream = source.into_sequence().into_stream();
    Sequence::from_async(stream! {
        let mut dropping = true;
        while let Some(item) = upstream.next().await {
            match item {
                Ok(value) => {
                    if dropping {
                        let skip = predicate(&value);
                        if skip.await {
                            continue;
                        }
                    }
                    dropping = false;
                    yield Ok(value);
                }
                Err(err) => {
                    yield Err(err);
                    break;
                }
            }
        }
    })
}

/// Running accumulation; yields every updated accumulator but never `initial`
///
/// # Examples
/// ```
/// use lazyseq::seq::*;
///
/// # async fn example() {
/// let sums = to_array(scan(|acc: i32, n: i32| acc + n, 0, vec![1, 2, 3])).await.unwrap();
/// assert_eq!(sums, vec![1, 3, 6]);
/// # }
/// ```
pub fn scan<T, A, F>(f: F, initial: A, source: impl IntoSequence<T>) -> Sequence<A>
where
    T: Send + 'static,
    A: Clone + Send + 'static,
    F: FnMut(A, T) -> A + Send + 'static,
{
    staged(source.into_sequence(), Scan { f, acc: initial })
}

/// Async counterpart of [`scan`]
pub fn scan_async<T, A, F, Fut>(mut f: F, initial: A, source: impl IntoSequence<T>) -> Sequence<A>
where
    T: Send + 'static,
    A: Clone + Send + 'static,
    F: FnMut(A, T) -> Fut + Send + 'static,
    Fut: Future<Output = A> + Send + 'static,
{
    let mut upstream = source.into_sequence().into_stream();
    Sequence::from_async(stream! {
        let mut acc = initial;
        while let Some(item) = upstream.next().await {
            match item {
                Ok(value) => {
                    acc = f(acc.clone(), value).await;
                    yield Ok(acc.clone());
                }
                Err(err) => {
                    yield Err(err);
                    break;
                }
            }
        }
    })
}

/// Yield the source, then `value`
pub fn append<T: Send + 'static>(value: T, source: impl IntoSequence<T>) -> Sequence<T> {
    staged(source.into_sequence(), Append { value: Some(value) })
}

/// Yield `value`, then the source
pub fn prepend<T: Send + 'static>(value: T, source: impl IntoSequence<T>) -> Sequence<T> {
    staged(source.into_sequence(), Prepend { value: Some(value) })
}
