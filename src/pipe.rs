//! Partially applied operators and left-to-right composition
//!
//! Every operator in [`crate::seq`] takes its data last. The functions here
//! take everything but the data and return a [`Pipe`], a reusable function
//! from one [`Sequence`] to another that can be composed with other pipes
//! and applied later. Terminal operators return plain closures instead.

use futures_util::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;

use crate::config::BufferConfig;
use crate::error::StreamResult;
use crate::seq::{self, ChunkSize, Eval, IntoSequence, Sequence};

/// A Pipe is a transformation from a sequence of `I` to a sequence of `O`
pub struct Pipe<I, O> {
    f: Arc<dyn Fn(Sequence<I>) -> Sequence<O> + Send + Sync + 'static>,
}

impl<I, O> Clone for Pipe<I, O> {
    fn clone(&self) -> Self {
        Pipe {
            f: Arc::clone(&self.f),
        }
    }
}

impl<I: Send + 'static, O: Send + 'static> Pipe<I, O> {
    /// Create a new pipe from a function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Sequence<I>) -> Sequence<O> + Send + Sync + 'static,
    {
        Pipe { f: Arc::new(f) }
    }

    /// Apply this pipe to any sequence input
    pub fn apply(&self, input: impl IntoSequence<I>) -> Sequence<O> {
        (self.f)(input.into_sequence())
    }

    /// This pipe as a plain function, for use as a stage of [`pipe!`](crate::pipe!) or
    /// [`pipe_async!`](crate::pipe_async)
    pub fn into_fn(self) -> impl Fn(Sequence<I>) -> Sequence<O> + Clone + Send + Sync {
        move |input: Sequence<I>| self.apply(input)
    }
}

impl<I, O> std::fmt::Debug for Pipe<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Pipe(..)")
    }
}

/// Compose two pipes together
pub fn compose<I, M, O>(p1: Pipe<I, M>, p2: Pipe<M, O>) -> Pipe<I, O>
where
    I: Send + 'static,
    M: Send + 'static,
    O: Send + 'static,
{
    Pipe::new(move |input| p2.apply(p1.apply(input)))
}

/// Identity pipe that passes the sequence through untouched
pub fn identity<I: Send + 'static>() -> Pipe<I, I> {
    Pipe::new(|input| input)
}

/// Extension trait for pipes
pub trait PipeExt<I, O> {
    /// Compose this pipe with another pipe
    fn compose<P>(self, other: Pipe<O, P>) -> Pipe<I, P>
    where
        P: Send + 'static;
}

impl<I, O> PipeExt<I, O> for Pipe<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    fn compose<P>(self, other: Pipe<O, P>) -> Pipe<I, P>
    where
        P: Send + 'static,
    {
        compose(self, other)
    }
}

// ================================
// Transformations
// ================================

/// Create a pipe that applies the given function to each element
pub fn map<I, O, F>(f: F) -> Pipe<I, O>
where
    F: Fn(I) -> O + Send + Sync + Clone + 'static,
    I: Send + 'static,
    O: Send + 'static,
{
    Pipe::new(move |input| seq::map(f.clone(), input))
}

/// Create a pipe that applies a fallible function to each element
pub fn try_map<I, O, F>(f: F) -> Pipe<I, O>
where
    F: Fn(I) -> StreamResult<O> + Send + Sync + Clone + 'static,
    I: Send + 'static,
    O: Send + 'static,
{
    Pipe::new(move |input| seq::try_map(f.clone(), input))
}

/// Create a pipe that applies an async function to each element
pub fn map_async<I, O, F, Fut>(f: F) -> Pipe<I, O>
where
    F: Fn(I) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = O> + Send + 'static,
    I: Send + 'static,
    O: Send + 'static,
{
    Pipe::new(move |input| seq::map_async(f.clone(), input))
}

/// Create a pipe that filters elements based on the predicate
pub fn filter<I, F>(predicate: F) -> Pipe<I, I>
where
    F: Fn(&I) -> bool + Send + Sync + Clone + 'static,
    I: Send + 'static,
{
    Pipe::new(move |input| seq::filter(predicate.clone(), input))
}

/// Create a pipe that filters elements based on an async predicate
pub fn filter_async<I, F, Fut>(predicate: F) -> Pipe<I, I>
where
    F: Fn(&I) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = bool> + Send + 'static,
    I: Send + 'static,
{
    Pipe::new(move |input| seq::filter_async(predicate.clone(), input))
}

/// Create a pipe that groups elements into vectors of `size`
pub fn chunk<I: Send + 'static>(size: impl Into<ChunkSize>) -> Pipe<I, Vec<I>> {
    let size: ChunkSize = size.into();
    Pipe::new(move |input| seq::chunk(size, input))
}

pub fn take<I: Send + 'static>(count: usize) -> Pipe<I, I> {
    Pipe::new(move |input| seq::take(count, input))
}

pub fn drop<I: Send + 'static>(count: usize) -> Pipe<I, I> {
    Pipe::new(move |input| seq::drop(count, input))
}

pub fn drop_while<I, F>(predicate: F) -> Pipe<I, I>
where
    F: Fn(&I) -> bool + Send + Sync + Clone + 'static,
    I: Send + 'static,
{
    Pipe::new(move |input| seq::drop_while(predicate.clone(), input))
}

pub fn drop_while_async<I, F, Fut>(predicate: F) -> Pipe<I, I>
where
    F: Fn(&I) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = bool> + Send + 'static,
    I: Send + 'static,
{
    Pipe::new(move |input| seq::drop_while_async(predicate.clone(), input))
}

/// Create a pipe yielding running accumulations starting from `initial`
pub fn scan<I, A, F>(f: F, initial: A) -> Pipe<I, A>
where
    F: Fn(A, I) -> A + Send + Sync + Clone + 'static,
    A: Clone + Send + Sync + 'static,
    I: Send + 'static,
{
    Pipe::new(move |input| seq::scan(f.clone(), initial.clone(), input))
}

pub fn scan_async<I, A, F, Fut>(f: F, initial: A) -> Pipe<I, A>
where
    F: Fn(A, I) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = A> + Send + 'static,
    A: Clone + Send + Sync + 'static,
    I: Send + 'static,
{
    Pipe::new(move |input| seq::scan_async(f.clone(), initial.clone(), input))
}

pub fn append<I: Clone + Send + Sync + 'static>(value: I) -> Pipe<I, I> {
    Pipe::new(move |input| seq::append(value.clone(), input))
}

pub fn prepend<I: Clone + Send + Sync + 'static>(value: I) -> Pipe<I, I> {
    Pipe::new(move |input| seq::prepend(value.clone(), input))
}

// ================================
// Combinations
// ================================

/// Create a pipe that yields its input followed by `second`
///
/// `second` is cloned for every application, so it has to be a reusable
/// input such as a `Vec` or a [`Value`](crate::value::Value).
pub fn concat<I, S>(second: S) -> Pipe<I, I>
where
    S: IntoSequence<I> + Clone + Send + Sync + 'static,
    I: Send + 'static,
{
    Pipe::new(move |input| seq::concat(second.clone(), input))
}

pub fn flatten<I, O>() -> Pipe<I, O>
where
    I: IntoSequence<O> + Send + 'static,
    O: Send + 'static,
{
    Pipe::new(|input| seq::flatten(input))
}

/// Create a pipe pairing `other` with its input, `other` first; `other` is
/// cloned for every application
pub fn zip<A, B, S>(other: S) -> Pipe<B, (A, B)>
where
    S: IntoSequence<A> + Clone + Send + Sync + 'static,
    A: Send + 'static,
    B: Send + 'static,
{
    Pipe::new(move |input| seq::zip(other.clone(), input))
}

pub fn zip_with<A, B, O, F, S>(f: F, other: S) -> Pipe<B, O>
where
    F: Fn(A, B) -> O + Send + Sync + Clone + 'static,
    S: IntoSequence<A> + Clone + Send + Sync + 'static,
    A: Send + 'static,
    B: Send + 'static,
    O: Send + 'static,
{
    Pipe::new(move |input| seq::zip_with(f.clone(), other.clone(), input))
}

pub fn zip_with_async<A, B, O, F, Fut, S>(f: F, other: S) -> Pipe<B, O>
where
    F: Fn(A, B) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = O> + Send + 'static,
    S: IntoSequence<A> + Clone + Send + Sync + 'static,
    A: Send + 'static,
    B: Send + 'static,
    O: Send + 'static,
{
    Pipe::new(move |input| seq::zip_with_async(f.clone(), other.clone(), input))
}

// ================================
// Terminals
// ================================

/// Partially applied [`seq::every`]
pub fn every<I, F>(predicate: F) -> impl Fn(Sequence<I>) -> Eval<bool> + Clone + Send + Sync
where
    F: Fn(&I) -> bool + Send + Sync + Clone + 'static,
    I: Send + 'static,
{
    move |input: Sequence<I>| seq::every(predicate.clone(), input)
}

/// Partially applied [`seq::every_async`]
pub fn every_async<I, F, Fut>(
    predicate: F,
) -> impl Fn(Sequence<I>) -> Eval<bool> + Clone + Send + Sync
where
    F: Fn(&I) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = bool> + Send + 'static,
    I: Send + 'static,
{
    move |input: Sequence<I>| seq::every_async(predicate.clone(), input)
}

/// Partially applied [`seq::to_array`]
pub fn to_array<I: Send + 'static>(
) -> impl Fn(Sequence<I>) -> BoxFuture<'static, StreamResult<Vec<I>>> + Clone + Send + Sync {
    |input: Sequence<I>| seq::to_array(input).boxed()
}

/// Partially applied [`seq::to_array_with`]
pub fn to_array_with<I: Send + 'static>(
    config: BufferConfig,
) -> impl Fn(Sequence<I>) -> BoxFuture<'static, StreamResult<Vec<I>>> + Clone + Send + Sync {
    move |input: Sequence<I>| seq::to_array_with(config.clone(), input).boxed()
}

// ================================
// Macros
// ================================

/// Apply functions to a value from left to right
///
/// `pipe!(x, f, g)` is `g(f(x))`.
///
/// # Examples
/// ```
/// use lazyseq::{pipe, seq};
///
/// let evens = pipe!(
///     seq::from_iter(1..=6),
///     |s| seq::filter(|n: &i32| n % 2 == 0, s),
///     |s| seq::map(|n: i32| n * 10, s),
/// );
/// let out: Vec<_> = evens.into_iter_sync().unwrap().collect();
/// assert_eq!(out, vec![Ok(20), Ok(40), Ok(60)]);
/// ```
#[macro_export]
macro_rules! pipe {
    ($value:expr) => {
        $value
    };

    ($value:expr, $function:expr $(,)?) => {
        $function($value)
    };

    ($value:expr, $function:expr, $($remaining_functions:expr),+ $(,)?) => {
        $crate::pipe!($function($value), $($remaining_functions),+)
    };
}

/// Apply functions to a value from left to right inside an `async` block
///
/// A stage written `=>> f` returns something awaitable; it is awaited
/// before its output reaches the next stage. Plain stages are applied as
/// they are. The whole chain is an `async move` block, so nothing runs until
/// it is awaited.
///
/// # Examples
/// ```
/// use lazyseq::{pipe, pipe_async, seq, StreamResult};
///
/// # async fn example() {
/// let total = pipe_async!(
///     seq::from_iter(vec![1, 2, 3]),
///     pipe::map(|n: i32| n + 1).into_fn(),
///     =>> pipe::to_array(),
///     |items: StreamResult<Vec<i32>>| items.map(|v| v.iter().sum::<i32>()),
/// )
/// .await;
/// assert_eq!(total, Ok(9));
/// # }
/// ```
#[macro_export]
macro_rules! pipe_async {
    (@chain $value:expr $(,)?) => {
        $value
    };

    (@chain $value:expr, =>> $function:expr $(, $($rest:tt)*)?) => {
        $crate::pipe_async!(
            @chain ::std::future::IntoFuture::into_future($function($value)).await
            $(, $($rest)*)?
        )
    };

    (@chain $value:expr, $function:expr $(, $($rest:tt)*)?) => {
        $crate::pipe_async!(@chain $function($value) $(, $($rest)*)?)
    };

    ($value:expr $(, $($rest:tt)*)?) => {
        async move { $crate::pipe_async!(@chain $value $(, $($rest)*)?) }
    };
}
