//! Lazy sequences over synchronous and asynchronous sources
//!
//! A [`Sequence`] is decided once, at construction, to be either a blocking
//! [`Iterator`] (`Sync`) or a [`Stream`] (`Async`). Operators wrap one
//! sequence in another without buffering; a sequence stays `Sync` only while
//! everything it wraps is `Sync` and every callback it runs is synchronous.
//!
//! Items are `StreamResult<T>`. A sequence ends after `None` or after its
//! first `Err`, and keeps answering `None` from then on.

use futures_core::Stream;
use futures_util::future::{self, BoxFuture, FutureExt};
use futures_util::stream::{self, BoxStream, StreamExt};
use std::fmt;
use std::future::IntoFuture;

use crate::error::StreamResult;

pub mod combine;
pub mod consume;
pub mod source;
pub mod stage;
mod terminate;
pub mod transform;

pub use combine::{concat, flatten, zip, zip_with, zip_with_async};
pub use consume::{every, every_async, to_array, to_array_with};
pub use source::{
    empty, from_future, from_futures, from_iter, from_receiver, from_result_stream, from_results,
    from_stream, once, repeat, repeat_with, unfold, IntoSequence, Source,
};
pub use stage::{staged, Stage, Step};
pub use transform::{
    append, chunk, drop, drop_while, drop_while_async, filter, filter_async, map, map_async,
    prepend, scan, scan_async, take, try_map, ChunkSize,
};

use terminate::{Terminating, TerminatingStream};

/// A boxed blocking sequence
pub type SyncSeq<T> = Box<dyn Iterator<Item = StreamResult<T>> + Send + 'static>;

/// A boxed suspending sequence
pub type AsyncSeq<T> = BoxStream<'static, StreamResult<T>>;

/// A lazy sequence, either pulled without suspension or pulled by polling
pub enum Sequence<T> {
    Sync(SyncSeq<T>),
    Async(AsyncSeq<T>),
}

impl<T: Send + 'static> Sequence<T> {
    /// Wrap a fallible iterator; the result ends after its first error
    pub fn from_sync<I>(iter: I) -> Self
    where
        I: Iterator<Item = StreamResult<T>> + Send + 'static,
    {
        Sequence::Sync(Box::new(Terminating::new(iter)))
    }

    /// Wrap a fallible stream; the result ends after its first error
    pub fn from_async<S>(stream: S) -> Self
    where
        S: Stream<Item = StreamResult<T>> + Send + 'static,
    {
        Sequence::Async(TerminatingStream::new(stream).boxed())
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Sequence::Async(_))
    }

    /// View any sequence as a stream; a sync sequence never returns `Pending`
    pub fn into_stream(self) -> AsyncSeq<T> {
        match self {
            Sequence::Sync(iter) => stream::iter(iter).boxed(),
            Sequence::Async(stream) => stream,
        }
    }

    /// The iterator of a sync sequence, or the sequence back if it is async
    pub fn into_iter_sync(self) -> Result<SyncSeq<T>, Self> {
        match self {
            Sequence::Sync(iter) => Ok(iter),
            async_seq => Err(async_seq),
        }
    }
}

impl<T> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sequence::Sync(_) => f.write_str("Sequence::Sync(..)"),
            Sequence::Async(_) => f.write_str("Sequence::Async(..)"),
        }
    }
}

/// Result of a terminal operation: available now for a sync source, or
/// after awaiting for an async one
pub enum Eval<T> {
    Now(StreamResult<T>),
    Later(BoxFuture<'static, StreamResult<T>>),
}

impl<T: Send + 'static> Eval<T> {
    pub fn is_now(&self) -> bool {
        matches!(self, Eval::Now(_))
    }

    /// The ready result, or the evaluation back if it still has to be awaited
    pub fn try_now(self) -> Result<StreamResult<T>, Self> {
        match self {
            Eval::Now(result) => Ok(result),
            later => Err(later),
        }
    }
}

impl<T: Send + 'static> IntoFuture for Eval<T> {
    type Output = StreamResult<T>;
    type IntoFuture = BoxFuture<'static, StreamResult<T>>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Eval::Now(result) => future::ready(result).boxed(),
            Eval::Later(fut) => fut,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Eval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eval::Now(result) => f.debug_tuple("Eval::Now").field(result).finish(),
            Eval::Later(_) => f.write_str("Eval::Later(..)"),
        }
    }
}
