//! Single-input operators as state machines
//!
//! A [`Stage`] is fed one element at a time and decides what to emit. The
//! same stage value runs unchanged under the blocking driver
//! ([`Iterator`]) and the polling driver ([`Stream`]); only the way the next
//! upstream element is obtained differs between the two.

use futures_core::Stream;
use futures_util::stream::StreamExt;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use super::{AsyncSeq, Sequence, SyncSeq};
use crate::error::{StreamError, StreamResult};

/// Decision taken by a stage for one input element
#[derive(Debug, Clone, PartialEq)]
pub enum Step<U> {
    /// Emit a value downstream
    Emit(U),
    /// Emit nothing and pull again
    Skip,
    /// End the sequence with an error
    Fail(StreamError),
}

/// A stateful transformation of one input sequence
pub trait Stage<T>: Send + 'static {
    type Output: Send + 'static;

    /// Value emitted before the first pull
    fn open(&mut self) -> Option<Self::Output> {
        None
    }

    fn feed(&mut self, item: T) -> Step<Self::Output>;

    /// Value emitted once the upstream is exhausted
    fn close(&mut self) -> Option<Self::Output> {
        None
    }

    /// `true` once the stage wants no further input; checked before every pull
    fn is_halted(&self) -> bool {
        false
    }
}

enum Phase {
    Opening,
    Running,
    Done,
}

enum Control<U> {
    Yield(StreamResult<U>),
    Pull,
    Finish,
}

/// Driver-independent bookkeeping around a stage
struct Machine<S> {
    stage: S,
    phase: Phase,
}

impl<S> Machine<S> {
    fn new(stage: S) -> Self {
        Self {
            stage,
            phase: Phase::Opening,
        }
    }

    /// What to do before touching the upstream
    fn resume<T>(&mut self) -> Control<S::Output>
    where
        S: Stage<T>,
    {
        if let Phase::Opening = self.phase {
            self.phase = Phase::Running;
            if let Some(first) = self.stage.open() {
                return Control::Yield(Ok(first));
            }
        }
        match self.phase {
            Phase::Running if self.stage.is_halted() => {
                self.phase = Phase::Done;
                Control::Finish
            }
            Phase::Running => Control::Pull,
            _ => Control::Finish,
        }
    }

    /// What to do with the element the driver just pulled
    fn accept<T>(&mut self, pulled: Option<StreamResult<T>>) -> Control<S::Output>
    where
        S: Stage<T>,
    {
        match pulled {
            Some(Ok(item)) => match self.stage.feed(item) {
                Step::Emit(out) => Control::Yield(Ok(out)),
                Step::Skip => Control::Pull,
                Step::Fail(err) => {
                    self.phase = Phase::Done;
                    Control::Yield(Err(err))
                }
            },
            Some(Err(err)) => {
                self.phase = Phase::Done;
                Control::Yield(Err(err))
            }
            None => {
                self.phase = Phase::Done;
                match self.stage.close() {
                    Some(last) => Control::Yield(Ok(last)),
                    None => Control::Finish,
                }
            }
        }
    }
}

pub(crate) struct SyncStaged<S, T> {
    upstream: SyncSeq<T>,
    machine: Machine<S>,
}

impl<S, T> Iterator for SyncStaged<S, T>
where
    S: Stage<T>,
{
    type Item = StreamResult<S::Output>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let control = match self.machine.resume::<T>() {
                Control::Pull => {
                    let pulled = self.upstream.next();
                    self.machine.accept(pulled)
                }
                other => other,
            };
            match control {
                Control::Yield(out) => return Some(out),
                Control::Pull => continue,
                Control::Finish => return None,
            }
        }
    }
}

pin_project! {
    #[must_use = "streams do nothing unless polled"]
    pub(crate) struct AsyncStaged<S, T> {
        upstream: AsyncSeq<T>,
        machine: Machine<S>,
    }
}

impl<S, T> Stream for AsyncStaged<S, T>
where
    S: Stage<T>,
{
    type Item = StreamResult<S::Output>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        loop {
            let control = match this.machine.resume::<T>() {
                Control::Pull => {
                    let pulled = ready!(this.upstream.poll_next_unpin(cx));
                    this.machine.accept(pulled)
                }
                other => other,
            };
            match control {
                Control::Yield(out) => return Poll::Ready(Some(out)),
                Control::Pull => continue,
                Control::Finish => return Poll::Ready(None),
            }
        }
    }
}

/// Run `stage` over `source`, keeping the source's sync/async kind
pub fn staged<T, S>(source: Sequence<T>, stage: S) -> Sequence<S::Output>
where
    T: Send + 'static,
    S: Stage<T>,
{
    match source {
        Sequence::Sync(upstream) => Sequence::from_sync(SyncStaged {
            upstream,
            machine: Machine::new(stage),
        }),
        Sequence::Async(upstream) => Sequence::from_async(AsyncStaged {
            upstream,
            machine: Machine::new(stage),
        }),
    }
}
