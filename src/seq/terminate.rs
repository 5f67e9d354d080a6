//! Guards that end a sequence after its first `None` or `Err`

use futures_core::Stream;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use crate::error::StreamResult;

pub(crate) struct Terminating<I> {
    inner: I,
    done: bool,
}

impl<I> Terminating<I> {
    pub(crate) fn new(inner: I) -> Self {
        Self { inner, done: false }
    }
}

impl<I, T> Iterator for Terminating<I>
where
    I: Iterator<Item = StreamResult<T>>,
{
    type Item = StreamResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.inner.next() {
            Some(Ok(item)) => Some(Ok(item)),
            Some(Err(err)) => {
                log::trace!("sync sequence failed: {}", err);
                self.done = true;
                Some(Err(err))
            }
            None => {
                log::trace!("sync sequence exhausted");
                self.done = true;
                None
            }
        }
    }
}

pin_project! {
    #[must_use = "streams do nothing unless polled"]
    pub(crate) struct TerminatingStream<S> {
        #[pin]
        inner: S,
        done: bool,
    }
}

impl<S> TerminatingStream<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self { inner, done: false }
    }
}

impl<S, T> Stream for TerminatingStream<S>
where
    S: Stream<Item = StreamResult<T>>,
{
    type Item = StreamResult<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if *this.done {
            return Poll::Ready(None);
        }
        match ready!(this.inner.poll_next(cx)) {
            Some(Ok(item)) => Poll::Ready(Some(Ok(item))),
            Some(Err(err)) => {
                log::trace!("async sequence failed: {}", err);
                *this.done = true;
                Poll::Ready(Some(Err(err)))
            }
            None => {
                log::trace!("async sequence exhausted");
                *this.done = true;
                Poll::Ready(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StreamError;

    #[test]
    fn stops_after_first_error() {
        let items = vec![Ok(1), Err(StreamError::source("boom")), Ok(3)];
        let mut guarded = Terminating::new(items.into_iter());
        assert_eq!(guarded.next(), Some(Ok(1)));
        assert_eq!(guarded.next(), Some(Err(StreamError::source("boom"))));
        assert_eq!(guarded.next(), None);
        assert_eq!(guarded.next(), None);
    }

    #[test]
    fn exhaustion_does_not_touch_the_source_again() {
        let mut pulls = 0;
        let source = std::iter::from_fn(|| {
            pulls += 1;
            None::<StreamResult<i32>>
        });
        let mut guarded = Terminating::new(source);
        assert_eq!(guarded.next(), None);
        assert_eq!(guarded.next(), None);
        drop(guarded);
        assert_eq!(pulls, 1);
    }
}
