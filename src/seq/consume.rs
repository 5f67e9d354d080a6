//! Terminal operations that drive a sequence to completion

use futures_util::future::FutureExt;
use futures_util::stream::StreamExt;
use std::future::Future;

use super::source::IntoSequence;
use super::{Eval, Sequence};
use crate::config::BufferConfig;
use crate::error::{StreamError, StreamResult};

/// Collect every element into a vector
///
/// Always awaited, even for a sync source. The first error aborts collection
/// and is returned.
pub async fn to_array<T: Send + 'static>(source: impl IntoSequence<T>) -> StreamResult<Vec<T>> {
    to_array_with(BufferConfig::default(), source).await
}

/// Collect every element into a vector sized and bounded by `config`
///
/// With `max_len` set, pulling one element beyond the limit fails with
/// `CapacityExceeded` instead of growing the buffer.
pub async fn to_array_with<T: Send + 'static>(
    config: BufferConfig,
    source: impl IntoSequence<T>,
) -> StreamResult<Vec<T>> {
    let mut buf = Vec::with_capacity(config.capacity_hint());
    match source.into_sequence() {
        Sequence::Sync(iter) => {
            for item in iter {
                push_bounded(&mut buf, item?, &config)?;
            }
        }
        Sequence::Async(mut stream) => {
            while let Some(item) = stream.next().await {
                push_bounded(&mut buf, item?, &config)?;
            }
        }
    }
    Ok(buf)
}

fn push_bounded<T>(buf: &mut Vec<T>, item: T, config: &BufferConfig) -> StreamResult<()> {
    if let Some(limit) = config.max_len {
        if buf.len() >= limit {
            log::warn!("collection exceeded max_len of {}", limit);
            return Err(StreamError::CapacityExceeded { limit });
        }
    }
    buf.push(item);
    Ok(())
}

/// Whether `predicate` holds for every element
///
/// Stops pulling at the first element that fails the predicate. An empty
/// source gives `true`. The answer is [`Eval::Now`] for a sync source and
/// [`Eval::Later`] for an async one; either can be awaited.
///
/// # Examples
/// ```
/// use lazyseq::seq::*;
///
/// let all_even = every(|n: &i32| n % 2 == 0, vec![2, 4, 6]);
/// assert_eq!(all_even.try_now().unwrap(), Ok(true));
/// ```
pub fn every<T, F>(mut predicate: F, source: impl IntoSequence<T>) -> Eval<bool>
where
    T: Send + 'static,
    F: FnMut(&T) -> bool + Send + 'static,
{
    match source.into_sequence() {
        Sequence::Sync(iter) => {
            let mut verdict = Ok(true);
            for item in iter {
                match item {
                    Ok(value) if predicate(&value) => continue,
                    Ok(_) => verdict = Ok(false),
                    Err(err) => verdict = Err(err),
                }
                break;
            }
            Eval::Now(verdict)
        }
        Sequence::Async(mut stream) => Eval::Later(
            async move {
                while let Some(item) = stream.next().await {
                    if !predicate(&item?) {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            .boxed(),
        ),
    }
}

/// Whether the async `predicate` resolves to `true` for every element
///
/// Always [`Eval::Later`].
pub fn every_async<T, F, Fut>(mut predicate: F, source: impl IntoSequence<T>) -> Eval<bool>
where
    T: Send + 'static,
    F: FnMut(&T) -> Fut + Send + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    let mut stream = source.into_sequence().into_stream();
    Eval::Later(
        async move {
            while let Some(item) = stream.next().await {
                let value = item?;
                let verdict = predicate(&value);
                if !verdict.await {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        .boxed(),
    )
}
