//! Operators over more than one sequence: concat, flatten, zip

use async_stream::stream;
use futures_util::stream::StreamExt;
use std::future::Future;
use std::marker::PhantomData;

use super::source::IntoSequence;
use super::{Sequence, SyncSeq};
use crate::error::{StreamError, StreamResult};

/// Yield all of `first`, then all of `second`
///
/// The result is sync only when both inputs are sync. Note the data-last
/// order: `first` is the data argument.
///
/// # Examples
/// ```
/// use lazyseq::seq::*;
///
/// # async fn example() {
/// let joined = to_array(concat(vec![3, 4], vec![1, 2])).await.unwrap();
/// assert_eq!(joined, vec![1, 2, 3, 4]);
/// # }
/// ```
pub fn concat<T: Send + 'static>(
    second: impl IntoSequence<T>,
    first: impl IntoSequence<T>,
) -> Sequence<T> {
    match (first.into_sequence(), second.into_sequence()) {
        (Sequence::Sync(a), Sequence::Sync(b)) => Sequence::from_sync(a.chain(b)),
        (a, b) => Sequence::from_async(a.into_stream().chain(b.into_stream())),
    }
}

/// Walks a sync outer sequence, draining each inner sequence in turn
struct SyncFlatten<I, T> {
    outer: SyncSeq<I>,
    inner: Option<SyncSeq<T>>,
}

impl<I, T> Iterator for SyncFlatten<I, T>
where
    I: IntoSequence<T>,
    T: Send + 'static,
{
    type Item = StreamResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(inner) = self.inner.as_mut() {
                match inner.next() {
                    Some(item) => return Some(item),
                    None => self.inner = None,
                }
            }

            match self.outer.next()? {
                Ok(candidate) => match candidate.into_sequence() {
                    Sequence::Sync(iter) => self.inner = Some(iter),
                    Sequence::Async(_) => {
                        return Some(Err(StreamError::NotIterable {
                            found: "async sequence",
                        }))
                    }
                },
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

/// Flatten one level of nesting
///
/// Each inner sequence is drained completely before the next one is pulled
/// from the outer sequence. A sync outer sequence produces a sync result, so
/// it can only drain sync inner sequences; meeting an async or deferred one
/// ends the result with `NotIterable`. An async outer sequence accepts inner
/// sequences of any kind.
pub fn flatten<T, I>(source: impl IntoSequence<I>) -> Sequence<T>
where
    T: Send + 'static,
    I: IntoSequence<T> + Send + 'static,
{
    match source.into_sequence() {
        Sequence::Sync(outer) => Sequence::from_sync(SyncFlatten { outer, inner: None }),
        Sequence::Async(mut outer) => Sequence::from_async(stream! {
            'outer: while let Some(candidate) = outer.next().await {
                match candidate {
                    Ok(candidate) => {
                        let mut inner = candidate.into_sequence().into_stream();
                        while let Some(item) = inner.next().await {
                            let failed = item.is_err();
                            yield item;
                            if failed {
                                break 'outer;
                            }
                        }
                    }
                    Err(err) => {
                        yield Err(err);
                        break;
                    }
                }
            }
        }),
    }
}

/// Pairs up two sync sequences, pulling the data side first
struct SyncZip<A, B, F, U> {
    other: SyncSeq<A>,
    source: SyncSeq<B>,
    f: F,
    _marker: PhantomData<fn() -> U>,
}

impl<A, B, F, U> Iterator for SyncZip<A, B, F, U>
where
    F: FnMut(A, B) -> U,
{
    type Item = StreamResult<U>;

    fn next(&mut self) -> Option<Self::Item> {
        let b = match self.source.next()? {
            Ok(b) => b,
            Err(err) => return Some(Err(err)),
        };
        let a = match self.other.next()? {
            Ok(a) => a,
            Err(err) => return Some(Err(err)),
        };
        Some(Ok((self.f)(a, b)))
    }
}

/// Pair elements of `other` and `source` position by position
///
/// Pairs keep argument order: `zip(a, b)` yields `(a[i], b[i])`. Each step
/// pulls `source` before `other`; the result stops as soon as either side is
/// exhausted, and `other` is not pulled again once `source` runs out.
///
/// # Examples
/// ```
/// use lazyseq::seq::*;
///
/// # async fn example() {
/// let pairs = to_array(zip(vec![1, 2, 3], vec!["a", "b"])).await.unwrap();
/// assert_eq!(pairs, vec![(1, "a"), (2, "b")]);
/// # }
/// ```
pub fn zip<A, B>(other: impl IntoSequence<A>, source: impl IntoSequence<B>) -> Sequence<(A, B)>
where
    A: Send + 'static,
    B: Send + 'static,
{
    zip_with(|a, b| (a, b), other, source)
}

/// Combine elements of `other` and `source` position by position with `f`
pub fn zip_with<A, B, U, F>(
    f: F,
    other: impl IntoSequence<A>,
    source: impl IntoSequence<B>,
) -> Sequence<U>
where
    A: Send + 'static,
    B: Send + 'static,
    U: Send + 'static,
    F: FnMut(A, B) -> U + Send + 'static,
{
    match (other.into_sequence(), source.into_sequence()) {
        (Sequence::Sync(other), Sequence::Sync(source)) => Sequence::from_sync(SyncZip {
            other,
            source,
            f,
            _marker: PhantomData,
        }),
        (other, source) => {
            let (mut other, mut source) = (other.into_stream(), source.into_stream());
            let mut f = f;
            Sequence::from_async(stream! {
                loop {
                    let b = match source.next().await {
                        Some(Ok(b)) => b,
                        Some(Err(err)) => {
                            yield Err(err);
                            break;
                        }
                        None => break,
                    };
                    let a = match other.next().await {
                        Some(Ok(a)) => a,
                        Some(Err(err)) => {
                            yield Err(err);
                            break;
                        }
                        None => break,
                    };
                    yield Ok(f(a, b));
                }
            })
        }
    }
}

/// Combine elements of `other` and `source` with an async `f`
pub fn zip_with_async<A, B, U, F, Fut>(
    mut f: F,
    other: impl IntoSequence<A>,
    source: impl IntoSequence<B>,
) -> Sequence<U>
where
    A: Send + 'static,
    B: Send + 'static,
    U: Send + 'static,
    F: FnMut(A, B) -> Fut + Send + 'static,
    Fut: Future<Output = U> + Send + 'static,
{
    let mut pairs = zip(other, source).into_stream();
    Sequence::from_async(stream! {
        while let Some(pair) = pairs.next().await {
            match pair {
                Ok((a, b)) => {
                    yield Ok(f(a, b).await);
                }
                Err(err) => {
                    yield Err(err);
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::from_iter;

    #[test]
    fn sync_inputs_stay_sync() {
        assert!(!concat(vec![2], vec![1]).is_async());
        assert!(!zip(vec![2], vec![1]).is_async());
        assert!(!flatten(vec![vec![1], vec![2]]).is_async());
    }

    #[test]
    fn one_async_input_makes_the_result_async() {
        let stream = crate::seq::from_stream(futures_util::stream::iter(vec![1]));
        assert!(concat(stream, vec![1]).is_async());
    }

    #[test]
    fn sync_flatten_rejects_async_inner_sequences() {
        let inners = vec![
            from_iter(vec![1, 2]),
            crate::seq::from_stream(futures_util::stream::iter(vec![3])),
            from_iter(vec![4]),
        ];
        let out: Vec<_> = flatten(inners).into_iter_sync().unwrap().collect();
        assert_eq!(
            out,
            vec![
                Ok(1),
                Ok(2),
                Err(StreamError::NotIterable {
                    found: "async sequence"
                })
            ]
        );
    }
}
