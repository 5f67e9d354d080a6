use futures::executor::block_on;
use futures_util::stream;
use lazyseq::seq::*;
use quickcheck::{quickcheck, TestResult};
use std::future::IntoFuture;

fn drain<T: Send + 'static>(seq: Sequence<T>) -> Vec<T> {
    block_on(to_array(seq)).unwrap()
}

fn as_stream(xs: Vec<i32>) -> Sequence<i32> {
    from_stream(stream::iter(xs))
}

#[test]
fn prop_map_preserves_order() {
    fn prop(xs: Vec<i32>) -> bool {
        let expected: Vec<i64> = xs.iter().map(|x| *x as i64 * 3).collect();
        drain(map(|x: i32| x as i64 * 3, xs.clone())) == expected
            && drain(map(|x: i32| x as i64 * 3, as_stream(xs))) == expected
    }
    quickcheck(prop as fn(Vec<i32>) -> bool);
}

#[test]
fn prop_scan_matches_running_fold() {
    fn prop(xs: Vec<i16>) -> bool {
        let mut acc = 0i64;
        let expected: Vec<i64> = xs
            .iter()
            .map(|x| {
                acc += *x as i64;
                acc
            })
            .collect();
        drain(scan(|acc: i64, x: i16| acc + x as i64, 0, xs)) == expected
    }
    quickcheck(prop as fn(Vec<i16>) -> bool);
}

#[test]
fn prop_chunk_concatenates_back() {
    fn prop(xs: Vec<i32>, size: usize) -> TestResult {
        if size == 0 {
            return TestResult::discard();
        }
        let groups = drain(chunk(size, xs.clone()));
        let all_full = groups
            .iter()
            .take(groups.len().saturating_sub(1))
            .all(|g| g.len() == size);
        let last_ok = groups.last().map_or(true, |g| !g.is_empty() && g.len() <= size);
        let flat: Vec<i32> = groups.into_iter().flatten().collect();
        TestResult::from_bool(all_full && last_ok && flat == xs)
    }
    quickcheck(prop as fn(Vec<i32>, usize) -> TestResult);
}

#[test]
fn prop_take_and_drop_split_the_sequence() {
    fn prop(xs: Vec<i32>, n: usize) -> bool {
        let n = n % (xs.len() + 2);
        let mut joined = drain(take(n, as_stream(xs.clone())));
        joined.extend(drain(drop(n, xs.clone())));
        joined == xs
    }
    quickcheck(prop as fn(Vec<i32>, usize) -> bool);
}

#[test]
fn prop_zip_length_is_shorter_side() {
    fn prop(xs: Vec<i32>, ys: Vec<u8>) -> bool {
        drain(zip(xs.clone(), ys.clone())).len() == xs.len().min(ys.len())
    }
    quickcheck(prop as fn(Vec<i32>, Vec<u8>) -> bool);
}

#[test]
fn prop_every_agrees_with_iterator_all() {
    fn prop(xs: Vec<i32>) -> bool {
        let expected = xs.iter().all(|x| *x >= 0);
        block_on(every(|x: &i32| *x >= 0, xs).into_future()) == Ok(expected)
    }
    quickcheck(prop as fn(Vec<i32>) -> bool);
}
