use futures_util::stream::{self, StreamExt};
use lazyseq::seq::*;
use lazyseq::value::Value;
use lazyseq::{BufferConfig, StreamError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn test_async_map_over_future_of_vec() {
    let source = from_future(async { vec![1, 2] });
    let result = to_array(map_async(|n: i32| async move { n * 2 }, source)).await;
    assert_eq!(result, Ok(vec![2, 4]));
}

#[tokio::test]
async fn test_future_is_not_polled_until_first_pull() {
    let started = Arc::new(AtomicBool::new(false));
    let flag = started.clone();
    let seq = from_future(async move {
        flag.store(true, Ordering::SeqCst);
        vec![1]
    });
    let seq = map(|n: i32| n + 1, seq);
    sleep(Duration::from_millis(5)).await;
    assert!(!started.load(Ordering::SeqCst));

    let mut s = seq.into_stream();
    assert_eq!(s.next().await, Some(Ok(2)));
    assert!(started.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_nested_deferred_sources_resolve() {
    let source: Source<i32> = Source::deferred(async {
        Ok(Source::deferred(async {
            Ok(Source::from(from_iter(vec![7, 8])))
        }))
    });
    assert_eq!(to_array(source).await, Ok(vec![7, 8]));
}

#[tokio::test]
async fn test_deferred_failure_surfaces_on_first_pull() {
    let source: Source<i32> = Source::deferred(async { Err(StreamError::source("refused")) });
    let seq = map(|n: i32| n, source);
    assert!(seq.is_async());
    assert_eq!(to_array(seq).await, Err(StreamError::source("refused")));
}

#[tokio::test]
async fn test_from_futures_awaits_in_order() {
    let futures = vec![
        Box::pin(async {
            sleep(Duration::from_millis(10)).await;
            1
        }) as std::pin::Pin<Box<dyn std::future::Future<Output = i32> + Send>>,
        Box::pin(async { 2 }),
        Box::pin(async { 3 }),
    ];
    assert_eq!(to_array(from_futures(futures)).await, Ok(vec![1, 2, 3]));
}

#[tokio::test]
async fn test_from_receiver_drains_until_senders_drop() {
    let (tx, rx) = mpsc::channel(4);
    let producer = tokio::spawn(async move {
        for i in 0..5 {
            tx.send(i).await.unwrap();
        }
    });

    let result = to_array(scan(|acc: i32, n: i32| acc + n, 0, from_receiver(rx))).await;
    producer.await.unwrap();
    assert_eq!(result, Ok(vec![0, 1, 3, 6, 10]));
}

#[tokio::test]
async fn test_sequences_can_move_into_tasks() {
    let seq = map(|n: i32| n * 3, from_stream(stream::iter(vec![1, 2, 3])));
    let handle = tokio::spawn(to_array(seq));
    assert_eq!(handle.await.unwrap(), Ok(vec![3, 6, 9]));
}

// ================================
// Async callbacks
// ================================

#[tokio::test]
async fn test_filter_async() {
    let seq = filter_async(|n: &i32| {
        let keep = n % 2 == 1;
        async move { keep }
    }, vec![1, 2, 3, 4, 5]);
    assert!(seq.is_async());
    assert_eq!(to_array(seq).await, Ok(vec![1, 3, 5]));
}

#[tokio::test]
async fn test_drop_while_async_stops_consulting_predicate() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let seq = drop_while_async(
        move |n: &i32| {
            seen.fetch_add(1, Ordering::SeqCst);
            let drop_it = *n < 2;
            async move { drop_it }
        },
        vec![0, 1, 2, 0, 1],
    );
    assert_eq!(to_array(seq).await, Ok(vec![2, 0, 1]));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_scan_async() {
    let seq = scan_async(
        |acc: String, s: &str| {
            let next = format!("{}{}", acc, s);
            async move { next }
        },
        String::new(),
        vec!["a", "b", "c"],
    );
    assert_eq!(
        to_array(seq).await,
        Ok(vec!["a".to_string(), "ab".to_string(), "abc".to_string()])
    );
}

#[tokio::test]
async fn test_zip_with_async() {
    let seq = zip_with_async(
        |a: i32, b: i32| async move { a * b },
        vec![2, 3, 4],
        vec![10, 10],
    );
    assert_eq!(to_array(seq).await, Ok(vec![20, 30]));
}

#[tokio::test]
async fn test_every_async() {
    let eval = every_async(|n: &i32| {
        let positive = *n > 0;
        async move { positive }
    }, vec![1, 2, 3]);
    assert!(!eval.is_now());
    assert_eq!(eval.await, Ok(true));

    let eval = every_async(|_: &i32| async { false }, Vec::<i32>::new());
    assert_eq!(eval.await, Ok(true));
}

// ================================
// Dynamic values
// ================================

#[tokio::test]
async fn test_value_sources() {
    let set = Value::set(vec![Value::from(1), Value::from(2), Value::from(1)]);
    assert_eq!(to_array(set).await, Ok(vec![Value::from(1), Value::from(2)]));

    let letters = to_array(Value::from("hey")).await;
    assert_eq!(
        letters,
        Ok(vec![Value::from("h"), Value::from("e"), Value::from("y")])
    );
}

#[tokio::test]
async fn test_non_iterable_value_fails_on_first_pull() {
    let seq = map(|v: Value| v, Value::from(true));
    assert_eq!(
        to_array(seq).await,
        Err(StreamError::NotIterable { found: "boolean" })
    );
}

#[tokio::test]
async fn test_value_future_source() {
    let source = Source::from_value_future(async {
        Value::array(vec![Value::from(1), Value::from(2)])
    });
    let result = to_array(source).await;
    assert_eq!(result, Ok(vec![Value::from(1), Value::from(2)]));

    let source = Source::from_value_future(async { Value::Null });
    assert_eq!(
        to_array(source).await,
        Err(StreamError::NotIterable { found: "null" })
    );
}

#[tokio::test]
async fn test_flatten_values() {
    let nested = Value::array(vec![
        Value::array(vec![Value::from(1)]),
        Value::from("ab"),
    ]);
    let result = to_array(flatten::<Value, Value>(nested)).await;
    assert_eq!(
        result,
        Ok(vec![Value::from(1), Value::from("a"), Value::from("b")])
    );
}

// ================================
// Bounded materialization
// ================================

#[tokio::test]
async fn test_to_array_with_limit() {
    let config = BufferConfig::new().initial_capacity(2).max_len(3);
    assert_ok!(to_array_with(config.clone(), vec![1, 2, 3]).await);

    let pulls = Arc::new(AtomicUsize::new(0));
    let counter = pulls.clone();
    let endless = repeat_with(move || counter.fetch_add(1, Ordering::SeqCst));
    let err = assert_err!(to_array_with(config, endless).await);
    assert_eq!(err, StreamError::CapacityExceeded { limit: 3 });
    assert_eq!(pulls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_to_array_with_config_from_json() {
    let config = BufferConfig::from_json(r#"{"max_len": 1}"#).unwrap();
    let stream = from_stream(stream::iter(vec!["x", "y"]));
    assert_eq!(
        to_array_with(config, stream).await,
        Err(StreamError::CapacityExceeded { limit: 1 })
    );
}
