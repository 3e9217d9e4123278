//! Runner behaviour over typed handlers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fanout_core::{ChunkSize, ExtraArgs, FailureScope, HandlerError, Runner, handler_fn};
use tokio::sync::Notify;
use tokio::time::timeout;

use crate::common::{chunk_times_ten, collecting_runner, times_ten};

#[tokio::test]
async fn elementwise_maps_in_order() {
    let handler = handler_fn("times_ten", times_ten);
    let out = Runner::new()
        .elementwise_bounded(&[1, 2, 3, 4, 5], ChunkSize::new(2), &handler, &ExtraArgs::none())
        .await;
    assert_eq!(out, vec![10, 20, 30, 40, 50]);
}

#[tokio::test]
async fn elementwise_failure_drops_the_whole_chunk() {
    let (runner, sink) = collecting_runner();
    let handler = handler_fn("reject_three", |x: i64, _extra: ExtraArgs| async move {
        if x == 3 {
            return Err(HandlerError::failed("no threes"));
        }
        Ok(x * 10)
    });

    let out = runner
        .elementwise_bounded(&[1, 2, 3, 4, 5], ChunkSize::new(2), &handler, &ExtraArgs::none())
        .await;

    // 4 succeeded, but it shared chunk [3, 4] with the failure.
    assert_eq!(out, vec![10, 20, 50]);
    assert!(!out.contains(&40));

    let reports = sink.take();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].handler, "reject_three");
    assert_eq!(reports[0].scope, FailureScope::Chunk(1));
    assert_eq!(reports[0].discarded, 1);
}

#[tokio::test]
async fn chunkwise_concatenates_chunk_results() {
    let handler = handler_fn("chunk_times_ten", chunk_times_ten);
    let out = Runner::new()
        .chunkwise_concurrent(&[1, 2, 3, 4, 5], ChunkSize::new(2), &handler, &ExtraArgs::none())
        .await;
    assert_eq!(out, vec![10, 20, 30, 40, 50]);
}

#[tokio::test]
async fn chunkwise_dispatches_chunks_without_waiting() {
    // The first chunk cannot finish until the last chunk has started.
    let last_started = Arc::new(Notify::new());
    let started = Arc::new(Mutex::new(Vec::new()));
    let handler = {
        let last_started = last_started.clone();
        let started = started.clone();
        handler_fn("ordered", move |chunk: Vec<i64>, _extra: ExtraArgs| {
            let last_started = last_started.clone();
            let started = started.clone();
            async move {
                let first = chunk[0];
                started.lock().unwrap().push(first);
                match first {
                    1 => last_started.notified().await,
                    5 => last_started.notify_one(),
                    _ => {}
                }
                Ok::<_, HandlerError>(chunk.into_iter().map(|x| x * 10).collect::<Vec<_>>())
            }
        })
    };

    let runner = Runner::new();
    let extra = ExtraArgs::none();
    let run = runner.chunkwise_concurrent(&[1, 2, 3, 4, 5], ChunkSize::new(2), &handler, &extra);
    let out = timeout(Duration::from_secs(5), run)
        .await
        .expect("chunk calls waited on one another");

    assert_eq!(out, vec![10, 20, 30, 40, 50]);
    assert_eq!(started.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn fully_concurrent_empty_collection_invokes_nothing() {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler = {
        let calls = calls.clone();
        handler_fn("count", move |x: i64, _extra: ExtraArgs| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, HandlerError>(x) }
        })
    };
    let empty: Vec<i64> = Vec::new();
    let out = Runner::new()
        .fully_concurrent(&empty, &handler, &ExtraArgs::none())
        .await;
    assert!(out.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn repeated_runs_are_identical() {
    let items: Vec<i64> = (1..=17).collect();
    let size = ChunkSize::new(4);
    let extra = ExtraArgs::none();
    let element = handler_fn("times_ten", times_ten);
    let chunk = handler_fn("chunk_times_ten", chunk_times_ten);
    let runner = Runner::new();

    let first = (
        runner.elementwise_bounded(&items, size, &element, &extra).await,
        runner.chunkwise_concurrent(&items, size, &chunk, &extra).await,
        runner.fully_concurrent(&items, &element, &extra).await,
    );
    for _ in 0..3 {
        let again = (
            runner.elementwise_bounded(&items, size, &element, &extra).await,
            runner.chunkwise_concurrent(&items, size, &chunk, &extra).await,
            runner.fully_concurrent(&items, &element, &extra).await,
        );
        assert_eq!(again, first);
    }
    assert_eq!(first.0, first.1);
    assert_eq!(first.1, first.2);
}

#[tokio::test]
async fn handlers_mutating_their_input_leave_the_caller_untouched() {
    let items = vec![vec![1], vec![2], vec![3]];
    let snapshot = items.clone();

    let push = handler_fn("push", |mut item: Vec<i64>, _extra: ExtraArgs| async move {
        item.push(0);
        Ok::<_, HandlerError>(item)
    });
    let clear = handler_fn("clear", |mut chunk: Vec<Vec<i64>>, _extra: ExtraArgs| async move {
        for item in &mut chunk {
            item.clear();
        }
        Ok::<_, HandlerError>(chunk)
    });
    let runner = Runner::new();
    let extra = ExtraArgs::none();

    let pushed = runner
        .elementwise_bounded(&items, ChunkSize::new(2), &push, &extra)
        .await;
    assert_eq!(pushed, vec![vec![1, 0], vec![2, 0], vec![3, 0]]);

    for size in [ChunkSize::new(2), ChunkSize::UNBOUNDED] {
        let cleared = runner.chunkwise_concurrent(&items, size, &clear, &extra).await;
        assert!(cleared.iter().all(Vec::is_empty));
    }

    runner.fully_concurrent(&items, &push, &extra).await;
    assert_eq!(items, snapshot);
}
