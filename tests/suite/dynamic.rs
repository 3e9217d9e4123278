//! Registry-driven runs over JSON values

use fanout_core::{
    ChunkSize, FailureScope, HandlerError, HandlerRegistry, RegistryError, RunPolicy, RunRequest,
    Runner,
};
use serde_json::{Value, json};

use crate::common::{collecting_runner, json_ints};

fn registry() -> HandlerRegistry {
    HandlerRegistry::with_builtins().unwrap()
}

#[tokio::test]
async fn missing_handler_runs_nothing_and_yields_none() {
    let (runner, sink) = collecting_runner();
    for policy in RunPolicy::ALL {
        let request = RunRequest::new(policy).chunk_size(ChunkSize::new(2));
        let out = runner
            .run(&registry(), &request, &json_ints(&[1, 2, 3]))
            .await
            .unwrap();
        assert_eq!(out, None, "{policy}");
    }
    assert!(sink.is_empty());
}

#[tokio::test]
async fn blank_handler_name_counts_as_missing() {
    let request = RunRequest::new(RunPolicy::Elementwise).handler("  ");
    assert!(request.handler.is_none());
    let out = Runner::new()
        .run(&registry(), &request, &json_ints(&[1]))
        .await
        .unwrap();
    assert_eq!(out, None);
}

#[tokio::test]
async fn unknown_handler_is_a_lookup_error() {
    let request = RunRequest::new(RunPolicy::Concurrent).handler("nope");
    let err = Runner::new()
        .run(&registry(), &request, &json_ints(&[1]))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::UnknownHandler {
            name: "nope".to_string()
        }
    );
}

#[tokio::test]
async fn every_policy_maps_in_order() {
    let items = vec![json!("a"), json!("b"), json!(3), json!("d"), json!("e")];
    let expected = vec![json!("A"), json!("B"), json!(3), json!("D"), json!("E")];
    for policy in RunPolicy::ALL {
        let request = RunRequest::new(policy)
            .chunk_size(ChunkSize::new(2))
            .handler("upper");
        let out = Runner::new().run(&registry(), &request, &items).await.unwrap();
        assert_eq!(out.as_ref(), Some(&expected), "{policy}");
    }
}

#[tokio::test]
async fn failure_granularity_follows_policy() {
    let items = json_ints(&[1, 2, 3, 4, 5]);
    let cases = [
        (RunPolicy::Elementwise, json_ints(&[1, 2, 5]), FailureScope::Chunk(1)),
        (RunPolicy::Chunkwise, json_ints(&[1, 2, 5]), FailureScope::Chunk(1)),
        (RunPolicy::Concurrent, json_ints(&[1, 2, 4, 5]), FailureScope::Element(2)),
    ];

    for (policy, expected, scope) in cases {
        let (runner, sink) = collecting_runner();
        let request = RunRequest::new(policy)
            .chunk_size(ChunkSize::new(2))
            .handler("fail_on")
            .extra(vec![json!(3)]);
        let out = runner.run(&registry(), &request, &items).await.unwrap();
        assert_eq!(out, Some(expected), "{policy}");

        let reports = sink.take();
        assert_eq!(reports.len(), 1, "{policy}");
        assert_eq!(reports[0].handler, "fail_on");
        assert_eq!(reports[0].scope, scope, "{policy}");
        assert!(matches!(reports[0].error, HandlerError::Failed { .. }));
    }
}

#[tokio::test]
async fn extra_args_reach_builtins() {
    let items = vec![json!({"id": 1, "name": "x", "tmp": true}), json!({"id": 2})];
    let request = RunRequest::new(RunPolicy::Elementwise)
        .handler("keep_keys")
        .extra(vec![json!(["id", "name"])]);
    let out = Runner::new().run(&registry(), &request, &items).await.unwrap();
    assert_eq!(
        out,
        Some(vec![json!({"id": 1, "name": "x"}), json!({"id": 2})])
    );
}

#[tokio::test]
async fn empty_collection_yields_empty_results() {
    let empty: Vec<Value> = Vec::new();
    for policy in RunPolicy::ALL {
        let request = RunRequest::new(policy).handler("upper");
        let out = Runner::new().run(&registry(), &request, &empty).await.unwrap();
        assert_eq!(out, Some(Vec::new()), "{policy}");
    }
}
