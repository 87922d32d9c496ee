use crate::common::{DispatchMode, FakeJudge};
use judge_client::{FetchedStatus, JudgeBackend, JudgeClientError, TestInput};
use serde_json::json;

fn inputs(n: usize) -> Vec<TestInput> {
    (0..n)
        .map(|i| TestInput {
            stdin: format!("{i}\n"),
            expected_output: format!("{}\n", i * 2),
        })
        .collect()
}

mod dispatch {
    use super::*;

    #[tokio::test]
    async fn returns_one_token_per_input_in_order() {
        let judge = FakeJudge::spawn().await;
        let client = judge.client();

        let tokens = client
            .dispatch_batch(71, "print(int(input())*2)", &inputs(3))
            .await
            .unwrap();

        assert_eq!(tokens, vec!["tok-1", "tok-2", "tok-3"]);
    }

    #[tokio::test]
    async fn splits_large_batches_by_max_batch_size() {
        let judge = FakeJudge::spawn().await;
        let client = judge.client();

        client
            .dispatch_batch(71, "pass", &inputs(5))
            .await
            .unwrap();

        assert_eq!(judge.state.lock().unwrap().dispatch_sizes, vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn encodes_fields_as_base64_and_sends_auth_header() {
        let judge = FakeJudge::spawn().await;
        let client = judge.client();

        client
            .dispatch_batch(71, "print(1)", &inputs(1))
            .await
            .unwrap();

        let state = judge.state.lock().unwrap();
        let sent = &state.dispatched[0];
        assert_eq!(sent["language_id"], 71);
        assert_eq!(sent["source_code"], "cHJpbnQoMSk=");
        assert_eq!(sent["stdin"], "MAo=");
        assert!(sent.get("callback_url").is_none());
        assert_eq!(state.auth_headers[0].as_deref(), Some("secret-token"));
    }

    #[tokio::test]
    async fn attaches_callback_url_when_configured() {
        let judge = FakeJudge::spawn().await;
        let mut config = judge.config();
        config.callback_url = Some("http://relay.local/submission-callback".into());
        let client = judge_client::Judge0Client::new(&config).unwrap();

        client.dispatch_batch(71, "pass", &inputs(1)).await.unwrap();

        let state = judge.state.lock().unwrap();
        assert_eq!(
            state.dispatched[0]["callback_url"],
            "http://relay.local/submission-callback"
        );
    }

    #[tokio::test]
    async fn server_errors_are_retryable() {
        let judge = FakeJudge::spawn().await;
        judge.set_mode(DispatchMode::Fail(503));

        let err = judge
            .client()
            .dispatch_batch(71, "pass", &inputs(1))
            .await
            .unwrap_err();

        assert!(matches!(err, JudgeClientError::Unavailable(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn client_errors_are_rejections() {
        let judge = FakeJudge::spawn().await;
        judge.set_mode(DispatchMode::Fail(422));

        let err = judge
            .client()
            .dispatch_batch(71, "pass", &inputs(1))
            .await
            .unwrap_err();

        assert!(matches!(err, JudgeClientError::Rejected { status: 422, .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn entry_without_token_is_a_rejection() {
        let judge = FakeJudge::spawn().await;
        judge.set_mode(DispatchMode::RejectLast);

        let err = judge
            .client()
            .dispatch_batch(71, "pass", &inputs(2))
            .await
            .unwrap_err();

        assert!(matches!(err, JudgeClientError::Rejected { .. }));
    }

    #[tokio::test]
    async fn token_count_mismatch_is_invalid() {
        let judge = FakeJudge::spawn().await;
        judge.set_mode(DispatchMode::DropOne);

        let err = judge
            .client()
            .dispatch_batch(71, "pass", &inputs(2))
            .await
            .unwrap_err();

        assert!(matches!(err, JudgeClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_judge_is_unavailable() {
        let config = judge_client::Judge0Config {
            base_url: "http://127.0.0.1:1".into(),
            timeout_ms: 500,
            ..Default::default()
        };
        let client = judge_client::Judge0Client::new(&config).unwrap();

        let err = client
            .dispatch_batch(71, "pass", &inputs(1))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
    }
}

mod fetch {
    use super::*;

    #[tokio::test]
    async fn decodes_known_results_and_keeps_token_order() {
        let judge = FakeJudge::spawn().await;
        judge.put_result(
            "a",
            json!({
                "token": "a",
                "status": {"id": 3, "description": "Accepted"},
                "time": "0.010",
                "memory": 1000,
                "stdout": "MAo=",
            }),
        );
        judge.put_result(
            "b",
            json!({
                "token": "b",
                "status": {"id": 2, "description": "Processing"},
            }),
        );

        let statuses = judge
            .client()
            .fetch_batch(&["b".to_string(), "a".to_string()])
            .await
            .unwrap();

        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].token(), "b");
        let FetchedStatus::Known(a) = &statuses[1] else {
            panic!("expected a known result, got {:?}", statuses[1]);
        };
        assert_eq!(a.status_id, 3);
        assert_eq!(a.time_ms, Some(10));
        assert_eq!(a.memory_kb, Some(1000));
        assert_eq!(a.stdout.as_deref(), Some("0\n"));
    }

    #[tokio::test]
    async fn unknown_and_malformed_tokens_are_unrecognised() {
        let judge = FakeJudge::spawn().await;
        judge.put_result("broken", json!({"token": "broken", "stdout": "MAo="}));

        let statuses = judge
            .client()
            .fetch_batch(&["missing".to_string(), "broken".to_string()])
            .await
            .unwrap();

        assert_eq!(
            statuses,
            vec![
                FetchedStatus::Unrecognised("missing".into()),
                FetchedStatus::Unrecognised("broken".into()),
            ]
        );
    }

    #[tokio::test]
    async fn splits_large_fetches_by_max_batch_size() {
        let judge = FakeJudge::spawn().await;
        let tokens: Vec<String> = (0..3).map(|i| format!("t{i}")).collect();

        let statuses = judge.client().fetch_batch(&tokens).await.unwrap();

        assert_eq!(statuses.len(), 3);
        assert_eq!(judge.state.lock().unwrap().fetch_sizes, vec![2, 1]);
    }

    #[tokio::test]
    async fn server_errors_propagate() {
        let judge = FakeJudge::spawn().await;
        judge.set_mode(DispatchMode::Fail(500));

        let err = judge
            .client()
            .fetch_batch(&["a".to_string()])
            .await
            .unwrap_err();

        assert!(err.is_retryable());
    }
}
