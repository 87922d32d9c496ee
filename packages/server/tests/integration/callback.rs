use serde_json::json;

use crate::common::{CALLBACK_SECRET, TestApp, callback_body, routes};

mod delivery {
    use super::*;

    #[tokio::test]
    async fn two_callbacks_finalize_with_max_time_and_memory() {
        let app = TestApp::spawn().await;
        let id = app.create_submission().await;
        let tokens = app.tokens(&id).await;

        let first = app
            .put(routes::CALLBACK, &callback_body(&tokens[0], 3, "0.01", 1000))
            .await;
        assert_eq!(first.status, 200, "{}", first.text);
        assert_eq!(first.body["outcome"], "APPLIED");
        assert_eq!(first.body["verdict"], "AC");
        assert_eq!(first.body["submissionStatus"], "PENDING");

        let second = app
            .put(routes::CALLBACK, &callback_body(&tokens[1], 5, "2.0", 2000))
            .await;
        assert_eq!(second.status, 200, "{}", second.text);
        assert_eq!(second.body["verdict"], "TLE");
        assert_eq!(second.body["submissionStatus"], "REJECTED");

        let res = app.get(&routes::submission(&id)).await;
        assert_eq!(res.body["status"], "REJECTED");
        assert_eq!(res.body["aggregateTime"], 2000);
        assert_eq!(res.body["aggregateMemory"], 2000);
        assert_eq!(res.body["testCases"][0]["time"], 10);
        assert_eq!(res.body["testCases"][0]["memory"], 1000);
    }

    #[tokio::test]
    async fn late_duplicate_changes_nothing() {
        let app = TestApp::spawn().await;
        let id = app.create_submission().await;
        let tokens = app.tokens(&id).await;
        app.put(routes::CALLBACK, &callback_body(&tokens[0], 3, "0.01", 1000))
            .await;
        app.put(routes::CALLBACK, &callback_body(&tokens[1], 5, "2.0", 2000))
            .await;
        let before = app.get(&routes::submission(&id)).await;

        let dup = app
            .put(routes::CALLBACK, &callback_body(&tokens[0], 3, "0.5", 9000))
            .await;

        assert_eq!(dup.status, 200);
        assert_eq!(dup.body["outcome"], "DUPLICATE");
        let after = app.get(&routes::submission(&id)).await;
        assert_eq!(before.body, after.body);
    }

    #[tokio::test]
    async fn conflicting_duplicate_keeps_first_verdict() {
        let app = TestApp::spawn().await;
        let id = app.create_submission().await;
        let tokens = app.tokens(&id).await;
        app.put(routes::CALLBACK, &callback_body(&tokens[0], 4, "0.01", 100))
            .await;

        let conflicting = app
            .put(routes::CALLBACK, &callback_body(&tokens[0], 3, "0.01", 100))
            .await;

        assert_eq!(conflicting.status, 200);
        assert_eq!(conflicting.body["outcome"], "DUPLICATE");
        assert_eq!(conflicting.body["verdict"], "WA");
        let res = app.get(&routes::submission(&id)).await;
        assert_eq!(res.body["testCases"][0]["verdict"], "WA");
    }

    #[tokio::test]
    async fn out_of_order_delivery_gives_same_result() {
        let app = TestApp::spawn().await;
        let id = app.create_submission().await;
        let tokens = app.tokens(&id).await;

        app.put(routes::CALLBACK, &callback_body(&tokens[1], 3, "0.2", 300))
            .await;
        app.put(routes::CALLBACK, &callback_body(&tokens[0], 3, "0.1", 700))
            .await;

        let res = app.get(&routes::submission(&id)).await;
        assert_eq!(res.body["status"], "ACCEPTED");
        assert_eq!(res.body["aggregateTime"], 200);
        assert_eq!(res.body["aggregateMemory"], 700);
    }

    #[tokio::test]
    async fn in_flight_status_is_a_no_op() {
        let app = TestApp::spawn().await;
        let id = app.create_submission().await;
        let tokens = app.tokens(&id).await;

        let res = app
            .put(routes::CALLBACK, &callback_body(&tokens[0], 2, "0", 0))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["outcome"], "STILL_RUNNING");
        assert!(res.body.get("verdict").is_none());
        let sub = app.get(&routes::submission(&id)).await;
        assert_eq!(sub.body["testCases"][0]["verdict"], "PENDING");
    }

    #[tokio::test]
    async fn compile_error_is_recorded_with_output() {
        let app = TestApp::spawn().await;
        let id = app.create_submission().await;
        let tokens = app.tokens(&id).await;
        let mut body = callback_body(&tokens[0], 6, "0", 0);
        // "main.c:1: error\n"
        body["compile_output"] = json!("bWFpbi5jOjE6IGVycm9yCg==");

        let res = app.put(routes::CALLBACK, &body).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["verdict"], "COMPILE_ERROR");
        let sub = app.get(&routes::submission(&id)).await;
        assert_eq!(
            sub.body["testCases"][0]["compileOutput"],
            "main.c:1: error\n"
        );
    }

    #[tokio::test]
    async fn post_is_accepted_like_put() {
        let app = TestApp::spawn().await;
        let id = app.create_submission().await;
        let tokens = app.tokens(&id).await;

        let res = app
            .post(routes::CALLBACK, &callback_body(&tokens[0], 3, "0.01", 10))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["outcome"], "APPLIED");
    }
}

mod rejection {
    use super::*;

    #[tokio::test]
    async fn unknown_token_returns_404() {
        let app = TestApp::spawn().await;
        app.create_submission().await;

        let res = app
            .put(routes::CALLBACK, &callback_body("tok-unknown", 3, "0.1", 10))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "UNKNOWN_TOKEN");
    }

    #[tokio::test]
    async fn malformed_payloads_return_400() {
        let app = TestApp::spawn().await;
        let id = app.create_submission().await;
        let tokens = app.tokens(&id).await;

        for body in [
            json!({"status": {"id": 3}}),
            json!({"token": "", "status": {"id": 3}}),
            json!({"token": tokens[0], "status": {"id": 0}}),
            json!({"token": tokens[0]}),
            json!({"token": tokens[0], "status": {"id": 3}, "memory": -1}),
            json!({"token": tokens[0], "status": {"id": 3}, "time": "later"}),
        ] {
            let res = app.put(routes::CALLBACK, &body).await;
            assert_eq!(res.status, 400, "accepted {body}");
            assert_eq!(res.body["code"], "MALFORMED_CALLBACK");
        }

        let sub = app.get(&routes::submission(&id)).await;
        assert_eq!(sub.body["testCases"][0]["verdict"], "PENDING");
    }

    #[tokio::test]
    async fn non_json_body_returns_400() {
        let app = TestApp::spawn().await;

        let res = app.post_raw(routes::CALLBACK, "<xml/>").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "MALFORMED_CALLBACK");
    }
}

mod secret {
    use super::*;

    #[tokio::test]
    async fn missing_or_wrong_secret_is_forbidden() {
        let app = TestApp::spawn_with_secret().await;
        let id = app.create_submission().await;
        let tokens = app.tokens(&id).await;
        let body = callback_body(&tokens[0], 3, "0.01", 10);

        let missing = app.put(routes::CALLBACK, &body).await;
        assert_eq!(missing.status, 403);
        assert_eq!(missing.body["code"], "FORBIDDEN");

        let wrong = app
            .put(&routes::callback_with_secret("guess"), &body)
            .await;
        assert_eq!(wrong.status, 403);

        let sub = app.get(&routes::submission(&id)).await;
        assert_eq!(sub.body["testCases"][0]["verdict"], "PENDING");
    }

    #[tokio::test]
    async fn matching_secret_is_accepted() {
        let app = TestApp::spawn_with_secret().await;
        let id = app.create_submission().await;
        let tokens = app.tokens(&id).await;

        let res = app
            .put(
                &routes::callback_with_secret(CALLBACK_SECRET),
                &callback_body(&tokens[0], 3, "0.01", 10),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["outcome"], "APPLIED");
    }
}
