//! Transport behavior: payload injection, busy timing and outcome handling.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use common::{Harness, config, course, settle};
use course_toolbox::prelude::*;
use course_toolbox::transport::{BusyIndicator, HttpEndpoint, MutationEndpoint, SuccessCallback};
use course_toolbox::testing::TestServices;
use course_toolbox_net::{FormClient, NetworkError};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn counting_callback(counter: &Arc<AtomicUsize>) -> SuccessCallback {
    let counter = counter.clone();
    Box::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    })
}

#[tokio::test(start_paused = true)]
async fn test_session_values_and_page_params_are_injected() {
    let config = ToolboxConfig::builder("https://school.example", 42, "tok")
        .page_param("sr", "2")
        .page_param("sesskey", "forged")
        .build()
        .unwrap();
    let h = Harness::with(course(), config);

    let task = h.toolbox.transport().send(
        MutationRequest::resource().field("indent").value(1).id(10),
        None,
        None,
        RequestOptions::default(),
    );
    assert!(task.await.is_success());

    let form = h.endpoint.last_request().unwrap();
    assert_eq!(form.get("class"), Some("resource"));
    assert_eq!(form.get("sesskey"), Some("tok"));
    assert_eq!(form.get("courseId"), Some("42"));
    assert_eq!(form.get("sr"), Some("2"));
    assert_eq!(form.keys().iter().filter(|k| **k == "sesskey").count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_busy_indicator_hides_after_delay_on_success() {
    let h = Harness::new();
    let spinner = BusyIndicator::spinner(h.toolbox.document().clone(), ItemId::from(10));

    let task = h.toolbox.transport().send(
        MutationRequest::resource().field("indent").value(1).id(10),
        Some(spinner.clone()),
        None,
        RequestOptions::default(),
    );
    assert!(h.activity(10).is_busy(), "shown before the reply");

    assert!(task.await.is_success());
    assert!(h.activity(10).is_busy(), "still shown right after the reply");

    tokio::time::sleep(Duration::from_millis(399)).await;
    assert!(spinner.is_shown());

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(!h.activity(10).is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_reports_and_skips_callback() {
    let h = Harness::new();
    h.endpoint.fail(NetworkError::HttpStatus {
        status: 500,
        message: None,
    });
    let calls = Arc::new(AtomicUsize::new(0));
    let spinner = BusyIndicator::spinner(h.toolbox.document().clone(), ItemId::from(10));

    let outcome = h
        .toolbox
        .transport()
        .send(
            MutationRequest::resource().field("indent").value(1).id(10),
            Some(spinner),
            Some(counting_callback(&calls)),
            RequestOptions::default(),
        )
        .await;

    assert!(outcome.failure().unwrap().is_transport());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.services.failures.count(), 1);

    settle().await;
    assert!(!h.activity(10).is_busy(), "hidden after a failure too");
}

#[tokio::test(start_paused = true)]
async fn test_application_error_reports_and_skips_callback() {
    let h = Harness::new();
    h.endpoint
        .reply_json(serde_json::json!({"error": "Invalid sesskey", "errorcode": "invalidsesskey"}));
    let calls = Arc::new(AtomicUsize::new(0));

    let outcome = h
        .toolbox
        .transport()
        .send(
            MutationRequest::resource().field("visible").value(0).id(10),
            None,
            Some(counting_callback(&calls)),
            RequestOptions::default(),
        )
        .await;

    match outcome.failure() {
        Some(MutationFailure::Application { message, .. }) => assert_eq!(message, "Invalid sesskey"),
        other => panic!("expected application failure, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    let reported = h.services.failures.reported();
    assert_eq!(reported.len(), 1);
    assert!(reported[0].is_application());
}

#[tokio::test(start_paused = true)]
async fn test_error_status_with_error_body_is_an_application_failure() {
    let h = Harness::new();
    h.endpoint.fail(NetworkError::HttpStatus {
        status: 500,
        message: Some(r#"{"error":"Invalid sesskey"}"#.to_string()),
    });
    let calls = Arc::new(AtomicUsize::new(0));

    let outcome = h
        .toolbox
        .transport()
        .send(
            MutationRequest::resource().field("visible").value(0).id(10),
            None,
            Some(counting_callback(&calls)),
            RequestOptions::default(),
        )
        .await;

    match outcome.failure() {
        Some(MutationFailure::Application { message, response }) => {
            assert_eq!(message, "Invalid sesskey");
            assert_eq!(response.error.as_deref(), Some("Invalid sesskey"));
        }
        other => panic!("expected application failure, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.services.failures.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_error_status_without_error_field_stays_transport() {
    let h = Harness::new();
    h.endpoint.fail(NetworkError::HttpStatus {
        status: 502,
        message: Some("<html>Bad gateway</html>".to_string()),
    });

    let outcome = h
        .toolbox
        .transport()
        .send(
            MutationRequest::resource().field("indent").value(1).id(10),
            None,
            None,
            RequestOptions::default(),
        )
        .await;

    match outcome.failure() {
        Some(MutationFailure::Transport(err)) => assert_eq!(err.status(), Some(502)),
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_unparseable_reply_is_an_empty_success() {
    let h = Harness::new();
    h.endpoint.reply_body("<html>Session expired</html>");
    let calls = Arc::new(AtomicUsize::new(0));

    let outcome = h
        .toolbox
        .transport()
        .send(
            MutationRequest::resource().field("indent").value(1).id(10),
            None,
            Some(counting_callback(&calls)),
            RequestOptions::default(),
        )
        .await;

    assert_eq!(outcome.response(), Some(&MutationResponse::default()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.services.failures.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_callback_runs_after_optimistic_change() {
    let h = Harness::new();
    h.endpoint.set_latency(Duration::from_millis(250));

    let task = h.click_activity(10, "moveright").into_task().unwrap();
    // The optimistic change is already visible while the request is in flight.
    assert_eq!(h.activity(10).indent.get(), 1);
    assert!(!task.is_finished());

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(task.is_finished());
}

#[tokio::test(start_paused = true)]
async fn test_request_options_reach_the_endpoint() {
    let h = Harness::new();
    let options = RequestOptions::default()
        .timeout(Duration::from_secs(2))
        .header("X-Trace", "abc");

    h.toolbox
        .transport()
        .send(MutationRequest::course().field("marker").value(0), None, None, options.clone())
        .await;

    assert_eq!(h.endpoint.last_request().unwrap().options, options);
}

#[tokio::test]
async fn test_http_endpoint_posts_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/course/rest.php"))
        .and(header("x-requested-with", "XMLHttpRequest"))
        .and(body_string_contains("field=indent"))
        .and(body_string_contains("sesskey=sesskey-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"indent": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config();
    config.www_root = server.uri();
    let endpoint = HttpEndpoint::from_config(&config).unwrap();
    assert_eq!(endpoint.url(), format!("{}/course/rest.php", server.uri()));

    let form = MutationRequest::resource()
        .field("indent")
        .value(1)
        .id(10)
        .into_form(&config.session());
    let body = endpoint.post_form(form, RequestOptions::default()).await.unwrap();
    assert_eq!(MutationResponse::parse(&body).extra.get("indent"), Some(&serde_json::json!(1)));
}

#[tokio::test]
async fn test_http_endpoint_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = FormClient::builder().build().unwrap();
    let endpoint = HttpEndpoint::new(client, format!("{}/course/rest.php", server.uri()));
    let err = endpoint
        .post_form(Vec::new(), RequestOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_http_error_status_with_error_body_reaches_the_reporter() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/course/rest.php"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({"error": "Invalid sesskey"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config();
    config.www_root = server.uri();
    let endpoint = Arc::new(HttpEndpoint::from_config(&config).unwrap());
    let services = TestServices::new();
    let toolbox = CourseToolbox::new(
        config,
        DocumentHandle::new(course()),
        endpoint,
        services.services(),
    )
    .unwrap();
    let calls = Arc::new(AtomicUsize::new(0));

    let outcome = toolbox
        .transport()
        .send(
            MutationRequest::resource().field("visible").value(0).id(10),
            None,
            Some(counting_callback(&calls)),
            RequestOptions::default(),
        )
        .await;

    let failure = outcome.failure().unwrap();
    assert!(failure.is_application());
    assert!(!failure.is_transport());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    let reported = services.failures.reported();
    assert_eq!(reported.len(), 1);
    assert!(reported[0].is_application());
}
