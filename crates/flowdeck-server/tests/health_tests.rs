//! Tests for cluster health aggregation.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flowdeck_server::HealthAggregator;

/// A base URL nothing listens on; connections are refused immediately.
const UNREACHABLE: &str = "http://127.0.0.1:9";

async fn service_answering(route: &str, status: u16) -> MockServer {
    let server = MockServer::start().await;
    let mut template = ResponseTemplate::new(status);
    if status == 302 {
        template = template.insert_header("location", "/app");
    }
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn all_services_up_yields_an_all_true_report() {
    let zeebe = service_answering("/actuator/health", 200).await;
    let operate = service_answering("/", 200).await;
    let tasklist = service_answering("/", 200).await;
    let elasticsearch = service_answering("/_cluster/health", 200).await;

    let aggregator = HealthAggregator::new(
        zeebe.uri(),
        operate.uri(),
        tasklist.uri(),
        elasticsearch.uri(),
    );

    let report = aggregator.check().await;

    assert!(report.zeebe);
    assert!(report.operate);
    assert!(report.tasklist);
    assert!(report.elasticsearch);
    assert!(report.all_healthy());
}

#[tokio::test]
async fn redirects_count_as_alive_for_the_ui_services() {
    let zeebe = service_answering("/actuator/health", 200).await;
    let operate = service_answering("/", 302).await;
    let tasklist = service_answering("/", 302).await;
    let elasticsearch = service_answering("/_cluster/health", 200).await;

    let aggregator = HealthAggregator::new(
        zeebe.uri(),
        operate.uri(),
        tasklist.uri(),
        elasticsearch.uri(),
    );

    let report = aggregator.check().await;

    assert!(report.operate);
    assert!(report.tasklist);
    assert!(report.all_healthy());
}

#[tokio::test]
async fn redirects_do_not_count_for_the_gateway_or_the_search_index() {
    let zeebe = service_answering("/actuator/health", 302).await;
    let operate = service_answering("/", 200).await;
    let tasklist = service_answering("/", 200).await;
    let elasticsearch = service_answering("/_cluster/health", 302).await;

    let aggregator = HealthAggregator::new(
        zeebe.uri(),
        operate.uri(),
        tasklist.uri(),
        elasticsearch.uri(),
    );

    let report = aggregator.check().await;

    assert!(!report.zeebe);
    assert!(!report.elasticsearch);
    assert!(!report.all_healthy());
}

#[tokio::test]
async fn one_failing_service_does_not_mask_the_others() {
    // Gateway unreachable, monitoring redirecting, task service up, search
    // index erroring.
    let operate = service_answering("/", 302).await;
    let tasklist = service_answering("/", 200).await;
    let elasticsearch = service_answering("/_cluster/health", 500).await;

    let aggregator = HealthAggregator::new(
        UNREACHABLE.to_string(),
        operate.uri(),
        tasklist.uri(),
        elasticsearch.uri(),
    );

    let report = aggregator.check().await;

    assert!(!report.zeebe);
    assert!(report.operate);
    assert!(report.tasklist);
    assert!(!report.elasticsearch);
    assert!(!report.all_healthy());
}

#[tokio::test]
async fn everything_unreachable_yields_an_all_false_report() {
    let aggregator = HealthAggregator::new(
        UNREACHABLE.to_string(),
        UNREACHABLE.to_string(),
        UNREACHABLE.to_string(),
        UNREACHABLE.to_string(),
    );

    let report = aggregator.check().await;

    assert!(!report.zeebe);
    assert!(!report.operate);
    assert!(!report.tasklist);
    assert!(!report.elasticsearch);
    assert!(!report.all_healthy());
}
