//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the catalog and exercise the
//! full discovery and detail cycle end-to-end over HTTP.

use softcon_harvest::config::{Config, CrawlConfig, ListingMode, OutputConfig, SiteProfile};
use softcon_harvest::crawler::{run_crawl, Coordinator, CrawlOutcome, CrawlReport, EmptyReason};
use softcon_harvest::output::{write_references, write_report};
use softcon_harvest::ProjectReference;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock catalog
fn create_test_config(base_url: &str) -> Config {
    Config {
        site: SiteProfile::with_base_url(base_url),
        crawl: CrawlConfig {
            pacing_ms: 100, // Short for testing
            request_timeout_secs: 5,
            ..CrawlConfig::default()
        },
        ..Config::default()
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn listing_page(hrefs: &[(&str, &str)]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|(href, title)| format!("<li><a href=\"{}\">{}</a></li>\n", href, title))
        .collect();
    format!(
        r#"<html><body>
        <a href="/works/works_list.asp?category=D">디지털미디어</a>
        <ul class="works_list">{}</ul>
        </body></html>"#,
        anchors
    )
}

fn detail_page(title: &str, member: &str) -> String {
    format!(
        r#"<html><body>
        <div class="dw_title"><div><img src="/upload/rep.png"><p>{title}</p></div></div>
        <div class="work_detail"><div>작품개요</div><div>{title} 개요</div></div>
        <div class="dw_resistrant">
            <div class="dw_wrap"><ul>
                <li class="dw3"><p>소프트웨어학과</p></li>
                <li class="dw4"><p>4</p></li>
                <li class="dw5"><p>reg@ajou.ac.kr</p></li>
            </ul></div>
            <div class="dw_wrap"><ul>
                <li class="dw1"><span>팀장</span></li>
                <li class="dw2">{member}</li>
            </ul></div>
        </div>
        <span id="likeCnt">7</span>
        </body></html>"#,
        title = title,
        member = member
    )
}

async fn mount_detail(server: &MockServer, uid: &str, body: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/works/works.asp"))
        .and(query_param("uid", uid))
        .respond_with(body)
        .mount(server)
        .await;
}

fn completed(outcome: CrawlOutcome) -> CrawlReport {
    match outcome {
        CrawlOutcome::Completed(report) => report,
        CrawlOutcome::NothingToProcess { reason, .. } => {
            panic!("expected a completed run, got nothing to process: {}", reason)
        }
    }
}

#[tokio::test]
async fn test_full_harvest_current_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works/works_list.asp"))
        .and(query_param("category", "S"))
        .respond_with(html(listing_page(&[
            ("/works/works.asp?uid=101", "캠퍼스 길찾기"),
            ("javascript:openWorks('works.asp?uid=999')", "팝업"),
            ("./works/works.asp?uid=102", ""),
            ("/works/works.asp?uid=101", "캠퍼스 길찾기 (중복)"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    mount_detail(&server, "101", html(detail_page("캠퍼스 길찾기", "김아주"))).await;
    mount_detail(&server, "102", html(detail_page("스마트 팜", "이수원"))).await;

    let report = completed(run_crawl(create_test_config(&server.uri())).await.unwrap());

    // Script hooks and duplicates are dropped, first occurrence wins
    assert_eq!(report.references.len(), 2);
    assert_eq!(report.references[0].title, "캠퍼스 길찾기");
    assert_eq!(report.references[0].uid.as_deref(), Some("101"));
    assert_eq!(report.references[1].title, "제목 없음");
    assert_eq!(
        report.references[1].url,
        format!("{}/works/works.asp?uid=102", server.uri())
    );

    assert_eq!(report.details.len(), 2);
    let first = &report.details[0];
    assert_eq!(first.title.as_deref(), Some("캠퍼스 길찾기"));
    assert_eq!(first.summary.as_deref(), Some("캠퍼스 길찾기 개요"));
    assert_eq!(first.like_count.as_deref(), Some("7"));
    assert_eq!(
        first.representative_image.as_deref(),
        Some(format!("{}/upload/rep.png", server.uri()).as_str())
    );
    let team = first.team_info.as_ref().unwrap();
    assert_eq!(
        team.registrant.as_ref().unwrap().email.as_deref(),
        Some("reg@ajou.ac.kr")
    );
    assert_eq!(team.members[0].name.as_deref(), Some("김아주"));
    assert_eq!(first.git_repository, None);
    assert_eq!(report.failure_count(), 0);
}

#[tokio::test]
async fn test_failed_detail_is_isolated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works/works_list.asp"))
        .respond_with(html(listing_page(&[
            ("/works/works.asp?uid=1", "하나"),
            ("/works/works.asp?uid=2", "둘"),
            ("/works/works.asp?uid=3", "셋"),
        ])))
        .mount(&server)
        .await;

    mount_detail(&server, "1", html(detail_page("하나", "김"))).await;
    mount_detail(
        &server,
        "2",
        html(detail_page("둘", "이")).set_delay(Duration::from_secs(3)),
    )
    .await;
    mount_detail(&server, "3", html(detail_page("셋", "박"))).await;

    let mut config = create_test_config(&server.uri());
    config.crawl.request_timeout_secs = 1;

    let report = completed(run_crawl(config).await.unwrap());

    assert_eq!(report.details.len(), 3);
    assert_eq!(report.details[0].title.as_deref(), Some("하나"));
    assert_eq!(report.details[2].title.as_deref(), Some("셋"));

    let failed = &report.details[1];
    assert!(failed.is_failure());
    assert_eq!(failed.url, format!("{}/works/works.asp?uid=2", server.uri()));
    assert_eq!(failed.title, None);
    assert_eq!(failed.team_info, None);
}

#[tokio::test]
async fn test_server_error_becomes_failure_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works/works_list.asp"))
        .respond_with(html(listing_page(&[
            ("/works/works.asp?uid=1", "하나"),
            ("/works/works.asp?uid=2", "둘"),
        ])))
        .mount(&server)
        .await;

    mount_detail(&server, "1", ResponseTemplate::new(500)).await;
    mount_detail(&server, "2", html(detail_page("둘", "이"))).await;

    let report = completed(run_crawl(create_test_config(&server.uri())).await.unwrap());

    assert!(report.details[0].error.as_deref().unwrap().contains("500"));
    assert!(!report.details[1].is_failure());
    assert_eq!(report.failure_count(), 1);
}

#[tokio::test]
async fn test_max_items_caps_detail_requests() {
    let server = MockServer::start().await;

    let hrefs: Vec<(String, String)> = (1..=5)
        .map(|uid| (format!("/works/works.asp?uid={}", uid), format!("작품 {}", uid)))
        .collect();
    let borrowed: Vec<(&str, &str)> = hrefs
        .iter()
        .map(|(h, t)| (h.as_str(), t.as_str()))
        .collect();

    Mock::given(method("GET"))
        .and(path("/works/works_list.asp"))
        .respond_with(html(listing_page(&borrowed)))
        .mount(&server)
        .await;

    // Verified when the server drops
    Mock::given(method("GET"))
        .and(path("/works/works.asp"))
        .respond_with(html(detail_page("작품", "김")))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri());
    config.crawl.max_items = 2;

    let report = completed(run_crawl(config).await.unwrap());
    assert_eq!(report.references.len(), 5);
    assert_eq!(report.details.len(), 2);
    assert_eq!(report.details[1].uid.as_deref(), Some("2"));
}

#[tokio::test]
async fn test_previous_listing_uses_term() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works/works_list_prev.asp"))
        .and(query_param("category", "I"))
        .and(query_param("wTerm", "2024-1"))
        .respond_with(html(listing_page(&[(
            "/works/works_prev.asp?uid=1832&wTerm=2024-1",
            "지난 작품",
        )])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/works/works_prev.asp"))
        .and(query_param("uid", "1832"))
        .respond_with(html(detail_page("지난 작품", "최")))
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri());
    config.crawl.mode = ListingMode::Previous;
    config.crawl.category = "I".parse().unwrap();
    config.crawl.term = Some("2024-1".to_string());

    let report = completed(run_crawl(config).await.unwrap());

    assert_eq!(report.references[0].term.as_deref(), Some("2024-1"));
    assert_eq!(report.details[0].uid.as_deref(), Some("1832"));
    assert_eq!(report.details[0].term.as_deref(), Some("2024-1"));
    assert_eq!(report.details[0].title.as_deref(), Some("지난 작품"));
}

#[tokio::test]
async fn test_unreachable_listing_is_nothing_to_process() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works/works_list.asp"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    // No detail page may be requested
    Mock::given(method("GET"))
        .and(path("/works/works.asp"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    match run_crawl(create_test_config(&server.uri())).await.unwrap() {
        CrawlOutcome::NothingToProcess {
            reason: EmptyReason::ListingUnavailable(cause),
            ..
        } => assert!(cause.contains("503")),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_listing_without_projects() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works/works_list.asp"))
        .respond_with(html(listing_page(&[])))
        .mount(&server)
        .await;

    let outcome = run_crawl(create_test_config(&server.uri())).await.unwrap();
    assert!(matches!(
        outcome,
        CrawlOutcome::NothingToProcess {
            reason: EmptyReason::NoReferences,
            ..
        }
    ));
}

#[tokio::test]
async fn test_outputs_written_with_korean_text() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/works/works_list.asp"))
        .respond_with(html(listing_page(&[
            ("/works/works.asp?uid=1", "캠퍼스 길찾기"),
            ("/works/works.asp?uid=2", "스마트 팜"),
        ])))
        .mount(&server)
        .await;
    mount_detail(&server, "1", html(detail_page("캠퍼스 길찾기", "김아주"))).await;
    mount_detail(&server, "2", ResponseTemplate::new(404)).await;

    let mut config = create_test_config(&server.uri());
    config.output = OutputConfig {
        directory: dir.path().join("softcon_data").display().to_string(),
        ..OutputConfig::default()
    };

    let coordinator = Coordinator::new(config.clone()).unwrap();
    let started_at = chrono::Utc::now();
    let references = coordinator.discover().await.unwrap();

    // Links land on disk before the detail pass
    write_references(&references, &config.output.links_path()).unwrap();
    assert!(config.output.links_path().exists());
    assert!(!config.output.details_path().exists());

    let report = coordinator.complete(references, started_at).await;
    let summary = write_report(&report, &config, "deadbeef").unwrap();
    assert_eq!(summary.details_failed, 1);

    let links = std::fs::read_to_string(config.output.links_path()).unwrap();
    assert!(links.contains("캠퍼스 길찾기"));
    assert!(!links.contains("\\u"));
    let parsed: Vec<ProjectReference> = serde_json::from_str(&links).unwrap();
    assert_eq!(parsed.len(), 2);

    let details = std::fs::read_to_string(config.output.details_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&details).unwrap();
    assert_eq!(value[0]["teamInfo"]["members"][0]["name"], "김아주");
    assert!(value[1]["error"].as_str().unwrap().contains("404"));
    assert_eq!(value[1].as_object().unwrap().len(), 2);

    let markdown = std::fs::read_to_string(config.output.summary_path()).unwrap();
    assert!(markdown.contains("deadbeef"));
    assert!(markdown.contains("## Failed Projects"));
}
