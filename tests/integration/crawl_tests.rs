//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small three-page catalog and run the
//! full crawl cycle end-to-end into a temporary directory.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tululu_fetch::config::{Config, EndPagePolicy};
use tululu_fetch::crawler::{Coordinator, ProgressEvent};
use tululu_fetch::output::{OutputHandler, OutputResult};
use tululu_fetch::{AssetLocation, BookRecord, CrawlError, RunPhase, SkipReason};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LAST_PAGE: u32 = 3;
const BOOKS_PER_PAGE: u32 = 5;

/// Book ids listed on catalog page `page`, in listing order
fn book_ids(page: u32) -> Vec<u32> {
    (1..=BOOKS_PER_PAGE).map(|k| page * 10 + k).collect()
}

fn listing_page(page: u32) -> String {
    let cards: String = book_ids(page)
        .iter()
        .map(|id| {
            format!(
                r#"<table class="d_book"><tr><td><a href="/b{id}/"><img src="/shots/{id}.jpg"></a></td></tr>
                <tr><td><a href="/b{id}/">Книга {id}</a></td></tr></table>"#
            )
        })
        .collect();
    let markers: String = (2..=LAST_PAGE)
        .map(|n| format!(r#"<a class="npage" href="/l55/{n}/">{n}</a>"#))
        .collect();
    format!(r#"<html><body>{cards}<p class="center">{markers}</p></body></html>"#)
}

fn book_page(id: u32) -> String {
    format!(
        r#"<html><body>
        <h1>Книга {id} :: Автор {id}</h1>
        <div class="bookimage"><a href="/b{id}/"><img src="/shots/{id}.jpg"></a></div>
        <span class="d_book">Жанр книги: <a href="/l55/">Научная фантастика</a></span>
        <div class="texts"><b>Читатель</b><br><span class="black">Отзыв о книге {id}</span></div>
        </body></html>"#
    )
}

/// Mounts the catalog, every book page, texts and covers
///
/// Books whose id is in `removed` redirect their download link to the front page.
async fn mount_catalog(server: &MockServer, removed: &[u32]) {
    Mock::given(method("GET"))
        .and(path("/l55/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(1)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>главная</html>"))
        .mount(server)
        .await;

    for page in 1..=LAST_PAGE {
        Mock::given(method("GET"))
            .and(path(format!("/l55/{}", page)))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(page)))
            .mount(server)
            .await;

        for id in book_ids(page) {
            Mock::given(method("GET"))
                .and(path(format!("/b{}/", id)))
                .respond_with(ResponseTemplate::new(200).set_body_string(book_page(id)))
                .mount(server)
                .await;
            Mock::given(method("GET"))
                .and(path(format!("/shots/{}.jpg", id)))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, id as u8]))
                .mount(server)
                .await;

            let text = if removed.contains(&id) {
                ResponseTemplate::new(302).insert_header("location", "/")
            } else {
                ResponseTemplate::new(200).set_body_string(format!("Текст книги {}", id))
            };
            Mock::given(method("GET"))
                .and(path("/txt.php"))
                .and(query_param("id", id.to_string()))
                .respond_with(text)
                .mount(server)
                .await;
        }
    }
}

fn test_config(server: &MockServer, dir: &TempDir, start: u32, end: Option<u32>) -> Config {
    let mut config = Config::default();
    config.site.base_url = server.uri();
    config.crawler.start_page = start;
    config.crawler.end_page = end;
    config.crawler.request_timeout_secs = 5;
    config.output.dest_folder = dir.path().to_path_buf();
    config
}

fn count_files(dir: &Path) -> usize {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

#[tokio::test]
async fn test_single_page_range_fetches_all_books_in_order() {
    let server = MockServer::start().await;
    mount_catalog(&server, &[]).await;
    let dir = TempDir::new().unwrap();

    let mut coordinator = Coordinator::new(test_config(&server, &dir, 2, Some(3))).unwrap();
    let report = coordinator.run().await.expect("crawl should succeed");

    assert_eq!(coordinator.phase(), RunPhase::Done);
    assert_eq!(report.records.len(), 5);
    assert!(!report.had_failures());
    assert_eq!(report.pages_fetched, vec![2]);
    assert_eq!(report.boundary_exceeded, None);

    let names: Vec<&str> = report.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Книга 21", "Книга 22", "Книга 23", "Книга 24", "Книга 25"]
    );

    for record in &report.records {
        let text = record.text.path().expect("text should be saved");
        let image = record.image.path().expect("cover should be saved");
        assert!(std::fs::metadata(text).unwrap().len() > 0);
        assert!(std::fs::metadata(image).unwrap().len() > 0);
    }

    let first = &report.records[0];
    assert_eq!(first.author, "Автор 21");
    assert_eq!(first.comments, vec!["Отзыв о книге 21"]);
    assert_eq!(first.genres, vec!["Научная фантастика"]);
    assert_eq!(
        std::fs::read_to_string(first.text.path().unwrap()).unwrap(),
        "Текст книги 21"
    );
}

#[tokio::test]
async fn test_redirected_book_is_skipped_and_run_continues() {
    let server = MockServer::start().await;
    mount_catalog(&server, &[23]).await;
    let dir = TempDir::new().unwrap();

    let report = Coordinator::new(test_config(&server, &dir, 2, Some(3)))
        .unwrap()
        .run()
        .await
        .expect("crawl should succeed");

    assert_eq!(report.records.len(), 4);
    assert!(report.had_failures());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].url, format!("{}/b23/", server.uri()));
    assert_eq!(report.skipped[0].reason, SkipReason::Unavailable);
    assert!(report.records.iter().all(|r| r.name != "Книга 23"));

    let layout_dir = dir.path();
    assert_eq!(count_files(&layout_dir.join("books")), 4);
    assert_eq!(count_files(&layout_dir.join("images")), 4);
    assert!(!layout_dir.join("books").join("Книга 23.txt").exists());
}

#[tokio::test]
async fn test_start_past_last_page_is_empty_result() {
    let server = MockServer::start().await;
    mount_catalog(&server, &[]).await;
    let dir = TempDir::new().unwrap();

    let mut coordinator = Coordinator::new(test_config(&server, &dir, 5, Some(7))).unwrap();
    let result = coordinator.run().await;

    assert!(matches!(result, Err(CrawlError::EmptyResult)));
    assert_eq!(coordinator.phase(), RunPhase::Aborted);
    assert!(!dir.path().join("json").join("books_description.json").exists());
}

#[tokio::test]
async fn test_range_ending_at_last_page_has_no_boundary() {
    let server = MockServer::start().await;
    mount_catalog(&server, &[]).await;
    let dir = TempDir::new().unwrap();

    let report = Coordinator::new(test_config(&server, &dir, 1, Some(LAST_PAGE + 1)))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.boundary_exceeded, None);
    assert_eq!(report.pages_fetched, vec![1, 2, 3]);
    assert_eq!(report.records.len(), 15);
}

#[tokio::test]
async fn test_range_past_last_page_hits_boundary() {
    let server = MockServer::start().await;
    mount_catalog(&server, &[]).await;
    let dir = TempDir::new().unwrap();

    let report = Coordinator::new(test_config(&server, &dir, 2, Some(LAST_PAGE + 2)))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.boundary_exceeded, Some(LAST_PAGE + 1));
    assert_eq!(report.pages_fetched, vec![2, 3]);
    assert_eq!(report.records.len(), 10);
}

#[tokio::test]
async fn test_missing_end_page_uses_policy() {
    let server = MockServer::start().await;
    mount_catalog(&server, &[]).await;
    let dir = TempDir::new().unwrap();

    let mut config = test_config(&server, &dir, 3, None);
    config.crawler.end_page_policy = EndPagePolicy::Single;
    let report = Coordinator::new(config).unwrap().run().await.unwrap();
    assert_eq!(report.pages_fetched, vec![3]);

    let report = Coordinator::new(test_config(&server, &dir, 2, None))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(report.pages_fetched, vec![2, 3]);
    assert_eq!(report.boundary_exceeded, None);
}

#[tokio::test]
async fn test_skip_flags_record_sentinel_and_write_no_files() {
    let server = MockServer::start().await;
    mount_catalog(&server, &[]).await;
    let dir = TempDir::new().unwrap();

    let mut config = test_config(&server, &dir, 2, Some(3));
    config.crawler.skip_images = true;
    config.crawler.skip_texts = true;
    let report = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(report.records.len(), 5);
    for record in &report.records {
        assert_eq!(record.text, AssetLocation::NotDownloaded);
        assert_eq!(record.image, AssetLocation::NotDownloaded);
    }
    assert_eq!(count_files(&dir.path().join("books")), 0);
    assert_eq!(count_files(&dir.path().join("images")), 0);

    let json = std::fs::read_to_string(&report.description_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["book_path"], "Not downloaded");
    assert_eq!(value[0]["img_path"], "Not downloaded");
}

#[tokio::test]
async fn test_description_json_is_written() {
    let server = MockServer::start().await;
    mount_catalog(&server, &[22]).await;
    let dir = TempDir::new().unwrap();
    let json_dir = dir.path().join("meta");

    let mut config = test_config(&server, &dir, 2, Some(3));
    config.output.json_folder = Some(json_dir.clone());
    let report = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(report.description_path, json_dir.join("books_description.json"));
    let json = std::fs::read_to_string(&report.description_path).unwrap();
    assert!(json.contains("Книга 21"), "non-ASCII should not be escaped");

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let books = value.as_array().unwrap();
    assert_eq!(books.len(), 4);
    assert_eq!(books[0]["book_name"], "Книга 21");
    assert_eq!(books[0]["author"], "Автор 21");
    assert_eq!(books[0]["genre"][0], "Научная фантастика");
    assert_eq!(books[1]["book_name"], "Книга 23");
}

#[tokio::test]
async fn test_rerun_overwrites_instead_of_duplicating() {
    let server = MockServer::start().await;
    mount_catalog(&server, &[]).await;
    let dir = TempDir::new().unwrap();

    let first = Coordinator::new(test_config(&server, &dir, 2, Some(3)))
        .unwrap()
        .run()
        .await
        .unwrap();
    let second = Coordinator::new(test_config(&server, &dir, 2, Some(3)))
        .unwrap()
        .run()
        .await
        .unwrap();

    let names = |report: &tululu_fetch::RunReport| -> Vec<(String, String)> {
        report
            .records
            .iter()
            .map(|r| (r.name.clone(), r.author.clone()))
            .collect()
    };
    assert_eq!(names(&first), names(&second));
    assert_eq!(count_files(&dir.path().join("books")), 5);
    assert_eq!(count_files(&dir.path().join("images")), 5);
}

#[tokio::test]
async fn test_progress_events_cover_every_book() {
    let server = MockServer::start().await;
    mount_catalog(&server, &[24]).await;
    let dir = TempDir::new().unwrap();

    let seen = Arc::new(Mutex::new((0usize, Vec::new())));
    let sink = Arc::clone(&seen);
    let mut coordinator = Coordinator::new(test_config(&server, &dir, 2, Some(3)))
        .unwrap()
        .with_progress(move |event| {
            let mut seen = sink.lock().unwrap();
            match event {
                ProgressEvent::BooksCollected { total } => seen.0 = total,
                ProgressEvent::BookFinished { index, outcome, .. } => {
                    seen.1.push((index, outcome.is_fetched()))
                }
            }
        });
    coordinator.run().await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.0, 5);
    assert_eq!(
        seen.1,
        vec![(0, true), (1, true), (2, true), (3, false), (4, true)]
    );
}

#[tokio::test]
async fn test_unreachable_catalog_aborts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/l55/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let mut coordinator = Coordinator::new(test_config(&server, &dir, 1, Some(2))).unwrap();
    let result = coordinator.run().await;

    assert!(matches!(result, Err(CrawlError::HttpStatus { status: 503, .. })));
    assert_eq!(coordinator.phase(), RunPhase::Aborted);
}

/// Keeps the aggregate in memory instead of writing JSON
struct MemoryOutput {
    names: Arc<Mutex<Vec<String>>>,
}

impl OutputHandler for MemoryOutput {
    fn write_books(&self, records: &[BookRecord]) -> OutputResult<PathBuf> {
        let mut names = self.names.lock().unwrap();
        names.extend(records.iter().map(|r| r.name.clone()));
        Ok(PathBuf::from("memory"))
    }
}

#[tokio::test]
async fn test_custom_output_handler_receives_aggregate_once() {
    let server = MockServer::start().await;
    mount_catalog(&server, &[25]).await;
    let dir = TempDir::new().unwrap();

    let names = Arc::new(Mutex::new(Vec::new()));
    let output = MemoryOutput {
        names: Arc::clone(&names),
    };
    let report = Coordinator::new(test_config(&server, &dir, 2, Some(3)))
        .unwrap()
        .with_output_handler(Box::new(output))
        .run()
        .await
        .unwrap();

    assert_eq!(report.description_path, PathBuf::from("memory"));
    assert_eq!(
        *names.lock().unwrap(),
        vec!["Книга 21", "Книга 22", "Книга 23", "Книга 24"]
    );
    assert!(!dir.path().join("json").join("books_description.json").exists());
}
