//! Integration tests for the chapter API, player page, CORS behavior, and
//! routing fallbacks.

mod common;

use common::TestHarness;
use serde_json::Value;

#[tokio::test]
async fn chapters_follow_directory_discovery_order() {
    let h = TestHarness::new();
    h.write_chapter("02-second.mp3", b"b");
    h.write_chapter("01-first.mp3", b"a");
    h.write_chapter("notes.txt", b"not audio");
    let addr = h.spawn().await;

    let resp = reqwest::get(format!("http://{addr}/api/chapters"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "application/json"
    );

    let chapters: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0]["id"], 0);
    assert_eq!(chapters[0]["title"], "Chapter 1");
    assert_eq!(chapters[0]["url"], "/audio/01-first.mp3");
    assert_eq!(chapters[1]["id"], 1);
    assert_eq!(chapters[1]["url"], "/audio/02-second.mp3");
}

#[tokio::test]
async fn chapters_follow_sidecar_manifest() {
    let h = TestHarness::new();
    h.write_chapter("a.mp3", b"a");
    h.write_chapter("z.mp3", b"z");
    h.write_sidecar(
        r#"[
            {"file": "z.mp3", "title": "Prologue"},
            {"file": "a.mp3", "title": "Epilogue"}
        ]"#,
    );
    let addr = h.spawn().await;

    let chapters: Vec<Value> = reqwest::get(format!("http://{addr}/api/chapters"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0]["title"], "Prologue");
    assert_eq!(chapters[0]["url"], "/audio/z.mp3");
    assert_eq!(chapters[1]["title"], "Epilogue");
}

#[tokio::test]
async fn inline_chapters_win_over_sidecar() {
    let mut h = TestHarness::new();
    h.write_sidecar(r#"[{"file": "sidecar.mp3", "title": "From Sidecar"}]"#);
    h.config.library.chapters_json =
        Some(r#"[{"file": "inline.mp3", "title": "From Inline"}]"#.to_string());
    let addr = h.spawn().await;

    let chapters: Vec<Value> = reqwest::get(format!("http://{addr}/api/chapters"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0]["title"], "From Inline");
}

#[tokio::test]
async fn player_page_substitutes_title_and_author() {
    let h = TestHarness::new();
    let addr = h.spawn().await;

    for path in ["/", "/index.html"] {
        let resp = reqwest::get(format!("http://{addr}{path}")).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert!(resp
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html"));

        let body = resp.text().await.unwrap();
        assert!(body.contains("Test Book"));
        assert!(body.contains("Test Author"));
        assert!(!body.contains("{{TITLE}}"));
        assert!(!body.contains("{{AUTHOR}}"));
    }
}

#[tokio::test]
async fn options_returns_empty_200_on_any_path() {
    let h = TestHarness::new();
    let addr = h.spawn().await;

    let client = reqwest::Client::new();
    for path in ["/", "/api/chapters", "/audio/whatever.mp3", "/no/such/route"] {
        let resp = client
            .request(reqwest::Method::OPTIONS, format!("http://{addr}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200, "OPTIONS {path}");
        assert!(resp.bytes().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn cors_headers_present_on_all_responses() {
    let h = TestHarness::new();
    let addr = h.spawn().await;

    for path in ["/api/chapters", "/no/such/route"] {
        let resp = reqwest::get(format!("http://{addr}{path}")).await.unwrap();
        let headers = resp.headers();
        assert_eq!(
            headers
                .get("access-control-allow-origin")
                .unwrap()
                .to_str()
                .unwrap(),
            "*",
            "missing CORS headers on {path}"
        );
        assert_eq!(
            headers
                .get("access-control-allow-methods")
                .unwrap()
                .to_str()
                .unwrap(),
            "GET, OPTIONS"
        );
        assert_eq!(
            headers
                .get("access-control-expose-headers")
                .unwrap()
                .to_str()
                .unwrap(),
            "Content-Range, Content-Length, Accept-Ranges"
        );
    }
}

#[tokio::test]
async fn unknown_path_is_404_text() {
    let h = TestHarness::new();
    let addr = h.spawn().await;

    let resp = reqwest::get(format!("http://{addr}/no/such/route"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(resp.text().await.unwrap(), "Not found");
}

#[tokio::test]
async fn query_strings_do_not_affect_routing() {
    let h = TestHarness::new();
    h.write_chapter("q.mp3", b"hello");
    let addr = h.spawn().await;

    let resp = reqwest::get(format!("http://{addr}/api/chapters?cache_bust=1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = reqwest::get(format!("http://{addr}/audio/q.mp3?t=123"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn health_check_responds() {
    let h = TestHarness::new();
    let addr = h.spawn().await;

    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
}
