mod common;

use chrono::TimeDelta;
use linkkeeper::utils::clock::Clock;
use serde_json::Value;

#[tokio::test]
async fn test_stats_for_code() {
    let ctx = common::create_test_state();
    common::create_test_record(
        &ctx.repository,
        "stat01",
        "https://example.com/a",
        ctx.clock.now(),
        30,
    )
    .await;

    let server = common::test_server(&ctx);
    server
        .get("/stat01")
        .add_header("Referer", "https://search.example")
        .await;
    server.get("/stat01").await;

    let response = server.get("/api/stats/stat01").await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["shortcode"], "stat01");
    assert_eq!(body["shortUrl"], "http://s.test/stat01");
    assert_eq!(body["longUrl"], "https://example.com/a");
    assert_eq!(body["clicks"], 2);
    assert_eq!(body["expired"], false);

    let details = body["clickDetails"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0]["source"], "https://search.example");
    assert_eq!(details[1]["source"], "Direct");
    assert_eq!(details[1]["location"], "Unknown");
}

#[tokio::test]
async fn test_stats_reading_does_not_count_as_click() {
    let ctx = common::create_test_state();
    common::create_test_record(
        &ctx.repository,
        "peek01",
        "https://example.com",
        ctx.clock.now(),
        30,
    )
    .await;

    let server = common::test_server(&ctx);
    server.get("/api/stats/peek01").await.assert_status_ok();

    let body = server.get("/api/stats/peek01").await.json::<Value>();
    assert_eq!(body["clicks"], 0);
    assert!(body["clickDetails"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_stats_for_expired_code() {
    let ctx = common::create_test_state();
    common::create_test_record(
        &ctx.repository,
        "old001",
        "https://example.com",
        ctx.clock.now(),
        1,
    )
    .await;
    ctx.clock.advance(TimeDelta::minutes(10));

    let server = common::test_server(&ctx);
    let response = server.get("/api/stats/old001").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["expired"], true);
}

#[tokio::test]
async fn test_stats_not_found() {
    let ctx = common::create_test_state();
    let server = common::test_server(&ctx);

    let response = server.get("/api/stats/unknown1").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_stats_list_newest_first() {
    let ctx = common::create_test_state();
    let base = ctx.clock.now();

    common::create_test_record(&ctx.repository, "aaaa1", "https://a.example", base, 30).await;
    common::create_test_record(
        &ctx.repository,
        "cccc3",
        "https://c.example",
        base + TimeDelta::seconds(2),
        30,
    )
    .await;
    common::create_test_record(
        &ctx.repository,
        "bbbb2",
        "https://b.example",
        base + TimeDelta::seconds(1),
        30,
    )
    .await;

    let server = common::test_server(&ctx);
    let response = server.get("/api/stats").await;

    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["total"], 3);

    let codes: Vec<_> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["shortcode"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(codes, vec!["cccc3", "bbbb2", "aaaa1"]);
}

#[tokio::test]
async fn test_stats_list_empty() {
    let ctx = common::create_test_state();
    let server = common::test_server(&ctx);

    let body = server.get("/api/stats").await.json::<Value>();

    assert_eq!(body["total"], 0);
    assert!(body["items"].as_array().unwrap().is_empty());
}
