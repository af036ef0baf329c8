//! Integration tests for the gallery browse endpoint: merge order, filter
//! buckets, cursor paging and explicit ranges.

mod common;

use axum::http::StatusCode;
use axum::Router;
use serde_json::Value;
use sqlx::PgPool;
use vitrine_core::media::MediaKind;
use vitrine_core::types::DbId;

/// Browse and expect success, returning the envelope.
async fn browse(app: &Router, token: &str, gallery_id: DbId, query: &str) -> Value {
    let uri = format!("/api/v1/galleries/{gallery_id}/browse{query}");
    let response = common::get(app, &uri, token).await;
    assert_eq!(response.status(), StatusCode::OK);
    common::body_json(response).await
}

/// Percent-encode a query parameter value (the `filters` JSON needs it).
fn encode(raw: &str) -> String {
    let mut out = String::new();
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Insert `n` images in one statement, newest last, and add them all to the
/// gallery.
async fn seed_bulk_images(pool: &PgPool, gallery_id: DbId, author_id: DbId, n: i64) {
    sqlx::query(
        "INSERT INTO images (title, author_id, guid, created_at) \
         SELECT 'frame ' || g, $1, '', to_timestamp(1000 + g) \
         FROM generate_series(1, $2) AS g",
    )
    .bind(author_id)
    .bind(n)
    .execute(pool)
    .await
    .unwrap();

    sqlx::query("UPDATE images SET guid = 'i' || lpad(to_hex(id), 8, '0') WHERE guid = ''")
        .execute(pool)
        .await
        .unwrap();

    sqlx::query("INSERT INTO gallery_images (gallery_id, image_id) SELECT $1, id FROM images")
        .bind(gallery_id)
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../db/migrations")]
async fn feed_merges_kinds_newest_first(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token, user_id) = common::login(&app, "curator@example.com").await;
    let gallery = common::create_gallery(&app, &token, "landscapes").await;

    common::seed_item(&pool, gallery, MediaKind::Image, user_id, "alpine lake", 1000).await;
    common::seed_item(&pool, gallery, MediaKind::Video, user_id, "lake flyover", 2000).await;
    common::seed_item(&pool, gallery, MediaKind::Image, user_id, "ridge line", 3000).await;
    common::seed_item(&pool, gallery, MediaKind::Video, user_id, "summit pan", 4000).await;

    let body = browse(&app, &token, gallery, "").await;

    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "0:300");
    assert_eq!(body["count"], 4);
    assert_eq!(
        common::page_guids(&body),
        vec!["v00000002", "i00000002", "v00000001", "i00000001"]
    );
    assert_eq!(body["items"][0]["kind"], "video");
    assert_eq!(body["items"][0]["author"], "curator");

    // Cursors land on the lowest id of each kind on the page.
    assert_eq!(body["last_image_id"], 1);
    assert_eq!(body["last_video_id"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn equal_timestamps_order_by_id_descending(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token, user_id) = common::login(&app, "curator@example.com").await;
    let gallery = common::create_gallery(&app, &token, "stills").await;

    for title in ["first", "second", "third"] {
        common::seed_item(&pool, gallery, MediaKind::Image, user_id, title, 5000).await;
    }

    let body = browse(&app, &token, gallery, "?models=image").await;
    assert_eq!(
        common::page_guids(&body),
        vec!["i00000003", "i00000002", "i00000001"]
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn filter_buckets_or_within_and_between(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token, user_id) = common::login(&app, "curator@example.com").await;
    let gallery = common::create_gallery(&app, &token, "harbor").await;

    let x = common::seed_item(
        &pool,
        gallery,
        MediaKind::Image,
        user_id,
        "sunset over water",
        1000,
    )
    .await;
    common::seed_item(&pool, gallery, MediaKind::Image, user_id, "city sunset", 2000).await;
    let z = common::seed_item(
        &pool,
        gallery,
        MediaKind::Image,
        user_id,
        "harbor morning",
        3000,
    )
    .await;

    // Login upserted the artist tag (id 1); "boat" becomes id 2.
    let response = common::post_json(
        &app,
        "/api/v1/tags",
        &token,
        serde_json::json!({ "name": "boat" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let boat_id = common::body_json(response).await["data"]["id"].as_i64().unwrap();

    for item in [&x, &z] {
        let uri = format!("/api/v1/media/{}/tags", item.guid);
        let response = common::post_json(
            &app,
            &uri,
            &token,
            serde_json::json!({ "tags": ["boat"] }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // One bucket: tag OR title substring.
    let query = format!("?filters={}", encode(&format!(r#"[[{boat_id}, "city"]]"#)));
    let body = browse(&app, &token, gallery, &query).await;
    assert_eq!(body["count"], 3);

    // Two buckets conjoin: only "sunset over water" is tagged and matches.
    let query = format!(
        "?filters={}",
        encode(&format!(r#"[["sunset"], [{boat_id}]]"#))
    );
    let body = browse(&app, &token, gallery, &query).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["guid"], x.guid);

    // A bucket nothing matches empties the feed.
    let query = format!("?filters={}", encode(r#"[["nowhere"]]"#));
    let body = browse(&app, &token, gallery, &query).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn single_kind_request_matches_the_merged_feed(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token_a, user_id) = common::login(&app, "merged@example.com").await;
    let (token_b, _) = common::login(&app, "single@example.com").await;
    let gallery = common::create_gallery(&app, &token_a, "mixed").await;

    common::seed_item(&pool, gallery, MediaKind::Image, user_id, "one", 1000).await;
    common::seed_item(&pool, gallery, MediaKind::Video, user_id, "two", 2000).await;
    common::seed_item(&pool, gallery, MediaKind::Image, user_id, "three", 3000).await;
    common::seed_item(&pool, gallery, MediaKind::Video, user_id, "four", 4000).await;
    common::seed_item(&pool, gallery, MediaKind::Image, user_id, "five", 5000).await;

    let merged = browse(&app, &token_a, gallery, "").await;
    let merged_images: Vec<String> = merged["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|item| item["kind"] == "image")
        .map(|item| item["guid"].as_str().unwrap().to_string())
        .collect();

    // A different session, so the merged call's cursors cannot interfere.
    let single = browse(&app, &token_b, gallery, "?models=image").await;
    assert_eq!(common::page_guids(&single), merged_images);
    assert_eq!(single["count"], 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn default_page_caps_each_kind_and_more_continues(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token, user_id) = common::login(&app, "curator@example.com").await;
    let gallery = common::create_gallery(&app, &token, "bulk").await;

    seed_bulk_images(&pool, gallery, user_id, 310).await;

    let first = browse(&app, &token, gallery, "").await;
    assert_eq!(first["count"], 300);
    assert_eq!(first["items"][0]["id"], 310);
    assert_eq!(first["items"][299]["id"], 11);
    assert_eq!(first["last_image_id"], 11);

    // Continuation excludes the cursor id and everything above it.
    let second = browse(&app, &token, gallery, "?more=true").await;
    assert_eq!(second["count"], 10);
    assert_eq!(second["items"][0]["id"], 10);
    assert_eq!(second["items"][9]["id"], 1);
    assert_eq!(second["last_image_id"], 1);

    // The feed is exhausted; the cursor stays where it was.
    let third = browse(&app, &token, gallery, "?more=true").await;
    assert_eq!(third["count"], 0);
    assert_eq!(third["last_image_id"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn explicit_ranges_are_replayable(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token, user_id) = common::login(&app, "curator@example.com").await;
    let gallery = common::create_gallery(&app, &token, "paged").await;

    for (title, at) in [
        ("a", 1001),
        ("b", 1002),
        ("c", 1003),
        ("d", 1004),
        ("e", 1005),
    ] {
        common::seed_item(&pool, gallery, MediaKind::Image, user_id, title, at).await;
    }

    // Feed order is ids 5,4,3,2,1; the slice [1, 3) picks 4 and 3.
    let page = browse(&app, &token, gallery, "?rng=1:3").await;
    assert_eq!(page["message"], "1:3");
    assert_eq!(page["count"], 2);
    assert_eq!(common::page_guids(&page), vec!["i00000004", "i00000003"]);
    // Explicit ranges report the page's own last ids; no video appeared
    // and no cursor was ever stored, so the video side is 0.
    assert_eq!(page["last_image_id"], 3);
    assert_eq!(page["last_video_id"], 0);

    let replay = browse(&app, &token, gallery, "?rng=1:3").await;
    assert_eq!(replay, page);

    // Out-of-bounds and inverted ranges are empty pages, not errors.
    let high = browse(&app, &token, gallery, "?rng=10:20").await;
    assert_eq!(high["count"], 0);
    let inverted = browse(&app, &token, gallery, "?rng=3:1").await;
    assert_eq!(inverted["count"], 0);
    assert_eq!(inverted["message"], "3:1");

    // None of the explicit-range calls stored a cursor, so a continuation
    // still starts from the top of the feed.
    let more = browse(&app, &token, gallery, "?more=true").await;
    assert_eq!(more["count"], 5);
    assert_eq!(more["items"][0]["guid"], "i00000005");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_parameters_leave_paging_untouched(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token, user_id) = common::login(&app, "curator@example.com").await;
    let gallery = common::create_gallery(&app, &token, "guarded").await;

    for (title, at) in [("a", 1001), ("b", 1002), ("c", 1003)] {
        common::seed_item(&pool, gallery, MediaKind::Image, user_id, title, at).await;
    }

    // Consume the whole feed; the image cursor lands on id 1.
    let first = browse(&app, &token, gallery, "").await;
    assert_eq!(first["count"], 3);

    for query in [
        "?rng=abc",
        "?rng=5",
        "?models=audio",
        "?filters=%7B%7D",
        "?more=maybe",
    ] {
        let uri = format!("/api/v1/galleries/{gallery}/browse{query}");
        let response = common::get(&app, &uri, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "query {query}");
        let body = common::body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR", "query {query}");
    }

    // Had any rejected call reset the cursor, this would return items.
    let more = browse(&app, &token, gallery, "?more=true").await;
    assert_eq!(more["count"], 0);
    assert_eq!(more["last_image_id"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn empty_gallery_pages_are_successful(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token, _) = common::login(&app, "curator@example.com").await;
    let gallery = common::create_gallery(&app, &token, "empty").await;

    let body = browse(&app, &token, gallery, "").await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 0);
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
    // With empty media tables the established bound is max id + 1 = 1.
    assert_eq!(body["last_image_id"], 1);
    assert_eq!(body["last_video_id"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn browsing_an_unknown_gallery_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::login(&app, "curator@example.com").await;

    let response = common::get(&app, "/api/v1/galleries/999/browse", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = common::body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn sessions_do_not_share_cursors(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token_a, user_id) = common::login(&app, "first@example.com").await;
    let (token_b, _) = common::login(&app, "second@example.com").await;
    let gallery = common::create_gallery(&app, &token_a, "shared").await;

    for (title, at) in [("a", 1001), ("b", 1002)] {
        common::seed_item(&pool, gallery, MediaKind::Image, user_id, title, at).await;
    }

    let consumed = browse(&app, &token_a, gallery, "").await;
    assert_eq!(consumed["count"], 2);
    let drained = browse(&app, &token_a, gallery, "?more=true").await;
    assert_eq!(drained["count"], 0);

    // The second session has no cursor, so `more` starts from the top.
    let fresh = browse(&app, &token_b, gallery, "?more=true").await;
    assert_eq!(fresh["count"], 2);
}
