//! # 商品同期フローの統合テスト
//!
//! Webhook エンドポイント経由で商品イベントを流し、モックのコンテンツストアに
//! 対する create / update / delete の分岐と変換結果を検証する。

mod common;

use common::{TestApp, TestAppOptions, build_test_app, get, post_json, read_json};
use http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn 新規商品のcreatedイベントでドキュメントが作成される() {
    let TestApp { app, store, .. } = build_test_app(TestAppOptions::default());

    let response = app
        .oneshot(post_json(
            "/hooks/product/created",
            &json!({"id": "p1", "title": "Chair"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["_id"], "p1");
    assert_eq!(body["medusaId"], "p1");
    assert_eq!(body["localizedTitles"]["en"], "Chair");
    assert_eq!(body["description"], "");

    assert_eq!(store.created_ids(), vec!["p1".to_string()]);
    assert!(store.patched_ids().is_empty());
}

#[tokio::test]
async fn 既存商品のupdatedイベントでパッチが適用される() {
    let TestApp { app, store, .. } = build_test_app(TestAppOptions::default());
    store.seed_document(json!({
        "_id": "p1",
        "title": "Chair",
        "brand": "Oak & Co",
        "localizedTitles": {"en": "Chair", "pl": "", "fr": ""},
        "localizedDescriptions": {"en": "", "pl": "", "fr": ""},
    }));

    let response = app
        .oneshot(post_json(
            "/hooks/product/updated",
            &json!({"id": "p1", "title": "Chair", "description": "Oak chair"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(store.created_ids().is_empty());
    assert_eq!(store.patched_ids(), vec!["p1".to_string()]);

    let doc = store.document("p1").unwrap();
    assert_eq!(doc["description"], "Oak chair");
    assert_eq!(doc["localizedDescriptions"]["en"], "Oak chair");
    // ストア専用フィールドは同期で上書きされない
    assert_eq!(doc["brand"], "Oak & Co");
}

#[tokio::test]
async fn createdとupdatedはどちらも存在チェックで分岐する() {
    let TestApp { app, store, .. } = build_test_app(TestAppOptions::default());

    // created イベントでも既存 ID なら update 経路に入る
    store.seed_document(json!({"_id": "p1", "title": "Chair"}));

    let response = app
        .oneshot(post_json(
            "/hooks/product/created",
            &json!({"id": "p1", "title": "Oak Chair"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(store.created_ids().is_empty());
    assert_eq!(store.patched_ids(), vec!["p1".to_string()]);
}

#[tokio::test]
async fn 必須フィールド欠落のペイロードはクライアントエラーになる() {
    let TestApp { app, store, .. } = build_test_app(TestAppOptions::default());

    let response = app
        .oneshot(post_json("/hooks/product/created", &json!({"id": "p1"})))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert!(store.created_ids().is_empty());
}

#[tokio::test]
async fn deletedイベントでドキュメントが削除される() {
    let TestApp { app, store, .. } = build_test_app(TestAppOptions::default());
    store.seed_document(json!({"_id": "p1", "title": "Chair"}));

    let response = app
        .oneshot(post_json("/hooks/product/deleted", &json!({"id": "p1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(store.deleted_ids(), vec!["p1".to_string()]);
    assert!(store.document("p1").is_none());
}

#[tokio::test]
async fn ドキュメント参照apiが正規化済みのドキュメントを返す() {
    let TestApp { app, store, .. } = build_test_app(TestAppOptions::default());
    store.seed_document(json!({"_id": "p1", "title": "Chair"}));
    store.seed_document(json!({"_id": "p2", "title": "Table"}));

    let response = app
        .clone()
        .oneshot(get("/documents/p1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["_id"], "p1");

    let response = app
        .clone()
        .oneshot(get("/documents?ids=p1,p2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body[0]["id"], "p1");
    assert_eq!(body[1]["id"], "p2");

    let response = app
        .oneshot(get("/documents/missing"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn スタジオリンクapiが型マップ解決済みのurlを返す() {
    let TestApp { app, .. } = build_test_app(TestAppOptions::default());

    let response = app
        .clone()
        .oneshot(get("/documents/p1/studio-link?doc_type=product"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(
        body["url"],
        "https://studio.example.com/structure/product;p1"
    );

    let response = app
        .oneshot(get(
            "/documents/p1/studio-link?doc_type=customType&explicit_type=true",
        ))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(
        body["url"],
        "https://studio.example.com/structure/customType;p1"
    );
}

#[tokio::test]
async fn 存在しない商品のdeletedイベントは404になる() {
    let TestApp { app, .. } = build_test_app(TestAppOptions::default());

    let response = app
        .oneshot(post_json(
            "/hooks/product/deleted",
            &json!({"id": "missing"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
