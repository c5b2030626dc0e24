//! # 統合テスト共通ヘルパー
//!
//! モックの外部クライアントを注入したルーターを構築する。

use std::{collections::HashMap, sync::Arc};

use axum::{Router, body::Body};
use http::{Request, Response};
use serde_json::Value;
use shopflow_infra::mock::{MockContentStore, MockMailSender};
use shopflow_integration_service::{
    app_builder::build_app,
    config::{ContentStoreConfig, MailBackend, MailConfig},
    handler::{NotificationState, SyncState},
    usecase::{ContentSyncService, NotificationService, TemplateRenderer},
};

/// テスト用アプリケーション一式
pub struct TestApp {
    pub app:    Router,
    pub store:  MockContentStore,
    pub mailer: MockMailSender,
}

/// テスト用アプリケーションの構築オプション
pub struct TestAppOptions {
    pub emails_enabled:          bool,
    pub admin_invite_url_prefix: Option<&'static str>,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            emails_enabled:          true,
            admin_invite_url_prefix: Some("https://admin.example.com"),
        }
    }
}

/// モックを注入したルーターを構築する
pub fn build_test_app(options: TestAppOptions) -> TestApp {
    let store = MockContentStore::new();
    let mailer = MockMailSender::new();

    let content_store_config = ContentStoreConfig {
        endpoint: "https://store.example.com".to_string(),
        api_token: "token".to_string(),
        dataset: "production".to_string(),
        api_version: "2024-07-01".to_string(),
        studio_url: Some("https://studio.example.com".to_string()),
        type_map: HashMap::new(),
    };
    let mail_config = MailConfig {
        backend:            MailBackend::Noop,
        api_endpoint:       "https://api.resend.com".to_string(),
        api_key:            None,
        smtp_host:          "localhost".to_string(),
        smtp_port:          1025,
        from_address:       "noreply@shop.example.com".to_string(),
        reply_to_address:   None,
        default_to_address: "fallback@shop.example.com".to_string(),
        emails_enabled:     options.emails_enabled,
    };

    let sync_state = Arc::new(SyncState {
        sync: ContentSyncService::new(Arc::new(store.clone()), &content_store_config),
    });
    let notification_state = Arc::new(NotificationState {
        notifications: NotificationService::new(
            Arc::new(mailer.clone()),
            TemplateRenderer::new().expect("テンプレート初期化"),
            &mail_config,
        ),
        admin_invite_url_prefix: options
            .admin_invite_url_prefix
            .map(str::to_string),
        company_name: Some("Oak & Co".to_string()),
    });

    TestApp {
        app: build_app(sync_state, notification_state),
        store,
        mailer,
    }
}

/// GET リクエストを組み立てる
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("リクエスト構築")
}

/// JSON ボディつき POST リクエストを組み立てる
pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("リクエスト構築")
}

/// レスポンスボディを JSON として読み取る
pub async fn read_json(response: Response<axum::body::Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("ボディ読み取り");
    serde_json::from_slice(&bytes).expect("JSON 解析")
}
