//! # アプリケーション構築
//!
//! State の注入とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handler::{
    NotificationState,
    SyncState,
    get_document,
    get_studio_link,
    handle_invite_created,
    handle_order_placed,
    handle_password_reset,
    handle_product_deleted,
    handle_product_upserted,
    health_check,
    list_documents,
};

/// ルーターを構築する
///
/// Webhook エンドポイントは `/hooks/{ドメイン}/{イベント}` の形で公開する。
/// 作成・更新イベントは同じ upsert ハンドラに向ける（分岐はストア側の
/// 存在チェックが決める）。
pub fn build_app(
    sync_state: Arc<SyncState>,
    notification_state: Arc<NotificationState>,
) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // 商品同期 Webhook
        .route("/hooks/product/created", post(handle_product_upserted))
        .route("/hooks/product/updated", post(handle_product_upserted))
        .route("/hooks/product/deleted", post(handle_product_deleted))
        // ドキュメント参照 API（管理 UI 向け）
        .route("/documents", get(list_documents))
        .route("/documents/{id}", get(get_document))
        .route("/documents/{id}/studio-link", get(get_studio_link))
        .with_state(sync_state)
        // 通知 Webhook
        .route("/hooks/invite/created", post(handle_invite_created))
        .route("/hooks/order/placed", post(handle_order_placed))
        .route("/hooks/auth/password-reset", post(handle_password_reset))
        .with_state(notification_state)
        .layer(TraceLayer::new_for_http())
}
