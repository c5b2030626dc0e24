//! # 商品イベントハンドラ
//!
//! 商品の作成・更新・削除イベントを受け取り、コンテンツストアへの
//! 同期を実行する。

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::Value;
use shopflow_domain::{product::ProductRecord, sync::SyncDocumentType};

use super::SyncState;
use crate::error::IntegrationError;

/// 商品削除イベントのペイロード
#[derive(Debug, Deserialize)]
pub struct ProductDeletedPayload {
    pub id: String,
}

/// 商品の作成・更新イベントを処理する
///
/// `POST /hooks/product/created` / `POST /hooks/product/updated`
///
/// どちらのイベントでも upsert を実行する。create / update の分岐は
/// イベント名ではなくストア側の存在チェックが決める（イベントの順序逆転や
/// 再配送に対して安全）。
pub async fn handle_product_upserted(
    State(state): State<Arc<SyncState>>,
    Json(payload): Json<ProductRecord>,
) -> Result<Json<Value>, IntegrationError> {
    if payload.id.is_empty() {
        return Err(IntegrationError::BadRequest(
            "商品イベントに id がありません".to_string(),
        ));
    }

    let doc = state
        .sync
        .upsert(SyncDocumentType::Product, &payload)
        .await?;
    Ok(Json(doc))
}

/// 商品の削除イベントを処理する
///
/// `POST /hooks/product/deleted`
pub async fn handle_product_deleted(
    State(state): State<Arc<SyncState>>,
    Json(payload): Json<ProductDeletedPayload>,
) -> Result<StatusCode, IntegrationError> {
    if payload.id.is_empty() {
        return Err(IntegrationError::BadRequest(
            "商品削除イベントに id がありません".to_string(),
        ));
    }

    state.sync.delete(&payload.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
