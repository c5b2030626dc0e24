//! # ドキュメント参照ハンドラ
//!
//! ホストプラットフォームの管理 UI から呼び出される読み取り系エンドポイント。
//! 同期済みドキュメントの確認とスタジオ編集リンクの取得に使う。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::SyncState;
use crate::{error::IntegrationError, usecase::StudioLinkOptions};

/// ドキュメント一覧取得のクエリ
#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    /// カンマ区切りのドキュメント ID（1 件以上）
    pub ids: String,
}

/// スタジオリンク取得のクエリ
#[derive(Debug, Deserialize)]
pub struct StudioLinkQuery {
    /// ドキュメント種別（`explicit_type` 無効時は型マップで解決される）
    pub doc_type: String,
    /// 渡された種別名をそのまま URL に使用する
    #[serde(default)]
    pub explicit_type: bool,
}

/// スタジオリンクのレスポンス
#[derive(Debug, Serialize)]
pub struct StudioLinkResponse {
    pub url: String,
}

/// ドキュメントを取得する
///
/// `GET /documents/{id}`
pub async fn get_document(
    State(state): State<Arc<SyncState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, IntegrationError> {
    let doc = state.sync.retrieve(&id).await?.ok_or_else(|| {
        IntegrationError::NotFound(format!("ドキュメントが見つかりません: {id}"))
    })?;
    Ok(Json(doc))
}

/// ドキュメントを一括取得する
///
/// `GET /documents?ids=p1,p2`
///
/// 返却される各ドキュメントはストア固有の `_id` が `id` として正規化される。
pub async fn list_documents(
    State(state): State<Arc<SyncState>>,
    Query(query): Query<ListDocumentsQuery>,
) -> Result<Json<Vec<Value>>, IntegrationError> {
    let ids: Vec<String> = query
        .ids
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();
    if ids.is_empty() {
        return Err(IntegrationError::BadRequest(
            "ids に 1 件以上のドキュメント ID を指定してください".to_string(),
        ));
    }

    let docs = state.sync.list(&ids).await?;
    Ok(Json(docs))
}

/// スタジオ編集リンクを取得する
///
/// `GET /documents/{id}/studio-link?doc_type=product`
pub async fn get_studio_link(
    State(state): State<Arc<SyncState>>,
    Path(id): Path<String>,
    Query(query): Query<StudioLinkQuery>,
) -> Result<Json<StudioLinkResponse>, IntegrationError> {
    let url = state.sync.studio_link(
        &query.doc_type,
        &id,
        StudioLinkOptions {
            explicit_type: query.explicit_type,
        },
    )?;
    Ok(Json(StudioLinkResponse { url }))
}
