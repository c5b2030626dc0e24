//! # Integration Service エラー定義
//!
//! Integration Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! ## 伝播ポリシー
//!
//! 書き込み失敗を成功に格下げしない。意図的な「効果なしの成功」は
//! 通知無効化時のスキップ（タグ付き結果）のみで、それはエラーではなく
//! 正常系として表現される。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shopflow_domain::notification::NotificationError;
use shopflow_infra::{InfraError, error::InfraErrorKind};
use thiserror::Error;

/// エラーレスポンス（RFC 7807 Problem Details）
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title:      String,
    pub status:     u16,
    pub detail:     String,
}

/// Integration Service で発生するエラー
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 不正なリクエスト（インバウンドイベントの検証失敗を含む）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// 設定不備（例: スタジオ URL 未設定でのリンク生成）
    #[error("設定エラー: {0}")]
    Configuration(String),

    /// コンテンツストアとの通信で発生したエラー
    #[error("コンテンツストアエラー: {0}")]
    ContentStore(#[from] InfraError),

    /// 通知送信で発生したエラー
    #[error("通知エラー: {0}")]
    Notification(#[from] NotificationError),

    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl IntoResponse for IntegrationError {
    fn into_response(self) -> Response {
        let (status, error_type, title, detail) = match &self {
            IntegrationError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "https://shopflow.example.com/errors/not-found",
                "Not Found",
                msg.clone(),
            ),
            IntegrationError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "https://shopflow.example.com/errors/bad-request",
                "Bad Request",
                msg.clone(),
            ),
            IntegrationError::Configuration(msg) => {
                tracing::error!("設定エラー: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "https://shopflow.example.com/errors/configuration",
                    "Configuration Error",
                    msg.clone(),
                )
            }
            IntegrationError::ContentStore(e) => match e.kind() {
                InfraErrorKind::DocumentNotFound { id } => (
                    StatusCode::NOT_FOUND,
                    "https://shopflow.example.com/errors/not-found",
                    "Not Found",
                    format!("ドキュメントが見つかりません: {id}"),
                ),
                InfraErrorKind::DocumentExists { id } => (
                    StatusCode::CONFLICT,
                    "https://shopflow.example.com/errors/conflict",
                    "Conflict",
                    format!("ドキュメントが既に存在します: {id}"),
                ),
                _ => {
                    tracing::error!("コンテンツストアエラー: {}", e);
                    (
                        StatusCode::BAD_GATEWAY,
                        "https://shopflow.example.com/errors/upstream",
                        "Upstream Error",
                        "コンテンツストアとの通信に失敗しました".to_string(),
                    )
                }
            },
            IntegrationError::Notification(e) => match e {
                NotificationError::TemplateFailed(msg) => (
                    StatusCode::BAD_REQUEST,
                    "https://shopflow.example.com/errors/bad-request",
                    "Bad Request",
                    msg.clone(),
                ),
                NotificationError::Provider(_) | NotificationError::SendFailed(_) => {
                    tracing::error!("通知エラー: {}", e);
                    (
                        StatusCode::BAD_GATEWAY,
                        "https://shopflow.example.com/errors/upstream",
                        "Upstream Error",
                        "メールプロバイダとの通信に失敗しました".to_string(),
                    )
                }
            },
            IntegrationError::Internal(msg) => {
                tracing::error!("内部エラー: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "https://shopflow.example.com/errors/internal-error",
                    "Internal Server Error",
                    "内部エラーが発生しました".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error_type: error_type.to_string(),
                title: title.to_string(),
                status: status.as_u16(),
                detail,
            }),
        )
            .into_response()
    }
}
