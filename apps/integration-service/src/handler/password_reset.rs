//! # パスワードリセットイベントハンドラ
//!
//! `auth.password_reset` イベントを受け取り、リセットメールの通知リクエストを
//! 組み立ててディスパッチサービスに委譲する。

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::json;
use shopflow_domain::notification::{DispatchReceipt, NotificationRequest, NotificationTemplate};

use super::NotificationState;
use crate::error::IntegrationError;

/// `auth.password_reset` イベントのペイロード
#[derive(Debug, Deserialize)]
pub struct PasswordResetPayload {
    #[serde(default)]
    pub email: Option<String>,
    /// リセット画面の完全な URL（トークン込み）
    #[serde(default)]
    pub url: Option<String>,
}

/// パスワードリセットイベントを処理する
///
/// `POST /hooks/auth/password-reset`
pub async fn handle_password_reset(
    State(state): State<Arc<NotificationState>>,
    Json(payload): Json<PasswordResetPayload>,
) -> Result<Json<DispatchReceipt>, IntegrationError> {
    let email = payload
        .email
        .filter(|email| !email.is_empty())
        .ok_or_else(|| {
            IntegrationError::BadRequest(
                "auth.password_reset イベントに email がありません".to_string(),
            )
        })?;
    let url = payload.url.filter(|url| !url.is_empty()).ok_or_else(|| {
        IntegrationError::BadRequest(
            "auth.password_reset イベントに url がありません".to_string(),
        )
    })?;

    let data = json!({ "url": url });
    let request = NotificationRequest {
        to: email,
        template: NotificationTemplate::ResetPassword,
        data: data.as_object().cloned().unwrap_or_default(),
    };

    let receipt = state
        .notifications
        .send_notification("auth.password_reset", &request)
        .await?;
    Ok(Json(receipt))
}
