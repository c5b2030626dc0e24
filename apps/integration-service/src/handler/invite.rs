//! # 管理者招待イベントハンドラ
//!
//! `invite.created` イベントを受け取り、招待メールの通知リクエストを
//! 組み立ててディスパッチサービスに委譲する。

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shopflow_domain::notification::{DispatchReceipt, NotificationRequest, NotificationTemplate};

use super::NotificationState;
use crate::error::IntegrationError;

/// 招待されたユーザー
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitedUser {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// `invite.created` イベントのペイロード
#[derive(Debug, Deserialize)]
pub struct InviteCreatedPayload {
    #[serde(default)]
    pub user: Option<InvitedUser>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// 管理者招待イベントを処理する
///
/// `POST /hooks/invite/created`
///
/// `user.email`・`token`・招待 URL プレフィックス設定のいずれかが欠けている
/// 場合は即座に失敗する。これらの失敗はホスト側のイベントリトライ・ログ基盤で
/// 可視化される想定であり、ここでは握り潰さない。
pub async fn handle_invite_created(
    State(state): State<Arc<NotificationState>>,
    Json(payload): Json<InviteCreatedPayload>,
) -> Result<Json<DispatchReceipt>, IntegrationError> {
    let user = payload
        .user
        .filter(|user| !user.email.is_empty())
        .ok_or_else(|| {
            IntegrationError::BadRequest(
                "invite.created イベントに user.email がありません".to_string(),
            )
        })?;
    let token = payload
        .token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            IntegrationError::BadRequest(
                "invite.created イベントに token がありません".to_string(),
            )
        })?;
    let admin_url = state.admin_invite_url_prefix.as_deref().ok_or_else(|| {
        IntegrationError::Configuration(
            "ADMIN_INVITE_URL_PREFIX が設定されていません".to_string(),
        )
    })?;

    tracing::info!(email = %user.email, role = ?payload.role, "管理者招待を処理します");

    let company = state.company_name.as_deref().unwrap_or("our");
    let user_value = serde_json::to_value(&user)
        .map_err(|e| IntegrationError::Internal(e.to_string()))?;

    let data = json!({
        "token": token,
        "user": user_value,
        "subject": format!("You've been invited to join {company} admin team"),
        "accept_invite_url": format!("{admin_url}/invite?token={token}"),
    });
    let request = NotificationRequest {
        to: user.email.clone(),
        template: NotificationTemplate::InviteAdmin,
        data: data.as_object().cloned().unwrap_or_default(),
    };

    let receipt = state
        .notifications
        .send_notification("invite.created", &request)
        .await?;
    Ok(Json(receipt))
}
