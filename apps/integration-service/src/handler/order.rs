//! # 注文イベントハンドラ
//!
//! `order.placed` イベントを受け取り、注文確認メールの通知リクエストを
//! 組み立ててディスパッチサービスに委譲する。

use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::Value;
use shopflow_domain::notification::{DispatchReceipt, NotificationRequest, NotificationTemplate};

use super::NotificationState;
use crate::error::IntegrationError;

/// 注文確定イベントを処理する
///
/// `POST /hooks/order/placed`
///
/// 注文ペイロード全体をテンプレートデータとして引き渡す。
/// 宛先は注文の `email` フィールドから取る。
pub async fn handle_order_placed(
    State(state): State<Arc<NotificationState>>,
    Json(payload): Json<Value>,
) -> Result<Json<DispatchReceipt>, IntegrationError> {
    let order = payload.as_object().ok_or_else(|| {
        IntegrationError::BadRequest(
            "order.placed イベントのペイロードがオブジェクトではありません".to_string(),
        )
    })?;
    let email = order
        .get("email")
        .and_then(Value::as_str)
        .filter(|email| !email.is_empty())
        .ok_or_else(|| {
            IntegrationError::BadRequest("order.placed イベントに email がありません".to_string())
        })?;

    let request = NotificationRequest {
        to: email.to_string(),
        template: NotificationTemplate::OrderPlaced,
        data: order.clone(),
    };

    let receipt = state
        .notifications
        .send_notification("order.placed", &request)
        .await?;
    Ok(Json(receipt))
}
