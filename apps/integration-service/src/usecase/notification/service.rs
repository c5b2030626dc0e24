//! # 通知ディスパッチサービス
//!
//! テンプレート選択 → レンダリング → メール送信を統合するサービス。
//!
//! ## 送信リクエストの状態遷移
//!
//! ```text
//! Received ─┬─ (無効化) ──────────────→ Skipped
//!           └─ (有効) ─┬─ (未知テンプレート) → Unmatched
//!                      └─ Render → Send ──→ Sent | Failed
//! ```
//!
//! ## 設計方針
//!
//! - **無効化ゲート**: 通知無効時は外部メールクライアントに一切触れず
//!   [`SendOutcome::Skipped`] を返す（通知を配線したまま消音してデプロイできる）
//! - **未知テンプレートはエラーにしない**: 新旧イベント発行元との前方互換のため
//!   [`SendOutcome::Unmatched`] を返す
//! - **送信失敗を握り潰さない**: 有効時の送信失敗は宛先・件名つきでログに残し、
//!   分類済みエラーとして再送出する

use std::sync::Arc;

use shopflow_domain::notification::{
    DispatchReceipt,
    NotificationError,
    NotificationRequest,
    OutboundEmail,
    RenderedEmail,
    SendOutcome,
    SendReceipt,
};
use shopflow_infra::MailSender;
use shopflow_shared::{event_log::event, log_business_event};

use super::TemplateRenderer;
use crate::config::MailConfig;

/// 通知ディスパッチサービス
///
/// 送信元・既定宛先・有効化フラグは構築時に確定し、以降は不変として扱う。
pub struct NotificationService {
    sender:             Arc<dyn MailSender>,
    renderer:           TemplateRenderer,
    from_address:       String,
    reply_to_address:   Option<String>,
    default_to_address: String,
    emails_enabled:     bool,
}

impl NotificationService {
    pub fn new(
        sender: Arc<dyn MailSender>,
        renderer: TemplateRenderer,
        options: &MailConfig,
    ) -> Self {
        Self {
            sender,
            renderer,
            from_address: options.from_address.clone(),
            reply_to_address: options.reply_to_address.clone(),
            default_to_address: options.default_to_address.clone(),
            emails_enabled: options.emails_enabled,
        }
    }

    /// 通知リクエストを処理する
    ///
    /// 無効化ゲート → テンプレート照合 → レンダリング → 送信の順に進み、
    /// タグ付きの [`SendOutcome`] を返す。
    #[tracing::instrument(skip_all, fields(template = %request.template, to = %request.to))]
    pub async fn send(
        &self,
        request: &NotificationRequest,
    ) -> Result<SendOutcome, NotificationError> {
        if !self.emails_enabled {
            tracing::info!("通知が無効化されているため送信をスキップします");
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SKIPPED,
                event.entity_type = event::entity_type::NOTIFICATION,
                event.result = event::result::SUCCESS,
                notification.template = %request.template,
                notification.recipient = %request.to,
                "通知無効化によるスキップ"
            );
            return Ok(SendOutcome::Skipped);
        }

        let Some(rendered) = self.renderer.render(request)? else {
            tracing::warn!("未対応のテンプレート識別子のため何もしません");
            return Ok(SendOutcome::Unmatched);
        };

        let receipt = self.send_mail(&rendered, Some(&request.to)).await?;
        Ok(SendOutcome::Sent { receipt })
    }

    /// レンダリング済みメールを送信する
    ///
    /// 宛先は `to_override` があればそれを、なければ構築時の既定宛先を使う。
    /// プロバイダ失敗時は宛先・件名つきでログに残し、分類済みエラーを再送出する。
    pub async fn send_mail(
        &self,
        rendered: &RenderedEmail,
        to_override: Option<&str>,
    ) -> Result<SendReceipt, NotificationError> {
        let to = to_override.unwrap_or(&self.default_to_address).to_string();
        let email = OutboundEmail {
            from:      self.from_address.clone(),
            reply_to:  self.reply_to_address.clone(),
            to:        vec![to.clone()],
            subject:   rendered.subject.clone(),
            html_body: rendered.html_body.clone(),
            text_body: rendered.text_body.clone(),
        };

        match self.sender.send(&email).await {
            Ok(receipt) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.entity_type = event::entity_type::NOTIFICATION,
                    event.result = event::result::SUCCESS,
                    notification.recipient = %to,
                    notification.subject = %rendered.subject,
                    "通知メール送信成功"
                );
                Ok(receipt)
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.entity_type = event::entity_type::NOTIFICATION,
                    event.result = event::result::FAILURE,
                    notification.recipient = %to,
                    notification.subject = %rendered.subject,
                    error = %e,
                    "通知メール送信失敗"
                );
                Err(e)
            }
        }
    }

    /// ホストイベントシステム向けのエンベロープで通知を処理する
    ///
    /// [`send`](Self::send) の結果を `{to, status: "done", data}` 形式に包む。
    /// `send` のエラーはここでは捕捉せず、ホスト側のリトライ・アラート機構に
    /// 委ねる。
    pub async fn send_notification(
        &self,
        event: &str,
        request: &NotificationRequest,
    ) -> Result<DispatchReceipt, NotificationError> {
        tracing::info!(event = %event, template = %request.template, "通知イベントを処理します");
        let outcome = self.send(request).await?;
        Ok(DispatchReceipt::done(request.to.clone(), outcome.to_data()))
    }
}
