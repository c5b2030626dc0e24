//! Noop 送信実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! テスト環境や送信バックエンド未設定時に使用する。

use async_trait::async_trait;
use shopflow_domain::notification::{NotificationError, OutboundEmail, SendReceipt};

use super::MailSender;

/// Noop 送信（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopMailSender;

#[async_trait]
impl MailSender for NoopMailSender {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, NotificationError> {
        tracing::info!(
            to = ?email.to,
            subject = %email.subject,
            "Noop: メール送信をスキップ"
        );
        Ok(SendReceipt { id: None })
    }
}
