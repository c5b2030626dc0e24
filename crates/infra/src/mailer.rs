//! # メール送信
//!
//! トランザクショナルメールの送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: [`MailSender`] trait でメール送信を抽象化
//! - **3 つの実装**: プロバイダ API（本番用）、SMTP（Mailpit 開発用）、Noop（テスト用）
//! - **環境変数切替**: `MAIL_BACKEND` でランタイム選択
//! - **失敗を握り潰さない**: プロバイダのエラーペイロードは分類して再送出する

mod noop;
mod resend;
mod smtp;

use async_trait::async_trait;
pub use noop::NoopMailSender;
pub use resend::ResendMailSender;
use shopflow_domain::notification::{NotificationError, OutboundEmail, SendReceipt};
pub use smtp::SmtpMailSender;

/// メール送信トレイト
///
/// 通知基盤の中核。メール送信の具体的な方法を抽象化する。
/// プロバイダ API / SMTP / Noop の 3 実装を環境変数で切り替える。
#[async_trait]
pub trait MailSender: Send + Sync {
    /// メールを送信し、プロバイダのレシートを返す
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, NotificationError>;
}
