//! # ShopFlow インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! このクレートは外部コラボレータ（コンテンツストア・メールプロバイダ）への
//! アダプタを trait で抽象化して提供する。外部システムの詳細をカプセル化し、
//! ユースケース層をインフラの変更から保護する。
//!
//! ## 責務
//!
//! - **コンテンツストアクライアント**: ドキュメント CRUD の HTTP アダプタ
//! - **メール送信**: プロバイダ API / SMTP / Noop の送信バックエンド
//! - **テストユーティリティ**: インメモリモック（`test-utils` feature）
//!
//! ## 依存関係
//!
//! ```text
//! app → infra → domain
//!    ↘      ↘
//!      shared
//! ```
//!
//! インフラ層は `domain` に依存する。ドメイン層はインフラ層に依存しない
//! （依存性逆転の原則）。

pub mod content_store;
pub mod error;
pub mod mailer;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use content_store::{ContentStore, HttpContentStore};
pub use error::InfraError;
pub use mailer::{MailSender, NoopMailSender, ResendMailSender, SmtpMailSender};
