//! # 通知ユースケース
//!
//! ホストプラットフォームのイベントに伴うメール通知の生成・送信を統合する。
//!
//! ## モジュール構成
//!
//! - [`template_renderer`] - tera テンプレートエンジンによるメール生成
//! - [`service`] - 有効化ゲート + テンプレート照合 + 送信の統合サービス

pub mod service;
pub mod template_renderer;

pub use service::NotificationService;
pub use template_renderer::TemplateRenderer;
