//! # ユースケース層
//!
//! Integration Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: 外部クライアントを `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約
//!
//! ## モジュール構成
//!
//! - [`sync`]: コンテンツストアへのドキュメント同期
//! - [`notification`]: 通知テンプレートのレンダリングとメール送信

pub mod notification;
pub mod sync;

pub use notification::{NotificationService, TemplateRenderer};
pub use sync::{ContentSyncService, StudioLinkOptions};
