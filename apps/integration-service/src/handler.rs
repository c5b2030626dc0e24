//! # イベントハンドラ層
//!
//! ホストプラットフォームのイベントディスパッチャから呼び出される
//! Webhook ハンドラを定義する。
//!
//! ## 設計方針
//!
//! - **薄いハンドラ**: ペイロードの検証と通知リクエストの組み立てのみを行い、
//!   ロジックはユースケースに委譲する
//! - **fail fast**: 必須フィールドや必須設定の欠落は即座にエラーを返し、
//!   ホスト側のリトライ・デッドレター機構に委ねる

pub mod document;
pub mod health;
pub mod invite;
pub mod order;
pub mod password_reset;
pub mod product;

pub use document::{get_document, get_studio_link, list_documents};
pub use health::health_check;
pub use invite::handle_invite_created;
pub use order::handle_order_placed;
pub use password_reset::handle_password_reset;
pub use product::{handle_product_deleted, handle_product_upserted};

use crate::usecase::{ContentSyncService, NotificationService};

/// 同期系ハンドラの共有状態
pub struct SyncState {
    pub sync: ContentSyncService,
}

/// 通知系ハンドラの共有状態
pub struct NotificationState {
    pub notifications: NotificationService,
    /// 管理者招待 URL のプレフィックス（招待イベント処理時に必須）
    pub admin_invite_url_prefix: Option<String>,
    /// 招待件名に使用する組織名
    pub company_name: Option<String>,
}
