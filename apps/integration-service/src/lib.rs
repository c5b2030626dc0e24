//! # Integration Service ライブラリ
//!
//! e コマースプラットフォームと外部サービス（コンテンツストア・
//! メールプロバイダ）をつなぐ統合サービス。
//!
//! ## 役割
//!
//! - **コンテンツ同期**: 商品イベントを受けてコンテンツストアのドキュメントを
//!   作成・更新・削除する
//! - **通知ディスパッチ**: 注文・招待・パスワードリセットのイベントを受けて
//!   テンプレートメールを送信する

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
