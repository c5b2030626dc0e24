//! # ShopFlow ドメインモデル
//!
//! 外部システム連携（コンテンツ同期・メール通知）のドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **I/O を持たない**: このクレートは純粋なデータ型と変換ロジックのみ
//! - **ホストプラットフォームのレコードは読み取り専用**: [`product::ProductRecord`] は
//!   ホスト側で生成され、このレイヤーは参照するだけで変更しない
//! - **閉じた enum**: 同期ドキュメント種別・通知テンプレートは enum で表現し、
//!   既知バリアントの網羅性をコンパイル時に保証する

pub mod notification;
pub mod product;
pub mod sync;
