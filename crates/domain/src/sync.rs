//! # コンテンツ同期ドメインモデル
//!
//! 商品レコードをコンテンツストアのドキュメントへ鏡映するための型を定義する。
//!
//! ## 設計方針
//!
//! - **閉じた enum による種別管理**: [`SyncDocumentType`] の各バリアントには
//!   作成変換・更新変換がちょうど 1 つずつ対応する。変換の対応付けは
//!   網羅的 `match` で行うため、未登録種別はコンパイル時に存在し得ない
//! - **ドキュメントは JSON 値**: コンテンツストアはスキーマレスであり、
//!   ドキュメントと更新パッチは `serde_json` の値として扱う

use serde::{Deserialize, Serialize};

/// 同期対象のドキュメント種別
///
/// どの変換規則を適用するかを識別するタグ。ワイヤ表現は snake_case
/// （`"product"`）で、型マップのキーとしても使用される。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SyncDocumentType {
    /// 商品（ホストプラットフォームの Product レコード）
    Product,
}

/// ドキュメント作成時のオプション
///
/// コンテンツストアの作成ミューテーションにそのまま引き渡される。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// 配列要素のキーをストア側で自動採番する
    pub auto_generate_array_keys: bool,
}
