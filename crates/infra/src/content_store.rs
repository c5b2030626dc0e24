//! # コンテンツストアクライアント
//!
//! 外部コンテンツストア（ヘッドレス CMS）のドキュメント CRUD を抽象化する。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: [`ContentStore`] trait でドキュメント操作を抽象化
//! - **HTTP 実装**: [`HttpContentStore`] が reqwest でストアのデータ API を呼び出す
//! - **存在しない ≠ エラー**: `get_document` は不在を `Ok(None)` で表現し、
//!   通信・認証エラーのみ `Err` とする（呼び出し側の存在チェック分岐が
//!   「不在扱いフォールバック」で汚染されないようにする）

mod http;

use async_trait::async_trait;
pub use http::HttpContentStore;
use serde_json::Value;
use shopflow_domain::sync::CreateOptions;

use crate::error::InfraError;

/// コンテンツストアのドキュメント CRUD トレイト
///
/// ストアのドキュメントは スキーマレスな JSON 値として扱う。
/// `_id` フィールドがストア側のドキュメント ID を表す。
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// ドキュメントを ID で取得する
    ///
    /// 存在しない場合は `Ok(None)`。通信・認証エラーは `Err` として伝播する。
    async fn get_document(&self, id: &str) -> Result<Option<Value>, InfraError>;

    /// 複数ドキュメントを ID リストで取得する
    ///
    /// 返り値はストアが返した順序を保持する。
    async fn get_documents(&self, ids: &[String]) -> Result<Vec<Value>, InfraError>;

    /// ドキュメントを作成する
    ///
    /// `_id` が既に使用されている場合は
    /// [`InfraErrorKind::DocumentExists`](crate::error::InfraErrorKind::DocumentExists)
    /// で失敗する。
    async fn create(&self, doc: &Value, options: CreateOptions) -> Result<Value, InfraError>;

    /// ドキュメントへ set パッチを適用する
    ///
    /// `set` のキーはドット区切りのネストパス（例: `"localizedTitles.en"`）を
    /// 許容し、パッチは原子的に適用される。対象が存在しない場合は
    /// [`InfraErrorKind::DocumentNotFound`](crate::error::InfraErrorKind::DocumentNotFound)
    /// で失敗する。
    async fn patch(
        &self,
        id: &str,
        set: &serde_json::Map<String, Value>,
    ) -> Result<Value, InfraError>;

    /// ドキュメントを削除する
    ///
    /// 存在しない ID への削除はストア側のエラーをそのまま伝播する
    /// （呼び出し側から見た冪等性は保証しない）。
    async fn delete(&self, id: &str) -> Result<(), InfraError>;
}
