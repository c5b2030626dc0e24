//! # 商品レコード
//!
//! ホストプラットフォームから受け取る商品データを定義する。

use serde::{Deserialize, Serialize};

/// 商品レコード
///
/// ホストプラットフォームのイベントペイロードから取り込む最小限の商品情報。
/// `id` はホスト側で採番された安定な一意識別子で、コンテンツストア側の
/// ドキュメント ID としてそのまま使用される（共有 ID によるシステム間同一性）。
///
/// ペイロードに含まれる未知のフィールドは無視する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// ホスト側の一意識別子
    pub id: String,
    /// 商品タイトル
    pub title: String,
    /// 商品説明（ホスト側で未設定の場合は None）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptionなしのペイロードをデシリアライズできる() {
        let record: ProductRecord =
            serde_json::from_str(r#"{"id": "p1", "title": "Chair"}"#).unwrap();

        assert_eq!(record.id, "p1");
        assert_eq!(record.title, "Chair");
        assert!(record.description.is_none());
    }

    #[test]
    fn 未知フィールドを含むペイロードをデシリアライズできる() {
        let record: ProductRecord = serde_json::from_str(
            r#"{"id": "p1", "title": "Chair", "handle": "chair", "status": "published"}"#,
        )
        .unwrap();

        assert_eq!(record.id, "p1");
    }
}
