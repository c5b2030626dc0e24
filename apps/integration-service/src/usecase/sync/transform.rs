//! # 商品レコードの変換
//!
//! ホスト側の商品レコードをコンテンツストアのドキュメント形状へ写す純粋関数。
//!
//! ## 設計方針
//!
//! - **決定的**: 同じレコードからは常に構造的に等しい出力を生成する
//!   （乱数・タイムスタンプを含まない）
//! - **ストア専用フィールドは作成時のみ**: 更新パッチにはドメイン由来の
//!   フィールドだけを含め、ストア側で編集されるフィールドを上書きしない

use serde_json::{Map, Value, json};
use shopflow_domain::product::ProductRecord;

/// ローカライズ対象のロケール。`en` のみドメイン値を投影し、他は空文字で初期化する
const LOCALES: [&str; 3] = ["en", "pl", "fr"];

/// ロケールごとのマップを生成する（`en` に値、他ロケールは空文字）
fn localized(en_value: &str) -> Value {
    let mut map = Map::new();
    for locale in LOCALES {
        let value = if locale == "en" { en_value } else { "" };
        map.insert(locale.to_string(), Value::String(value.to_string()));
    }
    Value::Object(map)
}

/// 商品レコードから作成ドキュメントを生成する
///
/// ドキュメント ID にはホスト側の商品 ID をそのまま使用する
/// （共有 ID によるシステム間同一性が存在チェックの前提）。
/// ストア側でのみ編集されるフィールドは作成時に一度だけ初期化され、
/// 以降の同期では触れられない。
pub fn product_for_create(product: &ProductRecord, type_name: &str) -> Value {
    let description = product.description.clone().unwrap_or_default();
    json!({
        "_type": type_name,
        "_id": product.id,
        "medusaId": product.id,
        "title": product.title,
        "description": description,
        "localizedTitles": localized(&product.title),
        "localizedDescriptions": localized(&description),
        "localizedShortDescriptions": localized(""),
        // 以下はストア専用フィールド。初期値のみ与える
        "materials": localized(""),
        "colors": localized(""),
        "brand": "",
        "productionYear": null,
        "specs": [{
            "_key": product.id,
            "_type": "spec",
            "title": product.title,
            "lang": "en",
        }],
    })
}

/// 商品レコードから更新パッチを生成する
///
/// ドメイン由来のフィールドのみを含む。説明がホスト側に無い場合、
/// キー自体を省略する（空文字で上書きするとストア側で編集された
/// 内容を消してしまうため）。
pub fn product_for_update(product: &ProductRecord) -> Map<String, Value> {
    let mut set = Map::new();
    set.insert("title".to_string(), json!(product.title));
    set.insert("medusaId".to_string(), json!(product.id));
    set.insert("localizedTitles.en".to_string(), json!(product.title));

    if let Some(description) = &product.description {
        set.insert("description".to_string(), json!(description));
        set.insert("localizedDescriptions.en".to_string(), json!(description));
    }

    set
}
