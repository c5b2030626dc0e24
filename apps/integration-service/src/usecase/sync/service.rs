//! # コンテンツ同期サービス
//!
//! 商品レコードをコンテンツストアのドキュメントへ鏡映するユースケース。
//!
//! ## 設計方針
//!
//! - **存在チェックが分岐の唯一の根拠**: ローカルに「同期済み ID」のキャッシュを
//!   持たず、常にストアへの問い合わせ結果で create / update を分岐する。
//!   往復が 1 回増える代わりに、ローカル状態のずれに強い
//! - **存在チェック失敗はエラー**: 通信・認証エラーを「不在」として扱わない
//!   （重複ドキュメント作成の防止）
//! - **書き込みは意図と結果をログに残す**: 運用時の失敗をホストプロセスを
//!   落とさずに追跡できるようにする（伝播の判断は呼び出し側が行う）

use std::{collections::HashMap, str::FromStr, sync::Arc};

use serde_json::Value;
use shopflow_domain::{
    product::ProductRecord,
    sync::{CreateOptions, SyncDocumentType},
};
use shopflow_infra::ContentStore;
use shopflow_shared::{event_log::event, log_business_event};
use strum::IntoEnumIterator;

use super::transform;
use crate::{config::ContentStoreConfig, error::IntegrationError};

/// スタジオリンク生成のオプション
#[derive(Debug, Clone, Copy, Default)]
pub struct StudioLinkOptions {
    /// true の場合、渡された型名をそのまま URL に使用する
    /// （false の場合は型マップで解決する）
    pub explicit_type: bool,
}

/// コンテンツ同期サービス
///
/// 型マップ（ドキュメント種別 → ストア側の型名）とスタジオ URL を
/// 構築時に確定し、以降は不変として扱う。
pub struct ContentSyncService {
    store:      Arc<dyn ContentStore>,
    type_map:   HashMap<SyncDocumentType, String>,
    studio_url: Option<String>,
}

impl ContentSyncService {
    /// 新しい同期サービスを作成
    ///
    /// 型マップは既定マップ（各種別の snake_case 名）にオプションの上書きを
    /// キー単位でマージして構築する（後勝ち）。
    pub fn new(store: Arc<dyn ContentStore>, options: &ContentStoreConfig) -> Self {
        let mut type_map: HashMap<SyncDocumentType, String> = SyncDocumentType::iter()
            .map(|doc_type| (doc_type, doc_type.to_string()))
            .collect();
        type_map.extend(options.type_map.clone());

        Self {
            store,
            type_map,
            studio_url: options.studio_url.clone(),
        }
    }

    /// 種別に対応するストア側の型名を返す
    fn type_name(&self, doc_type: SyncDocumentType) -> String {
        // 既定マップが全バリアントを網羅しているため get は常に成功するが、
        // フォールバックとして種別自身のワイヤ名を返す
        self.type_map
            .get(&doc_type)
            .cloned()
            .unwrap_or_else(|| doc_type.to_string())
    }

    /// 種別ごとの作成変換を適用する
    fn transform_for_create(&self, doc_type: SyncDocumentType, product: &ProductRecord) -> Value {
        match doc_type {
            SyncDocumentType::Product => {
                transform::product_for_create(product, &self.type_name(doc_type))
            }
        }
    }

    /// 種別ごとの更新変換を適用する
    fn transform_for_update(
        &self,
        doc_type: SyncDocumentType,
        product: &ProductRecord,
    ) -> serde_json::Map<String, Value> {
        match doc_type {
            SyncDocumentType::Product => transform::product_for_update(product),
        }
    }

    /// ドキュメントを upsert する（存在すれば更新、なければ作成）
    ///
    /// 存在チェックと書き込みの間は同一 ID の並行 upsert と直列化されない。
    /// イベント駆動の低頻度トリガー前提で許容している競合点。
    #[tracing::instrument(skip_all, fields(%doc_type, id = %product.id))]
    pub async fn upsert(
        &self,
        doc_type: SyncDocumentType,
        product: &ProductRecord,
    ) -> Result<Value, IntegrationError> {
        tracing::info!("ドキュメントの存在を確認します");
        let existing = self.store.get_document(&product.id).await?;

        if existing.is_some() {
            tracing::info!("ドキュメントが存在するため更新します");
            return self.update(doc_type, product).await;
        }

        tracing::info!("ドキュメントが存在しないため作成します");
        self.create(doc_type, product, CreateOptions::default())
            .await
    }

    /// ドキュメントを作成する
    ///
    /// 対象 ID が既に使用されている場合はストア側の一意性制約で失敗する
    /// （upsert が事前チェックしていても、最終的なガードはストア側）。
    #[tracing::instrument(skip_all, fields(%doc_type, id = %product.id))]
    pub async fn create(
        &self,
        doc_type: SyncDocumentType,
        product: &ProductRecord,
        options: CreateOptions,
    ) -> Result<Value, IntegrationError> {
        tracing::info!("ドキュメントを作成します");
        let doc = self.transform_for_create(doc_type, product);
        tracing::debug!(doc = %doc, "作成ドキュメントの変換結果");

        match self.store.create(&doc, options).await {
            Ok(created) => {
                log_business_event!(
                    event.category = event::category::SYNC,
                    event.action = event::action::DOCUMENT_CREATED,
                    event.entity_type = event::entity_type::CONTENT_DOCUMENT,
                    event.entity_id = %product.id,
                    event.result = event::result::SUCCESS,
                    "ドキュメントを作成しました"
                );
                Ok(created)
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::SYNC,
                    event.action = event::action::DOCUMENT_CREATED,
                    event.entity_type = event::entity_type::CONTENT_DOCUMENT,
                    event.entity_id = %product.id,
                    event.result = event::result::FAILURE,
                    error = %e,
                    "ドキュメントの作成に失敗しました"
                );
                Err(e.into())
            }
        }
    }

    /// ドキュメントを更新する
    ///
    /// ドメイン由来のフィールドのみを set パッチで適用する。
    /// 対象が存在しない場合はストアのエラーが伝播する。
    #[tracing::instrument(skip_all, fields(%doc_type, id = %product.id))]
    pub async fn update(
        &self,
        doc_type: SyncDocumentType,
        product: &ProductRecord,
    ) -> Result<Value, IntegrationError> {
        tracing::info!("ドキュメントを更新します");
        let set = self.transform_for_update(doc_type, product);
        let set_patch = Value::Object(set.clone());
        tracing::debug!(set = %set_patch, "更新パッチの変換結果");

        match self.store.patch(&product.id, &set).await {
            Ok(updated) => {
                log_business_event!(
                    event.category = event::category::SYNC,
                    event.action = event::action::DOCUMENT_UPDATED,
                    event.entity_type = event::entity_type::CONTENT_DOCUMENT,
                    event.entity_id = %product.id,
                    event.result = event::result::SUCCESS,
                    "ドキュメントを更新しました"
                );
                Ok(updated)
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::SYNC,
                    event.action = event::action::DOCUMENT_UPDATED,
                    event.entity_type = event::entity_type::CONTENT_DOCUMENT,
                    event.entity_id = %product.id,
                    event.result = event::result::FAILURE,
                    error = %e,
                    "ドキュメントの更新に失敗しました"
                );
                Err(e.into())
            }
        }
    }

    /// ドキュメントを取得する
    pub async fn retrieve(&self, id: &str) -> Result<Option<Value>, IntegrationError> {
        Ok(self.store.get_document(id).await?)
    }

    /// ドキュメントを削除する
    ///
    /// 存在しない ID への削除はストアのエラーをそのまま伝播する。
    #[tracing::instrument(skip_all, fields(%id))]
    pub async fn delete(&self, id: &str) -> Result<(), IntegrationError> {
        tracing::info!("ドキュメントを削除します");
        match self.store.delete(id).await {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::SYNC,
                    event.action = event::action::DOCUMENT_DELETED,
                    event.entity_type = event::entity_type::CONTENT_DOCUMENT,
                    event.entity_id = %id,
                    event.result = event::result::SUCCESS,
                    "ドキュメントを削除しました"
                );
                Ok(())
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::SYNC,
                    event.action = event::action::DOCUMENT_DELETED,
                    event.entity_type = event::entity_type::CONTENT_DOCUMENT,
                    event.entity_id = %id,
                    event.result = event::result::FAILURE,
                    error = %e,
                    "ドキュメントの削除に失敗しました"
                );
                Err(e.into())
            }
        }
    }

    /// 複数ドキュメントを取得する
    ///
    /// ストア固有の `_id` フィールドを `id` として正規化する
    /// （元の `_id` も保持される）。順序はストアの返却順を保つ。
    pub async fn list(&self, ids: &[String]) -> Result<Vec<Value>, IntegrationError> {
        let documents = self.store.get_documents(ids).await?;
        Ok(documents.into_iter().map(normalize_id).collect())
    }

    /// スタジオ（管理画面）のドキュメント編集リンクを生成する
    ///
    /// `explicit_type` が有効な場合は渡された型名をそのまま使用し、
    /// 無効な場合は型マップで解決する。スタジオ URL が未設定の場合は
    /// 設定エラーとなる。
    pub fn studio_link(
        &self,
        doc_type: &str,
        id: &str,
        options: StudioLinkOptions,
    ) -> Result<String, IntegrationError> {
        let studio_url = self.studio_url.as_deref().ok_or_else(|| {
            IntegrationError::Configuration("スタジオ URL が設定されていません".to_string())
        })?;

        let resolved = if options.explicit_type {
            doc_type.to_string()
        } else {
            let parsed = SyncDocumentType::from_str(doc_type).map_err(|_| {
                IntegrationError::BadRequest(format!("未知のドキュメント種別: {doc_type}"))
            })?;
            self.type_name(parsed)
        };

        Ok(format!("{studio_url}/structure/{resolved};{id}"))
    }
}

/// ストア固有の `_id` を `id` として複製する
fn normalize_id(mut doc: Value) -> Value {
    if let Some(id) = doc.get("_id").cloned() {
        if let Some(map) = doc.as_object_mut() {
            map.insert("id".to_string(), id);
        }
    }
    doc
}
