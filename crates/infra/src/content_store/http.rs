//! HTTP コンテンツストア実装
//!
//! コンテンツストアのデータ API（ドキュメント取得 + ミューテーション）を
//! reqwest で呼び出す。認証は Bearer トークン。
//!
//! - 取得: `GET {endpoint}/v{api_version}/data/doc/{dataset}/{ids}`
//! - 書込: `POST {endpoint}/v{api_version}/data/mutate/{dataset}`
//!   （create / patch / delete をミューテーション封筒で送る）

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use shopflow_domain::sync::CreateOptions;

use super::ContentStore;
use crate::error::InfraError;

/// HTTP コンテンツストアクライアント
///
/// `reqwest::Client` をラップし、ストアのデータ API と通信する。
pub struct HttpContentStore {
    client:   reqwest::Client,
    base_url: String,
    dataset:  String,
    token:    String,
}

impl HttpContentStore {
    /// 新しい HTTP クライアントインスタンスを作成
    ///
    /// # 引数
    ///
    /// - `endpoint`: ストア API のベース URL（例: `https://store.example.com`）
    /// - `api_version`: データ API のバージョン（例: `"2024-07-01"`）
    /// - `dataset`: 対象データセット名（例: `"production"`）
    /// - `api_token`: Bearer 認証トークン
    pub fn new(
        endpoint: &str,
        api_version: &str,
        dataset: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            client:   reqwest::Client::new(),
            base_url: format!("{}/v{}", endpoint.trim_end_matches('/'), api_version),
            dataset:  dataset.into(),
            token:    api_token.into(),
        }
    }

    fn doc_url(&self, ids: &str) -> String {
        format!("{}/data/doc/{}/{}", self.base_url, self.dataset, ids)
    }

    fn mutate_url(&self) -> String {
        format!("{}/data/mutate/{}", self.base_url, self.dataset)
    }

    /// ミューテーション封筒を送信し、結果リストを返す
    async fn mutate(
        &self,
        mutations: Value,
        options: &[(&str, &str)],
    ) -> Result<reqwest::Response, InfraError> {
        let response = self
            .client
            .post(self.mutate_url())
            .bearer_auth(&self.token)
            .query(options)
            .json(&json!({ "mutations": mutations }))
            .send()
            .await?;
        Ok(response)
    }
}

/// ドキュメント取得 API のレスポンス
#[derive(Debug, Deserialize)]
struct DocResponse {
    #[serde(default)]
    documents: Vec<Value>,
}

/// ミューテーション API のレスポンス
#[derive(Debug, Deserialize)]
struct MutateResponse {
    #[serde(default)]
    results: Vec<MutateResult>,
}

#[derive(Debug, Deserialize)]
struct MutateResult {
    #[serde(default)]
    document: Option<Value>,
}

/// ストアのエラーペイロード
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    description: String,
}

/// エラーレスポンスからストア側のメッセージを取り出す
async fn read_error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => format!("{status}: {}", envelope.error.description),
        Err(_) => format!("{status}: {body}"),
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn get_document(&self, id: &str) -> Result<Option<Value>, InfraError> {
        let response = self
            .client
            .get(self.doc_url(id))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(InfraError::content_store(read_error_message(response).await));
        }

        let body: DocResponse = response.json().await?;
        Ok(body.documents.into_iter().next())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(count = ids.len()))]
    async fn get_documents(&self, ids: &[String]) -> Result<Vec<Value>, InfraError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(self.doc_url(&ids.join(",")))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(InfraError::content_store(read_error_message(response).await));
        }

        let body: DocResponse = response.json().await?;
        Ok(body.documents)
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn create(&self, doc: &Value, options: CreateOptions) -> Result<Value, InfraError> {
        let doc_id = doc
            .get("_id")
            .and_then(Value::as_str)
            .ok_or_else(|| InfraError::unexpected("作成ドキュメントに _id がありません"))?
            .to_string();

        let mut query: Vec<(&str, &str)> = vec![("returnDocuments", "true")];
        if options.auto_generate_array_keys {
            query.push(("autoGenerateArrayKeys", "true"));
        }

        let response = self.mutate(json!([{ "create": doc }]), &query).await?;

        if response.status() == reqwest::StatusCode::CONFLICT {
            return Err(InfraError::document_exists(doc_id));
        }
        if !response.status().is_success() {
            return Err(InfraError::content_store(read_error_message(response).await));
        }

        let body: MutateResponse = response.json().await?;
        Ok(body
            .results
            .into_iter()
            .next()
            .and_then(|result| result.document)
            .unwrap_or_else(|| doc.clone()))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn patch(
        &self,
        id: &str,
        set: &serde_json::Map<String, Value>,
    ) -> Result<Value, InfraError> {
        let response = self
            .mutate(
                json!([{ "patch": { "id": id, "set": set } }]),
                &[("returnDocuments", "true")],
            )
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::CONFLICT {
            return Err(InfraError::document_not_found(id));
        }
        if !status.is_success() {
            return Err(InfraError::content_store(read_error_message(response).await));
        }

        let body: MutateResponse = response.json().await?;
        body.results
            .into_iter()
            .next()
            .and_then(|result| result.document)
            .ok_or_else(|| InfraError::document_not_found(id))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: &str) -> Result<(), InfraError> {
        let response = self.mutate(json!([{ "delete": { "id": id } }]), &[]).await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(InfraError::document_not_found(id));
        }
        if !status.is_success() {
            return Err(InfraError::content_store(read_error_message(response).await));
        }

        // 削除対象が存在しなかった場合、ストアは空の results を返す
        let body: MutateResponse = response.json().await?;
        if body.results.is_empty() {
            return Err(InfraError::document_not_found(id));
        }

        Ok(())
    }
}
