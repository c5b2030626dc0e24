//! # テスト用モック
//!
//! ユースケーステストで使用するインメモリのコンテンツストア・メール送信モック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! shopflow-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::HashMap,
    sync::{
        Arc,
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use serde_json::Value;
use shopflow_domain::{
    notification::{NotificationError, OutboundEmail, SendReceipt},
    sync::CreateOptions,
};

use crate::{content_store::ContentStore, error::InfraError, mailer::MailSender};

// ===== MockContentStore =====

/// インメモリのコンテンツストアモック
///
/// ドキュメントを `HashMap` に保持し、各操作の対象 ID を記録する。
/// `fail_gets` を立てると取得系が通信エラーを返す（存在チェック失敗経路のテスト用）。
#[derive(Clone, Default)]
pub struct MockContentStore {
    documents:   Arc<Mutex<HashMap<String, Value>>>,
    created_ids: Arc<Mutex<Vec<String>>>,
    patched_ids: Arc<Mutex<Vec<String>>>,
    deleted_ids: Arc<Mutex<Vec<String>>>,
    fail_gets:   Arc<AtomicBool>,
}

impl MockContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// ドキュメントを直接シードする（操作記録には残らない）
    pub fn seed_document(&self, doc: Value) {
        let id = doc
            .get("_id")
            .and_then(Value::as_str)
            .expect("シードするドキュメントには _id が必要")
            .to_string();
        self.documents.lock().unwrap().insert(id, doc);
    }

    /// 保持中のドキュメントを取得する
    pub fn document(&self, id: &str) -> Option<Value> {
        self.documents.lock().unwrap().get(id).cloned()
    }

    /// create が呼ばれた ID のリスト
    pub fn created_ids(&self) -> Vec<String> {
        self.created_ids.lock().unwrap().clone()
    }

    /// patch が呼ばれた ID のリスト
    pub fn patched_ids(&self) -> Vec<String> {
        self.patched_ids.lock().unwrap().clone()
    }

    /// delete が呼ばれた ID のリスト
    pub fn deleted_ids(&self) -> Vec<String> {
        self.deleted_ids.lock().unwrap().clone()
    }

    /// 取得系の呼び出しを通信エラーで失敗させる
    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }
}

/// ドット区切りパスの set 操作を 1 件適用する
///
/// 中間オブジェクトが存在しない場合は作成する。
fn apply_set(doc: &mut Value, path: &str, value: Value) {
    if !doc.is_object() {
        *doc = Value::Object(serde_json::Map::new());
    }
    let map = doc.as_object_mut().expect("直前でオブジェクト化している");

    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
            apply_set(child, rest, value);
        }
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    async fn get_document(&self, id: &str) -> Result<Option<Value>, InfraError> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(InfraError::content_store("接続失敗（テスト用）"));
        }
        Ok(self.documents.lock().unwrap().get(id).cloned())
    }

    async fn get_documents(&self, ids: &[String]) -> Result<Vec<Value>, InfraError> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(InfraError::content_store("接続失敗（テスト用）"));
        }
        let documents = self.documents.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| documents.get(id).cloned())
            .collect())
    }

    async fn create(&self, doc: &Value, _options: CreateOptions) -> Result<Value, InfraError> {
        let id = doc
            .get("_id")
            .and_then(Value::as_str)
            .ok_or_else(|| InfraError::unexpected("作成ドキュメントに _id がありません"))?
            .to_string();

        let mut documents = self.documents.lock().unwrap();
        if documents.contains_key(&id) {
            return Err(InfraError::document_exists(id));
        }
        documents.insert(id.clone(), doc.clone());
        self.created_ids.lock().unwrap().push(id);
        Ok(doc.clone())
    }

    async fn patch(
        &self,
        id: &str,
        set: &serde_json::Map<String, Value>,
    ) -> Result<Value, InfraError> {
        let mut documents = self.documents.lock().unwrap();
        let doc = documents
            .get_mut(id)
            .ok_or_else(|| InfraError::document_not_found(id))?;

        for (path, value) in set {
            apply_set(doc, path, value.clone());
        }
        let patched = doc.clone();
        self.patched_ids.lock().unwrap().push(id.to_string());
        Ok(patched)
    }

    async fn delete(&self, id: &str) -> Result<(), InfraError> {
        let mut documents = self.documents.lock().unwrap();
        if documents.remove(id).is_none() {
            return Err(InfraError::document_not_found(id));
        }
        self.deleted_ids.lock().unwrap().push(id.to_string());
        Ok(())
    }
}

// ===== MockMailSender =====

/// メール送信モック
///
/// 送信された [`OutboundEmail`] を記録する。`fail_with` を設定すると
/// プロバイダエラーを返す（送信失敗経路のテスト用）。
#[derive(Clone, Default)]
pub struct MockMailSender {
    sent:      Arc<Mutex<Vec<OutboundEmail>>>,
    fail_with: Arc<Mutex<Option<String>>>,
}

impl MockMailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 送信されたメールのリスト
    pub fn sent_emails(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// 以降の送信をプロバイダエラーで失敗させる
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.fail_with.lock().unwrap() = Some(message.into());
    }
}

#[async_trait]
impl MailSender for MockMailSender {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, NotificationError> {
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(NotificationError::Provider(message));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(SendReceipt {
            id: Some(format!("mock_{}", uuid::Uuid::new_v4())),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn createは既存idに対してdocument_existsを返す() {
        let store = MockContentStore::new();
        store.seed_document(json!({"_id": "p1", "title": "Chair"}));

        let result = store
            .create(&json!({"_id": "p1", "title": "Chair"}), CreateOptions::default())
            .await;

        assert!(matches!(
            result.unwrap_err().kind(),
            crate::error::InfraErrorKind::DocumentExists { id } if id == "p1"
        ));
    }

    #[tokio::test]
    async fn patchはドット区切りパスをネストとして適用する() {
        let store = MockContentStore::new();
        store.seed_document(json!({
            "_id": "p1",
            "title": "Chair",
            "localizedTitles": {"en": "Chair", "pl": "", "fr": ""}
        }));

        let mut set = serde_json::Map::new();
        set.insert("title".to_string(), json!("Oak Chair"));
        set.insert("localizedTitles.en".to_string(), json!("Oak Chair"));
        store.patch("p1", &set).await.unwrap();

        assert_eq!(
            store.document("p1").unwrap(),
            json!({
                "_id": "p1",
                "title": "Oak Chair",
                "localizedTitles": {"en": "Oak Chair", "pl": "", "fr": ""}
            })
        );
    }

    #[tokio::test]
    async fn patchは存在しないidに対してdocument_not_foundを返す() {
        let store = MockContentStore::new();
        let result = store.patch("missing", &serde_json::Map::new()).await;

        assert!(matches!(
            result.unwrap_err().kind(),
            crate::error::InfraErrorKind::DocumentNotFound { id } if id == "missing"
        ));
    }

    #[tokio::test]
    async fn get_documentsは要求順でドキュメントを返す() {
        let store = MockContentStore::new();
        store.seed_document(json!({"_id": "p2", "title": "Table"}));
        store.seed_document(json!({"_id": "p1", "title": "Chair"}));

        let docs = store
            .get_documents(&["p1".to_string(), "p2".to_string()])
            .await
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["_id"], "p1");
        assert_eq!(docs[1]["_id"], "p2");
    }

    #[tokio::test]
    async fn fail_getsで取得系がエラーになる() {
        let store = MockContentStore::new();
        store.fail_gets(true);

        assert!(store.get_document("p1").await.is_err());
        assert!(store.get_documents(&["p1".to_string()]).await.is_err());
    }

    #[tokio::test]
    async fn mock_mail_senderが送信メールを記録する() {
        let sender = MockMailSender::new();
        let email = OutboundEmail {
            from:      "noreply@example.com".to_string(),
            reply_to:  None,
            to:        vec!["a@b.com".to_string()],
            subject:   "テスト".to_string(),
            html_body: "<p>x</p>".to_string(),
            text_body: "x".to_string(),
        };

        let receipt = sender.send(&email).await.unwrap();
        assert!(receipt.id.is_some());

        let sent = sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["a@b.com".to_string()]);
    }

    #[tokio::test]
    async fn fail_withでプロバイダエラーを返す() {
        let sender = MockMailSender::new();
        sender.fail_with("rate limited");

        let email = OutboundEmail {
            from:      "noreply@example.com".to_string(),
            reply_to:  None,
            to:        vec!["a@b.com".to_string()],
            subject:   "テスト".to_string(),
            html_body: String::new(),
            text_body: String::new(),
        };

        let result = sender.send(&email).await;
        assert!(matches!(
            result.unwrap_err(),
            NotificationError::Provider(msg) if msg == "rate limited"
        ));
        assert!(sender.sent_emails().is_empty());
    }
}
