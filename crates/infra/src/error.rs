//! # インフラ層エラー定義
//!
//! コンテンツストアや外部サービスとの通信で発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **エラーの変換**: reqwest::Error, serde_json::Error などをラップ
//! - **ドメインエラーとの分離**: インフラ固有のエラーを明示
//! - **SpanTrace 自動捕捉**: `From` 実装や convenience constructor で
//!   エラー生成時の呼び出し経路を自動記録する
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別（ContentStore, DocumentNotFound 等）

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別（[`InfraErrorKind`]）と [`SpanTrace`]（呼び出し経路）を保持する。
/// `From<reqwest::Error>` 等の変換や convenience constructor でエラーを生成すると、
/// その時点のスパン情報が自動的にキャプチャされる。
///
/// ## パターンマッチ
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) を使用する:
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::DocumentNotFound { id } => { /* 404 処理 */ }
///     _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
///
/// コンテンツストア API 呼び出しやメールプロバイダ通信などで発生するエラーの
/// 具体的な種別。アプリ層でこのエラー種別に応じて適切な HTTP レスポンスに変換する。
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// コンテンツストア API エラー
    ///
    /// ストアがエラーペイロードを返した場合。ストア側のメッセージを保持する。
    #[error("コンテンツストア API エラー: {0}")]
    ContentStore(String),

    /// ドキュメントが存在しない
    ///
    /// 更新・削除・取得の対象 ID がストアに存在しなかった場合。
    #[error("ドキュメントが見つかりません: {id}")]
    DocumentNotFound {
        /// 対象ドキュメントの ID
        id: String,
    },

    /// ドキュメントが既に存在する
    ///
    /// 作成ミューテーションの対象 ID が既に使用されている場合。
    /// ストア側の一意性制約が最終的なガードとなる。
    #[error("ドキュメントが既に存在します: {id}")]
    DocumentExists {
        /// 対象ドキュメントの ID
        id: String,
    },

    /// HTTP クライアントエラー
    ///
    /// 接続失敗・タイムアウトなどのトランスポート層エラー。
    #[error("HTTP クライアントエラー: {0}")]
    Http(#[source] reqwest::Error),

    /// シリアライズ/デシリアライズエラー
    ///
    /// JSON の変換に失敗した場合に使用する。
    #[error("シリアライズエラー: {0}")]
    Serialization(#[source] serde_json::Error),

    /// 予期しないエラー
    ///
    /// 上記に分類できない予期しないエラー。
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

// ===== InfraError のメソッド =====

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    // ===== Convenience constructors =====

    /// コンテンツストア API エラーを生成する
    pub fn content_store(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::ContentStore(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }

    /// ドキュメント未存在エラーを生成する
    pub fn document_not_found(id: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::DocumentNotFound { id: id.into() },
            span_trace: SpanTrace::capture(),
        }
    }

    /// ドキュメント重複エラーを生成する
    pub fn document_exists(id: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::DocumentExists { id: id.into() },
            span_trace: SpanTrace::capture(),
        }
    }

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Unexpected(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

// ===== トレイト実装 =====

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

// ===== From 実装（SpanTrace 自動キャプチャ） =====

impl From<reqwest::Error> for InfraError {
    fn from(source: reqwest::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Http(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(source: serde_json::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Serialization(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::layer::SubscriberExt as _;

    use super::*;

    /// テスト用に ErrorLayer 付き subscriber を設定する
    fn with_error_layer(f: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
        let _guard = tracing::subscriber::set_default(subscriber);
        f();
    }

    #[test]
    fn test_from_serde_json_errorでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("test_serialization");
            let _enter = span.enter();

            let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
            let err: InfraError = json_err.into();

            assert!(matches!(err.kind(), InfraErrorKind::Serialization(_)));
            let trace_str = format!("{}", err.span_trace());
            assert!(
                trace_str.contains("test_serialization"),
                "SpanTrace がスパン名を含むこと: {trace_str}",
            );
        });
    }

    #[test]
    fn test_content_storeでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("test_mutate");
            let _enter = span.enter();

            let err = InfraError::content_store("mutation failed");

            assert!(matches!(err.kind(), InfraErrorKind::ContentStore(msg) if msg == "mutation failed"));
            let trace_str = format!("{}", err.span_trace());
            assert!(trace_str.contains("test_mutate"));
        });
    }

    #[test]
    fn test_document_not_foundがidを保持する() {
        let err = InfraError::document_not_found("p1");
        assert!(matches!(
            err.kind(),
            InfraErrorKind::DocumentNotFound { id } if id == "p1"
        ));
    }

    #[test]
    fn test_document_existsがidを保持する() {
        let err = InfraError::document_exists("p1");
        assert!(matches!(
            err.kind(),
            InfraErrorKind::DocumentExists { id } if id == "p1"
        ));
    }

    #[test]
    fn test_displayがinfra_error_kindのメッセージを出力する() {
        let err = InfraError::document_not_found("p1");
        assert_eq!(format!("{err}"), "ドキュメントが見つかりません: p1");
    }

    #[test]
    fn test_sourceがinfra_error_kindに委譲する() {
        use std::error::Error;

        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: InfraError = json_err.into();

        // Serialization variant は serde_json::Error を source として持つ
        assert!(err.source().is_some());
    }
}
