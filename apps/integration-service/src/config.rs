//! # Integration Service 設定
//!
//! 環境変数から Integration Service の設定を読み込む。
//!
//! ## 設計方針
//!
//! - **構築時に 1 回だけ検証**: 必須変数の欠落・不正値は [`ConfigError`] として
//!   起動時に失敗させる。実行時まで遅延させない
//! - **構築後は不変**: 設定構造体は読み込み後に再読込・変更されない

use std::{collections::HashMap, env, str::FromStr};

use shopflow_domain::sync::SyncDocumentType;
use thiserror::Error;

/// 既定のデータ API バージョン
///
/// 「現在日付」のような可変既定値にすると再起動のたびに接続先が変わるため、
/// 固定値とする。
const DEFAULT_API_VERSION: &str = "2024-07-01";

/// 設定エラー
///
/// 必須環境変数の欠落や不正値。起動時（構築時）に検出される。
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必須環境変数が未設定
    #[error("環境変数 {name} が設定されていません")]
    MissingVar {
        /// 変数名
        name: &'static str,
    },

    /// 環境変数の値が不正
    #[error("環境変数 {name} の値が不正です: {reason}")]
    InvalidVar {
        /// 変数名
        name:   &'static str,
        /// 不正の内容
        reason: String,
    },
}

/// Integration Service サーバーの設定
#[derive(Debug, Clone)]
pub struct IntegrationConfig {
    /// バインドアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// コンテンツストア設定
    pub content_store: ContentStoreConfig,
    /// メール通知設定
    pub mail: MailConfig,
    /// イベントハンドラ設定
    pub events: EventConfig,
}

/// コンテンツストアの設定
#[derive(Debug, Clone)]
pub struct ContentStoreConfig {
    /// ストア API のベース URL
    pub endpoint:    String,
    /// Bearer 認証トークン
    pub api_token:   String,
    /// 対象データセット名
    pub dataset:     String,
    /// データ API バージョン
    pub api_version: String,
    /// スタジオ（管理画面）のベース URL。未設定の場合、
    /// スタジオリンク生成は設定エラーとなる
    pub studio_url:  Option<String>,
    /// 型マップの上書き（キー単位で既定マップより優先される）
    pub type_map:    HashMap<SyncDocumentType, String>,
}

/// メール送信バックエンドの種別
///
/// `MAIL_BACKEND` 環境変数で送信バックエンドを切り替える:
/// - `resend`: プロバイダ API 経由で送信（本番）
/// - `smtp`: Mailpit（開発）/ SMTP サーバー経由で送信
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailBackend {
    /// プロバイダ API
    Resend,
    /// SMTP
    Smtp,
    /// 送信しない
    Noop,
}

impl MailBackend {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "resend" => Ok(Self::Resend),
            "smtp" => Ok(Self::Smtp),
            "noop" => Ok(Self::Noop),
            other => Err(ConfigError::InvalidVar {
                name:   "MAIL_BACKEND",
                reason: format!("未知のバックエンド: {other}（resend | smtp | noop）"),
            }),
        }
    }
}

/// メール通知の設定
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// 送信バックエンド
    pub backend:            MailBackend,
    /// プロバイダ API のベース URL（backend=resend の場合に使用）
    pub api_endpoint:       String,
    /// プロバイダの API キー（backend=resend の場合に必須）
    pub api_key:            Option<String>,
    /// SMTP ホスト（backend=smtp の場合に使用）
    pub smtp_host:          String,
    /// SMTP ポート（backend=smtp の場合に使用）
    pub smtp_port:          u16,
    /// 送信元メールアドレス
    pub from_address:       String,
    /// 返信先メールアドレス
    pub reply_to_address:   Option<String>,
    /// 宛先未指定時の既定宛先
    pub default_to_address: String,
    /// メール送信の有効化フラグ。無効時は送信を行わずスキップ結果を返す
    pub emails_enabled:     bool,
}

/// イベントハンドラの設定
#[derive(Debug, Clone)]
pub struct EventConfig {
    /// 管理者招待 URL のプレフィックス。招待イベント処理時に必須
    pub admin_invite_url_prefix: Option<String>,
    /// 招待件名に使用する組織名
    pub company_name:            Option<String>,
}

impl IntegrationConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: optional("INTEGRATION_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_port("INTEGRATION_PORT", required("INTEGRATION_PORT")?)?,
            content_store: ContentStoreConfig::from_env()?,
            mail: MailConfig::from_env()?,
            events: EventConfig::from_env(),
        })
    }
}

impl ContentStoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint:    required("CONTENT_STORE_ENDPOINT")?,
            api_token:   required("CONTENT_STORE_API_TOKEN")?,
            dataset:     optional("CONTENT_STORE_DATASET")
                .unwrap_or_else(|| "production".to_string()),
            api_version: optional("CONTENT_STORE_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            studio_url:  optional("CONTENT_STORE_STUDIO_URL"),
            type_map:    match optional("CONTENT_STORE_TYPE_MAP") {
                Some(raw) => parse_type_map(&raw)?,
                None => HashMap::new(),
            },
        })
    }
}

impl MailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let backend = match optional("MAIL_BACKEND") {
            Some(raw) => MailBackend::parse(&raw)?,
            None => MailBackend::Noop,
        };
        let api_key = optional("MAIL_API_KEY");
        if backend == MailBackend::Resend && api_key.is_none() {
            return Err(ConfigError::MissingVar {
                name: "MAIL_API_KEY",
            });
        }

        Ok(Self {
            backend,
            api_key,
            api_endpoint: optional("MAIL_API_ENDPOINT")
                .unwrap_or_else(|| "https://api.resend.com".to_string()),
            smtp_host: optional("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
            smtp_port: parse_port(
                "SMTP_PORT",
                optional("SMTP_PORT").unwrap_or_else(|| "1025".to_string()),
            )?,
            from_address: required("MAIL_FROM_ADDRESS")?,
            reply_to_address: optional("MAIL_REPLY_TO_ADDRESS"),
            default_to_address: required("MAIL_DEFAULT_TO_ADDRESS")?,
            emails_enabled: parse_enabled(
                &optional("MAIL_ENABLE_EMAILS").unwrap_or_else(|| "false".to_string()),
            ),
        })
    }
}

impl EventConfig {
    fn from_env() -> Self {
        Self {
            admin_invite_url_prefix: optional("ADMIN_INVITE_URL_PREFIX"),
            company_name:            optional("COMPANY_NAME"),
        }
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar { name })
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn parse_port(name: &'static str, value: String) -> Result<u16, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidVar {
        name,
        reason: format!("有効なポート番号ではありません: {value}"),
    })
}

/// メール送信有効化フラグを解釈する
///
/// 大文字小文字を無視した `"true"` のみ有効と見なす。それ以外は無効。
fn parse_enabled(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// 型マップの上書き指定（`"product=lamp,…"` 形式）を解釈する
fn parse_type_map(raw: &str) -> Result<HashMap<SyncDocumentType, String>, ConfigError> {
    let mut map = HashMap::new();
    for entry in raw.split(',').filter(|entry| !entry.trim().is_empty()) {
        let (key, value) = entry.split_once('=').ok_or_else(|| ConfigError::InvalidVar {
            name:   "CONTENT_STORE_TYPE_MAP",
            reason: format!("`キー=値` 形式ではありません: {entry}"),
        })?;
        let doc_type =
            SyncDocumentType::from_str(key.trim()).map_err(|_| ConfigError::InvalidVar {
                name:   "CONTENT_STORE_TYPE_MAP",
                reason: format!("未知のドキュメント種別: {key}"),
            })?;
        map.insert(doc_type, value.trim().to_string());
    }
    Ok(map)
}
