//! # 通知
//!
//! メール通知に関するドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **enum によるテンプレート識別**: 既知テンプレートは閉じた enum で表現し、
//!   未知の識別子は `Other` バリアントに吸収する（将来のイベント発行元が
//!   送る新テンプレート ID を壊さないための前方互換）
//! - **結果のタグ付け**: 送信結果は [`SendOutcome`] で「送信済み・スキップ・
//!   未対応テンプレート」を区別する。空オブジェクトから結果を推測させない
//! - **リクエストは永続化しない**: [`NotificationRequest`] はイベントハンドラが
//!   生成し、ディスパッチサービスがちょうど 1 回消費する

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// テンプレートレンダリングに失敗（必須データの欠落を含む）
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),

    /// メールプロバイダがエラーを返した（プロバイダのメッセージを保持する）
    #[error("メールプロバイダがエラーを返しました: {0}")]
    Provider(String),

    /// メール送信に失敗（トランスポート層の失敗）
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),
}

/// 通知テンプレート識別子
///
/// ワイヤ表現は kebab-case（`"order-placed"` など）。未知の識別子は
/// [`Other`](Self::Other) として保持され、ディスパッチ時に no-op となる。
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(from = "String", into = "String")]
pub enum NotificationTemplate {
    /// 注文確定通知
    #[strum(serialize = "order-placed")]
    OrderPlaced,
    /// パスワードリセット通知
    #[strum(serialize = "reset-password")]
    ResetPassword,
    /// 管理者招待通知
    #[strum(serialize = "invite-admin")]
    InviteAdmin,
    /// 未知のテンプレート識別子（前方互換のための受け皿）
    #[strum(default)]
    Other(String),
}

impl From<String> for NotificationTemplate {
    fn from(value: String) -> Self {
        // #[strum(default)] により未知文字列は Other に落ちるため失敗しない
        Self::from_str(&value).unwrap_or(Self::Other(value))
    }
}

impl From<NotificationTemplate> for String {
    fn from(template: NotificationTemplate) -> Self {
        template.to_string()
    }
}

/// 通知リクエスト
///
/// イベントハンドラが生成し、ディスパッチサービスが 1 回だけ消費する。
/// `data` はテンプレートごとに必要なフィールドを持つ自由形式のマップ。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// 宛先メールアドレス
    pub to: String,
    /// テンプレート識別子
    pub template: NotificationTemplate,
    /// テンプレートデータ（`subject` とテンプレート固有フィールド）
    #[serde(default)]
    pub data: serde_json::Map<String, Value>,
}

/// レンダリング済みメール
///
/// テンプレートレンダラーの出力。件名とHTML / プレーンテキスト本文を持つ。
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

/// 送信メール
///
/// メールクライアント契約の入力。宛先解決済みの完全なメッセージ。
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    /// 送信元アドレス
    pub from:      String,
    /// 返信先アドレス
    pub reply_to:  Option<String>,
    /// 宛先アドレス（1 件以上）
    pub to:        Vec<String>,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

/// プロバイダ送信レシート
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    /// プロバイダ側のメッセージ ID（プロバイダが返さない場合は None）
    pub id: Option<String>,
}

/// 送信結果
///
/// 「意図的にスキップした」「未対応テンプレートだった」「送信した」を
/// 呼び出し側が区別できるタグ付き結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// メールを送信した
    Sent {
        /// プロバイダのレシート
        receipt: SendReceipt,
    },
    /// 通知が無効化されているためスキップした
    Skipped,
    /// 未対応のテンプレート識別子だったため何もしなかった
    Unmatched,
}

impl SendOutcome {
    /// ホストイベントシステム向けの JSON 表現に変換する
    pub fn to_data(&self) -> Value {
        match self {
            Self::Sent { receipt } => serde_json::json!({
                "outcome": "sent",
                "id": receipt.id,
            }),
            Self::Skipped => serde_json::json!({ "outcome": "skipped" }),
            Self::Unmatched => serde_json::json!({ "outcome": "unmatched" }),
        }
    }
}

/// ディスパッチ結果のエンベロープ
///
/// ホストイベントシステムへ返す統一形式。
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReceipt {
    /// 宛先メールアドレス
    pub to:     String,
    /// 処理ステータス（常に `"done"`）
    pub status: String,
    /// 送信結果（[`SendOutcome::to_data`] の出力）
    pub data:   Value,
}

impl DispatchReceipt {
    /// 処理完了のエンベロープを生成する
    pub fn done(to: impl Into<String>, data: Value) -> Self {
        Self {
            to: to.into(),
            status: "done".to_string(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(NotificationTemplate::OrderPlaced, "order-placed")]
    #[case(NotificationTemplate::ResetPassword, "reset-password")]
    #[case(NotificationTemplate::InviteAdmin, "invite-admin")]
    fn テンプレート識別子の文字列変換が一致する(
        #[case] template: NotificationTemplate,
        #[case] wire: &str,
    ) {
        assert_eq!(template.to_string(), wire);
        assert_eq!(NotificationTemplate::from(wire.to_string()), template);
    }

    #[test]
    fn 未知のテンプレート識別子はotherに落ちる() {
        let template = NotificationTemplate::from("shipment-created".to_string());
        assert_eq!(
            template,
            NotificationTemplate::Other("shipment-created".to_string())
        );
        assert_eq!(template.to_string(), "shipment-created");
    }

    #[test]
    fn 通知リクエストのデシリアライズで未知テンプレートもエラーにならない() {
        let request: NotificationRequest = serde_json::from_str(
            r#"{"to": "a@b.com", "template": "future-template", "data": {"subject": "x"}}"#,
        )
        .unwrap();

        assert_eq!(request.to, "a@b.com");
        assert_eq!(
            request.template,
            NotificationTemplate::Other("future-template".to_string())
        );
    }

    #[test]
    fn send_outcomeのjson表現にoutcomeタグが含まれる() {
        let sent = SendOutcome::Sent {
            receipt: SendReceipt {
                id: Some("msg_1".to_string()),
            },
        };
        assert_eq!(
            sent.to_data(),
            serde_json::json!({"outcome": "sent", "id": "msg_1"})
        );
        assert_eq!(
            SendOutcome::Skipped.to_data(),
            serde_json::json!({"outcome": "skipped"})
        );
        assert_eq!(
            SendOutcome::Unmatched.to_data(),
            serde_json::json!({"outcome": "unmatched"})
        );
    }

    #[test]
    fn dispatch_receiptのstatusは常にdoneである() {
        let receipt = DispatchReceipt::done("a@b.com", SendOutcome::Skipped.to_data());
        let json = serde_json::to_value(&receipt).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "to": "a@b.com",
                "status": "done",
                "data": {"outcome": "skipped"}
            })
        );
    }
}
