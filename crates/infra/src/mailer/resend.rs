//! プロバイダ API 送信実装
//!
//! トランザクショナルメールプロバイダ（Resend）の REST API でメールを送信する。
//! 本番環境で使用する。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shopflow_domain::notification::{NotificationError, OutboundEmail, SendReceipt};

use super::MailSender;

/// プロバイダ API 送信
///
/// `POST {endpoint}/emails` に Bearer 認証で送信リクエストを投げる。
pub struct ResendMailSender {
    client:   reqwest::Client,
    endpoint: String,
    api_key:  String,
}

impl ResendMailSender {
    /// 新しいプロバイダ API 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `endpoint`: プロバイダ API のベース URL（例: `https://api.resend.com`）
    /// - `api_key`: プロバイダの API キー
    pub fn new(endpoint: &str, api_key: impl Into<String>) -> Self {
        Self {
            client:   reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key:  api_key.into(),
        }
    }
}

/// 送信 API のリクエストボディ
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// プロバイダのエラーペイロード
#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

#[async_trait]
impl MailSender for ResendMailSender {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, NotificationError> {
        let request = SendEmailRequest {
            from: &email.from,
            reply_to: email.reply_to.as_deref(),
            to: &email.to,
            subject: &email.subject,
            html: &email.html_body,
            text: &email.text_body,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("プロバイダ API 呼び出し失敗: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ProviderError>(&body) {
                Ok(error) => error.message,
                Err(_) => format!("{status}: {body}"),
            };
            return Err(NotificationError::Provider(message));
        }

        response
            .json::<SendReceipt>()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("レシートの解析に失敗: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResendMailSender>();
    }

    #[test]
    fn endpointの末尾スラッシュが正規化される() {
        let sender = ResendMailSender::new("https://api.resend.com/", "key");
        assert_eq!(sender.endpoint, "https://api.resend.com");
    }
}
