//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **必要なフィールドだけを抽出**: 各テンプレートはリクエストデータから
//!   自分が必要とするフィールドのみを取り出す。欠落はレンダリング失敗として扱う
//! - **件名**: `data.subject` が指定されていれば優先し、なければテンプレートごとの
//!   既定値を使う

use serde_json::Value;
use shopflow_domain::notification::{
    NotificationError,
    NotificationRequest,
    NotificationTemplate,
    RenderedEmail,
};
use tera::{Context, Tera};

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、[`NotificationRequest`] から
/// [`RenderedEmail`] を生成する。
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "order_placed.html",
                    include_str!("../../../templates/notifications/order_placed.html"),
                ),
                (
                    "order_placed.txt",
                    include_str!("../../../templates/notifications/order_placed.txt"),
                ),
                (
                    "reset_password.html",
                    include_str!("../../../templates/notifications/reset_password.html"),
                ),
                (
                    "reset_password.txt",
                    include_str!("../../../templates/notifications/reset_password.txt"),
                ),
                (
                    "invite_admin.html",
                    include_str!("../../../templates/notifications/invite_admin.html"),
                ),
                (
                    "invite_admin.txt",
                    include_str!("../../../templates/notifications/invite_admin.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// 通知リクエストからメールを生成する
    ///
    /// 未知のテンプレート識別子（[`NotificationTemplate::Other`]）の場合は
    /// エラーではなく `Ok(None)` を返す（前方互換のための no-op）。
    pub fn render(
        &self,
        request: &NotificationRequest,
    ) -> Result<Option<RenderedEmail>, NotificationError> {
        let Some((template_name, subject, context)) = self.build_template_params(request)? else {
            return Ok(None);
        };

        let html_body = self
            .engine
            .render(&format!("{template_name}.html"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(&format!("{template_name}.txt"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Some(RenderedEmail {
            subject,
            html_body,
            text_body,
        }))
    }

    /// テンプレート名、件名、コンテキストを構築する
    ///
    /// 各テンプレートが必要とするフィールドをここで検証・抽出する。
    fn build_template_params(
        &self,
        request: &NotificationRequest,
    ) -> Result<Option<(String, String, Context)>, NotificationError> {
        let mut context = Context::new();

        let (template_name, default_subject) = match &request.template {
            NotificationTemplate::OrderPlaced => {
                // 注文ペイロード全体をテンプレートに渡す
                context.insert("order", &Value::Object(request.data.clone()));
                ("order_placed", "Order Confirmation")
            }
            NotificationTemplate::ResetPassword => {
                let url = required_str(request, "url")?;
                context.insert("url", url);
                ("reset_password", "Reset Your Password")
            }
            NotificationTemplate::InviteAdmin => {
                let token = required_str(request, "token")?;
                let user = request
                    .data
                    .get("user")
                    .and_then(Value::as_object)
                    .ok_or_else(|| {
                        NotificationError::TemplateFailed(
                            "invite-admin テンプレートには user が必要です".to_string(),
                        )
                    })?;
                let email = user.get("email").and_then(Value::as_str).ok_or_else(|| {
                    NotificationError::TemplateFailed(
                        "invite-admin テンプレートには user.email が必要です".to_string(),
                    )
                })?;

                context.insert("invitee_name", &invitee_name(user, email));
                context.insert("token", token);
                context.insert(
                    "accept_invite_url",
                    &request.data.get("accept_invite_url").and_then(Value::as_str),
                );
                ("invite_admin", "Admin Team Invitation")
            }
            NotificationTemplate::Other(_) => return Ok(None),
        };

        let subject = request
            .data
            .get("subject")
            .and_then(Value::as_str)
            .unwrap_or(default_subject)
            .to_string();

        Ok(Some((template_name.to_string(), subject, context)))
    }
}

/// リクエストデータから必須の文字列フィールドを取り出す
fn required_str<'a>(
    request: &'a NotificationRequest,
    field: &str,
) -> Result<&'a str, NotificationError> {
    request
        .data
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            NotificationError::TemplateFailed(format!(
                "{} テンプレートには {field} が必要です",
                request.template
            ))
        })
}

/// 招待者の表示名を組み立てる（姓名が無ければメールアドレス）
fn invitee_name(user: &serde_json::Map<String, Value>, email: &str) -> String {
    let first_name = user.get("first_name").and_then(Value::as_str).unwrap_or("");
    let last_name = user.get("last_name").and_then(Value::as_str).unwrap_or("");

    let full_name = format!("{first_name} {last_name}");
    let full_name = full_name.trim();
    if full_name.is_empty() {
        email.to_string()
    } else {
        full_name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shopflow_domain::notification::NotificationTemplate;

    use super::*;

    fn make_request(template: NotificationTemplate, data: Value) -> NotificationRequest {
        NotificationRequest {
            to: "a@b.com".to_string(),
            template,
            data: data.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn newが正常に初期化される() {
        let renderer = TemplateRenderer::new();
        assert!(renderer.is_ok());
    }

    #[test]
    fn invite_adminのレンダリングが正しい() {
        let renderer = TemplateRenderer::new().unwrap();
        let request = make_request(
            NotificationTemplate::InviteAdmin,
            json!({
                "token": "T1",
                "user": {"email": "a@b.com", "first_name": "Ada", "last_name": "Lovelace"},
                "accept_invite_url": "https://admin.example.com/invite?token=T1",
            }),
        );

        let email = renderer.render(&request).unwrap().unwrap();

        assert_eq!(email.subject, "Admin Team Invitation");
        assert!(email.html_body.contains("Ada Lovelace"));
        assert!(
            email
                .html_body
                .contains("https://admin.example.com/invite?token=T1")
        );
        assert!(
            email
                .text_body
                .contains("https://admin.example.com/invite?token=T1")
        );
    }

    #[test]
    fn invite_adminは件名指定があれば優先する() {
        let renderer = TemplateRenderer::new().unwrap();
        let request = make_request(
            NotificationTemplate::InviteAdmin,
            json!({
                "token": "T1",
                "user": {"email": "a@b.com"},
                "subject": "You've been invited to join Oak & Co admin team",
            }),
        );

        let email = renderer.render(&request).unwrap().unwrap();
        assert_eq!(
            email.subject,
            "You've been invited to join Oak & Co admin team"
        );
    }

    #[test]
    fn invite_adminは姓名が無ければメールアドレスで呼びかける() {
        let renderer = TemplateRenderer::new().unwrap();
        let request = make_request(
            NotificationTemplate::InviteAdmin,
            json!({"token": "T1", "user": {"email": "a@b.com"}}),
        );

        let email = renderer.render(&request).unwrap().unwrap();
        assert!(email.html_body.contains("Hello a@b.com"));
        // accept_invite_url が無い場合はトークンを表示する
        assert!(email.html_body.contains("T1"));
    }

    #[test]
    fn invite_adminはtoken欠落でレンダリング失敗になる() {
        let renderer = TemplateRenderer::new().unwrap();
        let request = make_request(
            NotificationTemplate::InviteAdmin,
            json!({"user": {"email": "a@b.com"}}),
        );

        let result = renderer.render(&request);
        assert!(matches!(
            result.unwrap_err(),
            NotificationError::TemplateFailed(msg) if msg.contains("token")
        ));
    }

    #[test]
    fn reset_passwordのレンダリングが正しい() {
        let renderer = TemplateRenderer::new().unwrap();
        let request = make_request(
            NotificationTemplate::ResetPassword,
            json!({"url": "https://shop.example.com/reset?token=R1"}),
        );

        let email = renderer.render(&request).unwrap().unwrap();

        assert_eq!(email.subject, "Reset Your Password");
        assert!(
            email
                .html_body
                .contains("https://shop.example.com/reset?token=R1")
        );
        assert!(
            email
                .text_body
                .contains("https://shop.example.com/reset?token=R1")
        );
    }

    #[test]
    fn reset_passwordはurl欠落でレンダリング失敗になる() {
        let renderer = TemplateRenderer::new().unwrap();
        let request = make_request(NotificationTemplate::ResetPassword, json!({}));

        let result = renderer.render(&request);
        assert!(matches!(
            result.unwrap_err(),
            NotificationError::TemplateFailed(msg) if msg.contains("url")
        ));
    }

    #[test]
    fn order_placedのレンダリングが正しい() {
        let renderer = TemplateRenderer::new().unwrap();
        let request = make_request(
            NotificationTemplate::OrderPlaced,
            json!({
                "display_id": 1042,
                "email": "a@b.com",
                "items": [
                    {"title": "Oak Chair", "quantity": 2},
                    {"title": "Oak Table", "quantity": 1},
                ],
                "total": "128.00",
                "currency_code": "eur",
            }),
        );

        let email = renderer.render(&request).unwrap().unwrap();

        assert_eq!(email.subject, "Order Confirmation");
        assert!(email.html_body.contains("#1042"));
        assert!(email.html_body.contains("Oak Chair"));
        assert!(email.html_body.contains("EUR"));
        assert!(email.text_body.contains("Oak Table"));
    }

    #[test]
    fn order_placedは最小ペイロードでもレンダリングできる() {
        let renderer = TemplateRenderer::new().unwrap();
        let request = make_request(NotificationTemplate::OrderPlaced, json!({"email": "a@b.com"}));

        let email = renderer.render(&request).unwrap().unwrap();
        assert!(email.html_body.contains("Thank you for your order"));
    }

    #[test]
    fn 未知のテンプレートはnoneを返す() {
        let renderer = TemplateRenderer::new().unwrap();
        let request = make_request(
            NotificationTemplate::Other("shipment-created".to_string()),
            json!({"subject": "x"}),
        );

        assert!(renderer.render(&request).unwrap().is_none());
    }
}
