//! # Integration Service サーバー
//!
//! e コマースプラットフォームの外部サービス連携を担当するサービス。
//!
//! ## 役割
//!
//! - **コンテンツ同期**: 商品イベントを受けてコンテンツストアのドキュメントを
//!   作成・更新・削除する
//! - **通知ディスパッチ**: 注文・招待・パスワードリセットのイベントを受けて
//!   テンプレートメールを送信する
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `INTEGRATION_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `INTEGRATION_PORT` | **Yes** | ポート番号 |
//! | `CONTENT_STORE_ENDPOINT` | **Yes** | コンテンツストア API のベース URL |
//! | `CONTENT_STORE_API_TOKEN` | **Yes** | コンテンツストアの Bearer トークン |
//! | `CONTENT_STORE_DATASET` | No | データセット名（デフォルト: `production`） |
//! | `CONTENT_STORE_API_VERSION` | No | データ API バージョン |
//! | `CONTENT_STORE_STUDIO_URL` | No | スタジオのベース URL |
//! | `CONTENT_STORE_TYPE_MAP` | No | 型マップの上書き（`product=lamp,…`） |
//! | `MAIL_BACKEND` | No | `resend` \| `smtp` \| `noop`（デフォルト: `noop`） |
//! | `MAIL_API_KEY` | backend=resend | プロバイダの API キー |
//! | `MAIL_FROM_ADDRESS` | **Yes** | 送信元メールアドレス |
//! | `MAIL_DEFAULT_TO_ADDRESS` | **Yes** | 宛先未指定時の既定宛先 |
//! | `MAIL_ENABLE_EMAILS` | No | `true` で送信有効（デフォルト: 無効） |
//! | `ADMIN_INVITE_URL_PREFIX` | 招待処理時 | 管理者招待 URL のプレフィックス |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p shopflow-integration-service
//!
//! # 本番環境
//! INTEGRATION_PORT=3002 MAIL_BACKEND=resend … cargo run -p shopflow-integration-service --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use shopflow_infra::{
    HttpContentStore,
    MailSender,
    NoopMailSender,
    ResendMailSender,
    SmtpMailSender,
};
use shopflow_integration_service::{
    app_builder::build_app,
    config::{IntegrationConfig, MailBackend},
    handler::{NotificationState, SyncState},
    usecase::{ContentSyncService, NotificationService, TemplateRenderer},
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Integration Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,shopflow=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 設定読み込み（必須変数の欠落はここで失敗する）
    let config = IntegrationConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Integration Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // コンテンツストアクライアントを初期化
    let store = Arc::new(HttpContentStore::new(
        &config.content_store.endpoint,
        &config.content_store.api_version,
        config.content_store.dataset.clone(),
        config.content_store.api_token.clone(),
    ));
    tracing::info!(
        dataset = %config.content_store.dataset,
        "コンテンツストアに接続しました"
    );

    // メール送信バックエンドを初期化
    let sender: Arc<dyn MailSender> = match config.mail.backend {
        MailBackend::Resend => {
            let api_key = config
                .mail
                .api_key
                .clone()
                .context("MAIL_API_KEY が設定されていません")?;
            Arc::new(ResendMailSender::new(&config.mail.api_endpoint, api_key))
        }
        MailBackend::Smtp => Arc::new(SmtpMailSender::new(
            &config.mail.smtp_host,
            config.mail.smtp_port,
        )),
        MailBackend::Noop => Arc::new(NoopMailSender),
    };

    // ユースケースを初期化
    let sync_service = ContentSyncService::new(store, &config.content_store);
    let renderer =
        TemplateRenderer::new().context("通知テンプレートの初期化に失敗しました")?;
    let notification_service = NotificationService::new(sender, renderer, &config.mail);

    let sync_state = Arc::new(SyncState { sync: sync_service });
    let notification_state = Arc::new(NotificationState {
        notifications: notification_service,
        admin_invite_url_prefix: config.events.admin_invite_url_prefix.clone(),
        company_name: config.events.company_name.clone(),
    });

    // ルーター構築
    let app = build_app(sync_state, notification_state);

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Integration Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
