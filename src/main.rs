use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use chrono::Utc;
use operator_hub::{
    AppState, access::CredentialStore, config::Config, providers::Providers,
    router::create_router,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SESSION_SWEEP_SECS: u64 = 300;

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    // 演示账户与本地数据源
    let credentials = Arc::new(CredentialStore::demo(Utc::now()));
    tracing::info!("Loaded {} demo users", credentials.len());

    let state = AppState::new(config.clone(), credentials, Providers::stub());

    // 定期清理令牌已过期的会话
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(SESSION_SWEEP_SECS));
        loop {
            ticker.tick().await;
            let swept = sessions.purge_expired(Utc::now()).await;
            if swept > 0 {
                tracing::info!("Swept {} expired sessions", swept);
            }
        }
    });

    let app = create_router(state);

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
