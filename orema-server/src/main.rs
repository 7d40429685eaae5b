use anyhow::Context;
use orema_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 工作目录, 日志)
    setup_environment().context("failed to set up environment")?;

    print_banner();
    tracing::info!("Oréma N+ server starting...");

    // 2. 加载配置
    let config = Config::from_env();
    if config.is_production() && std::env::var("JWT_SECRET").is_err() {
        anyhow::bail!("JWT_SECRET must be set in production");
    }

    // 3. 初始化服务器状态 (数据库、迁移、首启数据)
    let state = ServerState::initialize(&config)
        .await
        .context("failed to initialize server state")?;

    // 4. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
