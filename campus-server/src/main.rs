use campus_server::core::{Config, Server, ServerState};
use campus_server::{print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_environment();
    print_banner();

    let config = Config::from_env();
    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        "starting campus server"
    );

    let state = ServerState::initialize(config).await?;
    Server::with_state(state).run().await?;

    Ok(())
}
