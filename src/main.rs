use replay_core::cli::app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
