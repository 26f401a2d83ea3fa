#[tokio::main]
async fn main() -> anyhow::Result<()> {
    berea_server::start().await
}
