#[tokio::main]
async fn main() -> anyhow::Result<()> {
    canvas_server::run().await
}
