#[tokio::main]
async fn main() -> anyhow::Result<()> {
    reclaimr::run().await
}
