use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    groqchat::run().await
}
