#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lyricsense_server::start().await
}
