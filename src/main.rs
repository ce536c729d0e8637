#[tokio::main]
async fn main() -> std::io::Result<()> {
    voice_platformer::run_with_config().await
}
