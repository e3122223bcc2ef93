#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Delegate to the framework entry point.
    arena_server::run_with_config().await
}
