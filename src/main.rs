use reddio::core::tracing::default_tracing;

fn run_blocking() -> anyhow::Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(async { reddio::cli::run().await })
}

fn main() -> anyhow::Result<()> {
    tracing::subscriber::set_global_default(default_tracing())?;
    run_blocking()
}
