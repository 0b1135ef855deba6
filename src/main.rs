use std::sync::Arc;

mod cli;
mod config;
mod handler;
mod http;
mod logger;
mod server;

use clap::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli::Cli::parse();
    let cfg = config::Config::load_from(cli.settings.as_deref(), &cli.overrides())?;

    logger::init(&cfg.logging)?;

    // The served root has to exist before anything binds
    if let Err(msg) = cfg.check_root() {
        logger::log_error(&msg);
        return Err(msg.into());
    }

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr).map_err(|e| {
        logger::log_error(&format!("Failed to bind {addr}: {e}"));
        e
    })?;

    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(config::AppState::new(cfg));
    server::run_server(listener, state, server::shutdown_signal()).await;
    Ok(())
}
