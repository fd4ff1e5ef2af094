use std::sync::Arc;
use tokio::sync::Notify;

use chorus::config::Config;
use chorus::handler::Dispatcher;
use chorus::http::build_text_response;
use chorus::logger;
use chorus::server::{self, AppState};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    // Worker threads default to the number of CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let dispatcher = Dispatcher::from_config(&cfg.dispatch)?;
    dispatcher.route_fn("GET /healthz", |_req| async {
        build_text_response(200, "ok")
    })?;

    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &cfg);
    logger::log_info(&format!(
        "[CONFIG] Modules: {} -> static",
        dispatcher.module_names().join(" -> ")
    ));
    for pattern in dispatcher.patterns() {
        logger::log_info(&format!("[CONFIG] Route: {pattern}"));
    }

    let drain_timeout = cfg.connection_timeout();
    let state = Arc::new(AppState::new(cfg, dispatcher));
    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown));

    // Connection tasks use spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            server::start_server_loop(listener, Arc::clone(&state), shutdown).await?;
            server::drain_connections(&state, drain_timeout).await;
            Ok::<(), Box<dyn std::error::Error>>(())
        })
        .await
}
