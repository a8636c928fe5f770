use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use mirrorgrid::config::Config;
use mirrorgrid::helper::LoopbackTransport;
use mirrorgrid::logger;
use mirrorgrid::modules::ModuleFactoryRegistry;
use mirrorgrid::ui::ModuleManager;

/// How long to wait for the first renders before printing what is there.
const INITIAL_RENDER_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // Logging needs the configured levels, so the outcome is reported
    // only once the logger is installed.
    let (config, loaded) = match Config::load() {
        Ok((config, source)) => (config, Ok(source)),
        Err(err) => (Config::default(), Err(err)),
    };

    let _log_buffer = logger::init(&config.log_level, config.log_to_file)?;
    match loaded {
        Ok(source) => source.report(),
        Err(err) => log::error!("Could not load configuration, using defaults: {:#}", err),
    }
    log::info!("Starting mirrorgrid on {}:{}", config.address, config.port);

    let factories = ModuleFactoryRegistry::with_builtins();
    let (manager, settled) = ModuleManager::start(&config, &factories);

    let (transport, receiver) = LoopbackTransport::new();
    manager.set_transport(Arc::new(transport));
    let helper = LoopbackTransport::spawn_echo(receiver, manager.clone());

    if tokio::time::timeout(INITIAL_RENDER_TIMEOUT, settled).await.is_err() {
        log::warn!("Some modules have not rendered yet");
    }
    println!("{}", manager.document().to_html());

    helper.abort();
    Ok(())
}
