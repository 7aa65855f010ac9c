use std::io;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use portkv_bridge::{Bridge, BridgeConfig, Dispatcher};
use portkv_server::{PortkvServer, ServerConfig};
use portkv_store::{StorageBackend, StoreConfig};

use crate::cli::*;
use crate::stdio::run_ports;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        verbose,
        store,
        quota,
        format,
    } = cli;
    // Flags override a config file only when actually given.
    let store_flags_given = store.is_some() || quota.is_some();
    let store_config = StoreConfig {
        path: store,
        quota_bytes: quota,
    };
    let bridge_config = BridgeConfig {
        log_ports: verbose,
    };
    match command {
        Command::Run(args) => cmd_run(&store_config, &bridge_config, args),
        Command::Serve(args) => {
            let store = store_flags_given.then_some(store_config);
            cmd_serve(store, bridge_config, args)
        }
        Command::Keys => cmd_keys(&open_bridge(&store_config, &bridge_config)?, &format),
        Command::Get(args) => {
            cmd_get(&open_bridge(&store_config, &bridge_config)?, &args.key, &format)
        }
        Command::Clear => {
            open_bridge(&store_config, &bridge_config)?.clear()?;
            println!("{} Store cleared.", "✓".green());
            Ok(())
        }
    }
}

fn open_bridge(
    store: &StoreConfig,
    bridge: &BridgeConfig,
) -> anyhow::Result<Bridge<Arc<dyn StorageBackend>>> {
    let backend = store.open().context("opening store")?;
    Ok(Bridge::from_config(backend, bridge))
}

fn cmd_run(store: &StoreConfig, bridge: &BridgeConfig, args: RunArgs) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::register(open_bridge(store, bridge)?);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let stats = run_ports(&dispatcher, stdin.lock(), stdout.lock(), args.fail_fast)?;
    tracing::info!(
        handled = stats.handled,
        responses = stats.responses,
        failed = stats.failed,
        "port session ended"
    );
    Ok(())
}

fn cmd_serve(
    store: Option<StoreConfig>,
    bridge: BridgeConfig,
    args: ServeArgs,
) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_toml_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(store) = store {
        config.store = store;
    }
    if bridge.log_ports {
        config.bridge = bridge;
    }
    if let Some(bind) = &args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind}"))?;
    }

    println!("portkv server on {}", config.bind_addr.to_string().bold());
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(PortkvServer::new(config).serve())?;
    Ok(())
}

fn cmd_keys(bridge: &Bridge<Arc<dyn StorageBackend>>, format: &OutputFormat) -> anyhow::Result<()> {
    let keys = bridge.enum_keys()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&keys)?),
        OutputFormat::Text if keys.is_empty() => println!("No keys stored."),
        OutputFormat::Text => {
            for key in &keys {
                println!("{}", key.yellow());
            }
        }
    }
    Ok(())
}

fn cmd_get(
    bridge: &Bridge<Arc<dyn StorageBackend>>,
    key: &str,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let value = bridge.get_item(key)?;
    match format {
        OutputFormat::Json => println!("{value}"),
        OutputFormat::Text if value.is_null() => println!("{} = {}", key.bold(), "(not set)".dimmed()),
        OutputFormat::Text => println!("{} = {}", key.bold(), serde_json::to_string_pretty(&value)?),
    }
    Ok(())
}
