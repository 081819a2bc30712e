use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use odo_registry::Registry;
use odo_server::{OdoServer, ServerConfig};
use odo_store::FileLedger;
use odo_types::Reading;

use crate::cli::*;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "odo.toml";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let format = cli.format;
    match cli.command {
        Command::Init(args) => cmd_init(&config, args),
        Command::Add(args) => cmd_add(&config, args),
        Command::Update(args) => cmd_update(&config, args),
        Command::RemoveAll => cmd_remove_all(&config),
        Command::Read(args) => cmd_read(&config, args, &format),
        Command::ReadAll => cmd_read_all(&config, &format),
        Command::Invoke(args) => cmd_invoke(&config, args),
        Command::Serve(args) => cmd_serve(config, args),
    }
}

/// Config file values, then command-line overrides.
fn resolve_config(cli: &Cli) -> anyhow::Result<ServerConfig> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => ServerConfig::load(DEFAULT_CONFIG_FILE)?,
        None => ServerConfig::default(),
    };
    if let Some(ledger) = &cli.ledger {
        config.ledger_path = ledger.clone();
    }
    Ok(config)
}

fn open_registry(config: &ServerConfig) -> anyhow::Result<Registry> {
    let ledger = FileLedger::open(&config.ledger_path)
        .with_context(|| format!("cannot open ledger {}", config.ledger_path.display()))?;
    Ok(Registry::new(Arc::new(ledger), config.registry.clone()))
}

fn cmd_init(config: &ServerConfig, args: InitArgs) -> anyhow::Result<()> {
    let registry = open_registry(config)?;
    if registry.is_provisioned()? && !args.force {
        bail!(
            "ledger {} is already provisioned; pass --force to delete every reading and reset the index",
            config.ledger_path.display()
        );
    }
    let removed = registry.provision()?;
    println!(
        "{} Initialized reading ledger in {}",
        "✓".green().bold(),
        config.ledger_path.display().to_string().bold()
    );
    if removed > 0 {
        println!("  Removed {} existing readings", removed.to_string().bold());
    }
    println!("  Index key: {}", config.registry.index_key.cyan());
    Ok(())
}

fn cmd_add(config: &ServerConfig, args: RecordArgs) -> anyhow::Result<()> {
    let reading = open_registry(config)?.create(&args.json)?;
    println!(
        "{} Added reading for {}",
        "✓".green().bold(),
        reading.vehicle_id.yellow()
    );
    print_reading(&reading);
    Ok(())
}

fn cmd_update(config: &ServerConfig, args: RecordArgs) -> anyhow::Result<()> {
    let reading = open_registry(config)?.update(&args.json)?;
    println!(
        "{} Updated reading for {}",
        "✓".green().bold(),
        reading.vehicle_id.yellow()
    );
    print_reading(&reading);
    Ok(())
}

fn cmd_remove_all(config: &ServerConfig) -> anyhow::Result<()> {
    let removed = open_registry(config)?.remove_all()?;
    println!("{} Removed {} readings.", "✓".green(), removed.to_string().bold());
    Ok(())
}

fn cmd_read(config: &ServerConfig, args: ReadArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let reading = open_registry(config)?.read(&args.id)?;
    match format {
        OutputFormat::Json => println!("{}", String::from_utf8(reading.to_bytes()?)?),
        OutputFormat::Text => {
            println!("Reading {}", reading.vehicle_id.yellow().bold());
            print_reading(&reading);
        }
    }
    Ok(())
}

fn cmd_read_all(config: &ServerConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let readings = open_registry(config)?.read_all()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&readings)?),
        OutputFormat::Text if readings.is_empty() => println!("No readings."),
        OutputFormat::Text => {
            for reading in &readings {
                println!(
                    "{}  {}  {}",
                    reading.vehicle_id.yellow().bold(),
                    reading.reading,
                    reading.creation_date.dimmed()
                );
            }
        }
    }
    Ok(())
}

fn cmd_invoke(config: &ServerConfig, args: InvokeArgs) -> anyhow::Result<()> {
    let payload = open_registry(config)?.invoke(&args.function, &args.args)?;
    if payload.is_empty() {
        println!("{} {} succeeded", "✓".green().bold(), args.function.bold());
    } else {
        println!("{}", String::from_utf8_lossy(&payload));
    }
    Ok(())
}

fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind:?}"))?;
    }
    let registry = open_registry(&config)?;
    println!(
        "odo server on {} (ledger: {})",
        config.bind_addr.to_string().bold(),
        config.ledger_path.display()
    );
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(OdoServer::new(config, Arc::new(registry)).serve())?;
    Ok(())
}

fn print_reading(reading: &Reading) {
    println!("  Value: {}", reading.reading.bold());
    println!("  Date: {}", reading.creation_date.cyan());
}
