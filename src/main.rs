use clap::{Parser, Subcommand};
use glasspath::config;
use glasspath::gui::app::AppModel;
use glasspath::sys::{runtime, server};
use relm4::prelude::*;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "glasspath", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Expand or collapse the menu of a running instance
    Toggle,
    /// Write the default config file and print its path
    InitConfig,
}

#[derive(Debug, Error)]
enum ControlError {
    #[error("Failed to connect to glasspath at {path}: {source}. Is glasspath running?")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to send command: {0}")]
    Write(#[from] std::io::Error),
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Toggle) => send_command("toggle")?,
        Some(Commands::InitConfig) => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
        }
        None => run_ui()?,
    }
    Ok(())
}

fn run_ui() -> anyhow::Result<()> {
    let config = config::load_or_default();
    let (tx, rx) = async_channel::bounded(32);

    runtime::start_background_services(tx)?;
    log::info!("Control socket at {}", server::socket_path().display());

    let app = RelmApp::new("org.glasspath.GlassPath");
    app.run::<AppModel>((config, rx));
    Ok(())
}

fn send_command(cmd: &str) -> Result<(), ControlError> {
    let path = server::socket_path();
    let mut stream = UnixStream::connect(&path).map_err(|source| ControlError::Connect {
        path: path.clone(),
        source,
    })?;

    writeln!(stream, "{}", cmd)?;
    Ok(())
}
