use std::path::PathBuf;

use clap::{Parser, Subcommand};

use nr_alert_export::config::{self, ExportConfig};
use nr_alert_export::error::{ConfigError, Error};
use nr_alert_export::export::{export_conditions, export_email_destinations};
use nr_alert_export::nerdgraph::NerdGraphClient;
use nr_alert_export::rest::RestClient;

/// Export New Relic alert policies, conditions and email routing to CSV.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Policies × conditions × linked email channels, via the REST v2 API.
    Conditions {
        /// Output CSV path.
        #[arg(short, long, default_value = config::CONDITIONS_CSV)]
        output: PathBuf,
    },
    /// Each policy's email destinations resolved through workflows, via NerdGraph.
    Emails {
        /// Output CSV path.
        #[arg(short, long, default_value = config::EMAIL_DESTINATIONS_CSV)]
        output: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ExportConfig::from_env().unwrap_or_else(|e| exit_on_config_error(e));

    match cli.command {
        Command::Conditions { output } => {
            let client = RestClient::from_config(&config);
            export_conditions(&client, &output).await?;
            println!("Export complete: {}", output.display());
        }
        Command::Emails { output } => {
            let client = match NerdGraphClient::from_config(&config) {
                Ok(client) => client,
                Err(Error::Config(e)) => exit_on_config_error(e),
                Err(e) => return Err(e.into()),
            };
            let rows = export_email_destinations(&client, &output).await?;
            println!("Wrote {} rows to {}", rows, output.display());
        }
    }

    Ok(())
}

fn exit_on_config_error(err: ConfigError) -> ! {
    eprintln!("Error: {err}");
    if let ConfigError::MissingEnvVar(var) = &err {
        eprintln!("  export {var}=...");
    }
    std::process::exit(1);
}
