//! Relay binary entry point.

use image_relay::cli::{Cli, Commands};
use image_relay::config::RelayConfig;
use image_relay::error::RelayError;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse_args();

    let result = match cli.command {
        Commands::Serve(args) => match RelayConfig::from_env() {
            Ok(config) => image_relay::server::serve(&args.apply(config)).await,
            Err(e) => Err(e),
        },
        Commands::CheckConfig(args) => check_config(args),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Relay exited with an error");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn check_config(args: image_relay::cli::ServeArgs) -> Result<(), RelayError> {
    let config = args.apply(RelayConfig::from_env()?);
    println!("{config:#?}");
    config.validate()
}
