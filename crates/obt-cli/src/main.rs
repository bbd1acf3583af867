//! `obt` CLI entry point

use clap::Parser;
use obt_cli::{Cli, Config, ExitCode, OutputFormatter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let config = match Config::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::ConfigError.to_exit_code();
        }
    };
    let config = config.with_overrides(&cli.overrides());

    // Logs go to stderr so stdout stays clean for envelopes and JSON.
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let formatter = OutputFormatter::new(
        config.output.format.parse().unwrap_or_default(),
        cli.verbose,
    );

    match cli.execute_with_config(config) {
        Ok(code) => code.to_exit_code(),
        Err(e) => {
            let code = ExitCode::from_error(&e);
            tracing::debug!(exit_code = code.name(), "command failed");
            let rendered = formatter.format_error_with_code(&e, code);
            if !rendered.is_empty() {
                eprintln!("{rendered}");
            }
            code.to_exit_code()
        }
    }
}
