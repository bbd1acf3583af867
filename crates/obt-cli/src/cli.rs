//! CLI command definitions and argument parsing

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use obt_crypto::ContentType;

use crate::commands;
use crate::config::{CliOverrides, Config};
use crate::identity::load_private_key;
use crate::output::{OutputFormat, OutputFormatter};
use crate::ExitCode;

/// OBT content tool - encrypt and decrypt off-chain transaction payloads
#[derive(Parser, Debug)]
#[command(name = "obt")]
#[command(version, about = "Encrypt and decrypt FIO off-chain transaction content")]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: table, json, quiet (default from config, else table)
    #[arg(long, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Private key (WIF or PVT_K1_)
    #[arg(long, global = true, env = "OBT_PRIVATE_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// File holding the private key
    #[arg(long, global = true, conflicts_with = "key")]
    pub key_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new key pair
    Keygen,
    /// Show the public key for the configured private key
    Pubkey,
    /// Derive the shared secret with a peer (interop debugging)
    Secret(SecretArgs),
    /// Encrypt a JSON payload for a recipient
    Encrypt(EncryptArgs),
    /// Decrypt a hex envelope from a sender
    Decrypt(DecryptArgs),
}

#[derive(Args, Debug)]
pub struct SecretArgs {
    /// Peer public key (FIO... or PUB_K1_...)
    #[arg(long)]
    pub peer: String,
}

#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// Content type: new_funds_content (request) or record_obt_data_content (record)
    #[arg(long = "type", value_name = "TYPE")]
    pub content_type: ContentType,

    /// Recipient public key
    #[arg(long)]
    pub to: String,

    /// JSON payload file, `-` or omitted for stdin
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Content type the sender used
    #[arg(long = "type", value_name = "TYPE")]
    pub content_type: ContentType,

    /// Sender public key
    #[arg(long)]
    pub from: String,

    /// Hex envelope; read from --input or stdin when omitted
    #[arg(conflicts_with = "input")]
    pub envelope: Option<String>,

    /// File holding the hex envelope, `-` for stdin
    #[arg(long)]
    pub input: Option<PathBuf>,
}

impl Cli {
    /// Overrides from flags and environment, applied over the config file.
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            output_format: self.output.map(|f| f.to_string()),
            private_key: self.key.clone(),
            key_file: self.key_file.clone(),
            verbose: self.verbose.then_some(true),
            debug: self.debug.then_some(true),
        }
    }

    /// Execute the CLI command with a resolved configuration
    pub fn execute_with_config(self, config: Config) -> anyhow::Result<ExitCode> {
        let format = config.output.format.parse().unwrap_or_default();
        let formatter = OutputFormatter::new(format, self.verbose);

        let rendered = match self.command {
            Commands::Keygen => formatter.format_key_info(&commands::keygen(), "keygen"),
            Commands::Pubkey => {
                let private = load_private_key(&config.identity)?;
                formatter.format_key_info(&commands::pubkey(&private), "pubkey")
            }
            Commands::Secret(args) => {
                let private = load_private_key(&config.identity)?;
                formatter.format_secret(&commands::secret(&private, &args.peer)?)
            }
            Commands::Encrypt(args) => {
                let private = load_private_key(&config.identity)?;
                formatter.progress(&format!("encrypting {} for {}", args.content_type, args.to));
                let json = commands::read_input(args.input.as_deref())?;
                formatter.format_encrypted(&commands::encrypt(
                    &private,
                    &args.to,
                    args.content_type,
                    &json,
                )?)
            }
            Commands::Decrypt(args) => {
                let private = load_private_key(&config.identity)?;
                formatter.progress(&format!("decrypting {} from {}", args.content_type, args.from));
                let hex_envelope = match args.envelope {
                    Some(hex) => hex,
                    None => commands::read_input(args.input.as_deref())
                        .context("reading envelope")?,
                };
                formatter.format_decrypted(&commands::decrypt(
                    &private,
                    &args.from,
                    args.content_type,
                    hex_envelope.trim(),
                )?)
            }
        };

        if !rendered.is_empty() {
            println!("{rendered}");
        }
        Ok(ExitCode::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keygen() {
        let cli = Cli::try_parse_from(["obt", "keygen"]).unwrap();
        assert!(matches!(cli.command, Commands::Keygen));
        assert!(cli.output.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "obt", "pubkey", "--output", "json", "--debug", "--config", "/tmp/obt.toml",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert!(cli.debug);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/obt.toml")));
    }

    #[test]
    fn test_parse_encrypt() {
        let cli = Cli::try_parse_from([
            "obt",
            "encrypt",
            "--type",
            "request",
            "--to",
            "FIO7zsqi7QUAjTAdyynd6DVe8uv4K8gCTRHnAoMN9w9CA1xLCTDVv",
            "--input",
            "payload.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Encrypt(args) => {
                assert_eq!(args.content_type, ContentType::NewFundsContent);
                assert_eq!(args.input, Some(PathBuf::from("payload.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_decrypt_positional_envelope() {
        let cli = Cli::try_parse_from([
            "obt",
            "decrypt",
            "--type",
            "record_obt_data_content",
            "--from",
            "FIO5VE6Dgy9FUmd1mFotXwF88HkQN1KysCWLPqpVnDMjRvGRi1YrM",
            "abcdef",
        ])
        .unwrap();
        match cli.command {
            Commands::Decrypt(args) => {
                assert_eq!(args.content_type, ContentType::RecordObtDataContent);
                assert_eq!(args.envelope.as_deref(), Some("abcdef"));
                assert!(args.input.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        assert!(Cli::try_parse_from(["obt", "encrypt", "--type", "invoice", "--to", "FIOx"]).is_err());
    }

    #[test]
    fn test_decrypt_envelope_and_input_conflict() {
        assert!(Cli::try_parse_from([
            "obt", "decrypt", "--type", "request", "--from", "FIOx", "abcd", "--input", "f.hex",
        ])
        .is_err());
    }

    #[test]
    fn test_key_and_key_file_conflict() {
        assert!(Cli::try_parse_from(["obt", "pubkey", "--key", "5J", "--key-file", "k"]).is_err());
    }

    #[test]
    fn test_overrides_from_flags() {
        let cli = Cli::try_parse_from(["obt", "pubkey", "--key", "PVT_K1_x", "-v"]).unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.private_key.as_deref(), Some("PVT_K1_x"));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.debug, None);
        assert!(overrides.output_format.is_none());
    }

    #[test]
    fn test_execute_pubkey() {
        let cli = Cli::try_parse_from([
            "obt",
            "pubkey",
            "--output",
            "quiet",
            "--key",
            "5J9bWm2ThenDm3tjvmUgHtWCVMUdjRR1pxnRtnJjvKA4b2ut5WK",
        ])
        .unwrap();
        let config = Config::default().with_overrides(&cli.overrides());
        assert_eq!(cli.execute_with_config(config).unwrap(), ExitCode::Success);
    }

    #[test]
    fn test_execute_without_key_fails() {
        let cli = Cli::try_parse_from(["obt", "pubkey"]).unwrap();
        if cli.key.is_some() {
            // OBT_PRIVATE_KEY is set in the environment running the tests.
            return;
        }
        assert!(cli.execute_with_config(Config::default()).is_err());
    }
}
