//! Output formatting for CLI results
//!
//! Three output formats:
//! - Table: human-readable tables (default)
//! - JSON: structured JSON for scripting
//! - Quiet: bare values only (hex envelope, public key), for piping

use std::str::FromStr;

use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;

use crate::commands::{DecryptedContent, EncryptedContent, KeyInfo, SecretInfo};
use crate::ExitCode;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Quiet,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "quiet" => Ok(Self::Quiet),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Quiet => write!(f, "quiet"),
        }
    }
}

/// Standard JSON response wrapper for consistent schema
#[derive(Serialize)]
pub struct JsonResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// RFC 3339 timestamp
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl<T: Serialize> JsonResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
            command: None,
        }
    }

    pub fn success_with_command(data: T, command: &str) -> Self {
        Self {
            command: Some(command.to_string()),
            ..Self::success(data)
        }
    }
}

impl JsonResponse<()> {
    pub fn error(message: &str) -> JsonResponse<()> {
        JsonResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
            timestamp: chrono::Utc::now().to_rfc3339(),
            command: None,
        }
    }
}

/// Formats command results for the selected output mode.
pub struct OutputFormatter {
    format: OutputFormat,
    verbose: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    pub fn format_key_info(&self, info: &KeyInfo, command: &str) -> String {
        match self.format {
            OutputFormat::Table => {
                let mut table = Self::property_table();
                if let Some(private) = &info.private_key {
                    table.add_row(vec!["Private Key (WIF)", private.as_str()]);
                }
                table.add_row(vec!["Public Key", info.public_key.as_str()]);
                table.add_row(vec!["Public Key (K1)", info.public_key_k1.as_str()]);
                table.to_string()
            }
            OutputFormat::Json => self.to_json_response(info, command),
            OutputFormat::Quiet => match &info.private_key {
                Some(private) => format!("{private}\n{}", info.public_key),
                None => info.public_key.clone(),
            },
        }
    }

    pub fn format_secret(&self, info: &SecretInfo) -> String {
        match self.format {
            OutputFormat::Table => {
                let mut table = Self::property_table();
                table.add_row(vec!["Peer", info.peer.as_str()]);
                table.add_row(vec!["Cipher Key", info.cipher_key.as_str()]);
                table.add_row(vec!["MAC Key", info.mac_key.as_str()]);
                table.to_string()
            }
            OutputFormat::Json => self.to_json_response(info, "secret"),
            OutputFormat::Quiet => format!("{}{}", info.cipher_key, info.mac_key),
        }
    }

    /// Table and quiet modes both print the bare hex so it can be piped.
    pub fn format_encrypted(&self, result: &EncryptedContent) -> String {
        match self.format {
            OutputFormat::Json => self.to_json_response(result, "encrypt"),
            OutputFormat::Table | OutputFormat::Quiet => result.content.clone(),
        }
    }

    pub fn format_decrypted(&self, result: &DecryptedContent) -> String {
        match self.format {
            OutputFormat::Table => {
                let mut table = Self::property_table();
                table.add_row(vec!["content_type", result.content_type.as_str()]);
                if let Ok(serde_json::Value::Object(fields)) = serde_json::to_value(&result.content) {
                    for (name, value) in fields {
                        let value = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
                        table.add_row(vec![name, value]);
                    }
                }
                table.to_string()
            }
            OutputFormat::Json => self.to_json_response(result, "decrypt"),
            OutputFormat::Quiet => result.content.to_json().unwrap_or_default(),
        }
    }

    /// Format error with exit code context
    pub fn format_error_with_code(&self, error: &anyhow::Error, code: ExitCode) -> String {
        match self.format {
            OutputFormat::Table => format!("Error: {error:#}"),
            OutputFormat::Json => {
                let response = JsonResponse::<()>::error(&format!("{error:#}"));
                let mut output = serde_json::to_value(&response).unwrap_or_default();
                output["exit_code"] = serde_json::json!(code as i32);
                output["exit_code_name"] = serde_json::json!(code.name());
                self.to_json(&output)
            }
            OutputFormat::Quiet => String::new(),
        }
    }

    /// Progress message, only shown in verbose table mode.
    pub fn progress(&self, message: &str) {
        if self.verbose && self.format == OutputFormat::Table {
            eprintln!("... {message}");
        }
    }

    fn property_table() -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Property", "Value"]);
        table
    }

    fn to_json<T: Serialize>(&self, value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }

    fn to_json_response<T: Serialize>(&self, value: &T, command: &str) -> String {
        self.to_json(&JsonResponse::success_with_command(value, command))
    }
}
