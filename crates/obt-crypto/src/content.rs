//! Typed OBT payloads and their canonical binary form.
//!
//! The encrypted blob carries no type tag. Sender and recipient agree on the
//! variant from the action the blob is attached to, so decoding always takes
//! an explicit [`ContentType`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::abi::{AbiReader, AbiWriter};
use crate::error::{ObtError, Result};

/// Which payload schema a blob holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Funds request, sent by the payee.
    NewFundsContent,
    /// Record of a completed transfer, sent by the payer.
    RecordObtDataContent,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::NewFundsContent => "new_funds_content",
            ContentType::RecordObtDataContent => "record_obt_data_content",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ObtError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "new_funds_content" | "request" => Ok(ContentType::NewFundsContent),
            "record_obt_data_content" | "record" => Ok(ContentType::RecordObtDataContent),
            other => Err(ObtError::Serialization(format!(
                "unknown content type: {other} (expected new_funds_content or record_obt_data_content)"
            ))),
        }
    }
}

/// A payload schema with a fixed ABI field order.
pub trait ContentPayload: Sized {
    const CONTENT_TYPE: ContentType;

    fn write(&self, w: &mut AbiWriter) -> Result<()>;

    fn read(r: &mut AbiReader<'_>) -> Result<Self>;

    /// Canonical bytes, the plaintext that gets encrypted.
    fn to_abi_bytes(&self) -> Result<Vec<u8>> {
        let mut w = AbiWriter::new();
        self.write(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Decode the whole buffer; trailing bytes are an error.
    fn from_abi_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = AbiReader::new(bytes);
        let value = Self::read(&mut r)?;
        r.finish()?;
        Ok(value)
    }
}

/// `new_funds_content`: what the payee asks for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FundsRequest {
    pub payee_public_address: String,
    pub amount: String,
    pub chain_code: String,
    pub token_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline_url: Option<String>,
}

impl ContentPayload for FundsRequest {
    const CONTENT_TYPE: ContentType = ContentType::NewFundsContent;

    fn write(&self, w: &mut AbiWriter) -> Result<()> {
        w.put_string(&self.payee_public_address)?
            .put_string(&self.amount)?
            .put_string(&self.chain_code)?
            .put_string(&self.token_code)?
            .put_optional_string(self.memo.as_deref())?
            .put_optional_string(self.hash.as_deref())?
            .put_optional_string(self.offline_url.as_deref())?;
        Ok(())
    }

    fn read(r: &mut AbiReader<'_>) -> Result<Self> {
        Ok(Self {
            payee_public_address: r.get_string("payee_public_address")?,
            amount: r.get_string("amount")?,
            chain_code: r.get_string("chain_code")?,
            token_code: r.get_string("token_code")?,
            memo: r.get_optional_string("memo")?,
            hash: r.get_optional_string("hash")?,
            offline_url: r.get_optional_string("offline_url")?,
        })
    }
}

/// `record_obt_data_content`: what the payer reports after sending funds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObtRecord {
    pub payer_public_address: String,
    pub payee_public_address: String,
    pub amount: String,
    pub chain_code: String,
    pub token_code: String,
    pub status: String,
    pub obt_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline_url: Option<String>,
}

impl ContentPayload for ObtRecord {
    const CONTENT_TYPE: ContentType = ContentType::RecordObtDataContent;

    fn write(&self, w: &mut AbiWriter) -> Result<()> {
        w.put_string(&self.payer_public_address)?
            .put_string(&self.payee_public_address)?
            .put_string(&self.amount)?
            .put_string(&self.chain_code)?
            .put_string(&self.token_code)?
            .put_string(&self.status)?
            .put_string(&self.obt_id)?
            .put_optional_string(self.memo.as_deref())?
            .put_optional_string(self.hash.as_deref())?
            .put_optional_string(self.offline_url.as_deref())?;
        Ok(())
    }

    fn read(r: &mut AbiReader<'_>) -> Result<Self> {
        Ok(Self {
            payer_public_address: r.get_string("payer_public_address")?,
            payee_public_address: r.get_string("payee_public_address")?,
            amount: r.get_string("amount")?,
            chain_code: r.get_string("chain_code")?,
            token_code: r.get_string("token_code")?,
            status: r.get_string("status")?,
            obt_id: r.get_string("obt_id")?,
            memo: r.get_optional_string("memo")?,
            hash: r.get_optional_string("hash")?,
            offline_url: r.get_optional_string("offline_url")?,
        })
    }
}

/// A decoded payload tagged with its variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ObtContent {
    FundsRequest(FundsRequest),
    ObtRecord(ObtRecord),
}

impl ObtContent {
    pub fn content_type(&self) -> ContentType {
        match self {
            ObtContent::FundsRequest(_) => ContentType::NewFundsContent,
            ObtContent::ObtRecord(_) => ContentType::RecordObtDataContent,
        }
    }

    pub fn to_abi_bytes(&self) -> Result<Vec<u8>> {
        match self {
            ObtContent::FundsRequest(c) => c.to_abi_bytes(),
            ObtContent::ObtRecord(c) => c.to_abi_bytes(),
        }
    }

    /// Decode `bytes` as the schema named by `content_type`.
    pub fn from_abi_bytes(content_type: ContentType, bytes: &[u8]) -> Result<Self> {
        match content_type {
            ContentType::NewFundsContent => FundsRequest::from_abi_bytes(bytes).map(Self::from),
            ContentType::RecordObtDataContent => ObtRecord::from_abi_bytes(bytes).map(Self::from),
        }
    }

    /// Parse a JSON object as the schema named by `content_type`.
    pub fn from_json(content_type: ContentType, json: &str) -> Result<Self> {
        let parsed = match content_type {
            ContentType::NewFundsContent => serde_json::from_str(json).map(ObtContent::FundsRequest),
            ContentType::RecordObtDataContent => serde_json::from_str(json).map(ObtContent::ObtRecord),
        };
        parsed.map_err(|e| ObtError::Serialization(format!("invalid {content_type} json: {e}")))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ObtError::Serialization(e.to_string()))
    }
}

impl From<FundsRequest> for ObtContent {
    fn from(c: FundsRequest) -> Self {
        ObtContent::FundsRequest(c)
    }
}

impl From<ObtRecord> for ObtContent {
    fn from(c: ObtRecord) -> Self {
        ObtContent::ObtRecord(c)
    }
}
