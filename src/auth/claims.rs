//! Compact bearer-token claims decoding.
//!
//! Decoding is purely structural: it splits the token, base64-decodes the claims segment,
//! and parses the JSON payload. Cryptographic validity is established by the platform's
//! validation endpoint before callers ever see a [`DecodedClaims`] value.

// crates.io
use base64::{
	Engine,
	alphabet,
	engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
// self
use crate::_prelude::*;

/// Prefix that marks a subject as a platform user handle rather than a wallet address.
pub const USER_SUBJECT_PREFIX: &str = "user.";

// Standard alphabet; padding is optional because compact tokens usually strip it.
const CLAIMS_ENGINE: GeneralPurpose = GeneralPurpose::new(
	&alphabet::STANDARD,
	GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims carried in the middle segment of a compact token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedClaims {
	/// Token issuer (`iss`).
	#[serde(rename = "iss", default)]
	pub issuer: String,
	/// Subject (`sub`): either a user handle or a wallet address.
	#[serde(rename = "sub")]
	pub subject: String,
	/// Application the token was issued for.
	#[serde(default)]
	pub client_id: String,
	/// Issued-at instant in seconds since the epoch (`iat`).
	#[serde(rename = "iat", default)]
	pub issued_at: i64,
	/// Expiry instant in seconds since the epoch (`exp`).
	#[serde(rename = "exp", default)]
	pub expires_at: i64,
	/// Token type, e.g. `access`.
	#[serde(rename = "type", default)]
	pub token_type: String,
	/// Audience (`aud`); a bare string is accepted as a single entry.
	#[serde(rename = "aud", default, deserialize_with = "deserialize_audience")]
	pub audience: Vec<String>,
	/// Kind of wallet that authenticated, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub wallet_type: Option<String>,
	/// Token identifier (`jti`), when reported.
	#[serde(rename = "jti", default, skip_serializing_if = "Option::is_none")]
	pub token_id: Option<String>,
	/// Session identifier (`sid`), when reported.
	#[serde(rename = "sid", default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
}
impl DecodedClaims {
	/// Returns `true` when the subject is a platform user handle.
	pub fn subject_is_user_id(&self) -> bool {
		is_user_subject(&self.subject)
	}

	/// Issued-at instant, when it is representable.
	pub fn issued_at_time(&self) -> Option<OffsetDateTime> {
		OffsetDateTime::from_unix_timestamp(self.issued_at).ok()
	}

	/// Expiry instant, when it is representable.
	pub fn expires_at_time(&self) -> Option<OffsetDateTime> {
		OffsetDateTime::from_unix_timestamp(self.expires_at).ok()
	}
}

/// Returns `true` when `subject` starts with [`USER_SUBJECT_PREFIX`].
pub fn is_user_subject(subject: &str) -> bool {
	subject.starts_with(USER_SUBJECT_PREFIX)
}

/// Returns the claims segment (index 1) of a dot-delimited token.
pub fn claims_segment(token: &str) -> Result<&str> {
	token.split('.').nth(1).filter(|segment| !segment.is_empty()).ok_or_else(|| {
		Error::MalformedToken { reason: "token has no claims segment".into() }
	})
}

/// Decodes the claims segment of `token` without verifying its signature.
pub fn decode_claims(token: &str) -> Result<DecodedClaims> {
	let segment = claims_segment(token)?;
	let bytes = CLAIMS_ENGINE.decode(segment).map_err(|e| Error::MalformedToken {
		reason: format!("claims segment is not valid base64: {e}"),
	})?;
	let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|e| Error::MalformedToken { reason: format!("claims are not valid JSON: {e}") })
}

fn deserialize_audience<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Audience {
		One(String),
		Many(Vec<String>),
	}

	Ok(match Option::<Audience>::deserialize(deserializer)? {
		Some(Audience::One(value)) => vec![value],
		Some(Audience::Many(values)) => values,
		None => Vec::new(),
	})
}
