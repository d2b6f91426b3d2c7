//! Query-string signing for `GET` and `DELETE` calls.

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::ClientSecret,
	error::SigningError,
	sign::{NONCE_KEY, Nonce, SIGNATURE_KEY, hmac_hex},
};

/// Query signing input; the map keeps keys in UTF-8 byte order.
pub type QueryInput = BTreeMap<String, String>;

/// Query parameters carrying the caller's inputs plus `nonce` and `sig`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedQuery {
	params: Vec<(String, String)>,
	nonce: Nonce,
	signature: String,
}
impl SignedQuery {
	/// Value for `key`, including `nonce` and `sig`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
	}

	/// Nonce that was signed.
	pub fn nonce(&self) -> &Nonce {
		&self.nonce
	}

	/// Lowercase hex signature.
	pub fn signature(&self) -> &str {
		&self.signature
	}

	/// Form-encoded string the signature was computed over (every parameter except `sig`).
	pub fn canonical(&self) -> String {
		encode_pairs(self.params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
	}

	/// Iterates parameters in wire order: sorted inputs and nonce, then `sig`.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.params
			.iter()
			.map(|(k, v)| (k.as_str(), v.as_str()))
			.chain([(SIGNATURE_KEY, self.signature.as_str())])
	}

	/// Owned parameter pairs in wire order.
	pub fn to_pairs(&self) -> Vec<(String, String)> {
		self.iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect()
	}

	/// Number of parameters including `nonce` and `sig`.
	pub fn len(&self) -> usize {
		self.params.len() + 1
	}

	/// Always `false`; a signed query carries at least `nonce` and `sig`.
	pub fn is_empty(&self) -> bool {
		false
	}
}

/// Converts a JSON object into [`QueryInput`], rejecting non-string values.
pub fn query_input_from_json(input: &Map<String, Value>) -> Result<QueryInput, SigningError> {
	input
		.iter()
		.map(|(key, value)| match value {
			Value::String(value) => Ok((key.clone(), value.clone())),
			_ => Err(SigningError::NonStringValue { key: key.clone() }),
		})
		.collect()
}

/// Signs `input` for use as query parameters.
///
/// A caller-supplied `nonce` or `sig` entry in `input` is discarded. When `nonce` is `None` the
/// current time in milliseconds is used.
pub fn sign_query(
	mut input: QueryInput,
	secret: &ClientSecret,
	nonce: Option<Nonce>,
) -> Result<SignedQuery> {
	let nonce = nonce.unwrap_or_else(Nonce::now);

	input.remove(SIGNATURE_KEY);
	input.insert(NONCE_KEY.into(), nonce.as_str().to_owned());

	let params = input.into_iter().collect::<Vec<_>>();
	let canonical = encode_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
	let signature = hmac_hex(secret, canonical.as_bytes())?;

	Ok(SignedQuery { params, nonce, signature })
}

fn encode_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
	form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::sign::now_millis;

	fn input(pairs: &[(&str, &str)]) -> QueryInput {
		pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
	}

	#[test]
	fn signature_matches_known_vector() {
		let signed = sign_query(
			input(&[("userID", "user.42"), ("role", "YWRtaW4="), ("encoded", "true")]),
			&ClientSecret::new("shh"),
			Some(Nonce::new("1700000000000")),
		)
		.expect("Signing should succeed.");

		assert_eq!(
			signed.canonical(),
			"encoded=true&nonce=1700000000000&role=YWRtaW4%3D&userID=user.42"
		);
		assert_eq!(
			signed.signature(),
			"091058b8ae3454714df034c4e468cd60ed3217b06b0aee4f1ee7b2dfffd20e8a"
		);
		assert_eq!(signed.iter().last(), Some(("sig", signed.signature())));
	}

	#[test]
	fn reserved_characters_are_form_encoded() {
		let signed = sign_query(
			input(&[("wallet", "0x1 2&b")]),
			&ClientSecret::new("shh"),
			Some(Nonce::new("5")),
		)
		.expect("Signing should succeed.");

		assert_eq!(signed.canonical(), "nonce=5&wallet=0x1+2%26b");
		assert_eq!(
			signed.signature(),
			"a5b208793ac7b3c0922507adf7a7e26b37beb49a995048db2c944258199c0dc0"
		);
	}

	#[test]
	fn caller_nonce_and_sig_are_replaced() {
		let secret = ClientSecret::new("shh");
		let signed = sign_query(
			input(&[("nonce", "attacker"), ("sig", "forged"), ("a", "1")]),
			&secret,
			Some(Nonce::new("42")),
		)
		.expect("Signing should succeed.");

		assert_eq!(signed.len(), 3);
		assert_eq!(signed.iter().filter(|(k, _)| *k == "nonce").count(), 1);
		assert_eq!(signed.iter().filter(|(k, _)| *k == "sig").count(), 1);
		assert_eq!(signed.get("nonce"), Some("42"));
		assert_eq!(
			signed.get("sig"),
			Some(hmac_hex(&secret, b"a=1&nonce=42").expect("HMAC should succeed.").as_str())
		);
	}

	#[test]
	fn empty_input_signs_nonce_only() {
		let before = now_millis();
		let signed =
			sign_query(QueryInput::new(), &ClientSecret::new("shh"), None).expect("Signing should succeed.");
		let after = now_millis();
		let nonce: i128 = signed.nonce().as_str().parse().expect("Default nonce should be numeric.");

		assert!(before <= nonce && nonce <= after);
		assert_eq!(signed.to_pairs().len(), 2);
		assert_eq!(signed.canonical(), format!("nonce={nonce}"));
	}

	#[test]
	fn insertion_order_does_not_change_signature() {
		let secret = ClientSecret::new("shh");
		let forward = [("b", "2"), ("a", "1"), ("c", "3")];
		let reversed = [("c", "3"), ("a", "1"), ("b", "2")];
		let lhs = sign_query(input(&forward), &secret, Some(Nonce::new("9"))).expect("Signing should succeed.");
		let rhs = sign_query(input(&reversed), &secret, Some(Nonce::new("9"))).expect("Signing should succeed.");

		assert_eq!(lhs, rhs);
	}

	#[test]
	fn json_inputs_must_be_strings() {
		let ok = serde_json::json!({ "role": "admin", "encoded": "true" });
		let bad = serde_json::json!({ "quantity": 3 });

		assert_eq!(
			query_input_from_json(ok.as_object().expect("Fixture is an object.")).expect("Strings are accepted.").len(),
			2
		);
		assert!(matches!(
			query_input_from_json(bad.as_object().expect("Fixture is an object.")),
			Err(SigningError::NonStringValue { key }) if key == "quantity"
		));
	}
}
