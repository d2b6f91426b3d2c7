//! JSON body signing for `POST`, `PUT`, and `PATCH` calls.

// self
use crate::{
	_prelude::*,
	auth::ClientSecret,
	error::SigningError,
	sign::{NONCE_KEY, Nonce, SIGNATURE_KEY, hmac_hex},
};

/// JSON payload carrying the caller's inputs in insertion order, then `nonce`, then `sig`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SignedBody(Map<String, Value>);
impl SignedBody {
	/// Value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Nonce that was signed.
	pub fn nonce(&self) -> Option<&str> {
		self.0.get(NONCE_KEY).and_then(Value::as_str)
	}

	/// Lowercase hex signature.
	pub fn signature(&self) -> Option<&str> {
		self.0.get(SIGNATURE_KEY).and_then(Value::as_str)
	}

	/// Borrows the payload.
	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}

	/// Converts the payload into a JSON value.
	pub fn into_value(self) -> Value {
		Value::Object(self.0)
	}
}

/// Signs `input` as a JSON request body.
///
/// Caller-supplied `nonce` and `sig` entries are dropped. The digest covers the compact JSON of the
/// top-level key-sorted object; the payload itself is returned unsorted.
pub fn sign_body(
	input: Map<String, Value>,
	secret: &ClientSecret,
	nonce: Option<Nonce>,
) -> Result<SignedBody> {
	let nonce = nonce.unwrap_or_else(Nonce::now);
	let mut payload = input
		.into_iter()
		.filter(|(key, _)| key != NONCE_KEY && key != SIGNATURE_KEY)
		.collect::<Map<_, _>>();

	payload.insert(NONCE_KEY.into(), Value::String(nonce.into()));

	let canonical = canonical_json(&payload)?;
	let signature = hmac_hex(secret, canonical.as_bytes())?;

	payload.insert(SIGNATURE_KEY.into(), Value::String(signature));

	Ok(SignedBody(payload))
}

/// Compact JSON of `map` with its top-level keys sorted; nested objects keep their own order.
///
/// Numbers are rendered the way the platform's JSON encoder prints them: integral floats lose
/// their fraction (`1.0` becomes `1`) and magnitudes from `1e21` or below `1e-6` use exponent
/// notation with an explicit sign (`1e+21`, `1e-7`).
pub fn canonical_json(map: &Map<String, Value>) -> Result<String, SigningError> {
	let mut out = String::new();

	write_object(&mut out, map.iter().collect::<BTreeMap<_, _>>())?;

	Ok(out)
}

fn write_value(out: &mut String, value: &Value) -> Result<(), SigningError> {
	match value {
		Value::Number(number) => out.push_str(&js_number(number)),
		Value::Array(items) => {
			out.push('[');

			for (i, item) in items.iter().enumerate() {
				if i > 0 {
					out.push(',');
				}

				write_value(out, item)?;
			}

			out.push(']');
		},
		Value::Object(map) => write_object(out, map)?,
		scalar => out.push_str(&serde_json::to_string(scalar)?),
	}

	Ok(())
}

fn write_object<'a, I>(out: &mut String, entries: I) -> Result<(), SigningError>
where
	I: IntoIterator<Item = (&'a String, &'a Value)>,
{
	out.push('{');

	for (i, (key, value)) in entries.into_iter().enumerate() {
		if i > 0 {
			out.push(',');
		}

		out.push_str(&serde_json::to_string(key)?);
		out.push(':');
		write_value(out, value)?;
	}

	out.push('}');

	Ok(())
}

fn js_number(number: &serde_json::Number) -> String {
	if let Some(int) = number.as_i64() {
		int.to_string()
	} else if let Some(uint) = number.as_u64() {
		uint.to_string()
	} else {
		number.as_f64().map(js_float).unwrap_or_else(|| number.to_string())
	}
}

// Shortest round-trip digits laid out per ECMAScript `Number::toString`.
fn js_float(value: f64) -> String {
	if value == 0.0 {
		return "0".into();
	}

	let sci = format!("{:e}", value.abs());
	let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
	let digits = mantissa.replace('.', "");
	let k = digits.len() as i32;
	let n = exponent.parse::<i32>().unwrap_or(0) + 1;
	let body = if k <= n && n <= 21 {
		format!("{digits}{}", "0".repeat((n - k) as usize))
	} else if 0 < n && n <= 21 {
		format!("{}.{}", &digits[..n as usize], &digits[n as usize..])
	} else if -6 < n && n <= 0 {
		format!("0.{}{digits}", "0".repeat(-n as usize))
	} else {
		let e = n - 1;
		let sign = if e < 0 { '-' } else { '+' };
		let (lead, rest) = digits.split_at(1);

		if rest.is_empty() {
			format!("{lead}e{sign}{}", e.abs())
		} else {
			format!("{lead}.{rest}e{sign}{}", e.abs())
		}
	};

	if value.is_sign_negative() { format!("-{body}") } else { body }
}
