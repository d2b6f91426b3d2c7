//! Validated bearer tokens and the deferred wallet-address lookup attached to them.

// self
use crate::{
	_prelude::*,
	auth::{DecodedClaims, is_user_subject},
};

/// Boxed future returned by [`UserLookup::wallet_for_user`].
pub type LookupFuture<'a> = Pin<Box<dyn Future<Output = Result<Option<String>>> + 'a + Send>>;

/// Collaborator able to map a platform user handle onto the user's wallet address.
///
/// The users resource caller implements this by issuing a `get_user_by_id` request; tests
/// substitute in-memory fakes.
pub trait UserLookup
where
	Self: Send + Sync,
{
	/// Resolves the wallet for `user_id`; `Ok(None)` when the user has none.
	fn wallet_for_user<'a>(&'a self, user_id: &'a str) -> LookupFuture<'a>;
}

/// Restartable wallet accessor captured from a token subject.
///
/// Every call to [`WalletResolver::resolve`] performs a fresh lookup; nothing is cached.
#[derive(Clone)]
pub struct WalletResolver {
	subject: String,
	lookup: Arc<dyn UserLookup>,
}
impl WalletResolver {
	/// Creates a resolver for `subject` backed by `lookup`.
	pub fn new(subject: impl Into<String>, lookup: Arc<dyn UserLookup>) -> Self {
		Self { subject: subject.into(), lookup }
	}

	/// Subject the resolver was captured from.
	pub fn subject(&self) -> &str {
		&self.subject
	}

	/// Resolves the wallet address.
	///
	/// User-handle subjects trigger a lookup whose failure is returned as an error; any other
	/// subject already is the wallet address.
	pub async fn resolve(&self) -> Result<Option<String>> {
		if is_user_subject(&self.subject) {
			self.lookup.wallet_for_user(&self.subject).await
		} else {
			Ok(Some(self.subject.clone()))
		}
	}
}
impl Debug for WalletResolver {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("WalletResolver").field("subject", &self.subject).finish_non_exhaustive()
	}
}

/// Token confirmed by the platform and decoded into its claims.
#[derive(Clone, Debug)]
pub struct ValidatedToken {
	/// Decoded claims payload.
	pub claims: DecodedClaims,
	/// User handle, when the subject is one.
	pub user_id: Option<String>,
	/// Wallet address, when the subject is one.
	pub wallet: Option<String>,
	resolver: WalletResolver,
}
impl ValidatedToken {
	/// Builds the record from decoded claims, wiring `lookup` into the wallet resolver.
	pub fn from_claims(claims: DecodedClaims, lookup: Arc<dyn UserLookup>) -> Self {
		let (user_id, wallet) = if claims.subject_is_user_id() {
			(Some(claims.subject.clone()), None)
		} else {
			(None, Some(claims.subject.clone()))
		};
		let resolver = WalletResolver::new(claims.subject.clone(), lookup);

		Self { claims, user_id, wallet, resolver }
	}

	/// Returns `true` when the subject is a platform user handle.
	pub fn subject_is_user_id(&self) -> bool {
		self.claims.subject_is_user_id()
	}

	/// Application the token was issued for.
	pub fn client_id(&self) -> &str {
		&self.claims.client_id
	}

	/// Clones the wallet resolver so it can outlive this record.
	pub fn wallet_resolver(&self) -> WalletResolver {
		self.resolver.clone()
	}

	/// Resolves the wallet address, re-querying the platform on every call for user subjects.
	pub async fn wallet_address(&self) -> Result<Option<String>> {
		self.resolver.resolve().await
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;

	#[derive(Default)]
	struct CountingLookup {
		calls: AtomicUsize,
	}
	impl UserLookup for CountingLookup {
		fn wallet_for_user<'a>(&'a self, user_id: &'a str) -> LookupFuture<'a> {
			Box::pin(async move {
				self.calls.fetch_add(1, Ordering::SeqCst);

				Ok(Some(format!("0xwallet-of-{user_id}")))
			})
		}
	}

	fn claims(subject: &str) -> DecodedClaims {
		serde_json::from_value(serde_json::json!({ "sub": subject, "client_id": "c1" }))
			.expect("Claims fixture should deserialize.")
	}

	#[tokio::test]
	async fn user_subjects_query_on_every_resolve() {
		let lookup = Arc::new(CountingLookup::default());
		let token = ValidatedToken::from_claims(claims("user.42"), lookup.clone());

		assert_eq!(token.user_id.as_deref(), Some("user.42"));
		assert!(token.wallet.is_none());
		assert_eq!(
			token.wallet_address().await.ok().flatten().as_deref(),
			Some("0xwallet-of-user.42")
		);
		assert_eq!(
			token.wallet_resolver().resolve().await.ok().flatten().as_deref(),
			Some("0xwallet-of-user.42")
		);
		assert_eq!(lookup.calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn wallet_subjects_resolve_without_lookup() {
		let lookup = Arc::new(CountingLookup::default());
		let token = ValidatedToken::from_claims(claims("0xABC"), lookup.clone());

		assert!(!token.subject_is_user_id());
		assert_eq!(token.wallet.as_deref(), Some("0xABC"));
		assert_eq!(token.wallet_address().await.ok().flatten().as_deref(), Some("0xABC"));
		assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
	}

	struct FailingLookup;
	impl UserLookup for FailingLookup {
		fn wallet_for_user<'a>(&'a self, user_id: &'a str) -> LookupFuture<'a> {
			Box::pin(async move {
				Err(Error::WalletLookup { user_id: user_id.to_owned(), reason: "db down".into() })
			})
		}
	}

	#[tokio::test]
	async fn lookup_failures_are_not_reported_as_missing_wallets() {
		let token = ValidatedToken::from_claims(claims("user.7"), Arc::new(FailingLookup));
		let err = token.wallet_address().await.expect_err("Lookup failures must propagate.");

		assert!(matches!(
			err,
			Error::WalletLookup { ref user_id, ref reason } if user_id == "user.7" && reason == "db down"
		));
	}
}
