//! Email policy applied to mapped profiles.

// self
use crate::{_prelude::*, provider::MappingError};

/// Email acquisition and domain policy applied by identity mappers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailPolicy {
	/// Fails the login when no email can be obtained.
	pub required: bool,
	/// Allowed email domains, compared case-insensitively. Empty allows every domain.
	pub allowed_domains: Vec<String>,
	/// Domain used to synthesize `<account id>@<domain>` when the provider sent no email.
	pub default_domain: Option<String>,
}
impl EmailPolicy {
	/// Restricts accepted addresses to the provided domains.
	pub fn allow_domains<I, S>(mut self, domains: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.allowed_domains = domains.into_iter().map(Into::into).collect();

		self
	}

	/// Synthesizes addresses in the provided domain when the provider omits one.
	pub fn with_default_domain(mut self, domain: impl Into<String>) -> Self {
		self.default_domain = Some(domain.into());

		self
	}

	/// Toggles whether an email address is mandatory.
	pub fn required(mut self, required: bool) -> Self {
		self.required = required;

		self
	}

	/// Resolves the final email address for an account.
	///
	/// Candidates that do not look like an address are treated as absent.
	pub fn resolve(
		&self,
		candidate: Option<&str>,
		account_id: &str,
	) -> Result<Option<String>, MappingError> {
		let email = match candidate.map(str::trim).filter(|value| is_address(value)) {
			Some(value) => value.to_owned(),
			None => match self.default_domain.as_deref().map(str::trim) {
				Some(domain) if !domain.is_empty() => format!("{account_id}@{domain}"),
				_ if self.required => return Err(MappingError::MissingEmail),
				_ => return Ok(None),
			},
		};

		self.check_domain(&email)?;

		Ok(Some(email))
	}

	fn check_domain(&self, email: &str) -> Result<(), MappingError> {
		if self.allowed_domains.is_empty() {
			return Ok(());
		}

		let domain = email.rsplit_once('@').map(|(_, domain)| domain).unwrap_or_default();

		if self.allowed_domains.iter().any(|allowed| allowed.trim().eq_ignore_ascii_case(domain)) {
			Ok(())
		} else {
			Err(MappingError::EmailDomainRejected { domain: domain.to_owned() })
		}
	}
}
impl Default for EmailPolicy {
	fn default() -> Self {
		Self { required: true, allowed_domains: Vec::new(), default_domain: None }
	}
}

fn is_address(value: &str) -> bool {
	match value.split_once('@') {
		Some((local, domain)) =>
			!local.is_empty()
				&& !domain.is_empty()
				&& !domain.contains('@')
				&& !value.chars().any(char::is_whitespace),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn required_email_must_be_present() {
		let policy = EmailPolicy::default();

		assert!(matches!(policy.resolve(None, "42"), Err(MappingError::MissingEmail)));
		assert!(matches!(policy.resolve(Some("  "), "42"), Err(MappingError::MissingEmail)));
		assert!(matches!(policy.resolve(Some("not-an-email"), "42"), Err(MappingError::MissingEmail)));
		assert_eq!(
			policy.resolve(Some(" u@example.com "), "42").expect("Valid email should resolve."),
			Some("u@example.com".into()),
		);
	}

	#[test]
	fn optional_email_may_be_absent() {
		let policy = EmailPolicy::default().required(false);

		assert_eq!(policy.resolve(None, "42").expect("Absent email should be accepted."), None);
	}

	#[test]
	fn default_domain_synthesizes_address() {
		let policy = EmailPolicy::default().with_default_domain("vk.example");

		assert_eq!(
			policy.resolve(None, "42").expect("Synthesized email should resolve."),
			Some("42@vk.example".into()),
		);
	}

	#[test]
	fn allowed_domains_reject_others_case_insensitively() {
		let policy = EmailPolicy::default().allow_domains(["Example.com"]);

		assert!(policy.resolve(Some("u@EXAMPLE.com"), "42").is_ok());

		let err = policy
			.resolve(Some("u@mail.ru"), "42")
			.expect_err("Foreign domains should be rejected.");

		assert!(matches!(err, MappingError::EmailDomainRejected { domain } if domain == "mail.ru"));
	}
}
