//! Configurable identity mapper for JSON token responses.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::IdentityProfile,
	exchange::TokenResponse,
	provider::{EmailPolicy, IdentityMapper, MappingError},
};

/// Location of each profile attribute inside the token response.
///
/// Values starting with `/` are JSON pointers (`/response/0/id`); anything else is a
/// top-level key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileFields {
	/// Account identifier location.
	pub id: String,
	/// Email address location.
	pub email: String,
	/// Username location.
	pub username: Option<String>,
	/// Given name location.
	pub first_name: Option<String>,
	/// Family name location.
	pub last_name: Option<String>,
	/// Extra display attributes (attribute name to location).
	pub attributes: BTreeMap<String, String>,
}
impl Default for ProfileFields {
	fn default() -> Self {
		Self {
			id: "id".into(),
			email: "email".into(),
			username: Some("username".into()),
			first_name: Some("first_name".into()),
			last_name: Some("last_name".into()),
			attributes: BTreeMap::new(),
		}
	}
}

/// Default [`IdentityMapper`] reading profile attributes from a JSON token response.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonIdentityMapper {
	/// Provider kind label.
	pub kind: Option<String>,
	/// Attribute locations.
	pub fields: ProfileFields,
	/// Email policy applied after extraction.
	pub email_policy: EmailPolicy,
}
impl JsonIdentityMapper {
	/// Creates a mapper with the provided field layout and email policy.
	pub fn new(fields: ProfileFields, email_policy: EmailPolicy) -> Self {
		Self { kind: None, fields, email_policy }
	}

	/// Sets the provider kind label.
	pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
		self.kind = Some(kind.into());

		self
	}
}
impl IdentityMapper for JsonIdentityMapper {
	fn map_identity(&self, response: &TokenResponse) -> Result<IdentityProfile, MappingError> {
		let document = parse_document(response.as_str())?;

		if !document.is_object() {
			return Err(MappingError::UnexpectedShape {
				message: "expected a JSON object at the top level".into(),
			});
		}

		let Some(id) = scalar(&document, &self.fields.id) else {
			return Err(provider_error(&document).unwrap_or(MappingError::MissingAccountId));
		};
		let email = self.email_policy.resolve(scalar(&document, &self.fields.email).as_deref(), &id)?;
		let optional =
			|location: &Option<String>| location.as_deref().and_then(|loc| scalar(&document, loc));
		let attributes = self
			.fields
			.attributes
			.iter()
			.filter_map(|(name, location)| Some((name.clone(), scalar(&document, location)?)))
			.collect();

		Ok(IdentityProfile {
			email,
			username: optional(&self.fields.username),
			first_name: optional(&self.fields.first_name),
			last_name: optional(&self.fields.last_name),
			attributes,
			token: None,
			id,
		})
	}

	fn kind(&self) -> &str {
		self.kind.as_deref().unwrap_or("json")
	}
}

fn parse_document(raw: &str) -> Result<Value, MappingError> {
	let mut deserializer = serde_json::Deserializer::from_str(raw);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| MappingError::MalformedResponse { source })
}

fn lookup<'a>(document: &'a Value, location: &str) -> Option<&'a Value> {
	if location.starts_with('/') { document.pointer(location) } else { document.get(location) }
}

/// Reads a scalar attribute; missing, null, blank, and structured values count as absent.
fn scalar(document: &Value, location: &str) -> Option<String> {
	match lookup(document, location)? {
		Value::String(value) => Some(value.trim()).filter(|v| !v.is_empty()).map(str::to_owned),
		Value::Number(value) => Some(value.to_string()),
		_ => None,
	}
}

fn provider_error(document: &Value) -> Option<MappingError> {
	let error = match document.get("error")? {
		Value::String(code) => code.clone(),
		Value::Object(inner) => inner
			.get("error_msg")
			.or_else(|| inner.get("error_code"))
			.map(|value| value.as_str().map(str::to_owned).unwrap_or_else(|| value.to_string()))?,
		_ => return None,
	};
	let description =
		document.get("error_description").and_then(Value::as_str).map(str::to_owned);

	Some(MappingError::ProviderError { error, description })
}
