//! E-mail verification endpoints.

use crate::client::LocintelClient;
use crate::error::{LocintelError, LocintelResult};
use locintel_core::validate::{validate_batch, validate_email, MAX_BATCH_SIZE};
use serde_json::{json, Value};
use tracing::warn;

/// E-mail verification API.
pub struct EmailsApi<'a> {
    client: &'a LocintelClient,
}

impl<'a> EmailsApi<'a> {
    pub(crate) fn new(client: &'a LocintelClient) -> Self {
        Self { client }
    }

    pub async fn verify(&self, email: &str) -> LocintelResult<Value> {
        let email = validate_email(email)?;
        self.client
            .http
            .post_json("/v1/emails/verify", &json!({ "email": email }))
            .await
    }

    /// Verify up to ten addresses. Entries may be plain strings or objects; see
    /// [`coerce_email_entries`].
    pub async fn verify_batch(&self, entries: &[Value]) -> LocintelResult<Value> {
        validate_batch("emails", entries.len(), MAX_BATCH_SIZE)?;
        let emails = coerce_email_entries(entries);
        if emails.is_empty() {
            return Err(LocintelError::InvalidInput(
                "no usable email addresses in batch".to_string(),
            ));
        }
        self.client
            .http
            .post_json("/v1/emails/verify/batch", &json!({ "emails": emails }))
            .await
    }
}

/// Normalize batch entries to `{"email": ..}` objects.
///
/// Strings are wrapped. Objects that already carry `email` pass through untouched, other
/// objects contribute the first value whose key mentions "email" or that looks like an
/// address. Anything else is dropped with a warning.
pub fn coerce_email_entries(entries: &[Value]) -> Vec<Value> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(email) => Some(json!({ "email": email })),
            Value::Object(map) if map.contains_key("email") => Some(entry.clone()),
            Value::Object(map) => {
                let found = map.iter().find_map(|(key, value)| {
                    let text = value.as_str()?;
                    (key.to_ascii_lowercase().contains("email") || text.contains('@'))
                        .then(|| text.to_string())
                });
                if found.is_none() {
                    warn!(entry = %entry, "Could not extract email from batch entry");
                }
                found.map(|email| json!({ "email": email }))
            }
            other => {
                warn!(entry = %other, "Skipping batch entry that is neither string nor object");
                None
            }
        })
        .collect()
}
