// E-mail verification, name parsing and phone validation

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::args::parse_args;
use crate::tools::envelope::respond;
use crate::tools::{
    json_schema_any_object, json_schema_array, json_schema_object, json_schema_string, Tool,
    ToolCategory,
};
use anyhow::Result;
use locintel_sdk::LocintelClient;
use serde::Deserialize;
use serde_json::{json, Map, Value};

pub struct VerifyEmailTool {
    client: LocintelClient,
}

impl VerifyEmailTool {
    pub fn new(client: LocintelClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct EmailArgs {
    email: String,
}

#[async_trait::async_trait]
impl Tool for VerifyEmailTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "verify_email".to_string(),
            description: "Verify single email. Example: {'email': 'john.doe@company.com'}".to_string(),
            input_schema: json_schema_object(
                json!({"email": json_schema_string("E-mail address")}),
                vec!["email"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: EmailArgs = parse_args("verify_email", arguments)?;
        Ok(respond(self.client.emails().verify(&args.email).await))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Identity
    }
}

pub struct VerifyBatchEmailsTool {
    client: LocintelClient,
}

impl VerifyBatchEmailsTool {
    pub fn new(client: LocintelClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct BatchEmailArgs {
    emails: Vec<Value>,
}

#[async_trait::async_trait]
impl Tool for VerifyBatchEmailsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "verify_batch_emails".to_string(),
            description: "Verify multiple emails (max 10). Example: {'emails': [{'id': '1', 'email': 'john@company.com'}, {'id': '2', 'email': 'jane@company.com'}]}".to_string(),
            input_schema: json_schema_object(
                json!({
                    "emails": json_schema_array(
                        json!({}),
                        "Up to 10 entries, plain strings or {'email'} objects"
                    )
                }),
                vec!["emails"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: BatchEmailArgs = parse_args("verify_batch_emails", arguments)?;
        Ok(respond(self.client.emails().verify_batch(&args.emails).await))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Identity
    }
}

/// The name, phone and phone-batch tools all forward a `data` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataObjectKind {
    ParseName,
    ValidatePhone,
    ValidateBatchPhones,
}

impl DataObjectKind {
    pub const ALL: [DataObjectKind; 3] = [
        DataObjectKind::ParseName,
        DataObjectKind::ValidatePhone,
        DataObjectKind::ValidateBatchPhones,
    ];

    fn tool_name(&self) -> &'static str {
        match self {
            DataObjectKind::ParseName => "parse_name",
            DataObjectKind::ValidatePhone => "validate_phone",
            DataObjectKind::ValidateBatchPhones => "validate_batch_phones",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            DataObjectKind::ParseName => "Parse name into components. Example: {'data': {'name': 'John Robert Smith'}}",
            DataObjectKind::ValidatePhone => "Validate phone number. Example: {'data': {'phoneNumber': '4144654885', 'country': 'US'}}",
            DataObjectKind::ValidateBatchPhones => "Validate multiple phones (max 10). Example: {'data': {'phoneNumbers': [{'id': '1', 'phoneNumber': '3035551234', 'country': 'US'}, {'id': '2', 'phoneNumber': '7205559999', 'country': 'US'}]}}",
        }
    }
}

pub struct DataObjectTool {
    client: LocintelClient,
    kind: DataObjectKind,
}

impl DataObjectTool {
    pub fn new(client: LocintelClient, kind: DataObjectKind) -> Self {
        Self { client, kind }
    }
}

#[derive(Debug, Deserialize)]
struct DataArgs {
    data: Map<String, Value>,
}

#[async_trait::async_trait]
impl Tool for DataObjectTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.kind.tool_name().to_string(),
            description: self.kind.description().to_string(),
            input_schema: json_schema_object(
                json!({"data": json_schema_any_object("Request body passed to the vendor")}),
                vec!["data"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: DataArgs = parse_args(self.kind.tool_name(), arguments)?;
        let data = Value::Object(args.data);

        let result = match self.kind {
            DataObjectKind::ParseName => self.client.names().parse(data).await,
            DataObjectKind::ValidatePhone => self.client.phones().validate(data).await,
            DataObjectKind::ValidateBatchPhones => self.client.phones().validate_batch(data).await,
        };
        Ok(respond(result))
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::Identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{envelope_of, test_client};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_verify_email_rejects_malformed_address() {
        let server = MockServer::start().await;
        let tool = VerifyEmailTool::new(test_client(&server));
        let result = tool.execute(json!({"email": "not-an-email"})).await.unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            envelope_of(&result).error.as_deref(),
            Some("invalid email address: 'not-an-email'")
        );
    }

    #[tokio::test]
    async fn test_batch_emails_are_coerced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/emails/verify/batch"))
            .and(body_json(json!({"emails": [
                {"email": "john@company.com"},
                {"id": "2", "email": "jane@company.com"}
            ]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"responses": []})))
            .expect(1)
            .mount(&server)
            .await;

        let tool = VerifyBatchEmailsTool::new(test_client(&server));
        let result = tool
            .execute(json!({"emails": ["john@company.com", {"id": "2", "email": "jane@company.com"}]}))
            .await
            .unwrap();
        assert!(envelope_of(&result).success);
    }

    #[tokio::test]
    async fn test_parse_name_forwards_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/names/parse"))
            .and(body_json(json!({"name": "John Robert Smith"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": {"firstName": "John", "middleName": "Robert", "lastName": "Smith"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = DataObjectTool::new(test_client(&server), DataObjectKind::ParseName);
        let result = tool
            .execute(json!({"data": {"name": "John Robert Smith"}}))
            .await
            .unwrap();
        assert_eq!(envelope_of(&result).data.unwrap()["name"]["lastName"], "Smith");
    }

    #[tokio::test]
    async fn test_phone_batch_needs_array() {
        let server = MockServer::start().await;
        let tool = DataObjectTool::new(test_client(&server), DataObjectKind::ValidateBatchPhones);
        let result = tool
            .execute(json!({"data": {"phoneNumber": "3035551234"}}))
            .await
            .unwrap();
        assert_eq!(
            envelope_of(&result).error.as_deref(),
            Some("Invalid input: 'phoneNumbers' must be an array")
        );
    }
}
