//! Agent tool boundary: untyped JSON parameters in, text plus details out.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::deploy::Deployer;
use crate::error::DeployError;
use crate::metadata::MetadataPublisher;
use crate::rpc::SolanaRpc;
use crate::types::{DeployRequest, SocialLinks};

/// Parameters accepted by the deploy tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeployToolParams {
    pub name: String,
    pub ticker: String,
    pub description: String,
    pub private_key: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub telegram: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl DeployToolParams {
    pub fn from_value(params: Value) -> Result<Self, DeployError> {
        serde_json::from_value(params).map_err(|e| DeployError::InvalidRequest(e.to_string()))
    }

    /// Empty optional strings count as absent.
    pub fn into_request(self) -> DeployRequest {
        let socials = SocialLinks {
            twitter: non_empty(self.twitter),
            telegram: non_empty(self.telegram),
            website: non_empty(self.website),
        };
        let request =
            DeployRequest::new(self.name, &self.ticker, self.description, self.private_key)
                .with_socials(socials);

        match non_empty(self.image_url) {
            Some(url) => request.with_image_url(url),
            None => request,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// What the tool hands back to the agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResponse {
    pub content: Vec<ToolContent>,
    pub details: Value,
}

impl ToolResponse {
    fn text(text: String, details: Value) -> Self {
        Self {
            content: vec![ToolContent::Text { text }],
            details,
        }
    }

    fn failure(error: &DeployError) -> Self {
        Self::text(
            format!("❌ Deploy failed: {error}"),
            json!({ "error": error.to_string(), "code": error.code() }),
        )
    }

    pub fn is_error(&self) -> bool {
        self.details.get("error").is_some()
    }

    /// First text block, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|c| match c {
            ToolContent::Text { text } => text.as_str(),
        })
    }
}

/// Run one deployment from raw tool parameters. Never fails; errors become
/// a failure response.
pub async fn execute_deploy_tool<R, M>(deployer: &Deployer<R, M>, params: Value) -> ToolResponse
where
    R: SolanaRpc,
    M: MetadataPublisher,
{
    let request = match DeployToolParams::from_value(params) {
        Ok(params) => params.into_request(),
        Err(e) => return ToolResponse::failure(&e),
    };

    match deployer.deploy(&request).await {
        Ok(result) => {
            let text = format!(
                "✅ Token deployed!\n\n🪙 {} (${})\n📍 {}\n🔗 {}\n📝 TX: {}",
                request.name,
                request.ticker,
                result.token_address,
                result.pump_fun_url,
                result.tx_signature,
            );
            let details = serde_json::to_value(&result).unwrap_or(Value::Null);
            ToolResponse::text(text, details)
        }
        Err(e) => {
            tracing::warn!(code = e.code(), error = %e, "deploy failed");
            ToolResponse::failure(&e)
        }
    }
}
