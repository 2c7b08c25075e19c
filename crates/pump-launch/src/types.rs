use secrecy::SecretString;
use serde::Serialize;

use chain_sol::Pubkey;

/// Strip a single leading `$` from a ticker. Case is preserved.
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.strip_prefix('$').unwrap_or(ticker).to_string()
}

/// Optional social links shown on the token page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialLinks {
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub website: Option<String>,
}

/// Input for one deployment. Immutable once built.
#[derive(Debug)]
pub struct DeployRequest {
    pub name: String,
    /// Already normalized, see [`normalize_ticker`].
    pub ticker: String,
    pub description: String,
    /// Base58 keypair or JSON byte array. Never logged.
    pub secret: SecretString,
    pub image_url: Option<String>,
    pub socials: SocialLinks,
}

impl DeployRequest {
    pub fn new(
        name: impl Into<String>,
        ticker: &str,
        description: impl Into<String>,
        secret: String,
    ) -> Self {
        Self {
            name: name.into(),
            ticker: normalize_ticker(ticker),
            description: description.into(),
            secret: SecretString::from(secret),
            image_url: None,
            socials: SocialLinks::default(),
        }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_socials(mut self, socials: SocialLinks) -> Self {
        self.socials = socials;
        self
    }

    /// The off-chain part of the request.
    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata {
            name: self.name.clone(),
            symbol: self.ticker.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            socials: self.socials.clone(),
        }
    }
}

/// What gets uploaded to the metadata host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image_url: Option<String>,
    pub socials: SocialLinks,
}

/// Outcome of a successful deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResult {
    pub token_address: String,
    pub tx_signature: String,
    pub pump_fun_url: String,
}

impl DeployResult {
    pub fn new(mint: &Pubkey, tx_signature: String, viewer_base_url: &str) -> Self {
        let token_address = mint.to_base58();
        Self {
            pump_fun_url: format!("{viewer_base_url}{token_address}"),
            token_address,
            tx_signature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn ticker_dollar_prefix_is_stripped() {
        assert_eq!(normalize_ticker("$DOGE"), "DOGE");
    }

    #[test]
    fn ticker_case_is_preserved() {
        assert_eq!(normalize_ticker("doge"), "doge");
    }

    #[test]
    fn only_one_leading_dollar_is_stripped() {
        assert_eq!(normalize_ticker("$$DOGE"), "$DOGE");
        assert_eq!(normalize_ticker("DO$GE"), "DO$GE");
    }

    #[test]
    fn request_normalizes_ticker() {
        let req = DeployRequest::new("Doge", "$DOGE", "much wow", "secret".into());
        assert_eq!(req.ticker, "DOGE");
        assert_eq!(req.secret.expose_secret(), "secret");
    }

    #[test]
    fn request_debug_redacts_secret() {
        let req = DeployRequest::new("Doge", "DOGE", "much wow", "hunter2".into());
        assert!(!format!("{req:?}").contains("hunter2"));
    }

    #[test]
    fn metadata_carries_image_and_socials() {
        let socials = SocialLinks {
            twitter: Some("@doge".into()),
            ..SocialLinks::default()
        };
        let req = DeployRequest::new("Doge", "DOGE", "much wow", "k".into())
            .with_image_url("https://img/doge.png")
            .with_socials(socials.clone());

        let meta = req.metadata();
        assert_eq!(meta.symbol, "DOGE");
        assert_eq!(meta.image_url.as_deref(), Some("https://img/doge.png"));
        assert_eq!(meta.socials, socials);
    }

    #[test]
    fn result_serializes_camel_case() {
        let mint = Pubkey::new([0x11u8; 32]);
        let result = DeployResult::new(&mint, "sig".into(), "https://pump.fun/");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json["tokenAddress"],
            "29d2S7vB453rNYFdR5Ycwt7y9haRT5fwVwL9zTmBhfV2"
        );
        assert_eq!(json["txSignature"], "sig");
        assert_eq!(
            json["pumpFunUrl"],
            "https://pump.fun/29d2S7vB453rNYFdR5Ycwt7y9haRT5fwVwL9zTmBhfV2"
        );
    }
}
