// src/infrastructure/security/token.rs
use crate::application::{
    dto::{AccessTokenClaims, SignedAccessToken},
    error::{ApplicationError, ApplicationResult},
    ports::{security::AccessTokenCodec, time::Clock},
};
use async_trait::async_trait;
use biscuit_auth::{
    Biscuit, KeyPair, PrivateKey, PublicKey,
    builder::{Algorithm, AuthorizerBuilder, Term},
};
use chrono::{Duration, Timelike};
use std::{collections::HashMap, sync::Arc, time::SystemTime};

/// Claims fixed for every token this service issues.
#[derive(Debug, Clone)]
pub struct AccessTokenSettings {
    pub issuer: String,
    pub scope: String,
    pub ttl: Duration,
}

/// Ed25519-signed biscuit access tokens.
#[derive(Clone)]
pub struct BiscuitAccessTokenCodec {
    root: Arc<KeyPair>,
    public: PublicKey,
    settings: AccessTokenSettings,
    clock: Arc<dyn Clock>,
}

impl BiscuitAccessTokenCodec {
    pub fn new(
        private_key_hex: &str,
        settings: AccessTokenSettings,
        clock: Arc<dyn Clock>,
    ) -> ApplicationResult<Self> {
        let private = PrivateKey::from_bytes_hex(private_key_hex, Algorithm::Ed25519)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let keypair = KeyPair::from(&private);
        let public = keypair.public();

        Ok(Self {
            root: Arc::new(keypair),
            public,
            settings,
            clock,
        })
    }
}

const ACCESS_TOKEN_CODE: &str = r#"
    subject({sub});
    issuer({iss});
    audience({aud});
    scope({scope});
    issued_at({iat});
    expires_at({exp});
    token_type("access");
"#;

fn build_params(
    subject: &str,
    audience: &str,
    settings: &AccessTokenSettings,
    issued_at: SystemTime,
    expires_at: SystemTime,
) -> HashMap<String, Term> {
    let mut params: HashMap<String, Term> = HashMap::new();
    params.insert("sub".to_string(), subject.into());
    params.insert("iss".to_string(), settings.issuer.as_str().into());
    params.insert("aud".to_string(), audience.into());
    params.insert("scope".to_string(), settings.scope.as_str().into());
    params.insert("iat".to_string(), issued_at.into());
    params.insert("exp".to_string(), expires_at.into());
    params
}

fn build_and_serialize_biscuit(
    params: HashMap<String, Term>,
    root: &KeyPair,
) -> Result<String, ApplicationError> {
    let builder = Biscuit::builder()
        .code_with_params(ACCESS_TOKEN_CODE, params, HashMap::new())
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

    let token = builder
        .build(root)
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

    let sealed = token
        .seal()
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
    sealed
        .to_base64()
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))
}

#[async_trait]
impl AccessTokenCodec for BiscuitAccessTokenCodec {
    async fn sign(&self, subject: &str, audience: &str) -> ApplicationResult<SignedAccessToken> {
        // Whole seconds, matching the precision of biscuit dates.
        let issued_at = self
            .clock
            .now()
            .with_nanosecond(0)
            .ok_or_else(|| ApplicationError::infrastructure("invalid clock value"))?;
        let expires_at = issued_at
            .checked_add_signed(self.settings.ttl)
            .ok_or_else(|| ApplicationError::infrastructure("token expiration overflow"))?;

        let params = build_params(
            subject,
            audience,
            &self.settings,
            SystemTime::from(issued_at),
            SystemTime::from(expires_at),
        );
        let token = build_and_serialize_biscuit(params, self.root.as_ref())?;

        Ok(SignedAccessToken {
            token,
            issued_at,
            expires_at,
            expires_in: self.settings.ttl.num_seconds().max(0),
        })
    }

    async fn verify(&self, token: &str) -> ApplicationResult<AccessTokenClaims> {
        let biscuit = Biscuit::from_base64(token, self.public)
            .map_err(|err| ApplicationError::invalid_token(err.to_string()))?;

        let mut authorizer = AuthorizerBuilder::new()
            .code("allow if token_type(\"access\");")
            .and_then(|builder| builder.build(&biscuit))
            .map_err(|err| ApplicationError::invalid_token(err.to_string()))?;

        authorizer
            .authorize()
            .map_err(|err| ApplicationError::invalid_token(err.to_string()))?;

        let (facts, _, _, _) = authorizer.dump();
        let claims = super::claims::parse_claims(facts)?;

        if claims.issuer != self.settings.issuer {
            return Err(ApplicationError::invalid_token("unexpected issuer"));
        }
        if self.clock.now() > claims.expires_at {
            return Err(ApplicationError::TokenExpired);
        }

        Ok(claims)
    }
}
