// src/infrastructure/security/claims.rs
use crate::application::{
    dto::AccessTokenClaims,
    error::{ApplicationError, ApplicationResult},
};
use biscuit_auth::builder::{Fact, Predicate, Term};
use chrono::{DateTime, Utc};

pub fn parse_claims(facts: Vec<Fact>) -> ApplicationResult<AccessTokenClaims> {
    let ctx = ClaimsContext::from_facts(facts);
    ctx.into_claims()
}

#[derive(Default)]
struct ClaimsContext {
    subject: Option<String>,
    issuer: Option<String>,
    audience: Option<String>,
    scope: Option<String>,
    issued_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
}

impl ClaimsContext {
    fn from_facts(facts: Vec<Fact>) -> Self {
        let mut ctx = ClaimsContext::default();
        for fact in facts {
            ctx.apply_predicate(fact.predicate);
        }
        ctx
    }

    fn apply_predicate(&mut self, predicate: Predicate) {
        let Some(term) = predicate.terms.into_iter().next() else {
            return;
        };

        match predicate.name.as_str() {
            "subject" => self.subject = string_term(term),
            "issuer" => self.issuer = string_term(term),
            "audience" => self.audience = string_term(term),
            "scope" => self.scope = string_term(term),
            "issued_at" => self.issued_at = date_term(term),
            "expires_at" => self.expires_at = date_term(term),
            _ => {}
        }
    }

    fn into_claims(self) -> ApplicationResult<AccessTokenClaims> {
        Ok(AccessTokenClaims {
            subject: self.subject.ok_or_else(|| missing("subject"))?,
            issuer: self.issuer.ok_or_else(|| missing("issuer"))?,
            audience: self.audience.ok_or_else(|| missing("audience"))?,
            scope: self.scope.ok_or_else(|| missing("scope"))?,
            issued_at: self.issued_at.ok_or_else(|| missing("issued_at"))?,
            expires_at: self.expires_at.ok_or_else(|| missing("expires_at"))?,
        })
    }
}

fn string_term(term: Term) -> Option<String> {
    match term {
        Term::Str(value) => Some(value),
        _ => None,
    }
}

fn date_term(term: Term) -> Option<DateTime<Utc>> {
    match term {
        Term::Date(seconds) => {
            i64::try_from(seconds).ok().and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
        }
        _ => None,
    }
}

fn missing(claim: &str) -> ApplicationError {
    ApplicationError::invalid_token(format!("missing {claim}"))
}
