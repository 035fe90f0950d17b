use crate::error::NotifierError;
use actix_web::HttpRequest;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use notifier_infra::{NotifierContext, TokenConfig};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::debug;

pub const TOKEN_HEADER: &str = "X-Token";

#[derive(Debug, Deserialize)]
pub struct Claims {
    /// Issued at, seconds since the epoch
    iat: i64,
    sub: Option<String>,
}

fn parse_token_header(req: &HttpRequest) -> Result<&str, NotifierError> {
    match req.headers().get(TOKEN_HEADER) {
        Some(token) => match token.to_str() {
            Ok(token) => Ok(token.strip_prefix("Bearer ").unwrap_or(token)),
            Err(_) => Err(NotifierError::Unauthorized(
                "Malformed token provided".to_string(),
            )),
        },
        None => Err(NotifierError::Unauthorized(format!(
            "Unable to find token in {} header",
            TOKEN_HEADER
        ))),
    }
}

fn is_api_key(token: &str, api_key: &str) -> bool {
    let token_bytes = token.as_bytes();
    let expected_bytes = api_key.as_bytes();
    token_bytes.len() == expected_bytes.len() && token_bytes.ct_eq(expected_bytes).unwrap_u8() == 1
}

/// Verifies signature, issuer and audience of `token` and that it was
/// issued no longer than the configured ttl before `now`
pub fn decode_token(
    token: &str,
    config: &TokenConfig,
    now: DateTime<Utc>,
) -> anyhow::Result<Claims> {
    let secret = config.verification_secret.as_bytes();
    let (algorithm, decoding_key) = if config.use_ecdsa {
        (Algorithm::ES256, DecodingKey::from_ec_pem(secret)?)
    } else {
        (Algorithm::HS256, DecodingKey::from_secret(secret))
    };

    let mut validation = Validation::new(algorithm);
    validation.validate_exp = false;
    validation.iss = Some(config.issuer.clone());
    validation.set_audience(&[config.audience.as_str()]);

    let claims = decode::<Claims>(token, &decoding_key, &validation)?.claims;

    let age = now.timestamp() - claims.iat;
    if age < 0 || age > config.ttl_seconds {
        return Err(anyhow::anyhow!(
            "Token issued at {} is not valid at {}",
            claims.iat,
            now.timestamp()
        ));
    }
    Ok(claims)
}

/// Every route but the health check requires either the configured api key
/// or a valid signed token in the `X-Token` header
pub fn protect_route(req: &HttpRequest, ctx: &NotifierContext) -> Result<(), NotifierError> {
    let token = parse_token_header(req)?;

    if is_api_key(token, &ctx.config.api_key) {
        return Ok(());
    }

    if let Some(token_config) = &ctx.config.token {
        match decode_token(token, token_config, ctx.sys.now()) {
            Ok(claims) => {
                debug!(subject = ?claims.sub, "Accepted signed token");
                return Ok(());
            }
            Err(e) => debug!(error = %e, "Rejected signed token"),
        }
    }

    Err(NotifierError::Unauthorized(format!(
        "Invalid token provided in {} header",
        TOKEN_HEADER
    )))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_utils::setup_context;
    use actix_web::test::TestRequest;
    use chrono::prelude::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    const SECRET: &str = "hmac-secret";

    #[derive(Serialize)]
    struct TestClaims<'a> {
        iss: &'a str,
        aud: &'a str,
        sub: &'a str,
        iat: i64,
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn token_config() -> TokenConfig {
        TokenConfig {
            verification_secret: SECRET.into(),
            use_ecdsa: false,
            issuer: "daheim_token_issuer".into(),
            audience: "gschmarri".into(),
            ttl_seconds: 3600,
        }
    }

    fn sign(iss: &str, aud: &str, iat: DateTime<Utc>, secret: &str) -> String {
        let claims = TestClaims {
            iss,
            aud,
            sub: "martin",
            iat: iat.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn request(token: &str) -> HttpRequest {
        TestRequest::default()
            .insert_header((TOKEN_HEADER, token.to_string()))
            .to_http_request()
    }

    #[actix_web::test]
    async fn accepts_the_configured_token() {
        let ctx = setup_context(Utc::now());
        let req = TestRequest::default()
            .insert_header((TOKEN_HEADER, ctx.config.api_key.clone()))
            .to_http_request();
        assert!(protect_route(&req, &ctx).is_ok());
    }

    #[actix_web::test]
    async fn rejects_missing_and_wrong_tokens() {
        let ctx = setup_context(Utc::now());

        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            protect_route(&req, &ctx),
            Err(NotifierError::Unauthorized(_))
        ));

        let req = request("guess");
        assert!(matches!(
            protect_route(&req, &ctx),
            Err(NotifierError::Unauthorized(_))
        ));

        // Prefix of the api key
        let prefix = &ctx.config.api_key[..ctx.config.api_key.len() - 1];
        assert!(protect_route(&request(prefix), &ctx).is_err());
    }

    #[test]
    fn compares_api_keys() {
        assert!(is_api_key("secret", "secret"));
        assert!(!is_api_key("secreT", "secret"));
        assert!(!is_api_key("secret-", "secret"));
        assert!(!is_api_key("", "secret"));
    }

    #[actix_web::test]
    async fn accepts_signed_tokens() {
        let mut ctx = setup_context(now());
        ctx.config.token = Some(token_config());

        let issued = now() - chrono::Duration::minutes(5);
        let token = sign("daheim_token_issuer", "gschmarri", issued, SECRET);
        assert!(protect_route(&request(&token), &ctx).is_ok());
        assert!(protect_route(&request(&format!("Bearer {}", token)), &ctx).is_ok());
    }

    #[actix_web::test]
    async fn signed_tokens_are_ignored_without_verification_secret() {
        let ctx = setup_context(now());
        let token = sign("daheim_token_issuer", "gschmarri", now(), SECRET);
        assert!(protect_route(&request(&token), &ctx).is_err());
    }

    #[test]
    fn rejects_foreign_and_stale_tokens() {
        let config = token_config();
        let iss = "daheim_token_issuer";
        let aud = "gschmarri";

        let valid = sign(iss, aud, now() - chrono::Duration::seconds(3600), SECRET);
        assert_eq!(
            decode_token(&valid, &config, now()).unwrap().sub.as_deref(),
            Some("martin")
        );

        let wrong_secret = sign(iss, aud, now(), "other-secret");
        assert!(decode_token(&wrong_secret, &config, now()).is_err());

        let wrong_issuer = sign("someone_else", aud, now(), SECRET);
        assert!(decode_token(&wrong_issuer, &config, now()).is_err());

        let wrong_audience = sign(iss, "elsewhere", now(), SECRET);
        assert!(decode_token(&wrong_audience, &config, now()).is_err());

        let expired = sign(iss, aud, now() - chrono::Duration::seconds(3601), SECRET);
        assert!(decode_token(&expired, &config, now()).is_err());

        let from_the_future = sign(iss, aud, now() + chrono::Duration::seconds(1), SECRET);
        assert!(decode_token(&from_the_future, &config, now()).is_err());
    }
}
