use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Issues and validates HMAC-signed access tokens.
///
/// Tokens are signed with HS256. Validation accepts only the HMAC family
/// (HS256, HS384, HS512); any other `alg` header, `none` included, is rejected
/// before the payload is trusted.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec bound to a signing secret.
    ///
    /// The secret is fixed for the lifetime of the codec.
    ///
    /// # Errors
    /// * `EmptySecret` - The secret is empty
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            header: Header::new(Algorithm::HS256),
            validation,
        })
    }

    /// Issue a token for an authenticated user, valid for 24 hours from now.
    ///
    /// # Errors
    /// * `SigningFailed` - Token signing failed
    pub fn issue(&self, user_id: impl ToString, username: &str) -> Result<String, TokenError> {
        self.sign(&Claims::for_user(user_id, username))
    }

    /// Sign prepared claims as they are.
    ///
    /// # Errors
    /// * `SigningFailed` - Token signing failed
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&self.header, claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    /// Verify a presented token and return its claims.
    ///
    /// # Errors
    /// * `InvalidSignature` - The MAC does not match the payload
    /// * `Expired` - The current time is not before `exp`
    /// * `Invalid` - Wrong algorithm, missing claims, or a malformed token
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidAlgorithm => {
                        TokenError::Invalid("unexpected signing method".to_string())
                    }
                    _ => TokenError::Invalid(e.to_string()),
                }
            })?;

        // jsonwebtoken still accepts the exact expiration second
        if token_data.claims.is_expired(Utc::now().timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde::Serialize;

    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    // base64url of {"alg":"none","typ":"JWT"}
    const NONE_HEADER: &str = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";
    // base64url of {"alg":"RS256","typ":"JWT"}
    const RS256_HEADER: &str = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9";

    fn parts(token: &str) -> (String, String, String) {
        let mut split = token.split('.');
        let header = split.next().unwrap().to_string();
        let payload = split.next().unwrap().to_string();
        let signature = split.next().unwrap().to_string();
        (header, payload, signature)
    }

    #[test]
    fn test_issue_and_validate() {
        let codec = TokenCodec::new(SECRET).unwrap();

        let token = codec.issue(42_i64, "alice").expect("Failed to issue token");
        assert_eq!(token.split('.').count(), 3);

        let claims = codec.validate(&token).expect("Failed to validate token");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.iss, "42");
        assert_eq!(claims.id, "42");
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(TokenCodec::new(b""), Err(TokenError::EmptySecret)));
    }

    #[test]
    fn test_expired_token() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let claims = Claims::issued_at(1_i64, "alice", Utc::now() - Duration::hours(25));

        let token = codec.sign(&claims).unwrap();

        assert_eq!(codec.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret() {
        let issuer = TokenCodec::new(b"secret1_at_least_32_bytes_long_key!").unwrap();
        let verifier = TokenCodec::new(b"secret2_at_least_32_bytes_long_key!").unwrap();

        let token = issuer.issue(1_i64, "alice").unwrap();

        assert_eq!(verifier.validate(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_altered_signature() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let (header, payload, signature) = parts(&codec.issue(1_i64, "alice").unwrap());

        let replacement = if signature.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}.{}{}", header, payload, replacement, &signature[1..]);

        assert_eq!(codec.validate(&tampered), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_swapped_payload() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let (header, _, signature) = parts(&codec.issue(1_i64, "alice").unwrap());
        let (_, forged_payload, _) = parts(&codec.issue(2_i64, "mallory").unwrap());

        let tampered = format!("{}.{}.{}", header, forged_payload, signature);

        assert_eq!(codec.validate(&tampered), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_unsigned_token_rejected() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let (_, payload, _) = parts(&codec.issue(1_i64, "alice").unwrap());

        let unsigned = format!("{}.{}.", NONE_HEADER, payload);

        assert!(matches!(
            codec.validate(&unsigned),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_other_algorithm_family_rejected() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let (_, payload, signature) = parts(&codec.issue(1_i64, "alice").unwrap());

        let substituted = format!("{}.{}.{}", RS256_HEADER, payload, signature);

        assert_eq!(
            codec.validate(&substituted),
            Err(TokenError::Invalid("unexpected signing method".to_string()))
        );
    }

    #[test]
    fn test_other_hmac_variant_accepted() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let claims = Claims::for_user(5_i64, "carol");

        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(codec.validate(&token), Ok(claims));
    }

    #[test]
    fn test_missing_claims_rejected() {
        #[derive(Serialize)]
        struct Partial {
            sub: String,
            exp: i64,
        }

        let codec = TokenCodec::new(SECRET).unwrap();
        let partial = Partial {
            sub: "1".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &partial,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(codec.validate(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_malformed_token() {
        let codec = TokenCodec::new(SECRET).unwrap();

        for token in ["", "invalid.token.here", "only-one-part", "a.b"] {
            let result = codec.validate(token);
            assert!(
                matches!(result, Err(TokenError::Invalid(_))),
                "{:?} gave {:?}",
                token,
                result
            );
        }
    }
}
