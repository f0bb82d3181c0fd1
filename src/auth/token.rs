use base64::alphabet;
use base64::engine::general_purpose::GeneralPurpose;
use base64::engine::{DecodePaddingMode, GeneralPurposeConfig};
use base64::Engine as _;
use chrono::Utc;
use tracing::debug;

use crate::error::AuthError;
use crate::models::TokenClaims;
use crate::state::{SessionContext, SessionState};

/// Standard alphabet that tolerates missing padding. URL-safe input is
/// mapped onto it before decoding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Current time in whole seconds since the epoch, rounded to nearest.
pub fn current_timestamp() -> i64 {
    (Utc::now().timestamp_millis() as f64 / 1000.0).round() as i64
}

/// Decode the payload segment of `token` without looking at the signature.
pub fn decode_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(AuthError::MalformedToken {
            segments: segments.len(),
        });
    }

    let payload = decode_segment(segments[1])?;
    serde_json::from_slice::<TokenClaims>(&payload)
        .map_err(|e| AuthError::Decode(format!("invalid payload JSON: {}", e)))
}

/// Either base64 alphabet is accepted, but not both in one segment: a
/// payload carrying `+` or `/` alongside `-` or `_` is a decode error.
fn decode_segment(segment: &str) -> Result<Vec<u8>, AuthError> {
    let segment = segment.trim();
    let standard = segment.contains(['+', '/']);
    let url_safe = segment.contains(['-', '_']);
    if standard && url_safe {
        return Err(AuthError::Decode(
            "base64 payload mixes standard and URL-safe alphabets".to_string(),
        ));
    }

    let normalized: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    PAYLOAD_ENGINE
        .decode(normalized)
        .map_err(|e| AuthError::Decode(format!("invalid base64 payload: {}", e)))
}

/// Validate `token` and make it the current session of `ctx`.
///
/// Nothing is written unless the token splits into three segments, its
/// payload decodes, and it has not expired.
pub fn parse_token(ctx: &SessionContext, token: &str) -> Result<SessionState, AuthError> {
    parse_token_at(ctx, token, current_timestamp())
}

pub(crate) fn parse_token_at(
    ctx: &SessionContext,
    token: &str,
    now: i64,
) -> Result<SessionState, AuthError> {
    let claims = decode_claims(token)?;
    if claims.is_expired_at(now) {
        return Err(AuthError::ExpiredToken {
            exp: claims.exp,
            now,
        });
    }
    debug!("Decoded token claims: {:?}", claims);

    Ok(ctx.adopt(token, claims.user)?)
}
