//! Bearer-token claim reading.
//!
//! The backend enforces authentication; the client only inspects the JWT
//! payload segment to personalise the UI (user id, role gating). No
//! signature verification happens here. Malformed tokens read as `None`.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

/// Roles allowed to create and manage events.
const CREATOR_ROLES: [&str; 5] = ["coach", "school", "organization", "club", "admin"];

fn payload(token: &str) -> Option<Value> {
    let segment = token.split('.').nth(1)?;
    // JWT payloads are unpadded base64url; strip padding from tokens that
    // carry it anyway.
    let bytes = URL_SAFE_NO_PAD.decode(segment.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

fn claim_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Numeric user id from the `id`, `userId`, or `sub` claim.
pub fn user_id(token: &str) -> Option<i64> {
    let payload = payload(token)?;
    ["id", "userId", "sub"]
        .iter()
        .find_map(|key| payload.get(key).and_then(claim_i64))
}

/// Role from the `role`, `roleName`, or first-of-`roles` claim,
/// trimmed and lowercased.
pub fn role(token: &str) -> Option<String> {
    let payload = payload(token)?;
    let raw = payload
        .get("role")
        .or_else(|| payload.get("roleName"))
        .or_else(|| payload.get("roles").and_then(|r| r.get(0)))?;
    let text = match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() { None } else { Some(normalized) }
}

pub fn is_player_role(role: Option<&str>) -> bool {
    role == Some("player")
}

pub fn is_participant_role(role: Option<&str>) -> bool {
    role == Some("participant") || is_player_role(role)
}

/// True for roles that may create events and edit tournament structure.
pub fn has_creator_access(role: Option<&str>) -> bool {
    role.map(|r| CREATOR_ROLES.contains(&r)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_payload(json: &str) -> String {
        format!("header.{}.signature", URL_SAFE_NO_PAD.encode(json))
    }

    #[test]
    fn reads_numeric_id_claim() {
        let token = token_with_payload(r#"{"id":7,"role":"Coach"}"#);
        assert_eq!(user_id(&token), Some(7));
    }

    #[test]
    fn falls_back_to_user_id_and_sub() {
        let token = token_with_payload(r#"{"userId":42}"#);
        assert_eq!(user_id(&token), Some(42));
        let token = token_with_payload(r#"{"sub":"99"}"#);
        assert_eq!(user_id(&token), Some(99));
    }

    #[test]
    fn non_numeric_sub_reads_as_none() {
        let token = token_with_payload(r#"{"sub":"user@example.com"}"#);
        assert_eq!(user_id(&token), None);
    }

    #[test]
    fn role_is_trimmed_and_lowercased() {
        let token = token_with_payload(r#"{"role":"  Coach "}"#);
        assert_eq!(role(&token).as_deref(), Some("coach"));
    }

    #[test]
    fn role_falls_back_to_roles_array() {
        let token = token_with_payload(r#"{"roles":["Admin","viewer"]}"#);
        assert_eq!(role(&token).as_deref(), Some("admin"));
    }

    #[test]
    fn malformed_tokens_read_as_none() {
        assert_eq!(user_id("not-a-jwt"), None);
        assert_eq!(role("a.%%%.c"), None);
        assert_eq!(role(""), None);
    }

    #[test]
    fn creator_access_gating() {
        assert!(has_creator_access(Some("club")));
        assert!(has_creator_access(Some("admin")));
        assert!(!has_creator_access(Some("player")));
        assert!(!has_creator_access(None));
    }

    #[test]
    fn participant_includes_player() {
        assert!(is_participant_role(Some("participant")));
        assert!(is_participant_role(Some("player")));
        assert!(!is_participant_role(Some("coach")));
    }
}
