use axum::{http::StatusCode, Json};
use crate::models::ErrorResponse;

/// Principal for a role carried in the token's `roles` claim
pub fn role_prpl(role: &str) -> String {
    format!("r/{}", role)
}

pub fn has_role(prpls: &[String], role: &str) -> bool {
    let wanted = role_prpl(role);
    prpls.iter().any(|p| p == &wanted)
}

pub fn ensure_role(prpls: &[String], role: &str) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    if has_role(prpls, role) {
        return Ok(role_prpl(role));
    }

    Err(ErrorResponse::reply(
        StatusCode::FORBIDDEN,
        format!("Role '{}' required", role),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_checks() {
        let prpls = vec!["u/alice".to_string(), role_prpl("Colabri-Admin")];
        assert!(has_role(&prpls, "Colabri-Admin"));
        assert!(!has_role(&prpls, "Editor"));
        assert_eq!(ensure_role(&prpls, "Colabri-Admin").unwrap(), "r/Colabri-Admin");
    }

    #[test]
    fn test_missing_role_is_forbidden() {
        let (status, Json(body)) = ensure_role(&[], "Colabri-Admin").unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body.code, 403);
    }
}
