use actix_web::{FromRequest, HttpMessage};
use common::{AppError, Role};
use std::future::{Ready, ready};
use uuid::Uuid;

/// The resolved principal, attached by the authentication middleware.
/// Handlers take it as a parameter and pass it down explicitly; nothing in
/// the core reads ambient session state.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
    pub email: String,
}

impl FromRequest for AuthUser {
    type Error = crate::error::HttpApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        if let Some(ext) = req.extensions().get::<AuthUser>() {
            return ready(Ok(ext.clone()));
        }
        ready(Err(AppError::NotAuthenticated.into()))
    }
}

/// Role gate. Admins pass every gate except ones that name a different
/// role's exclusive action (the claim workflow checks doctor-ness itself).
pub fn require_role(user: &AuthUser, role: Role) -> Result<(), AppError> {
    if user.role == role || user.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            role,
            email: "x@x.test".into(),
        }
    }

    #[test]
    fn admin_passes_any_gate() {
        assert!(require_role(&user(Role::Admin), Role::Doctor).is_ok());
        assert!(require_role(&user(Role::Admin), Role::Admin).is_ok());
    }

    #[test]
    fn patient_blocked_from_admin_gate() {
        assert!(require_role(&user(Role::Patient), Role::Admin).is_err());
        assert!(require_role(&user(Role::Doctor), Role::Admin).is_err());
    }
}
