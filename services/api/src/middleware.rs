use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage, HttpRequest, web};
use common::Role;
use futures_util::future::{LocalBoxFuture, Ready, ok};
use std::rc::Rc;

use crate::extractors::AuthUser;
use crate::state::AppState;

/// Pulls the access token out of a request: `Authorization: Bearer` wins,
/// the `access_token` cookie is the fallback.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|s| s.to_string());
    header.or_else(|| req.cookie("access_token").map(|c| c.value().to_string()))
}

/// Authentication middleware: decodes the JWT (if any) and attaches an
/// `AuthUser` extension. Requests without a valid token pass through
/// anonymous; role-gated handlers reject them via the extractor.
pub struct Authn;

impl<S, B> Transform<S, ServiceRequest> for Authn
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthnMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthnMiddleware {
            service: Rc::new(service),
        })
    }
}

pub struct AuthnMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthnMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(state) = req.app_data::<web::Data<AppState>>() {
            if let Some(token) = bearer_token(req.request()) {
                if let Ok(claims) = auth::verify(&state.jwt, &token) {
                    req.extensions_mut().insert(AuthUser {
                        id: claims.sub,
                        role: Role::from_claim(&claims.role),
                        email: claims.email,
                    });
                }
            }
        }
        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn header_wins_over_cookie() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer from-header"))
            .cookie(actix_web::cookie::Cookie::new("access_token", "from-cookie"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("from-header"));
    }

    #[test]
    fn cookie_fallback() {
        let req = TestRequest::default()
            .cookie(actix_web::cookie::Cookie::new("access_token", "from-cookie"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn missing_token_is_none() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(bearer_token(&req), None);
    }

    #[test]
    fn malformed_header_ignored() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic abc"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);
    }
}
