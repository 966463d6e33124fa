use std::{
    future::{ready, Ready},
    net::IpAddr,
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;

use crate::{app_state::AppState, auth::Claims, errors::AppError};

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let claims = match authenticate(&req) {
                Ok(claims) => claims,
                Err(e) => {
                    log::debug!("Rejected request to {}: {}", req.path(), e);
                    return Ok(req.error_response(e).map_into_right_body());
                }
            };

            req.extensions_mut().insert(claims);

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn authenticate(req: &ServiceRequest) -> Result<Claims, AppError> {
    let jwt_service = req
        .app_data::<actix_web::web::Data<crate::auth::JwtService>>()
        .ok_or_else(|| AppError::InternalError("JWT service not configured".to_string()))?;

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing or malformed bearer token".to_string()))?;

    jwt_service.validate_token(token)
}

/// The authenticated user behind a request, plus where the request came from.
#[derive(Debug, Clone)]
pub struct Requester {
    pub claims: Claims,
    pub remote_addr: String,
}

impl Requester {
    pub fn new(claims: Claims, remote_addr: &str) -> Self {
        Self {
            claims,
            remote_addr: remote_addr.to_string(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.claims.sub
    }

    pub fn session_id(&self) -> &str {
        &self.claims.sid
    }
}

impl FromRequest for Requester {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let trusted_proxies = req
            .app_data::<web::Data<AppState>>()
            .map(|state| state.config.trusted_proxies.as_slice())
            .unwrap_or_default();
        let remote_addr = client_addr(req, trusted_proxies);

        let requester = req
            .extensions()
            .get::<Claims>()
            .cloned()
            .map(|claims| Requester::new(claims, &remote_addr))
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()));

        ready(requester)
    }
}

/// The socket peer, unless the peer is a trusted proxy, in which case the
/// client named by its `Forwarded`/`X-Forwarded-For` header.
fn client_addr(req: &HttpRequest, trusted_proxies: &[IpAddr]) -> String {
    let Some(peer) = req.peer_addr().map(|addr| addr.ip()) else {
        return String::new();
    };

    if trusted_proxies.contains(&peer) {
        if let Some(forwarded) = req.connection_info().realip_remote_addr() {
            return strip_port(forwarded);
        }
    }
    peer.to_string()
}

/// `realip_remote_addr` may carry a port; the subnet rule only wants the host.
fn strip_port(addr: &str) -> String {
    if addr.parse::<std::net::IpAddr>().is_ok() {
        return addr.to_string();
    }
    match addr.parse::<std::net::SocketAddr>() {
        Ok(socket) => socket.ip().to_string(),
        Err(_) => addr.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn forwarded_from(peer: &str) -> HttpRequest {
        TestRequest::default()
            .peer_addr(peer.parse().unwrap())
            .insert_header(("X-Forwarded-For", "10.1.2.3"))
            .to_http_request()
    }

    #[test]
    fn test_client_addr_ignores_forwarded_header_from_untrusted_peer() {
        let req = forwarded_from("192.168.1.50:12345");
        assert_eq!(client_addr(&req, &[]), "192.168.1.50");

        let other_proxy: IpAddr = "192.168.1.1".parse().unwrap();
        assert_eq!(client_addr(&req, &[other_proxy]), "192.168.1.50");
    }

    #[test]
    fn test_client_addr_believes_trusted_proxy() {
        let req = forwarded_from("192.168.1.1:443");
        let proxy: IpAddr = "192.168.1.1".parse().unwrap();
        assert_eq!(client_addr(&req, &[proxy]), "10.1.2.3");
    }

    #[test]
    fn test_client_addr_without_peer_is_empty() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "10.1.2.3"))
            .to_http_request();
        assert_eq!(client_addr(&req, &[]), "");
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("10.0.0.1:5432"), "10.0.0.1");
        assert_eq!(strip_port("10.0.0.1"), "10.0.0.1");
        assert_eq!(strip_port("[::1]:8080"), "::1");
        assert_eq!(strip_port("::1"), "::1");
        assert_eq!(strip_port("unknown"), "unknown");
    }
}
