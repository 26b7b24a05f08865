use crate::error::Error;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::ResponseError;
use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::rc::Rc;

/// Rejects requests whose `Host` is not in the configured list with a 400.
///
/// Patterns are matched case-insensitively against the host without its port:
/// `*` matches anything, `.example.com` matches `example.com` and every subdomain,
/// anything else must match exactly.
#[derive(Debug, Clone)]
pub struct AllowedHosts {
    patterns: Rc<Vec<String>>,
}

impl AllowedHosts {
    pub fn new(patterns: Vec<String>) -> Self {
        Self {
            patterns: Rc::new(patterns.into_iter().map(|p| p.trim().to_lowercase()).filter(|p| !p.is_empty()).collect()),
        }
    }

    pub fn is_allowed(&self, host: &str) -> bool {
        is_allowed(&self.patterns, host)
    }
}

/// `host` with any `:port` removed. IPv6 literals keep their brackets.
pub fn split_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

fn is_allowed(patterns: &[String], host: &str) -> bool {
    let host = split_port(host).trim_end_matches('.').to_lowercase();
    if host.is_empty() {
        return false;
    }
    patterns.iter().any(|pattern| {
        if pattern == "*" {
            true
        } else if let Some(domain) = pattern.strip_prefix('.') {
            host == domain || host.ends_with(pattern.as_str())
        } else {
            host == *pattern
        }
    })
}

impl<S, B> Transform<S, ServiceRequest> for AllowedHosts
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Transform = AllowedHostsService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AllowedHostsService {
            patterns: self.patterns.clone(),
            next_service: service,
        }))
    }
}

pub struct AllowedHostsService<S> {
    patterns: Rc<Vec<String>>,
    next_service: S,
}

impl<S, B> Service<ServiceRequest> for AllowedHostsService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, ctx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let host = match req.headers().get(header::HOST).and_then(|h| h.to_str().ok()) {
            Some(host) => host.to_owned(),
            None => req.uri().host().map(str::to_owned).unwrap_or_else(|| req.connection_info().host().to_owned()),
        };
        if !is_allowed(&self.patterns, &host) {
            log::warn!("invalid HTTP_HOST header: {:?}", host);
            let res = Error::DisallowedHost(host).error_response();
            return Box::pin(async move { Ok(req.into_response(res).map_into_right_body()) });
        }

        let res_fut = self.next_service.call(req);
        Box::pin(async move {
            let res = res_fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}
