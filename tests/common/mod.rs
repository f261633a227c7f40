#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::Request;
use axum::{Router, ServiceExt};
use axum_test::TestServer;
use shorturl::application::services::ShorteningService;
use shorturl::application::validator::{HostResolver, UrlValidator};
use shorturl::domain::repositories::UrlRepository;
use shorturl::infrastructure::persistence::InMemoryUrlRepository;
use shorturl::routes::{AssetDirs, app_router, router};
use shorturl::state::AppState;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

/// Resolver that never touches the network: every host resolves to
/// 127.0.0.1 except names under the reserved `.invalid` TLD.
pub struct StaticResolver;

#[async_trait]
impl HostResolver for StaticResolver {
    async fn lookup(&self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
        if host.ends_with(".invalid") {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such host"));
        }
        Ok(vec![SocketAddr::from((Ipv4Addr::LOCALHOST, port))])
    }
}

pub fn create_test_service(repository: Arc<dyn UrlRepository>) -> ShorteningService {
    let validator = UrlValidator::new(Arc::new(StaticResolver), Duration::from_secs(1));
    ShorteningService::new(repository, validator)
}

pub fn create_test_state(compat_mode: bool) -> AppState {
    let repository = Arc::new(InMemoryUrlRepository::new());
    AppState::new(Arc::new(create_test_service(repository)), compat_mode)
}

pub fn create_test_app(compat_mode: bool) -> Router {
    router(create_test_state(compat_mode), &AssetDirs::default())
}

pub fn make_server(compat_mode: bool) -> TestServer {
    TestServer::new(create_test_app(compat_mode)).unwrap()
}

/// Server over the full application, including trailing-slash trimming.
pub fn make_app_server(compat_mode: bool) -> TestServer {
    let app = app_router(create_test_state(compat_mode), &AssetDirs::default());
    TestServer::new(ServiceExt::<Request>::into_make_service(app)).unwrap()
}
