//! Web server for dirserve.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::{ServerConfig, WebConfig};
use crate::file::FileBrowser;
use crate::{FileBrowserError, Result};

use super::handlers::AppState;
use super::router::{
    create_health_router, create_router, create_static_router, create_swagger_router,
};

/// Web server for the file browser.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Web configuration.
    web_config: WebConfig,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(server: &ServerConfig, web: &WebConfig, browser: FileBrowser) -> Result<Self> {
        let addr = format!("{}:{}", server.host, server.port)
            .parse::<SocketAddr>()
            .map_err(|e| {
                FileBrowserError::Config(format!(
                    "invalid listen address {}:{}: {e}",
                    server.host, server.port
                ))
            })?;

        Ok(Self {
            addr,
            app_state: Arc::new(AppState::new(browser)),
            web_config: web.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Build the complete application router.
    pub fn router(&self) -> Router {
        let mut router = create_router(self.app_state.clone(), &self.web_config)
            .merge(create_health_router())
            .merge(create_swagger_router());

        if self.web_config.serve_static {
            if let Some(static_router) = create_static_router(&self.web_config.static_path) {
                router = router.merge(static_router);
            }
        }

        router.layer(CompressionLayer::new())
    }

    async fn bind(&self) -> Result<(TcpListener, SocketAddr)> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!(
            root = %self.app_state.browser.root().path().display(),
            "Web server listening on http://{}",
            local_addr
        );
        if local_addr.ip().is_unspecified() {
            tracing::info!(
                "Reachable on the LAN at http://{}:{}",
                lan_ip(),
                local_addr.port()
            );
        }

        Ok((listener, local_addr))
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> Result<()> {
        let router = self.router();
        let (listener, _) = self.bind().await?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = self.router();
        let (listener, local_addr) = self.bind().await?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

/// Best-effort address of this host on the local network.
///
/// Connecting a UDP socket sends nothing; it only selects the outbound
/// interface. Falls back to loopback when there is no route.
pub fn lan_ip() -> IpAddr {
    UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect("10.255.255.255:1")?;
            socket.local_addr()
        })
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}
