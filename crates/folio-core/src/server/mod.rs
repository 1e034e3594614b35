//! Static asset server
//!
//! Serves the pre-built site and answers every unmatched path with the
//! single-page application's entry document.

mod assets;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub use assets::{content_type, resolve, Resolved, INDEX_FILE};

use crate::Result;

/// HTTP server for the built portfolio site
pub struct AssetServer {
    root: Arc<PathBuf>,
    addr: SocketAddr,
}

impl AssetServer {
    pub fn new(root: PathBuf, port: u16) -> Self {
        Self {
            root: Arc::new(root),
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Router with a single fallback handler covering every path
    pub fn router(&self) -> Router {
        Router::new()
            .fallback(asset_handler)
            .with_state(self.root.clone())
    }

    /// Run until the shutdown channel flips to true
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> Result<()> {
        if !self.root.join(INDEX_FILE).is_file() {
            warn!(
                "{} not found under {}; unmatched paths will 404",
                INDEX_FILE,
                self.root.display()
            );
        }

        let listener = TcpListener::bind(self.addr).await?;
        info!(
            "Serving {} on http://{}",
            self.root.display(),
            listener.local_addr()?
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                while shutdown_rx.changed().await.is_ok() {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
                info!("Asset server shutting down");
            })
            .await?;

        Ok(())
    }
}

async fn asset_handler(State(root): State<Arc<PathBuf>>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }
    serve_path(&root, uri.path()).await
}

/// Build the response for one request path
pub async fn serve_path(root: &Path, request_path: &str) -> Response {
    let path = match resolve(root, request_path) {
        Resolved::File(path) | Resolved::Index(path) => path,
        Resolved::Rejected => {
            debug!("Rejected path outside asset root: {}", request_path);
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let mut response = Response::new(Body::from(bytes));
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(content_type(&path)),
            );
            // The entry document must be revalidated so new deploys are picked up
            if path.file_name().and_then(|n| n.to_str()) == Some(INDEX_FILE) {
                response
                    .headers_mut()
                    .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
            }
            response
        }
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("folio-server-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(root.join("assets")).unwrap();
        std::fs::write(root.join(INDEX_FILE), "<html>home</html>").unwrap();
        std::fs::write(root.join("assets").join("site.css"), "body{}").unwrap();
        root
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_serves_file_with_content_type() {
        let root = site("file");
        let response = serve_path(&root, "/assets/site.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/css; charset=utf-8"
        );
        assert_eq!(body_text(response).await, "body{}");
    }

    #[tokio::test]
    async fn test_unknown_route_gets_entry_document() {
        let root = site("spa");
        let response = serve_path(&root, "/certificates").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
        assert_eq!(body_text(response).await, "<html>home</html>");
    }

    #[tokio::test]
    async fn test_traversal_is_not_found() {
        let root = site("traversal");
        let response = serve_path(&root, "/../Cargo.toml").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_index_is_not_found() {
        let root = std::env::temp_dir().join(format!("folio-server-empty-{}", std::process::id()));
        std::fs::create_dir_all(&root).unwrap();
        let response = serve_path(&root, "/").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
