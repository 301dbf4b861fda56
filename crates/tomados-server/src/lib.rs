//! HTTP/1.1 server for the Tomados service, built on Hyper.
//!
//! ## Basic usage
//!
//! ```rust,ignore
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//! use tomados_server::HttpServer;
//!
//! let addr: SocketAddr = "127.0.0.1:8000".parse()?;
//! let server = HttpServer::new(Arc::new(router))
//!     .with_middleware(Arc::new(RequestLogMiddleware::new()));
//! server.listen(addr).await?;
//! ```

pub mod http;
pub mod logging;
pub mod shutdown;

pub use http::{HttpServer, serve, serve_with_shutdown};
pub use logging::RequestLogMiddleware;
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
