//! # hexd
//!
//! A minimal Hex artifact repository server for deployments behind a reverse
//! proxy.
//!
//! hexd answers one question: *what bytes are stored under this path?*
//! `GET /tarballs/decimal-2.0.0.tar` returns the artifact stored at key
//! `tarballs/decimal-2.0.0.tar` as `application/octet-stream`, or `404`.
//!
//! What the proxy or a neighbouring service owns, hexd ignores:
//!
//! - **Authentication** — requests are authorised before they get here
//! - **Publishing** — artifacts land in storage by other means
//! - **Registry documents** — `names`, `versions` and package indexes are
//!   stored artifacts like any other; hexd does not generate them
//! - **TLS, rate limiting, body limits** — nginx / ingress
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hexd::{FileStorage, Server, repository};
//!
//! #[tokio::main]
//! async fn main() {
//!     let storage = Arc::new(FileStorage::new("/var/lib/hexd"));
//!     Server::bind("0.0.0.0:8080").serve(repository(storage)).await.unwrap();
//! }
//! ```

mod download;
mod error;
mod handler;
mod method;
mod repository;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod health;
pub mod middleware;
pub mod storage;

pub use download::DownloadSlice;
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use repository::repository;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use storage::{FileStorage, InMemoryStorage, Key, Storage, StorageError};
