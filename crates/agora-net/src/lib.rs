// HTTP access to the Q&A backend.

pub mod error;
pub mod http;
pub mod routes;

pub use error::NetError;
pub use http::HttpTransport;
