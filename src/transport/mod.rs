//! 传输层：基于 reqwest 的 HTTP 客户端封装，自动附带 Bearer 令牌。

pub mod endpoint;
mod http;

pub use endpoint::{Endpoint, HttpMethod};
pub use http::{extract_detail, HttpTransport, TransportError};
