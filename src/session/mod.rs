//! 会话模块：持有令牌与当前用户，是二者唯一的写入入口。
//!
//! Session context.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Session`] | Owned session object: token, user, loading flag |
//! | [`SessionState`] | `Unauthenticated` / `Loading` / `Authenticated` |
//! | [`SessionListener`] | Observer notified on every state change |
//! | [`store::TokenStore`] | Where the bearer token is persisted |

mod context;
mod state;
pub mod store;

pub use context::{AuthOutcome, Session};
pub use state::{InMemorySessionListener, SessionEvent, SessionListener, SessionState, TracingSessionListener};
