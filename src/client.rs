//! Bundle of resource clients sharing one transport.

use crate::auth::AuthClient;
use crate::config::ClientConfig;
use crate::payment::PaymentClient;
use crate::session::store::TokenStore;
use crate::transport::HttpTransport;
use crate::tts::TtsClient;
use crate::video::VideoClient;
use crate::Result;
use std::sync::Arc;

/// Entry point to every backend feature area.
///
/// Cheap to clone; all clones share the transport and token store.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<HttpTransport>,
    auth: AuthClient,
    payment: PaymentClient,
    tts: TtsClient,
    video: VideoClient,
}

impl ApiClient {
    /// Build with the token store named in `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let store = config.open_token_store()?;
        Self::with_token_store(config, store)
    }

    pub fn with_token_store(config: &ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(config, store)?);
        Ok(Self {
            auth: AuthClient::new(transport.clone()),
            payment: PaymentClient::new(transport.clone()),
            tts: TtsClient::new(transport.clone()),
            video: VideoClient::new(transport.clone()),
            transport,
        })
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        self.transport.token_store()
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    pub fn payment(&self) -> &PaymentClient {
        &self.payment
    }

    pub fn tts(&self) -> &TtsClient {
        &self.tts
    }

    pub fn video(&self) -> &VideoClient {
        &self.video
    }
}
