//! Dashboard: plan status, plan features and voice history.

use crate::auth::User;
use crate::tts::{PlanInfo, VoiceHistoryEntry};
use crate::Session;
use tracing::error;

#[derive(Debug)]
pub struct Dashboard {
    plan_info: Option<PlanInfo>,
    history: Vec<VoiceHistoryEntry>,
    loading: bool,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            plan_info: None,
            history: Vec::new(),
            loading: true,
        }
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch plan info and history side by side.
    ///
    /// Failures are logged and leave the previous data in place; the page still renders.
    pub async fn load(&mut self, session: &mut Session) {
        let tts = session.tts();
        let (plan_info, history) = tokio::join!(tts.plan_info(), tts.voice_history());

        match session.guard(plan_info) {
            Ok(info) => self.plan_info = Some(info),
            Err(e) => error!("Failed to fetch plan info: {}", e),
        }
        match session.guard(history) {
            Ok(entries) => self.history = entries,
            Err(e) => error!("Failed to fetch voice history: {}", e),
        }
        self.loading = false;
    }

    /// Refresh dependent data after a voice generation.
    pub async fn on_generation_complete(&mut self, session: &mut Session) {
        self.load(session).await;
    }

    pub fn plan_info(&self) -> Option<&PlanInfo> {
        self.plan_info.as_ref()
    }

    pub fn features(&self) -> &[String] {
        self.plan_info
            .as_ref()
            .map(|info| info.features.as_slice())
            .unwrap_or(&[])
    }

    pub fn history(&self) -> &[VoiceHistoryEntry] {
        &self.history
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// "N generations remaining today", Trial users only.
    pub fn remaining_today(user: &User) -> Option<u32> {
        user.remaining_today()
    }

    /// Trial users are shown the upgrade link.
    pub fn shows_upgrade(user: &User) -> bool {
        user.plan.is_trial()
    }
}
