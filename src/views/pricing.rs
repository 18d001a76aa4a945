//! Pricing page: plan catalogue and upgrade flow.

use super::Notice;
use crate::auth::{Plan, User};
use crate::Session;
use tracing::error;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanOffer {
    pub plan: Plan,
    pub name: &'static str,
    pub price: u32,
    pub currency: &'static str,
    pub period: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub limitations: &'static [&'static str],
    pub popular: bool,
}

pub static PLAN_CATALOGUE: [PlanOffer; 3] = [
    PlanOffer {
        plan: Plan::Trial,
        name: "Free Trial",
        price: 0,
        currency: "PKR",
        period: "",
        description: "Perfect for trying out our service",
        features: &[
            "3 voice generations per day",
            "Watermarked audio",
            "Basic quality",
            "No download option",
        ],
        limitations: &[
            "Limited to 3 generations daily",
            "Audio includes watermark",
            "Cannot download files",
        ],
        popular: false,
    },
    PlanOffer {
        plan: Plan::Starter,
        name: "Starter",
        price: 500,
        currency: "PKR",
        period: "/month",
        description: "Great for personal use",
        features: &[
            "Unlimited voice generations",
            "High-quality audio",
            "Download enabled",
            "No watermarks",
            "Fast processing",
        ],
        limitations: &[],
        popular: true,
    },
    PlanOffer {
        plan: Plan::Pro,
        name: "Pro",
        price: 1000,
        currency: "PKR",
        period: "/month",
        description: "Perfect for professionals",
        features: &[
            "Everything in Starter",
            "Premium quality voices",
            "Priority processing",
            "Advanced voice options",
            "API access",
            "Priority support",
        ],
        limitations: &[],
        popular: false,
    },
];

impl PlanOffer {
    pub fn for_plan(plan: Plan) -> &'static PlanOffer {
        match plan {
            Plan::Trial => &PLAN_CATALOGUE[0],
            Plan::Starter => &PLAN_CATALOGUE[1],
            Plan::Pro => &PLAN_CATALOGUE[2],
        }
    }

    /// Button label and whether it is disabled for `user`.
    pub fn button(&self, user: Option<&User>) -> (String, bool) {
        if self.plan.is_trial() || user.map(|u| u.plan) == Some(self.plan) {
            return ("Current Plan".to_string(), true);
        }
        (format!("Choose {}", self.name), false)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpgradeOutcome {
    /// Not signed in; send the user to the login form.
    LoginRequired,
    /// Payment started; continue at the gateway URL.
    Redirect(String),
    Rejected(Notice),
}

#[derive(Debug, Default)]
pub struct PricingPage {
    pending: Option<Plan>,
}

impl PricingPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offers(&self) -> &'static [PlanOffer] {
        &PLAN_CATALOGUE
    }

    /// Plan whose upgrade request is in flight.
    pub fn pending(&self) -> Option<Plan> {
        self.pending
    }

    pub async fn upgrade(&mut self, session: &mut Session, plan: Plan) -> UpgradeOutcome {
        let Some(user) = session.user() else {
            return UpgradeOutcome::LoginRequired;
        };
        if user.plan == plan {
            return UpgradeOutcome::Rejected(Notice::error("You are already on this plan"));
        }
        if plan.is_trial() {
            return UpgradeOutcome::Rejected(Notice::error(
                "The free trial cannot be purchased",
            ));
        }
        if self.pending.is_some() {
            return UpgradeOutcome::Rejected(Notice::error("An upgrade is already in progress"));
        }

        self.pending = Some(plan);
        let result = session.payment().trigger_upgrade(plan).await;
        let result = session.guard(result);
        self.pending = None;

        match result {
            Ok(receipt) if receipt.success => match receipt.payment_url {
                Some(url) => UpgradeOutcome::Redirect(url),
                None => UpgradeOutcome::Rejected(Notice::error("Failed to initiate payment")),
            },
            Ok(receipt) => UpgradeOutcome::Rejected(Notice::error(
                receipt
                    .error
                    .unwrap_or_else(|| "Failed to initiate payment".to_string()),
            )),
            Err(e) => {
                error!("Payment error: {}", e);
                if e.is_session_expired() {
                    return UpgradeOutcome::Rejected(Notice::from_error(&e, ""));
                }
                UpgradeOutcome::Rejected(Notice::error(
                    "Failed to initiate payment. Please try again.",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(plan: Plan) -> User {
        User {
            id: None,
            name: "U".into(),
            email: "u@x.com".into(),
            plan,
            daily_count: 0,
            daily_video_count: None,
            created_at: None,
        }
    }

    #[test]
    fn catalogue_lookup_matches_plan() {
        for plan in [Plan::Trial, Plan::Starter, Plan::Pro] {
            assert_eq!(PlanOffer::for_plan(plan).plan, plan);
        }
        assert_eq!(PlanOffer::for_plan(Plan::Starter).price, 500);
        assert!(PlanOffer::for_plan(Plan::Starter).popular);
    }

    #[test]
    fn buttons_disable_current_and_trial_plans() {
        let starter = user(Plan::Starter);
        assert_eq!(
            PlanOffer::for_plan(Plan::Starter).button(Some(&starter)),
            ("Current Plan".to_string(), true)
        );
        assert_eq!(
            PlanOffer::for_plan(Plan::Pro).button(Some(&starter)),
            ("Choose Pro".to_string(), false)
        );
        assert!(PlanOffer::for_plan(Plan::Trial).button(None).1);
        assert!(!PlanOffer::for_plan(Plan::Pro).button(None).1);
    }
}
