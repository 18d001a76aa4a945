//! Payment client. The gateway itself is external; this only starts payments
//! and reads their records.

use super::types::{
    CreatePaymentRequest, PaymentReceipt, PaymentRecord, SubscriptionReceipt, SubscriptionRequest,
};
use crate::auth::Plan;
use crate::transport::{endpoint, HttpTransport};
use crate::Result;
use std::sync::Arc;

#[derive(Clone)]
pub struct PaymentClient {
    transport: Arc<HttpTransport>,
}

impl PaymentClient {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    pub async fn create_payment(&self, plan: Plan, amount: f64) -> Result<PaymentReceipt> {
        self.transport
            .send_json(&endpoint::PAYMENT_CREATE, &CreatePaymentRequest { plan, amount })
            .await
    }

    pub async fn payment_history(&self) -> Result<Vec<PaymentRecord>> {
        self.transport.get_json(&endpoint::PAYMENT_HISTORY).await
    }

    /// Ask the backend for a gateway URL to move to `plan`.
    pub async fn trigger_upgrade(&self, plan: Plan) -> Result<PaymentReceipt> {
        self.transport
            .send_query(&endpoint::PAYMENT_UPGRADE, &[("plan", plan.as_str())])
            .await
    }

    /// Submit a manually paid subscription for admin review.
    pub async fn subscription_request(
        &self,
        amount: f64,
        transaction_id: &str,
    ) -> Result<SubscriptionReceipt> {
        self.transport
            .send_json(
                &endpoint::PAYMENT_SUBSCRIPTION_REQUEST,
                &SubscriptionRequest {
                    amount,
                    transaction_id,
                },
            )
            .await
    }
}
