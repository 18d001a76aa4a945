//! 支付模块：创建支付、升级套餐、订阅申请与支付记录。

mod client;
mod types;

pub use client::PaymentClient;
pub use types::{PaymentReceipt, PaymentRecord, PaymentStatus, SubscriptionReceipt};
