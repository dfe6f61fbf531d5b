use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewPayment {
    pub client_id: String,
    /// Empty when the form left it unselected.
    pub receiver_account: String,
    pub total_amount: f64,
    pub deposit_amount: f64,
    /// Public URL of the transfer screenshot, if one was attached.
    pub payment_screenshot: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub id: String,
    pub client_id: String,
    pub receiver_account: String,
    pub total_amount: f64,
    pub deposit_amount: f64,
    pub payment_screenshot: Option<String>,
}
