//! Types for payments

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// A payment as recorded by the backend; payments are never edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default)]
    pub id: Option<String>,
    pub user_email: String,
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default)]
    pub mess_id: String,
    #[serde(default)]
    pub total_dues: f64,
    #[serde(default)]
    pub amount_paid: f64,
    #[serde(default)]
    pub remaining_dues: f64,
    #[serde(default)]
    pub payment_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub period_start: Option<NaiveDateTime>,
    #[serde(default)]
    pub period_end: Option<NaiveDateTime>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub mess_name: Option<String>,
}

/// Parameters of `/payment/record`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPayment {
    pub user_email: String,
    pub owner_email: String,
    pub mess_id: String,
    pub amount_paid: f64,
    pub remaining_dues: f64,
}

/// Reply of `/payment/pending/user/{email}/mess/{messId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingDues {
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub mess_id: Option<String>,
    #[serde(deserialize_with = "lenient_amount")]
    pub pending_dues: f64,
}

/// Reply of `/payment/total-pending/mess/{messId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalPendingDues {
    #[serde(default)]
    pub mess_id: Option<String>,
    #[serde(deserialize_with = "lenient_amount")]
    pub total_pending_dues: f64,
}

/// Accept amounts sent either as JSON numbers or numeric strings
fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pending_dues_accepts_numeric_strings() {
        let dues: PendingDues = serde_json::from_value(json!({
            "userEmail": "asha@example.com",
            "messId": "m1",
            "pendingDues": "1250.5"
        }))
        .unwrap();
        assert_eq!(dues.pending_dues, 1250.5);

        let dues: PendingDues = serde_json::from_value(json!({"pendingDues": 0})).unwrap();
        assert_eq!(dues.pending_dues, 0.0);
    }

    #[test]
    fn payment_reads_backend_timestamps() {
        let payment: Payment = serde_json::from_value(json!({
            "id": "p1",
            "userEmail": "asha@example.com",
            "ownerEmail": "owner@example.com",
            "messId": "m1",
            "totalDues": 3000.0,
            "amountPaid": 1000.0,
            "remainingDues": 2000.0,
            "paymentDate": "2024-06-02T18:30:12.345",
            "status": "COMPLETED"
        }))
        .unwrap();
        assert_eq!(payment.remaining_dues, 2000.0);
        assert!(payment.payment_date.is_some());
    }
}
