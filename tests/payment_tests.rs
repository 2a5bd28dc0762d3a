mod common;

use mymess_client::error::Error;
use mymess_client::payment::RecordPayment;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

#[tokio::test]
async fn test_record_payment_uses_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payment/record"))
        .and(query_param("userEmail", MEMBER))
        .and(query_param("ownerEmail", OWNER))
        .and(query_param("messId", "m1"))
        .and(query_param("amountPaid", "1000"))
        .and(query_param("remainingDues", "2000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payment_json("2024-06-03T09:15:00", 1000.0, 2000.0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mymess = client(&mock_server);
    let payment = mymess
        .payments()
        .record(&RecordPayment {
            user_email: MEMBER.into(),
            owner_email: OWNER.into(),
            mess_id: "m1".into(),
            amount_paid: 1000.0,
            remaining_dues: 2000.0,
        })
        .await
        .unwrap();
    assert_eq!(payment.remaining_dues, 2000.0);
}

#[tokio::test]
async fn test_pay_records_what_is_left() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payment/record"))
        .and(query_param("amountPaid", "1200"))
        .and(query_param("remainingDues", "1800"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payment_json("2024-06-03T09:15:00", 1200.0, 1800.0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mymess = client(&mock_server);
    let payments = mymess.payments();

    let payment = payments.pay(MEMBER, OWNER, "m1", 3000.0, 1200.0).await.unwrap();
    assert_eq!(payment.remaining_dues, 1800.0);

    let overpaid = payments.pay(MEMBER, OWNER, "m1", 3000.0, 3500.0).await;
    assert!(matches!(overpaid, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_pending_dues_accepts_string_amounts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/payment/pending/user/{}/mess/m1", MEMBER_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userEmail": MEMBER,
            "messId": "m1",
            "pendingDues": "750.5"
        })))
        .mount(&mock_server)
        .await;

    let mymess = client(&mock_server);
    let dues = mymess.payments().pending_dues(MEMBER, "m1").await.unwrap();
    assert_eq!(dues.pending_dues, 750.5);
}

#[tokio::test]
async fn test_payments_in_range() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/payment/date-range"))
        .and(query_param("startDate", "2024-06-01T00:00:00"))
        .and(query_param("endDate", "2024-06-30T23:59:59"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            payment_json("2024-06-03T09:15:00", 1000.0, 2000.0),
            payment_json("2024-06-18T19:40:10.512", 500.0, 1500.0),
        ])))
        .mount(&mock_server)
        .await;

    let mymess = client(&mock_server);
    let start = date(2024, 6, 1).and_hms_opt(0, 0, 0).unwrap();
    let end = date(2024, 6, 30).and_hms_opt(23, 59, 59).unwrap();
    let payments = mymess.payments().in_range(start, end).await.unwrap();
    assert_eq!(payments.len(), 2);

    let reversed = mymess.payments().in_range(end, start).await;
    assert!(matches!(reversed, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_total_pending_for_mess() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/payment/total-pending/mess/m1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messId": "m1",
            "totalPendingDues": 4200.0
        })))
        .mount(&mock_server)
        .await;

    let mymess = client(&mock_server);
    let total = mymess.payments().total_pending_for_mess("m1").await.unwrap();
    assert_eq!(total.total_pending_dues, 4200.0);
}
