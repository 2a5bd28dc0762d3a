#![allow(dead_code)]

use std::time::Duration;

use chrono::NaiveDate;
use jsonwebtoken::{encode, EncodingKey, Header};
use mymess_client::config::ClientOptions;
use mymess_client::MyMess;
use serde_json::{json, Value};
use wiremock::MockServer;

pub const MEMBER: &str = "asha@example.com";
pub const MEMBER_PATH: &str = "asha%40example.com";
pub const OWNER: &str = "owner@example.com";
pub const OWNER_PATH: &str = "owner%40example.com";

pub fn options(server: &MockServer) -> ClientOptions {
    ClientOptions::default()
        .with_base_url(&server.uri())
        .with_retry_base_delay(Duration::from_millis(1))
}

pub fn client(server: &MockServer) -> MyMess {
    MyMess::new_with_options(options(server)).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn token(email: &str, exp: i64) -> String {
    encode(
        &Header::default(),
        &json!({ "sub": email, "exp": exp }),
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .unwrap()
}

pub fn user_json() -> Value {
    json!({
        "id": "u1",
        "name": "Asha",
        "email": MEMBER,
        "messId": "m1",
        "joinDate": "2024-06-01",
        "subscriptionPlan": "Monthly",
        "foodType": "Veg"
    })
}

pub fn mess_json() -> Value {
    json!({
        "id": "m1",
        "name": "Ravi",
        "email": OWNER,
        "messName": "Ravi's Kitchen",
        "messType": "Veg",
        "pricePerMeal": 100,
        "subscriptionPlan": 30,
        "currentDate": "2024-05-20",
        "joinedUsers": [MEMBER, "bina@example.com"]
    })
}

pub fn leave_json(id: &str, start: &str, end: &str, status: &str) -> Value {
    json!({
        "id": id,
        "userEmail": MEMBER,
        "messId": "m1",
        "ownerEmail": OWNER,
        "startDate": start,
        "endDate": end,
        "reason": "Family function",
        "status": status,
        "applicationDate": "2024-06-01"
    })
}

pub fn payment_json(date_time: &str, paid: f64, remaining: f64) -> Value {
    json!({
        "id": format!("p-{}", date_time),
        "userEmail": MEMBER,
        "ownerEmail": OWNER,
        "messId": "m1",
        "totalDues": 3000.0,
        "amountPaid": paid,
        "remainingDues": remaining,
        "paymentDate": date_time,
        "status": "COMPLETED"
    })
}

pub fn envelope(payload: Value) -> Value {
    json!({ "success": true, "message": "ok", "payload": payload })
}
