mod common;

use mymess_client::error::Error;
use mymess_client::fetch::PageRequest;
use mymess_client::MyMess;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use common::*;

fn content_type(request: &Request) -> String {
    request
        .headers
        .iter()
        .find(|(name, _)| name.as_str().eq_ignore_ascii_case("content-type"))
        .map(|(_, values)| values.last().as_str().to_string())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mess/getAll"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mess/getAll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([mess_json()])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mymess = client(&mock_server);
    let messes = mymess.messes().list().await.unwrap();
    assert_eq!(messes[0].display_name(), "Ravi's Kitchen");
}

#[tokio::test]
async fn test_retries_give_up_after_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mess/getAll"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let options = options(&mock_server).with_max_retries(1);
    let mymess = MyMess::new_with_options(options).unwrap();
    match mymess.messes().list().await {
        Err(Error::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mess/getById/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mymess = client(&mock_server);
    let err = mymess.messes().get_by_id("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_members_are_paged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/mess/getUsers/{}", OWNER_PATH)))
        .and(query_param("pageNumber", "1"))
        .and(query_param("pageSize", "10"))
        .and(query_param("sortBy", "joinDate"))
        .and(query_param("sortDir", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [user_json()],
            "pageNumber": 1,
            "pageSize": 10,
            "totalElements": 11,
            "totalPages": 2,
            "lastPage": true
        })))
        .mount(&mock_server)
        .await;

    let mymess = client(&mock_server);
    let page = PageRequest::page(1, 10).sorted_by("joinDate", true);
    let members = mymess.messes().members(OWNER, &page).await.unwrap();
    assert_eq!(members.total_elements, 11);
    assert!(members.last_page);
    assert_eq!(members.content[0].email.as_deref(), Some(MEMBER));
}

#[tokio::test]
async fn test_nearby_messes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mess/getNearby"))
        .and(query_param("latitude", "18.52"))
        .and(query_param("longitude", "73.85"))
        .and(query_param("radius", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([mess_json()])))
        .mount(&mock_server)
        .await;

    let mymess = client(&mock_server);
    let nearby = mymess.messes().nearby(18.52, 73.85, None).await.unwrap();
    assert_eq!(nearby.len(), 1);

    let invalid = mymess.messes().nearby(95.0, 73.85, None).await;
    assert!(matches!(invalid, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_profile_image_upload_is_multipart() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/profile/{}", MEMBER_PATH)))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "imageName": "asha.png",
            "message": "Image uploaded",
            "success": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mymess = client(&mock_server);
    let uploaded = mymess
        .users()
        .upload_profile_image(MEMBER, "asha.png", vec![0x89, 0x50, 0x4e, 0x47])
        .await
        .unwrap();
    assert!(uploaded.success);

    let requests = mock_server.received_requests().await.unwrap();
    assert!(content_type(&requests[0]).starts_with("multipart/form-data"));
    assert_eq!(
        mymess.users().profile_image_url(MEMBER),
        format!("{}/profile/{}", mock_server.uri(), MEMBER_PATH)
    );
}

#[tokio::test]
async fn test_gallery_upload_sends_one_part_per_image() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/mess/images/{}", OWNER_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "imagesNames": ["thali.jpg", "hall.jpg"],
            "message": "Images uploaded",
            "success": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mymess = client(&mock_server);
    let files = vec![
        ("thali.jpg".to_string(), vec![0xff, 0xd8, 0xff]),
        ("hall.jpg".to_string(), vec![0xff, 0xd8, 0xfe]),
    ];
    let uploaded = mymess.messes().upload_images(OWNER, files).await.unwrap();
    assert_eq!(uploaded.images_names, vec!["thali.jpg", "hall.jpg"]);

    let requests = mock_server.received_requests().await.unwrap();
    assert!(content_type(&requests[0]).starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert_eq!(body.matches("name=\"images\"").count(), 2);
    assert!(body.contains("filename=\"thali.jpg\""));
    assert!(body.contains("filename=\"hall.jpg\""));

    let empty = mymess.messes().upload_images(OWNER, Vec::new()).await;
    assert!(matches!(empty, Err(Error::Validation(_))));
}
