use adoptly_mock_server::{
    app, AdoptionEntry, Envelope, LoginResponse, Pet, PetStatus, ADMIN_EMAIL, ADMIN_PASSWORD,
};
use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::{Service, ServiceExt};

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body.to_string()).unwrap()
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<String> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(String::new()).unwrap()
}

async fn call(app: &mut Router, request: Request<String>) -> axum::response::Response {
    ServiceExt::<Request<String>>::ready(app)
        .await
        .unwrap()
        .call(request)
        .await
        .unwrap()
}

async fn login(app: &mut Router, email: &str, password: &str) -> String {
    let body = format!(r#"{{"email":"{email}","password":"{password}"}}"#);
    let resp = call(app, json_request("POST", "/auth/login", None, &body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let login: LoginResponse = body_json(resp).await;
    login.token
}

async fn register_and_login(app: &mut Router, email: &str) -> (String, i64) {
    let body = format!(r#"{{"name":"Test User","email":"{email}","password":"password"}}"#);
    let resp = call(app, json_request("POST", "/auth/register", None, &body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = format!(r#"{{"email":"{email}","password":"password"}}"#);
    let resp = call(app, json_request("POST", "/auth/login", None, &body)).await;
    let login: LoginResponse = body_json(resp).await;
    (login.token, login.user.id)
}

// --- auth ---

#[tokio::test]
async fn login_with_bad_password_returns_401() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            None,
            r#"{"email":"admin@example.com","password":"wrong"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn admin_login_returns_token_and_user() {
    let body = format!(r#"{{"email":"{ADMIN_EMAIL}","password":"{ADMIN_PASSWORD}"}}"#);
    let resp = app()
        .oneshot(json_request("POST", "/auth/login", None, &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let login: LoginResponse = body_json(resp).await;
    assert!(!login.token.is_empty());
    assert_eq!(login.user.role, "admin");
}

#[tokio::test]
async fn register_twice_returns_409() {
    let mut app = app();
    let body = r#"{"name":"Test User","email":"test@example.com","password":"password"}"#;

    let resp = call(&mut app, json_request("POST", "/auth/register", None, body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: serde_json::Value = body_json(resp).await;
    assert_eq!(created["message"], "User registered successfully");

    let resp = call(&mut app, json_request("POST", "/auth/register", None, body)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_requires_fields() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            None,
            r#"{"name":"","email":"a@b.c","password":"x"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_login_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/auth/login", None, r#"{"email":1}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- pets ---

#[tokio::test]
async fn list_pets_is_public() {
    let resp = app()
        .oneshot(empty_request("GET", "/pets", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let pets: Envelope<Vec<Pet>> = body_json(resp).await;
    let pets = pets.data.unwrap();
    assert_eq!(pets.len(), 3);
    assert_eq!(pets[0].name, "Max");
}

#[tokio::test]
async fn create_pet_without_token_returns_401() {
    let resp = app()
        .oneshot(json_request("POST", "/pets", None, r#"{"name":"New Pet"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_pet_as_user_returns_403() {
    let mut app = app();
    let (token, _) = register_and_login(&mut app, "user@example.com").await;
    let resp = call(
        &mut app,
        json_request("POST", "/pets", Some(&token), r#"{"name":"New Pet"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn update_pet_bad_id_returns_400() {
    let resp = app()
        .oneshot(json_request("PUT", "/pets/not-a-number", None, "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_with_unknown_status_returns_400() {
    let mut app = app();
    let token = login(&mut app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let resp = call(
        &mut app,
        json_request("PUT", "/pets/1", Some(&token), r#"{"status":"banana"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "Invalid pet data");

    // the listing is untouched
    let resp = call(&mut app, empty_request("GET", "/pets", None)).await;
    let pets: Envelope<Vec<Pet>> = body_json(resp).await;
    assert_eq!(pets.data.unwrap()[0].status, PetStatus::Available);
}

#[tokio::test]
async fn delete_unknown_pet_returns_404() {
    let mut app = app();
    let token = login(&mut app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let resp = call(&mut app, empty_request("DELETE", "/pets/999", Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_pet_lifecycle() {
    let mut app = app();
    let token = login(&mut app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    // create
    let resp = call(
        &mut app,
        json_request(
            "POST",
            "/pets",
            Some(&token),
            r#"{"name":"Bella","type":"cat","breed":"Persian","age":3}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Envelope<Pet> = body_json(resp).await;
    assert_eq!(created.message.as_deref(), Some("Pet added successfully"));
    let pet = created.data.unwrap();
    assert_eq!(pet.status, PetStatus::Available);
    let id = pet.id;

    // update: partial
    let resp = call(
        &mut app,
        json_request("PUT", &format!("/pets/{id}"), Some(&token), r#"{"age":4}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Envelope<Pet> = body_json(resp).await;
    let updated = updated.data.unwrap();
    assert_eq!(updated.age, 4);
    assert_eq!(updated.breed, "Persian"); // unchanged

    // delete
    let resp = call(&mut app, empty_request("DELETE", &format!("/pets/{id}"), Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert!(body.get("data").is_none());

    // list: back to the seed
    let resp = call(&mut app, empty_request("GET", "/pets", None)).await;
    let pets: Envelope<Vec<Pet>> = body_json(resp).await;
    assert!(pets.data.unwrap().iter().all(|p| p.id != id));
}

// --- adoptions ---

#[tokio::test]
async fn adoptions_require_a_token() {
    let resp = app()
        .oneshot(empty_request("GET", "/adoptions?user=1", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn adoption_request_lifecycle() {
    let mut app = app();
    let (token, user_id) = register_and_login(&mut app, "adopter@example.com").await;

    let body = format!(r#"{{"pet_id":1,"user_id":{user_id},"message":"I would love to adopt Max"}}"#);
    let resp = call(&mut app, json_request("POST", "/adoptions", Some(&token), &body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Envelope<AdoptionEntry> = body_json(resp).await;
    assert_eq!(
        created.message.as_deref(),
        Some("Adoption request submitted successfully")
    );

    let resp = call(
        &mut app,
        empty_request("GET", &format!("/adoptions?user={user_id}"), Some(&token)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let list: Envelope<Vec<AdoptionEntry>> = body_json(resp).await;
    assert!(list.success);
    let entries = list.data.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].pet_name, "Max");
    assert_eq!(entries[0].breed, "Labrador");
    assert_eq!(entries[0].status, "pending");
}

#[tokio::test]
async fn cannot_list_another_users_requests() {
    let mut app = app();
    let (token, user_id) = register_and_login(&mut app, "nosy@example.com").await;
    let other = user_id + 100;
    let resp = call(
        &mut app,
        empty_request("GET", &format!("/adoptions?user={other}"), Some(&token)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn adoption_needs_a_message() {
    let mut app = app();
    let (token, user_id) = register_and_login(&mut app, "quiet@example.com").await;
    let body = format!(r#"{{"pet_id":1,"user_id":{user_id},"message":"  "}}"#);
    let resp = call(&mut app, json_request("POST", "/adoptions", Some(&token), &body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = body_bytes(resp).await;
    assert!(!bytes.is_empty());
}

// --- tips ---

#[tokio::test]
async fn tips_feed() {
    let resp = app()
        .oneshot(empty_request("GET", "/tips", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert!(!body["tips"].as_array().unwrap().is_empty());
}
