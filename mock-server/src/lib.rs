pub mod store;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use store::{AdoptionEntry, Pet, PetStatus, Store, Tip, User, ADMIN_EMAIL, ADMIN_PASSWORD};
use store::{AdoptionRejection, NewPet, PetChanges};

pub type Db = Arc<RwLock<Store>>;

#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateAdoption {
    pub pet_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize)]
pub struct AdoptionQuery {
    pub user: Option<i64>,
}

#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    fn done(message: &str, data: Option<T>) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data,
        }
    }
}

/// An error status with a `{"error": ...}` body.
#[derive(Debug)]
pub struct Failure(StatusCode, &'static str);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/pets", get(list_pets).post(create_pet))
        .route("/pets/{id}", put(update_pet).delete(delete_pet))
        .route("/adoptions", get(list_adoptions).post(create_adoption))
        .route("/tips", get(list_tips))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn authenticate(store: &Store, headers: &HeaderMap) -> Result<User, Failure> {
    bearer(headers)
        .and_then(|token| store.user_for_token(token))
        .ok_or(Failure(StatusCode::UNAUTHORIZED, "Authentication required"))
}

fn require_admin(store: &Store, headers: &HeaderMap) -> Result<User, Failure> {
    let user = authenticate(store, headers)?;
    if user.is_admin() {
        Ok(user)
    } else {
        Err(Failure(StatusCode::FORBIDDEN, "Admin access required"))
    }
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<Json<LoginResponse>, Failure> {
    let (token, user) = db
        .write()
        .await
        .login(input.email.trim(), &input.password)
        .ok_or(Failure(StatusCode::UNAUTHORIZED, "Invalid credentials"))?;
    info!(user_id = user.id, "login");
    Ok(Json(LoginResponse { token, user }))
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<Registration>,
) -> Result<(StatusCode, Json<serde_json::Value>), Failure> {
    let (name, email) = (input.name.trim(), input.email.trim());
    if name.is_empty() || email.is_empty() || input.password.is_empty() {
        return Err(Failure(
            StatusCode::BAD_REQUEST,
            "Name, email and password are required",
        ));
    }
    let mut store = db.write().await;
    if store.email_taken(email) {
        return Err(Failure(StatusCode::CONFLICT, "Email already registered"));
    }
    let user = store.add_account(name, email, &input.password, "user");
    info!(user_id = user.id, "registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    ))
}

async fn list_pets(State(db): State<Db>) -> Json<Envelope<Vec<Pet>>> {
    Json(Envelope::data(db.read().await.pets()))
}

async fn create_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<NewPet>,
) -> Result<(StatusCode, Json<Envelope<Pet>>), Failure> {
    let mut store = db.write().await;
    require_admin(&store, &headers)?;
    if input.name.trim().is_empty() {
        return Err(Failure(StatusCode::BAD_REQUEST, "Pet name is required"));
    }
    let pet = store.add_pet(input);
    Ok((
        StatusCode::CREATED,
        Json(Envelope::done("Pet added successfully", Some(pet))),
    ))
}

async fn update_pet(
    State(db): State<Db>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    input: Result<Json<PetChanges>, JsonRejection>,
) -> Result<Json<Envelope<Pet>>, Failure> {
    let mut store = db.write().await;
    require_admin(&store, &headers)?;
    let Json(input) = input.map_err(|_| Failure(StatusCode::BAD_REQUEST, "Invalid pet data"))?;
    let pet = store
        .update_pet(id, input)
        .ok_or(Failure(StatusCode::NOT_FOUND, "Pet not found"))?;
    Ok(Json(Envelope::done("Pet updated successfully", Some(pet))))
}

async fn delete_pet(
    State(db): State<Db>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Envelope<()>>, Failure> {
    let mut store = db.write().await;
    require_admin(&store, &headers)?;
    if !store.remove_pet(id) {
        return Err(Failure(StatusCode::NOT_FOUND, "Pet not found"));
    }
    Ok(Json(Envelope::done("Pet deleted successfully", None)))
}

async fn create_adoption(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateAdoption>,
) -> Result<(StatusCode, Json<Envelope<AdoptionEntry>>), Failure> {
    let mut store = db.write().await;
    let user = authenticate(&store, &headers)?;
    if input.user_id != user.id && !user.is_admin() {
        return Err(Failure(
            StatusCode::FORBIDDEN,
            "Cannot submit a request for another user",
        ));
    }
    let message = input.message.trim();
    if message.is_empty() {
        return Err(Failure(StatusCode::BAD_REQUEST, "Message is required"));
    }
    let entry = store
        .add_adoption(input.pet_id, input.user_id, message)
        .map_err(|rejection| match rejection {
            AdoptionRejection::UnknownPet => Failure(StatusCode::NOT_FOUND, "Pet not found"),
            AdoptionRejection::Unavailable => {
                Failure(StatusCode::CONFLICT, "Pet is not available for adoption")
            }
        })?;
    info!(adoption_id = entry.id, pet_id = entry.pet_id, "adoption requested");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::done(
            "Adoption request submitted successfully",
            Some(entry),
        )),
    ))
}

async fn list_adoptions(
    State(db): State<Db>,
    Query(query): Query<AdoptionQuery>,
    headers: HeaderMap,
) -> Result<Json<Envelope<Vec<AdoptionEntry>>>, Failure> {
    let store = db.read().await;
    let user = authenticate(&store, &headers)?;
    let target = query.user.unwrap_or(user.id);
    if target != user.id && !user.is_admin() {
        return Err(Failure(
            StatusCode::FORBIDDEN,
            "Cannot view another user's requests",
        ));
    }
    Ok(Json(Envelope::data(store.adoptions_for(target))))
}

async fn list_tips(State(db): State<Db>) -> Json<serde_json::Value> {
    Json(json!({ "tips": db.read().await.tips() }))
}
