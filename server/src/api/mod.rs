use crate::auth::{self, Sessions};
use crate::error::ApiError;
use crate::store::Store;
use actix_web::{delete, get, post, web, HttpRequest, HttpResponse, Scope};
use chrono::{NaiveDate, Utc};
use medikeep_model::{Credentials, IntakeRecordCreate, MedicationCreate, Session, UserCreate};
use serde::Deserialize;
use serde_json::json;

/// The `/api` scope with all routes attached.
pub fn service() -> Scope {
    web::scope("/api")
        .service(index)
        .service(register)
        .service(login)
        .service(logout)
        .service(list_medications)
        .service(create_medication)
        .service(delete_medication)
        .service(create_intake)
        .service(list_intakes)
}

#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "API is running!",
    }))
}

#[post("/users")]
pub async fn register(
    store: web::Data<Store>,
    user: web::Json<UserCreate>,
) -> Result<HttpResponse, ApiError> {
    let user = user.into_inner();
    if user.username.trim().is_empty() || user.email.trim().is_empty() || user.password.is_empty()
    {
        return Err(ApiError::BadRequest(
            "username, email and password are required".into(),
        ));
    }

    // both columns are UNIQUE, pre-check them for a friendly conflict
    if store.user_by_email(&user.email).await?.is_some() {
        return Err(ApiError::Duplicate("email"));
    }
    if store.username_taken(&user.username).await? {
        return Err(ApiError::Duplicate("username"));
    }

    let hash = auth::hash_password(&user.password);
    let created = store.create_user(&user.username, &user.email, &hash).await?;
    log::info!("registered user {} ({})", created.user_id, created.username);

    Ok(HttpResponse::Created().json(created))
}

#[post("/login")]
pub async fn login(
    store: web::Data<Store>,
    sessions: web::Data<Sessions>,
    credentials: web::Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    let credentials = credentials.into_inner();

    let (user, hash) = store
        .user_by_email(&credentials.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !auth::verify_password(&credentials.password, &hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = sessions.create(user.user_id).await;
    log::debug!("session opened for user {}", user.user_id);

    Ok(HttpResponse::Ok().json(Session { token, user }))
}

#[post("/logout")]
pub async fn logout(
    req: HttpRequest,
    sessions: web::Data<Sessions>,
) -> Result<HttpResponse, ApiError> {
    let token = auth::bearer_token(&req)?;
    sessions.revoke(token).await;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/medications")]
pub async fn list_medications(
    req: HttpRequest,
    store: web::Data<Store>,
    sessions: web::Data<Sessions>,
) -> Result<HttpResponse, ApiError> {
    let user_id = auth::require_user(&req, &sessions).await?;
    let medications = store.medications(user_id).await?;
    Ok(HttpResponse::Ok().json(medications))
}

#[post("/medications")]
pub async fn create_medication(
    req: HttpRequest,
    store: web::Data<Store>,
    sessions: web::Data<Sessions>,
    medication: web::Json<MedicationCreate>,
) -> Result<HttpResponse, ApiError> {
    let user_id = auth::require_user(&req, &sessions).await?;

    let medication = medication.into_inner();
    if medication.name.trim().is_empty() || medication.dosage.trim().is_empty() {
        return Err(ApiError::BadRequest("name and dosage are required".into()));
    }

    let created = store.create_medication(user_id, &medication).await?;
    Ok(HttpResponse::Created().json(created))
}

#[delete("/medications/{id}")]
pub async fn delete_medication(
    req: HttpRequest,
    store: web::Data<Store>,
    sessions: web::Data<Sessions>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let user_id = auth::require_user(&req, &sessions).await?;

    match store.delete_medication(user_id, path.into_inner()).await? {
        true => Ok(HttpResponse::NoContent().finish()),
        false => Err(ApiError::NotFound),
    }
}

#[post("/intakes")]
pub async fn create_intake(
    req: HttpRequest,
    store: web::Data<Store>,
    sessions: web::Data<Sessions>,
    record: web::Json<IntakeRecordCreate>,
) -> Result<HttpResponse, ApiError> {
    let user_id = auth::require_user(&req, &sessions).await?;

    let record = record.into_inner();
    if store.medication(user_id, record.medication_id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let created = store.create_intake(user_id, &record).await?;
    Ok(HttpResponse::Created().json(created))
}

#[derive(Debug, Deserialize)]
pub struct IntakeQuery {
    date: Option<NaiveDate>,
    #[serde(default)]
    all: bool,
}

#[get("/intakes")]
pub async fn list_intakes(
    req: HttpRequest,
    store: web::Data<Store>,
    sessions: web::Data<Sessions>,
    query: web::Query<IntakeQuery>,
) -> Result<HttpResponse, ApiError> {
    let user_id = auth::require_user(&req, &sessions).await?;

    // no explicit day means "today", matching the dashboard's view of the world
    let date = match query.all {
        true => None,
        false => Some(query.date.unwrap_or_else(|| Utc::now().date_naive())),
    };

    let records = store.intakes(user_id, date).await?;
    Ok(HttpResponse::Ok().json(records))
}
