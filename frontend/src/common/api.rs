//! Calls into the medikeep server API.

use gloo_net::http::{Request, Response};
use medikeep_model::{
    Credentials, IntakeRecord, IntakeRecordCreate, Medication, MedicationCreate, Session, User,
    UserCreate,
};

pub async fn register(user: &UserCreate) -> Result<User, String> {
    let response = Request::post("/api/users")
        .json(user)
        .map_err(|err| format!("Failed to encode request: {err}"))?
        .send()
        .await
        .map_err(|err| format!("Failed to send request: {err}"))?;
    read_json(response).await
}

pub async fn login(credentials: &Credentials) -> Result<Session, String> {
    let response = Request::post("/api/login")
        .json(credentials)
        .map_err(|err| format!("Failed to encode request: {err}"))?
        .send()
        .await
        .map_err(|err| format!("Failed to send request: {err}"))?;
    read_json(response).await
}

pub async fn logout(token: &str) -> Result<(), String> {
    let response = Request::post("/api/logout")
        .header("authorization", &format!("Bearer {token}"))
        .send()
        .await
        .map_err(|err| format!("Failed to send request: {err}"))?;
    match response.ok() {
        true => Ok(()),
        false => Err(error_message(response).await),
    }
}

pub async fn medications(token: &str) -> Result<Vec<Medication>, String> {
    let response = Request::get("/api/medications")
        .header("authorization", &format!("Bearer {token}"))
        .send()
        .await
        .map_err(|err| format!("Failed to send request: {err}"))?;
    read_json(response).await
}

pub async fn create_medication(
    token: &str,
    medication: &MedicationCreate,
) -> Result<Medication, String> {
    let response = Request::post("/api/medications")
        .header("authorization", &format!("Bearer {token}"))
        .json(medication)
        .map_err(|err| format!("Failed to encode request: {err}"))?
        .send()
        .await
        .map_err(|err| format!("Failed to send request: {err}"))?;
    read_json(response).await
}

pub async fn delete_medication(token: &str, medication_id: i64) -> Result<(), String> {
    let response = Request::delete(&format!("/api/medications/{medication_id}"))
        .header("authorization", &format!("Bearer {token}"))
        .send()
        .await
        .map_err(|err| format!("Failed to send request: {err}"))?;
    match response.ok() {
        true => Ok(()),
        false => Err(error_message(response).await),
    }
}

pub async fn record_intake(
    token: &str,
    record: &IntakeRecordCreate,
) -> Result<IntakeRecord, String> {
    let response = Request::post("/api/intakes")
        .header("authorization", &format!("Bearer {token}"))
        .json(record)
        .map_err(|err| format!("Failed to encode request: {err}"))?
        .send()
        .await
        .map_err(|err| format!("Failed to send request: {err}"))?;
    read_json(response).await
}

pub async fn todays_intakes(token: &str) -> Result<Vec<IntakeRecord>, String> {
    let response = Request::get("/api/intakes")
        .header("authorization", &format!("Bearer {token}"))
        .send()
        .await
        .map_err(|err| format!("Failed to send request: {err}"))?;
    read_json(response).await
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, String> {
    match response.ok() {
        true => response
            .json::<T>()
            .await
            .map_err(|err| format!("Failed to read response: {err}")),
        false => Err(error_message(response).await),
    }
}

#[derive(serde::Deserialize)]
struct ErrorMessage {
    message: String,
}

async fn error_message(response: Response) -> String {
    match response.json::<ErrorMessage>().await {
        Ok(err) => err.message,
        Err(_) => format!("{} ({})", response.status_text(), response.status()),
    }
}
