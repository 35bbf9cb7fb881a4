use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Program {
    pub id_carrera: i64,
    pub nombre_carrera: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Requirement {
    pub id_requerimiento: i64,
    pub titulo: String,
    pub descripcion: String,
    pub id_carrera: i64,
    pub presupuesto: Option<f64>,
}

#[derive(Deserialize)]
pub struct RequirementInput {
    pub titulo: String,
    pub descripcion: String,
    pub id_carrera: i64,
    pub presupuesto: Option<f64>,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing or invalid bearer token")]
    Unauthorized,
    #[error("Not allowed to edit this requirement")]
    Forbidden,
    #[error("Requirement not found")]
    NotFound,
    #[error("Duplicate title")]
    Conflict,
    #[error("{0}")]
    Validation(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        tracing::debug!(%status, error = %self, "request rejected");
        (status, Json(ErrorMessage { message: self.to_string() })).into_response()
    }
}

struct Stored {
    owner: String,
    requirement: Requirement,
}

#[derive(Default)]
struct Store {
    next_id: i64,
    requirements: BTreeMap<i64, Stored>,
}

#[derive(Clone)]
pub struct AppState {
    programs: Arc<Vec<Program>>,
    store: Arc<RwLock<Store>>,
}

impl AppState {
    pub fn new(programs: Vec<Program>) -> Self {
        Self {
            programs: Arc::new(programs),
            store: Arc::new(RwLock::new(Store::default())),
        }
    }
}

/// Programs served when no explicit list is given.
pub fn default_programs() -> Vec<Program> {
    [
        (1, "Ingeniería de Sistemas"),
        (2, "Diseño Gráfico"),
        (3, "Derecho"),
        (4, "Contaduría Pública"),
    ]
    .into_iter()
    .map(|(id_carrera, name)| Program {
        id_carrera,
        nombre_carrera: name.to_string(),
    })
    .collect()
}

pub fn app() -> Router {
    app_with_state(AppState::new(default_programs()))
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/api/carreras", get(list_programs))
        .route("/api/requerimientos", post(create_requirement))
        .route("/api/requerimientos/mios", get(list_my_requirements))
        .route("/api/requerimientos/{id}", patch(update_requirement))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// The token itself is the account identity.
fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;
    let token = value.strip_prefix("Bearer ").map(str::trim).unwrap_or_default();
    if token.is_empty() {
        return Err(ApiError::Unauthorized);
    }
    Ok(token.to_string())
}

fn validate(state: &AppState, input: &RequirementInput) -> Result<(), ApiError> {
    if input.titulo.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".into()));
    }
    if input.descripcion.trim().is_empty() {
        return Err(ApiError::Validation("Description is required".into()));
    }
    if !state.programs.iter().any(|p| p.id_carrera == input.id_carrera) {
        return Err(ApiError::Validation("Unknown program".into()));
    }
    if input.presupuesto.is_some_and(|b| b < 0.0) {
        return Err(ApiError::Validation("Budget must not be negative".into()));
    }
    Ok(())
}

fn title_taken(store: &Store, owner: &str, title: &str, except: Option<i64>) -> bool {
    store.requirements.values().any(|s| {
        s.owner == owner
            && Some(s.requirement.id_requerimiento) != except
            && s.requirement.titulo.trim().eq_ignore_ascii_case(title.trim())
    })
}

async fn list_programs(State(state): State<AppState>) -> Json<Vec<Program>> {
    Json(state.programs.as_ref().clone())
}

async fn create_requirement(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RequirementInput>,
) -> Result<(StatusCode, Json<Requirement>), ApiError> {
    let owner = bearer_token(&headers)?;
    validate(&state, &input)?;

    let mut store = state.store.write().await;
    if title_taken(&store, &owner, &input.titulo, None) {
        return Err(ApiError::Conflict);
    }
    store.next_id += 1;
    let requirement = Requirement {
        id_requerimiento: store.next_id,
        titulo: input.titulo,
        descripcion: input.descripcion,
        id_carrera: input.id_carrera,
        presupuesto: input.presupuesto,
    };
    store.requirements.insert(
        requirement.id_requerimiento,
        Stored {
            owner,
            requirement: requirement.clone(),
        },
    );
    tracing::info!(id = requirement.id_requerimiento, "requirement created");
    Ok((StatusCode::CREATED, Json(requirement)))
}

async fn update_requirement(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(input): Json<RequirementInput>,
) -> Result<Json<Requirement>, ApiError> {
    let owner = bearer_token(&headers)?;
    validate(&state, &input)?;

    let mut store = state.store.write().await;
    match store.requirements.get(&id) {
        None => return Err(ApiError::NotFound),
        Some(stored) if stored.owner != owner => return Err(ApiError::Forbidden),
        Some(_) => {}
    }
    if title_taken(&store, &owner, &input.titulo, Some(id)) {
        return Err(ApiError::Conflict);
    }
    let stored = store.requirements.get_mut(&id).ok_or(ApiError::NotFound)?;
    stored.requirement.titulo = input.titulo;
    stored.requirement.descripcion = input.descripcion;
    stored.requirement.id_carrera = input.id_carrera;
    stored.requirement.presupuesto = input.presupuesto;
    tracing::info!(id, "requirement updated");
    Ok(Json(stored.requirement.clone()))
}

async fn list_my_requirements(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Requirement>>, ApiError> {
    let owner = bearer_token(&headers)?;
    let store = state.store.read().await;
    Ok(Json(
        store
            .requirements
            .values()
            .filter(|s| s.owner == owner)
            .map(|s| s.requirement.clone())
            .collect(),
    ))
}
