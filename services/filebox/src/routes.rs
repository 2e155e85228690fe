//! Filebox routes

use axum::{
    Extension, Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use bson::oid::ObjectId;
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::{AuthUser, auth_middleware},
    models::{
        FileRecord, FileRecordResponse, LoginRequest, MessageResponse, RegisterRequest,
        TokenResponse, post_from_json, post_to_json,
    },
};

/// Create the router for the Filebox service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/upload",
            post(upload_file).layer(DefaultBodyLimit::disable()),
        )
        .route("/myfiles", get(list_files))
        .route("/myfiles/:id", delete(delete_file))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(list_posts))
        .route("/health", get(health_check))
        .route("/uploads", post(create_post))
        .route("/uploads/:user_id/:filename", get(serve_upload))
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "filebox"
    }))
}

/// List every post
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let posts = state.post_repository.find_all().await.map_err(|e| {
        error!("Failed to list posts: {}", e);
        ApiError::RequestTimeout("Failed to list posts".to_string())
    })?;

    Ok(Json(posts.into_iter().map(post_to_json).collect::<Vec<_>>()))
}

/// Create a post from an arbitrary JSON object
pub async fn create_post(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = payload.map_err(|e| {
        debug!("Rejected post body: {}", e);
        ApiError::Conflict(e.body_text())
    })?;
    let post = post_from_json(body).map_err(|e| ApiError::Conflict(e.to_string()))?;

    let id = state.post_repository.create(post).await.map_err(|e| {
        error!("Failed to create post: {}", e);
        ApiError::Conflict(e.to_string())
    })?;
    info!("Created post {}", id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "New image uploaded...!" })),
    ))
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("Registration attempt for: {}", payload.email);

    state
        .credentials
        .register(&payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// Exchange credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("Login attempt for: {}", payload.email);

    let token = state
        .credentials
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// Store the multipart `file` field and attach it to the caller
pub async fn upload_file(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        ApiError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() != Some("file") {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read file bytes: {}", e);
            ApiError::BadRequest(format!("Failed to read file data: {}", e))
        })?;

        upload = Some((original_name, content_type, data));
    }

    let (original_name, content_type, data) =
        upload.ok_or_else(|| ApiError::BadRequest("File is required".to_string()))?;

    let stored = state
        .file_store
        .store(&user.id.to_hex(), &data, &original_name, content_type.as_deref())
        .await
        .map_err(|e| {
            error!("Failed to store upload for user {}: {}", user.id, e);
            ApiError::Internal("Error storing file".to_string())
        })?;

    let record = FileRecord::new(
        stored.filename,
        original_name,
        stored.mime_type,
        stored.path.clone(),
    );

    let failure = match state.user_repository.push_file(user.id, &record).await {
        Ok(true) => None,
        Ok(false) => {
            warn!("User {} vanished before upload completed", user.id);
            Some(ApiError::NotFound("User not found".to_string()))
        }
        Err(e) => Some(ApiError::Database(e)),
    };

    if let Some(err) = failure {
        if let Err(e) = state.file_store.delete(&stored.path).await {
            error!("Failed to remove orphaned upload {}: {}", stored.path, e);
        }
        return Err(err);
    }

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("File uploaded successfully")),
    ))
}

/// List the caller's file records
pub async fn list_files(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(
        user.files
            .into_iter()
            .map(FileRecordResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Delete one of the caller's files: bytes first, then the record
pub async fn delete_file(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let owner = state
        .user_repository
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let file_id = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::NotFound("File not found".to_string()))?;
    let record = owner
        .file(file_id)
        .ok_or_else(|| ApiError::NotFound("File not found".to_string()))?;

    state.file_store.delete(&record.path).await.map_err(|e| {
        error!("Failed to delete {}: {}", record.path, e);
        ApiError::Internal("Error deleting file".to_string())
    })?;

    state
        .user_repository
        .pull_file(user.id, file_id)
        .await
        .map_err(|e| {
            error!("Failed to remove file record {}: {}", file_id, e);
            ApiError::Internal("Error deleting file".to_string())
        })?;

    Ok(Json(MessageResponse::new("File deleted successfully")))
}

/// Serve a stored upload
pub async fn serve_upload(
    State(state): State<AppState>,
    Path((user_id, filename)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let not_found = || ApiError::NotFound("File not found".to_string());

    let path = state
        .file_store
        .resolve(&user_id, &filename)
        .map_err(|_| not_found())?;

    let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => not_found(),
        _ => {
            error!("Failed to read {}: {}", path.display(), e);
            ApiError::Internal("Error reading file".to_string())
        }
    })?;

    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, mime.to_string())], bytes))
}
