//! Project listing route handlers.
//!
//! Create and update accept multipart forms (the only content type the admin
//! console sends for projects) with an optional `image` file part. Stored
//! images live in Cloudinary; replacing or deleting a project removes the
//! old image best-effort, never blocking the database mutation.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::instrument;

use manara_core::ProjectId;

use crate::db::ProjectRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{NewProject, Project};
use crate::state::AppState;

/// Cloud folder for project images.
const PROJECT_IMAGE_FOLDER: &str = "projects";

/// Fields collected from the multipart form.
#[derive(Debug, Default)]
struct ProjectForm {
    title: Option<String>,
    location: Option<String>,
    price: Option<String>,
    kind: Option<String>,
    description: Option<String>,
    image: Option<ImageUpload>,
}

/// An uploaded image file part.
struct ImageUpload {
    data: Vec<u8>,
    content_type: String,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("content_type", &self.content_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// `GET /api/projects`
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>> {
    let items = ProjectRepository::new(state.pool()).list_published().await?;
    Ok(Json(json!({ "projects": items })))
}

/// `GET /api/projects/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Project>> {
    let id = parse_project_id(&raw_id)?;
    let published_only = !state.config().expose_unpublished_by_id;

    let project = ProjectRepository::new(state.pool())
        .find_by_id(id, published_only)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(project))
}

/// `POST /api/projects` (gated, multipart)
#[instrument(skip(state, multipart), fields(admin = %admin.email))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Project>)> {
    let form = read_form(multipart).await?;
    let fields = validate_form(&form)?;

    let image_url = match form.image {
        Some(upload) => Some(
            state
                .media()
                .store(upload.data, &upload.content_type, PROJECT_IMAGE_FOLDER)
                .await?,
        ),
        None => None,
    };

    let project = ProjectRepository::new(state.pool())
        .create(&fields, image_url.as_deref(), admin.id)
        .await?;

    tracing::info!(project_id = %project.id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// `PUT /api/projects/{id}` (gated, multipart)
///
/// When a new image accompanies the update, the replacement is stored first
/// and the previous image removed afterwards, best-effort.
#[instrument(skip(state, multipart), fields(admin = %admin.email))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(raw_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Project>> {
    let id = parse_project_id(&raw_id)?;
    let repo = ProjectRepository::new(state.pool());

    let existing = repo.find_by_id(id, false).await?.ok_or_else(not_found)?;

    let form = read_form(multipart).await?;
    let fields = validate_form(&form)?;

    let new_image_url = match form.image {
        Some(upload) => Some(
            state
                .media()
                .store(upload.data, &upload.content_type, PROJECT_IMAGE_FOLDER)
                .await?,
        ),
        None => None,
    };

    let project = repo
        .update(id, &fields, new_image_url.as_deref())
        .await?
        .ok_or_else(not_found)?;

    // The old image is orphaned once the row points at the new one.
    if new_image_url.is_some()
        && let Some(old_url) = existing.image.as_deref()
    {
        remove_best_effort(&state, old_url).await;
    }

    tracing::info!(project_id = %project.id, "Project updated");
    Ok(Json(project))
}

/// `DELETE /api/projects/{id}` (gated)
///
/// Attempts remote image removal before deleting the row; a failed removal
/// is logged and swallowed. The two steps are intentionally not atomic - a
/// crash in between leaves an orphaned remote image, which is acceptable.
#[instrument(skip(state), fields(admin = %admin.email))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_project_id(&raw_id)?;
    let repo = ProjectRepository::new(state.pool());

    let existing = repo.find_by_id(id, false).await?.ok_or_else(not_found)?;

    if let Some(image_url) = existing.image.as_deref() {
        remove_best_effort(&state, image_url).await;
    }

    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(not_found());
    }

    tracing::info!(project_id = %id, "Project deleted");
    Ok(Json(json!({ "message": "Project deleted successfully" })))
}

/// Remote image removal that never fails the request.
async fn remove_best_effort(state: &AppState, url: &str) {
    if let Err(e) = state.media().remove(url).await {
        tracing::warn!(url = %url, error = %e, "Failed to remove stored image");
    }
}

/// Parse a path id. Non-numeric ids behave like unknown ids (404).
fn parse_project_id(raw: &str) -> Result<ProjectId> {
    raw.parse::<i32>()
        .map(ProjectId::new)
        .map_err(|_| not_found())
}

fn not_found() -> AppError {
    AppError::NotFound("Project not found".to_owned())
}

/// Drain the multipart stream into a [`ProjectForm`].
async fn read_form(mut multipart: Multipart) -> Result<ProjectForm> {
    let mut form = ProjectForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| malformed_form())?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            "title" => form.title = Some(field.text().await.map_err(|_| malformed_form())?),
            "location" => form.location = Some(field.text().await.map_err(|_| malformed_form())?),
            "price" => form.price = Some(field.text().await.map_err(|_| malformed_form())?),
            "type" => form.kind = Some(field.text().await.map_err(|_| malformed_form())?),
            "description" => {
                form.description = Some(field.text().await.map_err(|_| malformed_form())?);
            }
            "image" => {
                let content_type = field
                    .content_type()
                    .map(str::to_owned)
                    .unwrap_or_else(|| "application/octet-stream".to_owned());
                let data = field.bytes().await.map_err(|_| malformed_form())?.to_vec();
                // Empty file inputs are sent by browsers when nothing was
                // selected; treat them as "no image".
                if !data.is_empty() {
                    form.image = Some(ImageUpload { data, content_type });
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

fn malformed_form() -> AppError {
    AppError::BadRequest("Malformed multipart form".to_owned())
}

/// Validate the collected form: title, location, price and type are
/// mandatory; description is optional.
fn validate_form(form: &ProjectForm) -> Result<NewProject> {
    let title = non_blank(form.title.as_deref());
    let location = non_blank(form.location.as_deref());
    let price = non_blank(form.price.as_deref());
    let kind_raw = non_blank(form.kind.as_deref());

    let (Some(title), Some(location), Some(price), Some(kind_raw)) =
        (title, location, price, kind_raw)
    else {
        return Err(AppError::BadRequest(
            "Title, location, price and type are required".to_owned(),
        ));
    };

    let kind = kind_raw
        .parse()
        .map_err(|e: manara_core::ProjectKindError| AppError::BadRequest(e.to_string()))?;

    Ok(NewProject {
        title,
        location,
        price,
        kind,
        description: non_blank(form.description.as_deref()),
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
