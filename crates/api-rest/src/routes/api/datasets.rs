//! Dataset catalog endpoints.

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use modelabs_application::{DatasetFilter, DatasetUpload};
use modelabs_domain::{DatasetId, DatasetRecord, DatasetVisibility};
use serde::Deserialize;

/// Listing query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetQuery {
    /// Text matched against name and description
    pub search: Option<String>,
    /// Tag filter
    pub tag: Option<String>,
    /// Requesting user, for private datasets
    pub user_id: Option<String>,
}

impl From<DatasetQuery> for DatasetFilter {
    fn from(query: DatasetQuery) -> Self {
        let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        DatasetFilter {
            search: non_empty(query.search),
            tag: non_empty(query.tag),
            user_id: non_empty(query.user_id),
        }
    }
}

/// Dataset routes; `body_limit` caps multipart uploads
pub fn routes(body_limit: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/datasets",
            get(list_datasets)
                .post(upload_dataset)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/datasets/:id", get(get_dataset).delete(delete_dataset))
}

async fn list_datasets(
    State(state): State<AppState>,
    Query(query): Query<DatasetQuery>,
) -> ApiResult<Json<Vec<DatasetRecord>>> {
    Ok(Json(state.datasets.list(&query.into()).await?))
}

async fn get_dataset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DatasetRecord>> {
    Ok(Json(state.datasets.get(&parse_id(&id)?).await?))
}

async fn upload_dataset(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<DatasetRecord>)> {
    let multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let max_bytes = state.datasets.max_upload_bytes();
    let upload = read_upload(multipart, max_bytes).await?;
    let record = state.datasets.upload(upload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn delete_dataset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.datasets.delete(&parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(id: &str) -> ApiResult<DatasetId> {
    id.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid dataset id: {}", id)))
}

/// Collect the multipart form into an upload. Unknown fields are ignored.
async fn read_upload(mut multipart: Multipart, max_bytes: u64) -> ApiResult<DatasetUpload> {
    let mut upload = DatasetUpload::default();
    let mut has_file = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            upload.file_name = field.file_name().unwrap_or_default().to_string();
            upload.content_type = field.content_type().map(str::to_string);
            upload.data = field.bytes().await.map_err(|e| multipart_error(e, max_bytes))?;
            has_file = true;
            continue;
        }

        let value = field.text().await.map_err(|e| multipart_error(e, max_bytes))?;
        let value = Some(value).filter(|v| !v.trim().is_empty());

        match name.as_str() {
            "userId" => upload.user_id = value,
            "userEmail" => upload.user_email = value,
            "name" => upload.name = value,
            "description" => upload.description = value,
            "tags" => upload.tags = split_tags(value.as_deref().unwrap_or_default()),
            "visibility" => {
                if let Some(v) = value {
                    upload.visibility = v
                        .parse::<DatasetVisibility>()
                        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                }
            }
            _ => {}
        }
    }

    if !has_file {
        return Err(ApiError::BadRequest("Missing file".to_string()));
    }

    Ok(upload)
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn multipart_error(err: MultipartError, max_bytes: u64) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!(
            "File size must be less than {}MB",
            max_bytes / (1024 * 1024)
        ))
    } else {
        ApiError::BadRequest(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags(" math, reasoning ,,code "), vec!["math", "reasoning", "code"]);
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn test_blank_query_params_are_ignored() {
        let filter: DatasetFilter = DatasetQuery {
            search: Some("  ".to_string()),
            tag: Some("math".to_string()),
            user_id: None,
        }
        .into();
        assert!(filter.search.is_none());
        assert_eq!(filter.tag.as_deref(), Some("math"));
    }
}
