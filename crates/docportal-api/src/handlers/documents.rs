//! Document listing, folder creation, upload, download, rename, and
//! delete handlers under `/system-owner`.

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use uuid::Uuid;

use docportal_core::error::AppError;
use docportal_entity::file::{EntryType, File};
use docportal_entity::folder::Folder;
use docportal_service::document::{
    DeleteSummary, DocumentListing, ListingQuery, RenamedEntry, UploadedFile,
};

use crate::dto::request::{CreateFolderRequest, RenameRequest, validate};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_entry_type, parse_menu, parse_uuid};
use crate::state::AppState;

/// GET /system-owner/{menu}?search=&type=&folder_id=&page=
pub async fn list_documents(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(menu): Path<String>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ApiResponse<DocumentListing>>, ApiError> {
    let slug = parse_menu(&menu)?;
    let listing = state.listing_service.list(&auth, slug, query).await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// POST /system-owner/{menu}/create-folder
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(menu): Path<String>,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Folder>>), ApiError> {
    let slug = parse_menu(&menu)?;
    validate(&req)?;

    let folder = state
        .mutation_service
        .create_folder(&auth, slug, req.parent_id, &req.folder_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(folder, "Folder created successfully")),
    ))
}

/// POST /system-owner/{menu}/upload (multipart: `file`, optional `folder_id`)
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(menu): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<File>>), ApiError> {
    let slug = parse_menu(&menu)?;

    let mut folder_id: Option<Uuid> = None;
    let mut file_name: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "folder_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                let text = text.trim();
                if !text.is_empty() {
                    folder_id = Some(parse_uuid(text)?);
                }
            }
            "file" => {
                file_name = field.file_name().map(String::from);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| AppError::validation("The file field is required."))?;
    let file_name = file_name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::validation("The file field must be a file."))?;

    let file = state
        .mutation_service
        .upload(
            &auth,
            slug,
            folder_id,
            UploadedFile {
                name: file_name,
                data,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(file, "File uploaded successfully")),
    ))
}

/// GET /system-owner/download/{id}
pub async fn download(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_uuid(&id)?;
    let result = state.mutation_service.download(&auth, id).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, result.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&result.file.name),
        )
        .header(header::CONTENT_LENGTH, result.file.size())
        .body(Body::from_stream(result.stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// PATCH /system-owner/{menu}/{id}/{type}/update
pub async fn rename(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((menu, id, entry_type)): Path<(String, String, String)>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<ApiResponse<RenamedEntry>>, ApiError> {
    let slug = parse_menu(&menu)?;
    let id = parse_uuid(&id)?;
    let entry_type = parse_entry_type(&entry_type)?;
    validate(&req)?;

    let renamed = state
        .mutation_service
        .rename(&auth, slug, id, entry_type, &req.name)
        .await?;

    let message = match entry_type {
        EntryType::File => "File renamed successfully",
        EntryType::Folder => "Folder renamed successfully",
    };
    Ok(Json(ApiResponse::with_message(renamed, message)))
}

/// DELETE /system-owner/{menu}/{id}/{type}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((menu, id, entry_type)): Path<(String, String, String)>,
) -> Result<Json<ApiResponse<DeleteSummary>>, ApiError> {
    let slug = parse_menu(&menu)?;
    let id = parse_uuid(&id)?;
    let entry_type = parse_entry_type(&entry_type)?;

    let summary = state
        .mutation_service
        .delete(&auth, slug, id, entry_type)
        .await?;

    let message = match entry_type {
        EntryType::File => "File deleted successfully",
        EntryType::Folder => "Folder deleted successfully",
    };
    Ok(Json(ApiResponse::with_message(summary, message)))
}

/// Characters kept verbatim in an RFC 5987 `ext-value`.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// `attachment` disposition carrying an ASCII `filename` fallback and the
/// exact UTF-8 name in `filename*`.
fn content_disposition(name: &str) -> String {
    let clean: String = name.chars().filter(|c| !c.is_control()).collect();
    let fallback: String = clean
        .chars()
        .flat_map(|c| match c {
            '"' | '\\' => vec!['\\', c],
            c if c.is_ascii() => vec![c],
            _ => vec!['_'],
        })
        .collect();
    let encoded = utf8_percent_encode(&clean, ATTR_CHAR);
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_quotes_name() {
        assert_eq!(
            content_disposition("report.pdf"),
            "attachment; filename=\"report.pdf\"; filename*=UTF-8''report.pdf"
        );
        assert_eq!(
            content_disposition("a\"b\\c.txt"),
            "attachment; filename=\"a\\\"b\\\\c.txt\"; filename*=UTF-8''a%22b%5Cc.txt"
        );
        assert_eq!(
            content_disposition("x\r\ny.csv"),
            "attachment; filename=\"xy.csv\"; filename*=UTF-8''xy.csv"
        );
    }

    #[test]
    fn test_content_disposition_encodes_non_ascii_name() {
        let value = content_disposition("Bericht Ü.pdf");
        assert_eq!(
            value,
            "attachment; filename=\"Bericht _.pdf\"; filename*=UTF-8''Bericht%20%C3%9C.pdf"
        );
        assert!(value.is_ascii());

        assert_eq!(
            content_disposition("報告.pdf"),
            "attachment; filename=\"__.pdf\"; filename*=UTF-8''%E5%A0%B1%E5%91%8A.pdf"
        );
    }
}
