//! Notes REST API — create, read, update, delete and list notes.
//!
//! `/notes/{name}` addresses a single note, `/notes` lists them all and
//! `POST /write` creates one from the upload form.

use actix_multipart::Multipart;
use actix_web::guard::{self, GuardContext};
use actix_web::http::header::{self, ContentType};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use futures_util::StreamExt;
use notes_types::CreateNoteForm;

use crate::notes::NoteError;
use crate::AppState;

/// Largest accepted note text (request body or form field)
pub const MAX_NOTE_BYTES: usize = 1024 * 1024;

impl ResponseError for NoteError {
    fn status_code(&self) -> StatusCode {
        match self {
            NoteError::InvalidName { .. } => StatusCode::BAD_REQUEST,
            NoteError::AlreadyExists(_) => StatusCode::BAD_REQUEST,
            NoteError::NotFound(_) => StatusCode::NOT_FOUND,
            NoteError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            NoteError::InvalidName { .. } => self.to_string(),
            NoteError::AlreadyExists(_) => "Bad Request. Note already exists".to_string(),
            NoteError::NotFound(_) => "Not Found".to_string(),
            // io details stay in the log
            NoteError::Storage(_) => "Internal server error".to_string(),
        };
        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(body)
    }
}

/// Log storage failures with the operation that hit them
fn log_failure(action: &str, name: &str, err: &NoteError) {
    if let NoteError::Storage(e) = err {
        log::error!("[NOTES] Failed to {} note '{}': {}", action, name, e);
    }
}

// --- Single note ---

async fn read_note(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, NoteError> {
    let name = path.into_inner();
    let text = data
        .store
        .read(&name)
        .await
        .inspect_err(|e| log_failure("read", &name, e))?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(text))
}

/// `HEAD /notes/{name}`: 200 if the note exists, 404 otherwise
async fn note_exists(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, NoteError> {
    let name = path.into_inner();
    let exists = data
        .store
        .exists(&name)
        .await
        .inspect_err(|e| log_failure("check", &name, e))?;

    if exists {
        Ok(HttpResponse::Ok().finish())
    } else {
        Err(NoteError::NotFound(name))
    }
}

async fn update_note(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: String,
) -> Result<HttpResponse, NoteError> {
    let name = path.into_inner();
    data.store
        .update(&name, &body)
        .await
        .inspect_err(|e| log_failure("update", &name, e))?;

    Ok(HttpResponse::Ok().body("Note updated"))
}

async fn delete_note(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, NoteError> {
    let name = path.into_inner();
    data.store
        .delete(&name)
        .await
        .inspect_err(|e| log_failure("delete", &name, e))?;

    Ok(HttpResponse::Ok().body("Deleted"))
}

// --- List notes ---

async fn list_notes(data: web::Data<AppState>) -> Result<HttpResponse, NoteError> {
    let notes = data
        .store
        .list()
        .await
        .inspect_err(|e| log_failure("list", "*", e))?;

    Ok(HttpResponse::Ok().json(notes))
}

// --- Create note ---

async fn create_note(data: &AppState, form: CreateNoteForm) -> Result<HttpResponse, NoteError> {
    data.store
        .create(&form.note_name, &form.note)
        .await
        .inspect_err(|e| log_failure("create", &form.note_name, e))?;

    log::info!("[NOTES] Created note '{}'", form.note_name);
    Ok(HttpResponse::Created().body("Created"))
}

/// `POST /write` with an urlencoded body
async fn create_note_form(
    data: web::Data<AppState>,
    form: web::Form<CreateNoteForm>,
) -> Result<HttpResponse, NoteError> {
    create_note(&data, form.into_inner()).await
}

/// `POST /write` with a multipart body (what the upload form sends)
async fn create_note_multipart(
    data: web::Data<AppState>,
    payload: Multipart,
) -> actix_web::Result<HttpResponse> {
    let form = match read_multipart_form(payload).await {
        Ok(form) => form,
        Err(resp) => return Ok(resp),
    };
    Ok(create_note(&data, form).await?)
}

/// Collect the `note_name` and `note` fields; other fields are ignored
async fn read_multipart_form(mut payload: Multipart) -> Result<CreateNoteForm, HttpResponse> {
    let mut note_name: Option<String> = None;
    let mut note: Option<String> = None;

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(field) => field,
            Err(e) => {
                return Err(HttpResponse::BadRequest()
                    .body(format!("Failed to process form: {}", e)));
            }
        };

        let field_name = field.name().to_string();
        if field_name != "note_name" && field_name != "note" {
            continue;
        }

        let mut data: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            match chunk {
                Ok(bytes) => {
                    data.extend_from_slice(&bytes);
                    if data.len() > MAX_NOTE_BYTES {
                        return Err(HttpResponse::PayloadTooLarge().body(format!(
                            "Field '{}' exceeds {} bytes",
                            field_name, MAX_NOTE_BYTES
                        )));
                    }
                }
                Err(e) => {
                    return Err(HttpResponse::BadRequest()
                        .body(format!("Failed to read field '{}': {}", field_name, e)));
                }
            }
        }

        let value = match String::from_utf8(data) {
            Ok(v) => v,
            Err(_) => {
                return Err(HttpResponse::BadRequest()
                    .body(format!("Field '{}' is not valid UTF-8", field_name)));
            }
        };

        if field_name == "note_name" {
            note_name = Some(value);
        } else {
            note = Some(value);
        }
    }

    match note_name {
        Some(note_name) => Ok(CreateNoteForm {
            note_name,
            note: note.unwrap_or_default(),
        }),
        None => Err(HttpResponse::BadRequest().body("Missing note_name field")),
    }
}

fn is_multipart(ctx: &GuardContext<'_>) -> bool {
    ctx.head()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_NOTE_BYTES))
        .app_data(web::FormConfig::default().limit(MAX_NOTE_BYTES))
        .service(web::resource("/notes").route(web::get().to(list_notes)))
        .service(
            web::resource("/notes/{name}")
                .route(web::get().to(read_note))
                .route(web::head().to(note_exists))
                .route(web::put().to(update_note))
                .route(web::delete().to(delete_note)),
        )
        .service(
            web::resource("/write")
                .route(
                    web::post()
                        .guard(guard::fn_guard(is_multipart))
                        .to(create_note_multipart),
                )
                .route(web::post().to(create_note_form)),
        );
}
