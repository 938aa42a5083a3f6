//! Serves the static HTML form that posts new notes to `/write`.

use actix_files::NamedFile;
use actix_web::{error, web};

use crate::AppState;

async fn upload_form(data: web::Data<AppState>) -> actix_web::Result<NamedFile> {
    let path = &data.config.upload_form_path;
    NamedFile::open_async(path).await.map_err(|e| {
        log::error!("Failed to open upload form {}: {}", path.display(), e);
        error::ErrorInternalServerError("Error loading HTML form")
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/UploadForm.html").route(web::get().to(upload_form)));
}
