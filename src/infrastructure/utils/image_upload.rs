use std::{io, path::Path};

use derive_more::Display;
use tokio::fs;
use uuid::Uuid;

use crate::domain::form_rules::image_extension;
use crate::errors::AppError;

/// URL prefix under which stored images are served.
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

/// Validates an uploaded image and copies it into `upload_dir` under a
/// random name. Returns the public URL of the stored file.
///
/// - `original_filename`: name supplied by the client
/// - `temp_path`: where the multipart layer spooled the upload
pub async fn store_project_image(
    original_filename: &str,
    temp_path: &Path,
    upload_dir: &Path,
) -> Result<String, ImageUploadError> {
    let extension = image_extension(original_filename).ok_or(ImageUploadError::InvalidExtension)?;

    match infer::get_from_path(temp_path).map_err(ImageUploadError::IoError)? {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => {}
        Some(kind) => return Err(ImageUploadError::InvalidType(kind.mime_type().to_string())),
        None => return Err(ImageUploadError::InvalidType("unknown".to_string())),
    }

    fs::create_dir_all(upload_dir).await.map_err(ImageUploadError::IoError)?;

    let file_name = format!("{}.{}", Uuid::new_v4(), extension);
    fs::copy(temp_path, upload_dir.join(&file_name))
        .await
        .map_err(ImageUploadError::IoError)?;

    Ok(format!("{UPLOAD_URL_PREFIX}/{file_name}"))
}

#[derive(Debug, Display)]
pub enum ImageUploadError {
    #[display("Only images are allowed")]
    InvalidExtension,

    #[display("Uploaded file is not an image: {_0}")]
    InvalidType(String),

    #[display("Failed to store image: {_0}")]
    IoError(io::Error),
}

impl From<ImageUploadError> for AppError {
    fn from(err: ImageUploadError) -> Self {
        match err {
            ImageUploadError::InvalidExtension | ImageUploadError::InvalidType(_) => {
                AppError::invalid_field("image", "Only images are allowed")
            }
            ImageUploadError::IoError(e) => AppError::InternalError(format!("Image storage failed: {e}")),
        }
    }
}
