use std::path::Path;

use serde::{Deserialize, Deserializer};
use validator::ValidationError;

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Rejects empty and whitespace-only input.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Accepts only filenames carrying one of the allowed image extensions.
pub fn allowed_image_extension(filename: &str) -> Result<(), ValidationError> {
    match image_extension(filename) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("file_allowed")),
    }
}

/// Lowercased extension of `filename` if it is an allowed image type.
pub fn image_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .filter(|e| ALLOWED_IMAGE_EXTENSIONS.contains(&e.as_str()))
}

/// Form fields that are present but empty are treated as absent.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// HTML checkboxes send a value ("y", "on", ...) only when ticked.
pub fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().is_some_and(is_checked))
}

/// Truthiness of a submitted checkbox value.
pub fn is_checked(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !matches!(value.to_lowercase().as_str(), "false" | "off" | "0" | "n" | "no")
}
