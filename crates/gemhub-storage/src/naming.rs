//! Upload naming and path helpers shared by every backend.

use chrono::Utc;
use rand::Rng;

use gemhub_core::error::AppError;
use gemhub_core::result::AppResult;

/// Build a collision-resistant stored file name:
/// `{millis}-{random}-{original name with whitespace replaced by '-'}`.
pub fn unique_file_name(original: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let random: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("{millis}-{random}-{}", sanitize_file_name(original))
}

/// Replace whitespace and path separators so the name stays a single
/// path component.
pub fn sanitize_file_name(original: &str) -> String {
    let cleaned: String = original
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '-'
            } else {
                c
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Alt text seed: the original name up to its first dot.
pub fn alt_text(original: &str) -> String {
    original
        .trim()
        .split('.')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Normalize a logical folder (`products/images`) into clean segments.
pub fn clean_folder(folder: &str) -> AppResult<String> {
    let segments: Vec<&str> = folder
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    if segments.iter().any(|s| *s == ".." || s.contains('\\')) {
        return Err(AppError::validation(format!("Invalid upload folder: {folder}")));
    }
    Ok(segments.join("/"))
}

/// Normalize a path relative to the public root, refusing anything that
/// could escape it.
pub fn clean_relative_path(path: &str) -> AppResult<String> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(AppError::validation("Asset path is empty"));
    }
    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
    if segments.iter().any(|s| *s == ".." || *s == "." || s.contains('\\')) {
        return Err(AppError::validation(format!("Invalid asset path: {path}")));
    }
    Ok(segments.join("/"))
}

/// Guess MIME type from a file path extension.
pub fn mime_from_path(path: &str) -> Option<String> {
    let (_, ext) = path.rsplit_once('.')?;
    let mime = match ext.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(mime.to_string())
}

/// Resolve the MIME type to record: the declared one, else a guess from
/// the name, else `application/octet-stream`.
pub fn effective_mime(declared: &str, file_name: &str) -> String {
    let declared = declared.trim();
    if !declared.is_empty() {
        return declared.to_lowercase();
    }
    mime_from_path(file_name).unwrap_or_else(|| "application/octet-stream".to_string())
}
