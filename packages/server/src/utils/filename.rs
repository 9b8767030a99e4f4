/// Validates an upload filename. Returns the trimmed name.
///
/// The name is only ever used for its extension, but path separators and
/// control characters are rejected outright rather than silently stripped.
pub fn validate_upload_filename(filename: &str) -> Result<&str, &'static str> {
    let trimmed = filename.trim();

    if trimmed.is_empty() || trimmed.chars().count() > 256 {
        return Err("Filename must be 1-256 characters");
    }

    if trimmed.contains(['/', '\\']) {
        return Err("Filename must not contain path separators");
    }

    if trimmed.contains('\0') {
        return Err("Filename must not contain null bytes");
    }

    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err("Filename must not contain control characters");
    }

    Ok(trimmed)
}

/// Extension from the filename, falling back to the MIME subtype.
pub fn image_extension(filename: &str, content_type: &str) -> Option<String> {
    let usable = |ext: &String| {
        !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric())
    };

    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(usable)
        .or_else(|| {
            let subtype = content_type.strip_prefix("image/")?;
            // "image/svg+xml" and friends: the part before '+' is the format.
            let base = subtype.split('+').next().unwrap_or(subtype);
            Some(base.to_ascii_lowercase()).filter(usable)
        })
}
