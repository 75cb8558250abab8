//! Input validation functions
//!
//! This module provides validation utilities for user input. Every
//! validator returns the message to surface to the user on failure.

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if !email.contains('@') || !email.contains('.') {
        return Err("Invalid email format".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    // Basic email regex check
    let email_regex = regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    if !email_regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a question id (stable snake_case key)
pub fn validate_question_id(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("Question id cannot be empty".to_string());
    }
    if id.len() > 64 {
        return Err("Question id too long".to_string());
    }
    let id_regex = regex_lite::Regex::new(r"^[a-z][a-z0-9_]*$").unwrap();
    if !id_regex.is_match(id) {
        return Err(format!(
            "Question id '{}' must be snake_case (lowercase letters, digits, underscores)",
            id
        ));
    }
    Ok(())
}

/// Validate a template name
pub fn validate_template_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Template name cannot be empty".to_string());
    }
    if trimmed.len() > 100 {
        return Err("Template name must be at most 100 characters".to_string());
    }
    Ok(())
}

/// Validate a tag name
pub fn validate_tag_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Tag name cannot be empty".to_string());
    }
    if trimmed.chars().count() > 50 {
        return Err("Tag name must be at most 50 characters".to_string());
    }
    Ok(())
}

/// Validate a display color in `#rrggbb` form
pub fn validate_hex_color(color: &str) -> Result<(), String> {
    let color_regex = regex_lite::Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();
    if color_regex.is_match(color) {
        Ok(())
    } else {
        Err("Color must look like #4a90d9".to_string())
    }
}

/// Validate a timezone name by shape (e.g. "UTC", "Europe/Vienna")
///
/// This checks the IANA naming shape only; resolving the zone against a
/// tz database is the client's concern.
pub fn validate_timezone(timezone: &str) -> Result<(), String> {
    if timezone.is_empty() {
        return Err("Timezone cannot be empty".to_string());
    }
    if timezone.len() > 64 {
        return Err("Timezone too long".to_string());
    }
    let tz_regex = regex_lite::Regex::new(r"^[A-Za-z][A-Za-z0-9_+\-]*(/[A-Za-z0-9_+\-]+)*$").unwrap();
    if !tz_regex.is_match(timezone) {
        return Err(format!("'{}' is not a valid timezone name", timezone));
    }
    Ok(())
}

/// Validate a search query
pub fn validate_search_query(query: &str) -> Result<(), String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err("Search query cannot be empty".to_string());
    }
    if trimmed.chars().count() > 200 {
        return Err("Search query must be at most 200 characters".to_string());
    }
    Ok(())
}

/// Maximum length of quick-entry content, in characters
pub const MAX_ENTRY_CONTENT_CHARS: usize = 50_000;

/// Validate quick-entry content
pub fn validate_entry_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Entry content cannot be empty".to_string());
    }
    if content.chars().count() > MAX_ENTRY_CONTENT_CHARS {
        return Err(format!(
            "Entry content must be at most {} characters",
            MAX_ENTRY_CONTENT_CHARS
        ));
    }
    Ok(())
}

/// Validate a latitude value
pub fn validate_latitude(latitude: f64) -> Result<(), String> {
    if latitude.is_nan() || latitude.is_infinite() {
        return Err("Latitude must be a valid number".to_string());
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90".to_string());
    }
    Ok(())
}

/// Validate a longitude value
pub fn validate_longitude(longitude: f64) -> Result<(), String> {
    if longitude.is_nan() || longitude.is_infinite() {
        return Err("Longitude must be a valid number".to_string());
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180".to_string());
    }
    Ok(())
}
