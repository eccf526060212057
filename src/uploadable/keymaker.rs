/*!
 * Upload key generation.
 *
 * A keymaker turns an entity, the name of its file property, the entity id
 * and the uploaded file's original name into the storage key of the file.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::errors::UploadableError;
use crate::property::EntityRef;

/// Pattern used when neither the caller nor the configuration supplies one
pub const DEFAULT_PATTERN: &str = "/{fqcn}/{property}/{id}/{original_name}";

/// Longest key produced unless configured otherwise
pub const DEFAULT_MAX_LENGTH: usize = 255;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}]*)\}").unwrap());

static REPEATED_SLASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"/{2,}").unwrap());

/// Creates storage keys for uploaded files
pub trait Keymaker: Send + Sync {
    fn create_key(
        &self,
        entity: &EntityRef,
        property: &str,
        id: &str,
        original_name: &str,
        pattern: Option<&str>,
    ) -> Result<String, UploadableError>;
}

/// Keymaker deriving the key from the entity class, property, id and file name
#[derive(Debug, Clone)]
pub struct EntityKeymaker {
    /// Pattern used when `create_key` gets none
    default_pattern: String,

    /// Keys longer than this are shortened, keeping the extension
    max_length: usize,
}

impl Default for EntityKeymaker {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN, DEFAULT_MAX_LENGTH)
    }
}

impl EntityKeymaker {
    pub fn new(default_pattern: impl Into<String>, max_length: usize) -> Self {
        Self {
            default_pattern: default_pattern.into(),
            max_length,
        }
    }

    pub fn default_pattern(&self) -> &str {
        &self.default_pattern
    }

    /// Fill `pattern` from explicit parts, without needing an entity handle
    pub fn render(
        &self,
        class_name: &str,
        property: &str,
        id: &str,
        original_name: &str,
        pattern: Option<&str>,
    ) -> Result<String, UploadableError> {
        let file_name = base_name(original_name);
        if file_name.is_empty() {
            return Err(UploadableError::EmptyOriginalName);
        }

        let pattern = pattern.unwrap_or(self.default_pattern.as_str());
        if pattern.trim().is_empty() {
            return Err(UploadableError::InvalidPattern("pattern is empty".to_string()));
        }

        let mut unknown = None;
        let key = PLACEHOLDER.replace_all(pattern, |captures: &Captures<'_>| {
            match &captures[1] {
                "fqcn" => class_segment(class_name),
                "property" => property.to_string(),
                "id" => id.to_string(),
                "original_name" => file_name.to_string(),
                other => {
                    unknown.get_or_insert_with(|| other.to_string());
                    String::new()
                }
            }
        });
        if let Some(placeholder) = unknown {
            return Err(UploadableError::UnknownPlaceholder(placeholder));
        }

        let key = REPEATED_SLASHES.replace_all(&key, "/").into_owned();
        if key.trim_matches('/').is_empty() {
            return Err(UploadableError::InvalidPattern(format!(
                "pattern \"{}\" produces an empty key",
                pattern
            )));
        }

        Ok(shorten(&key, self.max_length))
    }
}

impl Keymaker for EntityKeymaker {
    fn create_key(
        &self,
        entity: &EntityRef,
        property: &str,
        id: &str,
        original_name: &str,
        pattern: Option<&str>,
    ) -> Result<String, UploadableError> {
        self.render(entity.class_name(), property, id, original_name, pattern)
    }
}

/// File name without any directory part
fn base_name(original_name: &str) -> &str {
    original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
}

/// Class name usable as a single path segment
fn class_segment(class_name: &str) -> String {
    class_name.replace("::", "_").replace(['\\', '/'], "_")
}

/// Cut `key` to `max_length` characters, keeping the file extension when possible
fn shorten(key: &str, max_length: usize) -> String {
    if key.chars().count() <= max_length {
        return key.to_string();
    }

    let file_start = key.rfind('/').map_or(0, |index| index + 1);
    let extension = key[file_start..]
        .rfind('.')
        .map(|index| &key[file_start + index..])
        .filter(|extension| extension.chars().count() < max_length)
        .unwrap_or("");

    let keep = max_length - extension.chars().count();
    let stem: String = key.chars().take(keep).collect();
    format!("{}{}", stem, extension)
}
