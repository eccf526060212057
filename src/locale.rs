/*!
 * Locale utilities for translation records.
 *
 * Locales are an ISO 639-1 (2-letter) or ISO 639-3 (3-letter) language
 * code, optionally followed by a region: `en`, `pl`, `en_US`, `pt-BR`.
 * The normalized form is lowercase language, uppercase region, `_` separator.
 */

use anyhow::{anyhow, Result};
use isolang::Language;

/// Whether a locale value is missing or empty
pub fn is_blank(locale: Option<&str>) -> bool {
    locale.is_none_or(|locale| locale.trim().is_empty())
}

/// Language part of a locale (`en` for `en_US`)
pub fn language_part(locale: &str) -> &str {
    locale
        .split(['_', '-'])
        .next()
        .unwrap_or_default()
}

/// Validate a locale code
pub fn validate_locale(locale: &str) -> Result<()> {
    normalize_locale(locale).map(|_| ())
}

/// Normalize a locale code (`EN-us` becomes `en_US`)
pub fn normalize_locale(locale: &str) -> Result<String> {
    let trimmed = locale.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Locale must not be empty"));
    }

    let mut parts = trimmed.split(['_', '-']);
    let language = parts.next().unwrap_or_default().to_lowercase();
    let region = parts.next();
    if parts.next().is_some() {
        return Err(anyhow!("Invalid locale: {}", locale));
    }

    let known = match language.len() {
        2 => Language::from_639_1(&language).is_some(),
        3 => Language::from_639_3(&language).is_some(),
        _ => false,
    };
    if !known {
        return Err(anyhow!("Invalid language code in locale: {}", locale));
    }

    match region {
        None => Ok(language),
        Some(region) if is_region_code(region) => Ok(format!("{}_{}", language, region.to_uppercase())),
        Some(_) => Err(anyhow!("Invalid region in locale: {}", locale)),
    }
}

/// Check if two locale codes name the same locale
pub fn locales_match(locale1: &str, locale2: &str) -> bool {
    match (normalize_locale(locale1), normalize_locale(locale2)) {
        (Ok(normalized1), Ok(normalized2)) => normalized1 == normalized2,
        _ => false,
    }
}

/// Get the English language name of a locale
pub fn get_language_name(locale: &str) -> Result<String> {
    let normalized = normalize_locale(locale)?;
    let language = language_part(&normalized);
    let lang = match language.len() {
        2 => Language::from_639_1(language),
        _ => Language::from_639_3(language),
    }
    .ok_or_else(|| anyhow!("Failed to get language from code: {}", language))?;

    Ok(lang.to_name().to_string())
}

/// Two letters (ISO 3166-1) or three digits (UN M.49)
fn is_region_code(region: &str) -> bool {
    (region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()))
        || (region.len() == 3 && region.chars().all(|c| c.is_ascii_digit()))
}
