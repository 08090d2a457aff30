use rand::{seq::SliceRandom, Rng};

use crate::{errors::AppError, structs::Rider};

/// Passwords are stored as given, so login is a verbatim comparison.
pub fn verify_password(provided: &str, stored: &str) -> bool {
    provided == stored
}

/// Picks one rider with probability 1/N, or `None` when the pool is empty.
pub fn choose_rider<'a, R: Rng + ?Sized>(available: &'a [Rider], rng: &mut R) -> Option<&'a Rider> {
    available.choose(rng)
}

pub fn require_non_empty(fields: &[(&str, &str)]) -> Result<(), AppError> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(AppError::BadRequest(format!("Field '{name}' is required"))),
        None => Ok(()),
    }
}

pub fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::BadRequest(
            "Price must be a non-negative number".to_owned(),
        ));
    }
    Ok(())
}

pub fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
