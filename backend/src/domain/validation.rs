//! Field rules for request bodies.
//!
//! Every rule that fails contributes one [`FieldError`]; callers get the whole
//! list at once rather than the first failure.

use shared::{
    CreateCityRequest, CreateContinentRequest, CreateCountryRequest, FieldError, UpdateCityRequest,
    UpdateContinentRequest, UpdateCountryRequest,
};

use crate::error::AppError;

pub const CONTINENT_NAME_LEN: (usize, usize) = (3, 100);
pub const CONTINENT_DESCRIPTION_LEN: (usize, usize) = (10, 500);

pub trait Validate {
    fn validate(&self) -> Vec<FieldError>;
}

pub fn ensure_valid<T: Validate>(input: &T) -> Result<(), AppError> {
    let errors = input.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Collects failures for one request body
#[derive(Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn fail(&mut self, field: &str, message: String) {
        self.errors.push(FieldError::new(field, message));
    }

    fn not_blank(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.fail(field, format!("{field} must not be empty"));
            false
        } else {
            true
        }
    }

    /// Non-blank and within `(min, max)` characters, counted on the value as stored
    fn length(&mut self, field: &str, value: &str, (min, max): (usize, usize)) {
        if !self.not_blank(field, value) {
            return;
        }
        let count = value.chars().count();
        if count < min || count > max {
            self.fail(field, format!("{field} must be between {min} and {max} characters"));
        }
    }

    fn non_negative(&mut self, field: &str, value: i64) {
        if value < 0 {
            self.fail(field, format!("{field} must not be negative"));
        }
    }

    fn within(&mut self, field: &str, value: f64, min: f64, max: f64) {
        if !(min..=max).contains(&value) {
            self.fail(field, format!("{field} must be between {min} and {max}"));
        }
    }

    fn finish(self) -> Vec<FieldError> {
        self.errors
    }
}

impl Validate for CreateContinentRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut check = Checker::default();
        check.length("name", &self.name, CONTINENT_NAME_LEN);
        check.length("description", &self.description, CONTINENT_DESCRIPTION_LEN);
        check.finish()
    }
}

impl Validate for UpdateContinentRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut check = Checker::default();
        if let Some(name) = &self.name {
            check.length("name", name, CONTINENT_NAME_LEN);
        }
        if let Some(description) = &self.description {
            check.length("description", description, CONTINENT_DESCRIPTION_LEN);
        }
        check.finish()
    }
}

impl Validate for CreateCountryRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut check = Checker::default();
        check.not_blank("name", &self.name);
        check.not_blank("language", &self.language);
        check.not_blank("coin", &self.coin);
        check.not_blank("flag", &self.flag);
        check.non_negative("population", self.population);
        check.finish()
    }
}

impl Validate for UpdateCountryRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut check = Checker::default();
        let texts = [
            ("name", &self.name),
            ("language", &self.language),
            ("coin", &self.coin),
            ("flag", &self.flag),
        ];
        for (field, value) in texts {
            if let Some(value) = value {
                check.not_blank(field, value);
            }
        }
        if let Some(population) = self.population {
            check.non_negative("population", population);
        }
        check.finish()
    }
}

impl Validate for CreateCityRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut check = Checker::default();
        check.not_blank("name", &self.name);
        check.non_negative("population", self.population);
        check.within("latitude", self.latitude, -90.0, 90.0);
        check.within("longitude", self.longitude, -180.0, 180.0);
        check.finish()
    }
}

impl Validate for UpdateCityRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut check = Checker::default();
        if let Some(name) = &self.name {
            check.not_blank("name", name);
        }
        if let Some(population) = self.population {
            check.non_negative("population", population);
        }
        if let Some(latitude) = self.latitude {
            check.within("latitude", latitude, -90.0, 90.0);
        }
        if let Some(longitude) = self.longitude {
            check.within("longitude", longitude, -180.0, 180.0);
        }
        check.finish()
    }
}
