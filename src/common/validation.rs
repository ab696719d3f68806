// Common validation types and traits

#[derive(Debug)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    /// Records an error when `value` is absent or only whitespace.
    pub fn require(&mut self, field: &str, value: Option<&str>, message: &str) {
        if value.map_or(true, |v| v.trim().is_empty()) {
            self.add_error(field, message);
        }
    }

    #[cfg(test)]
    pub fn has_error_for(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `field: message` pairs joined with ", ".
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Validator<T> {
    fn validate(&self, data: &T) -> ValidationResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_blank_and_missing() {
        let mut result = ValidationResult::new();
        result.require("a", None, "A is required");
        result.require("b", Some("   "), "B is required");
        result.require("c", Some("value"), "C is required");

        assert!(!result.is_valid);
        assert!(result.has_error_for("a"));
        assert!(result.has_error_for("b"));
        assert!(!result.has_error_for("c"));
        assert_eq!(result.errors.len(), 2);
    }
}
