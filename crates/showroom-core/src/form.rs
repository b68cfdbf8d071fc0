//! Text fields of a multipart form
//!
//! Browsers send every value as a string, lists as repeated keys (`tags`,
//! `tags[]`) or as a JSON-encoded array. [`FormFields`] hides those differences.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::AppError;

#[derive(Debug, Clone, Default)]
pub struct FormFields {
    values: HashMap<String, Vec<String>>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value; `name[]` and `name` are stored under the same key.
    pub fn push(&mut self, name: &str, value: String) {
        let key = name.strip_suffix("[]").unwrap_or(name).to_string();
        self.values.entry(key).or_default().push(value);
    }

    /// Whether the client sent the field at all (even empty).
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// First value, trimmed; empty strings count as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.values
            .get(name)
            .and_then(|v| v.first())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// First value as sent, without trimming; `None` only when the field is absent.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Fail with the names of every required field that is absent or blank.
    pub fn require(&self, names: &[&str]) -> Result<(), AppError> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| self.text(name).is_none())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::MissingFields(missing.join(", ")))
        }
    }

    pub fn bool(&self, name: &str) -> Result<Option<bool>, AppError> {
        match self.text(name) {
            None => Ok(None),
            Some(v) => match v.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Some(true)),
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                _ => Err(AppError::InvalidInput(format!(
                    "{} must be a boolean",
                    name
                ))),
            },
        }
    }

    pub fn number<T: FromStr>(&self, name: &str) -> Result<Option<T>, AppError> {
        match self.text(name) {
            None => Ok(None),
            Some(v) => v
                .parse::<T>()
                .map(Some)
                .map_err(|_| AppError::InvalidInput(format!("{} must be a number", name))),
        }
    }

    /// List values: a JSON array in a single field, or repeated fields.
    pub fn list(&self, name: &str) -> Result<Option<Vec<String>>, AppError> {
        let Some(values) = self.values.get(name) else {
            return Ok(None);
        };

        if let [single] = values.as_slice() {
            let trimmed = single.trim();
            if trimmed.starts_with('[') {
                let parsed: Vec<String> = serde_json::from_str(trimmed).map_err(|_| {
                    AppError::InvalidInput(format!("{} must be a JSON array of strings", name))
                })?;
                return Ok(Some(clean_list(parsed)));
            }
        }

        Ok(Some(clean_list(values.clone())))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = FormFields::new();
        for (k, v) in iter {
            form.push(&k.into(), v.into());
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_reports_all_missing() {
        let form: FormFields = [("title", "Civic"), ("make", "  ")].into_iter().collect();
        match form.require(&["title", "make", "model"]) {
            Err(AppError::MissingFields(names)) => assert_eq!(names, "make, model"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bool_parsing() {
        let form: FormFields = [("a", "true"), ("b", "false"), ("c", "maybe")]
            .into_iter()
            .collect();
        assert_eq!(form.bool("a").unwrap(), Some(true));
        assert_eq!(form.bool("b").unwrap(), Some(false));
        assert!(form.bool("c").is_err());
        assert_eq!(form.bool("d").unwrap(), None);
    }

    #[test]
    fn test_list_accepts_json_and_repeated_fields() {
        let form: FormFields = [
            ("categories", r#"["Tech", " AI "]"#),
            ("tags[]", "one"),
            ("tags[]", "two"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            form.list("categories").unwrap(),
            Some(vec!["Tech".to_string(), "AI".to_string()])
        );
        assert_eq!(
            form.list("tags").unwrap(),
            Some(vec!["one".to_string(), "two".to_string()])
        );
        assert_eq!(form.list("missing").unwrap(), None);
    }

    #[test]
    fn test_malformed_json_list_is_rejected() {
        let form: FormFields = [("categories", "[not json")].into_iter().collect();
        assert!(form.list("categories").is_err());
    }

    #[test]
    fn test_number_parsing() {
        let form: FormFields = [("price", "12500.50"), ("doors", "four")]
            .into_iter()
            .collect();
        assert_eq!(form.number::<f64>("price").unwrap(), Some(12500.5));
        assert!(form.number::<i32>("doors").is_err());
    }
}
