//! Contact form extraction.
//!
//! The payload arrives as untyped JSON. A field is missing when it is absent or
//! falsy: `null`, `""`, `false` and `0`. Any other value is present; strings are
//! kept verbatim (no trimming) and other values are rendered as JSON text, so
//! `2024` becomes `"2024"`.

use serde_json::Value;
use thiserror::Error;

/// Fields every submission must carry, in reporting order.
pub const REQUIRED_FIELDS: [&str; 5] = ["email", "name", "ecole", "post", "message"];

/// Validation failure for an inbound form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// One or more required fields were missing or falsy.
    #[error("Missing required fields")]
    MissingFields(Vec<&'static str>),
}

/// A validated form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub email: String,
    pub name: String,
    pub ecole: String,
    pub post: String,
    pub message: String,
}

impl ContactForm {
    /// Validate an untyped payload.
    pub fn from_payload(payload: &Value) -> Result<Self, FormError> {
        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| field_value(payload, field).is_none())
            .collect();

        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }

        let take = |field: &str| field_value(payload, field).unwrap_or_default();

        Ok(Self {
            email: take("email"),
            name: take("name"),
            ecole: take("ecole"),
            post: take("post"),
            message: take("message"),
        })
    }
}

fn field_value(payload: &Value, field: &str) -> Option<String> {
    match payload.get(field)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full() -> Value {
        json!({
            "email": "a@b.com",
            "name": "Jo",
            "ecole": "X",
            "post": "Dev",
            "message": "hi"
        })
    }

    #[test]
    fn accepts_complete_form() {
        let form = ContactForm::from_payload(&full()).unwrap();
        assert_eq!(form.email, "a@b.com");
        assert_eq!(form.message, "hi");
    }

    #[test]
    fn each_missing_field_is_reported() {
        for field in REQUIRED_FIELDS {
            let mut payload = full();
            payload.as_object_mut().unwrap().remove(field);
            assert_eq!(
                ContactForm::from_payload(&payload),
                Err(FormError::MissingFields(vec![field]))
            );
        }
    }

    #[test]
    fn falsy_values_count_as_missing() {
        for falsy in [json!(null), json!(""), json!(false), json!(0)] {
            let mut payload = full();
            payload["name"] = falsy;
            assert_eq!(
                ContactForm::from_payload(&payload),
                Err(FormError::MissingFields(vec!["name"]))
            );
        }
    }

    #[test]
    fn truthy_non_strings_are_present() {
        let mut payload = full();
        payload["post"] = json!(2024);
        payload["ecole"] = json!(1.5);
        payload["name"] = json!(true);
        let form = ContactForm::from_payload(&payload).unwrap();
        assert_eq!(form.post, "2024");
        assert_eq!(form.ecole, "1.5");
        assert_eq!(form.name, "true");

        payload["post"] = json!(0.0);
        assert_eq!(
            ContactForm::from_payload(&payload),
            Err(FormError::MissingFields(vec!["post"]))
        );
    }

    #[test]
    fn non_object_payload_misses_everything() {
        let err = ContactForm::from_payload(&json!(["a@b.com"])).unwrap_err();
        assert_eq!(err, FormError::MissingFields(REQUIRED_FIELDS.to_vec()));
        assert_eq!(err.to_string(), "Missing required fields");
    }

    #[test]
    fn whitespace_is_kept_verbatim() {
        let mut payload = full();
        payload["message"] = json!("  hello\n");
        let form = ContactForm::from_payload(&payload).unwrap();
        assert_eq!(form.message, "  hello\n");
    }
}
