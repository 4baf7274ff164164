use super::{required_text, FieldErrors, FormData};

pub const NAME: &str = "name";
pub const EMAIL: &str = "email";
pub const IMAGE: &str = "image";

#[derive(Debug, Clone, Default)]
pub struct CustomerInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

impl CustomerInput {
    pub fn from_form(form: &FormData) -> Self {
        Self {
            name: form.text(NAME).map(str::to_string),
            email: form.text(EMAIL).map(str::to_string),
            image: form.text(IMAGE).map(str::to_string),
        }
    }

    pub fn validate(self) -> Result<ValidCustomer, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required_text(self.name.as_deref());
        if name.is_none() {
            errors.add(NAME, "Customer name must not be empty.");
        }

        let email = required_text(self.email.as_deref());
        match &email {
            None => errors.add(EMAIL, "Email must not be empty."),
            Some(email) if !looks_like_email(email) => {
                errors.add(EMAIL, "Please enter a valid email address.")
            }
            Some(_) => {}
        }

        let image_url = required_text(self.image.as_deref());
        if image_url.is_none() {
            errors.add(IMAGE, "Image url must not be empty.");
        }

        match (name, email, image_url) {
            (Some(name), Some(email), Some(image_url)) if errors.is_empty() => Ok(ValidCustomer {
                name,
                email,
                image_url,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCustomer {
    pub name: String,
    pub email: String,
    pub image_url: String,
}

/// Exactly one `@` with something on both sides and no whitespace.
fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_customer_is_trimmed() {
        let form = FormData::new()
            .with_text(NAME, "  Amy Burns ")
            .with_text(EMAIL, "amy@burns.com")
            .with_text(IMAGE, "/customers/amy-burns.png");

        let customer = CustomerInput::from_form(&form).validate().unwrap();
        assert_eq!(customer.name, "Amy Burns");
        assert_eq!(customer.email, "amy@burns.com");
        assert_eq!(customer.image_url, "/customers/amy-burns.png");
    }

    #[test]
    fn test_missing_fields() {
        let errors = CustomerInput::default().validate().unwrap_err();
        assert_eq!(
            errors.get(NAME).unwrap(),
            ["Customer name must not be empty."]
        );
        assert_eq!(errors.get(EMAIL).unwrap(), ["Email must not be empty."]);
        assert_eq!(errors.get(IMAGE).unwrap(), ["Image url must not be empty."]);
    }

    #[test]
    fn test_email_shape() {
        assert!(looks_like_email("a@b"));
        assert!(!looks_like_email("ab"));
        assert!(!looks_like_email("@b"));
        assert!(!looks_like_email("a@"));
        assert!(!looks_like_email("a@b@c"));
        assert!(!looks_like_email("a b@c"));

        let input = CustomerInput {
            name: Some("Amy".to_string()),
            email: Some("amy.burns.com".to_string()),
            image: Some("/amy.png".to_string()),
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), [EMAIL]);
    }
}
