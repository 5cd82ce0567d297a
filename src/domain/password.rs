use validator::ValidationError;

const MIN_LENGTH: usize = 6;
const MAX_LENGTH: usize = 128;

pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let length = password.chars().count();

    if length < MIN_LENGTH {
        let mut error = ValidationError::new("password_length");
        error.message = Some(format!("Password must be at least {} characters long", MIN_LENGTH).into());
        return Err(error);
    }

    if length > MAX_LENGTH {
        let mut error = ValidationError::new("password_length");
        error.message = Some(format!("Password cannot exceed {} characters", MAX_LENGTH).into());
        return Err(error);
    }

    if password.trim().is_empty() {
        let mut error = ValidationError::new("password_blank");
        error.message = Some("Password cannot be blank".into());
        return Err(error);
    }

    Ok(())
}
