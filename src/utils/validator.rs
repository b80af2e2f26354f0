use validator::ValidationError;

pub fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

pub fn validate_record_id(val: &str) -> Result<(), ValidationError> {
    let mut parts = val.splitn(2, ':');
    let table = parts.next().unwrap_or_default();
    let key = parts.next().unwrap_or_default();

    if table.is_empty() || key.is_empty() {
        return Err(ValidationError::new("invalid_record_id"));
    }

    if !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::new("invalid_record_table"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_are_rejected() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("Stanford").is_ok());
    }

    #[test]
    fn record_ids_need_table_and_key() {
        assert!(validate_record_id("schools:abc").is_ok());
        assert!(validate_record_id("schools").is_err());
        assert!(validate_record_id("sch ools:abc").is_err());
    }
}
