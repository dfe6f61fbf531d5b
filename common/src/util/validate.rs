use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Egyptian mobile: 010/011/012/015 + 8 digits, local `0` or `+20`/`20` prefix.
    static ref MOBILE_RE: Regex = Regex::new(r"^(?:\+?20|0)1[0125]\d{8}$").unwrap();
}

/// ✅ Local mobile-number check (WhatsApp and phone fields)
pub fn validate_mobile(phone: &str) -> Result<(), ValidationError> {
    if MOBILE_RE.is_match(phone) { Ok(()) } else { Err(ValidationError::new("mobile")) }
}

/// ✅ `YYYY-MM-DD` calendar date
pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(_) => Ok(()),
        Err(_) => Err(ValidationError::new("date")),
    }
}

/// Most services one client can request.
pub const MAX_SERVICE_IDS: usize = 20;
/// Longest accepted service id.
pub const MAX_SERVICE_ID_LEN: usize = 64;

/// Requested service ids: at most `MAX_SERVICE_IDS`, each a non-blank token
/// of at most `MAX_SERVICE_ID_LEN` characters.
pub fn validate_id_list(ids: &[String]) -> Result<(), ValidationError> {
    if ids.len() > MAX_SERVICE_IDS {
        return Err(ValidationError::new("too_many")
            .with_message(format!("At most {MAX_SERVICE_IDS} services can be requested").into()));
    }
    if ids.iter().any(|id| id.trim().is_empty()) {
        return Err(ValidationError::new("blank_id").with_message("Service ids must not be blank".into()));
    }
    if ids.iter().any(|id| id.chars().count() > MAX_SERVICE_ID_LEN) {
        return Err(ValidationError::new("id_length")
            .with_message(format!("Service ids must be at most {MAX_SERVICE_ID_LEN} characters").into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_accepts_local_and_international_forms() {
        for ok in ["01012345678", "01098765432", "01512345678", "+201012345678", "201112345678"] {
            assert!(validate_mobile(ok).is_ok(), "{ok}");
        }
    }

    #[test]
    fn mobile_rejects_wrong_prefix_or_length() {
        for bad in ["0101234567", "010123456789", "01312345678", "12345678901", "+2010123456", "", "0101234567a"] {
            assert!(validate_mobile(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn dates_must_be_real_calendar_days() {
        assert!(validate_date("1995-02-28").is_ok());
        assert!(validate_date("1995-02-30").is_err());
        assert!(validate_date("28/02/1995").is_err());
    }

    #[test]
    fn service_ids_are_bounded() {
        let code = |ids: Vec<String>| validate_id_list(&ids).unwrap_err().code.to_string();
        assert!(validate_id_list(&["svc-1".to_string()]).is_ok());
        assert!(validate_id_list(&vec!["svc".to_string(); MAX_SERVICE_IDS]).is_ok());
        assert_eq!(code(vec!["svc-1".to_string(), " ".to_string()]), "blank_id");
        assert_eq!(code(vec!["x".repeat(MAX_SERVICE_ID_LEN + 1)]), "id_length");
        assert_eq!(code(vec!["svc".to_string(); MAX_SERVICE_IDS + 1]), "too_many");
    }
}
