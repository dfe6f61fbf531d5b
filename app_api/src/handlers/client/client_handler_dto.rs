use biz_service::entitys::client_entity::NewClient;
use biz_service::entitys::file_entity::UploadedFile;
use biz_service::manager::client_intake_manager::{ClientIntake, PaymentDraft};
use common::errors::{field_errors, AppError, FieldError};
use common::util::common_utils::non_empty;
use common::util::validate::{validate_date, validate_id_list, validate_mobile};
use log::debug;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Text part of the client intake form. File parts (`files[]`, up to 5, and
/// an optional `payment_screenshot`) travel next to these fields in the same
/// multipart body.
#[derive(Debug, Default, Clone, Deserialize, Validate, ToSchema)]
pub struct ClientFormDto {
    #[validate(length(min = 1, max = 150, message = "Full name is required (max 150 characters)"))]
    pub full_name: String,
    /// `YYYY-MM-DD`
    #[validate(custom(function = "validate_date", message = "Birth date must be a valid YYYY-MM-DD date"))]
    pub birth_date: Option<String>,
    #[validate(custom(function = "validate_mobile", message = "Invalid WhatsApp number"))]
    pub whatsapp_number: String,
    #[validate(custom(function = "validate_mobile", message = "Invalid phone number"))]
    pub phone_number: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    pub job_title: Option<String>,
    pub education: Option<String>,
    pub work_experience: Option<String>,
    pub soft_skills: Option<String>,
    pub important_notes: Option<String>,
    pub ad_whatsapp_channel: Option<String>,
    /// Sent as repeated `requested_services[]` parts, at most 20.
    #[validate(length(min = 1, message = "Select at least one service"))]
    #[validate(custom(function = "validate_id_list"))]
    pub requested_services: Vec<String>,
    pub receiver_account: Option<String>,
    /// Decimal, empty means 0.
    pub total_amount: Option<String>,
    pub deposit_amount: Option<String>,
}

impl ClientFormDto {
    /// Stores one text part. Values are trimmed; blank optional values stay `None`.
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "full_name" => self.full_name = value.trim().to_string(),
            "birth_date" => self.birth_date = non_empty(Some(value)),
            "whatsapp_number" => self.whatsapp_number = value.trim().to_string(),
            "phone_number" => self.phone_number = value.trim().to_string(),
            "email" => self.email = value.trim().to_string(),
            "address" => self.address = value.trim().to_string(),
            "job_title" => self.job_title = non_empty(Some(value)),
            "education" => self.education = non_empty(Some(value)),
            "work_experience" => self.work_experience = non_empty(Some(value)),
            "soft_skills" => self.soft_skills = non_empty(Some(value)),
            "important_notes" => self.important_notes = non_empty(Some(value)),
            "ad_whatsapp_channel" => self.ad_whatsapp_channel = non_empty(Some(value)),
            "requested_services" => self.requested_services.push(value.trim().to_string()),
            "receiver_account" => self.receiver_account = non_empty(Some(value)),
            "total_amount" => self.total_amount = non_empty(Some(value)),
            "deposit_amount" => self.deposit_amount = non_empty(Some(value)),
            other => debug!("ignoring unknown form field {}", other),
        }
    }

    /// Runs the field rules and parses the amounts. Every failing field is
    /// reported, not just the first.
    pub fn check(&self) -> Result<(f64, f64), AppError> {
        let mut details = match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors(&e),
        };
        let total = parse_amount("total_amount", self.total_amount.as_deref());
        let deposit = parse_amount("deposit_amount", self.deposit_amount.as_deref());
        for amount in [&total, &deposit] {
            if let Err(e) = amount {
                details.push(e.clone());
            }
        }
        if !details.is_empty() {
            details.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
            return Err(AppError::InvalidFields(details));
        }
        Ok((total.unwrap_or_default(), deposit.unwrap_or_default()))
    }
}

fn parse_amount(field: &str, raw: Option<&str>) -> Result<f64, FieldError> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(0.0);
    };
    match raw.parse::<f64>() {
        Ok(v) if !v.is_finite() => Err(FieldError::new(field, "number", "Amount must be a number")),
        Ok(v) if v < 0.0 => Err(FieldError::new(field, "range", "Amount must be positive")),
        Ok(v) => Ok(v),
        Err(_) => Err(FieldError::new(field, "number", "Amount must be a number")),
    }
}

/// Everything read from one multipart body.
#[derive(Debug, Default)]
pub struct ClientFormParts {
    pub form: ClientFormDto,
    pub files: Vec<UploadedFile>,
    pub payment_screenshot: Option<UploadedFile>,
}

impl ClientFormParts {
    pub fn into_intake(self, inserted_by: &str, total_amount: f64, deposit_amount: f64) -> ClientIntake {
        let form = self.form;
        ClientIntake {
            client: NewClient {
                full_name: form.full_name,
                birth_date: form.birth_date,
                whatsapp_number: form.whatsapp_number,
                phone_number: form.phone_number,
                email: form.email,
                address: form.address,
                job_title: form.job_title,
                education: form.education,
                work_experience: form.work_experience,
                soft_skills: form.soft_skills,
                important_notes: form.important_notes,
                ad_whatsapp_channel: form.ad_whatsapp_channel,
                inserted_by: inserted_by.to_string(),
            },
            service_ids: form.requested_services,
            files: self.files,
            payment: PaymentDraft {
                receiver_account: form.receiver_account,
                total_amount,
                deposit_amount,
                screenshot: self.payment_screenshot,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientCreatedResponse {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ClientFormDto {
        let mut form = ClientFormDto::default();
        for (name, value) in [
            ("full_name", " Ahmed Ali "),
            ("whatsapp_number", "01012345678"),
            ("phone_number", "01098765432"),
            ("email", "a@example.com"),
            ("address", "Cairo"),
            ("requested_services[]", "svc-1"),
            ("requested_services", "svc-1"),
        ] {
            form.set_field(name.trim_end_matches("[]"), value.to_string());
        }
        form
    }

    fn failing_fields(form: &ClientFormDto) -> Vec<(String, String)> {
        match form.check() {
            Err(AppError::InvalidFields(details)) => details.into_iter().map(|d| (d.field, d.code)).collect(),
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn valid_form_passes_with_zero_amounts() {
        let form = valid_form();
        assert_eq!(form.full_name, "Ahmed Ali");
        assert_eq!(form.check().unwrap(), (0.0, 0.0));
    }

    #[test]
    fn blank_optionals_are_absent() {
        let mut form = valid_form();
        form.set_field("job_title", "   ".to_string());
        form.set_field("birth_date", String::new());
        form.set_field("total_amount", String::new());
        assert_eq!(form.job_title, None);
        assert_eq!(form.birth_date, None);
        assert!(form.check().is_ok());
    }

    #[test]
    fn every_bad_field_is_reported() {
        let mut form = ClientFormDto::default();
        form.set_field("whatsapp_number", "12345".to_string());
        form.set_field("phone_number", "01012345678".to_string());
        form.set_field("email", "not-an-email".to_string());
        form.set_field("birth_date", "1995-13-01".to_string());
        form.set_field("total_amount", "abc".to_string());
        form.set_field("deposit_amount", "-5".to_string());
        let fields = failing_fields(&form);
        let names: Vec<&str> = fields.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "address",
                "birth_date",
                "deposit_amount",
                "email",
                "full_name",
                "requested_services",
                "total_amount",
                "whatsapp_number"
            ]
        );
        assert!(fields.contains(&("deposit_amount".to_string(), "range".to_string())));
        assert!(fields.contains(&("total_amount".to_string(), "number".to_string())));
    }

    #[test]
    fn long_names_are_rejected() {
        let mut form = valid_form();
        form.set_field("full_name", "x".repeat(151));
        assert_eq!(failing_fields(&form), vec![("full_name".to_string(), "length".to_string())]);
    }

    #[test]
    fn service_list_is_bounded() {
        let mut form = valid_form();
        for _ in 0..20 {
            form.set_field("requested_services", "svc-2".to_string());
        }
        let errors = failing_fields(&form);
        assert_eq!(errors, vec![("requested_services".to_string(), "too_many".to_string())]);

        let mut form = valid_form();
        form.set_field("requested_services", "s".repeat(65));
        match form.check() {
            Err(AppError::InvalidFields(details)) => {
                assert_eq!(details[0].code, "id_length");
                assert_eq!(details[0].message, "Service ids must be at most 64 characters");
            }
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn amounts_parse_as_decimals() {
        let mut form = valid_form();
        form.set_field("total_amount", "150".to_string());
        form.set_field("deposit_amount", "75.5".to_string());
        assert_eq!(form.check().unwrap(), (150.0, 75.5));
    }

    #[test]
    fn intake_carries_the_submitter() {
        let form = valid_form();
        let intake = ClientFormParts { form, ..Default::default() }.into_intake("u-mod", 0.0, 0.0);
        assert_eq!(intake.client.inserted_by, "u-mod");
        assert_eq!(intake.service_ids, vec!["svc-1".to_string(), "svc-1".to_string()]);
        assert!(intake.payment.screenshot.is_none());
    }
}
