use shared_models::FieldErrors;
use shared_utils::FormValidator;

use crate::models::PatientRegistration;

/// Checks the registration form before anything is sent upstream.
pub fn validate_registration(form: &PatientRegistration) -> Result<(), FieldErrors> {
    let mut validator = FormValidator::new();
    validator
        .require("firstName", &form.first_name, "First name is required")
        .require("lastName", &form.last_name, "Last name is required")
        .require_some("dateOfBirth", form.date_of_birth.as_ref(), "Date of birth is required")
        .require("gender", &form.gender, "Gender is required")
        .mobile("mobileNumber", form.mobile_number.trim(), "Enter a valid 10-digit mobile number")
        .optional_email("email", form.email.as_deref().map(str::trim))
        .require("address", &form.address, "Address is required")
        .require("bloodGroup", &form.blood_group, "Blood group is required")
        .require("maritalStatus", &form.marital_status, "Marital status is required");

    validator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn complete_form() -> PatientRegistration {
        PatientRegistration {
            first_name: "Sarah".to_string(),
            last_name: "Johnson".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1991, 4, 12),
            gender: "Female".to_string(),
            mobile_number: "5552345678".to_string(),
            email: Some("sarah.j@example.com".to_string()),
            address: "12 Harbour Road".to_string(),
            blood_group: "A+".to_string(),
            marital_status: "Married".to_string(),
            ..PatientRegistration::default()
        }
    }

    #[test]
    fn complete_form_passes() {
        assert_matches!(validate_registration(&complete_form()), Ok(()));
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let fields = validate_registration(&PatientRegistration::default()).unwrap_err();

        assert_eq!(fields.len(), 8);
        assert_eq!(fields["dateOfBirth"], "Date of birth is required");
        assert_eq!(fields["mobileNumber"], "Enter a valid 10-digit mobile number");
        assert!(!fields.contains_key("email"));
    }

    #[test]
    fn email_is_optional_but_checked() {
        let mut form = complete_form();
        form.email = None;
        assert_matches!(validate_registration(&form), Ok(()));

        form.email = Some("sarah.example.com".to_string());
        let fields = validate_registration(&form).unwrap_err();
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("email"));
    }
}
