use chrono::NaiveDate;

use crate::models::{Patient, PatientFilter};

/// Narrows a patient list the way the records screen does.
///
/// Search is case-insensitive over id, name, mobile number and email. Gender
/// and blood group match exactly (ignoring case). The age range is inclusive
/// and drops patients whose age cannot be worked out.
pub fn filter_patients(patients: &[Patient], filter: &PatientFilter, today: NaiveDate) -> Vec<Patient> {
    if filter.is_empty() {
        return patients.to_vec();
    }

    let needle = filter
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    patients
        .iter()
        .filter(|p| needle.as_deref().map_or(true, |n| matches_search(p, n)))
        .filter(|p| same_label(p.gender.as_deref(), filter.gender.as_deref()))
        .filter(|p| same_label(p.blood_group.as_deref(), filter.blood_group.as_deref()))
        .filter(|p| in_age_range(p, filter, today))
        .cloned()
        .collect()
}

fn matches_search(patient: &Patient, needle: &str) -> bool {
    let id = patient.id.as_ref().map(|id| id.to_string());
    let name = patient.full_name();
    let fields = [
        id.as_deref(),
        Some(name.as_str()),
        patient.mobile_number.as_deref(),
        patient.email.as_deref(),
    ];

    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

fn same_label(value: Option<&str>, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => value.is_some_and(|v| v.eq_ignore_ascii_case(wanted)),
    }
}

fn in_age_range(patient: &Patient, filter: &PatientFilter, today: NaiveDate) -> bool {
    if filter.age_from.is_none() && filter.age_to.is_none() {
        return true;
    }
    let Some(age) = patient.age_on(today) else {
        return false;
    };
    filter.age_from.map_or(true, |from| age >= from) && filter.age_to.map_or(true, |to| age <= to)
}
