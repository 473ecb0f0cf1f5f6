use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Patient ids come back as numbers from some endpoints and as `PT001`-style
/// strings from others.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatientId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatientId::Number(n) => write!(f, "{}", n),
            PatientId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Patient record as the backend returns it. Fields the front office does
/// not interpret are carried through in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Patient {
    pub id: Option<PatientId>,
    pub first_name: String,
    pub last_name: String,
    /// Some list endpoints only send a combined name.
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    #[serde(alias = "phone")]
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub blood_group: Option<String>,
    pub marital_status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("{} {}", self.first_name, self.last_name).trim().to_string(),
        }
    }

    /// Age in whole years on `today`, preferring the stored age.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        if let Some(age) = self.age {
            return Some(age);
        }
        let born = self.date_of_birth?;
        let mut years = today.year() - born.year();
        if (today.month(), today.day()) < (born.month(), born.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }
}

/// Registration / edit form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientRegistration {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub mobile_number: String,
    pub email: Option<String>,
    pub address: String,
    pub blood_group: String,
    pub marital_status: String,
    pub uhid: Option<String>,
    pub father_husband_name: Option<String>,
    pub qualification: Option<String>,
    pub job_description: Option<String>,
    pub comments: Option<String>,
    pub is_first_visit: bool,
    pub deceased: bool,
    pub referred_to: Option<String>,
    pub referred_by: Option<String>,
    pub category: Option<String>,
    pub branch_id: Option<i64>,
}

/// Query string of `GET /patients`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatientFilter {
    pub search: Option<String>,
    pub gender: Option<String>,
    pub age_from: Option<u32>,
    pub age_to: Option<u32>,
    pub blood_group: Option<String>,
}

impl PatientFilter {
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.gender.is_none()
            && self.age_from.is_none()
            && self.age_to.is_none()
            && self.blood_group.is_none()
    }
}
