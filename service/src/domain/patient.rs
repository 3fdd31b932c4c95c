//! [`Patient`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, define_pagination, unit, Date, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
use serde::{Deserialize, Serialize};

/// Person registered for treatment in the hospital.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// ID of this [`Patient`].
    pub id: Id,

    /// Hospital-issued number of this [`Patient`] record.
    pub patient_id: String,

    /// First name of this [`Patient`].
    pub first_name: String,

    /// Last name of this [`Patient`].
    pub last_name: String,

    /// [`Date`] of birth of this [`Patient`].
    pub date_of_birth: Date,

    /// [`Gender`] of this [`Patient`].
    pub gender: Gender,

    /// Phone number of this [`Patient`].
    pub phone: String,

    /// Email address of this [`Patient`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Postal [`Address`] of this [`Patient`].
    pub address: Address,

    /// [`EmergencyContact`] of this [`Patient`].
    pub emergency_contact: EmergencyContact,

    /// [`MedicalRecord`]s of this [`Patient`].
    #[serde(default)]
    pub medical_history: Vec<MedicalRecord>,

    /// [`Allergy`]s of this [`Patient`].
    #[serde(default)]
    pub allergies: Vec<Allergy>,

    /// [`Medication`]s of this [`Patient`].
    #[serde(default)]
    pub medications: Vec<Medication>,

    /// Indicator whether this [`Patient`] is under active treatment.
    pub is_active: bool,

    /// [`DateTime`] when this [`Patient`] was registered.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Patient`] was modified the last time.
    pub updated_at: ModificationDateTime,
}

impl Patient {
    /// Returns the full name of this [`Patient`] in `<first> <last>` format.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the age of this [`Patient`] in whole years on the provided
    /// [`Date`].
    #[must_use]
    pub fn age_on(&self, today: Date) -> u32 {
        today.years_since(self.date_of_birth)
    }
}

/// ID of a [`Patient`].
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[as_ref(str)]
#[from(&str, String)]
#[serde(transparent)]
pub struct Id(String);

define_kind! {
    #[doc = "Gender of a [`Patient`]."]
    enum Gender {
        #[doc = "Male."]
        Male = 1,

        #[doc = "Female."]
        Female = 2,

        #[doc = "Other or not disclosed."]
        Other = 3,
    }
}

define_kind! {
    #[doc = "Severity of an [`Allergy`]."]
    enum AllergySeverity {
        #[doc = "Mild reaction."]
        Mild = 1,

        #[doc = "Moderate reaction."]
        Moderate = 2,

        #[doc = "Severe reaction."]
        Severe = 3,

        #[doc = "Life-threatening reaction."]
        LifeThreatening = 4,
    }
}

/// Postal address.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street and house number.
    pub street: String,

    /// City.
    pub city: String,

    /// State or region.
    pub state: String,

    /// Postal code.
    pub zip_code: String,

    /// Country.
    pub country: String,
}

/// Person to contact in case of emergency.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EmergencyContact {
    /// Full name.
    pub name: String,

    /// Relationship to the [`Patient`].
    pub relationship: String,

    /// Phone number.
    pub phone: String,

    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Entry of a [`Patient`]'s medical history.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MedicalRecord {
    /// ID of this [`MedicalRecord`].
    pub id: String,

    /// [`Date`] of the visit.
    pub date: Date,

    /// Established diagnosis.
    pub diagnosis: String,

    /// Prescribed treatment.
    pub treatment: String,

    /// Doctor who made the record.
    pub doctor: String,

    /// Additional notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Known allergy of a [`Patient`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Allergy {
    /// ID of this [`Allergy`].
    pub id: String,

    /// Substance causing the reaction.
    pub allergen: String,

    /// [`AllergySeverity`] of the reaction.
    pub severity: AllergySeverity,

    /// Additional notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Medication taken by a [`Patient`].
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    /// ID of this [`Medication`].
    pub id: String,

    /// Name of the drug.
    pub name: String,

    /// Dosage per intake.
    pub dosage: String,

    /// How often it is taken.
    pub frequency: String,

    /// [`Date`] the course started.
    pub start_date: Date,

    /// [`Date`] the course ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Date>,

    /// Doctor who prescribed it.
    pub prescribed_by: String,
}

/// Registration form of a new [`Patient`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct New {
    /// First name of the [`Patient`].
    pub first_name: String,

    /// Last name of the [`Patient`].
    pub last_name: String,

    /// [`Date`] of birth of the [`Patient`].
    pub date_of_birth: Date,

    /// [`Gender`] of the [`Patient`].
    pub gender: Gender,

    /// Phone number of the [`Patient`].
    pub phone: String,

    /// Email address of the [`Patient`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Postal [`Address`] of the [`Patient`].
    pub address: Address,

    /// [`EmergencyContact`] of the [`Patient`].
    pub emergency_contact: EmergencyContact,
}

/// Filter for searching [`Patient`]s.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    /// Free-text term matched against names, phone and record number.
    pub search_term: Option<String>,

    /// Required [`Gender`].
    pub gender: Option<Gender>,

    /// Inclusive range of ages in whole years.
    pub age_range: Option<(u32, u32)>,

    /// Required city of residence.
    pub city: Option<String>,

    /// Required activity status.
    pub is_active: Option<bool>,
}

impl Filter {
    /// Converts this [`Filter`] into URL query parameters.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![];
        if let Some(term) = self.search_term.as_deref().map(str::trim) {
            if !term.is_empty() {
                query.push(("searchTerm".into(), term.to_owned()));
            }
        }
        if let Some(gender) = self.gender {
            query.push(("gender".into(), gender.to_string()));
        }
        if let Some((min, max)) = self.age_range {
            query.push(("minAge".into(), min.to_string()));
            query.push(("maxAge".into(), max.to_string()));
        }
        if let Some(city) = &self.city {
            query.push(("city".into(), city.clone()));
        }
        if let Some(active) = self.is_active {
            query.push(("isActive".into(), active.to_string()));
        }
        query
    }
}

/// [`DateTime`] when a [`Patient`] was registered.
pub type CreationDateTime = DateTimeOf<(Patient, unit::Creation)>;

/// [`DateTime`] when a [`Patient`] was modified.
pub type ModificationDateTime = DateTimeOf<(Patient, unit::Modification)>;

define_pagination!(Patient, ());

#[cfg(test)]
pub(crate) mod tests {
    use common::Date;
    use serde_json::json;

    use super::{Filter, Gender, Patient};

    /// Returns a JSON representation of a [`Patient`] as the remote API
    /// sends it.
    pub(crate) fn patient_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "patientId": "P-0001",
            "firstName": "Maria",
            "lastName": "Garcia",
            "dateOfBirth": "1990-05-17T00:00:00.000Z",
            "gender": "FEMALE",
            "phone": "555-0100",
            "address": {
                "street": "1 Main St",
                "city": "Springfield",
                "state": "IL",
                "zipCode": "62701",
                "country": "US",
            },
            "emergencyContact": {
                "name": "Jose Garcia",
                "relationship": "Spouse",
                "phone": "555-0101",
            },
            "allergies": [
                { "id": "a-1", "allergen": "Penicillin", "severity": "LIFE_THREATENING" },
            ],
            "isActive": true,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        })
    }

    #[test]
    fn decodes_remote_representation() {
        let patient: Patient = serde_json::from_value(patient_json("1")).unwrap();

        assert_eq!(patient.full_name(), "Maria Garcia");
        assert_eq!(patient.gender, Gender::Female);
        assert!(patient.medications.is_empty());
        assert_eq!(patient.age_on(Date::parse("2024-05-16").unwrap()), 33);
        assert_eq!(patient.age_on(Date::parse("2024-05-17").unwrap()), 34);
    }

    #[test]
    fn filter_skips_blank_values() {
        let filter = Filter {
            search_term: Some("  ".into()),
            gender: Some(Gender::Other),
            age_range: Some((18, 65)),
            ..Filter::default()
        };

        assert_eq!(
            filter.to_query(),
            [
                ("gender".to_owned(), "OTHER".to_owned()),
                ("minAge".to_owned(), "18".to_owned()),
                ("maxAge".to_owned(), "65".to_owned()),
            ],
        );
    }
}
