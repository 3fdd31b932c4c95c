//! [`Appointment`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, define_pagination, unit, Date, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::domain::patient;

/// Scheduled visit of a patient to a doctor.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// ID of this [`Appointment`].
    pub id: Id,

    /// ID of the visiting patient.
    pub patient_id: patient::Id,

    /// Summary of the visiting patient.
    pub patient: PatientSummary,

    /// ID of the receiving doctor.
    pub doctor_id: String,

    /// Summary of the receiving doctor.
    pub doctor: DoctorSummary,

    /// [`Date`] of this [`Appointment`].
    pub date: Date,

    /// Start time of this [`Appointment`] in `HH:MM` format.
    pub start_time: String,

    /// End time of this [`Appointment`] in `HH:MM` format.
    pub end_time: String,

    /// Duration of this [`Appointment`] in minutes.
    pub duration: u32,

    /// [`Type`] of this [`Appointment`].
    #[serde(rename = "type")]
    pub kind: Type,

    /// [`Status`] of this [`Appointment`].
    pub status: Status,

    /// Reason of the visit.
    pub reason: String,

    /// Additional notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// [`DateTime`] when this [`Appointment`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Appointment`] was modified the last time.
    pub updated_at: ModificationDateTime,
}

/// ID of an [`Appointment`].
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

/// Patient details embedded into an [`Appointment`].
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    /// ID of the patient.
    pub id: patient::Id,

    /// First name of the patient.
    pub first_name: String,

    /// Last name of the patient.
    pub last_name: String,

    /// Phone number of the patient.
    pub phone: String,
}

/// Doctor details embedded into an [`Appointment`].
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSummary {
    /// ID of the doctor.
    pub id: String,

    /// First name of the doctor.
    pub first_name: String,

    /// Last name of the doctor.
    pub last_name: String,

    /// Medical specialization of the doctor.
    pub specialization: String,
}

define_kind! {
    #[doc = "Type of an [`Appointment`]."]
    enum Type {
        #[doc = "General consultation."]
        Consultation = 1,

        #[doc = "Follow-up of a previous visit."]
        FollowUp = 2,

        #[doc = "Emergency visit."]
        Emergency = 3,

        #[doc = "Surgical procedure."]
        Surgery = 4,

        #[doc = "Routine check-up."]
        CheckUp = 5,

        #[doc = "Vaccination."]
        Vaccination = 6,
    }
}

impl Type {
    /// Returns the translation key of this [`Type`].
    #[must_use]
    pub const fn translation_key(self) -> &'static str {
        match self {
            Self::Consultation => "appointments.consultation",
            Self::FollowUp => "appointments.followUp",
            Self::Emergency => "appointments.emergency",
            Self::Surgery => "appointments.surgery",
            Self::CheckUp => "appointments.checkUp",
            Self::Vaccination => "appointments.vaccination",
        }
    }
}

define_kind! {
    #[doc = "Status of an [`Appointment`]."]
    enum Status {
        #[doc = "Booked, not confirmed yet."]
        Scheduled = 1,

        #[doc = "Confirmed by the patient."]
        Confirmed = 2,

        #[doc = "The visit is going on."]
        InProgress = 3,

        #[doc = "The visit took place."]
        Completed = 4,

        #[doc = "Called off."]
        Cancelled = 5,

        #[doc = "The patient did not show up."]
        NoShow = 6,
    }
}

/// Request for scheduling a new [`Appointment`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct New {
    /// ID of the visiting patient.
    pub patient_id: patient::Id,

    /// ID of the receiving doctor.
    pub doctor_id: String,

    /// [`Date`] of the [`Appointment`].
    pub date: Date,

    /// Start time in `HH:MM` format.
    pub start_time: String,

    /// End time in `HH:MM` format.
    pub end_time: String,

    /// [`Type`] of the [`Appointment`].
    #[serde(rename = "type")]
    pub kind: Type,

    /// Reason of the visit.
    pub reason: String,

    /// Additional notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Modification of an existing [`Appointment`].
///
/// Only the provided fields are changed.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Changes {
    /// ID of the [`Appointment`] to modify.
    #[serde(skip)]
    pub id: Id,

    /// New [`Date`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,

    /// New start time in `HH:MM` format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    /// New end time in `HH:MM` format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    /// New [`Type`].
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Type>,

    /// New [`Status`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    /// New reason of the visit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// New notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Changes {
    /// Creates empty [`Changes`] of the [`Appointment`] with the provided
    /// [`Id`].
    #[must_use]
    pub fn of(id: Id) -> Self {
        Self {
            id,
            date: None,
            start_time: None,
            end_time: None,
            kind: None,
            status: None,
            reason: None,
            notes: None,
        }
    }

    /// Indicates whether these [`Changes`] modify nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.kind.is_none()
            && self.status.is_none()
            && self.reason.is_none()
            && self.notes.is_none()
    }
}

/// Filter for listing [`Appointment`]s.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    /// Earliest [`Date`], inclusive.
    pub date_from: Option<Date>,

    /// Latest [`Date`], inclusive.
    pub date_to: Option<Date>,

    /// Required [`Status`].
    pub status: Option<Status>,

    /// Required [`Type`].
    pub kind: Option<Type>,

    /// Required doctor.
    pub doctor_id: Option<String>,

    /// Required patient.
    pub patient_id: Option<patient::Id>,
}

impl Filter {
    /// Converts this [`Filter`] into URL query parameters.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        [
            ("dateFrom", self.date_from.map(|d| d.to_string())),
            ("dateTo", self.date_to.map(|d| d.to_string())),
            ("status", self.status.map(|s| s.to_string())),
            ("type", self.kind.map(|t| t.to_string())),
            ("doctorId", self.doctor_id.clone()),
            ("patientId", self.patient_id.as_ref().map(ToString::to_string)),
        ]
        .into_iter()
        .filter_map(|(k, v)| Some((k.to_owned(), v?)))
        .collect()
    }
}

/// Inclusive range of [`Date`]s shown by a calendar.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Range {
    /// First [`Date`] of the range.
    pub from: Date,

    /// Last [`Date`] of the range.
    pub to: Date,
}

impl Range {
    /// Creates a new [`Range`] of the provided number of `days` starting at
    /// the provided [`Date`].
    ///
    /// [`None`] is returned if `days` is zero or the range is out of bounds.
    #[must_use]
    pub fn days(from: Date, days: u16) -> Option<Self> {
        let to = from.add_days(i64::from(days.checked_sub(1)?))?;
        Some(Self { from, to })
    }

    /// Indicates whether the provided [`Date`] falls into this [`Range`].
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        (self.from..=self.to).contains(&date)
    }
}

/// [`DateTime`] when an [`Appointment`] was created.
pub type CreationDateTime = DateTimeOf<(Appointment, unit::Creation)>;

/// [`DateTime`] when an [`Appointment`] was modified.
pub type ModificationDateTime = DateTimeOf<(Appointment, unit::Modification)>;

define_pagination!(Appointment, Filter);

#[cfg(test)]
pub(crate) mod tests {
    use common::Date;
    use serde_json::json;

    use super::{Appointment, Changes, Filter, Range, Status, Type};

    /// Returns a JSON representation of an [`Appointment`] as the remote API
    /// sends it.
    pub(crate) fn appointment_json(id: &str, date: &str) -> serde_json::Value {
        json!({
            "id": id,
            "patientId": "1",
            "patient": {
                "id": "1",
                "firstName": "Maria",
                "lastName": "Garcia",
                "phone": "555-0100",
            },
            "doctorId": "d-1",
            "doctor": {
                "id": "d-1",
                "firstName": "Gregory",
                "lastName": "House",
                "specialization": "Diagnostics",
            },
            "date": date,
            "startTime": "09:00",
            "endTime": "09:30",
            "duration": 30,
            "type": "FOLLOW_UP",
            "status": "NO_SHOW",
            "reason": "Blood test results",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        })
    }

    #[test]
    fn decodes_remote_representation() {
        let appointment: Appointment =
            serde_json::from_value(appointment_json("a-1", "2024-03-01")).unwrap();

        assert_eq!(appointment.kind, Type::FollowUp);
        assert_eq!(appointment.status, Status::NoShow);
        assert_eq!(appointment.date.to_string(), "2024-03-01");
    }

    #[test]
    fn changes_serialize_only_provided_fields() {
        let mut changes = Changes::of("a-1".into());
        assert!(changes.is_empty());

        changes.status = Some(Status::Cancelled);
        assert_eq!(
            serde_json::to_value(&changes).unwrap(),
            json!({ "status": "CANCELLED" }),
        );
    }

    #[test]
    fn week_range() {
        let monday = Date::parse("2024-02-26").unwrap();
        let week = Range::days(monday, 7).unwrap();

        assert_eq!(week.to.to_string(), "2024-03-03");
        assert!(week.contains(Date::parse("2024-02-29").unwrap()));
        assert!(!week.contains(Date::parse("2024-03-04").unwrap()));
        assert!(Range::days(monday, 0).is_none());
    }

    #[test]
    fn filter_to_query() {
        let filter = Filter {
            date_from: Some(Date::parse("2024-03-01").unwrap()),
            kind: Some(Type::CheckUp),
            ..Filter::default()
        };

        assert_eq!(
            filter.to_query(),
            [
                ("dateFrom".to_owned(), "2024-03-01".to_owned()),
                ("type".to_owned(), "CHECK_UP".to_owned()),
            ],
        );
    }
}
