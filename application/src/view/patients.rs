//! Patients views.

use common::{Date, DateTime};
use itertools::Itertools as _;
use service::{
    command::{self, create_patient},
    domain::{
        locale::Params,
        patient::{self, Address, EmergencyContact},
        Patient, Route,
    },
    query::{self, patients},
    Command as _, Query as _,
};

use crate::{args, AsError, Context, Error};

use super::{arguments, table};

/// Opens the patients view requested by the provided [`args::Patients`].
///
/// # Errors
///
/// Errors if the view cannot be opened or its operation fails.
pub async fn open(ctx: &Context, cmd: args::Patients) -> Result<String, Error> {
    use args::Patients as P;

    match cmd {
        P::List(page) => {
            ctx.enter(Route::Patients)?;
            list(ctx, page).await
        }
        P::Search {
            term,
            gender,
            min_age,
            max_age,
            city,
            active,
        } => {
            ctx.enter(Route::Patients)?;
            search(
                ctx,
                patient::Filter {
                    search_term: term,
                    gender,
                    age_range: min_age.zip(max_age),
                    city,
                    is_active: active,
                },
            )
            .await
        }
        P::Show { id } => {
            ctx.enter(Route::Patients)?;
            let patient = ctx
                .service()
                .execute(query::patient::ById::by(id.into()))
                .await
                .map_err(AsError::into_error)?;
            Ok(render_details(ctx, &patient, DateTime::now().date()))
        }
        P::Register(form) => {
            ctx.enter(Route::PatientRegistration)?;
            register(ctx, form).await
        }
    }
}

/// Shows a page of all the patients.
async fn list(ctx: &Context, page: args::Page) -> Result<String, Error> {
    let page = ctx
        .service()
        .execute(patients::List::by(patient::Selector {
            arguments: arguments(page)?,
            filter: (),
        }))
        .await
        .map_err(AsError::into_error)?;

    let info = page.pagination;
    Ok([
        render_list(ctx, &page.data),
        ctx.t_with(
            "common.page",
            &Params::new()
                .with("page", info.page)
                .with("pages", info.total_pages),
        ),
    ]
    .join("\n"))
}

/// Shows the patients matching the provided [`patient::Filter`].
async fn search(ctx: &Context, filter: patient::Filter) -> Result<String, Error> {
    let found = ctx
        .service()
        .loading()
        .wrap(
            ctx.service().execute(patients::Search::by(filter)),
            Some(ctx.t("common.loading")),
        )
        .await
        .map_err(AsError::into_error)?;
    Ok(render_list(ctx, &found))
}

/// Registers a new patient out of the provided [`args::Registration`] form.
async fn register(
    ctx: &Context,
    form: args::Registration,
) -> Result<String, Error> {
    let args::Registration {
        first_name,
        last_name,
        date_of_birth,
        gender,
        phone,
        email,
        street,
        city,
        state,
        zip_code,
        country,
        contact_name,
        contact_relationship,
        contact_phone,
    } = form;

    let patient = ctx
        .service()
        .execute(command::CreatePatient(patient::New {
            first_name,
            last_name,
            date_of_birth,
            gender,
            phone,
            email,
            address: Address {
                street,
                city,
                state,
                zip_code,
                country,
            },
            emergency_contact: EmergencyContact {
                name: contact_name,
                relationship: contact_relationship,
                phone: contact_phone,
                email: None,
            },
        }))
        .await
        .map_err(AsError::into_error)?;

    let text = ctx.t_with(
        "patients.registered",
        &Params::new().with("name", patient.full_name()),
    );
    _ = ctx
        .service()
        .notifications()
        .success(ctx.t("common.success"), text.clone());
    Ok(format!("{text} ({})", patient.patient_id))
}

/// Renders the provided [`Patient`]s as a table.
fn render_list(ctx: &Context, patients: &[Patient]) -> String {
    if patients.is_empty() {
        return ctx.t("patients.noPatients");
    }
    let today = DateTime::now().date();
    table(
        [
            "ID".to_owned(),
            ctx.t("patients.firstName"),
            ctx.t("patients.lastName"),
            ctx.t("patients.gender"),
            ctx.t("patients.phone"),
            ctx.t("patients.active"),
        ],
        patients
            .iter()
            .map(|p| {
                [
                    p.id.to_string(),
                    p.first_name.clone(),
                    p.last_name.clone(),
                    format!("{} ({})", p.gender, p.age_on(today)),
                    p.phone.clone(),
                    ctx.t(if p.is_active {
                        "common.yes"
                    } else {
                        "common.no"
                    }),
                ]
            })
            .collect(),
    )
}

/// Renders the full record of the provided [`Patient`].
fn render_details(ctx: &Context, p: &Patient, today: Date) -> String {
    let Address {
        street,
        city,
        state,
        zip_code,
        country,
    } = &p.address;
    let contact = &p.emergency_contact;

    let mut out = vec![
        format!("{} [{}]", p.full_name(), p.patient_id),
        format!(
            "{}: {} ({})",
            ctx.t("patients.dateOfBirth"),
            p.date_of_birth,
            p.age_on(today),
        ),
        format!("{}: {}", ctx.t("patients.gender"), p.gender),
        format!("{}: {}", ctx.t("patients.phone"), p.phone),
        format!(
            "{}: {}",
            ctx.t("patients.email"),
            p.email.as_deref().unwrap_or("-"),
        ),
        format!(
            "{}: {}",
            ctx.t("patients.address"),
            [street, city, state, zip_code, country]
                .into_iter()
                .filter(|s| !s.is_empty())
                .join(", "),
        ),
        format!(
            "{}: {} ({}), {}",
            ctx.t("patients.emergencyContact"),
            contact.name,
            contact.relationship,
            contact.phone,
        ),
    ];
    if !p.allergies.is_empty() {
        out.push(format!(
            "{}: {}",
            ctx.t("patients.allergies"),
            p.allergies
                .iter()
                .map(|a| format!("{} ({})", a.allergen, a.severity))
                .join(", "),
        ));
    }
    if !p.medications.is_empty() {
        out.push(format!(
            "{}: {}",
            ctx.t("patients.medications"),
            p.medications
                .iter()
                .map(|m| format!("{} {} {}", m.name, m.dosage, m.frequency))
                .join(", "),
        ));
    }
    if !p.medical_history.is_empty() {
        out.push(format!("{}:", ctx.t("patients.medicalHistory")));
        out.extend(
            p.medical_history
                .iter()
                .map(|r| format!("  {} {}: {}", r.date, r.diagnosis, r.treatment)),
        );
    }
    out.join("\n")
}

impl AsError for create_patient::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Request(e) => e.try_as_error(),
            Self::Json(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use common::Date;
    use serde_json::json;
    use service::domain::Patient;

    use crate::view::tests::context;

    use super::render_details;

    #[tokio::test]
    async fn renders_patient_record() {
        let ctx = context();
        let patient: Patient = serde_json::from_value(json!({
            "id": "1",
            "patientId": "P-0001",
            "firstName": "Maria",
            "lastName": "Garcia",
            "dateOfBirth": "1990-05-17",
            "gender": "FEMALE",
            "phone": "555-0100",
            "address": {
                "street": "1 Main St",
                "city": "Springfield",
                "state": "",
                "zipCode": "62701",
                "country": "US",
            },
            "emergencyContact": {
                "name": "Jose Garcia",
                "relationship": "Spouse",
                "phone": "555-0101",
            },
            "allergies": [
                { "id": "a-1", "allergen": "Penicillin", "severity": "SEVERE" },
            ],
            "isActive": true,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        }))
        .unwrap();

        let out = render_details(&ctx, &patient, Date::parse("2024-06-01").unwrap());

        assert_eq!(
            out.lines().collect::<Vec<_>>(),
            [
                "Maria Garcia [P-0001]",
                "Date of Birth: 1990-05-17 (34)",
                "Gender: FEMALE",
                "Phone: 555-0100",
                "Email: -",
                "Address: 1 Main St, Springfield, 62701, US",
                "Emergency Contact: Jose Garcia (Spouse), 555-0101",
                "Allergies: Penicillin (SEVERE)",
            ],
        );
    }
}
