//! Dashboard view.

use common::{pagination::Arguments, Date, DateTime};
use futures::future;
use service::{
    domain::{appointment::Range, patient, Appointment, Patient},
    query::{appointments, patients},
    Query as _,
};

use crate::{AsError, Context, Error};

use super::{layout, table};

/// Number of the most recent patients shown.
const RECENT_PATIENTS: u32 = 5;

/// Shows the summary of the day.
///
/// # Errors
///
/// Errors if the summary cannot be fetched.
pub async fn show(ctx: &Context) -> Result<String, Error> {
    let svc = ctx.service();
    let today = DateTime::now().date();

    let recent = svc.execute(patients::List::by(patient::Selector {
        arguments: Arguments::new(None, Some(RECENT_PATIENTS), RECENT_PATIENTS)
            .unwrap_or_default(),
        filter: (),
    }));
    let schedule = svc.execute(appointments::Calendar::by(Range {
        from: today,
        to: today,
    }));
    let (recent, schedule) = svc
        .loading()
        .wrap(future::try_join(recent, schedule), Some(ctx.t("common.loading")))
        .await
        .map_err(AsError::into_error)?;

    Ok(render(ctx, today, recent.pagination.total, &recent.data, &schedule))
}

/// Renders the dashboard out of the fetched data.
fn render(
    ctx: &Context,
    today: Date,
    total_patients: u64,
    recent: &[Patient],
    schedule: &[Appointment],
) -> String {
    let mut out = vec![
        layout::header(ctx),
        String::new(),
        format!("{} ({today})", ctx.t("dashboard.title")),
        ctx.t("dashboard.welcomeMessage"),
        format!("{}: {total_patients}", ctx.t("dashboard.totalPatients")),
        format!("{}: {}", ctx.t("dashboard.todaysAppointments"), schedule.len()),
        String::new(),
        format!("{}:", ctx.t("dashboard.recentPatients")),
    ];
    if recent.is_empty() {
        out.push(ctx.t("patients.noPatients"));
    } else {
        out.push(table(
            [
                "ID".to_owned(),
                ctx.t("patients.firstName"),
                ctx.t("patients.lastName"),
                ctx.t("patients.phone"),
            ],
            recent
                .iter()
                .map(|p| {
                    [
                        p.patient_id.clone(),
                        p.first_name.clone(),
                        p.last_name.clone(),
                        p.phone.clone(),
                    ]
                })
                .collect(),
        ));
    }
    out.join("\n")
}
