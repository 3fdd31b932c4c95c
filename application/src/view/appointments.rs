//! Appointments views.

use common::{Date, DateTime};
use itertools::Itertools as _;
use service::{
    command::{self, create_appointment, update_appointment},
    domain::{
        appointment::{self, Range},
        Appointment, Route,
    },
    query::appointments,
    Command as _, Query as _,
};

use crate::{args, define_error, AsError, Context, Error};

use super::{arguments, table};

/// Opens the appointments view requested by the provided
/// [`args::Appointments`].
///
/// # Errors
///
/// Errors if the view cannot be opened or its operation fails.
pub async fn open(
    ctx: &Context,
    cmd: args::Appointments,
) -> Result<String, Error> {
    use args::Appointments as A;

    match cmd {
        A::List {
            page,
            from,
            to,
            status,
            kind,
            doctor,
            patient,
        } => {
            ctx.enter(Route::Appointments)?;
            let page = ctx
                .service()
                .execute(appointments::List::by(appointment::Selector {
                    arguments: arguments(page)?,
                    filter: appointment::Filter {
                        date_from: from,
                        date_to: to,
                        status,
                        kind,
                        doctor_id: doctor,
                        patient_id: patient.map(Into::into),
                    },
                }))
                .await
                .map_err(AsError::into_error)?;
            Ok(render_list(ctx, &page.data))
        }
        A::Calendar { from, days } => {
            ctx.enter(Route::Calendar)?;
            calendar(ctx, from.unwrap_or_else(|| DateTime::now().date()), days)
                .await
        }
        A::Create {
            patient,
            doctor,
            date,
            start,
            end,
            kind,
            reason,
            notes,
        } => {
            ctx.enter(Route::Appointments)?;
            let created = ctx
                .service()
                .execute(command::CreateAppointment(appointment::New {
                    patient_id: patient.into(),
                    doctor_id: doctor,
                    date,
                    start_time: start,
                    end_time: end,
                    kind,
                    reason,
                    notes,
                }))
                .await
                .map_err(AsError::into_error)?;
            Ok(saved(ctx, "appointments.scheduled", &created))
        }
        A::Update {
            id,
            date,
            start,
            end,
            kind,
            status,
            reason,
            notes,
        } => {
            ctx.enter(Route::Appointments)?;
            let updated = ctx
                .service()
                .execute(command::UpdateAppointment(appointment::Changes {
                    date,
                    start_time: start,
                    end_time: end,
                    kind,
                    status,
                    reason,
                    notes,
                    ..appointment::Changes::of(id.into())
                }))
                .await
                .map_err(AsError::into_error)?;
            Ok(saved(ctx, "appointments.updated", &updated))
        }
    }
}

/// Shows the appointments of the provided number of `days` starting at the
/// provided [`Date`], grouped by day.
async fn calendar(ctx: &Context, from: Date, days: u16) -> Result<String, Error> {
    define_error! {
        enum CalendarError {
            #[code = "INVALID_RANGE"]
            #[key = "errors.date"]
            #[message = "Calendar must show at least one day"]
            InvalidRange,
        }
    }

    let range = Range::days(from, days).ok_or(CalendarError::InvalidRange)?;
    let items = ctx
        .service()
        .loading()
        .wrap(
            ctx.service().execute(appointments::Calendar::by(range)),
            Some(ctx.t("common.loading")),
        )
        .await
        .map_err(AsError::into_error)?;
    Ok(render_calendar(ctx, range, &items))
}

/// Notifies about the saved [`Appointment`] and renders it.
fn saved(ctx: &Context, key: &str, item: &Appointment) -> String {
    _ = ctx
        .service()
        .notifications()
        .success(ctx.t("common.success"), ctx.t(key));
    render_list(ctx, std::slice::from_ref(item))
}

/// Renders the provided [`Appointment`]s as a table.
fn render_list(ctx: &Context, items: &[Appointment]) -> String {
    if items.is_empty() {
        return ctx.t("appointments.noAppointments");
    }
    table(
        [
            "ID".to_owned(),
            ctx.t("appointments.date"),
            ctx.t("appointments.time"),
            ctx.t("appointments.patient"),
            ctx.t("appointments.doctor"),
            ctx.t("appointments.type"),
            ctx.t("appointments.status"),
        ],
        items.iter().map(|a| row(ctx, a)).collect(),
    )
}

/// Renders the provided [`Appointment`]s within the provided [`Range`],
/// grouped by day.
fn render_calendar(ctx: &Context, range: Range, items: &[Appointment]) -> String {
    let days = items
        .iter()
        .filter(|a| range.contains(a.date))
        .sorted_by(|a, b| (a.date, &a.start_time).cmp(&(b.date, &b.start_time)))
        .chunk_by(|a| a.date);

    let mut out = vec![format!(
        "{}: {} .. {}",
        ctx.t("appointments.appointmentCalendar"),
        range.from,
        range.to,
    )];
    let mut empty = true;
    for (day, items) in &days {
        empty = false;
        out.push(format!("{day}"));
        out.extend(items.map(|a| {
            format!(
                "  {}-{}  {} {}  {}  {}",
                a.start_time,
                a.end_time,
                a.patient.first_name,
                a.patient.last_name,
                ctx.t(a.kind.translation_key()),
                a.status,
            )
        }));
    }
    if empty {
        out.push(ctx.t("appointments.noAppointments"));
    }
    out.join("\n")
}

/// Renders a table row of the provided [`Appointment`].
fn row(ctx: &Context, a: &Appointment) -> [String; 7] {
    [
        a.id.to_string(),
        a.date.to_string(),
        format!("{}-{}", a.start_time, a.end_time),
        format!("{} {}", a.patient.first_name, a.patient.last_name),
        format!("{} {}", a.doctor.first_name, a.doctor.last_name),
        ctx.t(a.kind.translation_key()),
        a.status.to_string(),
    ]
}

impl AsError for create_appointment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Request(e) => e.try_as_error(),
            Self::Json(_) => None,
        }
    }
}

impl AsError for update_appointment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NO_CHANGES"]
                #[key = "errors.required"]
                #[message = "Nothing to update"]
                NoChanges,
            }
        }

        match self {
            Self::NoChanges => Some(Error::NoChanges.into()),
            Self::Request(e) => e.try_as_error(),
            Self::Json(_) => None,
        }
    }
}
