//! Views of the application.
//!
//! Every view renders into a [`String`] printed by the binary.

pub mod appointments;
pub mod auth;
pub mod dashboard;
pub mod layout;
pub mod patients;
pub mod settings;

use common::pagination::Arguments;
use itertools::Itertools as _;
use service::domain::Route;

use crate::{args, define_error, Context, Error};

/// Default number of items on a page.
const PAGE_SIZE: u32 = 20;

/// Opens the view requested by the provided [`args::Command`].
///
/// # Errors
///
/// Errors if the view cannot be opened or its operation fails. The [`Error`]
/// is reported as a notification too.
pub async fn open(ctx: &Context, command: args::Command) -> Result<String, Error> {
    dispatch(ctx, command).await.map_err(ctx.error())
}

/// Dispatches the provided [`args::Command`] to its view.
async fn dispatch(ctx: &Context, command: args::Command) -> Result<String, Error> {
    use args::Command as C;

    match command {
        C::Login {
            username,
            password,
            remember_me,
        } => {
            ctx.enter(Route::Login)?;
            auth::login(ctx, username, password, remember_me).await
        }
        C::Logout => auth::logout(ctx).await,
        C::Whoami => auth::whoami(ctx).await,
        C::Dashboard => {
            ctx.enter(Route::Dashboard)?;
            dashboard::show(ctx).await
        }
        C::Patients(cmd) => patients::open(ctx, cmd).await,
        C::Appointments(cmd) => appointments::open(ctx, cmd).await,
        C::Locale { code } => settings::locale(ctx, code).await,
        C::Theme(cmd) => settings::theme(ctx, cmd).await,
        C::Notifications => Ok(layout::notifications(ctx)),
    }
}

/// Converts the provided [`args::Page`] into pagination [`Arguments`].
///
/// # Errors
///
/// Errors if the page number is zero or the limit is out of range.
fn arguments(page: args::Page) -> Result<Arguments, Error> {
    define_error! {
        enum PageError {
            #[code = "INVALID_PAGE"]
            #[key = "errors.number"]
            #[message = "Page must be positive and limit must be in 1..=100"]
            Invalid,
        }
    }

    Arguments::new(page.page, page.limit, PAGE_SIZE)
        .ok_or_else(|| PageError::Invalid.into())
}

/// Returns the cells of the provided rows padded to the widest cell of their
/// column.
fn table<const N: usize>(header: [String; N], rows: Vec<[String; N]>) -> String {
    let mut widths = [0; N];
    for row in std::iter::once(&header).chain(&rows) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    std::iter::once(header)
        .chain(rows)
        .map(|row| {
            row.iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:width$}"))
                .join("  ")
                .trim_end()
                .to_owned()
        })
        .join("\n")
}
