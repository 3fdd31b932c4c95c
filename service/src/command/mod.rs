//! [`Command`] definition.

pub mod create_appointment;
pub mod create_patient;
pub mod fetch_profile;
pub mod login;
pub mod logout;
pub mod refresh_session;
pub mod restore_state;
pub mod save_custom_theme;
pub mod send_request;
pub mod set_locale;
pub mod set_theme;
pub mod toggle_theme;
pub mod update_appointment;

use crate::{
    domain::Session,
    infra::storage::{Batch, Key},
};

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_appointment::CreateAppointment, create_patient::CreatePatient,
    fetch_profile::FetchProfile, login::Login, logout::Logout,
    refresh_session::RefreshSession, restore_state::RestoreState,
    save_custom_theme::SaveCustomTheme, send_request::SendRequest,
    set_locale::SetLocale, set_theme::SetTheme, toggle_theme::ToggleTheme,
    update_appointment::UpdateAppointment,
};

/// Returns a [`Batch`] persisting the provided [`Session`].
fn store_session(session: &Session) -> Result<Batch, serde_json::Error> {
    Ok(Batch::new()
        .set(Key::AccessToken, session.access_token.as_ref())
        .set(Key::RefreshToken, session.refresh_token.as_ref())
        .set(Key::User, serde_json::to_string(&session.user)?))
}

/// Returns a [`Batch`] removing the persisted [`Session`].
fn remove_session() -> Batch {
    Key::SESSION.into_iter().fold(Batch::new(), Batch::remove)
}
