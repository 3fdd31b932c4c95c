//! Login, logout and profile views.

use itertools::Itertools as _;
use secrecy::SecretBox;
use service::{
    command::{self, fetch_profile, login},
    domain::{
        locale::Params,
        user::{Credentials, Password, Username},
        User,
    },
    Command as _,
};
use tracing as log;

use crate::{define_error, AsError, Context, Error};

use super::layout;

/// Logs in with the provided credentials and shows the header.
///
/// # Errors
///
/// Errors if the credentials are not accepted.
pub async fn login(
    ctx: &Context,
    username: Username,
    password: Password,
    remember_me: bool,
) -> Result<String, Error> {
    log::debug!(%username, remember_me, "logging in");

    let session = ctx
        .service()
        .execute(command::Login(Credentials {
            username,
            password: SecretBox::init_with(move || password),
            remember_me,
        }))
        .await
        .map_err(AsError::into_error)?;

    _ = ctx.service().notifications().success(
        ctx.t("auth.welcomeBack"),
        ctx.t_with(
            "auth.welcomeBackUser",
            &Params::new().with("name", session.user.full_name()),
        ),
    );
    Ok(layout::header(ctx))
}

/// Ends the current session.
///
/// # Errors
///
/// Never errors, as failures of notifying the remote API are swallowed.
pub async fn logout(ctx: &Context) -> Result<String, Error> {
    if !ctx.service().auth().is_authenticated() {
        return Ok(ctx.t("auth.notLoggedIn"));
    }

    ctx.service()
        .execute(command::Logout::remote())
        .await
        .unwrap_or_else(|e| match e {});

    _ = ctx
        .service()
        .notifications()
        .success(ctx.t("auth.loggedOut"), ctx.t("auth.loggedOutMessage"));
    Ok(ctx.t("auth.loggedOut"))
}

/// Shows the profile of the current user, fetched anew.
///
/// # Errors
///
/// Errors if the profile cannot be fetched.
pub async fn whoami(ctx: &Context) -> Result<String, Error> {
    if !ctx.service().auth().is_authenticated() {
        return Ok(ctx.t("auth.notLoggedIn"));
    }

    let user = ctx
        .service()
        .execute(command::FetchProfile)
        .await
        .map_err(AsError::into_error)?;
    Ok(render_profile(ctx, &user))
}

/// Renders the provided [`User`] profile.
fn render_profile(ctx: &Context, user: &User) -> String {
    let permissions = user
        .effective_permissions()
        .into_iter()
        .map(|p| p.name.as_str())
        .sorted_unstable()
        .dedup()
        .join(", ");
    [
        layout::header(ctx),
        format!("{}: {}", ctx.t("auth.username"), user.username),
        format!("Email: {}", user.email),
        format!("Role: {}", user.role.name),
        format!("Permissions: {permissions}"),
    ]
    .join("\n")
}

impl AsError for login::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_CREDENTIALS"]
                #[key = "auth.invalidCredentials"]
                #[message = "Provided credentials do not match any `User`"]
                InvalidCredentials,

                #[code = "LOGIN_FAILED"]
                #[key = "auth.loginFailed"]
                #[message = "Remote API rejected the login"]
                LoginFailed,
            }
        }

        match self {
            Self::InvalidCredentials => Some(Error::InvalidCredentials.into()),
            Self::Rejected(_) => Some(Error::LoginFailed.into()),
            Self::Network(e) => e.try_as_error(),
            Self::Json(_) | Self::Storage(_) => None,
        }
    }
}

impl AsError for fetch_profile::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Request(e) => e.try_as_error(),
            Self::Json(_) | Self::Storage(_) => None,
        }
    }
}
