//! [`Context`]-related definitions.

use service::{
    domain::{locale::Params, Route},
    guard::Decision,
    Guard,
};
use tracing as log;

use crate::{define_error, Error, Service};

/// Application context shared by all the views.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// [`Guard`] of navigation between views.
    guard: Guard,
}

impl Context {
    /// Creates a new [`Context`] out of the provided [`Service`] and [`Guard`].
    #[must_use]
    pub fn new(service: Service, guard: Guard) -> Self {
        Self { service, guard }
    }

    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Translates the provided key into the current language.
    #[must_use]
    pub fn t(&self, key: &str) -> String {
        self.service.locale().translate(key)
    }

    /// Translates the provided key into the current language, interpolating
    /// the provided [`Params`].
    #[must_use]
    pub fn t_with(&self, key: &str, params: &Params) -> String {
        self.service.locale().translate_with(key, params)
    }

    /// Checks whether the view of the provided [`Route`] may be opened.
    ///
    /// # Errors
    ///
    /// Errors if the [`Guard`] redirects elsewhere.
    pub fn enter(&self, route: Route) -> Result<(), Error> {
        match self.guard.check(route.path(), self.service.auth()) {
            Decision::Allow => Ok(()),
            Decision::Redirect { to, return_url } => {
                log::info!(
                    "navigation to `{route}` redirected to `{to}` \
                     (returnUrl: {return_url:?})",
                );
                let mut err = Error::from(if to == Route::Login {
                    NavigationError::LoginRequired
                } else {
                    NavigationError::Unauthorized
                });
                if let Some(url) = return_url {
                    err.message = format!("{}: `{url}`", err.message);
                }
                Err(err)
            }
        }
    }

    /// Shows the provided [`Error`] to the user as a notification.
    pub fn report(&self, err: &Error) {
        log::error!("{err}");
        _ = self.service.notifications().error(
            self.t("common.error"),
            err.text(self.service.locale()),
        );
    }

    /// Helper method calling [`Context::report()`] inside [`Result::map_err()`]
    /// closure.
    pub fn error(&self) -> impl FnOnce(Error) -> Error + '_ {
        move |err| {
            self.report(&err);
            err
        }
    }
}

define_error! {
    enum NavigationError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[key = "auth.notLoggedIn"]
        #[message = "Log in to open this view"]
        LoginRequired,

        #[code = "UNAUTHORIZED"]
        #[key = "errors.unauthorized"]
        #[message = "Missing access rights for this view"]
        Unauthorized,
    }
}
