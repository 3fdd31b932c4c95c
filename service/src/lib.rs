//! Service contains the client-side business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
mod flight;
pub mod guard;
pub mod infra;
pub mod query;
pub mod store;
pub mod task;

use std::{error::Error, sync::Arc};

use common::operations::{Perform, Start};
use serde::Deserialize;
use smart_default::SmartDefault;
use tracerr::Traced;

use self::{
    domain::user::session::AccessToken,
    flight::SingleFlight,
    infra::{
        storage::{self, Batch},
        Endpoints, Storage,
    },
};

pub use self::{
    command::Command, guard::Guard, query::Query, task::Task,
};

/// [`Service`] configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// [`Endpoints`] of the remote API.
    pub endpoints: Endpoints,

    /// Toggled [`Features`].
    pub features: Features,

    /// [`ColorScheme`] preferred by the operating system, resolving the
    /// [`Name::Auto`] theme.
    ///
    /// [`ColorScheme`]: domain::theme::ColorScheme
    /// [`Name::Auto`]: domain::theme::Name::Auto
    pub system_scheme: domain::theme::ColorScheme,
}

/// Optional features of the application.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Features {
    /// Indicator whether dark themes are available.
    #[default = true]
    pub dark_mode: bool,

    /// Indicator whether notifications are shown.
    #[default = true]
    pub notifications: bool,

    /// Indicator whether locales other than the default one are available.
    #[default = true]
    pub i18n: bool,
}

/// Client-side domain service.
#[derive(Clone, Debug)]
pub struct Service<St, Tr> {
    /// Configuration of this [`Service`].
    config: Arc<Config>,

    /// [`Storage`] of this [`Service`].
    storage: St,

    /// [`Transport`] of this [`Service`].
    ///
    /// [`Transport`]: infra::Transport
    transport: Tr,

    /// [`store::Auth`] of this [`Service`].
    auth: store::Auth,

    /// [`store::Notifications`] of this [`Service`].
    notifications: store::Notifications,

    /// [`store::Loading`] of this [`Service`].
    loading: store::Loading,

    /// [`store::Locale`] of this [`Service`].
    locale: store::Locale,

    /// [`store::Theme`] of this [`Service`].
    theme: store::Theme,

    /// Gate of the in-flight session refresh, sharing the renewed
    /// [`AccessToken`] (if the refresh succeeded).
    refresh: SingleFlight<Option<AccessToken>>,

    /// Lock serializing writes of the persisted [`Session`] with changes of
    /// the [`store::Auth`].
    ///
    /// [`Session`]: domain::Session
    persistence: Arc<tokio::sync::Mutex<()>>,
}

impl<St, Tr> Service<St, Tr> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(
        config: Config,
        storage: St,
        transport: Tr,
    ) -> (Self, task::Background)
    where
        Self: Task<Start<task::ExpireNotifications>, Ok = (), Err: Error>
            + Clone
            + 'static,
    {
        let Features {
            dark_mode,
            notifications,
            i18n,
        } = config.features;
        let theme = store::Theme::new(dark_mode);
        theme.set_system_scheme(config.system_scheme);
        let this = Self {
            config: Arc::new(config),
            storage,
            transport,
            auth: store::Auth::new(),
            notifications: store::Notifications::new(notifications),
            loading: store::Loading::new(),
            locale: store::Locale::new(i18n),
            theme,
            refresh: SingleFlight::default(),
            persistence: Arc::default(),
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn(async move {
            svc.execute(Start(task::ExpireNotifications)).await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Storage`] of this [`Service`].
    #[must_use]
    pub fn storage(&self) -> &St {
        &self.storage
    }

    /// Returns [`Transport`] of this [`Service`].
    ///
    /// [`Transport`]: infra::Transport
    #[must_use]
    pub fn transport(&self) -> &Tr {
        &self.transport
    }

    /// Returns [`store::Auth`] of this [`Service`].
    #[must_use]
    pub fn auth(&self) -> &store::Auth {
        &self.auth
    }

    /// Returns [`store::Notifications`] of this [`Service`].
    #[must_use]
    pub fn notifications(&self) -> &store::Notifications {
        &self.notifications
    }

    /// Returns [`store::Loading`] of this [`Service`].
    #[must_use]
    pub fn loading(&self) -> &store::Loading {
        &self.loading
    }

    /// Returns [`store::Locale`] of this [`Service`].
    #[must_use]
    pub fn locale(&self) -> &store::Locale {
        &self.locale
    }

    /// Returns [`store::Theme`] of this [`Service`].
    #[must_use]
    pub fn theme(&self) -> &store::Theme {
        &self.theme
    }
}

impl<St, Tr> Service<St, Tr>
where
    St: Storage<storage::Write, Ok = (), Err = Traced<storage::Error>>,
{
    /// Applies the provided [`Batch`] to the [`Storage`].
    async fn persist(&self, batch: Batch) -> Result<(), Traced<storage::Error>> {
        if batch.is_empty() {
            return Ok(());
        }
        self.storage
            .execute(Perform(batch))
            .await
            .map_err(tracerr::wrap!())
    }
}
