//! [`Query`] collection related to multiple [`Appointment`]s.

use common::operations::By;

use crate::{
    domain::{appointment, Appointment},
    infra::{transport::Request, Endpoints},
};
#[cfg(doc)]
use crate::Query;

use super::{page_params, RemoteQuery, Resource};

/// Queries an [`appointment::Page`] of [`Appointment`]s matching an
/// [`appointment::Filter`].
pub type List = RemoteQuery<By<appointment::Page, appointment::Selector>>;

/// Queries [`Appointment`]s within an [`appointment::Range`] for a calendar.
pub type Calendar = RemoteQuery<By<Vec<Appointment>, appointment::Range>>;

impl Resource for appointment::Selector {
    type Output = appointment::Page;

    fn request(self, endpoints: &Endpoints) -> Request {
        Request::get(&endpoints.appointments.list)
            .query(page_params(self.arguments))
            .query(self.filter.to_query())
    }
}

impl Resource for appointment::Range {
    type Output = Vec<Appointment>;

    fn request(self, endpoints: &Endpoints) -> Request {
        let Self { from, to } = self;
        Request::get(&endpoints.appointments.calendar).query([
            ("startDate".to_owned(), from.to_string()),
            ("endDate".to_owned(), to.to_string()),
        ])
    }
}
