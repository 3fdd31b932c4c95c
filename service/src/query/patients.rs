//! [`Query`] collection related to multiple [`Patient`]s.

use common::operations::By;

use crate::{
    domain::{patient, Patient},
    infra::{transport::Request, Endpoints},
};
#[cfg(doc)]
use crate::Query;

use super::{page_params, RemoteQuery, Resource};

/// Queries a [`patient::Page`] of all the [`Patient`]s.
pub type List = RemoteQuery<By<patient::Page, patient::Selector>>;

/// Queries [`Patient`]s matching a [`patient::Filter`].
pub type Search = RemoteQuery<By<Vec<Patient>, patient::Filter>>;

impl Resource for patient::Selector {
    type Output = patient::Page;

    fn request(self, endpoints: &Endpoints) -> Request {
        Request::get(&endpoints.patients.list).query(page_params(self.arguments))
    }
}

impl Resource for patient::Filter {
    type Output = Vec<Patient>;

    fn request(self, endpoints: &Endpoints) -> Request {
        Request::get(&endpoints.patients.search).query(self.to_query())
    }
}
