//! [`Query`] collection related to a single [`Patient`].

use common::operations::By;

use crate::{
    domain::{patient, Patient},
    infra::{transport::Request, Endpoints},
};
#[cfg(doc)]
use crate::Query;

use super::{RemoteQuery, Resource};

/// Queries a [`Patient`] by its [`patient::Id`].
pub type ById = RemoteQuery<By<Patient, patient::Id>>;

impl Resource for patient::Id {
    type Output = Patient;

    fn request(self, endpoints: &Endpoints) -> Request {
        Request::get(format!("{}/{self}", endpoints.patients.list))
    }
}
