//! Domain definitions.

pub mod appointment;
pub mod locale;
pub mod notification;
pub mod patient;
pub mod route;
pub mod theme;
pub mod user;

pub use self::{
    appointment::Appointment,
    locale::Locale,
    notification::Notification,
    patient::Patient,
    route::Route,
    user::{Session, User},
};
