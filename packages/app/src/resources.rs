//! The four collections the tabs display.

use api::models::{Appointment, Department, Mission, Notification};
use api::Endpoints;

use crate::loader::{Resource, ResourceLoader};

pub struct Missions;

impl Resource for Missions {
    type Output = Vec<Mission>;
    const NAME: &'static str = "missions";
    const FAILURE: &'static str = "Failed to load missions. Please try again.";

    fn path(endpoints: &Endpoints) -> String {
        endpoints.missions().to_string()
    }
}

pub struct Appointments;

impl Resource for Appointments {
    type Output = Vec<Appointment>;
    const NAME: &'static str = "appointments";
    const FAILURE: &'static str = "Failed to fetch appointments.";

    fn path(endpoints: &Endpoints) -> String {
        endpoints.appointments().to_string()
    }
}

pub struct Notifications;

impl Resource for Notifications {
    type Output = Vec<Notification>;
    const NAME: &'static str = "notifications";
    const FAILURE: &'static str = "Failed to fetch notifications.";

    fn path(endpoints: &Endpoints) -> String {
        endpoints.notifications().to_string()
    }
}

/// The user's department with its member roster. Served without a `data` envelope.
pub struct DepartmentRoster;

impl Resource for DepartmentRoster {
    type Output = Department;
    const NAME: &'static str = "department";
    const FAILURE: &'static str = "Failed to fetch department details";

    fn path(endpoints: &Endpoints) -> String {
        endpoints.department().to_string()
    }
}

pub type MissionsLoader<T, S> = ResourceLoader<Missions, T, S>;
pub type AppointmentsLoader<T, S> = ResourceLoader<Appointments, T, S>;
pub type NotificationsLoader<T, S> = ResourceLoader<Notifications, T, S>;
pub type DepartmentLoader<T, S> = ResourceLoader<DepartmentRoster, T, S>;
