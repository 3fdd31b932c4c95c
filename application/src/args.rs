//! [`Args`] definitions.

use clap::{Parser, Subcommand};
use common::Date;
use service::domain::{
    appointment, patient,
    theme::Name,
    user::{Password, Username},
};

/// Terminal client of the hospital information system.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// View to open.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// View of the application.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Logs in with the provided credentials.
    Login {
        /// Username to log in with.
        #[arg(short, long)]
        username: Username,

        /// Password to log in with.
        #[arg(short, long, env = "HIS_PASSWORD", hide_env_values = true)]
        password: Password,

        /// Requests a long-living session.
        #[arg(long)]
        remember_me: bool,
    },

    /// Ends the current session.
    Logout,

    /// Shows the current user.
    Whoami,

    /// Shows the summary of the day.
    Dashboard,

    /// Browses and registers patients.
    #[command(subcommand)]
    Patients(Patients),

    /// Browses and schedules appointments.
    #[command(subcommand)]
    Appointments(Appointments),

    /// Shows or switches the language.
    Locale {
        /// Code of the language to switch to.
        code: Option<String>,
    },

    /// Shows or switches the theme.
    #[command(subcommand)]
    Theme(Theme),

    /// Shows notifications of this run.
    Notifications,
}

/// Pagination arguments.
#[derive(Clone, Copy, Debug, clap::Args)]
pub struct Page {
    /// Number of the page to show.
    #[arg(long)]
    pub page: Option<u32>,

    /// Maximum number of items on the page.
    #[arg(long)]
    pub limit: Option<u32>,
}

/// Patients view.
#[derive(Debug, Subcommand)]
pub enum Patients {
    /// Lists patients page by page.
    List(Page),

    /// Searches patients.
    Search {
        /// Term matched against names, phone and record number.
        term: Option<String>,

        /// Required gender.
        #[arg(long)]
        gender: Option<patient::Gender>,

        /// Minimum age in years.
        #[arg(long, requires = "max_age")]
        min_age: Option<u32>,

        /// Maximum age in years.
        #[arg(long, requires = "min_age")]
        max_age: Option<u32>,

        /// Required city.
        #[arg(long)]
        city: Option<String>,

        /// Required activity status.
        #[arg(long)]
        active: Option<bool>,
    },

    /// Shows details of a patient.
    Show {
        /// ID of the patient.
        id: String,
    },

    /// Registers a new patient.
    Register(Registration),
}

/// Registration form of a patient.
#[derive(Debug, clap::Args)]
pub struct Registration {
    /// First name.
    #[arg(long)]
    pub first_name: String,

    /// Last name.
    #[arg(long)]
    pub last_name: String,

    /// Date of birth in `YYYY-MM-DD` format.
    #[arg(long)]
    pub date_of_birth: Date,

    /// Gender.
    #[arg(long)]
    pub gender: patient::Gender,

    /// Phone number.
    #[arg(long)]
    pub phone: String,

    /// Email address.
    #[arg(long)]
    pub email: Option<String>,

    /// Street and house number.
    #[arg(long, default_value = "")]
    pub street: String,

    /// City.
    #[arg(long, default_value = "")]
    pub city: String,

    /// State or region.
    #[arg(long, default_value = "")]
    pub state: String,

    /// Postal code.
    #[arg(long, default_value = "")]
    pub zip_code: String,

    /// Country.
    #[arg(long, default_value = "")]
    pub country: String,

    /// Full name of the emergency contact.
    #[arg(long)]
    pub contact_name: String,

    /// Relationship of the emergency contact.
    #[arg(long)]
    pub contact_relationship: String,

    /// Phone number of the emergency contact.
    #[arg(long)]
    pub contact_phone: String,
}

/// Appointments view.
#[derive(Debug, Subcommand)]
pub enum Appointments {
    /// Lists appointments page by page.
    List {
        /// Pagination arguments.
        #[command(flatten)]
        page: Page,

        /// Earliest date, inclusive.
        #[arg(long)]
        from: Option<Date>,

        /// Latest date, inclusive.
        #[arg(long)]
        to: Option<Date>,

        /// Required status.
        #[arg(long)]
        status: Option<appointment::Status>,

        /// Required type.
        #[arg(long = "type")]
        kind: Option<appointment::Type>,

        /// Required doctor.
        #[arg(long)]
        doctor: Option<String>,

        /// Required patient.
        #[arg(long)]
        patient: Option<String>,
    },

    /// Shows the appointment calendar.
    Calendar {
        /// First day to show, today by default.
        #[arg(long)]
        from: Option<Date>,

        /// Number of days to show.
        #[arg(long, default_value_t = 7)]
        days: u16,
    },

    /// Schedules a new appointment.
    Create {
        /// ID of the visiting patient.
        #[arg(long)]
        patient: String,

        /// ID of the receiving doctor.
        #[arg(long)]
        doctor: String,

        /// Date of the visit.
        #[arg(long)]
        date: Date,

        /// Start time in `HH:MM` format.
        #[arg(long)]
        start: String,

        /// End time in `HH:MM` format.
        #[arg(long)]
        end: String,

        /// Type of the visit.
        #[arg(long = "type", default_value = "CONSULTATION")]
        kind: appointment::Type,

        /// Reason of the visit.
        #[arg(long)]
        reason: String,

        /// Additional notes.
        #[arg(long)]
        notes: Option<String>,
    },

    /// Modifies an existing appointment.
    Update {
        /// ID of the appointment.
        id: String,

        /// New date.
        #[arg(long)]
        date: Option<Date>,

        /// New start time in `HH:MM` format.
        #[arg(long)]
        start: Option<String>,

        /// New end time in `HH:MM` format.
        #[arg(long)]
        end: Option<String>,

        /// New type.
        #[arg(long = "type")]
        kind: Option<appointment::Type>,

        /// New status.
        #[arg(long)]
        status: Option<appointment::Status>,

        /// New reason.
        #[arg(long)]
        reason: Option<String>,

        /// New notes.
        #[arg(long)]
        notes: Option<String>,
    },
}

/// Theme view.
#[derive(Debug, Subcommand)]
pub enum Theme {
    /// Shows the current theme and the available ones.
    Show,

    /// Switches to the theme with the provided name.
    Set {
        /// Name of the theme: `light`, `dark`, `auto` or a custom one.
        name: Name,
    },

    /// Switches between the light and the dark themes.
    Toggle,

    /// Creates a custom theme out of a built-in one.
    Create {
        /// Name of the custom theme.
        name: String,

        /// Human-readable name of the custom theme.
        #[arg(long)]
        display_name: Option<String>,

        /// Built-in theme to copy colors from.
        #[arg(long, default_value = "light")]
        base: Name,
    },

    /// Renames an existing custom theme.
    Rename {
        /// Name of the custom theme.
        name: String,

        /// New human-readable name.
        display_name: String,
    },

    /// Deletes a custom theme.
    Delete {
        /// Name of the custom theme.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::{Appointments, Args, Command, Patients};

    #[test]
    fn parses_patient_search() {
        let args = Args::try_parse_from([
            "his", "patients", "search", "garcia", "--gender", "FEMALE",
            "--min-age", "18", "--max-age", "65",
        ])
        .unwrap();

        let Command::Patients(Patients::Search {
            term,
            gender,
            min_age,
            max_age,
            ..
        }) = args.command
        else {
            panic!("unexpected command: {:?}", args.command);
        };
        assert_eq!(term.as_deref(), Some("garcia"));
        assert_eq!(gender.map(|g| g.to_string()).as_deref(), Some("FEMALE"));
        assert_eq!((min_age, max_age), (Some(18), Some(65)));
        assert_eq!(args.config, "config.toml");
    }

    #[test]
    fn age_bounds_go_together() {
        assert!(Args::try_parse_from([
            "his", "patients", "search", "--min-age", "18",
        ])
        .is_err());
    }

    #[test]
    fn calendar_defaults_to_a_week() {
        let args =
            Args::try_parse_from(["his", "appointments", "calendar"]).unwrap();

        assert!(matches!(
            args.command,
            Command::Appointments(Appointments::Calendar {
                from: None,
                days: 7,
            }),
        ));
    }

    #[test]
    fn rejects_short_password() {
        assert!(Args::try_parse_from([
            "his", "login", "-u", "jdoe", "-p", "123",
        ])
        .is_err());
    }
}
