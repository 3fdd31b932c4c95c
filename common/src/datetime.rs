//! Date and time utilities.

use std::{cmp::Ordering, fmt, marker::PhantomData, str::FromStr};

use derive_more::{Debug, Display, Error};
use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    UtcOffset,
};

/// Untyped date and time.
pub type DateTime = DateTimeOf;

/// UTC date and time.
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// Inner representation of the date and time.
    inner: time::OffsetDateTime,

    /// Type parameter describing the kind of date and time.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// Creates a new [`DateTime`] representing the current date and time.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn now() -> Self {
        let inner = time::OffsetDateTime::now_utc();
        Self {
            _of: PhantomData,
            inner: inner
                .replace_microsecond(inner.microsecond())
                .expect("infallible"),
        }
    }

    /// Creates a new [`DateTime`] from the provided [RFC 3339] string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        use ParseError as E;

        time::OffsetDateTime::parse(input, &Rfc3339)
            .map_err(E::Parse)?
            .try_into()
            .map_err(E::ComponentRange)
    }

    /// Returns the [`DateTime`] as an [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.inner.format(&Rfc3339).unwrap_or_else(|e| {
            panic!("cannot format `DateTime` as RFC 3339: {e}")
        })
    }

    /// Returns the calendar [`Date`] of this [`DateTime`].
    #[must_use]
    pub fn date(&self) -> Date {
        Date(self.inner.date())
    }
}

/// Error of parsing [`DateTime`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// Failed to parse the string into an [`DateTime`].
    Parse(time::error::Parse),

    /// Parsed [`DateTime`] has an out of range component.
    ComponentRange(time::error::ComponentRange),
}

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> fmt::Display for DateTimeOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl<Of: ?Sized> TryFrom<time::OffsetDateTime> for DateTimeOf<Of> {
    type Error = time::error::ComponentRange;

    fn try_from(dt: time::OffsetDateTime) -> Result<Self, Self::Error> {
        dt.to_offset(UtcOffset::UTC)
            .replace_microsecond(dt.microsecond())
            .map(|inner| Self {
                inner,
                _of: PhantomData,
            })
    }
}

/// Calendar date without a time component, formatted as `YYYY-MM-DD`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Format of a [`Date`] representation.
    const FORMAT: &'static [BorrowedFormatItem<'static>] =
        format_description!("[year]-[month]-[day]");

    /// Parses a [`Date`] from its `YYYY-MM-DD` representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the `input` is not a valid date.
    pub fn parse(input: &str) -> Result<Self, time::error::Parse> {
        time::Date::parse(input, Self::FORMAT).map(Self)
    }

    /// Returns a [`Date`] shifted by the provided number of days.
    ///
    /// [`None`] is returned if the result is out of range.
    #[must_use]
    pub fn add_days(self, days: i64) -> Option<Self> {
        self.0
            .checked_add(time::Duration::days(days))
            .map(Self)
    }

    /// Returns the number of whole years passed from the `earlier` [`Date`]
    /// to this one.
    ///
    /// Zero is returned if the `earlier` [`Date`] is not earlier.
    #[must_use]
    pub fn years_since(self, earlier: Self) -> u32 {
        let (now, then) = (self.0, earlier.0);
        let mut years = now.year() - then.year();
        if (u8::from(now.month()), now.day()) < (u8::from(then.month()), then.day())
        {
            years -= 1;
        }
        u32::try_from(years).unwrap_or(0)
    }
}

impl FromStr for Date {
    type Err = time::error::Parse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.format(Self::FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

pub mod serde {
    //! Module providing integration with [`serde`] crate.
    //!
    //! [`DateTimeOf`] is (de)serialized as an [RFC 3339] string and [`Date`]
    //! as a `YYYY-MM-DD` string by default.
    //!
    //! [RFC 3339]: https://tools.ietf.org/html/rfc3339

    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    use super::{Date, DateTimeOf};

    impl<Of: ?Sized> Serialize for DateTimeOf<Of> {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.serialize_str(&self.to_rfc3339())
        }
    }

    impl<'de, Of: ?Sized> Deserialize<'de> for DateTimeOf<Of> {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let raw = String::deserialize(d)?;
            Self::from_rfc3339(&raw).map_err(D::Error::custom)
        }
    }

    impl Serialize for Date {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Date {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let raw = String::deserialize(d)?;
            // Accept full timestamps too, as some endpoints send them.
            let day = raw.get(..10).unwrap_or(&raw);
            Self::parse(day).map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Date, DateTime};

    #[test]
    fn rfc3339_round_trips_through_display() {
        let dt = DateTime::from_rfc3339("2024-03-01T10:15:00Z").unwrap();

        assert_eq!(dt.to_string(), "2024-03-01T10:15:00Z");
        assert_eq!(dt.date().to_string(), "2024-03-01");
    }

    #[test]
    fn normalizes_offsets_to_utc() {
        let local = DateTime::from_rfc3339("2024-03-01T12:15:00+02:00").unwrap();
        let utc = DateTime::from_rfc3339("2024-03-01T10:15:00Z").unwrap();
        let later = DateTime::from_rfc3339("2024-03-01T10:15:01Z").unwrap();

        assert_eq!(local, utc);
        assert_eq!(local.to_string(), "2024-03-01T10:15:00Z");
        assert!(later > local);
    }

    #[test]
    fn date_shifts_across_month_boundary() {
        let date = Date::parse("2024-02-28").unwrap();

        assert_eq!(date.add_days(2).unwrap().to_string(), "2024-03-01");
        assert_eq!(date.add_days(-28).unwrap().to_string(), "2024-01-31");
    }

    #[test]
    fn counts_whole_years() {
        let birth = Date::parse("2000-02-29").unwrap();

        assert_eq!(Date::parse("2010-02-28").unwrap().years_since(birth), 9);
        assert_eq!(Date::parse("2010-03-01").unwrap().years_since(birth), 10);
        assert_eq!(Date::parse("1999-01-01").unwrap().years_since(birth), 0);
    }

    #[test]
    fn date_accepts_full_timestamps() {
        let date: Date =
            serde_json::from_str("\"1990-05-17T00:00:00.000Z\"").unwrap();

        assert_eq!(date.to_string(), "1990-05-17");
    }
}
