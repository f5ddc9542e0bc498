//! Conversions from everyday values into path segments.
//!
//! Directories named after dates, run numbers or timestamps are common in
//! data pipelines; [`IntoSegment`] lets those values be joined onto a path
//! directly instead of being formatted by hand at every call site.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

/// Format used for date-time segments: `2020-01-01, 00-00-00.000000`.
///
/// Colons are avoided so the segment is a valid file name everywhere.
pub const DATETIME_SEGMENT_FORMAT: &str = "%Y-%m-%d, %H-%M-%S.%6f";

/// Format used for date segments: `2020-01-01`.
pub const DATE_SEGMENT_FORMAT: &str = "%Y-%m-%d";

/// A value that can be appended to a path.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use paved_path::IntoSegment;
/// use std::path::PathBuf;
///
/// assert_eq!(42_u32.into_segment(), PathBuf::from("42"));
/// assert_eq!(1.5_f64.into_segment(), PathBuf::from("1.5"));
///
/// let day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
/// assert_eq!(day.into_segment(), PathBuf::from("2020-01-01"));
/// ```
pub trait IntoSegment {
    /// Converts the value into a (possibly multi-component) relative path.
    fn into_segment(self) -> PathBuf;
}

impl IntoSegment for &str {
    fn into_segment(self) -> PathBuf {
        PathBuf::from(self)
    }
}

impl IntoSegment for String {
    fn into_segment(self) -> PathBuf {
        PathBuf::from(self)
    }
}

impl IntoSegment for &String {
    fn into_segment(self) -> PathBuf {
        PathBuf::from(self)
    }
}

impl IntoSegment for &Path {
    fn into_segment(self) -> PathBuf {
        self.to_path_buf()
    }
}

impl IntoSegment for PathBuf {
    fn into_segment(self) -> PathBuf {
        self
    }
}

impl IntoSegment for &PathBuf {
    fn into_segment(self) -> PathBuf {
        self.clone()
    }
}

macro_rules! integer_segments {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoSegment for $ty {
                fn into_segment(self) -> PathBuf {
                    PathBuf::from(self.to_string())
                }
            }
        )*
    };
}

integer_segments!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

// `Debug` keeps the fractional part for whole numbers ("1.0", not "1").
impl IntoSegment for f32 {
    fn into_segment(self) -> PathBuf {
        PathBuf::from(format!("{self:?}"))
    }
}

impl IntoSegment for f64 {
    fn into_segment(self) -> PathBuf {
        PathBuf::from(format!("{self:?}"))
    }
}

impl IntoSegment for NaiveDate {
    fn into_segment(self) -> PathBuf {
        PathBuf::from(self.format(DATE_SEGMENT_FORMAT).to_string())
    }
}

impl IntoSegment for NaiveDateTime {
    fn into_segment(self) -> PathBuf {
        PathBuf::from(self.format(DATETIME_SEGMENT_FORMAT).to_string())
    }
}

/// Time-zone aware values are rendered in their own zone's wall-clock time.
impl<Tz: TimeZone> IntoSegment for DateTime<Tz> {
    fn into_segment(self) -> PathBuf {
        self.naive_local().into_segment()
    }
}
