//! Path construction and normalization.
//!
//! - [`PavedPath`] builds paths from strings, numbers, dates and timestamps,
//!   and offers modification-time checks and recursive deletion.
//! - [`normalize`] turns any path into the absolute, lexically resolved form
//!   that [`PathHandle`](crate::PathHandle) uses as its identity.
//!
//! # Examples
//!
//! ```
//! use paved_path::path::PavedPath;
//!
//! let path = PavedPath::new("reports") / 2024 / "summary.toml";
//! assert!(path.as_path().ends_with("2024/summary.toml"));
//!
//! let absolute = path.normalized().unwrap();
//! assert!(absolute.is_absolute());
//! ```

pub mod normalize;
mod paved;
pub mod segment;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use paved::PavedPath;
pub use segment::IntoSegment;
