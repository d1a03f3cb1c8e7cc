/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the album catalog and the UI layer.

use std::path::PathBuf;

use crate::filter::FilterKind;

/// A photo written to the album
#[derive(Debug, Clone, PartialEq)]
pub struct SavedPhoto {
    /// Catalog row ID
    pub id: i64,
    /// Full path to the PNG file
    pub path: PathBuf,
    /// Filename only (e.g., "instafilter-20240714-101500123-sepia-tone.png")
    pub filename: String,
    /// Filter that produced the image
    pub filter: FilterKind,
    /// Slider value at save time
    pub intensity: f32,
    pub width: u32,
    pub height: u32,
    /// Unix timestamp (seconds)
    pub saved_at: i64,
}
