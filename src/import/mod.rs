/// Picture import module
///
/// This module handles:
/// - Decoding picked files off the UI thread
/// - Reducing large pictures to the working size used for filtering

pub mod loader;

pub use loader::{load_picture, PICTURE_EXTENSIONS};
