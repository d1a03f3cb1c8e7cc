/// State management module
///
/// This module handles all application state, including:
/// - The filter session and its derived output (session.rs)
/// - Shared data structures (data.rs)
/// - Persistent user settings (settings.rs)
/// - The photo album that saved images land in (album.rs)

pub mod album;
pub mod data;
pub mod session;
pub mod settings;
