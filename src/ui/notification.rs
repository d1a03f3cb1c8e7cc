/// Modal notifications shown after a save request
use crate::state::album::{AlbumError, PhotoAlbum};
use crate::state::session::Snapshot;

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Save was requested with nothing rendered yet
    NoImage,
    Saved,
    /// Carries the underlying error description verbatim
    SaveFailed(String),
}

impl Notification {
    pub fn title(&self) -> &str {
        match self {
            Notification::NoImage | Notification::SaveFailed(_) => "Save error",
            Notification::Saved => "Saved!",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notification::NoImage => "There is no image to save",
            Notification::Saved => "Your altered image has been saved to your photos.",
            Notification::SaveFailed(reason) => reason,
        }
    }
}

/// Handle a save request
///
/// Without a snapshot the album is never opened. Otherwise `open` is called
/// once and the snapshot is persisted into the album it returns.
pub fn request_save<A, F>(snapshot: Option<&Snapshot>, open: F) -> Notification
where
    A: PhotoAlbum,
    F: FnOnce() -> Result<A, AlbumError>,
{
    let Some(snapshot) = snapshot else {
        log::debug!("Save requested with no output image");
        return Notification::NoImage;
    };

    match open() {
        Ok(album) => persist(&album, snapshot),
        Err(e) => {
            log::warn!("Album unavailable: {}", e);
            Notification::SaveFailed(e.to_string())
        }
    }
}

/// Save one snapshot and report the outcome
///
/// Performs exactly one album call.
pub fn persist(album: &impl PhotoAlbum, snapshot: &Snapshot) -> Notification {
    match album.save(snapshot) {
        Ok(photo) => {
            log::info!("Saved {} to {}", photo.filename, photo.path.display());
            Notification::Saved
        }
        Err(e) => {
            log::warn!("Save failed: {}", e);
            Notification::SaveFailed(e.to_string())
        }
    }
}
