use chrono::Utc;
use image::ImageFormat;
use rusqlite::types::Type;
use rusqlite::{Connection, Result as SqlResult};
use std::fs;
use std::path::{Path, PathBuf};

use super::data::SavedPhoto;
use super::session::Snapshot;
use crate::filter::FilterKind;

#[derive(thiserror::Error, Debug)]
pub enum AlbumError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("Could not encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Album catalog error: {0}")]
    Catalog(#[from] rusqlite::Error),
}

/// Anything a snapshot can be saved into
pub trait PhotoAlbum {
    fn save(&self, snapshot: &Snapshot) -> Result<SavedPhoto, AlbumError>;
}

/// Where the album keeps its catalog and its image files
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumPaths {
    pub db_path: PathBuf,
    pub photos_dir: PathBuf,
}

impl AlbumPaths {
    /// Platform locations, with an optional override for the photos directory
    ///
    /// - Catalog: <data_dir>/instafilter/album.db
    /// - Photos: <pictures_dir>/Instafilter
    pub fn platform(photos_override: Option<&Path>) -> Self {
        let mut db_path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        db_path.push("instafilter");
        db_path.push("album.db");

        let photos_dir = match photos_override {
            Some(dir) => dir.to_path_buf(),
            None => dirs::picture_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."))
                .join("Instafilter"),
        };

        Self { db_path, photos_dir }
    }
}

/// The Album stores saved photos as PNG files and catalogs them in SQLite.
pub struct Album {
    conn: Connection,
    paths: AlbumPaths,
}

impl Album {
    /// Open (or create) the album at `paths`.
    pub fn open(paths: &AlbumPaths) -> Result<Self, AlbumError> {
        // Ensure both directories exist
        if let Some(parent) = paths.db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::create_dir_all(&paths.photos_dir)?;

        let conn = Connection::open(&paths.db_path)?;
        log::debug!("Album catalog opened at {}", paths.db_path.display());

        let album = Album {
            conn,
            paths: paths.clone(),
        };
        album.init_schema()?;

        Ok(album)
    }

    /// Create the catalog table and indexes if they don't exist.
    fn init_schema(&self) -> SqlResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS photos (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                path            TEXT NOT NULL UNIQUE,
                filename        TEXT NOT NULL,
                filter          TEXT NOT NULL,
                intensity       REAL NOT NULL,
                width           INTEGER NOT NULL,
                height          INTEGER NOT NULL,
                saved_at        INTEGER NOT NULL,
                file_status     TEXT NOT NULL DEFAULT 'exists'
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_photos_saved_at
             ON photos(saved_at DESC)",
            [],
        )?;

        Ok(())
    }

    /// Get a count of photos in the album
    pub fn photo_count(&self) -> SqlResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM photos", [], |row| row.get(0))
    }

    /// Most recent photos first
    pub fn recent_photos(&self, limit: usize) -> SqlResult<Vec<SavedPhoto>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, path, filename, filter, intensity, width, height, saved_at
             FROM photos
             WHERE file_status = 'exists'
             ORDER BY saved_at DESC, id DESC
             LIMIT ?1",
        )?;

        let photos = stmt.query_map([limit as i64], |row| {
            let path: String = row.get(1)?;
            let filter: String = row.get(3)?;
            let filter: FilterKind = filter
                .parse()
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
            Ok(SavedPhoto {
                id: row.get(0)?,
                path: PathBuf::from(path),
                filename: row.get(2)?,
                filter,
                intensity: row.get(4)?,
                width: row.get(5)?,
                height: row.get(6)?,
                saved_at: row.get(7)?,
            })
        })?;

        photos.collect()
    }

    /// Verify that saved files still exist on disk
    /// Mark as 'deleted' if the file is missing
    pub fn verify_files(&self) -> SqlResult<usize> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, path FROM photos WHERE file_status = 'exists'")?;

        let existing: Vec<(i64, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .filter_map(|r| r.ok())
            .collect();

        let mut deleted_count = 0;
        for (id, path) in existing {
            if !Path::new(&path).exists() {
                self.conn.execute(
                    "UPDATE photos SET file_status = 'deleted' WHERE id = ?1",
                    rusqlite::params![id],
                )?;
                deleted_count += 1;
            }
        }

        if deleted_count > 0 {
            log::warn!("Marked {} missing photos as deleted", deleted_count);
        }

        Ok(deleted_count)
    }

    fn file_name_for(filter: FilterKind) -> String {
        format!(
            "instafilter-{}-{}.png",
            Utc::now().format("%Y%m%d-%H%M%S%3f"),
            filter.name()
        )
    }
}

impl PhotoAlbum for Album {
    fn save(&self, snapshot: &Snapshot) -> Result<SavedPhoto, AlbumError> {
        fs::create_dir_all(&self.paths.photos_dir)?;

        let filename = Self::file_name_for(snapshot.filter);
        let path = self.paths.photos_dir.join(&filename);
        snapshot.image.save_with_format(&path, ImageFormat::Png)?;

        let saved_at = Utc::now().timestamp();
        let (width, height) = snapshot.image.dimensions();
        let intensity = snapshot.intensity.value();

        self.conn.execute(
            "INSERT INTO photos (path, filename, filter, intensity, width, height, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                path.to_string_lossy().to_string(),
                &filename,
                snapshot.filter.name(),
                intensity,
                width,
                height,
                saved_at,
            ],
        )?;

        Ok(SavedPhoto {
            id: self.conn.last_insert_rowid(),
            path,
            filename,
            filter: snapshot.filter,
            intensity,
            width,
            height,
            saved_at,
        })
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Album {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Album").field("paths", &self.paths).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Intensity;
    use image::{Rgba, RgbaImage};

    fn temp_paths(dir: &Path) -> AlbumPaths {
        AlbumPaths {
            db_path: dir.join("data").join("album.db"),
            photos_dir: dir.join("photos"),
        }
    }

    fn snapshot(filter: FilterKind) -> Snapshot {
        Snapshot {
            image: RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255])),
            filter,
            intensity: Intensity::new(0.25),
        }
    }

    #[test]
    fn test_save_writes_png_and_row() {
        let dir = tempfile::tempdir().unwrap();
        let album = Album::open(&temp_paths(dir.path())).unwrap();

        let photo = album.save(&snapshot(FilterKind::TwirlDistortion)).unwrap();

        assert!(photo.path.exists());
        assert!(photo.filename.ends_with("twirl-distortion.png"));
        assert_eq!((photo.width, photo.height), (3, 2));
        assert_eq!(album.photo_count().unwrap(), 1);

        let decoded = image::open(&photo.path).unwrap().to_rgba8();
        assert_eq!(decoded, snapshot(FilterKind::TwirlDistortion).image);
    }

    #[test]
    fn test_recent_photos_roundtrip_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let album = Album::open(&temp_paths(dir.path())).unwrap();
        let saved = album.save(&snapshot(FilterKind::GaussianBlur)).unwrap();

        let recent = album.recent_photos(10).unwrap();
        assert_eq!(recent, vec![saved]);
        assert_eq!(recent[0].filter, FilterKind::GaussianBlur);
        assert_eq!(recent[0].intensity, 0.25);
    }

    #[test]
    fn test_unknown_filter_in_catalog_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let album = Album::open(&temp_paths(dir.path())).unwrap();
        album
            .conn
            .execute(
                "INSERT INTO photos (path, filename, filter, intensity, width, height, saved_at)
                 VALUES ('/tmp/x.png', 'x.png', 'CISepiaTone', 0.5, 1, 1, 0)",
                [],
            )
            .unwrap();

        let err = album.recent_photos(10).unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(3, Type::Text, _)));
    }

    #[test]
    fn test_verify_files_marks_missing() {
        let dir = tempfile::tempdir().unwrap();
        let album = Album::open(&temp_paths(dir.path())).unwrap();
        let photo = album.save(&snapshot(FilterKind::Vignette)).unwrap();

        assert_eq!(album.verify_files().unwrap(), 0);
        fs::remove_file(&photo.path).unwrap();
        assert_eq!(album.verify_files().unwrap(), 1);
        assert!(album.recent_photos(10).unwrap().is_empty());
    }

    #[test]
    fn test_reopen_keeps_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let paths = temp_paths(dir.path());
        Album::open(&paths).unwrap().save(&snapshot(FilterKind::Pixellate)).unwrap();

        let reopened = Album::open(&paths).unwrap();
        assert_eq!(reopened.photo_count().unwrap(), 1);
    }

    #[test]
    fn test_unwritable_photos_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("photos");
        fs::write(&blocker, b"not a directory").unwrap();

        let err = Album::open(&temp_paths(dir.path())).unwrap_err();
        assert!(matches!(err, AlbumError::Io(_)));
    }
}
