//! Image names and ids from a COLMAP database.

use std::io::Write;
use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::colmap::write_file;
use crate::error::ConvertError;

fn db_error(path: &Path, source: rusqlite::Error) -> ConvertError {
    ConvertError::Database {
        path: path.to_path_buf(),
        source,
    }
}

/// `(name, image_id)` of every row of the `images` table, by ascending id.
///
/// The database is opened read-only, a missing file is an error rather than a
/// new empty database.
pub fn read_image_ids(
    database_path: impl AsRef<Path>,
) -> Result<Vec<(String, u32)>, ConvertError> {
    let path = database_path.as_ref();
    let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|e| db_error(path, e))?;
    let mut statement = connection
        .prepare("SELECT image_id, name FROM images ORDER BY image_id")
        .map_err(|e| db_error(path, e))?;
    let rows = statement
        .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, u32>(0)?)))
        .map_err(|e| db_error(path, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| db_error(path, e))?;
    log::info!("read {} images from {}", rows.len(), path.display());
    Ok(rows)
}

/// Writes the `name id` list consumed by [`crate::id_map::ImageIdMap`].
///
/// Returns the number of images written.
pub fn export_image_ids(
    database_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<usize, ConvertError> {
    let rows = read_image_ids(database_path)?;
    write_file(output_path.as_ref(), |w| {
        for (name, image_id) in &rows {
            writeln!(w, "{} {}", name, image_id)?;
        }
        Ok(())
    })?;
    Ok(rows.len())
}
