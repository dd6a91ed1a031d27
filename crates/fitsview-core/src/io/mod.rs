pub mod fits;
pub mod image_io;

use std::path::Path;

use tracing::{debug, info};

use crate::error::SourceError;
use crate::image_data::Image;

/// File extensions read through the FITS reader.
const FITS_EXTENSIONS: &[&str] = &["fits", "fit", "fts"];

/// True if `path` names a FITS file by extension.
pub fn is_fits(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| FITS_EXTENSIONS.iter().any(|f| e.eq_ignore_ascii_case(f)))
}

/// Load one 2D plane from `path`. FITS files read HDU `extension`, or the
/// first HDU holding image data when it is `None`. Other raster formats
/// only have extension 0.
pub fn open_image(path: &Path, extension: Option<usize>) -> Result<Image, SourceError> {
    let mut image = if is_fits(path) {
        let reader = fits::FitsReader::open(path)?;
        let index = match extension {
            Some(index) => index,
            None => reader.first_image().ok_or(SourceError::NoImage {
                total: reader.hdu_count(),
            })?,
        };
        debug!(index, requested = ?extension, "Selected HDU");
        reader.read_plane(index)?
    } else {
        match extension {
            None | Some(0) => image_io::load_image(path)?,
            Some(index) => return Err(SourceError::ExtensionOutOfRange { index, total: 1 }),
        }
    };

    image.metadata.filename = Some(path.to_path_buf());
    info!(
        path = %path.display(),
        extension = image.metadata.extension,
        width = image.width(),
        height = image.height(),
        "Image loaded"
    );
    Ok(image)
}
