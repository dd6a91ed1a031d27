use std::path::PathBuf;

use ndarray::Array2;

use crate::error::SourceError;

/// A single 2D plane of real-valued samples.
///
/// Row 0 is the first row stored in the source file. Samples keep their
/// physical values (after BSCALE/BZERO) and may be NaN or infinite.
#[derive(Clone, Debug)]
pub struct Image {
    /// Pixel data, row-major, shape = (height, width)
    data: Array2<f32>,
    pub metadata: ImageMetadata,
}

impl Image {
    pub fn new(data: Array2<f32>) -> Result<Self, SourceError> {
        let (height, width) = data.dim();
        if width == 0 || height == 0 {
            return Err(SourceError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            metadata: ImageMetadata::default(),
        })
    }

    pub fn with_metadata(mut self, metadata: ImageMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    /// Sample at integer pixel `(x, y)`, or `None` outside the image.
    #[inline]
    pub fn sample(&self, x: i64, y: i64) -> Option<f32> {
        if x < 0 || y < 0 {
            return None;
        }
        self.data.get([y as usize, x as usize]).copied()
    }

    /// Number of finite samples in the whole plane.
    pub fn finite_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_finite()).count()
    }
}

/// Descriptive metadata carried from the source file.
#[derive(Clone, Debug, Default)]
pub struct ImageMetadata {
    pub filename: Option<PathBuf>,
    /// HDU index the plane was read from (0 for non-FITS sources).
    pub extension: usize,
    /// Original BITPIX for FITS sources.
    pub bitpix: Option<i64>,
    pub object: Option<String>,
    pub telescope: Option<String>,
    pub instrument: Option<String>,
    pub unit: Option<String>,
}
