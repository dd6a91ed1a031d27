use std::fs::File;
use std::path::Path;

use byteorder::{BigEndian, ByteOrder};
use memmap2::Mmap;
use ndarray::Array2;

use crate::consts::{FITS_BLOCK_SIZE, FITS_CARD_SIZE};
use crate::error::SourceError;
use crate::image_data::{Image, ImageMetadata};

/// A parsed header card value.
#[derive(Clone, Debug, PartialEq)]
pub enum HeaderValue {
    Logical(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl HeaderValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Real(r) if r.fract() == 0.0 => Some(*r as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Keyword/value cards of one HDU, in file order. COMMENT/HISTORY and
/// other value-less cards are skipped.
#[derive(Clone, Debug, Default)]
pub struct FitsHeader {
    cards: Vec<(String, HeaderValue)>,
}

impl FitsHeader {
    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.cards
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(HeaderValue::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(HeaderValue::as_f64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(HeaderValue::as_str)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Kind of header data unit.
#[derive(Clone, Debug, PartialEq)]
pub enum HduKind {
    Primary,
    Image,
    Table(String),
}

impl std::fmt::Display for HduKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "PRIMARY"),
            Self::Image => write!(f, "IMAGE"),
            Self::Table(name) => write!(f, "{name}"),
        }
    }
}

/// Location and shape of one HDU inside the file.
#[derive(Clone, Debug)]
pub struct Hdu {
    pub index: usize,
    pub kind: HduKind,
    pub bitpix: i64,
    /// NAXIS1, NAXIS2, ... (fastest-varying axis first).
    pub shape: Vec<usize>,
    pub header: FitsHeader,
    data_offset: usize,
    data_len: usize,
}

impl Hdu {
    pub fn naxis(&self) -> usize {
        self.shape.len()
    }

    /// True when the HDU carries at least one 2D plane of pixels.
    pub fn is_image(&self) -> bool {
        !matches!(self.kind, HduKind::Table(_))
            && self.shape.len() >= 2
            && self.shape.iter().all(|&n| n > 0)
    }
}

/// Index every HDU of the FITS file at `path` without decoding any data.
pub fn list_hdus(path: &Path) -> Result<Vec<Hdu>, SourceError> {
    Ok(FitsReader::open(path)?.hdus)
}

/// Memory-mapped FITS file reader.
pub struct FitsReader {
    mmap: Mmap,
    hdus: Vec<Hdu>,
}

impl FitsReader {
    /// Open a FITS file and index all of its HDUs.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < FITS_BLOCK_SIZE {
            return Err(SourceError::InvalidFits(
                "File too small for a FITS header block".into(),
            ));
        }
        if !mmap.starts_with(b"SIMPLE  =") {
            return Err(SourceError::InvalidFits(
                "Primary header does not start with SIMPLE".into(),
            ));
        }

        let hdus = index_hdus(&mmap)?;
        Ok(Self { mmap, hdus })
    }

    pub fn hdus(&self) -> &[Hdu] {
        &self.hdus
    }

    pub fn hdu_count(&self) -> usize {
        self.hdus.len()
    }

    /// Index of the first HDU holding 2D (or higher) image data.
    pub fn first_image(&self) -> Option<usize> {
        self.hdus.iter().position(Hdu::is_image)
    }

    /// Read the first 2D plane of HDU `extension`. Higher axes of a cube are
    /// fixed at index 0.
    pub fn read_plane(&self, extension: usize) -> Result<Image, SourceError> {
        let hdu = self
            .hdus
            .get(extension)
            .ok_or(SourceError::ExtensionOutOfRange {
                index: extension,
                total: self.hdus.len(),
            })?;

        if !hdu.is_image() {
            return Err(SourceError::NotAnImage {
                index: extension,
                naxis: hdu.naxis(),
            });
        }

        let width = hdu.shape[0];
        let height = hdu.shape[1];
        let bytes_per_sample = bytes_per_sample(hdu.bitpix)?;
        let plane_bytes = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(bytes_per_sample))
            .filter(|&n| n <= hdu.data_len);
        let Some(plane_bytes) = plane_bytes else {
            return Err(SourceError::InvalidFits(format!(
                "HDU {extension} data is shorter than one {width}x{height} plane"
            )));
        };
        let raw = &self.mmap[hdu.data_offset..hdu.data_offset + plane_bytes];

        let scaling = Scaling {
            bscale: hdu.header.get_f64("BSCALE").unwrap_or(1.0),
            bzero: hdu.header.get_f64("BZERO").unwrap_or(0.0),
            blank: hdu.header.get_i64("BLANK"),
        };
        let data = decode_plane(raw, height, width, hdu.bitpix, &scaling)?;

        let metadata = ImageMetadata {
            filename: None,
            extension,
            bitpix: Some(hdu.bitpix),
            object: non_empty(hdu.header.get_str("OBJECT")),
            telescope: non_empty(hdu.header.get_str("TELESCOP")),
            instrument: non_empty(hdu.header.get_str("INSTRUME")),
            unit: non_empty(hdu.header.get_str("BUNIT")),
        };

        Ok(Image::new(data)?.with_metadata(metadata))
    }
}

fn index_hdus(buf: &[u8]) -> Result<Vec<Hdu>, SourceError> {
    let mut hdus = Vec::new();
    let mut offset = 0;

    while offset + FITS_BLOCK_SIZE <= buf.len() {
        let index = hdus.len();
        // Trailing blocks that do not open an extension are ignored.
        if index > 0 && !buf[offset..].starts_with(b"XTENSION") {
            break;
        }
        let (header, header_len) = parse_header(&buf[offset..])?;

        let kind = if index == 0 {
            HduKind::Primary
        } else {
            match header.get_str("XTENSION").map(str::trim) {
                Some("IMAGE") => HduKind::Image,
                Some(other) => HduKind::Table(other.to_string()),
                None => {
                    return Err(SourceError::InvalidFits(format!(
                        "HDU {index} is missing XTENSION"
                    )))
                }
            }
        };

        let bitpix = header
            .get_i64("BITPIX")
            .ok_or_else(|| SourceError::InvalidFits(format!("HDU {index} is missing BITPIX")))?;
        let naxis = header
            .get_i64("NAXIS")
            .ok_or_else(|| SourceError::InvalidFits(format!("HDU {index} is missing NAXIS")))?;
        if !(0..=999).contains(&naxis) {
            return Err(SourceError::InvalidFits(format!(
                "HDU {index} has invalid NAXIS = {naxis}"
            )));
        }

        let mut shape = Vec::with_capacity(naxis as usize);
        for axis in 1..=naxis {
            let n = header.get_i64(&format!("NAXIS{axis}")).ok_or_else(|| {
                SourceError::InvalidFits(format!("HDU {index} is missing NAXIS{axis}"))
            })?;
            if n < 0 {
                return Err(SourceError::InvalidFits(format!(
                    "HDU {index} has negative NAXIS{axis}"
                )));
            }
            shape.push(n as usize);
        }

        let data_len = data_byte_len(&header, bitpix, &shape)?;
        let data_offset = offset + header_len;
        let data_end = data_offset
            .checked_add(data_len)
            .ok_or_else(|| SourceError::InvalidFits(format!("HDU {index} data size overflows")))?;
        if data_end > buf.len() {
            return Err(SourceError::InvalidFits(format!(
                "HDU {index} truncated: expected {data_len} data bytes at offset {data_offset}, file has {}",
                buf.len()
            )));
        }

        hdus.push(Hdu {
            index,
            kind,
            bitpix,
            shape,
            header,
            data_offset,
            data_len,
        });

        offset = padded(data_len)
            .and_then(|n| data_offset.checked_add(n))
            .ok_or_else(|| SourceError::InvalidFits(format!("HDU {index} data size overflows")))?;
    }

    Ok(hdus)
}

/// Parse header cards up to END. Returns the header and its padded length.
fn parse_header(buf: &[u8]) -> Result<(FitsHeader, usize), SourceError> {
    let mut cards = Vec::new();

    for (i, card) in buf.chunks_exact(FITS_CARD_SIZE).enumerate() {
        let keyword = String::from_utf8_lossy(&card[..8]).trim().to_string();
        if keyword == "END" {
            let header_len = padded((i + 1) * FITS_CARD_SIZE)
                .ok_or_else(|| SourceError::InvalidFits("Header size overflows".into()))?;
            return Ok((FitsHeader { cards }, header_len));
        }
        if &card[8..10] != b"= " {
            continue;
        }
        let field = String::from_utf8_lossy(&card[10..]);
        if let Some(value) = parse_value(&field) {
            cards.push((keyword, value));
        }
    }

    Err(SourceError::InvalidFits("Header has no END card".into()))
}

fn parse_value(field: &str) -> Option<HeaderValue> {
    let field = field.trim_start();

    if let Some(rest) = field.strip_prefix('\'') {
        // Quoted string; '' is an escaped quote.
        let mut text = String::new();
        let mut chars = rest.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    text.push('\'');
                    chars.next();
                } else {
                    break;
                }
            } else {
                text.push(c);
            }
        }
        return Some(HeaderValue::Text(text.trim_end().to_string()));
    }

    let value = field.split('/').next().unwrap_or("").trim();
    match value {
        "" => None,
        "T" => Some(HeaderValue::Logical(true)),
        "F" => Some(HeaderValue::Logical(false)),
        _ => {
            if let Ok(i) = value.parse::<i64>() {
                Some(HeaderValue::Integer(i))
            } else {
                value
                    .replace(['D', 'd'], "E")
                    .parse::<f64>()
                    .ok()
                    .map(HeaderValue::Real)
            }
        }
    }
}

fn data_byte_len(header: &FitsHeader, bitpix: i64, shape: &[usize]) -> Result<usize, SourceError> {
    if shape.is_empty() {
        return Ok(0);
    }
    let bytes = bytes_per_sample(bitpix)?;
    let gcount = header.get_i64("GCOUNT").unwrap_or(1).max(0) as usize;
    let pcount = header.get_i64("PCOUNT").unwrap_or(0).max(0) as usize;

    let pixels = if shape.contains(&0) {
        Some(0)
    } else {
        shape.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))
    };
    let elements = pixels
        .and_then(|n| n.checked_add(pcount))
        .and_then(|n| n.checked_mul(gcount))
        .and_then(|n| n.checked_mul(bytes))
        .ok_or_else(|| SourceError::InvalidFits("Data size overflows".into()))?;
    Ok(elements)
}

fn bytes_per_sample(bitpix: i64) -> Result<usize, SourceError> {
    match bitpix {
        8 => Ok(1),
        16 => Ok(2),
        32 | -32 => Ok(4),
        64 | -64 => Ok(8),
        other => Err(SourceError::UnsupportedBitpix(other)),
    }
}

/// `len` rounded up to whole blocks, or `None` on overflow.
fn padded(len: usize) -> Option<usize> {
    len.div_ceil(FITS_BLOCK_SIZE).checked_mul(FITS_BLOCK_SIZE)
}

struct Scaling {
    bscale: f64,
    bzero: f64,
    blank: Option<i64>,
}

impl Scaling {
    #[inline]
    fn integer(&self, raw: i64) -> f32 {
        if self.blank == Some(raw) {
            f32::NAN
        } else {
            (self.bzero + self.bscale * raw as f64) as f32
        }
    }

    #[inline]
    fn real(&self, raw: f64) -> f32 {
        (self.bzero + self.bscale * raw) as f32
    }
}

fn decode_plane(
    raw: &[u8],
    height: usize,
    width: usize,
    bitpix: i64,
    scaling: &Scaling,
) -> Result<Array2<f32>, SourceError> {
    let bytes = bytes_per_sample(bitpix)?;
    let mut data = Array2::<f32>::zeros((height, width));

    for row in 0..height {
        for col in 0..width {
            let idx = (row * width + col) * bytes;
            let sample = &raw[idx..idx + bytes];
            data[[row, col]] = match bitpix {
                8 => scaling.integer(sample[0] as i64),
                16 => scaling.integer(BigEndian::read_i16(sample) as i64),
                32 => scaling.integer(BigEndian::read_i32(sample) as i64),
                64 => scaling.integer(BigEndian::read_i64(sample)),
                -32 => scaling.real(BigEndian::read_f32(sample) as f64),
                -64 => scaling.real(BigEndian::read_f64(sample)),
                other => return Err(SourceError::UnsupportedBitpix(other)),
            };
        }
    }

    Ok(data)
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_string_with_escape() {
        let v = parse_value("'O''Brien '           / observer").unwrap();
        assert_eq!(v, HeaderValue::Text("O'Brien".into()));
    }

    #[test]
    fn parses_fortran_exponent() {
        let v = parse_value("           1.5D2 / scaled").unwrap();
        assert_eq!(v, HeaderValue::Real(150.0));
    }

    #[test]
    fn parses_logical_and_integer() {
        assert_eq!(parse_value("                   T").unwrap(), HeaderValue::Logical(true));
        assert_eq!(parse_value("                 -32 / float").unwrap(), HeaderValue::Integer(-32));
    }

    #[test]
    fn padding_rounds_to_block() {
        assert_eq!(padded(0), Some(0));
        assert_eq!(padded(1), Some(FITS_BLOCK_SIZE));
        assert_eq!(padded(FITS_BLOCK_SIZE), Some(FITS_BLOCK_SIZE));
        assert_eq!(padded(FITS_BLOCK_SIZE + 1), Some(2 * FITS_BLOCK_SIZE));
        assert_eq!(padded(usize::MAX), None);
    }
}
