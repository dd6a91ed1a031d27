#![allow(dead_code)]

use ndarray::Array2;

use fitsview_core::config::ViewConfig;
use fitsview_core::image_data::Image;
use fitsview_core::view::ViewState;

const BLOCK: usize = 2880;

/// Format one 80-byte header card.
pub fn card(keyword: &str, value: &str) -> Vec<u8> {
    let text = if value.is_empty() {
        format!("{keyword:<8}")
    } else {
        format!("{keyword:<8}= {value:>20}")
    };
    let mut bytes = text.into_bytes();
    bytes.resize(80, b' ');
    bytes
}

fn pad(buf: &mut Vec<u8>, fill: u8) {
    let len = buf.len().div_ceil(BLOCK) * BLOCK;
    buf.resize(len, fill);
}

/// One HDU worth of header cards plus big-endian data bytes.
pub struct TestHdu {
    pub cards: Vec<Vec<u8>>,
    pub data: Vec<u8>,
}

impl TestHdu {
    /// An image HDU. `primary` selects SIMPLE vs XTENSION.
    pub fn image(primary: bool, bitpix: i64, shape: &[usize], data: Vec<u8>) -> Self {
        let mut cards = Vec::new();
        if primary {
            cards.push(card("SIMPLE", "T"));
        } else {
            cards.push(card("XTENSION", "'IMAGE   '"));
        }
        cards.push(card("BITPIX", &bitpix.to_string()));
        cards.push(card("NAXIS", &shape.len().to_string()));
        for (i, n) in shape.iter().enumerate() {
            cards.push(card(&format!("NAXIS{}", i + 1), &n.to_string()));
        }
        if !primary {
            cards.push(card("PCOUNT", "0"));
            cards.push(card("GCOUNT", "1"));
        }
        Self { cards, data }
    }

    /// A primary HDU with no data.
    pub fn empty_primary() -> Self {
        Self::image(true, 8, &[], Vec::new())
    }

    pub fn with_card(mut self, keyword: &str, value: &str) -> Self {
        self.cards.push(card(keyword, value));
        self
    }
}

/// Serialize HDUs into a FITS byte stream.
pub fn build_fits(hdus: &[TestHdu]) -> Vec<u8> {
    let mut buf = Vec::new();
    for hdu in hdus {
        for c in &hdu.cards {
            buf.extend_from_slice(c);
        }
        buf.extend_from_slice(&card("END", ""));
        pad(&mut buf, b' ');
        buf.extend_from_slice(&hdu.data);
        pad(&mut buf, 0);
    }
    buf
}

pub fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

pub fn i16_bytes(values: &[i16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

/// Single-HDU float FITS file holding `values` (row-major, `width` x `height`).
pub fn fits_f32(width: usize, height: usize, values: &[f32]) -> Vec<u8> {
    build_fits(&[TestHdu::image(true, -32, &[width, height], f32_bytes(values))])
}

/// Write bytes to a temporary `.fits` file that lives as long as the handle.
pub fn write_temp_fits(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::Builder::new()
        .suffix(".fits")
        .tempfile()
        .expect("create temp file");
    f.write_all(data).expect("write FITS data");
    f.flush().expect("flush");
    f
}

pub fn make_image(h: usize, w: usize, fill: f32) -> Image {
    Image::new(Array2::from_elem((h, w), fill)).unwrap()
}

/// Values 0, 1, 2, ... in row-major order.
pub fn make_ramp_image(h: usize, w: usize) -> Image {
    Image::new(Array2::from_shape_fn((h, w), |(r, c)| (r * w + c) as f32)).unwrap()
}

pub fn make_state(image: Image) -> ViewState {
    ViewState::new(image, &ViewConfig::default()).unwrap()
}

pub fn make_state_with(image: Image, config: &ViewConfig) -> ViewState {
    ViewState::new(image, config).unwrap()
}
