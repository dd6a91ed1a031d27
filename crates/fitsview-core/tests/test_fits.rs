mod common;

use common::*;

use fitsview_core::error::SourceError;
use fitsview_core::io::fits::{FitsReader, HduKind};
use fitsview_core::io::open_image;

#[test]
fn test_read_float_plane() {
    let values: Vec<f32> = (0..12).map(|v| v as f32 * 0.5).collect();
    let file = write_temp_fits(&fits_f32(4, 3, &values));

    let image = open_image(file.path(), Some(0)).unwrap();
    assert_eq!(image.width(), 4);
    assert_eq!(image.height(), 3);
    assert_eq!(image.sample(0, 0), Some(0.0));
    assert_eq!(image.sample(3, 0), Some(1.5));
    assert_eq!(image.sample(0, 1), Some(2.0));
    assert_eq!(image.sample(3, 2), Some(5.5));
    assert_eq!(image.metadata.bitpix, Some(-32));
    assert_eq!(image.metadata.filename.as_deref(), Some(file.path()));
}

#[test]
fn test_nan_samples_survive() {
    let values = [1.0, f32::NAN, f32::INFINITY, 4.0];
    let file = write_temp_fits(&fits_f32(2, 2, &values));

    let image = open_image(file.path(), Some(0)).unwrap();
    assert!(image.sample(1, 0).unwrap().is_nan());
    assert!(image.sample(0, 1).unwrap().is_infinite());
    assert_eq!(image.finite_count(), 2);
}

#[test]
fn test_int16_scaling_and_blank() {
    let raw = [-32768i16, 0, 100, -1];
    let hdu = TestHdu::image(true, 16, &[2, 2], i16_bytes(&raw))
        .with_card("BZERO", "32768")
        .with_card("BSCALE", "2.0")
        .with_card("BLANK", "-1");
    let file = write_temp_fits(&build_fits(&[hdu]));

    let image = open_image(file.path(), Some(0)).unwrap();
    // physical = BZERO + BSCALE * raw
    assert_eq!(image.sample(0, 0), Some(32768.0 - 65536.0));
    assert_eq!(image.sample(1, 0), Some(32768.0));
    assert_eq!(image.sample(0, 1), Some(32968.0));
    assert!(image.sample(1, 1).unwrap().is_nan(), "BLANK must become NaN");
}

#[test]
fn test_select_extension() {
    let primary = TestHdu::empty_primary();
    let ext1 = TestHdu::image(false, -32, &[2, 2], f32_bytes(&[1.0, 1.0, 1.0, 1.0]));
    let ext2 = TestHdu::image(false, -32, &[3, 1], f32_bytes(&[7.0, 8.0, 9.0]))
        .with_card("OBJECT", "'M31'");
    let file = write_temp_fits(&build_fits(&[primary, ext1, ext2]));

    let reader = FitsReader::open(file.path()).unwrap();
    assert_eq!(reader.hdu_count(), 3);
    assert_eq!(reader.hdus()[0].kind, HduKind::Primary);
    assert_eq!(reader.hdus()[2].kind, HduKind::Image);
    assert!(!reader.hdus()[0].is_image());

    let image = open_image(file.path(), Some(2)).unwrap();
    assert_eq!((image.width(), image.height()), (3, 1));
    assert_eq!(image.sample(2, 0), Some(9.0));
    assert_eq!(image.metadata.extension, 2);
    assert_eq!(image.metadata.object.as_deref(), Some("M31"));
}

#[test]
fn test_extension_out_of_range() {
    let file = write_temp_fits(&fits_f32(2, 2, &[0.0; 4]));
    let err = open_image(file.path(), Some(5)).unwrap_err();
    assert!(
        matches!(err, SourceError::ExtensionOutOfRange { index: 5, total: 1 }),
        "got {err:?}"
    );
}

#[test]
fn test_primary_without_data_is_not_an_image() {
    let file = write_temp_fits(&build_fits(&[TestHdu::empty_primary()]));
    let err = open_image(file.path(), Some(0)).unwrap_err();
    assert!(matches!(err, SourceError::NotAnImage { index: 0, naxis: 0 }), "got {err:?}");
}

#[test]
fn test_unset_extension_skips_empty_primary() {
    let primary = TestHdu::empty_primary();
    let ext = TestHdu::image(false, -32, &[3, 2], f32_bytes(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
    let file = write_temp_fits(&build_fits(&[primary, ext]));

    let image = open_image(file.path(), None).unwrap();
    assert_eq!((image.width(), image.height()), (3, 2));
    assert_eq!(image.metadata.extension, 1);
    assert_eq!(image.sample(2, 1), Some(6.0));
}

#[test]
fn test_unset_extension_prefers_primary_image() {
    let primary = TestHdu::image(true, -32, &[2, 1], f32_bytes(&[5.0, 6.0]));
    let ext = TestHdu::image(false, -32, &[3, 1], f32_bytes(&[7.0, 8.0, 9.0]));
    let file = write_temp_fits(&build_fits(&[primary, ext]));

    let image = open_image(file.path(), None).unwrap();
    assert_eq!(image.metadata.extension, 0);
    assert_eq!(image.width(), 2);
}

#[test]
fn test_file_without_image_data() {
    let file = write_temp_fits(&build_fits(&[TestHdu::empty_primary()]));
    let err = open_image(file.path(), None).unwrap_err();
    assert!(matches!(err, SourceError::NoImage { total: 1 }), "got {err:?}");
}

#[test]
fn test_cube_takes_first_plane() {
    let mut values = vec![1.0f32; 4];
    values.extend_from_slice(&[2.0; 4]);
    let hdu = TestHdu::image(true, -32, &[2, 2, 2], f32_bytes(&values));
    let file = write_temp_fits(&build_fits(&[hdu]));

    let image = open_image(file.path(), Some(0)).unwrap();
    assert_eq!((image.width(), image.height()), (2, 2));
    assert!(image.data().iter().all(|&v| v == 1.0));
}

#[test]
fn test_oversized_axis_rejected() {
    let hdu = TestHdu::image(true, 8, &[i64::MAX as usize, 2], Vec::new());
    let file = write_temp_fits(&build_fits(&[hdu]));
    let err = FitsReader::open(file.path()).err().unwrap();
    assert!(matches!(err, SourceError::InvalidFits(_)), "got {err:?}");
}

#[test]
fn test_truncated_file_rejected() {
    let mut bytes = fits_f32(64, 64, &vec![0.0; 64 * 64]);
    bytes.truncate(2880 * 2);
    let file = write_temp_fits(&bytes);
    let err = FitsReader::open(file.path()).err().unwrap();
    assert!(matches!(err, SourceError::InvalidFits(_)), "got {err:?}");
}

#[test]
fn test_not_fits_rejected() {
    let file = write_temp_fits(&vec![b'x'; 4000]);
    let err = open_image(file.path(), Some(0)).unwrap_err();
    assert!(matches!(err, SourceError::InvalidFits(_)), "got {err:?}");
}

#[test]
fn test_unsupported_bitpix() {
    let hdu = TestHdu::image(true, 12, &[2, 2], vec![0; 8]);
    let file = write_temp_fits(&build_fits(&[hdu]));
    let err = FitsReader::open(file.path()).err().unwrap();
    assert!(matches!(err, SourceError::UnsupportedBitpix(12)), "got {err:?}");
}

#[test]
fn test_missing_file() {
    let err = open_image(std::path::Path::new("/nonexistent/image.fits"), Some(0)).unwrap_err();
    assert!(matches!(err, SourceError::Io(_)), "got {err:?}");
}

#[test]
fn test_list_hdus_summarises_file() {
    let primary = TestHdu::empty_primary();
    let ext = TestHdu::image(false, 16, &[3, 2], i16_bytes(&[0; 6]));
    let file = write_temp_fits(&build_fits(&[primary, ext]));

    let hdus = fitsview_core::io::fits::list_hdus(file.path()).unwrap();
    assert_eq!(hdus.len(), 2);
    assert_eq!(hdus[0].naxis(), 0);
    assert_eq!(hdus[1].kind.to_string(), "IMAGE");
    assert_eq!(hdus[1].bitpix, 16);
    assert_eq!(hdus[1].shape, vec![3, 2]);
    assert!(hdus[1].is_image());
}
