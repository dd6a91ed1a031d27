mod common;

use common::*;
use image::GenericImageView;

use fitsview_core::config::ViewConfig;
use fitsview_core::error::SourceError;
use fitsview_core::io::image_io::{load_image, raster_to_rgba, save_png};
use fitsview_core::io::{is_fits, open_image};
use fitsview_core::palette::{Palette, SENTINEL_RGBA};
use fitsview_core::render::render;

#[test]
fn test_is_fits_by_extension() {
    assert!(is_fits(std::path::Path::new("a.fits")));
    assert!(is_fits(std::path::Path::new("b.FIT")));
    assert!(is_fits(std::path::Path::new("c.fts")));
    assert!(!is_fits(std::path::Path::new("d.png")));
    assert!(!is_fits(std::path::Path::new("noext")));
}

#[test]
fn test_load_png_as_plane() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gray.png");
    let img = image::GrayImage::from_fn(3, 2, |x, y| image::Luma([(x * 100 + y * 10) as u8]));
    img.save(&path).unwrap();

    let plane = load_image(&path).unwrap();
    assert_eq!((plane.width(), plane.height()), (3, 2));
    assert_eq!(plane.sample(0, 0), Some(0.0));
    assert_eq!(plane.sample(2, 1), Some(210.0 * 257.0 / 65535.0));
}

#[test]
fn test_raster_formats_have_one_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("one.png");
    image::GrayImage::new(2, 2).save(&path).unwrap();

    assert!(open_image(&path, None).is_ok());
    assert!(open_image(&path, Some(0)).is_ok());
    let err = open_image(&path, Some(1)).unwrap_err();
    assert!(matches!(err, SourceError::ExtensionOutOfRange { index: 1, total: 1 }));
}

#[test]
fn test_save_png_keeps_size_and_sentinel() {
    let mut state = make_state_with(
        make_ramp_image(8, 8),
        &ViewConfig {
            palette: "heat".into(),
            ..ViewConfig::default()
        },
    );
    state.pan(6.0, 0.0);
    let raster = render(&state, 16, 12);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.png");
    save_png(&raster, Palette::Heat, &path).unwrap();

    let saved = image::open(&path).unwrap();
    assert_eq!(saved.dimensions(), (16, 12));
    let rgba = saved.to_rgba8();
    assert_eq!(rgba, raster_to_rgba(&raster, Palette::Heat));
    // Panned right: the right edge shows background.
    assert_eq!(rgba.get_pixel(15, 6).0, SENTINEL_RGBA);
}
