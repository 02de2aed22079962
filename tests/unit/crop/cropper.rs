use super::*;
use crate::foundation::core::Rgba8;

fn square_on_transparent(size: u32, x0: u32, y0: u32, side: u32) -> Raster {
    let mut r = Raster::transparent(size, size).unwrap();
    for y in y0..y0 + side {
        for x in x0..x0 + side {
            r.put_pixel(x, y, [20, 40, 200, 255]);
        }
    }
    r
}

fn padded(padding: u32) -> CropOpts {
    CropOpts {
        padding,
        ..CropOpts::default()
    }
}

#[test]
fn padding_grows_region_around_content() {
    let r = square_on_transparent(200, 50, 50, 50);
    let CropOutcome::Cropped {
        raster,
        bbox,
        region,
    } = crop_to_content(&r, &padded(10)).unwrap()
    else {
        panic!("expected content");
    };
    assert_eq!((bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y), (50, 50, 99, 99));
    assert_eq!(
        region,
        PixelRect {
            x0: 40,
            y0: 40,
            x1: 110,
            y1: 110
        }
    );
    assert_eq!((raster.width(), raster.height()), (70, 70));
    assert_eq!(raster.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(raster.pixel(10, 10), Some([20, 40, 200, 255]));
}

#[test]
fn zero_padding_is_idempotent() {
    let r = square_on_transparent(64, 5, 9, 20);
    let once = crop_to_content(&r, &padded(0)).unwrap().into_raster().unwrap();
    assert_eq!((once.width(), once.height()), (20, 20));
    let twice = crop_to_content(&once, &padded(0))
        .unwrap()
        .into_raster()
        .unwrap();
    assert_eq!(once, twice);
}

#[test]
fn padding_is_clamped_at_edges() {
    let r = square_on_transparent(32, 0, 28, 4);
    let out = crop_to_content(&r, &padded(8)).unwrap();
    let CropOutcome::Cropped { region, raster, .. } = out else {
        panic!("expected content");
    };
    assert_eq!(
        region,
        PixelRect {
            x0: 0,
            y0: 20,
            x1: 12,
            y1: 32
        }
    );
    assert_eq!((raster.width(), raster.height()), (12, 12));
}

#[test]
fn fully_transparent_input_is_empty() {
    let r = Raster::transparent(16, 16).unwrap();
    let out = crop_to_content(&r, &padded(4)).unwrap();
    assert_eq!(out, CropOutcome::Empty);
    assert!(out.raster().is_none());
}

#[test]
fn opaque_input_is_kept_whole() {
    let r = Raster::new_filled(7, 5, Rgba8::WHITE).unwrap();
    let out = crop_to_content(&r, &padded(3)).unwrap().into_raster().unwrap();
    assert_eq!(out, r);
}

#[test]
fn opts_deserialize_with_defaults() {
    let opts: CropOpts = serde_json::from_str(r#"{ "padding": 12 }"#).unwrap();
    assert_eq!(opts.padding, 12);
    assert_eq!(opts.alpha_threshold, 30);
    assert!(serde_json::from_str::<CropOpts>(r#"{ "pad": 1 }"#).is_err());
}
