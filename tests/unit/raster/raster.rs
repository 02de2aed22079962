use super::*;

#[test]
fn from_rgba8_validates_length() {
    assert!(Raster::from_rgba8(2, 2, vec![0u8; 16]).is_ok());
    assert!(Raster::from_rgba8(2, 2, vec![0u8; 15]).is_err());
}

#[test]
fn filled_raster_repeats_color() {
    let r = Raster::new_filled(3, 2, Rgba8::opaque(9, 8, 7)).unwrap();
    assert_eq!(r.data().len(), 24);
    assert!(r.data().chunks_exact(4).all(|px| px == [9, 8, 7, 255]));
}

#[test]
fn pixel_access_is_bounds_checked() {
    let mut r = Raster::transparent(4, 3).unwrap();
    r.put_pixel(3, 2, [1, 2, 3, 4]);
    r.put_pixel(4, 0, [9, 9, 9, 9]);
    assert_eq!(r.pixel(3, 2), Some([1, 2, 3, 4]));
    assert_eq!(r.pixel(4, 0), None);
    assert_eq!(r.rows().count(), 3);
}

#[test]
fn sub_raster_copies_the_requested_window() {
    let mut r = Raster::transparent(5, 5).unwrap();
    r.put_pixel(2, 3, [255, 0, 0, 255]);
    let sub = r
        .sub_raster(PixelRect {
            x0: 1,
            y0: 2,
            x1: 4,
            y1: 5,
        })
        .unwrap();
    assert_eq!((sub.width(), sub.height()), (3, 3));
    assert_eq!(sub.pixel(1, 1), Some([255, 0, 0, 255]));
    assert_eq!(sub.pixel(0, 0), Some([0, 0, 0, 0]));
}

#[test]
fn sub_raster_rejects_out_of_bounds() {
    let r = Raster::transparent(5, 5).unwrap();
    let rect = PixelRect {
        x0: 0,
        y0: 0,
        x1: 6,
        y1: 5,
    };
    assert!(r.sub_raster(rect).is_err());
}

#[test]
fn image_buffer_conversion_keeps_pixels() {
    let mut r = Raster::transparent(2, 1).unwrap();
    r.put_pixel(1, 0, [10, 20, 30, 40]);
    let img = r.clone().into_rgba_image().unwrap();
    assert_eq!(img.get_pixel(1, 0).0, [10, 20, 30, 40]);
    assert_eq!(Raster::from_rgba_image(img), r);
}
