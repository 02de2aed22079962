use super::*;

#[test]
fn png_encode_decode_keeps_straight_alpha() {
    let mut r = Raster::transparent(2, 2).unwrap();
    r.put_pixel(0, 1, [100, 50, 200, 128]);
    let bytes = encode_png(&r).unwrap();
    let back = decode_raster(&bytes).unwrap();
    assert_eq!(back, r);
}

#[test]
fn decode_rejects_garbage() {
    assert!(decode_raster(b"not an image").is_err());
}

#[test]
fn write_png_creates_parent_dirs() {
    let dir = std::path::PathBuf::from("target")
        .join("unit_raster_io")
        .join("nested");
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("one.png");

    let r = Raster::new_filled(3, 1, crate::foundation::core::Rgba8::WHITE).unwrap();
    write_png(&r, &path).unwrap();
    assert_eq!(read_raster(&path).unwrap(), r);
}

#[test]
fn read_missing_file_is_io_error() {
    let err = read_raster(std::path::Path::new("target/definitely/missing.png")).unwrap_err();
    assert!(matches!(err, ViewgridError::Io(_)));
}
