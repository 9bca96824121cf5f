use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use proptest::prelude::*;
use qr_matrix::generator::{
    GenerationRequest, GeneratorConfig, GeneratorError, GeneratorHandler, ImageSource,
};
use qr_matrix::pixel_art::{GRID_SIZE, Symbol, parse};
use qr_matrix::qr::{QrBitmap, QrPayloadPipeline};

fn decode_bytes(bitmap: &QrBitmap) -> Vec<u8> {
    let image = bitmap.as_image();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        image.width() as usize,
        image.height() as usize,
        |x, y| image.get_pixel(x as u32, y as u32).0[0],
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "exactly one QR symbol expected");

    let mut bytes = Vec::new();
    grids[0].decode_to(&mut bytes).expect("QR should decode");
    bytes
}

fn png_bytes(image: RgbaImage) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image)
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("failed to encode test image");
    cursor.into_inner()
}

fn handler() -> GeneratorHandler {
    GeneratorHandler::new(GeneratorConfig::default()).expect("handler init failed")
}

#[test]
fn hello_decodes_back_to_hello() {
    let bitmap = QrPayloadPipeline::default()
        .generate("HELLO")
        .expect("qr generation")
        .expect("non-empty payload");

    assert_eq!(decode_bytes(&bitmap), b"HELLO");
}

#[test]
fn unicode_text_round_trips() {
    let text = "二维码 ✓ héllo";
    let outcome = handler()
        .generate(GenerationRequest::Text(text.to_string()))
        .expect("generation should succeed")
        .expect("outcome expected");

    assert_eq!(decode_bytes(&outcome.bitmap), text.as_bytes());
}

#[test]
fn pixel_art_payload_round_trips_through_qr() {
    let mut image = RgbaImage::from_pixel(30, 30, Rgba([255, 255, 255, 255]));
    for y in 0..15 {
        for x in 0..30 {
            image.put_pixel(x, y, Rgba([0, 0, 255, 255]));
        }
    }

    let outcome = handler()
        .generate(GenerationRequest::PixelArt(ImageSource::Bytes(png_bytes(image))))
        .expect("generation should succeed")
        .expect("outcome expected");
    let art = outcome.pixel_art.as_ref().expect("pixel art expected");

    let decoded = decode_bytes(&outcome.bitmap);
    assert_eq!(decoded, art.payload.as_bytes());

    let text = String::from_utf8(decoded).expect("payload is utf-8");
    assert_eq!(parse(&text).expect("payload should parse"), art.symbols);
    assert!(art.symbols[0].iter().all(|s| *s == Symbol::Blue));
    assert!(art.symbols[GRID_SIZE - 1].iter().all(|s| *s == Symbol::White));
}

#[test]
fn same_payload_produces_identical_bitmaps() {
    let first = handler()
        .generate(GenerationRequest::Text("idempotent".to_string()))
        .expect("generation should succeed")
        .expect("outcome expected");
    let second = handler()
        .generate(GenerationRequest::Text("idempotent".to_string()))
        .expect("generation should succeed")
        .expect("outcome expected");

    assert_eq!(first.bitmap.as_bytes(), second.bitmap.as_bytes());
}

#[test]
fn transparent_image_produces_all_white_payload() {
    let image = RgbaImage::from_pixel(40, 20, Rgba([12, 34, 56, 0]));

    let outcome = handler()
        .generate(GenerationRequest::PixelArt(ImageSource::Bytes(png_bytes(image))))
        .expect("generation should succeed")
        .expect("outcome expected");
    let art = outcome.pixel_art.as_ref().expect("pixel art expected");

    let white_row = format!("{}\n", Symbol::White.glyph().repeat(GRID_SIZE));
    assert_eq!(art.payload, white_row.repeat(GRID_SIZE));
    assert!(!outcome.is_degraded());
}

#[test]
fn image_from_file_path_is_accepted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("green.png");
    std::fs::write(&path, png_bytes(RgbaImage::from_pixel(5, 5, Rgba([0, 200, 0, 255]))))
        .expect("write png");

    let outcome = handler()
        .generate(GenerationRequest::PixelArt(ImageSource::FilePath(path)))
        .expect("generation should succeed")
        .expect("outcome expected");

    let art = outcome.pixel_art.expect("pixel art expected");
    assert!(art.symbols.iter().flatten().all(|s| *s == Symbol::Green));
}

/// 40-M 字节模式容量上限。
const BYTE_CAPACITY_LEVEL_M: usize = 2331;

#[test]
fn capacity_limit_payload_still_generates() {
    let text = "a".repeat(BYTE_CAPACITY_LEVEL_M);
    let bitmap = QrPayloadPipeline::default()
        .generate(&text)
        .expect("payload at capacity should encode")
        .expect("non-empty payload");

    assert_eq!(decode_bytes(&bitmap), text.as_bytes());
}

#[test]
fn one_byte_over_capacity_fails() {
    let result = QrPayloadPipeline::default().generate(&"a".repeat(BYTE_CAPACITY_LEVEL_M + 1));

    assert!(matches!(result, Err(GeneratorError::QrGeneration(_))));
}

#[test]
fn over_capacity_text_fails_without_image() {
    let result = handler().generate(GenerationRequest::Text("x".repeat(3000)));

    let err = result.expect_err("payload above QR capacity must fail");
    assert!(matches!(err, GeneratorError::QrGeneration(_)));
    assert_eq!(err.stage(), "qr");
}

#[test]
fn non_image_bytes_are_rejected_at_load() {
    let result = handler().generate(GenerationRequest::PixelArt(ImageSource::Bytes(
        b"definitely not an image".to_vec(),
    )));

    assert!(matches!(result, Err(GeneratorError::InvalidFormat(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn arbitrary_text_decodes_to_same_bytes(text in "\\PC{1,64}") {
        let bitmap = QrPayloadPipeline::default()
            .generate(&text)
            .expect("qr generation")
            .expect("non-empty payload");

        prop_assert_eq!(decode_bytes(&bitmap), text.as_bytes().to_vec());
    }
}
