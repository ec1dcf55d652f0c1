//! Test corpus: hand-built BMP files from other writers, plus patterns,
//! sizes and malformed inputs.

use enough::Unstoppable;
use zenraster::bmp::{self, BmpFormat, Compression};
use zenraster::format::Bgr24;
use zenraster::*;

type Bgr = Pixel<Bgr24>;

fn checkerboard(w: usize, h: usize) -> Matrix<Bgr> {
    Matrix::from_fn(w, h, |row, col| {
        if (row + col) % 2 == 0 {
            Bgr::rgb(200, 220, 240)
        } else {
            Bgr::rgb(10, 40, 70)
        }
    })
}

fn noise_pattern(w: usize, h: usize) -> Matrix<Bgr> {
    let mut state: u32 = 0xDEAD_BEEF;
    Matrix::from_fn(w, h, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        Bgr::from_u64(u64::from(state))
    })
}

/// Headers for a file with a 40-byte info header.
fn bmp_file(
    width: i32,
    height: i32,
    bpp: u16,
    compression: u32,
    colors_used: u32,
    extra: &[u8],
    pixels: &[u8],
) -> Vec<u8> {
    let offset = 54 + extra.len();
    let mut bmp = vec![0u8; offset];
    bmp[0] = b'B';
    bmp[1] = b'M';
    bmp[2..6].copy_from_slice(&((offset + pixels.len()) as u32).to_le_bytes());
    bmp[10..14].copy_from_slice(&(offset as u32).to_le_bytes());
    bmp[14..18].copy_from_slice(&40u32.to_le_bytes());
    bmp[18..22].copy_from_slice(&width.to_le_bytes());
    bmp[22..26].copy_from_slice(&height.to_le_bytes());
    bmp[26..28].copy_from_slice(&1u16.to_le_bytes());
    bmp[28..30].copy_from_slice(&bpp.to_le_bytes());
    bmp[30..34].copy_from_slice(&compression.to_le_bytes());
    bmp[46..50].copy_from_slice(&colors_used.to_le_bytes());
    bmp[54..].copy_from_slice(extra);
    bmp.extend_from_slice(pixels);
    bmp
}

// ── Pattern roundtrips ───────────────────────────────────────────────

#[test]
fn checkerboard_24bit_roundtrip() {
    let image = checkerboard(8, 6);
    let encoded = bmp::encode(&image, BmpFormat::Bgr24, Unstoppable).unwrap();
    assert_eq!(encoded.len(), 54 + 24 * 6);
    let decoded = bmp::decode(&encoded, Unstoppable).unwrap();
    assert!(decoded.iter().eq(image.iter()));
}

#[test]
fn checkerboard_is_two_color_indexed() {
    let image = checkerboard(33, 5);
    let encoded = bmp::encode(&image, BmpFormat::Indexed, Unstoppable).unwrap();
    let info = bmp::probe(&encoded).unwrap();
    assert_eq!(info.bit_count, 1);
    assert_eq!(info.palette_len, 2);
    // 33 bits per row round up to 8 bytes.
    assert_eq!(encoded.len(), 54 + 8 + 8 * 5);
    let decoded = bmp::decode(&encoded, Unstoppable).unwrap();
    assert!(decoded.iter().eq(image.iter()));
}

#[test]
fn noise_roundtrip_all_widths() {
    for w in 1..=9 {
        let image = noise_pattern(w, 3);
        for format in [BmpFormat::Bgr24, BmpFormat::Bgra32] {
            let encoded = bmp::encode(&image, format, Unstoppable).unwrap();
            let decoded = bmp::decode(&encoded, Unstoppable).unwrap();
            assert!(decoded.iter().eq(image.iter()), "width {w}, {format:?}");
        }
    }
}

#[test]
fn large_stride_example() {
    // 1857 * 3 = 5571 bytes per row, padded to 5572.
    let mut image: Matrix<Bgr> = Matrix::with_padding(1857, 4, padding(1857 * 3, 4));
    image.map_indexed(|row, col, px| *px = Bgr::from_u64((row * 1857 + col) as u64));
    assert_eq!(image.row_padding(), 1);
    let encoded = bmp::encode(&image, BmpFormat::Bgr24, Unstoppable).unwrap();
    assert_eq!(encoded.len(), 54 + 5572 * 4);
    let decoded = bmp::decode(&encoded, Unstoppable).unwrap();
    assert_eq!(decoded.size(), (3 * 1857 + 1) * 4);
    assert_eq!(decoded.as_bytes(), image.as_bytes());
}

// ── Files from other writers ─────────────────────────────────────────

#[test]
fn rgb565_bitfields() {
    let mut masks = Vec::new();
    for m in [0xF800u32, 0x07E0, 0x001F] {
        masks.extend_from_slice(&m.to_le_bytes());
    }
    // 2x1: pure red, pure blue.
    let pixels = [0x00, 0xF8, 0x1F, 0x00];
    let data = bmp_file(2, 1, 16, 3, 0, &masks, &pixels);
    let info = bmp::probe(&data).unwrap();
    assert_eq!(info.compression, Compression::Bitfields);
    let image = bmp::decode(&data, Unstoppable).unwrap();
    assert_eq!(image.get(0, 0), Bgr::rgb(255, 0, 0));
    assert_eq!(image.get(0, 1), Bgr::rgb(0, 0, 255));
}

#[test]
fn xrgb_bitfields_32bit() {
    let mut masks = Vec::new();
    for m in [0x00FF_0000u32, 0x0000_FF00, 0x0000_00FF] {
        masks.extend_from_slice(&m.to_le_bytes());
    }
    let pixels = 0x00_11_22_33u32.to_le_bytes();
    let data = bmp_file(1, 1, 32, 3, 0, &masks, &pixels);
    let image = bmp::decode(&data, Unstoppable).unwrap();
    assert_eq!(image.get(0, 0), Bgr::rgb(0x11, 0x22, 0x33));
}

#[test]
fn top_down_indexed_8bit() {
    // Three-entry table, 2x2 top-down.
    let table = [0, 0, 255, 0, 0, 255, 0, 0, 255, 0, 0, 0];
    let pixels = [0, 1, 0, 0, 2, 2, 0, 0];
    let data = bmp_file(2, -2, 8, 0, 3, &table, &pixels);
    let info = bmp::probe(&data).unwrap();
    assert!(info.top_down);
    assert_eq!(info.height, 2);
    let image = bmp::decode(&data, Unstoppable).unwrap();
    assert_eq!(image.get(0, 0), Bgr::rgb(255, 0, 0));
    assert_eq!(image.get(0, 1), Bgr::rgb(0, 255, 0));
    assert_eq!(image.get(1, 0), Bgr::rgb(0, 0, 255));
}

#[test]
fn four_bit_with_default_table_size() {
    // colors_used = 0 means a full 16-entry table.
    let mut table = vec![0u8; 16 * 4];
    table[15 * 4..15 * 4 + 3].copy_from_slice(&[1, 2, 3]);
    let pixels = [0xF0, 0, 0, 0];
    let data = bmp_file(2, 1, 4, 0, 0, &table, &pixels);
    assert_eq!(bmp::probe(&data).unwrap().palette_len, 16);
    let image = bmp::decode(&data, Unstoppable).unwrap();
    assert_eq!(image.get(0, 0).bytes(), &[1, 2, 3]);
    assert_eq!(image.get(0, 1), Bgr::new());
}

// ── Malformed input ──────────────────────────────────────────────────

#[test]
fn malformed_inputs_fail_cleanly() {
    let cases: Vec<(&str, Vec<u8>)> = vec![
        ("empty", vec![]),
        ("short magic", b"BM\x00\x00".to_vec()),
        ("not bmp", b"P6\n1 1\n255\n\x00\x00\x00".to_vec()),
        ("no pixels", bmp_file(4, 4, 24, 0, 0, &[], &[])),
        ("rle4", bmp_file(2, 2, 4, 2, 0, &[0; 64], &[0; 8])),
        ("huge width", bmp_file(i32::MAX, 1, 24, 0, 0, &[], &[0; 16])),
        ("bitfields on 24-bit", bmp_file(1, 1, 24, 3, 0, &[0; 12], &[0; 4])),
        ("palette too long", bmp_file(1, 1, 1, 0, 3, &[0; 12], &[0; 4])),
        ("missing palette", bmp_file(1, 1, 8, 0, 0, &[], &[])),
    ];
    for (name, data) in cases {
        assert!(bmp::decode(&data, Unstoppable).is_err(), "{name} decoded");
    }
}

#[test]
fn header_errors_are_classified() {
    assert!(matches!(
        bmp::probe(b""),
        Err(RasterError::UnexpectedEof)
    ));
    assert!(matches!(
        bmp::probe(b"GIF89a........................................................"),
        Err(RasterError::UnrecognizedFormat)
    ));
    let rle = bmp_file(2, 2, 8, 1, 0, &[0; 1024], &[0; 8]);
    assert!(matches!(
        bmp::decode(&rle, Unstoppable),
        Err(RasterError::UnsupportedVariant(_))
    ));
}

#[test]
fn limits_reject_before_decoding() {
    let image = checkerboard(64, 64);
    let encoded = bmp::encode(&image, BmpFormat::Bgr24, Unstoppable).unwrap();

    let tight = Limits {
        max_width: Some(32),
        ..Limits::default()
    };
    assert!(matches!(
        DecodeRequest::new(&encoded).with_limits(&tight).decode(Unstoppable),
        Err(RasterError::LimitExceeded(_))
    ));

    let roomy = Limits {
        max_width: Some(64),
        max_height: Some(64),
        max_pixels: Some(64 * 64),
        max_memory_bytes: Some(64 * 64 * 3),
    };
    assert!(DecodeRequest::new(&encoded).with_limits(&roomy).decode(Unstoppable).is_ok());
}

#[test]
fn cancelled_decode_reports_stop_reason() {
    struct AlwaysStop;
    impl Stop for AlwaysStop {
        fn check(&self) -> Result<(), enough::StopReason> {
            Err(enough::StopReason::Cancelled)
        }
    }

    let encoded = bmp::encode(&checkerboard(4, 4), BmpFormat::Bgr24, Unstoppable).unwrap();
    assert!(matches!(
        bmp::decode(&encoded, AlwaysStop),
        Err(RasterError::Cancelled(_))
    ));
    assert!(matches!(
        bmp::encode(&checkerboard(4, 4), BmpFormat::Bgr24, AlwaysStop),
        Err(RasterError::Cancelled(_))
    ));
}
