#![no_main]
use libfuzzer_sys::fuzz_target;
use zenraster::bmp::{self, BmpFormat};

fuzz_target!(|data: &[u8]| {
    // Anything that decodes must survive a lossless re-encode unchanged
    let Ok(decoded) = bmp::decode(data, enough::Unstoppable) else {
        return;
    };

    for format in [BmpFormat::Bgr24, BmpFormat::Bgra32, BmpFormat::Indexed] {
        let reencoded = match bmp::encode(&decoded, format, enough::Unstoppable) {
            Ok(bytes) => bytes,
            // More than 256 colors
            Err(zenraster::RasterError::PaletteOverflow { .. }) => continue,
            Err(e) => panic!("re-encode as {format:?} failed: {e}"),
        };
        let Ok(decoded2) = bmp::decode(&reencoded, enough::Unstoppable) else {
            panic!("re-encoded {format:?} data failed to decode");
        };
        assert!(
            decoded.iter().eq(decoded2.iter()),
            "{format:?} roundtrip pixel mismatch"
        );
        assert_eq!(decoded.width(), decoded2.width());
        assert_eq!(decoded.height(), decoded2.height());
    }
});
