#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Header probe and full decode must never panic
    let _ = zenraster::bmp::probe(data);
    let Ok(image) = zenraster::bmp::decode(data, enough::Unstoppable) else {
        return;
    };

    let info = zenraster::bmp::probe(data).expect("decodable file must probe");
    assert_eq!(image.width(), info.width as usize);
    assert_eq!(image.height(), info.height as usize);
    assert_eq!(image.stride() % 4, 0);
});
