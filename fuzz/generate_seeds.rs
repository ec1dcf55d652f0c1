#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header(bmp: &mut [u8], width: i32, height: i32, bpp: u16, compression: u32, offset: u32) {
    let size = bmp.len() as u32;
    bmp[0] = b'B';
    bmp[1] = b'M';
    bmp[2..6].copy_from_slice(&size.to_le_bytes()); // file size
    bmp[10..14].copy_from_slice(&offset.to_le_bytes()); // data offset
    bmp[14..18].copy_from_slice(&40u32.to_le_bytes()); // DIB header size
    bmp[18..22].copy_from_slice(&width.to_le_bytes());
    bmp[22..26].copy_from_slice(&height.to_le_bytes());
    bmp[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    bmp[28..30].copy_from_slice(&bpp.to_le_bytes());
    bmp[30..34].copy_from_slice(&compression.to_le_bytes());
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // 1x1 24-bit
    let mut bmp = vec![0u8; 58];
    header(&mut bmp, 1, 1, 24, 0, 54);
    bmp[54] = 0xff; // BGR
    fs::write(format!("{dir}/bmp_1x1.bmp"), bmp).unwrap();

    // 2x2 24-bit top-down
    let mut bmp = vec![0u8; 54 + 16];
    header(&mut bmp, 2, -2, 24, 0, 54);
    bmp[54..60].copy_from_slice(&[0, 0, 255, 0, 255, 0]);
    fs::write(format!("{dir}/bmp_2x2_topdown.bmp"), bmp).unwrap();

    // 2x1 16-bit 5-5-5
    let mut bmp = vec![0u8; 58];
    header(&mut bmp, 2, 1, 16, 0, 54);
    bmp[54..58].copy_from_slice(&[0x00, 0x7c, 0xe0, 0x03]);
    fs::write(format!("{dir}/bmp_16bit.bmp"), bmp).unwrap();

    // 1x1 16-bit 5-6-5 bitfields
    let mut bmp = vec![0u8; 54 + 12 + 4];
    header(&mut bmp, 1, 1, 16, 3, 66);
    bmp[54..58].copy_from_slice(&0xf800u32.to_le_bytes());
    bmp[58..62].copy_from_slice(&0x07e0u32.to_le_bytes());
    bmp[62..66].copy_from_slice(&0x001fu32.to_le_bytes());
    bmp[66..68].copy_from_slice(&0x07e0u16.to_le_bytes());
    fs::write(format!("{dir}/bmp_565.bmp"), bmp).unwrap();

    // 1x1 32-bit BGRX
    let mut bmp = vec![0u8; 58];
    header(&mut bmp, 1, 1, 32, 0, 54);
    bmp[54..58].copy_from_slice(&[1, 2, 3, 4]);
    fs::write(format!("{dir}/bmp_32bit.bmp"), bmp).unwrap();

    // 3x1 1-bit with black/white palette
    let mut bmp = vec![0u8; 54 + 8 + 4];
    header(&mut bmp, 3, 1, 1, 0, 62);
    bmp[46..50].copy_from_slice(&2u32.to_le_bytes()); // colors used
    bmp[58..62].copy_from_slice(&[255, 255, 255, 0]);
    bmp[62] = 0b1010_0000;
    fs::write(format!("{dir}/bmp_1bit.bmp"), bmp).unwrap();

    // 2x1 8-bit, default 256-entry palette
    let mut bmp = vec![0u8; 54 + 1024 + 4];
    header(&mut bmp, 2, 1, 8, 0, 54 + 1024);
    for i in 0..256 {
        let at = 54 + i * 4;
        bmp[at..at + 3].copy_from_slice(&[i as u8; 3]);
    }
    bmp[1078..1080].copy_from_slice(&[7, 200]);
    fs::write(format!("{dir}/bmp_8bit.bmp"), bmp).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    let mut bmp = vec![0u8; 58];
    header(&mut bmp, 1, 1, 8, 1, 54); // RLE8
    fs::write(format!("{dir}/bmp_rle8.bin"), bmp).unwrap();

    println!("Generated seed corpus in {dir}/");
}
