#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_dispatch";
    fs::create_dir_all(dir).unwrap();

    // PPM 2x2
    let ppm = b"P6\n2 2\n255\n\xff\x00\x00\x00\xff\x00\x00\x00\xff\x80\x80\x80";
    fs::write(format!("{dir}/ppm_2x2.ppm"), ppm).unwrap();

    // PGM 3x2, maxval 15
    let pgm = b"P5\n3 2\n15\n\x00\x04\x08\x0c\x0f\x06";
    fs::write(format!("{dir}/pgm_3x2_maxval15.pgm"), pgm).unwrap();

    // Text PPM 1x1 with comment
    let text = b"P3\n# seed\n1 1\n255\n10 20 30\n";
    fs::write(format!("{dir}/ppm_text_1x1.ppm"), text).unwrap();

    // Targa 2x1 true color, top-down
    let mut tga = vec![0u8, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 1, 0, 24, 0x20];
    tga.extend_from_slice(&[0, 0, 255, 255, 0, 0]);
    fs::write(format!("{dir}/tga_truecolor_2x1.tga"), tga).unwrap();

    // Targa 4x1 RLE colormapped, bottom-up
    let mut tga = vec![0u8, 1, 9, 0, 0, 2, 0, 24, 0, 0, 0, 0, 4, 0, 1, 0, 8, 0];
    tga.extend_from_slice(&[0, 0, 0, 255, 255, 255]);
    tga.extend_from_slice(&[0x83, 1]);
    fs::write(format!("{dir}/tga_rle_mapped_4x1.tga"), tga).unwrap();

    // Targa 1x1 gray with ID field (needs -T)
    let tga = [3u8, 0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 0, 8, 0x20, b'i', b'd', b'!', 42];
    fs::write(format!("{dir}/tga_gray_id.tga"), tga).unwrap();

    println!("Seeds written to {dir}/");
}
