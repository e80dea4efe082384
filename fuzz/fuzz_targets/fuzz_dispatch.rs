#![no_main]
use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use zenjpeg_tools::*;

fuzz_target!(|data: &[u8]| {
    // Sniff, then read every row. Must never panic and never over-allocate.
    let limits = Limits {
        max_pixels: Some(1 << 20),
        max_memory_bytes: Some(16 << 20),
        ..Limits::default()
    };
    let caps = Capabilities::default();
    for force_targa in [false, true] {
        let mut input = PushbackReader::new(Cursor::new(data));
        let Ok(format) = select_file_type(&mut input, force_targa, &caps) else {
            continue;
        };
        let Ok(mut source) = open_source(format, input, &caps, Some(limits.clone())) else {
            continue;
        };
        let Ok(info) = source.start_input() else {
            continue;
        };
        let _ = read_all_rows(source.as_mut(), &info);
    }
});
