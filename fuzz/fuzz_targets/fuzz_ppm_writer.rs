#![no_main]
use libfuzzer_sys::fuzz_target;
use zenjpeg_tools::*;

fuzz_target!(|data: &[u8]| {
    // Header byte picks width and palette size; the rest are indices.
    let Some((&head, indices)) = data.split_first() else {
        return;
    };
    let width = u32::from(head & 0x0f) + 1;
    let colors = usize::from(head >> 4) + 1;
    let palette: Vec<[u8; 3]> = (0..colors).map(|i| [i as u8, 0, 255 - i as u8]).collect();
    let Ok(map) = ColorMap::from_triples(&palette) else {
        return;
    };

    let rows: Vec<&[u8]> = indices.chunks_exact(width as usize).collect();
    if rows.is_empty() {
        return;
    }
    let info = DecompressInfo::quantized(width, rows.len() as u32, ColorSpace::Rgb, map);
    let Ok(mut writer) = PpmWriter::new(Vec::new(), &info) else {
        return;
    };
    if writer.start_output(&info).is_err() {
        return;
    }
    let ok = rows.iter().all(|row| writer.put_pixel_rows(&info, &[*row]).is_ok());
    if ok && writer.finish_output(&info).is_ok() {
        let header = format!("P6\n{width} {}\n255\n", rows.len());
        assert_eq!(
            writer.get_ref().len(),
            header.len() + rows.len() * width as usize * 3
        );
    }
});
