use std::io::{self, Write};

use zenjpeg_tools::*;

fn write_image(info: &DecompressInfo, rows: &[Vec<u8>]) -> Vec<u8> {
    let mut writer = PpmWriter::new(Vec::new(), info).unwrap();
    writer.start_output(info).unwrap();
    for row in rows {
        writer.put_pixel_rows(info, &[row.as_slice()]).unwrap();
    }
    writer.finish_output(info).unwrap();
    writer.into_inner()
}

#[test]
fn gray_4x2_header_and_body() {
    let info = DecompressInfo::new(4, 2, ColorSpace::Grayscale);
    let rows = vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8]];
    let out = write_image(&info, &rows);

    let header = b"P5\n4 2\n255\n";
    assert!(out.starts_with(header));
    assert_eq!(out.len() - header.len(), 8);
    assert_eq!(&out[header.len()..], &[1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn single_gray_pixel() {
    let info = DecompressInfo::new(1, 1, ColorSpace::Grayscale);
    let out = write_image(&info, &[vec![200]]);
    assert_eq!(out, b"P5\n1 1\n255\n\xc8");
}

#[test]
fn rgb_body_length() {
    let (w, h) = (5u32, 3u32);
    let info = DecompressInfo::new(w, h, ColorSpace::Rgb);
    let rows: Vec<Vec<u8>> = (0..h)
        .map(|y| (0..w * 3).map(|x| (x + y * 7) as u8).collect())
        .collect();
    let out = write_image(&info, &rows);

    let header = b"P6\n5 3\n255\n";
    assert!(out.starts_with(header));
    assert_eq!(out.len() - header.len(), (w * h * 3) as usize);
    assert_eq!(&out[header.len()..], &rows.concat()[..]);
}

#[test]
fn quantized_rgb_demaps_through_palette() {
    let map = ColorMap::from_triples(&[[10, 20, 30], [40, 50, 60]]).unwrap();
    let info = DecompressInfo::quantized(3, 1, ColorSpace::Rgb, map);
    let mut writer = PpmWriter::new(Vec::new(), &info).unwrap();
    assert_eq!(writer.buffer_width(), 9);

    writer.start_output(&info).unwrap();
    writer.put_pixel_rows(&info, &[&[0, 1, 0]]).unwrap();
    writer.finish_output(&info).unwrap();

    let out = writer.into_inner();
    assert_eq!(
        out,
        b"P6\n3 1\n255\n\x0a\x14\x1e\x28\x32\x3c\x0a\x14\x1e"
    );
}

#[test]
fn quantized_gray_demaps_first_plane() {
    let map = ColorMap::gray(&[0, 100, 255]).unwrap();
    let info = DecompressInfo::quantized(4, 2, ColorSpace::Grayscale, map);
    let out = write_image(&info, &[vec![0, 1, 2, 1], vec![2, 2, 0, 0]]);
    assert_eq!(&out[..11], b"P5\n4 2\n255\n");
    assert_eq!(&out[11..], &[0, 100, 255, 100, 255, 255, 0, 0]);
}

#[test]
fn out_of_range_palette_index_fails_fast() {
    let map = ColorMap::gray(&[5, 6]).unwrap();
    let info = DecompressInfo::quantized(2, 1, ColorSpace::Grayscale, map);
    let mut writer = PpmWriter::new(Vec::new(), &info).unwrap();
    writer.start_output(&info).unwrap();
    let err = writer.put_pixel_rows(&info, &[&[1, 9]]).unwrap_err();
    assert!(matches!(
        err,
        ToolError::PaletteIndexOutOfRange { index: 9, colors: 2 }
    ));
}

#[test]
fn quantized_without_colormap_fails() {
    let mut info = DecompressInfo::new(2, 1, ColorSpace::Rgb);
    info.quantize_colors = true;
    let mut writer = PpmWriter::new(Vec::new(), &info).unwrap();
    writer.start_output(&info).unwrap();
    assert!(matches!(
        writer.put_pixel_rows(&info, &[&[0, 0]]),
        Err(ToolError::MissingColorMap)
    ));
}

#[test]
fn batching_does_not_change_output() {
    let info = DecompressInfo::new(3, 4, ColorSpace::Rgb);
    let rows: Vec<Vec<u8>> = (0..4u8).map(|y| vec![y; 9]).collect();

    let one_at_a_time = write_image(&info, &rows);

    let mut writer = PpmWriter::new(Vec::new(), &info).unwrap();
    writer.start_output(&info).unwrap();
    writer.put_pixel_rows(&info, &[rows[0].as_slice(), &rows[1], &rows[2]]).unwrap();
    writer.put_pixel_rows(&info, &[rows[3].as_slice()]).unwrap();
    writer.finish_output(&info).unwrap();

    assert_eq!(writer.into_inner(), one_at_a_time);
}

#[test]
fn unsupported_color_space_fails_at_header() {
    let info = DecompressInfo::new(2, 2, ColorSpace::YCbCr);
    let mut writer = PpmWriter::new(Vec::new(), &info).unwrap();
    assert!(matches!(
        writer.start_output(&info),
        Err(ToolError::UnsupportedColorSpace(ColorSpace::YCbCr))
    ));
    assert!(writer.get_ref().is_empty());
}

#[test]
fn wide_samples_fail_at_construction() {
    let mut info = DecompressInfo::new(2, 2, ColorSpace::Grayscale);
    info.data_precision = 12;
    assert!(matches!(
        PpmWriter::new(Vec::new(), &info),
        Err(ToolError::SampleSize(12))
    ));
}

#[test]
fn header_and_finish_only_once() {
    let info = DecompressInfo::new(1, 1, ColorSpace::Grayscale);
    let mut writer = PpmWriter::new(Vec::new(), &info).unwrap();

    assert!(matches!(
        writer.put_pixel_rows(&info, &[&[1]]),
        Err(ToolError::InvalidState(_))
    ));
    assert!(matches!(
        writer.finish_output(&info),
        Err(ToolError::InvalidState(_))
    ));

    writer.start_output(&info).unwrap();
    assert!(matches!(
        writer.start_output(&info),
        Err(ToolError::InvalidState(_))
    ));
    writer.put_pixel_rows(&info, &[&[1]]).unwrap();
    assert!(matches!(
        writer.put_pixel_rows(&info, &[&[2]]),
        Err(ToolError::TooManyRows { height: 1 })
    ));
    writer.finish_output(&info).unwrap();
    assert!(matches!(
        writer.finish_output(&info),
        Err(ToolError::InvalidState(_))
    ));
    assert_eq!(writer.rows_written(), 1);
}

#[test]
fn short_row_rejected() {
    let info = DecompressInfo::new(3, 1, ColorSpace::Rgb);
    let mut writer = PpmWriter::new(Vec::new(), &info).unwrap();
    writer.start_output(&info).unwrap();
    assert!(matches!(
        writer.put_pixel_rows(&info, &[&[1, 2, 3]]),
        Err(ToolError::RowLength { expected: 9, actual: 3 })
    ));
}

#[test]
fn row_buffer_limited_by_memory_limit() {
    let map = ColorMap::gray(&[0]).unwrap();
    let info = DecompressInfo::quantized(1000, 1, ColorSpace::Rgb, map);
    let limits = Limits {
        max_memory_bytes: Some(1000),
        ..Limits::default()
    };
    assert!(matches!(
        PpmWriter::with_limits(Vec::new(), &info, Some(&limits)),
        Err(ToolError::LimitExceeded(_))
    ));
}

/// Accepts writes but fails on flush.
struct FailingFlush(Vec<u8>);

impl Write for FailingFlush {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::other("disk full"))
    }
}

#[test]
fn flush_failure_is_a_file_write_error() {
    let info = DecompressInfo::new(1, 1, ColorSpace::Grayscale);
    let mut writer = PpmWriter::new(FailingFlush(Vec::new()), &info).unwrap();
    writer.start_output(&info).unwrap();
    writer.put_pixel_rows(&info, &[&[0]]).unwrap();
    let err = writer.finish_output(&info).unwrap_err();
    assert!(matches!(err, ToolError::FileWrite(_)));
    assert_eq!(err.to_string(), "file write error");
}

#[test]
fn encode_pnm_whole_image() {
    let pixels = [9u8, 8, 7, 6, 5, 4];
    let out = encode_pnm(&pixels, 1, 2, ColorSpace::Rgb).unwrap();
    assert_eq!(out, b"P6\n1 2\n255\n\x09\x08\x07\x06\x05\x04");

    assert!(matches!(
        encode_pnm(&pixels, 4, 4, ColorSpace::Grayscale),
        Err(ToolError::RowLength { .. })
    ));
}

#[cfg(feature = "rgb")]
#[test]
fn colormap_from_rgb8() {
    let map = ColorMap::from_rgb(&[rgb::RGB8::new(1, 2, 3)]).unwrap();
    assert_eq!(map.num_planes(), 3);
    assert_eq!(map.plane(2), Some(&[3u8][..]));
}

#[test]
fn gray_output_rejects_three_plane_colormap() {
    let map = ColorMap::from_triples(&[[10, 20, 30], [40, 50, 60]]).unwrap();
    let info = DecompressInfo::quantized(2, 1, ColorSpace::Grayscale, map);
    let mut writer = PpmWriter::new(Vec::new(), &info).unwrap();
    writer.start_output(&info).unwrap();
    assert!(matches!(
        writer.put_pixel_rows(&info, &[&[0, 1]]),
        Err(ToolError::ColorMapPlanes { expected: 1, actual: 3 })
    ));
    assert_eq!(writer.get_ref().as_slice(), b"P5\n2 1\n255\n");
}
