//! Colormaps for quantized output and the demapper that expands palette
//! indices back to direct samples.

use crate::error::ToolError;

/// Per-plane lookup tables indexed by palette code.
///
/// A colormap has either one plane (grayscale palette) or three planes
/// (R, G, B), each holding the same number of entries (1..=256).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorMap {
    planes: Vec<Vec<u8>>,
}

impl ColorMap {
    /// Build a colormap from parallel planes.
    pub fn new(planes: Vec<Vec<u8>>) -> Result<Self, ToolError> {
        if planes.len() != 1 && planes.len() != 3 {
            return Err(ToolError::InvalidData(format!(
                "colormap must have 1 or 3 planes, got {}",
                planes.len()
            )));
        }
        let colors = planes[0].len();
        if colors == 0 || colors > 256 {
            return Err(ToolError::InvalidData(format!(
                "colormap must have 1..=256 entries, got {colors}"
            )));
        }
        if planes.iter().any(|p| p.len() != colors) {
            return Err(ToolError::InvalidData(
                "colormap planes differ in length".into(),
            ));
        }
        Ok(Self { planes })
    }

    /// Single-plane (grayscale) colormap.
    pub fn gray(values: &[u8]) -> Result<Self, ToolError> {
        Self::new(vec![values.to_vec()])
    }

    /// Three-plane colormap from `[r, g, b]` triples.
    pub fn from_triples(entries: &[[u8; 3]]) -> Result<Self, ToolError> {
        let mut planes = vec![Vec::with_capacity(entries.len()); 3];
        for entry in entries {
            for (plane, &v) in planes.iter_mut().zip(entry) {
                plane.push(v);
            }
        }
        Self::new(planes)
    }

    /// Three-plane colormap from typed RGB8 entries.
    #[cfg(feature = "rgb")]
    pub fn from_rgb(entries: &[rgb::RGB8]) -> Result<Self, ToolError> {
        let triples: Vec<[u8; 3]> = entries.iter().map(|p| [p.r, p.g, p.b]).collect();
        Self::from_triples(&triples)
    }

    /// Number of planes (1 or 3).
    pub fn num_planes(&self) -> usize {
        self.planes.len()
    }

    /// Number of palette entries.
    pub fn colors(&self) -> usize {
        self.planes[0].len()
    }

    /// Lookup table for one plane.
    pub fn plane(&self, index: usize) -> Option<&[u8]> {
        self.planes.get(index).map(Vec::as_slice)
    }
}

/// Expand palette indices to interleaved RGB triples.
///
/// `out` must hold exactly `3 * indices.len()` bytes.
pub(crate) fn demap_rgb(colormap: &ColorMap, indices: &[u8], out: &mut [u8]) -> Result<(), ToolError> {
    if colormap.num_planes() != 3 {
        return Err(ToolError::ColorMapPlanes {
            expected: 3,
            actual: colormap.num_planes(),
        });
    }
    let (map0, map1, map2) = (&colormap.planes[0], &colormap.planes[1], &colormap.planes[2]);
    let colors = map0.len();

    for (&index, px) in indices.iter().zip(out.chunks_exact_mut(3)) {
        let i = index as usize;
        if i >= colors {
            return Err(ToolError::PaletteIndexOutOfRange { index, colors });
        }
        px[0] = map0[i];
        px[1] = map1[i];
        px[2] = map2[i];
    }
    Ok(())
}

/// Expand palette indices through a single-plane colormap.
pub(crate) fn demap_gray(colormap: &ColorMap, indices: &[u8], out: &mut [u8]) -> Result<(), ToolError> {
    if colormap.num_planes() != 1 {
        return Err(ToolError::ColorMapPlanes {
            expected: 1,
            actual: colormap.num_planes(),
        });
    }
    let map = &colormap.planes[0];
    let colors = map.len();

    for (&index, dst) in indices.iter().zip(out.iter_mut()) {
        *dst = *map
            .get(index as usize)
            .ok_or(ToolError::PaletteIndexOutOfRange { index, colors })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demap_rgb_interleaves_planes() {
        let map = ColorMap::from_triples(&[[10, 20, 30], [40, 50, 60]]).unwrap();
        let mut out = [0u8; 9];
        demap_rgb(&map, &[0, 1, 0], &mut out).unwrap();
        assert_eq!(out, [10, 20, 30, 40, 50, 60, 10, 20, 30]);
    }

    #[test]
    fn demap_gray_uses_first_plane() {
        let map = ColorMap::gray(&[0, 128, 255]).unwrap();
        let mut out = [0u8; 4];
        demap_gray(&map, &[2, 1, 0, 2], &mut out).unwrap();
        assert_eq!(out, [255, 128, 0, 255]);
    }

    #[test]
    fn out_of_range_index_fails() {
        let map = ColorMap::from_triples(&[[1, 2, 3], [4, 5, 6]]).unwrap();
        let mut out = [0u8; 6];
        let err = demap_rgb(&map, &[1, 2], &mut out).unwrap_err();
        assert!(matches!(
            err,
            ToolError::PaletteIndexOutOfRange { index: 2, colors: 2 }
        ));
    }

    #[test]
    fn rgb_demap_needs_three_planes() {
        let map = ColorMap::gray(&[7]).unwrap();
        let mut out = [0u8; 3];
        assert!(matches!(
            demap_rgb(&map, &[0], &mut out),
            Err(ToolError::ColorMapPlanes { expected: 3, actual: 1 })
        ));
    }

    #[test]
    fn gray_demap_needs_one_plane() {
        let map = ColorMap::from_triples(&[[10, 20, 30]]).unwrap();
        let mut out = [0u8; 1];
        assert!(matches!(
            demap_gray(&map, &[0], &mut out),
            Err(ToolError::ColorMapPlanes { expected: 1, actual: 3 })
        ));
        assert_eq!(out, [0]);
    }

    #[test]
    fn rejects_ragged_planes() {
        assert!(ColorMap::new(vec![vec![1, 2], vec![1], vec![1, 2]]).is_err());
        assert!(ColorMap::new(vec![vec![1], vec![1]]).is_err());
        assert!(ColorMap::new(vec![vec![0; 257]]).is_err());
    }
}
