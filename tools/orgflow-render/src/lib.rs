//! Image plumbing for the `orgflow-render` CLI: pixel buffers, pixel-by-pixel
//! comparison with diff images, and BMP / raw RGBA file I/O.

use std::fs::File;
use std::io::{self, Read as IoRead, Write as IoWrite};
use std::path::Path;

use orgflow::canvas::Surface;

// ============================================================================
// Pixel Buffer
// ============================================================================

/// An RGBA pixel buffer with dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    /// RGBA, row-major, top-down. Length = width * height * 4.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize * 4],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn same_size(&self, other: &PixelBuffer) -> io::Result<()> {
        if self.width != other.width || self.height != other.height {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "size mismatch: {}x{} vs {}x{}",
                    self.width, self.height, other.width, other.height
                ),
            ));
        }
        Ok(())
    }
}

impl From<Surface> for PixelBuffer {
    fn from(s: Surface) -> Self {
        let (width, height) = (s.width(), s.height());
        Self {
            width,
            height,
            data: s.into_data(),
        }
    }
}

// ============================================================================
// Comparison
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffInfo {
    pub x: u32,
    pub y: u32,
    pub pixel_a: [u8; 4],
    pub pixel_b: [u8; 4],
}

/// Result of comparing two pixel buffers.
#[derive(Debug, Clone)]
pub struct CompareResult {
    pub total_pixels: u64,
    /// Pixels differing by at least 1 in any channel.
    pub different_pixels: u64,
    pub max_channel_diff: u8,
    /// Mean absolute difference over the differing channels only.
    pub mean_channel_diff: f64,
    /// First differing pixel in scan order.
    pub first_diff: Option<DiffInfo>,
    /// Index = absolute channel difference, value = channel count.
    pub diff_histogram: [u64; 256],
}

impl CompareResult {
    pub fn identical(&self) -> bool {
        self.different_pixels == 0
    }
}

impl std::fmt::Display for CompareResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.identical() {
            return write!(f, "IDENTICAL: {} pixels match", self.total_pixels);
        }
        write!(
            f,
            "DIFFERENT: {}/{} pixels differ ({:.2}%), max_diff={}, mean_diff={:.4}",
            self.different_pixels,
            self.total_pixels,
            self.different_pixels as f64 / self.total_pixels as f64 * 100.0,
            self.max_channel_diff,
            self.mean_channel_diff,
        )?;
        if let Some(d) = &self.first_diff {
            write!(f, "\n  first diff at ({}, {}): A={:?} B={:?}", d.x, d.y, d.pixel_a, d.pixel_b)?;
        }
        Ok(())
    }
}

/// Compare two buffers channel by channel. Fails if their sizes differ.
pub fn compare_buffers(a: &PixelBuffer, b: &PixelBuffer) -> io::Result<CompareResult> {
    a.same_size(b)?;

    let mut result = CompareResult {
        total_pixels: a.width as u64 * a.height as u64,
        different_pixels: 0,
        max_channel_diff: 0,
        mean_channel_diff: 0.0,
        first_diff: None,
        diff_histogram: [0u64; 256],
    };
    let mut diff_sum = 0u64;
    let mut diff_channels = 0u64;

    for y in 0..a.height {
        for x in 0..a.width {
            let (pa, pb) = (a.pixel(x, y), b.pixel(x, y));
            let mut differs = false;
            for (ca, cb) in pa.iter().zip(pb.iter()) {
                let d = ca.abs_diff(*cb);
                if d > 0 {
                    differs = true;
                    result.max_channel_diff = result.max_channel_diff.max(d);
                    result.diff_histogram[d as usize] += 1;
                    diff_sum += d as u64;
                    diff_channels += 1;
                }
            }
            if differs {
                result.different_pixels += 1;
                result.first_diff.get_or_insert(DiffInfo {
                    x,
                    y,
                    pixel_a: pa,
                    pixel_b: pb,
                });
            }
        }
    }

    if diff_channels > 0 {
        result.mean_channel_diff = diff_sum as f64 / diff_channels as f64;
    }
    Ok(result)
}

/// Dark gray where pixels match, red scaled 10x by the largest RGB
/// difference where they don't.
pub fn generate_diff_image(a: &PixelBuffer, b: &PixelBuffer) -> io::Result<PixelBuffer> {
    a.same_size(b)?;
    let mut diff = PixelBuffer::new(a.width, a.height);
    for y in 0..a.height {
        for x in 0..a.width {
            let (pa, pb) = (a.pixel(x, y), b.pixel(x, y));
            let max_diff = (0..3).map(|c| pa[c].abs_diff(pb[c])).max().unwrap_or(0);
            let px = if max_diff == 0 {
                [40, 40, 40, 255]
            } else {
                [(max_diff as u16 * 10).min(255) as u8, 0, 0, 255]
            };
            let i = diff.offset(x, y);
            diff.data[i..i + 4].copy_from_slice(&px);
        }
    }
    Ok(diff)
}

/// `[A | diff | B]` in one image.
pub fn generate_sidebyside(a: &PixelBuffer, b: &PixelBuffer) -> io::Result<PixelBuffer> {
    let diff = generate_diff_image(a, b)?;
    let row = a.width as usize * 4;
    let mut out = PixelBuffer::new(a.width * 3, a.height);
    for y in 0..a.height as usize {
        let src = y * row;
        let dst = y * row * 3;
        for (panel, buf) in [a, &diff, b].into_iter().enumerate() {
            let at = dst + panel * row;
            out.data[at..at + row].copy_from_slice(&buf.data[src..src + row]);
        }
    }
    Ok(out)
}

// ============================================================================
// BMP I/O (32-bit BGRA, top-down)
// ============================================================================

const BMP_HEADER_LEN: u32 = 14 + 40;

/// Save as a 32-bit top-down BMP.
pub fn save_bmp(path: &Path, buf: &PixelBuffer) -> io::Result<()> {
    let mut f = File::create(path)?;
    f.write_all(&encode_bmp(buf))
}

pub fn encode_bmp(buf: &PixelBuffer) -> Vec<u8> {
    let image_size = buf.width * buf.height * 4;
    let mut out = Vec::with_capacity((BMP_HEADER_LEN + image_size) as usize);

    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(BMP_HEADER_LEN + image_size).to_le_bytes());
    out.extend_from_slice(&[0u8; 4]);
    out.extend_from_slice(&BMP_HEADER_LEN.to_le_bytes());

    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&buf.width.to_le_bytes());
    // negative height = top-down
    out.extend_from_slice(&(-(buf.height as i32)).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&32u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    out.extend_from_slice(&image_size.to_le_bytes());
    out.extend_from_slice(&[0u8; 16]);

    for px in buf.data.chunks_exact(4) {
        out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
    }
    out
}

/// Load a 24- or 32-bit uncompressed BMP.
pub fn load_bmp(path: &Path) -> io::Result<PixelBuffer> {
    let mut data = Vec::new();
    File::open(path)?.read_to_end(&mut data)?;
    decode_bmp(&data)
}

pub fn decode_bmp(data: &[u8]) -> io::Result<PixelBuffer> {
    let invalid = |msg: &str| io::Error::new(io::ErrorKind::InvalidData, msg.to_string());
    if data.len() < BMP_HEADER_LEN as usize || &data[0..2] != b"BM" {
        return Err(invalid("not a BMP file"));
    }
    let u32_at = |i: usize| u32::from_le_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);

    let pixel_offset = u32_at(10) as usize;
    let w = u32_at(18) as i32;
    let h = u32_at(22) as i32;
    let bytes_pp = u16::from_le_bytes([data[28], data[29]]) as usize / 8;
    if bytes_pp != 3 && bytes_pp != 4 {
        return Err(invalid("only 24- and 32-bit BMPs are supported"));
    }

    let width = w.unsigned_abs();
    let height = h.unsigned_abs();
    let top_down = h < 0;
    let stride = (width as usize)
        .checked_mul(bytes_pp)
        .and_then(|row| row.checked_add(3))
        .map(|row| row / 4 * 4)
        .ok_or_else(|| invalid("BMP dimensions overflow"))?;
    let end = stride
        .checked_mul(height as usize)
        .and_then(|len| len.checked_add(pixel_offset))
        .ok_or_else(|| invalid("BMP dimensions overflow"))?;
    if data.len() < end || rgba_len(width, height).is_none() {
        return Err(invalid("truncated BMP pixel data"));
    }

    let mut buf = PixelBuffer::new(width, height);
    for y in 0..height as usize {
        let src_y = if top_down { y } else { height as usize - 1 - y };
        let row = &data[pixel_offset + src_y * stride..];
        for x in 0..width as usize {
            let s = &row[x * bytes_pp..x * bytes_pp + bytes_pp];
            let a = if bytes_pp == 4 { s[3] } else { 255 };
            let di = (y * width as usize + x) * 4;
            buf.data[di..di + 4].copy_from_slice(&[s[2], s[1], s[0], a]);
        }
    }
    Ok(buf)
}

// ============================================================================
// Raw RGBA I/O: [width:u32][height:u32][rgba...]
// ============================================================================

pub fn save_raw(path: &Path, buf: &PixelBuffer) -> io::Result<()> {
    let mut f = File::create(path)?;
    f.write_all(&buf.width.to_le_bytes())?;
    f.write_all(&buf.height.to_le_bytes())?;
    f.write_all(&buf.data)
}

pub fn load_raw(path: &Path) -> io::Result<PixelBuffer> {
    let mut data = Vec::new();
    File::open(path)?.read_to_end(&mut data)?;
    if data.len() < 8 {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "raw file too small"));
    }

    let width = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let height = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    let expected = rgba_len(width, height)
        .and_then(|len| len.checked_add(8))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("raw dimensions overflow: {}x{}", width, height),
            )
        })?;
    if data.len() < expected {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("raw file too small: expected {} bytes, got {}", expected, data.len()),
        ));
    }

    data.truncate(expected);
    data.drain(..8);
    Ok(PixelBuffer { width, height, data })
}

/// Byte length of a `width` x `height` RGBA buffer, `None` on overflow.
fn rgba_len(width: u32, height: u32) -> Option<usize> {
    (width as usize).checked_mul(height as usize)?.checked_mul(4)
}

/// Load by extension: `.bmp`, or `.raw` / `.rgba`.
pub fn load_image(path: &Path) -> io::Result<PixelBuffer> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("bmp") => load_bmp(path),
        Some("raw") | Some("rgba") => load_raw(path),
        _ => Err(unsupported(path)),
    }
}

/// Save by extension: `.bmp`, or `.raw` / `.rgba`.
pub fn save_image(path: &Path, buf: &PixelBuffer) -> io::Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("bmp") => save_bmp(path, buf),
        Some("raw") | Some("rgba") => save_raw(path, buf),
        _ => Err(unsupported(path)),
    }
}

fn unsupported(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("unsupported image format: {}", path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgflow::{render_view, Intensity, PageConfig, ViewTab};

    fn small_config() -> PageConfig {
        PageConfig {
            width: 320,
            height: 240,
            ..PageConfig::default()
        }
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("orgflow-render-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_identical_buffers() {
        let view: PixelBuffer =
            render_view(ViewTab::Comparative, Intensity::new(0.5), &small_config()).unwrap().into();
        let r = compare_buffers(&view, &view.clone()).unwrap();
        assert!(r.identical());
        assert_eq!(r.total_pixels, 320 * 240);
        assert!(r.first_diff.is_none());
        assert!(r.to_string().starts_with("IDENTICAL"));
    }

    #[test]
    fn test_single_pixel_difference() {
        let a = PixelBuffer::new(4, 3);
        let mut b = a.clone();
        let i = b.offset(2, 1);
        b.data[i] = 7;
        b.data[i + 2] = 3;

        let r = compare_buffers(&a, &b).unwrap();
        assert_eq!(r.different_pixels, 1);
        assert_eq!(r.max_channel_diff, 7);
        assert_eq!(r.mean_channel_diff, 5.0);
        assert_eq!(r.diff_histogram[7], 1);
        assert_eq!(r.diff_histogram[3], 1);
        let d = r.first_diff.unwrap();
        assert_eq!((d.x, d.y), (2, 1));

        let diff = generate_diff_image(&a, &b).unwrap();
        assert_eq!(diff.pixel(2, 1), [70, 0, 0, 255]);
        assert_eq!(diff.pixel(0, 0), [40, 40, 40, 255]);
    }

    #[test]
    fn test_size_mismatch_is_an_error() {
        let a = PixelBuffer::new(4, 4);
        let b = PixelBuffer::new(4, 5);
        assert!(compare_buffers(&a, &b).is_err());
        assert!(generate_sidebyside(&a, &b).is_err());
    }

    #[test]
    fn test_sidebyside_layout() {
        let mut a = PixelBuffer::new(2, 2);
        a.data.fill(10);
        let mut b = PixelBuffer::new(2, 2);
        b.data.fill(10);
        let out = generate_sidebyside(&a, &b).unwrap();
        assert_eq!((out.width, out.height), (6, 2));
        assert_eq!(out.pixel(1, 1), [10, 10, 10, 10]);
        assert_eq!(out.pixel(3, 0), [40, 40, 40, 255]);
        assert_eq!(out.pixel(5, 1), [10, 10, 10, 10]);
    }

    #[test]
    fn test_rendered_view_survives_bmp() {
        let view: PixelBuffer =
            render_view(ViewTab::StructureB, Intensity::new(0.3), &small_config()).unwrap().into();
        let decoded = decode_bmp(&encode_bmp(&view)).unwrap();
        assert_eq!(decoded, view);
    }

    #[test]
    fn test_raw_and_bmp_files() {
        let view: PixelBuffer =
            render_view(ViewTab::StructureA, Intensity::new(0.8), &small_config()).unwrap().into();
        for ext in ["raw", "bmp"] {
            let path = temp_path(&format!("view.{}", ext));
            save_image(&path, &view).unwrap();
            let loaded = load_image(&path).unwrap();
            std::fs::remove_file(&path).ok();
            assert!(compare_buffers(&view, &loaded).unwrap().identical(), "{}", ext);
        }
    }

    #[test]
    fn test_oversized_raw_header() {
        let path = temp_path("huge.raw");
        let mut header = u32::MAX.to_le_bytes().to_vec();
        header.extend_from_slice(&u32::MAX.to_le_bytes());
        std::fs::write(&path, &header).unwrap();
        let err = load_raw(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_raw_header_larger_than_payload() {
        let path = temp_path("short.raw");
        let mut bytes = 4u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&4u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 16]);
        std::fs::write(&path, &bytes).unwrap();
        let err = load_raw(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_oversized_bmp_header() {
        for (w, h) in [(i32::MAX, -i32::MAX), (i32::MIN, i32::MIN), (1 << 20, 1 << 20)] {
            let mut bmp = encode_bmp(&PixelBuffer::new(2, 2));
            bmp[18..22].copy_from_slice(&w.to_le_bytes());
            bmp[22..26].copy_from_slice(&h.to_le_bytes());
            let err = decode_bmp(&bmp).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidData, "{}x{}", w, h);
        }
    }

    #[test]
    fn test_unknown_extension() {
        let path = temp_path("view.png");
        assert_eq!(
            save_image(&path, &PixelBuffer::new(1, 1)).unwrap_err().kind(),
            io::ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_reject_bad_bmp() {
        assert!(decode_bmp(b"not a bitmap at all").is_err());
        let mut bmp = encode_bmp(&PixelBuffer::new(3, 3));
        bmp.truncate(60);
        assert!(decode_bmp(&bmp).is_err());
    }
}
