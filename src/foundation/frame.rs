use crate::foundation::core::Canvas;
use crate::foundation::math::premul_over_px;

/// A frame as tightly packed RGBA8 pixels.
///
/// Frames produced by this crate are premultiplied alpha; decoded video frames are opaque, so
/// both representations coincide for them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// An opaque frame filled with one straight-alpha color.
    pub fn filled(canvas: Canvas, rgba: [u8; 4]) -> Self {
        let mut px = rgba;
        crate::foundation::math::premultiply_rgba8_in_place(&mut px);
        let data = px
            .iter()
            .copied()
            .cycle()
            .take(canvas.rgba_len())
            .collect();
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: true,
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Read one pixel, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Composite a premultiplied `src_w`x`src_h` image over this frame with its top-left corner at
    /// `(x, y)`. Parts falling outside the frame are clipped.
    pub fn blit_over(&mut self, src: &[u8], src_w: u32, src_h: u32, x: i64, y: i64) {
        debug_assert_eq!(src.len(), (src_w as usize) * (src_h as usize) * 4);
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(src_w)).min(i64::from(self.width));
        let y1 = (y + i64::from(src_h)).min(i64::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let row_px = (x1 - x0) as usize;
        let dst_stride = self.width as usize * 4;
        let src_stride = src_w as usize * 4;
        for dy in y0..y1 {
            let sy = (dy - y) as usize;
            let sx = (x0 - x) as usize;
            let d_off = dy as usize * dst_stride + x0 as usize * 4;
            let s_off = sy * src_stride + sx * 4;
            let d_row = &mut self.data[d_off..d_off + row_px * 4];
            let s_row = &src[s_off..s_off + row_px * 4];
            for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
                premul_over_px(d, s);
            }
        }
    }
}
