use crate::foundation::error::{AdrasterError, AdrasterResult};

#[derive(Clone, Debug, PartialEq, Eq)]
/// One fully composited raster frame in row-major premultiplied RGBA8.
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Encode the frame as PNG (straight alpha) for export by the host.
    pub fn encode_png(&self) -> AdrasterResult<Vec<u8>> {
        let mut straight = self.data.clone();
        unpremultiply_rgba8_in_place(&mut straight);

        let img = image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| AdrasterError::geometry("frame buffer size mismatch"))?;
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
            .map_err(|e| AdrasterError::decode(format!("png encode: {e}")))?;
        Ok(out)
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((u16::from(px[0]) * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((u16::from(px[1]) * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((u16::from(px[2]) * 255 + a / 2) / a).min(255) as u8;
    }
}
