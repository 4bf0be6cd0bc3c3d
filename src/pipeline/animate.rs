use std::io::Cursor;

use apng::{create_config, image_png, Encoder, Frame, PNGImage};
use rayon::prelude::*;

use crate::error::RasterError;
use crate::pipeline::{overlay, rasterize, render};
use crate::state::RouteSnapshot;
use crate::types::overlay::{OutputConfig, OverlayOptions, RenderOptions};
use crate::types::progress::Progress;

pub const MIN_FRAMES: u32 = 2;

#[derive(Debug, Clone, Copy)]
pub struct AnimationOptions {
    pub frames: u32,
    pub duration_ms: u32,
    pub overlay: OverlayOptions,
}

/// Animated PNG of the vehicle driving the route from start to finish.
pub fn render_apng(
    snapshot: &RouteSnapshot,
    animation: &AnimationOptions,
    options: &RenderOptions,
    output: &OutputConfig,
) -> Result<Vec<u8>, RasterError> {
    let frame_count = animation.frames.max(MIN_FRAMES);
    let frames: Vec<PNGImage> = (0..frame_count)
        .into_par_iter()
        .map(|idx| {
            let progress = frame_progress(idx, frame_count);
            let layers = overlay::compose(Some(snapshot), Some(progress), animation.overlay);

            let svg = render::render_svg(&snapshot.route, &layers, options).map_err(|err| {
                RasterError::AnimationFailed(format!(
                    "Failed to render animation frame {}: {}",
                    idx, err
                ))
            })?;

            let png_bytes = rasterize::rasterize(&svg, output)?;
            png_image_from_bytes(&png_bytes, idx)
        })
        .collect::<Result<Vec<_>, RasterError>>()?;

    let config = create_config(&frames, None)
        .map_err(|err| RasterError::AnimationFailed(format!("Failed to build APNG config: {}", err)))?;

    let mut output_bytes = Vec::new();
    {
        let mut cursor = Cursor::new(&mut output_bytes);
        let mut encoder = Encoder::new(&mut cursor, config)
            .map_err(|err| RasterError::AnimationFailed(format!("Failed to create APNG encoder: {}", err)))?;
        let delay_ms = (animation.duration_ms / frame_count).max(16);
        let frame = Frame {
            delay_num: Some(delay_ms.min(u16::MAX as u32) as u16),
            delay_den: Some(1000),
            ..Default::default()
        };
        encoder.encode_all(frames, Some(&frame)).map_err(|err| {
            RasterError::AnimationFailed(format!("Failed to encode APNG frames: {}", err))
        })?;
    }

    Ok(output_bytes)
}

pub fn frame_progress(idx: u32, frame_count: u32) -> Progress {
    if frame_count <= 1 {
        return Progress::END;
    }
    Progress::new(idx as f64 / (frame_count - 1) as f64)
}

fn png_image_from_bytes(png_bytes: &[u8], frame_idx: u32) -> Result<PNGImage, RasterError> {
    let decoder = image_png::Decoder::new(Cursor::new(png_bytes));
    let mut reader = decoder.read_info().map_err(|err| {
        RasterError::AnimationFailed(format!(
            "Failed to decode PNG metadata for frame {}: {}",
            frame_idx, err
        ))
    })?;
    let mut data = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut data).map_err(|err| {
        RasterError::AnimationFailed(format!(
            "Failed to decode PNG pixels for frame {}: {}",
            frame_idx, err
        ))
    })?;
    data.truncate(info.buffer_size());

    Ok(PNGImage {
        width: info.width,
        height: info.height,
        data,
        color_type: info.color_type,
        bit_depth: info.bit_depth,
    })
}
