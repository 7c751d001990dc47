//! Hand-off of corrected transforms to an external frame renderer.
//!
//! The renderer owns warping, cropping, resizing and encoding. This module
//! only decides what each frame receives: the rigid warp matrix for its
//! corrected transform and the border crop that hides warp edges.

use std::fmt;

use serde::Serialize;
use steadyframe_common::{CropConfig, StabilizeError, StabilizeResult};
use steadyframe_motion_model::{AffineMatrix, CorrectedMotion};

/// Frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Region kept after warping, in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Crop for a frame of `size`: a fixed horizontal border and a vertical
    /// border of `floor(height * ratio) * height / width` pixels.
    ///
    /// Borders are clamped so at least one pixel survives in each axis.
    pub fn for_frame(size: FrameSize, crop: &CropConfig) -> Self {
        if size.width == 0 || size.height == 0 {
            return Self {
                x: 0,
                y: 0,
                width: size.width,
                height: size.height,
            };
        }

        let base = (size.height as f64 * crop.vertical_border_ratio).floor() as u64;
        let vertical = (base * size.height as u64 / size.width as u64) as u32;
        let vertical = vertical.min((size.height - 1) / 2);
        let horizontal = crop.horizontal_border_px.min((size.width - 1) / 2);

        Self {
            x: horizontal,
            y: vertical,
            width: size.width - 2 * horizontal,
            height: size.height - 2 * vertical,
        }
    }
}

/// Everything the renderer needs for one output frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderInstruction {
    /// Position in the rendered sequence.
    pub frame_index: usize,
    pub transform: CorrectedMotion,
    /// Rigid warp matrix built from `transform`.
    pub affine: AffineMatrix,
    pub crop: CropRect,
    /// Size the cropped region is scaled back to.
    pub output_size: FrameSize,
}

/// External stage that applies a corrected transform to a frame.
pub trait FrameRenderer {
    type Frame;
    type Output;
    type Error: fmt::Display;

    fn render(
        &mut self,
        frame: Self::Frame,
        instruction: &RenderInstruction,
    ) -> Result<Self::Output, Self::Error>;
}

/// Build one instruction per corrected transform, except the last: no
/// valid transform exists past the final motion sample.
pub fn plan(
    corrected: &[CorrectedMotion],
    size: FrameSize,
    crop: &CropConfig,
) -> Vec<RenderInstruction> {
    let crop_rect = CropRect::for_frame(size, crop);
    let count = corrected.len().saturating_sub(1);

    corrected[..count]
        .iter()
        .enumerate()
        .map(|(frame_index, transform)| RenderInstruction {
            frame_index,
            transform: *transform,
            affine: transform.to_affine(),
            crop: crop_rect,
            output_size: size,
        })
        .collect()
}

/// Hand frames and instructions to `renderer` one at a time, in order.
///
/// Stops at whichever of `frames` or `instructions` runs out first. The
/// first renderer error aborts the run.
pub fn render_all<R>(
    frames: impl IntoIterator<Item = R::Frame>,
    instructions: &[RenderInstruction],
    renderer: &mut R,
) -> StabilizeResult<Vec<R::Output>>
where
    R: FrameRenderer,
{
    let mut outputs = Vec::with_capacity(instructions.len());
    for (frame, instruction) in frames.into_iter().zip(instructions) {
        let out = renderer.render(frame, instruction).map_err(|e| {
            StabilizeError::render(format!("frame {}: {e}", instruction.frame_index))
        })?;
        outputs.push(out);
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use steadyframe_motion_model::MotionSample;

    struct Recorder {
        seen: Vec<(u32, usize)>,
        fail_at: Option<usize>,
    }

    impl FrameRenderer for Recorder {
        type Frame = u32;
        type Output = f64;
        type Error = String;

        fn render(&mut self, frame: u32, instruction: &RenderInstruction) -> Result<f64, String> {
            if self.fail_at == Some(instruction.frame_index) {
                return Err("encoder closed".to_string());
            }
            self.seen.push((frame, instruction.frame_index));
            Ok(instruction.transform.dx)
        }
    }

    #[test]
    fn test_crop_for_hd_frame() {
        let rect = CropRect::for_frame(FrameSize::new(1920, 1080), &CropConfig::default());
        // floor(1080 * 0.25) = 270; 270 * 1080 / 1920 = 151
        assert_eq!(
            rect,
            CropRect {
                x: 70,
                y: 151,
                width: 1780,
                height: 778
            }
        );
    }

    #[test]
    fn test_crop_clamped_on_tiny_frame() {
        let rect = CropRect::for_frame(FrameSize::new(100, 4), &CropConfig::default());
        assert_eq!(rect.x, 49);
        assert_eq!(rect.width, 2);
        assert!(rect.height >= 1);
    }

    #[test]
    fn test_crop_on_empty_frame() {
        let rect = CropRect::for_frame(FrameSize::new(0, 0), &CropConfig::default());
        assert_eq!(rect.width, 0);
        assert_eq!(rect.height, 0);
    }

    #[test]
    fn test_plan_skips_final_transform() {
        let corrected = vec![
            MotionSample::new(1.0, 0.0, 0.0),
            MotionSample::new(2.0, 0.0, 0.0),
            MotionSample::new(3.0, 0.0, 0.0),
        ];
        let plan = plan(&corrected, FrameSize::new(640, 480), &CropConfig::default());
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].frame_index, 0);
        assert_eq!(plan[1].transform.dx, 2.0);
        assert_eq!(plan[1].affine[0][2], 2.0);
    }

    #[test]
    fn test_plan_for_empty_and_single() {
        let size = FrameSize::new(640, 480);
        assert!(plan(&[], size, &CropConfig::default()).is_empty());
        assert!(plan(&[MotionSample::IDENTITY], size, &CropConfig::default()).is_empty());
    }

    #[test]
    fn test_render_all_in_order_and_stops_at_shorter() {
        let corrected = vec![MotionSample::new(0.5, 0.0, 0.0); 4];
        let instructions = plan(&corrected, FrameSize::new(320, 240), &CropConfig::default());
        let mut renderer = Recorder {
            seen: vec![],
            fail_at: None,
        };

        let outputs = render_all(vec![10, 11], &instructions, &mut renderer).unwrap();
        assert_eq!(outputs, vec![0.5, 0.5]);
        assert_eq!(renderer.seen, vec![(10, 0), (11, 1)]);
    }

    #[test]
    fn test_render_error_aborts() {
        let corrected = vec![MotionSample::IDENTITY; 5];
        let instructions = plan(&corrected, FrameSize::new(320, 240), &CropConfig::default());
        let mut renderer = Recorder {
            seen: vec![],
            fail_at: Some(1),
        };

        let err = render_all(0..10, &instructions, &mut renderer).unwrap_err();
        assert!(matches!(err, StabilizeError::Render { .. }));
        assert!(err.to_string().contains("frame 1"));
        assert_eq!(renderer.seen.len(), 1);
    }
}
