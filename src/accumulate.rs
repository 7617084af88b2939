//! Frame accumulation: rebuilding the complete visible state of every frame
//! of an animation whose stored frames only cover sub-rectangles and rely on
//! the previous frame's pixels persisting underneath ("combine" disposal).

use crate::{
    composite::{blit_over, blit_source},
    error::{GifsmithError, GifsmithResult},
    frame::{CanvasBounds, ComposedFrame, FrameDelta},
};

/// Replay an ordered delta sequence into fully painted, canvas-sized frames.
///
/// The canvas extent is the union of all delta rectangles. One running base
/// buffer is overpainted delta by delta, and after each delta a deep-copy
/// snapshot is appended, so the output length always equals the input length
/// and no two frames alias the same buffer.
pub fn accumulate(deltas: &[FrameDelta]) -> GifsmithResult<Vec<ComposedFrame>> {
    let bounds = CanvasBounds::from_deltas(deltas)?;
    let (width, height) = (bounds.width(), bounds.height());

    let mut base = vec![0u8; width as usize * height as usize * 4];
    let mut frames = Vec::with_capacity(deltas.len());

    for (i, delta) in deltas.iter().enumerate() {
        if delta.rgba8_premul.len() != delta.expected_len() {
            return Err(GifsmithError::invariant(format!(
                "delta {i} buffer is {} bytes, rect wants {}",
                delta.rgba8_premul.len(),
                delta.expected_len()
            )));
        }
        if !bounds.contains(&delta.rect) {
            return Err(GifsmithError::invariant(format!(
                "delta {i} rect escapes the computed canvas bounds"
            )));
        }

        let at_x = delta.rect.left - bounds.min_x;
        let at_y = delta.rect.top - bounds.min_y;
        if i == 0 {
            // The first delta seeds the canvas as-is; there is no prior
            // state to blend against.
            blit_source(
                &mut base,
                width,
                &delta.rgba8_premul,
                delta.rect.width,
                delta.rect.height,
                at_x,
                at_y,
            );
        } else {
            blit_over(
                &mut base,
                width,
                &delta.rgba8_premul,
                delta.rect.width,
                delta.rect.height,
                at_x,
                at_y,
            );
        }

        frames.push(ComposedFrame {
            width,
            height,
            rgba8_premul: base.clone(),
            delay_cs: delta.delay_cs,
        });
    }

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::DeltaRect;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn solid(left: u32, top: u32, width: u32, height: u32, rgba: [u8; 4]) -> FrameDelta {
        FrameDelta {
            rect: DeltaRect {
                left,
                top,
                width,
                height,
            },
            rgba8_premul: rgba.repeat((width * height) as usize),
            delay_cs: 4,
        }
    }

    fn px(frame: &ComposedFrame, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * frame.width + x) * 4) as usize;
        frame.rgba8_premul[i..i + 4].try_into().unwrap()
    }

    #[test]
    fn empty_sequence_is_empty_animation() {
        assert!(matches!(
            accumulate(&[]),
            Err(GifsmithError::EmptyAnimation)
        ));
    }

    #[test]
    fn output_length_matches_input_length() {
        let deltas = vec![solid(0, 0, 4, 4, RED); 7];
        assert_eq!(accumulate(&deltas).unwrap().len(), 7);
    }

    #[test]
    fn every_frame_has_canvas_extent() {
        let deltas = [solid(0, 0, 4, 4, RED), solid(2, 2, 3, 1, BLUE)];
        for frame in accumulate(&deltas).unwrap() {
            assert_eq!((frame.width, frame.height), (5, 4));
            assert_eq!(frame.rgba8_premul.len(), 5 * 4 * 4);
        }
    }

    #[test]
    fn red_then_blue_square_scenario() {
        let deltas = [solid(0, 0, 4, 4, RED), solid(1, 1, 2, 2, BLUE)];
        let frames = accumulate(&deltas).unwrap();
        assert_eq!(frames.len(), 2);

        // Frame 0: solid red 4x4.
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(px(&frames[0], x, y), RED);
            }
        }

        // Frame 1: red with a 2x2 blue square spanning (1,1)-(2,2).
        for y in 0..4 {
            for x in 0..4 {
                let expect = if (1..=2).contains(&x) && (1..=2).contains(&y) {
                    BLUE
                } else {
                    RED
                };
                assert_eq!(px(&frames[1], x, y), expect, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn full_canvas_opaque_deltas_pass_through() {
        let deltas = [
            solid(0, 0, 3, 3, RED),
            solid(0, 0, 3, 3, BLUE),
            solid(0, 0, 3, 3, RED),
        ];
        let frames = accumulate(&deltas).unwrap();
        for (frame, delta) in frames.iter().zip(&deltas) {
            assert_eq!(frame.rgba8_premul, delta.rgba8_premul);
        }
    }

    #[test]
    fn transparent_delta_leaves_prior_state_visible() {
        let mut clear = solid(1, 1, 2, 2, [0, 0, 0, 0]);
        clear.delay_cs = 10;
        let deltas = [solid(0, 0, 4, 4, RED), clear];
        let frames = accumulate(&deltas).unwrap();
        assert_eq!(frames[1].rgba8_premul, frames[0].rgba8_premul);
        assert_eq!(frames[1].delay_cs, 10);
    }

    #[test]
    fn snapshots_do_not_alias() {
        let deltas = [solid(0, 0, 2, 2, RED), solid(0, 0, 2, 2, RED)];
        let mut frames = accumulate(&deltas).unwrap();
        let before = frames[0].rgba8_premul.clone();
        for b in frames[1].rgba8_premul.iter_mut() {
            *b = 0;
        }
        assert_eq!(frames[0].rgba8_premul, before);
    }

    #[test]
    fn offset_only_animation_resolves_tight_canvas() {
        // Nothing touches the origin; the canvas must not grow toward it.
        let deltas = [solid(8, 8, 2, 2, RED), solid(9, 9, 1, 1, BLUE)];
        let frames = accumulate(&deltas).unwrap();
        assert_eq!((frames[0].width, frames[0].height), (2, 2));
        assert_eq!(px(&frames[1], 1, 1), BLUE);
        assert_eq!(px(&frames[1], 0, 0), RED);
    }

    #[test]
    fn bad_buffer_length_is_invariant_violation() {
        let mut delta = solid(0, 0, 2, 2, RED);
        delta.rgba8_premul.pop();
        assert!(matches!(
            accumulate(&[delta]),
            Err(GifsmithError::InvariantViolation(_))
        ));
    }
}
