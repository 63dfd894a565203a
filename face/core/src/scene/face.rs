//! Face drawing: eyes, brows and mouth

use crate::animation::{AnimationState, Eye, Vec2};
use crate::color;
use crate::render::{Frame, Shape};

use super::FaceLayout;

/// Eyes never get thinner than this (pixels)
const MIN_EYE_HEIGHT: f32 = 5.0;
/// How far a fully closed lid squashes the eye
const LID_SQUASH: f32 = 0.95;
/// Hit-test radius relative to the eye size
const HIT_RADIUS: f32 = 0.7;
/// Eye height swing while dizzy
const DIZZY_STRETCH: f32 = 0.15;
/// Mouth switches to an "O" above this openness
const O_MOUTH_THRESHOLD: f32 = 0.3;
/// Curves flatter than this draw as a straight line
const FLAT_MOUTH_THRESHOLD: f32 = 0.1;

/// Rendered placement of one eye, in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeGeometry {
    pub eye: Eye,
    pub cx: f32,
    pub cy: f32,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
}

impl EyeGeometry {
    /// Point inside the (enlarged) hit ellipse
    #[must_use]
    pub fn hit(&self, x: f32, y: f32) -> bool {
        let rx = self.width * HIT_RADIUS;
        let ry = self.height * HIT_RADIUS;
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let dx = (x - self.cx) / rx;
        let dy = (y - self.cy) / ry;
        dx * dx + dy * dy <= 1.0
    }
}

/// Borrowed state needed to draw the face
pub struct FaceView<'a> {
    pub anim: &'a AnimationState,
    pub layout: &'a FaceLayout,
}

impl FaceView<'_> {
    /// Whole-face offset in pixels (edge lean plus petting)
    fn offset(&self) -> Vec2 {
        let anim = self.anim;
        Vec2::new(
            self.layout.sx(anim.gaze.face_offset.x),
            self.layout.sy(anim.gaze.face_offset.y + anim.petting.offset_y),
        )
    }
}

/// Where both eyes are drawn right now
#[must_use]
pub fn eye_geometry(anim: &AnimationState, layout: &FaceLayout) -> [EyeGeometry; 2] {
    let view = FaceView { anim, layout };
    let offset = view.offset();
    [
        single_eye(&view, Eye::Left, offset),
        single_eye(&view, Eye::Right, offset),
    ]
}

fn single_eye(view: &FaceView<'_>, eye: Eye, offset: Vec2) -> EyeGeometry {
    let (anim, layout) = (view.anim, view.layout);
    let params = &anim.current_params;
    let is_right = eye == Eye::Right;
    let side = if is_right { 1.0 } else { -1.0 };

    let closure = anim.blink.factor().max(anim.wink.value(eye));
    let wobble = anim.dizzy.wobble();

    let width = layout.sx(params.eye_width);
    let mut height = layout.sy(params.eye_height) * params.eye_openness;
    height *= 1.0 - closure * LID_SQUASH;
    height *= 1.0 - side * wobble * DIZZY_STRETCH;
    let height = height.max(MIN_EYE_HEIGHT);

    let gaze = anim.gaze.gaze;
    let mut x_off = (gaze.x - 0.5) * 2.0 * layout.sx(28.0);
    let mut y_off = (gaze.y - 0.5) * 2.0 * layout.sy(18.0);
    if params.tilt_eyes {
        y_off += side * layout.sy(8.0);
    }
    if params.look_side {
        x_off = layout.sx(12.0);
    }
    y_off += side * wobble * layout.sy(8.0);

    let base_x = if is_right {
        layout.right_eye_x()
    } else {
        layout.left_eye_x()
    };
    let radius = (height / 2.0).min(width / 2.0).min(layout.sy(15.0));

    EyeGeometry {
        eye,
        cx: base_x + offset.x + x_off,
        cy: layout.eye_y + offset.y + y_off,
        width,
        height,
        radius,
    }
}

/// Compose the face page
#[must_use]
pub fn compose_face(anim: &AnimationState, layout: &FaceLayout) -> Frame {
    let view = FaceView { anim, layout };
    let offset = view.offset();
    let params = &anim.current_params;
    let mut frame = Frame::new(color::BACKGROUND);

    for eye in eye_geometry(anim, layout) {
        let name = match eye.eye {
            Eye::Left => "left",
            Eye::Right => "right",
        };
        frame.push(
            format!("eye.{name}"),
            Shape::RoundedRect {
                x: eye.cx - eye.width / 2.0,
                y: eye.cy - eye.height / 2.0,
                width: eye.width,
                height: eye.height,
                radius: eye.radius,
                color: color::FACE,
            },
        );
        if params.sparkle {
            frame.push(
                format!("sparkle.{name}"),
                Shape::Circle {
                    cx: eye.cx - eye.width / 4.0,
                    cy: eye.cy - eye.height / 4.0,
                    radius: layout.sx(12.0) / 2.0,
                    color: color::BACKGROUND,
                },
            );
        }
    }

    if params.angry_brows {
        push_brows(&mut frame, layout, offset);
    }

    if params.no_mouth {
        return frame;
    }
    if params.cat_face {
        push_cat_mouth(&mut frame, layout, offset);
    } else {
        push_mouth(&mut frame, anim, layout, offset);
    }
    frame
}

fn push_brows(frame: &mut Frame, layout: &FaceLayout, offset: Vec2) {
    let brow_y = layout.eye_y - layout.sy(35.0) + offset.y;
    let length = layout.sx(30.0);
    let left_x = layout.left_eye_x() + offset.x;
    let right_x = layout.right_eye_x() + offset.x;
    let width = layout.sy(5.0);

    frame.push(
        "brow.left",
        Shape::Line {
            x1: left_x - length,
            y1: brow_y - layout.sy(10.0),
            x2: left_x + layout.sx(10.0),
            y2: brow_y + layout.sy(5.0),
            width,
            color: color::FACE,
        },
    );
    frame.push(
        "brow.right",
        Shape::Line {
            x1: right_x - layout.sx(10.0),
            y1: brow_y + layout.sy(5.0),
            x2: right_x + length,
            y2: brow_y - layout.sy(10.0),
            width,
            color: color::FACE,
        },
    );
}

fn push_mouth(frame: &mut Frame, anim: &AnimationState, layout: &FaceLayout, offset: Vec2) {
    let params = &anim.current_params;
    let x = layout.center_x + offset.x;
    let y = layout.mouth_y + offset.y;
    let half_width = layout.sx(params.mouth_width);
    let stroke = layout.sy(4.0);

    if params.mouth_open > O_MOUTH_THRESHOLD {
        frame.push(
            "mouth.ring",
            Shape::Ring {
                cx: x,
                cy: y,
                rx: layout.sx(20.0 + params.mouth_open * 15.0),
                ry: layout.sy(15.0 + params.mouth_open * 20.0),
                thickness: stroke,
                color: color::FACE,
            },
        );
    } else if params.mouth_curve.abs() < FLAT_MOUTH_THRESHOLD {
        frame.push(
            "mouth.line",
            Shape::Line {
                x1: x - half_width,
                y1: y,
                x2: x + half_width,
                y2: y,
                width: stroke,
                color: color::FACE,
            },
        );
    } else {
        let curve = layout.sy(params.mouth_curve.abs() * 15.0);
        let (cy, start_deg, end_deg) = if params.mouth_curve > 0.0 {
            (y - curve, 0.0, 180.0)
        } else {
            (y + curve, 180.0, 360.0)
        };
        frame.push(
            "mouth.arc",
            Shape::Arc {
                cx: x,
                cy,
                radius: half_width,
                start_deg,
                end_deg,
                width: stroke,
                color: color::FACE,
            },
        );
    }
}

fn push_cat_mouth(frame: &mut Frame, layout: &FaceLayout, offset: Vec2) {
    let x = layout.center_x + offset.x;
    let y = layout.eye_y + layout.sy(50.0) + offset.y;
    let stroke = layout.sy(4.0);
    let bump = layout.sy(10.0);
    let bump_x = layout.sx(18.0);

    for (key, cx) in [("mouth.cat.left", x - bump_x), ("mouth.cat.right", x + bump_x)] {
        frame.push(
            key,
            Shape::Arc {
                cx,
                cy: y,
                radius: bump,
                start_deg: 0.0,
                end_deg: 180.0,
                width: stroke,
                color: color::FACE,
            },
        );
    }

    let length = layout.sx(40.0);
    let start = layout.sx(55.0);
    let whisker_y = layout.eye_y + layout.sy(45.0) + offset.y;
    let whisker_width = layout.sy(3.0);
    for (i, angle) in [-15.0_f32, 0.0, 15.0].into_iter().enumerate() {
        let drop = angle.to_radians().sin() * length;
        let row = whisker_y + (i as f32 - 1.0) * layout.sy(8.0);
        push_whisker(
            frame,
            format!("whisker.left.{i}"),
            (x - start, x - start - length),
            row,
            drop,
            whisker_width,
        );
        push_whisker(
            frame,
            format!("whisker.right.{i}"),
            (x + start, x + start + length),
            row,
            drop,
            whisker_width,
        );
    }
}

fn push_whisker(
    frame: &mut Frame,
    key: String,
    (x1, x2): (f32, f32),
    y: f32,
    drop: f32,
    width: f32,
) {
    frame.push(
        key,
        Shape::Line {
            x1,
            y1: y,
            x2,
            y2: y + drop,
            width,
            color: color::FACE,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnimationTuning;
    use crate::emotion::EmotionId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn settled(emotion: EmotionId) -> (AnimationState, FaceLayout) {
        let mut rng = StdRng::seed_from_u64(11);
        let anim = AnimationState::new(AnimationTuning::default(), emotion, &mut rng);
        (anim, FaceLayout::new(502, 410))
    }

    #[test]
    fn test_neutral_face_has_eyes_and_flat_mouth() {
        let (anim, layout) = settled(EmotionId::Neutral);
        let frame = compose_face(&anim, &layout);
        assert!(frame.contains("eye.left"));
        assert!(frame.contains("eye.right"));
        assert!(frame.contains("mouth.line"));
        assert!(!frame.contains("brow.left"));
    }

    #[test]
    fn test_mouth_variants() {
        let layout = FaceLayout::new(502, 410);
        let cases = [
            (EmotionId::Happy, "mouth.arc"),
            (EmotionId::Sad, "mouth.arc"),
            (EmotionId::Surprised, "mouth.ring"),
            (EmotionId::Cat, "mouth.cat.left"),
        ];
        for (emotion, key) in cases {
            let (anim, _) = settled(emotion);
            let frame = compose_face(&anim, &layout);
            assert!(frame.contains(key), "{emotion} should draw {key}");
        }

        let (anim, _) = settled(EmotionId::EyesOnly);
        let frame = compose_face(&anim, &layout);
        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn test_flags_add_shapes() {
        let layout = FaceLayout::new(502, 410);
        let (anim, _) = settled(EmotionId::Angry);
        assert!(compose_face(&anim, &layout).contains("brow.right"));

        let (anim, _) = settled(EmotionId::Excited);
        assert!(compose_face(&anim, &layout).contains("sparkle.left"));

        let (anim, _) = settled(EmotionId::Cat);
        assert!(compose_face(&anim, &layout).contains("whisker.right.2"));
    }

    #[test]
    fn test_smile_and_frown_arcs() {
        let layout = FaceLayout::new(502, 410);
        let (anim, _) = settled(EmotionId::Happy);
        match compose_face(&anim, &layout).get("mouth.arc") {
            Some(Shape::Arc { start_deg, end_deg, .. }) => {
                assert_eq!((*start_deg, *end_deg), (0.0, 180.0));
            }
            other => panic!("expected arc, got {other:?}"),
        }
        let (anim, _) = settled(EmotionId::Sad);
        match compose_face(&anim, &layout).get("mouth.arc") {
            Some(Shape::Arc { start_deg, end_deg, .. }) => {
                assert_eq!((*start_deg, *end_deg), (180.0, 360.0));
            }
            other => panic!("expected arc, got {other:?}"),
        }
    }

    #[test]
    fn test_tilted_eyes_sit_at_different_heights() {
        let (anim, layout) = settled(EmotionId::Confused);
        let [left, right] = eye_geometry(&anim, &layout);
        assert!(left.cy < right.cy);
    }

    #[test]
    fn test_wink_squashes_one_eye() {
        let (mut anim, layout) = settled(EmotionId::Neutral);
        anim.poke_eye(Eye::Left);
        let [left, right] = eye_geometry(&anim, &layout);
        assert!(left.height < right.height);
        assert!(left.height >= MIN_EYE_HEIGHT);
    }

    #[test]
    fn test_hit_ellipse() {
        let (anim, layout) = settled(EmotionId::Neutral);
        let [left, right] = eye_geometry(&anim, &layout);
        assert!(left.hit(left.cx, left.cy));
        assert!(left.hit(left.cx + left.width * 0.6, left.cy));
        assert!(!left.hit(left.cx + left.width * 0.8, left.cy));
        assert!(!left.hit(right.cx, right.cy));
    }

    #[test]
    fn test_petting_moves_face_down() {
        let (mut anim, layout) = settled(EmotionId::Neutral);
        let [before, _] = eye_geometry(&anim, &layout);
        anim.petting.offset_y = 10.0;
        let [after, _] = eye_geometry(&anim, &layout);
        assert!(after.cy > before.cy);
    }
}
