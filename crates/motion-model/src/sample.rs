//! Motion sample and trajectory types.

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// Relative rigid-body motion from frame `i - 1` to frame `i`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionSample {
    /// Horizontal translation (pixels).
    #[serde(with = "lossless_f64")]
    pub dx: f64,
    /// Vertical translation (pixels).
    #[serde(with = "lossless_f64")]
    pub dy: f64,
    /// Rotation (radians).
    #[serde(with = "lossless_f64")]
    pub da: f64,
}

/// Absolute camera pose: the running sum of every sample up to a frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    #[serde(with = "lossless_f64")]
    pub x: f64,
    #[serde(with = "lossless_f64")]
    pub y: f64,
    /// Accumulated rotation (radians).
    #[serde(with = "lossless_f64")]
    pub a: f64,
}

/// Smoothed pose, index-aligned with the raw trajectory.
pub type SmoothedTrajectoryPoint = TrajectoryPoint;

/// Corrective per-frame delta handed to the renderer.
pub type CorrectedMotion = MotionSample;

/// Row-major 2x3 affine matrix `[[a, b, tx], [c, d, ty]]`.
pub type AffineMatrix = [[f64; 3]; 2];

/// Finite values as JSON numbers; NaN and infinities as `"NaN"`, `"inf"`, `"-inf"`.
///
/// JSON has no literal for non-finite numbers and `serde_json` would emit `null`.
mod lossless_f64 {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&value.to_string())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => text
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid number {text:?}"))),
        }
    }
}

impl MotionSample {
    pub const IDENTITY: MotionSample = MotionSample {
        dx: 0.0,
        dy: 0.0,
        da: 0.0,
    };

    pub fn new(dx: f64, dy: f64, da: f64) -> Self {
        Self { dx, dy, da }
    }

    /// Extract translation and rotation from an estimated rigid transform.
    ///
    /// Any scale in the matrix is ignored; the angle comes from the first column.
    pub fn from_rigid_matrix(m: &AffineMatrix) -> Self {
        Self {
            dx: m[0][2],
            dy: m[1][2],
            da: m[1][0].atan2(m[0][0]),
        }
    }

    /// Reduce a dense flow field to its mean translation (no rotation).
    ///
    /// Returns `None` for an empty field.
    pub fn from_mean_flow(flow: &[(f32, f32)]) -> Option<Self> {
        if flow.is_empty() {
            return None;
        }
        let (sum_x, sum_y) = flow
            .iter()
            .fold((0.0f64, 0.0f64), |(sx, sy), &(fx, fy)| {
                (sx + fx as f64, sy + fy as f64)
            });
        let count = flow.len() as f64;
        Some(Self::new(sum_x / count, sum_y / count, 0.0))
    }

    /// Rigid warp matrix `[[cos, -sin, dx], [sin, cos, dy]]` for this motion.
    pub fn to_affine(&self) -> AffineMatrix {
        let (sin, cos) = self.da.sin_cos();
        [[cos, -sin, self.dx], [sin, cos, self.dy]]
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.dx.is_finite() && self.dy.is_finite() && self.da.is_finite()
    }

    pub fn components(&self) -> [f64; 3] {
        [self.dx, self.dy, self.da]
    }
}

impl TrajectoryPoint {
    pub const ORIGIN: TrajectoryPoint = TrajectoryPoint {
        x: 0.0,
        y: 0.0,
        a: 0.0,
    };

    pub fn new(x: f64, y: f64, a: f64) -> Self {
        Self { x, y, a }
    }

    /// Componentwise difference `self - other` as a relative motion.
    pub fn delta_from(&self, other: &TrajectoryPoint) -> MotionSample {
        MotionSample::new(self.x - other.x, self.y - other.y, self.a - other.a)
    }

    pub fn components(&self) -> [f64; 3] {
        [self.x, self.y, self.a]
    }
}

impl Add for MotionSample {
    type Output = MotionSample;

    fn add(self, rhs: MotionSample) -> MotionSample {
        MotionSample::new(self.dx + rhs.dx, self.dy + rhs.dy, self.da + rhs.da)
    }
}

impl Add<MotionSample> for TrajectoryPoint {
    type Output = TrajectoryPoint;

    fn add(self, rhs: MotionSample) -> TrajectoryPoint {
        TrajectoryPoint::new(self.x + rhs.dx, self.y + rhs.dy, self.a + rhs.da)
    }
}

impl AddAssign<MotionSample> for TrajectoryPoint {
    fn add_assign(&mut self, rhs: MotionSample) {
        self.x += rhs.dx;
        self.y += rhs.dy;
        self.a += rhs.da;
    }
}

impl Add for TrajectoryPoint {
    type Output = TrajectoryPoint;

    fn add(self, rhs: TrajectoryPoint) -> TrajectoryPoint {
        TrajectoryPoint::new(self.x + rhs.x, self.y + rhs.y, self.a + rhs.a)
    }
}

impl Sub for TrajectoryPoint {
    type Output = MotionSample;

    fn sub(self, rhs: TrajectoryPoint) -> MotionSample {
        self.delta_from(&rhs)
    }
}
