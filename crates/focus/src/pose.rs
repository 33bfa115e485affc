//! Head pose from the six reference landmarks
//!
//! Perspective-n-point fit of an object model to its image projection,
//! refined with Levenberg-Marquardt over a rotation-vector/translation
//! parameterisation, followed by an Euler decomposition of the rotation.

use face_mesh::{indices, LandmarkSet};
use nalgebra::{DMatrix, DVector, Rotation3, Vector3, Vector6};
use thiserror::Error;

use crate::signals::PoseAngles;

/// Decomposed angles (degrees) are multiplied by this before thresholding
pub const ANGLE_SCALE: f64 = 360.0;

const MAX_ITERATIONS: usize = 100;
const MIN_TRIANGLE_AREA: f64 = 0.5;

/// Pose fit failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PoseError {
    #[error("Need at least 4 correspondences, got {0}")]
    TooFewPoints(usize),

    #[error("Reference points are coincident or collinear")]
    Degenerate,

    #[error("Pose fit did not produce a finite solution")]
    Diverged,
}

/// Pinhole camera without distortion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub focal: f64,
    pub cx: f64,
    pub cy: f64,
}

impl Camera {
    /// Focal length equal to the frame width, principal point at the centre
    pub fn for_frame(width: u32, height: u32) -> Self {
        Self {
            focal: f64::from(width),
            cx: f64::from(width) / 2.0,
            cy: f64::from(height) / 2.0,
        }
    }

    fn project(&self, p: &Vector3<f64>) -> Option<(f64, f64)> {
        if p.z <= f64::EPSILON {
            return None;
        }
        Some((
            self.focal * p.x / p.z + self.cx,
            self.focal * p.y / p.z + self.cy,
        ))
    }
}

/// Result of a pose fit
#[derive(Debug, Clone, Copy)]
pub struct PoseFit {
    pub rotation: Rotation3<f64>,
    pub translation: Vector3<f64>,
    /// Root-mean-square reprojection error in pixels
    pub rms_error: f64,
}

impl PoseFit {
    /// Euler angles in degrees: x (pitch), y (yaw), z (roll)
    pub fn euler_degrees(&self) -> (f64, f64, f64) {
        let m = self.rotation.matrix();
        let x = m[(2, 1)].atan2(m[(2, 2)]);
        let y = (-m[(2, 0)]).atan2(m[(2, 1)].hypot(m[(2, 2)]));
        let z = m[(1, 0)].atan2(m[(0, 0)]);
        (x.to_degrees(), y.to_degrees(), z.to_degrees())
    }

    /// Angles in the scaled units the head-pose thresholds expect
    pub fn scaled_angles(&self) -> PoseAngles {
        let (x, y, z) = self.euler_degrees();
        PoseAngles {
            pitch: x * ANGLE_SCALE,
            yaw: y * ANGLE_SCALE,
            roll: z * ANGLE_SCALE,
        }
    }
}

struct Problem<'a> {
    object: &'a [Vector3<f64>],
    image: &'a [(f64, f64)],
    camera: Camera,
}

impl Problem<'_> {
    fn residuals(&self, params: &Vector6<f64>) -> Option<DVector<f64>> {
        let rotation = Rotation3::new(Vector3::new(params[0], params[1], params[2]));
        let translation = Vector3::new(params[3], params[4], params[5]);

        let mut r = DVector::zeros(self.object.len() * 2);
        for (i, (p, &(u, v))) in self.object.iter().zip(self.image).enumerate() {
            let (pu, pv) = self.camera.project(&(rotation * p + translation))?;
            r[2 * i] = pu - u;
            r[2 * i + 1] = pv - v;
        }
        Some(r)
    }

    fn jacobian(&self, params: &Vector6<f64>) -> Option<DMatrix<f64>> {
        let mut j = DMatrix::zeros(self.object.len() * 2, 6);
        for k in 0..6 {
            let h = 1e-6 * (1.0 + params[k].abs());
            let mut plus = *params;
            let mut minus = *params;
            plus[k] += h;
            minus[k] -= h;
            let column = (self.residuals(&plus)? - self.residuals(&minus)?) / (2.0 * h);
            j.set_column(k, &column);
        }
        Some(j)
    }

    /// Weak-perspective start: identity rotation, translation that maps the
    /// object centroid and spread onto the image centroid and spread.
    fn initial_guess(&self) -> Result<Vector6<f64>, PoseError> {
        let n = self.object.len() as f64;
        let obj_mean = self.object.iter().fold(Vector3::zeros(), |acc, p| acc + p) / n;
        let (img_u, img_v) = self
            .image
            .iter()
            .fold((0.0, 0.0), |(su, sv), &(u, v)| (su + u, sv + v));
        let (img_u, img_v) = (img_u / n, img_v / n);

        let obj_spread = self
            .object
            .iter()
            .map(|p| (p.x - obj_mean.x).powi(2) + (p.y - obj_mean.y).powi(2))
            .sum::<f64>()
            .sqrt();
        let img_spread = self
            .image
            .iter()
            .map(|&(u, v)| (u - img_u).powi(2) + (v - img_v).powi(2))
            .sum::<f64>()
            .sqrt();
        if obj_spread <= f64::EPSILON || img_spread <= f64::EPSILON {
            return Err(PoseError::Degenerate);
        }

        let scale = img_spread / obj_spread;
        let depth = self.camera.focal / scale;
        Ok(Vector6::new(
            0.0,
            0.0,
            0.0,
            (img_u - self.camera.cx) / scale - obj_mean.x,
            (img_v - self.camera.cy) / scale - obj_mean.y,
            depth - obj_mean.z,
        ))
    }
}

fn is_degenerate(image: &[(f64, f64)]) -> bool {
    for i in 0..image.len() {
        for j in (i + 1)..image.len() {
            for k in (j + 1)..image.len() {
                let (a, b, c) = (image[i], image[j], image[k]);
                let area = ((b.0 - a.0) * (c.1 - a.1) - (c.0 - a.0) * (b.1 - a.1)).abs() / 2.0;
                if area >= MIN_TRIANGLE_AREA {
                    return false;
                }
            }
        }
    }
    true
}

/// Fit the pose mapping `object` points onto their `image` projections
pub fn solve_pnp(
    object: &[Vector3<f64>],
    image: &[(f64, f64)],
    camera: Camera,
) -> Result<PoseFit, PoseError> {
    let n = object.len().min(image.len());
    if n < 4 {
        return Err(PoseError::TooFewPoints(n));
    }
    let (object, image) = (&object[..n], &image[..n]);
    if is_degenerate(image) {
        return Err(PoseError::Degenerate);
    }

    let problem = Problem {
        object,
        image,
        camera,
    };
    let mut params = problem.initial_guess()?;
    let mut residuals = problem.residuals(&params).ok_or(PoseError::Diverged)?;
    let mut cost = residuals.norm_squared();
    let mut lambda = 1e-3;

    for _ in 0..MAX_ITERATIONS {
        if cost < 1e-18 {
            break;
        }
        let j = problem.jacobian(&params).ok_or(PoseError::Diverged)?;
        let jtj = j.tr_mul(&j);
        let jtr = j.tr_mul(&residuals);

        let mut accepted = None;
        while lambda < 1e12 {
            let mut damped = jtj.clone();
            for d in 0..6 {
                damped[(d, d)] += lambda * jtj[(d, d)].max(1e-12);
            }
            let Some(chol) = damped.cholesky() else {
                lambda *= 10.0;
                continue;
            };
            let step = chol.solve(&(-&jtr));
            let candidate = params + Vector6::from_iterator(step.iter().copied());
            match problem.residuals(&candidate) {
                Some(r) if r.norm_squared() < cost => {
                    accepted = Some((candidate, r, step.norm()));
                    break;
                }
                _ => lambda *= 10.0,
            }
        }

        let Some((candidate, r, step_norm)) = accepted else {
            break;
        };
        params = candidate;
        cost = r.norm_squared();
        residuals = r;
        lambda = (lambda / 10.0).max(1e-12);
        if step_norm < 1e-12 {
            break;
        }
    }

    if !params.iter().all(|v| v.is_finite()) || !cost.is_finite() {
        return Err(PoseError::Diverged);
    }

    Ok(PoseFit {
        rotation: Rotation3::new(Vector3::new(params[0], params[1], params[2])),
        translation: Vector3::new(params[3], params[4], params[5]),
        rms_error: (cost / n as f64).sqrt(),
    })
}

/// Fit the head pose of a landmark set.
///
/// The model is the reference landmarks themselves (pixel x/y plus the
/// mesh's relative depth), the observation their pixel x/y.
pub fn fit_head(landmarks: &LandmarkSet) -> Result<PoseFit, PoseError> {
    let mut object = Vec::with_capacity(indices::POSE_REFERENCE.len());
    let mut image = Vec::with_capacity(indices::POSE_REFERENCE.len());

    for &index in &indices::POSE_REFERENCE {
        let (Some(px), Some(lm)) = (landmarks.pixel(index), landmarks.landmark(index)) else {
            continue;
        };
        let (x, y) = (f64::from(px.x), f64::from(px.y));
        object.push(Vector3::new(x, y, lm.z));
        image.push((x, y));
    }

    solve_pnp(
        &object,
        &image,
        Camera::for_frame(landmarks.width(), landmarks.height()),
    )
}
