//! Eye geometry: eyelid aspect ratio, iris centre and horizontal gaze

use face_mesh::PixelPoint;

use crate::config::BLINK_RATIO_THRESHOLD;
use crate::signals::GazeState;

/// Iris must sit this far (fraction of eye width) from an eye corner to
/// count as centered
const GAZE_EDGE_BAND: f64 = 0.3;

/// Circle in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

impl Circle {
    fn contains(&self, p: &PixelPoint) -> bool {
        let d = (f64::from(p.x) - self.cx).hypot(f64::from(p.y) - self.cy);
        d <= self.radius * (1.0 + 1e-9) + 1e-9
    }

    fn diameter(a: &PixelPoint, b: &PixelPoint) -> Circle {
        Circle {
            cx: f64::from(a.x + b.x) / 2.0,
            cy: f64::from(a.y + b.y) / 2.0,
            radius: a.distance(b) / 2.0,
        }
    }

    fn circumscribed(a: &PixelPoint, b: &PixelPoint, c: &PixelPoint) -> Option<Circle> {
        let (ax, ay) = (f64::from(a.x), f64::from(a.y));
        let (bx, by) = (f64::from(b.x), f64::from(b.y));
        let (cx, cy) = (f64::from(c.x), f64::from(c.y));

        let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
        if d.abs() < f64::EPSILON {
            return None;
        }

        let a2 = ax * ax + ay * ay;
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d;
        let uy = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;

        Some(Circle {
            cx: ux,
            cy: uy,
            radius: (ax - ux).hypot(ay - uy),
        })
    }
}

/// Smallest circle enclosing every point.
///
/// Exhaustive over pairs and triples, which is exact and cheap for the
/// four-point iris rings it is used on.
pub fn min_enclosing_circle(points: &[PixelPoint]) -> Option<Circle> {
    match points {
        [] => None,
        [p] => Some(Circle {
            cx: f64::from(p.x),
            cy: f64::from(p.y),
            radius: 0.0,
        }),
        _ => {
            let mut best: Option<Circle> = None;
            let mut consider = |circle: Circle| {
                if points.iter().all(|p| circle.contains(p))
                    && best.map_or(true, |b| circle.radius < b.radius)
                {
                    best = Some(circle);
                }
            };

            for i in 0..points.len() {
                for j in (i + 1)..points.len() {
                    consider(Circle::diameter(&points[i], &points[j]));
                    for k in (j + 1)..points.len() {
                        if let Some(c) = Circle::circumscribed(&points[i], &points[j], &points[k]) {
                            consider(c);
                        }
                    }
                }
            }

            best
        }
    }
}

/// Iris centre snapped to integer pixels (truncated toward zero)
pub fn iris_center(iris: &[PixelPoint]) -> Option<PixelPoint> {
    min_enclosing_circle(iris).map(|c| PixelPoint::new(c.cx as i32, c.cy as i32))
}

/// Horizontal over vertical eyelid distance for one 16-point eye contour
fn eye_aspect(contour: &[PixelPoint]) -> Option<f64> {
    let horizontal = contour.first()?.distance(contour.get(8)?);
    let vertical = contour.get(12)?.distance(contour.get(4)?);
    if vertical == 0.0 {
        Some(f64::INFINITY)
    } else {
        Some(horizontal / vertical)
    }
}

/// Averaged eyelid aspect ratio of both eyes.
///
/// Large values mean closed eyes; a flat eyelid (zero vertical distance)
/// gives infinity. `None` if a contour is too short.
pub fn blink_ratio(right_eye: &[PixelPoint], left_eye: &[PixelPoint]) -> Option<f64> {
    let right = eye_aspect(right_eye)?;
    let left = eye_aspect(left_eye)?;
    Some((right + left) / 2.0)
}

/// Whether a blink ratio means the eyes are closed
pub fn eyes_closed(ratio: f64) -> bool {
    ratio > BLINK_RATIO_THRESHOLD
}

/// Classify one eye from its contour, iris centre and the shared blink ratio
pub fn eye_direction(contour: &[PixelPoint], iris: PixelPoint, ratio: f64) -> GazeState {
    if eyes_closed(ratio) {
        return GazeState::Blink;
    }

    let (Some(eye_left), Some(eye_right)) = (
        contour.iter().map(|p| p.x).min(),
        contour.iter().map(|p| p.x).max(),
    ) else {
        return GazeState::Unknown;
    };

    let eye_left = f64::from(eye_left);
    let eye_right = f64::from(eye_right);
    let range = eye_right - eye_left;
    if range <= 0.0 {
        return GazeState::Unknown;
    }

    let iris_x = f64::from(iris.x);
    if iris_x < eye_left + range * GAZE_EDGE_BAND {
        GazeState::Left
    } else if iris_x > eye_right - range * GAZE_EDGE_BAND {
        GazeState::Right
    } else {
        GazeState::Center
    }
}
