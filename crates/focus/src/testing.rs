//! Synthetic faces for unit tests

use face_mesh::{indices, Landmark, LandmarkSet, REFINED_LANDMARK_COUNT};

#[derive(Debug, Clone, Copy)]
pub enum Look {
    Center,
    Left,
    Right,
}

fn place_eye(points: &mut [Landmark], contour: &[usize; 16], left: f64, right: f64, open: bool) {
    let mid_x = (left + right) / 2.0;
    let half_open = if open { 0.02 } else { 0.002 };
    for &i in contour {
        points[i] = Landmark::new(mid_x, 0.40, 0.0);
    }
    points[contour[0]] = Landmark::new(left, 0.40, 0.0);
    points[contour[8]] = Landmark::new(right, 0.40, 0.0);
    points[contour[4]] = Landmark::new(mid_x, 0.40 + half_open, 0.0);
    points[contour[12]] = Landmark::new(mid_x, 0.40 - half_open, 0.0);
}

fn place_iris(points: &mut [Landmark], ring: &[usize; 4], cx: f64) {
    let offsets = [(-0.006, 0.0), (0.0, -0.008), (0.006, 0.0), (0.0, 0.008)];
    for (&i, (dx, dy)) in ring.iter().zip(offsets) {
        points[i] = Landmark::new(cx + dx, 0.40 + dy, 0.0);
    }
}

/// Frontal 640x480 face with the irises placed for `look`
pub fn face(look: Look, eyes_open: bool) -> LandmarkSet {
    let mut points = vec![Landmark::new(0.5, 0.5, 0.0); REFINED_LANDMARK_COUNT];

    // Right eye spans x 0.40..0.46, left eye 0.54..0.60
    place_eye(&mut points, &indices::RIGHT_EYE, 0.40, 0.46, eyes_open);
    place_eye(&mut points, &indices::LEFT_EYE, 0.54, 0.60, eyes_open);

    let (right_iris, left_iris) = match look {
        Look::Center => (0.43, 0.57),
        Look::Left => (0.405, 0.545),
        Look::Right => (0.452, 0.592),
    };
    place_iris(&mut points, &indices::RIGHT_IRIS, right_iris);
    place_iris(&mut points, &indices::LEFT_IRIS, left_iris);

    // nose tip, mouth corners, chin (eye corners 33/263 are set above)
    points[1] = Landmark::new(0.50, 0.50, 0.0);
    points[61] = Landmark::new(0.44, 0.60, 0.0);
    points[291] = Landmark::new(0.56, 0.60, 0.0);
    points[199] = Landmark::new(0.50, 0.70, 0.0);

    // Indices are all in range and the size matches
    LandmarkSet::new(points, 640, 480).unwrap()
}
