use crate::constants::Degree;

/// Normalize a compass course to [0, 360).
///
/// Argument
/// --------
/// * `course`: a bearing in degrees, possibly outside the compass range
///
/// Return
/// ------
/// * the same bearing wrapped into [0, 360)
pub fn normalize_course(course: Degree) -> Degree {
    let wrapped = course.rem_euclid(360.0);
    if wrapped == 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Normalize a true wind angle to [-180, 180].
///
/// Positive sign means starboard tack. NaN input stays NaN.
pub fn normalize_twa(twa: Degree) -> Degree {
    if twa.is_nan() {
        return twa;
    }
    let mut wrapped = twa.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped -= 360.0;
    }
    wrapped
}

/// Absolute delta between two targets with a single 360-degree fold.
///
/// This is the crude wrap the simplification pass applies to both course and
/// TWA differences before comparing against the merge thresholds.
pub fn wrap_delta(a: Degree, b: Degree) -> Degree {
    let mut delta = (a - b).abs();
    if delta > 360.0 {
        delta -= 360.0;
    }
    delta
}

/// Sign of a true wind angle: 1.0 for starboard tack, -1.0 for port.
pub fn tack_sign(twa: Degree) -> f64 {
    if twa > 0.0 {
        1.0
    } else {
        -1.0
    }
}
