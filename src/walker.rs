//! Odometer traversal over the leading dimensions.
//!
//! The coordinate is treated as a mixed-radix number whose digit `i` has radix
//! `shape[i]`. Advancing increments the last (fastest-varying) digit and
//! carries into slower digits on overflow. The maximum coordinate does not
//! wrap around.

use crate::viewer::{StepRequest, Viewer};

/// Increment `coord` in place. Returns false, leaving `coord` untouched, when
/// it is already the maximum coordinate of `shape`.
pub fn increment(coord: &mut [usize], shape: &[usize]) -> bool {
    if is_last(coord, shape) {
        return false;
    }

    for axis in (0..coord.len()).rev() {
        if coord[axis] + 1 < shape[axis] {
            coord[axis] += 1;
            return true;
        }
        coord[axis] = 0;
    }

    true
}

/// Whether every index of `coord` is at the maximum of its dimension.
pub fn is_last(coord: &[usize], shape: &[usize]) -> bool {
    coord
        .iter()
        .zip(shape)
        .all(|(&c, &s)| c + 1 >= s)
}

/// The coordinate after `coord`, or None at the end of traversal.
pub fn next_coordinate(coord: &[usize], shape: &[usize]) -> Option<Vec<usize>> {
    let mut next = coord.to_vec();
    increment(&mut next, shape).then_some(next)
}

/// Viewer step requests that move `coord` to its successor.
///
/// The fastest axis is incremented; every axis that overflows is reset to zero
/// first and its carry moves to the next slower axis.
pub fn odometer_steps(coord: &[usize], shape: &[usize]) -> Option<Vec<(usize, StepRequest)>> {
    if is_last(coord, shape) {
        return None;
    }

    let mut steps = Vec::new();
    for axis in (0..coord.len()).rev() {
        if coord[axis] + 1 < shape[axis] {
            steps.push((axis, StepRequest::Increment));
            break;
        }
        steps.push((axis, StepRequest::Set(0)));
    }

    Some(steps)
}

/// Advance the viewer one coordinate. Returns the new coordinate, or None when
/// traversal is exhausted.
pub fn advance(viewer: &mut dyn Viewer, coord: &[usize], shape: &[usize]) -> Option<Vec<usize>> {
    let steps = odometer_steps(coord, shape)?;
    for (axis, request) in steps {
        log::debug!("Viewer step: axis {} {:?}", axis, request);
        viewer.step(axis, request);
    }
    next_coordinate(coord, shape)
}
