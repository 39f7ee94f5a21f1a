// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face group ids and the lazily rebuilt bound cache.

use nalgebra::Point2;
use planscape_geometry::polygon::contour_bounds;

use crate::arena::*;
use crate::error::{Error, Result};
use crate::keys::*;

/// Separator between member face ids in a group id.
pub const GROUP_ID_SEPARATOR: &str = ";";

impl Sketch {
    /// Group id: member face ids joined with `;`, in member order.
    pub fn face_group_id(&self, key: FaceGroupKey) -> Result<String> {
        let group = self.live_face_group(key)?;
        let ids = group
            .members
            .iter()
            .map(|&fk| {
                self.faces
                    .get(fk)
                    .map(|f| f.id.as_str())
                    .ok_or(Error::FaceNotFound(fk))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ids.join(GROUP_ID_SEPARATOR))
    }

    /// Bound map of a group, rebuilt first if it was invalidated.
    pub fn face_group_bounds(&mut self, key: FaceGroupKey) -> Result<&BoundMap> {
        let group = self.live_face_group(key)?;
        if group.bounds.is_none() {
            let bounds = self.compute_bounds(&group.members)?;
            tracing::trace!(members = bounds.len(), "face group bounds rebuilt");
            self.face_groups[key].bounds = Some(bounds);
        }
        self.face_groups[key]
            .bounds
            .as_ref()
            .ok_or(Error::FaceGroupNotFound(key))
    }

    /// Current cache content without rebuilding; `None` after invalidation.
    pub fn cached_bounds(&self, key: FaceGroupKey) -> Option<&BoundMap> {
        self.face_group(key)?.bounds.as_ref()
    }

    /// Axis-aligned box of a face's outer loop.
    pub fn face_bounds(&self, face: FaceKey) -> Result<(Point2<f64>, Point2<f64>)> {
        let outline = self.face_loop_points(face)?;
        contour_bounds(&outline).ok_or(Error::DegenerateFace)
    }

    fn compute_bounds(&self, members: &[FaceKey]) -> Result<BoundMap> {
        let mut boxes = Vec::with_capacity(members.len());
        for &fk in members {
            let (min, max) = self.face_bounds(fk)?;
            boxes.push((self.live_face(fk)?.id.clone(), min, max));
        }

        let Some((_, first_min, first_max)) = boxes.first() else {
            return Err(Error::EmptyFaceGroup);
        };
        let (mut group_min, mut group_max) = (*first_min, *first_max);
        for (_, min, max) in &boxes[1..] {
            group_min = group_min.inf(min);
            group_max = group_max.sup(max);
        }

        Ok(boxes
            .into_iter()
            .map(|(id, min, max)| {
                (
                    id,
                    FaceGroupBound {
                        left: min.x - group_min.x,
                        top: group_max.y - max.y,
                        width: max.x - min.x,
                        height: max.y - min.y,
                    },
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::make_rectangle;
    use approx::assert_relative_eq;

    fn two_rooms() -> (Sketch, FaceKey, FaceKey, FaceGroupKey) {
        let mut sketch = Sketch::new();
        let (a, _, _) = make_rectangle(&mut sketch, [0.0, 0.0], [2.0, 1.0], "a").unwrap();
        let (b, _, _) = make_rectangle(&mut sketch, [2.0, 0.0], [3.0, 3.0], "b").unwrap();
        let g = sketch.add_face_group(&[a, b], ConnectMode::Horizontal).unwrap();
        (sketch, a, b, g)
    }

    #[test]
    fn group_id_joins_member_ids() {
        let (sketch, _, _, g) = two_rooms();
        assert_eq!(sketch.face_group_id(g).unwrap(), "a;b");
    }

    #[test]
    fn bounds_are_relative_to_group_box() {
        let (mut sketch, _, _, g) = two_rooms();
        assert!(sketch.cached_bounds(g).is_none());

        let bounds = sketch.face_group_bounds(g).unwrap().clone();
        let a = bounds["a"];
        assert_relative_eq!(a.left, 0.0);
        assert_relative_eq!(a.top, 2.0);
        assert_relative_eq!(a.width, 2.0);
        assert_relative_eq!(a.height, 1.0);

        let b = bounds["b"];
        assert_relative_eq!(b.left, 2.0);
        assert_relative_eq!(b.top, 0.0);
        assert_relative_eq!(b.height, 3.0);

        assert_eq!(sketch.cached_bounds(g), Some(&bounds));
    }

    #[test]
    fn membership_change_rebuilds_on_next_read() {
        let (mut sketch, a, _, g) = two_rooms();
        sketch.face_group_bounds(g).unwrap();

        sketch.remove_group_member(g, a).unwrap();
        assert!(sketch.cached_bounds(g).is_none());

        let bounds = sketch.face_group_bounds(g).unwrap();
        assert_eq!(bounds.len(), 1);
        assert_relative_eq!(bounds["b"].left, 0.0);
    }

    #[test]
    fn member_geometry_change_is_never_stale() {
        let (mut sketch, _, b, g) = two_rooms();
        sketch.face_group_bounds(g).unwrap();

        let corner = sketch.find_point([3.0, 3.0]).unwrap();
        sketch.set_point_position(corner, [5.0, 3.0]).unwrap();
        assert!(sketch.face_bounds(b).unwrap().1.x > 4.9);

        let bounds = sketch.face_group_bounds(g).unwrap();
        assert_relative_eq!(bounds["b"].width, 3.0);
    }
}
