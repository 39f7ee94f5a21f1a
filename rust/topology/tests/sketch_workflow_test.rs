// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Editing a small floor plan through the arena API.

use approx::assert_relative_eq;
use planscape_geometry::CurveGeometry;
use planscape_topology::{make_rectangle, ConnectMode, EntityKey, PointKind, Sketch};
use proptest::prelude::*;

#[test]
fn splitting_a_shared_wall_rewires_both_rooms() {
    let mut sketch = Sketch::new();
    let (left, left_loop, _) = make_rectangle(&mut sketch, [0.0, 0.0], [2.0, 2.0], "left").unwrap();
    let (right, right_loop, right_curves) =
        make_rectangle(&mut sketch, [2.0, 0.0], [4.0, 2.0], "right").unwrap();

    // Make the left room run through the right room's wall.
    let wall = right_curves[3];
    let left_wall = sketch.loop_data(left_loop).unwrap().coedges[1].curve;
    let mut coedges = sketch.loop_data(left_loop).unwrap().coedges.clone();
    coedges[1].curve = wall;
    coedges[1].reversed = !coedges[1].reversed;
    sketch.set_loop_coedges(left_loop, coedges).unwrap();
    sketch.retire(left_wall.into()).unwrap();

    let split = sketch.split_curve(wall, &[0.5]).unwrap();
    assert_eq!(split.loops.len(), 2);
    assert_eq!(sketch.loop_data(left_loop).unwrap().coedges.len(), 5);
    assert_eq!(sketch.loop_data(right_loop).unwrap().coedges.len(), 5);

    let mid = split.points[0];
    assert_eq!(sketch.point(mid).unwrap().coords(), [2.0, 1.0]);
    assert_eq!(sketch.get_all_edges_by_points(&[mid])[0].len(), 2);

    assert_relative_eq!(sketch.face_area(left).unwrap(), 4.0, epsilon = 1e-9);
    assert_relative_eq!(sketch.face_area(right).unwrap(), 4.0, epsilon = 1e-9);
}

#[test]
fn arc_face_triangulates() {
    let mut sketch = Sketch::new();
    let a = sketch.add_point([1.0, 0.0], PointKind::Corner);
    let b = sketch.add_point([-1.0, 0.0], PointKind::Corner);
    let arc = sketch
        .add_curve_with_geometry(
            a,
            b,
            CurveGeometry::Arc {
                center: [0.0, 0.0],
                ccw: true,
            },
        )
        .unwrap();
    let chord = sketch.add_curve(b, a).unwrap();
    let lp = sketch.add_loop(&[arc, chord]).unwrap();
    let face = sketch
        .add_face(lp, &[], "dome", Default::default())
        .unwrap();

    let half_disc = std::f64::consts::PI / 2.0;
    let area = sketch.face_area(face).unwrap();
    assert!(area < half_disc && area > half_disc * 0.99, "{area}");
    assert_relative_eq!(
        sketch.triangulate_face(face).unwrap().area(),
        area,
        epsilon = 1e-9
    );
}

#[test]
fn document_round_trip_keeps_split_ranges() {
    let mut sketch = Sketch::new();
    let (a, _, [bottom, ..]) = make_rectangle(&mut sketch, [0.0, 0.0], [4.0, 1.0], "a").unwrap();
    let (b, _, _) = make_rectangle(&mut sketch, [0.0, 1.0], [4.0, 3.0], "b").unwrap();
    let group = sketch.add_face_group(&[a, b], ConnectMode::Vertical).unwrap();
    sketch.face_group_bounds(group).unwrap();
    let split = sketch.split_curve(bottom, &[0.25, 0.75]).unwrap();

    let json = sketch.to_json().unwrap();
    let restored = Sketch::from_json(&json).unwrap();

    assert_eq!(restored.to_document().unwrap(), sketch.to_document().unwrap());
    assert_eq!(restored.curve_count(), sketch.curve_count());

    let ranges: Vec<_> = split
        .curves
        .iter()
        .map(|&ck| sketch.curve(ck).unwrap().range)
        .collect();
    assert_relative_eq!(ranges[1].from, 0.25);
    assert_relative_eq!(ranges[1].to, 0.75);

    let restored_group = restored.group_of_face(restored.face_by_id("b").unwrap()).unwrap();
    assert_eq!(restored.face_group_id(restored_group).unwrap(), "a;b");
}

#[test]
fn purge_runs_parts_last() {
    let mut sketch = Sketch::new();
    let (face, lp, curves) = make_rectangle(&mut sketch, [0.0, 0.0], [1.0, 1.0], "a").unwrap();

    for key in [EntityKey::from(face), lp.into()] {
        sketch.retire(key).unwrap();
    }
    assert!(sketch.purge(lp.into()).is_err());
    sketch.purge(face.into()).unwrap();
    sketch.purge(lp.into()).unwrap();

    for &ck in &curves {
        sketch.retire(ck.into()).unwrap();
        sketch.purge(ck.into()).unwrap();
    }
    assert_eq!(sketch.slot_count(), 4);
    assert_eq!(sketch.point_count(), 4);
}

proptest! {
    #[test]
    fn split_pieces_cover_the_parent(cuts in prop::collection::btree_set(1u32..1000, 1..6)) {
        let positions: Vec<f64> = cuts
            .into_iter()
            .map(|c| c as f64 / 1000.0)
            .collect();

        let mut sketch = Sketch::new();
        let (face, _, [bottom, ..]) =
            make_rectangle(&mut sketch, [0.0, 0.0], [10.0, 2.0], "a").unwrap();
        let split = sketch.split_curve(bottom, &positions).unwrap();

        prop_assert_eq!(split.curves.len(), positions.len() + 1);
        let mut at = 0.0;
        for &ck in &split.curves {
            let range = sketch.curve(ck).unwrap().range;
            prop_assert_eq!(range.from, at);
            at = range.to;
        }
        prop_assert_eq!(at, 1.0);
        prop_assert!((sketch.face_area(face).unwrap() - 20.0).abs() < 1e-9);
    }
}
