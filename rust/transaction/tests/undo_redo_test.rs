// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Undo/redo symmetry over random edit sequences, and the JSON command path.

use std::collections::BTreeSet;

use planscape_topology::{make_rectangle, ConnectMode, DocumentData, PointKind, Sketch};
use planscape_transaction::request::{
    CreateFaceGroup, DeleteFaceGroup, MoveFace, MovePoint, SetFaceTags, SetPointKind, SplitCurve,
};
use planscape_transaction::{Error, Request, TransactionManager};
use proptest::prelude::*;
use serde_json::json;

const KINDS: [PointKind; 4] = [
    PointKind::Common,
    PointKind::Corner,
    PointKind::Intersection,
    PointKind::Control,
];
const TAGS: [&str; 3] = ["region", "wall", "void"];

#[derive(Debug, Clone)]
enum Edit {
    MovePoint { point: usize, x: f64, y: f64 },
    SetPointKind { point: usize, kind: usize },
    MoveFace { face: usize, dx: f64, dy: f64 },
    SetFaceTags { face: usize, mask: u8 },
    SplitCurve { curve: usize, at: f64 },
    Group { first: usize, second: usize },
    Ungroup { face: usize },
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0..32usize, -10.0..10.0f64, -10.0..10.0f64)
            .prop_map(|(point, x, y)| Edit::MovePoint { point, x, y }),
        (0..32usize, 0..4usize).prop_map(|(point, kind)| Edit::SetPointKind { point, kind }),
        (0..8usize, -3.0..3.0f64, -3.0..3.0f64)
            .prop_map(|(face, dx, dy)| Edit::MoveFace { face, dx, dy }),
        (0..8usize, 0..8u8).prop_map(|(face, mask)| Edit::SetFaceTags { face, mask }),
        (0..32usize, 0.1..0.9f64).prop_map(|(curve, at)| Edit::SplitCurve { curve, at }),
        (0..8usize, 0..8usize).prop_map(|(first, second)| Edit::Group { first, second }),
        (0..8usize).prop_map(|face| Edit::Ungroup { face }),
    ]
}

fn floor_plan() -> Sketch {
    let mut sketch = Sketch::new();
    make_rectangle(&mut sketch, [0.0, 0.0], [2.0, 2.0], "hall").unwrap();
    make_rectangle(&mut sketch, [2.0, 0.0], [4.0, 1.0], "bath").unwrap();
    make_rectangle(&mut sketch, [6.0, 0.0], [8.0, 3.0], "shed").unwrap();
    make_rectangle(&mut sketch, [0.0, 5.0], [1.0, 6.0], "porch").unwrap();
    sketch
}

/// Resolves an edit against the entities live right now.
fn to_request(sketch: &Sketch, edit: &Edit) -> Option<Request> {
    let faces = sketch.get_all_faces();
    let curves = sketch.get_all_curves();
    let points = sketch.get_all_points_from_faces(&faces).ok()?;
    let pick = |len: usize, i: usize| (len > 0).then(|| i % len);

    Some(match *edit {
        Edit::MovePoint { point, x, y } => {
            MovePoint::new(points[pick(points.len(), point)?], [x, y]).into()
        }
        Edit::SetPointKind { point, kind } => {
            SetPointKind::new(points[pick(points.len(), point)?], KINDS[kind]).into()
        }
        Edit::MoveFace { face, dx, dy } => {
            MoveFace::new(faces[pick(faces.len(), face)?], [dx, dy]).into()
        }
        Edit::SetFaceTags { face, mask } => {
            let tags: BTreeSet<String> = TAGS
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, t)| t.to_string())
                .collect();
            SetFaceTags::new(faces[pick(faces.len(), face)?], tags).into()
        }
        Edit::SplitCurve { curve, at } => {
            let key = curves[pick(curves.len(), curve)?];
            let range = sketch.curve(key)?.range;
            let position = range.from + at * (range.to - range.from);
            SplitCurve::new(key, vec![position]).into()
        }
        Edit::Group { first, second } => {
            let a = faces[pick(faces.len(), first)?];
            let b = faces[pick(faces.len(), second)?];
            CreateFaceGroup::new(vec![a, b], ConnectMode::Horizontal).into()
        }
        Edit::Ungroup { face } => {
            let group = sketch.group_of_face(faces[pick(faces.len(), face)?])?;
            DeleteFaceGroup::new(group).into()
        }
    })
}

/// Document state without the derived bound cache.
fn transactable_state(sketch: &Sketch) -> DocumentData {
    let mut doc = sketch.to_document().unwrap();
    for group in &mut doc.face_groups {
        group.bound_map = None;
    }
    doc
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn undo_all_then_redo_all_is_symmetric(edits in prop::collection::vec(edit(), 1..16)) {
        let mut sketch = floor_plan();
        let mut manager = TransactionManager::default();
        let initial = transactable_state(&sketch);

        for edit in &edits {
            if let Some(request) = to_request(&sketch, edit) {
                // Refusals and rejected arguments are part of the property
                let _ = manager.commit(&mut sketch, request);
            }
        }
        let edited = transactable_state(&sketch);
        let steps = manager.undo_len();

        while manager.undo(&mut sketch).unwrap() {}
        prop_assert_eq!(&transactable_state(&sketch), &initial);
        prop_assert_eq!(manager.redo_len(), steps);

        while manager.redo(&mut sketch).unwrap() {}
        prop_assert_eq!(&transactable_state(&sketch), &edited);
    }

    #[test]
    fn single_undo_restores_previous_state(edits in prop::collection::vec(edit(), 1..8)) {
        let mut sketch = floor_plan();
        let mut manager = TransactionManager::default();

        for edit in &edits {
            let before = transactable_state(&sketch);
            let Some(request) = to_request(&sketch, edit) else { continue };
            if let Ok(outcome) = manager.commit(&mut sketch, request) {
                if outcome.is_committed() {
                    manager.undo(&mut sketch).unwrap();
                    prop_assert_eq!(&transactable_state(&sketch), &before);
                    manager.redo(&mut sketch).unwrap();
                } else {
                    prop_assert_eq!(&transactable_state(&sketch), &before);
                }
            } else {
                prop_assert_eq!(&transactable_state(&sketch), &before);
            }
        }
    }
}

#[test]
fn json_commands_drive_split_and_undo() {
    let mut sketch = Sketch::new();
    let (_, lp, [bottom, ..]) =
        make_rectangle(&mut sketch, [0.0, 0.0], [4.0, 1.0], "a").unwrap();
    let mut manager = TransactionManager::default();

    let request = manager
        .create_request(
            "SplitCurve",
            json!({ "curve": bottom, "positions": [0.25, 0.5, 0.75] }),
        )
        .unwrap();
    assert_eq!(request.description(), "Split curve at 3 position(s)");
    manager.commit(&mut sketch, request).unwrap();
    assert_eq!(sketch.loop_data(lp).unwrap().coedges.len(), 7);
    assert!(sketch.find_point([3.0, 0.0]).is_some());

    manager.undo(&mut sketch).unwrap();
    assert_eq!(sketch.loop_data(lp).unwrap().coedges.len(), 4);
    assert!(sketch.find_point([3.0, 0.0]).is_none());
    assert_eq!(
        manager.redo_description().as_deref(),
        Some("Split curve at 3 position(s)")
    );

    manager.redo(&mut sketch).unwrap();
    assert_eq!(sketch.loop_data(lp).unwrap().coedges.len(), 7);
}

#[test]
fn unknown_request_type_is_a_hard_error() {
    let manager = TransactionManager::default();
    let err = manager.create_request("Teleport", json!({})).unwrap_err();
    assert!(matches!(err, Error::UnknownRequestType(name) if name == "Teleport"));
}

#[test]
fn move_face_through_the_manager() {
    let mut sketch = floor_plan();
    let shed = sketch.face_by_id("shed").unwrap();
    let hall = sketch.face_by_id("hall").unwrap();
    let mut manager = TransactionManager::default();

    let outcome = manager
        .commit(&mut sketch, MoveFace::new(hall, [1.0, 0.0]))
        .unwrap();
    assert!(!outcome.is_committed());
    assert!(!manager.can_undo());

    let outcome = manager
        .commit(&mut sketch, MoveFace::new(shed, [0.0, 1.0]))
        .unwrap();
    assert!(outcome.is_committed());
    assert!(sketch.find_point([8.0, 4.0]).is_some());
    assert_eq!(
        manager.undo_description().as_deref(),
        Some("Move face by (0, 1)")
    );
}
