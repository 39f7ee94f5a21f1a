// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Versioned JSON documents for sketches.
//!
//! Live entities are written with sequential integer ids; face groups are
//! identified by their joined face ids. Fields whose default depends on the
//! document version (point kind, face tags, group connect mode) are optional
//! in the record shapes so that older documents parse, but the loader
//! requires them: filling them in is the job of document migration, which
//! runs on the records before [`Sketch::from_document`].

use std::collections::BTreeSet;

use planscape_geometry::{CurveGeometry, ParamRange};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::arena::*;
use crate::error::{Error, Result};
use crate::face_group::GROUP_ID_SEPARATOR;
use crate::keys::*;
use crate::point::PointKind;

/// Document format version written by [`Sketch::to_document`].
pub const DOCUMENT_VERSION: &str = "2.1";

/// Serializable representation of a whole sketch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentData {
    pub version: String,
    #[serde(default)]
    pub points: Vec<PointRecord>,
    #[serde(default)]
    pub curves: Vec<CurveRecord>,
    #[serde(default)]
    pub loops: Vec<LoopRecord>,
    #[serde(default)]
    pub faces: Vec<FaceRecord>,
    #[serde(default)]
    pub face_groups: Vec<FaceGroupRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PointKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveRecord {
    pub id: usize,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub geometry: CurveGeometry,
    #[serde(default)]
    pub range: ParamRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopRecord {
    pub id: usize,
    pub curves: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceRecord {
    /// Document face id.
    pub id: String,
    pub outer: usize,
    #[serde(default)]
    pub inner: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceGroupRecord {
    /// Member face ids joined with `;` (`-` in legacy documents).
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_mode: Option<ConnectMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound_map: Option<BoundMap>,
}

/// Any persisted record, as seen by per-record migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity")]
pub enum EntityRecord {
    Point(PointRecord),
    Curve(CurveRecord),
    Loop(LoopRecord),
    Face(FaceRecord),
    FaceGroup(FaceGroupRecord),
}

impl EntityRecord {
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityRecord::Point(_) => EntityType::Point,
            EntityRecord::Curve(_) => EntityType::Curve,
            EntityRecord::Loop(_) => EntityType::Loop,
            EntityRecord::Face(_) => EntityType::Face,
            EntityRecord::FaceGroup(_) => EntityType::FaceGroup,
        }
    }

    /// The record's id as written in the document.
    pub fn record_id(&self) -> String {
        match self {
            EntityRecord::Point(r) => r.id.to_string(),
            EntityRecord::Curve(r) => r.id.to_string(),
            EntityRecord::Loop(r) => r.id.to_string(),
            EntityRecord::Face(r) => r.id.clone(),
            EntityRecord::FaceGroup(r) => r.id.clone(),
        }
    }
}

impl DocumentData {
    /// Splits a document into its version and its records, leaf first.
    pub fn into_records(self) -> (String, Vec<EntityRecord>) {
        let records = self
            .points
            .into_iter()
            .map(EntityRecord::Point)
            .chain(self.curves.into_iter().map(EntityRecord::Curve))
            .chain(self.loops.into_iter().map(EntityRecord::Loop))
            .chain(self.faces.into_iter().map(EntityRecord::Face))
            .chain(self.face_groups.into_iter().map(EntityRecord::FaceGroup))
            .collect();
        (self.version, records)
    }

    /// Reassembles a document from records in any order.
    pub fn from_records(version: String, records: Vec<EntityRecord>) -> Self {
        let mut doc = DocumentData {
            version,
            points: Vec::new(),
            curves: Vec::new(),
            loops: Vec::new(),
            faces: Vec::new(),
            face_groups: Vec::new(),
        };
        for record in records {
            match record {
                EntityRecord::Point(r) => doc.points.push(r),
                EntityRecord::Curve(r) => doc.curves.push(r),
                EntityRecord::Loop(r) => doc.loops.push(r),
                EntityRecord::Face(r) => doc.faces.push(r),
                EntityRecord::FaceGroup(r) => doc.face_groups.push(r),
            }
        }
        doc
    }
}

fn lookup<K: Copy>(
    ids: &FxHashMap<usize, K>,
    id: usize,
    entity: &'static str,
    target: &'static str,
) -> Result<K> {
    ids.get(&id).copied().ok_or(Error::DanglingReference {
        entity,
        target,
        id: id.to_string(),
    })
}

impl Sketch {
    /// Serializes the sketch to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        let document = self.to_document()?;
        serde_json::to_string_pretty(&document).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserializes a current-version document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: DocumentData =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::from_document(&document)
    }

    /// Creates a document from the live entities.
    ///
    /// Slot map keys are mapped to sequential integer ids. Cached group
    /// bounds are written when present.
    pub fn to_document(&self) -> Result<DocumentData> {
        let mut point_ids = FxHashMap::default();
        let mut curve_ids = FxHashMap::default();
        let mut loop_ids = FxHashMap::default();

        let points: Vec<PointRecord> = self
            .points
            .iter()
            .filter(|(k, _)| !self.is_retired((*k).into()))
            .enumerate()
            .map(|(i, (k, p))| {
                point_ids.insert(k, i);
                PointRecord {
                    id: i,
                    x: p.x,
                    y: p.y,
                    kind: Some(p.kind),
                }
            })
            .collect();

        let mut curves = Vec::new();
        for (k, c) in self.curves.iter().filter(|(k, _)| !self.is_retired((*k).into())) {
            let id = curves.len();
            curve_ids.insert(k, id);
            curves.push(CurveRecord {
                id,
                start: exported(&point_ids, c.start, "Curve", "point")?,
                end: exported(&point_ids, c.end, "Curve", "point")?,
                geometry: c.geometry,
                range: c.range,
            });
        }

        let mut loops = Vec::new();
        for (k, l) in self.loops.iter().filter(|(k, _)| !self.is_retired((*k).into())) {
            let id = loops.len();
            loop_ids.insert(k, id);
            loops.push(LoopRecord {
                id,
                curves: l
                    .coedges
                    .iter()
                    .map(|ce| exported(&curve_ids, ce.curve, "Loop", "curve"))
                    .collect::<Result<_>>()?,
            });
        }

        let mut faces = Vec::new();
        for (_, f) in self.faces.iter().filter(|(k, _)| !self.is_retired((*k).into())) {
            faces.push(FaceRecord {
                id: f.id.clone(),
                outer: exported(&loop_ids, f.outer, "Face", "loop")?,
                inner: f
                    .inner
                    .iter()
                    .map(|&lk| exported(&loop_ids, lk, "Face", "loop"))
                    .collect::<Result<_>>()?,
                tags: Some(f.tags.clone()),
            });
        }

        let mut face_groups = Vec::new();
        for (k, g) in self
            .face_groups
            .iter()
            .filter(|(k, _)| !self.is_retired((*k).into()))
        {
            face_groups.push(FaceGroupRecord {
                id: self.face_group_id(k)?,
                connect_mode: Some(g.connect_mode),
                bound_map: g.bounds.clone(),
            });
        }

        Ok(DocumentData {
            version: DOCUMENT_VERSION.to_string(),
            points,
            curves,
            loops,
            faces,
            face_groups,
        })
    }

    /// Rebuilds a sketch from a migrated document.
    ///
    /// Every entity goes through the regular construction checks. A bound
    /// map is kept as the group's cache only when it covers exactly the
    /// group's members.
    pub fn from_document(doc: &DocumentData) -> Result<Self> {
        let mut sketch = Sketch::new();

        let mut point_keys = FxHashMap::default();
        for pr in &doc.points {
            let kind = pr.kind.ok_or_else(|| Error::MissingField {
                entity: "Point",
                id: pr.id.to_string(),
                field: "kind",
            })?;
            point_keys.insert(pr.id, sketch.add_point([pr.x, pr.y], kind));
        }

        let mut curve_keys = FxHashMap::default();
        for cr in &doc.curves {
            let range = ParamRange::new(cr.range.from, cr.range.to)?;
            let key = sketch.insert_curve(CurveData {
                start: lookup(&point_keys, cr.start, "Curve", "point")?,
                end: lookup(&point_keys, cr.end, "Curve", "point")?,
                geometry: cr.geometry,
                range,
            });
            curve_keys.insert(cr.id, key);
        }

        let mut loop_keys = FxHashMap::default();
        for lr in &doc.loops {
            let curves = lr
                .curves
                .iter()
                .map(|&id| lookup(&curve_keys, id, "Loop", "curve"))
                .collect::<Result<Vec<_>>>()?;
            loop_keys.insert(lr.id, sketch.add_loop(&curves)?);
        }

        for fr in &doc.faces {
            let tags = fr.tags.clone().ok_or_else(|| Error::MissingField {
                entity: "Face",
                id: fr.id.clone(),
                field: "tags",
            })?;
            let outer = lookup(&loop_keys, fr.outer, "Face", "loop")?;
            let inner = fr
                .inner
                .iter()
                .map(|&id| lookup(&loop_keys, id, "Face", "loop"))
                .collect::<Result<Vec<_>>>()?;
            sketch.add_face(outer, &inner, &fr.id, tags)?;
        }

        for gr in &doc.face_groups {
            let mode = gr.connect_mode.ok_or_else(|| Error::MissingField {
                entity: "FaceGroup",
                id: gr.id.clone(),
                field: "connect_mode",
            })?;
            let members = gr
                .id
                .split(GROUP_ID_SEPARATOR)
                .map(|face_id| {
                    sketch.face_by_id(face_id).ok_or_else(|| Error::DanglingReference {
                        entity: "FaceGroup",
                        target: "face",
                        id: face_id.to_string(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let key = sketch.add_face_group(&members, mode)?;

            if let Some(bounds) = &gr.bound_map {
                let covers_members = bounds.len() == members.len()
                    && gr
                        .id
                        .split(GROUP_ID_SEPARATOR)
                        .all(|face_id| bounds.contains_key(face_id));
                if covers_members {
                    sketch.face_groups[key].bounds = Some(bounds.clone());
                }
            }
        }

        Ok(sketch)
    }
}

fn exported<K: std::hash::Hash + Eq + std::fmt::Debug>(
    ids: &FxHashMap<K, usize>,
    key: K,
    entity: &'static str,
    target: &'static str,
) -> Result<usize> {
    ids.get(&key).copied().ok_or_else(|| Error::DanglingReference {
        entity,
        target,
        id: format!("{key:?}"),
    })
}
