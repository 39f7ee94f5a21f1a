// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Record and document upgrades.
//!
//! Missing optional fields are filled in by shape. Ids are renamed through
//! the id map only for documents older than [`DocumentVersion::SEMICOLON_IDS`],
//! faces and group components alike, and a map whose targets are themselves
//! mapped is refused. Feeding already-migrated records through again
//! therefore changes nothing.

use std::collections::BTreeSet;

use planscape_topology::{
    validate_face_id, ConnectMode, DocumentData, EntityRecord, EntityType, FaceGroupBound,
    FaceGroupRecord, FaceRecord, PointKind, Sketch, GROUP_ID_SEPARATOR,
};

use crate::context::{EntityIdMap, MigrationContext};
use crate::error::{MigrationError, Result};
use crate::version::DocumentVersion;

/// Separator used by group ids before [`DocumentVersion::SEMICOLON_IDS`].
pub const LEGACY_GROUP_ID_SEPARATOR: &str = "-";

/// Tag given to faces from documents that predate topology tags.
pub const LEGACY_FACE_TAG: &str = "region";

/// Upgrades a single persisted record to the current shape.
pub fn migrate(record: EntityRecord, ctx: &MigrationContext) -> Result<EntityRecord> {
    let version = document_version(&record, ctx)?;
    Ok(match record {
        EntityRecord::Point(mut point) => {
            point.kind.get_or_insert(PointKind::Common);
            EntityRecord::Point(point)
        }
        EntityRecord::Face(face) => EntityRecord::Face(migrate_face(face, version, ctx)?),
        EntityRecord::FaceGroup(group) => {
            EntityRecord::FaceGroup(migrate_face_group(group, version, ctx)?)
        }
        other @ (EntityRecord::Curve(_) | EntityRecord::Loop(_)) => other,
    })
}

/// Upgrades a whole document and stamps it with the current version.
pub fn migrate_document(document: DocumentData, entity_id_map: &EntityIdMap) -> Result<DocumentData> {
    let (version, records) = document.into_records();
    let ctx = MigrationContext::new(version, entity_id_map.clone());
    let count = records.len();

    let records = records
        .into_iter()
        .map(|record| migrate(record, &ctx))
        .collect::<Result<Vec<_>>>()?;

    let current = DocumentVersion::CURRENT.to_string();
    tracing::info!(
        from = %ctx.version,
        to = %current,
        records = count,
        "document migrated"
    );
    Ok(DocumentData::from_records(current, records))
}

/// Parses, migrates and rebuilds a document in one go.
pub fn load_document(json: &str, entity_id_map: &EntityIdMap) -> Result<Sketch> {
    let document: DocumentData = serde_json::from_str(json)?;
    let document = migrate_document(document, entity_id_map)?;
    Ok(Sketch::from_document(&document)?)
}

fn document_version(record: &EntityRecord, ctx: &MigrationContext) -> Result<DocumentVersion> {
    let version: DocumentVersion =
        ctx.version
            .parse()
            .map_err(|_| MigrationError::InvalidVersion {
                entity: record.entity_type(),
                id: record.record_id(),
                version: ctx.version.clone(),
            })?;
    if version > DocumentVersion::CURRENT {
        return Err(MigrationError::FutureVersion {
            entity: record.entity_type(),
            id: record.record_id(),
            version: ctx.version.clone(),
            supported: DocumentVersion::CURRENT.to_string(),
        });
    }
    Ok(version)
}

fn migrate_face(
    mut face: FaceRecord,
    version: DocumentVersion,
    ctx: &MigrationContext,
) -> Result<FaceRecord> {
    if renames_ids(version) {
        if let Some(mapped) = ctx.mapped(&face.id) {
            check_mapped(EntityType::Face, &face.id, &face.id, mapped, ctx)?;
            face.id = mapped.to_string();
        }
    }
    face.tags.get_or_insert_with(|| {
        if version < DocumentVersion::TAGS {
            BTreeSet::from([LEGACY_FACE_TAG.to_string()])
        } else {
            BTreeSet::new()
        }
    });
    Ok(face)
}

fn migrate_face_group(
    mut group: FaceGroupRecord,
    version: DocumentVersion,
    ctx: &MigrationContext,
) -> Result<FaceGroupRecord> {
    let hyphenated = group.id.contains(LEGACY_GROUP_ID_SEPARATOR);
    if hyphenated && group.id.contains(GROUP_ID_SEPARATOR) {
        return Err(MigrationError::MixedSeparators {
            entity: EntityType::FaceGroup,
            id: group.id,
            version: ctx.version.clone(),
        });
    }

    let separator = if hyphenated {
        LEGACY_GROUP_ID_SEPARATOR
    } else {
        GROUP_ID_SEPARATOR
    };
    let components: Vec<&str> = group.id.split(separator).collect();
    if components.iter().any(|c| c.is_empty()) {
        return Err(MigrationError::EmptyIdComponent {
            entity: EntityType::FaceGroup,
            id: group.id.clone(),
            version: ctx.version.clone(),
        });
    }

    if hyphenated || renames_ids(version) {
        let rename = renames_ids(version);
        let remapped = components
            .iter()
            .map(|&c| remap(c, &group.id, rename, ctx))
            .collect::<Result<Vec<_>>>()?
            .join(GROUP_ID_SEPARATOR);

        if let Some(bounds) = group.bound_map.take() {
            let bounds = bounds
                .into_iter()
                .map(|(key, bound)| -> Result<(String, FaceGroupBound)> {
                    Ok((remap(&key, &group.id, rename, ctx)?, bound))
                })
                .collect::<Result<_>>()?;
            group.bound_map = Some(bounds);
        }
        group.id = remapped;
    }

    group.connect_mode.get_or_insert(if version < DocumentVersion::CONNECT_MODE {
        ConnectMode::Free
    } else {
        ConnectMode::Horizontal
    });
    Ok(group)
}

/// Face ids were reissued when group ids switched to `;`; later documents
/// already carry the new ids.
fn renames_ids(version: DocumentVersion) -> bool {
    version < DocumentVersion::SEMICOLON_IDS
}

fn remap(component: &str, group_id: &str, rename: bool, ctx: &MigrationContext) -> Result<String> {
    match ctx.mapped(component).filter(|_| rename) {
        Some(mapped) => {
            check_mapped(EntityType::FaceGroup, group_id, component, mapped, ctx)?;
            Ok(mapped.to_string())
        }
        None => Ok(component.to_string()),
    }
}

fn check_mapped(
    entity: EntityType,
    id: &str,
    legacy: &str,
    mapped: &str,
    ctx: &MigrationContext,
) -> Result<()> {
    validate_face_id(mapped).map_err(|_| MigrationError::InvalidMappedId {
        entity,
        id: id.to_string(),
        version: ctx.version.clone(),
        legacy: legacy.to_string(),
        mapped: mapped.to_string(),
    })?;
    if mapped != legacy && ctx.mapped(mapped).is_some() {
        return Err(MigrationError::ChainedMapping {
            entity,
            id: id.to_string(),
            version: ctx.version.clone(),
            legacy: legacy.to_string(),
            mapped: mapped.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MappedId;
    use planscape_topology::PointRecord;

    fn map(pairs: &[(&str, &str)]) -> EntityIdMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), MappedId { id: v.to_string() }))
            .collect()
    }

    fn group(id: &str) -> EntityRecord {
        EntityRecord::FaceGroup(FaceGroupRecord {
            id: id.to_string(),
            connect_mode: None,
            bound_map: None,
        })
    }

    fn face_group(record: EntityRecord) -> FaceGroupRecord {
        match record {
            EntityRecord::FaceGroup(g) => g,
            other => panic!("expected a face group, got {other:?}"),
        }
    }

    #[test]
    fn hyphenated_id_is_remapped() {
        let ctx = MigrationContext::new("1.4", map(&[("a", "x"), ("c", "z")]));
        let migrated = face_group(migrate(group("a-b-c"), &ctx).unwrap());
        assert_eq!(migrated.id, "x;b;z");
        assert_eq!(migrated.connect_mode, Some(ConnectMode::Free));
    }

    #[test]
    fn bound_map_keys_follow_ids() {
        let bound = FaceGroupBound {
            left: 0.0,
            top: 0.0,
            width: 1.0,
            height: 1.0,
        };
        let record = EntityRecord::FaceGroup(FaceGroupRecord {
            id: "a-b".to_string(),
            connect_mode: Some(ConnectMode::Vertical),
            bound_map: Some([("a".to_string(), bound), ("b".to_string(), bound)].into()),
        });
        let ctx = MigrationContext::new("1.9", map(&[("a", "x")]));
        let migrated = face_group(migrate(record, &ctx).unwrap());
        let keys: Vec<&String> = migrated.bound_map.as_ref().unwrap().keys().collect();
        assert_eq!(keys, ["b", "x"]);
        assert_eq!(migrated.connect_mode, Some(ConnectMode::Vertical));
    }

    #[test]
    fn connect_mode_default_depends_on_version() {
        let ctx = MigrationContext::new("1.6", EntityIdMap::default());
        let migrated = face_group(migrate(group("a;b"), &ctx).unwrap());
        assert_eq!(migrated.connect_mode, Some(ConnectMode::Horizontal));
    }

    #[test]
    fn single_component_remapped_only_in_old_documents() {
        let ids = map(&[("a", "x")]);
        let old = MigrationContext::new("1.9", ids.clone());
        assert_eq!(face_group(migrate(group("a"), &old).unwrap()).id, "x");

        let new = MigrationContext::new("2.0", ids);
        assert_eq!(face_group(migrate(group("a"), &new).unwrap()).id, "a");
    }

    #[test]
    fn face_defaults_and_rename() {
        let face = EntityRecord::Face(FaceRecord {
            id: "a".to_string(),
            outer: 0,
            inner: Vec::new(),
            tags: None,
        });
        let ctx = MigrationContext::new("1.2", map(&[("a", "x")]));
        match migrate(face, &ctx).unwrap() {
            EntityRecord::Face(f) => {
                assert_eq!(f.id, "x");
                assert_eq!(f.tags, Some(BTreeSet::from(["region".to_string()])));
            }
            other => panic!("expected a face, got {other:?}"),
        }
    }

    #[test]
    fn tagged_face_in_old_document_is_renamed() {
        let face = EntityRecord::Face(FaceRecord {
            id: "a".to_string(),
            outer: 0,
            inner: Vec::new(),
            tags: Some(BTreeSet::from(["wall".to_string()])),
        });
        let ids = map(&[("a", "x")]);
        match migrate(face.clone(), &MigrationContext::new("1.4", ids.clone())).unwrap() {
            EntityRecord::Face(f) => {
                assert_eq!(f.id, "x");
                assert_eq!(f.tags, Some(BTreeSet::from(["wall".to_string()])));
            }
            other => panic!("expected a face, got {other:?}"),
        }
        assert_eq!(migrate(face.clone(), &MigrationContext::new("2.0", ids)).unwrap(), face);
    }

    #[test]
    fn hyphenated_id_in_new_document_keeps_names() {
        let ctx = MigrationContext::new("2.0", map(&[("a", "x")]));
        assert_eq!(face_group(migrate(group("a-b"), &ctx).unwrap()).id, "a;b");
    }

    #[test]
    fn chained_mapping_is_refused() {
        let ctx = MigrationContext::new("1.4", map(&[("a", "b"), ("b", "c")]));
        assert!(matches!(
            migrate(group("a-b"), &ctx),
            Err(MigrationError::ChainedMapping { .. })
        ));

        let identity = MigrationContext::new("1.4", map(&[("a", "a")]));
        assert_eq!(face_group(migrate(group("a-b"), &identity).unwrap()).id, "a;b");
    }

    #[test]
    fn point_kind_defaults_to_common() {
        let point = EntityRecord::Point(PointRecord {
            id: 3,
            x: 1.0,
            y: 2.0,
            kind: None,
        });
        let ctx = MigrationContext::new("1.0", EntityIdMap::default());
        match migrate(point, &ctx).unwrap() {
            EntityRecord::Point(p) => assert_eq!(p.kind, Some(PointKind::Common)),
            other => panic!("expected a point, got {other:?}"),
        }
    }

    #[test]
    fn malformed_ids_fail_closed() {
        let ctx = MigrationContext::new("1.4", EntityIdMap::default());
        assert!(matches!(
            migrate(group("a-b;c"), &ctx),
            Err(MigrationError::MixedSeparators { .. })
        ));
        assert!(matches!(
            migrate(group("a--b"), &ctx),
            Err(MigrationError::EmptyIdComponent { .. })
        ));
        assert!(matches!(
            migrate(group(""), &ctx),
            Err(MigrationError::EmptyIdComponent { .. })
        ));
    }

    #[test]
    fn mapped_id_must_be_a_valid_face_id() {
        let ctx = MigrationContext::new("1.4", map(&[("a", "x-y")]));
        let err = migrate(group("a-b"), &ctx).unwrap_err();
        assert!(matches!(err, MigrationError::InvalidMappedId { .. }));
    }

    #[test]
    fn bad_versions_name_the_record() {
        let ctx = MigrationContext::new("soon", EntityIdMap::default());
        let err = migrate(group("a-b"), &ctx).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("a-b"), "{message}");
        assert!(message.contains("soon"), "{message}");

        let ctx = MigrationContext::new("9.0", EntityIdMap::default());
        assert!(matches!(
            migrate(group("a-b"), &ctx),
            Err(MigrationError::FutureVersion { .. })
        ));
    }
}
