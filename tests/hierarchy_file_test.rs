//! Tests for loading constituent hierarchies from TOML description files
//! and merging them, using the fixtures in tests/resources/skeletons.

use std::fs;
use std::path::Path;

use glam::Vec3;
use rstest::rstest;
use tempfile::TempDir;

use skelmerge::application::{debug_draw, ApplicationError, DebugPrimitive, TreeNodeConvert};
use skelmerge::config::DrawSettings;
use skelmerge::domain::{DomainError, SourceNode};
use skelmerge::infrastructure::{HierarchyFile, InfraError};
use skelmerge::util::testing;

const KNIGHT: &str = "tests/resources/skeletons/knight.toml";
const INCOMPATIBLE: &str = "tests/resources/skeletons/incompatible.toml";

// ============================================================
// Loading
// ============================================================

#[test]
fn given_knight_file_when_loaded_then_constituents_in_file_order() {
    testing::init_test_setup();

    let file = HierarchyFile::load(Path::new(KNIGHT)).unwrap();

    let names: Vec<&str> = file.constituents.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["body", "legs", "sword"]);
    let legs = file.constituent("legs").unwrap();
    assert_eq!(legs.root.identifier(), "pelvis");
    assert_eq!(legs.root.children.len(), 3);
    assert_eq!(file.constituents[0].root.walk().len(), 6);
}

#[test]
fn given_missing_file_when_loaded_then_io_error() {
    let result = HierarchyFile::load(Path::new("tests/resources/skeletons/absent.toml"));

    assert!(matches!(result, Err(InfraError::Io { .. })));
}

#[rstest]
#[case::not_toml("[[constituents]\nname = ")]
#[case::missing_root("[[constituents]]\nname = \"body\"\n")]
#[case::bad_position("[[constituents]]\nname = \"b\"\n[constituents.root]\nname = \"r\"\nposition = [1.0]\n")]
fn given_malformed_file_when_loaded_then_parse_error(#[case] content: &str) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, content).unwrap();

    let err = HierarchyFile::load(&path).unwrap_err();

    match err {
        InfraError::Parse { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn given_loaded_file_when_written_back_then_loads_identically() {
    let file = HierarchyFile::load(Path::new(KNIGHT)).unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("copy.toml");

    fs::write(&path, file.to_toml().unwrap()).unwrap();

    assert_eq!(HierarchyFile::load(&path).unwrap(), file);
}

// ============================================================
// Merging
// ============================================================

#[test]
fn given_knight_file_when_merged_then_single_skeleton() {
    let file = HierarchyFile::load(Path::new(KNIGHT)).unwrap();
    let mut instance = file.instance();

    let tree = instance.try_rebuild().unwrap();

    assert_eq!(tree.node_count(), 10);
    assert_eq!(tree.root_count(), 1);
    assert_eq!(tree.depth(), 7);
    assert_eq!(tree.verify(), Ok(()));

    let blade = tree.node_index("blade").unwrap();
    let thigh = tree.node_index("thigh_l").unwrap();
    let path: Vec<&str> = tree
        .path_indices(blade, thigh)
        .unwrap()
        .into_iter()
        .map(|index| tree.node(index).identifier())
        .collect();
    assert_eq!(
        path,
        vec!["blade", "HP_right_hand", "hand_r", "spine", "pelvis", "thigh_l"]
    );
}

#[test]
fn given_knight_file_when_rendered_then_termtree_shows_hierarchy() {
    let file = HierarchyFile::load(Path::new(KNIGHT)).unwrap();
    let mut instance = file.instance();

    let rendered = instance.try_rebuild().unwrap().to_tree_string().to_string();

    assert!(rendered.starts_with("skeleton (10 nodes, 1 roots)"));
    assert!(rendered.contains("└── Scene Root"));
    assert!(rendered.contains("blade"));
}

#[test]
fn given_incompatible_file_when_merged_then_names_offending_constituent() {
    let file = HierarchyFile::load(Path::new(INCOMPATIBLE)).unwrap();
    let mut instance = file.instance();

    let err = instance.try_rebuild().unwrap_err();

    match err {
        ApplicationError::Incompatible {
            constituent,
            source,
        } => {
            assert_eq!(constituent, "cape_root");
            assert_eq!(
                source,
                DomainError::StructuralConflict {
                    identifier: "spine".to_string(),
                    existing_parent: "pelvis".to_string(),
                    requested_parent: "cape_root".to_string(),
                }
            );
        }
        other => panic!("unexpected {other:?}"),
    }
}

// ============================================================
// Catalogue and drawing
// ============================================================

#[test]
fn given_knight_file_when_drawn_then_unplaced_and_hidden_bones_skipped() {
    let file = HierarchyFile::load(Path::new(KNIGHT)).unwrap();
    let mut instance = file.instance();
    let tree = instance.try_rebuild().unwrap();

    let primitives = debug_draw(tree, &DrawSettings::default(), |_, handle| {
        handle.upgrade().and_then(|placement| *placement)
    });

    let roots = primitives
        .iter()
        .filter(|p| matches!(p, DebugPrimitive::RootMarker { .. }))
        .count();
    assert_eq!(roots, 1);
    assert_eq!(primitives.len(), 8);
    let blade = tree.node_index("blade").unwrap();
    assert!(primitives.contains(&DebugPrimitive::Bone {
        index: blade,
        from: Vec3::new(0.6, 1.3, 0.0),
        to: Vec3::new(0.6, 2.2, 0.0),
        from_colour: DrawSettings::default().base_colour,
        to_colour: DrawSettings::default().base_colour,
        axis_size: DrawSettings::default().size,
    }));
}

#[test]
fn given_shared_bones_when_cataloguing_then_first_placement_kept() {
    let file = HierarchyFile::load(Path::new(KNIGHT)).unwrap();

    let catalogue = file.catalogue();

    // pelvis and HP_right_hand are placed by the body only
    assert_eq!(*catalogue.find("pelvis").unwrap(), Some(Vec3::new(0.0, 1.0, 0.0)));
    assert_eq!(
        *catalogue.find("HP_right_hand").unwrap(),
        Some(Vec3::new(0.6, 1.3, 0.0))
    );
    assert_eq!(*catalogue.find("pelvis_BlendBone").unwrap(), None);
    assert_eq!(catalogue.len(), 10);
}
