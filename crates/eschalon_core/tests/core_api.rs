use std::fs;
use std::path::PathBuf;

use eschalon_core::core_api::{Change, CoreErrorCode, Engine, Session};
use eschalon_core::fields::{CharField, FieldValue, ItemField};
use eschalon_core::fx::FxPreset;
use eschalon_core::layout::SectionId;
use eschalon_core::tables::{Diseases, EquipSlot, SpellType};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn save_path(slot: u32) -> PathBuf {
    workspace_root().join(format!("tests/fixtures/SLOT{:02}/char.sav", slot))
}

fn open(slot: u32) -> (Session, Vec<u8>) {
    let bytes = fs::read(save_path(slot)).expect("fixture should be readable");
    let session = Engine::new()
        .open_bytes(&bytes)
        .expect("fixture should parse");
    (session, bytes)
}

/// Indices at which two equal-length buffers differ.
fn diff_offsets(a: &[u8], b: &[u8]) -> Vec<usize> {
    assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .enumerate()
        .filter(|(_, (x, y))| x != y)
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn open_path_remembers_the_file() {
    let path = save_path(1);
    let session = Engine::new()
        .open_path(&path)
        .expect("failed to open slot01");

    assert_eq!(session.path(), Some(path.as_path()));
    assert_eq!(session.character().name, "Aldric");
    assert!(!session.is_modified());
    assert!(session.changed_fields().is_empty());
}

#[test]
fn unmodified_save_emits_the_input() {
    for slot in [1, 2] {
        let (session, bytes) = open(slot);
        assert_eq!(session.to_bytes_unmodified().unwrap(), bytes);
        assert_eq!(session.to_bytes_modified().unwrap(), bytes);
    }
}

#[test]
fn rename_shifts_everything_after_the_name() {
    let (mut session, bytes) = open(1);
    session
        .set_field(CharField::Name, FieldValue::Text("Traveler".to_string()))
        .expect("name should be settable");

    let out = session.to_bytes_modified().unwrap();
    assert_eq!(out.len(), bytes.len() + 2);
    assert_eq!(&out[..4], &bytes[..4]);
    assert_eq!(out[4], 8);
    assert_eq!(&out[5..13], b"Traveler");
    assert_eq!(&out[13..], &bytes[11..]);
    assert_eq!(session.changed_fields(), vec![Change::Field(CharField::Name)]);
}

#[test]
fn torches_edit_touches_one_int() {
    let (mut session, bytes) = open(1);
    let offset = session
        .layout()
        .range(SectionId::Torches)
        .expect("missing torches")
        .start;
    assert_eq!(&bytes[offset..offset + 4], &[5, 0, 0, 0]);

    session.set_field_text("torches", "99").unwrap();
    let out = session.to_bytes_modified().unwrap();

    assert_eq!(&out[offset..offset + 4], &[0x63, 0, 0, 0]);
    assert_eq!(diff_offsets(&bytes, &out), vec![offset]);
}

#[test]
fn gold_edit_from_text() {
    let (mut session, bytes) = open(1);
    let gold_at = session.layout().range(SectionId::Vitals).unwrap().start + 6 * 4;
    assert_eq!(&bytes[gold_at..gold_at + 4], &318i32.to_le_bytes());

    session.set_field_text("GOLD", "0x1000").unwrap();
    let out = session.to_bytes_modified().unwrap();
    assert_eq!(&out[gold_at..gold_at + 4], &[0x00, 0x10, 0, 0]);
    assert_eq!(session.snapshot().gold, 4096);
}

#[test]
fn copying_helm_over_cloak_is_deep() {
    let (mut session, _) = open(1);
    session.copy_equipment(EquipSlot::Helm, EquipSlot::Cloak);
    assert_eq!(
        session.character().equipped(EquipSlot::Cloak).item_name,
        "Leather Cap"
    );

    session
        .set_equipment_field(
            EquipSlot::Cloak,
            ItemField::Name,
            FieldValue::Text("Iron Cap".to_string()),
        )
        .unwrap();
    assert_eq!(
        session.character().equipped(EquipSlot::Helm).item_name,
        "Leather Cap"
    );
    assert_eq!(
        session.character().equipped(EquipSlot::Cloak).item_name,
        "Iron Cap"
    );
    assert_eq!(session.changed_fields(), vec![Change::Equipment]);
}

#[test]
fn copied_item_encodes_identically() {
    let (mut session, _) = open(1);
    session.copy_equipment(EquipSlot::Helm, EquipSlot::Cloak);
    let out = session.to_bytes_modified().unwrap();
    let reparsed = Engine::new().open_bytes(&out).unwrap();

    let c = reparsed.character();
    assert_eq!(c.equipped(EquipSlot::Cloak), c.equipped(EquipSlot::Helm));
}

#[test]
fn fx_preset_changes_only_the_fx_block() {
    let (mut session, bytes) = open(1);
    let fx = session.layout().range(SectionId::FxBlock).unwrap();

    session.set_fx_preset(FxPreset::TorchGravedigger);
    let out = session.to_bytes_modified().unwrap();

    let changed = diff_offsets(&bytes, &out);
    assert!(!changed.is_empty());
    assert!(changed.iter().all(|&i| fx.contains(i)), "{changed:?}");

    let expected: Vec<u8> = FxPreset::TORCH_GRAVEDIGGER_RAW
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect();
    assert_eq!(&out[fx.start..fx.end], expected.as_slice());
    assert_eq!(session.changed_fields(), vec![Change::FxBlock]);
}

#[test]
fn unknown_fx_tuple_survives_edits_elsewhere() {
    let (mut session, _) = open(2);
    session.set_field_text("level", "3").unwrap();
    let out = session.to_bytes_modified().unwrap();

    let reparsed = Engine::new().open_bytes(&out).unwrap();
    assert_eq!(
        reparsed.character().fx_preset(),
        FxPreset::Unknown([1073741824, 2111, 2560, 5121])
    );
    assert_eq!(reparsed.snapshot().level, 3);
}

#[test]
fn spell_edits_land_in_their_own_section() {
    let (mut session, bytes) = open(1);
    let head = session.layout().range(SectionId::SpellsHead).unwrap();
    let tail = session.layout().range(SectionId::SpellsTail).unwrap();

    session.set_spell(0, false).unwrap();
    let out = session.to_bytes_modified().unwrap();
    assert_eq!(diff_offsets(&bytes, &out), vec![head.start]);

    session.revert();
    session.set_spell(38, true).unwrap();
    let out = session.to_bytes_modified().unwrap();
    assert_eq!(diff_offsets(&bytes, &out), vec![tail.start + 12]);
    assert_eq!(&out[tail.start + 12..tail.end], &[1, 0, 0, 0]);
}

#[test]
fn disease_toggle_flips_one_bit() {
    let (mut session, bytes) = open(1);
    let disease_at = session.layout().range(SectionId::Appearance).unwrap().start + 8;

    session.set_disease(Diseases::SWAMP_FEVER, true);
    let out = session.to_bytes_modified().unwrap();
    assert_eq!(&out[disease_at..disease_at + 4], &[1, 0, 0, 0]);
    assert_eq!(diff_offsets(&bytes, &out), vec![disease_at]);

    session.set_disease(Diseases::SWAMP_FEVER, false);
    assert!(!session.is_modified());
}

#[test]
fn disease_toggle_keeps_other_bits() {
    let (mut session, _) = open(2);
    assert!(session.character().diseases().contains(Diseases::LEPROSY));

    session.set_disease(Diseases::GREY_ROT, true);
    assert_eq!(session.character().disease, 0x6);
    session.set_disease(Diseases::LEPROSY, false);
    assert_eq!(session.character().disease, 0x2);
}

#[test]
fn edits_do_not_leak_into_the_original() {
    let (mut session, bytes) = open(1);
    session.set_skill(1, 9).unwrap();
    session.set_spell(38, true).unwrap();
    session.set_status(0, 12).unwrap();
    session.clear_inventory(9, 6).unwrap();
    session.clear_equipment(EquipSlot::Helm);

    assert_eq!(session.original().skills.get(1), Some(0));
    assert!(!session.original().knows_spell(38));
    assert_eq!(session.original().inventory[9][6].item_name, "Gold");
    assert!(!session.original().equipped(EquipSlot::Helm).is_empty());
    assert_eq!(session.to_bytes_unmodified().unwrap(), bytes);

    assert_eq!(
        session.changed_fields(),
        vec![
            Change::Skills,
            Change::Statuses,
            Change::Spells,
            Change::Inventory,
            Change::Equipment,
        ]
    );

    session.revert();
    assert!(!session.is_modified());
    assert_eq!(session.to_bytes_modified().unwrap(), bytes);
}

#[test]
fn out_of_range_edits_are_invalid_values() {
    let (mut session, _) = open(1);

    let cases = [
        session.set_skill(0, 1),
        session.set_skill(25, 1),
        session.set_spell(39, true),
        session.set_status(26, 1),
        session.clear_inventory(10, 0),
        session.clear_inventory(0, 7),
        session.set_field(CharField::Gold, FieldValue::Text("lots".to_string())),
        session.set_field_text("gold", "many"),
    ];
    for result in cases {
        assert_eq!(result.unwrap_err().code, CoreErrorCode::InvalidValue);
    }
    assert!(!session.is_modified());
}

#[test]
fn unknown_field_key_is_unsupported() {
    let (mut session, _) = open(1);
    let err = session.set_field_text("charisma", "10").unwrap_err();
    assert_eq!(err.code, CoreErrorCode::UnsupportedOperation);
}

#[test]
fn unencodable_name_fails_at_save_time() {
    let (mut session, _) = open(1);
    session
        .set_field(CharField::Name, FieldValue::Text("\u{263a}".to_string()))
        .unwrap();
    let err = session.to_bytes_modified().unwrap_err();
    assert_eq!(err.code, CoreErrorCode::InvalidValue);
}

#[test]
fn truncated_input_reports_the_section() {
    let bytes = fs::read(save_path(1)).unwrap();
    let session = Engine::new().open_bytes(&bytes).unwrap();
    let cut = session.layout().range(SectionId::Equipment).unwrap().start + 10;

    let err = Engine::new().open_bytes(&bytes[..cut]).unwrap_err();
    assert_eq!(err.code, CoreErrorCode::Truncated);
    assert!(err.message.contains("equipment"), "{}", err.message);
}

#[test]
fn snapshot_reports_model_views() {
    let (session, _) = open(1);
    let snap = session.snapshot();

    assert_eq!(snap.name, "Aldric");
    assert_eq!((snap.hp.current, snap.hp.max), (37, 42));
    assert_eq!(snap.picture, Some(3));
    assert_eq!(snap.fx, FxPreset::Ordinary);
    assert!(snap.diseases.is_empty());
    assert_eq!(snap.stats.len(), 8);
    assert_eq!(snap.skills.len(), 24);
    assert_eq!(snap.statuses.len(), 26);
    assert_eq!(snap.spells.len(), 39);
    assert_eq!(snap.readyslots.len(), 10);
    assert_eq!(snap.extradata_len, 2);

    assert_eq!(snap.spells[20].spell_type, SpellType::Divine);
    assert_eq!(snap.spells[21].spell_type, SpellType::Elemental);

    let equipped: Vec<&str> = snap.equipment.iter().map(|e| e.location.as_str()).collect();
    assert_eq!(equipped, vec!["helm", "cloak", "weap_prim"]);
    let carried: Vec<&str> = snap.inventory.iter().map(|e| e.location.as_str()).collect();
    assert_eq!(carried, vec!["0,0", "2,3", "9,6"]);
}

#[test]
fn snapshot_serializes_to_json() {
    let (session, _) = open(1);
    let value = serde_json::to_value(session.snapshot()).expect("snapshot should serialize");

    assert_eq!(value["name"], "Aldric");
    assert_eq!(value["hp"]["current"], 37);
    assert_eq!(value["hp"]["max"], 42);
    assert_eq!(value["fx"], "Ordinary");
    assert_eq!(value["extradata_len"], 2);
    assert_eq!(value["spells"].as_array().map(Vec::len), Some(39));
    assert_eq!(value["equipment"][0]["location"], "helm");
}

#[test]
fn save_atomic_writes_the_working_copy() {
    let (mut session, _) = open(1);
    session.set_field_text("torches", "99").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("char.sav");
    fs::write(&out, b"old contents").unwrap();

    session.save_atomic(&out).unwrap();
    assert_eq!(fs::read(&out).unwrap(), session.to_bytes_modified().unwrap());

    let reopened = Engine::new().open_path(&out).unwrap();
    assert_eq!(reopened.character().torches, 99);
}

#[test]
fn plain_save_writes_the_working_copy() {
    let (mut session, _) = open(2);
    session.set_fx_preset(FxPreset::Torch);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("char.sav");
    session.save(&out).unwrap();

    let reopened = Engine::new().open_path(&out).unwrap();
    assert_eq!(reopened.character().fx_preset(), FxPreset::Torch);
    assert_eq!(reopened.character().unknowns.charstring, "x\u{e9}y");
}

#[test]
fn save_into_missing_directory_is_io() {
    let (session, _) = open(1);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("missing").join("char.sav");

    let err = session.save_atomic(&out).unwrap_err();
    assert_eq!(err.code, CoreErrorCode::Io);
    assert!(!out.exists());
}
