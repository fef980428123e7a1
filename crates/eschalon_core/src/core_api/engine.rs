use std::fs::File;
use std::io::{BufReader, Cursor, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::character::Character;
use crate::fields::{CharField, FieldValue, ItemField};
use crate::fx::FxPreset;
use crate::item::Item;
use crate::layout::FileLayout;
use crate::tables::{
    Diseases, EquipSlot, INVENTORY_COLS, INVENTORY_ROWS, PRIMARY_STAT_NAMES, SPELL_COUNT,
    SPELL_NAMES, STATUS_COUNT, spell_type, status_name,
};

use super::error::{CoreError, CoreErrorCode};
use super::types::{
    Change, ItemEntry, Meter, ReadySlotEntry, SkillEntry, Snapshot, SpellEntry, StatEntry,
    StatusEntry,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

/// An open save: the pristine model as loaded plus a working copy that
/// edits go to.
#[derive(Debug)]
pub struct Session {
    path: Option<PathBuf>,
    layout: FileLayout,
    original: Character,
    working: Character,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    pub fn open_path<P: AsRef<Path>>(&self, path: P) -> Result<Session, CoreError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening save");
        let file = File::open(path)
            .map_err(|e| CoreError::from_io(e, &format!("failed to open {}", path.display())))?;
        let (character, layout) = Character::parse_with_layout(BufReader::new(file))
            .map_err(|e| CoreError::from_io(e, &format!("failed to read {}", path.display())))?;
        debug!(path = %path.display(), bytes = layout.file_len, "opened save");

        let mut session = Session::new(character, layout);
        session.path = Some(path.to_path_buf());
        Ok(session)
    }

    pub fn open_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Session, CoreError> {
        let (character, layout) = Character::parse_with_layout(Cursor::new(bytes.as_ref()))
            .map_err(|e| CoreError::from_io(e, "failed to parse save"))?;
        Ok(Session::new(character, layout))
    }
}

impl Session {
    fn new(character: Character, layout: FileLayout) -> Self {
        Self {
            path: None,
            layout,
            working: character.replicate(),
            original: character,
        }
    }

    /// File the session was opened from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn layout(&self) -> &FileLayout {
        &self.layout
    }

    pub fn character(&self) -> &Character {
        &self.working
    }

    pub fn character_mut(&mut self) -> &mut Character {
        &mut self.working
    }

    pub fn original(&self) -> &Character {
        &self.original
    }

    pub fn is_modified(&self) -> bool {
        self.working != self.original
    }

    pub fn changed_fields(&self) -> Vec<Change> {
        let (old, new) = (&self.original, &self.working);
        let mut changes: Vec<Change> = CharField::ALL
            .into_iter()
            .filter(|&field| old.field(field) != new.field(field))
            .map(Change::Field)
            .collect();

        let groups = [
            (old.skills != new.skills, Change::Skills),
            (old.statuses != new.statuses, Change::Statuses),
            (old.spells != new.spells, Change::Spells),
            (old.readyslots != new.readyslots, Change::ReadySlots),
            (old.fxblock != new.fxblock, Change::FxBlock),
            (old.inventory != new.inventory, Change::Inventory),
            (old.equipment != new.equipment, Change::Equipment),
            (old.unknowns != new.unknowns, Change::Unknowns),
        ];
        changes.extend(
            groups
                .into_iter()
                .filter_map(|(changed, change)| changed.then_some(change)),
        );
        changes
    }

    pub fn revert(&mut self) {
        self.working = self.original.replicate();
    }

    pub fn set_field(&mut self, field: CharField, value: FieldValue) -> Result<(), CoreError> {
        self.working.set_field(field, value)
    }

    /// Set a field by its key from user text, e.g. `gold` and `"500"`.
    pub fn set_field_text(&mut self, key: &str, text: &str) -> Result<(), CoreError> {
        let field = CharField::from_key(key).ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::UnsupportedOperation,
                format!("unknown character field {key:?}"),
            )
        })?;
        let value = FieldValue::parse(field.kind(), text)
            .map_err(|e| CoreError::invalid_value(format!("{key}: {}", e.message)))?;
        self.set_field(field, value)
    }

    pub fn set_skill(&mut self, skill_id: u8, level: i32) -> Result<(), CoreError> {
        let slot = self.working.skills.get_mut(skill_id).ok_or_else(|| {
            CoreError::invalid_value(format!("invalid skill id {skill_id}, expected 1-24"))
        })?;
        *slot = level;
        Ok(())
    }

    pub fn set_spell(&mut self, index: usize, known: bool) -> Result<(), CoreError> {
        let slot = self.working.spells.get_mut(index).ok_or_else(|| {
            CoreError::invalid_value(format!(
                "invalid spell index {index}, expected 0-{}",
                SPELL_COUNT - 1
            ))
        })?;
        *slot = i32::from(known);
        Ok(())
    }

    pub fn set_status(&mut self, index: usize, turns: i32) -> Result<(), CoreError> {
        let slot = self.working.statuses.get_mut(index).ok_or_else(|| {
            CoreError::invalid_value(format!(
                "invalid status index {index}, expected 0-{}",
                STATUS_COUNT - 1
            ))
        })?;
        *slot = turns;
        Ok(())
    }

    pub fn set_fx_preset(&mut self, preset: FxPreset) {
        self.working.set_fx_preset(preset);
    }

    /// Turn disease bits on or off; other bits are left alone.
    pub fn set_disease(&mut self, mask: Diseases, active: bool) {
        let mut diseases = self.working.diseases();
        diseases.set(mask, active);
        self.working.disease = diseases.raw();
    }

    /// Deep-copy the item in `from` over the item in `to`.
    pub fn copy_equipment(&mut self, from: EquipSlot, to: EquipSlot) {
        let item = self.working.equipped(from).replicate();
        *self.working.equipped_mut(to) = item;
    }

    pub fn clear_equipment(&mut self, slot: EquipSlot) {
        *self.working.equipped_mut(slot) = Item::zero();
    }

    pub fn set_equipment_field(
        &mut self,
        slot: EquipSlot,
        field: ItemField,
        value: FieldValue,
    ) -> Result<(), CoreError> {
        self.working.equipped_mut(slot).set_field(field, value)
    }

    pub fn clear_inventory(&mut self, row: usize, col: usize) -> Result<(), CoreError> {
        let cell = self.working.inventory_cell_mut(row, col).ok_or_else(|| {
            CoreError::invalid_value(format!(
                "invalid inventory cell ({row}, {col}), expected rows 0-{} and columns 0-{}",
                INVENTORY_ROWS - 1,
                INVENTORY_COLS - 1
            ))
        })?;
        *cell = Item::zero();
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        let c = &self.working;
        let diseases = c.diseases();

        Snapshot {
            name: c.name.clone(),
            origin: c.origin.clone(),
            axiom: c.axiom.clone(),
            classname: c.classname.clone(),
            level: c.level,
            experience: c.experience,
            gold: c.gold,
            hp: Meter {
                current: c.curhp,
                max: c.maxhp,
            },
            mana: Meter {
                current: c.curmana,
                max: c.maxmana,
            },
            torches: c.torches,
            torchused: c.torchused,
            orientation: c.direction(),
            xpos: c.xpos,
            ypos: c.ypos,
            picid: c.picid,
            picture: c.picture_number(),
            fx: c.fx_preset(),
            disease_raw: c.disease,
            diseases: diseases.names().into_iter().map(str::to_string).collect(),
            stats: PRIMARY_STAT_NAMES
                .iter()
                .zip(c.primary_stats())
                .enumerate()
                .map(|(index, (name, value))| StatEntry {
                    index,
                    name: (*name).to_string(),
                    value,
                })
                .collect(),
            skills: c
                .skills
                .iter()
                .map(|(def, level)| SkillEntry {
                    id: def.id,
                    name: def.name.to_string(),
                    level,
                })
                .collect(),
            statuses: c
                .statuses
                .iter()
                .enumerate()
                .map(|(index, &turns)| StatusEntry {
                    index,
                    name: status_name(index).map(str::to_string),
                    turns,
                })
                .collect(),
            spells: SPELL_NAMES
                .iter()
                .enumerate()
                .map(|(index, name)| SpellEntry {
                    index,
                    name: (*name).to_string(),
                    spell_type: spell_type(index),
                    known: c.knows_spell(index),
                })
                .collect(),
            readyslots: c
                .readyslots
                .iter()
                .enumerate()
                .map(|(slot, ready)| ReadySlotEntry {
                    slot,
                    spell: ready.spell.clone(),
                    level: ready.level,
                })
                .collect(),
            equipment: EquipSlot::ALL
                .into_iter()
                .filter(|&slot| !c.equipped(slot).is_empty())
                .map(|slot| ItemEntry {
                    location: slot.key().to_string(),
                    item: c.equipped(slot).replicate(),
                })
                .collect(),
            inventory: c
                .inventory_items()
                .filter(|(_, item)| !item.is_empty())
                .map(|((row, col), item)| ItemEntry {
                    location: format!("{row},{col}"),
                    item: item.replicate(),
                })
                .collect(),
            extradata_len: c.unknowns.extradata.len(),
        }
    }

    pub fn to_bytes_unmodified(&self) -> Result<Vec<u8>, CoreError> {
        self.original
            .emit_to_vec()
            .map_err(|e| CoreError::from_io(e, "failed to serialize unmodified save"))
    }

    pub fn to_bytes_modified(&self) -> Result<Vec<u8>, CoreError> {
        self.working
            .emit_to_vec()
            .map_err(|e| CoreError::from_io(e, "failed to serialize modified save"))
    }

    /// Write the working copy straight to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CoreError> {
        let path = path.as_ref();
        self.log_save(path);
        self.working
            .save(path)
            .map_err(|e| CoreError::from_io(e, &format!("failed to write {}", path.display())))
    }

    /// Write the working copy to a temporary file beside `path`, then rename
    /// it over `path`. The target is either the old file or the complete new
    /// one.
    pub fn save_atomic<P: AsRef<Path>>(&self, path: P) -> Result<(), CoreError> {
        let path = path.as_ref();
        let bytes = self.to_bytes_modified()?;
        self.log_save(path);

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let context = format!("failed to write {}", path.display());

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| CoreError::from_io(e, &context))?;
        tmp.write_all(&bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| CoreError::from_io(e, &context))?;
        tmp.persist(path)
            .map_err(|e| CoreError::from_io(e.error, &context))?;

        debug!(path = %path.display(), bytes = bytes.len(), "saved save");
        Ok(())
    }

    fn log_save(&self, path: &Path) {
        if self.is_modified() {
            debug!(path = %path.display(), changes = self.changed_fields().len(), "saving save");
        } else {
            info!(path = %path.display(), "saving session with no changes");
        }
    }
}
