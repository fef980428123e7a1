pub mod sections;
pub mod skills;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, trace};

use crate::direction::Direction;
use crate::fx::FxPreset;
use crate::item::Item;
use crate::layout::{ByteRange, FileLayout, SectionId, SectionLayout};
use crate::reader::LittleEndianReader;
use crate::tables::{
    Diseases, EQUIP_SLOT_COUNT, EquipSlot, FXBLOCK_LEN, IBLOCK1_LEN, PICTURE_ID_STEP,
    PRIMARY_STAT_COUNT, READYSLOT_COUNT, SPELL_COUNT, SPELLS_HEAD_COUNT, SPELLS_TAIL_COUNT,
    STATUS_COUNT, SpellType, spell_type,
};
use crate::unknowns::Unknowns;
use crate::writer::LittleEndianWriter;
pub use sections::{InventoryGrid, ReadySlot};
pub use skills::SkillSet;

/// A decoded save file.
///
/// Every count in the file is fixed, so the model uses fixed-size arrays;
/// values the editor does not understand live in `unknowns` and are written
/// back untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub name: String,
    pub origin: String,
    pub axiom: String,
    pub classname: String,
    pub strength: i32,
    pub dexterity: i32,
    pub endurance: i32,
    pub speed: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub perception: i32,
    pub concentration: i32,
    pub skills: SkillSet,
    pub maxhp: i32,
    pub maxmana: i32,
    pub curhp: i32,
    pub curmana: i32,
    pub experience: i32,
    pub level: i32,
    pub gold: i32,
    /// Turns remaining per status slot; 0 is inactive.
    pub statuses: [i32; STATUS_COUNT],
    pub torches: i32,
    pub torchused: i32,
    /// One entry per spell, 0 or 1. Stored on disk as 35 + 4.
    pub spells: [i32; SPELL_COUNT],
    pub readyslots: [ReadySlot; READYSLOT_COUNT],
    pub orientation: i32,
    pub xpos: i32,
    pub ypos: i32,
    pub fxblock: [i32; FXBLOCK_LEN],
    pub picid: i32,
    pub disease: i32,
    pub inventory: InventoryGrid,
    pub equipment: [Item; EQUIP_SLOT_COUNT],
    pub unknowns: Unknowns,
}

/// Records the byte range of each schema step while reading.
struct Capture {
    sections: Vec<SectionLayout>,
}

impl Capture {
    fn new() -> Self {
        Self {
            sections: Vec::with_capacity(SectionId::ALL.len()),
        }
    }

    fn section<R: Read, T>(
        &mut self,
        r: &mut LittleEndianReader<R>,
        id: SectionId,
        read: impl FnOnce(&mut LittleEndianReader<R>) -> io::Result<T>,
    ) -> io::Result<T> {
        let start = r.position() as usize;
        let value = read(r).map_err(|err| annotate(err, id))?;
        let end = r.position() as usize;
        trace!(section = %id, start, end, "read section");
        self.sections.push(SectionLayout {
            id,
            range: ByteRange { start, end },
        });
        Ok(value)
    }

    fn finish(self, file_len: usize) -> io::Result<FileLayout> {
        let layout = FileLayout {
            file_len,
            sections: self.sections,
        };
        layout.validate()?;
        Ok(layout)
    }
}

fn annotate(err: io::Error, id: SectionId) -> io::Error {
    let message = match err.kind() {
        io::ErrorKind::UnexpectedEof => format!("truncated stream while reading {id}"),
        _ => format!("while reading {id}: {err}"),
    };
    io::Error::new(err.kind(), message)
}

impl Character {
    pub fn parse<R: Read>(reader: R) -> io::Result<Self> {
        Self::parse_with_layout(reader).map(|(character, _)| character)
    }

    /// Decode a save and record where each schema step sits in the file.
    pub fn parse_with_layout<R: Read>(reader: R) -> io::Result<(Self, FileLayout)> {
        let mut r = LittleEndianReader::new(reader);
        let mut capture = Capture::new();
        let character = parse_internal(&mut r, &mut capture)?;
        let layout = capture.finish(r.position() as usize)?;
        Ok((character, layout))
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        debug!(path = %path.display(), "loading save");
        let file = File::open(path)?;
        let character = Self::parse(BufReader::new(file))?;
        debug!(path = %path.display(), "loaded save");
        Ok(character)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> io::Result<()> {
        let mut w = LittleEndianWriter::new(writer);
        self.emit(&mut w)?;
        w.flush()
    }

    pub fn emit_to_vec(&self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Encode fully in memory, then write the file in one pass.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let bytes = self.emit_to_vec()?;
        debug!(path = %path.display(), bytes = bytes.len(), "saving save");
        let mut out = BufWriter::new(File::create(path)?);
        out.write_all(&bytes)?;
        out.flush()
    }

    pub fn replicate(&self) -> Self {
        self.clone()
    }

    pub fn primary_stats(&self) -> [i32; PRIMARY_STAT_COUNT] {
        [
            self.strength,
            self.dexterity,
            self.endurance,
            self.speed,
            self.intelligence,
            self.wisdom,
            self.perception,
            self.concentration,
        ]
    }

    pub fn equipped(&self, slot: EquipSlot) -> &Item {
        &self.equipment[slot.index()]
    }

    pub fn equipped_mut(&mut self, slot: EquipSlot) -> &mut Item {
        &mut self.equipment[slot.index()]
    }

    pub fn inventory_cell(&self, row: usize, col: usize) -> Option<&Item> {
        self.inventory.get(row).and_then(|cells| cells.get(col))
    }

    pub fn inventory_cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Item> {
        self.inventory.get_mut(row).and_then(|cells| cells.get_mut(col))
    }

    pub fn inventory_items(&self) -> impl Iterator<Item = ((usize, usize), &Item)> {
        self.inventory.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, item)| ((row, col), item))
        })
    }

    pub fn fx_preset(&self) -> FxPreset {
        FxPreset::from_raw(self.fxblock)
    }

    pub fn set_fx_preset(&mut self, preset: FxPreset) {
        self.fxblock = preset.raw();
    }

    pub fn diseases(&self) -> Diseases {
        Diseases::from_raw(self.disease)
    }

    pub fn direction(&self) -> Direction {
        Direction::from_raw(self.orientation)
    }

    /// 1-based portrait number for canonical ids (multiples of 256).
    pub fn picture_number(&self) -> Option<i32> {
        (self.picid % PICTURE_ID_STEP == 0).then(|| self.picid / PICTURE_ID_STEP + 1)
    }

    pub fn spell_type(index: usize) -> SpellType {
        spell_type(index)
    }

    pub fn knows_spell(&self, index: usize) -> bool {
        self.spells.get(index).is_some_and(|&known| known != 0)
    }

    fn emit<W: Write>(&self, w: &mut LittleEndianWriter<W>) -> io::Result<()> {
        let u = &self.unknowns;

        w.write_i32(u.initzero)?;
        w.write_string(&self.name)?;
        w.write_string(&u.charstring)?;
        w.write_string(&self.origin)?;
        w.write_string(&self.axiom)?;
        w.write_string(&self.classname)?;
        w.write_i32(u.charone)?;
        w.write_i32_slice(&self.primary_stats())?;
        self.skills.write(w)?;
        w.write_i32_slice(&[
            self.maxhp,
            self.maxmana,
            self.curhp,
            self.curmana,
            self.experience,
            self.level,
            self.gold,
        ])?;
        w.write_i32(u.beginzero1)?;
        w.write_i32(u.beginzero2)?;
        sections::write_statuses(w, &self.statuses, &u.sparse)?;
        w.write_i32_slice(&u.iblock1)?;
        for triple in &u.triples {
            sections::write_triple(w, triple)?;
        }
        w.write_string(&u.extstr1)?;
        w.write_string(&u.extstr2)?;
        w.write_i32(self.torches)?;
        w.write_i32(self.torchused)?;
        w.write_i32(u.anotherzero)?;
        w.write_i32_slice(&self.spells[..SPELLS_HEAD_COUNT])?;
        for slot in &self.readyslots {
            sections::write_readyslot(w, slot)?;
        }
        w.write_i32_slice(&[self.orientation, self.xpos, self.ypos])?;
        w.write_i32_slice(&self.fxblock)?;
        w.write_i32_slice(&[u.anotherint, self.picid, self.disease])?;

        w.write_u16(u.shortval)?;
        w.write_string(&u.emptystr)?;
        w.write_i32_slice(&u.iblock2)?;
        w.write_string(&u.preinvstr1)?;
        w.write_string(&u.preinvstr2)?;
        w.write_i32(u.preinvzero1)?;
        w.write_i32(u.preinvzero2)?;

        sections::write_inventory(w, &self.inventory)?;
        sections::write_items(w, &self.equipment)?;
        sections::write_items(w, &u.items)?;
        w.write_i32_slice(&self.spells[SPELLS_HEAD_COUNT..])?;
        w.write_bytes(&u.extradata)
    }
}

fn parse_internal<R: Read>(
    r: &mut LittleEndianReader<R>,
    capture: &mut Capture,
) -> io::Result<Character> {
    let initzero = capture.section(r, SectionId::InitZero, |r| r.read_i32())?;
    let identity = capture.section(r, SectionId::Identity, sections::read_identity)?;
    let charone = capture.section(r, SectionId::CharOne, |r| r.read_i32())?;
    let [
        strength,
        dexterity,
        endurance,
        speed,
        intelligence,
        wisdom,
        perception,
        concentration,
    ] = capture.section(r, SectionId::PrimaryStats, |r| {
        r.read_i32_array::<PRIMARY_STAT_COUNT>()
    })?;
    let skills = capture.section(r, SectionId::Skills, SkillSet::read)?;
    let vitals = capture.section(r, SectionId::Vitals, sections::read_vitals)?;
    let [beginzero1, beginzero2] =
        capture.section(r, SectionId::BeginZero, |r| r.read_i32_array::<2>())?;
    let (statuses, sparse) = capture.section(r, SectionId::Statuses, sections::read_statuses)?;
    let iblock1 = capture.section(r, SectionId::IBlock1, |r| {
        r.read_i32_array::<IBLOCK1_LEN>()
    })?;
    let triples = capture.section(r, SectionId::UnknownTriples, |r| {
        r.read_array_with(sections::read_triple)
    })?;
    let (extstr1, extstr2) = capture.section(r, SectionId::Extension, |r| {
        Ok((r.read_string()?, r.read_string()?))
    })?;
    let [torches, torchused] = capture.section(r, SectionId::Torches, |r| r.read_i32_array::<2>())?;
    let anotherzero = capture.section(r, SectionId::AnotherZero, |r| r.read_i32())?;
    let spells_head = capture.section(r, SectionId::SpellsHead, |r| {
        r.read_i32_array::<SPELLS_HEAD_COUNT>()
    })?;
    let readyslots = capture.section(r, SectionId::ReadySlots, |r| {
        r.read_array_with(sections::read_readyslot)
    })?;
    let [orientation, xpos, ypos] =
        capture.section(r, SectionId::Position, |r| r.read_i32_array::<3>())?;
    let fxblock = capture.section(r, SectionId::FxBlock, |r| {
        r.read_i32_array::<FXBLOCK_LEN>()
    })?;
    let [anotherint, picid, disease] =
        capture.section(r, SectionId::Appearance, |r| r.read_i32_array::<3>())?;
    let preinv = capture.section(r, SectionId::PreInventory, sections::read_preinventory)?;
    let inventory = capture.section(r, SectionId::Inventory, sections::read_inventory)?;
    let equipment = capture.section(r, SectionId::Equipment, |r| r.read_array_with(Item::read))?;
    let items = capture.section(r, SectionId::UnknownItems, |r| r.read_array_with(Item::read))?;
    let spells_tail = capture.section(r, SectionId::SpellsTail, |r| {
        r.read_i32_array::<SPELLS_TAIL_COUNT>()
    })?;
    let extradata = capture.section(r, SectionId::ExtraData, |r| r.read_remaining())?;
    debug!(len = extradata.len(), "trailing extradata");

    let mut spells = [0i32; SPELL_COUNT];
    spells[..SPELLS_HEAD_COUNT].copy_from_slice(&spells_head);
    spells[SPELLS_HEAD_COUNT..].copy_from_slice(&spells_tail);

    Ok(Character {
        name: identity.name,
        origin: identity.origin,
        axiom: identity.axiom,
        classname: identity.classname,
        strength,
        dexterity,
        endurance,
        speed,
        intelligence,
        wisdom,
        perception,
        concentration,
        skills,
        maxhp: vitals.maxhp,
        maxmana: vitals.maxmana,
        curhp: vitals.curhp,
        curmana: vitals.curmana,
        experience: vitals.experience,
        level: vitals.level,
        gold: vitals.gold,
        statuses,
        torches,
        torchused,
        spells,
        readyslots,
        orientation,
        xpos,
        ypos,
        fxblock,
        picid,
        disease,
        inventory,
        equipment,
        unknowns: Unknowns {
            initzero,
            charstring: identity.charstring,
            charone,
            beginzero1,
            beginzero2,
            sparse,
            iblock1,
            triples,
            extstr1,
            extstr2,
            anotherzero,
            anotherint,
            shortval: preinv.shortval,
            emptystr: preinv.emptystr,
            iblock2: preinv.iblock2,
            preinvstr1: preinv.preinvstr1,
            preinvstr2: preinv.preinvstr2,
            preinvzero1: preinv.preinvzero1,
            preinvzero2: preinv.preinvzero2,
            items,
            extradata,
        },
    })
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, ErrorKind};

    use super::{Character, ReadySlot, SkillSet};
    use crate::fx::FxPreset;
    use crate::item::Item;
    use crate::layout::SectionId;
    use crate::tables::{Diseases, EquipSlot};
    use crate::unknowns::{UnknownTriple, Unknowns};

    fn sample() -> Character {
        Character {
            name: "Aldo".to_string(),
            origin: "Tikkal".to_string(),
            axiom: "Neutral".to_string(),
            classname: "Fighter".to_string(),
            strength: 14,
            dexterity: 12,
            endurance: 13,
            speed: 10,
            intelligence: 9,
            wisdom: 8,
            perception: 11,
            concentration: 10,
            skills: SkillSet::from_levels(std::array::from_fn(|i| (i % 3) as i32)),
            maxhp: 30,
            maxmana: 5,
            curhp: 28,
            curmana: 5,
            experience: 1200,
            level: 3,
            gold: 250,
            statuses: std::array::from_fn(|i| if i == 1 { 40 } else { 0 }),
            torches: 5,
            torchused: 12,
            spells: std::array::from_fn(|i| (i % 2) as i32),
            readyslots: std::array::from_fn(|i| ReadySlot {
                spell: if i == 0 { "Bless".to_string() } else { String::new() },
                level: if i == 0 { 2 } else { 0 },
            }),
            orientation: 3,
            xpos: 41,
            ypos: 77,
            fxblock: FxPreset::ORDINARY_RAW,
            picid: 512,
            disease: 0,
            inventory: std::array::from_fn(|_| std::array::from_fn(|_| Item::zero())),
            equipment: std::array::from_fn(|i| Item {
                item_name: if i == 1 { "Leather Cap".to_string() } else { String::new() },
                ..Item::zero()
            }),
            unknowns: Unknowns {
                initzero: 0,
                charstring: "xyz".to_string(),
                charone: 1,
                beginzero1: 0,
                beginzero2: 0,
                sparse: std::array::from_fn(|i| i as i32),
                iblock1: [0; 17],
                triples: std::array::from_fn(|_| UnknownTriple::default()),
                extstr1: String::new(),
                extstr2: String::new(),
                anotherzero: 0,
                anotherint: 9,
                shortval: 0x0101,
                emptystr: String::new(),
                iblock2: [0; 21],
                preinvstr1: String::new(),
                preinvstr2: String::new(),
                preinvzero1: 0,
                preinvzero2: 0,
                items: std::array::from_fn(|_| Item::zero()),
                extradata: vec![0xde, 0xad],
            },
        }
    }

    #[test]
    fn emitted_bytes_parse_back_to_the_same_model() {
        let character = sample();
        let bytes = character.emit_to_vec().unwrap();
        let (parsed, layout) = Character::parse_with_layout(Cursor::new(&bytes)).unwrap();

        assert_eq!(parsed, character);
        assert_eq!(parsed.emit_to_vec().unwrap(), bytes);
        assert_eq!(layout.file_len, bytes.len());
        assert_eq!(layout.sections.len(), SectionId::ALL.len());
        assert_eq!(layout.range(SectionId::ExtraData).map(|r| r.len()), Some(2));
    }

    #[test]
    fn fixed_width_sections_have_fixed_sizes() {
        let bytes = sample().emit_to_vec().unwrap();
        let (_, layout) = Character::parse_with_layout(Cursor::new(bytes)).unwrap();
        let len = |id| layout.range(id).map(|r| r.len());

        assert_eq!(len(SectionId::Skills), Some(24 * 4));
        assert_eq!(len(SectionId::Statuses), Some(26 * 8));
        assert_eq!(len(SectionId::SpellsHead), Some(35 * 4));
        assert_eq!(len(SectionId::SpellsTail), Some(4 * 4));
        assert_eq!(len(SectionId::FxBlock), Some(16));
        // short, empty string, 21-int block, two empty strings, two ints
        assert_eq!(len(SectionId::PreInventory), Some(2 + 1 + 23 * 4 + 2));
    }

    #[test]
    fn truncation_names_the_section() {
        let bytes = sample().emit_to_vec().unwrap();
        let (_, layout) = Character::parse_with_layout(Cursor::new(&bytes)).unwrap();
        let cut = layout.range(SectionId::FxBlock).unwrap().start + 6;

        let err = Character::parse(Cursor::new(&bytes[..cut])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
        assert!(err.to_string().contains("fx block"), "{err}");
    }

    #[test]
    fn empty_input_is_truncated() {
        let err = Character::parse(Cursor::new(Vec::new())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn unencodable_name_fails_to_emit() {
        let mut character = sample();
        character.name = "\u{263a}".to_string();
        let err = character.emit_to_vec().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn derived_views() {
        let mut character = sample();
        assert_eq!(character.fx_preset(), FxPreset::Ordinary);
        assert_eq!(character.picture_number(), Some(3));
        assert_eq!(character.equipped(EquipSlot::Helm).item_name, "Leather Cap");
        assert!(character.knows_spell(1));
        assert!(!character.knows_spell(0));
        assert!(!character.knows_spell(39));

        character.disease = Diseases::LEPROSY.raw();
        assert!(character.diseases().contains(Diseases::LEPROSY));

        character.picid = 300;
        assert_eq!(character.picture_number(), None);
        assert_eq!(character.inventory_items().count(), 70);
    }

    #[test]
    fn replicate_shares_nothing() {
        let original = sample();
        let mut copy = original.replicate();
        copy.name.push('!');
        copy.statuses[1] = 0;
        copy.spells[38] = 7;
        *copy.skills.get_mut(1).unwrap() = 99;
        copy.readyslots[0].spell.clear();
        copy.inventory[9][6].item_name = "Gold".to_string();
        copy.equipment[1].weight = 3;
        copy.unknowns.items[0].quantity = 4;
        copy.unknowns.extradata.push(0);

        assert_eq!(original, sample());
    }
}
