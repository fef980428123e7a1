use std::io::{self, Read, Write};

use crate::item::Item;
use crate::reader::LittleEndianReader;
use crate::tables::{IBLOCK2_LEN, INVENTORY_COLS, INVENTORY_ROWS, STATUS_COUNT};
use crate::unknowns::UnknownTriple;
use crate::writer::LittleEndianWriter;

pub type InventoryGrid = [[Item; INVENTORY_COLS]; INVENTORY_ROWS];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadySlot {
    pub spell: String,
    pub level: i32,
}

impl ReadySlot {
    pub fn is_empty(&self) -> bool {
        self.spell.is_empty()
    }
}

// --- Step 2: identity strings ---

pub(super) struct Identity {
    pub name: String,
    pub charstring: String,
    pub origin: String,
    pub axiom: String,
    pub classname: String,
}

pub(super) fn read_identity<R: Read>(r: &mut LittleEndianReader<R>) -> io::Result<Identity> {
    Ok(Identity {
        name: r.read_string()?,
        charstring: r.read_string()?,
        origin: r.read_string()?,
        axiom: r.read_string()?,
        classname: r.read_string()?,
    })
}

// --- Step 6: vitals ---

pub(super) struct Vitals {
    pub maxhp: i32,
    pub maxmana: i32,
    pub curhp: i32,
    pub curmana: i32,
    pub experience: i32,
    pub level: i32,
    pub gold: i32,
}

pub(super) fn read_vitals<R: Read>(r: &mut LittleEndianReader<R>) -> io::Result<Vitals> {
    let [maxhp, maxmana, curhp, curmana, experience, level, gold] = r.read_i32_array::<7>()?;
    Ok(Vitals {
        maxhp,
        maxmana,
        curhp,
        curmana,
        experience,
        level,
        gold,
    })
}

// --- Step 8: statuses, each followed by its sparse companion ---

pub(super) fn read_statuses<R: Read>(
    r: &mut LittleEndianReader<R>,
) -> io::Result<([i32; STATUS_COUNT], [i32; STATUS_COUNT])> {
    let mut statuses = [0i32; STATUS_COUNT];
    let mut sparse = [0i32; STATUS_COUNT];
    for (status, companion) in statuses.iter_mut().zip(sparse.iter_mut()) {
        *status = r.read_i32()?;
        *companion = r.read_i32()?;
    }
    Ok((statuses, sparse))
}

pub(super) fn write_statuses<W: Write>(
    w: &mut LittleEndianWriter<W>,
    statuses: &[i32; STATUS_COUNT],
    sparse: &[i32; STATUS_COUNT],
) -> io::Result<()> {
    for (status, companion) in statuses.iter().zip(sparse) {
        w.write_i32(*status)?;
        w.write_i32(*companion)?;
    }
    Ok(())
}

// --- Step 10: unknown triples ---

pub(super) fn read_triple<R: Read>(r: &mut LittleEndianReader<R>) -> io::Result<UnknownTriple> {
    Ok(UnknownTriple {
        first: r.read_string()?,
        second: r.read_string()?,
        value: r.read_i32()?,
    })
}

pub(super) fn write_triple<W: Write>(
    w: &mut LittleEndianWriter<W>,
    triple: &UnknownTriple,
) -> io::Result<()> {
    w.write_string(&triple.first)?;
    w.write_string(&triple.second)?;
    w.write_i32(triple.value)
}

// --- Step 15: readied spells ---

pub(super) fn read_readyslot<R: Read>(r: &mut LittleEndianReader<R>) -> io::Result<ReadySlot> {
    Ok(ReadySlot {
        spell: r.read_string()?,
        level: r.read_i32()?,
    })
}

pub(super) fn write_readyslot<W: Write>(
    w: &mut LittleEndianWriter<W>,
    slot: &ReadySlot,
) -> io::Result<()> {
    w.write_string(&slot.spell)?;
    w.write_i32(slot.level)
}

// --- Step 19: pre-inventory block ---

pub(super) struct PreInventory {
    pub shortval: u16,
    pub emptystr: String,
    pub iblock2: [i32; IBLOCK2_LEN],
    pub preinvstr1: String,
    pub preinvstr2: String,
    pub preinvzero1: i32,
    pub preinvzero2: i32,
}

pub(super) fn read_preinventory<R: Read>(
    r: &mut LittleEndianReader<R>,
) -> io::Result<PreInventory> {
    Ok(PreInventory {
        shortval: r.read_u16()?,
        emptystr: r.read_string()?,
        iblock2: r.read_i32_array::<IBLOCK2_LEN>()?,
        preinvstr1: r.read_string()?,
        preinvstr2: r.read_string()?,
        preinvzero1: r.read_i32()?,
        preinvzero2: r.read_i32()?,
    })
}

// --- Step 20: inventory grid, row-major ---

pub(super) fn read_inventory<R: Read>(r: &mut LittleEndianReader<R>) -> io::Result<InventoryGrid> {
    r.read_array_with(|r| r.read_array_with(Item::read))
}

pub(super) fn write_items<W: Write>(w: &mut LittleEndianWriter<W>, items: &[Item]) -> io::Result<()> {
    for item in items {
        item.write(w)?;
    }
    Ok(())
}

pub(super) fn write_inventory<W: Write>(
    w: &mut LittleEndianWriter<W>,
    grid: &InventoryGrid,
) -> io::Result<()> {
    for row in grid {
        write_items(w, row)?;
    }
    Ok(())
}
