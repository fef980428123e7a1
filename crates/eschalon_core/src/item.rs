use std::fmt;
use std::io::{self, Read, Write};

use bitflags::bitflags;
use serde::Serialize;

use crate::fields::{ItemField, Slot, SlotMut};
use crate::reader::LittleEndianReader;
use crate::tables::item_type_name;
use crate::writer::{LittleEndianWriter, encode_latin1};

bitflags! {
    /// Bits of the 16-bit item flags field. Bits outside the named set are
    /// kept as-is.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ItemFlags: u16 {
        const IDENTIFIED = 0x0001;
        const MAGIC = 0x0002;
        const CURSED = 0x0004;
        const QUEST = 0x0008;
        const SPECIAL = 0x0010;
    }
}

impl ItemFlags {
    pub fn from_raw(raw: u16) -> Self {
        Self::from_bits_retain(raw)
    }
}

/// One inventory, equipment or opaque item record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub item_name: String,
    pub item_type: i32,
    pub subtype: i32,
    pub pictureid: i32,
    pub value: i32,
    pub weight: i32,
    pub basedamage: i32,
    pub basearmor: i32,
    pub flags: u16,
    pub attr_modifier: i32,
    pub attr_modified: i32,
    pub skill_modifier: i32,
    pub skill_modified: i32,
    pub incr: i32,
    pub hitpoint: i32,
    pub mana: i32,
    pub tohit: i32,
    pub damage: i32,
    pub armor: i32,
    pub visibility: i32,
    pub duration: i32,
    pub canstack: i32,
    pub quantity: i32,
    pub script: String,
    pub zero1: i32,
    pub emptystr: String,
}

impl Item {
    /// An empty slot: every number zero, every string empty.
    pub fn zero() -> Self {
        Self::filled(0)
    }

    /// Placeholder for a record about to be read; numbers are -1.
    pub fn fresh() -> Self {
        Self::filled(-1)
    }

    fn filled(number: i32) -> Self {
        Self {
            item_name: String::new(),
            item_type: number,
            subtype: number,
            pictureid: number,
            value: number,
            weight: number,
            basedamage: number,
            basearmor: number,
            flags: number as u16,
            attr_modifier: number,
            attr_modified: number,
            skill_modifier: number,
            skill_modified: number,
            incr: number,
            hitpoint: number,
            mana: number,
            tohit: number,
            damage: number,
            armor: number,
            visibility: number,
            duration: number,
            canstack: number,
            quantity: number,
            script: String::new(),
            zero1: number,
            emptystr: String::new(),
        }
    }

    pub fn read<R: Read>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        let mut item = Self::fresh();
        for field in ItemField::SCHEMA {
            match item.slot_mut(field) {
                SlotMut::Int(v) => *v = r.read_i32()?,
                SlotMut::Short(v) => *v = r.read_u16()?,
                SlotMut::Text(v) => *v = r.read_string()?,
            }
        }
        Ok(item)
    }

    pub fn write<W: Write>(&self, w: &mut LittleEndianWriter<W>) -> io::Result<()> {
        for field in ItemField::SCHEMA {
            match self.slot(field) {
                Slot::Int(v) => w.write_i32(*v)?,
                Slot::Short(v) => w.write_u16(*v)?,
                Slot::Text(v) => w.write_string(v)?,
            }
        }
        Ok(())
    }

    /// Size of this record on disk.
    pub fn encoded_len(&self) -> io::Result<usize> {
        let mut len = 0;
        for field in ItemField::SCHEMA {
            len += match self.slot(field) {
                Slot::Int(_) => 4,
                Slot::Short(_) => 2,
                Slot::Text(v) => 1 + encode_latin1(v)?.len(),
            };
        }
        Ok(len)
    }

    pub fn is_empty(&self) -> bool {
        self.item_name.is_empty()
    }

    pub fn item_flags(&self) -> ItemFlags {
        ItemFlags::from_raw(self.flags)
    }

    pub fn has_border(&self) -> bool {
        self.item_flags().contains(ItemFlags::SPECIAL)
    }

    pub fn replicate(&self) -> Self {
        self.clone()
    }

    pub fn type_name(&self) -> Option<&'static str> {
        item_type_name(self.item_type)
    }

    /// One-line description for listings.
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "(empty)".to_string();
        }
        let mut out = self.item_name.clone();
        if self.canstack != 0 && self.quantity > 1 {
            out.push_str(&format!(" x{}", self.quantity));
        }
        if let Some(kind) = self.type_name() {
            out.push_str(&format!(" [{kind}]"));
        }
        out
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
