use std::fmt::{self, Write as _};

use crate::item::Item;
use crate::tables::{
    IBLOCK1_LEN, IBLOCK2_LEN, STATUS_COUNT, UNKNOWN_ITEM_COUNT, UNKNOWN_TRIPLE_COUNT,
};

/// One (string, string, int) record from the block after iblock1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnknownTriple {
    pub first: String,
    pub second: String,
    pub value: i32,
}

/// Fields that are read and written back but never interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unknowns {
    pub initzero: i32,
    pub charstring: String,
    pub charone: i32,
    pub beginzero1: i32,
    pub beginzero2: i32,
    /// Companion of each status slot, interleaved with it on disk.
    pub sparse: [i32; STATUS_COUNT],
    pub iblock1: [i32; IBLOCK1_LEN],
    pub triples: [UnknownTriple; UNKNOWN_TRIPLE_COUNT],
    pub extstr1: String,
    pub extstr2: String,
    pub anotherzero: i32,
    pub anotherint: i32,
    pub shortval: u16,
    pub emptystr: String,
    pub iblock2: [i32; IBLOCK2_LEN],
    pub preinvstr1: String,
    pub preinvstr2: String,
    pub preinvzero1: i32,
    pub preinvzero2: i32,
    /// Item records stored between the equipment block and the last spells.
    pub items: [Item; UNKNOWN_ITEM_COUNT],
    pub extradata: Vec<u8>,
}

impl Unknowns {
    pub fn replicate(&self) -> Self {
        self.clone()
    }

    /// Line-per-field listing of every opaque value.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_dump(&mut out);
        out
    }

    fn write_dump(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "initzero: {}", self.initzero)?;
        writeln!(out, "charstring: {:?}", self.charstring)?;
        writeln!(out, "charone: {}", self.charone)?;
        writeln!(out, "beginzero: {} {}", self.beginzero1, self.beginzero2)?;
        writeln!(out, "sparse: {}", join_ints(&self.sparse))?;
        writeln!(out, "iblock1: {}", join_ints(&self.iblock1))?;
        for (i, triple) in self.triples.iter().enumerate() {
            writeln!(
                out,
                "triple {}: {:?} {:?} {}",
                i + 1,
                triple.first,
                triple.second,
                triple.value
            )?;
        }
        writeln!(out, "extension: {:?} {:?}", self.extstr1, self.extstr2)?;
        writeln!(out, "anotherzero: {}", self.anotherzero)?;
        writeln!(out, "anotherint: {}", self.anotherint)?;
        writeln!(out, "short: {} (0x{:04x})", self.shortval, self.shortval)?;
        writeln!(out, "emptystr: {:?}", self.emptystr)?;
        writeln!(out, "iblock2: {}", join_ints(&self.iblock2))?;
        writeln!(
            out,
            "preinventory: {:?} {:?} {} {}",
            self.preinvstr1, self.preinvstr2, self.preinvzero1, self.preinvzero2
        )?;
        for (i, item) in self.items.iter().enumerate() {
            writeln!(out, "item {}: {}", i + 1, item.describe())?;
        }
        writeln!(out, "extradata: {} bytes", self.extradata.len())?;
        for (row, chunk) in self.extradata.chunks(16).enumerate() {
            let hex: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
            writeln!(out, "  {:08x}  {}", row * 16, hex.join(" "))?;
        }
        Ok(())
    }
}

fn join_ints(values: &[i32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{UnknownTriple, Unknowns};
    use crate::item::Item;

    fn sample() -> Unknowns {
        Unknowns {
            initzero: 0,
            charstring: "abc".to_string(),
            charone: 1,
            beginzero1: 0,
            beginzero2: 0,
            sparse: [0; 26],
            iblock1: [7; 17],
            triples: std::array::from_fn(|i| UnknownTriple {
                first: format!("t{i}"),
                second: String::new(),
                value: i as i32,
            }),
            extstr1: String::new(),
            extstr2: String::new(),
            anotherzero: 0,
            anotherint: 3,
            shortval: 0x0102,
            emptystr: String::new(),
            iblock2: [0; 21],
            preinvstr1: String::new(),
            preinvstr2: String::new(),
            preinvzero1: 0,
            preinvzero2: 0,
            items: std::array::from_fn(|_| Item::zero()),
            extradata: (0u8..18).collect(),
        }
    }

    #[test]
    fn dump_lists_fields_and_hexdumps_the_tail() {
        let text = sample().dump();
        assert!(text.contains("charstring: \"abc\"\n"));
        assert!(text.contains("short: 258 (0x0102)\n"));
        assert!(text.contains("triple 5: \"t4\" \"\" 4\n"));
        assert!(text.contains("item 8: (empty)\n"));
        assert!(text.contains("extradata: 18 bytes\n"));
        assert!(text.contains("  00000010  10 11\n"));
    }

    #[test]
    fn replicate_copies_interior_lists() {
        let original = sample();
        let mut copy = original.replicate();
        copy.iblock1[0] = -1;
        copy.items[3].item_name = "Ghost".to_string();
        copy.extradata.clear();

        assert_eq!(original.iblock1[0], 7);
        assert!(original.items[3].is_empty());
        assert_eq!(original.extradata.len(), 18);
    }
}
