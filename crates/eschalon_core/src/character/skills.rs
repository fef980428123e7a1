use std::io::{self, Read, Write};

use crate::reader::LittleEndianReader;
use crate::tables::{SKILL_COUNT, SKILL_TABLE, SkillDef, skill_index};
use crate::writer::LittleEndianWriter;

/// Skill levels keyed by the static skill table. The key set never changes
/// and iteration always follows table order, which is also the file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillSet {
    levels: [i32; SKILL_COUNT],
}

impl SkillSet {
    pub fn from_levels(levels: [i32; SKILL_COUNT]) -> Self {
        Self { levels }
    }

    pub fn read<R: Read>(r: &mut LittleEndianReader<R>) -> io::Result<Self> {
        Ok(Self::from_levels(r.read_i32_array::<SKILL_COUNT>()?))
    }

    pub fn write<W: Write>(&self, w: &mut LittleEndianWriter<W>) -> io::Result<()> {
        w.write_i32_slice(&self.levels)
    }

    pub fn get(&self, id: u8) -> Option<i32> {
        skill_index(id).map(|index| self.levels[index])
    }

    pub fn get_mut(&mut self, id: u8) -> Option<&mut i32> {
        skill_index(id).map(|index| &mut self.levels[index])
    }

    pub fn levels(&self) -> &[i32; SKILL_COUNT] {
        &self.levels
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static SkillDef, i32)> + '_ {
        SKILL_TABLE.iter().zip(self.levels.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::SkillSet;
    use crate::reader::LittleEndianReader;
    use crate::tables::SKILL_TABLE;
    use crate::writer::LittleEndianWriter;

    #[test]
    fn keys_are_the_skill_table_in_order() {
        let skills = SkillSet::from_levels(std::array::from_fn(|i| i as i32));
        let ids: Vec<u8> = skills.iter().map(|(def, _)| def.id).collect();
        let table: Vec<u8> = SKILL_TABLE.iter().map(|def| def.id).collect();

        assert_eq!(ids, table);
        assert_eq!(skills.len(), 24);
        assert_eq!(skills.get(1), Some(0));
        assert_eq!(skills.get(24), Some(23));
        assert_eq!(skills.get(99), None);
    }

    #[test]
    fn levels_are_written_in_table_order() {
        let mut skills = SkillSet::from_levels([0; 24]);
        *skills.get_mut(2).unwrap() = 7;

        let mut w = LittleEndianWriter::new(Vec::new());
        skills.write(&mut w).unwrap();
        let bytes = w.into_inner();
        assert_eq!(bytes.len(), 24 * 4);
        assert_eq!(&bytes[4..8], &[7, 0, 0, 0]);

        let mut r = LittleEndianReader::new(Cursor::new(bytes));
        assert_eq!(SkillSet::read(&mut r).unwrap(), skills);
    }
}
