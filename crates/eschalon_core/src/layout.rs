use std::fmt;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        (self.start..self.end).contains(&offset)
    }
}

/// One step of the save schema, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    InitZero,
    Identity,
    CharOne,
    PrimaryStats,
    Skills,
    Vitals,
    BeginZero,
    Statuses,
    IBlock1,
    UnknownTriples,
    Extension,
    Torches,
    AnotherZero,
    SpellsHead,
    ReadySlots,
    Position,
    FxBlock,
    Appearance,
    PreInventory,
    Inventory,
    Equipment,
    UnknownItems,
    SpellsTail,
    ExtraData,
}

impl SectionId {
    pub const ALL: [SectionId; 24] = [
        SectionId::InitZero,
        SectionId::Identity,
        SectionId::CharOne,
        SectionId::PrimaryStats,
        SectionId::Skills,
        SectionId::Vitals,
        SectionId::BeginZero,
        SectionId::Statuses,
        SectionId::IBlock1,
        SectionId::UnknownTriples,
        SectionId::Extension,
        SectionId::Torches,
        SectionId::AnotherZero,
        SectionId::SpellsHead,
        SectionId::ReadySlots,
        SectionId::Position,
        SectionId::FxBlock,
        SectionId::Appearance,
        SectionId::PreInventory,
        SectionId::Inventory,
        SectionId::Equipment,
        SectionId::UnknownItems,
        SectionId::SpellsTail,
        SectionId::ExtraData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::InitZero => "init zero",
            SectionId::Identity => "identity strings",
            SectionId::CharOne => "char one",
            SectionId::PrimaryStats => "primary stats",
            SectionId::Skills => "skills",
            SectionId::Vitals => "vitals",
            SectionId::BeginZero => "begin zeros",
            SectionId::Statuses => "statuses",
            SectionId::IBlock1 => "int block 1",
            SectionId::UnknownTriples => "unknown triples",
            SectionId::Extension => "extension strings",
            SectionId::Torches => "torches",
            SectionId::AnotherZero => "another zero",
            SectionId::SpellsHead => "spells 1-35",
            SectionId::ReadySlots => "readied spells",
            SectionId::Position => "position",
            SectionId::FxBlock => "fx block",
            SectionId::Appearance => "appearance",
            SectionId::PreInventory => "pre-inventory block",
            SectionId::Inventory => "inventory",
            SectionId::Equipment => "equipment",
            SectionId::UnknownItems => "unknown items",
            SectionId::SpellsTail => "spells 36-39",
            SectionId::ExtraData => "extra data",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLayout {
    pub id: SectionId,
    pub range: ByteRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLayout {
    pub file_len: usize,
    pub sections: Vec<SectionLayout>,
}

impl FileLayout {
    pub fn section(&self, id: SectionId) -> Option<&SectionLayout> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn range(&self, id: SectionId) -> Option<ByteRange> {
        self.section(id).map(|section| section.range)
    }

    /// The section owning `offset`. Empty sections never match.
    pub fn section_at(&self, offset: usize) -> Option<SectionId> {
        self.sections
            .iter()
            .find(|section| section.range.contains(offset))
            .map(|section| section.id)
    }

    /// Checks that the recorded sections follow schema order and tile the
    /// whole save with no gaps or overlaps.
    pub fn validate(&self) -> io::Result<()> {
        if self.sections.is_empty() {
            return Err(corrupt("save layout records no sections".to_string()));
        }

        let mut offset = 0usize;
        let mut prev: Option<SectionId> = None;
        for section in &self.sections {
            let (id, range) = (section.id, section.range);
            if let Some(prev) = prev {
                if schema_step(id) <= schema_step(prev) {
                    return Err(corrupt(format!("{id} recorded after {prev}")));
                }
            }
            if range.start != offset {
                return Err(corrupt(format!(
                    "{id} starts at byte {}, expected {offset}",
                    range.start
                )));
            }
            if range.end < range.start {
                return Err(corrupt(format!(
                    "{id} ends at byte {} before it starts",
                    range.end
                )));
            }
            offset = range.end;
            prev = Some(id);
        }

        if offset != self.file_len {
            return Err(corrupt(format!(
                "sections end at byte {offset} but the save is {} bytes",
                self.file_len
            )));
        }
        Ok(())
    }
}

fn schema_step(id: SectionId) -> usize {
    SectionId::ALL
        .iter()
        .position(|step| *step == id)
        .unwrap_or(usize::MAX)
}

fn corrupt(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::{ByteRange, FileLayout, SectionId, SectionLayout};

    fn layout(ranges: &[(SectionId, usize, usize)], file_len: usize) -> FileLayout {
        FileLayout {
            file_len,
            sections: ranges
                .iter()
                .map(|&(id, start, end)| SectionLayout {
                    id,
                    range: ByteRange { start, end },
                })
                .collect(),
        }
    }

    #[test]
    fn contiguous_layout_validates() {
        let l = layout(
            &[
                (SectionId::InitZero, 0, 4),
                (SectionId::Identity, 4, 9),
                (SectionId::ExtraData, 9, 9),
            ],
            9,
        );
        l.validate().expect("layout should validate");
        assert_eq!(l.section_at(5), Some(SectionId::Identity));
        assert_eq!(l.section_at(9), None);
    }

    #[test]
    fn gaps_and_short_coverage_are_rejected() {
        let gap = layout(
            &[(SectionId::InitZero, 0, 4), (SectionId::Identity, 5, 9)],
            9,
        );
        assert!(gap.validate().is_err());

        let short = layout(&[(SectionId::InitZero, 0, 4)], 8);
        assert!(short.validate().is_err());

        assert!(layout(&[], 0).validate().is_err());
    }

    #[test]
    fn errors_name_the_offending_section() {
        let gap = layout(
            &[(SectionId::InitZero, 0, 4), (SectionId::Identity, 5, 9)],
            9,
        );
        let err = gap.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(
            err.to_string(),
            format!("{} starts at byte 5, expected 4", SectionId::Identity)
        );

        let short = layout(&[(SectionId::InitZero, 0, 4)], 8);
        assert_eq!(
            short.validate().unwrap_err().to_string(),
            "sections end at byte 4 but the save is 8 bytes"
        );
    }

    #[test]
    fn sections_out_of_schema_order_are_rejected() {
        let swapped = layout(
            &[(SectionId::Identity, 0, 4), (SectionId::InitZero, 4, 8)],
            8,
        );
        let err = swapped.validate().unwrap_err();
        assert!(err.to_string().contains("recorded after"), "{err}");
    }

    #[test]
    fn section_ids_cover_every_schema_step_once() {
        let mut names: Vec<&str> = SectionId::ALL.iter().map(|id| id.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SectionId::ALL.len());
    }
}
