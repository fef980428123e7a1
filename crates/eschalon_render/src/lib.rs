use std::fmt::{self, Write as _};

use eschalon_core::core_api::{ItemEntry, Session, Snapshot};
use eschalon_core::fields::{FieldValue, ItemField};
use eschalon_core::item::Item;
use eschalon_core::layout::FileLayout;
use serde_json::{Map as JsonMap, Value as JsonValue};

const LABEL_WIDTH: usize = 14;
const TWO_COL_WIDTH_LEFT: usize = 30;
const ITEM_COL_WIDTH: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    /// Append the opaque fields after the summary.
    pub unknowns: bool,
}

pub fn render_summary(session: &Session) -> String {
    render_summary_with_options(session, TextRenderOptions::default())
}

pub fn render_summary_with_options(session: &Session, options: TextRenderOptions) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_summary(&mut out, session, options);
    out
}

pub fn render_unknowns(session: &Session) -> String {
    session.character().unknowns.dump()
}

/// One line per schema step: start, end, length, name.
pub fn render_layout(layout: &FileLayout) -> String {
    let mut out = String::new();
    let _ = write_layout(&mut out, layout);
    out
}

pub fn render_json_full(session: &Session, style: JsonStyle) -> JsonValue {
    render_json_full_with_options(session, style, TextRenderOptions::default())
}

pub fn render_json_full_with_options(
    session: &Session,
    style: JsonStyle,
    options: TextRenderOptions,
) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(default_json(session, options)),
    }
}

fn default_json(session: &Session, options: TextRenderOptions) -> JsonMap<String, JsonValue> {
    let snapshot = session.snapshot();
    let mut out = JsonMap::new();

    out.insert("name".to_string(), JsonValue::String(snapshot.name.clone()));
    out.insert(
        "origin".to_string(),
        JsonValue::String(snapshot.origin.clone()),
    );
    out.insert("axiom".to_string(), JsonValue::String(snapshot.axiom.clone()));
    out.insert(
        "class".to_string(),
        JsonValue::String(snapshot.classname.clone()),
    );
    out.insert("level".to_string(), JsonValue::from(snapshot.level));
    out.insert("xp".to_string(), JsonValue::from(snapshot.experience));
    out.insert("gold".to_string(), JsonValue::from(snapshot.gold));
    out.insert("hp".to_string(), JsonValue::from(snapshot.hp.current));
    out.insert("max_hp".to_string(), JsonValue::from(snapshot.hp.max));
    out.insert("mana".to_string(), JsonValue::from(snapshot.mana.current));
    out.insert("max_mana".to_string(), JsonValue::from(snapshot.mana.max));
    out.insert("stats".to_string(), stats_to_json(&snapshot));
    out.insert("skills".to_string(), skills_to_json(&snapshot));
    out.insert("statuses".to_string(), statuses_to_json(&snapshot));
    out.insert("diseases".to_string(), diseases_to_json(&snapshot));
    out.insert("spells".to_string(), spells_to_json(&snapshot));
    out.insert("readied_spells".to_string(), readyslots_to_json(&snapshot));
    out.insert("torches".to_string(), JsonValue::from(snapshot.torches));
    out.insert("torch_used".to_string(), JsonValue::from(snapshot.torchused));
    out.insert(
        "orientation".to_string(),
        JsonValue::String(snapshot.orientation.to_string()),
    );
    out.insert("x".to_string(), JsonValue::from(snapshot.xpos));
    out.insert("y".to_string(), JsonValue::from(snapshot.ypos));
    out.insert("fx".to_string(), JsonValue::String(snapshot.fx.to_string()));
    out.insert("picid".to_string(), JsonValue::from(snapshot.picid));
    out.insert(
        "picture".to_string(),
        match snapshot.picture {
            Some(v) => JsonValue::from(v),
            None => JsonValue::Null,
        },
    );
    out.insert("equipment".to_string(), items_to_json(&snapshot.equipment));
    out.insert("inventory".to_string(), items_to_json(&snapshot.inventory));
    out.insert(
        "extradata_len".to_string(),
        JsonValue::from(snapshot.extradata_len),
    );
    out.insert(
        "changes".to_string(),
        JsonValue::Array(
            session
                .changed_fields()
                .iter()
                .map(|change| JsonValue::String(change.to_string()))
                .collect(),
        ),
    );
    if options.unknowns {
        out.insert(
            "unknowns".to_string(),
            JsonValue::Array(
                render_unknowns(session)
                    .lines()
                    .map(|line| JsonValue::String(line.to_string()))
                    .collect(),
            ),
        );
    }

    out
}

fn stats_to_json(snapshot: &Snapshot) -> JsonValue {
    let mut m = JsonMap::new();
    for stat in &snapshot.stats {
        m.insert(stat.name.to_lowercase(), JsonValue::from(stat.value));
    }
    JsonValue::Object(m)
}

fn skills_to_json(snapshot: &Snapshot) -> JsonValue {
    JsonValue::Array(
        snapshot
            .skills
            .iter()
            .map(|s| {
                let mut m = JsonMap::new();
                m.insert("id".to_string(), JsonValue::from(s.id));
                m.insert("name".to_string(), JsonValue::String(s.name.clone()));
                m.insert("level".to_string(), JsonValue::from(s.level));
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn statuses_to_json(snapshot: &Snapshot) -> JsonValue {
    JsonValue::Array(
        snapshot
            .statuses
            .iter()
            .filter(|s| s.turns != 0)
            .map(|s| {
                let mut m = JsonMap::new();
                m.insert("index".to_string(), JsonValue::from(s.index));
                m.insert(
                    "name".to_string(),
                    match &s.name {
                        Some(name) => JsonValue::String(name.clone()),
                        None => JsonValue::Null,
                    },
                );
                m.insert("turns".to_string(), JsonValue::from(s.turns));
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn diseases_to_json(snapshot: &Snapshot) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("raw".to_string(), JsonValue::from(snapshot.disease_raw));
    m.insert(
        "active".to_string(),
        JsonValue::Array(
            snapshot
                .diseases
                .iter()
                .map(|name| JsonValue::String(name.clone()))
                .collect(),
        ),
    );
    JsonValue::Object(m)
}

fn spells_to_json(snapshot: &Snapshot) -> JsonValue {
    JsonValue::Array(
        snapshot
            .spells
            .iter()
            .filter(|s| s.known)
            .map(|s| {
                let mut m = JsonMap::new();
                m.insert("index".to_string(), JsonValue::from(s.index));
                m.insert("name".to_string(), JsonValue::String(s.name.clone()));
                m.insert(
                    "type".to_string(),
                    JsonValue::String(s.spell_type.code().to_string()),
                );
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn readyslots_to_json(snapshot: &Snapshot) -> JsonValue {
    JsonValue::Array(
        snapshot
            .readyslots
            .iter()
            .filter(|r| !r.spell.is_empty())
            .map(|r| {
                let mut m = JsonMap::new();
                m.insert("slot".to_string(), JsonValue::from(r.slot));
                m.insert("spell".to_string(), JsonValue::String(r.spell.clone()));
                m.insert("level".to_string(), JsonValue::from(r.level));
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn items_to_json(entries: &[ItemEntry]) -> JsonValue {
    JsonValue::Array(
        entries
            .iter()
            .map(|entry| {
                let mut m = JsonMap::new();
                m.insert(
                    "location".to_string(),
                    JsonValue::String(entry.location.clone()),
                );
                m.insert("item".to_string(), item_to_json(&entry.item));
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn item_to_json(item: &Item) -> JsonValue {
    let mut m = JsonMap::new();
    for field in ItemField::SCHEMA {
        let value = match item.field(field) {
            FieldValue::Int(v) => JsonValue::from(v),
            FieldValue::Short(v) => JsonValue::from(v),
            FieldValue::Text(v) => JsonValue::String(v),
        };
        m.insert(field.key().to_string(), value);
    }
    JsonValue::Object(m)
}

fn write_summary(out: &mut String, session: &Session, options: TextRenderOptions) -> fmt::Result {
    let snapshot = session.snapshot();

    writeln!(out, "{}", snapshot.name)?;
    writeln!(out, "{}", "=".repeat(snapshot.name.chars().count().max(8)))?;
    write_row(out, "Origin", &snapshot.origin)?;
    write_row(out, "Axiom", &snapshot.axiom)?;
    write_row(out, "Class", &snapshot.classname)?;
    write_row(out, "Level", &snapshot.level.to_string())?;
    write_row(out, "Experience", &format_number_with_commas(snapshot.experience))?;
    write_row(out, "Gold", &format_number_with_commas(snapshot.gold))?;
    write_row(
        out,
        "Hit Points",
        &format!("{}/{}", snapshot.hp.current, snapshot.hp.max),
    )?;
    write_row(
        out,
        "Mana",
        &format!("{}/{}", snapshot.mana.current, snapshot.mana.max),
    )?;
    write_row(
        out,
        "Torches",
        &format!("{} ({} turns used)", snapshot.torches, snapshot.torchused),
    )?;
    write_row(
        out,
        "Position",
        &format!(
            "({}, {}) facing {}",
            snapshot.xpos, snapshot.ypos, snapshot.orientation
        ),
    )?;
    write_row(out, "Effect", &snapshot.fx.to_string())?;
    let picture = match snapshot.picture {
        Some(n) => format!("{n} (id {})", snapshot.picid),
        None => format!("id {}", snapshot.picid),
    };
    write_row(out, "Picture", &picture)?;
    let diseases = if snapshot.diseases.is_empty() {
        "none".to_string()
    } else {
        snapshot.diseases.join(", ")
    };
    write_row(out, "Diseases", &diseases)?;
    writeln!(out)?;

    writeln!(out, "Primary stats")?;
    for pair in snapshot.stats.chunks(2) {
        let cells: Vec<String> = pair
            .iter()
            .map(|s| format!("{:<LABEL_WIDTH$}{:>3}", s.name, s.value))
            .collect();
        write_two_columns(out, &cells)?;
    }
    writeln!(out)?;

    writeln!(out, "Skills")?;
    for pair in snapshot.skills.chunks(2) {
        let cells: Vec<String> = pair
            .iter()
            .map(|s| format!("{:<22}{:>3}", fit_column(&s.name, 21), s.level))
            .collect();
        write_two_columns(out, &cells)?;
    }
    writeln!(out)?;

    writeln!(out, "Statuses")?;
    let active: Vec<_> = snapshot.statuses.iter().filter(|s| s.turns != 0).collect();
    if active.is_empty() {
        writeln!(out, "  none")?;
    }
    for status in active {
        let name = status
            .name
            .clone()
            .unwrap_or_else(|| format!("Status {}", status.index + 1));
        writeln!(out, "  {:<20}{} turns", name, status.turns)?;
    }
    writeln!(out)?;

    writeln!(out, "Spells")?;
    let known: Vec<_> = snapshot.spells.iter().filter(|s| s.known).collect();
    if known.is_empty() {
        writeln!(out, "  none")?;
    }
    for spell in known {
        writeln!(out, "  [{}] {}", spell.spell_type, spell.name)?;
    }
    for slot in snapshot.readyslots.iter().filter(|r| !r.spell.is_empty()) {
        writeln!(
            out,
            "  Ready {:>2}: {} (level {})",
            slot.slot + 1,
            slot.spell,
            slot.level
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Equipment")?;
    write_items(out, &snapshot.equipment)?;
    writeln!(out)?;

    writeln!(out, "Inventory")?;
    write_items(out, &snapshot.inventory)?;

    if snapshot.extradata_len > 0 {
        writeln!(out)?;
        writeln!(out, "{} trailing bytes preserved", snapshot.extradata_len)?;
    }

    if options.unknowns {
        writeln!(out)?;
        writeln!(out, "Unknowns")?;
        out.push_str(&render_unknowns(session));
    }

    Ok(())
}

fn write_row(out: &mut String, label: &str, value: &str) -> fmt::Result {
    writeln!(out, "  {:<LABEL_WIDTH$}{}", format!("{label}:"), value)
}

fn write_two_columns(out: &mut String, cells: &[String]) -> fmt::Result {
    match cells {
        [left, right] => writeln!(out, "  {:<TWO_COL_WIDTH_LEFT$}{}", left, right),
        [left] => writeln!(out, "  {}", left),
        _ => Ok(()),
    }
}

fn write_items(out: &mut String, entries: &[ItemEntry]) -> fmt::Result {
    if entries.is_empty() {
        return writeln!(out, "  none");
    }
    for entry in entries {
        let border = if entry.item.has_border() { " *" } else { "" };
        writeln!(
            out,
            "  {:<10}{}{}",
            entry.location,
            fit_column(&entry.item.describe(), ITEM_COL_WIDTH * 2),
            border
        )?;
    }
    Ok(())
}

fn write_layout(out: &mut String, layout: &FileLayout) -> fmt::Result {
    writeln!(out, "{:>8} {:>8} {:>7}  section", "start", "end", "len")?;
    for section in &layout.sections {
        writeln!(
            out,
            "{:>8} {:>8} {:>7}  {}",
            section.range.start,
            section.range.end,
            section.range.len(),
            section.id
        )?;
    }
    writeln!(out, "{} bytes", layout.file_len)
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut out: String = value.chars().take(width - 3).collect();
    out.push_str("...");
    out
}

fn format_number_with_commas(n: i32) -> String {
    let digits = i64::from(n).abs().to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        result.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}
