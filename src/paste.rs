//! Reading and writing the Showdown export format.
//!
//! ```text
//! Sparky (Pikachu) (F) @ Light Ball
//! Ability: Static
//! EVs: 252 Atk / 4 SpD / 252 Spe
//! Jolly Nature
//! - Volt Tackle
//! ```
//!
//! Pokemon are separated by blank lines. Rendering always produces the same layout, so text
//! that went through [`parse_paste`] and [`render_paste`] once comes back unchanged.
use std::fmt;

use num_derive::FromPrimitive;

use crate::error::ParseError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromPrimitive)]
pub enum Gender {
    Male = 0,
    Female = 1,
    #[default]
    Unspecified = 2,
}

// Keys a Showdown export can hold, lower case. Anything else with a colon may be a name.
const KNOWN_KEYS: [&str; 11] = [
    "ability",
    "level",
    "shiny",
    "tera type",
    "evs",
    "ivs",
    "happiness",
    "hidden power",
    "pokeball",
    "dynamax level",
    "gigantamax",
];

pub const STAT_NAMES: [&str; 6] = ["HP", "Atk", "Def", "SpA", "SpD", "Spe"];

/// One value per stat, in [`STAT_NAMES`] order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stats(pub [u8; 6]);

impl Stats {
    pub const NO_EVS: Stats = Stats([0; 6]);
    pub const PERFECT_IVS: Stats = Stats([31; 6]);

    /// `252 Atk / 4 Def`, leaving out every stat still at `default`.
    fn render(&self, default: u8) -> Option<String> {
        let parts = self
            .0
            .iter()
            .zip(STAT_NAMES)
            .filter(|(value, _)| **value != default)
            .map(|(value, name)| format!("{value} {name}"))
            .collect::<Vec<_>>();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" / "))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasteEntry {
    pub species: String,
    pub gender: Gender,
    pub item: Option<String>,
    pub ability: Option<String>,
    pub level: Option<u8>,
    pub shiny: bool,
    pub tera: Option<String>,
    pub evs: Stats,
    pub nature: Option<String>,
    pub ivs: Stats,
    pub moves: Vec<String>,
}

impl Default for PasteEntry {
    fn default() -> Self {
        PasteEntry {
            species: String::new(),
            gender: Gender::Unspecified,
            item: None,
            ability: None,
            level: None,
            shiny: false,
            tera: None,
            evs: Stats::NO_EVS,
            nature: None,
            ivs: Stats::PERFECT_IVS,
            moves: Vec::new(),
        }
    }
}

impl fmt::Display for PasteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.species)?;
        match self.gender {
            Gender::Male => write!(f, " (M)")?,
            Gender::Female => write!(f, " (F)")?,
            Gender::Unspecified => {}
        }
        if let Some(item) = &self.item {
            write!(f, " @ {item}")?;
        }
        writeln!(f)?;

        if let Some(ability) = &self.ability {
            writeln!(f, "Ability: {ability}")?;
        }
        if let Some(level) = self.level {
            writeln!(f, "Level: {level}")?;
        }
        if self.shiny {
            writeln!(f, "Shiny: Yes")?;
        }
        if let Some(tera) = &self.tera {
            writeln!(f, "Tera Type: {tera}")?;
        }
        if let Some(evs) = self.evs.render(0) {
            writeln!(f, "EVs: {evs}")?;
        }
        if let Some(nature) = &self.nature {
            writeln!(f, "{nature} Nature")?;
        }
        if let Some(ivs) = self.ivs.render(31) {
            writeln!(f, "IVs: {ivs}")?;
        }
        for m in &self.moves {
            writeln!(f, "- {m}")?;
        }
        Ok(())
    }
}

pub fn parse_paste(paste: &str) -> Result<Vec<PasteEntry>, ParseError> {
    let text = paste.replace("\r\n", "\n");
    let blocks = split_into_blocks(&text);
    if blocks.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    blocks.iter().map(|block| parse_entry(block)).collect()
}

pub fn render_paste(entries: &[PasteEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn split_into_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.trim());
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn parse_entry(lines: &[&str]) -> Result<PasteEntry, ParseError> {
    let missing_name = || ParseError::MissingName {
        block: lines.join("\n"),
    };
    let (header, rest) = lines.split_first().ok_or_else(missing_name)?;
    if header.starts_with('-') || is_key_line(header) || nature_of(header).is_some() {
        return Err(missing_name());
    }

    let mut entry = parse_header(header).ok_or_else(missing_name)?;
    for line in rest {
        if let Some(move_name) = line.strip_prefix('-') {
            entry.moves.push(move_name.trim().to_string());
        } else if let Some((key, value)) = line.split_once(':') {
            let value = value.trim();
            match key.trim().to_lowercase().as_str() {
                "ability" => entry.ability = non_empty(value),
                "level" => {
                    let level = value.parse::<u8>().map_err(|_| ParseError::MalformedLine {
                        line: line.to_string(),
                    })?;
                    entry.level = Some(level);
                }
                "shiny" => entry.shiny = value.eq_ignore_ascii_case("yes"),
                "tera type" => entry.tera = non_empty(value),
                "evs" => entry.evs = parse_stats(value, Stats::NO_EVS)?,
                "ivs" => entry.ivs = parse_stats(value, Stats::PERFECT_IVS)?,
                other => log::debug!("Ignoring unsupported '{other}' line"),
            }
        } else if let Some(nature) = nature_of(line) {
            entry.nature = Some(nature.to_string());
        } else {
            return Err(ParseError::MalformedLine {
                line: line.to_string(),
            });
        }
    }

    Ok(entry)
}

// [Nickname (]Species[)] [(M|F)] [@ Item]
fn parse_header(line: &str) -> Option<PasteEntry> {
    let (name, item) = match line.split_once('@') {
        Some((name, item)) => (name.trim(), non_empty(item.trim())),
        None => (line.trim(), None),
    };

    let mut name = name;
    let mut gender = Gender::Unspecified;
    for (suffix, suffix_gender) in [
        ("(M)", Gender::Male),
        ("(m)", Gender::Male),
        ("(F)", Gender::Female),
        ("(f)", Gender::Female),
    ] {
        if let Some(rest) = name.strip_suffix(suffix) {
            name = rest.trim_end();
            gender = suffix_gender;
            break;
        }
    }

    if name.ends_with(')') {
        if let Some(open) = name.rfind('(') {
            name = name[open + 1..name.len() - 1].trim();
        }
    }

    if name.is_empty() {
        return None;
    }

    Some(PasteEntry {
        species: name.to_string(),
        gender,
        item,
        ..Default::default()
    })
}

fn parse_stats(text: &str, defaults: Stats) -> Result<Stats, ParseError> {
    let malformed = || ParseError::MalformedStats {
        line: text.to_string(),
    };
    let mut stats = defaults;
    for part in text.split('/') {
        let mut words = part.split_whitespace();
        let (Some(value), Some(stat), None) = (words.next(), words.next(), words.next()) else {
            return Err(malformed());
        };
        let value = value.parse::<u8>().map_err(|_| malformed())?;
        let idx = STAT_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(stat))
            .ok_or_else(malformed)?;
        stats.0[idx] = value;
    }
    Ok(stats)
}

fn is_key_line(line: &str) -> bool {
    line.split_once(':')
        .map(|(key, _)| KNOWN_KEYS.contains(&key.trim().to_lowercase().as_str()))
        .unwrap_or(false)
}

fn nature_of(line: &str) -> Option<&str> {
    let split = line.len().checked_sub(" nature".len())?;
    if !line.is_char_boundary(split) {
        return None;
    }
    let (nature, suffix) = line.split_at(split);
    if suffix.eq_ignore_ascii_case(" nature") {
        non_empty_str(nature.trim())
    } else {
        None
    }
}

fn non_empty_str(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn non_empty(value: &str) -> Option<String> {
    non_empty_str(value).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_entry() {
        let paste = "Sparky (Pikachu) (F) @ Light Ball
Ability: Static
Level: 50
Shiny: Yes
Tera Type: Electric
EVs: 4 HP / 252 Atk / 252 Spe
Jolly Nature
IVs: 0 SpA
- Volt Tackle
- Protect";
        let entries = parse_paste(paste).unwrap();
        assert_eq!(entries.len(), 1);
        let pikachu = &entries[0];
        assert_eq!(pikachu.species, "Pikachu");
        assert_eq!(pikachu.gender, Gender::Female);
        assert_eq!(pikachu.item.as_deref(), Some("Light Ball"));
        assert_eq!(pikachu.ability.as_deref(), Some("Static"));
        assert_eq!(pikachu.level, Some(50));
        assert!(pikachu.shiny);
        assert_eq!(pikachu.tera.as_deref(), Some("Electric"));
        assert_eq!(pikachu.evs, Stats([4, 252, 0, 0, 0, 252]));
        assert_eq!(pikachu.nature.as_deref(), Some("Jolly"));
        assert_eq!(pikachu.ivs, Stats([31, 31, 31, 0, 31, 31]));
        assert_eq!(pikachu.moves, vec!["Volt Tackle", "Protect"]);
    }

    #[test]
    fn test_render_is_canonical() {
        let paste = "Pikachu (F) @ Light Ball
Ability: Static
Level: 50
Shiny: Yes
Tera Type: Electric
EVs: 4 HP / 252 Atk / 252 Spe
Jolly Nature
IVs: 0 SpA
- Volt Tackle
- Protect

Bulbasaur
Ability: Overgrow
- Tackle
";
        let entries = parse_paste(paste).unwrap();
        assert_eq!(render_paste(&entries), paste);
    }

    #[test]
    fn test_windows_line_endings_and_extra_blank_lines() {
        let paste = "Pikachu\r\n- Thunderbolt\r\n\r\n\r\n\r\nRaichu @ Life Orb\r\n- Surf\r\n";
        let entries = parse_paste(paste).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].species, "Raichu");
        assert_eq!(entries[1].item.as_deref(), Some("Life Orb"));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let entries = parse_paste("Ditto\nHappiness: 0\nGigantamax: Yes").unwrap();
        assert_eq!(entries[0].species, "Ditto");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_paste(" \n\n "), Err(ParseError::EmptyInput)));
    }

    #[test]
    fn test_block_without_name() {
        assert!(matches!(
            parse_paste("Ability: Static\n- Thunderbolt"),
            Err(ParseError::MissingName { .. })
        ));
        assert!(matches!(
            parse_paste("(M) @ Leftovers"),
            Err(ParseError::MissingName { .. })
        ));
    }

    #[test]
    fn test_species_with_colon() {
        let entries =
            parse_paste("Type: Null @ Eviolite\nAbility: Battle Armor\nLevel: 100").unwrap();
        assert_eq!(entries[0].species, "Type: Null");
        assert_eq!(entries[0].item.as_deref(), Some("Eviolite"));
        assert_eq!(entries[0].level, Some(100));

        let entries = parse_paste("Silvally-to-be (Type: Null)").unwrap();
        assert_eq!(entries[0].species, "Type: Null");

        assert!(matches!(
            parse_paste("Tera Type: Normal\nAbility: Battle Armor"),
            Err(ParseError::MissingName { .. })
        ));
    }

    #[test]
    fn test_malformed_stats() {
        assert!(matches!(
            parse_paste("Pikachu\nEVs: 252 Attack"),
            Err(ParseError::MalformedStats { .. })
        ));
        assert!(matches!(
            parse_paste("Pikachu\nEVs: lots HP"),
            Err(ParseError::MalformedStats { .. })
        ));
    }

    #[test]
    fn test_malformed_line() {
        assert!(matches!(
            parse_paste("Pikachu\nthis is not a paste line"),
            Err(ParseError::MalformedLine { .. })
        ));
        assert!(matches!(
            parse_paste("Pikachu\nLevel: one hundred"),
            Err(ParseError::MalformedLine { .. })
        ));
    }

    #[test]
    fn test_nature_detection() {
        assert_eq!(nature_of("Jolly Nature"), Some("Jolly"));
        assert_eq!(nature_of("timid nature"), Some("timid"));
        assert_eq!(nature_of(" Nature"), None);
        assert_eq!(nature_of("Naïve"), None);
    }
}
