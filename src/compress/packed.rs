use num_traits::FromPrimitive;

use super::Compressor;
use crate::{
    binary::{self, PokemonBin, EV_BITS, IV_BITS, LEVEL_BITS, MOVE_SLOTS, RECORD_LEN},
    dex::{Dex, Table},
    error::{CorruptPayload, EncodeError},
    paste::{self, Gender, PasteEntry, Stats},
};

/// Packs every Pokemon into a fixed 21 byte record of [`Dex`] indices.
///
/// Anything the record has no room for (nicknames, ignored lines, spacing) is dropped, so
/// decoding gives back the canonical rendering of the paste rather than the exact input.
#[derive(Clone, Debug)]
pub struct PackedCompressor {
    dex: Dex,
}

impl PackedCompressor {
    pub fn new(dex: Dex) -> Self {
        PackedCompressor { dex }
    }

    pub fn pack_entry(&self, entry: &PasteEntry) -> Result<PokemonBin, EncodeError> {
        if entry.moves.len() > MOVE_SLOTS {
            return Err(EncodeError::TooManyMoves {
                species: entry.species.clone(),
                count: entry.moves.len(),
            });
        }

        let mut moves = [0u16; MOVE_SLOTS];
        for (slot, move_name) in entry.moves.iter().enumerate() {
            moves[slot] = self.optional(Table::Moves, Some(move_name.as_str()))?;
        }

        let level = match entry.level {
            // Zero is how a record says "no level line"
            Some(level) => fit("level", level.into(), 1, LEVEL_BITS)? as u8,
            None => 0,
        };

        Ok(PokemonBin {
            species: self.required(Table::Names, &entry.species)?,
            gender: entry.gender as u8,
            item: self.optional(Table::Items, entry.item.as_deref())?,
            ability: self.optional(Table::Abilities, entry.ability.as_deref())?,
            level,
            shiny: entry.shiny,
            tera: self.optional(Table::Teras, entry.tera.as_deref())? as u8,
            evs: fit_stats("EV", &entry.evs, EV_BITS)?,
            nature: self.optional(Table::Natures, entry.nature.as_deref())? as u8,
            ivs: fit_stats("IV", &entry.ivs, IV_BITS)?,
            moves,
        })
    }

    pub fn unpack_entry(
        &self,
        record: usize,
        pbin: &PokemonBin,
    ) -> Result<PasteEntry, CorruptPayload> {
        let bad_field = |field: &'static str, value: u32| CorruptPayload::BadField {
            record,
            field,
            value,
        };

        let species = self
            .dex
            .table(Table::Names)
            .get(pbin.species.into())
            .ok_or_else(|| bad_field("species", pbin.species.into()))?
            .to_string();
        let gender = Gender::from_u8(pbin.gender)
            .ok_or_else(|| bad_field("gender", pbin.gender.into()))?;

        let lookup = |table: Table, value: u16| -> Result<Option<String>, CorruptPayload> {
            match value {
                0 => Ok(None),
                idx => self
                    .dex
                    .table(table)
                    .get(usize::from(idx) - 1)
                    .map(|name| Some(name.to_string()))
                    .ok_or_else(|| bad_field(table.name(), idx.into())),
            }
        };

        let mut moves = Vec::with_capacity(MOVE_SLOTS);
        for move_id in pbin.moves {
            if let Some(move_name) = lookup(Table::Moves, move_id)? {
                moves.push(move_name);
            }
        }

        Ok(PasteEntry {
            species,
            gender,
            item: lookup(Table::Items, pbin.item)?,
            ability: lookup(Table::Abilities, pbin.ability)?,
            level: if pbin.level == 0 { None } else { Some(pbin.level) },
            shiny: pbin.shiny,
            tera: lookup(Table::Teras, pbin.tera.into())?,
            evs: Stats(pbin.evs),
            nature: lookup(Table::Natures, pbin.nature.into())?,
            ivs: Stats(pbin.ivs),
            moves,
        })
    }

    fn required(&self, table: Table, name: &str) -> Result<u16, EncodeError> {
        self.dex
            .table(table)
            .lookup(name)
            .map(|idx| idx as u16)
            .ok_or_else(|| EncodeError::UnknownEntry {
                table: table.name(),
                name: name.to_string(),
            })
    }

    // Zero means "not set", real entries are shifted up by one
    fn optional(&self, table: Table, name: Option<&str>) -> Result<u16, EncodeError> {
        match name {
            None => Ok(0),
            Some(name) => self.required(table, name).map(|idx| idx + 1),
        }
    }
}

impl Compressor for PackedCompressor {
    fn compress(&self, source: &str) -> Result<Vec<u8>, EncodeError> {
        let entries = paste::parse_paste(source)?;
        let records = entries
            .iter()
            .map(|entry| self.pack_entry(entry))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("Packed {} Pokemon", records.len());
        Ok(binary::pack_records(&records))
    }

    fn decompress(&self, packed: &[u8]) -> Result<String, CorruptPayload> {
        let entries = binary::unpack_records(packed)?
            .iter()
            .enumerate()
            .map(|(record, pbin)| self.unpack_entry(record, pbin))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(paste::render_paste(&entries))
    }

    fn record_len(&self) -> Option<usize> {
        Some(RECORD_LEN)
    }
}

fn fit(field: &'static str, value: u32, min: u32, bits: u32) -> Result<u32, EncodeError> {
    let max = (1 << bits) - 1;
    if value < min || value > max {
        Err(EncodeError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    } else {
        Ok(value)
    }
}

fn fit_stats(field: &'static str, stats: &Stats, bits: u32) -> Result<[u8; 6], EncodeError> {
    for value in stats.0 {
        fit(field, value.into(), 0, bits)?;
    }
    Ok(stats.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{CodecGateway, Format};

    const CANONICAL: &str = "Pikachu (F) @ Light Ball
Ability: Static
Level: 50
Shiny: Yes
Tera Type: Electric
EVs: 4 HP / 252 Atk / 252 Spe
Jolly Nature
IVs: 0 SpA
- Volt Tackle
- Protect

Great Tusk @ Booster Energy
Ability: Protosynthesis
Tera Type: Ground
EVs: 252 Atk / 4 Def / 252 Spe
Jolly Nature
- Headlong Rush
- Close Combat
";

    fn test_dex() -> Dex {
        Dex::from_texts(
            "Bulbasaur\nIvysaur\nPikachu\nGreat Tusk\nFlutter Mane",
            "Light Ball\nBooster Energy\nChoice Specs",
            "Static\nProtosynthesis",
            "Thunderbolt\nVolt Tackle\nProtect\nHeadlong Rush\nClose Combat\nMoonblast",
            "Hardy\nJolly\nTimid",
            "Normal\nElectric\nGround\nFairy",
        )
        .unwrap()
    }

    #[test]
    fn test_canonical_paste_round_trips() {
        let compressor = PackedCompressor::new(test_dex());
        let packed = compressor.compress(CANONICAL).unwrap();
        assert_eq!(packed.len(), 2 * RECORD_LEN);
        assert_eq!(compressor.decompress(&packed).unwrap(), CANONICAL);
    }

    #[test]
    fn test_input_is_canonicalised() {
        let compressor = PackedCompressor::new(test_dex());
        let messy = "Sparky (pikachu) (F) @ light ball\nability: static\nHappiness: 255\n-   thunderbolt";
        let packed = compressor.compress(messy).unwrap();
        assert_eq!(
            compressor.decompress(&packed).unwrap(),
            "Pikachu (F) @ Light Ball\nAbility: Static\n- Thunderbolt\n"
        );
    }

    #[test]
    fn test_missing_optionals_stay_missing() {
        let compressor = PackedCompressor::new(test_dex());
        let pbin = compressor
            .pack_entry(&paste::parse_paste("Bulbasaur").unwrap()[0])
            .unwrap();
        assert_eq!(pbin.species, 0);
        assert_eq!(pbin.item, 0);
        assert_eq!(pbin.moves, [0; MOVE_SLOTS]);
        assert_eq!(pbin.gender, Gender::Unspecified as u8);
        assert_eq!(pbin.ivs, [31; 6]);
        assert_eq!(compressor.decompress(&pbin.pack_to_bytes()).unwrap(), "Bulbasaur\n");
    }

    #[test]
    fn test_unknown_entries() {
        let compressor = PackedCompressor::new(test_dex());
        assert!(matches!(
            compressor.compress("Missingno"),
            Err(EncodeError::UnknownEntry { table: "names", .. })
        ));
        assert!(matches!(
            compressor.compress("Pikachu\n- Splash"),
            Err(EncodeError::UnknownEntry { table: "moves", .. })
        ));
    }

    #[test]
    fn test_limits() {
        let compressor = PackedCompressor::new(test_dex());
        assert!(matches!(
            compressor.compress("Pikachu\nLevel: 200"),
            Err(EncodeError::OutOfRange {
                field: "level",
                value: 200,
                max: 127,
                ..
            })
        ));
        assert!(matches!(
            compressor.compress("Pikachu\nLevel: 0"),
            Err(EncodeError::OutOfRange {
                field: "level",
                value: 0,
                min: 1,
                ..
            })
        ));
        assert!(matches!(
            compressor.compress("Pikachu\nIVs: 32 HP"),
            Err(EncodeError::OutOfRange {
                field: "IV",
                value: 32,
                max: 31,
                ..
            })
        ));
        assert!(matches!(
            compressor.compress(
                "Pikachu\n- Thunderbolt\n- Protect\n- Volt Tackle\n- Moonblast\n- Close Combat"
            ),
            Err(EncodeError::TooManyMoves { count: 5, .. })
        ));
    }

    #[test]
    fn test_corrupt_records() {
        let compressor = PackedCompressor::new(test_dex());
        let pbin = PokemonBin {
            species: 400,
            ..Default::default()
        };
        assert!(matches!(
            compressor.decompress(&pbin.pack_to_bytes()),
            Err(CorruptPayload::BadField { field: "species", value: 400, .. })
        ));

        let pbin = PokemonBin {
            gender: 3,
            ..Default::default()
        };
        assert!(matches!(
            compressor.decompress(&pbin.pack_to_bytes()),
            Err(CorruptPayload::BadField { field: "gender", .. })
        ));

        assert!(matches!(
            compressor.decompress(&[0u8; RECORD_LEN - 1]),
            Err(CorruptPayload::RecordLength { .. })
        ));
    }

    #[test]
    fn test_gateway_writes_one_record_per_line() {
        let gateway = CodecGateway::new(PackedCompressor::new(test_dex()));
        for format in [Format::Hex, Format::Base64] {
            let encoded = gateway.encode(CANONICAL, format).unwrap();
            let lines = encoded.as_str().lines().collect::<Vec<_>>();
            assert_eq!(lines.len(), 2);
            let expected_width = match format {
                Format::Hex => 2 * RECORD_LEN,
                Format::Base64 => 4 * RECORD_LEN / 3,
            };
            assert!(lines.iter().all(|line| line.len() == expected_width));
            assert_eq!(gateway.decode(encoded.as_str()).unwrap(), CANONICAL);
        }
    }
}
