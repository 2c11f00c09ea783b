use byteorder::{BigEndian, ByteOrder};
use std::fmt;

use crate::error::CorruptPayload;

pub const RECORD_LEN: usize = 21;

// group1 u32
pub const SPECIES_BITS: u32 = 11;
pub const GENDER_BITS: u32 = 2;
pub const ITEM_BITS: u32 = 10;
pub const ABILITY_BITS: u32 = 9;
// group2 u8
pub const LEVEL_BITS: u32 = 7;
pub const SHINY_BITS: u32 = 1;
// group3 u128
pub const TERA_BITS: u32 = 5;
pub const EV_BITS: u32 = 8;
pub const NATURE_BITS: u32 = 5;
pub const IV_BITS: u32 = 5;
pub const MOVE_BITS: u32 = 10;
pub const MOVE_SLOTS: usize = 4;

/// One Pokemon as raw table indices. Every field must already fit its bit width.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PokemonBin {
    pub species: u16,
    pub gender: u8,
    pub item: u16,
    pub ability: u16,
    pub level: u8,
    pub shiny: bool,
    pub tera: u8,
    pub evs: [u8; 6],
    pub nature: u8,
    pub ivs: [u8; 6],
    pub moves: [u16; MOVE_SLOTS],
}

impl fmt::Display for PokemonBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:03X} {:X} {:03X} {:03X} {:02X} {} {:02X} [{:02X?}] {:02X} [{:02X?}] [{:03X?}]",
            self.species,
            self.gender,
            self.item,
            self.ability,
            self.level,
            u8::from(self.shiny),
            self.tera,
            self.evs,
            self.nature,
            self.ivs,
            self.moves,
        )
    }
}

fn mask(bits: u32) -> u128 {
    (1 << bits) - 1
}

impl PokemonBin {
    pub fn pack_to_bytes(&self) -> [u8; RECORD_LEN] {
        let mut group1 = self.species as u32;
        group1 = (group1 << GENDER_BITS) | self.gender as u32;
        group1 = (group1 << ITEM_BITS) | self.item as u32;
        group1 = (group1 << ABILITY_BITS) | self.ability as u32;

        let group2 = (self.level << SHINY_BITS) | u8::from(self.shiny);

        let mut group3 = self.tera as u128;
        for ev in self.evs {
            group3 = (group3 << EV_BITS) | ev as u128;
        }
        group3 = (group3 << NATURE_BITS) | self.nature as u128;
        for iv in self.ivs {
            group3 = (group3 << IV_BITS) | iv as u128;
        }
        for move_id in self.moves {
            group3 = (group3 << MOVE_BITS) | move_id as u128;
        }

        let mut record = [0u8; RECORD_LEN];
        BigEndian::write_u32(&mut record[0..4], group1);
        record[4] = group2;
        BigEndian::write_u128(&mut record[5..RECORD_LEN], group3);
        record
    }

    pub fn unpack_from_bytes(record: &[u8; RECORD_LEN]) -> Self {
        let mut group1 = BigEndian::read_u32(&record[0..4]) as u128;
        let group2 = record[4];
        let mut group3 = BigEndian::read_u128(&record[5..RECORD_LEN]);

        // Fields come off the low end, so read them back to front
        let take = |group: &mut u128, bits: u32| {
            let value = *group & mask(bits);
            *group >>= bits;
            value
        };

        let mut pbin = PokemonBin::default();
        for slot in (0..MOVE_SLOTS).rev() {
            pbin.moves[slot] = take(&mut group3, MOVE_BITS) as u16;
        }
        for stat in (0..6).rev() {
            pbin.ivs[stat] = take(&mut group3, IV_BITS) as u8;
        }
        pbin.nature = take(&mut group3, NATURE_BITS) as u8;
        for stat in (0..6).rev() {
            pbin.evs[stat] = take(&mut group3, EV_BITS) as u8;
        }
        pbin.tera = take(&mut group3, TERA_BITS) as u8;

        pbin.shiny = group2 & 1 == 1;
        pbin.level = group2 >> SHINY_BITS;

        pbin.ability = take(&mut group1, ABILITY_BITS) as u16;
        pbin.item = take(&mut group1, ITEM_BITS) as u16;
        pbin.gender = take(&mut group1, GENDER_BITS) as u8;
        pbin.species = take(&mut group1, SPECIES_BITS) as u16;

        pbin
    }
}

pub fn pack_records(records: &[PokemonBin]) -> Vec<u8> {
    records
        .iter()
        .flat_map(|record| record.pack_to_bytes())
        .collect()
}

pub fn unpack_records(bytes: &[u8]) -> Result<Vec<PokemonBin>, CorruptPayload> {
    if bytes.is_empty() {
        return Err(CorruptPayload::Empty);
    }
    if bytes.len() % RECORD_LEN != 0 {
        return Err(CorruptPayload::RecordLength {
            len: bytes.len(),
            record_len: RECORD_LEN,
        });
    }

    Ok(bytes
        .chunks_exact(RECORD_LEN)
        .map(|chunk| {
            let mut record = [0u8; RECORD_LEN];
            record.copy_from_slice(chunk);
            PokemonBin::unpack_from_bytes(&record)
        })
        .collect())
}
