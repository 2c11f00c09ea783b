//! The lookup tables behind the packed record format.
//!
//! Each table is a plain text file with one display name per line. The line number is the
//! value stored in a record, so the same files must be used to pack and to unpack.
//! Lookups ignore case; unpacking always gives back the spelling from the file.
use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
};

use crate::{
    binary::{ABILITY_BITS, ITEM_BITS, MOVE_BITS, NATURE_BITS, SPECIES_BITS, TERA_BITS},
    error::DexError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Table {
    Names,
    Items,
    Abilities,
    Moves,
    Natures,
    Teras,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::Names,
        Table::Items,
        Table::Abilities,
        Table::Moves,
        Table::Natures,
        Table::Teras,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Names => "names",
            Table::Items => "items",
            Table::Abilities => "abilities",
            Table::Moves => "moves",
            Table::Natures => "natures",
            Table::Teras => "teras",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.txt", self.name())
    }

    /// How many entries the record can address. Species are stored as-is, every other
    /// table keeps zero for "not set".
    pub fn capacity(&self) -> usize {
        match self {
            Table::Names => 1 << SPECIES_BITS,
            Table::Items => (1 << ITEM_BITS) - 1,
            Table::Abilities => (1 << ABILITY_BITS) - 1,
            Table::Moves => (1 << MOVE_BITS) - 1,
            Table::Natures => (1 << NATURE_BITS) - 1,
            Table::Teras => (1 << TERA_BITS) - 1,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Default)]
pub struct DexTable {
    entries: Vec<String>,
    index: HashMap<String, usize>,
}

impl DexTable {
    fn from_text(text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect::<Vec<_>>();
        // First spelling wins if a file repeats a name
        let mut index = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            index.entry(entry.to_lowercase()).or_insert(idx);
        }
        DexTable { entries, index }
    }

    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.index.get(&name.trim().to_lowercase()).copied()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.entries.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Dex {
    names: DexTable,
    items: DexTable,
    abilities: DexTable,
    moves: DexTable,
    natures: DexTable,
    teras: DexTable,
}

impl Dex {
    /// Reads `names.txt`, `items.txt`, `abilities.txt`, `moves.txt`, `natures.txt` and
    /// `teras.txt` from `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, DexError> {
        let read = |table: Table| -> Result<String, DexError> {
            let path: PathBuf = dir.as_ref().join(table.file_name());
            log::debug!("Loading {table} table from {}", path.display());
            std::fs::read_to_string(&path).map_err(|source| DexError::Io { path, source })
        };

        Dex::from_texts(
            &read(Table::Names)?,
            &read(Table::Items)?,
            &read(Table::Abilities)?,
            &read(Table::Moves)?,
            &read(Table::Natures)?,
            &read(Table::Teras)?,
        )
    }

    pub fn from_texts(
        names: &str,
        items: &str,
        abilities: &str,
        moves: &str,
        natures: &str,
        teras: &str,
    ) -> Result<Self, DexError> {
        let dex = Dex {
            names: DexTable::from_text(names),
            items: DexTable::from_text(items),
            abilities: DexTable::from_text(abilities),
            moves: DexTable::from_text(moves),
            natures: DexTable::from_text(natures),
            teras: DexTable::from_text(teras),
        };

        for table in Table::ALL {
            let len = dex.table(table).len();
            if len > table.capacity() {
                log::error!("The {table} table is too large to pack: {len} entries");
                return Err(DexError::TableTooLarge {
                    table: table.name(),
                    len,
                    max: table.capacity(),
                });
            }
        }

        Ok(dex)
    }

    pub fn table(&self, table: Table) -> &DexTable {
        match table {
            Table::Names => &self.names,
            Table::Items => &self.items,
            Table::Abilities => &self.abilities,
            Table::Moves => &self.moves,
            Table::Natures => &self.natures,
            Table::Teras => &self.teras,
        }
    }
}
