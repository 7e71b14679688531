//! Symbol frequency table stored after the FFUH header.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Number of distinct symbols a table can describe
pub const SYMBOL_COUNT: usize = 256;

/// Non-zero symbol counts, in ascending symbol order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(u8, u32)>,
}

impl FrequencyTable {
    /// Read a table region of 32-bit little endian counts.
    ///
    /// Counts past symbol 255 and a trailing partial count are ignored.
    pub fn from_bytes(region: &[u8]) -> Result<Self> {
        let counts: Vec<u32> = region
            .chunks_exact(4)
            .take(SYMBOL_COUNT)
            .map(LittleEndian::read_u32)
            .collect();

        Self::from_counts(&counts).map_err(|_| {
            Error::MalformedFrequencyTable(format!(
                "no symbols in {} bytes of counts",
                region.len()
            ))
        })
    }

    /// Build a table from counts indexed by symbol.
    pub fn from_counts(counts: &[u32]) -> Result<Self> {
        let entries: Vec<(u8, u32)> = counts
            .iter()
            .take(SYMBOL_COUNT)
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
            .collect();

        if entries.is_empty() {
            return Err(Error::MalformedFrequencyTable(format!(
                "no symbols in {} counts",
                counts.len()
            )));
        }

        Ok(Self { entries })
    }

    /// Number of symbols with a non-zero count
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed table, kept for symmetry with [`Self::len`]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count recorded for `symbol`, if it takes part in the tree
    pub fn get(&self, symbol: u8) -> Option<u32> {
        self.entries
            .binary_search_by_key(&symbol, |&(s, _)| s)
            .ok()
            .map(|i| self.entries[i].1)
    }

    /// Iterate over `(symbol, count)` pairs in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.entries.iter().copied()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|&(_, c)| c as u64).sum()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::frequency::FrequencyTable;

    #[test]
    fn read_counts() -> Result<()> {
        #[rustfmt::skip]
        let region = [
            0x02, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x00, 0x01, 0x00, 0x00,
        ];

        let table = FrequencyTable::from_bytes(&region)?;
        assert_eq!(table.len(), 3);
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![(0, 2), (2, 1), (3, 256)]);
        assert_eq!(table.get(1), None);
        assert_eq!(table.get(3), Some(256));
        assert_eq!(table.total(), 259);

        Ok(())
    }

    #[test]
    fn trailing_partial_count_is_ignored() -> Result<()> {
        let region = [0x05, 0x00, 0x00, 0x00, 0x07, 0x00];

        let table = FrequencyTable::from_bytes(&region)?;
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![(0, 5)]);

        Ok(())
    }

    #[test]
    fn counts_past_last_symbol_are_ignored() -> Result<()> {
        let mut counts = vec![0u32; 300];
        counts[255] = 9;
        counts[256] = 4;
        counts[299] = 1;

        let table = FrequencyTable::from_counts(&counts)?;
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![(255, 9)]);

        let region: Vec<u8> = counts.iter().flat_map(|c| c.to_le_bytes()).collect();
        assert_eq!(FrequencyTable::from_bytes(&region)?, table);

        Ok(())
    }

    #[test]
    fn empty_table() {
        assert!(matches!(
            FrequencyTable::from_bytes(&[0u8; 1024]),
            Err(Error::MalformedFrequencyTable(_))
        ));
        assert!(matches!(
            FrequencyTable::from_bytes(&[0x01, 0x00]),
            Err(Error::MalformedFrequencyTable(_))
        ));

        let mut counts = vec![0u32; 260];
        counts[258] = 1;
        assert!(matches!(
            FrequencyTable::from_counts(&counts),
            Err(Error::MalformedFrequencyTable(_))
        ));
    }
}
