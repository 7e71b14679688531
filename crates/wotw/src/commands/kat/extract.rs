use clap::Args;
use itertools::Itertools;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use std::{
    fs::File,
    io::{Read, Seek},
    path::{Path, PathBuf},
};
use tracing::{info, warn};
use wotw_kat::{AssetKind, KatArchive};

#[derive(Args)]
pub struct ExtractArgs {
    /// An input KAT! archive
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Only extract building (IOB) and unit (WOF) models
    #[arg(long, default_value_t = false)]
    models_only: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

/// Kinds of the entries written, and how many entries could not be
#[derive(Debug, Default)]
struct Extracted {
    written: Vec<AssetKind>,
    failed: usize,
}

impl ExtractArgs {
    fn create(&self, p: &Path) -> std::io::Result<File> {
        if !self.overwrite {
            File::create_new(p)
        } else {
            File::create(p)
        }
    }

    fn extract<R: Read + Seek>(&self, kat: &mut KatArchive<R>) -> Extracted {
        let mut extracted = Extracted::default();

        for i in 0..kat.len() {
            let mut entry = match kat.by_index(i) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping entry {i}: {e}");
                    extracted.failed += 1;
                    continue;
                }
            };

            let kind = entry.kind();
            if self.models_only && !kind.is_model() {
                continue;
            }

            // Names come from the archive, keep them inside the target directory
            let Some(name) = Path::new(entry.name()).file_name() else {
                warn!("skipping entry {i}: unusable name {:?}", entry.name());
                extracted.failed += 1;
                continue;
            };

            let p = self.directory.join(name);
            info!("writing {}", p.display());

            let mut out = match self.create(&p) {
                Ok(out) => out,
                Err(e) => {
                    warn!("skipping entry {i}: creating {}: {e}", p.display());
                    extracted.failed += 1;
                    continue;
                }
            };

            match std::io::copy(&mut entry, &mut out) {
                Ok(_) => extracted.written.push(kind),
                Err(e) => {
                    warn!("failed to write {}: {e}", p.display());
                    extracted.failed += 1;
                }
            }
        }

        extracted
    }

    pub fn handle(&self) -> Result<()> {
        let mut kat = KatArchive::open(&self.file)
            .with_context(|| format!("path: {}", self.file.display()))?;

        std::fs::create_dir_all(&self.directory)
            .into_diagnostic()
            .context(format!("creating {}", self.directory.display()))?;

        let extracted = self.extract(&mut kat);

        let counts = extracted.written.iter().copied().counts();
        let count = |kind: AssetKind| counts.get(&kind).copied().unwrap_or(0);

        println!(
            "{} {} files ({} IOB, {} WOF)",
            "extracted".green(),
            extracted.written.len(),
            count(AssetKind::Building),
            count(AssetKind::Unit)
        );
        if extracted.failed > 0 {
            println!("{} {} entries", "failed".red(), extracted.failed);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use binrw::BinWrite;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};
    use std::path::Path;
    use wotw_kat::{
        types::{KatHeader, KatRecord, HEADER_SIZE, RECORD_SIZE},
        AssetKind, KatArchive,
    };

    use super::ExtractArgs;

    fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        KatHeader {
            entries: entries.len() as u32,
        }
        .write(&mut out)
        .unwrap();

        let mut offset = HEADER_SIZE + entries.len() as u64 * RECORD_SIZE;
        for (name, data) in entries {
            KatRecord::with_name(name, offset as u32, data.len() as u32)
                .write(&mut out)
                .unwrap();
            offset += data.len() as u64;
        }

        for (_, data) in entries {
            out.write_all(data).unwrap();
        }

        out.into_inner()
    }

    fn args(directory: &Path, models_only: bool, overwrite: bool) -> ExtractArgs {
        ExtractArgs {
            file: directory.join("unused.wow"),
            directory: directory.to_path_buf(),
            models_only,
            overwrite,
        }
    }

    #[test]
    fn duplicate_name_does_not_stop_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let input = build_archive(&[
            ("SAME.IOB", &b"first"[..]),
            ("SAME.IOB", &b"second"[..]),
            ("OTHER.WOF", &b"third"[..]),
        ]);
        let mut kat = KatArchive::new(Cursor::new(input)).unwrap();

        let extracted = args(dir.path(), false, false).extract(&mut kat);

        assert_eq!(extracted.failed, 1);
        assert_eq!(
            extracted.written,
            vec![AssetKind::Building, AssetKind::Unit]
        );
        assert_eq!(std::fs::read(dir.path().join("SAME.IOB")).unwrap(), b"first");
        assert_eq!(std::fs::read(dir.path().join("OTHER.WOF")).unwrap(), b"third");
    }

    #[test]
    fn overwrite_keeps_the_last_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let input = build_archive(&[
            ("SAME.IOB", &b"first"[..]),
            ("SAME.IOB", &b"second"[..]),
        ]);
        let mut kat = KatArchive::new(Cursor::new(input)).unwrap();

        let extracted = args(dir.path(), false, true).extract(&mut kat);

        assert_eq!(extracted.failed, 0);
        assert_eq!(extracted.written.len(), 2);
        assert_eq!(std::fs::read(dir.path().join("SAME.IOB")).unwrap(), b"second");
    }

    #[test]
    fn models_only_skips_other_entries() {
        let dir = tempfile::tempdir().unwrap();
        let input = build_archive(&[
            ("README.TXT", &b"text"[..]),
            ("FARM.IOB", &b"model"[..]),
        ]);
        let mut kat = KatArchive::new(Cursor::new(input)).unwrap();

        let extracted = args(dir.path(), true, false).extract(&mut kat);

        assert_eq!(extracted.failed, 0);
        assert_eq!(extracted.written, vec![AssetKind::Building]);
        assert!(!dir.path().join("README.TXT").exists());
    }
}
