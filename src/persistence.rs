// File: src/persistence.rs
use crate::core::lexicon::Lexicon;
use crate::error::{DictError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Suffix of the transient sibling file used during a write. Anything
/// carrying this suffix found at startup is a leftover from an interrupted
/// write and may be discarded.
pub const TEMP_FILE_SUFFIX: &str = ".temp";

/// The one format version the bundled writer can produce.
pub const FORMAT_VERSION: u32 = 2;

/// On-disk envelope: version header plus the lexicon body.
#[derive(Serialize, Deserialize)]
struct DictFile {
    format_version: u32,
    lexicon: Lexicon,
}

/// Boundary to the binary dictionary format writer. Kept as a trait so the
/// persister's atomicity protocol is independent of the encoding, and so an
/// encoder refusing a format (UnsupportedFormat) is testable.
pub trait BinaryDictWriter: Send + Sync {
    fn encode(&self, lexicon: &Lexicon, out: &mut dyn Write) -> Result<()>;
}

/// Bincode-backed writer for [`FORMAT_VERSION`].
pub struct BincodeDictWriter {
    format_version: u32,
}

impl BincodeDictWriter {
    pub fn new() -> Self {
        Self {
            format_version: FORMAT_VERSION,
        }
    }

    /// Requests a specific format version; anything other than
    /// [`FORMAT_VERSION`] fails at encode time.
    pub fn for_version(format_version: u32) -> Self {
        Self { format_version }
    }
}

impl Default for BincodeDictWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryDictWriter for BincodeDictWriter {
    fn encode(&self, lexicon: &Lexicon, out: &mut dyn Write) -> Result<()> {
        if self.format_version != FORMAT_VERSION {
            return Err(DictError::UnsupportedFormat(self.format_version));
        }
        let file = DictFile {
            format_version: self.format_version,
            lexicon: lexicon.clone(),
        };
        bincode::serialize_into(out, &file)?;
        Ok(())
    }
}

/// Flushes an in-memory dictionary to a named binary file with
/// write-temp-then-rename atomicity: the file visible at the target path is
/// always a complete previous version or a complete new version.
///
/// At most one writer per target name at a time; the caller must enforce
/// that (one writer thread per dictionary instance).
pub struct DictionaryPersister<W: BinaryDictWriter = BincodeDictWriter> {
    writer: W,
}

impl DictionaryPersister {
    pub fn new() -> Self {
        Self {
            writer: BincodeDictWriter::new(),
        }
    }
}

impl Default for DictionaryPersister {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: BinaryDictWriter> DictionaryPersister<W> {
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Serializes `lexicon` into `<target>.temp` in the target's directory,
    /// then renames it over the target. On any failure the previous target
    /// file is untouched and the temp file is removed; the temp descriptor
    /// is closed on every exit path.
    pub fn write(&self, lexicon: &Lexicon, target: &Path) -> Result<()> {
        let parent = target.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;
        let temp_path = temp_path_for(target);

        if let Err(err) = self.write_temp(lexicon, &temp_path) {
            // The temp file handle is already closed; drop the partial file.
            if let Err(rm_err) = fs::remove_file(&temp_path) {
                warn!(path = %temp_path.display(), %rm_err, "could not remove partial temp file");
            }
            return Err(err);
        }

        if let Err(err) = fs::rename(&temp_path, target) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }
        debug!(path = %target.display(), "dictionary file committed");
        Ok(())
    }

    /// Creates, fills, flushes and closes the temp file. The `File` goes out
    /// of scope on every return path, so the descriptor never leaks.
    fn write_temp(&self, lexicon: &Lexicon, temp_path: &Path) -> Result<()> {
        let file = File::create(temp_path)?;
        let mut out = BufWriter::new(file);
        self.writer.encode(lexicon, &mut out)?;
        out.flush()?;
        let file = out
            .into_inner()
            .map_err(|e| DictError::Io(e.into_error()))?;
        file.sync_all()?;
        Ok(())
    }
}

/// Reads back a file written by [`DictionaryPersister`]. Used by the reload
/// path for file-backed dictionaries.
pub fn read_lexicon(path: &Path) -> Result<Lexicon> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let dict: DictFile = bincode::deserialize_from(reader)?;
    if dict.format_version != FORMAT_VERSION {
        return Err(DictError::UnsupportedFormat(dict.format_version));
    }
    Ok(dict.lexicon)
}

/// Startup sweep: removes leftover `*.temp` files from writes that never
/// reached the rename step. Returns the paths removed.
pub fn discard_temp_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_temp = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(TEMP_FILE_SUFFIX));
        if path.is_file() && is_temp {
            fs::remove_file(&path)?;
            debug!(path = %path.display(), "discarded stale temp file");
            removed.push(path);
        }
    }
    Ok(removed)
}

fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(TEMP_FILE_SUFFIX);
    PathBuf::from(name)
}
