use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::format::{Decoder, detect_from_reader};
use crate::member::RawMember;

type Source = Decoder<BufReader<File>>;

/// A read-only pass over one archive file. Opened per operation and never
/// shared.
pub struct ArchiveSession {
    path: PathBuf,
    archive: tar::Archive<Source>,
}

impl ArchiveSession {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            });
        }

        let read_err = |source| Error::Read {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = BufReader::new(File::open(path).map_err(read_err)?);
        let compression = detect_from_reader(&mut reader)
            .map_err(read_err)?
            .ok_or(Error::UnsupportedFormat)?;

        Ok(Self {
            path: path.to_path_buf(),
            archive: tar::Archive::new(compression.decoder(reader)?),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Iterate members in archive order. Can only be called once per session.
    pub fn members(&mut self) -> Result<Members<'_>> {
        let entries = self.archive.entries().map_err(Error::Corrupted)?;
        Ok(Members { entries })
    }
}

pub struct Members<'a> {
    entries: tar::Entries<'a, Source>,
}

impl<'a> Iterator for Members<'a> {
    type Item = Result<Member<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.entries.next()? {
            Ok(entry) => entry,
            Err(e) => return Some(Err(Error::Corrupted(e))),
        };
        let name = match entry.path() {
            Ok(name) => name.into_owned(),
            Err(e) => return Some(Err(Error::Corrupted(e))),
        };
        let raw = RawMember::from_header(name, entry.header(), entry.size());
        Some(Ok(Member { raw, entry }))
    }
}

/// One decoded entry together with its content stream.
pub struct Member<'a> {
    raw: RawMember,
    entry: tar::Entry<'a, Source>,
}

impl Member<'_> {
    pub fn raw(&self) -> &RawMember {
        &self.raw
    }
}

impl Read for Member<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.entry.read(buf)
    }
}
