#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use tar::{EntryType, Header};

/// One entry of a test archive. Names and link targets are written into the
/// header verbatim, so hostile paths survive.
pub enum Fixture<'a> {
    Dir(&'a str),
    File(&'a str, &'a [u8]),
    FileWithMode(&'a str, &'a [u8], u32),
    Symlink(&'a str, &'a str),
    HardLink(&'a str, &'a str),
    Fifo(&'a str),
}

fn header(name: &str, kind: EntryType, size: u64, mode: u32) -> Header {
    let mut header = Header::new_gnu();
    let bytes = name.as_bytes();
    header.as_old_mut().name[..bytes.len()].copy_from_slice(bytes);
    header.set_entry_type(kind);
    header.set_size(size);
    header.set_mode(mode);
    header.set_uid(1000);
    header.set_gid(1000);
    header.set_username("builder").unwrap();
    header.set_groupname("abuild").unwrap();
    header.set_mtime(0);
    header
}

fn link_header(name: &str, target: &str, kind: EntryType) -> Header {
    let mut header = header(name, kind, 0, 0o777);
    let bytes = target.as_bytes();
    header.as_old_mut().linkname[..bytes.len()].copy_from_slice(bytes);
    header
}

fn entry_blocks(fixture: &Fixture<'_>) -> (Header, Vec<u8>) {
    let (mut header, data) = match *fixture {
        Fixture::Dir(name) => (header(name, EntryType::Directory, 0, 0o755), Vec::new()),
        Fixture::File(name, data) => (
            header(name, EntryType::Regular, data.len() as u64, 0o644),
            data.to_vec(),
        ),
        Fixture::FileWithMode(name, data, mode) => (
            header(name, EntryType::Regular, data.len() as u64, mode),
            data.to_vec(),
        ),
        Fixture::Symlink(name, target) => (link_header(name, target, EntryType::Symlink), Vec::new()),
        Fixture::HardLink(name, target) => (link_header(name, target, EntryType::Link), Vec::new()),
        Fixture::Fifo(name) => (header(name, EntryType::Fifo, 0, 0o644), Vec::new()),
    };
    header.set_cksum();
    (header, data)
}

/// An uncompressed tar stream, terminated by the usual zero blocks.
pub fn tar_bytes(fixtures: &[Fixture<'_>]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for fixture in fixtures {
        let (header, data) = entry_blocks(fixture);
        builder.append(&header, data.as_slice()).unwrap();
    }
    builder.into_inner().unwrap()
}

/// Headers and padded data without the end-of-archive marker, the way apk
/// signature and control segments are laid out.
pub fn tar_segment(fixtures: &[Fixture<'_>]) -> Vec<u8> {
    let mut out = Vec::new();
    for fixture in fixtures {
        let (header, data) = entry_blocks(fixture);
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(&data);
        let padding = (512 - data.len() % 512) % 512;
        out.extend(std::iter::repeat_n(0u8, padding));
    }
    out
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn write_archive(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Gzip-compressed tar written to `dir/name`.
pub fn tar_gz(dir: &Path, name: &str, fixtures: &[Fixture<'_>]) -> PathBuf {
    write_archive(dir, name, &gzip(&tar_bytes(fixtures)))
}

/// Every path below `root`, relative and sorted.
pub fn walk(root: &Path) -> Vec<String> {
    fn visit(root: &Path, dir: &Path, out: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            out.push(path.strip_prefix(root).unwrap().to_string_lossy().into_owned());
            if path.is_dir() && !path.is_symlink() {
                visit(root, &path, out);
            }
        }
    }
    let mut out = Vec::new();
    if root.exists() {
        visit(root, root, &mut out);
    }
    out.sort();
    out
}
