// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Input classification.
//!
//! Decides whether a path names a native benchmark executable (by its magic
//! bytes) or a previously captured result document (by parsing it).

use crate::result::ResultDocument;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// Native executable formats, one per host platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutableFormat {
    /// Mach-O, including 64-bit and fat binaries (macOS).
    MachO,
    /// Portable Executable, "MZ" header (Windows).
    Pe,
    /// ELF (Linux and other Unix systems).
    Elf,
}

const MACHO_MAGICS: [[u8; 4]; 6] = [
    [0xfe, 0xed, 0xfa, 0xce], // MH_MAGIC
    [0xce, 0xfa, 0xed, 0xfe], // MH_CIGAM
    [0xfe, 0xed, 0xfa, 0xcf], // MH_MAGIC_64
    [0xcf, 0xfa, 0xed, 0xfe], // MH_CIGAM_64
    [0xca, 0xfe, 0xba, 0xbe], // FAT_MAGIC
    [0xbe, 0xba, 0xfe, 0xca], // FAT_CIGAM
];

impl ExecutableFormat {
    /// Format of the platform this process runs on.
    pub fn host() -> Self {
        if cfg!(target_os = "macos") || cfg!(target_os = "ios") {
            ExecutableFormat::MachO
        } else if cfg!(windows) {
            ExecutableFormat::Pe
        } else {
            ExecutableFormat::Elf
        }
    }

    /// Number of leading bytes inspected.
    pub fn magic_len(self) -> usize {
        match self {
            ExecutableFormat::Pe => 2,
            ExecutableFormat::MachO | ExecutableFormat::Elf => 4,
        }
    }

    /// Whether `prefix` starts with a signature of this format.
    pub fn matches(self, prefix: &[u8]) -> bool {
        match self {
            ExecutableFormat::MachO => MACHO_MAGICS.iter().any(|m| prefix.starts_with(m)),
            ExecutableFormat::Pe => prefix.starts_with(b"MZ"),
            ExecutableFormat::Elf => prefix.starts_with(b"\x7fELF"),
        }
    }
}

/// Classification of an input path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// A runnable benchmark program.
    Executable,
    /// A parseable result document.
    ResultDocument,
    /// Neither; carries the reason.
    Invalid(String),
}

impl InputKind {
    /// Whether the input can be used.
    pub fn is_valid(&self) -> bool {
        !matches!(self, InputKind::Invalid(_))
    }
}

/// Classify `path` against the host platform's executable format.
pub fn classify(path: impl AsRef<Path>) -> InputKind {
    classify_as(path, ExecutableFormat::host())
}

/// Classify `path` against an explicit executable format.
///
/// The magic prefix is read through its own handle, which is closed before
/// the document parse re-reads the file from the start.
pub fn classify_as(path: impl AsRef<Path>, format: ExecutableFormat) -> InputKind {
    let path = path.as_ref();
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(_) => return InputKind::Invalid(format!("'{}' does not exist", path.display())),
    };
    if !metadata.is_file() {
        return InputKind::Invalid(format!("'{}' does not name a file", path.display()));
    }

    if let Ok(prefix) = read_prefix(path, format.magic_len()) {
        if format.matches(&prefix) {
            return InputKind::Executable;
        }
    }

    match ResultDocument::from_path(path) {
        Ok(_) => InputKind::ResultDocument,
        Err(_) => InputKind::Invalid(format!(
            "'{}' does not name a valid benchmark executable or result file",
            path.display()
        )),
    }
}

fn read_prefix(path: &Path, len: usize) -> std::io::Result<Vec<u8>> {
    let mut prefix = Vec::with_capacity(len);
    File::open(path)?.take(len as u64).read_to_end(&mut prefix)?;
    Ok(prefix)
}
