//! ELF structural reader (C1, partial).
//!
//! Validates an ELF binary, surveys its section table for DWARF-relevant
//! sections, and reads the GNU build-id note. Does not itself parse DWARF
//! data — that is `dwarf.rs`'s job.

use goblin::elf::Elf;
use goblin::elf::note::NT_GNU_BUILD_ID;

use align_common::hash::sha256_bytes;

use crate::error::{OracleDwarfError, OracleDwarfErrorKind};

/// Structural metadata extracted from an ELF binary, sufficient to run the
/// binary-level gate (`policy::gate_binary`) without touching DWARF.
#[derive(Debug, Clone)]
pub struct ElfMeta {
    pub path: String,
    pub file_sha256: String,
    pub file_size: u64,

    pub elf_class: u8,
    pub machine: String,
    pub endianness: &'static str,

    pub has_debug_info: bool,
    pub has_debug_line: bool,
    pub has_debug_ranges: bool,
    pub has_debug_str: bool,
    pub debug_section_names: Vec<String>,

    pub build_id: Option<String>,
    pub has_split_dwarf: bool,
}

fn machine_name(e_machine: u16) -> String {
    match e_machine {
        goblin::elf::header::EM_X86_64 => "EM_X86_64".to_string(),
        goblin::elf::header::EM_386 => "EM_386".to_string(),
        goblin::elf::header::EM_AARCH64 => "EM_AARCH64".to_string(),
        goblin::elf::header::EM_ARM => "EM_ARM".to_string(),
        other => format!("EM_UNKNOWN_{other}"),
    }
}

fn hex_build_id(desc: &[u8]) -> String {
    let mut out = String::with_capacity(desc.len() * 2);
    for b in desc {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

fn read_build_id(elf: &Elf<'_>, data: &[u8]) -> Option<String> {
    if let Some(mut notes) = elf.iter_note_headers(data) {
        while let Some(Ok(note)) = notes.next() {
            if note.n_type == NT_GNU_BUILD_ID {
                return Some(hex_build_id(note.desc));
            }
        }
    }
    if let Some(mut notes) = elf.iter_note_sections(data, Some(".note.gnu.build-id")) {
        while let Some(Ok(note)) = notes.next() {
            if note.n_type == NT_GNU_BUILD_ID {
                return Some(hex_build_id(note.desc));
            }
        }
    }
    None
}

/// Opens `path`, validates it as ELF, and extracts [`ElfMeta`].
pub fn read_elf(path: &str) -> Result<ElfMeta, OracleDwarfError> {
    let data = std::fs::read(path)?;
    read_elf_bytes(path, &data)
}

/// As [`read_elf`], but operating on bytes already loaded into memory.
pub fn read_elf_bytes(path: &str, data: &[u8]) -> Result<ElfMeta, OracleDwarfError> {
    if data.len() < goblin::elf::header::SIZEOF_EHDR
        || &data[0..4] != goblin::elf::header::ELFMAG
    {
        return Err(OracleDwarfError::bare(OracleDwarfErrorKind::NotElf));
    }

    let elf = Elf::parse(data)?;

    let section_names: Vec<String> = elf
        .section_headers
        .iter()
        .filter_map(|sh| elf.shdr_strtab.get_at(sh.sh_name))
        .map(|s| s.to_string())
        .collect();

    let debug_section_names: Vec<String> = section_names
        .iter()
        .filter(|n| n.starts_with(".debug_"))
        .cloned()
        .collect();

    let has_debug_info = section_names.iter().any(|n| n == ".debug_info");
    let has_debug_line = section_names.iter().any(|n| n == ".debug_line");
    let has_debug_ranges = section_names
        .iter()
        .any(|n| n == ".debug_ranges" || n == ".debug_rnglists");
    let has_debug_str = section_names.iter().any(|n| n == ".debug_str");
    let has_split_dwarf = section_names
        .iter()
        .any(|n| n.ends_with(".dwo") || n == ".gnu_debugaltlink");

    let build_id = read_build_id(&elf, data);

    Ok(ElfMeta {
        path: path.to_string(),
        file_sha256: sha256_bytes(data),
        file_size: data.len() as u64,
        elf_class: if elf.is_64 { 2 } else { 1 },
        machine: machine_name(elf.header.e_machine),
        endianness: if elf.little_endian { "little" } else { "big" },
        has_debug_info,
        has_debug_line,
        has_debug_ranges,
        has_debug_str,
        debug_section_names,
        build_id,
        has_split_dwarf,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_elf_data() {
        let err = read_elf_bytes("bogus", b"not an elf file at all").unwrap_err();
        assert_eq!(err.kind(), OracleDwarfErrorKind::NotElf);
    }
}
