//! DWARF compilation-unit walking and function extraction (C2).
//!
//! DIE resolution follows the two-pass approach from the design notes: a
//! first pass records every DIE's raw attributes by unit offset, a second
//! pass resolves `DW_AT_abstract_origin`/`DW_AT_specification` references by
//! looking up that table. No pointer graph of DIEs is ever materialized.

use std::collections::HashMap;

use gimli::{AttributeValue, EndianSlice, Reader, RunTimeEndian, UnitOffset};
use goblin::elf::Elf;

use crate::error::OracleDwarfError;

pub type Slice<'a> = EndianSlice<'a, RunTimeEndian>;
pub type Dwarf<'a> = gimli::Dwarf<Slice<'a>>;
pub type Unit<'a> = gimli::Unit<Slice<'a>>;

/// A half-open address range `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    pub low: u64,
    pub high: u64,
}

/// One DWARF function entry: a `DW_TAG_subprogram` or `DW_TAG_inlined_subprogram`.
#[derive(Debug, Clone)]
pub struct FunctionEntry {
    pub function_id: String,
    pub die_offset: u64,
    pub cu_offset: u64,
    pub name: Option<String>,
    pub linkage_name: Option<String>,
    pub is_declaration: bool,
    pub ranges: Vec<AddressRange>,
    pub decl_file: Option<String>,
    pub decl_line: Option<u64>,
    pub decl_column: Option<u64>,
    pub comp_dir: Option<String>,
}

/// Lightweight descriptor for a single compilation unit.
#[derive(Debug, Clone)]
pub struct CuInfo {
    pub cu_offset: u64,
    pub cu_index: usize,
    pub comp_dir: Option<String>,
    pub cu_name: Option<String>,
    pub language: Option<u64>,
}

/// Owns the raw bytes of an ELF file and knows how to materialize a borrowed
/// `gimli::Dwarf` view of it on demand. Parsing the ELF header table is
/// cheap, so this is re-derived rather than stored self-referentially.
pub struct DwarfData {
    data: Vec<u8>,
    pub endian: RunTimeEndian,
}

impl DwarfData {
    pub fn open(path: &str) -> Result<Self, OracleDwarfError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self, OracleDwarfError> {
        let elf = Elf::parse(&data)?;
        let endian = if elf.little_endian {
            RunTimeEndian::Little
        } else {
            RunTimeEndian::Big
        };
        Ok(DwarfData { data, endian })
    }

    /// Loads a borrowed `gimli::Dwarf` view over the owned bytes.
    ///
    /// Compressed debug sections (`SHF_COMPRESSED` or legacy `.z`-prefixed
    /// names) are not decompressed; this is a deliberate v0 limitation, since
    /// none of the fixtures this pipeline targets ship compressed DWARF.
    pub fn load(&self) -> Result<Dwarf<'_>, OracleDwarfError> {
        let elf = Elf::parse(&self.data)?;
        let endian = self.endian;
        let data = &self.data;
        let load_section = |id: gimli::SectionId| -> Result<Slice<'_>, gimli::Error> {
            let bytes = find_section(&elf, data, id.name()).unwrap_or(&[]);
            Ok(EndianSlice::new(bytes, endian))
        };
        Dwarf::load(load_section).map_err(OracleDwarfError::from)
    }
}

fn find_section<'a>(elf: &Elf<'_>, data: &'a [u8], name: &str) -> Option<&'a [u8]> {
    for sh in &elf.section_headers {
        if sh.sh_type == goblin::elf::section_header::SHT_NOBITS || sh.sh_offset == 0 {
            continue;
        }
        let Some(sh_name) = elf.shdr_strtab.get_at(sh.sh_name) else {
            continue;
        };
        if sh_name != name {
            continue;
        }
        let start = sh.sh_offset as usize;
        let end = start + sh.sh_size as usize;
        return data.get(start..end);
    }
    None
}

fn decode_string<'a>(dwarf: &Dwarf<'a>, unit: &Unit<'a>, value: AttributeValue<Slice<'a>>) -> Option<String> {
    let r = dwarf.attr_string(unit, value).ok()?;
    Some(r.to_string_lossy().into_owned())
}

/// Iterates compilation units, yielding `(CuInfo, Unit)` pairs in file order.
///
/// Exposed separately from function extraction so callers (the line mapper)
/// can replay each CU's line program against the same borrowed `Unit`
/// without re-walking the DIE tree.
pub fn iter_cus<'a>(dwarf: &Dwarf<'a>) -> Result<Vec<(CuInfo, Unit<'a>)>, OracleDwarfError> {
    let mut out = Vec::new();
    let mut headers = dwarf.units();
    let mut index = 0usize;
    while let Some(header) = headers.next()? {
        let cu_offset = header
            .offset()
            .as_debug_info_offset()
            .map(|o| o.0 as u64)
            .unwrap_or(0);
        let unit = dwarf.unit(header)?;

        let mut comp_dir = None;
        let mut cu_name = None;
        let mut language = None;
        {
            let mut cursor = unit.entries();
            if let Some((_, root)) = cursor.next_dfs()? {
                if let Some(attr) = root.attr_value(gimli::DW_AT_comp_dir)? {
                    comp_dir = decode_string(dwarf, &unit, attr);
                }
                if let Some(attr) = root.attr_value(gimli::DW_AT_name)? {
                    cu_name = decode_string(dwarf, &unit, attr);
                }
                if let Some(gimli::AttributeValue::Language(lang)) =
                    root.attr_value(gimli::DW_AT_language)?
                {
                    language = Some(lang.0 as u64);
                }
            }
        }

        out.push((
            CuInfo {
                cu_offset,
                cu_index: index,
                comp_dir,
                cu_name,
                language,
            },
            unit,
        ));
        index += 1;
    }
    Ok(out)
}

/// Iterates compilation units, yielding `(CuInfo, Vec<FunctionEntry>)` pairs.
///
/// Output ordering follows CU file order, and within a CU, DIE offset order,
/// matching the documented sort contract.
pub fn iter_functions<'a>(dwarf: &Dwarf<'a>) -> Result<Vec<(CuInfo, Vec<FunctionEntry>)>, OracleDwarfError> {
    let mut out = Vec::new();
    for (cu_info, unit) in iter_cus(dwarf)? {
        let functions = extract_functions(dwarf, &unit, cu_info.cu_offset, cu_info.comp_dir.as_deref())?;
        out.push((cu_info, functions));
    }
    Ok(out)
}

fn attr_ranges<'a>(
    dwarf: &Dwarf<'a>,
    unit: &Unit<'a>,
    die: &gimli::DebuggingInformationEntry<'_, '_, Slice<'a>>,
) -> Result<Vec<AddressRange>, OracleDwarfError> {
    let low_pc = match die.attr_value(gimli::DW_AT_low_pc)? {
        Some(AttributeValue::Addr(addr)) => Some(addr),
        _ => None,
    };

    if let Some(ranges_attr) = die.attr_value(gimli::DW_AT_ranges)? {
        let offset = match ranges_attr {
            AttributeValue::RangeListsRef(o) => dwarf.ranges_offset_from_raw(unit, o),
            AttributeValue::SecOffset(o) => gimli::RangeListsOffset(o),
            _ => return Ok(Vec::new()),
        };
        let mut ranges = Vec::new();
        let mut iter = dwarf.ranges(unit, offset)?;
        while let Some(range) = iter.next()? {
            if range.end > range.begin {
                ranges.push(AddressRange {
                    low: range.begin,
                    high: range.end,
                });
            }
        }
        return Ok(ranges);
    }

    if let Some(low) = low_pc {
        let high = match die.attr_value(gimli::DW_AT_high_pc)? {
            Some(AttributeValue::Addr(addr)) => Some(addr),
            Some(AttributeValue::Udata(offset)) => Some(low + offset),
            _ => None,
        };
        if let Some(high) = high {
            if high > low {
                return Ok(vec![AddressRange { low, high }]);
            }
        }
    }

    Ok(Vec::new())
}

struct RawEntry<'a> {
    attrs: HashMap<gimli::DwAt, AttributeValue<Slice<'a>>>,
}

fn resolve_name<'a>(
    dwarf: &Dwarf<'a>,
    unit: &Unit<'a>,
    all_entries: &HashMap<u64, RawEntry<'a>>,
    die_offset: u64,
    attr: gimli::DwAt,
) -> Option<String> {
    let mut current = Some(die_offset);
    let mut seen = std::collections::HashSet::new();
    while let Some(offset) = current {
        if !seen.insert(offset) {
            break;
        }
        let entry = all_entries.get(&offset)?;
        if let Some(value) = entry.attrs.get(&attr) {
            if let Some(name) = decode_string(dwarf, unit, value.clone()) {
                return Some(name);
            }
        }
        current = entry
            .attrs
            .get(&gimli::DW_AT_abstract_origin)
            .or_else(|| entry.attrs.get(&gimli::DW_AT_specification))
            .and_then(|v| match v {
                AttributeValue::UnitRef(UnitOffset(o)) => Some(*o as u64),
                _ => None,
            });
    }
    None
}

pub fn extract_functions<'a>(
    dwarf: &Dwarf<'a>,
    unit: &Unit<'a>,
    cu_offset: u64,
    comp_dir: Option<&str>,
) -> Result<Vec<FunctionEntry>, OracleDwarfError> {
    // Pass 1: record every DIE's attributes by unit offset.
    let mut all_entries: HashMap<u64, RawEntry<'a>> = HashMap::new();
    {
        let mut cursor = unit.entries();
        while let Some((_, entry)) = cursor.next_dfs()? {
            let mut attrs = HashMap::new();
            let mut iter = entry.attrs();
            while let Some(attr) = iter.next()? {
                attrs.insert(attr.name(), attr.value());
            }
            all_entries.insert(entry.offset().0 as u64, RawEntry { attrs });
        }
    }

    // Pass 2: build function entries, resolving origin references by offset.
    let mut functions = Vec::new();
    let mut cursor = unit.entries();
    while let Some((_, entry)) = cursor.next_dfs()? {
        let tag = entry.tag();
        if tag != gimli::DW_TAG_subprogram && tag != gimli::DW_TAG_inlined_subprogram {
            continue;
        }

        let die_offset = entry.offset().0 as u64;
        let name = resolve_name(dwarf, unit, &all_entries, die_offset, gimli::DW_AT_name);
        let linkage_name =
            resolve_name(dwarf, unit, &all_entries, die_offset, gimli::DW_AT_linkage_name);

        let has_declaration_flag = matches!(
            entry.attr_value(gimli::DW_AT_declaration)?,
            Some(AttributeValue::Flag(true))
        );

        let ranges = attr_ranges(dwarf, unit, entry)?;
        let is_declaration = has_declaration_flag && ranges.is_empty();

        let decl_file = match entry.attr_value(gimli::DW_AT_decl_file)? {
            Some(AttributeValue::FileIndex(idx)) => resolve_decl_file(unit, idx),
            _ => None,
        };
        let decl_line = match entry.attr_value(gimli::DW_AT_decl_line)? {
            Some(AttributeValue::Udata(v)) => Some(v),
            _ => None,
        };
        let decl_column = match entry.attr_value(gimli::DW_AT_decl_column)? {
            Some(AttributeValue::Udata(v)) => Some(v),
            _ => None,
        };

        functions.push(FunctionEntry {
            function_id: format!("cu:{cu_offset:x}:die:{die_offset:x}"),
            die_offset,
            cu_offset,
            name,
            linkage_name,
            is_declaration,
            ranges,
            decl_file,
            decl_line,
            decl_column,
            comp_dir: comp_dir.map(str::to_string),
        });
    }

    Ok(functions)
}

fn resolve_decl_file(unit: &Unit<'_>, file_index: u64) -> Option<String> {
    let program = unit.line_program.as_ref()?;
    let header = program.header();
    let file = header.file(file_index)?;
    match file.path_name() {
        AttributeValue::String(s) => Some(s.to_string_lossy().into_owned()),
        _ => None,
    }
}
