//! Typed records for the Ghidra-side inputs and the final joined dataset
//! (C13, final half). Ghidra input field names follow the analyzer's own
//! report/record layout; `image_base` is carried on `GhidraReport` so the
//! address join can rebase without a second input read.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: &str = "0.1.0";

// ---- Ghidra-side inputs ----------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GhidraFunctionEntry {
    pub binary_id: String,
    pub function_id: String,
    pub entry_va: u64,
    pub entry_hex: String,
    pub name: String,
    pub namespace: Option<String>,
    pub body_start_va: Option<u64>,
    pub body_end_va: Option<u64>,
    pub size_bytes: Option<u64>,
    pub is_external_block: bool,
    pub is_thunk: bool,
    pub is_import: bool,
    pub section_hint: Option<String>,
    pub decompile_status: String,
    pub c_raw: Option<String>,
    pub decompile_error: Option<String>,
    pub warnings: Vec<String>,
    pub warnings_raw: Vec<String>,
    pub verdict: String,
    pub is_plt_or_stub: bool,
    pub is_init_fini_aux: bool,
    pub is_compiler_aux: bool,
    pub is_library_like: bool,
    pub asm_insn_count: Option<u64>,
    pub c_line_count: Option<u64>,
    pub insn_to_c_ratio: Option<f64>,
    pub temp_var_count: Option<u64>,
    pub fat_function_flag: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GhidraVariableEntry {
    pub binary_id: String,
    pub function_id: String,
    pub entry_va: u64,
    pub var_id: String,
    pub var_kind: String,
    pub name: Option<String>,
    pub type_str: Option<String>,
    pub size_bytes: Option<u64>,
    pub storage_class: String,
    pub storage_key: String,
    pub stack_offset: Option<i64>,
    pub register_name: Option<String>,
    pub addr_va: Option<u64>,
    pub is_temp_singleton: bool,
    pub access_sites: Vec<u64>,
    pub access_sites_truncated: bool,
    pub access_sig: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CfgBlockEntry {
    pub block_id: String,
    pub start_va: u64,
    pub end_va: u64,
    pub succ: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GhidraCfgEntry {
    pub binary_id: String,
    pub function_id: String,
    pub entry_va: u64,
    pub bb_count: u64,
    pub edge_count: u64,
    pub cyclomatic: i64,
    pub has_indirect_jumps: bool,
    pub unresolved_indirect_jump_count: u64,
    pub cfg_completeness: f64,
    pub blocks: Vec<CfgBlockEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GhidraCallEntry {
    pub binary_id: String,
    pub caller_function_id: String,
    pub caller_entry_va: u64,
    pub callsite_va: u64,
    pub callsite_hex: String,
    pub call_kind: String,
    pub callee_entry_va: Option<u64>,
    pub callee_name: Option<String>,
    pub is_external_target: bool,
    pub is_import_proxy_target: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GhidraFunctionCounts {
    pub total: u64,
    pub decompiled: u64,
    pub decompile_failed: u64,
    pub fat_functions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GhidraReport {
    pub package_name: String,
    pub analyzer_version: String,
    pub schema_version: String,
    pub profile_id: String,
    pub binary_sha256: String,
    pub binary_path: String,
    /// Offset Ghidra applies to all addresses relative to absolute virtual
    /// addresses; added back in by the address join to reconcile with DWARF.
    pub image_base: u64,
    pub ghidra_version: String,
    pub java_version: String,
    pub script_hash: String,
    pub analysis_options: serde_json::Value,
    pub binary_verdict: String,
    pub reasons: Vec<String>,
    pub function_counts: GhidraFunctionCounts,
    pub warning_prevalence: BTreeMap<String, u64>,
    pub fat_function_thresholds: serde_json::Value,
    pub noise_list_version: String,
    pub timestamp: String,
}

// ---- Joined dataset outputs -------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JoinedCfgShape {
    pub bb_count: u64,
    pub edge_count: u64,
    pub cyclomatic: i64,
    pub has_indirect_jumps: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JoinedFunctionRow {
    pub dwarf_function_id: String,
    pub ts_func_id: Option<String>,
    pub ghidra_function_id: Option<String>,
    pub ghidra_entry_va: Option<u64>,
    pub alignment_verdict: String,
    pub address_verdict: String,
    pub reasons: Vec<String>,
    pub overlap_ratio: f64,
    pub cfg: Option<JoinedCfgShape>,
    pub high_confidence: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JoinedVariableRow {
    pub dwarf_function_id: String,
    pub ghidra_function_id: String,
    pub var_id: String,
    pub name: Option<String>,
    pub var_kind: String,
    pub type_str: Option<String>,
    pub storage_class: String,
    pub is_temp_singleton: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct JoinFunctionCounts {
    #[serde(rename = "match")]
    pub match_count: u64,
    pub ambiguous: u64,
    pub no_match: u64,
    pub non_target: u64,
    pub address_resolved: u64,
    pub address_ambiguous: u64,
    pub high_confidence: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JoinReport {
    pub schema_version: String,
    pub binary_sha256: String,
    pub ghidra_binary_sha256: Option<String>,
    pub job_id: String,
    pub test_case: String,
    pub opt: String,
    pub variant: String,
    pub ghidra_variant: Option<String>,
    pub builder_profile_id: String,
    pub dwarf_profile_id: String,
    pub ts_profile_id: String,
    pub join_profile_id: String,
    pub ghidra_join_profile_id: String,
    pub function_counts: JoinFunctionCounts,
    pub reason_counts: BTreeMap<String, u64>,
    /// Seconds since the Unix epoch; the sole non-deterministic field.
    pub timestamp: String,
}
