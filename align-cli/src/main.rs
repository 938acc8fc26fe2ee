//! Top-level orchestration CLI (C14): wires the four pipeline stages
//! together as subcommands, each a thin shell around the matching crate's
//! pure `run_*` function. File layout conventions beyond the explicit
//! `--out-dir` are left to the caller, per `spec.md` §1.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use join_ghidra::runner::{load_inputs as load_ghidra_inputs, run_join_oracles_ghidra};
use oracle_dwarf::policy::DwarfProfile;
use oracle_ts::policy::TsProfile;

#[derive(Parser)]
#[command(name = "align-cli")]
#[command(about = "Builds the DWARF / tree-sitter / Ghidra alignment dataset")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the oracle-DWARF stage (C1-C4) against one ELF binary.
    OracleDwarf {
        /// Path to the ELF binary with DWARF debug info.
        #[arg(long)]
        binary: PathBuf,

        /// Directory to write `oracle_report.json` and `oracle_functions.json` into.
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Run the oracle-TS stage (C5-C7) against every `.i` file in a directory.
    OracleTs {
        /// Directory to recursively glob `.i` translation units from.
        #[arg(long)]
        tu_dir: PathBuf,

        /// Directory to write `oracle_ts_report.json`, `oracle_ts_functions.json`,
        /// and `extraction_recipes.json` into.
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Run the line-evidence join (C8-C9) between a DWARF oracle output and a
    /// TS oracle output.
    JoinDwarfTs {
        #[arg(long)]
        dwarf_report: PathBuf,
        #[arg(long)]
        dwarf_functions: PathBuf,
        #[arg(long)]
        ts_report: PathBuf,
        #[arg(long)]
        ts_functions: PathBuf,
        /// Directory holding the preprocessed `.i` files referenced by the TU paths.
        #[arg(long)]
        i_files_dir: PathBuf,

        /// Directory to write `alignment_pairs.json` and `alignment_report.json` into.
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Run the address join (C10-C13) against Ghidra's function table.
    JoinGhidra {
        #[arg(long)]
        receipt: PathBuf,
        #[arg(long)]
        dwarf_report: PathBuf,
        #[arg(long)]
        dwarf_functions: PathBuf,
        #[arg(long)]
        alignment_pairs: PathBuf,
        #[arg(long)]
        alignment_report: PathBuf,
        #[arg(long)]
        ghidra_report: PathBuf,
        #[arg(long)]
        ghidra_functions: PathBuf,
        #[arg(long)]
        ghidra_variables: PathBuf,
        #[arg(long)]
        ghidra_cfg: PathBuf,
        #[arg(long)]
        ghidra_calls: PathBuf,
        /// SHA-256 of a second Ghidra artifact, for a cross-variant join
        /// (`spec.md` §4.11). Omit for a same-variant join.
        #[arg(long)]
        ghidra_binary_sha256: Option<String>,

        /// Directory to write `join_report.json`, `joined_functions.jsonl`,
        /// and `joined_variables.jsonl` into.
        #[arg(long)]
        out_dir: PathBuf,
    },
}

/// Recursively globs files with the given extension under `dir`, sorted for
/// deterministic iteration order.
fn glob_by_extension(dir: &Path, ext: &str) -> Vec<String> {
    let mut paths: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().map(|e| e == ext).unwrap_or(false))
        .map(|entry| entry.path().to_path_buf())
        .collect();
    paths.sort();
    paths.into_iter().map(|p| p.to_string_lossy().into_owned()).collect()
}

fn run_oracle_dwarf(binary: &Path, out_dir: &Path) -> Result<()> {
    let profile = DwarfProfile::default();
    let (report, functions) = oracle_dwarf::run_oracle_dwarf(&binary.to_string_lossy(), &profile)
        .context("oracle-dwarf run failed")?;

    std::fs::create_dir_all(out_dir).context("creating out-dir")?;
    oracle_dwarf::writer::write_report(&out_dir.join("oracle_report.json"), &report)
        .context("writing oracle_report.json")?;
    oracle_dwarf::writer::write_functions(&out_dir.join("oracle_functions.json"), &functions)
        .context("writing oracle_functions.json")?;

    tracing::info!(verdict = %report.verdict, functions = functions.functions.len(), "oracle-dwarf: done");
    Ok(())
}

fn run_oracle_ts(tu_dir: &Path, out_dir: &Path) -> Result<()> {
    let profile = TsProfile::default();
    let tu_paths = glob_by_extension(tu_dir, "i");
    let (report, functions, recipes) = oracle_ts::run_oracle_ts(&tu_paths, &profile)
        .context("oracle-ts run failed")?;

    std::fs::create_dir_all(out_dir).context("creating out-dir")?;
    oracle_ts::writer::write_report(&out_dir.join("oracle_ts_report.json"), &report)
        .context("writing oracle_ts_report.json")?;
    oracle_ts::writer::write_functions(&out_dir.join("oracle_ts_functions.json"), &functions)
        .context("writing oracle_ts_functions.json")?;
    oracle_ts::writer::write_recipes(&out_dir.join("extraction_recipes.json"), &recipes)
        .context("writing extraction_recipes.json")?;

    tracing::info!(tus = report.tu_reports.len(), functions = functions.functions.len(), "oracle-ts: done");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_join_dwarf_ts(
    dwarf_report: &Path,
    dwarf_functions: &Path,
    ts_report: &Path,
    ts_functions: &Path,
    i_files_dir: &Path,
    out_dir: &Path,
) -> Result<()> {
    let profile = join_dwarf_ts::policy::JoinProfile::default();
    let (pairs, report) = join_dwarf_ts::runner::run_join_from_paths(
        dwarf_report,
        dwarf_functions,
        ts_report,
        ts_functions,
        i_files_dir,
        &profile,
    )
    .context("join-dwarf-ts run failed")?;

    std::fs::create_dir_all(out_dir).context("creating out-dir")?;
    join_dwarf_ts::writer::write_pairs(&out_dir.join("alignment_pairs.json"), &pairs)
        .context("writing alignment_pairs.json")?;
    join_dwarf_ts::writer::write_report(&out_dir.join("alignment_report.json"), &report)
        .context("writing alignment_report.json")?;

    tracing::info!(
        matched = report.pair_counts.match_count,
        ambiguous = report.pair_counts.ambiguous,
        no_match = report.pair_counts.no_match,
        "join-dwarf-ts: done"
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_join_ghidra(
    receipt: &Path,
    dwarf_report: &Path,
    dwarf_functions: &Path,
    alignment_pairs: &Path,
    alignment_report: &Path,
    ghidra_report: &Path,
    ghidra_functions: &Path,
    ghidra_variables: &Path,
    ghidra_cfg: &Path,
    ghidra_calls: &Path,
    ghidra_binary_sha256: Option<&str>,
    out_dir: &Path,
) -> Result<()> {
    let profile = join_ghidra::policy::JoinGhidraProfile::default();
    let inputs = load_ghidra_inputs(
        receipt,
        dwarf_report,
        dwarf_functions,
        alignment_pairs,
        alignment_report,
        ghidra_report,
        ghidra_functions,
        ghidra_variables,
        ghidra_cfg,
        ghidra_calls,
    )
    .context("loading join-ghidra inputs")?;

    let (report, functions, variables) =
        run_join_oracles_ghidra(&inputs, ghidra_binary_sha256, &profile)
            .context("join-ghidra run failed")?;

    std::fs::create_dir_all(out_dir).context("creating out-dir")?;
    join_ghidra::writer::write_report(&out_dir.join("join_report.json"), &report)
        .context("writing join_report.json")?;
    join_ghidra::writer::write_functions(&out_dir.join("joined_functions.jsonl"), &functions)
        .context("writing joined_functions.jsonl")?;
    join_ghidra::writer::write_variables(&out_dir.join("joined_variables.jsonl"), &variables)
        .context("writing joined_variables.jsonl")?;

    tracing::info!(
        resolved = report.function_counts.address_resolved,
        high_confidence = report.function_counts.high_confidence,
        "join-ghidra: done"
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    match args.command {
        Command::OracleDwarf { binary, out_dir } => run_oracle_dwarf(&binary, &out_dir),
        Command::OracleTs { tu_dir, out_dir } => run_oracle_ts(&tu_dir, &out_dir),
        Command::JoinDwarfTs { dwarf_report, dwarf_functions, ts_report, ts_functions, i_files_dir, out_dir } => {
            run_join_dwarf_ts(&dwarf_report, &dwarf_functions, &ts_report, &ts_functions, &i_files_dir, &out_dir)
        }
        Command::JoinGhidra {
            receipt,
            dwarf_report,
            dwarf_functions,
            alignment_pairs,
            alignment_report,
            ghidra_report,
            ghidra_functions,
            ghidra_variables,
            ghidra_cfg,
            ghidra_calls,
            ghidra_binary_sha256,
            out_dir,
        } => run_join_ghidra(
            &receipt,
            &dwarf_report,
            &dwarf_functions,
            &alignment_pairs,
            &alignment_report,
            &ghidra_report,
            &ghidra_functions,
            &ghidra_variables,
            &ghidra_cfg,
            &ghidra_calls,
            ghidra_binary_sha256.as_deref(),
            &out_dir,
        ),
    }
}
