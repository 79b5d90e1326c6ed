use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::Table;
use notice_model::AnnotatedReport;
use notice_prune::PruneSummary;
use notice_sdk::notice_types::NoticeTypesFile;
use notice_sdk::{SdkRegistry, available_versions, load_prune_rules, paths};
use tracing::info_span;

use notice_cli::pipeline::{SortedNotice, annotate_report, prune_model, sort_notice};

use crate::cli::{PruneArgs, ReportArgs, ReportFormatArg, SortArgs};
use crate::summary::{apply_table_style, header_cell, print_report_table};

/// Resource root from `--resources`, else the environment or bundled default.
pub fn resolve_resources(flag: Option<&Path>) -> PathBuf {
    flag.map_or_else(paths::resources_root, Path::to_path_buf)
}

pub fn run_prune(args: &PruneArgs, resources: &Path) -> Result<PruneSummary> {
    let _span = info_span!("prune_command", input = %args.input.display()).entered();
    let rules = load_prune_rules(&paths::prune_rules_dir(resources)).context("load prune rules")?;
    let json = read_text(&args.input)?;
    let pruned = prune_model(&json, &rules, args.subtype.as_deref())?;
    write_output(args.output.as_deref(), &pruned.json)?;
    Ok(pruned.summary)
}

pub fn run_sort(args: &SortArgs, resources: &Path) -> Result<SortedNotice> {
    let _span = info_span!("sort_command", input = %args.input.display()).entered();
    let registry =
        SdkRegistry::load(resources, &[args.sdk_version], &[]).context("load SDK resources")?;
    let xml = read_text(&args.input)?;
    let sorted = sort_notice(
        &xml,
        &registry,
        args.sdk_version,
        args.document_type.as_deref(),
    )?;
    write_output(args.output.as_deref(), &sorted.xml)?;
    Ok(sorted)
}

pub fn run_report(args: &ReportArgs, resources: &Path) -> Result<AnnotatedReport> {
    let _span = info_span!("report_command", input = %args.input.display()).entered();
    let registry = SdkRegistry::load(resources, &[args.sdk_version], &[args.lang.as_str()])
        .context("load SDK resources")?;
    let svrl = read_text(&args.input)?;
    let notice = args.notice.as_deref().map(read_text).transpose()?;
    let report = annotate_report(
        &svrl,
        &registry,
        args.sdk_version,
        &args.lang,
        notice.as_deref(),
    )?;
    match args.format {
        ReportFormatArg::Json => {
            let json = serde_json::to_string_pretty(&report).context("serialize report")?;
            println!("{json}");
        }
        ReportFormatArg::Table => print_report_table(&report),
    }
    Ok(report)
}

pub fn run_versions(resources: &Path) -> Result<()> {
    let versions =
        available_versions(&paths::sdk_dir(resources)).context("list SDK versions")?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Version"),
        header_cell("Document types"),
        header_cell("Path"),
    ]);
    apply_table_style(&mut table);
    for dir in versions {
        let document_types = NoticeTypesFile::read(&dir.path)
            .map(|file| {
                file.document_types
                    .iter()
                    .map(|doc_type| doc_type.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_else(|_| "-".to_string());
        table.add_row(vec![
            dir.version.to_string(),
            document_types,
            dir.path.display().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, contents).with_context(|| format!("write {}", path.display()))
        }
        None => {
            println!("{contents}");
            Ok(())
        }
    }
}
