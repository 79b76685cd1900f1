use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use polars::prelude::DataFrame;
use tracing::{error, info, info_span, warn};

use estat_cli::args::filter_state;
use estat_cli::render::{presentation_json, render_text, roles_table, write_csv};
use estat_ingest::{check_response, extract_stats_data_id, read_response};
use estat_model::ViewerOptions;
use estat_transform::{
    AxisSelection, ChartOutcome, NormalizedTable, Presentation, ViewState, ViewStore, normalize,
    present,
};

use crate::cli::{ExtractIdArgs, InspectArgs, ShowArgs};

/// A response file loaded and normalized.
struct LoadedTable {
    path: PathBuf,
    title: Option<String>,
    total: Option<u64>,
    table: NormalizedTable,
}

fn load_table(path: &Path, options: &ViewerOptions) -> Result<LoadedTable> {
    let response =
        read_response(path).with_context(|| format!("load response {}", path.display()))?;
    let data = check_response(&response, options.row_limit)
        .with_context(|| format!("check response {}", path.display()))?;
    let table = normalize(data).with_context(|| format!("normalize {}", path.display()))?;
    Ok(LoadedTable {
        path: path.to_path_buf(),
        title: data.title(),
        total: data.total_count(),
        table,
    })
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let options = ViewerOptions::new().with_row_limit(args.row_limit);
    let loaded = load_table(&args.file, &options)?;
    if let Some(title) = &loaded.title {
        println!("表題: {title}");
    }
    println!("ファイル: {}", loaded.path.display());
    println!("行数: {}", loaded.table.row_count());
    if let Some(total) = loaded.total {
        println!("総件数: {total}");
    }
    println!(
        "{}",
        roles_table(loaded.table.roles(), loaded.table.unit_types())
    );
    Ok(())
}

/// Show every file; returns the process exit code.
pub fn run_show(args: &ShowArgs) -> Result<i32> {
    let options = ViewerOptions::new()
        .with_row_limit(args.row_limit)
        .with_preview_rows(args.rows);

    let mut store = ViewStore::new();
    let mut tables: Vec<(usize, LoadedTable)> = Vec::with_capacity(args.files.len());
    for (key, path) in args.files.iter().enumerate() {
        let loaded = load_table(path, &options)?;
        configure_view(store.view(key), args);
        if args.latest_only {
            store.retain_latest(key);
            tables.clear();
        }
        tables.push((key, loaded));
    }
    info!(tables = tables.len(), views = store.len(), "loaded tables");

    let mut exit_code = 0;
    for (key, loaded) in &tables {
        let span = info_span!("show", path = %loaded.path.display());
        let _guard = span.enter();
        if tables.len() > 1 {
            println!("== {} ==", loaded.path.display());
        }
        let result = present(&loaded.table, store.view(*key))
            .map_err(anyhow::Error::from)
            .and_then(|presentation| display(&presentation, args, options.preview_rows));
        if let Err(error) = result {
            error!("rendering failed: {error:#}");
            eprintln!("failed to display data");
            exit_code = 1;
        }
    }

    if let Some(csv_path) = &args.csv
        && let Some((key, last)) = tables.last()
    {
        let frame = store.view(*key).filtered_frame(&last.table)?;
        export_csv(&frame, csv_path)?;
    }
    Ok(exit_code)
}

fn configure_view(state: &mut ViewState, args: &ShowArgs) {
    state.display_type = args.display;
    if let Some(unit) = &args.unit {
        state.select_unit(unit.clone());
    }
    *state.filter_mut() = filter_state(&args.filters);
    state.axes = AxisSelection::new(args.x.clone(), args.color.clone());
}

fn display(presentation: &Presentation, args: &ShowArgs, preview_rows: usize) -> Result<()> {
    if let ChartOutcome::Warning(warning) = &presentation.outcome {
        warn!(%warning, "chart not drawn");
    }
    if args.json {
        let value = presentation_json(presentation)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", render_text(presentation, preview_rows)?);
    }
    Ok(())
}

fn export_csv(frame: &DataFrame, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("create CSV file {}", path.display()))?;
    write_csv(frame, BufWriter::new(file))
        .with_context(|| format!("write CSV file {}", path.display()))?;
    info!(path = %path.display(), rows = frame.height(), "exported CSV");
    Ok(())
}

pub fn run_extract_id(args: &ExtractIdArgs) -> Result<()> {
    let id = extract_stats_data_id(&args.url)
        .ok_or_else(|| anyhow!("no statdisp_id in URL: {}", args.url))?;
    println!("{id}");
    Ok(())
}
