use std::fs::File;

use anyhow::{bail, Context, Result};

use crate::cli::{Cli, ForestArgs};
use crate::pipeline::{forest, ForestParams};
use crate::table::write_csv;

/// Params either come wholesale from a JSON file or are assembled from the
/// individual flags, which are then all required.
fn resolve_params(args: &ForestArgs) -> Result<ForestParams> {
    if let Some(path) = &args.params {
        let file = File::open(path)
            .with_context(|| format!("[forest] Failed to open params file {}", path.display()))?;
        return serde_json::from_reader(file)
            .with_context(|| format!("[forest] Failed to parse params file {}", path.display()));
    }

    let (Some(cover), Some(cover_layer), Some(zones), Some(zones_layer)) = (
        args.cover.clone(),
        args.cover_layer.clone(),
        args.zones.clone(),
        args.zones_layer.clone(),
    ) else {
        bail!("[forest] --cover, --cover-layer, --zones and --zones-layer are required (or pass --params)");
    };

    Ok(ForestParams {
        cover_path: cover,
        cover_layer,
        zones_path: zones,
        zones_layer,
        category_column: args.category_column.clone(),
        category_value: args.category.clone(),
        name_column: args.name_column.clone(),
    })
}

pub fn run(cli: &Cli, args: &ForestArgs) -> Result<()> {
    let params = resolve_params(args)?;
    if cli.verbose > 0 {
        eprintln!(
            "[forest] cover={}:{} zones={}:{} category={}={}",
            params.cover_path.display(),
            params.cover_layer,
            params.zones_path.display(),
            params.zones_layer,
            params.category_column,
            params.category_value,
        );
    }

    let mut result = forest::run(&params, cli.verbose)?;
    println!("{result}");

    if let Some(out) = &args.out {
        write_csv(&mut result, out)?;
        if cli.verbose > 0 {
            eprintln!("[forest] wrote {}", out.display());
        }
    }

    Ok(())
}
