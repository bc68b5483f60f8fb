use std::fs::File;

use anyhow::{bail, Context, Result};

use crate::cli::{Cli, NdviArgs};
use crate::pipeline::{ortho, OrthoParams};

fn resolve_params(args: &NdviArgs) -> Result<OrthoParams> {
    if let Some(path) = &args.params {
        let file = File::open(path)
            .with_context(|| format!("[ndvi] Failed to open params file {}", path.display()))?;
        return serde_json::from_reader(file)
            .with_context(|| format!("[ndvi] Failed to parse params file {}", path.display()));
    }

    let Some(ortho) = args.ortho.clone() else {
        bail!("[ndvi] An orthophoto path is required (or pass --params)");
    };

    Ok(OrthoParams {
        path: ortho,
        factor: args.factor,
        composite_out: args.composite_out.clone(),
        ndvi_out: args.ndvi_out.clone(),
    })
}

pub fn run(cli: &Cli, args: &NdviArgs) -> Result<()> {
    let params = resolve_params(args)?;
    if cli.verbose > 0 {
        eprintln!(
            "[ndvi] ortho={} factor={}",
            params.path.display(),
            params.factor
        );
    }

    ortho::run(&params, cli.verbose)?;
    Ok(())
}
