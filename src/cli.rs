use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Forest-cover and vegetation-index analysis CLI
#[derive(Parser, Debug)]
#[command(name = "canopy", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Forest coverage per administrative zone (prints a table)
    Forest(ForestArgs),

    /// Orthophoto NDVI (writes composite and index map images)
    Ndvi(NdviArgs),
}

#[derive(Args, Debug)]
pub struct ForestArgs {
    /// GeoPackage holding the land-cover layer
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub cover: Option<PathBuf>,

    /// Land-cover layer name
    #[arg(long)]
    pub cover_layer: Option<String>,

    /// GeoPackage holding the zone boundaries
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub zones: Option<PathBuf>,

    /// Zone layer name
    #[arg(long)]
    pub zones_layer: Option<String>,

    /// Category attribute column on the land-cover layer
    #[arg(long, default_value = "objektart")]
    pub category_column: String,

    /// Category value selecting forest features
    #[arg(long, default_value = "Wald")]
    pub category: String,

    /// Zone name attribute column
    #[arg(long, default_value = "name")]
    pub name_column: String,

    /// JSON parameter file replacing the flags above
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with_all = ["cover", "cover_layer", "zones", "zones_layer"])]
    pub params: Option<PathBuf>,

    /// Also write the result table as CSV
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct NdviArgs {
    /// 4-band orthophoto (R, G, B, NIR)
    #[arg(value_hint = ValueHint::FilePath)]
    pub ortho: Option<PathBuf>,

    /// Spatial downsampling factor per axis
    #[arg(long, default_value_t = 200)]
    pub factor: usize,

    /// Output path of the false-color composite
    #[arg(long, default_value = "composite.png", value_hint = ValueHint::FilePath)]
    pub composite_out: PathBuf,

    /// Output path of the NDVI map
    #[arg(long, default_value = "ndvi.png", value_hint = ValueHint::FilePath)]
    pub ndvi_out: PathBuf,

    /// JSON parameter file replacing the flags above
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "ortho")]
    pub params: Option<PathBuf>,
}
