/// Point cloud processing command line entry point
use clap::{Args, Parser, Subcommand};
use constants::io::DEFAULT_DECIMAL_PLACES;
use point_cloud_processing::export::write_text;
use point_cloud_processing::processor::load_cloud;
use point_cloud_processing::{
    BoundaryMode, PointCloudProcessor, ProcessingConfig, ReductionMethod,
    identify_boundary_points, invert_elevation,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "point-cloud-processing",
    version,
    about = "Boundary detection and density reduction for point clouds"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print point count, bounds and colour availability
    Info { input: PathBuf },

    /// Detect boundary points, optionally exporting them
    Boundary {
        input: PathBuf,
        #[arg(short, long, default_value = "horizontal")]
        mode: BoundaryMode,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_DECIMAL_PLACES)]
        decimals: usize,
    },

    /// Reduce point density from command line options
    Reduce {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        options: PipelineOptions,
    },

    /// Negate the elevation of every point
    Invert {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, default_value_t = DEFAULT_DECIMAL_PLACES)]
        decimals: usize,
    },

    /// Full pipeline from a JSON config, command line options take precedence
    Process {
        input: PathBuf,
        output: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        options: PipelineOptions,
        /// Negate elevation after reduction
        #[arg(long)]
        invert: bool,
    },
}

#[derive(Args)]
struct PipelineOptions {
    /// voxel or gradient, any other name passes the cloud through
    #[arg(short, long)]
    method: Option<ReductionMethod>,
    /// Share of the original points to keep, in (0, 100]
    #[arg(short, long)]
    percentage: Option<f64>,
    /// Boundary mode: horizontal or volumetric
    #[arg(long)]
    mode: Option<BoundaryMode>,
    /// Allow boundary points to be reduced away
    #[arg(long)]
    no_preserve_boundary: bool,
    /// Seed for gradient sampling
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    decimals: Option<usize>,
}

impl PipelineOptions {
    fn apply(&self, mut config: ProcessingConfig) -> ProcessingConfig {
        if let Some(method) = self.method {
            config.method = method;
        }
        if let Some(percentage) = self.percentage {
            config.target_percentage = percentage;
        }
        if let Some(mode) = self.mode {
            config.boundary_mode = mode;
        }
        if self.no_preserve_boundary {
            config.preserve_boundary = false;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(decimals) = self.decimals {
            config.decimal_places = decimals;
        }
        config
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match Cli::parse().cmd {
        Command::Info { input } => {
            let cloud = load_cloud(&input)?;
            let (dx, dy, dz) = cloud.bounds.dimensions();
            println!("File: {}", input.display());
            println!("  Points: {}", cloud.points.len());
            println!("  Colour: {}", if cloud.has_colour { "yes" } else { "no" });
            println!("  Extent: {:.3} x {:.3} x {:.3}", dx, dy, dz);
        }
        Command::Boundary {
            input,
            mode,
            output,
            decimals,
        } => {
            let cloud = load_cloud(&input)?;
            let boundary = identify_boundary_points(&cloud.points, mode);
            println!(
                "{} of {} points are on the {} boundary",
                boundary.len(),
                cloud.points.len(),
                mode
            );

            if let Some(output) = output {
                let points: Vec<_> = boundary.iter().map(|&i| cloud.points[i]).collect();
                write_text(&output, &points, decimals)?;
                info!(path = %output.display(), "Saved boundary points");
            }
        }
        Command::Reduce {
            input,
            output,
            options,
        } => {
            let config = options.apply(ProcessingConfig::default());
            PointCloudProcessor::new(&input, &output, config)?.run()?;
        }
        Command::Invert {
            input,
            output,
            decimals,
        } => {
            let cloud = load_cloud(&input)?;
            write_text(&output, &invert_elevation(&cloud.points), decimals)?;
            info!(path = %output.display(), "Saved inverted cloud");
        }
        Command::Process {
            input,
            output,
            config,
            options,
            invert,
        } => {
            let base = match config {
                Some(path) => ProcessingConfig::from_file(&path)?,
                None => ProcessingConfig::default(),
            };
            let mut config = options.apply(base);
            if invert {
                config.invert_elevation = true;
            }
            PointCloudProcessor::new(&input, &output, config)?.run()?;
        }
    }

    Ok(())
}
