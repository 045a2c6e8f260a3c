use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use cutline::{
    algorithms::DistanceOffsetter, cut_svg, estimate_background_color, BuildWorker,
    DesignParams, EditorCommand, EditorStore,
};
use goods_cli::{BoardJob, OffsetStrategy};
use goods_kit_common::{units, utils};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build board, cutline and hole for every job file given
    Build {
        /// Job files (.toml or .json)
        #[arg(required = true)]
        jobs: Vec<PathBuf>,
    },
    /// Print the background color estimated from an image's corners
    Sample {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Print a JSON schema
    Schema {
        #[arg(value_enum, default_value = "job")]
        target: SchemaTarget,
    },
    /// Write a job file with default parameters
    Init {
        /// Artwork the job will process
        #[arg(short, long)]
        input: PathBuf,
        /// Directory the build writes into
        #[arg(short, long, default_value = "out")]
        output_dir: PathBuf,
        /// Where to write the job (.toml or .json)
        #[arg(short, long, default_value = "job.toml")]
        job: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaTarget {
    Job,
    Params,
    Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Build { jobs } => {
            let mut failed = 0usize;
            for job_path in jobs {
                if let Err(e) = build(job_path).await {
                    warn!("Job {} failed: {e:?}", job_path.display());
                    failed += 1;
                }
            }
            if failed > 0 {
                color_eyre::eyre::bail!("{failed} of {} job(s) failed", jobs.len());
            }
        }
        Commands::Sample { input } => {
            let image = image::open(input)
                .wrap_err_with(|| format!("Failed to open {}", input.display()))?
                .to_rgba8();
            let color = estimate_background_color(&image);
            println!("{}", serde_json::to_string(&color)?);
            println!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b);
        }
        Commands::Schema { target } => {
            let schema = match target {
                SchemaTarget::Job => schemars::schema_for!(BoardJob),
                SchemaTarget::Params => DesignParams::schema(),
                SchemaTarget::Commands => EditorCommand::schema(),
            };
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Commands::Init { input, output_dir, job } => {
            let board_job = BoardJob::new(
                input.to_string_lossy().into_owned(),
                output_dir.to_string_lossy().into_owned(),
            );
            board_job.to_file(job)?;
            info!("Wrote {}", job.display());
        }
    }

    Ok(())
}

async fn build(job_path: &Path) -> Result<()> {
    let job = BoardJob::from_file(job_path)
        .wrap_err_with(|| format!("Failed to read job {}", job_path.display()))?;
    info!("Building {} -> {}", job.input_path, job.output_dir);
    utils::ensure_output_dir(&job.output_dir)?;

    let mut store = EditorStore::new(job.params.clone());
    store.add_image_from_file(&job.input_path)?;

    let builder = store.pipeline_builder()?;
    let pipeline = match job.offset_strategy {
        OffsetStrategy::Smooth => builder.build(),
        OffsetStrategy::Distance => builder.with_offsetter(DistanceOffsetter).build(),
    };
    info!("{}", pipeline.info());

    let image = store
        .selected_image()
        .ok_or_else(|| color_eyre::eyre::eyre!("No image selected after loading"))?;
    let worker = BuildWorker::new(pipeline);
    let output = worker.submit(image).await?;
    let output = store.accept_board(output);

    if output.board_path.is_empty() {
        warn!("No foreground found in {}; outputs will be empty", job.input_path);
    }
    output.artwork_mask.to_rgba().save(job.output_path(".mask.png"))?;
    output.board_mask.to_rgba().save(job.output_path(".board.png"))?;
    output.cut_mask.to_rgba().save(job.output_path(".cut.png"))?;

    let export = store.export(job.preview)?;
    let json_path = job.output_path(".design.json");
    export.save_json(&json_path)?;
    let svg_path = job.output_path(".svg");
    std::fs::write(&svg_path, cut_svg(&export))?;

    let cut_length_mm = units::px_to_mm(store.cutline_path().perimeter(), export.size.dpi);
    info!(
        "✅ {} written ({} cutline points, {:.1}mm to cut, hole at {:.1},{:.1})",
        json_path.display(),
        export.paths.cutline_path.as_ref().map_or(0, Vec::len),
        cut_length_mm,
        export.hole.x,
        export.hole.y,
    );
    Ok(())
}
