use clap::{Args, Parser, Subcommand};
use log::{log, Level};
use serde_json::{Map, Value};

use std::path::PathBuf;

use crate::check::check_path;
use crate::config::{load_project_config, ConfigEnv, OptimizationLevel, ProjectConfig};
use crate::errors::{Error, Result};
use crate::fontbuild::{CommandFontBuilder, FontBuilder};
use crate::pipeline::Pipeline;
use crate::svgo::svgo_preset;

/// Command line arguments
#[derive(Parser)]
#[command(name = "mickofont", author, version, about, long_about=None)] // Read from Cargo.toml
struct Arguments {
    /// Project config file (default: $MICKOFONT_CONFIG_PATH or ./mickofont.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process SVG files and generate font files (TTF, WOFF, etc.)
    MakeFont(MakeFontArgs),
}

#[derive(Args)]
struct MakeFontArgs {
    /// Override the source directory for SVG icons
    #[arg(short, long)]
    src: Option<PathBuf>,

    /// Override the output directory for font files
    #[arg(short, long)]
    dist: Option<PathBuf>,

    /// Convert stroked paths to filled paths before building
    #[arg(long)]
    stroke_to_fill: bool,

    /// Report more detail about each step
    #[arg(long)]
    verbose: bool,
}

/// Top-level configuration used by the `mickofont` command-line process.
///
/// Holds only what was given on the command line; it becomes the highest
/// priority layer of the `ProjectConfig` (see `overrides()`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// Project config file, taking precedence over `$MICKOFONT_CONFIG_PATH`
    pub config_path: Option<PathBuf>,
    /// Source directory override
    pub src: Option<PathBuf>,
    /// Output directory override
    pub dist: Option<PathBuf>,
    /// Force stroke-to-fill conversion on
    pub stroke_to_fill: bool,
    /// Force verbose output on
    pub verbose: bool,
}

impl Config {
    fn from_args(args: Arguments) -> Result<Self> {
        let Command::MakeFont(cmd) = args.command;
        if let (Some(src), Some(dist)) = (&cmd.src, &cmd.dist) {
            if src == dist {
                return Err(Error::Cli(
                    "Output directory must not be the same as the source directory.".into(),
                ));
            }
        }
        Ok(Self {
            config_path: args.config,
            src: cmd.src,
            dist: cmd.dist,
            stroke_to_fill: cmd.stroke_to_fill,
            verbose: cmd.verbose,
        })
    }

    /// Create a `Config` object set up given a command line string.
    ///
    /// The string is parsed using `shlex::split()`, so values containing
    /// spaces or quotes should be quoted or escaped appropriately.
    pub fn from_cmdline(args: &str) -> Result<Self> {
        let args = shlex::split(args).unwrap_or_default();
        let args = Arguments::try_parse_from(args.iter()).map_err(|e| Error::Cli(e.to_string()))?;
        Self::from_args(args)
    }

    /// Configuration layer holding only the options actually given.
    pub fn overrides(&self) -> Value {
        let mut font_options = Map::new();
        if let Some(src) = &self.src {
            font_options.insert("src".into(), src.to_string_lossy().into());
        }
        if let Some(dist) = &self.dist {
            font_options.insert("dist".into(), dist.to_string_lossy().into());
        }

        let mut layer = Map::new();
        if !font_options.is_empty() {
            layer.insert("svgToFontOptions".into(), Value::Object(font_options));
        }
        if self.stroke_to_fill {
            layer.insert("strokeToFill".into(), Value::Bool(true));
        }
        if self.verbose {
            layer.insert("verbose".into(), Value::Bool(true));
        }
        Value::Object(layer)
    }

    /// Resolve the full project configuration for this command line.
    pub fn project_config(&self, mut env: ConfigEnv) -> Result<ProjectConfig> {
        if self.config_path.is_some() {
            env.config_path.clone_from(&self.config_path);
        }
        load_project_config(&env, self.overrides())
    }
}

/// Create a `Config` object from process arguments.
pub fn get_config() -> Result<Config> {
    let args = Arguments::parse();
    Config::from_args(args)
}

/// Generate fonts as described by `project`, using `builder`.
///
/// The optimizer preset is chosen from the optimization level, and if
/// stroke-to-fill is enabled the builder is pointed at a workspace of
/// converted icons rather than the original source directory.
pub async fn make_font<B: FontBuilder>(mut project: ProjectConfig, builder: &B) -> Result<()> {
    let detail = if project.verbose {
        Level::Info
    } else {
        Level::Debug
    };

    project.font_options.svgo_options = svgo_preset(project.optimization_level);
    match project.optimization_level {
        OptimizationLevel::Full => log!(detail, "Optimization level set to FULL (aggressive SVGO)."),
        OptimizationLevel::Mid => log!(detail, "Optimization level set to MID (moderate SVGO)."),
        OptimizationLevel::None => log!(detail, "Optimization (SVGO) disabled."),
    }

    let src = check_path(&project.font_options.src).await;
    if !(src.is_dir && src.readable) {
        return Err(Error::Cli(format!(
            "Source directory {} is not a readable directory.",
            src.path.display()
        )));
    }
    let dist = check_path(&project.font_options.dist).await;
    if dist.is_file {
        return Err(Error::Cli(format!(
            "Output path {} is an existing file.",
            dist.path.display()
        )));
    }

    if project.stroke_to_fill {
        let report = Pipeline::new().run(&src.path).await?;
        log!(
            detail,
            "{} of {} icons had strokes converted to fills.",
            report.converted,
            report.loaded
        );
        project.font_options.src = report.workspace;
    }

    log!(
        detail,
        "Starting font generation... (Source: {}, Output: {})",
        project.font_options.src.display(),
        project.font_options.dist.display()
    );
    builder.build(&project.font_options).await?;
    log::info!("Success: Font files generated in {}", dist.path.display());

    Ok(())
}

/// Run the `mickofont` program with a given `Config`.
pub async fn run(config: Config) -> Result<()> {
    let project = config.project_config(ConfigEnv::from_process()?)?;
    let builder = CommandFontBuilder::from(&project.font_builder);
    make_font(project, &builder).await
}
