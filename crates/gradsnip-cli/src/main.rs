//! `gradsnip` - threshold a scanned image and save it as PNG or PNM

use clap::Parser;
use clap::error::ErrorKind;
use gradsnip::io::{self, IoError};
use gradsnip::threshold::ThresholdError;
use gradsnip::{Bounds, GradSnipOptions, GradSnipReport, ImageFormat, gradsnip_with_observer};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "gradsnip")]
#[command(
    version,
    about = "Grad (aka Gradient Snip) threshold an image and save it as PNG",
    long_about = "Grad (aka Gradient Snip) threshold an image and save it as PNG.\n\n\
        The background is estimated with a recursive Gaussian blur (Young & van Vliet); \
        its runtime does not depend on sigma."
)]
struct Cli {
    /// Sigma of the Gaussian blur; larger values give a stronger blur
    #[arg(short = 's', long, value_name = "SIGMA", default_value_t = 10.0)]
    sigma: f32,

    /// Coefficient of the local (blurred) threshold
    #[arg(
        short = 'k',
        long,
        value_name = "COEFF",
        default_value_t = 0.75,
        allow_negative_numbers = true
    )]
    coef: f32,

    /// Regulator added to the threshold
    #[arg(
        short = 'd',
        long,
        value_name = "DELTA",
        default_value_t = 0.0,
        allow_negative_numbers = true
    )]
    delta: f32,

    /// Lower bound: darker samples are always black
    #[arg(short = 'l', long, value_name = "LOWER", default_value_t = 0)]
    lower: u8,

    /// Upper bound: lighter samples are always white
    #[arg(short = 'u', long, value_name = "UPPER", default_value_t = 255)]
    upper: u8,

    /// Print image and threshold info to stderr
    #[arg(short = 'i', long)]
    info: bool,

    /// Input image (PNG, PNM, JPEG, BMP or GIF)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output image; .pnm/.pgm/.ppm writes PNM, anything else PNG
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

impl Cli {
    fn options(&self) -> GradSnipOptions {
        GradSnipOptions {
            sigma: self.sigma,
            coef: self.coef,
            delta: self.delta,
            bounds: Bounds::new(self.lower, self.upper),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to load {path}: {source}")]
    Decode { path: PathBuf, source: IoError },

    #[error("out of memory: {0}")]
    Alloc(String),

    #[error("failed to save {path}: {source}")]
    Encode { path: PathBuf, source: IoError },

    #[error(transparent)]
    Threshold(ThresholdError),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Decode { .. } => 2,
            Self::Alloc(_) => 3,
            Self::Encode { .. } => 4,
            Self::Threshold(_) => 1,
        }
    }
}

fn is_alloc(err: &gradsnip::Error) -> bool {
    matches!(err, gradsnip::Error::AllocationFailed(_))
}

impl From<ThresholdError> for CliError {
    fn from(err: ThresholdError) -> Self {
        let alloc = match &err {
            ThresholdError::Core(e) => is_alloc(e),
            ThresholdError::Filter(gradsnip::filter::FilterError::Core(e)) => is_alloc(e),
            _ => false,
        };
        if alloc {
            Self::Alloc(err.to_string())
        } else {
            Self::Threshold(err)
        }
    }
}

/// Output format from the file extension; PNG unless PNM is asked for.
fn output_format(path: &std::path::Path) -> ImageFormat {
    match ImageFormat::from_path(path) {
        ImageFormat::Pnm => ImageFormat::Pnm,
        _ => ImageFormat::Png,
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let image = io::read_image(&cli.input).map_err(|source| match source {
        IoError::Core(ref e) if is_alloc(e) => CliError::Alloc(source.to_string()),
        source => CliError::Decode {
            path: cli.input.clone(),
            source,
        },
    })?;

    log::info!("image {}", cli.input.display());
    log::info!("width {}", image.width());
    log::info!("height {}", image.height());
    log::info!("components {}", image.channels());
    log::info!("sigma {:.6}", cli.sigma);

    let mut report_info = |report: &GradSnipReport| {
        let options = &report.options;
        log::info!("gradient {:.6}", report.gradient);
        for (c, t) in report.thresholds.iter().enumerate() {
            log::info!("component {c} : threshold {t}");
        }
        log::info!("coeff. {:.6}", options.coef);
        log::info!("delta {:.6}", options.delta);
        log::info!("bound lower {}", options.bounds.lower);
        log::info!("bound upper {}", options.bounds.upper);
        log::info!("BW metric {:.6}", report.black_white_ratio);
    };
    let out = gradsnip_with_observer(image, &cli.options(), &mut report_info)?;

    let format = output_format(&cli.output);
    io::write_image(&out.image, &cli.output, format).map_err(|source| CliError::Encode {
        path: cli.output.clone(),
        source,
    })?;
    log::debug!("saved {} as {:?}", cli.output.display(), format);
    Ok(())
}

fn init_logging(info: bool) {
    let default = if info { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    init_logging(cli.info);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
