//! # Stegify Command-Line Tool
//!
//! Thin wrapper around [`StegService`] for encoding a file across several
//! carrier images and decoding it back.
//!
//! ## Usage
//!
//! ```bash
//! # Hide secret.zip across three images (results: result0.png .. result2.png)
//! stegify encode --carrier a.png --carrier b.jpg --carrier c.png --data secret.zip
//!
//! # Same, with space-separated lists and explicit result names
//! stegify encode -c "a.png b.jpg c.png" -d secret.zip -r "x.png y.png z.png"
//!
//! # Recover it; results must be given in the same order
//! stegify decode -c "x.png y.png z.png" --result secret.zip
//!
//! # Hide a text message in a single image and print it back
//! stegify encode -t text -c cover.png -d message.txt
//! stegify decode -t text -c encoded.png
//! ```

use anyhow::{anyhow, bail};
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;

use stegify::common::config::StegifyConfig;
use stegify::common::logging::init_logger;
use stegify::StegService;

const NOTES: &str = "\
NOTE: Carriers given with --carrier are taken first, then those from --carriers/-c. \
Same goes for --result and --results/-r.
NOTE: When no results are provided, default names are used for the results.
NOTE: Decode needs the result images in exactly the order encode wrote them.";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Operation {
    Encode,
    Decode,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum DataType {
    /// Arbitrary file spread across any number of carriers
    Image,
    /// Text message in exactly one carrier
    Text,
}

/// Command-line arguments for the stegify binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, after_help = NOTES)]
struct Args {
    /// Operation to perform
    #[arg(value_enum)]
    operation: Operation,

    /// Carrier file in which the data is encoded (can be used multiple times)
    #[arg(long = "carrier")]
    carrier: Vec<PathBuf>,

    /// Carrier files in which the data is encoded (separated by space)
    #[arg(short = 'c', long = "carriers")]
    carriers: Option<String>,

    /// Data file which is being encoded in the carriers
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Name of a result file (can be used multiple times)
    #[arg(long = "result")]
    result: Vec<PathBuf>,

    /// Names of the result files (separated by space)
    #[arg(short = 'r', long = "results")]
    results: Option<String>,

    /// Type of data being encoded
    #[arg(short = 't', long = "data-type", value_enum, default_value_t = DataType::Image)]
    data_type: DataType,

    /// Path to the configuration file (TOML format)
    #[arg(long)]
    config: Option<String>,
}

/// Repeated-flag paths first, then the space-separated list.
fn collect_paths(repeated: Vec<PathBuf>, spaced: Option<&str>) -> Vec<PathBuf> {
    repeated
        .into_iter()
        .chain(
            spaced
                .into_iter()
                .flat_map(str::split_whitespace)
                .map(PathBuf::from),
        )
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let args = Args::parse();
    let config = StegifyConfig::load_or_default(args.config.as_deref())?;
    let service = StegService::new(&config.runtime);

    let carriers = collect_paths(args.carrier, args.carriers.as_deref());
    if carriers.is_empty() {
        bail!("Carrier file must be specified. Use --help for more information.");
    }
    let mut results = collect_paths(args.result, args.results.as_deref());

    match (args.operation, args.data_type) {
        (Operation::Encode, DataType::Image) => {
            if results.is_empty() {
                results = config
                    .output
                    .result_names(carriers.len())
                    .into_iter()
                    .map(PathBuf::from)
                    .collect();
            }
            if results.len() != carriers.len() {
                bail!("Carrier and result files count must be equal when encoding.");
            }
            let data = args.data.ok_or_else(|| {
                anyhow!("Data file must be specified. Use --help for more information.")
            })?;
            service.encode_files(&carriers, &data, &results).await?;
        }
        (Operation::Encode, DataType::Text) => {
            if carriers.len() != 1 {
                bail!("Only one carrier image expected when encoding text.");
            }
            if results.is_empty() {
                results.push(PathBuf::from("encoded.png"));
            } else if results.len() != 1 {
                bail!("Only one result file expected when encoding text.");
            }
            let data = args
                .data
                .ok_or_else(|| anyhow!("Data file must be specified for encoding text."))?;
            service.encode_files(&carriers, &data, &results).await?;
        }
        (Operation::Decode, DataType::Image) => {
            if results.is_empty() {
                results.push(PathBuf::from("result.png"));
            }
            if results.len() != 1 {
                bail!("Only one result file expected.");
            }
            service.decode_files(&carriers, &results[0]).await?;
        }
        (Operation::Decode, DataType::Text) => {
            if carriers.len() != 1 {
                bail!("Only one carrier image expected when decoding text.");
            }
            match results.first() {
                Some(path) => service.decode_files(&carriers, path).await?,
                None => {
                    let message = service.decode_paths(&carriers).await?;
                    let mut stdout = std::io::stdout();
                    stdout.write_all(&message)?;
                    stdout.flush()?;
                }
            }
        }
    }

    Ok(())
}
