use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::Path;
use tracing::info;

use manga_translator_rust::ocr::{RegionMode, TesseractDetector};
use manga_translator_rust::providers::GoogleWeb;
use manga_translator_rust::{logging, server, settings, translate_archive};

#[derive(Parser, Debug)]
#[command(
    name = "manga-translator-rust",
    version,
    about = "Translate text on manga pages bundled in a zip archive"
)]
struct Cli {
    /// Zip archive to translate locally instead of running the server
    #[arg(short = 'd', long = "data")]
    data: Option<String>,

    /// Output path for the translated archive (with --data)
    #[arg(short = 'o', long = "output", default_value = "translated.zip")]
    output: String,

    /// Source language code of the pages (ja, zh, ko, en)
    #[arg(short = 'l', long = "lang")]
    lang: Option<String>,

    /// Redraw mode: whole_page or per_region
    #[arg(short = 'm', long = "mode")]
    mode: Option<String>,

    /// Server bind address (host:port)
    #[arg(long = "addr")]
    addr: Option<String>,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings")]
    read_settings: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let settings = settings::load_settings(cli.read_settings.as_deref().map(Path::new))?;
    let mode = cli
        .mode
        .as_deref()
        .map(|value| value.parse::<RegionMode>().map_err(|err| anyhow!(err)))
        .transpose()?;

    if let Some(data) = cli.data {
        let zip_bytes =
            std::fs::read(&data).with_context(|| format!("failed to read archive: {}", data))?;
        let lang_code = cli
            .lang
            .unwrap_or_else(|| settings.default_lang_code.clone());
        let detector = TesseractDetector::new(settings.confidence_threshold);
        let backend = GoogleWeb::new()?;

        let (packaged, result) =
            translate_archive(&settings, &detector, backend, &zip_bytes, &lang_code, mode)
                .await
                .map_err(|err| anyhow!("{err}"))?;
        std::fs::write(&cli.output, packaged)
            .with_context(|| format!("failed to write output archive: {}", cli.output))?;

        info!(
            output = %cli.output,
            processed = result.processed.len(),
            skipped = result.skipped.len(),
            "archive translated"
        );
        for skip in &result.skipped {
            info!("skipped {} ({})", skip.filename, skip.reason);
        }
        return Ok(());
    }

    let addr = cli.addr.unwrap_or_else(|| settings.server_addr.clone());
    server::run_server(settings, addr).await
}
