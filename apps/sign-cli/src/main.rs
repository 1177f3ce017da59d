//! sign-cli binary
//!
//! Places signatures/stamps on a PDF and signs it through the remote service.

use anyhow::{bail, Context, Result};
use clap::Parser;
use sign_cli::image::image_data_url;
use sign_cli::{HttpSigningService, PlacementPlan, PlannedPlacement, ServiceConfig};
use sign_core::{PlacementKind, QuickPreset, ScaleReference, SignSession};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for sign-cli
#[derive(Parser, Debug)]
#[command(name = "sign-cli")]
#[command(version, about = "Place signatures and stamps on a PDF and sign it")]
struct Args {
    /// PDF to sign
    input: PathBuf,

    /// Where to write the signed PDF (default: <input>-signed.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Signature image (png, jpg, gif, webp, svg)
    #[arg(long, conflicts_with = "text")]
    signature: Option<PathBuf>,

    /// Render a typed signature from this name
    #[arg(long)]
    text: Option<String>,

    /// Stamp image (png, jpg, gif, webp, svg)
    #[arg(long)]
    stamp: Option<PathBuf>,

    /// TOML placement plan; replaces the preset flags
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Where to put the signature when no plan is given
    #[arg(long, default_value = "bottom-right")]
    signature_preset: QuickPreset,

    /// Where to put the stamp when no plan is given
    #[arg(long, default_value = "bottom-center")]
    stamp_preset: QuickPreset,

    /// Zero-based page for preset placements
    #[arg(long, default_value = "0")]
    page: u32,

    /// Preview zoom used to lay out placements (1.0 = one pixel per point)
    #[arg(long, default_value = "1.0")]
    zoom: f64,

    /// Scale every placement against the first page (overrides the plan)
    #[arg(long)]
    first_page_scale: bool,

    /// Signing service base URL (overrides SIGN_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides SIGN_API_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the placements that would be sent and exit
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_directives = if args.verbose {
        "sign_cli=debug,sign_core=debug"
    } else {
        "sign_cli=info,sign_core=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if !(args.zoom.is_finite() && args.zoom > 0.0) {
        bail!("--zoom must be a positive number");
    }

    let config = ServiceConfig::from_env()?.with_overrides(args.api_url.as_deref(), args.timeout_secs);
    info!("Signing service: {}", config.api_url);
    let service = HttpSigningService::new(&config)?;

    let bytes = fs::read(&args.input)
        .with_context(|| format!("Failed to read PDF: {}", args.input.display()))?;

    let mut session = SignSession::new();
    if args.first_page_scale {
        session.set_scale_reference(ScaleReference::FirstPage);
    }
    let pages = session.load_document(bytes)?.to_vec();
    for page in &pages {
        session.set_preview_size(
            page.index,
            page.native_width * args.zoom,
            page.native_height * args.zoom,
        )?;
    }

    if let Some(path) = &args.signature {
        session.set_uploaded_asset(PlacementKind::Signature, &image_data_url(path)?)?;
    } else if let Some(name) = &args.text {
        session.create_text_signature(name, &service).await?;
    }
    if let Some(path) = &args.stamp {
        session.set_uploaded_asset(PlacementKind::Stamp, &image_data_url(path)?)?;
    }

    let mut plan = match &args.plan {
        Some(path) => PlacementPlan::from_file(path)?,
        None => preset_plan(&args, &session),
    };
    if args.first_page_scale {
        plan.scale_reference = Some(ScaleReference::FirstPage);
    }
    if plan.placements.is_empty() {
        bail!("Nothing to place: pass --signature, --text or --stamp, or a --plan");
    }
    plan.apply(&mut session)?;

    if args.dry_run {
        let placements = session.native_placements()?;
        println!("{}", serde_json::to_string_pretty(&placements)?);
        return Ok(());
    }

    let signed = session.export(&service).await?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input));
    fs::write(&output, &signed)
        .with_context(|| format!("Failed to write signed PDF: {}", output.display()))?;
    info!("Wrote {} ({} bytes)", output.display(), signed.len());

    Ok(())
}

/// One preset placement per asset that was supplied
fn preset_plan(args: &Args, session: &SignSession) -> PlacementPlan {
    let placements = [
        (PlacementKind::Signature, args.signature_preset),
        (PlacementKind::Stamp, args.stamp_preset),
    ]
    .into_iter()
    .filter(|(kind, _)| session.asset(*kind).is_some())
    .map(|(kind, preset)| PlannedPlacement::preset(kind, preset, args.page))
    .collect();

    PlacementPlan {
        scale_reference: None,
        placements,
    }
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    input.with_file_name(format!("{}-signed.pdf", stem))
}
