//! Command-line driver for the procurement frontend core
//!
//! Runs the wizard, team and request flows headless against a live API, or
//! checks a saved wizard draft offline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tokio::sync::RwLock;

use frontend::core::validation::validate_for_submit;
use frontend::core::{CurrencyConverter, ProjectPayload, WizardFormState, WizardMode};
use frontend::screens::{MaterialRequestScreen, ProjectWizard, SubmissionOutcome, SubmitStatus, TeamScreen};
use frontend::services::{
    refresh_once, spawn_rate_refresher, HttpExchangeRateSource, RealGeocodingGateway, RealProcurementApi,
    SharedConverter, StaticGeocodingGateway,
};
use frontend::types::MaterialRequestDraft;
use frontend::{FrontendConfig, FrontendError, GeocodingGateway};
use shared::{component_debug, component_info, component_warn, geocode_query, logging, ComponentId, ProjectId, ProjectRole};

#[derive(Parser)]
#[command(name = "frontend")]
#[command(about = "Headless procurement project wizard, team and request tools")]
pub struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Procurement API base URL, overrides PROCUREMENT_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token, overrides PROCUREMENT_API_TOKEN
    #[arg(long, global = true)]
    pub api_token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a saved wizard draft and print the payload it would send
    Preview { draft: PathBuf },

    /// Create a project from a saved draft, or update one with --project-id
    Submit {
        draft: PathBuf,
        #[arg(long)]
        project_id: Option<ProjectId>,
    },

    /// Resolve map coordinates for a region/district/ward selection
    Geocode {
        #[arg(long)]
        region: String,
        #[arg(long, default_value = "")]
        district: String,
        #[arg(long, default_value = "")]
        ward: String,
        /// Use only the built-in location table
        #[arg(long)]
        offline: bool,
    },

    /// List users eligible for a project role
    Team {
        #[arg(long)]
        project_id: ProjectId,
        #[arg(long)]
        role: ProjectRole,
    },

    /// Submit a material request, justifying any reported duplicates
    Request {
        request: PathBuf,
        #[arg(long)]
        justification: Option<String>,
    },
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn build_api(config: &FrontendConfig) -> anyhow::Result<RealProcurementApi> {
    let base = config.require_api_url()?.clone();
    Ok(RealProcurementApi::new(base, config.api_token.clone()))
}

/// Seeds the converter with one fetch, then keeps it fresh in the background
async fn start_converter(config: &FrontendConfig) -> SharedConverter {
    let converter = Arc::new(RwLock::new(CurrencyConverter::new(config.default_usd_tzs_rate)));
    let source = Arc::new(HttpExchangeRateSource::new(config.exchange_rate_url.clone()));
    if !refresh_once(source.as_ref(), &converter).await {
        component_warn!(ComponentId::Rates, "using fallback rate {}", config.default_usd_tzs_rate);
    }
    spawn_rate_refresher(source, converter.clone(), config.rate_refresh);
    converter
}

fn preview(config: &FrontendConfig, path: &Path) -> anyhow::Result<()> {
    let form: WizardFormState = read_json(path)?;
    let (failing, errors) = validate_for_submit(&form);
    if let Some(first) = failing.first() {
        for (field, message) in errors.iter() {
            println!("{}: {}", field.as_str(), message);
        }
        return Err(FrontendError::Validation {
            step: first.number(),
            fields: errors.fields().iter().map(|f| f.as_str().to_string()).collect(),
        }
        .into());
    }

    let converter = CurrencyConverter::new(config.default_usd_tzs_rate);
    let payload = ProjectPayload::from_form(&form, &converter);
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

async fn submit(config: &FrontendConfig, path: &Path, project_id: Option<ProjectId>) -> anyhow::Result<()> {
    let form: WizardFormState = read_json(path)?;
    let api = build_api(config)?;
    let converter = start_converter(config).await;
    let mode = project_id.map_or(WizardMode::Create, WizardMode::Edit);

    let mut wizard = ProjectWizard::from_draft(
        mode,
        form,
        RealGeocodingGateway::new(config.geocoder_url.clone()),
        api.clone(),
        api,
        converter,
    )
    .with_country(config.geocoder_country.clone());

    if !wizard.advance_to_review() {
        for (field, message) in wizard.machine().errors().iter() {
            println!("{}: {}", field.as_str(), message);
        }
        bail!("draft stops at step {}", wizard.step().number());
    }

    match wizard.submit().await {
        SubmitStatus::Completed { project, orphaned_sites } => {
            logging::log_success(ComponentId::Wizard, &format!("saved project {} ({})", project.name, project.id));
            for site in orphaned_sites {
                println!("site {site} was removed from the form but could not be deleted");
            }
            Ok(())
        }
        SubmitStatus::Invalid => {
            for (field, message) in wizard.machine().errors().iter() {
                println!("{}: {}", field.as_str(), message);
            }
            bail!("draft failed validation")
        }
        SubmitStatus::Failed(message) => Err(message.into()),
        SubmitStatus::Closed => Ok(()),
    }
}

async fn geocode(config: &FrontendConfig, region: &str, district: &str, ward: &str, offline: bool) -> anyhow::Result<()> {
    let Some((level, query)) = geocode_query(region, district, ward, &config.geocoder_country) else {
        bail!("select at least a region");
    };
    component_debug!(ComponentId::Geocoder, "{:?} query '{}'", level, query);

    let table = StaticGeocodingGateway::default();
    let found = if offline {
        table.resolve(&query)
    } else {
        match RealGeocodingGateway::new(config.geocoder_url.clone()).geocode(&query).await {
            Some(coords) => Some(coords),
            None => table.resolve(&query),
        }
    };

    match found {
        Some(coords) => println!("{query}: {coords}"),
        None => println!("{query}: no match"),
    }
    Ok(())
}

async fn team(config: &FrontendConfig, project_id: ProjectId, role: ProjectRole) -> anyhow::Result<()> {
    let mut screen = TeamScreen::new(project_id, build_api(config)?);
    screen.load().await?;
    screen.begin_add(chrono::Local::now().date_naive());
    screen.editor_mut().select_role(role)?;

    println!("{} member(s) on the project", screen.editor().team().len());
    for candidate in screen.editor().candidates() {
        let marker = if candidate.already_assigned { " (assigned)" } else { "" };
        println!("{} <{}>{}", candidate.user.full_name, candidate.user.email, marker);
    }
    Ok(())
}

async fn request(config: &FrontendConfig, path: &Path, justification: Option<String>) -> anyhow::Result<()> {
    let draft: MaterialRequestDraft = read_json(path)?;
    let mut screen = MaterialRequestScreen::new(draft, build_api(config)?);

    let mut outcome = screen.submit().await?;
    if outcome == SubmissionOutcome::NeedsJustification {
        if let Some(resolver) = screen.resolver() {
            for row in resolver.rows() {
                println!(
                    "{} [{}] site {} | {} | overlap {} | {} | {}",
                    row.title, row.reference, row.site, row.timeline, row.overlap, row.status, row.materials
                );
            }
        }
        let Some(text) = justification else {
            screen.cancel_resolution();
            bail!("duplicates found; rerun with --justification to proceed");
        };
        if let Some(resolver) = screen.resolver_mut() {
            resolver.set_explanation(text);
        }
        outcome = screen.confirm_with_justification().await?;
    }

    if let SubmissionOutcome::Accepted(id) = outcome {
        logging::log_success(ComponentId::Requests, &format!("material request {id} submitted"));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_tracing_with_level(Some(&args.log_level));

    let mut config = FrontendConfig::from_env()?;
    if let Some(url) = &args.api_url {
        config = config.with_api_url(url)?;
    }
    if let Some(token) = args.api_token.clone() {
        config = config.with_api_token(token);
    }
    logging::log_startup(ComponentId::Cli, "procurement frontend");
    component_info!(
        ComponentId::Cli,
        "api: {}",
        config.api_url.as_ref().map(|u| u.as_str()).unwrap_or("not configured")
    );

    let result = match args.command {
        Command::Preview { draft } => preview(&config, &draft),
        Command::Submit { draft, project_id } => submit(&config, &draft, project_id).await,
        Command::Geocode { region, district, ward, offline } => {
            geocode(&config, &region, &district, &ward, offline).await
        }
        Command::Team { project_id, role } => team(&config, project_id, role).await,
        Command::Request { request: path, justification } => request(&config, &path, justification).await,
    };

    if let Err(e) = &result {
        logging::log_error(ComponentId::Cli, "command", e);
    }
    result
}
