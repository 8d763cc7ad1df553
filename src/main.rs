use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::str::FromStr;
use std::sync::Arc;

use folio::config::{self, FolioConfig};
use folio::contact::{ContactController, ContactForm, HttpContactTransport, SubmitOutcome};
use folio::reveal::{Region, SectionKey, SectionReveal, Viewport};
use folio::telemetry::init_telemetry;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Reveal and contact core of a single-page portfolio")]
#[command(long_about = "Drives the portfolio's scroll-reveal engine and contact form submission \
                       from the command line. Useful for checking the contact endpoint and \
                       for replaying scroll sequences against a page layout.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit the contact form once and print the visitor-facing notice
    Submit {
        #[arg(long, help = "Sender's full name")]
        name: String,
        #[arg(long, help = "Sender's email address")]
        email: String,
        #[arg(long, default_value = "", help = "Company or organization (optional)")]
        company: String,
        #[arg(long, help = "Message body")]
        message: String,
        /// Overrides contact.api_base_url from configuration
        #[arg(long, help = "Base URL of the contact API")]
        api_url: Option<String>,
    },
    /// Replay a scroll sequence and report which sections get revealed
    Reveal {
        /// Viewport height in pixels
        #[arg(long, default_value = "900")]
        viewport: f64,
        /// Section layout as key:top:height (repeatable)
        #[arg(long = "section", required = true)]
        sections: Vec<SectionSpec>,
        /// Scroll offsets to visit in order (repeatable)
        #[arg(long = "scroll")]
        scrolls: Vec<f64>,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Clone)]
struct SectionSpec {
    key: SectionKey,
    region: Region,
}

impl FromStr for SectionSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let [key, top, height] = parts.as_slice() else {
            bail!("expected key:top:height, got '{s}'");
        };
        if key.is_empty() {
            bail!("section key cannot be empty in '{s}'");
        }
        let top: f64 = top.parse().with_context(|| format!("invalid top in '{s}'"))?;
        let height: f64 = height
            .parse()
            .with_context(|| format!("invalid height in '{s}'"))?;
        Ok(Self {
            key: SectionKey::new(*key),
            region: Region::new(top, height),
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::config()?;
    init_telemetry(&config.observability)?;

    match cli.command {
        Commands::Submit {
            name,
            email,
            company,
            message,
            api_url,
        } => {
            let form = ContactForm::new(name, email, company, message);
            let base_url = api_url.unwrap_or_else(|| config.contact.api_base_url.clone());
            tokio::runtime::Runtime::new()?
                .block_on(async { submit_command(config, &base_url, form).await })
        }
        Commands::Reveal {
            viewport,
            sections,
            scrolls,
        } => reveal_command(config, viewport, sections, scrolls),
        Commands::Config => {
            print!("{}", toml::to_string_pretty(config)?);
            Ok(())
        }
    }
}

async fn submit_command(config: &FolioConfig, base_url: &str, form: ContactForm) -> Result<()> {
    let transport = Arc::new(HttpContactTransport::new(base_url));
    let controller =
        ContactController::new(transport, config.contact.submission_settings());
    controller.fill(&form);

    match controller.submit().await {
        SubmitOutcome::Delivered => {
            println!("{}", controller.notice().unwrap_or_default());
            Ok(())
        }
        SubmitOutcome::Rejected(errors) => {
            for error in &errors {
                eprintln!("  → {error}");
            }
            Err(anyhow!("contact form is incomplete"))
        }
        SubmitOutcome::Failed(err) => {
            println!("{}", controller.notice().unwrap_or_default());
            Err(anyhow!(err).context("contact message was not delivered"))
        }
        SubmitOutcome::Ignored(reason) => Err(anyhow!("submission ignored: {reason:?}")),
    }
}

fn reveal_command(
    config: &FolioConfig,
    viewport_height: f64,
    sections: Vec<SectionSpec>,
    scrolls: Vec<f64>,
) -> Result<()> {
    let layout: Vec<(SectionKey, Region)> = sections
        .iter()
        .map(|spec| (spec.key.clone(), spec.region))
        .collect();
    let mut reveal = SectionReveal::mount(
        layout,
        config.reveal.observer_options(),
        Viewport::new(0.0, viewport_height),
    )?;

    if reveal.is_fail_open() {
        println!("viewport not observable, all sections shown");
    }

    for spec in &sections {
        if reveal.is_visible(spec.key.as_str()) && !reveal.is_fail_open() {
            println!("revealed {} at scroll 0", spec.key);
        }
    }
    for scroll_y in scrolls {
        for key in reveal.scroll_to(scroll_y) {
            println!("revealed {key} at scroll {scroll_y}");
        }
    }

    let hidden: Vec<&str> = sections
        .iter()
        .map(|spec| spec.key.as_str())
        .filter(|key| !reveal.is_visible(key))
        .collect();
    if !hidden.is_empty() {
        println!("still hidden: {}", hidden.join(", "));
    }
    Ok(())
}
