//! Subcommand definitions and handlers.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use engine::{
    build_resolver, DeferredNavigator, ImmediateNavigator, LinkResolver, NavigationPort,
};
use linking::{
    classify, ClassifierDefault, ElementId, ElementReference, FolderType, Hints, JobType,
    ResolutionContext, SchemaIntent, UrlBuilder, ViewHint,
};
use platform::{ElementClient, SecretClient};

use crate::config::CliConfig;
use crate::console::{ConsoleBrowser, ConsoleListener};
use crate::observability::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "linkres", version, about = "Resolve rental-platform elements to deep links")]
pub struct Cli {
    /// Configuration file [default: linkres.toml]
    #[arg(long, global = true, env = "LINKRES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format (logs go to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the intent and rule chosen from local hints
    Classify {
        element_id: String,
        #[command(flatten)]
        hints: HintArgs,
    },
    /// Build the URL for a known intent
    Url {
        intent: SchemaIntent,
        element_id: String,
        /// Replace the intent's default view id
        #[arg(long)]
        view_id: Option<String>,
    },
    /// Resolve an element to its deep link
    Resolve {
        element_id: String,
        #[command(flatten)]
        hints: HintArgs,
        /// Use local hints only; never contact the platform
        #[arg(long)]
        offline: bool,
    },
    /// Run a navigator against a console browser
    Open {
        element_id: String,
        #[command(flatten)]
        hints: HintArgs,
        /// Use the anchor-click strategy instead of the placeholder tab
        #[arg(long)]
        immediate: bool,
    },
}

/// What the caller already knows about the element.
#[derive(Debug, Clone, Default, Args)]
pub struct HintArgs {
    #[arg(long)]
    pub job_type: Option<JobType>,
    #[arg(long)]
    pub folder_type: Option<FolderType>,
    #[arg(long)]
    pub definition_id: Option<String>,
    #[arg(long)]
    pub domain_id: Option<String>,
    #[arg(long)]
    pub schema_id: Option<String>,
    /// An intent name or `auto`
    #[arg(long)]
    pub view_hint: Option<ViewHint>,
    /// Replace the intent's default view id
    #[arg(long)]
    pub view_id: Option<String>,
}

impl HintArgs {
    pub fn into_parts(self, element_id: String) -> (ElementReference, ResolutionContext) {
        let reference = ElementReference {
            element_id,
            domain_id: self.domain_id,
            definition_id: self.definition_id,
            schema_id: self.schema_id,
            view_hint: self.view_hint,
            ..ElementReference::default()
        };
        let context = ResolutionContext {
            job_type: self.job_type,
            folder_type: self.folder_type,
            view_id_override: self.view_id,
            ..ResolutionContext::default()
        };
        (reference, context)
    }
}

/// How a command ended, beyond hard errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// No evidence determined a view.
    Unresolved,
    /// The navigation ended without opening anything.
    NavigationFailed,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => ExitCode::SUCCESS,
            Status::Unresolved => ExitCode::from(2),
            Status::NavigationFailed => ExitCode::from(3),
        }
    }
}

/// Wires the platform adapters into a resolver.
pub fn compose(config: &CliConfig) -> Result<Arc<LinkResolver>> {
    let builder =
        UrlBuilder::new(config.links.clone()).context("invalid [links] configuration")?;
    let secrets = Arc::new(SecretClient::new(&config.platform).context("building secret client")?);
    let metadata =
        Arc::new(ElementClient::new(&config.platform).context("building element client")?);
    Ok(Arc::new(build_resolver(
        &config.engine,
        builder,
        secrets,
        metadata,
    )))
}

/// Runs one subcommand, writing its result to `out`.
pub async fn run(
    command: Command,
    resolver: Arc<LinkResolver>,
    browser: ConsoleBrowser,
    out: &mut impl Write,
) -> Result<Status> {
    match command {
        Command::Classify { element_id, hints } => {
            ElementId::parse(&element_id)?;
            let (reference, context) = hints.into_parts(element_id);
            let hints = Hints::from_parts(&reference, &context);
            match classify(&hints, ClassifierDefault::SimpleElement) {
                Some(classification) => {
                    writeln!(out, "{}\t{}", classification.intent, classification.rule)?;
                    Ok(Status::Success)
                }
                None => Ok(Status::Unresolved),
            }
        }
        Command::Url {
            intent,
            element_id,
            view_id,
        } => {
            let url = resolver
                .builder()
                .build_url(intent, &element_id, view_id.as_deref())?;
            writeln!(out, "{url}")?;
            Ok(Status::Success)
        }
        Command::Resolve {
            element_id,
            hints,
            offline,
        } => {
            let (reference, context) = hints.into_parts(element_id);
            let link = if offline {
                Some(resolver.resolve(&reference, &context)?)
            } else {
                resolver.resolve_async(&reference, &context).await?
            };
            match link {
                Some(link) => {
                    writeln!(out, "{}", link.url)?;
                    Ok(Status::Success)
                }
                None => {
                    eprintln!("could not determine a view for {}", reference.element_id.trim());
                    Ok(Status::Unresolved)
                }
            }
        }
        Command::Open {
            element_id,
            hints,
            immediate,
        } => {
            let (reference, context) = hints.into_parts(element_id);
            let browser = Arc::new(browser);
            let navigator: Box<dyn NavigationPort> = if immediate {
                Box::new(ImmediateNavigator::new(resolver, browser))
            } else {
                Box::new(DeferredNavigator::new(resolver, browser))
            };
            let outcome = navigator
                .navigate(&reference, &context, &ConsoleListener)
                .await;
            tracing::info!(?outcome, "Navigation finished");
            Ok(match outcome.url() {
                Some(_) => Status::Success,
                None => Status::NavigationFailed,
            })
        }
    }
}
