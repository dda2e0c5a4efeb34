use crate::build_info;
use crate::error::{AmendError, Result};
use crate::types::{AmendRequest, KeyValue};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use tracing::warn;

/// Flag a plugin host passes to discover what this program does
pub const DESCRIBE_FLAG: &str = "--tk-describe";

/// The single line printed for [`DESCRIBE_FLAG`]
pub const PLUGIN_DESCRIPTOR: &str = "tk-plugin: Amend fields on an existing ticket";

const EXAMPLES: &str = r#"EXAMPLES:
  ticket-amend ab-1234 -p 1 -a alice
  ticket-amend 1234 --tags api,frontend
  ticket-amend ab-1234 --parent cd -d "Blocked on the schema change."
  ticket-amend ab-1234 --set status=in_progress --append deps=cd-5678

IDENTIFIERS
  Tickets live in .tickets/ in the current directory or an ancestor
  (or in $TICKETS_DIR). A partial ID is fine as long as it matches
  exactly one ticket file name."#;

#[derive(Parser, Debug)]
#[command(
    name = "ticket-amend",
    about = "Amend fields on an existing ticket",
    version,
    after_help = EXAMPLES
)]
struct Cli {
    /// Ticket ID (full or partial)
    #[arg(value_name = "ID")]
    id: Option<String>,

    /// Extra positional arguments are accepted and ignored
    #[arg(hide = true)]
    extra: Vec<String>,

    /// Append a paragraph to the ticket body
    #[arg(short, long, value_name = "TEXT", allow_hyphen_values = true)]
    description: Option<String>,

    /// Set the ticket type
    #[arg(short = 't', long = "type", value_name = "TYPE", allow_hyphen_values = true)]
    issue_type: Option<String>,

    /// Set the priority
    #[arg(short, long, allow_hyphen_values = true)]
    priority: Option<String>,

    /// Set the assignee
    #[arg(short, long, allow_hyphen_values = true)]
    assignee: Option<String>,

    /// Set the external reference
    #[arg(short, long, value_name = "REF", allow_hyphen_values = true)]
    external_ref: Option<String>,

    /// Set the parent ticket (full or partial ID)
    #[arg(short = 'P', long, value_name = "ID", allow_hyphen_values = true)]
    parent: Option<String>,

    /// Add comma-separated tags (existing tags are kept)
    #[arg(short = 'T', long, allow_hyphen_values = true)]
    tags: Option<String>,

    /// Set any frontmatter field (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", allow_hyphen_values = true)]
    set: Vec<KeyValue>,

    /// Add comma-separated entries to any list field (repeatable)
    #[arg(long = "append", value_name = "KEY=VALUE", allow_hyphen_values = true)]
    append: Vec<KeyValue>,

    /// Print the amended ticket instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

/// Options for an amend run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub request: AmendRequest,
    pub dry_run: bool,
    pub json: bool,
}

/// What the command line asks the program to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Print the plugin descriptor
    Describe,
    /// Print help or version text
    Print(String),
    Amend(Options),
}

/// Interpret the full argument list (program name first)
pub fn interpret<I, T>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    if args.get(1).is_some_and(|arg| arg == DESCRIBE_FLAG) {
        return Ok(Invocation::Describe);
    }

    if args.len() <= 1 {
        return Ok(Invocation::Print(
            Cli::command().render_long_help().to_string(),
        ));
    }

    let parsed = Cli::command()
        .long_version(build_info::long_version())
        .try_get_matches_from(args);
    let cli = match parsed.and_then(|matches| Cli::from_arg_matches(&matches)) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return Ok(Invocation::Print(err.to_string()));
        }
        Err(err) => return Err(usage_error(&err)),
    };

    for ignored in &cli.extra {
        warn!(argument = %ignored, "ignoring extra positional argument");
    }

    let id = cli
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or(AmendError::MissingIdentifier)?;

    Ok(Invocation::Amend(Options {
        request: AmendRequest {
            id,
            description: cli.description,
            issue_type: cli.issue_type,
            priority: cli.priority,
            assignee: cli.assignee,
            external_ref: cli.external_ref,
            parent: cli.parent,
            tags: cli.tags,
            set: cli.set,
            append: cli.append,
        },
        dry_run: cli.dry_run,
        json: cli.json,
    }))
}

/// Turn a clap failure into a usage error, keeping only its headline
fn usage_error(err: &clap::Error) -> AmendError {
    if err.kind() == ErrorKind::UnknownArgument {
        if let Some(ContextValue::String(arg)) = err.get(ContextKind::InvalidArg) {
            return AmendError::UnknownOption(arg.clone());
        }
    }

    let rendered = err.render().to_string();
    let headline = rendered.lines().next().unwrap_or_default();
    AmendError::Usage(headline.trim_start_matches("error: ").to_string())
}
