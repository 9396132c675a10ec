// permseed: turn a permission/group JSON document into an idempotent SQL seed
// script, plus the helpers around it (CSV matrix -> JSON, server listing import,
// server grant commands).

mod error;
mod generator;
mod grants;
mod import;
mod logger;
mod output;
mod parser;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use generator::{SeedGenerator, SeedOptions, SeedSummary};
use grants::{GrantMode, GrantOptions, ServerKind};
use parser::document::DocumentParser;
use parser::listing::ListingParser;
use parser::matrix::MatrixParser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Enable debug logging.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the SQL seed script from a permission JSON document.
    Generate(GenerateArgs),
    /// Convert a CSV permission matrix into a permission JSON document.
    Convert(ConvertArgs),
    /// Replace a document's permissions with a server's `Permissions:` listing.
    Import(ImportArgs),
    /// Print server console grant commands for a permission JSON document.
    Grants(GrantsArgs),
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Permission JSON document.
    input: PathBuf,

    /// Preset block selection; the per-block flags below override it.
    #[arg(long, value_enum, default_value_t = Variant::Complete)]
    variant: Variant,

    /// Emit the permissions block.
    #[arg(long, overrides_with = "no_permissions")]
    permissions: bool,
    #[arg(long, overrides_with = "permissions", hide = true)]
    no_permissions: bool,

    /// Emit the group_permissions block.
    #[arg(long, overrides_with = "no_mappings")]
    mappings: bool,
    #[arg(long, overrides_with = "mappings", hide = true)]
    no_mappings: bool,

    /// Wrap the script in BEGIN; ... COMMIT;.
    #[arg(long, overrides_with = "no_transaction")]
    transaction: bool,
    #[arg(long, overrides_with = "transaction", hide = true)]
    no_transaction: bool,

    /// Fail instead of warning on duplicate or undeclared groups.
    #[arg(long)]
    strict: bool,

    /// Output SQL file. If omitted, prints to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct ConvertArgs {
    /// CSV matrix: header row of group names, one permission per row, X marks a grant.
    matrix: PathBuf,

    /// Output JSON file. If omitted, prints to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct ImportArgs {
    /// Permission JSON document to update.
    document: PathBuf,

    /// Text file with the server's permission listing.
    listing: PathBuf,

    /// Output JSON file. If omitted, prints to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct GrantsArgs {
    /// Permission JSON document.
    input: PathBuf,

    #[arg(long, value_enum, default_value_t = ServerKind::Oxide)]
    server: ServerKind,

    /// Command prefix; overrides the one implied by --server.
    #[arg(long)]
    prefix: Option<String>,

    #[arg(long, value_enum, default_value_t = GrantMode::User)]
    mode: GrantMode,

    /// Emit `group add` for every declared group first (group mode only).
    #[arg(long)]
    create_groups: bool,

    /// Emit `group revoke` before each grant (group mode only).
    #[arg(long)]
    revoke_before_grant: bool,
}

impl GrantsArgs {
    fn grant_options(&self) -> Result<GrantOptions, BoxError> {
        if self.mode == GrantMode::User && (self.create_groups || self.revoke_before_grant) {
            return Err("--create-groups and --revoke-before-grant need --mode group".into());
        }
        Ok(GrantOptions {
            mode: self.mode,
            create_groups: self.create_groups,
            revoke_before_grant: self.revoke_before_grant,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Variant {
    /// Groups and plugins, no transaction.
    Basic,
    /// All four blocks inside BEGIN/COMMIT.
    Complete,
}

impl GenerateArgs {
    fn seed_options(&self) -> SeedOptions {
        let mut options = match self.variant {
            Variant::Basic => SeedOptions::basic(),
            Variant::Complete => SeedOptions::complete(),
        };
        if let Some(on) = toggle(self.permissions, self.no_permissions) {
            options.include_permissions = on;
        }
        if let Some(on) = toggle(self.mappings, self.no_mappings) {
            options.include_mappings = on;
        }
        if let Some(on) = toggle(self.transaction, self.no_transaction) {
            options.wrap_in_transaction = on;
        }
        options
    }
}

// overrides_with leaves at most one of the pair set.
fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> Result<(), BoxError> {
    if std::env::args().len() == 1 {
        Cli::command().print_help()?;
        eprintln!();
        std::process::exit(1);
    }
    let cli = Cli::parse();

    logger::set_debug(cli.debug);

    if let Err(e) = run(cli.command) {
        logger::error(&format!("main: {}", e));
        std::process::exit(1);
    }
    Ok(())
}

fn run(command: Command) -> Result<(), BoxError> {
    match command {
        Command::Generate(args) => run_generate(args),
        Command::Convert(args) => run_convert(args),
        Command::Import(args) => run_import(args),
        Command::Grants(args) => run_grants(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), BoxError> {
    let options = args.seed_options();
    logger::debug(&format!("main: Input file: {}", args.input.display()));
    logger::debug(&format!("main: Options: {:?}", options));

    let parser = DocumentParser::new();
    let doc = parser.parse_file(&args.input)?;

    let problems = parser.check(&doc);
    if args.strict && !problems.is_empty() {
        return Err(error::SeedError::Validation { problems }.into());
    }

    let generator = SeedGenerator::new(options, basename(&args.input));
    let (sql, summary) = generator.generate(&doc);
    output::write_output(args.output.as_deref(), &sql)?;

    print_summary(&summary, &options)?;
    logger::debug("main: Seed generation complete");
    Ok(())
}

fn run_convert(args: ConvertArgs) -> Result<(), BoxError> {
    let doc = MatrixParser::new().parse_file(&args.matrix)?;
    let mut json = serde_json::to_string_pretty(&doc)?;
    json.push('\n');
    output::write_output(args.output.as_deref(), &json)?;

    let target = args
        .output
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdout".to_string());
    logger::info(&format!(
        "Convert: {} permissions, {} groups written to {}",
        doc.permissions.len(),
        doc.groups.len(),
        target
    ));
    Ok(())
}

fn run_import(args: ImportArgs) -> Result<(), BoxError> {
    let doc = DocumentParser::new().parse_file(&args.document)?;
    let listed = ListingParser::new().parse_file(&args.listing)?;

    let (merged, _diff) = import::merge_listing(&doc, &listed);
    let mut json = serde_json::to_string_pretty(&merged)?;
    json.push('\n');
    output::write_output(args.output.as_deref(), &json)?;
    logger::debug("main: Import complete");
    Ok(())
}

fn run_grants(args: GrantsArgs) -> Result<(), BoxError> {
    let options = args.grant_options()?;
    let doc = DocumentParser::new().parse_file(&args.input)?;
    let prefix = args
        .prefix
        .as_deref()
        .unwrap_or_else(|| args.server.command_prefix());
    let mut commands = grants::render_commands(&doc, prefix, options);
    if !commands.is_empty() {
        commands.push('\n');
    }
    output::write_output(None, &commands)?;
    Ok(())
}

// Counts go to stderr so stdout stays a clean SQL stream.
fn print_summary(summary: &SeedSummary, options: &SeedOptions) -> io::Result<()> {
    let sep = "=".repeat(40);
    let mut stderr = io::stderr();
    writeln!(stderr, "{}\nSUMMARY\n{}", sep, sep)?;
    writeln!(stderr, "Groups found:       {}", summary.groups)?;
    writeln!(stderr, "Plugins found:      {}", summary.plugins)?;
    writeln!(stderr, "Total permissions:  {}", summary.permission_records)?;
    if options.include_permissions {
        writeln!(stderr, "Permission rows:    {}", summary.permission_rows)?;
    }
    if options.include_mappings {
        writeln!(stderr, "Mapping rows:       {}", summary.mapping_rows)?;
    }
    writeln!(stderr, "{}", sep)?;
    Ok(())
}

fn basename(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
