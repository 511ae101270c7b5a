use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ark",
    about = "ARK — Asset naming and storage reconciliation",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Storage root holding one subdirectory per variant location
    #[arg(long, global = true, default_value = "storage")]
    pub root: String,

    /// Records file (JSON rows: owner id plus per-variant file names)
    #[arg(long, global = true, default_value = "records.json")]
    pub records: String,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Audit declared records against storage contents
    Audit(AuditArgs),
    /// Decode a token and show its identity fields
    Decode(DecodeArgs),
    /// Mint a token from identity fields
    Encode(EncodeArgs),
    /// Re-link records missing their primary file to unassigned files
    Relink(RelinkArgs),
    /// Remove unassigned files from storage
    Prune(PruneArgs),
}

#[derive(Args)]
pub struct AuditArgs {}

#[derive(Args)]
pub struct DecodeArgs {
    /// The token to inspect
    pub token: String,
}

#[derive(Args)]
pub struct EncodeArgs {
    /// Application id (1-9)
    #[arg(long)]
    pub app: u8,
    /// Variant id (0-9)
    #[arg(long)]
    pub variant: u8,
    /// Owner id (>= 1)
    #[arg(long)]
    pub owner: u64,
    /// Creation time as Unix seconds; defaults to now
    #[arg(long)]
    pub created_at: Option<u64>,
}

#[derive(Args)]
pub struct RelinkArgs {
    /// Preview the choices without writing to the record store
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct PruneArgs {
    /// File names to remove; only names the audit classes as unassigned
    /// are touched
    pub names: Vec<String>,
    /// Remove every unassigned file in every variant location
    #[arg(long)]
    pub all: bool,
    /// Preview deletions without touching storage
    #[arg(long)]
    pub dry_run: bool,
}
