use clap::{Parser, Subcommand};
use pox_convert::catalog::FuzzyPolicy;
use pox_convert::cli::{self, ExportOptions, ImportOptions};
use pox_convert::plural::DEFAULT_MAX_N;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pox-convert")]
#[command(about = "Convert gettext .po catalogs to Excel for translators, and back.")]
#[command(long_about = "PoxConvert - gettext catalogs ⇄ translator spreadsheets

Translators get one row per message and one column per plural form, each
column labelled with the counts it covers (\"Plural, n = 2-4, 22-24, ...\").
Context and obsolete entries survive the round trip.

COMMANDS:
  export   - .po catalogs to Excel (.xlsx)
  import   - Excel (.xlsx) back to .po catalogs
  plurals  - Show which counts land in which plural form

EXAMPLES:
  pox-convert export locale/de.po locale/pl.po --outdir out/
  pox-convert import out/translations_de.xlsx --outdir locale/
  pox-convert plurals \"nplurals=3; plural=n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2;\"

Logging goes to stderr; set RUST_LOG or pass --verbose for details.")]
#[command(version)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Export .po catalogs to Excel workbooks.

Each catalog becomes one workbook with a \"Translations (<lang>)\" sheet and
a \"Metadata\" sheet. Files are converted concurrently; a failing file does
not stop the others, but the command exits with an error at the end.

FILENAME TEMPLATE:
  {lang}  - catalog language (from --language or the Language header)
  {date}  - today, as YYYY-MM-DD

FUZZY ENTRIES:
  stop     - refuse catalogs that contain fuzzy entries (default)
  ignore   - leave fuzzy entries out of the workbook
  include  - export fuzzy entries like any other")]
    /// Export .po catalogs to Excel .xlsx
    Export {
        /// .po files to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory for the workbooks (must exist)
        #[arg(short, long, default_value = ".", env = "POX_OUTDIR")]
        outdir: PathBuf,

        /// Output filename template
        #[arg(short, long, default_value = cli::DEFAULT_EXPORT_FILENAME, env = "POX_EXPORT_FILENAME")]
        filename: String,

        /// Language to use instead of the catalog's header (single file only)
        #[arg(short, long)]
        language: Option<String>,

        /// What to do with fuzzy entries
        #[arg(long, value_enum, default_value_t = FuzzyPolicy::Stop)]
        fuzzy: FuzzyPolicy,
    },

    #[command(long_about = "Import translated Excel workbooks back into .po catalogs.

The language comes from the workbook's Language property, else from the part
of the filename after the first underscore (translations_pt_BR.xlsx → pt_BR).
The Plural-Forms header comes from the Metadata sheet when it is present and
parses, otherwise it is derived from the number of translation columns.

Obsolete rows are written after the active messages as #~ entries.")]
    /// Import Excel .xlsx workbooks to .po catalogs
    Import {
        /// .xlsx files to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory for the catalogs (must exist)
        #[arg(short, long, default_value = ".", env = "POX_OUTDIR")]
        outdir: PathBuf,

        /// Output filename template
        #[arg(short, long, default_value = cli::DEFAULT_IMPORT_FILENAME, env = "POX_IMPORT_FILENAME")]
        filename: String,
    },

    /// Show the plural buckets and column labels for a Plural-Forms header
    Plurals {
        /// Header value, e.g. "nplurals=2; plural=(n != 1);"
        header: String,

        /// Largest count to sample
        #[arg(long, default_value_t = DEFAULT_MAX_N)]
        max_n: i64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "pox_convert=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Export {
            files,
            outdir,
            filename,
            language,
            fuzzy,
        } => {
            cli::export(ExportOptions {
                files,
                outdir,
                filename,
                language,
                fuzzy,
            })
            .await?
        }

        Commands::Import {
            files,
            outdir,
            filename,
        } => {
            cli::import(ImportOptions {
                files,
                outdir,
                filename,
            })
            .await?
        }

        Commands::Plurals {
            header,
            max_n,
            json,
        } => cli::plurals(&header, max_n, json)?,
    }

    Ok(())
}
