use crate::catalog::{read_catalog, write_catalog, FuzzyPolicy};
use crate::error::{PoxError, PoxResult};
use crate::excel::{SpreadsheetExporter, SpreadsheetImporter};
use crate::plural::{buckets_for_header, plural_hints_up_to, PluralForms, DEFAULT_SAMPLE_SIZE};
use crate::types::{render_filename, CatalogEntry};
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::debug;

pub const DEFAULT_EXPORT_FILENAME: &str = "translations_{lang}.xlsx";
pub const DEFAULT_IMPORT_FILENAME: &str = "{lang}.po";

/// Resolved settings for `export`
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub files: Vec<PathBuf>,
    pub outdir: PathBuf,
    /// Output filename template (`{lang}`, `{date}`)
    pub filename: String,
    /// Overrides the catalog's `Language`; single file only
    pub language: Option<String>,
    pub fuzzy: FuzzyPolicy,
}

/// Resolved settings for `import`
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub files: Vec<PathBuf>,
    pub outdir: PathBuf,
    pub filename: String,
}

/// Execute the export command
pub async fn export(options: ExportOptions) -> PoxResult<()> {
    println!("{}", "🔥 PoxConvert - Excel Export".bold().green());
    if options.language.is_some() && options.files.len() > 1 {
        return Err(PoxError::Validation(
            "--language can only be used with a single input file".to_string(),
        ));
    }
    check_outdir(&options.outdir)?;

    let ExportOptions {
        files,
        outdir,
        filename,
        language,
        fuzzy,
    } = options;
    run_batch(files, move |file| {
        export_file(file, &outdir, &filename, language.as_deref(), fuzzy)
    })
    .await
}

/// Execute the import command
pub async fn import(options: ImportOptions) -> PoxResult<()> {
    println!("{}", "🔥 PoxConvert - Excel Import".bold().green());
    check_outdir(&options.outdir)?;

    let ImportOptions {
        files,
        outdir,
        filename,
    } = options;
    run_batch(files, move |file| import_file(file, &outdir, &filename)).await
}

/// One `.po` file to one workbook. Returns the written path.
pub fn export_file(
    file: &Path,
    outdir: &Path,
    template: &str,
    language: Option<&str>,
    fuzzy: FuzzyPolicy,
) -> PoxResult<PathBuf> {
    let catalog = read_catalog(file)?;
    let plural_forms = catalog.plural_forms.clone();
    let context = catalog.into_context(language, fuzzy)?;
    let output = outdir.join(context.output_filename(template));

    debug!(
        "Exporting {} messages from {} to {}",
        context.messages.len(),
        file.display(),
        output.display()
    );
    SpreadsheetExporter::new(context)
        .with_plural_forms(plural_forms)
        .export(&output)?;

    Ok(output)
}

/// One workbook to one `.po` file. Returns the written path.
pub fn import_file(file: &Path, outdir: &Path, template: &str) -> PoxResult<PathBuf> {
    let imported = SpreadsheetImporter::new(file).import()?;
    let plural_forms = imported.resolved_plural_forms();
    let output = outdir.join(render_filename(template, &imported.language, Utc::now()));

    let entries: Vec<CatalogEntry> = imported
        .messages
        .into_iter()
        .map(CatalogEntry::from)
        .collect();
    write_catalog(&output, &imported.language, Some(&plural_forms), &entries)?;

    Ok(output)
}

fn check_outdir(outdir: &Path) -> PoxResult<()> {
    if outdir.is_dir() {
        Ok(())
    } else {
        Err(PoxError::Validation(format!(
            "output directory \"{}\" does not exist",
            outdir.display()
        )))
    }
}

/// Convert every file on the blocking pool. A failing file is reported and
/// the rest carry on; the batch fails once all are done.
async fn run_batch<F>(files: Vec<PathBuf>, job: F) -> PoxResult<()>
where
    F: Fn(&Path) -> PoxResult<PathBuf> + Send + Sync + 'static,
{
    let total = files.len();
    let job = Arc::new(job);
    let mut tasks = JoinSet::new();
    for file in files {
        let job = Arc::clone(&job);
        tasks.spawn_blocking(move || {
            let result = job(&file);
            (file, result)
        });
    }

    let mut failed = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((file, Ok(output))) => {
                println!("{} {} → {}", "✅".green(), file.display(), output.display());
            }
            Ok((file, Err(e))) => {
                failed += 1;
                eprintln!("{} {}: {}", "❌".red(), file.display(), e);
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} conversion task failed: {}", "❌".red(), e);
            }
        }
    }

    if failed > 0 {
        return Err(PoxError::Validation(format!(
            "{} of {} files could not be converted",
            failed, total
        )));
    }
    println!("{}", format!("✅ Converted {} file(s)", total).bold().green());
    Ok(())
}

#[derive(Debug, Serialize)]
struct PluralReport {
    nplurals: usize,
    plural: String,
    buckets: Vec<BucketReport>,
}

#[derive(Debug, Serialize)]
struct BucketReport {
    index: usize,
    sample_values: Vec<i64>,
    truncated: bool,
    hint: Option<String>,
}

/// Buckets and labels sampled over the same `0..=max_n`
fn plural_report(header: &str, max_n: i64) -> PoxResult<PluralReport> {
    let forms = PluralForms::parse(header)?;
    let buckets = buckets_for_header(header, max_n, DEFAULT_SAMPLE_SIZE)?;
    let hints = plural_hints_up_to(Some(header), max_n);

    Ok(PluralReport {
        nplurals: forms.nplurals,
        plural: forms.expression,
        buckets: buckets
            .into_iter()
            .map(|bucket| BucketReport {
                hint: hints.get(&bucket.index).cloned(),
                index: bucket.index,
                sample_values: bucket.sample_values,
                truncated: bucket.truncated,
            })
            .collect(),
    })
}

/// Execute the plurals command
pub fn plurals(header: &str, max_n: i64, json: bool) -> PoxResult<()> {
    let report = plural_report(header, max_n)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "🔍 PoxConvert - Plural Forms".bold().green());
    println!("   nplurals: {}", report.nplurals);
    println!("   plural:   {}\n", report.plural.bright_blue());
    for bucket in &report.buckets {
        let samples = bucket
            .sample_values
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let more = if bucket.truncated { ", ..." } else { "" };
        match &bucket.hint {
            Some(hint) => println!("   [{}] {}  ({}{})", bucket.index, hint.cyan(), samples, more),
            None => println!(
                "   [{}] {}  ({}{})",
                bucket.index,
                "beyond nplurals".yellow(),
                samples,
                more
            ),
        }
    }

    Ok(())
}
