mod args;
mod output;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use mailverify_lib::checks::{DomainCheck, MxCheck, SmtpCheck};
use mailverify_lib::config::AppConfig;
use mailverify_lib::{
    BatchStatistics, ExportFilter, FixedChecker, VerificationResult, VerificationSettings,
    Verifier, default_file_name, ingest,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::args::{CheckerKind, Cli, Commands};

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("configuration {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}

fn collect_addresses(cmd: &Commands) -> Result<Vec<String>> {
    match cmd {
        Commands::Verify { email } => Ok(vec![email.clone()]),
        Commands::Batch { file, stdin } => {
            let mut addresses = Vec::new();
            if let Some(path) = file {
                addresses.extend(ingest::read_file(path)?);
            }
            if *stdin {
                addresses.extend(ingest::read_text(io::stdin().lock()).context("read stdin")?);
            }
            if file.is_none() && !*stdin {
                bail!("batch: précisez --file PATH ou --stdin");
            }
            Ok(addresses)
        }
    }
}

async fn run<D, M, S>(
    verifier: Verifier<D, M, S>,
    addresses: &[String],
    settings: &VerificationSettings,
) -> (Vec<VerificationResult>, BatchStatistics)
where
    D: DomainCheck,
    M: MxCheck,
    S: SmtpCheck,
{
    let mut stats = BatchStatistics::new(addresses.len());
    let mut results = Vec::with_capacity(addresses.len());
    verifier
        .verify_batch(addresses, settings, |result| {
            stats.record(&result);
            debug!(
                email = %result.email,
                progress = stats.progress_percent(),
                "result"
            );
            results.push(result);
        })
        .await;
    (results, stats)
}

async fn verify(
    kind: CheckerKind,
    config: &AppConfig,
    addresses: &[String],
    settings: &VerificationSettings,
) -> Result<(Vec<VerificationResult>, BatchStatistics)> {
    let classifier = config.classifier();
    let outcome = match kind {
        CheckerKind::Simulated => {
            let verifier = Verifier::simulated(config.simulation.clone()).with_classifier(classifier);
            run(verifier, addresses, settings).await
        }
        CheckerKind::Pass => {
            let verifier = Verifier::fixed(FixedChecker::all_pass()).with_classifier(classifier);
            run(verifier, addresses, settings).await
        }
        #[cfg(feature = "with-dns")]
        CheckerKind::Dns => {
            use mailverify_lib::DnsChecker;
            let dns = DnsChecker::with_timeout(config.dns.timeout, config.dns.attempts);

            #[cfg(feature = "with-smtp-verify")]
            let smtp = mailverify_lib::SmtpProbeChecker::new(dns.clone(), (&config.smtp).into());
            #[cfg(not(feature = "with-smtp-verify"))]
            let smtp = {
                if settings.check_smtp {
                    tracing::warn!("sonde SMTP indisponible sans la feature 'with-smtp-verify', étape SMTP considérée réussie");
                }
                FixedChecker::all_pass()
            };

            let verifier = Verifier::new(dns.clone(), dns, smtp).with_classifier(classifier);
            run(verifier, addresses, settings).await
        }
        #[cfg(not(feature = "with-dns"))]
        CheckerKind::Dns => bail!("--checker dns nécessite la feature 'with-dns'"),
    };
    Ok(outcome)
}

/// Where the report goes: `--out`, or a dated file name when only `--export`
/// was given with the CSV format.
fn report_path(cli: &Cli, filter: ExportFilter) -> Option<PathBuf> {
    if let Some(path) = &cli.out {
        return Some(path.clone());
    }
    if cli.export.is_some() && cli.format == "csv" {
        let today = chrono::Local::now().date_naive();
        return Some(PathBuf::from(default_file_name(filter, today)));
    }
    None
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let Some(cmd) = &cli.cmd else {
        Cli::clap_command().print_help()?;
        println!();
        return Ok(());
    };

    let config = load_config(&cli)?;
    let mut settings = config.settings.clone();
    cli.apply(&mut settings);
    let kind = cli.checker_kind()?;
    let filter = cli.export_filter()?;

    let addresses = collect_addresses(cmd)?;
    info!(count = addresses.len(), checker = %cli.checker, "starting verification");

    let (results, stats) = verify(kind, &config, &addresses, &settings).await?;

    let report = output::render(&results, &cli.format, filter)?;
    match report_path(&cli, filter) {
        Some(path) => {
            output::write_all_atomically(&path, report.as_bytes())?;
            eprintln!("rapport écrit dans {}", path.display());
        }
        None => print!("{report}"),
    }

    if cli.stats {
        eprintln!("{}", output::stats_summary(&stats));
    }

    // codes de sortie : 0 OK, 2 invalids, 1 fatal
    if output::any_invalid(&results) {
        std::process::exit(2);
    }
    Ok(())
}
