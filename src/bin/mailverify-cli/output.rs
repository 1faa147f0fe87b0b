use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result, bail};
use mailverify_lib::{BatchStatistics, ExportFilter, VerificationResult, to_csv};

pub fn render(results: &[VerificationResult], format: &str, filter: ExportFilter) -> Result<String> {
    match format {
        "human" => Ok(render_human(results, filter)),
        "json" => {
            let rows: Vec<_> = results.iter().filter(|r| filter.keeps(r)).collect();
            let mut s = serde_json::to_string_pretty(&rows)?;
            s.push('\n');
            Ok(s)
        }
        "ndjson" => {
            let mut s = String::new();
            for r in results.iter().filter(|r| filter.keeps(r)) {
                s.push_str(&serde_json::to_string(r)?);
                s.push('\n');
            }
            Ok(s)
        }
        "csv" => Ok(to_csv(results, filter)?),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

fn render_human(results: &[VerificationResult], filter: ExportFilter) -> String {
    let mut out = String::new();
    for r in results.iter().filter(|r| filter.keeps(r)) {
        let tag = if r.is_valid { "[OK]     " } else { "[INVALID]" };
        let _ = writeln!(out, "{tag} {} :: {}", r.email, r.details);
        let _ = writeln!(
            out,
            "          syntax={} domain={} mx={} smtp={} ({:.0} ms)",
            r.syntax_valid, r.domain_valid, r.mx_record_valid, r.smtp_valid, r.verification_time
        );
        let flags = [
            (r.is_disposable, "jetable"),
            (r.is_role_based, "générique"),
            (r.is_free, "gratuit"),
            (r.is_typo, "typo"),
        ];
        let set: Vec<_> = flags.iter().filter(|(on, _)| *on).map(|(_, name)| *name).collect();
        if !set.is_empty() {
            let _ = writeln!(out, "          flags: {}", set.join(", "));
        }
        if let Some(fix) = &r.suggested_correction {
            let _ = writeln!(out, "          suggestion: {fix}");
        }
    }
    out
}

pub fn stats_summary(stats: &BatchStatistics) -> String {
    format!(
        "total={} traités={} ({}%) valides={} invalides={} jetables={} génériques={} gratuits={} typos={} moyenne={:.1} ms",
        stats.total,
        stats.processed,
        stats.progress_percent(),
        stats.valid,
        stats.invalid,
        stats.disposable,
        stats.role_based,
        stats.free,
        stats.typos,
        stats.average_verification_time,
    )
}

pub fn any_invalid(results: &[VerificationResult]) -> bool {
    results.iter().any(|r| !r.is_valid)
}

pub fn write_all_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    use std::io::Write;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);
    {
        let mut f = std::fs::File::create(tmp)
            .with_context(|| format!("create {}", tmp.display()))?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(tmp, path).with_context(|| format!("rename to {}", path.display()))?;
    Ok(())
}
