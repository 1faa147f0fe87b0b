use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use mailverify_lib::{ExportFilter, VerificationSettings};
use mailverify_lib::pipeline::MAX_CONCURRENT_LIMIT;

#[derive(Parser)]
#[command(name = "mailverify-cli", version, about = "vérification d'adresses e-mail")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// fichier de configuration TOML
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// vérificateur: simulated|pass|dns
    #[arg(long, global = true, default_value = "simulated")]
    pub checker: String,

    /// taille d'une fenêtre de vérification (1 à 10)
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// désactive la vérification de syntaxe
    #[arg(long, global = true)]
    pub no_syntax: bool,

    /// désactive la vérification du domaine
    #[arg(long, global = true)]
    pub no_domain: bool,

    /// désactive la vérification MX
    #[arg(long, global = true)]
    pub no_mx: bool,

    /// désactive la vérification SMTP
    #[arg(long, global = true)]
    pub no_smtp: bool,

    /// ne signale pas les domaines jetables
    #[arg(long, global = true)]
    pub no_disposable: bool,

    /// ne signale pas les adresses génériques (support@, info@…)
    #[arg(long, global = true)]
    pub no_role: bool,

    /// ne signale pas les fournisseurs gratuits
    #[arg(long, global = true)]
    pub no_free: bool,

    /// désactive la détection de fautes de frappe
    #[arg(long, global = true)]
    pub no_typos: bool,

    /// ne propose pas de correction
    #[arg(long, global = true)]
    pub no_suggest: bool,

    /// format: human|json|ndjson|csv
    #[arg(long, global = true, default_value = "human")]
    pub format: String,

    /// filtre d'export: all|valid|invalid
    #[arg(long, global = true)]
    pub export: Option<String>,

    /// write report to file (écriture atomique)
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    /// affiche les statistiques du lot sur stderr
    #[arg(long, global = true)]
    pub stats: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// vérifie une seule adresse
    Verify { email: String },
    /// vérifie une liste d'adresses (texte ou .csv)
    Batch {
        /// fichier d'adresses; `.csv` lit la première colonne
        #[arg(long)]
        file: Option<PathBuf>,
        /// lit des adresses depuis stdin (séparées par retour ligne, virgule ou point-virgule)
        #[arg(long)]
        stdin: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckerKind {
    Simulated,
    Pass,
    Dns,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    pub fn checker_kind(&self) -> Result<CheckerKind> {
        match self.checker.as_str() {
            "simulated" => Ok(CheckerKind::Simulated),
            "pass" => Ok(CheckerKind::Pass),
            "dns" => Ok(CheckerKind::Dns),
            other => bail!("unknown --checker '{other}', use: simulated|pass|dns"),
        }
    }

    pub fn export_filter(&self) -> Result<ExportFilter> {
        match self.export.as_deref() {
            None => Ok(ExportFilter::All),
            Some(raw) => Ok(raw.parse::<ExportFilter>()?),
        }
    }

    /// Command-line flags take precedence over the configuration file.
    pub fn apply(&self, settings: &mut VerificationSettings) {
        let disabled = [
            (self.no_syntax, &mut settings.check_syntax),
            (self.no_domain, &mut settings.check_domain),
            (self.no_mx, &mut settings.check_mx),
            (self.no_smtp, &mut settings.check_smtp),
            (self.no_disposable, &mut settings.detect_disposable),
            (self.no_role, &mut settings.detect_role_based),
            (self.no_free, &mut settings.detect_free),
            (self.no_typos, &mut settings.detect_typos),
            (self.no_suggest, &mut settings.suggest_corrections),
        ];
        for (flag, slot) in disabled {
            if flag {
                *slot = false;
            }
        }
        if let Some(n) = self.concurrency {
            settings.concurrent_limit = n.clamp(1, MAX_CONCURRENT_LIMIT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        <Cli as Parser>::try_parse_from(args).unwrap()
    }

    #[test]
    fn flags_disable_stages_and_clamp_width() {
        let cli = parse(&[
            "mailverify-cli",
            "verify",
            "a@b.com",
            "--no-smtp",
            "--no-typos",
            "--concurrency",
            "40",
        ]);
        let mut settings = VerificationSettings::default();
        cli.apply(&mut settings);
        assert!(!settings.check_smtp);
        assert!(!settings.detect_typos);
        assert!(settings.check_mx);
        assert_eq!(settings.concurrent_limit, 10);
    }

    #[test]
    fn checker_and_filter_are_validated() {
        let cli = parse(&["mailverify-cli", "--checker", "pass", "--export", "invalid"]);
        assert_eq!(cli.checker_kind().unwrap(), CheckerKind::Pass);
        assert_eq!(cli.export_filter().unwrap(), ExportFilter::Invalid);

        let cli = parse(&["mailverify-cli", "--checker", "carrier-pigeon"]);
        assert!(cli.checker_kind().is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::clap_command().debug_assert();
    }
}
