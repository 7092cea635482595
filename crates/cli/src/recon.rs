//! `serialsync run|validate|normalize|init` — ERP/WMS serial reconciliation.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serialsync_recon::config::{AbsencePolicy, DevicePrecedence, ReconConfig, STARTER_CONFIG};
use serialsync_recon::model::{ReconInput, ReconResult, Source, SourceRow};

use crate::exit_codes::{
    EXIT_INVALID_CONFIG, EXIT_NOT_SYNCED, EXIT_REPORT_WRITE, EXIT_SOURCE_READ, EXIT_USAGE,
};
use crate::CliError;

pub const DEFAULT_CONFIG_FILE: &str = "serialsync.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AbsentArg {
    /// A serial missing from one system compares as an empty location
    MatchEmpty,
    /// A serial missing from either system is always Not Synced
    NotSynced,
}

impl From<AbsentArg> for AbsencePolicy {
    fn from(arg: AbsentArg) -> Self {
        match arg {
            AbsentArg::MatchEmpty => AbsencePolicy::MatchEmpty,
            AbsentArg::NotSynced => AbsencePolicy::NotSynced,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceArg {
    Erp,
    Wms,
}

impl From<DeviceArg> for DevicePrecedence {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Erp => DevicePrecedence::Erp,
            DeviceArg::Wms => DevicePrecedence::Wms,
        }
    }
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Config file (defaults apply when omitted: ./ERP.xlsx, ./WMS.xlsx -> Serial_Report.xlsx)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// ERP export (.xlsx/.xls/.xlsb/.ods/.csv/.tsv)
    #[arg(long)]
    pub erp: Option<PathBuf>,

    /// WMS export (.xlsx/.xls/.xlsb/.ods/.csv/.tsv)
    #[arg(long)]
    pub wms: Option<PathBuf>,

    /// Report file (.xlsx or .csv)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Read at most N data rows from each source
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// How a serial missing from one system is classified
    #[arg(long, value_enum)]
    pub absent: Option<AbsentArg>,

    /// Which system's device label wins when both have the serial
    #[arg(long, value_enum)]
    pub device: Option<DeviceArg>,

    /// Print the full result as JSON to stdout
    #[arg(long, conflicts_with = "print")]
    pub json: bool,

    /// Write the full result as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub summary_json: Option<PathBuf>,

    /// Print every reconciled serial to stdout
    #[arg(long)]
    pub print: bool,

    /// Don't show the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Exit 6 when any serial is Not Synced
    #[arg(long)]
    pub fail_on_mismatch: bool,
}

fn config_err(msg: impl Into<String>) -> CliError {
    CliError { code: EXIT_INVALID_CONFIG, message: msg.into(), hint: None }
}

/// Load the config file, or defaults when no path is given.
/// Returns the config and the directory its relative paths resolve against.
fn load_config(path: Option<&Path>) -> Result<(ReconConfig, PathBuf), CliError> {
    let Some(path) = path else {
        return Ok((ReconConfig::default(), PathBuf::from(".")));
    };

    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError {
            code: EXIT_USAGE,
            message: format!("cannot read config {}: {e}", path.display()),
            hint: None,
        }
        .with_hint("create one with `serialsync init`")
    })?;
    let config = ReconConfig::from_toml(&text).map_err(|e| config_err(e.to_string()))?;

    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    Ok((config, base_dir))
}

/// Resolved input/output locations for one run.
#[derive(Debug)]
struct RunPaths {
    erp: PathBuf,
    wms: PathBuf,
    output: PathBuf,
    json: Option<PathBuf>,
}

/// Flags override the config. Config paths are relative to the config file;
/// flag paths are relative to the working directory.
fn apply_overrides(config: &mut ReconConfig, base_dir: &Path, args: &RunArgs) -> Result<RunPaths, CliError> {
    if let Some(limit) = args.limit {
        for source in [Source::Erp, Source::Wms] {
            config
                .source_mut(source)
                .map_err(|e| config_err(e.to_string()))?
                .limit = Some(limit);
        }
    }
    if let Some(absent) = args.absent {
        config.policy.absent = absent.into();
    }
    if let Some(device) = args.device {
        config.policy.device = device.into();
    }
    config.validate().map_err(|e| config_err(e.to_string()))?;

    let source_path = |source: Source, flag: &Option<PathBuf>| -> Result<PathBuf, CliError> {
        match flag {
            Some(p) => Ok(p.clone()),
            None => {
                let sc = config.source(source).map_err(|e| config_err(e.to_string()))?;
                Ok(base_dir.join(&sc.file))
            }
        }
    };

    Ok(RunPaths {
        erp: source_path(Source::Erp, &args.erp)?,
        wms: source_path(Source::Wms, &args.wms)?,
        output: args
            .output
            .clone()
            .unwrap_or_else(|| base_dir.join(&config.output.file)),
        json: args
            .summary_json
            .clone()
            .or_else(|| config.output.json.as_ref().map(|j| base_dir.join(j))),
    })
}

fn read_source(config: &ReconConfig, source: Source, path: &Path) -> Result<Vec<SourceRow>, CliError> {
    let sc = config.source(source).map_err(|e| config_err(e.to_string()))?;
    serialsync_io::read_source(path, sc).map_err(|e| CliError {
        code: EXIT_SOURCE_READ,
        message: format!("{source} source: {e}"),
        hint: None,
    })
}

fn progress_bar(enabled: bool) -> ProgressBar {
    if !enabled || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
    let style = ProgressStyle::with_template("Processing Serials {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let (mut config, base_dir) = load_config(args.config.as_deref())?;
    let paths = apply_overrides(&mut config, &base_dir, &args)?;
    tracing::debug!(?paths, "resolved paths");

    // Both sources are read before anything is reconciled or written
    let wms = read_source(&config, Source::Wms, &paths.wms)?;
    let erp = read_source(&config, Source::Erp, &paths.erp)?;
    let input = ReconInput { erp, wms };

    let bar = progress_bar(!args.no_progress);
    let result = serialsync_recon::run_with_progress(&config, &input, |done, total| {
        if done == 1 {
            bar.set_length(total as u64);
        }
        bar.set_position(done as u64);
    });
    bar.finish_and_clear();

    if args.print {
        println!("=== Final Results ===");
        for record in &result.records {
            println!("{record}");
        }
    }

    serialsync_io::write_report(&paths.output, &config.output.sheet, &result.records).map_err(|e| CliError {
        code: EXIT_REPORT_WRITE,
        message: e.to_string(),
        hint: None,
    })?;

    write_json(&result, args.json, paths.json.as_deref())?;

    let s = &result.summary;
    eprintln!(
        "{} serials: {} synced, {} not synced ({} in both, {} ERP only, {} WMS only)",
        s.total, s.synced, s.not_synced, s.in_both, s.erp_only, s.wms_only,
    );
    eprintln!("wrote {}", paths.output.display());

    if args.fail_on_mismatch && !s.is_clean() {
        return Err(CliError {
            code: EXIT_NOT_SYNCED,
            message: format!("{} serial(s) not synced", s.not_synced),
            hint: None,
        });
    }

    Ok(())
}

fn write_json(result: &ReconResult, to_stdout: bool, to_file: Option<&Path>) -> Result<(), CliError> {
    if !to_stdout && to_file.is_none() {
        return Ok(());
    }

    let json_str = serde_json::to_string_pretty(result).map_err(|e| CliError {
        code: EXIT_REPORT_WRITE,
        message: format!("JSON serialization error: {e}"),
        hint: None,
    })?;

    if let Some(path) = to_file {
        std::fs::write(path, &json_str).map_err(|e| CliError {
            code: EXIT_REPORT_WRITE,
            message: format!("cannot write {}: {e}", path.display()),
            hint: None,
        })?;
        eprintln!("wrote {}", path.display());
    }

    if to_stdout {
        println!("{json_str}");
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let (config, base_dir) = load_config(Some(config_path.as_path()))?;
    let erp = config.source(Source::Erp).map_err(|e| config_err(e.to_string()))?;
    let wms = config.source(Source::Wms).map_err(|e| config_err(e.to_string()))?;

    eprintln!("config OK: {}", config.name);
    eprintln!("  erp:    {}", base_dir.join(&erp.file).display());
    eprintln!("  wms:    {}", base_dir.join(&wms.file).display());
    eprintln!("  output: {}", base_dir.join(&config.output.file).display());
    eprintln!("  policy: absent={}, device={}", config.policy.absent, config.policy.device);
    Ok(())
}

pub fn cmd_normalize(config_path: Option<PathBuf>, labels: Vec<String>) -> Result<(), CliError> {
    let (config, _) = load_config(config_path.as_deref())?;
    let normalizer = config.normalize.normalizer();
    for label in &labels {
        println!("{label}\t{}", normalizer.normalize(label));
    }
    Ok(())
}

pub fn cmd_init(path: PathBuf, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError {
            code: EXIT_USAGE,
            message: format!("{} already exists", path.display()),
            hint: Some("pass --force to overwrite".into()),
        });
    }
    std::fs::write(&path, STARTER_CONFIG).map_err(|e| CliError {
        code: EXIT_REPORT_WRITE,
        message: format!("cannot write {}: {e}", path.display()),
        hint: None,
    })?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
