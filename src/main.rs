//! EYA gap analysis entry point: CLI wiring and config-driven decomposition.

use std::path::Path;
use std::process;

use eya_gap::config::CaseConfig;
use eya_gap::gap::engine::decompose;
use eya_gap::gap::types::{EyaEstimate, GapDecomposition, OaResult};
use eya_gap::io::export::export_csv;
use eya_gap::logging;
use eya_gap::reporting::GapReport;

/// Parsed CLI arguments.
#[derive(Debug, Default)]
struct CliArgs {
    case_path: Option<String>,
    preset: Option<String>,
    availability_delta: Option<f64>,
    electrical_delta: Option<f64>,
    export: Option<String>,
    backend: Option<String>,
    help: bool,
    #[cfg(feature = "tui")]
    tui: bool,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: Option<u16>,
}

fn print_help() {
    eprintln!("eya-gap: EYA vs operational AEP gap analysis");
    eprintln!();
    eprintln!("Usage: eya-gap [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --case <path>                 Load case from TOML config file");
    eprintln!("  --preset <name>               Use a built-in case (reference, on_target, outperforming)");
    eprintln!("  --availability-delta <f64>    Sensitivity delta on OA availability losses");
    eprintln!("  --electrical-delta <f64>      Sensitivity delta on OA electrical losses");
    eprintln!("  --export <path>               Export the (adjusted) decomposition to CSV");
    #[cfg(feature = "client")]
    eprintln!("  --backend <url>               Fetch the initial decomposition from a backend");
    #[cfg(feature = "tui")]
    eprintln!("  --tui                         Launch the interactive sensitivity view");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                       Start REST API server");
        eprintln!("  --port <u16>                  API server port (default: 3000)");
    }
    eprintln!("  --help                        Show this help message");
    eprintln!();
    eprintln!("If no --case or --preset is given, the reference preset is used.");
    eprintln!("Set EYA_GAP_LOG (e.g. debug) to change log verbosity.");
}

fn parse_f64(flag: &str, value: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("{flag} value \"{value}\" is not a finite number")),
    }
}

fn parse_args_from(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let mut value = || {
            i += 1;
            args.get(i)
                .cloned()
                .ok_or_else(|| format!("{flag} requires an argument"))
        };
        match flag {
            "--help" | "-h" => cli.help = true,
            "--case" => cli.case_path = Some(value()?),
            "--preset" => cli.preset = Some(value()?),
            "--availability-delta" => {
                cli.availability_delta = Some(parse_f64(flag, &value()?)?);
            }
            "--electrical-delta" => {
                cli.electrical_delta = Some(parse_f64(flag, &value()?)?);
            }
            "--export" => cli.export = Some(value()?),
            #[cfg(feature = "client")]
            "--backend" => cli.backend = Some(value()?),
            #[cfg(feature = "tui")]
            "--tui" => cli.tui = true,
            #[cfg(feature = "api")]
            "--serve" => cli.serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                let v = value()?;
                cli.port = Some(
                    v.parse::<u16>()
                        .map_err(|_| format!("--port value \"{v}\" is not a valid u16"))?,
                );
            }
            other => return Err(format!("unknown argument \"{other}\"")),
        }
        i += 1;
    }

    if cli.case_path.is_some() && cli.preset.is_some() {
        return Err("--case and --preset are mutually exclusive".to_string());
    }

    Ok(cli)
}

/// Loads the case: `--case` takes priority, then `--preset`, then reference.
fn load_case(cli: &CliArgs) -> Result<(CaseConfig, String), String> {
    if let Some(ref path) = cli.case_path {
        let case = CaseConfig::from_toml_file(Path::new(path)).map_err(|e| e.to_string())?;
        Ok((case, path.clone()))
    } else if let Some(ref name) = cli.preset {
        let case = CaseConfig::from_preset(name).map_err(|e| e.to_string())?;
        Ok((case, name.clone()))
    } else {
        Ok((CaseConfig::reference(), "reference".to_string()))
    }
}

/// Obtains the unadjusted decomposition, from the backend when one is configured.
#[cfg(feature = "client")]
fn initial_decomposition(
    case: &CaseConfig,
    eya: &EyaEstimate,
    oa: &OaResult,
) -> Result<GapDecomposition, String> {
    use eya_gap::client::BackendClient;

    if case.backend.url.is_none() {
        return Ok(decompose(eya, oa, None));
    }
    let client = BackendClient::new(&case.backend).map_err(|e| e.to_string())?;
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("failed to create tokio runtime: {e}"))?;
    rt.block_on(client.initial_decomposition(eya, oa))
        .map_err(|e| e.to_string())
}

#[cfg(not(feature = "client"))]
fn initial_decomposition(
    _case: &CaseConfig,
    eya: &EyaEstimate,
    oa: &OaResult,
) -> Result<GapDecomposition, String> {
    Ok(decompose(eya, oa, None))
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args_from(&args).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        print_help();
        process::exit(1);
    });
    if cli.help {
        print_help();
        return;
    }

    #[cfg(feature = "tui")]
    if cli.tui {
        logging::init_tracing_with_filter("off");
    } else {
        logging::init_tracing();
    }
    #[cfg(not(feature = "tui"))]
    logging::init_tracing();

    let (mut case, case_name) = load_case(&cli).unwrap_or_else(|e| fail(e));

    // CLI overrides
    if let Some(d) = cli.availability_delta {
        case.sensitivity.availability_delta = d;
    }
    if let Some(d) = cli.electrical_delta {
        case.sensitivity.electrical_delta = d;
    }
    if let Some(ref url) = cli.backend {
        case.backend.url = Some(url.clone());
    }

    let errors = case.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let eya = case.eya();
    let oa = case.oa();
    let adjustment = case.adjustment();

    let initial = initial_decomposition(&case, &eya, &oa).unwrap_or_else(|e| fail(e));
    tracing::info!(case = %case_name, gap = initial.gap, "initial decomposition ready");
    println!("{}", GapReport::new(initial));

    let current = if adjustment.is_zero() {
        initial
    } else {
        let adjusted = decompose(&eya, &oa, Some(&adjustment));
        println!(
            "\n--- Sensitivity: availability {:+.2} pp, electrical {:+.2} pp ---",
            adjustment.availability_delta * 100.0,
            adjustment.electrical_delta * 100.0
        );
        println!("{}", GapReport::new(adjusted));
        adjusted
    };

    if let Some(ref path) = cli.export {
        if let Err(e) = export_csv(&eya, &oa, &current, Path::new(path)) {
            fail(format!("failed to write CSV: {e}"));
        }
        eprintln!("Decomposition written to {path}");
    }

    #[cfg(feature = "tui")]
    if cli.tui {
        let app = eya_gap::tui::runtime::App::new(case.clone(), &case_name);
        if let Err(e) = eya_gap::tui::run(app) {
            fail(format!("TUI crashed: {e}"));
        }
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(eya_gap::api::AppState { case });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port.unwrap_or(3000)));
        let rt = tokio::runtime::Runtime::new()
            .unwrap_or_else(|e| fail(format!("failed to create tokio runtime: {e}")));
        if let Err(e) = rt.block_on(eya_gap::api::serve(state, addr)) {
            fail(format!("server error: {e}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn parses_preset_and_deltas() {
        let cli = parse_args_from(&args(&[
            "--preset",
            "on_target",
            "--availability-delta",
            "-0.01",
            "--electrical-delta",
            "0.002",
        ]))
        .expect("parse should succeed");
        assert_eq!(cli.preset.as_deref(), Some("on_target"));
        assert_eq!(cli.availability_delta, Some(-0.01));
        assert_eq!(cli.electrical_delta, Some(0.002));
    }

    #[test]
    fn rejects_case_with_preset() {
        let err = parse_args_from(&args(&["--case", "a.toml", "--preset", "reference"]));
        assert!(err.is_err());
    }

    #[test]
    fn rejects_missing_value_and_bad_number() {
        assert!(parse_args_from(&args(&["--export"])).is_err());
        assert!(parse_args_from(&args(&["--availability-delta", "abc"])).is_err());
        assert!(parse_args_from(&args(&["--electrical-delta", "NaN"])).is_err());
        assert!(parse_args_from(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn default_case_is_reference() {
        let cli = parse_args_from(&[]).expect("empty args parse");
        let (case, name) = load_case(&cli).expect("reference loads");
        assert_eq!(name, "reference");
        assert_eq!(case.eya.aep, 12.4);
    }
}
