mod config;
mod telemetry;

use crate::config::{DecoderConfig, OutputFormat};
use crate::telemetry::{TelemetryConfig, init_telemetry};
use anyhow::{Context, Result};
use clap::Parser;
use lpp_payload::{
    CayenneLppDecoder, PayloadError, payload_from_hex, payload_from_json, to_fields_envelope,
    to_flat_map,
};
use serde_json::{Value, json};
use std::io::{BufRead, Write};
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(name = "lpp-decode")]
#[command(version)]
#[command(
    about = "Decode Cayenne LPP uplink payloads into JSON, one document per input.",
    long_about = None,
    after_help = "Payloads are hex strings or JSON byte arrays. Without arguments, one payload is read per stdin line.\n\nEnvironment:\n  LPP_OUTPUT_FORMAT  flat (default) or fields\n  LPP_FAIL_FAST      stop at the first undecodable payload\n  LPP_LOG_LEVEL      log level for stderr (default info)\n\nExamples:\n  lpp-decode 01670110\n  echo '[1, 103, 1, 16]' | lpp-decode"
)]
struct Cli {
    /// Payloads to decode (hex or JSON byte array); stdin is read when omitted
    payloads: Vec<String>,
}

/// Counts of inputs handled by [`run_lines`].
#[derive(Debug, Default, PartialEq, Eq)]
struct RunSummary {
    decoded: usize,
    failed: usize,
}

fn main() {
    let cli = Cli::parse();

    let config = match DecoderConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_telemetry(&TelemetryConfig {
        log_level: config.log_level.clone(),
    }) {
        eprintln!("Failed to initialize telemetry: {}", e);
        std::process::exit(1);
    }

    debug!("Configuration: {:?}", config);

    if let Err(e) = run(cli, &config) {
        error!(error = %e, "lpp-decode failed");
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: &DecoderConfig) -> Result<()> {
    let decoder = CayenneLppDecoder::new();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let summary = if cli.payloads.is_empty() {
        run_lines(&decoder, std::io::stdin().lock().lines(), &mut out, config)?
    } else {
        run_lines(&decoder, cli.payloads.into_iter().map(Ok), &mut out, config)?
    };

    info!(
        decoded = summary.decoded,
        failed = summary.failed,
        "finished decoding"
    );
    Ok(())
}

/// Decode every non-blank input and write one JSON document per input to `out`.
///
/// Failures are written as `{"error": "..."}` unless `config.fail_fast` is
/// set, in which case the first failure ends the run with an error.
fn run_lines<I, W>(
    decoder: &CayenneLppDecoder,
    lines: I,
    out: &mut W,
    config: &DecoderConfig,
) -> Result<RunSummary>
where
    I: Iterator<Item = std::io::Result<String>>,
    W: Write,
{
    let mut summary = RunSummary::default();
    for (index, line) in lines.enumerate() {
        let input = index + 1;
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let document = match process_line(decoder, &line, config.output_format) {
            Ok(document) => {
                summary.decoded += 1;
                document
            }
            Err(e) => {
                summary.failed += 1;
                error!(input, error = %e, "failed to decode payload");
                if config.fail_fast {
                    anyhow::bail!("payload {} rejected: {}", input, e);
                }
                json!({ "error": e.to_string() })
            }
        };

        writeln!(out, "{}", document).context("failed to write output")?;
    }

    Ok(summary)
}

/// Parse one input (hex or JSON byte array) and decode it.
fn process_line(
    decoder: &CayenneLppDecoder,
    line: &str,
    format: OutputFormat,
) -> Result<Value, PayloadError> {
    let trimmed = line.trim();
    let bytes = if trimmed.starts_with('[') {
        let value: Value = serde_json::from_str(trimmed)
            .map_err(|e| PayloadError::InvalidPayload(format!("bad JSON byte array: {}", e)))?;
        payload_from_json(&value)?
    } else {
        payload_from_hex(trimmed)?
    };

    let readings = decoder.decode_readings(&bytes)?;
    match format {
        OutputFormat::Flat => Ok(Value::Object(to_flat_map(&readings)?)),
        OutputFormat::Fields => to_fields_envelope(&readings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_hex_line_flat() {
        let decoder = CayenneLppDecoder::new();
        let document = process_line(&decoder, "03 67 01 10 05 68 64", OutputFormat::Flat).unwrap();
        assert_eq!(document, json!({"temperature_3": 27.2, "humidity_5": 50.0}));
    }

    #[test]
    fn test_process_json_line_fields() {
        let decoder = CayenneLppDecoder::new();
        let document = process_line(&decoder, "[1, 103, 1, 16]", OutputFormat::Fields).unwrap();
        assert_eq!(
            document,
            json!({"fields": [{"channel": 1, "type": 103, "name": "temperature", "value": 27.2}]})
        );
    }

    #[test]
    fn test_process_line_errors() {
        let decoder = CayenneLppDecoder::new();
        assert!(matches!(
            process_line(&decoder, "0563", OutputFormat::Flat),
            Err(PayloadError::UnknownSensorType(99))
        ));
        assert!(matches!(
            process_line(&decoder, "[1, 300]", OutputFormat::Flat),
            Err(PayloadError::ByteValueOverflow(_))
        ));
        assert!(matches!(
            process_line(&decoder, "[1, 103", OutputFormat::Flat),
            Err(PayloadError::InvalidPayload(_))
        ));
        assert!(matches!(
            process_line(&decoder, "0167", OutputFormat::Flat),
            Err(PayloadError::TruncatedPayload { .. })
        ));
    }

    fn config(fail_fast: bool) -> DecoderConfig {
        DecoderConfig {
            log_level: "info".to_string(),
            output_format: OutputFormat::Flat,
            fail_fast,
        }
    }

    fn lines(inputs: &[&str]) -> std::vec::IntoIter<std::io::Result<String>> {
        inputs
            .iter()
            .map(|line| Ok(line.to_string()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    fn output_documents(out: Vec<u8>) -> Vec<Value> {
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_run_lines_reports_errors_and_skips_blank_lines() {
        let decoder = CayenneLppDecoder::new();
        let mut out = Vec::new();
        let inputs = lines(&["01670110", "", "   ", "0563", "[5, 104, 100]"]);

        let summary = run_lines(&decoder, inputs, &mut out, &config(false)).unwrap();
        assert_eq!(
            summary,
            RunSummary {
                decoded: 2,
                failed: 1
            }
        );

        let documents = output_documents(out);
        assert_eq!(documents.len(), 3);
        assert_eq!(documents[0], json!({"temperature_1": 27.2}));
        assert_eq!(
            documents[1],
            json!({"error": "unknown sensor type: 99"})
        );
        assert_eq!(documents[2], json!({"humidity_5": 50.0}));
    }

    #[test]
    fn test_run_lines_fail_fast_stops_at_first_failure() {
        let decoder = CayenneLppDecoder::new();
        let mut out = Vec::new();
        let inputs = lines(&["01670110", "", "0563", "[5, 104, 100]"]);

        let err = run_lines(&decoder, inputs, &mut out, &config(true)).unwrap_err();
        assert!(err.to_string().contains("payload 3 rejected"));

        let documents = output_documents(out);
        assert_eq!(documents, vec![json!({"temperature_1": 27.2})]);
    }

    #[test]
    fn test_run_lines_read_error() {
        let decoder = CayenneLppDecoder::new();
        let mut out = Vec::new();
        let inputs = vec![
            Ok("01670110".to_string()),
            Err(std::io::Error::other("stdin closed")),
        ]
        .into_iter();

        assert!(run_lines(&decoder, inputs, &mut out, &config(false)).is_err());
        assert_eq!(output_documents(out).len(), 1);
    }

    #[test]
    fn test_cli_accepts_payload_arguments() {
        let cli = Cli::try_parse_from(["lpp-decode", "01670110", "[1, 103, 1, 16]"]).unwrap();
        assert_eq!(cli.payloads, vec!["01670110", "[1, 103, 1, 16]"]);

        let cli = Cli::try_parse_from(["lpp-decode"]).unwrap();
        assert!(cli.payloads.is_empty());
    }

    #[test]
    fn test_cli_flags_are_not_payloads() {
        let err = Cli::try_parse_from(["lpp-decode", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);

        let err = Cli::try_parse_from(["lpp-decode", "01670110", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
