use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::prune::{JobResult, ResourceKind, RunResult};
use crate::types::RunConfig;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(object)) = (data, response.as_object_mut()) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

fn job_status(job: &JobResult) -> &'static str {
    if job.skipped {
        "skipped"
    } else if job.error.is_some() {
        "error"
    } else if job.failed > 0 {
        "partial"
    } else {
        "ok"
    }
}

/// JSON shape of a finished run
pub fn run_report_json(result: &RunResult) -> anyhow::Result<Value> {
    let (attempted, failed) = result.totals();
    let mut report = serde_json::to_value(result)?;

    report["success"] = json!(result.is_success());
    report["attempted"] = json!(attempted);
    report["failed"] = json!(failed);
    if let Some(err) = result.error() {
        report["error"] = json!(err.to_string());
        report["error_code"] = json!(err.error_code());
    }

    Ok(report)
}

/// Print the per-phase, per-kind summary of a run
pub fn output_run_report(output_format: &OutputFormat, result: &RunResult) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&run_report_json(result)?)?);
        }
        OutputFormat::Text => {
            println!("{:<6} {:<18} {:>9} {:>7}  {}", "PHASE", "KIND", "ATTEMPTED", "FAILED", "STATUS");
            println!("{}", "-".repeat(52));

            for phase in &result.phases {
                for job in &phase.jobs {
                    println!(
                        "{:<6} {:<18} {:>9} {:>7}  {}",
                        phase.phase.number(),
                        job.kind.name(),
                        job.attempted,
                        job.failed,
                        job_status(job)
                    );
                    for name in &job.failures {
                        println!("{:<6}   ✗ {}", "", name);
                    }
                }
            }

            let (attempted, failed) = result.totals();
            let elapsed = result.finished_at - result.started_at;
            println!();
            println!(
                "Prefix '{}': attempted {}, failed {} in {}.{:03}s",
                result.prefix,
                attempted,
                failed,
                elapsed.num_seconds(),
                elapsed.num_milliseconds() % 1000
            );
        }
    }
    Ok(())
}

/// Print the kind table as it applies to the given flags
pub fn output_catalogue(
    output_format: &OutputFormat,
    catalogue: &[ResourceKind],
    config: &RunConfig,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let kinds: Vec<Value> = catalogue
                .iter()
                .map(|k| {
                    json!({
                        "phase": k.phase.number(),
                        "kind": k.kind,
                        "name": k.kind.name(),
                        "enabled": k.is_enabled(config),
                        "concurrency": k.concurrency.to_string(),
                        "phase_fatal": k.phase_fatal
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json!({ "kinds": kinds }))?);
        }
        OutputFormat::Text => {
            println!("{:<6} {:<18} {:<8} {:<12} {}", "PHASE", "KIND", "ENABLED", "CONCURRENCY", "FATAL");
            println!("{}", "-".repeat(54));

            for k in catalogue {
                println!(
                    "{:<6} {:<18} {:<8} {:<12} {}",
                    k.phase.number(),
                    k.kind.name(),
                    if k.is_enabled(config) { "yes" } else { "no" },
                    k.concurrency.to_string(),
                    if k.phase_fatal { "yes" } else { "" }
                );
            }
        }
    }
    Ok(())
}
