//! `mmdgen doctor` — environment self-test.
//!
//! Checks the renderer, the troubleshooting catalog, and the output
//! directory. The renderer is the only critical dependency; everything
//! else degrades.

use crate::errors::{EXIT_RENDERER_UNAVAILABLE, EXIT_SUCCESS};
use anyhow::Result;
use clap::Args;
use mmdgen_common::config::Config;
use mmdgen_common::renderer::MmdcRenderer;
use mmdgen_common::troubleshooting::{discover_catalog, Troubleshooting};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::fs;

#[derive(Debug, Args)]
pub struct DoctorArgs {
    /// Emit the report as JSON
    #[arg(long, short = 'j')]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    ok: bool,
    detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum DoctorStatus {
    Healthy,
    Degraded,
    Critical,
}

impl DoctorStatus {
    fn as_str(&self) -> &'static str {
        match self {
            DoctorStatus::Healthy => "healthy",
            DoctorStatus::Degraded => "degraded",
            DoctorStatus::Critical => "critical",
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    status: DoctorStatus,
    checks: Vec<CheckResult>,
    checked_at: String,
}

pub async fn run(args: DoctorArgs, config: &Config) -> Result<i32> {
    let mut checks = Vec::new();
    let mut renderer_missing = false;
    let mut degraded = false;

    match MmdcRenderer::probe().await {
        Ok(version) => checks.push(CheckResult {
            name: "renderer".to_string(),
            ok: true,
            detail: format!("mmdc {}", version),
        }),
        Err(err) => {
            renderer_missing = true;
            checks.push(CheckResult {
                name: "renderer".to_string(),
                ok: false,
                detail: err.to_string(),
            });
        }
    }

    match discover_catalog() {
        Some(path) => {
            let kb = Troubleshooting::load(&path);
            checks.push(CheckResult {
                name: "troubleshooting catalog".to_string(),
                ok: true,
                detail: format!("{} entries from {}", kb.entries().len(), path.display()),
            });
        }
        None => {
            degraded = true;
            checks.push(CheckResult {
                name: "troubleshooting catalog".to_string(),
                ok: false,
                detail: "not found; failures will only get search recommendations".to_string(),
            });
        }
    }

    checks.push(output_dir_check(config, &mut degraded));

    let status = if renderer_missing {
        DoctorStatus::Critical
    } else if degraded {
        DoctorStatus::Degraded
    } else {
        DoctorStatus::Healthy
    };

    let report = DoctorReport {
        status,
        checks,
        checked_at: chrono::Utc::now().to_rfc3339(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(if renderer_missing {
        EXIT_RENDERER_UNAVAILABLE
    } else {
        EXIT_SUCCESS
    })
}

fn output_dir_check(config: &Config, degraded: &mut bool) -> CheckResult {
    let dir = &config.output.dir;
    let probe = dir.join(".mmdgen-doctor");
    let result = fs::create_dir_all(dir)
        .and_then(|_| fs::write(&probe, b"ok"))
        .and_then(|_| fs::remove_file(&probe));

    match result {
        Ok(()) => CheckResult {
            name: "output directory".to_string(),
            ok: true,
            detail: format!("{} is writable", dir.display()),
        },
        Err(err) => {
            *degraded = true;
            CheckResult {
                name: "output directory".to_string(),
                ok: false,
                detail: format!("{}: {}", dir.display(), err),
            }
        }
    }
}

fn print_report(report: &DoctorReport) {
    let status = match report.status {
        DoctorStatus::Healthy => report.status.as_str().green().bold().to_string(),
        DoctorStatus::Degraded => report.status.as_str().yellow().bold().to_string(),
        DoctorStatus::Critical => report.status.as_str().red().bold().to_string(),
    };
    println!("Environment: {}", status);
    for check in &report.checks {
        let mark = if check.ok {
            "ok".green().to_string()
        } else {
            "missing".red().to_string()
        };
        println!("  [{}] {}: {}", mark, check.name, check.detail);
    }
}
