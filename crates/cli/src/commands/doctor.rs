use serde::Serialize;

use chatty_agent::build_provider;
use chatty_core::config::{AppConfig, LoadOptions};
use chatty_core::storage::{JsonFileStore, LocalStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_storage_access(&config));
            checks.push(check_ai_provider(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "storage_access",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "ai_provider_readiness",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_storage_access(config: &AppConfig) -> DoctorCheck {
    let store = JsonFileStore::new(config.storage.path.clone());
    let probe = "doctor_probe";

    let result = store
        .set_raw(probe, "ok".to_string())
        .and_then(|_| store.get_raw(probe))
        .and_then(|value| {
            store.remove(probe)?;
            Ok(value)
        });

    match result {
        Ok(Some(value)) if value == "ok" => DoctorCheck {
            name: "storage_access",
            status: CheckStatus::Pass,
            details: format!("store read/write ok at `{}`", config.storage.path.display()),
        },
        Ok(_) => DoctorCheck {
            name: "storage_access",
            status: CheckStatus::Fail,
            details: "store probe value did not round-trip".to_string(),
        },
        Err(error) => DoctorCheck {
            name: "storage_access",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_ai_provider(config: &AppConfig) -> DoctorCheck {
    match build_provider(&config.ai, config.widget.default_language) {
        Ok(provider) => DoctorCheck {
            name: "ai_provider_readiness",
            status: CheckStatus::Pass,
            details: format!("provider `{}` is configured", provider.name()),
        },
        Err(error) => DoctorCheck {
            name: "ai_provider_readiness",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
