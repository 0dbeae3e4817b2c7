//! CLI command implementations for metricdash.
//!
//! Provides subcommand handlers for:
//! - `metricdash models` — the model catalog
//! - `metricdash best` — the best model by accuracy
//! - `metricdash chart MODEL...` — single or comparison chart as text, JSON or SVG
//! - `metricdash health` — config, image asset, access log status
//! - `metricdash logs --tail N` — recent access log entries
//! - `metricdash config show|init|set|reset` — configuration management

use anyhow::Result;
use colored::Colorize;

use crate::assets;
use crate::catalog::{Metric, ModelCatalog, ModelRecord};
use crate::chart::{self, ChartSpec, svg};
use crate::config;
use crate::logging::{self, Logger};
use crate::utils::html::{percent, score};

/// Output format for inspection commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Svg,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            Some("svg") => Self::Svg,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// metricdash models
// ---------------------------------------------------------------------------

/// List every model with its four scores.
pub fn run_models(format: OutputFormat) -> Result<()> {
    let catalog = ModelCatalog::builtin();

    match format {
        OutputFormat::Json => {
            let models: Vec<_> = catalog.iter().collect();
            println!("{}", serde_json::to_string_pretty(&models)?);
        }
        OutputFormat::Csv => print!("{}", models_csv(&catalog)),
        OutputFormat::Table | OutputFormat::Svg => print_models_table(&catalog),
    }

    Ok(())
}

fn print_models_table(catalog: &ModelCatalog) {
    let best = catalog.best_by_accuracy();

    println!("{}", "Model Performance Metrics".bold().cyan());
    println!("{}", "=".repeat(64));
    println!(
        "  {:<22} {:>9} {:>9} {:>9} {:>9}",
        "Model", "Accuracy", "Precision", "Recall", "F1 Score"
    );
    println!("  {}", "-".repeat(62));

    for (i, record) in catalog.iter().enumerate() {
        let line = format!(
            "  {:<22} {:>9} {:>9} {:>9} {:>9}",
            record.name,
            score(record.accuracy),
            score(record.precision),
            score(record.recall),
            score(record.f1),
        );
        if record.name == best.name {
            println!("{} {}", line.bold(), "★".yellow());
        } else if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn models_csv(catalog: &ModelCatalog) -> String {
    let mut out = String::from("model,accuracy,precision,recall,f1,color\n");
    for r in catalog.iter() {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            r.name, r.accuracy, r.precision, r.recall, r.f1, r.color
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// metricdash best
// ---------------------------------------------------------------------------

/// Show the model with the highest accuracy.
pub fn run_best(format: OutputFormat) -> Result<()> {
    let catalog = ModelCatalog::builtin();
    let best = catalog.best_by_accuracy();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(best)?),
        OutputFormat::Csv => {
            println!("metric,value");
            for metric in Metric::ALL {
                println!("{},{}", metric.label(), best.score(metric));
            }
        }
        OutputFormat::Table | OutputFormat::Svg => print_best(best),
    }

    Ok(())
}

fn print_best(best: &ModelRecord) {
    println!("{}", "Best Performing Model".bold().cyan());
    println!("{}", "=".repeat(40));
    println!("  {} {}", "Model:".bold(), best.name.bold());
    for metric in Metric::ALL {
        println!("  {:<10} {}", metric.label(), percent(best.score(metric)));
    }
    println!();
    println!(
        "  {}",
        "This model has the highest accuracy among all models.".dimmed()
    );
}

// ---------------------------------------------------------------------------
// metricdash chart
// ---------------------------------------------------------------------------

/// Print a chart: one model gives the metric bar chart, several give the
/// grouped comparison chart.
pub fn run_chart(models: &[String], format: OutputFormat) -> Result<()> {
    let catalog = ModelCatalog::builtin();
    let spec = match models {
        [single] => chart::single_model_chart(&catalog, single)?,
        many => chart::comparison_chart(&catalog, many)?,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&spec)?),
        OutputFormat::Svg => println!("{}", svg::render_chart(&spec)),
        OutputFormat::Csv => print!("{}", chart_csv(&spec)),
        OutputFormat::Table => {
            println!("{}", spec.title.bold().cyan());
            println!("{}", "=".repeat(spec.title.chars().count().max(40)));
            print!("{}", chart_text(&spec, 40));
        }
    }

    Ok(())
}

/// Horizontal text bars, one block per category.
fn chart_text(spec: &ChartSpec, width: usize) -> String {
    let [lo, hi] = spec.value_range;
    let span = if hi > lo { hi - lo } else { 1.0 };
    let name_w = spec
        .series
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (ci, category) in spec.categories.iter().enumerate() {
        out.push_str(&format!("  {category}\n"));
        for series in &spec.series {
            let Some(&value) = series.values.get(ci) else {
                continue;
            };
            let filled = (((value - lo) / span).clamp(0.0, 1.0) * width as f64).round() as usize;
            out.push_str(&format!(
                "    {:<name_w$} {}{} {value:.4}\n",
                series.name,
                "█".repeat(filled),
                "·".repeat(width - filled),
            ));
        }
    }
    out
}

fn chart_csv(spec: &ChartSpec) -> String {
    let mut out = String::from("series,metric,value\n");
    for series in &spec.series {
        for (category, value) in spec.categories.iter().zip(&series.values) {
            out.push_str(&format!("{},{},{}\n", series.name, category, value));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// metricdash health
// ---------------------------------------------------------------------------

/// Check config files, the decorative image and the access log.
pub fn run_health() -> Result<()> {
    println!("{}", "metricdash Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();

    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.metricdash/config.toml found"
        } else {
            "not found (run `metricdash config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".metricdash.toml found"
        } else {
            "none (optional)"
        },
    );
    print_health_item("Listen address", true, &cfg.server.addr);

    match &cfg.appearance.sidebar_image {
        None => print_health_item("Sidebar image", true, "none configured"),
        Some(path) => match assets::load_image(path) {
            Ok(image) => print_health_item(
                "Sidebar image",
                true,
                &format!("{} ({}, {} bytes)", path.display(), image.mime, image.bytes.len()),
            ),
            Err(e) => print_health_item("Sidebar image", false, &format!("{e}; serve will refuse to start")),
        },
    }

    let catalog = ModelCatalog::builtin();
    print_health_item(
        "Model catalog",
        !catalog.is_empty(),
        &format!("{} models, best: {}", catalog.len(), catalog.best_by_accuracy().name),
    );

    let logger = Logger::from_config(&cfg.logging);
    match logger.access_log_path() {
        None => print_health_item("Access log", true, "disabled"),
        Some(path) if path.exists() => {
            let entries = logging::read_recent(path, usize::MAX).len();
            print_health_item("Access log", true, &format!("{entries} entries"));
        }
        Some(_) => print_health_item("Access log", true, "no log file yet"),
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<18} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// metricdash logs
// ---------------------------------------------------------------------------

/// Print the most recent access log entries.
pub fn run_logs(tail: usize) -> Result<()> {
    let cfg = config::load();
    let Some(path) = cfg.logging.resolved_path() else {
        println!("{}", "Could not resolve the access log path.".yellow());
        return Ok(());
    };

    let entries = logging::read_recent(&path, tail);
    if entries.is_empty() {
        println!(
            "{}",
            "No requests logged yet. Run `metricdash serve` and open the dashboard.".yellow()
        );
        return Ok(());
    }

    for e in entries {
        let status = if e.status >= 400 {
            e.status.to_string().red()
        } else {
            e.status.to_string().green()
        };
        println!(
            "{} {:<6} {:<18} {} {:>4}ms {} {}",
            e.timestamp.dimmed(),
            e.method,
            e.path,
            status,
            e.duration_ms,
            e.session.as_deref().unwrap_or("-").dimmed(),
            e.event.as_deref().unwrap_or(""),
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// metricdash config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective metricdash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.metricdash/config.toml", global_exists);
    print_source(".metricdash.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "METRICDASH_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(label: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), label.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{label} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.metricdash/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_str_opt(Some("svg")), OutputFormat::Svg);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }

    #[test]
    fn models_csv_lists_catalog_in_order() {
        let csv = models_csv(&ModelCatalog::builtin());
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "Random Forest,0.9669,0.963,0.9669,0.963,#00ff00");
        assert!(lines[3].starts_with("SVM,"));
    }

    #[test]
    fn chart_text_scales_bars() {
        let spec = chart::single_model_chart(&ModelCatalog::builtin(), "SVM").unwrap();
        let text = chart_text(&spec, 10);
        assert!(text.contains("  Accuracy\n"));
        assert!(text.contains("SVM ██████████ 0.9752"));
    }

    #[test]
    fn chart_csv_has_row_per_value() {
        let spec =
            chart::comparison_chart(&ModelCatalog::builtin(), &["SVM", "Naive Bayes"]).unwrap();
        let csv = chart_csv(&spec);
        assert_eq!(csv.lines().count(), 1 + 8);
        assert!(csv.contains("Naive Bayes,F1 Score,0.9421"));
    }
}
