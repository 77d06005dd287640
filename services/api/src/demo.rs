use crate::infra::{parse_date, InMemoryTrackingStore};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use nutrilog::error::AppError;
use nutrilog::tracking::catalog::standard_metrics;
use nutrilog::tracking::{
    DashboardView, GoalDraft, GoalOperator, Metric, MetricDraft, RecordDraft, RepositoryError,
    TrackingService, TrackingServiceError,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Daily-log CSV export with Metric,Date,Value columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Metric to evaluate, matched against the standard catalog by name
    #[arg(long)]
    pub(crate) metric: String,
    /// Display unit used when the metric is not in the standard catalog
    #[arg(long, default_value = "units")]
    pub(crate) unit: String,
    /// Goal direction: '>' keeps the value at or above the target, '<' at or below
    #[arg(long, value_parser = parse_operator)]
    pub(crate) operator: GoalOperator,
    /// Goal threshold value
    #[arg(long)]
    pub(crate) target: f64,
    /// Trailing window in days
    #[arg(long, default_value_t = 30)]
    pub(crate) window_days: u32,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Evaluation date for the walkthrough (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Trailing window in days
    #[arg(long, default_value_t = 30)]
    pub(crate) window_days: u32,
}

fn parse_operator(raw: &str) -> Result<GoalOperator, String> {
    match raw.trim() {
        ">" | ">=" | "at-least" => Ok(GoalOperator::AtLeast),
        "<" | "<=" | "at-most" => Ok(GoalOperator::AtMost),
        other => Err(format!("unknown operator '{other}', expected '>' or '<'")),
    }
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryTrackingStore::default());
    let service = TrackingService::new(store, args.window_days);

    for draft in standard_metrics() {
        service.create_metric(draft)?;
    }

    let wanted = args.metric.trim();
    let metric = match service
        .metrics()?
        .into_iter()
        .find(|metric| metric.name.eq_ignore_ascii_case(wanted))
    {
        Some(metric) => metric,
        None => service.create_metric(MetricDraft {
            name: wanted.to_string(),
            unit: args.unit.clone(),
        })?,
    };

    service.create_goal(GoalDraft {
        metric_id: metric.id,
        operator: args.operator,
        target_value: args.target,
    })?;

    let file = std::fs::File::open(&args.csv)?;
    let outcome = service.import_daily_log(file)?;
    if !outcome.unmatched.is_empty() {
        println!(
            "Skipped rows for metrics outside the catalog: {}",
            outcome.unmatched.join(", ")
        );
        println!();
    }

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let view = service.dashboard(metric.id, Some(args.window_days), today)?;
    print_dashboard(&view);

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let store = Arc::new(InMemoryTrackingStore::default());
    let service = TrackingService::new(store, args.window_days);

    for draft in standard_metrics() {
        service.create_metric(draft)?;
    }
    let metrics = service.metrics()?;
    let protein = catalog_metric(&metrics, "Protein")?;
    let sodium = catalog_metric(&metrics, "Sodium (Na)")?;

    service.create_goal(GoalDraft {
        metric_id: protein.id,
        operator: GoalOperator::AtLeast,
        target_value: 120.0,
    })?;
    service.create_goal(GoalDraft {
        metric_id: sodium.id,
        operator: GoalOperator::AtMost,
        target_value: 2300.0,
    })?;

    let protein_values = [
        132.0, 101.0, 124.0, 97.0, 140.0, 118.0, 122.0, 115.0, 128.0, 109.0, 131.0, 126.0, 98.0,
        135.0,
    ];
    let sodium_values = [
        1900.0, 2550.0, 2210.0, 1845.0, 2480.0, 2105.0, 1990.0, 2320.0, 2250.0, 1875.0, 2400.0,
        2150.0, 2600.0, 2050.0,
    ];

    for (offset, value) in protein_values.iter().enumerate() {
        service.log_record(RecordDraft {
            metric_id: protein.id,
            value: *value,
            date: today - Duration::days(offset as i64 + 1),
        })?;
    }
    for (offset, value) in sodium_values.iter().enumerate() {
        service.log_record(RecordDraft {
            metric_id: sodium.id,
            value: *value,
            date: today - Duration::days(offset as i64 + 1),
        })?;
    }

    println!(
        "Nutrition tracking walkthrough ({} day window ending {today})",
        args.window_days
    );
    println!();

    for metric_id in [protein.id, sodium.id] {
        let view = service.dashboard(metric_id, Some(args.window_days), today)?;
        print_dashboard(&view);
        println!();
    }

    Ok(())
}

fn catalog_metric<'a>(metrics: &'a [Metric], name: &str) -> Result<&'a Metric, AppError> {
    metrics
        .iter()
        .find(|metric| metric.name == name)
        .ok_or_else(|| {
            AppError::Tracking(TrackingServiceError::Repository(RepositoryError::NotFound))
        })
}

fn print_dashboard(view: &DashboardView) {
    println!("Dashboard: {} ({})", view.metric.name, view.metric.unit);
    println!(
        "Window: last {} days ending {}",
        view.window_days, view.today
    );

    match &view.goal {
        Some(goal) => println!(
            "Goal: {} {} {}",
            goal.operator.label(),
            goal.target_value,
            goal.metric_unit
        ),
        None => println!("Goal: none defined"),
    }

    match &view.summary {
        Some(summary) => {
            println!();
            println!(
                "Days within target: {}/{}",
                summary.days_within_target, summary.total_days
            );
            if let Some(pct) = view.within_target_pct {
                println!("Target hit rate: {pct:.0}%");
            }
            println!("Missed target days: {}", summary.missed_target_days);
            println!(
                "Daily average: {:.2} {}",
                summary.daily_average, view.metric.unit
            );
            println!(
                "Daily deficit/excess: {:.2} {}",
                summary.daily_deficit, view.metric.unit
            );
        }
        None => {
            println!();
            println!("No statistics yet: the window has no data or the metric has no goal.");
        }
    }

    if !view.trend.is_empty() {
        println!();
        println!("Trend");
        for point in &view.trend {
            match point.target {
                Some(target) => println!(
                    "- {} | {:>10.2} (target {:.2})",
                    point.date, point.value, target
                ),
                None => println!("- {} | {:>10.2}", point.date, point.value),
            }
        }
    }

    if !view.recent_entries.is_empty() {
        println!();
        println!("Recent entries");
        for entry in &view.recent_entries {
            let status = match entry.within_target {
                Some(true) => "within target",
                Some(false) => "missed target",
                None => "no goal",
            };
            println!("- {} | {:>10.2} | {}", entry.date, entry.value, status);
        }
    }
}
