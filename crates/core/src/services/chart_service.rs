//! Line and bar chart data from daily category series.
//!
//! Every function here is pure: same input, same output, no hidden state.
//! Excluded keys (`"*"`, `"0"`, `"56"`) and keys the scheme cannot resolve
//! are skipped; missing values contribute nothing.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use tracing::debug;

use crate::models::category::{CategoryScheme, ColorAssigner};
use crate::models::chain::ALL_KEY;
use crate::models::chart::{BarChart, BarRow, LinePoint, LineSeries};
use crate::models::stats::{
    BidirectionalTransferData, CategoryValues, ChainsAssets, DailySeries, DirectionalTransferData,
};
use crate::services::bucket_service::{days_into_week, parse_date, Bucket};
use crate::services::format_service::{partial_month_label, partial_week_label};

// ── Line charts ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineMode {
    /// Running total per category.
    Cumulative,
    /// The raw value of each date.
    Raw,
}

/// One series per category, each point the running total up to that date.
///
/// Dates are walked in ascending order; a category's accumulator starts at
/// zero the first time it is seen and a point is emitted on every date the
/// category appears in.
pub fn cumulative_line_series(daily: &DailySeries, scheme: CategoryScheme) -> Vec<LineSeries> {
    line_series(daily, scheme, LineMode::Cumulative)
}

/// One series per category plotting each date's value unchanged.
/// Used for endpoints whose daily values are already running totals.
pub fn daily_line_series(daily: &DailySeries, scheme: CategoryScheme) -> Vec<LineSeries> {
    line_series(daily, scheme, LineMode::Raw)
}

fn line_series(daily: &DailySeries, scheme: CategoryScheme, mode: LineMode) -> Vec<LineSeries> {
    let mut colors = ColorAssigner::new();
    let mut series: Vec<LineSeries> = Vec::new();
    let mut slots: BTreeMap<String, usize> = BTreeMap::new();
    let mut running: BTreeMap<String, f64> = BTreeMap::new();

    for (date, values) in daily {
        for (category, value) in scheme.resolve_all(values) {
            let y = match mode {
                LineMode::Cumulative => {
                    let acc = running.entry(category.name.clone()).or_insert(0.0);
                    *acc += value;
                    *acc
                }
                LineMode::Raw => value,
            };

            let slot = match slots.get(&category.name) {
                Some(&slot) => slot,
                None => {
                    // first time this category has been seen
                    series.push(LineSeries {
                        id: category.name.clone(),
                        color: colors.color_for(&category),
                        data: Vec::new(),
                    });
                    slots.insert(category.name.clone(), series.len() - 1);
                    series.len() - 1
                }
            };
            series[slot].data.push(LinePoint {
                x: date.clone(),
                y,
            });
        }
    }

    series
}

// ── Bar charts ──────────────────────────────────────────────────────

/// Weekly stacked bars. Values of dates in the same week are summed.
pub fn weekly_bars(daily: &DailySeries, scheme: CategoryScheme) -> BarChart {
    bucketed_bars(daily, scheme, Bucket::Week, false)
}

/// Monthly stacked bars. Values of dates in the same month are summed.
pub fn monthly_bars(daily: &DailySeries, scheme: CategoryScheme) -> BarChart {
    bucketed_bars(daily, scheme, Bucket::Month, false)
}

/// Weekly bars of running totals: each bucket holds every category's
/// all-time total as of the last date in that week.
pub fn weekly_cumulative_bars(daily: &DailySeries, scheme: CategoryScheme) -> BarChart {
    bucketed_bars(daily, scheme, Bucket::Week, true)
}

fn bucketed_bars(
    daily: &DailySeries,
    scheme: CategoryScheme,
    bucket: Bucket,
    cumulative: bool,
) -> BarChart {
    let mut keys = scheme.fixed_keys();
    let mut rows: BTreeMap<u32, BarRow> = BTreeMap::new();
    let mut running: BTreeMap<String, f64> = BTreeMap::new();

    for (date_key, values) in daily {
        let date = match parse_date(date_key) {
            Ok(date) => date,
            Err(e) => {
                debug!(error = %e, "Skipping unparseable date key");
                continue;
            }
        };
        let resolved = scheme.resolve_all(values);

        if cumulative {
            // pre-launch dates still count toward the all-time totals
            for (category, value) in &resolved {
                *running.entry(category.name.clone()).or_insert(0.0) += value;
            }
        }

        // Pre-launch dates are dropped, not clamped into bucket 0.
        let Ok(index) = u32::try_from(bucket.index(date)) else {
            continue;
        };

        let row = rows.entry(index).or_insert_with(|| BarRow {
            bucket: index,
            label: bucket.label(index, date),
            values: BTreeMap::new(),
        });

        if cumulative {
            // every category seen so far keeps its total, even without a value today
            for (name, total) in &running {
                if !keys.contains(name) {
                    keys.push(name.clone());
                }
                row.values.insert(name.clone(), *total);
            }
            continue;
        }

        for (category, value) in resolved {
            if !keys.contains(&category.name) {
                keys.push(category.name.clone());
            }
            *row.values.entry(category.name).or_insert(0.0) += value;
        }
    }

    BarChart {
        keys,
        rows: rows.into_values().collect(),
    }
}

// ── Projections of nested value series ──────────────────────────────

/// The `"*"` (all assets) value of every chain: chain → symbol → value
/// becomes chain → value. Chains without a `"*"` entry count as zero.
pub fn all_assets(data: &DirectionalTransferData) -> CategoryValues {
    data.iter()
        .map(|(chain, symbols)| {
            (chain.clone(), symbols.get(ALL_KEY).copied().unwrap_or(0.0))
        })
        .collect()
}

/// `all_assets` applied to every date of a daily series.
pub fn daily_all_assets(daily: &BTreeMap<String, DirectionalTransferData>) -> DailySeries {
    daily
        .iter()
        .map(|(date, chains)| (date.clone(), all_assets(chains)))
        .collect()
}

/// Value leaving each source chain toward all destinations and all assets
/// (`dest["*"]["*"]`), per date.
pub fn daily_outbound(daily: &BTreeMap<String, BidirectionalTransferData>) -> DailySeries {
    daily
        .iter()
        .map(|(date, sources)| (date.clone(), outbound(sources)))
        .collect()
}

/// Value leaving each source chain toward all destinations and all assets.
pub fn outbound(sources: &BidirectionalTransferData) -> CategoryValues {
    sources
        .iter()
        .map(|(source, dests)| {
            let value = dests
                .get(ALL_KEY)
                .and_then(|symbols| symbols.get(ALL_KEY))
                .copied()
                .unwrap_or(0.0);
            (source.clone(), value)
        })
        .collect()
}

/// Notional value of the `"*"` (chain aggregate) asset per chain.
pub fn locked_notional(assets: &ChainsAssets) -> CategoryValues {
    assets
        .iter()
        .map(|(chain, tokens)| {
            let value = tokens.get(ALL_KEY).map(|a| a.notional).unwrap_or(0.0);
            (chain.clone(), value)
        })
        .collect()
}

/// `locked_notional` applied to every date of a daily series.
pub fn daily_locked_notional(daily: &BTreeMap<String, ChainsAssets>) -> DailySeries {
    daily
        .iter()
        .map(|(date, assets)| (date.clone(), locked_notional(assets)))
        .collect()
}

/// Keep only the latest date of every calendar month.
///
/// Locked value is a stock, not a flow: summing a month of daily snapshots
/// would multiply it, so monthly TVL bars are built from month-end values.
pub fn month_end_snapshots(daily: &DailySeries) -> DailySeries {
    bucket_end_snapshots(daily, Bucket::Month)
}

/// Keep only the latest date of every week. Weekly TVL bars are built from
/// these for the same reason as the monthly ones.
pub fn week_end_snapshots(daily: &DailySeries) -> DailySeries {
    bucket_end_snapshots(daily, Bucket::Week)
}

fn bucket_end_snapshots(daily: &DailySeries, bucket: Bucket) -> DailySeries {
    let mut latest: BTreeMap<i64, (&String, &CategoryValues)> = BTreeMap::new();
    for (date_key, values) in daily {
        let Ok(date) = parse_date(date_key) else {
            debug!(date = %date_key, "Skipping unparseable date key");
            continue;
        };
        // dates ascend, so later dates of the bucket replace earlier ones
        latest.insert(bucket.index(date), (date_key, values));
    }
    latest
        .into_values()
        .map(|(date, values)| (date.clone(), values.clone()))
        .collect()
}

/// Relabel the last row when it is the bucket `today` falls in, so the
/// axis shows that the bar covers only part of a week or month.
pub fn mark_partial_bucket(chart: &mut BarChart, bucket: Bucket, today: NaiveDate) {
    let Ok(current) = u32::try_from(bucket.index(today)) else {
        return;
    };
    if let Some(last) = chart.rows.last_mut() {
        if last.bucket == current {
            last.label = match bucket {
                Bucket::Week => partial_week_label(&last.label, days_into_week(today)),
                Bucket::Month => partial_month_label(&last.label, today),
            };
        }
    }
}
