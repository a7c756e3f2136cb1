// ═══════════════════════════════════════════════════════════════════
// Chart Tests — line series, bucketed bars, projections, chord matrix,
// circle packing
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use std::collections::BTreeMap;

use bridge_stats_core::models::category::CategoryScheme;
use bridge_stats_core::models::chain::FALLBACK_PALETTE;
use bridge_stats_core::models::stats::{
    BidirectionalTransferData, CategoryValues, ChainsAssets, DailySeries,
    DirectionalTransferData, LockedAsset,
};
use bridge_stats_core::services::bucket_service::Bucket;
use bridge_stats_core::services::chart_service::{
    all_assets, cumulative_line_series, daily_line_series, daily_locked_notional,
    daily_outbound, locked_notional, mark_partial_bucket, month_end_snapshots, monthly_bars,
    week_end_snapshots, weekly_bars, weekly_cumulative_bars,
};
use bridge_stats_core::services::flow_service::{
    chord_matrix, circle_packing_tree, string_to_colour,
};

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn values(pairs: &[(&str, f64)]) -> CategoryValues {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn daily(days: &[(&str, &[(&str, f64)])]) -> DailySeries {
    days.iter()
        .map(|(date, pairs)| (date.to_string(), values(pairs)))
        .collect()
}

fn symbols(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    values(pairs)
}

fn locked(notional: f64) -> LockedAsset {
    LockedAsset {
        notional,
        ..LockedAsset::default()
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Line series
// ═══════════════════════════════════════════════════════════════════

mod line_series {
    use super::*;

    #[test]
    fn cumulative_running_totals() {
        let data = daily(&[
            ("2021-09-13", &[("1", 5.0), ("2", 3.0)]),
            ("2021-09-14", &[("1", 2.0), ("2", 0.0)]),
        ]);
        let series = cumulative_line_series(&data, CategoryScheme::Chains);
        assert_eq!(series.len(), 2);

        let solana = &series[0];
        assert_eq!(solana.id, "Solana");
        let points: Vec<_> = solana.data.iter().map(|p| (p.x.as_str(), p.y)).collect();
        assert_eq!(points, vec![("2021-09-13", 5.0), ("2021-09-14", 7.0)]);

        let ethereum = &series[1];
        assert_eq!(ethereum.id, "Ethereum");
        let points: Vec<_> = ethereum.data.iter().map(|p| (p.x.as_str(), p.y)).collect();
        assert_eq!(points, vec![("2021-09-13", 3.0), ("2021-09-14", 3.0)]);
    }

    #[test]
    fn sentinel_keys_never_become_series() {
        let data = daily(&[(
            "2021-09-13",
            &[("*", 100.0), ("0", 1.0), ("56", 1.0), ("1", 5.0)],
        )]);
        let series = cumulative_line_series(&data, CategoryScheme::Chains);
        let ids: Vec<_> = series.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["Solana"]);
    }

    #[test]
    fn cumulative_is_monotonic() {
        let data = daily(&[
            ("2021-09-13", &[("1", 5.0)]),
            ("2021-09-14", &[("1", 0.0)]),
            ("2021-09-15", &[("1", 3.5)]),
            ("2021-09-16", &[("1", 1.0)]),
        ]);
        let series = cumulative_line_series(&data, CategoryScheme::Chains);
        let ys: Vec<f64> = series[0].data.iter().map(|p| p.y).collect();
        assert!(ys.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(ys.last().copied(), Some(9.5));
    }

    #[test]
    fn reshaping_is_idempotent() {
        let data = daily(&[
            ("2021-09-13", &[("1", 5.0), ("9", 3.0)]),
            ("2021-09-20", &[("8", 2.0)]),
        ]);
        assert_eq!(
            cumulative_line_series(&data, CategoryScheme::Chains),
            cumulative_line_series(&data, CategoryScheme::Chains)
        );
        assert_eq!(
            weekly_bars(&data, CategoryScheme::Chains),
            weekly_bars(&data, CategoryScheme::Chains)
        );
    }

    #[test]
    fn reserved_then_fallback_colors() {
        let data = daily(&[("2021-09-13", &[("1", 1.0), ("8", 1.0), ("9", 1.0)])]);
        let series = cumulative_line_series(&data, CategoryScheme::Chains);
        assert_eq!(series[0].color, "hsl(297, 100%, 61%)");
        assert_eq!(series[1].id, "Algorand");
        assert_eq!(series[1].color, FALLBACK_PALETTE[0]);
        assert_eq!(series[2].id, "Aurora");
        assert_eq!(series[2].color, FALLBACK_PALETTE[1]);
    }

    #[test]
    fn late_category_starts_at_its_first_date() {
        let data = daily(&[
            ("2021-09-13", &[("1", 1.0)]),
            ("2021-09-14", &[("1", 1.0), ("2", 4.0)]),
        ]);
        let series = cumulative_line_series(&data, CategoryScheme::Chains);
        assert_eq!(series[1].data.len(), 1);
        assert_eq!(series[1].data[0].x, "2021-09-14");
        assert_eq!(series[1].data[0].y, 4.0);
    }

    #[test]
    fn address_scheme_uses_addresses() {
        let data = daily(&[("2021-09-13", &[("*", 9.0), ("2:0xabc", 4.0), ("2:0xdef", 5.0)])]);
        let series = cumulative_line_series(&data, CategoryScheme::Addresses);
        let ids: Vec<_> = series.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["0xabc", "0xdef"]);
        assert_eq!(series[0].color, FALLBACK_PALETTE[0]);
    }

    #[test]
    fn raw_series_plots_values_unchanged() {
        let data = daily(&[
            ("2021-09-13", &[("1", 10.0)]),
            ("2021-09-14", &[("1", 8.0)]),
        ]);
        let series = daily_line_series(&data, CategoryScheme::Chains);
        let ys: Vec<f64> = series[0].data.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![10.0, 8.0]);
    }

    #[test]
    fn empty_input_empty_output() {
        assert!(cumulative_line_series(&DailySeries::new(), CategoryScheme::Chains).is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Bar charts
// ═══════════════════════════════════════════════════════════════════

mod bars {
    use super::*;

    #[test]
    fn weekly_buckets_sum_values() {
        let data = daily(&[
            ("2021-09-13", &[("1", 5.0), ("2", 1.0)]),
            ("2021-09-19", &[("1", 2.0)]),
            ("2021-09-20", &[("1", 1.0)]),
        ]);
        let chart = weekly_bars(&data, CategoryScheme::Chains);
        assert_eq!(chart.rows.len(), 2);
        assert_eq!(chart.rows[0].bucket, 0);
        assert_eq!(chart.rows[0].label, "0");
        assert_eq!(chart.rows[0].values["Solana"], 7.0);
        assert_eq!(chart.rows[0].values["Ethereum"], 1.0);
        assert_eq!(chart.rows[0].total(), 8.0);
        assert_eq!(chart.rows[1].bucket, 1);
        assert_eq!(chart.rows[1].values["Solana"], 1.0);
    }

    #[test]
    fn pre_launch_rows_are_absent() {
        let data = daily(&[
            ("2021-09-12", &[("1", 100.0)]),
            ("2021-09-13", &[("1", 5.0)]),
        ]);
        let chart = weekly_bars(&data, CategoryScheme::Chains);
        assert_eq!(chart.rows.len(), 1);
        assert_eq!(chart.rows[0].bucket, 0);
        assert_eq!(chart.rows[0].values["Solana"], 5.0);
    }

    #[test]
    fn sentinel_keys_never_become_bar_keys() {
        let data = daily(&[("2021-09-13", &[("*", 10.0), ("56", 2.0), ("1", 8.0)])]);
        let chart = weekly_bars(&data, CategoryScheme::Chains);
        assert!(!chart.keys.iter().any(|k| k == "*" || k == "56" || k == "0"));
        assert_eq!(chart.rows[0].values.len(), 1);
        assert_eq!(chart.rows[0].total(), 8.0);
    }

    #[test]
    fn chain_keys_are_fixed_and_address_keys_grow() {
        let chains = weekly_bars(&DailySeries::new(), CategoryScheme::Chains);
        assert_eq!(chains.keys.len(), 10);
        assert!(chains.rows.is_empty());

        let data = daily(&[("2021-09-13", &[("1:aaa", 1.0), ("1:bbb", 2.0)])]);
        let addresses = weekly_bars(&data, CategoryScheme::Addresses);
        assert_eq!(addresses.keys, vec!["aaa".to_string(), "bbb".to_string()]);
    }

    #[test]
    fn monthly_buckets_and_labels() {
        let data = daily(&[
            ("2021-09-30", &[("1", 1.0)]),
            ("2021-10-01", &[("1", 2.0)]),
            ("2021-10-31", &[("1", 3.0)]),
        ]);
        let chart = monthly_bars(&data, CategoryScheme::Chains);
        assert_eq!(chart.rows.len(), 2);
        assert_eq!(chart.rows[0].label, "9/21");
        assert_eq!(chart.rows[1].label, "10/21");
        assert_eq!(chart.rows[1].values["Solana"], 5.0);
    }

    #[test]
    fn weekly_cumulative_holds_running_totals() {
        let data = daily(&[
            ("2021-09-12", &[("1", 100.0)]),
            ("2021-09-13", &[("1", 5.0)]),
            ("2021-09-19", &[("1", 2.0)]),
            ("2021-09-20", &[("1", 1.0)]),
        ]);
        let chart = weekly_cumulative_bars(&data, CategoryScheme::Chains);
        assert_eq!(chart.rows.len(), 2);
        assert_eq!(chart.rows[0].values["Solana"], 107.0);
        assert_eq!(chart.rows[1].values["Solana"], 108.0);
    }

    #[test]
    fn weekly_cumulative_carries_absent_chains() {
        let data = daily(&[
            ("2021-09-13", &[("1", 100.0), ("2", 5.0)]),
            ("2021-09-20", &[("2", 1.0)]),
        ]);
        let chart = weekly_cumulative_bars(&data, CategoryScheme::Chains);
        assert_eq!(chart.rows.len(), 2);
        assert_eq!(chart.rows[1].values["Solana"], 100.0);
        assert_eq!(chart.rows[1].values["Ethereum"], 6.0);
        assert!(chart.rows[1].total() >= chart.rows[0].total());
    }

    #[test]
    fn unparseable_dates_are_skipped() {
        let data = daily(&[("not-a-date", &[("1", 5.0)]), ("2021-09-13", &[("1", 1.0)])]);
        let chart = weekly_bars(&data, CategoryScheme::Chains);
        assert_eq!(chart.rows.len(), 1);
        assert_eq!(chart.rows[0].values["Solana"], 1.0);
    }

    #[test]
    fn current_bucket_is_marked_partial() {
        let data = daily(&[("2021-09-13", &[("1", 1.0)]), ("2021-09-20", &[("1", 1.0)])]);
        let mut chart = weekly_bars(&data, CategoryScheme::Chains);
        mark_partial_bucket(&mut chart, Bucket::Week, d(2021, 9, 22));
        assert_eq!(chart.rows[0].label, "0");
        assert_eq!(chart.rows[1].label, "1 - 3 days");

        let mut monthly = monthly_bars(&data, CategoryScheme::Chains);
        mark_partial_bucket(&mut monthly, Bucket::Month, d(2021, 9, 22));
        assert_eq!(monthly.rows[0].label, "9/21 (22 days)");
    }

    #[test]
    fn completed_bucket_is_not_marked() {
        let data = daily(&[("2021-09-13", &[("1", 1.0)])]);
        let mut chart = weekly_bars(&data, CategoryScheme::Chains);
        mark_partial_bucket(&mut chart, Bucket::Week, d(2022, 1, 1));
        assert_eq!(chart.rows[0].label, "0");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Projections
// ═══════════════════════════════════════════════════════════════════

mod projections {
    use super::*;

    #[test]
    fn all_assets_picks_star_symbol() {
        let mut data = DirectionalTransferData::new();
        data.insert("1".into(), symbols(&[("*", 30.0), ("USDC", 30.0)]));
        data.insert("2".into(), symbols(&[("ETH", 5.0)]));
        let projected = all_assets(&data);
        assert_eq!(projected["1"], 30.0);
        assert_eq!(projected["2"], 0.0);
    }

    #[test]
    fn outbound_reads_all_destinations_all_assets() {
        let mut sources = BidirectionalTransferData::new();
        let mut dests = DirectionalTransferData::new();
        dests.insert("*".into(), symbols(&[("*", 75.0)]));
        dests.insert("2".into(), symbols(&[("*", 75.0)]));
        sources.insert("1".into(), dests);

        let mut by_date = BTreeMap::new();
        by_date.insert("2021-09-13".to_string(), sources);
        let series = daily_outbound(&by_date);
        assert_eq!(series["2021-09-13"]["1"], 75.0);
    }

    #[test]
    fn locked_notional_reads_chain_aggregate() {
        let mut assets = ChainsAssets::new();
        let mut tokens = BTreeMap::new();
        tokens.insert("*".to_string(), locked(500.0));
        tokens.insert("EPjF".to_string(), locked(400.0));
        assets.insert("1".into(), tokens);
        assets.insert("2".into(), BTreeMap::new());

        let projected = locked_notional(&assets);
        assert_eq!(projected["1"], 500.0);
        assert_eq!(projected["2"], 0.0);

        let mut by_date = BTreeMap::new();
        by_date.insert("2021-09-13".to_string(), assets);
        assert_eq!(daily_locked_notional(&by_date)["2021-09-13"]["1"], 500.0);
    }

    #[test]
    fn month_end_snapshots_keep_latest_day() {
        let data = daily(&[
            ("2021-09-29", &[("1", 10.0)]),
            ("2021-09-30", &[("1", 20.0)]),
            ("2021-10-15", &[("1", 30.0)]),
        ]);
        let snapshots = month_end_snapshots(&data);
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots["2021-09-30"]["1"], 20.0);
        assert_eq!(snapshots["2021-10-15"]["1"], 30.0);

        let chart = monthly_bars(&snapshots, CategoryScheme::Chains);
        assert_eq!(chart.rows[0].values["Solana"], 20.0);
    }

    #[test]
    fn week_end_snapshots_keep_latest_day() {
        let data = daily(&[
            ("2021-09-27", &[("1", 10.0)]),
            ("2021-10-03", &[("1", 20.0)]),
            ("2021-10-04", &[("1", 30.0)]),
            ("garbage", &[("1", 99.0)]),
        ]);
        let snapshots = week_end_snapshots(&data);
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots["2021-10-03"]["1"], 20.0);
        assert_eq!(snapshots["2021-10-04"]["1"], 30.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Chord matrix
// ═══════════════════════════════════════════════════════════════════

mod chord {
    use super::*;

    fn flows(entries: &[(&str, &str, f64)]) -> BidirectionalTransferData {
        let mut data = BidirectionalTransferData::new();
        for (source, dest, value) in entries {
            data.entry(source.to_string())
                .or_default()
                .insert(dest.to_string(), symbols(&[("*", *value)]));
        }
        data
    }

    #[test]
    fn square_matrix_of_known_chains() {
        let matrix = chord_matrix(&BidirectionalTransferData::new());
        assert_eq!(matrix.size(), 10);
        assert_eq!(matrix.keys.len(), 10);
        assert!(matrix.cells.iter().flatten().all(Option::is_none));
    }

    #[test]
    fn flow_lands_in_dest_row_source_column() {
        let matrix = chord_matrix(&flows(&[("1", "2", 50.0), ("2", "1", 20.0)]));
        assert_eq!(matrix.cells[1][0], Some(50.0));
        assert_eq!(matrix.flow(1, 2), Some(50.0));
        assert_eq!(matrix.flow(2, 1), Some(20.0));
        assert_eq!(matrix.flow(1, 3), None);
    }

    #[test]
    fn zero_sentinel_and_unknown_flows_are_absent() {
        let matrix = chord_matrix(&flows(&[
            ("1", "2", 0.0),
            ("1", "*", 80.0),
            ("*", "2", 80.0),
            ("56", "2", 1.0),
            ("11", "2", 1.0),
        ]));
        assert!(matrix.cells.iter().flatten().all(Option::is_none));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Circle packing
// ═══════════════════════════════════════════════════════════════════

mod circle_packing {
    use super::*;

    fn all_time() -> DirectionalTransferData {
        let mut data = DirectionalTransferData::new();
        data.insert("*".into(), symbols(&[("*", 1000.0), ("USDC", 600.0), ("ETH", 400.0)]));
        data.insert("2".into(), symbols(&[("*", 400.0), ("ETH", 400.0)]));
        data.insert("1".into(), symbols(&[("*", 600.0), ("USDC", 600.0)]));
        data.insert("8".into(), symbols(&[]));
        data.insert("0".into(), symbols(&[("*", 7.0), ("X", 7.0)]));
        data
    }

    #[test]
    fn root_holds_chains_in_id_order() {
        let root = circle_packing_tree(&all_time());
        assert_eq!(root.name, "Wormhole");
        let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Solana", "Ethereum", "Algorand"]);
    }

    #[test]
    fn aggregate_is_not_double_counted() {
        let root = circle_packing_tree(&all_time());
        assert_eq!(root.total(), 1000.0);
    }

    #[test]
    fn leaves_are_assets_without_star() {
        let root = circle_packing_tree(&all_time());
        let solana = &root.children[0];
        assert_eq!(solana.children.len(), 1);
        let leaf = &solana.children[0];
        assert_eq!(leaf.id, "USDC-1");
        assert_eq!(leaf.name, "USDC");
        assert_eq!(leaf.amount, Some(600.0));
        assert_eq!(leaf.color, string_to_colour("USDC"));
    }

    #[test]
    fn chain_colors() {
        let root = circle_packing_tree(&all_time());
        assert_eq!(root.children[0].color, "hsl(297, 100%, 61%)");
        assert_eq!(root.children[2].color, string_to_colour("Algorand"));
    }

    #[test]
    fn string_to_colour_is_stable() {
        assert_eq!(string_to_colour(""), "#000000");
        assert_eq!(string_to_colour("a"), "#610000");
        assert_eq!(string_to_colour("ab"), "#210c00");
        assert_eq!(string_to_colour("USDC"), string_to_colour("USDC"));
    }
}
