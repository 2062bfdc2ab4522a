use crate::error::Result;
use crate::models::{DebtGraph, NetBalances, Settlement, SettlementReport, SettlementSummary};
use crate::observability::{get_metrics, loggable_amount, LatencyTimer};
use crate::services::{BalanceAggregator, SettlementMatcher};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tracing::{info, warn};

/// Cumulative figures across every run handled by one service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CashFlowMetrics {
    pub runs_processed: u64,
    pub runs_rejected: u64,
    pub total_edges_processed: u64,
    pub total_settlements_emitted: u64,
    pub total_gross_volume: Decimal,
    pub total_net_volume: Decimal,
    pub average_reduction: Decimal,
}

/// Runs aggregation and matching as one step and reports on the outcome.
pub struct CashFlowService {
    aggregator: BalanceAggregator,
    matcher: SettlementMatcher,
    mask_amounts: bool,
    metrics: RwLock<CashFlowMetrics>,
}

impl Default for CashFlowService {
    fn default() -> Self {
        Self::new()
    }
}

impl CashFlowService {
    pub fn new() -> Self {
        Self {
            aggregator: BalanceAggregator::new(),
            matcher: SettlementMatcher::new(),
            mask_amounts: false,
            metrics: RwLock::new(CashFlowMetrics::default()),
        }
    }

    /// Masks amounts in the run summary log line.
    pub fn with_masked_amounts(mut self, mask_amounts: bool) -> Self {
        self.mask_amounts = mask_amounts;
        self
    }

    pub fn aggregate(&self, graph: &DebtGraph) -> Result<NetBalances> {
        self.aggregator.aggregate(graph)
    }

    pub fn settle(&self, balances: &NetBalances) -> Result<Vec<Settlement>> {
        self.matcher.settle(balances)
    }

    /// Aggregates the graph, settles the balances and builds a report.
    ///
    /// On error nothing is returned but the error; no partial settlements.
    pub fn process(&self, graph: &DebtGraph) -> Result<SettlementReport> {
        let timer = LatencyTimer::new();

        let outcome = self.aggregate(graph).and_then(|balances| {
            let settlements = self.settle(&balances)?;
            SettlementReport::new(graph, balances, settlements)
        });

        let report = match outcome {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, edges = graph.edge_count(), "Settlement run rejected");
                get_metrics().record_run_rejected(e.kind());
                self.record_rejection();
                return Err(e);
            }
        };

        self.record_run(&report.summary, timer.elapsed_ms());

        info!(
            run_id = %report.run_id,
            participants = report.summary.participant_count,
            edges = report.summary.edge_count,
            settlements = report.summary.settlement_count,
            gross = %loggable_amount(&report.summary.gross_volume, self.mask_amounts),
            net = %loggable_amount(&report.summary.net_volume, self.mask_amounts),
            "Settlement run completed"
        );

        Ok(report)
    }

    fn record_run(&self, summary: &SettlementSummary, duration_ms: f64) {
        let global = get_metrics();
        global.record_edges_processed(summary.edge_count as u64);
        global.record_run_completed(
            summary.participant_count as u64,
            summary.settlement_count as u64,
        );
        global.record_reduction_ratio(
            summary.gross_volume.to_f64().unwrap_or_default(),
            summary.net_volume.to_f64().unwrap_or_default(),
        );
        global.record_run_latency(duration_ms);

        if let Ok(mut metrics) = self.metrics.write() {
            metrics.runs_processed += 1;
            metrics.total_edges_processed += summary.edge_count as u64;
            metrics.total_settlements_emitted += summary.settlement_count as u64;

            let gross = metrics.total_gross_volume.checked_add(summary.gross_volume);
            let net = metrics.total_net_volume.checked_add(summary.net_volume);
            match (gross, net) {
                (Some(gross), Some(net)) => {
                    metrics.total_gross_volume = gross;
                    metrics.total_net_volume = net;
                }
                _ => {
                    warn!("Cumulative volume would overflow, keeping previous totals");
                    return;
                }
            }

            if metrics.total_gross_volume > Decimal::ZERO {
                if let Some(average) = metrics
                    .total_gross_volume
                    .checked_sub(metrics.total_net_volume)
                    .and_then(|reduction| reduction.checked_div(metrics.total_gross_volume))
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                {
                    metrics.average_reduction = average;
                }
            }
        }
    }

    fn record_rejection(&self) {
        if let Ok(mut metrics) = self.metrics.write() {
            metrics.runs_rejected += 1;
        }
    }

    /// Gets the cumulative run metrics.
    pub fn get_metrics(&self) -> CashFlowMetrics {
        self.metrics.read().map(|m| m.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::amount::MAX_MANTISSA;
    use rust_decimal_macros::dec;

    fn demo_graph() -> DebtGraph {
        let mut graph = DebtGraph::new();
        graph
            .add_debt("A", "B", dec!(50))
            .add_debt("A", "C", dec!(100))
            .add_debt("B", "A", dec!(10))
            .add_debt("B", "C", dec!(20))
            .add_participant("C");
        graph
    }

    #[test]
    fn test_process_builds_report() {
        let service = CashFlowService::new();
        let report = service.process(&demo_graph()).unwrap();

        assert_eq!(report.balances.get("A"), Some(dec!(-140)));
        assert_eq!(report.balances.get("B"), Some(dec!(20)));
        assert_eq!(report.balances.get("C"), Some(dec!(120)));
        assert_eq!(report.settlements.len(), 2);
        assert_eq!(report.summary.settled_volume, dec!(140));
        assert_eq!(report.summary.gross_volume, dec!(180));
    }

    #[test]
    fn test_metrics_accumulate_across_runs() {
        let service = CashFlowService::new().with_masked_amounts(true);
        service.process(&demo_graph()).unwrap();
        service.process(&demo_graph()).unwrap();

        let metrics = service.get_metrics();
        assert_eq!(metrics.runs_processed, 2);
        assert_eq!(metrics.runs_rejected, 0);
        assert_eq!(metrics.total_edges_processed, 8);
        assert_eq!(metrics.total_settlements_emitted, 4);
        assert_eq!(metrics.total_gross_volume, dec!(360));
        assert_eq!(metrics.total_net_volume, dec!(280));
    }

    #[test]
    fn test_rejected_run_is_counted() {
        let mut graph = DebtGraph::new();
        graph.add_debt("A", "B", dec!(-3));

        let service = CashFlowService::new();
        let err = service.process(&graph).unwrap_err();

        assert!(matches!(err, AppError::MalformedEdge { .. }));
        let metrics = service.get_metrics();
        assert_eq!(metrics.runs_processed, 0);
        assert_eq!(metrics.runs_rejected, 1);
    }

    #[test]
    fn test_out_of_range_run_is_rejected_and_metrics_survive() {
        let mut huge = DebtGraph::new();
        huge.add_debt("A", "C", Decimal::MAX).add_debt("B", "D", Decimal::MAX);

        let service = CashFlowService::new();
        let err = service.process(&huge).unwrap_err();
        assert!(matches!(err, AppError::AmountOutOfRange(_)));

        service.process(&demo_graph()).unwrap();

        let metrics = service.get_metrics();
        assert_eq!(metrics.runs_rejected, 1);
        assert_eq!(metrics.runs_processed, 1);
        assert_eq!(metrics.total_gross_volume, dec!(180));
    }

    #[test]
    fn test_cumulative_volume_overflow_keeps_previous_totals() {
        let quarter = Decimal::from_i128_with_scale(MAX_MANTISSA / 4, 0);
        let mut graph = DebtGraph::new();
        graph.add_debt("A", "B", quarter);

        let service = CashFlowService::new();
        for _ in 0..6 {
            service.process(&graph).unwrap();
        }

        // The fifth and sixth runs would push the totals past the decimal range.
        let metrics = service.get_metrics();
        assert_eq!(metrics.runs_processed, 6);
        assert_eq!(metrics.total_gross_volume, quarter * dec!(4));
        assert_eq!(metrics.total_net_volume, quarter * dec!(4));
        assert_eq!(metrics.average_reduction, Decimal::ZERO);
    }

    #[test]
    fn test_metrics_default() {
        let metrics = CashFlowMetrics::default();
        assert_eq!(metrics.runs_processed, 0);
        assert_eq!(metrics.average_reduction, Decimal::ZERO);
    }
}
