mod common;

use cashflow_minimizer::services::CashFlowService;
use cashflow_minimizer::AppError;
use common::{graph_from, settlement, six_party_graph};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_report_for_six_party_round() {
    let service = CashFlowService::new();

    let report = service.process(&six_party_graph()).expect("run failed");

    assert_eq!(report.settlements.len(), 4);
    assert_eq!(report.summary.participant_count, 6);
    assert_eq!(report.summary.creditors, 2);
    assert_eq!(report.summary.debtors, 3);
    assert_eq!(report.summary.settled_participants, 1);
    assert_eq!(report.summary.edge_count, 14);
    assert_eq!(report.summary.gross_volume, dec!(3300));
    assert_eq!(report.summary.net_volume, dec!(650));
    assert_eq!(report.summary.settled_volume, dec!(650));
    // (3300 - 650) / 3300 = 80.3%
    let reduction = report.summary.reduction_percentage();
    assert!(reduction > dec!(80) && reduction < dec!(81));
    assert_eq!(report.summary.transactions_saved(), 10);
}

#[test]
fn test_report_for_cancelling_debts() {
    let service = CashFlowService::new();

    let report = service
        .process(&graph_from(&[("A", "B", 50), ("B", "A", 50)]))
        .expect("run failed");

    assert!(report.settlements.is_empty());
    assert_eq!(report.summary.settled_participants, 2);
    assert_eq!(report.summary.net_volume, Decimal::ZERO);
    assert_eq!(report.summary.reduction_percentage(), dec!(100));
}

#[test]
fn test_each_run_gets_its_own_id() {
    let service = CashFlowService::new();
    let graph = graph_from(&[("X", "Y", 100)]);

    let first = service.process(&graph).expect("run failed");
    let second = service.process(&graph).expect("run failed");

    assert_ne!(first.run_id, second.run_id);
    assert_eq!(first.settlements, vec![settlement("X", "Y", 100)]);
    assert_eq!(first.settlements, second.settlements);
}

#[test]
fn test_failed_run_returns_no_partial_result() {
    let mut graph = graph_from(&[("A", "B", 10)]);
    graph.add_debt("C", "D", Decimal::ZERO);

    let service = CashFlowService::new();
    let result = service.process(&graph);

    assert!(matches!(result, Err(AppError::MalformedEdge { .. })));
    assert_eq!(service.get_metrics().runs_rejected, 1);
    assert_eq!(service.get_metrics().total_settlements_emitted, 0);
}

#[test]
fn test_service_shared_across_threads() {
    use std::sync::Arc;
    use std::thread;

    let service = Arc::new(CashFlowService::new());
    let mut handles = vec![];

    for _ in 0..4 {
        let service = service.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..25 {
                service.process(&six_party_graph()).expect("run failed");
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let metrics = service.get_metrics();
    assert_eq!(metrics.runs_processed, 100);
    assert_eq!(metrics.total_settlements_emitted, 400);
    assert_eq!(metrics.total_gross_volume, dec!(330000));
    assert!(metrics.average_reduction > dec!(80) && metrics.average_reduction < dec!(81));
}

#[test]
fn test_out_of_range_run_leaves_service_usable() {
    let mut huge = graph_from(&[]);
    huge
        .add_debt("A", "C", Decimal::MAX)
        .add_debt("B", "D", Decimal::MAX);

    let service = CashFlowService::new();
    let result = service.process(&huge);
    assert!(matches!(result, Err(AppError::AmountOutOfRange(_))));

    let report = service.process(&six_party_graph()).expect("run failed");
    assert_eq!(report.settlements.len(), 4);

    let metrics = service.get_metrics();
    assert_eq!(metrics.runs_rejected, 1);
    assert_eq!(metrics.runs_processed, 1);
    assert_eq!(metrics.total_gross_volume, dec!(3300));
}
