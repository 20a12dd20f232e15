use spendlens_core::{
    CategoryAggregate, FilterState, LedgerRow, extract_merchants, sort_by_date_desc,
    top_n_plus_other,
};
use spendlens_ingest::{combined_csv, parse_statement};

const STATEMENT: &str = "\
Date,Description,Amount,Category
2024-01-05,Coffee Shop,-4.50,Dining
2024-01-06,Payroll,2000.00,Income
2024-01-07,STARBUCKS #42,-6.25,Dining
2024-01-08,POS PURCHASE STARBUCKS,-5.10,
2024-01-09,Uber Trip,-18.40,Transportation
2024-01-10,ATM WITHDRAWAL,-60.00,Transfers
bad row
";

/// Two rows, two categories, exact totals.
#[test]
fn test_two_row_statement_aggregate() {
    let text = "2024-01-05,Coffee Shop,-4.50,Dining\n2024-01-06,Payroll,2000.00,Income\n";
    let rows = parse_statement(text.as_bytes()).unwrap();
    let mut agg = CategoryAggregate::new();
    agg.extend(&rows);

    let dining = agg.get("Dining").unwrap();
    assert_eq!(
        (dining.transaction_count, dining.total_amount, dining.withdrawals, dining.deposits),
        (1, -4.5, -4.5, 0.0)
    );
    let income = agg.get("Income").unwrap();
    assert_eq!(
        (income.transaction_count, income.total_amount, income.withdrawals, income.deposits),
        (1, 2000.0, 0.0, 2000.0)
    );
}

/// Statement -> aggregate -> chart list -> merchants -> filtered view.
#[test]
fn test_statement_pipeline() {
    let mut rows = parse_statement(STATEMENT.as_bytes()).unwrap();
    assert_eq!(rows.len(), 6);
    sort_by_date_desc(&mut rows);
    assert_eq!(rows[0].description, "ATM WITHDRAWAL");

    let mut agg = CategoryAggregate::new();
    agg.extend(&rows);
    assert_eq!(agg.get("Uncategorized").unwrap().transaction_count, 1);
    for s in agg.summaries() {
        assert!((s.total_amount - (s.withdrawals + s.deposits)).abs() < 1e-9);
    }

    let chart = top_n_plus_other(&agg.to_list(), 3);
    assert_eq!(chart.len(), 4);
    assert_eq!(chart[0].category, "Income");
    assert_eq!(chart[3].category, "Other");

    let merchants = extract_merchants(&rows, 3).unwrap();
    assert_eq!(merchants[0], "starbucks");
    assert!(!merchants.iter().any(|m| m == "atm" || m == "withdrawal"));

    let spending = FilterState::default().filter_rows(rows.clone());
    assert_eq!(spending.len(), 5);
    assert!(spending.iter().all(|r| r.is_spending()));
}

/// Regenerated CSV round-trips through the parser unchanged.
#[test]
fn test_combined_resubmission_preserves_rows() {
    let rows = parse_statement(STATEMENT.as_bytes()).unwrap();
    let again = parse_statement(combined_csv(&rows).unwrap().as_slice()).unwrap();
    assert_eq!(again.len(), rows.len());
    for (a, b) in rows.iter().zip(&again) {
        assert!(a.same_transaction(b));
        assert_eq!(a.category(), b.category());
    }
}
