//! Plain-text rendering of dashboard views.

use spendlens_client::SavingsAnalysis;
use spendlens_core::{CategorySummary, LedgerRow, ReviewItem, SavingsItem, TransactionRow};

pub fn print_summary(title: &str, summary: &[CategorySummary]) {
    println!("## {title}\n");
    if summary.is_empty() {
        println!("(no categories)\n");
        return;
    }
    for s in summary {
        println!(
            "- {} | count={} | total=${:.2} | out=${:.2} | in=${:.2}",
            s.category,
            s.transaction_count,
            s.total_amount,
            s.withdrawals.abs(),
            s.deposits
        );
    }
    println!();
}

pub fn print_rows(title: &str, rows: &[TransactionRow], limit: usize) {
    println!("## {title} ({})\n", rows.len());
    for r in rows.iter().take(limit) {
        println!("- {} | {} | {:.2} | {}", r.date, r.description, r.amount, r.category());
    }
    if rows.len() > limit {
        println!("... {} more", rows.len() - limit);
    }
    println!();
}

pub fn print_review_queue(queue: &[ReviewItem]) {
    if queue.is_empty() {
        return;
    }
    println!("## Needs review ({})\n", queue.len());
    for item in queue {
        println!(
            "- #{} | {} | {} | {:.2}",
            item.index, item.row.date, item.row.description, item.row.amount
        );
    }
    println!("\nFix with: spendlens upload --csv <file> --fix <index>=<category>\n");
}

pub fn print_savings(items: &[SavingsItem]) {
    println!("## Savings suggestions\n");
    if items.is_empty() {
        println!("(none)\n");
        return;
    }
    for it in items {
        println!("- [{}] {}\n  {}", it.source, it.title, it.link);
    }
    println!();
}

pub fn print_analysis(a: &SavingsAnalysis) {
    let spending = &a.spending_analysis;
    println!("# Savings analysis\n");
    println!(
        "Expenses: ${:.2} over {} transactions (avg ${:.2})",
        spending.total_expenses, spending.total_transactions, spending.avg_transaction
    );
    println!("Potential savings: ${:.2}\n", a.total_potential_savings);

    if !spending.merchant_analysis.is_empty() {
        println!("## Top merchants\n");
        for m in &spending.merchant_analysis {
            println!(
                "- {} | ${:.2} | {} visits",
                m.merchant, m.total_spent, m.transaction_count
            );
        }
        println!();
    }

    let opportunities = &a.savings_report.savings_opportunities;
    if !opportunities.is_empty() {
        println!("## Opportunities\n");
        for o in opportunities {
            println!("- {} | save ${:.2}", o.label(), o.potential_savings);
            for alt in &o.alternatives {
                println!("    {} (${:.2})", alt.alternative, alt.estimated_savings);
            }
        }
        println!();
    }

    for rec in &a.comprehensive_savings.recommendations {
        println!("* {rec}");
    }
}
