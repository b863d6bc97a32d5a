//! Output rendering: text, JSON, and CSV.

use colored::Colorize;
use serde::Serialize;
use tally_merge::MergeResult;
use tally_types::{Account, App, Balance, Book, Collection, Group, Transaction};

use crate::cli::OutputFormat;

pub fn render_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn csv_row(fields: &[&str]) -> String {
    fields.iter().map(|f| csv_field(f)).collect::<Vec<_>>().join(",")
}

pub fn print_books(books: &[Book], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => render_json(&books),
        OutputFormat::Csv => {
            println!("{}", csv_row(&["id", "name", "collection_id"]));
            for b in books {
                println!(
                    "{}",
                    csv_row(&[&b.id, &b.name, b.collection_id.as_deref().unwrap_or("")])
                );
            }
            Ok(())
        }
        OutputFormat::Text => {
            for b in books {
                println!("{}  {}", b.id.yellow(), b.name.bold());
            }
            Ok(())
        }
    }
}

pub fn print_accounts(accounts: &[Account], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => render_json(&accounts),
        OutputFormat::Csv => {
            println!("{}", csv_row(&["id", "name", "type", "balance"]));
            for a in accounts {
                let balance = a.balance.map(|b| b.to_string()).unwrap_or_default();
                println!(
                    "{}",
                    csv_row(&[&a.id, &a.name, &a.account_type.to_string(), &balance])
                );
            }
            Ok(())
        }
        OutputFormat::Text => {
            for a in accounts {
                let balance = a
                    .balance
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "-".into());
                println!(
                    "{}  {:<30} {:<10} {}",
                    a.id.yellow(),
                    a.name.bold(),
                    a.account_type.to_string().cyan(),
                    balance
                );
            }
            Ok(())
        }
    }
}

pub fn print_groups(groups: &[Group], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => render_json(&groups),
        OutputFormat::Csv => {
            println!("{}", csv_row(&["id", "name", "parent_id"]));
            for g in groups {
                println!(
                    "{}",
                    csv_row(&[&g.id, &g.name, g.parent_id.as_deref().unwrap_or("")])
                );
            }
            Ok(())
        }
        OutputFormat::Text => {
            for g in groups {
                println!("{}  {}", g.id.yellow(), g.name.bold());
            }
            Ok(())
        }
    }
}

pub fn print_transactions(txs: &[Transaction], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => render_json(&txs),
        OutputFormat::Csv => {
            println!("{}", csv_row(&["id", "date", "amount", "description", "posted", "trashed"]));
            for t in txs {
                println!(
                    "{}",
                    csv_row(&[
                        &t.id,
                        &t.date,
                        &t.amount.to_string(),
                        &t.description,
                        &t.posted.to_string(),
                        &t.trashed.to_string(),
                    ])
                );
            }
            Ok(())
        }
        OutputFormat::Text => {
            for t in txs {
                print_transaction_line(t);
            }
            Ok(())
        }
    }
}

pub fn print_transaction(tx: &Transaction, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => render_json(&tx),
        OutputFormat::Csv => print_transactions(std::slice::from_ref(tx), format),
        OutputFormat::Text => {
            print_transaction_line(tx);
            if let Some(credit) = &tx.credit_account {
                println!("  credit: {} ({})", credit.name, credit.id.dimmed());
            }
            if let Some(debit) = &tx.debit_account {
                println!("  debit:  {} ({})", debit.name, debit.id.dimmed());
            }
            for url in &tx.urls {
                println!("  url: {}", url.blue());
            }
            for (key, value) in &tx.properties {
                println!("  {key} = {value}");
            }
            Ok(())
        }
    }
}

fn print_transaction_line(t: &Transaction) {
    let flags = format!(
        "{}{}{}",
        if t.posted { "P" } else { "-" },
        if t.checked { "C" } else { "-" },
        if t.trashed { "T" } else { "-" },
    );
    println!(
        "{}  {}  {:>12}  {}  {}",
        t.id.yellow(),
        t.date,
        t.amount.to_string().bold(),
        flags.dimmed(),
        t.description
    );
}

pub fn print_balances(balances: &[Balance], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => render_json(&balances),
        OutputFormat::Csv => {
            println!("{}", csv_row(&["name", "total"]));
            for b in balances {
                println!("{}", csv_row(&[&b.name, &b.total.to_string()]));
            }
            Ok(())
        }
        OutputFormat::Text => {
            for b in balances {
                println!("{:<30} {:>14}", b.name.bold(), b.total.to_string());
            }
            Ok(())
        }
    }
}

pub fn print_collections(collections: &[Collection], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => render_json(&collections),
        OutputFormat::Csv => {
            println!("{}", csv_row(&["id", "name", "books"]));
            for c in collections {
                println!("{}", csv_row(&[&c.id, &c.name, &c.book_ids.len().to_string()]));
            }
            Ok(())
        }
        OutputFormat::Text => {
            for c in collections {
                println!("{}  {} ({} books)", c.id.yellow(), c.name.bold(), c.book_ids.len());
            }
            Ok(())
        }
    }
}

pub fn print_apps(apps: &[App], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => render_json(&apps),
        OutputFormat::Csv => {
            println!("{}", csv_row(&["id", "name", "version", "published"]));
            for a in apps {
                println!(
                    "{}",
                    csv_row(&[
                        &a.id,
                        &a.name,
                        a.version.as_deref().unwrap_or(""),
                        &a.published.to_string(),
                    ])
                );
            }
            Ok(())
        }
        OutputFormat::Text => {
            for a in apps {
                println!("{}  {}  {}", a.id.yellow(), a.name.bold(), a.version.as_deref().unwrap_or("").dimmed());
            }
            Ok(())
        }
    }
}

pub fn print_merge_result(result: &MergeResult, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => render_json(&serde_json::json!({
            "transaction": result.transaction,
            "reverted_id": result.reverted_id,
            "audit": result.audit,
        })),
        _ => {
            println!(
                "{} Merged {} into {}",
                "✓".green().bold(),
                result.reverted_id.yellow(),
                result.transaction.id.yellow()
            );
            print_transaction(&result.transaction, &OutputFormat::Text)
        }
    }
}
