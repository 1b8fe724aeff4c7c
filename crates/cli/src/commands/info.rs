//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use work_source::{InputDocument, WorkItem};

use super::load_document;
use crate::cli::InfoArgs;

#[derive(Serialize)]
struct DocumentInfo {
    name: Option<String>,
    url: Option<String>,
    page: Option<i64>,
    is_non_profit: Option<bool>,
    address: Option<String>,
    nodes: Vec<WorkItem>,
}

impl From<InputDocument> for DocumentInfo {
    fn from(document: InputDocument) -> Self {
        let address = document.address.as_ref().map(|a| {
            [&a.street, &a.city, &a.country]
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        });

        Self {
            name: document.name.clone(),
            url: document.url.clone(),
            page: document.page,
            is_non_profit: document.is_non_profit,
            address,
            nodes: document.into_batch().into_items(),
        }
    }
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let info = DocumentInfo::from(load_document(args.document.as_deref())?);

    if args.json {
        let json = serde_json::to_string_pretty(&info).context("Failed to serialize info")?;
        println!("{}", json);
    } else {
        print_info(&info);
    }

    Ok(())
}

fn print_info(info: &DocumentInfo) {
    println!("\n=== Document ===\n");
    println!("  Name: {}", info.name.as_deref().unwrap_or("-"));
    println!("  URL: {}", info.url.as_deref().unwrap_or("-"));
    if let Some(page) = info.page {
        println!("  Page: {}", page);
    }
    if let Some(non_profit) = info.is_non_profit {
        println!("  Non-profit: {}", non_profit);
    }
    if let Some(ref address) = info.address {
        println!("  Address: {}", address);
    }

    println!("\nNodes ({}):", info.nodes.len());
    for node in &info.nodes {
        println!("  - {} -> {}", node.label(), node.target());
    }
    println!();
}
