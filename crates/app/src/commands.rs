use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};

use anyhow::Context;
use budgetly_core::{Money, NewTransaction, TransactionDraft, TransactionType};
use budgetly_ocr::{
    find_total, percent, NoRasterizer, OcrBackend, ReceiptPipeline, ReceiptScan, ScanConfig,
    TotalMatch,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ExtractOutput {
    pub amount: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ScanOutput {
    #[serde(flatten)]
    pub scan: ReceiptScan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<NewTransaction>,
}

pub struct DraftArgs {
    pub title: String,
    pub category_id: Option<i64>,
    pub kind: TransactionType,
}

pub fn extract(file: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let matched = find_total(&text);
    if json {
        let output = ExtractOutput { amount: matched.as_ref().map(|m| m.amount) };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", describe_total(matched.as_ref()));
    }
    Ok(())
}

pub async fn scan(
    config: ScanConfig,
    file: &Path,
    show_text: bool,
    json: bool,
    draft: Option<DraftArgs>,
) -> anyhow::Result<()> {
    let pipeline = ReceiptPipeline::new(recognizer(&config), NoRasterizer, config);

    let last = AtomicU8::new(u8::MAX);
    let scan = pipeline
        .process_file(file, move |fraction| {
            let pct = percent(fraction);
            if last.swap(pct, Ordering::Relaxed) != pct {
                eprintln!("Recognizing text... {pct}%");
            }
        })
        .await
        .with_context(|| format!("Failed to process receipt {}", file.display()))?;

    let transaction = draft
        .map(|args| build_transaction(args, scan.amount))
        .transpose()?;

    if json {
        let output = ScanOutput { scan, transaction };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if show_text {
        println!("{}\n", scan.text.trim_end());
    }
    println!("{}", describe_total(scan.matched.as_ref()));
    if let Some(tx) = transaction {
        println!("Transaction: {} {} ({}, category {})", tx.title, tx.amount, tx.kind, tx.category_id);
    }
    Ok(())
}

fn build_transaction(args: DraftArgs, amount: Option<f64>) -> anyhow::Result<NewTransaction> {
    let mut draft = TransactionDraft::new(args.title);
    draft.category_id = args.category_id;
    draft.kind = args.kind;
    if !draft.apply_receipt_amount(amount) {
        tracing::warn!("Receipt total unusable, transaction amount left empty");
    }
    Ok(draft.validate()?)
}

fn describe_total(matched: Option<&TotalMatch>) -> String {
    let Some(m) = matched else {
        return "No total found".to_string();
    };
    // Amounts beyond the decimal range are printed as parsed.
    match Money::from_f64(m.amount) {
        Some(money) => format!("Amount: {money} (from \"{}\")", m.keyword),
        None => format!("Amount: {} (from \"{}\")", m.amount, m.keyword),
    }
}

#[cfg(feature = "tesseract")]
fn recognizer(config: &ScanConfig) -> impl OcrBackend {
    budgetly_ocr::recognizer::tesseract_backend::TesseractRecognizer::new(
        config.tessdata_path.clone(),
        &config.language,
    )
}

#[cfg(not(feature = "tesseract"))]
fn recognizer(_config: &ScanConfig) -> impl OcrBackend {
    budgetly_ocr::UnavailableRecognizer
}
