use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use crate::upload::MediaKind;

/// One of the four keyword/number pattern families, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternFamily {
    /// "grand total", "amount due", ... followed by an amount with cents,
    /// in either `1,234.56` or `1.234,56` form.
    MultiWordKey,
    /// "total" / "amount" / "balance" followed by `1,234.56`.
    DotDecimal,
    /// "total" / "amount" / "balance" followed by `1.234,56`.
    CommaDecimal,
    /// Any of the single keywords (plus "pay") followed by any number.
    Fallback,
}

impl PatternFamily {
    pub const ALL: [PatternFamily; 4] = [
        PatternFamily::MultiWordKey,
        PatternFamily::DotDecimal,
        PatternFamily::CommaDecimal,
        PatternFamily::Fallback,
    ];

    /// 1-based position in the cascade.
    pub fn rank(self) -> u8 {
        match self {
            PatternFamily::MultiWordKey => 1,
            PatternFamily::DotDecimal => 2,
            PatternFamily::CommaDecimal => 3,
            PatternFamily::Fallback => 4,
        }
    }
}

impl fmt::Display for PatternFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternFamily::MultiWordKey => write!(f, "multi-word key"),
            PatternFamily::DotDecimal => write!(f, "dot decimal"),
            PatternFamily::CommaDecimal => write!(f, "comma decimal"),
            PatternFamily::Fallback => write!(f, "fallback"),
        }
    }
}

/// The keyword/number pair that produced a total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalMatch {
    pub family: PatternFamily,
    /// Keyword as it appeared in the text, e.g. `"Amount Due"`.
    pub keyword: String,
    /// Numeric substring before normalization, e.g. `"$1,234.56"`.
    pub raw: String,
    /// Byte range of `raw` within the scanned text.
    pub span: Range<usize>,
    pub amount: f64,
}

/// Outcome of running a receipt through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptScan {
    pub kind: MediaKind,
    /// Raw OCR output.
    pub text: String,
    /// Best-guess total, `None` when nothing parseable was found.
    pub amount: Option<f64>,
    pub matched: Option<TotalMatch>,
}
