use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::types::{PatternFamily, TotalMatch};

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// Group 1 is the keyword, group 2 the amount. Families 1-3 skip lazily to the
// nearest amount without crossing a line break; family 4 skips anything but
// digits and separators. Word boundaries are ASCII-only so that a currency
// suffix like "руб" or an accented letter still ends a word.
re!(re_multi_word_key,
    r"(?i)(?-u:\b)(total\s*amount|grand\s*total|amount\s*due|net\s*payable|invoice\s*total)(?-u:\b).*?(-?[$€£₹¥]?\s*[0-9]{1,3}(?:[,.]?[0-9]{3})*(?:[.,][0-9]{2}))(?-u:\b)");
re!(re_dot_decimal,
    r"(?i)(?-u:\b)(total|amount|balance)(?-u:\b).*?(-?[$€£₹¥]?\s*[0-9]{1,3}(?:,?[0-9]{3})*\.[0-9]{2})(?-u:\b)");
re!(re_comma_decimal,
    r"(?i)(?-u:\b)(total|amount|balance)(?-u:\b).*?(-?[$€£₹¥]?\s*[0-9]{1,3}(?:\.?[0-9]{3})*,[0-9]{2})(?-u:\b)");
re!(re_fallback,
    r"(?i)(?-u:\b)(total|amount|balance|pay)(?-u:\b)[^.,0-9]*(-?[$€£₹¥]?\s*(?:[0-9]{1,3}(?:[,.\s]?[0-9]{3})*|[0-9]+)(?:[.,][0-9]{1,2})?)(?-u:\b)");

re!(re_numeric_prefix,
    r"^-?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)");

fn family_regex(family: PatternFamily) -> &'static Regex {
    match family {
        PatternFamily::MultiWordKey => re_multi_word_key(),
        PatternFamily::DotDecimal => re_dot_decimal(),
        PatternFamily::CommaDecimal => re_comma_decimal(),
        PatternFamily::Fallback => re_fallback(),
    }
}

// ── Public extraction API ─────────────────────────────────────────────────────

/// Best-guess "total due" on a receipt, or `None` if no candidate parses.
///
/// ```
/// assert_eq!(budgetly_ocr::extract_total("Subtotal 10.00\nTax 1.50\nTotal 11.50"), Some(11.5));
/// assert_eq!(budgetly_ocr::extract_total("Thank you!"), None);
/// ```
pub fn extract_total(text: &str) -> Option<f64> {
    find_total(text).map(|m| m.amount)
}

/// Like [`extract_total`], but also reports which keyword and pattern family
/// produced the amount.
///
/// Families are tried in priority order. Within a family only the last match
/// in the text is considered, since receipts print the final total below the
/// subtotal and tax lines. If that match does not parse, the next family is
/// tried.
pub fn find_total(text: &str) -> Option<TotalMatch> {
    for family in PatternFamily::ALL {
        let Some(caps) = family_regex(family).captures_iter(text).last() else {
            continue;
        };
        tracing::debug!(family = family.rank(), "found total candidate with {family} pattern");

        if let Some(m) = to_total_match(family, &caps) {
            return Some(m);
        }
        tracing::debug!(family = family.rank(), "candidate amount did not parse, trying next pattern");
    }
    None
}

fn to_total_match(family: PatternFamily, caps: &Captures<'_>) -> Option<TotalMatch> {
    let keyword = caps.get(1)?;
    let number = caps.get(2)?;
    let amount = clean_amount(number.as_str())?;
    Some(TotalMatch {
        family,
        keyword: keyword.as_str().to_string(),
        raw: number.as_str().to_string(),
        span: number.range(),
        amount,
    })
}

// ── Amount parsing ────────────────────────────────────────────────────────────

/// Normalize a raw amount such as `"$1,234.56"` or `"1.234,56"` and parse it.
///
/// When both `.` and `,` appear, whichever occurs last is the decimal
/// separator and the other is dropped as thousands grouping. A lone `,` is a
/// decimal separator. The longest numeric prefix is parsed, so `"1.234.5"`
/// reads as `1.234`; no numeric prefix at all yields `None`.
pub fn clean_amount(raw: &str) -> Option<f64> {
    let mut cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();

    match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => {
            cleaned = cleaned.replace('.', "").replace(',', ".");
        }
        (Some(_), Some(_)) => {
            cleaned = cleaned.replace(',', "");
        }
        (None, Some(_)) => {
            cleaned = cleaned.replace(',', ".");
        }
        _ => {}
    }

    let number = re_numeric_prefix().find(&cleaned)?;
    number.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Documented examples ───────────────────────────────────────────────────

    #[test]
    fn dollar_total() {
        assert_eq!(extract_total("Total: $12.50"), Some(12.5));
    }

    #[test]
    fn last_total_wins_over_subtotal() {
        assert_eq!(extract_total("Subtotal 10.00\nTax 1.50\nTotal 11.50"), Some(11.5));
    }

    #[test]
    fn unknown_keyword_is_not_found() {
        assert_eq!(extract_total("Gesamtbetrag 1.234,56"), None);
    }

    #[test]
    fn amount_due_with_thousands_comma() {
        assert_eq!(extract_total("Amount Due: 1,234.56"), Some(1234.56));
    }

    #[test]
    fn european_grouping() {
        assert_eq!(extract_total("Balance 1.234,56"), Some(1234.56));
    }

    #[test]
    fn negative_total_is_preserved() {
        assert_eq!(extract_total("Total: -50.00"), Some(-50.0));
    }

    #[test]
    fn repeated_calls_agree() {
        let text = "STORE\nSubtotal 45.00\nTax 3.60\nTotal 48.60\nVISA";
        assert_eq!(extract_total(text), extract_total(text));
        assert_eq!(extract_total(text), Some(48.6));
    }

    // ── No candidates ─────────────────────────────────────────────────────────

    #[test]
    fn no_digits_means_no_total() {
        assert_eq!(extract_total(""), None);
        assert_eq!(extract_total("TOTAL AMOUNT DUE"), None);
        assert_eq!(extract_total("Thank you for shopping!\nBalance: see back"), None);
    }

    #[test]
    fn numbers_without_keywords_are_ignored() {
        assert_eq!(extract_total("Milk 2.49\nBread 3.10\n5.59"), None);
    }

    #[test]
    fn no_panic_on_garbage_input() {
        let _ = extract_total("!@#$%^&*()\n\0\x01\x02 total €€€ -,.-,.");
    }

    // ── Family priority ───────────────────────────────────────────────────────

    #[test]
    fn multi_word_key_beats_later_single_keyword() {
        let text = "Subtotal: 10.00\nGrand Total: 12.50\nTotal tendered 20.00";
        let m = find_total(text).unwrap();
        assert_eq!(m.family, PatternFamily::MultiWordKey);
        assert_eq!(m.amount, 12.5);
    }

    #[test]
    fn last_match_within_family() {
        let text = "Total 10.00\nTotal 12.50";
        let m = find_total(text).unwrap();
        assert_eq!(m.family, PatternFamily::DotDecimal);
        assert_eq!(m.amount, 12.5);
        assert_eq!(text[m.span.clone()].trim(), "12.50");
        assert!(m.span.start > text.find('\n').unwrap());
    }

    #[test]
    fn comma_decimal_family_with_currency() {
        let m = find_total("Total € 45,90").unwrap();
        assert_eq!(m.family, PatternFamily::CommaDecimal);
        assert_eq!(m.raw, "€ 45,90");
        assert_eq!(m.amount, 45.9);
    }

    #[test]
    fn fallback_handles_bare_integers() {
        let m = find_total("TOTAL 5384").unwrap();
        assert_eq!(m.family, PatternFamily::Fallback);
        assert_eq!(m.amount, 5384.0);
    }

    #[test]
    fn fallback_recognizes_pay_keyword() {
        let m = find_total("Please pay 150 at the counter").unwrap();
        assert_eq!(m.keyword, "pay");
        assert_eq!(m.amount, 150.0);
    }

    #[test]
    fn multi_word_key_accepts_european_amount() {
        assert_eq!(extract_total("Invoice total: £1.234,50"), Some(1234.5));
    }

    #[test]
    fn multi_word_key_requires_cents() {
        let m = find_total("Amount Due 3 items 15.99").unwrap();
        assert_eq!(m.family, PatternFamily::MultiWordKey);
        assert_eq!(m.amount, 15.99);
    }

    #[test]
    fn integer_after_multi_word_key_defers_to_later_total() {
        let m = find_total("Grand total: 45\nTotal 40.00").unwrap();
        assert_eq!(m.family, PatternFamily::DotDecimal);
        assert_eq!(m.amount, 40.0);
    }

    #[test]
    fn single_decimal_digit_keeps_fraction() {
        let m = find_total("amount due 12,5").unwrap();
        assert_eq!(m.family, PatternFamily::Fallback);
        assert_eq!(m.amount, 12.5);
    }

    #[test]
    fn non_ascii_currency_suffix_ends_amount() {
        assert_eq!(extract_total("Total: 12.50руб"), Some(12.5));
        assert_eq!(extract_total("Total: 12,50грн"), Some(12.5));
        assert_eq!(extract_total("Total 12.50é"), Some(12.5));
    }

    #[test]
    fn accented_letter_after_keyword_still_matches() {
        let m = find_total("Totalé 12.50").unwrap();
        assert_eq!(m.keyword, "Total");
        assert_eq!(m.amount, 12.5);
    }

    #[test]
    fn keyword_match_is_case_insensitive_and_reported_verbatim() {
        let m = find_total("AMOUNT DUE: 1,234.56").unwrap();
        assert_eq!(m.keyword, "AMOUNT DUE");
        assert_eq!(m.raw.trim(), "1,234.56");
    }

    #[test]
    fn keywords_must_be_whole_words() {
        // "Subtotal" and "Totals" do not contain the word "total".
        assert_eq!(extract_total("Subtotal 10.00"), None);
        assert_eq!(extract_total("Totals 10.00"), None);
    }

    #[test]
    fn negative_balance_with_currency() {
        assert_eq!(extract_total("Balance due: -$20.00"), Some(-20.0));
    }

    #[test]
    fn amount_on_following_line_is_adjacent() {
        let m = find_total("TOTAL\n23.40").unwrap();
        assert_eq!(m.family, PatternFamily::DotDecimal);
        assert_eq!(m.amount, 23.4);
    }

    // ── clean_amount ──────────────────────────────────────────────────────────

    #[test]
    fn clean_amount_plain() {
        assert_eq!(clean_amount("49.99"), Some(49.99));
        assert_eq!(clean_amount("0.01"), Some(0.01));
        assert_eq!(clean_amount("5384"), Some(5384.0));
    }

    #[test]
    fn clean_amount_strips_currency_and_spaces() {
        assert_eq!(clean_amount("$ 12.50"), Some(12.5));
        assert_eq!(clean_amount("¥ 3 000"), Some(3000.0));
    }

    #[test]
    fn clean_amount_later_separator_is_decimal() {
        assert_eq!(clean_amount("1,234.56"), Some(1234.56));
        assert_eq!(clean_amount("1.234,56"), Some(1234.56));
        assert_eq!(clean_amount("1,234,567.89"), Some(1234567.89));
        assert_eq!(clean_amount("1.234.567,89"), Some(1234567.89));
    }

    #[test]
    fn clean_amount_lone_comma_is_decimal() {
        assert_eq!(clean_amount("45,90"), Some(45.9));
        assert_eq!(clean_amount("3,000"), Some(3.0));
    }

    #[test]
    fn clean_amount_reads_leading_number_only() {
        assert_eq!(clean_amount("1.234.5"), Some(1.234));
        assert_eq!(clean_amount("12-3"), Some(12.0));
    }

    #[test]
    fn clean_amount_keeps_leading_minus() {
        assert_eq!(clean_amount("-50.00"), Some(-50.0));
        assert_eq!(clean_amount("-$7,50"), Some(-7.5));
    }

    #[test]
    fn clean_amount_rejects_non_numbers() {
        assert_eq!(clean_amount(""), None);
        assert_eq!(clean_amount("-"), None);
        assert_eq!(clean_amount(".,"), None);
        assert_eq!(clean_amount("--5"), None);
        assert_eq!(clean_amount("abc"), None);
    }
}
