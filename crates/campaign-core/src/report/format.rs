//! pt-BR presentation helpers shared by the report and the CLI views.

use chrono::{Datelike, NaiveDate};

const MONTHS_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Lowercase Portuguese month name for `month` in 1..=12.
pub fn month_name_pt(month: u32) -> &'static str {
    MONTHS_PT
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("?")
}

/// `1234.5` → `1.234,50`
pub fn number_pt(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let int = (cents / 100).to_string();
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped},{:02}", cents % 100)
}

/// `1234.5` → `R$ 1.234,50`
pub fn money_pt(value: f64) -> String {
    format!("R$ {}", number_pt(value))
}

/// `dd/mm/yyyy`
pub fn date_pt(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `17 de outubro de 2026`
pub fn long_date_pt(date: NaiveDate) -> String {
    format!(
        "{:02} de {} de {}",
        date.day(),
        month_name_pt(date.month()),
        date.year()
    )
}

/// Cut `text` to `max` characters, ending in "..." when it was longer.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_group_thousands() {
        assert_eq!(number_pt(0.0), "0,00");
        assert_eq!(number_pt(999.999), "1.000,00");
        assert_eq!(number_pt(1234567.8), "1.234.567,80");
        assert_eq!(number_pt(-1500.0), "-1.500,00");
        assert_eq!(money_pt(2000.0), "R$ 2.000,00");
    }

    #[test]
    fn dates() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(date_pt(d), "05/03/2024");
        assert_eq!(long_date_pt(d), "05 de março de 2024");
        assert_eq!(month_name_pt(13), "?");
    }

    #[test]
    fn truncate_keeps_short_titles() {
        assert_eq!(truncate("Black Friday", 25), "Black Friday");
        let long = "Campanha de Lançamento da Linha Verão";
        let cut = truncate(long, 25);
        assert_eq!(cut.chars().count(), 25);
        assert!(cut.ends_with("..."));
    }
}
