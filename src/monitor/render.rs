use crate::i18n::strings;
use crate::model::Language;
use crate::monitor::metrics::{format_elapsed, round2, soft_liquidation_indicator, DerivedMetric};

/// " (+0.32 / 5h)" when a snapshot delta is known, empty otherwise
fn health_change_suffix(metric: &DerivedMetric) -> String {
    match (metric.health_delta, metric.elapsed) {
        (Some(delta), Some(elapsed)) => format!(" ({:+.2} / {})", delta, format_elapsed(elapsed)),
        _ => String::new(),
    }
}

/// Keeps a trailing `.0` on whole numbers: `5.0`, `2500.0`, `4.3`
fn display_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn metric_lines(language: Language, metric: &DerivedMetric) -> String {
    let s = strings(language);
    format!(
        "{}: {} {}\n\
         {}: {} {}%{}\n\
         {}: {} crvUSD\n\
         {}: {}\n\
         {}: {}%\n",
        s.soft_liquidation,
        soft_liquidation_indicator(metric.soft_liquidation),
        metric.soft_liquidation,
        s.health,
        metric.risk_tier.indicator(),
        display_float(round2(metric.health)),
        health_change_suffix(metric),
        s.debt,
        display_float(round2(metric.debt)),
        s.oracle_price,
        display_float(round2(metric.oracle_price)),
        s.borrow_apy,
        metric.borrow_apy,
    )
}

/// Text pushed to the user when a position crosses their threshold
pub fn alert_message(language: Language, market_name: &str, threshold: f64, metric: &DerivedMetric) -> String {
    let headline = strings(language)
        .health_alert
        .replace("{market_name}", market_name)
        .replace("{threshold}", &display_float(threshold));

    format!("\u{26A0}\u{FE0F} {}\n\n{}", headline, metric_lines(language, metric))
}

/// One block of the `/pos` report
pub fn position_block(language: Language, chain: &str, market_name: &str, metric: &DerivedMetric) -> String {
    let s = strings(language);
    format!(
        "{}: {}\n{}: {}\n{}\n",
        s.network,
        chain,
        s.position,
        market_name,
        metric_lines(language, metric)
    )
}
