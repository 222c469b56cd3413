//! Server-side HTML rendering of the form and prediction results

use crate::config::InputRange;
use crate::models::ChurnPredictor;
use crate::types::customer::CustomerRecord;
use crate::types::prediction::PredictionResult;
use std::f64::consts::PI;
use std::fmt::Write;

const APP_TITLE: &str = "Customer Churn Prediction";
const PRIMARY_COLOR: &str = "#1f77b4";
const SUCCESS_COLOR: &str = "#2ecc71";
const WARNING_COLOR: &str = "#f39c12";
const DANGER_COLOR: &str = "#e74c3c";

const STYLE: &str = r#"
body { font-family: Arial, sans-serif; margin: 0; background: #fafafa; color: #222; }
.layout { display: flex; min-height: 100vh; }
.sidebar { width: 320px; padding: 1.5rem; background: #f0f2f6; }
.sidebar label { display: block; margin-top: 0.9rem; font-weight: bold; }
.sidebar input, .sidebar select { width: 100%; padding: 0.3rem; box-sizing: border-box; }
.sidebar .radio label { display: inline; font-weight: normal; margin-right: 1rem; }
.sidebar button { width: 100%; margin-top: 1.5rem; padding: 0.6rem; border: 0; border-radius: 5px;
  background: #1f77b4; color: white; font-weight: bold; cursor: pointer; }
.sidebar button:hover { background: #1565c0; }
.main { flex: 1; padding: 2rem; display: flex; gap: 2rem; }
.results { flex: 2; }
.summary { flex: 1; }
.main-header { font-size: 2.4rem; color: #1f77b4; text-align: center; }
.sub-header { color: #666; text-align: center; }
.prediction-result { padding: 2rem; border-radius: 10px; text-align: center; margin-top: 1rem; }
.churn-high { background: #ffebee; border: 2px solid #e74c3c; }
.churn-low { background: #e8f5e9; border: 2px solid #2ecc71; }
.error { background: #ffebee; border-left: 5px solid #e74c3c; padding: 1rem; }
.bar { background: #eee; border-radius: 5px; height: 2.2rem; overflow: hidden; }
.bar div { height: 100%; color: white; font-weight: bold; line-height: 2.2rem; padding-left: 0.5rem; }
.metric { margin: 0.6rem 0; }
.metric span { display: block; color: #666; font-size: 0.85rem; }
footer { text-align: center; color: #666; padding: 2rem; }
"#;

/// What to show in the result panel
pub enum Outcome<'a> {
    /// Form only
    Empty,
    /// A successful prediction
    Prediction(&'a PredictionResult),
    /// A failed prediction
    Error(&'a str),
}

/// Render the full page
pub fn page(predictor: &ChurnPredictor, record: &CustomerRecord, outcome: Outcome<'_>) -> String {
    let mut html = String::with_capacity(16 * 1024);

    let _ = write!(
        html,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{title}</title><style>{style}</style></head><body><div class=\"layout\">",
        title = APP_TITLE,
        style = STYLE
    );

    sidebar(&mut html, predictor, record);

    let _ = write!(
        html,
        "<div><h1 class=\"main-header\">{title}</h1>\
         <p class=\"sub-header\">Predict customer churn from account and profile attributes</p>\
         <div class=\"main\"><section class=\"results\"><h2>Prediction Results</h2>",
        title = APP_TITLE
    );

    match outcome {
        Outcome::Empty => html.push_str("<p>Fill in the customer information and press <b>Predict Churn</b>.</p>"),
        Outcome::Prediction(result) => prediction(&mut html, result),
        Outcome::Error(message) => {
            let _ = write!(
                html,
                "<div class=\"error\"><b>An error occurred during prediction:</b> {}</div>",
                escape(message)
            );
        }
    }

    html.push_str("</section>");
    summary(&mut html, record);
    let _ = write!(
        html,
        "</div><footer>Customer Churn Prediction Service v{}</footer></div></div></body></html>",
        env!("CARGO_PKG_VERSION")
    );

    html
}

fn sidebar(html: &mut String, predictor: &ChurnPredictor, record: &CustomerRecord) {
    let assembler = predictor.assembler();
    let ranges = predictor.input_ranges();

    html.push_str("<form class=\"sidebar\" method=\"post\" action=\"/predict\"><h2>Customer Information</h2>");

    select(html, "geography", "Geography", assembler.geography_categories(), &record.geography);
    select(html, "gender", "Gender", assembler.gender_classes(), &record.gender);
    number(html, "age", "Age", &ranges.age, record.age as f64, 1.0);
    number(html, "credit_score", "Credit Score", &ranges.credit_score, record.credit_score as f64, 1.0);
    number(html, "balance", "Balance", &ranges.balance, record.balance, 1000.0);
    number(
        html,
        "estimated_salary",
        "Estimated Salary",
        &ranges.estimated_salary,
        record.estimated_salary,
        1000.0,
    );
    number(html, "tenure", "Tenure (Years)", &ranges.tenure, record.tenure as f64, 1.0);
    number(
        html,
        "num_of_products",
        "Number of Products",
        &ranges.num_of_products,
        record.num_of_products as f64,
        1.0,
    );
    toggle(html, "has_cr_card", "Has Credit Card?", record.has_cr_card);
    toggle(html, "is_active_member", "Is Active Member?", record.is_active_member);

    html.push_str("<button type=\"submit\">Predict Churn</button></form>");
}

fn select(html: &mut String, name: &str, label: &str, options: &[String], selected: &str) {
    let _ = write!(html, "<label for=\"{name}\">{label}</label><select id=\"{name}\" name=\"{name}\">");
    for option in options {
        let option = escape(option);
        let marker = if option == escape(selected) { " selected" } else { "" };
        let _ = write!(html, "<option value=\"{option}\"{marker}>{option}</option>");
    }
    html.push_str("</select>");
}

fn number(html: &mut String, name: &str, label: &str, range: &InputRange, value: f64, step: f64) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label>\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{value}\" required>",
        min = range.min,
        max = range.max,
    );
}

fn toggle(html: &mut String, name: &str, label: &str, value: bool) {
    let (yes, no) = if value { (" checked", "") } else { ("", " checked") };
    let _ = write!(
        html,
        "<label>{label}</label><div class=\"radio\">\
         <label><input type=\"radio\" name=\"{name}\" value=\"Yes\"{yes}> Yes</label>\
         <label><input type=\"radio\" name=\"{name}\" value=\"No\"{no}> No</label></div>"
    );
}

fn prediction(html: &mut String, result: &PredictionResult) {
    let (class, color, icon) = if result.will_churn {
        ("churn-high", DANGER_COLOR, "&#9888;")
    } else {
        ("churn-low", SUCCESS_COLOR, "&#10004;")
    };

    html.push_str("<h3>Churn Probability</h3>");
    html.push_str(&gauge_svg(result.probability, result.threshold));
    let _ = write!(
        html,
        "<div class=\"bar\"><div style=\"width: {width:.2}%; background: {color};\">{pct:.2}%</div></div>",
        width = result.percentage().max(0.5),
        pct = result.percentage(),
    );

    let _ = write!(
        html,
        "<div class=\"prediction-result {class}\">\
         <h2 style=\"color: {color};\">{icon} {headline}</h2>\
         <h3 style=\"color: {color}; font-size: 2.5rem; margin: 0;\">{pct:.2}%</h3>\
         <p>Risk level: <b>{level}</b></p></div>",
        headline = escape(&result.recommendation.headline),
        pct = result.percentage(),
        level = result.risk_level.as_str(),
    );

    let (title, border) = if result.will_churn {
        ("Action Required", WARNING_COLOR)
    } else {
        ("Customer Status", SUCCESS_COLOR)
    };
    let _ = write!(
        html,
        "<h3>Recommendations</h3><div style=\"border-left: 5px solid {border}; padding: 0.5rem 1rem;\"><b>{title}:</b><ul>"
    );
    for action in &result.recommendation.actions {
        let _ = write!(html, "<li>{}</li>", escape(action));
    }
    html.push_str("</ul></div>");
}

/// Semicircular gauge from 0 to 100 % with a threshold marker
pub fn gauge_svg(probability: f64, threshold: f64) -> String {
    const CX: f64 = 150.0;
    const CY: f64 = 150.0;
    const R: f64 = 110.0;

    let point = |fraction: f64| {
        let angle = PI * (1.0 - fraction.clamp(0.0, 1.0));
        (CX + R * angle.cos(), CY - R * angle.sin())
    };

    let (sx, sy) = point(0.0);
    let (ex, ey) = point(1.0);
    let (vx, vy) = point(probability);
    let (tx, ty) = point(threshold);
    let (tix, tiy) = (CX + (tx - CX) * 0.8, CY + (ty - CY) * 0.8);
    let color = if probability >= threshold { DANGER_COLOR } else { PRIMARY_COLOR };

    format!(
        "<svg class=\"gauge\" viewBox=\"0 0 300 180\" width=\"300\" height=\"180\" role=\"img\" \
         aria-label=\"Churn probability {pct:.2}%\">\
         <path d=\"M {sx:.2} {sy:.2} A {R} {R} 0 0 1 {ex:.2} {ey:.2}\" fill=\"none\" stroke=\"#d3d3d3\" stroke-width=\"24\"/>\
         <path d=\"M {sx:.2} {sy:.2} A {R} {R} 0 0 1 {vx:.2} {vy:.2}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"24\"/>\
         <line x1=\"{tix:.2}\" y1=\"{tiy:.2}\" x2=\"{tx:.2}\" y2=\"{ty:.2}\" stroke=\"red\" stroke-width=\"4\"/>\
         <text x=\"{CX}\" y=\"{text_y}\" text-anchor=\"middle\" font-size=\"32\" fill=\"darkblue\">{pct:.2}%</text>\
         </svg>",
        pct = probability * 100.0,
        text_y = CY - 10.0,
    )
}

fn summary(html: &mut String, record: &CustomerRecord) {
    html.push_str("<section class=\"summary\"><h2>Customer Summary</h2>");

    let metrics = [
        ("Age", format!("{} years", record.age)),
        ("Credit Score", record.credit_score.to_string()),
        ("Balance", format_currency(record.balance)),
        ("Salary", format_currency(record.estimated_salary)),
        ("Tenure", format!("{} years", record.tenure)),
        ("Products", record.num_of_products.to_string()),
    ];
    for (label, value) in metrics {
        let _ = write!(html, "<div class=\"metric\"><span>{label}</span>{}</div>", escape(&value));
    }

    html.push_str("<hr>");
    let details = [
        ("Geography", record.geography.as_str()),
        ("Gender", record.gender.as_str()),
        ("Credit Card", yes_no(record.has_cr_card)),
        ("Active Member", yes_no(record.is_active_member)),
    ];
    for (label, value) in details {
        let _ = write!(html, "<p>{label}: {}</p>", escape(value));
    }
    html.push_str("</section>");
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// `$1,234.50` style formatting
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac:02}")
}

/// Minimal HTML escaping for text and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{reference_predictor, sample_record};
    use crate::types::prediction::RiskLevelThresholds;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(60000.0), "$60,000.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(999.5), "$999.50");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_form_lists_fitted_vocabularies() {
        let predictor = reference_predictor();
        let html = page(&predictor, &sample_record(), Outcome::Empty);

        assert!(html.contains("<option value=\"France\" selected>France</option>"));
        assert!(html.contains("<option value=\"Germany\">Germany</option>"));
        assert!(html.contains("<option value=\"Male\">Male</option>"));
        assert!(html.contains("name=\"credit_score\" min=\"300\" max=\"850\""));
    }

    #[test]
    fn test_result_panel() {
        let predictor = reference_predictor();
        let result = PredictionResult::from_probability(0.8123, 0.5, &RiskLevelThresholds::default());
        let html = page(&predictor, &sample_record(), Outcome::Prediction(&result));

        assert!(html.contains("HIGH RISK - Customer is likely to churn"));
        assert!(html.contains("81.23%"));
        assert!(html.contains("Consider offering retention incentives"));
        assert!(html.contains("$60,000.00"));
        assert!(html.contains("<svg class=\"gauge\""));
    }

    #[test]
    fn test_error_banner_is_escaped() {
        let predictor = reference_predictor();
        let html = page(&predictor, &sample_record(), Outcome::Error("unknown category '<script>'"));

        assert!(html.contains("class=\"error\""));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_gauge_endpoints() {
        let empty = gauge_svg(0.0, 0.5);
        assert!(empty.contains("0.00%"));

        let full = gauge_svg(1.0, 0.5);
        assert!(full.contains("100.00%"));
        assert!(full.contains(DANGER_COLOR));
    }
}
