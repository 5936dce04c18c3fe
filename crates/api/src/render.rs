//! HTML rendering for the questionnaire page

use feature_encoder::{Gender, RawAnswers, SmokingHistory, SummaryRow, YesNo};
use inference_engine::ScreeningResult;
use std::fmt::Write;

const STYLE: &str = r#"
body { font-family: 'Segoe UI', Arial, sans-serif; margin: 0; padding: 2rem; background: #f4f8fc; color: #1d2a3a; }
main { max-width: 52rem; margin: 0 auto; }
h1 { text-align: center; color: #278cf5; font-weight: 900; letter-spacing: .04em; }
.subtitle { text-align: center; margin-bottom: 2em; }
.question-card { background: #fff; border-radius: 1.2rem; box-shadow: 0 4px 15px 0 rgba(39, 140, 245, 0.8); margin-bottom: 1.8rem; padding: 1rem 1.5rem; }
.section-title { text-align: center; color: #278cf5; font-size: 1.25rem; font-weight: 800; letter-spacing: 0.06em; border-bottom: 2px solid #38d6ae22; padding-bottom: 0.4em; }
fieldset { border: none; margin: 0.6rem 0; }
legend, .field-label { font-weight: 700; }
button { width: 100%; padding: 0.8rem; font-size: 1.1rem; font-weight: 700; border-radius: 0.6rem; }
.result-alert { border-radius: 0.8em; font-weight: 700; text-align: center; margin: 1.1em auto; padding: 1.1em 1.5em; color: #fff; }
.result-positive { background: #e74c3c; }
.result-negative { background: #239B56; }
.error { border-radius: 0.8em; padding: 1em; background: #fdecea; color: #a12622; font-weight: 700; }
.answers-table { margin: 0 auto; border-collapse: collapse; }
.answers-table th, .answers-table td { padding: 0.59em 1.1em; border-bottom: 1px solid #38d6ae21; text-align: center; }
footer { text-align: center; font-size: small; margin-top: 2rem; }
"#;

/// Outcome shown below the form after a successful submission
pub struct ResultView<'a> {
    pub result: ScreeningResult,
    pub summary: &'a [SummaryRow],
}

/// Escape text for HTML element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Banner text for a screening result
pub fn result_banner(result: ScreeningResult) -> String {
    format!("Result: {} ({})", result.as_str(), result.advice())
}

/// Render the full questionnaire page.
///
/// `answers` pre-fills the form; empty values fall back to the widget defaults.
pub fn questionnaire_page(
    answers: &RawAnswers,
    outcome: Option<&ResultView<'_>>,
    error: Option<&str>,
) -> String {
    let mut html = String::with_capacity(8 * 1024);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>DIABETES PREDICTOR</title>\n<style>{}</style>\n</head>\n<body>\n<main>\n\
         <h1>&#129658; DIABETES SCREENING QUESTIONNAIRE</h1>\n\
         <div class=\"subtitle\">Professional Medical Risk Assessment</div>\n\
         <form method=\"post\" action=\"/assess\">\n",
        STYLE
    );

    html.push_str("<div class=\"question-card\"><div class=\"section-title\">PERSONAL DETAILS</div>\n");
    html.push_str(&radio_group(
        "gender",
        "GENDER",
        &Gender::ALL.map(|g| g.label()),
        &answers.gender,
    ));
    html.push_str(&number_input("age", "AGE", "0", "120", "1", &answers.age, "0"));
    html.push_str("</div>\n");

    html.push_str("<div class=\"question-card\"><div class=\"section-title\">HEALTH STATUS</div>\n");
    let yes_no = YesNo::ALL.map(|a| a.label());
    html.push_str(&radio_group("hypertension", "HYPERTENSION", &yes_no, &answers.hypertension));
    html.push_str(&radio_group(
        "smoking_history",
        "SMOKING HISTORY",
        &SmokingHistory::ALL.map(|s| s.label()),
        &answers.smoking_history,
    ));
    html.push_str(&radio_group("heart_disease", "HEART DISEASE", &yes_no, &answers.heart_disease));
    html.push_str("</div>\n");

    html.push_str("<div class=\"question-card\"><div class=\"section-title\">BIOLOGICAL METRICS</div>\n");
    html.push_str(&number_input("bmi", "BMI", "0", "60", "0.1", &answers.bmi, "0.00"));
    html.push_str(&number_input("hba1c", "HbA1c LEVEL", "0", "20", "0.1", &answers.hba1c, "0.00"));
    html.push_str(&number_input(
        "blood_glucose",
        "BLOOD GLUCOSE LEVEL",
        "0",
        "600",
        "0.1",
        &answers.blood_glucose,
        "0.0",
    ));
    html.push_str("</div>\n");

    html.push_str("<button type=\"submit\">&#128270; SUBMIT FOR ANALYSIS</button>\n</form>\n");

    if let Some(message) = error {
        let _ = writeln!(html, "<div class=\"error\">{}</div>", escape(message));
    }

    if let Some(view) = outcome {
        html.push_str(&result_section(view));
    }

    html.push_str(
        "<footer>This dashboard is for demonstration purposes only.<br>\
         For medical advice, consult a qualified healthcare professional.</footer>\n\
         </main>\n</body>\n</html>\n",
    );
    html
}

fn result_section(view: &ResultView<'_>) -> String {
    let class = if view.result.is_positive() {
        "result-positive"
    } else {
        "result-negative"
    };

    let mut html = String::new();
    html.push_str("<div class=\"section-title\">RESULT</div>\n");
    let _ = writeln!(
        html,
        "<div class=\"result-alert {}\">{}</div>",
        class,
        result_banner(view.result)
    );
    html.push_str("<div class=\"section-title\">SUMMARY OF RESPONSES</div>\n");
    html.push_str("<table class=\"answers-table\"><tr><th>QUESTION</th><th>ANSWER</th></tr>");
    for row in view.summary {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape(row.question),
            escape(&row.answer)
        );
    }
    html.push_str("</table>\n");
    html
}

fn radio_group(name: &str, title: &str, options: &[&str], selected: &str) -> String {
    // Unknown or empty selections fall back to the first option
    let selected = if options.contains(&selected) {
        selected
    } else {
        options[0]
    };

    let mut html = String::new();
    let _ = write!(html, "<fieldset><legend>{}</legend>", title);
    for option in options {
        let checked = if *option == selected { " checked" } else { "" };
        let _ = write!(
            html,
            "<label><input type=\"radio\" name=\"{}\" value=\"{}\"{}> {}</label> ",
            name,
            escape(option),
            checked,
            escape(option)
        );
    }
    html.push_str("</fieldset>\n");
    html
}

fn number_input(
    name: &str,
    title: &str,
    min: &str,
    max: &str,
    step: &str,
    value: &str,
    default: &str,
) -> String {
    let value = if value.trim().is_empty() { default } else { value };
    format!(
        "<fieldset><label class=\"field-label\" for=\"{name}\">{title}</label><br>\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" \
         step=\"{step}\" value=\"{}\" required></fieldset>\n",
        escape(value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_encoder::{AssessmentInput, Gender, SmokingHistory, YesNo};

    fn input() -> AssessmentInput {
        AssessmentInput {
            gender: Gender::Male,
            age: 60,
            hypertension: YesNo::No,
            smoking_history: SmokingHistory::NotCurrent,
            heart_disease: YesNo::Yes,
            bmi: 31.25,
            hba1c: 7.0,
            blood_glucose: 220.0,
        }
    }

    #[test]
    fn test_empty_form_defaults() {
        let html = questionnaire_page(&RawAnswers::default(), None, None);
        assert!(html.contains("PERSONAL DETAILS"));
        assert!(html.contains("HEALTH STATUS"));
        assert!(html.contains("BIOLOGICAL METRICS"));
        assert!(html.contains("name=\"gender\" value=\"Female\" checked"));
        assert!(html.contains("name=\"smoking_history\" value=\"Not known\" checked"));
        assert!(html.contains("max=\"600\""));
        assert!(!html.contains("RESULT"));
    }

    #[test]
    fn test_positive_result_section() {
        let input = input();
        let summary = input.summary();
        let view = ResultView {
            result: ScreeningResult::Positive,
            summary: &summary,
        };
        let html = questionnaire_page(&input.to_raw(), Some(&view), None);

        assert!(html.contains("result-alert result-positive"));
        assert!(html.contains("Result: POSITIVE (Consult a Doctor)"));
        assert!(html.contains("<tr><td>Smoking History</td><td>Not current</td></tr>"));
        assert!(html.contains("<tr><td>BMI</td><td>31.25</td></tr>"));
        assert!(html.contains("<tr><td>Blood Glucose Level</td><td>220.0</td></tr>"));
        assert!(html.contains("name=\"gender\" value=\"Male\" checked"));
    }

    #[test]
    fn test_negative_banner() {
        assert_eq!(
            result_banner(ScreeningResult::Negative),
            "Result: NEGATIVE (No Indication Detected)"
        );
    }

    #[test]
    fn test_submitted_values_are_escaped() {
        let answers = RawAnswers {
            bmi: "\"><script>".into(),
            ..Default::default()
        };
        let html = questionnaire_page(&answers, None, Some("bad <input>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
        assert!(html.contains("bad &lt;input&gt;"));
    }
}
