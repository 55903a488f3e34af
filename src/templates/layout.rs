use maud::{html, Markup, PreEscaped, DOCTYPE};

// Inline stylesheet so the report is a single self-contained file.
const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; }
header { padding: 12px 24px; box-shadow: 0 1px 3px rgba(0,0,0,0.15); }
main { max-width: 960px; margin: 0 auto; padding: 24px; }
section.card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 16px; margin-bottom: 16px; }
table { border-collapse: collapse; width: 100%; font-size: 0.9em; }
th, td { text-align: left; padding: 4px 8px; border-bottom: 1px solid #e5e7eb; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
.muted { color: #6b7280; }
"#;

pub fn report_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                header {
                    h3 { "Listings Profile" }
                }
                main { (content) }
            }
        }
    }
}
