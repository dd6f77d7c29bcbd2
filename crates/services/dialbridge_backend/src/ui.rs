// --- File: crates/services/dialbridge_backend/src/ui.rs ---
use axum::extract::Query;
use axum::response::Html;
use serde::Deserialize;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Deserialize, Debug, Default)]
pub struct IndexQuery {
    pub number: Option<String>,
}

/// Serves the dial form. The destination field can be pre-filled via
/// `/?number=+15551234567`; the value is a display convenience and is not
/// validated.
pub async fn index(Query(query): Query<IndexQuery>) -> Html<String> {
    let number = query.number.unwrap_or_default();
    Html(INDEX_HTML.replace("{{number}}", &attr_escape(&number)))
}

// Escape for use inside a double-quoted HTML attribute.
fn attr_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prefills_the_number_field() {
        let Html(page) = index(Query(IndexQuery {
            number: Some("+15551234567".to_string()),
        }))
        .await;
        assert!(page.contains(r#"value="+15551234567""#));
    }

    #[tokio::test]
    async fn defaults_to_an_empty_field() {
        let Html(page) = index(Query(IndexQuery::default())).await;
        assert!(page.contains(r#"value="""#));
    }

    #[test]
    fn attribute_values_cannot_break_out() {
        assert_eq!(
            attr_escape(r#""><script>"#),
            "&quot;&gt;&lt;script&gt;"
        );
    }
}
