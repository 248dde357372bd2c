//! Minimal server-rendered pages for browser clients.

use serde_json::{Map, Value};

pub(crate) fn login_page(login_url: &str) -> String {
    layout(
        "Sign in",
        &format!(
            r#"<h1>Sign in</h1>
<p><a id="login" href="{}">Continue to the identity provider</a></p>"#,
            escape(login_url)
        ),
    )
}

pub(crate) fn callback_page(cookie_name: &str, redirect_url: &str, infos: &Map<String, Value>) -> String {
    layout(
        "Signed in",
        &format!(
            r#"<h1>Signed in</h1>
<p>Your session is stored in the <code>{}</code> cookie.</p>
{}
<p><a id="continue" href="{}">Continue</a></p>"#,
            escape(cookie_name),
            claims_table(infos),
            escape(redirect_url)
        ),
    )
}

/// With `claims`, shows the signed-in user's token payload, otherwise a sign-in link.
pub(crate) fn home_page(claims: Option<&Map<String, Value>>) -> String {
    let body = match claims {
        Some(claims) => format!(
            r#"<h1>Welcome</h1>
{}
<p><a href="/auth/logout">Sign out</a></p>"#,
            claims_table(claims)
        ),
        None => r#"<h1>Welcome</h1>
<p><a href="/auth/login">Sign in</a></p>"#
            .to_string(),
    };
    layout("Home", &body)
}

// Token fields are never rendered.
fn claims_table(entries: &Map<String, Value>) -> String {
    let rows: String = entries
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "access_token" | "refresh_token" | "id_token"))
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!(
                "<tr><th>{}</th><td>{}</td></tr>",
                escape(key),
                escape(&value)
            )
        })
        .collect();
    format!("<table>{rows}</table>")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{}</title></head>
<body>
{}
</body>
</html>
"#,
        escape(title),
        body
    )
}

pub(crate) fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_login_page_escapes_query_separators() {
        let page = login_page("https://idp.example.com/authorize?a=1&b=2");
        assert!(page.contains(r#"href="https://idp.example.com/authorize?a=1&amp;b=2""#));
    }

    #[test]
    fn test_callback_page_hides_tokens() {
        let infos = json!({ "access_token": "secret", "expires_in": 3600, "scope": "openid" });
        let page = callback_page("access_token", "/dashboard", infos.as_object().unwrap());

        assert!(!page.contains("secret"));
        assert!(page.contains("<th>expires_in</th><td>3600</td>"));
        assert!(page.contains("<th>scope</th><td>openid</td>"));
        assert!(page.contains(r#"href="/dashboard""#));
    }

    #[test]
    fn test_home_page_without_claims_links_to_login() {
        let page = home_page(None);
        assert!(page.contains(r#"href="/auth/login""#));
    }

    #[test]
    fn test_home_page_escapes_claims() {
        let claims = json!({ "name": "<script>" });
        let page = home_page(claims.as_object());
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
        assert!(page.contains(r#"href="/auth/logout""#));
    }
}
