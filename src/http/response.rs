//! Response rendering.
//!
//! Maps each terminal state of a gated request to exactly one response:
//! - Denied    → 403 with the raw verdict and subject
//! - Granted   → 200 welcome page
//! - LogFailed → 500, never confused with a rejected certificate

use std::fmt::Write as _;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::gate::{Denial, Grant};

const PERMISSION_MESSAGE: &str =
    "Error de permisos al escribir el log. Revisa la configuración de /var/log.";
const WRITE_MESSAGE: &str = "Error al escribir el log de accesos.";

/// Response for one gated request.
#[derive(Debug)]
pub enum GateResponse {
    Denied {
        denial: Denial,
        /// Request headers to list for diagnostics, if enabled.
        headers: Option<Vec<(String, String)>>,
    },
    Granted(Grant),
    LogFailed { permission_denied: bool },
}

impl IntoResponse for GateResponse {
    fn into_response(self) -> Response {
        match self {
            GateResponse::Denied { denial, headers } => (
                StatusCode::FORBIDDEN,
                Html(denied_page(&denial, headers.as_deref())),
            )
                .into_response(),
            GateResponse::Granted(grant) => (StatusCode::OK, Html(granted_page(&grant))).into_response(),
            GateResponse::LogFailed { permission_denied } => {
                let message = if permission_denied {
                    PERMISSION_MESSAGE
                } else {
                    WRITE_MESSAGE
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn denied_page(denial: &Denial, headers: Option<&[(String, String)]>) -> String {
    let mut page = String::from(
        "<html>\n<head><title>Acceso denegado</title><meta charset=\"utf-8\" /></head>\n<body>\n",
    );
    page.push_str("<h1>Certificado de cliente no válido o no presentado.</h1>\n");
    let _ = writeln!(
        page,
        "<p><strong>Verificación:</strong> {}</p>",
        escape_html(&denial.verdict)
    );
    let _ = writeln!(
        page,
        "<p><strong>Subject:</strong> {}</p>",
        escape_html(&denial.subject)
    );

    if let Some(headers) = headers {
        page.push_str("<table>\n");
        for (name, value) in headers {
            let _ = writeln!(
                page,
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(name),
                escape_html(value)
            );
        }
        page.push_str("</table>\n");
    }

    page.push_str("</body>\n</html>\n");
    page
}

fn granted_page(grant: &Grant) -> String {
    let name = escape_html(&grant.identity.common_name);
    let email = escape_html(&grant.identity.email);
    let addr = escape_html(&grant.client_addr);
    let timestamp = grant.formatted_timestamp();

    format!(
        r#"<html>
    <head>
        <title>Práctica PKI</title>
        <meta charset="utf-8" />
        <style>
            body {{ font-family: Arial, sans-serif; margin: 40px; background-color: #f5f5f5; }}
            .container {{ background-color: #ffffff; padding: 20px; border-radius: 8px; box-shadow: 0 0 10px rgba(0,0,0,0.1); max-width: 600px; }}
            h1 {{ color: #2e6c80; }}
            p {{ margin: 5px 0; }}
        </style>
    </head>
    <body>
        <div class="container">
            <h1>Bienvenido/a, {name}</h1>
            <p><strong>Correo:</strong> {email}</p>
            <p><strong>IP:</strong> {addr}</p>
            <p><strong>Fecha y hora de acceso:</strong> {timestamp}</p>
            <p>Tu acceso ha sido verificado mediante un certificado de cliente emitido por la CA de la práctica.</p>
        </div>
    </body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;
    use chrono::NaiveDate;

    fn grant(subject: &str) -> Grant {
        Grant {
            identity: Identity::from_subject(subject),
            client_addr: "10.1.2.3".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 11, 2)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#x27;y&#x27;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("Juan Pérez"), "Juan Pérez");
    }

    #[test]
    fn test_granted_page_contents() {
        let page = granted_page(&grant("/CN=Juan Perez/emailAddress=juan@ejemplo.com"));
        assert!(page.contains("Bienvenido/a, Juan Perez"));
        assert!(page.contains("juan@ejemplo.com"));
        assert!(page.contains("10.1.2.3"));
        assert!(page.contains("2024-11-02 09:30:00"));
    }

    #[test]
    fn test_granted_page_escapes_identity() {
        let page = granted_page(&grant("/CN=<b>bold</b>"));
        assert!(page.contains("&lt;b&gt;bold&lt;"));
        assert!(!page.contains("<b>bold"));
    }

    #[test]
    fn test_denied_page_shows_diagnostics() {
        let denial = Denial {
            verdict: "FAILED:unable to verify".to_string(),
            subject: "/CN=<x>".to_string(),
        };
        let headers = vec![("host".to_string(), "gate.local".to_string())];

        let page = denied_page(&denial, Some(&headers));
        assert!(page.contains("FAILED:unable to verify"));
        assert!(page.contains("/CN=&lt;x&gt;"));
        assert!(page.contains("<tr><td>host</td><td>gate.local</td></tr>"));

        let bare = denied_page(&denial, None);
        assert!(!bare.contains("<table>"));
    }

    #[test]
    fn test_status_codes() {
        let denied = GateResponse::Denied {
            denial: Denial {
                verdict: "NONE".to_string(),
                subject: String::new(),
            },
            headers: None,
        };
        assert_eq!(denied.into_response().status(), StatusCode::FORBIDDEN);

        let granted = GateResponse::Granted(grant("/CN=a"));
        assert_eq!(granted.into_response().status(), StatusCode::OK);

        let failed = GateResponse::LogFailed {
            permission_denied: true,
        };
        assert_eq!(failed.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
