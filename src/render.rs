//! HTML rendering for navigable pages.
//!
//! DESIGN
//! ======
//! Every page is a body fragment wrapped in one shell. The shell carries a
//! global-styles placeholder in `<head>`; `transform_page_chunk` swaps it
//! for the generated stylesheet name on the way out, so templates never
//! hard-code it.

use std::fmt::Write;

use crate::guard::{HOME_PATH, LOGIN_PATH};
use crate::theme::Colour;

/// Placeholder the shell carries for global styles.
pub const GLOBAL_STYLES_PLACEHOLDER: &str = "%unocss-svelte-scoped.global%";

/// Replacement for [`GLOBAL_STYLES_PLACEHOLDER`].
pub const GLOBAL_STYLES_NAME: &str = "unocss_svelte_scoped_global_styles";

/// Replace the first global-styles placeholder in `html`.
#[must_use]
pub fn transform_page_chunk(html: &str) -> String {
    html.replacen(GLOBAL_STYLES_PLACEHOLDER, GLOBAL_STYLES_NAME, 1)
}

/// Escape text for HTML element content and attribute values.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
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

fn shell(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <link rel=\"stylesheet\" href=\"/assets/{GLOBAL_STYLES_PLACEHOLDER}.css\">\n\
         <title>{}</title>\n\
         </head>\n\
         <body>\n{body}</body>\n\
         </html>\n",
        escape_html(title)
    )
}

fn button(colour: Colour, label: &str, attrs: &str) -> String {
    format!(
        "<button class=\"btn {}\" data-colour=\"{colour}\" {attrs}>{}</button>\n",
        colour.button_class(),
        escape_html(label)
    )
}

fn link_button(colour: Colour, label: &str, href: &str) -> String {
    format!(
        "<a class=\"btn {}\" data-colour=\"{colour}\" href=\"{}\">{}</a>\n",
        colour.button_class(),
        escape_html(href),
        escape_html(label)
    )
}

/// Render a full page and apply the page-chunk transform.
fn finish(title: &str, body: &str) -> String {
    transform_page_chunk(&shell(title, body))
}

#[must_use]
pub fn home_page() -> String {
    let mut body = String::from("<main>\n<h1>Home</h1>\n");
    body.push_str(&link_button(Colour::Neutral, "Account", "/account"));
    body.push_str(&logout_form());
    body.push_str("</main>\n");
    finish("Home", &body)
}

/// Login page with the credential form, the dev shortcut when enabled, and
/// an optional error from the last attempt.
#[must_use]
pub fn login_page(dev_login: bool, error: Option<&str>) -> String {
    let mut body = String::from("<main>\n<h1>Log in</h1>\n");
    if let Some(error) = error {
        let _ = writeln!(body, "<p role=\"alert\">{}</p>", escape_html(error));
    }

    let _ = writeln!(body, "<form method=\"post\" action=\"{LOGIN_PATH}\">");
    body.push_str("<input type=\"email\" name=\"email\" required>\n");
    body.push_str("<input type=\"password\" name=\"password\" required>\n");
    body.push_str("<input type=\"text\" name=\"first_name\">\n");
    body.push_str("<input type=\"text\" name=\"last_name\">\n");
    body.push_str(&button(Colour::Primary, "Log in", "type=\"submit\" name=\"intent\" value=\"login\""));
    body.push_str(&button(Colour::Secondary, "Register", "type=\"submit\" name=\"intent\" value=\"register\""));
    body.push_str("</form>\n");

    if dev_login {
        body.push_str("<form method=\"post\" action=\"/api/auth/dev-session\">\n");
        body.push_str(&button(Colour::Accent, "Continue without an account", "type=\"submit\""));
        body.push_str("</form>\n");
    }
    body.push_str("</main>\n");
    finish("Log in", &body)
}

/// Page for any other navigable path.
#[must_use]
pub fn generic_page(path: &str) -> String {
    let mut body = String::from("<main>\n");
    let _ = writeln!(body, "<h1>{}</h1>", escape_html(path));
    body.push_str(&link_button(Colour::Link, "Home", HOME_PATH));
    body.push_str(&logout_form());
    body.push_str("</main>\n");
    finish(path, &body)
}

fn logout_form() -> String {
    let mut form = String::from("<form method=\"post\" action=\"/logout\">\n");
    form.push_str(&button(Colour::Ghost, "Log out", "type=\"submit\""));
    form.push_str("</form>\n");
    form
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
