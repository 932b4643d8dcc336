//! HTML rendering. Pages are assembled as plain strings: one shared layout,
//! the note list with per-note delete forms and copy buttons, the create
//! form, and on the secure variant a passphrase field plus the client
//! crypto script.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};

use crate::{crypto, database::Note};

const STYLE: &str = include_str!("../assets/style.css");
const APP_JS: &str = include_str!("../assets/app.js");
const CRYPTO_JS: &str = include_str!("../assets/crypto.js");

pub fn render_list_page(list_id: &str, notes: &[Note], secure: bool) -> String {
    let title = escape_html(list_id);
    let items: String = notes.iter().map(render_note).collect();

    let passphrase_row = if secure {
        // No name attribute and outside every form: the passphrase is never
        // part of any request body.
        r#"<div class="passphrase">
  <input type="password" id="passphrase" placeholder="Passphrase (never sent to the server)" autocomplete="off">
</div>"#
    } else {
        ""
    };

    let crypto_block = if secure {
        format!("<script>{}</script>", crypto_script())
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>jotter &mdash; {title}</title>
<style>{STYLE}</style>
</head>
<body class="cloak">
<main>
<h1>{title}</h1>
{passphrase_row}
<ul class="notes">
{items}</ul>
<form method="post" class="create">
  <input type="hidden" name="intent" value="create">
  <textarea name="text" rows="3" placeholder="Write a note..." required></textarea>
  <button type="submit">Add</button>
</form>
</main>
<script>{APP_JS}</script>
{crypto_block}
</body>
</html>
"#
    )
}

fn render_note(note: &Note) -> String {
    format!(
        r#"<li class="note">
  <span class="note-text">{text}</span>
  <button type="button" class="copy">copy</button>
  <form method="post" class="delete">
    <input type="hidden" name="intent" value="delete">
    <input type="hidden" name="id" value="{id}">
    <button type="submit" title="Delete">&times;</button>
  </form>
</li>
"#,
        text = escape_html(&note.text),
        id = escape_html(&note.id),
    )
}

fn crypto_script() -> String {
    CRYPTO_JS
        .replace(
            "__PBKDF2_ITERATIONS__",
            &crypto::PBKDF2_ITERATIONS.to_string(),
        )
        .replace("__KDF_SALT_B64__", &BASE64_STANDARD.encode(crypto::KDF_SALT))
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    escaped
}
