//! Server-rendered HTML pages: home and per-entity list with add/delete forms.

use crate::model::Resource;
use crate::service::{FieldRule, FieldSpec};

const LAYOUT_HTML: &str = r#"<!doctype html>
<html lang="fr">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>__TITLE__</title>
  <style>
    body { font-family: system-ui, sans-serif; margin: 0; color: #1d2330; background: #f6f7fb; }
    header { padding: 14px 20px; background: #1d2333; }
    header a { color: #e6eef8; margin-right: 16px; text-decoration: none; }
    main { padding: 20px; max-width: 1200px; margin: 0 auto; }
    table { border-collapse: collapse; width: 100%; background: #fff; }
    th, td { border: 1px solid #e4e8f1; padding: 6px 10px; text-align: left; }
    th { background: #eef1f7; }
    form.add { margin-top: 24px; display: grid; gap: 8px; max-width: 420px; }
    form.inline { display: inline; }
    .empty { color: #5b667a; }
  </style>
</head>
<body>
  <header><a href="/">Accueil</a><a href="/agences">Agences</a><a href="/vehicules">Véhicules</a></header>
  <main>
    <h1>__TITLE__</h1>
__CONTENT__
  </main>
</body>
</html>
"#;

/// Escape text for HTML element and attribute context.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, content: &str) -> String {
    LAYOUT_HTML
        .replace("__TITLE__", &escape(title))
        .replace("__CONTENT__", content)
}

pub fn render_home() -> String {
    layout(
        "Gestion des agences",
        r#"    <ul>
      <li><a href="/agences">Liste des agences</a></li>
      <li><a href="/vehicules">Liste des véhicules</a></li>
    </ul>"#,
    )
}

pub fn render_list<R: Resource>(items: &[R]) -> String {
    let def = R::def();
    let mut content = String::new();

    if items.is_empty() {
        content.push_str("    <p class=\"empty\">Aucun enregistrement.</p>\n");
    } else {
        content.push_str("    <table>\n      <tr>");
        for h in R::view_headers() {
            content.push_str(&format!("<th>{}</th>", escape(h)));
        }
        content.push_str("<th></th></tr>\n");
        for item in items {
            content.push_str("      <tr>");
            for cell in item.view_cells() {
                content.push_str(&format!("<td>{}</td>", escape(&cell)));
            }
            content.push_str(&format!(
                "<td><form class=\"inline\" method=\"post\" action=\"/{}/delete/{}\"><button type=\"submit\">Supprimer</button></form></td></tr>\n",
                def.path_segment,
                item.id()
            ));
        }
        content.push_str("    </table>\n");
    }

    content.push_str(&format!("    <form class=\"add\" method=\"post\" action=\"/{}/add\">\n", def.path_segment));
    for field in def.fields {
        content.push_str(&form_input(field));
    }
    content.push_str("      <button type=\"submit\">Ajouter</button>\n    </form>");
    layout(R::view_title(), &content)
}

fn form_input(field: &FieldSpec) -> String {
    let (kind, extra) = match field.rule {
        FieldRule::RequiredInteger { min, max } => ("number", format!(" min=\"{}\" max=\"{}\" step=\"1\"", min, max)),
        FieldRule::RequiredNumber { min } => ("number", format!(" min=\"{}\" step=\"0.01\"", min)),
        FieldRule::OptionalForeignKey => ("number", String::from(" min=\"1\" step=\"1\"")),
        FieldRule::OptionalEmail => ("email", String::new()),
        FieldRule::RequiredString | FieldRule::OptionalString => ("text", String::new()),
    };
    let required = if field.rule.is_required() { " required" } else { "" };
    format!(
        "      <label>{name} <input type=\"{kind}\" name=\"{name}\"{extra}{required}></label>\n",
        name = escape(field.name),
        kind = kind,
        extra = extra,
        required = required
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Agence, Vehicule};

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }

    #[test]
    fn list_renders_rows_escaped_with_delete_forms() {
        let agences = vec![Agence {
            id: 3,
            name: "<Central>".into(),
            address: None,
            phone: Some("0102030405".into()),
            email: None,
            date_of_creation: None,
            date_of_modification: None,
        }];
        let html = render_list(&agences);
        assert!(html.contains("<td>&lt;Central&gt;</td>"));
        assert!(html.contains("action=\"/agences/delete/3\""));
        assert!(html.contains("action=\"/agences/add\""));
        assert!(!html.contains("__CONTENT__"));
    }

    #[test]
    fn empty_list_still_offers_the_add_form() {
        let html = render_list::<Vehicule>(&[]);
        assert!(html.contains("Aucun enregistrement"));
        assert!(html.contains("name=\"annee\" min=\"1886\" max=\"2147483647\" step=\"1\" required"));
        assert!(html.contains("name=\"agence_id\" min=\"1\" step=\"1\">"));
    }
}
