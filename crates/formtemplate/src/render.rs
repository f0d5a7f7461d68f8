//! Loading, building and filling a panel.

use crate::config::Config;
use log::{info, warn};
use miette::{miette, IntoDiagnostic, Result};
use resource_loader::{FileTransport, TemplateLoader};
use template_dom::{Document, MemoryDocument};
use template_fields::FieldRegistry;
use template_panel::TemplatePanelBuilder;

/// One field of a rendered panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub name: String,
    pub kind: String,
    pub value: Option<String>,
}

/// A rendered template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub template: String,
    pub html: String,
    pub fields: Vec<FieldRow>,
}

/// What a run produced.
#[derive(Debug)]
pub enum Outcome {
    /// Names of the loaded templates.
    List(Vec<String>),
    /// The rendered panel.
    Panel(Rendered),
}

/// Load the templates named by `config`.
pub async fn load(config: &Config) -> Result<TemplatePanelBuilder> {
    let loader = TemplateLoader::new(FileTransport::new("."));
    let mut builder = TemplatePanelBuilder::new(FieldRegistry::new());
    let messages = config.messages.as_ref().map(|path| path.to_string_lossy());
    let templates = config.templates.to_string_lossy();
    loader
        .load(&mut builder, messages.as_deref(), &templates)
        .await
        .into_diagnostic()?;
    Ok(builder)
}

/// Run the whole pipeline for `config`.
pub async fn run(config: &Config) -> Result<Outcome> {
    let builder = load(config).await?;
    if config.list {
        return Ok(Outcome::List(
            builder.template_names().map(str::to_string).collect(),
        ));
    }
    render(&builder, config).map(Outcome::Panel)
}

/// Build the selected template and apply the configured values.
pub fn render(builder: &TemplatePanelBuilder, config: &Config) -> Result<Rendered> {
    let name = match &config.template {
        Some(name) => name.clone(),
        None => builder
            .template_names()
            .next()
            .map(str::to_string)
            .ok_or_else(|| miette!("No template found in {}", config.templates.display()))?,
    };

    let mut doc = MemoryDocument::new();
    let mut panel = builder
        .build_panel(&name, &mut doc)
        .into_diagnostic()?
        .ok_or_else(|| miette!("Unknown template '{}'", name))?;
    info!("built template '{}' with {} fields", name, panel.len());

    for (field, value) in &config.values {
        let accepted = panel
            .set_field_value(field, Some(value), &mut doc)
            .into_diagnostic()?;
        if !accepted {
            warn!("no field '{}' accepted the value '{}'", field, value);
        }
    }

    let ids: Vec<_> = panel.iter().map(|field| field.id()).collect();
    let mut fields = Vec::with_capacity(ids.len());
    for id in ids {
        let value = panel.value(id, &mut doc).into_diagnostic()?;
        if let Some(field) = panel.field(id) {
            fields.push(FieldRow {
                name: field.name().to_string(),
                kind: field.kind().to_string(),
                value,
            });
        }
    }

    Ok(Rendered {
        template: name,
        html: doc.inner_html(panel.root()),
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    const FORMS: &str = r#"<t:templates xmlns:t="http://www.adnotatio.org/ns/templates#"><t:template t:name="login"><t:input t:name="user"/><t:checkbox t:name="remember" t:value="on"/><t:submit t:label="Go"/></t:template><t:template t:name="empty"/></t:templates>"#;

    fn config(templates: PathBuf) -> Config {
        Config {
            templates,
            messages: None,
            template: None,
            output: OutputFormat::Human,
            values: vec![
                ("user".to_string(), "ada".to_string()),
                ("remember".to_string(), "on".to_string()),
            ],
            list: false,
        }
    }

    #[tokio::test]
    async fn test_render_first_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forms.xml");
        std::fs::write(&path, FORMS).unwrap();

        let Outcome::Panel(rendered) = run(&config(path)).await.unwrap() else {
            panic!("expected a panel");
        };
        assert_eq!(rendered.template, "login");
        assert_eq!(
            rendered.fields,
            vec![
                FieldRow {
                    name: "user".into(),
                    kind: "text-input".into(),
                    value: Some("ada".into()),
                },
                FieldRow {
                    name: "remember".into(),
                    kind: "checkbox".into(),
                    value: Some("on".into()),
                },
                FieldRow {
                    name: "Button-0".into(),
                    kind: "submit".into(),
                    value: None,
                },
            ]
        );
        assert!(rendered.html.contains("<button>Go</button>"));
    }

    #[tokio::test]
    async fn test_list_and_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forms.xml");
        std::fs::write(&path, FORMS).unwrap();

        let mut list = config(path.clone());
        list.list = true;
        let Outcome::List(names) = run(&list).await.unwrap() else {
            panic!("expected a list");
        };
        assert_eq!(names, vec!["login", "empty"]);

        let mut missing = config(path);
        missing.template = Some("nope".into());
        assert!(run(&missing).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(&config(dir.path().join("none.xml"))).await.is_err());
    }
}
