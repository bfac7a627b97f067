//! Site templates using the Tera template engine
//!
//! Every file under the templates directory that carries one of the page
//! templates' extensions is loaded once at startup, so the three page
//! templates may `extend` or `include` shared partials. Other files (editor
//! swap files, images) are left alone.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::collections::{BTreeSet, HashMap};
use std::error::Error as _;
use std::path::Path;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::category_file_name;
use crate::error::{BlogError, Result};

/// Characters escaped in generated category URLs
const URL_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Names of the three page templates
#[derive(Debug, Clone)]
pub struct TemplateNames {
    pub post: String,
    pub index: String,
    pub category: String,
}

impl TemplateNames {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            post: config.post_template.clone(),
            index: config.index_template.clone(),
            category: config.category_template.clone(),
        }
    }

    fn all(&self) -> [&str; 3] {
        [&self.post, &self.index, &self.category]
    }

    /// Glob matching every file under `dir` with a page template extension
    fn glob(&self, dir: &Path) -> String {
        let exts: BTreeSet<&str> = self
            .all()
            .into_iter()
            .filter_map(|name| Path::new(name).extension().and_then(|e| e.to_str()))
            .collect();
        let pattern = match exts.len() {
            0 => "html".to_string(),
            1 => exts.iter().copied().collect(),
            _ => format!("{{{}}}", exts.into_iter().collect::<Vec<_>>().join(",")),
        };
        format!("{}/**/*.{}", dir.display(), pattern)
    }
}

/// Template renderer loaded from the site's templates directory
pub struct TemplateRenderer {
    tera: Tera,
    names: TemplateNames,
}

impl TemplateRenderer {
    /// Load the templates under `dir` and check the page templates exist
    pub fn load(dir: &Path, config: &SiteConfig) -> Result<Self> {
        if !dir.is_dir() {
            return Err(BlogError::TemplateLoad(format!(
                "template directory {:?} does not exist",
                dir
            )));
        }

        let names = TemplateNames::from_config(config);
        let mut tera =
            Tera::new(&names.glob(dir)).map_err(|e| BlogError::TemplateLoad(error_chain(&e)))?;

        // Rendered markdown is inserted as-is
        tera.autoescape_on(vec![]);

        let loaded: Vec<&str> = tera.get_template_names().collect();
        for name in names.all() {
            if !loaded.contains(&name) {
                return Err(BlogError::TemplateLoad(format!(
                    "required template {} not found in {:?}",
                    name, dir
                )));
            }
        }

        tracing::debug!("Loaded {} templates from {:?}", loaded.len(), dir);
        register_filters(&mut tera, config);

        Ok(Self { tera, names })
    }

    pub fn names(&self) -> &TemplateNames {
        &self.names
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        self.tera
            .render(template_name, context)
            .map_err(|e| BlogError::Render {
                template: template_name.to_string(),
                reason: error_chain(&e),
            })
    }

    pub fn render_post(&self, context: &Context) -> Result<String> {
        self.render(&self.names.post, context)
    }

    pub fn render_index(&self, context: &Context) -> Result<String> {
        self.render(&self.names.index, context)
    }

    pub fn render_category(&self, context: &Context) -> Result<String> {
        self.render(&self.names.category, context)
    }
}

fn register_filters(tera: &mut Tera, config: &SiteConfig) {
    let base_url = config.base_url.trim_end_matches('/').to_string();
    let category_dir = config.category_dir.trim_matches('/').to_string();

    tera.register_filter(
        "category_url",
        move |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
            let name = tera::try_get_value!("category_url", "value", String, value);
            let file = category_file_name(&name);
            Ok(tera::Value::String(format!(
                "{}/{}/{}",
                base_url,
                category_dir,
                utf8_percent_encode(&file, URL_PATH)
            )))
        },
    );
}

/// Tera hides the useful part of an error in its source chain
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_templates(dir: &Path, files: &[(&str, &str)]) {
        fs::create_dir_all(dir).unwrap();
        for (name, body) in files {
            fs::write(dir.join(name), body).unwrap();
        }
    }

    fn full_set() -> Vec<(&'static str, &'static str)> {
        vec![
            ("post_template.html", "<h1>{{ metadata.title }}</h1>{{ content }}"),
            ("index_template.html", "{% for p in posts %}{{ p.title }};{% endfor %}"),
            (
                "category_template.html",
                "<a href=\"{{ category | category_url }}\">{{ category }}</a>",
            ),
        ]
    }

    #[test]
    fn test_load_and_render() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path(), &full_set());

        let renderer = TemplateRenderer::load(dir.path(), &SiteConfig::default()).unwrap();
        let mut context = Context::new();
        context.insert("metadata", &HashMap::from([("title", "Hi")]));
        context.insert("content", "<p>raw & unescaped</p>");

        let html = renderer.render_post(&context).unwrap();
        assert_eq!(html, "<h1>Hi</h1><p>raw & unescaped</p>");
    }

    #[test]
    fn test_category_url_filter() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path(), &full_set());
        let config = SiteConfig {
            base_url: "https://example.com/blog/".to_string(),
            ..Default::default()
        };

        let renderer = TemplateRenderer::load(dir.path(), &config).unwrap();
        let mut context = Context::new();
        context.insert("category", "Rust tips");

        let html = renderer.render_category(&context).unwrap();
        assert_eq!(
            html,
            "<a href=\"https://example.com/blog/categories/Rust%20tips.html\">Rust tips</a>"
        );
    }

    #[test]
    fn test_missing_template_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = full_set();
        files.retain(|(name, _)| *name != "category_template.html");
        write_templates(dir.path(), &files);

        match TemplateRenderer::load(dir.path(), &SiteConfig::default()) {
            Err(BlogError::TemplateLoad(msg)) => assert!(msg.contains("category_template.html")),
            other => panic!("expected TemplateLoad, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_syntax_error_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = full_set();
        files[0] = ("post_template.html", "{% if %}");
        write_templates(dir.path(), &files);

        assert!(matches!(
            TemplateRenderer::load(dir.path(), &SiteConfig::default()),
            Err(BlogError::TemplateLoad(_))
        ));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            TemplateRenderer::load(&dir.path().join("nope"), &SiteConfig::default()),
            Err(BlogError::TemplateLoad(_))
        ));
    }

    #[test]
    fn test_partials_are_available() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = full_set();
        files.push(("base.html", "<main>{% block body %}{% endblock %}</main>"));
        files[1] = (
            "index_template.html",
            "{% extends \"base.html\" %}{% block body %}{{ posts | length }}{% endblock %}",
        );
        write_templates(dir.path(), &files);

        let renderer = TemplateRenderer::load(dir.path(), &SiteConfig::default()).unwrap();
        let mut context = Context::new();
        context.insert("posts", &vec![1, 2, 3]);
        assert_eq!(renderer.render_index(&context).unwrap(), "<main>3</main>");
    }

    #[test]
    fn test_stray_files_are_not_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = full_set();
        files.push((".post_template.html.swp", "{% if %}"));
        files.push(("notes.txt", "{{ unclosed"));
        write_templates(dir.path(), &files);
        fs::write(dir.path().join("logo.png"), [137u8, 80, 78, 71, 0, 255, 254]).unwrap();

        let renderer = TemplateRenderer::load(dir.path(), &SiteConfig::default()).unwrap();
        let mut names: Vec<_> = renderer.tera.get_template_names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec!["category_template.html", "index_template.html", "post_template.html"]
        );
    }

    #[test]
    fn test_glob_covers_each_template_extension() {
        let config = SiteConfig {
            index_template: "feed.xml".to_string(),
            ..Default::default()
        };
        let names = TemplateNames::from_config(&config);
        assert_eq!(names.glob(Path::new("t")), "t/**/*.{html,xml}");
        let names = TemplateNames::from_config(&SiteConfig::default());
        assert_eq!(names.glob(Path::new("t")), "t/**/*.html");
    }
}
