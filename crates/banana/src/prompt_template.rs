use include_dir::{include_dir, Dir};
use serde::Serialize;
use std::path::Path;
use tera::{Context, Error as TeraError, Tera};

static PROMPTS: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/prompts");

pub fn load_prompt<T: Serialize>(template: &str, context_data: &T) -> Result<String, TeraError> {
    let mut tera = Tera::default();
    tera.add_raw_template("inline_template", template)?;
    let context = Context::from_serialize(context_data)?;
    let rendered = tera.render("inline_template", &context)?;
    Ok(rendered)
}

/// Render one of the prompts embedded from `src/prompts`
pub fn load_prompt_file<T: Serialize>(
    template_file: impl AsRef<Path>,
    context_data: &T,
) -> Result<String, TeraError> {
    let template_path = template_file.as_ref();
    let template_content = PROMPTS
        .get_file(template_path)
        .and_then(|file| file.contents_utf8())
        .ok_or_else(|| TeraError::msg(format!("Unknown prompt template: {}", template_path.display())))?;
    load_prompt(template_content, context_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::search::SearchResult;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_load_prompt() {
        let template = "Hello, {{ name }}! You are {{ age }} years old.";
        let mut context = HashMap::new();
        context.insert("name".to_string(), "Alice".to_string());
        context.insert("age".to_string(), 30.to_string());

        let result = load_prompt(template, &context).unwrap();
        assert_eq!(result, "Hello, Alice! You are 30 years old.");
    }

    #[test]
    fn test_load_prompt_missing_variable() {
        let template = "Hello, {{ name }}! You are {{ age }} years old.";
        let mut context = HashMap::new();
        context.insert("name".to_string(), "Alice".to_string());

        assert!(load_prompt(template, &context).is_err());
    }

    #[test]
    fn test_system_prompt_renders() {
        let rendered = load_prompt_file("system.md", &json!({})).unwrap();
        assert!(rendered.starts_with("You are an AI Personal Brand Kit Planner."));
        assert!(rendered.contains("Keywords and tags"));
    }

    #[test]
    fn test_search_results_render_numbered() {
        let results = vec![
            SearchResult::new("First", "one", "https://a.example"),
            SearchResult::new("Second & more", "two", "https://b.example"),
        ];
        let rendered = load_prompt_file(
            "search_results.md",
            &json!({ "query": "ai trends", "results": results }),
        )
        .unwrap();

        assert!(rendered.contains("latest search results for \"ai trends\""));
        assert!(rendered.contains("1. **First**\n   one\n   URL: https://a.example"));
        // Plain text templates are not html escaped
        assert!(rendered.contains("2. **Second & more**"));
        assert!(rendered.trim_end().ends_with("informed, up-to-date response."));
    }

    #[test]
    fn test_unknown_template() {
        assert!(load_prompt_file("missing.md", &json!({})).is_err());
    }
}
