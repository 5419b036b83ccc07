//! Prompt templating and offline mock responses

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::config::Config;

/// Default system prompt for comment generation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "あなたは学習塾の講師です。受講生の日報と理解度をもとに、\
保護者に向けた前向きで具体的な講師コメントを3文程度の日本語で書いてください。\
名前が Person_1 のような仮名になっている場合は、仮名をそのまま使ってください。";

/// Default user prompt template.
pub const DEFAULT_USER_TEMPLATE: &str =
    "受講生名: {{name}}\n理解度: {{understanding}}\n日報コメント: {{comment}}";

const MOCK_HIGH: &str = "{{name}}さんは今週も非常に高い理解度で学習を進めています。\
課題への取り組みも丁寧で、この調子で応用問題にも挑戦していきましょう。";
const MOCK_MEDIUM: &str = "{{name}}さんは安定して学習内容を理解できています。\
復習の時間を少し増やすと、さらに定着が進みそうです。";
const MOCK_LOW: &str = "{{name}}さんは基礎は身についてきていますが、\
理解があいまいな単元が残っています。次回は演習を中心に補強していきます。";
const MOCK_VERY_LOW: &str = "{{name}}さんは今週は難しい単元に苦戦していました。\
基礎に立ち返って、一緒に丁寧に進めていきましょう。";
const MOCK_DEFAULT: &str = "{{name}}さんの今週の学習記録をもとに、引き続きサポートしていきます。";

static VAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{(\w+)\}\}").unwrap());

/// Replace `{{key}}` placeholders with values; unknown keys are left as-is.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let key = &caps[1];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// System prompt and user template, resolved from config overrides.
#[derive(Debug, Clone)]
pub struct PromptConfig {
    pub system: String,
    pub user_template: String,
}

impl PromptConfig {
    pub fn from_config(config: &Config) -> Self {
        PromptConfig {
            system: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            user_template: config
                .user_template
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_TEMPLATE.to_string()),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        PromptConfig {
            system: DEFAULT_SYSTEM_PROMPT.to_string(),
            user_template: DEFAULT_USER_TEMPLATE.to_string(),
        }
    }
}

/// One student's masked data, as taken from a canonical table row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentData {
    pub name: String,
    pub understanding: String,
    pub comment: String,
}

impl StudentData {
    /// Extract from a canonical row (name, understanding, comment).
    /// Returns `None` when the name cell is empty.
    pub fn from_row(row: &[String]) -> Option<Self> {
        let name = row.first().filter(|n| !n.is_empty())?;
        Some(StudentData {
            name: name.clone(),
            understanding: row.get(1).cloned().unwrap_or_default(),
            comment: row.get(2).cloned().unwrap_or_default(),
        })
    }

    /// Render the user prompt for this student.
    pub fn user_prompt(&self, template: &str) -> String {
        render_template(
            template,
            &[
                ("name", &self.name),
                ("understanding", &self.understanding),
                ("comment", &self.comment),
            ],
        )
    }
}

/// Canned comment for offline runs, banded by understanding score.
pub fn mock_response(student: &StudentData) -> String {
    let template = match student.understanding.trim().parse::<i64>().ok() {
        Some(u) if u >= 90 => MOCK_HIGH,
        Some(u) if u >= 80 => MOCK_MEDIUM,
        Some(u) if u >= 60 => MOCK_LOW,
        Some(_) => MOCK_VERY_LOW,
        None => MOCK_DEFAULT,
    };
    render_template(template, &[("name", &student.name)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template() {
        assert_eq!(
            render_template("hi {{name}}, score {{understanding}}", &[
                ("name", "Person_1"),
                ("understanding", "85"),
            ]),
            "hi Person_1, score 85"
        );
    }

    #[test]
    fn test_unknown_keys_left_intact() {
        assert_eq!(
            render_template("{{name}} / {{unknown}}", &[("name", "x")]),
            "x / {{unknown}}"
        );
    }

    #[test]
    fn test_user_prompt_from_row() {
        let row: Vec<String> = vec!["Person_1".into(), "85".into(), "順調".into()];
        let student = StudentData::from_row(&row).unwrap();
        assert_eq!(
            student.user_prompt(DEFAULT_USER_TEMPLATE),
            "受講生名: Person_1\n理解度: 85\n日報コメント: 順調"
        );
    }

    #[test]
    fn test_from_row_requires_name() {
        let row: Vec<String> = vec!["".into(), "85".into()];
        assert_eq!(StudentData::from_row(&row), None);
        assert_eq!(StudentData::from_row(&[]), None);
    }

    #[test]
    fn test_mock_bands() {
        let student = |score: &str| StudentData {
            name: "Person_1".into(),
            understanding: score.into(),
            comment: String::new(),
        };
        assert!(mock_response(&student("95")).contains("非常に高い理解度"));
        assert!(mock_response(&student("85")).contains("安定して"));
        assert!(mock_response(&student("70")).contains("基礎は身について"));
        assert!(mock_response(&student("40")).contains("苦戦"));
        assert!(mock_response(&student("")).contains("引き続きサポート"));
        // every band carries the (masked) name through
        assert!(mock_response(&student("95")).starts_with("Person_1"));
    }
}
