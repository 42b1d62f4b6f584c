//! Prompt and schema construction for analysis and follow-up calls.
//!
//! Construction is pure: templates are bundled with the crate and rendered with
//! minijinja, so the only possible failure is a broken bundled template.

use crate::analysis::AnalysisResult;
use crate::error::Result;
use crate::generation::ResponseSchema;
use minijinja::{Environment, context};

const ANALYSIS_TEMPLATE: &str = r#"Perform a deep, exhaustive analysis of the website: {{ domain }}.
First, use Google Search to discover the main pages and subdirectories of this domain.
Then synthesize a comprehensive report covering:
1. A high-level executive summary.
2. What the website does (business goals).
3. How it works (technical architecture, user flows and integrations).
4. A full requirements list (functional, technical, user experience).
5. A map of the site structure (main pages and their roles).

Only list page URLs that really exist on the domain.
IMPORTANT: Return ONLY the JSON object. Do not include markdown formatting or citations inside JSON strings."#;

const FOLLOW_UP_TEMPLATE: &str = r#"Context: you have already performed an initial scan of the website {{ domain }}.
Initial analysis: {{ analysis_json }}

The user now asks a follow-up question: "{{ question }}"

Instructions:
1. If the question asks for details that are not present in the initial analysis, use Google Search to deep-dive into the site.
2. Otherwise answer from the initial analysis without searching.
3. Provide a detailed, professional answer."#;

/// Instruction for the schema-constrained analysis call.
pub fn analysis_prompt(domain: &str) -> Result<String> {
    let env = Environment::new();
    Ok(env.render_str(ANALYSIS_TEMPLATE, context! { domain => domain })?)
}

/// Output schema mirroring [`AnalysisResult`] without its sources.
pub fn analysis_schema() -> ResponseSchema {
    let string_list = || ResponseSchema::array(ResponseSchema::string());

    ResponseSchema::object([
        ("url", ResponseSchema::string()),
        ("summary", ResponseSchema::string()),
        ("purpose", ResponseSchema::string()),
        ("howItWorks", ResponseSchema::string()),
        (
            "requirements",
            ResponseSchema::object([
                ("functional", string_list()),
                ("technical", string_list()),
                ("userExperience", string_list()),
            ]),
        ),
        (
            "structure",
            ResponseSchema::array(ResponseSchema::object([
                ("page", ResponseSchema::string()),
                ("description", ResponseSchema::string()),
            ])),
        ),
    ])
}

/// Instruction for a free-form follow-up question about a prior analysis.
pub fn follow_up_prompt(domain: &str, analysis: &AnalysisResult, question: &str) -> Result<String> {
    let analysis_json = serde_json::to_string(analysis)?;
    let env = Environment::new();
    Ok(env.render_str(
        FOLLOW_UP_TEMPLATE,
        context! {
            domain => domain,
            analysis_json => analysis_json,
            question => question,
        },
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisDraft;
    use crate::generation::SchemaType;

    fn sample_result() -> AnalysisResult {
        let draft: AnalysisDraft = serde_json::from_str(
            r#"{"url":"https://a.com","summary":"Billing SaaS","purpose":"p","howItWorks":"h",
                "requirements":{"functional":[],"technical":[],"userExperience":[]},
                "structure":[{"page":"/pricing","description":"Plan 3 & more"}]}"#,
        )
        .unwrap();
        draft.with_sources(vec![])
    }

    #[test]
    fn test_analysis_prompt_mentions_domain_and_search() {
        let prompt = analysis_prompt("https://a.com").unwrap();
        assert!(prompt.contains("website: https://a.com."));
        assert!(prompt.contains("Google Search"));
        assert!(prompt.contains("Return ONLY the JSON object"));
    }

    #[test]
    fn test_schema_requires_every_report_field() {
        let schema = analysis_schema();
        assert_eq!(schema.schema_type, SchemaType::Object);
        for field in ["url", "summary", "purpose", "howItWorks", "requirements", "structure"] {
            assert!(schema.required.iter().any(|r| r == field), "{field} missing");
        }
        assert!(!schema.properties.contains_key("sources"));

        let requirements = &schema.properties["requirements"];
        assert_eq!(requirements.required.len(), 3);

        let structure = &schema.properties["structure"];
        assert_eq!(structure.schema_type, SchemaType::Array);
        let page = structure.items.as_ref().unwrap();
        assert_eq!(page.required, vec!["page".to_string(), "description".to_string()]);
    }

    #[test]
    fn test_follow_up_prompt_embeds_context_unescaped() {
        let prompt =
            follow_up_prompt("https://a.com", &sample_result(), "What does \"Plan 3\" cost?").unwrap();
        assert!(prompt.contains("\"summary\":\"Billing SaaS\""));
        assert!(prompt.contains("Plan 3 & more"));
        assert!(prompt.contains("\"What does \"Plan 3\" cost?\""));
        assert!(prompt.contains("use Google Search to deep-dive"));
    }
}
