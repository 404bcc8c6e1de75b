use crate::pkg::internal::adaptors::rubrics::spec::RubricContext;
use crate::pkg::internal::pipeline::spec::StructuredCv;
use crate::prelude::Result;

const EXTRACTION_SCHEMA: &str = r#"{
  "skills": ["string"],
  "experiences": [
    {
      "position": "string",
      "company": "string",
      "startDate": "YYYY-MM",
      "endDate": "YYYY-MM or 'Present'",
      "responsibilities": ["string"]
    }
  ],
  "projects": [
    {
      "projectName": "string",
      "description": "string",
      "technologies": ["string"]
    }
  ]
}"#;

const EVALUATION_SCHEMA: &str = r#"{
  "evaluation_details": [
    {
      "parameter": "string (parameter name exactly as it appears in the rubric)",
      "score": "integer (1-5)",
      "justification": "string (short explanation for the score)"
    }
  ],
  "weighted_average_score": "float (final 1-5 score after applying the weights)",
  "feedback": "string (concise qualitative feedback for the candidate)"
}"#;

fn rubric_lines(rubrics: &[RubricContext]) -> String {
    rubrics
        .iter()
        .map(|r| format!("- {}", r.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn cv_extraction_prompt(cv_text: &str) -> String {
    format!(
        r#"You are a meticulous technical recruitment assistant.
Read the CV text below and extract the key information (skills, experiences, and projects) into the EXACT JSON format given.

RULES:
1. Respond with JSON only.
2. Follow the JSON schema below STRICTLY.
3. If a piece of information cannot be found, use an empty array [].
4. Look for "Projects" or "Portfolio" sections in the CV to fill the project data.

JSON schema to follow:
{EXTRACTION_SCHEMA}

Here is the CV text to process:
---
{cv_text}
---"#
    )
}

pub fn cv_evaluation_prompt(
    structured_cv: &StructuredCv,
    job_description: &str,
    rubrics: &[RubricContext],
) -> Result<String> {
    let cv_json = serde_json::to_string_pretty(structured_cv)?;
    Ok(format!(
        r#"You are an experienced and objective technical hiring manager.
Evaluate the candidate's CV against the job description using the strict scoring rubric below.

--- JOB DESCRIPTION ---
{job_description}
---

--- CANDIDATE CV DATA (JSON) ---
{cv_json}
---

--- SCORING RUBRIC (MUST BE FOLLOWED) ---
{rubrics}
---

INSTRUCTIONS:
1. Compare the candidate's CV data with the job description.
2. For EVERY parameter in the rubric, give a score from 1 to 5 with a short justification. Use each rubric's Scoring Guide to decide the score.
3. Compute the weighted average score using each parameter's Weight: sum of (score * weight) over all parameters.
4. Give concise, professional feedback.
5. Return the whole result as valid JSON matching the schema below. Do NOT add any text outside the JSON.

JSON schema to follow:
{schema}"#,
        rubrics = rubric_lines(rubrics),
        schema = EVALUATION_SCHEMA,
    ))
}

pub fn project_evaluation_prompt(
    report_text: &str,
    brief_text: Option<&str>,
    rubrics: &[RubricContext],
    code_context: Option<&str>,
) -> String {
    format!(
        r#"You are a thorough and objective senior software engineer.
Evaluate the candidate's project report against the study case brief using the strict scoring rubric below.

--- STUDY CASE BRIEF (EXPECTATIONS) ---
{brief}
---

--- CANDIDATE PROJECT REPORT ---
{report_text}
---

--- CODE EXCERPTS FROM THE CANDIDATE'S REPOSITORY (IF ANY) ---
{code}
---

--- SCORING RUBRIC (MUST BE FOLLOWED) ---
{rubrics}
---

INSTRUCTIONS:
1. Compare the project report against the study case brief.
2. Give a score (1-5) and a justification for EVERY parameter in the rubric.
3. For code-related parameters, treat the code excerpts as your primary reference when available.
4. For bonus-related parameters, look specifically at "Future Improvements" or "Bonus Work" sections of the report.
5. Compute the weighted average score using each parameter's weight.
6. Return the whole result as valid JSON matching the schema below. Do NOT add any text outside the JSON.

JSON schema to follow:
{schema}"#,
        brief = brief_text.unwrap_or("No study case brief was provided."),
        code = code_context.unwrap_or("Code could not be retrieved or is unavailable."),
        rubrics = rubric_lines(rubrics),
        schema = EVALUATION_SCHEMA,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::internal::adaptors::rubrics::spec::RubricContext;

    fn sample_rubrics() -> Vec<RubricContext> {
        vec![RubricContext {
            content: "Parameter: Correctness. Weight: 30%. Scoring Guide: 1-5.".into(),
        }]
    }

    #[test]
    fn test_extraction_prompt_carries_schema_and_cv() {
        let prompt = cv_extraction_prompt("Skills: Go, SQL");
        assert!(prompt.contains("\"experiences\""));
        assert!(prompt.contains("Skills: Go, SQL"));
    }

    #[test]
    fn test_cv_evaluation_prompt_lists_every_rubric() {
        let prompt = cv_evaluation_prompt(
            &Default::default(),
            "Backend engineer role",
            &sample_rubrics(),
        )
        .unwrap();
        assert!(prompt.contains("- Parameter: Correctness."));
        assert!(prompt.contains("Backend engineer role"));
        assert!(prompt.contains("weighted_average_score"));
    }

    #[test]
    fn test_project_prompt_marks_missing_code() {
        let prompt = project_evaluation_prompt("report body", None, &sample_rubrics(), None);
        assert!(prompt.contains("Code could not be retrieved or is unavailable."));
        assert!(prompt.contains("No study case brief was provided."));
    }

    #[test]
    fn test_project_prompt_embeds_fetched_code() {
        let prompt = project_evaluation_prompt(
            "report body",
            Some("build a queue"),
            &sample_rubrics(),
            Some("// FILE: src/main.rs\nfn main() {}"),
        );
        assert!(prompt.contains("// FILE: src/main.rs"));
        assert!(prompt.contains("build a queue"));
    }
}
