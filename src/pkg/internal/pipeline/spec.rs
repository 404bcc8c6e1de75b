use serde::{Deserialize, Deserializer, Serialize};

/// Structured CV produced by the extraction call. Sections the model cannot
/// find come back as empty lists, never as missing keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredCv {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<CvProject>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvProject {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
}

/// Shared response shape of both evaluation calls: per-parameter scores with
/// justifications, a weighted average on a 1-5 scale, and free-text feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    #[serde(default)]
    pub evaluation_details: Vec<ParameterScore>,
    pub weighted_average_score: f64,
    #[serde(deserialize_with = "deserialize_clean_string")]
    pub feedback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterScore {
    pub parameter: String,
    pub score: f64,
    #[serde(default)]
    pub justification: String,
}

/// Final result payload stored on the job at the COMPLETED transition.
/// `cv_match_rate` is a 0-1 fraction; `project_score` stays on the 1-5
/// rubric scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub cv_match_rate: f64,
    pub cv_feedback: String,
    pub project_score: f64,
    pub project_feedback: String,
    pub overall_summary: String,
}

fn deserialize_clean_string<'de, D>(deserializer: D) -> core::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(s.replace("\r\n", " ")
        .replace('\n', " ")
        .replace("  ", " ")
        .trim()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::{EvaluationOutcome, StructuredCv};

    #[test]
    fn test_missing_cv_sections_default_to_empty_lists() {
        let cv: StructuredCv = serde_json::from_str(r#"{"skills": ["Go", "SQL"]}"#).unwrap();
        assert_eq!(cv.skills, vec!["Go", "SQL"]);
        assert!(cv.experiences.is_empty());
        assert!(cv.projects.is_empty());
    }

    #[test]
    fn test_extraction_shape_roundtrip() {
        let raw = r#"{
            "skills": ["Go"],
            "experiences": [{
                "position": "Backend Engineer",
                "company": "Acme",
                "startDate": "2020-01",
                "endDate": "Present",
                "responsibilities": ["APIs"]
            }],
            "projects": [{
                "projectName": "evaluator",
                "description": "scoring service",
                "technologies": ["Postgres"]
            }]
        }"#;
        let cv: StructuredCv = serde_json::from_str(raw).unwrap();
        assert_eq!(cv.experiences[0].start_date, "2020-01");
        assert_eq!(cv.projects[0].project_name, "evaluator");
    }

    #[test]
    fn test_feedback_newlines_are_flattened() {
        let raw = r#"{
            "evaluation_details": [],
            "weighted_average_score": 3.6,
            "feedback": "strong backend\nexperience"
        }"#;
        let outcome: EvaluationOutcome = serde_json::from_str(raw).unwrap();
        assert_eq!(outcome.feedback, "strong backend experience");
    }
}
