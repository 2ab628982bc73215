//! Prompt assembly for the review model.

use crate::github::PrInfo;

/// System prompt defining the review contract.
///
/// The model must return a bare JSON object; the reply parser still
/// tolerates fenced or plain-text replies.
pub const SYSTEM_PROMPT: &str = r#"You are a senior code reviewer. Review the following pull request thoroughly.

Focus on:
1. Code quality: naming, structure, readability
2. Potential bugs: logic errors, boundary conditions, missing error handling
3. Security: leaked secrets, injection risks, permission problems
4. Performance: needless work, leaks, N+1 access patterns
5. Best practices: idiomatic use of the language and its libraries

Consider not only the changed lines (+/-) but also the surrounding context
shown in the diff, and whether the change is consistent with it.

Return strictly the following JSON shape (a bare JSON object, not wrapped in
a markdown code block):

{
  "summary": "Overall assessment in markdown: strengths, issues grouped by severity, and a merge recommendation",
  "comments": [
    {
      "path": "file path, exactly as shown after '=== File:' in the diff",
      "line": <integer line number>,
      "body": "the finding"
    }
  ]
}

Rules:
- comments contain only problems and improvement suggestions, each tied to a
  specific line; positive remarks belong in summary only
- start each comment body with [must-fix] or [suggestion]
- line must be a line that carries a number in the left margin of the diff
- if the code has no issues, return an empty comments array
"#;

/// Build the user prompt: PR metadata, changed-file list, and the
/// line-numbered diff.
pub fn build_review_prompt(info: &PrInfo, annotated_diff: &str) -> String {
    let file_summary = if info.files.is_empty() {
        "(file list unavailable)".to_string()
    } else {
        info.files
            .iter()
            .map(|f| format!("  - {} (+{} -{})", f.path, f.additions, f.deletions))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let body = match info.body.as_deref() {
        Some(body) if !body.trim().is_empty() => body,
        _ => "(no description)",
    };

    format!(
        "## Pull request\n\n\
         - **Title**: {title}\n\
         - **Author**: {author}\n\
         - **Branches**: {head} -> {base}\n\
         - **Change size**: +{additions} -{deletions}\n\n\
         ### Description\n{body}\n\n\
         ### Changed files\n{files}\n\n\
         ### Diff (left margin numbers are new-file line numbers)\n{diff}\n\n\
         Review the changes above. Use the path shown after \"=== File:\" and \
         the line numbers from the left margin.\n",
        title = info.title,
        author = info.author.login,
        head = info.head_ref_name,
        base = info.base_ref_name,
        additions = info.additions,
        deletions = info.deletions,
        body = body,
        files = file_summary,
        diff = annotated_diff,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{Author, ChangedFile};

    fn sample_info() -> PrInfo {
        PrInfo {
            title: "Fix pagination".to_string(),
            body: Some("Off-by-one in the cursor.".to_string()),
            author: Author {
                login: "dev".to_string(),
            },
            base_ref_name: "main".to_string(),
            head_ref_name: "fix/pagination".to_string(),
            additions: 4,
            deletions: 1,
            files: vec![ChangedFile {
                path: "src/page.rs".to_string(),
                additions: 4,
                deletions: 1,
            }],
        }
    }

    #[test]
    fn prompt_includes_metadata_and_diff() {
        let prompt = build_review_prompt(&sample_info(), "=== File: src/page.rs ===\n     1 | +x");
        assert!(prompt.contains("**Title**: Fix pagination"));
        assert!(prompt.contains("**Author**: dev"));
        assert!(prompt.contains("fix/pagination -> main"));
        assert!(prompt.contains("+4 -1"));
        assert!(prompt.contains("- src/page.rs (+4 -1)"));
        assert!(prompt.contains("=== File: src/page.rs ==="));
    }

    #[test]
    fn prompt_handles_missing_body_and_files() {
        let mut info = sample_info();
        info.body = None;
        info.files.clear();
        let prompt = build_review_prompt(&info, "");
        assert!(prompt.contains("(no description)"));
        assert!(prompt.contains("(file list unavailable)"));
    }

    #[test]
    fn system_prompt_states_the_json_contract() {
        assert!(SYSTEM_PROMPT.contains("\"summary\""));
        assert!(SYSTEM_PROMPT.contains("\"comments\""));
        assert!(SYSTEM_PROMPT.contains("=== File:"));
    }
}
