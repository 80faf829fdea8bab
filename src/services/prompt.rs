use crate::notes::Section;
use crate::types::GenerationRequest;

pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that generates release notes from git diffs.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub system: String,
    pub user: String,
}

impl PromptRequest {
    pub fn for_request(request: &GenerationRequest) -> Self {
        let labels = Section::CANONICAL
            .iter()
            .map(|section| section.label())
            .collect::<Vec<_>>()
            .join(", ");

        let user = format!(
            "Write release notes for pull request #{id}: \"{title}\".\n\n\
             Answer with exactly these sections, in this order, each starting on its own line \
             with its label: {labels}\n\
             - {dev} concise and technical: what changed and why, for engineers.\n\
             - {mkt} user-facing: the benefit, in plain language.\n\
             - {contrib} authors or reviewers named in the diff, if any.\n\
             - {issues} issue or ticket references found in the diff, if any.\n\n\
             Diff:\n```diff\n{diff}\n```",
            id = request.id,
            title = request.title,
            dev = Section::Developer.label(),
            mkt = Section::Marketing.label(),
            contrib = Section::Contributors.label(),
            issues = Section::RelatedIssues.label(),
            diff = request.diff,
        );

        Self {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }
}
