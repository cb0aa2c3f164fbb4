//! Prompt construction for AI-generated commit messages.

use crate::commit::diff::{DiffContext, MAX_FILE_DIFF_LINES, MAX_FILES, MAX_LINES_PER_FILE};
use crate::commit::history::HistoryContext;
use crate::error::GenerateError;

const TASK_STATEMENT: &str =
    "Generate a concise and descriptive Git commit message based on the following staged changes.";

const DEFAULT_RULES: &str = r#"Follow these guidelines:
1. Start with a type prefix: one of feat, fix, docs, style, refactor, test, chore (e.g., "feat: add login endpoint")
2. Keep the first line at most 80 characters
3. Use imperative mood (e.g., "Add feature" not "Added feature")
4. After the first line, leave a blank line, then write a short body explaining why the change was made
5. Output ONLY the commit message itself: no explanations, no reasoning, no markdown, no code fences"#;

const COMMIT_CUE: &str = "Commit message:";

/// Instructions asking the model to fill in a user template.
fn template_rules(template: &str) -> String {
    format!(
        r#"Use the following template for your commit message:
{template}

Where:
- <short description> should be a brief summary of changes
- <long description> should provide more context and details

Output ONLY the filled-in commit message: no explanations, no reasoning, no markdown, no code fences."#
    )
}

/// Recent subjects per file, or `None` when no file has any.
fn history_block(history: &HistoryContext) -> Option<String> {
    if !history.has_messages() {
        return None;
    }

    let mut block = String::from(
        "Recent commit history for these files (match its style where it fits):\n",
    );
    for (path, messages) in history.iter().filter(|(_, m)| !m.is_empty()) {
        block.push_str(&format!("\nRecent commit messages for {path}:\n"));
        for message in messages {
            block.push_str(&format!("  - {message}\n"));
        }
    }

    Some(block)
}

fn diff_block(diff: &DiffContext) -> String {
    let count = diff.included_count();
    let noun = if count == 1 { "file" } else { "files" };

    let mut block = format!(
        "Here are the staged changes ({count} {noun}; at most {MAX_FILES} files are considered, \
         files with more than {MAX_FILE_DIFF_LINES} diff lines are left out, \
         and at most the first {MAX_LINES_PER_FILE} diff lines of each file are shown):\n"
    );

    for file in diff.included() {
        block.push_str(&format!("\nFile: {}\n", file.path));
        for line in &file.diff_lines {
            block.push_str(line);
            block.push('\n');
        }
        if file.is_truncated() {
            block.push_str(&format!(
                "[diff truncated: {} more lines not shown]\n",
                file.total_lines - file.diff_lines.len()
            ));
        }
    }

    if diff.omitted_files > 0 {
        block.push_str(&format!(
            "\n[{} more staged files not shown]\n",
            diff.omitted_files
        ));
    }

    block
}

/// Build the LLM prompt for generating a commit message.
///
/// The output depends only on the inputs, so identical staged changes always
/// produce a byte-identical prompt. Returns [`GenerateError::NoSuitableChanges`]
/// when no staged file has usable diff content.
pub fn build_commit_prompt(
    diff: &DiffContext,
    template: Option<&str>,
    history: Option<&HistoryContext>,
) -> Result<String, GenerateError> {
    if !diff.has_usable_content() {
        return Err(GenerateError::NoSuitableChanges);
    }

    let rules = match template {
        Some(template) => template_rules(template),
        None => DEFAULT_RULES.to_string(),
    };

    let mut prompt = format!("{TASK_STATEMENT}\n\n{rules}\n\n");

    if let Some(block) = history.and_then(history_block) {
        prompt.push_str(&block);
        prompt.push('\n');
    }

    prompt.push_str(&diff_block(diff));
    prompt.push('\n');
    prompt.push_str(COMMIT_CUE);
    prompt.push('\n');

    Ok(prompt)
}
