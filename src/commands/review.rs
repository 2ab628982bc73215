//! The `review` command: fetch, annotate, ask the model, report, publish.

use crate::cli::ReviewArgs;
use crate::config::Config;
use crate::diff::process_diff;
use crate::error::Result;
use crate::events::{append_event, Event, EventAction};
use crate::github::{self, GhCli};
use crate::llm::{ChatClient, ChatMessage};
use crate::prompt::{build_review_prompt, SYSTEM_PROMPT};
use crate::review::{append_skipped, parse_review, partition_by_address};
use serde_json::json;
use std::path::Path;

/// Run a full review of one pull request.
pub fn cmd_review(args: ReviewArgs) -> Result<()> {
    let config = load_config(&args)?;
    let gh = GhCli::from_command(&config.gh_command)?;

    println!("Fetching PR #{}...", args.pr_number);
    let mut info = github::pr_info(&gh, args.pr_number)?;
    println!("  Title:   {}", info.title);
    println!("  Author:  {}", info.author.login);
    println!("  Changes: +{} -{}", info.additions, info.deletions);

    println!("Fetching diff...");
    let diff = github::pr_diff(&gh, args.pr_number)?;
    if diff.is_empty() {
        println!("PR has no code changes; nothing to review.");
        return Ok(());
    }

    let options = config.engine_options()?;
    let processed = process_diff(&diff, &options);
    if processed.truncated {
        println!(
            "  note: diff is large ({} chars), truncated to {} chars",
            diff.chars().count(),
            config.max_diff_chars
        );
    }
    for path in &processed.excluded_tests {
        println!("  skipping test file: {}", path);
    }
    for path in &processed.excluded_blank {
        println!("  skipping whitespace-only change: {}", path);
    }

    info.files = github::pr_files(&gh, args.pr_number)?;
    println!("  Changed files: {}", info.files.len());

    let client = ChatClient::from_config(&config)?;
    println!("Reviewing with {}...", client.model());
    let messages = [
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_review_prompt(&info, &processed.annotated)),
    ];
    let raw_reply = client.chat(&messages, true)?;

    let review = parse_review(&raw_reply);
    let (valid, skipped) = partition_by_address(review.comments, &processed.addresses);

    println!("{}", "=".repeat(60));
    println!("Review of PR #{}", args.pr_number);
    println!("{}", "=".repeat(60));
    println!();
    println!("Summary:\n{}", review.summary);
    println!();
    if valid.is_empty() && skipped.is_empty() {
        println!("No inline comments.");
    } else {
        println!("Inline comments ({}):", valid.len() + skipped.len());
        for (i, comment) in valid.iter().chain(skipped.iter()).enumerate() {
            println!("  [{}] {}:{}", i + 1, comment.path, comment.line);
            println!("      {}", comment.body);
        }
    }
    println!("{}", "=".repeat(60));

    let mut posted_comments = 0;
    if args.post_comment {
        let summary = append_skipped(&review.summary, &skipped);
        let body = format!(
            "## AI Code Review\n\n{}\n\n---\n_Generated automatically; treat as advisory._",
            summary
        );
        github::post_review(&gh, args.pr_number, &body, &valid)?;
        posted_comments = valid.len();
        println!(
            "Review posted ({} inline comments + summary).",
            posted_comments
        );
        if !skipped.is_empty() {
            println!(
                "  note: {} comments had no matching diff line and were folded into the summary.",
                skipped.len()
            );
        }
    } else {
        println!();
        println!("Hint: pass --post-comment to publish this review to the PR.");
    }

    if config.log_events {
        let action = if args.post_comment {
            EventAction::Post
        } else {
            EventAction::Review
        };
        let event = Event::new(action, args.pr_number).with_details(json!({
            "model": config.model,
            "comments": valid.len() + skipped.len(),
            "posted": posted_comments,
            "skipped": skipped.len(),
            "excluded_tests": processed.excluded_tests,
            "excluded_blank": processed.excluded_blank,
            "truncated": processed.truncated,
        }));
        // Best-effort: a failed log write never fails the review.
        if let Err(e) = append_event(Path::new("."), &event) {
            eprintln!("Warning: failed to log review event: {}", e);
        }
    }

    Ok(())
}

fn load_config(args: &ReviewArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(".")?,
    };
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(max_diff_chars) = args.max_diff_chars {
        config.max_diff_chars = max_diff_chars;
    }
    config.validate()?;
    Ok(config)
}
