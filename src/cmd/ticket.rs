use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::OutputFormat;
use crate::context::AppContext;
use crate::domain::ticket::{Resolution, TicketInput};
use crate::error::{AppError, AppResult};
use crate::workflow::ticket::fallback_resolution;

#[derive(Debug, Clone)]
pub struct TicketCommandArgs {
    /// JSON file to read; `None` or `-` reads stdin.
    pub input: Option<PathBuf>,
}

pub async fn analyze(ctx: &AppContext, args: TicketCommandArgs) -> AppResult<Resolution> {
    let payload = read_payload(args.input.as_deref())?;
    let ticket = TicketInput::from_value(payload);
    Ok(ctx.processor.process(&ticket, &ctx.config.templates).await)
}

pub async fn batch(ctx: &AppContext, args: TicketCommandArgs) -> AppResult<Vec<Resolution>> {
    let payload = read_payload(args.input.as_deref())?;
    let Value::Array(tickets) = payload else {
        return Err(AppError::Ticket(
            "batch input must be a JSON array of tickets".to_string(),
        ));
    };
    debug!(tickets = tickets.len(), "starting batch");

    let templates = Arc::new(ctx.config.templates.clone());
    let handles: Vec<_> = tickets
        .into_iter()
        .map(|payload| {
            let ticket = TicketInput::from_value(payload);
            let ticket_id = ticket.id();
            let processor = Arc::clone(&ctx.processor);
            let templates = Arc::clone(&templates);
            let handle =
                tokio::spawn(async move { processor.process(&ticket, &templates).await });
            (ticket_id, handle)
        })
        .collect();

    let mut resolutions = Vec::with_capacity(handles.len());
    for (ticket_id, handle) in handles {
        let resolution = match handle.await {
            Ok(resolution) => resolution,
            Err(err) => {
                warn!(%ticket_id, error = %err, "ticket task aborted");
                fallback_resolution(ticket_id)
            }
        };
        resolutions.push(resolution);
    }
    Ok(resolutions)
}

fn read_payload(input: Option<&Path>) -> AppResult<Value> {
    let raw = match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)?,
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    Ok(serde_json::from_str(&raw)?)
}

pub fn render(resolutions: &[Resolution], format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(resolutions)?),
        OutputFormat::Text => Ok(resolutions
            .iter()
            .map(render_text)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn render_text(resolution: &Resolution) -> String {
    let analysis = &resolution.analysis;
    let response = &resolution.response;
    let mut out = String::new();

    let _ = writeln!(out, "Ticket {}", resolution.ticket_id);
    let _ = writeln!(
        out,
        "  Category: {}  Priority: {} ({})  Business impact: {}",
        analysis.category,
        analysis.priority,
        analysis.priority.level(),
        analysis.business_impact
    );
    let _ = writeln!(
        out,
        "  Sentiment: {:.2}  Expertise: {}",
        analysis.sentiment,
        analysis.required_expertise.join(", ")
    );
    if !analysis.urgency_indicators.is_empty() {
        let _ = writeln!(out, "  Urgency: {}", analysis.urgency_indicators.join(", "));
    }
    if !analysis.key_points.is_empty() {
        let _ = writeln!(out, "  Key points:");
        for point in &analysis.key_points {
            let _ = writeln!(out, "    - {point}");
        }
    }
    if let Some(prediction) = analysis
        .follow_up_prediction
        .as_deref()
        .filter(|prediction| !prediction.is_empty())
    {
        let _ = writeln!(out, "  Follow-up: {prediction}");
    }
    let approval = if response.requires_approval {
        "approval required"
    } else {
        "auto-send"
    };
    let _ = writeln!(
        out,
        "  Confidence: {:.2} ({approval})",
        response.confidence_score
    );
    let _ = writeln!(out, "  Actions:");
    for action in &response.suggested_actions {
        let _ = writeln!(out, "    - {action}");
    }
    let _ = writeln!(out, "  Response:");
    for line in response.response_text.trim().lines() {
        let _ = writeln!(out, "    {line}");
    }
    out
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use super::*;
    use crate::config::{AppConfig, StoredConfig};
    use crate::domain::analysis::Category;
    use crate::infra::{TeraTemplateRenderer, VaderSentimentScorer};
    use crate::workflow::ticket::FALLBACK_RESPONSE_TEXT;

    fn context() -> AppContext {
        AppContext::new(
            AppConfig::from_stored(&StoredConfig::default()).unwrap(),
            Arc::new(VaderSentimentScorer::new()),
            Arc::new(TeraTemplateRenderer::new()),
        )
    }

    fn write_input(contents: &str) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), contents).unwrap();
        file
    }

    fn args(file: &NamedTempFile) -> TicketCommandArgs {
        TicketCommandArgs {
            input: Some(file.path().to_path_buf()),
        }
    }

    #[test]
    fn text_output_lists_analysis_and_reply() {
        let resolution = fallback_resolution("TKT-9".to_string());

        let text = render(&[resolution], OutputFormat::Text).unwrap();

        assert!(text.starts_with("Ticket TKT-9\n"));
        assert!(text.contains("Category: TECHNICAL  Priority: LOW (1)  Business impact: Low"));
        assert!(text.contains("Confidence: 0.00 (approval required)"));
        assert!(text.contains("    - Review error logs"));
        assert!(text.contains(&format!("    {FALLBACK_RESPONSE_TEXT}")));
    }

    #[test]
    fn json_output_is_an_array_of_resolutions() {
        let resolutions = vec![
            fallback_resolution("a".to_string()),
            fallback_resolution("b".to_string()),
        ];

        let json = render(&resolutions, OutputFormat::Json).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed[1]["ticket_id"], "b");
        assert_eq!(parsed[0]["analysis"]["category"], "technical");
        assert_eq!(parsed[0]["analysis"]["priority"], "LOW");
        assert_eq!(parsed[0]["analysis"]["business_impact"], "Low");
        assert_eq!(parsed[0]["response"]["requires_approval"], true);
    }

    #[test]
    fn reads_ticket_payload_from_file() {
        let file = write_input(r#"{ "id": "TKT-1", "content": "hi" }"#);

        let payload = read_payload(Some(file.path())).unwrap();

        assert_eq!(payload["id"], "TKT-1");
        assert!(matches!(
            read_payload(Some(Path::new("/nonexistent/ticket.json"))),
            Err(AppError::Io(_))
        ));
    }

    #[tokio::test]
    async fn analyze_processes_a_single_ticket() {
        let file = write_input(
            r#"{ "id": "TKT-5", "content": "The server is down", "customer_info": { "role": "CTO" } }"#,
        );

        let resolution = analyze(&context(), args(&file)).await.unwrap();

        assert_eq!(resolution.ticket_id, "TKT-5");
        assert_eq!(resolution.analysis.category, Category::Technical);
    }

    #[tokio::test]
    async fn batch_keeps_input_order_and_isolates_failures() {
        let file = write_input(
            r#"[
                { "id": "A", "content": "Question about my invoice" },
                { "id": "B" },
                { "id": "C", "content": "The server is down" }
            ]"#,
        );

        let resolutions = batch(&context(), args(&file)).await.unwrap();

        let ids: Vec<&str> = resolutions.iter().map(|r| r.ticket_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(resolutions[0].analysis.category, Category::Billing);
        assert_eq!(resolutions[1].response.response_text, FALLBACK_RESPONSE_TEXT);
        assert_eq!(resolutions[2].analysis.category, Category::Technical);
    }

    #[tokio::test]
    async fn batch_rejects_non_array_input() {
        let file = write_input(r#"{ "id": "A", "content": "hi" }"#);

        let result = batch(&context(), args(&file)).await;

        assert!(matches!(result, Err(AppError::Ticket(_))));
    }
}
