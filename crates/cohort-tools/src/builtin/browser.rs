//! Browser tool — page navigation and headless screenshots.
//!
//! `navigate` fetches the page over HTTP and extracts its title, links and
//! forms. `screenshot` drives a headless Chromium-compatible binary.

use crate::error::ToolError;
use crate::traits::{parse_params, Tool, ToolContext, ToolOutput};
use async_trait::async_trait;
use reqwest::Url;
use schemars::JsonSchema;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const MAX_LINKS: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BrowserAction {
    #[default]
    Navigate,
    Screenshot,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BrowserParams {
    /// Page to open.
    pub url: String,
    /// What to do with the page. Default: navigate.
    #[serde(default)]
    pub action: BrowserAction,
    /// Screenshot destination. Defaults to `screenshot.png` in the workspace.
    #[serde(default)]
    pub path: Option<String>,
}

/// A form found on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSummary {
    pub action: String,
    pub method: String,
    pub inputs: Vec<String>,
}

/// What `navigate` reports about a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub url: String,
    pub status: u16,
    pub title: String,
    pub links_count: usize,
    pub forms_count: usize,
    /// First links on the page, resolved against the page URL.
    pub links: Vec<String>,
    pub forms: Vec<FormSummary>,
}

pub struct BrowserTool;

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn resolve(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

fn form_summary(base: &Url, form: ElementRef<'_>, inputs: &Selector) -> FormSummary {
    let attrs = form.value();
    FormSummary {
        action: attrs
            .attr("action")
            .map(|a| resolve(base, a.trim()))
            .unwrap_or_else(|| base.to_string()),
        method: attrs
            .attr("method")
            .map(|m| m.trim().to_uppercase())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "GET".to_string()),
        inputs: form
            .select(inputs)
            .filter_map(|input| input.value().attr("name"))
            .map(str::to_string)
            .collect(),
    }
}

/// Extract title, links and forms from an HTML document.
pub(crate) fn summarize(base: &Url, status: u16, html: &str) -> PageSummary {
    let document = Html::parse_document(html);

    let title = document
        .select(&selector("title"))
        .next()
        .map(|t| collapse_whitespace(&t.text().collect::<String>()))
        .unwrap_or_default();

    let all_links: Vec<String> = document
        .select(&selector("a[href]"))
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty() && !href.starts_with('#'))
        .map(|href| resolve(base, href))
        .collect();

    let inputs = selector("input[name], select[name], textarea[name]");
    let forms: Vec<FormSummary> = document
        .select(&selector("form"))
        .map(|form| form_summary(base, form, &inputs))
        .collect();

    PageSummary {
        url: base.to_string(),
        status,
        title,
        links_count: all_links.len(),
        forms_count: forms.len(),
        links: all_links.into_iter().take(MAX_LINKS).collect(),
        forms,
    }
}

pub(crate) fn screenshot_args(url: &str, path: &str) -> Vec<String> {
    vec![
        "--headless".to_string(),
        "--disable-gpu".to_string(),
        "--window-size=1920,1080".to_string(),
        format!("--screenshot={path}"),
        url.to_string(),
    ]
}

impl BrowserTool {
    async fn navigate(&self, url: &str, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(ctx.settings.browser_timeout_secs))
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) cohort/0.1")
            .build()
            .map_err(|e| ToolError::ExecutionError(format!("Failed to create HTTP client: {e}")))?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| ToolError::ExecutionError(format!("HTTP request failed: {e}")))?;

        let final_url = response.url().clone();
        let status = response.status().as_u16();
        let html = response
            .text()
            .await
            .map_err(|e| ToolError::ExecutionError(format!("Failed to read response: {e}")))?;

        let summary = summarize(&final_url, status, &html);
        tracing::debug!(url = %summary.url, status, links = summary.links_count, "page fetched");
        let mut report = serde_json::to_value(&summary)
            .map_err(|e| ToolError::ExecutionError(e.to_string()))?;
        report["action"] = serde_json::json!("navigate");
        Ok(ToolOutput::success(report.to_string()))
    }

    async fn screenshot(
        &self,
        url: &str,
        path: Option<&str>,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        let path: PathBuf = match path.filter(|p| !p.is_empty()) {
            Some(p) => PathBuf::from(p),
            None => ctx.executor.workspace_dir().join("screenshot.png"),
        };
        let path = path.to_string_lossy().into_owned();

        let mut output = ctx
            .executor
            .run(
                &ctx.settings.browser_binary,
                &screenshot_args(url, &path),
                Duration::from_secs(ctx.settings.browser_timeout_secs),
            )
            .await?;
        if output.success {
            output.stdout = serde_json::json!({"action": "screenshot", "path": path}).to_string();
        }
        Ok(output)
    }
}

#[async_trait]
impl Tool for BrowserTool {
    fn name(&self) -> &str {
        "browser"
    }
    fn description(&self) -> &str {
        "Open a web page to list its title, links and forms, or capture a screenshot."
    }
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(BrowserParams)).unwrap_or_default()
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        let params: BrowserParams = parse_params(args)?;
        let url = params.url.trim();
        Url::parse(url).map_err(|e| ToolError::InvalidParameters(format!("invalid url: {e}")))?;

        match params.action {
            BrowserAction::Navigate => self.navigate(url, ctx).await,
            BrowserAction::Screenshot => self.screenshot(url, params.path.as_deref(), ctx).await,
        }
    }
}
