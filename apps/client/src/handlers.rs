//! Command handlers.
//!
//! Each handler validates its input, talks to the backend through `AppState`
//! and delivers the resume to the outputs the user asked for. Every failure
//! comes back as an `AppError`; `notify_error` turns it into the message the
//! user sees.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::accessor::normalize;
use crate::api_client::RelayResponse;
use crate::cli::{Command, OutputArgs};
use crate::errors::AppError;
use crate::export::{print_title, ExportError};
use crate::input::{load_job_description, read_text_arg, require_text, InputError};
use crate::models::ResumeEnvelope;
use crate::relay_flow::RelayFlow;
use crate::render::html::to_html;
use crate::render::render;
use crate::state::AppState;

const PROFILE_FIELD: &str = "your profile information";
const JOB_FIELD: &str = "the job description";

// ────────────────────────────────────────────────────────────────────────────
// Outcomes
// ────────────────────────────────────────────────────────────────────────────

/// What a generation or render command produced.
#[derive(Debug, Default)]
pub struct Delivery {
    pub pdf: Option<PathBuf>,
    pub html: Option<PathBuf>,
    pub printed: bool,
    pub relay: Option<RelayResponse>,
    /// Command output for stdout, written only once every output has succeeded.
    pub stdout: String,
}

pub fn notify_success(message: &str) {
    eprintln!("✓ {message}");
}

/// Shows `err` to the user: a JSON error body on stdout with `--json`,
/// otherwise a one-line message on stderr.
pub fn notify_error(err: &AppError, as_json: bool) {
    debug!("{err:?}");
    if as_json {
        let body = json!({
            "error": {
                "code": err.code(),
                "message": err.user_message()
            }
        });
        println!("{body}");
    } else {
        eprintln!("✗ {}", err.user_message());
    }
}

/// Whether failures of `command` should be reported as JSON.
pub fn wants_json(command: &Command) -> bool {
    match command {
        Command::Health => false,
        Command::Generate { output, .. }
        | Command::Tailor { output, .. }
        | Command::Render { output, .. } => output.json,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

pub async fn run(state: &AppState, command: Command) -> Result<(), AppError> {
    match command {
        Command::Health => handle_health(state).await,
        Command::Generate { profile, output } => {
            handle_generate(state, &profile, &output).await.map(emit)
        }
        Command::Tailor {
            profile,
            job,
            job_file,
            output,
        } => handle_tailor(state, &profile, job.as_deref(), job_file.as_deref(), &output)
            .await
            .map(emit),
        Command::Render { input, output } => {
            handle_render(state, &input, &output).await.map(emit)
        }
    }
}

fn emit(delivery: Delivery) {
    if !delivery.stdout.is_empty() {
        println!("{}", delivery.stdout);
    }
}

/// `health`
///
/// Prints the probe result as JSON. An unhealthy backend is an error so the
/// exit code reflects it.
pub async fn handle_health(state: &AppState) -> Result<(), AppError> {
    let health = state.client.probe_health().await;
    println!("{}", to_pretty_json(&health)?);

    if health.is_healthy {
        notify_success(&health.message);
        Ok(())
    } else {
        Err(AppError::Unhealthy(health.message))
    }
}

/// `generate`
pub async fn handle_generate(
    state: &AppState,
    profile: &str,
    output: &OutputArgs,
) -> Result<Delivery, AppError> {
    let profile = read_text_arg(profile).await?;
    let profile = require_text(PROFILE_FIELD, &profile)?;

    ensure_healthy(state).await?;

    info!("Generating resume");
    let envelope = state.client.generate_resume(profile).await?;
    notify_success("Resume generated successfully!");

    deliver(state, &envelope, output).await
}

/// `tailor`
///
/// The job description comes from `--job` text or a `--job-file` upload.
pub async fn handle_tailor(
    state: &AppState,
    profile: &str,
    job: Option<&str>,
    job_file: Option<&Path>,
    output: &OutputArgs,
) -> Result<Delivery, AppError> {
    let profile = read_text_arg(profile).await?;
    let profile = require_text(PROFILE_FIELD, &profile)?;

    let job = match job_file {
        Some(path) => load_job_description(path).await?,
        None => job.unwrap_or_default().to_string(),
    };
    let job = require_text(JOB_FIELD, &job)?;

    ensure_healthy(state).await?;

    info!("Generating tailored resume");
    let envelope = state.client.generate_tailored_resume(profile, job).await?;
    notify_success("Resume generated successfully!");

    deliver(state, &envelope, output).await
}

/// `render`
///
/// Reads a saved response from disk. No backend call unless `--whatsapp` is given.
pub async fn handle_render(
    state: &AppState,
    input: &Path,
    output: &OutputArgs,
) -> Result<Delivery, AppError> {
    let raw = tokio::fs::read_to_string(input)
        .await
        .map_err(|source| InputError::Read {
            path: input.to_path_buf(),
            source,
        })?;
    let value: Value = serde_json::from_str(&raw)
        .map_err(|e| AppError::MalformedResponse(format!("{}: {e}", input.display())))?;

    deliver(state, &ResumeEnvelope::new(value), output).await
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn ensure_healthy(state: &AppState) -> Result<(), AppError> {
    let health = state.client.probe_health().await;
    if health.is_healthy {
        debug!("Backend healthy via {:?}", health.endpoint);
        Ok(())
    } else {
        Err(AppError::Unhealthy(health.message))
    }
}

/// Normalizes and renders the envelope, then runs each requested output in order.
/// Stops at the first failing output. Text for stdout (`--json`, or the plain
/// rendering when nothing else was asked for) is returned in `Delivery::stdout`
/// so a failed command never leaves partial output behind.
pub async fn deliver(
    state: &AppState,
    envelope: &ResumeEnvelope,
    output: &OutputArgs,
) -> Result<Delivery, AppError> {
    if let Some(reason) = envelope.backend_error() {
        return Err(AppError::MalformedResponse(reason.to_string()));
    }

    let resume = normalize(envelope.as_value());
    let doc = render(&resume);
    let mut delivery = Delivery::default();

    if output.is_empty() {
        delivery.stdout = doc.to_text();
        return Ok(delivery);
    }

    if let Some(path) = &output.html {
        let page = to_html(&doc, &print_title(&resume), "");
        tokio::fs::write(path, page)
            .await
            .map_err(ExportError::from)?;
        notify_success(&format!("HTML written to {}", path.display()));
        delivery.html = Some(path.clone());
    }

    if output.pdf {
        let exporter = state.exporter.clone();
        let out_dir = output.out_dir.clone();
        let (resume, doc) = (resume.clone(), doc.clone());
        // rasterizing is CPU-bound
        let path = tokio::task::spawn_blocking(move || exporter.to_file(&resume, &doc, &out_dir))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;
        notify_success(&format!("PDF downloaded successfully: {}", path.display()));
        delivery.pdf = Some(path);
    }

    if output.print {
        state.exporter.print(&resume, &doc)?;
        delivery.printed = true;
    }

    if let Some(phone) = &output.whatsapp {
        let mut flow = RelayFlow::new();
        let sent = flow.submit(state.relay.as_ref(), phone, &resume).await;
        debug!("Messaging flow ended in {:?}", flow.state());
        let response = sent?;
        if response.message.is_empty() {
            notify_success("Resume sent to WhatsApp successfully!");
        } else {
            notify_success(&response.message);
        }
        delivery.relay = Some(response);
    }

    if output.json {
        delivery.stdout = to_pretty_json(&resume)?;
    }

    Ok(delivery)
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Internal(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::ApiClient;
    use crate::config::{BuildMode, Config};
    use crate::export::capture::{CapturedImage, NodeCapture};
    use crate::export::pdf::PdfComposer;
    use crate::export::print::PrintDriver;
    use crate::export::Exporter;
    use crate::relay_flow::{MessagingRelay, RelayFlowError};
    use crate::render::Document;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct BlankCapture;

    impl NodeCapture for BlankCapture {
        fn capture(&self, _doc: &Document) -> Result<CapturedImage, ExportError> {
            Ok(CapturedImage {
                rgba: vec![255; 4],
                width_px: 1,
                height_px: 1,
            })
        }
    }

    struct StubComposer;

    impl PdfComposer for StubComposer {
        fn compose(&self, _image: &CapturedImage, _title: &str) -> Result<Vec<u8>, ExportError> {
            Ok(b"%PDF-1.3".to_vec())
        }
    }

    struct NoPrint;

    impl PrintDriver for NoPrint {
        fn print(&self, _html: &str, _title: &str) -> Result<(), ExportError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingRelay {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MessagingRelay for CountingRelay {
        async fn send(&self, _phone_number: &str, _text: &str) -> RelayResponse {
            self.calls.fetch_add(1, Ordering::SeqCst);
            RelayResponse {
                success: true,
                message: "Resume sent (demo mode)".into(),
                is_demo_mode: Some(true),
            }
        }
    }

    fn state_for(server: &MockServer, relay: Arc<CountingRelay>) -> AppState {
        let config = Config::with_api_url(format!("{}/api", server.uri()), BuildMode::Development);
        let client = ApiClient::new(&config).unwrap();
        AppState {
            config,
            client,
            relay,
            exporter: Exporter::new(
                Arc::new(BlankCapture),
                Arc::new(StubComposer),
                Arc::new(NoPrint),
            ),
        }
    }

    async fn mount_healthy(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/v1/resume/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "UP" })))
            .mount(server)
            .await;
    }

    fn generated() -> Value {
        json!({
            "think": "...",
            "data": {
                "personalInformation": { "fullName": "Jane Doe", "email": "jane@example.com" },
                "experience": [{ "company": "Acme", "jobTitle": "Engineer", "responsibilities": ["Built APIs"] }],
                "skills": [{ "title": "Rust" }]
            }
        })
    }

    #[tokio::test]
    async fn test_blank_profile_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let state = state_for(&server, Arc::default());

        let err = handle_generate(&state, "   ", &OutputArgs::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::Missing(_))));
        assert_eq!(err.user_message(), "Please provide your profile information");
    }

    #[tokio::test]
    async fn test_unhealthy_backend_skips_generation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/resume/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(generated()))
            .expect(0)
            .mount(&server)
            .await;
        let state = state_for(&server, Arc::default());

        let err = handle_generate(&state, "Jane Doe, engineer", &OutputArgs::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unhealthy(_)));
        assert!(err.user_message().starts_with("Backend error: "));
    }

    #[tokio::test]
    async fn test_generate_writes_html_and_pdf() {
        let server = MockServer::start().await;
        mount_healthy(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/v1/resume/generate"))
            .and(body_partial_json(json!({ "userDescription": "Jane Doe, engineer" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(generated()))
            .expect(1)
            .mount(&server)
            .await;
        let state = state_for(&server, Arc::default());

        let dir = tempfile::tempdir().unwrap();
        let output = OutputArgs {
            out_dir: dir.path().to_path_buf(),
            pdf: true,
            html: Some(dir.path().join("resume.html")),
            ..Default::default()
        };
        let delivery = handle_generate(&state, "Jane Doe, engineer", &output)
            .await
            .unwrap();

        assert_eq!(delivery.pdf, Some(dir.path().join("Jane Doe.pdf")));
        assert_eq!(std::fs::read(dir.path().join("Jane Doe.pdf")).unwrap(), b"%PDF-1.3");
        let html = std::fs::read_to_string(dir.path().join("resume.html")).unwrap();
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("Work Experience"));
    }

    #[tokio::test]
    async fn test_backend_parse_failure_is_malformed_response() {
        let server = MockServer::start().await;
        mount_healthy(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/v1/resume/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "think": "",
                "data": { "error": "Could not parse the AI response as valid JSON" }
            })))
            .mount(&server)
            .await;
        let state = state_for(&server, Arc::default());

        let err = handle_generate(&state, "Jane", &OutputArgs::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_generic_message() {
        let server = MockServer::start().await;
        mount_healthy(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/v1/resume/generate"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let state = state_for(&server, Arc::default());

        let err = handle_generate(&state, "Jane", &OutputArgs::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "SERVER_ERROR");
    }

    #[tokio::test]
    async fn test_tailor_reads_job_file() {
        let server = MockServer::start().await;
        mount_healthy(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/v1/resume/generate-tailored"))
            .and(body_partial_json(json!({
                "userDescription": "Jane",
                "jobDescription": "Senior Rust Engineer"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(generated()))
            .expect(1)
            .mount(&server)
            .await;
        let state = state_for(&server, Arc::default());

        let dir = tempfile::tempdir().unwrap();
        let job_file = dir.path().join("job.txt");
        std::fs::write(&job_file, "Senior Rust Engineer").unwrap();

        handle_tailor(&state, "Jane", None, Some(&job_file), &OutputArgs::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_tailor_blank_job_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let state = state_for(&server, Arc::default());

        let err = handle_tailor(&state, "Jane", Some("  "), None, &OutputArgs::default())
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Please provide the job description");
    }

    #[tokio::test]
    async fn test_render_sends_to_whatsapp() {
        let server = MockServer::start().await;
        let relay = Arc::new(CountingRelay::default());
        let state = state_for(&server, Arc::clone(&relay));

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("saved.json");
        std::fs::write(&input, generated().to_string()).unwrap();

        let output = OutputArgs {
            whatsapp: Some("+14155552671".into()),
            ..Default::default()
        };
        let delivery = handle_render(&state, &input, &output).await.unwrap();
        assert_eq!(relay.calls.load(Ordering::SeqCst), 1);
        assert_eq!(delivery.relay.map(|r| r.is_demo_mode), Some(Some(true)));
    }

    #[tokio::test]
    async fn test_invalid_phone_makes_no_relay_call() {
        let server = MockServer::start().await;
        let relay = Arc::new(CountingRelay::default());
        let state = state_for(&server, Arc::clone(&relay));

        let output = OutputArgs {
            whatsapp: Some("14155552671".into()),
            ..Default::default()
        };
        let err = deliver(&state, &ResumeEnvelope::new(generated()), &output)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Relay(RelayFlowError::InvalidPhone)));
        assert_eq!(relay.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_json_output_withheld_when_later_output_fails() {
        let server = MockServer::start().await;
        let state = state_for(&server, Arc::default());

        let output = OutputArgs {
            json: true,
            whatsapp: Some("14155552671".into()),
            ..Default::default()
        };
        let err = deliver(&state, &ResumeEnvelope::new(generated()), &output)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Relay(RelayFlowError::InvalidPhone)));
    }

    #[tokio::test]
    async fn test_json_output_is_single_resume_document() {
        let server = MockServer::start().await;
        let relay = Arc::new(CountingRelay::default());
        let state = state_for(&server, Arc::clone(&relay));

        let output = OutputArgs {
            json: true,
            whatsapp: Some("+14155552671".into()),
            ..Default::default()
        };
        let delivery = deliver(&state, &ResumeEnvelope::new(generated()), &output)
            .await
            .unwrap();
        let printed: Value = serde_json::from_str(&delivery.stdout).unwrap();
        assert_eq!(printed["personalInformation"]["fullName"], "Jane Doe");
        assert_eq!(relay.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_output_flags_renders_text() {
        let server = MockServer::start().await;
        let state = state_for(&server, Arc::default());

        let delivery = deliver(&state, &ResumeEnvelope::new(generated()), &OutputArgs::default())
            .await
            .unwrap();
        assert!(delivery.stdout.starts_with("Jane Doe\n"));
        assert!(delivery.stdout.contains("WORK EXPERIENCE"));
    }

    #[tokio::test]
    async fn test_render_rejects_unreadable_json() {
        let server = MockServer::start().await;
        let state = state_for(&server, Arc::default());

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("saved.json");
        std::fs::write(&input, "not json").unwrap();

        let err = handle_render(&state, &input, &OutputArgs::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_wants_json_follows_output_flag() {
        let output = OutputArgs {
            json: true,
            ..Default::default()
        };
        assert!(wants_json(&Command::Render {
            input: PathBuf::from("x.json"),
            output,
        }));
        assert!(!wants_json(&Command::Health));
    }
}
