//! Python library engines (EasyOCR, PaddleOCR, docTR, TrOCR)
//!
//! Each engine runs in its own long-lived Python worker, started once when
//! the registry is built. The worker loads every model the benchmark needs
//! before reporting ready, then answers one JSON request per line.

use crate::cases::{Language, Style};
use crate::config::Config;
use crate::engine::{EngineKind, OcrEngine, OcrInput};
use crate::error::OcrError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

const WORKER_SCRIPT: &str = include_str!("bridge_worker.py");

const LANGUAGES: [Language; 3] = [Language::Eng, Language::Kor, Language::Vie];

#[derive(Debug, Serialize)]
struct BridgeRequest<'a> {
    image: &'a Path,
    languages: &'a [&'static str],
    variant: &'static str,
}

/// Model selection without an image, sent as warmup
#[derive(Debug, Serialize, PartialEq)]
struct ModelSpec {
    languages: Vec<&'static str>,
    variant: &'static str,
}

#[derive(Debug, Deserialize)]
struct Handshake {
    ready: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BridgeResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// A running worker process
struct Worker {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl Worker {
    /// Spawn the worker and wait for its handshake
    fn start(mut command: Command) -> Result<Self, OcrError> {
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| OcrError::InitializationError(format!("Failed to start worker: {}", e)))?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, BufReader::new(stdout)),
            _ => {
                let _ = child.kill();
                return Err(OcrError::InitializationError(
                    "Worker pipes are not available".to_string(),
                ));
            }
        };

        let mut worker = Self {
            child,
            stdin,
            stdout,
        };

        let line = worker
            .read_message()
            .map_err(|e| OcrError::InitializationError(e.to_string()))?;
        let handshake: Handshake = serde_json::from_str(&line).map_err(|e| {
            OcrError::InitializationError(format!("Invalid worker handshake: {}", e))
        })?;
        if !handshake.ready {
            return Err(OcrError::InitializationError(
                handshake
                    .error
                    .unwrap_or_else(|| "worker refused to start".to_string()),
            ));
        }

        Ok(worker)
    }

    /// Next JSON line from the worker, skipping stray output
    fn read_message(&mut self) -> Result<String, OcrError> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self.stdout.read_line(&mut line).map_err(|e| {
                OcrError::ProcessingError(format!("Failed to read from worker: {}", e))
            })?;
            if read == 0 {
                return Err(OcrError::ProcessingError("Worker exited".to_string()));
            }
            let trimmed = line.trim();
            if trimmed.starts_with('{') {
                return Ok(trimmed.to_string());
            }
            if !trimmed.is_empty() {
                tracing::debug!("worker: {}", trimmed);
            }
        }
    }

    fn request(&mut self, request: &BridgeRequest<'_>) -> Result<String, OcrError> {
        let mut payload = serde_json::to_string(request)
            .map_err(|e| OcrError::ProcessingError(format!("Failed to encode request: {}", e)))?;
        payload.push('\n');

        self.stdin
            .write_all(payload.as_bytes())
            .and_then(|_| self.stdin.flush())
            .map_err(|e| OcrError::ProcessingError(format!("Failed to write to worker: {}", e)))?;

        let line = self.read_message()?;
        let response: BridgeResponse = serde_json::from_str(&line)
            .map_err(|e| OcrError::ProcessingError(format!("Invalid worker response: {}", e)))?;

        match (response.text, response.error) {
            (_, Some(error)) => Err(OcrError::ProcessingError(error)),
            (Some(text), None) => Ok(text),
            (None, None) => Ok(String::new()),
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// OCR engine backed by a Python worker process
pub struct BridgeEngine {
    kind: EngineKind,
    worker: Mutex<Worker>,
}

impl BridgeEngine {
    /// Start the worker for `kind` and load its models
    pub fn spawn(kind: EngineKind, config: &Config) -> Result<Self, OcrError> {
        let engine = Self::start(kind, worker_command(kind, &config.python)?)?;
        tracing::info!("{} worker ready ({})", kind.label(), config.python);
        Ok(engine)
    }

    fn start(kind: EngineKind, command: Command) -> Result<Self, OcrError> {
        Ok(Self {
            kind,
            worker: Mutex::new(Worker::start(command)?),
        })
    }
}

/// `python -u -c <worker script> <engine id> <warmup json>`
fn worker_command(kind: EngineKind, python: &str) -> Result<Command, OcrError> {
    let warmup = serde_json::to_string(&warmup_specs(kind))
        .map_err(|e| OcrError::InitializationError(format!("Failed to encode warmup: {}", e)))?;

    let mut command = Command::new(python);
    command
        .arg("-u")
        .arg("-c")
        .arg(WORKER_SCRIPT)
        .arg(kind.id())
        .arg(warmup);
    Ok(command)
}

impl OcrEngine for BridgeEngine {
    fn kind(&self) -> EngineKind {
        self.kind
    }

    fn description(&self) -> &'static str {
        match self.kind {
            EngineKind::EasyOcr => "EasyOCR (CPU) via Python worker",
            EngineKind::PaddleOcr => "PaddleOCR with angle classification via Python worker",
            EngineKind::Doctr => "docTR pretrained OCR predictor via Python worker",
            EngineKind::TrOcr => "TrOCR base printed/handwritten models via Python worker",
            _ => "Python worker",
        }
    }

    fn recognize(&self, input: &OcrInput<'_>) -> Result<String, OcrError> {
        let spec = model_spec(self.kind, input.language, input.style);
        let request = BridgeRequest {
            image: input.require_path()?,
            languages: &spec.languages,
            variant: spec.variant,
        };

        let text = self.worker.lock().request(&request)?;
        tracing::debug!("{} raw output: {:?}", self.kind.label(), text);
        Ok(text)
    }

    fn supported_languages(&self) -> Vec<Language> {
        LANGUAGES.to_vec()
    }
}

/// Model a worker needs for one sample
fn model_spec(kind: EngineKind, language: Language, style: Style) -> ModelSpec {
    let languages = match kind {
        EngineKind::EasyOcr => language.easyocr_codes().to_vec(),
        EngineKind::PaddleOcr => vec![language.paddle_code()],
        _ => Vec::new(),
    };
    ModelSpec {
        languages,
        variant: style.as_str(),
    }
}

/// Every distinct model the benchmark can ask `kind` for
fn warmup_specs(kind: EngineKind) -> Vec<ModelSpec> {
    let mut specs = Vec::new();
    for language in LANGUAGES {
        for style in [Style::Printed, Style::Handwritten] {
            let spec = model_spec(kind, language, style);
            if !specs.contains(&spec) {
                specs.push(spec);
            }
        }
    }
    specs
}
