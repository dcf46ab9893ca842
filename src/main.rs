use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tokio_stream::wrappers::LinesStream;

use care_companion::analysis::AnalyticsRegistry;
use care_companion::collab::{KeywordClassifier, NoopSink};
use care_companion::config::EngineConfig;
use care_companion::flows::{AnswerValue, FlowCatalog, StepKind};
use care_companion::router::{ActionRouter, DispatchContext};
use care_companion::runtime::{FlowRuntime, FlowState};
use care_companion::session::{Message, MessageBody, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; CARE_COMPANION_LOG_DIR switches to daily files.
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    let _log_guard = match std::env::var("CARE_COMPANION_LOG_DIR") {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "care-companion.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        Err(_) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .init();
            None
        }
    };

    let config = EngineConfig {
        summary_delay_ms: Some((400, 900)),
        ..EngineConfig::default()
    };
    let catalog = Arc::new(FlowCatalog::with_default_flows());

    eprintln!("🩺 Care Companion v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Flows: {}", {
        let mut ids = catalog.ids();
        ids.sort();
        ids.join(", ")
    });
    eprintln!("   Describe what's going on, or use /do <action>, /abandon, /quit.\n");

    let runtime = FlowRuntime::new(
        catalog,
        Arc::new(AnalyticsRegistry::default()),
        Arc::new(care_companion::suggest::SuggestionEngine::with_default_rules()),
        Arc::new(NoopSink),
        config.clone(),
    );
    let router = Arc::new(ActionRouter::new(
        runtime.clone(),
        Some(Arc::new(KeywordClassifier::default_rules())),
        config.intent_threshold,
    ));

    // Background renderer: prints transcript turns as they appear, which
    // also catches delayed summary cards.
    let session = runtime.session();
    tokio::spawn(render_loop(Arc::clone(&session)));

    let stdin = tokio::io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = LinesStream::new(reader.lines());

    while let Some(Ok(line)) = lines.next().await {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        match line.as_str() {
            "/quit" => break,
            "/abandon" => {
                runtime.abandon().await;
                continue;
            }
            _ if line.starts_with("/do ") => {
                let action_id = line.trim_start_matches("/do ").trim();
                router.dispatch(action_id, DispatchContext::default()).await;
                continue;
            }
            _ => {}
        }

        // An interactive turn consumes the input as an answer; otherwise the
        // text goes through intent classification.
        let pending = pending_input(&session).await;
        match pending {
            Some(PendingInput::Step { step_id, kind }) => {
                let value = parse_answer(&kind, &line);
                if let Err(e) = runtime.answer(&step_id, value).await {
                    eprintln!("   ✗ {e}");
                }
            }
            Some(PendingInput::Aux { token }) => {
                let selections: Vec<String> = line
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if let Err(e) = runtime.resume(token, selections).await {
                    eprintln!("   ✗ {e}");
                }
            }
            None => {
                router.dispatch_text(&line).await;
            }
        }

        // Give fire-and-forget work a beat before the next prompt.
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    Ok(())
}

/// What the transcript is currently waiting on.
enum PendingInput {
    Step { step_id: String, kind: StepKind },
    Aux { token: uuid::Uuid },
}

async fn pending_input(session: &Arc<Mutex<Session>>) -> Option<PendingInput> {
    let session = session.lock().await;
    match &session.state {
        FlowState::Active(run) => run.current_step().map(|step| PendingInput::Step {
            step_id: step.id.clone(),
            kind: step.kind.clone(),
        }),
        FlowState::Suspended { token, .. } => Some(PendingInput::Aux { token: *token }),
        _ => None,
    }
}

/// Best-effort parse of a REPL line into the shape the step expects.
fn parse_answer(kind: &StepKind, line: &str) -> AnswerValue {
    match kind {
        StepKind::Slider { .. } => line
            .trim()
            .parse::<f64>()
            .map(AnswerValue::Number)
            .unwrap_or_else(|_| AnswerValue::Text(line.to_string())),
        StepKind::ChoiceMulti { .. } => AnswerValue::List(
            line.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        _ => AnswerValue::Text(line.trim().to_string()),
    }
}

async fn render_loop(session: Arc<Mutex<Session>>) {
    let mut rendered = 0;
    loop {
        {
            let session = session.lock().await;
            for message in session.thread.since(rendered) {
                print_message(message);
            }
            rendered = session.thread.len();
        }
        tokio::time::sleep(Duration::from_millis(150)).await;
    }
}

fn print_message(message: &Message) {
    match &message.body {
        MessageBody::Text { text } => match message.origin {
            care_companion::session::Origin::User => println!("  you ▸ {text}"),
            care_companion::session::Origin::System => println!("  ai  ▸ {text}"),
        },
        MessageBody::Prompt { step } => {
            println!("  ai  ▸ {}", step.prompt);
            if let StepKind::ChoiceSingle { options }
            | StepKind::ChoiceMulti { options }
            | StepKind::DateChoice { options }
            | StepKind::BodyRegion { regions: options } = &step.kind
            {
                let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
                println!("        [{}]", values.join(" | "));
            }
            if let StepKind::Slider { min, max, unit } = &step.kind {
                println!("        [{min}–{max} {unit}]");
            }
        }
        MessageBody::AuxPrompt { card } => {
            println!("  ai  ▸ {} — {}", card.title, card.prompt);
            let values: Vec<&str> = card.options.iter().map(|o| o.value.as_str()).collect();
            println!("        [{}] (comma-separated)", values.join(" | "));
        }
        MessageBody::Summary { card } => {
            println!("  ai  ▸ ── {} ──", card.title);
            for line in card.body.lines() {
                println!("        {line}");
            }
            if card.urgent {
                println!("        ⚠ flagged as urgent");
            }
        }
    }
    if !message.chips.is_empty() {
        let labels: Vec<&str> = message.chips.iter().map(|c| c.label.as_str()).collect();
        println!("        ◦ {}", labels.join("  ◦ "));
    }
}
