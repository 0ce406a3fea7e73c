//! Terminal front end for the ghosttype suggestion engine.
//!
//! Hosts the demo chat application and the pieces the engine needs from a
//! concrete UI: caret geometry, the ghost-text overlay, target acquisition,
//! and key interception.

// Forbid accidental stdout/stderr writes; the terminal belongs to ratatui.
#![deny(clippy::print_stdout, clippy::print_stderr)]

mod acquisition;
mod app;
mod input_pane;
mod keyboard;
mod overlay;
mod surface;
mod tui;

pub use acquisition::TargetAcquisition;
pub use app::ChatApp;
pub use input_pane::MessageInput;
pub use keyboard::KeyInterceptor;
pub use overlay::GhostTextOverlay;
pub use overlay::OverlayState;
pub use surface::InputSurface;
pub use tui::TuiSession;

use ghosttype_engine::CompletionProvider;
use ghosttype_engine::EngineEventSender;
use ghosttype_engine::SuggestionEngine;
use ghosttype_engine::Tone;

/// Runs the demo chat host with the given provider until the user quits.
pub async fn run_app<P: CompletionProvider>(provider: P, tone: Tone) -> anyhow::Result<()> {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let engine = SuggestionEngine::new(provider, tone, EngineEventSender::new(tx));
    let mut session = TuiSession::new()?;
    ChatApp::new(engine).run(&mut session, rx).await
}
