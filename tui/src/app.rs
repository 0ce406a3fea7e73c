//! Demo chat host wired to the suggestion engine.
//!
//! The host owns everything the engine treats as external: the conversation
//! views, the message input pane, and the terminal event loop. The engine is
//! driven from the single-threaded `select!` below: crossterm events, the
//! 200 ms poll, the debounce deadline, and provider replies all arrive here,
//! so every state transition runs to completion before the next event is
//! looked at.

use std::time::Duration;

use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use ghosttype_engine::CompletionError;
use ghosttype_engine::CompletionProvider;
use ghosttype_engine::EngineEvent;
use ghosttype_engine::KeyOutcome;
use ghosttype_engine::POLL_INTERVAL;
use ghosttype_engine::SuggestionEngine;
use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;
use tokio::time::MissedTickBehavior;
use tokio_stream::StreamExt;

use crate::acquisition::TargetAcquisition;
use crate::input_pane::MessageInput;
use crate::keyboard::KeyInterceptor;
use crate::overlay::GhostTextOverlay;
use crate::surface::InputSurface;
use crate::tui::TuiSession;

struct Conversation {
    title: String,
    messages: Vec<String>,
    /// The target element. `None` while this view is unmounted; a fresh pane
    /// is created when the view mounts again, mirroring hosts that destroy
    /// and rebuild their input on navigation.
    input: Option<MessageInput>,
}

impl Conversation {
    fn new(title: String) -> Self {
        Self {
            title,
            messages: Vec::new(),
            input: Some(MessageInput::new()),
        }
    }
}

pub struct ChatApp<P> {
    conversations: Vec<Conversation>,
    active: usize,
    picker_open: bool,
    picker_index: usize,
    engine: SuggestionEngine<P>,
    overlay: Option<GhostTextOverlay>,
    acquisition: TargetAcquisition,
    interceptor: KeyInterceptor,
}

impl<P: CompletionProvider> ChatApp<P> {
    pub fn new(engine: SuggestionEngine<P>) -> Self {
        Self {
            conversations: vec![Conversation::new("Conversation 1".to_string())],
            active: 0,
            picker_open: false,
            picker_index: 0,
            engine,
            overlay: None,
            acquisition: TargetAcquisition::new(),
            interceptor: KeyInterceptor::default(),
        }
    }

    pub async fn run(
        mut self,
        session: &mut TuiSession,
        mut engine_rx: UnboundedReceiver<EngineEvent>,
    ) -> anyhow::Result<()> {
        let mut events = EventStream::new();
        let mut poll = tokio::time::interval(POLL_INTERVAL);
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            self.sync_acquisition();
            session.terminal.draw(|frame| self.draw(frame))?;

            let deadline = self.engine.debounce_deadline();
            let debounce_at =
                deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));
            tokio::select! {
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            if !self.handle_event(event) {
                                return Ok(());
                            }
                        }
                        Some(Err(err)) => tracing::warn!("terminal event error: {err}"),
                        None => return Ok(()),
                    }
                }
                _ = poll.tick(), if self.acquisition.is_engaged() => self.poll_target(),
                _ = tokio::time::sleep_until(debounce_at), if deadline.is_some() => {
                    self.engine.on_debounce_elapsed();
                }
                maybe_engine = engine_rx.recv() => {
                    if let Some(EngineEvent::CompletionResult { source_text, result }) = maybe_engine {
                        self.apply_completion(source_text, result);
                    }
                }
            }
        }
    }

    fn target_present(&self) -> bool {
        !self.picker_open && self.conversations[self.active].input.is_some()
    }

    /// Structure watch step, run once per loop turn while not engaged.
    fn sync_acquisition(&mut self) {
        if !self.acquisition.is_engaged() {
            let present = self.target_present();
            self.acquisition.observe(present, &mut self.overlay);
        }
    }

    /// One detector step on the poll cadence. A poll that finds the target
    /// gone clears the engine (inside `poll`) and re-arms the watcher.
    fn poll_target(&mut self) {
        let Self {
            conversations,
            active,
            picker_open,
            engine,
            overlay,
            acquisition,
            ..
        } = self;
        let Some(overlay) = overlay.as_mut() else {
            return;
        };
        let input = if *picker_open {
            None
        } else {
            conversations[*active].input.as_mut()
        };
        let present = input.is_some();
        let surface = InputSurface::new(input, present);
        engine.poll(&surface, overlay);
        if !present {
            acquisition.on_target_lost();
        }
    }

    fn apply_completion(
        &mut self,
        source_text: String,
        result: Result<String, CompletionError>,
    ) {
        let Self {
            conversations,
            active,
            picker_open,
            engine,
            overlay,
            ..
        } = self;
        let Some(overlay) = overlay.as_mut() else {
            return;
        };
        let input = if *picker_open {
            None
        } else {
            conversations[*active].input.as_mut()
        };
        let surface = InputSurface::new(input, !*picker_open);
        engine.handle_completion(source_text, result, &surface, overlay);
    }

    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => {
                if !self.picker_open
                    && let Some(input) = self.conversations[self.active].input.as_mut()
                {
                    input.insert_str(&text);
                }
                true
            }
            // Resize is picked up by the redraw on the next loop turn.
            _ => true,
        }
    }

    /// Returns `false` when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return true;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return false,
                KeyCode::Char('n') => self.new_conversation(),
                KeyCode::Char('p') => self.toggle_picker(),
                _ => {}
            }
            return true;
        }

        if self.picker_open {
            self.handle_picker_key(key);
            return true;
        }

        // The suggestion engine gets first refusal on accept/dismiss keys;
        // a consumed key is swallowed here so Tab never reaches the host's
        // own handling.
        if self.acquisition.is_engaged()
            && let Some(intent) = self.interceptor.intent_for(key)
        {
            let Self {
                conversations,
                active,
                engine,
                overlay,
                ..
            } = self;
            if let Some(overlay) = overlay.as_mut() {
                let mut surface = InputSurface::new(conversations[*active].input.as_mut(), true);
                if engine.handle_key(intent, &mut surface, overlay) == KeyOutcome::Consumed {
                    return true;
                }
            }
        }

        let conversation = &mut self.conversations[self.active];
        let Some(input) = conversation.input.as_mut() else {
            return true;
        };
        match key.code {
            KeyCode::Enter => {
                if !input.is_empty() {
                    let text = input.take_text();
                    conversation.messages.push(text);
                }
            }
            KeyCode::Char(ch) => input.insert(ch),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::End => input.move_to_end(),
            _ => {}
        }
        true
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.picker_index = self.picker_index.saturating_sub(1),
            KeyCode::Down => {
                self.picker_index = (self.picker_index + 1).min(self.conversations.len() - 1);
            }
            KeyCode::Enter => {
                let chosen = self.picker_index;
                self.mount_conversation(chosen);
            }
            _ => {}
        }
    }

    fn new_conversation(&mut self) {
        let title = format!("Conversation {}", self.conversations.len() + 1);
        self.conversations.push(Conversation::new(title));
        let chosen = self.conversations.len() - 1;
        self.mount_conversation(chosen);
    }

    /// Unmounts the chat view (destroying the target element) and opens the
    /// conversation picker.
    fn toggle_picker(&mut self) {
        if self.picker_open {
            let chosen = self.picker_index;
            self.mount_conversation(chosen);
        } else {
            self.conversations[self.active].input = None;
            self.picker_index = self.active;
            self.picker_open = true;
        }
    }

    fn mount_conversation(&mut self, index: usize) {
        self.active = index;
        self.picker_open = false;
        // A freshly mounted view gets a brand new input pane; any draft in a
        // previously unmounted view is gone, exactly like the host pages this
        // mirrors.
        self.conversations[index].input = Some(MessageInput::new());
    }

    fn draw(&self, frame: &mut Frame) {
        let [transcript_area, input_area, footer_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        if self.picker_open {
            let items: Vec<ListItem> = self
                .conversations
                .iter()
                .enumerate()
                .map(|(index, conversation)| {
                    let line = if index == self.picker_index {
                        Line::from(format!("> {}", conversation.title)).bold()
                    } else {
                        Line::from(format!("  {}", conversation.title))
                    };
                    ListItem::new(line)
                })
                .collect();
            frame.render_widget(
                List::new(items).block(Block::bordered().title(" Conversations ")),
                transcript_area,
            );
        } else {
            let conversation = &self.conversations[self.active];
            let lines: Vec<Line> = conversation
                .messages
                .iter()
                .map(|message| Line::from(format!("you: {message}")))
                .collect();
            frame.render_widget(
                Paragraph::new(lines)
                    .block(Block::bordered().title(format!(" {} ", conversation.title))),
                transcript_area,
            );

            frame.render_widget(Block::bordered().title(" Message "), input_area);
            if let Some(input) = &conversation.input {
                let inner = input_area.inner(ratatui::layout::Margin::new(1, 1));
                input.render(inner, frame.buffer_mut());
                if let Some((x, y)) = input.screen_cursor() {
                    frame.set_cursor_position((x, y));
                }
            }
        }

        frame.render_widget(
            Line::from("Tab accept · Esc dismiss · Ctrl+N new · Ctrl+P conversations · Ctrl+C quit")
                .style(Style::default().dim()),
            footer_area,
        );

        // Painted last: pure decoration over everything the host drew.
        if let Some(overlay) = &self.overlay {
            overlay.render(frame.buffer_mut());
        }
    }
}
