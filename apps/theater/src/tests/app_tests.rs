use super::*;
use crossbeam_channel::bounded;
use shared::{
    domain::{EntryId, MoodScale},
    error::ServiceError,
};

use crate::controller::render::{CurtainPolicy, RenderTicket};
use crate::test_support::{entry_created, render_result, RecordingSurface};
use crate::ui::theme::ThemePreset;

struct Harness {
    app: TheaterApp<Vec<u8>>,
    cmd_rx: Receiver<BackendCommand>,
    _ui_tx: Sender<UiEvent>,
}

fn harness(once: bool) -> Harness {
    let (cmd_tx, cmd_rx) = bounded(8);
    let (ui_tx, ui_rx) = bounded(8);
    let (surface, _log) = RecordingSurface::new();
    let session = Session::new(
        MoodScale::Bipolar,
        CurtainPolicy::WhenVideoReady,
        Box::new(surface),
        None,
    );
    let app = TheaterApp::new(
        session,
        Theme::new(ThemePreset::Velvet, false),
        cmd_tx,
        ui_rx,
        Vec::new(),
        once,
    );
    Harness {
        app,
        cmd_rx,
        _ui_tx: ui_tx,
    }
}

fn input(app: &mut TheaterApp<Vec<u8>>, line: &str) -> Flow {
    app.handle_event(UiEvent::Input(line.to_string()))
        .expect("handle input")
}

fn printed(app: &TheaterApp<Vec<u8>>) -> String {
    String::from_utf8_lossy(app.output()).into_owned()
}

#[test]
fn submit_without_narrative_sends_nothing() {
    let mut h = harness(false);
    assert_eq!(input(&mut h.app, "title Untitled"), Flow::Continue);
    assert_eq!(input(&mut h.app, "submit"), Flow::Continue);

    assert!(h.cmd_rx.try_recv().is_err());
    assert!(printed(&h.app).contains("Please fill in: narrative"));
}

#[test]
fn typed_entry_is_submitted_once_and_rendered() {
    let mut h = harness(false);
    input(&mut h.app, "narrative I was a lighthouse");
    input(&mut h.app, "mood -1");
    input(&mut h.app, "submit");
    input(&mut h.app, "submit");

    match h.cmd_rx.try_recv() {
        Ok(BackendCommand::CreateDream { request }) => {
            assert_eq!(request.narrative, "I was a lighthouse");
            assert_eq!(request.mood, Some(-1));
            assert_eq!(request.sleep_quality, None);
        }
        _ => panic!("expected one create command"),
    }
    assert!(h.cmd_rx.try_recv().is_err());

    h.app
        .handle_event(UiEvent::EntryCreated(Ok(entry_created("d1"))))
        .expect("created");
    let ticket = match h.cmd_rx.try_recv() {
        Ok(BackendCommand::RenderDream { ticket }) => ticket,
        _ => panic!("expected render command"),
    };
    assert_eq!(ticket.entry_id, EntryId::new("d1"));

    h.app
        .handle_event(UiEvent::RenderFinished {
            ticket,
            outcome: Ok(render_result(Some("https://x/v.mp4"))),
        })
        .expect("rendered");
    h.app.draw().expect("draw");
    assert!(printed(&h.app).contains("Now showing: https://x/v.mp4"));
}

#[test]
fn out_of_range_mood_is_reported_and_not_stored() {
    let mut h = harness(false);
    input(&mut h.app, "mood 9");
    let submission = h.app.session().submission().expect("draft");
    assert_eq!(submission.draft().mood(), None);
    assert!(printed(&h.app).contains("9"));
}

#[test]
fn unknown_command_prints_a_hint() {
    let mut h = harness(false);
    input(&mut h.app, "dance");
    assert!(printed(&h.app).contains("type help for commands"));
}

#[test]
fn disconnected_backend_surfaces_a_save_error() {
    let mut h = harness(false);
    drop(h.cmd_rx);
    input(&mut h.app, "narrative falling upward");
    input(&mut h.app, "submit");

    let submission = h.app.session().submission().expect("draft");
    assert!(!submission.is_submitting());
    let message = submission
        .last_error()
        .map(|err| err.message().to_string())
        .unwrap_or_default();
    assert!(message.contains("disconnected"));
}

#[test]
fn back_returns_to_a_fresh_journal() {
    let mut h = harness(false);
    input(&mut h.app, "narrative stairs");
    input(&mut h.app, "submit");
    h.app
        .handle_event(UiEvent::EntryCreated(Ok(entry_created("d3"))))
        .expect("created");
    assert_eq!(
        h.app.session().mode(),
        &Mode::Presentation(EntryId::new("d3"))
    );

    input(&mut h.app, "back");
    assert_eq!(h.app.session().mode(), &Mode::Entry);
    assert!(h
        .app
        .session()
        .submission()
        .expect("fresh draft")
        .draft()
        .narrative
        .is_empty());
}

#[test]
fn quit_command_stops_the_loop() {
    let mut h = harness(false);
    assert_eq!(input(&mut h.app, "quit"), Flow::Quit);
}

#[test]
fn closed_input_waits_for_the_render_before_quitting() {
    let mut h = harness(false);
    input(&mut h.app, "narrative clocks melting");
    input(&mut h.app, "submit");
    assert_eq!(
        h.app.handle_event(UiEvent::InputClosed).expect("closed"),
        Flow::Continue
    );

    h.app
        .handle_event(UiEvent::EntryCreated(Ok(entry_created("d1"))))
        .expect("created");
    let _create = h.cmd_rx.try_recv();
    let ticket = match h.cmd_rx.try_recv() {
        Ok(BackendCommand::RenderDream { ticket }) => ticket,
        _ => panic!("expected render command"),
    };
    let flow = h
        .app
        .handle_event(UiEvent::RenderFinished {
            ticket,
            outcome: Err(ServiceError::transport("timed out")),
        })
        .expect("rendered");
    assert_eq!(flow, Flow::Quit);
}

#[test]
fn once_mode_quits_when_the_presentation_settles() {
    let mut h = harness(true);
    input(&mut h.app, "narrative a tide of paper");
    input(&mut h.app, "submit");
    let flow = h
        .app
        .handle_event(UiEvent::EntryCreated(Ok(entry_created("d2"))))
        .expect("created");
    assert_eq!(flow, Flow::Continue);

    let _create = h.cmd_rx.try_recv();
    let ticket = match h.cmd_rx.try_recv() {
        Ok(BackendCommand::RenderDream { ticket }) => ticket,
        _ => panic!("expected render command"),
    };
    let flow = h
        .app
        .handle_event(UiEvent::RenderFinished {
            ticket,
            outcome: Ok(render_result(None)),
        })
        .expect("rendered");
    assert_eq!(flow, Flow::Quit);
}

#[test]
fn once_mode_quits_after_a_failed_save() {
    let mut h = harness(true);
    input(&mut h.app, "narrative x");
    input(&mut h.app, "submit");
    let flow = h
        .app
        .handle_event(UiEvent::EntryCreated(Err(ServiceError::request_failed(
            422, "bad",
        ))))
        .expect("failed");
    assert_eq!(flow, Flow::Quit);
}

#[test]
fn identical_frames_are_not_redrawn() {
    let mut h = harness(false);
    h.app.draw().expect("first");
    let first = printed(&h.app).len();
    h.app.draw().expect("second");
    assert_eq!(printed(&h.app).len(), first);
}

fn run_to_end(events: Vec<UiEvent>) -> String {
    let (cmd_tx, cmd_rx) = bounded(8);
    let (ui_tx, ui_rx) = bounded(16);
    let (surface, _log) = RecordingSurface::new();
    let session = Session::new(
        MoodScale::Bipolar,
        CurtainPolicy::WhenVideoReady,
        Box::new(surface),
        None,
    );
    let app = TheaterApp::new(
        session,
        Theme::new(ThemePreset::Velvet, false),
        cmd_tx,
        ui_rx,
        Vec::new(),
        true,
    );
    for event in events {
        ui_tx.send(event).expect("queue event");
    }
    drop(ui_tx);
    let out = app.run().expect("run");
    drop(cmd_rx);
    String::from_utf8_lossy(&out).into_owned()
}

#[test]
fn once_run_prints_the_finished_presentation() {
    let printed = run_to_end(vec![
        UiEvent::Input("narrative x".into()),
        UiEvent::Input("submit".into()),
        UiEvent::EntryCreated(Ok(entry_created("d2"))),
        UiEvent::RenderFinished {
            ticket: RenderTicket::new(EntryId::new("d2"), 1),
            outcome: Ok(render_result(None)),
        },
    ]);

    assert!(printed.contains("Entry d2"));
    assert!(printed.contains("FADE IN: a theater made of clouds."));
    assert!(printed.contains("The film only exists on paper this time."));
}

#[test]
fn once_run_prints_the_save_error_before_exiting() {
    let printed = run_to_end(vec![
        UiEvent::Input("narrative x".into()),
        UiEvent::Input("submit".into()),
        UiEvent::InputClosed,
        UiEvent::EntryCreated(Err(ServiceError::transport("connection refused"))),
    ]);

    assert!(printed.contains("Could not save your dream."));
    assert!(printed.contains("connection refused"));
}

#[test]
fn closed_input_waits_for_a_pending_lookup() {
    let mut h = harness(false);
    input(&mut h.app, "show 7");
    assert!(matches!(
        h.cmd_rx.try_recv(),
        Ok(BackendCommand::FetchDream { .. })
    ));
    assert_eq!(
        h.app.handle_event(UiEvent::InputClosed).expect("closed"),
        Flow::Continue
    );
}
