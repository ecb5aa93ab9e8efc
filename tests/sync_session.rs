use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use trimsync::playback::{AudioControl, SeekError, SyncSession, TickEffect};
use trimsync::selection::Selection;
use trimsync::transcript::{RawWord, WordToken};

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Play,
    Pause,
    Position(f64),
    Volume(f32),
}

struct MockControl {
    commands: Rc<RefCell<Vec<Command>>>,
    reject_play: bool,
}

impl MockControl {
    fn new() -> (Self, Rc<RefCell<Vec<Command>>>) {
        let commands = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                commands: Rc::clone(&commands),
                reject_play: false,
            },
            commands,
        )
    }

    fn rejecting_play() -> (Self, Rc<RefCell<Vec<Command>>>) {
        let (mut control, commands) = Self::new();
        control.reject_play = true;
        (control, commands)
    }
}

impl AudioControl for MockControl {
    fn play(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.reject_play {
            return Err(Box::new(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "no user gesture",
            )));
        }
        self.commands.borrow_mut().push(Command::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.commands.borrow_mut().push(Command::Pause);
    }

    fn set_position(&mut self, seconds: f64) {
        self.commands.borrow_mut().push(Command::Position(seconds));
    }

    fn set_volume(&mut self, volume: f32) {
        self.commands.borrow_mut().push(Command::Volume(volume));
    }
}

fn word(text: &str, start: f64, end: f64, speaker: &str) -> WordToken {
    WordToken::from_raw(&RawWord {
        text: text.to_string(),
        start: Some(start),
        end: Some(end),
        speaker_id: Some(speaker.to_string()),
        ..RawWord::default()
    })
}

fn timeless(text: &str) -> WordToken {
    WordToken::from_raw(&RawWord {
        text: text.to_string(),
        ..RawWord::default()
    })
}

fn session_with_words(control: MockControl) -> SyncSession<MockControl> {
    let mut session = SyncSession::new(control, 10.0);
    session.set_words(vec![
        word("hi", 0.0, 0.5, "A"),
        word("bye", 0.6, 1.0, "B"),
        word("again", 2.0, 2.5, "A"),
    ]);
    session
}

#[test]
fn tick_updates_indices_and_emits_changes_once() {
    let (control, _) = MockControl::new();
    let mut session = session_with_words(control);

    let effects = session.handle_tick(0.25);
    assert_eq!(
        effects,
        vec![
            TickEffect::WordChanged(Some(0)),
            TickEffect::SegmentChanged(Some(0)),
        ]
    );
    assert_eq!(session.state().current_word, Some(0));
    assert_eq!(session.state().current_segment, Some(0));

    // Identical tick: no duplicate effects, no redundant re-scroll trigger.
    assert!(session.handle_tick(0.25).is_empty());
    // Different time, same indices: still nothing to act on.
    assert!(session.handle_tick(0.3).is_empty());
}

#[test]
fn tick_crossing_a_boundary_emits_both_changes() {
    let (control, _) = MockControl::new();
    let mut session = session_with_words(control);

    session.handle_tick(0.25);
    let effects = session.handle_tick(0.8);
    assert_eq!(
        effects,
        vec![
            TickEffect::WordChanged(Some(1)),
            TickEffect::SegmentChanged(Some(1)),
        ]
    );
}

#[test]
fn seek_to_word_positions_plays_and_updates_eagerly() {
    let (control, commands) = MockControl::new();
    let mut session = session_with_words(control);

    let target = session.seek_to_word(1).unwrap();
    assert_eq!(target, 0.6);
    assert_eq!(
        commands.borrow().as_slice(),
        [Command::Position(0.6), Command::Play]
    );

    // Indices reflect the jump before any tick arrives.
    assert_eq!(session.state().current_word, Some(1));
    assert_eq!(session.state().current_segment, Some(1));
    assert!(session.state().is_playing);

    // The next natural tick at the same position changes nothing.
    assert!(session.handle_tick(0.6).is_empty());
}

#[test]
fn seek_while_playing_does_not_reissue_play() {
    let (control, commands) = MockControl::new();
    let mut session = session_with_words(control);

    session.play().unwrap();
    commands.borrow_mut().clear();

    session.seek_to_word(2).unwrap();
    assert_eq!(commands.borrow().as_slice(), [Command::Position(2.0)]);
}

#[test]
fn seek_to_segment_targets_its_start() {
    let (control, commands) = MockControl::new();
    let mut session = session_with_words(control);

    let target = session.seek_to_segment(2).unwrap();
    assert_eq!(target, 2.0);
    assert!(commands.borrow().contains(&Command::Position(2.0)));
    assert_eq!(session.state().current_segment, Some(2));
}

#[test]
fn seek_to_timeless_word_is_unseekable_and_issues_no_commands() {
    let (control, commands) = MockControl::new();
    let mut session = SyncSession::new(control, 10.0);
    session.set_words(vec![word("ok", 0.0, 0.5, "A"), timeless("nowhere")]);

    let err = session.seek_to_word(1).unwrap_err();
    assert!(matches!(err, SeekError::Unseekable(1)));
    assert!(commands.borrow().is_empty());
    assert!(!session.state().is_playing);
}

#[test]
fn seek_out_of_range_is_reported() {
    let (control, _) = MockControl::new();
    let mut session = session_with_words(control);
    assert!(matches!(
        session.seek_to_word(99),
        Err(SeekError::OutOfRange(99))
    ));
    assert!(matches!(
        session.seek_to_segment(99),
        Err(SeekError::OutOfRange(99))
    ));
}

#[test]
fn rejected_play_surfaces_and_leaves_state_paused() {
    let (control, commands) = MockControl::rejecting_play();
    let mut session = session_with_words(control);

    let err = session.seek_to_word(0).unwrap_err();
    assert!(matches!(err, SeekError::PlaybackRejected(_)));
    assert!(!session.state().is_playing);
    // The position command was issued; only play was refused, and the
    // session stays usable for a retry.
    assert_eq!(commands.borrow().as_slice(), [Command::Position(0.0)]);
}

#[test]
fn ratio_seek_maps_and_clamps() {
    let (control, commands) = MockControl::new();
    let mut session = session_with_words(control);

    assert_eq!(session.seek_to_ratio(0.5).unwrap(), 5.0);
    assert_eq!(session.seek_to_ratio(1.5).unwrap(), 10.0);
    assert_eq!(session.seek_to_ratio(-0.2).unwrap(), 0.0);
    assert!(commands.borrow().contains(&Command::Position(5.0)));
}

#[test]
fn ratio_seek_is_clamped_into_an_active_loop_selection() {
    let (control, _) = MockControl::new();
    let mut session = session_with_words(control);

    let mut selection = Selection::full(10.0);
    assert!(selection.set_range(2.0, 8.0));
    session.set_loop_selection(Some(selection));

    assert_eq!(session.seek_to_ratio(0.0).unwrap(), 2.0);
    assert_eq!(session.seek_to_ratio(1.0).unwrap(), 8.0);
    assert_eq!(session.seek_to_ratio(0.5).unwrap(), 5.0);
}

#[test]
fn ticks_past_the_loop_end_jump_back_to_its_start() {
    let (control, commands) = MockControl::new();
    let mut session = session_with_words(control);

    let mut selection = Selection::full(10.0);
    assert!(selection.set_range(0.0, 0.7));
    session.set_loop_selection(Some(selection));

    session.handle_tick(0.65);
    commands.borrow_mut().clear();

    session.handle_tick(0.7);
    assert_eq!(commands.borrow().as_slice(), [Command::Position(0.0)]);
    assert_eq!(session.state().current_time, 0.0);
    assert_eq!(session.state().current_word, Some(0));
}

#[test]
fn replacing_the_asset_clears_the_loop_range() {
    let (control, commands) = MockControl::new();
    let mut session = session_with_words(control);

    let mut selection = Selection::full(10.0);
    assert!(selection.set_range(0.0, 0.5));
    session.set_loop_selection(Some(selection));

    session.set_duration(4.0);
    commands.borrow_mut().clear();
    session.handle_tick(0.9);
    // No loop jump: the selection belonged to the previous asset.
    assert!(commands.borrow().is_empty());
    assert_eq!(session.state().current_time, 0.9);
}

#[test]
fn pause_and_volume_pass_through() {
    let (control, commands) = MockControl::new();
    let mut session = session_with_words(control);

    session.play().unwrap();
    session.pause();
    session.pause(); // already paused, no duplicate command
    session.set_volume(0.4);
    session.set_volume(3.0); // clamped

    assert_eq!(
        commands.borrow().as_slice(),
        [
            Command::Play,
            Command::Pause,
            Command::Volume(0.4),
            Command::Volume(1.0),
        ]
    );
}
