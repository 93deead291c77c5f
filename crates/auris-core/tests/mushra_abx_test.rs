use auris_core::{
    AbxChoice, AbxPlayCounts, AbxPlayer, CoreError, ManualClock, MemoryChannel, MemoryPageLog,
    MushraPlayer, PageContext, ABX_SLOT_A, ABX_SLOT_B, ABX_SLOT_X,
};
use auris_ports::clock::Clock;
use auris_ports::command::EngineCommand;
use auris_ports::playback::PlaybackState;
use auris_ports::stimulus::{ConfigurationError, Stimulus, TrackEntry, TrackSpec};
use auris_ports::storage::EngineProfile;
use auris_ports::types::{PlayerId, PlayerRole};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn context() -> (Arc<MemoryChannel>, Arc<ManualClock>, PageContext) {
    let channel = Arc::new(MemoryChannel::new());
    let clock = Arc::new(ManualClock::new());
    let ctx = PageContext::new(
        channel.clone(),
        clock.clone(),
        Arc::new(MemoryPageLog::new()),
        &EngineProfile::default(),
    );
    (channel, clock, ctx)
}

fn shared(tracks: TrackSpec) -> Stimulus {
    Stimulus::new(3, Some(4), tracks)
}

fn mushra(ctx: PageContext) -> MushraPlayer {
    let tracks = TrackSpec::List(vec![
        TrackEntry::One(1),
        TrackEntry::One(2),
        TrackEntry::One(3),
    ]);
    MushraPlayer::new(
        PlayerId(1),
        shared(tracks.clone()),
        vec![shared(tracks.clone()), shared(tracks)],
        ctx,
    )
    .expect("valid MUSHRA player")
}

#[test]
fn mushra_slots_carry_reference_and_comparison_roles() {
    let (_, _, ctx) = context();
    let player = mushra(ctx);

    let roles: Vec<PlayerRole> = player
        .controller()
        .slots()
        .iter()
        .map(|slot| slot.role)
        .collect();
    assert_eq!(
        roles,
        vec![
            PlayerRole::MushraReference,
            PlayerRole::MushraComparison,
            PlayerRole::MushraComparison,
        ]
    );
    assert_eq!(player.comparison_count(), 2);
}

#[test]
fn mushra_ratings_are_checked() {
    let (_, _, ctx) = context();
    let mut player = mushra(ctx);

    assert_eq!(player.set_rating(0, 50), Err(CoreError::NotRateable(0)));
    assert_eq!(player.set_rating(1, 101), Err(CoreError::RatingOutOfRange(101)));
    assert_eq!(
        player.set_rating(3, 10),
        Err(CoreError::SlotOutOfRange {
            player: PlayerId(1),
            slot: 3
        })
    );
    assert!(!player.is_complete());

    player.set_rating(1, 0).expect("lowest rating");
    player.set_rating(2, 100).expect("highest rating");
    assert!(player.is_complete());
    assert_eq!(player.ratings(), &[Some(0u8), Some(100)]);
    assert_eq!(player.rating(0), None);
    assert_eq!(player.rating(2), Some(100));
}

#[test]
fn mushra_needs_a_comparison() {
    let (_, _, ctx) = context();
    let result = MushraPlayer::new(
        PlayerId(4),
        Stimulus::new(1, None, TrackSpec::Single(1)),
        Vec::new(),
        ctx,
    );
    assert!(matches!(result, Err(ConfigurationError::SlotLayout(_))));
}

#[test]
fn abx_play_counts_follow_completed_intervals() {
    let (_, clock, ctx) = context();
    let tracks = TrackSpec::List(vec![
        TrackEntry::One(1),
        TrackEntry::One(2),
        TrackEntry::One(1),
    ]);
    let mut player = AbxPlayer::new(
        PlayerId(2),
        shared(tracks.clone()),
        shared(tracks.clone()),
        Some(shared(tracks)),
        ctx,
    )
    .expect("valid ABX player");
    assert!(player.has_reference());

    let controller = player.controller_mut();
    controller.play(ABX_SLOT_A).expect("A");
    clock.advance_ms(100);
    controller.play(ABX_SLOT_B).expect("B");
    clock.advance_ms(100);
    controller.play(ABX_SLOT_A).expect("A again");
    clock.advance_ms(100);
    controller.play(ABX_SLOT_X).expect("X");
    controller.stop();

    assert_eq!(
        player.play_counts(),
        AbxPlayCounts {
            a: 2,
            b: 1,
            x: Some(1)
        }
    );

    assert_eq!(player.answer(), None);
    player.choose(AbxChoice::B);
    assert_eq!(player.answer(), Some(AbxChoice::B));
}

#[test]
fn abx_without_hidden_reference_has_no_x_count() {
    let (_, _, ctx) = context();
    let player = AbxPlayer::new(
        PlayerId(3),
        Stimulus::new(1, None, TrackSpec::Single(1)),
        Stimulus::new(2, None, TrackSpec::Single(2)),
        None,
        ctx,
    )
    .expect("valid ABX player");

    assert!(!player.has_reference());
    assert_eq!(player.play_counts().x, None);
    assert_eq!(player.controller().slots().len(), 2);
}

// Pause followed by a switch to another slot, with crossfade released: the
// engine is restarted from the cue and the reveal timer keeps its remaining time.
#[test]
fn paused_switch_without_crossfade_restarts_and_resumes_timer() {
    let (channel, clock, ctx) = context();
    let mut player = mushra(ctx).with_countdown(Duration::from_millis(1000));
    let controller = player.controller_mut();

    controller.play(0).expect("reference");
    clock.advance_ms(600);
    controller.pause();
    clock.advance_ms(5000);
    channel.take();

    controller.play(1).expect("comparison");
    let sent = channel.take();
    assert!(sent.contains(&EngineCommand::stop()));
    assert!(sent.contains(&EngineCommand::action(40163)));

    let timer = controller.countdown().expect("timer");
    assert_eq!(timer.remaining(clock.now()), Duration::from_millis(400));
    clock.advance_ms(400);
    controller.poll_countdown(clock.now());
    assert!(controller.is_revealed());
}

// The same sequence with crossfade engaged: only the mute sequence and a resume
// reach the engine, and the timer also resumes rather than restarting.
#[test]
fn paused_switch_under_crossfade_only_remutes_and_resumes() {
    let (channel, clock, ctx) = context();
    let mut player = mushra(ctx).with_countdown(Duration::from_millis(1000));
    let controller = player.controller_mut();
    controller.set_crossfade(true);

    controller.play(0).expect("reference");
    clock.advance_ms(600);
    controller.pause();
    clock.advance_ms(5000);
    channel.take();

    controller.play(2).expect("comparison 2");
    assert_eq!(
        channel.take(),
        vec![
            EngineCommand::action(40339),
            EngineCommand::action(40297),
            EngineCommand::new("/track/3/select", 1),
            EngineCommand::action(6),
            EngineCommand::play(),
        ]
    );
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(controller.durations(0).expect("ref").samples(), &[0.6]);

    let timer = controller.countdown().expect("timer");
    assert_eq!(timer.remaining(clock.now()), Duration::from_millis(400));
}
