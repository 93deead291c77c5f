use auris_core::{
    AbxChoice, AbxPlayer, Command, CoreError, Event, ManualClock, MemoryChannel, MemoryPageLog,
    MushraPlayer, PageContext, PageCoordinator, PlaybackController, Player, Slot,
};
use auris_ports::command::EngineCommand;
use auris_ports::playback::PlaybackState;
use auris_ports::stimulus::{ConfigurationError, Stimulus, TrackEntry, TrackSpec};
use auris_ports::storage::EngineProfile;
use auris_ports::types::{PlayerId, PlayerRole};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    channel: Arc<MemoryChannel>,
    clock: Arc<ManualClock>,
    ctx: PageContext,
}

fn harness() -> Harness {
    let channel = Arc::new(MemoryChannel::new());
    let clock = Arc::new(ManualClock::new());
    let ctx = PageContext::new(
        channel.clone(),
        clock.clone(),
        Arc::new(MemoryPageLog::new()),
        &EngineProfile::default(),
    );
    Harness {
        channel,
        clock,
        ctx,
    }
}

fn single(h: &Harness, id: u32, start_cue: u32, end_cue: Option<u32>, track: u32) -> Player {
    let slot = Slot::new(
        PlayerRole::Single,
        Stimulus::new(start_cue, end_cue, TrackSpec::Single(track)),
    );
    PlaybackController::new(PlayerId(id), vec![slot], h.ctx.clone())
        .expect("valid player")
        .into()
}

fn mushra(h: &Harness, id: u32) -> Player {
    let tracks = TrackSpec::List(vec![
        TrackEntry::One(1),
        TrackEntry::One(2),
        TrackEntry::Many(vec![3, 4]),
    ]);
    let stimulus = Stimulus::new(2, Some(3), tracks);
    MushraPlayer::new(
        PlayerId(id),
        stimulus.clone(),
        vec![stimulus.clone(), stimulus],
        h.ctx.clone(),
    )
    .expect("valid MUSHRA player")
    .into()
}

fn is_stop_or_seek(command: &EngineCommand) -> bool {
    command.address == "/stop"
        || (command.address == "/action"
            && ((40160..=40169).contains(&command.value) || command.value > 41250))
}

#[test]
fn second_player_stops_first_before_its_own_sequence() {
    let h = harness();
    let a = PlayerId(1);
    let b = PlayerId(2);
    let mut page = PageCoordinator::new(
        vec![single(&h, 1, 1, None, 1), single(&h, 2, 2, None, 2)],
        h.ctx.clone(),
    )
    .expect("page");

    page.play(a, 0).expect("play A");
    h.clock.advance_ms(3000);
    h.channel.take();
    page.play(b, 0).expect("play B");

    let sent = h.channel.take();
    assert_eq!(sent[0], EngineCommand::new("/stop", 1));
    assert_eq!(sent[1], EngineCommand::action(40339));
    assert_eq!(sent.last(), Some(&EngineCommand::new("/play", 1)));

    let events = page.drain_events();
    let recorded = events
        .iter()
        .position(|event| {
            matches!(event, Event::DurationRecorded { player, seconds, .. } if *player == a && *seconds == 3.0)
        })
        .expect("A's duration recorded");
    let b_playing = events
        .iter()
        .position(|event| {
            matches!(event, Event::StateChanged { player, state: PlaybackState::Playing, .. } if *player == b)
        })
        .expect("B playing");
    assert!(recorded < b_playing);

    assert_eq!(
        page.player(a).expect("A").controller().state(),
        PlaybackState::Stopped
    );
    assert_eq!(page.last_active(), Some(b));
}

#[test]
fn at_most_one_player_is_playing_without_crossfade() {
    let h = harness();
    let mut page = PageCoordinator::new(
        vec![
            single(&h, 1, 1, None, 1),
            single(&h, 2, 2, None, 2),
            single(&h, 3, 3, None, 3),
        ],
        h.ctx.clone(),
    )
    .expect("page");

    let order = [1, 2, 2, 3, 1, 3, 3, 2, 1, 1];
    for (step, id) in order.iter().enumerate() {
        page.play(PlayerId(*id), 0).expect("play");
        if step % 3 == 0 {
            page.pause(PlayerId(*id)).expect("pause");
        }
        assert!(page.playing_count() <= 1);
    }
}

#[test]
fn paused_sibling_is_stopped_when_another_starts() {
    let h = harness();
    let mut page = PageCoordinator::new(
        vec![single(&h, 1, 1, None, 1), single(&h, 2, 2, None, 2)],
        h.ctx.clone(),
    )
    .expect("page");

    page.play(PlayerId(1), 0).expect("play A");
    page.pause(PlayerId(1)).expect("pause A");
    page.play(PlayerId(2), 0).expect("play B");

    let a = page.player(PlayerId(1)).expect("A").controller();
    assert_eq!(a.state(), PlaybackState::Stopped);
    assert_eq!(a.play_count(0), 1);
}

#[test]
fn crossfade_requires_shared_markers() {
    let h = harness();
    let mut page = PageCoordinator::new(
        vec![single(&h, 1, 1, Some(2), 1), single(&h, 2, 1, Some(3), 2)],
        h.ctx.clone(),
    )
    .expect("page");

    assert!(!page.uses_shared_markers());
    assert_eq!(page.set_crossfade(true), Err(CoreError::CrossfadeUnavailable));
    assert!(!page.crossfade_engaged());
    assert_eq!(page.set_crossfade(false), Ok(()));
}

#[test]
fn crossfade_hands_playback_over_between_players() {
    let h = harness();
    let mut page = PageCoordinator::new(
        vec![single(&h, 1, 4, Some(5), 1), single(&h, 2, 4, Some(5), 2)],
        h.ctx.clone(),
    )
    .expect("page");
    page.set_crossfade(true).expect("shared markers");

    page.play(PlayerId(1), 0).expect("play A");
    h.clock.advance_ms(1250);
    h.channel.take();
    page.play(PlayerId(2), 0).expect("play B");

    assert_eq!(
        h.channel.take(),
        vec![
            EngineCommand::action(40339),
            EngineCommand::action(40297),
            EngineCommand::new("/track/2/mute", 0),
        ]
    );
    assert_eq!(page.playing_count(), 1);
    let a = page.player(PlayerId(1)).expect("A").controller();
    assert_eq!(a.state(), PlaybackState::Stopped);
    assert_eq!(a.durations(0).expect("slot 0").samples(), &[1.25]);
    assert_eq!(page.last_active(), Some(PlayerId(2)));
}

#[test]
fn crossfade_hand_over_from_paused_player_resumes_engine() {
    let h = harness();
    let mut page = PageCoordinator::new(
        vec![single(&h, 1, 4, Some(5), 1), single(&h, 2, 4, Some(5), 2)],
        h.ctx.clone(),
    )
    .expect("page");
    page.set_crossfade(true).expect("shared markers");

    page.play(PlayerId(1), 0).expect("play A");
    page.pause(PlayerId(1)).expect("pause A");
    h.channel.take();
    page.play(PlayerId(2), 0).expect("play B");

    assert_eq!(h.channel.sent().last(), Some(&EngineCommand::new("/play", 1)));
    assert!(!h.channel.sent().iter().any(is_stop_or_seek));
    assert_eq!(
        page.player(PlayerId(2)).expect("B").controller().state(),
        PlaybackState::Playing
    );
}

#[test]
fn mushra_crossfade_switch_only_changes_tracks() {
    let h = harness();
    let id = PlayerId(7);
    let mut page = PageCoordinator::new(vec![mushra(&h, 7)], h.ctx.clone()).expect("page");
    page.set_crossfade(true).expect("shared markers");

    page.play(id, 0).expect("reference");
    let first = h.channel.take();
    assert!(first.iter().any(is_stop_or_seek));

    h.clock.advance_ms(1000);
    page.play(id, 2).expect("switch to comparison 2");
    let switch = h.channel.take();
    assert_eq!(
        switch,
        vec![
            EngineCommand::action(40339),
            EngineCommand::action(40297),
            EngineCommand::new("/track/3/select", 1),
            EngineCommand::new("/track/4/select", 1),
            EngineCommand::action(6),
        ]
    );

    h.clock.advance_ms(500);
    page.play(id, 1).expect("switch to comparison 1");
    assert!(!h.channel.take().iter().any(is_stop_or_seek));

    let controller = page.player(id).expect("mushra").controller();
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(controller.current_slot(), Some(1));
    assert_eq!(controller.durations(0).expect("ref").samples(), &[1.0]);
    assert_eq!(controller.durations(2).expect("cmp 2").samples(), &[0.5]);
}

#[test]
fn mushra_without_crossfade_restarts_from_cue() {
    let h = harness();
    let id = PlayerId(7);
    let mut page = PageCoordinator::new(vec![mushra(&h, 7)], h.ctx.clone()).expect("page");

    page.play(id, 0).expect("reference");
    h.channel.take();
    page.play(id, 1).expect("comparison");

    let sent = h.channel.take();
    assert!(sent.contains(&EngineCommand::new("/stop", 1)));
    assert!(sent.contains(&EngineCommand::action(40162)));
}

#[test]
fn loop_is_disabled_for_mushra_under_crossfade() {
    let h = harness();
    let id = PlayerId(7);
    let mut page = PageCoordinator::new(vec![mushra(&h, 7)], h.ctx.clone()).expect("page");

    assert_eq!(page.toggle_loop(id), Ok(true));
    h.channel.take();
    page.set_crossfade(true).expect("shared markers");

    assert_eq!(h.channel.take(), vec![EngineCommand::action(1068)]);
    assert!(!page.player(id).expect("mushra").controller().is_looping());
    assert!(page.drain_events().contains(&Event::LoopChanged {
        player: id,
        enabled: false
    }));

    page.play(id, 0).expect("play");
    let sent = h.channel.take();
    assert!(!sent.contains(&EngineCommand::action(40222)));
    assert!(!sent.contains(&EngineCommand::action(40223)));
    assert_eq!(sent.last(), Some(&EngineCommand::play()));

    assert_eq!(page.toggle_loop(id), Ok(false));
    assert!(h.channel.take().is_empty());
    assert!(page
        .drain_events()
        .contains(&Event::LoopRejected { player: id }));
}

#[test]
fn loop_under_crossfade_only_for_selected_player() {
    let h = harness();
    let mut page = PageCoordinator::new(
        vec![single(&h, 1, 4, None, 1), single(&h, 2, 4, None, 2)],
        h.ctx.clone(),
    )
    .expect("page");
    page.set_crossfade(true).expect("shared markers");
    page.play(PlayerId(2), 0).expect("play B");

    assert_eq!(page.toggle_loop(PlayerId(1)), Ok(false));
    assert_eq!(page.toggle_loop(PlayerId(2)), Ok(true));
}

#[test]
fn begin_session_clears_duration_logs() {
    let h = harness();
    let mut page =
        PageCoordinator::new(vec![single(&h, 1, 1, None, 1)], h.ctx.clone()).expect("page");

    page.play(PlayerId(1), 0).expect("play");
    h.clock.advance_ms(1000);
    page.stop(PlayerId(1)).expect("stop");
    assert_eq!(
        page.durations().samples_for(PlayerId(1), 0),
        Some(&[1.0][..])
    );

    page.handle_command(Command::BeginSession).expect("session");
    assert_eq!(page.durations().samples_for(PlayerId(1), 0), Some(&[] as &[f64]));
}

#[test]
fn duration_report_serialises_for_exporter() {
    let h = harness();
    let mut page = PageCoordinator::new(
        vec![
            single(&h, 1, 1, None, 1),
            AbxPlayer::new(
                PlayerId(2),
                Stimulus::new(1, None, TrackSpec::Single(2)),
                Stimulus::new(1, None, TrackSpec::Single(3)),
                None,
                h.ctx.clone(),
            )
            .expect("abx")
            .into(),
        ],
        h.ctx.clone(),
    )
    .expect("page");

    page.play(PlayerId(2), 1).expect("play B");
    h.clock.advance_ms(750);
    page.stop(PlayerId(2)).expect("stop");

    let report = page.durations();
    assert_eq!(report.entries.len(), 3);
    assert_eq!(report.entries[2].role, PlayerRole::AbxB);
    assert_eq!(report.entries[2].samples, vec![0.75]);

    let json = report.to_json().expect("json");
    assert!(json.contains("\"AbxB\""));
}

#[test]
fn countdown_reveals_once_through_tick() {
    let h = harness();
    let controller = PlaybackController::new(
        PlayerId(1),
        vec![Slot::new(
            PlayerRole::Single,
            Stimulus::new(1, None, TrackSpec::Single(1)),
        )],
        h.ctx.clone(),
    )
    .expect("valid")
    .with_countdown(Duration::from_millis(2000));
    let mut page = PageCoordinator::new(vec![controller.into()], h.ctx.clone()).expect("page");

    page.play(PlayerId(1), 0).expect("play");
    h.clock.advance_ms(1500);
    page.pause(PlayerId(1)).expect("pause");
    h.clock.advance_ms(5000);
    page.tick();
    assert!(!page.player(PlayerId(1)).expect("p").controller().is_revealed());

    page.pause(PlayerId(1)).expect("unpause");
    h.clock.advance_ms(499);
    page.tick();
    assert!(!page.player(PlayerId(1)).expect("p").controller().is_revealed());
    h.clock.advance_ms(1);
    page.tick();
    page.tick();

    let reveals = page
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, Event::Revealed { .. }))
        .count();
    assert_eq!(reveals, 1);
    assert!(page.player(PlayerId(1)).expect("p").controller().is_revealed());
}

#[test]
fn commands_route_to_players() {
    let h = harness();
    let mut page = PageCoordinator::new(
        vec![
            mushra(&h, 1),
            AbxPlayer::new(
                PlayerId(2),
                Stimulus::new(1, None, TrackSpec::Single(2)),
                Stimulus::new(1, None, TrackSpec::Single(3)),
                Some(Stimulus::new(1, None, TrackSpec::Single(2))),
                h.ctx.clone(),
            )
            .expect("abx")
            .into(),
        ],
        h.ctx.clone(),
    )
    .expect("page");

    page.handle_command(Command::SetRating {
        player: PlayerId(1),
        slot: 2,
        value: 80,
    })
    .expect("rating");
    page.handle_command(Command::ChooseAnswer {
        player: PlayerId(2),
        answer: AbxChoice::B,
    })
    .expect("answer");

    assert_eq!(
        page.handle_command(Command::SetRating {
            player: PlayerId(2),
            slot: 1,
            value: 10,
        }),
        Err(CoreError::WrongPlayerKind {
            player: PlayerId(2),
            expected: "MUSHRA",
        })
    );
    assert_eq!(
        page.play(PlayerId(9), 0),
        Err(CoreError::UnknownPlayer(PlayerId(9)))
    );
    assert_eq!(
        page.play(PlayerId(2), 3),
        Err(CoreError::SlotOutOfRange {
            player: PlayerId(2),
            slot: 3,
        })
    );

    match page.player(PlayerId(1)).expect("mushra") {
        Player::Mushra(player) => assert_eq!(player.rating(2), Some(80)),
        _ => panic!("expected MUSHRA player"),
    }
    match page.player(PlayerId(2)).expect("abx") {
        Player::Abx(player) => assert_eq!(player.answer(), Some(AbxChoice::B)),
        _ => panic!("expected ABX player"),
    }
}

#[test]
fn teardown_stops_and_unsolos() {
    let h = harness();
    let mut page =
        PageCoordinator::new(vec![single(&h, 1, 1, None, 1)], h.ctx.clone()).expect("page");

    page.play(PlayerId(1), 0).expect("play");
    h.channel.take();
    page.handle_command(Command::Teardown).expect("teardown");

    assert_eq!(
        h.channel.take(),
        vec![EngineCommand::new("/stop", 1), EngineCommand::action(40340)]
    );
}

#[test]
fn page_construction_rejects_bad_layouts() {
    let h = harness();
    assert!(matches!(
        PageCoordinator::new(Vec::new(), h.ctx.clone()),
        Err(ConfigurationError::EmptyPage)
    ));
    assert!(matches!(
        PageCoordinator::new(
            vec![single(&h, 1, 1, None, 1), single(&h, 1, 2, None, 2)],
            h.ctx.clone()
        ),
        Err(ConfigurationError::DuplicatePlayer(_))
    ));
}
