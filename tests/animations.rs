use coin_knight::animation::{AnimationDef, AnimationPlayer, AnimationSet, Repeat, generate_frame_numbers};
use coin_knight::game::create_animations;

/// Quarter-second frames keep the arithmetic exact.
fn set() -> AnimationSet {
    let mut set = AnimationSet::new();
    set.create(AnimationDef::new("walk", "sheet", vec![5, 6, 7], 4.0, Repeat::Loop));
    set.create(AnimationDef::new("die", "sheet", vec![0, 1], 4.0, Repeat::Once));
    set
}

#[test]
fn frame_numbers_are_inclusive() {
    assert_eq!(generate_frame_numbers(4, 7), vec![4, 5, 6, 7]);
    assert_eq!(generate_frame_numbers(3, 3), vec![3]);
}

#[test]
fn looping_animation_wraps() {
    let set = set();
    let mut player = AnimationPlayer::new();
    assert!(player.play(&set, "walk", false));
    assert_eq!(player.frame(), Some(5));
    assert_eq!(player.sheet(), Some("sheet"));

    assert_eq!(player.tick(0.25), None);
    assert_eq!(player.frame(), Some(6));
    assert_eq!(player.tick(0.5), None);
    assert_eq!(player.frame(), Some(5));
    assert!(player.is_playing());
}

#[test]
fn once_animation_reports_completion_and_holds_last_frame() {
    let set = set();
    let mut player = AnimationPlayer::new();
    player.play(&set, "die", false);

    assert_eq!(player.tick(0.25), None);
    assert_eq!(player.frame(), Some(1));
    assert_eq!(player.tick(0.25).as_deref(), Some("die"));
    assert!(!player.is_playing());

    assert_eq!(player.tick(1.0), None, "completion is reported once");
    assert_eq!(player.frame(), Some(1));
}

#[test]
fn ignore_if_playing_keeps_the_running_frame() {
    let set = set();
    let mut player = AnimationPlayer::new();
    player.play(&set, "walk", false);
    player.tick(0.25);

    player.play(&set, "walk", true);
    assert_eq!(player.frame(), Some(6));

    player.play(&set, "walk", false);
    assert_eq!(player.frame(), Some(5));
}

#[test]
fn finished_animation_restarts_even_when_ignoring_if_playing() {
    let set = set();
    let mut player = AnimationPlayer::new();
    player.play(&set, "die", false);
    player.tick(1.0);
    assert!(!player.is_playing());

    player.play(&set, "die", true);
    assert!(player.is_playing());
    assert_eq!(player.frame(), Some(0));
}

#[test]
fn unknown_key_leaves_playback_unchanged() {
    let set = set();
    let mut player = AnimationPlayer::new();
    player.play(&set, "walk", false);
    player.tick(0.25);

    assert!(!player.play(&set, "fly", false));
    assert_eq!(player.current_key(), Some("walk"));
    assert_eq!(player.frame(), Some(6));
}

#[test]
fn idle_player_has_no_frame() {
    let mut player = AnimationPlayer::new();
    assert_eq!(player.tick(1.0), None);
    assert_eq!(player.frame(), None);
    assert_eq!(player.current_key(), None);
}

#[test]
fn game_animation_table() {
    let set = create_animations();
    assert_eq!(set.len(), 8);

    let death = set.get("death").unwrap();
    assert_eq!(death.sheet, "knight");
    assert_eq!(death.frames, vec![32, 33, 34, 35]);
    assert_eq!(death.repeat, Repeat::Once);

    let run = set.get("run").unwrap();
    assert_eq!(run.frames.len(), 16);
    assert_eq!(run.repeat, Repeat::Loop);

    assert_eq!(set.get("spin").unwrap().sheet, "coin");
    assert_eq!(set.get("slime_purple_walk").unwrap().sheet, "slime_purple");
}
